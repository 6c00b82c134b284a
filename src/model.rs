//! Entity tree produced by the parser and consumed by the serializer
//!
//! Ownership is strictly hierarchical: a [`Service`] owns its users,
//! categories and threads, a [`Thread`] owns its posts and a [`Post`] owns its
//! polls. The only links between entities are by value (`InSub`, `Nested`,
//! `AuthorID`) and are checked by [`crate::validation`], not enforced here.
//!
//! Optional scalars are `Option`s so that "key absent" stays observable; the
//! serde mapping uses the same PascalCase keys as the archive grammar and
//! skips absent values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Time zone assumed when an archive does not declare one
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Category types accepted before any `Categorization List` is seen
pub const DEFAULT_CATEGORY_TYPES: [&str; 2] = ["Categories", "Forums"];

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

/// One archived message board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Service {
    /// Unique entry number within the archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<u64>,
    /// Board name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Board software or kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    /// Where the board lived (URL, host)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_location: Option<String>,
    /// Time zone of all timestamps in the board
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Free-form multi-line description
    #[serde(default)]
    pub info: String,
    /// Interaction tags (e.g. "Reply", "Like")
    #[serde(default)]
    pub interactions: Vec<String>,
    /// Status tags
    #[serde(default)]
    pub status: Vec<String>,
    /// Category type name → level names
    #[serde(default)]
    pub categorization: IndexMap<String, Vec<String>>,
    /// Hierarchical categories in declaration order
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Users keyed by ID, in declaration order
    #[serde(default)]
    pub users: IndexMap<u64, User>,
    /// Message threads in declaration order
    #[serde(default)]
    pub message_threads: Vec<Thread>,
}

impl Default for Service {
    fn default() -> Self {
        Self {
            entry: None,
            service: None,
            service_type: None,
            service_location: None,
            time_zone: default_time_zone(),
            info: String::new(),
            interactions: Vec::new(),
            status: Vec::new(),
            categorization: IndexMap::new(),
            categories: Vec::new(),
            users: IndexMap::new(),
            message_threads: Vec::new(),
        }
    }
}

/// A hierarchical category or forum
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Category {
    /// Raw `"Type, Level"` string as written in the archive
    #[serde(default)]
    pub kind: String,
    /// Category type, derived from `kind`
    #[serde(rename = "Type", default)]
    pub kind_type: String,
    /// Category level, derived from `kind`
    #[serde(default)]
    pub level: String,
    /// ID, unique per type within a service
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Parent category ID of the same type, `0` for none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_sub: Option<u64>,
    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    /// Multi-line description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A board member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Handle, usually prefixed with `@`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Location text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Personal website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Avatar image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Banner image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    /// Join date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined: Option<String>,
    /// Birthday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    /// Hash tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_tags: Option<String>,
    /// Post number pinned on the profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_message: Option<u64>,
    /// Multi-line extra profile fields
    #[serde(default)]
    pub extra_fields: String,
    /// Multi-line biography
    #[serde(default)]
    pub bio: String,
    /// Multi-line signature
    #[serde(default)]
    pub signature: String,
}

/// A discussion topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Thread {
    /// Thread ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<u64>,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Thread type (e.g. "Topic")
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub thread_type: Option<String>,
    /// Thread state (e.g. "Pinned", "Locked")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Keywords
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Category names
    #[serde(default)]
    pub category: Vec<String>,
    /// Forum names
    #[serde(default)]
    pub forum: Vec<String>,
    /// Posts in declaration order
    #[serde(default)]
    pub messages: Vec<Post>,
}

/// A single message within a thread
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Post {
    /// Author display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Author user ID
    #[serde(rename = "AuthorID", default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<u64>,
    /// Posting time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Posting date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Last edit time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_time: Option<String>,
    /// Last edit date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_date: Option<String>,
    /// Last editor display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_author: Option<String>,
    /// Last editor user ID
    #[serde(rename = "EditAuthorID", default, skip_serializing_if = "Option::is_none")]
    pub edit_author_id: Option<u64>,
    /// Post kind (e.g. "Post", "Reply")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    /// Post subtitle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    /// Tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Post number, unique within its thread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<u64>,
    /// Pin marker
    #[serde(rename = "PinnedID", default, skip_serializing_if = "Option::is_none")]
    pub pinned_id: Option<u64>,
    /// Parent post number, `0` for top level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<u64>,
    /// Multi-line message body
    #[serde(default)]
    pub message: String,
    /// Polls attached to the post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polls: Option<Vec<Poll>>,
}

/// A poll attached to a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Poll {
    /// Poll number within the post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    /// Question text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Answer labels
    #[serde(default)]
    pub answers: Vec<String>,
    /// Vote counts, parallel to `answers`
    #[serde(default)]
    pub results: Vec<String>,
    /// Vote percentages, parallel to `answers`
    #[serde(default)]
    pub percentage: Vec<String>,
    /// Total votes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<String>,
    /// Any other `Key: value` pairs found in the poll body
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl Category {
    /// Re-derive `kind_type` and `level` from the raw `kind`.
    pub fn derive_type_and_level(&mut self) {
        let (kind_type, level) = crate::field::split_kind(&self.kind);
        self.kind_type = kind_type;
        self.level = level;
    }
}

impl Thread {
    /// Find a post by its `Post` number.
    pub fn post(&self, post: u64) -> Option<&Post> {
        self.messages.iter().find(|p| p.post == Some(post))
    }
}

impl Service {
    /// Find a thread by its `Thread` ID.
    pub fn thread(&self, thread: u64) -> Option<&Thread> {
        self.message_threads.iter().find(|t| t.thread == Some(thread))
    }

    /// Total number of posts across all threads.
    pub fn post_count(&self) -> usize {
        self.message_threads.iter().map(|t| t.messages.len()).sum()
    }
}
