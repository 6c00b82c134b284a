//! Section state machine turning archive lines into a [`Service`] tree
//!
//! The parser keeps a single stack of open sections. Every `--- Start X ---`
//! marker pushes a frame that owns the builder for that section; the matching
//! `--- End X ---` pops it and moves the finished value into the nearest
//! enclosing frame that can own it (a post into its thread, a thread into its
//! service, a finished service into the result list).
//!
//! Field lines are dispatched on the top frame only, so the innermost open
//! section decides what a key means. Bodies, comment sections and include
//! blocks are opaque: every line up to their own end marker is content.
//!
//! # Example
//!
//! ```rust
//! use boardarchive::parser::{parse_str, ParseOptions};
//!
//! let text = "\
//! --- Start Archive Service ---
//! Entry: 1
//! Service: Retro Board
//! --- End Archive Service ---
//! ";
//!
//! let services = parse_str(text, &ParseOptions::default())?;
//! assert_eq!(services[0].entry, Some(1));
//! assert_eq!(services[0].service.as_deref(), Some("Retro Board"));
//! # Ok::<(), boardarchive::ArchiveError>(())
//! ```
//!
//! # Leniency
//!
//! An `End` marker with no open section of that name is ignored. An `End`
//! marker naming a section deeper in the stack closes the sections above it
//! first. Sections still open at end of input are discarded.

use crate::error::{ArchiveError, FormatError, FormatErrorKind, Result};
use crate::field::{parse_non_negative, split_line_breaks, split_list, tokenize};
use crate::file_reader;
use crate::include;
use crate::model::{Category, Poll, Post, Service, Thread, User, DEFAULT_CATEGORY_TYPES};
use crate::section::{BodyKind, IncludeKind, Marker, SectionKind};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default limit on nested include blocks
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// Options passed down through every (recursive) parse
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Skip deep checks: category `InSub` references are not resolved
    /// while parsing and are left to the validator
    pub validate_only: bool,
    /// Open the files listed in include blocks; when false the blocks are
    /// dropped without touching the filesystem
    pub follow_includes: bool,
    /// Emit a per-line trace at `debug` level
    pub verbose: bool,
    /// Maximum nesting of include blocks before failing
    pub max_include_depth: usize,
    /// Directory relative include paths resolve against
    pub base_dir: Option<PathBuf>,
    depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            validate_only: false,
            follow_includes: true,
            verbose: false,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            base_dir: None,
            depth: 0,
        }
    }
}

impl ParseOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `validate_only`
    pub fn with_validate_only(mut self, validate_only: bool) -> Self {
        self.validate_only = validate_only;
        self
    }

    /// Set `follow_includes`
    pub fn with_follow_includes(mut self, follow: bool) -> Self {
        self.follow_includes = follow;
        self
    }

    /// Set `verbose`
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the include depth limit
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Set the directory relative include paths resolve against
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Current include nesting depth (0 for the top-level document)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Options for a document included one level deeper
    pub(crate) fn descend(&self) -> Self {
        let mut nested = self.clone();
        nested.depth += 1;
        nested
    }
}

/// Category types and IDs seen so far, used for `InSub` checks
#[derive(Debug, Clone)]
pub(crate) struct CategoryRegistry {
    types: Vec<String>,
    ids: HashMap<String, HashSet<u64>>,
}

impl CategoryRegistry {
    fn new() -> Self {
        Self {
            types: DEFAULT_CATEGORY_TYPES.iter().map(|t| t.to_string()).collect(),
            ids: HashMap::new(),
        }
    }

    fn is_known_type(&self, kind_type: &str) -> bool {
        self.types.iter().any(|t| t == kind_type)
    }

    fn set_types<'a>(&mut self, types: impl IntoIterator<Item = &'a String>) {
        self.types = types.into_iter().cloned().collect();
    }

    fn contains(&self, kind_type: &str, id: u64) -> bool {
        self.ids
            .get(kind_type)
            .is_some_and(|ids| ids.contains(&id))
    }

    pub(crate) fn register(&mut self, kind_type: &str, id: u64) {
        self.ids.entry(kind_type.to_string()).or_default().insert(id);
    }
}

/// An open section and the builder it owns
#[derive(Debug)]
enum Frame {
    Service(Service),
    UserList,
    User { id: Option<u64>, user: User },
    MessageList,
    Thread { thread: Thread, post_ids: HashSet<u64> },
    Post(Post),
    PollList(Vec<Poll>),
    Poll(Poll),
    Category(Category),
    Categorization(IndexMap<String, Vec<String>>),
    Body { kind: BodyKind, lines: Vec<String> },
    Include { kind: IncludeKind, files: Vec<String> },
    Comment,
}

impl Frame {
    fn open(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Service => Frame::Service(Service::default()),
            SectionKind::UserList => Frame::UserList,
            SectionKind::UserInfo => Frame::User {
                id: None,
                user: User::default(),
            },
            SectionKind::MessageList => Frame::MessageList,
            SectionKind::MessageThread => Frame::Thread {
                thread: Thread::default(),
                post_ids: HashSet::new(),
            },
            SectionKind::MessagePost => Frame::Post(Post::default()),
            SectionKind::PollList => Frame::PollList(Vec::new()),
            SectionKind::PollBody => Frame::Poll(Poll::default()),
            SectionKind::CategoryList => Frame::Category(Category::default()),
            SectionKind::CategorizationList => Frame::Categorization(IndexMap::new()),
            SectionKind::Body(kind) => Frame::Body {
                kind,
                lines: Vec::new(),
            },
            SectionKind::Include(kind) => Frame::Include {
                kind,
                files: Vec::new(),
            },
            SectionKind::Comment => Frame::Comment,
        }
    }

    fn kind(&self) -> SectionKind {
        match self {
            Frame::Service(_) => SectionKind::Service,
            Frame::UserList => SectionKind::UserList,
            Frame::User { .. } => SectionKind::UserInfo,
            Frame::MessageList => SectionKind::MessageList,
            Frame::Thread { .. } => SectionKind::MessageThread,
            Frame::Post(_) => SectionKind::MessagePost,
            Frame::PollList(_) => SectionKind::PollList,
            Frame::Poll(_) => SectionKind::PollBody,
            Frame::Category(_) => SectionKind::CategoryList,
            Frame::Categorization(_) => SectionKind::CategorizationList,
            Frame::Body { kind, .. } => SectionKind::Body(*kind),
            Frame::Include { kind, .. } => SectionKind::Include(*kind),
            Frame::Comment => SectionKind::Comment,
        }
    }

    fn as_service_mut(&mut self) -> Option<&mut Service> {
        match self {
            Frame::Service(service) => Some(service),
            _ => None,
        }
    }

    fn as_user_mut(&mut self) -> Option<&mut User> {
        match self {
            Frame::User { user, .. } => Some(user),
            _ => None,
        }
    }

    fn as_thread_mut(&mut self) -> Option<(&mut Thread, &mut HashSet<u64>)> {
        match self {
            Frame::Thread { thread, post_ids } => Some((thread, post_ids)),
            _ => None,
        }
    }

    fn as_post_mut(&mut self) -> Option<&mut Post> {
        match self {
            Frame::Post(post) => Some(post),
            _ => None,
        }
    }

    fn as_category_mut(&mut self) -> Option<&mut Category> {
        match self {
            Frame::Category(category) => Some(category),
            _ => None,
        }
    }
}

struct Parser<'a> {
    options: &'a ParseOptions,
    stack: Vec<Frame>,
    services: Vec<Service>,
    registry: CategoryRegistry,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            services: Vec::new(),
            registry: CategoryRegistry::new(),
            line: 0,
        }
    }

    fn trace(&self, what: impl fmt::Display) {
        if self.options.verbose {
            debug!(line = self.line, depth = self.options.depth, "{}", what);
        }
    }

    fn orphan(&self, what: impl fmt::Display) {
        warn!(
            line = self.line,
            "{} closed outside of an enclosing section, discarded", what
        );
    }

    fn feed(&mut self, line: &str) -> Result<()> {
        let marker = Marker::parse(line);

        if let Some(top) = self.stack.last_mut() {
            let kind = top.kind();
            if kind.is_opaque() && marker != Some(Marker::End(kind)) {
                match top {
                    Frame::Body { lines, .. } => lines.push(line.to_string()),
                    Frame::Include { files, .. } if !line.is_empty() => {
                        files.push(line.to_string())
                    }
                    _ => {}
                }
                self.trace(format_args!("{} ({} content)", line, kind));
                return Ok(());
            }
        }

        match marker {
            Some(Marker::Start(kind)) => {
                self.open(kind);
                Ok(())
            }
            Some(Marker::End(kind)) => self.close(kind),
            None => self.field(line),
        }
    }

    fn open(&mut self, kind: SectionKind) {
        self.trace(format_args!("Starting {}", kind));
        self.stack.push(Frame::open(kind));
    }

    fn close(&mut self, kind: SectionKind) -> Result<()> {
        let Some(position) = self.stack.iter().rposition(|frame| frame.kind() == kind) else {
            self.trace(format_args!("Ignoring unmatched end of {}", kind));
            return Ok(());
        };

        while let Some(frame) = self.stack.pop() {
            let target = self.stack.len() == position;
            if target {
                self.trace(format_args!("Ending {}", kind));
            } else {
                warn!(
                    line = self.line,
                    "{} left open, closed by end of {}",
                    frame.kind(),
                    kind
                );
            }
            self.finalize(frame)?;
            if target {
                break;
            }
        }
        Ok(())
    }

    fn finalize(&mut self, frame: Frame) -> Result<()> {
        match frame {
            Frame::Service(service) => self.services.push(service),
            Frame::UserList | Frame::MessageList | Frame::Comment => {}
            Frame::User { id, user } => self.commit_user(id, user),
            Frame::Thread { thread, .. } => {
                match self.stack.iter_mut().rev().find_map(Frame::as_service_mut) {
                    Some(service) => service.message_threads.push(thread),
                    None => self.orphan(SectionKind::MessageThread),
                }
            }
            Frame::Post(post) if post == Post::default() => {
                warn!(line = self.line, "Message Post without any keys, discarded");
            }
            Frame::Post(post) => {
                match self.stack.iter_mut().rev().find_map(Frame::as_thread_mut) {
                    Some((thread, _)) => thread.messages.push(post),
                    None => self.orphan(SectionKind::MessagePost),
                }
            }
            Frame::PollList(polls) => {
                match self.stack.iter_mut().rev().find_map(Frame::as_post_mut) {
                    Some(post) => post.polls = Some(polls),
                    None => self.orphan(SectionKind::PollList),
                }
            }
            Frame::Poll(poll) => {
                let list = self.stack.iter_mut().rev().find_map(|frame| match frame {
                    Frame::PollList(polls) => Some(polls),
                    _ => None,
                });
                match list {
                    Some(polls) => polls.push(poll),
                    None => self.orphan(SectionKind::PollBody),
                }
            }
            Frame::Category(category) => self.commit_category(category)?,
            Frame::Categorization(categorization) => self.commit_categorization(categorization),
            Frame::Body { kind, lines } => self.commit_body(kind, lines.join("\n")),
            Frame::Include { kind, files } => self.resolve_include(kind, &files)?,
        }
        Ok(())
    }

    fn commit_user(&mut self, id: Option<u64>, user: User) {
        let Some(id) = id else {
            warn!(line = self.line, "User Info without a User key, discarded");
            return;
        };
        match self.stack.iter_mut().rev().find_map(Frame::as_service_mut) {
            Some(service) => {
                service.users.insert(id, user);
            }
            None => self.orphan(SectionKind::UserInfo),
        }
    }

    fn commit_category(&mut self, mut category: Category) -> Result<()> {
        if category == Category::default() {
            return Ok(());
        }
        category.derive_type_and_level();

        if !self.registry.is_known_type(&category.kind_type) {
            return Err(FormatError::new(
                FormatErrorKind::InvalidCategoryType,
                "Type",
                category.kind_type.as_str(),
                self.line,
            )
            .with_detail(format!("expected one of {}", self.registry.types.join(", ")))
            .into());
        }

        let in_sub = category.in_sub.unwrap_or(0);
        if in_sub != 0
            && !self.options.validate_only
            && !self.registry.contains(&category.kind_type, in_sub)
        {
            return Err(FormatError::new(
                FormatErrorKind::UnknownParent,
                "InSub",
                in_sub.to_string(),
                self.line,
            )
            .into());
        }

        match self.stack.iter_mut().rev().find_map(Frame::as_service_mut) {
            Some(service) => {
                if let Some(id) = category.id {
                    self.registry.register(&category.kind_type, id);
                }
                service.categories.push(category);
            }
            None => self.orphan(SectionKind::CategoryList),
        }
        Ok(())
    }

    fn commit_categorization(&mut self, categorization: IndexMap<String, Vec<String>>) {
        match self.stack.iter_mut().rev().find_map(Frame::as_service_mut) {
            Some(service) => {
                service.categorization = categorization;
                self.registry.set_types(service.categorization.keys());
            }
            None => self.registry.set_types(categorization.keys()),
        }
    }

    fn commit_body(&mut self, kind: BodyKind, text: String) {
        let stack = self.stack.iter_mut().rev();
        let applied = match kind {
            BodyKind::Info => stack
                .filter_map(Frame::as_service_mut)
                .next()
                .map(|service| service.info = text),
            BodyKind::ExtraFields => stack
                .filter_map(Frame::as_user_mut)
                .next()
                .map(|user| user.extra_fields = text),
            BodyKind::Bio => stack
                .filter_map(Frame::as_user_mut)
                .next()
                .map(|user| user.bio = text),
            BodyKind::Signature => stack
                .filter_map(Frame::as_user_mut)
                .next()
                .map(|user| user.signature = text),
            BodyKind::Description => stack
                .filter_map(Frame::as_category_mut)
                .next()
                .map(|category| category.description = Some(text)),
            BodyKind::Message => stack
                .filter_map(Frame::as_post_mut)
                .next()
                .map(|post| post.message = text),
        };
        if applied.is_none() {
            self.orphan(SectionKind::Body(kind));
        }
    }

    fn resolve_include(&mut self, kind: IncludeKind, files: &[String]) -> Result<()> {
        if kind == IncludeKind::Service {
            let included = include::load_services(files, self.options)?;
            self.services.extend(included);
            return Ok(());
        }

        if !self.stack.iter().any(|frame| matches!(frame, Frame::Service(_))) {
            warn!(
                line = self.line,
                "Include {} outside of an archive service, skipped",
                kind.name()
            );
            return Ok(());
        }

        let included = include::load_services(files, self.options)?;
        let Some(service) = self.stack.iter_mut().rev().find_map(Frame::as_service_mut) else {
            return Ok(());
        };
        match kind {
            IncludeKind::Users => include::merge_users(service, included),
            IncludeKind::Messages => include::merge_messages(service, included),
            IncludeKind::Categories => {
                include::merge_categories(service, included, &mut self.registry)
            }
            IncludeKind::Service => {}
        }
        Ok(())
    }

    fn field(&mut self, line: &str) -> Result<()> {
        let Some((key, value)) = tokenize(line) else {
            return Ok(());
        };
        if key.is_empty() {
            return Ok(());
        }
        self.trace(format_args!("{} set to {}", key, value));

        match self.stack.last().map(Frame::kind) {
            Some(SectionKind::Service) => self.service_field(key, value),
            Some(SectionKind::MessageList) => {
                self.message_list_field(key, value);
                Ok(())
            }
            Some(SectionKind::UserInfo) => self.user_field(key, value),
            Some(SectionKind::MessageThread) => self.thread_field(key, value),
            Some(SectionKind::MessagePost) => self.post_field(key, value),
            Some(SectionKind::PollBody) => {
                self.poll_field(key, value);
                Ok(())
            }
            Some(SectionKind::CategoryList) => self.category_field(key, value),
            Some(SectionKind::CategorizationList) => {
                if let Some(Frame::Categorization(map)) = self.stack.last_mut() {
                    map.insert(key.to_string(), split_list(value));
                }
                Ok(())
            }
            _ => {
                self.trace(format_args!("Ignoring field {} outside of a keyed section", key));
                Ok(())
            }
        }
    }

    fn service_field(&mut self, key: &str, value: &str) -> Result<()> {
        let line = self.line;
        let Some(Frame::Service(service)) = self.stack.last_mut() else {
            return Ok(());
        };
        match key {
            "Entry" => service.entry = Some(parse_non_negative(value, key, line)?),
            "Service" => service.service = Some(value.to_string()),
            "ServiceType" => service.service_type = Some(value.to_string()),
            "ServiceLocation" => service.service_location = Some(value.to_string()),
            "TimeZone" => service.time_zone = value.to_string(),
            "Info" if !value.is_empty() => service.info = value.to_string(),
            "Categories" | "Forums" => {
                service
                    .categorization
                    .insert(key.to_string(), split_list(value));
            }
            _ => {}
        }
        Ok(())
    }

    fn message_list_field(&mut self, key: &str, value: &str) {
        let Some(service) = self.stack.iter_mut().rev().find_map(Frame::as_service_mut) else {
            return;
        };
        match key {
            "Interactions" => service.interactions = split_list(value),
            "Status" => service.status = split_list(value),
            _ => {}
        }
    }

    fn user_field(&mut self, key: &str, value: &str) -> Result<()> {
        let line = self.line;

        if key == "User" {
            let id = parse_non_negative(value, key, line)?;
            let previous = match self.stack.last_mut() {
                Some(Frame::User { id: slot, user }) => slot
                    .replace(id)
                    .map(|old| (old, std::mem::take(user))),
                _ => None,
            };
            if let Some((old_id, old_user)) = previous {
                self.commit_user(Some(old_id), old_user);
            }
            return Ok(());
        }

        let Some(Frame::User { user, .. }) = self.stack.last_mut() else {
            return Ok(());
        };
        let text = || Some(value.to_string());
        match key {
            "Name" => user.name = text(),
            "Handle" => user.handle = text(),
            "Email" => user.email = text(),
            "Phone" => user.phone = text(),
            "Location" => user.location = text(),
            "Website" => user.website = text(),
            "Avatar" => user.avatar = text(),
            "Banner" => user.banner = text(),
            "Joined" => user.joined = text(),
            "Birthday" => user.birthday = text(),
            "HashTags" => user.hash_tags = text(),
            "PinnedMessage" => user.pinned_message = Some(parse_non_negative(value, key, line)?),
            "ExtraFields" if !value.is_empty() => user.extra_fields = value.to_string(),
            "Bio" if !value.is_empty() => user.bio = value.to_string(),
            "Signature" if !value.is_empty() => user.signature = value.to_string(),
            _ => {}
        }
        Ok(())
    }

    fn thread_field(&mut self, key: &str, value: &str) -> Result<()> {
        let line = self.line;
        let Some(Frame::Thread { thread, .. }) = self.stack.last_mut() else {
            return Ok(());
        };
        match key {
            "Thread" => thread.thread = Some(parse_non_negative(value, key, line)?),
            "Title" => thread.title = value.to_string(),
            "Type" => thread.thread_type = Some(value.to_string()),
            "State" => thread.state = Some(value.to_string()),
            "Keywords" => thread.keywords = Some(value.to_string()),
            "Category" => thread.category = split_list(value),
            "Forum" => thread.forum = split_list(value),
            _ => {}
        }
        Ok(())
    }

    fn post_field(&mut self, key: &str, value: &str) -> Result<()> {
        let line = self.line;

        if key == "Post" {
            let number = parse_non_negative(value, key, line)?;
            if let Some((_, post_ids)) = self.stack.iter_mut().rev().find_map(Frame::as_thread_mut)
            {
                if !post_ids.insert(number) {
                    return Err(FormatError::new(
                        FormatErrorKind::DuplicatePost,
                        key,
                        value,
                        line,
                    )
                    .into());
                }
            }
            if let Some(Frame::Post(post)) = self.stack.last_mut() {
                post.post = Some(number);
            }
            return Ok(());
        }

        let Some(Frame::Post(post)) = self.stack.last_mut() else {
            return Ok(());
        };
        let text = || Some(value.to_string());
        match key {
            "Author" => post.author = text(),
            "AuthorID" => post.author_id = Some(parse_non_negative(value, key, line)?),
            "Time" => post.time = text(),
            "Date" => post.date = text(),
            "EditTime" => post.edit_time = text(),
            "EditDate" => post.edit_date = text(),
            "EditAuthor" => post.edit_author = text(),
            "EditAuthorID" => post.edit_author_id = Some(parse_non_negative(value, key, line)?),
            "SubType" => post.sub_type = text(),
            "SubTitle" => post.sub_title = text(),
            "Tags" => post.tags = text(),
            "PinnedID" => post.pinned_id = Some(parse_non_negative(value, key, line)?),
            "Nested" => post.nested = Some(parse_non_negative(value, key, line)?),
            "Message" if !value.is_empty() => post.message = value.to_string(),
            _ => {}
        }
        Ok(())
    }

    fn poll_field(&mut self, key: &str, value: &str) {
        let Some(Frame::Poll(poll)) = self.stack.last_mut() else {
            return;
        };
        match key {
            "Num" => poll.num = Some(value.to_string()),
            "Question" => poll.question = Some(value.to_string()),
            "Answers" => poll.answers = split_list(value),
            "Results" => poll.results = split_list(value),
            "Percentage" => poll.percentage = split_list(value),
            "Votes" => poll.votes = Some(value.to_string()),
            other => {
                poll.extra.insert(other.to_string(), value.to_string());
            }
        }
    }

    fn category_field(&mut self, key: &str, value: &str) -> Result<()> {
        let line = self.line;
        let Some(Frame::Category(category)) = self.stack.last_mut() else {
            return Ok(());
        };
        match key {
            "Kind" => category.kind = value.to_string(),
            "ID" => category.id = Some(parse_non_negative(value, key, line)?),
            "InSub" => category.in_sub = Some(parse_non_negative(value, key, line)?),
            "Headline" => category.headline = Some(value.to_string()),
            "Description" if !value.is_empty() => category.description = Some(value.to_string()),
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Vec<Service> {
        for frame in self.stack.iter().rev() {
            warn!("{} still open at end of input, discarded", frame.kind());
        }
        self.services
    }
}

/// Parse a sequence of lines into services.
///
/// Lines are trimmed before use; line numbers in errors are 1-based
/// positions in `lines`.
pub fn parse_lines<I, S>(lines: I, options: &ParseOptions) -> Result<Vec<Service>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::new(options);
    for (index, line) in lines.into_iter().enumerate() {
        parser.line = index + 1;
        parser.feed(line.as_ref().trim())?;
    }
    Ok(parser.finish())
}

/// Parse archive text held in memory.
///
/// `\n`, `\r\n` and bare `\r` line endings are all accepted.
pub fn parse_str(text: &str, options: &ParseOptions) -> Result<Vec<Service>> {
    parse_lines(split_line_breaks(text), options)
}

/// Parse archive text from a buffered reader.
pub fn parse_reader<R: BufRead>(mut reader: R, options: &ParseOptions) -> Result<Vec<Service>> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|err| ArchiveError::io("<reader>", err))?;
    parse_str(&text, options)
}

/// Parse an archive file, decompressing `.gz` files transparently.
///
/// Relative include paths inside the file resolve against the file's own
/// directory. Format errors are tagged with the file path.
pub fn parse_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Vec<Service>> {
    let path = path.as_ref();
    let text = file_reader::read_archive_text(path)?;

    let mut file_options = options.clone();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        file_options.base_dir = Some(parent.to_path_buf());
    }

    parse_str(&text, &file_options).map_err(|err| match err {
        ArchiveError::Format(format) => ArchiveError::Format(format.in_file(path)),
        other => other,
    })
}
