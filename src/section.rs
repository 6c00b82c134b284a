//! Structural marker lines of the archive grammar
//!
//! Sections are delimited by literal marker lines:
//!
//! ```text
//! --- Start Message Thread ---
//! ...
//! --- End Message Thread ---
//! ```
//!
//! Include blocks use a different word order:
//!
//! ```text
//! --- Include Users Start ---
//! users.txt
//! --- Include Users End ---
//! ```
//!
//! The parser recognizes markers through [`Marker::parse`]; the serializer
//! renders them with [`SectionKind::start_marker`] and
//! [`SectionKind::end_marker`], so both directions share one table.

use std::fmt;

/// Multi-line text fields delimited by their own body markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Service `Info`
    Info,
    /// User `ExtraFields`
    ExtraFields,
    /// User `Bio`
    Bio,
    /// User `Signature`
    Signature,
    /// Category `Description`
    Description,
    /// Post `Message`
    Message,
}

/// The four include block flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncludeKind {
    /// Whole services, appended as siblings
    Service,
    /// Users merged into the current service
    Users,
    /// Threads appended to the current service
    Messages,
    /// Categories appended to the current service
    Categories,
}

/// Every section a marker line can open or close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// `Archive Service`
    Service,
    /// `User List`
    UserList,
    /// `User Info`
    UserInfo,
    /// `Message List`
    MessageList,
    /// `Message Thread`
    MessageThread,
    /// `Message Post`
    MessagePost,
    /// `Category List`
    CategoryList,
    /// `Categorization List`
    CategorizationList,
    /// `Poll List`
    PollList,
    /// `Poll Body`
    PollBody,
    /// `Comment Section`
    Comment,
    /// One of the `... Body` text sections
    Body(BodyKind),
    /// One of the `Include ...` blocks
    Include(IncludeKind),
}

/// A recognized marker line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Opens a section
    Start(SectionKind),
    /// Closes a section
    End(SectionKind),
}

impl BodyKind {
    /// Marker name, e.g. `Bio Body`
    pub fn name(self) -> &'static str {
        match self {
            BodyKind::Info => "Info Body",
            BodyKind::ExtraFields => "ExtraFields Body",
            BodyKind::Bio => "Bio Body",
            BodyKind::Signature => "Signature Body",
            BodyKind::Description => "Description Body",
            BodyKind::Message => "Message Body",
        }
    }

    /// Field key the body populates, also written as a label line before it
    pub fn key(self) -> &'static str {
        match self {
            BodyKind::Info => "Info",
            BodyKind::ExtraFields => "ExtraFields",
            BodyKind::Bio => "Bio",
            BodyKind::Signature => "Signature",
            BodyKind::Description => "Description",
            BodyKind::Message => "Message",
        }
    }
}

impl IncludeKind {
    /// Word used in the marker, e.g. `Users`
    pub fn name(self) -> &'static str {
        match self {
            IncludeKind::Service => "Service",
            IncludeKind::Users => "Users",
            IncludeKind::Messages => "Messages",
            IncludeKind::Categories => "Categories",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Service" => Some(IncludeKind::Service),
            "Users" => Some(IncludeKind::Users),
            "Messages" => Some(IncludeKind::Messages),
            "Categories" => Some(IncludeKind::Categories),
            _ => None,
        }
    }
}

impl SectionKind {
    /// Section name as written between `Start`/`End` and the dashes
    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Service => "Archive Service",
            SectionKind::UserList => "User List",
            SectionKind::UserInfo => "User Info",
            SectionKind::MessageList => "Message List",
            SectionKind::MessageThread => "Message Thread",
            SectionKind::MessagePost => "Message Post",
            SectionKind::CategoryList => "Category List",
            SectionKind::CategorizationList => "Categorization List",
            SectionKind::PollList => "Poll List",
            SectionKind::PollBody => "Poll Body",
            SectionKind::Comment => "Comment Section",
            SectionKind::Body(body) => body.name(),
            SectionKind::Include(include) => include.name(),
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "Archive Service" => SectionKind::Service,
            "User List" => SectionKind::UserList,
            "User Info" => SectionKind::UserInfo,
            "Message List" => SectionKind::MessageList,
            "Message Thread" => SectionKind::MessageThread,
            "Message Post" => SectionKind::MessagePost,
            "Category List" => SectionKind::CategoryList,
            "Categorization List" => SectionKind::CategorizationList,
            "Poll List" => SectionKind::PollList,
            "Poll Body" => SectionKind::PollBody,
            "Comment Section" => SectionKind::Comment,
            "Info Body" => SectionKind::Body(BodyKind::Info),
            "ExtraFields Body" => SectionKind::Body(BodyKind::ExtraFields),
            "Bio Body" => SectionKind::Body(BodyKind::Bio),
            "Signature Body" => SectionKind::Body(BodyKind::Signature),
            "Description Body" => SectionKind::Body(BodyKind::Description),
            "Message Body" => SectionKind::Body(BodyKind::Message),
            _ => return None,
        };
        Some(kind)
    }

    /// Whether every line inside the section, other than its own end
    /// marker, is raw content rather than grammar
    pub fn is_opaque(self) -> bool {
        matches!(
            self,
            SectionKind::Body(_) | SectionKind::Include(_) | SectionKind::Comment
        )
    }

    /// Marker line opening this section
    pub fn start_marker(self) -> String {
        match self {
            SectionKind::Include(include) => format!("--- Include {} Start ---", include.name()),
            other => format!("--- Start {} ---", other.name()),
        }
    }

    /// Marker line closing this section
    pub fn end_marker(self) -> String {
        match self {
            SectionKind::Include(include) => format!("--- Include {} End ---", include.name()),
            other => format!("--- End {} ---", other.name()),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Include(include) => write!(f, "Include {}", include.name()),
            other => f.write_str(other.name()),
        }
    }
}

impl Marker {
    /// Recognize a trimmed line as a marker.
    ///
    /// Only the exact grammar strings match; anything else, including
    /// markers naming unknown sections, is not a marker.
    pub fn parse(line: &str) -> Option<Marker> {
        let inner = line.strip_prefix("--- ")?.strip_suffix(" ---")?;

        if let Some(name) = inner.strip_prefix("Start ") {
            return SectionKind::from_name(name).map(Marker::Start);
        }
        if let Some(name) = inner.strip_prefix("End ") {
            return SectionKind::from_name(name).map(Marker::End);
        }
        let rest = inner.strip_prefix("Include ")?;
        if let Some(name) = rest.strip_suffix(" Start") {
            return IncludeKind::from_name(name).map(|k| Marker::Start(SectionKind::Include(k)));
        }
        if let Some(name) = rest.strip_suffix(" End") {
            return IncludeKind::from_name(name).map(|k| Marker::End(SectionKind::Include(k)));
        }
        None
    }
}
