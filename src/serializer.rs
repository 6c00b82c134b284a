//! Tree to archive text
//!
//! The output uses the same marker and key grammar the parser reads, so a
//! complete tree survives `serialize → parse` unchanged. Absent optional
//! values are written as `""` (text) or `"0"` (numbers).

use crate::error::{ArchiveError, Result};
use crate::field::split_line_breaks;
use crate::file_reader;
use crate::model::{Category, Poll, Post, Service, Thread, User};
use crate::section::{BodyKind, SectionKind};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

/// Line terminator used in serialized output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
}

impl LineEnding {
    /// The terminator characters
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lf" => Ok(LineEnding::Lf),
            "crlf" => Ok(LineEnding::CrLf),
            "cr" => Ok(LineEnding::Cr),
            other => Err(format!(
                "unknown line ending '{}' (expected lf, crlf or cr)",
                other
            )),
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LineEnding::Lf => "lf",
            LineEnding::CrLf => "crlf",
            LineEnding::Cr => "cr",
        })
    }
}

#[derive(Default)]
struct Emitter {
    lines: Vec<String>,
}

impl Emitter {
    fn start(&mut self, kind: SectionKind) {
        self.lines.push(kind.start_marker());
    }

    fn end(&mut self, kind: SectionKind) {
        self.lines.push(kind.end_marker());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn field(&mut self, key: &str, value: impl fmt::Display) {
        self.lines.push(format!("{}: {}", key, value));
    }

    fn text(&mut self, key: &str, value: Option<&String>) {
        self.field(key, value.map(String::as_str).unwrap_or(""));
    }

    fn number(&mut self, key: &str, value: Option<u64>) {
        self.field(key, value.unwrap_or(0));
    }

    fn list(&mut self, key: &str, values: &[String]) {
        self.field(key, values.join(", "));
    }

    fn body(&mut self, kind: BodyKind, text: &str) {
        self.lines.push(format!("{}:", kind.key()));
        self.start(SectionKind::Body(kind));
        self.lines
            .extend(split_line_breaks(text).into_iter().map(str::to_string));
        self.end(SectionKind::Body(kind));
    }

    fn service(&mut self, service: &Service) {
        self.start(SectionKind::Service);
        self.number("Entry", service.entry);
        self.text("Service", service.service.as_ref());
        self.text("ServiceType", service.service_type.as_ref());
        self.text("ServiceLocation", service.service_location.as_ref());
        self.field("TimeZone", &service.time_zone);

        if !service.info.is_empty() {
            self.body(BodyKind::Info, &service.info);
            self.blank();
        }

        if !service.users.is_empty() {
            self.start(SectionKind::UserList);
            for (id, user) in &service.users {
                self.user(*id, user);
            }
            self.end(SectionKind::UserList);
            self.blank();
        }

        if !service.categorization.is_empty() {
            self.start(SectionKind::CategorizationList);
            for (kind_type, levels) in &service.categorization {
                self.list(kind_type, levels);
            }
            self.end(SectionKind::CategorizationList);
            self.blank();
        }

        for category in &service.categories {
            self.category(category);
        }

        if !service.message_threads.is_empty()
            || !service.interactions.is_empty()
            || !service.status.is_empty()
        {
            self.start(SectionKind::MessageList);
            if !service.interactions.is_empty() {
                self.list("Interactions", &service.interactions);
            }
            if !service.status.is_empty() {
                self.list("Status", &service.status);
            }
            self.blank();
            for thread in &service.message_threads {
                self.thread(thread);
            }
            self.end(SectionKind::MessageList);
            self.blank();
        }

        self.end(SectionKind::Service);
        self.blank();
    }

    fn user(&mut self, id: u64, user: &User) {
        self.start(SectionKind::UserInfo);
        self.field("User", id);
        self.text("Name", user.name.as_ref());
        self.text("Handle", user.handle.as_ref());
        self.text("Email", user.email.as_ref());
        self.text("Phone", user.phone.as_ref());
        self.text("Location", user.location.as_ref());
        self.text("Website", user.website.as_ref());
        self.text("Avatar", user.avatar.as_ref());
        self.text("Banner", user.banner.as_ref());
        self.text("Joined", user.joined.as_ref());
        self.text("Birthday", user.birthday.as_ref());
        self.text("HashTags", user.hash_tags.as_ref());
        self.number("PinnedMessage", user.pinned_message);
        self.body(BodyKind::ExtraFields, &user.extra_fields);
        self.body(BodyKind::Bio, &user.bio);
        self.body(BodyKind::Signature, &user.signature);
        self.end(SectionKind::UserInfo);
        self.blank();
    }

    fn category(&mut self, category: &Category) {
        self.start(SectionKind::CategoryList);
        if category.kind.is_empty() {
            self.field("Kind", format_args!("{}, {}", category.kind_type, category.level));
        } else {
            self.field("Kind", &category.kind);
        }
        self.number("ID", category.id);
        self.number("InSub", category.in_sub);
        self.text("Headline", category.headline.as_ref());
        self.body(
            BodyKind::Description,
            category.description.as_deref().unwrap_or(""),
        );
        self.end(SectionKind::CategoryList);
        self.blank();
    }

    fn thread(&mut self, thread: &Thread) {
        self.start(SectionKind::MessageThread);
        self.number("Thread", thread.thread);
        self.field("Title", &thread.title);
        self.text("Type", thread.thread_type.as_ref());
        self.text("State", thread.state.as_ref());
        self.text("Keywords", thread.keywords.as_ref());
        self.list("Category", &thread.category);
        self.list("Forum", &thread.forum);
        self.blank();
        for post in &thread.messages {
            self.post(post);
        }
        self.end(SectionKind::MessageThread);
        self.blank();
    }

    fn post(&mut self, post: &Post) {
        self.start(SectionKind::MessagePost);
        self.text("Author", post.author.as_ref());
        self.number("AuthorID", post.author_id);
        self.text("Time", post.time.as_ref());
        self.text("Date", post.date.as_ref());
        self.text("EditTime", post.edit_time.as_ref());
        self.text("EditDate", post.edit_date.as_ref());
        self.text("EditAuthor", post.edit_author.as_ref());
        self.number("EditAuthorID", post.edit_author_id);
        self.text("SubType", post.sub_type.as_ref());
        self.text("SubTitle", post.sub_title.as_ref());
        self.text("Tags", post.tags.as_ref());
        self.number("Post", post.post);
        self.number("PinnedID", post.pinned_id);
        self.number("Nested", post.nested);
        self.body(BodyKind::Message, &post.message);

        if let Some(polls) = post.polls.as_ref().filter(|polls| !polls.is_empty()) {
            self.lines.push("Polls:".to_string());
            self.start(SectionKind::PollList);
            for poll in polls {
                self.poll(poll);
            }
            self.end(SectionKind::PollList);
        }

        self.end(SectionKind::MessagePost);
        self.blank();
    }

    fn poll(&mut self, poll: &Poll) {
        self.start(SectionKind::PollBody);
        self.field("Num", poll.num.as_deref().unwrap_or("0"));
        self.text("Question", poll.question.as_ref());
        self.list("Answers", &poll.answers);
        self.list("Results", &poll.results);
        let percentages: Vec<String> = poll
            .percentage
            .iter()
            .map(|p| format_percentage(p))
            .collect();
        self.list("Percentage", &percentages);
        self.field("Votes", poll.votes.as_deref().unwrap_or("0"));
        for (key, value) in &poll.extra {
            self.field(key, value);
        }
        self.end(SectionKind::PollBody);
    }
}

/// Format a percentage value to one decimal place; unparseable values
/// count as zero.
pub fn format_percentage(value: &str) -> String {
    format!("{:.1}", value.trim().parse::<f64>().unwrap_or(0.0))
}

/// Render services as archive text with the requested line ending.
pub fn services_to_string(services: &[Service], line_ending: LineEnding) -> String {
    let mut emitter = Emitter::default();
    for service in services {
        emitter.service(service);
    }

    let text = emitter.lines.join("\n");
    match line_ending {
        LineEnding::Lf => text,
        other => text.replace('\n', other.as_str()),
    }
}

/// Write services as archive text to any writer.
pub fn write_services<W: Write>(
    mut writer: W,
    services: &[Service],
    line_ending: LineEnding,
) -> io::Result<()> {
    writer.write_all(services_to_string(services, line_ending).as_bytes())?;
    writer.flush()
}

/// Save services to a file, compressed when the path ends in `.gz` or
/// `.bz2`.
pub fn save_services_to_file(
    path: impl AsRef<Path>,
    services: &[Service],
    line_ending: LineEnding,
) -> Result<()> {
    let path = path.as_ref();
    file_reader::create(path)
        .and_then(|mut writer| {
            write_services(&mut writer, services, line_ending)?;
            writer.finish()
        })
        .map_err(|err| ArchiveError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Poll, Post, Thread, User};
    use crate::parser::{parse_file, parse_str, ParseOptions};

    fn complete_service() -> Service {
        let mut service = Service {
            entry: Some(1),
            service: Some("Retro Board".into()),
            service_type: Some("Forum".into()),
            service_location: Some("https://retro.example".into()),
            time_zone: "America/Chicago".into(),
            info: "Line one\nLine two".into(),
            interactions: vec!["Reply".into(), "Like".into()],
            status: vec!["Open".into()],
            ..Default::default()
        };
        service
            .categorization
            .insert("Categories".into(), vec!["Category".into()]);
        service
            .categorization
            .insert("Forums".into(), vec!["Forum".into(), "SubForum".into()]);
        service.categories.push(Category {
            kind: "Forums, Forum".into(),
            kind_type: "Forums".into(),
            level: "Forum".into(),
            id: Some(1),
            in_sub: Some(0),
            headline: Some("General".into()),
            description: Some("Talk about anything".into()),
        });
        service.users.insert(
            7,
            User {
                name: Some("Ana".into()),
                handle: Some("@ana".into()),
                email: Some("ana@example.com".into()),
                phone: Some("555".into()),
                location: Some("Here".into()),
                website: Some("https://ana.example".into()),
                avatar: Some("ana.png".into()),
                banner: Some("banner.png".into()),
                joined: Some("2020-01-01".into()),
                birthday: Some("1990-02-02".into()),
                hash_tags: Some("#retro".into()),
                pinned_message: Some(1),
                extra_fields: "Pronouns: they/them".into(),
                bio: "Collector\n\nOf things".into(),
                signature: "-- Ana".into(),
            },
        );
        service.message_threads.push(Thread {
            thread: Some(1),
            title: "Welcome".into(),
            thread_type: Some("Topic".into()),
            state: Some("Pinned".into()),
            keywords: Some("hello".into()),
            category: vec!["General".into()],
            forum: vec!["General".into()],
            messages: vec![
                Post {
                    author: Some("Ana".into()),
                    author_id: Some(7),
                    time: Some("12:00 PM".into()),
                    date: Some("2024-01-01".into()),
                    edit_time: Some("12:05 PM".into()),
                    edit_date: Some("2024-01-01".into()),
                    edit_author: Some("Ana".into()),
                    edit_author_id: Some(7),
                    sub_type: Some("Post".into()),
                    sub_title: Some("Hi".into()),
                    tags: Some("intro".into()),
                    post: Some(1),
                    pinned_id: Some(0),
                    nested: Some(0),
                    message: "Hello: world".into(),
                    polls: Some(vec![Poll {
                        num: Some("1".into()),
                        question: Some("Tabs?".into()),
                        answers: vec!["Yes".into(), "No".into()],
                        results: vec!["3".into(), "1".into()],
                        percentage: vec!["75.0".into(), "25.0".into()],
                        votes: Some("4".into()),
                        extra: [("Closed".to_string(), "yes".to_string())]
                            .into_iter()
                            .collect(),
                    }]),
                },
                Post {
                    author: Some("Ana".into()),
                    author_id: Some(7),
                    time: Some("1:00 PM".into()),
                    date: Some("2024-01-02".into()),
                    edit_time: Some("".into()),
                    edit_date: Some("".into()),
                    edit_author: Some("".into()),
                    edit_author_id: Some(0),
                    sub_type: Some("Reply".into()),
                    sub_title: Some("".into()),
                    tags: Some("".into()),
                    post: Some(2),
                    pinned_id: Some(0),
                    nested: Some(1),
                    message: "Replying".into(),
                    polls: None,
                },
            ],
        });
        service
    }

    #[test]
    fn test_round_trip_all_line_endings() {
        let services = vec![complete_service()];
        for ending in [LineEnding::Lf, LineEnding::CrLf, LineEnding::Cr] {
            let text = services_to_string(&services, ending);
            let parsed = parse_str(&text, &ParseOptions::default()).unwrap();
            assert_eq!(parsed, services, "round trip with {}", ending);
        }
    }

    #[test]
    fn test_line_endings_applied() {
        let services = vec![complete_service()];
        let crlf = services_to_string(&services, LineEnding::CrLf);
        assert!(crlf.starts_with("--- Start Archive Service ---\r\nEntry: 1\r\n"));
        assert!(!crlf.replace("\r\n", "").contains('\n'));

        let cr = services_to_string(&services, LineEnding::Cr);
        assert!(!cr.contains('\n'));
    }

    #[test]
    fn test_defaults_for_absent_fields() {
        let mut service = Service::default();
        service.users.insert(3, User::default());
        service.message_threads.push(Thread {
            messages: vec![Post::default()],
            ..Default::default()
        });
        let text = services_to_string(&[service], LineEnding::Lf);

        assert!(text.contains("Entry: 0\n"));
        assert!(text.contains("Service: \n"));
        assert!(text.contains("TimeZone: UTC\n"));
        assert!(text.contains("User: 3\nName: \n"));
        assert!(text.contains("PinnedMessage: 0\n"));
        assert!(text.contains("AuthorID: 0\n"));
        assert!(text.contains("Nested: 0\n"));
        assert!(!text.contains("Info Body"));
        assert!(!text.contains("Categorization List"));
        assert!(!text.contains("Poll List"));
    }

    #[test]
    fn test_kind_from_type_and_level() {
        let service = Service {
            categories: vec![Category {
                kind_type: "Categories".into(),
                level: "Main".into(),
                id: Some(4),
                ..Default::default()
            }],
            ..Default::default()
        };
        let text = services_to_string(&[service], LineEnding::Lf);
        assert!(text.contains("Kind: Categories, Main\nID: 4\nInSub: 0\n"));
    }

    #[test]
    fn test_percentage_formatting() {
        assert_eq!(format_percentage("75"), "75.0");
        assert_eq!(format_percentage("33.333"), "33.3");
        assert_eq!(format_percentage("n/a"), "0.0");
    }

    #[test]
    fn test_multiline_body_split_on_any_break() {
        let service = Service {
            info: "a\r\nb\rc".into(),
            ..Default::default()
        };
        let text = services_to_string(&[service], LineEnding::Lf);
        assert!(text.contains("--- Start Info Body ---\na\nb\nc\n--- End Info Body ---"));
    }

    #[test]
    fn test_line_ending_from_str() {
        assert_eq!("CRLF".parse::<LineEnding>().unwrap(), LineEnding::CrLf);
        assert_eq!("cr".parse::<LineEnding>().unwrap(), LineEnding::Cr);
        assert!("unix".parse::<LineEnding>().is_err());
    }

    #[test]
    fn test_save_gzip_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.txt.gz");
        let services = vec![complete_service()];

        save_services_to_file(&path, &services, LineEnding::CrLf).unwrap();
        let parsed = parse_file(&path, &ParseOptions::default()).unwrap();
        assert_eq!(parsed, services);
    }
}
