//! End-to-end tests across parsing, includes, serialization, JSON and
//! validation.

use boardarchive::{
    json, parse_file, parse_str, save_services_to_file, services_to_string, validate_services,
    ArchiveError, Category, FormatErrorKind, LineEnding, ParseOptions, Post, Schema, Service,
    Thread, User,
};
use std::fs;
use tempfile::TempDir;

const SINGLE_POST: &str = "\
--- Start Archive Service ---
Entry: 1
Service: Retro Board
ServiceType: Forum
ServiceLocation: https://retro.example
--- Start User List ---
--- Start User Info ---
User: 7
Name: Ana
Handle: @ana
--- End User Info ---
--- End User List ---
--- Start Message List ---
--- Start Message Thread ---
Thread: 1
Title: Welcome
--- Start Message Post ---
Author: Ana
AuthorID: 7
Time: 10:00
Date: 2024-01-01
Post: 1
Nested: 0
Message:
--- Start Message Body ---
Hello there
--- End Message Body ---
--- End Message Post ---
--- End Message Thread ---
--- End Message List ---
--- End Archive Service ---
";

#[test]
fn test_single_post_archive() {
    let services = parse_str(SINGLE_POST, &ParseOptions::default()).unwrap();
    assert_eq!(services.len(), 1);

    let service = &services[0];
    assert_eq!(service.entry, Some(1));
    assert_eq!(service.time_zone, "UTC");
    assert_eq!(service.users[&7].name.as_deref(), Some("Ana"));
    assert_eq!(service.users[&7].handle.as_deref(), Some("@ana"));

    let post = service.message_threads[0].post(1).unwrap();
    assert_eq!(post.author_id, Some(7));
    assert_eq!(post.nested, Some(0));
    assert_eq!(post.message, "Hello there");

    let report = validate_services(&services, &Schema::default());
    assert!(report.is_valid(), "{}", report.message());
    assert_eq!(report.stats.posts, 1);
}

#[test]
fn test_single_post_survives_text_and_json() {
    let services = parse_str(SINGLE_POST, &ParseOptions::default()).unwrap();

    let text = services_to_string(&services, LineEnding::Lf);
    let again = parse_str(&text, &ParseOptions::default()).unwrap();
    assert_eq!(again[0].users[&7], services[0].users[&7].clone().filled());
    assert_eq!(again[0].message_threads[0].post(1).unwrap().message, "Hello there");

    let from_json = json::from_json(&json::to_json(&services).unwrap()).unwrap();
    assert_eq!(from_json, services);
}

#[test]
fn test_dangling_nested_parses_but_fails_validation() {
    let text = SINGLE_POST.replace("Nested: 0", "Nested: 99");
    let services = parse_str(&text, &ParseOptions::default()).unwrap();
    assert_eq!(services[0].message_threads[0].post(1).unwrap().nested, Some(99));

    let report = validate_services(&services, &Schema::default());
    assert!(!report.is_valid());
    assert_eq!(
        report.message(),
        "Service entry 1: Nested value 99 in post 1 of thread 1 \
         does not reference an earlier post in the thread"
    );
}

#[test]
fn test_validation_stops_at_first_bad_service() {
    let bad_author = SINGLE_POST.replace("AuthorID: 7", "AuthorID: 8");
    let second = SINGLE_POST
        .replace("Entry: 1", "Entry: 2")
        .replace("Nested: 0", "Nested: 5");
    let text = format!("{}{}{}", SINGLE_POST, bad_author.replace("Entry: 1", "Entry: 3"), second);

    let services = parse_str(&text, &ParseOptions::default()).unwrap();
    assert_eq!(services.len(), 3);

    let report = validate_services(&services, &Schema::default());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("Service entry 3: AuthorID 8"));
    assert_eq!(report.stats.services, 1);
}

#[test]
fn test_format_error_stops_parsing() {
    let text = SINGLE_POST.replace("Thread: 1", "Thread: one");
    let err = parse_str(&text, &ParseOptions::default()).unwrap_err();
    match err {
        ArchiveError::Format(format) => {
            assert_eq!(format.kind, FormatErrorKind::InvalidInteger);
            assert_eq!(format.key, "Thread");
            assert_eq!(format.line, 15);
        }
        other => panic!("expected a format error, got {}", other),
    }
}

#[test]
fn test_includes_across_files() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("users.txt"),
        "\
--- Start Archive Service ---
--- Start User List ---
--- Start User Info ---
User: 9
Name: Bo
Handle: @bo
--- End User Info ---
--- End User List ---
--- End Archive Service ---
",
    )
    .unwrap();
    fs::create_dir(dir.path().join("threads")).unwrap();
    fs::write(
        dir.path().join("threads").join("welcome.txt"),
        "\
--- Start Archive Service ---
--- Start Message List ---
--- Start Message Thread ---
Thread: 4
Title: Included
--- Start Message Post ---
Author: Bo
AuthorID: 9
Time: 9:00
Date: 2024-02-02
Post: 1
Nested: 0
--- End Message Post ---
--- End Message Thread ---
--- End Message List ---
--- End Archive Service ---
",
    )
    .unwrap();
    let main = dir.path().join("main.txt");
    fs::write(
        &main,
        "\
--- Start Archive Service ---
Entry: 5
Service: Stitched
--- Include Users Start ---
users.txt
--- Include Users End ---
--- Start Message List ---
--- Include Messages Start ---
threads/welcome.txt
--- Include Messages End ---
--- End Message List ---
--- End Archive Service ---
",
    )
    .unwrap();

    let services = parse_file(&main, &ParseOptions::default()).unwrap();
    assert_eq!(services.len(), 1);
    let service = &services[0];
    assert_eq!(service.users[&9].handle.as_deref(), Some("@bo"));
    assert_eq!(service.thread(4).unwrap().title, "Included");

    let report = validate_services(&services, &Schema::default());
    assert!(report.is_valid(), "{}", report.message());

    let validate_only = ParseOptions::default().with_validate_only(true);
    let checked = parse_file(&main, &validate_only).unwrap();
    assert_eq!(checked, services);
    let report = validate_services(&checked, &Schema::default());
    assert!(report.is_valid(), "{}", report.message());
}

#[test]
fn test_missing_include_is_io_error() {
    let dir = TempDir::new().unwrap();
    let main = dir.path().join("main.txt");
    fs::write(
        &main,
        "\
--- Start Archive Service ---
--- Include Users Start ---
nowhere.txt
--- Include Users End ---
--- End Archive Service ---
",
    )
    .unwrap();

    let err = parse_file(&main, &ParseOptions::default()).unwrap_err();
    match err {
        ArchiveError::Io { path, .. } => assert!(path.ends_with("nowhere.txt")),
        other => panic!("expected an I/O error, got {}", other),
    }
}

#[test]
fn test_built_tree_saves_and_validates() {
    let dir = TempDir::new().unwrap();

    let mut service = Service::new(3, "Built", "Forum", "https://built.example");
    service.add_user(
        1,
        User {
            name: Some("Cy".into()),
            handle: Some("@cy".into()),
            ..Default::default()
        },
    );
    service
        .add_category(Category {
            kind: "Forums, Forum".into(),
            id: Some(1),
            in_sub: Some(0),
            headline: Some("Main".into()),
            ..Default::default()
        })
        .unwrap();
    service.add_thread(Thread {
        thread: Some(1),
        title: "First".into(),
        ..Default::default()
    });
    service
        .add_post(
            1,
            Post {
                author: Some("Cy".into()),
                author_id: Some(1),
                date: Some("2024-03-03".into()),
                time: Some("8:00".into()),
                post: Some(1),
                nested: Some(0),
                message: "Built by hand".into(),
                ..Default::default()
            },
        )
        .unwrap();

    let services = vec![service];
    assert!(validate_services(&services, &Schema::default()).is_valid());

    let path = dir.path().join("built.txt.gz");
    save_services_to_file(&path, &services, LineEnding::CrLf).unwrap();
    let loaded = parse_file(&path, &ParseOptions::default()).unwrap();

    assert_eq!(loaded[0].categories[0].kind_type, "Forums");
    assert_eq!(loaded[0].categories[0].level, "Forum");
    assert_eq!(loaded[0].message_threads[0].post(1).unwrap().message, "Built by hand");
    assert!(validate_services(&loaded, &Schema::default()).is_valid());
}

/// Mirror of what a serialize-then-parse pass does to a partially filled
/// user: absent single-line fields come back empty.
trait Filled {
    fn filled(self) -> Self;
}

impl Filled for User {
    fn filled(self) -> Self {
        let fill = |value: Option<String>| Some(value.unwrap_or_default());
        User {
            name: fill(self.name),
            handle: fill(self.handle),
            email: fill(self.email),
            phone: fill(self.phone),
            location: fill(self.location),
            website: fill(self.website),
            avatar: fill(self.avatar),
            banner: fill(self.banner),
            joined: fill(self.joined),
            birthday: fill(self.birthday),
            hash_tags: fill(self.hash_tags),
            pinned_message: Some(self.pinned_message.unwrap_or(0)),
            ..self
        }
    }
}
