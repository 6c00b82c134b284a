//! Human-readable rendering of services, as console text or an HTML page

use crate::error::{ArchiveError, Result};
use crate::file_reader;
use crate::model::{Category, Poll, Post, Service, Thread, User};
use std::fmt;
use std::path::Path;

/// Display adapter rendering a list of services as indented text
pub struct ServicesDisplay<'a>(pub &'a [Service]);

/// Display adapter rendering a list of services as a standalone HTML page
pub struct ServicesHtml<'a>(pub &'a [Service]);

/// Render services for the console.
pub fn render_services(services: &[Service]) -> String {
    ServicesDisplay(services).to_string()
}

/// Render services as an HTML page.
pub fn render_services_html(services: &[Service]) -> String {
    ServicesHtml(services).to_string()
}

/// Save the HTML page for `services`; `.gz` and `.bz2` paths are compressed.
pub fn save_services_to_html_file(path: impl AsRef<Path>, services: &[Service]) -> Result<()> {
    let path = path.as_ref();
    file_reader::write_file(path, render_services_html(services).as_bytes())
        .map_err(|err| ArchiveError::io(path, err))
}

fn opt<T: fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn default_sub_type(post: &Post) -> &'static str {
    if post.post == Some(1) || post.nested == Some(0) {
        "Post"
    } else {
        "Reply"
    }
}

impl fmt::Display for ServicesDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for service in self.0 {
            write_service(f, service)?;
        }
        Ok(())
    }
}

fn write_service(f: &mut fmt::Formatter<'_>, service: &Service) -> fmt::Result {
    writeln!(f, "Service Entry: {}", opt(&service.entry))?;
    writeln!(f, "Service: {}", opt(&service.service))?;
    writeln!(f, "Service Type: {}", opt(&service.service_type))?;
    writeln!(f, "Service Location: {}", opt(&service.service_location))?;
    writeln!(f, "TimeZone: {}", service.time_zone)?;
    if !service.info.is_empty() {
        writeln!(f, "Info: {}", service.info.trim())?;
    }
    writeln!(f, "Interactions: {}", service.interactions.join(", "))?;
    writeln!(f, "Status: {}", service.status.join(", "))?;
    for (kind_type, levels) in &service.categorization {
        writeln!(f, "{}: {}", kind_type, levels.join(", "))?;
    }
    writeln!(f)?;

    writeln!(f, "Category List:")?;
    for category in &service.categories {
        write_category(f, category)?;
    }

    writeln!(f, "User List:")?;
    for (id, user) in &service.users {
        write_user(f, *id, user)?;
    }

    writeln!(f, "Message Threads:")?;
    for (index, thread) in service.message_threads.iter().enumerate() {
        write_thread(f, index + 1, thread)?;
    }
    Ok(())
}

fn write_category(f: &mut fmt::Formatter<'_>, category: &Category) -> fmt::Result {
    writeln!(f, "  Type: {}, Level: {}", category.kind_type, category.level)?;
    writeln!(f, "  ID: {}", opt(&category.id))?;
    writeln!(f, "  In SubID: {}", opt(&category.in_sub))?;
    writeln!(f, "  Headline: {}", opt(&category.headline))?;
    writeln!(
        f,
        "  Description: {}",
        category.description.as_deref().unwrap_or("").trim()
    )?;
    writeln!(f)
}

fn write_user(f: &mut fmt::Formatter<'_>, id: u64, user: &User) -> fmt::Result {
    writeln!(f, "  User ID: {}", id)?;
    let fields = [
        ("Name", &user.name),
        ("Handle", &user.handle),
        ("Email", &user.email),
        ("Phone", &user.phone),
        ("Location", &user.location),
        ("Website", &user.website),
        ("Avatar", &user.avatar),
        ("Banner", &user.banner),
        ("Joined", &user.joined),
        ("Birthday", &user.birthday),
        ("HashTags", &user.hash_tags),
    ];
    for (label, value) in fields {
        writeln!(f, "    {}: {}", label, opt(value))?;
    }
    for (label, text) in [
        ("ExtraFields", &user.extra_fields),
        ("Bio", &user.bio),
        ("Signature", &user.signature),
    ] {
        writeln!(f, "    {}:", label)?;
        writeln!(f, "      {}", text.trim())?;
    }
    writeln!(f)
}

fn write_thread(f: &mut fmt::Formatter<'_>, number: usize, thread: &Thread) -> fmt::Result {
    writeln!(f, "  --- Message Thread {} ---", number)?;
    if !thread.title.is_empty() {
        writeln!(f, "    Title: {}", thread.title)?;
    }
    if !thread.category.is_empty() {
        writeln!(f, "    Category: {}", thread.category.join(", "))?;
    }
    if !thread.forum.is_empty() {
        writeln!(f, "    Forum: {}", thread.forum.join(", "))?;
    }
    for (label, value) in [
        ("Type", &thread.thread_type),
        ("State", &thread.state),
        ("Keywords", &thread.keywords),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            writeln!(f, "    {}: {}", label, value)?;
        }
    }

    for post in &thread.messages {
        let sub_type = post
            .sub_type
            .as_deref()
            .unwrap_or_else(|| default_sub_type(post));
        writeln!(
            f,
            "    {} ({} on {}): [{}] Post ID: {} Nested: {}",
            opt(&post.author),
            opt(&post.time),
            opt(&post.date),
            sub_type,
            opt(&post.post),
            opt(&post.nested)
        )?;
        writeln!(f, "      {}", post.message.trim())?;

        if let Some(polls) = post.polls.as_ref().filter(|polls| !polls.is_empty()) {
            writeln!(f, "      Polls:")?;
            for poll in polls {
                write_poll(f, poll)?;
            }
        }
    }
    writeln!(f)
}

fn write_poll(f: &mut fmt::Formatter<'_>, poll: &Poll) -> fmt::Result {
    let percentages: Vec<String> = poll
        .percentage
        .iter()
        .map(|p| format!("{:.2}", p.trim().parse::<f64>().unwrap_or(0.0)))
        .collect();

    writeln!(f, "        Poll {}:", opt(&poll.num))?;
    writeln!(f, "          Question: {}", opt(&poll.question))?;
    writeln!(f, "          Answers: {}", poll.answers.join(", "))?;
    writeln!(f, "          Results: {}", poll.results.join(", "))?;
    writeln!(f, "          Percentage: {}", percentages.join(", "))?;
    writeln!(f, "          Votes: {}", opt(&poll.votes))
}

/// Text with HTML special characters replaced by entities
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(index) = rest.find(['&', '<', '>', '"', '\'']) {
            f.write_str(&rest[..index])?;
            f.write_str(match rest.as_bytes()[index] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&#039;",
            })?;
            rest = &rest[index + 1..];
        }
        f.write_str(rest)
    }
}

fn escape_opt(value: &Option<String>) -> Escaped<'_> {
    Escaped(value.as_deref().unwrap_or(""))
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Services Report</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 20px; background: #f9f9f9; }
        .service-card { background: #fff; border: 1px solid #ddd; border-radius: 8px; padding: 16px; margin-bottom: 20px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        .service-card h2 { margin-top: 0; color: #333; }
        .thread-card { background: #fafafa; border-left: 4px solid #007BFF; padding: 12px; margin: 10px 0; }
        .message-list { list-style: none; padding-left: 0; }
        .message-list li { margin-bottom: 10px; }
        .poll-card { background: #f0f8ff; border: 1px solid #cce; border-radius: 4px; padding: 10px; margin: 10px 0; }
    </style>
</head>
<body>
<div class="services-container">"#;

const BLOCKQUOTE: &str = r#"<blockquote style="white-space: pre-wrap;">"#;

impl fmt::Display for ServicesHtml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", HTML_HEAD)?;
        for service in self.0 {
            write_service_html(f, service)?;
        }
        writeln!(f, "</div>")?;
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

fn write_list_html(f: &mut fmt::Formatter<'_>, label: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    write!(f, "    <p><strong>{}:</strong> ", label)?;
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", Escaped(item))?;
    }
    writeln!(f, "</p>")
}

fn write_service_html(f: &mut fmt::Formatter<'_>, service: &Service) -> fmt::Result {
    writeln!(f, "<div class=\"service-card\">")?;
    writeln!(
        f,
        "    <h2>Service Entry: {}  {}</h2>",
        opt(&service.entry),
        escape_opt(&service.service)
    )?;

    let info = service.info.trim();
    if !info.is_empty() {
        writeln!(
            f,
            "    <p><strong>Info:</strong> {}{}</blockquote></p>",
            BLOCKQUOTE,
            Escaped(info)
        )?;
    }
    write_list_html(f, "Interactions", &service.interactions)?;
    write_list_html(f, "Status", &service.status)?;

    if !service.categories.is_empty() {
        writeln!(f, "    <h3>Categories</h3>")?;
        writeln!(f, "    <ul>")?;
        for category in &service.categories {
            writeln!(
                f,
                "        <li>{} (<em>{}</em>)</li>",
                escape_opt(&category.headline),
                Escaped(&category.level)
            )?;
        }
        writeln!(f, "    </ul>")?;
    }

    if !service.users.is_empty() {
        writeln!(f, "    <h3>Users</h3>")?;
        writeln!(f, "    <ul>")?;
        for (id, user) in &service.users {
            writeln!(
                f,
                "        <li><strong>{}</strong>: {} ({})</li>",
                id,
                escape_opt(&user.name),
                escape_opt(&user.handle)
            )?;
            let bio = user.bio.trim();
            if !bio.is_empty() {
                writeln!(f, "            {}{}</blockquote>", BLOCKQUOTE, Escaped(bio))?;
            }
        }
        writeln!(f, "    </ul>")?;
    }

    if !service.message_threads.is_empty() {
        writeln!(f, "    <h3>Message Threads</h3>")?;
        for thread in &service.message_threads {
            writeln!(f, "    <div class=\"thread-card\">")?;
            writeln!(f, "        <h4>{}</h4>", Escaped(&thread.title))?;
            if !thread.messages.is_empty() {
                writeln!(f, "        <ul class=\"message-list\">")?;
                for post in &thread.messages {
                    writeln!(
                        f,
                        "            <li><strong>{}</strong>: {}{}</blockquote></li>",
                        escape_opt(&post.author),
                        BLOCKQUOTE,
                        Escaped(post.message.trim())
                    )?;
                    for poll in post.polls.iter().flatten() {
                        write_poll_html(f, poll)?;
                    }
                }
                writeln!(f, "        </ul>")?;
            }
            writeln!(f, "    </div>")?;
        }
    }

    writeln!(f, "</div>")
}

fn write_poll_html(f: &mut fmt::Formatter<'_>, poll: &Poll) -> fmt::Result {
    writeln!(f, "            <div class=\"poll-card\">")?;
    writeln!(
        f,
        "                <p><strong>Poll {}:</strong> {}</p>",
        escape_opt(&poll.num),
        escape_opt(&poll.question)
    )?;
    writeln!(f, "                <ul>")?;
    for (index, answer) in poll.answers.iter().enumerate() {
        let result = poll.results.get(index).map(String::as_str).unwrap_or("");
        writeln!(
            f,
            "                    <li>{}: {}</li>",
            Escaped(answer),
            Escaped(result)
        )?;
    }
    writeln!(f, "                </ul>")?;
    writeln!(f, "            </div>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_service() {
        let mut service = Service::new(1, "Board", "Forum", "https://board.example");
        service.categorization.insert("Forums".into(), vec!["Forum".into()]);
        service.add_user(
            7,
            User {
                name: Some("Ana".into()),
                bio: "  Hi  ".into(),
                ..Default::default()
            },
        );
        service.add_thread(Thread {
            thread: Some(1),
            title: "Welcome".into(),
            state: Some(String::new()),
            messages: vec![
                Post {
                    author: Some("Ana".into()),
                    post: Some(1),
                    message: "Hello".into(),
                    polls: Some(vec![Poll {
                        num: Some("1".into()),
                        percentage: vec!["75".into(), "bad".into()],
                        ..Default::default()
                    }]),
                    ..Default::default()
                },
                Post {
                    author: Some("Bo".into()),
                    post: Some(2),
                    nested: Some(1),
                    ..Default::default()
                },
            ],
            ..Default::default()
        });

        let text = render_services(&[service]);
        assert!(text.starts_with("Service Entry: 1\nService: Board\n"));
        assert!(text.contains("Forums: Forum\n"));
        assert!(text.contains("  User ID: 7\n    Name: Ana\n"));
        assert!(text.contains("    Bio:\n      Hi\n"));
        assert!(text.contains("    Title: Welcome\n"));
        assert!(!text.contains("State:"));
        assert!(text.contains("Ana ( on ): [Post] Post ID: 1 Nested: \n"));
        assert!(text.contains("Bo ( on ): [Reply] Post ID: 2 Nested: 1\n"));
        assert!(text.contains("Percentage: 75.00, 0.00\n"));
    }

    #[test]
    fn test_escaped() {
        assert_eq!(Escaped("plain").to_string(), "plain");
        assert_eq!(
            Escaped(r#"<b>"Tom" & 'Jerry'</b>"#).to_string(),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
        assert_eq!(Escaped("Zoë & co").to_string(), "Zoë &amp; co");
    }

    #[test]
    fn test_render_html() {
        let mut service = Service::new(2, "Q&A <Board>", "Forum", "");
        service.interactions = vec!["Reply".into(), "Like".into()];
        service.add_user(
            7,
            User {
                name: Some("Ana".into()),
                handle: Some("@ana".into()),
                bio: "  I like <tags>  ".into(),
                ..Default::default()
            },
        );
        service.add_thread(Thread {
            thread: Some(1),
            title: "Welcome & hello".into(),
            messages: vec![Post {
                author: Some("Ana".into()),
                post: Some(1),
                message: "Line one\nLine \"two\"".into(),
                polls: Some(vec![Poll {
                    num: Some("1".into()),
                    question: Some("Tabs?".into()),
                    answers: vec!["Yes".into(), "No".into()],
                    results: vec!["3".into()],
                    ..Default::default()
                }]),
                ..Default::default()
            }],
            ..Default::default()
        });

        let html = render_services_html(&[service]);
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n"));
        assert!(html.ends_with("</div>\n</body>\n</html>\n"));
        assert!(html.contains("<h2>Service Entry: 2  Q&amp;A &lt;Board&gt;</h2>"));
        assert!(html.contains("<p><strong>Interactions:</strong> Reply, Like</p>"));
        assert!(!html.contains("Status:"));
        assert!(!html.contains("<h3>Categories</h3>"));
        assert!(html.contains("<li><strong>7</strong>: Ana (@ana)</li>"));
        assert!(html.contains(">I like &lt;tags&gt;</blockquote>"));
        assert!(html.contains("<h4>Welcome &amp; hello</h4>"));
        assert!(html.contains(">Line one\nLine &quot;two&quot;</blockquote></li>"));
        assert!(html.contains("<p><strong>Poll 1:</strong> Tabs?</p>"));
        assert!(html.contains("<li>Yes: 3</li>"));
        assert!(html.contains("<li>No: </li>"));
    }

    #[test]
    fn test_save_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let services = vec![Service::new(1, "Saved", "Forum", "")];

        let path = dir.path().join("board.html.gz");
        save_services_to_html_file(&path, &services).unwrap();
        let html = file_reader::read_archive_text(&path).unwrap();
        assert_eq!(html, render_services_html(&services));
        assert!(html.contains("Service Entry: 1  Saved"));
    }
}
