//! Schema validation of parsed services
//!
//! Validation runs over the JSON mapping of a service, so a tree loaded from
//! a JSON document gets exactly the same checks as one fresh from the
//! parser. It is fail-fast: the first violation ends the run and is the
//! only error reported.
//!
//! Checks run in this order:
//!
//! 1. required keys at the service root
//! 2. types of root keys
//! 3. each category's required keys and types, collecting IDs per type
//! 4. users: integer keys, `Name` and `Handle` present
//! 5. each thread's `Thread` ID and key types; each post's required keys,
//!    key types, `Nested` and `AuthorID` references and `Polls` shape
//! 6. every nonzero category `InSub` names an ID of the same type
//!
//! ```rust
//! use boardarchive::parser::{parse_str, ParseOptions};
//! use boardarchive::schema::Schema;
//! use boardarchive::validation::validate_services;
//!
//! let services = parse_str(
//!     "--- Start Archive Service ---\nEntry: 1\nService: Demo\n--- End Archive Service ---\n",
//!     &ParseOptions::default(),
//! )?;
//! let report = validate_services(&services, &Schema::default());
//! assert!(report.is_valid());
//! # Ok::<(), boardarchive::ArchiveError>(())
//! ```

use crate::field::split_kind;
use crate::model::Service;
use crate::schema::{Schema, SectionSchema};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Outcome of a validation run
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// The violation that stopped validation (at most one)
    pub errors: Vec<String>,
    /// Informational messages
    pub info: Vec<String>,
    /// Counts gathered while walking the tree
    pub stats: ArchiveStats,
}

/// Entity counts gathered during validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Services checked
    pub services: usize,
    /// Users checked
    pub users: usize,
    /// Categories checked
    pub categories: usize,
    /// Threads checked
    pub threads: usize,
    /// Posts checked
    pub posts: usize,
}

impl ValidationReport {
    /// Whether every check passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first violation, or `"ok"`
    pub fn message(&self) -> &str {
        self.errors.first().map(String::as_str).unwrap_or("ok")
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn info(&mut self, msg: impl Into<String>) {
        self.info.push(msg.into());
    }
}

impl ArchiveStats {
    /// Human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} service(s), {} user(s), {} categor{}, {} thread(s), {} post(s)",
            self.services,
            self.users,
            self.categories,
            if self.categories == 1 { "y" } else { "ies" },
            self.threads,
            self.posts
        )
    }
}

type Check = std::result::Result<(), String>;

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn check_required<'a>(
    object: &Map<String, Value>,
    keys: impl IntoIterator<Item = &'a str>,
    context: &str,
) -> Check {
    for key in keys {
        if present(object, key).is_none() {
            return Err(format!("Missing required key '{}' in {}", key, context));
        }
    }
    Ok(())
}

fn check_types(object: &Map<String, Value>, section: &SectionSchema, context: &str) -> Check {
    for (key, expected) in &section.types {
        if let Some(value) = present(object, key) {
            if !expected.matches(value) {
                return Err(format!(
                    "Key '{}' in {} should be {}, found {}",
                    key,
                    context,
                    expected,
                    describe(value)
                ));
            }
        }
    }
    Ok(())
}

fn as_object<'a>(value: &'a Value, context: &str) -> std::result::Result<&'a Map<String, Value>, String> {
    value
        .as_object()
        .ok_or_else(|| format!("{} should be a dict, found {}", context, describe(value)))
}

fn as_list<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    context: &str,
) -> std::result::Result<&'a [Value], String> {
    match present(object, key) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(format!(
            "Key '{}' in {} should be list, found {}",
            key,
            context,
            describe(other)
        )),
    }
}

fn non_zero_id(object: &Map<String, Value>, key: &str) -> Option<u64> {
    present(object, key)
        .and_then(Value::as_u64)
        .filter(|id| *id != 0)
}

fn category_type(category: &Map<String, Value>) -> String {
    match present(category, "Type").and_then(Value::as_str) {
        Some(kind_type) if !kind_type.is_empty() => kind_type.to_string(),
        _ => split_kind(present(category, "Kind").and_then(Value::as_str).unwrap_or("")).0,
    }
}

fn check_service(service: &Value, schema: &Schema, stats: &mut ArchiveStats) -> Check {
    let root = as_object(service, "service")?;

    // 1, 2
    check_required(root, schema.service.required.iter().map(String::as_str), "service")?;
    check_types(root, &schema.service, "service")?;

    // 3
    let categories = as_list(root, "Categories", "service")?;
    let mut ids_by_type: HashMap<String, HashSet<u64>> = HashMap::new();
    let mut parents = Vec::new();
    for (index, category) in categories.iter().enumerate() {
        let context = format!("category #{}", index + 1);
        let category = as_object(category, &context)?;
        check_required(
            category,
            schema.categories.required.iter().map(String::as_str),
            &context,
        )?;
        check_types(category, &schema.categories, &context)?;

        let kind_type = category_type(category);
        if let Some(id) = present(category, "ID").and_then(Value::as_u64) {
            ids_by_type.entry(kind_type.clone()).or_default().insert(id);
        }
        if let Some(in_sub) = non_zero_id(category, "InSub") {
            parents.push((context, kind_type, in_sub));
        }
        stats.categories += 1;
    }

    // 4
    let mut user_ids = HashSet::new();
    if let Some(users) = present(root, "Users") {
        let users = as_object(users, "Users")?;
        for (key, user) in users {
            let id: u64 = key
                .parse()
                .map_err(|_| format!("User key '{}' is not a non-negative integer", key))?;
            let context = format!("user {}", id);
            let user = as_object(user, &context)?;
            check_required(user, ["Name", "Handle"], &context)?;
            user_ids.insert(id);
            stats.users += 1;
        }
    }

    // 5
    let threads = as_list(root, "MessageThreads", "service")?;
    let post_keys = schema.required_post_keys();
    for (index, thread) in threads.iter().enumerate() {
        let context = format!("thread #{}", index + 1);
        let thread = as_object(thread, &context)?;
        let thread_id = match present(thread, "Thread") {
            Some(value) => value
                .as_u64()
                .ok_or_else(|| format!("Key 'Thread' in {} should be int, found {}", context, describe(value)))?,
            None => return Err(format!("Missing required key 'Thread' in {}", context)),
        };
        let context = format!("thread {}", thread_id);
        check_required(
            thread,
            schema.message_threads.required.iter().map(String::as_str),
            &context,
        )?;
        check_types(thread, &schema.message_threads, &context)?;

        let mut seen_posts = HashSet::new();
        for (index, post) in as_list(thread, "Messages", &context)?.iter().enumerate() {
            let post_context = format!("post #{} of {}", index + 1, context);
            let post = as_object(post, &post_context)?;
            check_required(post, post_keys.iter().copied(), &post_context)?;
            check_types(post, &schema.message_posts, &post_context)?;

            let number = present(post, "Post").and_then(Value::as_u64);
            let post_context = match number {
                Some(number) => format!("post {} of {}", number, context),
                None => post_context,
            };

            if let Some(nested) = non_zero_id(post, "Nested") {
                if !seen_posts.contains(&nested) {
                    return Err(format!(
                        "Nested value {} in {} does not reference an earlier post in the thread",
                        nested, post_context
                    ));
                }
            }
            if let Some(author) = present(post, "AuthorID").and_then(Value::as_u64) {
                if !user_ids.contains(&author) {
                    return Err(format!(
                        "AuthorID {} in {} does not match any user",
                        author, post_context
                    ));
                }
            }
            if let Some(polls) = present(post, "Polls") {
                if !polls.is_array() {
                    return Err(format!(
                        "Polls in {} should be list, found {}",
                        post_context,
                        describe(polls)
                    ));
                }
            }

            if let Some(number) = number {
                seen_posts.insert(number);
            }
            stats.posts += 1;
        }
        stats.threads += 1;
    }

    // 6
    for (context, kind_type, in_sub) in parents {
        let known = ids_by_type
            .get(&kind_type)
            .is_some_and(|ids| ids.contains(&in_sub));
        if !known {
            return Err(format!(
                "InSub value {} in {} does not match any {} ID",
                in_sub, context, kind_type
            ));
        }
    }

    stats.services += 1;
    Ok(())
}

/// Validate one service given as its JSON mapping
pub fn validate_value(service: &Value, schema: &Schema) -> ValidationReport {
    let mut report = ValidationReport::default();
    if let Err(msg) = check_service(service, schema, &mut report.stats) {
        report.error(msg);
    }
    report
}

/// Validate one parsed service
pub fn validate_service(service: &Service, schema: &Schema) -> ValidationReport {
    match serde_json::to_value(service) {
        Ok(value) => validate_value(&value, schema),
        Err(err) => {
            let mut report = ValidationReport::default();
            report.error(format!("Could not map service to JSON: {}", err));
            report
        }
    }
}

/// Validate services in order, stopping at the first invalid one
pub fn validate_services(services: &[Service], schema: &Schema) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (index, service) in services.iter().enumerate() {
        let single = validate_service(service, schema);
        let label = match service.entry {
            Some(entry) => format!("Service entry {}", entry),
            None => format!("Service #{}", index + 1),
        };

        report.stats.services += single.stats.services;
        report.stats.users += single.stats.users;
        report.stats.categories += single.stats.categories;
        report.stats.threads += single.stats.threads;
        report.stats.posts += single.stats.posts;

        if let Some(msg) = single.errors.into_iter().next() {
            report.error(format!("{}: {}", label, msg));
            return report;
        }
    }
    report.info(report.stats.summary());
    report
}
