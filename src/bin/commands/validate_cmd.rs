use anyhow::{Context, Result};
use boardarchive::{validate_services, ParseOptions, Schema};
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;

use crate::cli_utils::load_services;

pub fn cmd_validate(
    input: PathBuf,
    schema_path: Option<PathBuf>,
    json_output: bool,
    verbose: bool,
) -> Result<()> {
    let schema = match &schema_path {
        Some(path) => Schema::from_json_file(path)
            .with_context(|| format!("Failed to load schema: {}", path.display()))?,
        None => Schema::default(),
    };

    let options = ParseOptions::new().with_verbose(verbose);
    let services = load_services(&input, &options)?;

    let start = Instant::now();
    let report = validate_services(&services, &schema);
    let duration = start.elapsed();

    let schema_name = schema_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());

    if json_output {
        let output = json!({
            "input": input.display().to_string(),
            "schema": schema_name,
            "is_valid": report.is_valid(),
            "message": report.message(),
            "duration_ms": duration.as_millis(),
            "errors": report.errors,
            "info": report.info,
            "stats": {
                "services": report.stats.services,
                "users": report.stats.users,
                "categories": report.stats.categories,
                "threads": report.stats.threads,
                "posts": report.stats.posts,
            }
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Validating: {}", input.display());
        println!("Schema:     {}", schema_name);
        println!();

        println!("Statistics:");
        println!("  {}", report.stats.summary());
        println!();

        if report.is_valid() {
            println!("✅ VALIDATION PASSED");
        } else {
            println!("❌ VALIDATION FAILED");
            for error in &report.errors {
                println!("  • {}", error);
            }
        }
    }

    if report.is_valid() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
