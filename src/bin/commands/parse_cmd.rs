use anyhow::{Context, Result};
use boardarchive::{json, parse_file, ParseOptions};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::cli_utils::format_number;

pub fn cmd_parse(
    input: PathBuf,
    output: Option<PathBuf>,
    validate_only: bool,
    verbose: bool,
) -> Result<()> {
    let options = ParseOptions::new()
        .with_validate_only(validate_only)
        .with_verbose(verbose);

    let start = Instant::now();
    let services = parse_file(&input, &options)
        .with_context(|| format!("Failed to parse archive: {}", input.display()))?;
    let posts: usize = services.iter().map(|s| s.post_count()).sum();
    info!(
        services = services.len(),
        posts,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Parsed {}",
        input.display()
    );

    match output {
        Some(path) => {
            json::save_to_json_file(&path, &services)
                .with_context(|| format!("Failed to write JSON: {}", path.display()))?;
            eprintln!(
                "Wrote {} service(s), {} post(s) to {}",
                services.len(),
                format_number(posts),
                path.display()
            );
        }
        None => println!("{}", json::to_json(&services)?),
    }
    Ok(())
}
