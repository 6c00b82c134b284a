use anyhow::{Context, Result};
use boardarchive::{
    json, parse_file, save_services_to_file, yaml, LineEnding, ParseOptions, Service,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` overrides the default
/// level (`warn`, or `debug` with `--verbose`).
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Document format of an input or output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Archive,
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file name, looking through a `.gz` or
    /// `.bz2` suffix
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let name = name
            .strip_suffix(".gz")
            .or_else(|| name.strip_suffix(".bz2"))
            .unwrap_or(&name);

        if name.ends_with(".json") {
            DocumentFormat::Json
        } else if name.ends_with(".yaml") || name.ends_with(".yml") {
            DocumentFormat::Yaml
        } else {
            DocumentFormat::Archive
        }
    }
}

/// Load services from an archive, JSON or YAML file, picked by extension
pub fn load_services(input: &Path, options: &ParseOptions) -> Result<Vec<Service>> {
    match DocumentFormat::from_path(input) {
        DocumentFormat::Json => json::load_from_json_file(input)
            .with_context(|| format!("Failed to load JSON: {}", input.display())),
        DocumentFormat::Yaml => yaml::load_from_yaml_file(input)
            .with_context(|| format!("Failed to load YAML: {}", input.display())),
        DocumentFormat::Archive => parse_file(input, options)
            .with_context(|| format!("Failed to parse archive: {}", input.display())),
    }
}

/// Save services in the format picked by the output extension
pub fn save_services(output: &Path, services: &[Service], line_ending: LineEnding) -> Result<()> {
    let written = match DocumentFormat::from_path(output) {
        DocumentFormat::Json => json::save_to_json_file(output, services),
        DocumentFormat::Yaml => yaml::save_to_yaml_file(output, services),
        DocumentFormat::Archive => save_services_to_file(output, services, line_ending),
    };
    written.with_context(|| format!("Failed to write {}", output.display()))
}

pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
