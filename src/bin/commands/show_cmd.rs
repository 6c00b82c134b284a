use anyhow::{Context, Result};
use boardarchive::display::{render_services, render_services_html, save_services_to_html_file};
use boardarchive::{file_reader, ParseOptions};
use std::path::PathBuf;

use crate::cli_utils::load_services;

pub fn cmd_show(input: PathBuf, html: bool, output: Option<PathBuf>, verbose: bool) -> Result<()> {
    let options = ParseOptions::new().with_verbose(verbose);
    let services = load_services(&input, &options)?;

    match (output, html) {
        (Some(path), true) => save_services_to_html_file(&path, &services)
            .with_context(|| format!("Failed to write HTML: {}", path.display()))?,
        (Some(path), false) => file_reader::write_file(&path, render_services(&services).as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?,
        (None, true) => print!("{}", render_services_html(&services)),
        (None, false) => print!("{}", render_services(&services)),
    }
    Ok(())
}
