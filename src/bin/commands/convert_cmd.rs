use anyhow::Result;
use boardarchive::{LineEnding, ParseOptions};
use std::path::PathBuf;

use crate::cli_utils::{load_services, save_services};

pub fn cmd_convert(
    input: PathBuf,
    output: PathBuf,
    line_ending: LineEnding,
    verbose: bool,
) -> Result<()> {
    let options = ParseOptions::new().with_verbose(verbose);
    let services = load_services(&input, &options)?;
    save_services(&output, &services, line_ending)?;

    eprintln!(
        "Converted {} service(s): {} -> {}",
        services.len(),
        input.display(),
        output.display()
    );
    Ok(())
}
