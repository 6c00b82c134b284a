use anyhow::Result;
use boardarchive::Schema;

pub fn cmd_schema() -> Result<()> {
    println!("{}", Schema::default().to_json_pretty()?);
    Ok(())
}
