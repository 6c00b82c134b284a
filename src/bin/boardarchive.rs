mod cli_utils;
mod commands;

use anyhow::Result;
use boardarchive::LineEnding;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{cmd_convert, cmd_parse, cmd_schema, cmd_show, cmd_validate};

#[derive(Parser)]
#[command(name = "boardarchive")]
#[command(
    about = "Parse, convert and validate message board archive files",
    long_about = "boardarchive - Codec for block-delimited message board archives\n\n\
    Reads archive text (optionally gzip or bzip2 compressed, with include blocks) into a\n\
    tree of services, users, categories, threads, posts and polls, and writes it\n\
    back as archive text, JSON, YAML or an HTML page.\n\n\
    Examples:\n\
      boardarchive parse board.txt\n\
      boardarchive convert board.txt -o board.json.gz\n\
      boardarchive convert board.json -o board.txt --line-ending crlf\n\
      boardarchive convert board.txt.bz2 -o board.yaml\n\
      boardarchive validate board.txt --schema schema.json\n\
      boardarchive show board.txt.gz\n\
      boardarchive show board.txt --html -o board.html"
)]
#[command(version)]
struct Cli {
    /// Log every parsed line to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an archive and print it as JSON
    Parse {
        /// Archive file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Write JSON to this file instead of stdout (.gz and .bz2 compress)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Skip deep checks; category InSub references are left unresolved
        #[arg(long)]
        validate_only: bool,
    },

    /// Convert between archive text, JSON and YAML (format chosen by extension)
    Convert {
        /// Archive, JSON or YAML input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file: .json writes JSON, .yaml / .yml YAML, anything else archive text
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Line ending for archive output: lf, crlf or cr
        #[arg(long, default_value = "lf")]
        line_ending: LineEnding,
    },

    /// Validate an archive against a schema
    Validate {
        /// Archive, JSON or YAML input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Schema JSON file (default: built-in schema)
        #[arg(short, long, value_name = "FILE")]
        schema: Option<PathBuf>,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print a human-readable rendering of an archive
    Show {
        /// Archive, JSON or YAML input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Render a standalone HTML page instead of console text
        #[arg(long)]
        html: bool,

        /// Write the rendering to this file instead of stdout (.gz and .bz2 compress)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the built-in validation schema as JSON
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli_utils::init_logging(cli.verbose);

    match cli.command {
        Commands::Parse {
            input,
            output,
            validate_only,
        } => cmd_parse(input, output, validate_only, cli.verbose),
        Commands::Convert {
            input,
            output,
            line_ending,
        } => cmd_convert(input, output, line_ending, cli.verbose),
        Commands::Validate {
            input,
            schema,
            json,
        } => cmd_validate(input, schema, json, cli.verbose),
        Commands::Show {
            input,
            html,
            output,
        } => cmd_show(input, html, output, cli.verbose),
        Commands::Schema => cmd_schema(),
    }
}
