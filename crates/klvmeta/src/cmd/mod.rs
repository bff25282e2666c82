use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod fields;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a KLV metadata stream into a JSON document.
    Decode(DecodeArgs),
    /// List the blocks of a KLV metadata stream without decoding fields.
    Inspect(InspectArgs),
    /// Print the tag decode table.
    Fields(FieldsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: &Config) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format, config),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Fields(args) => fields::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Metadata stream (`.klv`) to decode.
    pub input: PathBuf,
    /// Directory for the JSON (and KML) output.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    /// Print the document to stdout instead of writing files.
    #[arg(long, conflicts_with_all = ["out_dir", "kml"])]
    pub stdout: bool,
    /// Also write a KML file of frame-center positions.
    #[arg(long)]
    pub kml: bool,
    /// Do not add a random `uid` field to each frame.
    #[arg(long)]
    pub no_frame_ids: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Metadata stream (`.klv`) to inspect.
    pub input: PathBuf,
    /// Stop after N blocks.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct FieldsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
