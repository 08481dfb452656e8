use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod convert;
pub mod frames;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert raw MJPEG into a length-prefixed container.
    Convert(ConvertArgs),
    /// Identify which framing convention a file uses.
    Inspect(InspectArgs),
    /// List the records of a length-prefixed container.
    Frames(FramesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Convert(args) => convert::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Frames(args) => frames::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input file: raw MJPEG, or a single JPEG.
    pub input: PathBuf,
    /// Output file for the length-prefixed container.
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// File to analyze.
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Container file to list.
    pub file: PathBuf,
    /// Stop after N records.
    #[arg(long)]
    pub limit: Option<usize>,
    /// Maximum frame length accepted per record, in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_frame_len: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
