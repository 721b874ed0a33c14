use std::path::PathBuf;

use clap::Parser;

/// Terminal control panel for a video window. Paste a streaming link, pick a
/// file, or pass one on the command line.
#[derive(Debug, Parser)]
#[command(name = "pasteplay", version, about)]
pub struct Cli {
    /// File path or URL to open at startup.
    pub input: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
