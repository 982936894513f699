use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Strip the tiles out of CS2D maps and rebuild them server-side")]
pub struct Cli {
    /// Log decode and encode details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a tileless copy of a map and a Lua script that restores its tiles
    Protect {
        /// Input .map file
        map: PathBuf,
        /// Directory for the outputs (defaults to the map's own directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Show what a map contains
    Info {
        /// Input .map file
        map: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Where `protect` writes its two artifacts. Never the input itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub map: PathBuf,
    pub script: PathBuf,
}

impl OutputPaths {
    pub fn for_map(input: &Path, out_dir: Option<&Path>) -> Self {
        let name = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = out_dir
            .or_else(|| input.parent())
            .unwrap_or_else(|| Path::new(""));

        Self {
            map: dir.join(format!("{name} (Tileless version).map")),
            script: dir.join(format!("{name} (Map generation script).lua")),
        }
    }
}
