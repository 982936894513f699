//! Strip the copyrighted tile frames out of a Counter-Strike 2D map.
//!
//! `protect` writes a tileless copy of the map in the same binary format
//! plus a Lua script that puts every frame back when a server loads it.

pub mod cli;
pub mod error;
pub mod model;
pub mod parser;
pub mod processor;
pub mod session;
pub mod writer;

pub use error::{Error, Result};
pub use model::{MapDocument, ModifierRecord, TileModifier};
pub use session::MapSession;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Command, OutputPaths};
use writer::SystemClock;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Protect { map, out_dir } => protect(&map, out_dir.as_deref()),
        Command::Info { map, json } => show_info(&map, json),
    }
}

/// Log to stderr, filtered by `RUST_LOG` when set.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn protect(input: &Path, out_dir: Option<&Path>) -> anyhow::Result<()> {
    // 1. ── Load ───────────────────────────────────────────────────────
    let mut session = MapSession::new();
    session
        .load(input)
        .with_context(|| format!("Loading {}", input.display()))?;

    // 2. ── Process ────────────────────────────────────────────────────
    let processed = processor::run(session.map()?);

    // 3. ── Write outputs ──────────────────────────────────────────────
    let paths = OutputPaths::for_map(input, out_dir);
    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("Creating {}", dir.display()))?;
    }

    info!("generating the Lua script");
    writer::lua::emit(&processed.script, &paths.script)
        .with_context(|| format!("Writing {}", paths.script.display()))?;
    println!("Saved rebuild script as {}", paths.script.display());

    info!("generating a tileless copy of the map");
    writer::bin::emit(&processed.tileless, &paths.map, &SystemClock)
        .with_context(|| format!("Writing {}", paths.map.display()))?;
    println!("Saved tileless map as {}", paths.map.display());

    session.unload()?;
    Ok(())
}

pub fn show_info(input: &Path, json: bool) -> anyhow::Result<()> {
    let map = parser::load(input).with_context(|| format!("Loading {}", input.display()))?;
    let summary = map.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Author:      {} (USGN {})", summary.author_name, summary.author_id);
    println!("Tileset:     {}", summary.tileset_file);
    println!("Background:  {}", summary.background_file);
    println!(
        "Size:        {}x{} ({} cells)",
        i64::from(summary.width) + 1,
        i64::from(summary.height) + 1,
        summary.cells
    );
    println!("Tile types:  {}", summary.required_tile_type_count as usize + 1);
    if summary.use_modifiers {
        let m = summary.modifiers;
        println!(
            "Modifiers:   {} directional, {} overlay, {} reserved",
            m.directional_frame, m.color_overlay, m.reserved
        );
    } else {
        println!("Modifiers:   off");
    }
    println!("Entities:    {}", summary.entities);
    Ok(())
}
