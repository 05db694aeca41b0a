//! `trellis` — load, validate, and render outline documents.
//!
//! # Usage
//!
//! ```
//! trellis check contacts.trln --strict
//! trellis show contacts.trln --body
//! trellis title contacts.trln f402be26959111e7a8357054d2175f18
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use trellis_core::{
  document::Document,
  format::RenderOptions,
  node::NodeId,
};
use trellis_file::LoadOptions;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
  name = "trellis",
  about = "Inspect and render Trellis outline documents"
)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Load a document and report whether it validates.
  Check {
    /// Path to the document file.
    file:   PathBuf,
    /// Treat childtype and ownership violations as fatal.
    #[arg(long)]
    strict: bool,
  },

  /// Print the outline as an indented title tree.
  Show {
    /// Path to the document file.
    file:             PathBuf,
    /// Also print each node's body lines.
    #[arg(long)]
    body:             bool,
    /// Drop body lines whose field placeholders all resolved empty.
    #[arg(long, requires = "body")]
    skip_blank_lines: bool,
  },

  /// Print one node's resolved title.
  Title {
    /// Path to the document file.
    file: PathBuf,
    /// The node's uid.
    uid:  String,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  match Cli::parse().command {
    Command::Check { file, strict } => check(&file, strict),
    Command::Show {
      file,
      body,
      skip_blank_lines,
    } => show(&file, body, skip_blank_lines),
    Command::Title { file, uid } => title(&file, &uid),
  }
}

fn load(path: &Path, options: LoadOptions) -> Result<Document> {
  let file = File::open(path)
    .with_context(|| format!("opening {}", path.display()))?;
  trellis_file::load_reader_with(BufReader::new(file), options)
    .with_context(|| format!("loading {}", path.display()))
}

// ─── Subcommands ──────────────────────────────────────────────────────────────

fn check(path: &Path, strict: bool) -> Result<()> {
  let document = load(path, LoadOptions { strict })?;
  println!(
    "ok: {} formats, {} nodes, {} top nodes",
    document.formats().count(),
    document.node_count(),
    document.top_nodes().len()
  );
  Ok(())
}

fn show(path: &Path, body: bool, skip_blank_lines: bool) -> Result<()> {
  let document = load(path, LoadOptions::default())?;
  let options = RenderOptions {
    keep_blanks: !skip_blank_lines,
  };
  for uid in document.top_nodes() {
    show_node(&document, uid, 0, body, options);
  }
  Ok(())
}

fn show_node(
  document: &Document,
  uid: &NodeId,
  depth: usize,
  body: bool,
  options: RenderOptions,
) {
  // A validated document resolves every uid and format.
  let Some(node) = document.node(uid) else {
    return;
  };
  let Some(format) = document.format_of(node) else {
    return;
  };

  let indent = "  ".repeat(depth);
  println!("{indent}{}", format.format_title(node));
  if body {
    for line in format.format_output(node, options) {
      println!("{indent}  {line}");
    }
    if format.space_between {
      println!();
    }
  }
  for child in &node.children {
    show_node(document, child, depth + 1, body, options);
  }
}

fn title(path: &Path, uid: &str) -> Result<()> {
  let document = load(path, LoadOptions::default())?;
  let uid = NodeId::new(uid);
  let Some(title) = document.node_title(&uid) else {
    bail!("node not found: {uid}");
  };
  println!("{title}");
  Ok(())
}
