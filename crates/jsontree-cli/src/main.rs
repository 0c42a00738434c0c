//! `jsontree` CLI: minify, query and edit JSON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Re-serialize JSON compactly (stdin → stdout)
//! echo '{ "name": "Alice", "age": 30 }' | jsontree minify
//!
//! # Minify from file to file
//! jsontree minify -i data.json -o data.min.json
//!
//! # Read a nested value (array segments are indices)
//! jsontree get -i data.json address city
//! jsontree get -i data.json scores 0
//!
//! # Replace or insert a value and print the updated document
//! jsontree set -i data.json address city --value '"Lyon"'
//!
//! # Show size and node statistics
//! jsontree stats -i data.json
//!
//! # Enable debug logging on stderr
//! JSONTREE_LOG=debug jsontree minify -i data.json
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jsontree::{Document, Key, Lookup, NodeId, ParseOptions, ValueType};
use std::io::{self, Read};
use std::process;
use tracing::debug;

mod logging;

#[derive(Parser)]
#[command(
    name = "jsontree",
    version,
    about = "Minify, query and edit JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum nesting depth accepted when parsing input
    #[arg(long, global = true, default_value_t = jsontree::options::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-serialize JSON in compact form
    Minify {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the value at a path as compact JSON (exit status 1 if absent)
    Get {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Path segments: object keys, or integer indices for arrays
        path: Vec<String>,
    },
    /// Replace or insert the value at a path and print the whole document
    Set {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// New value as JSON text
        #[arg(long)]
        value: String,
        /// Path segments; the last one names the key or index to write
        #[arg(required = true, num_args = 1..)]
        path: Vec<String>,
    },
    /// Show size and node statistics
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    logging::setup_logging();

    let cli = Cli::parse();
    let options = ParseOptions::with_max_depth(cli.max_depth);
    let mut doc = Document::new();

    match cli.command {
        Commands::Minify { input, output } => {
            let text = read_input(input.as_deref())?;
            let root = doc
                .decode_with(&text, &options)
                .context("Failed to parse input JSON")?;
            let compact = doc.encode(root)?;
            write_output(output.as_deref(), &compact)?;
        }
        Commands::Get { input, path } => {
            let text = read_input(input.as_deref())?;
            let root = doc
                .decode_with(&text, &options)
                .context("Failed to parse input JSON")?;
            let found = walk(&doc, root, &path)?;
            match render(&mut doc, found)? {
                Some(json) => println!("{}", json),
                None => {
                    debug!(path = ?path, "no value at path");
                    process::exit(1);
                }
            }
        }
        Commands::Set {
            input,
            output,
            value,
            path,
        } => {
            let text = read_input(input.as_deref())?;
            let root = doc
                .decode_with(&text, &options)
                .context("Failed to parse input JSON")?;
            let new_value = doc
                .decode_with(&value, &options)
                .context("Failed to parse --value as JSON")?;

            let (last, parents) = path
                .split_last()
                .context("set requires at least one path segment")?;
            let container = match walk(&doc, root, parents)? {
                Lookup::Node(id) => id,
                Lookup::Absent => bail!("Path not found: {}", parents.join(" ")),
                _ => bail!("Path does not lead to an array or object: {}", parents.join(" ")),
            };
            let key = segment_key(&doc, container, last)?;
            doc.set(container, key, new_value)
                .with_context(|| format!("Failed to set {}", path.join(" ")))?;

            let updated = doc.encode(root)?;
            write_output(output.as_deref(), &updated)?;
        }
        Commands::Stats { input } => {
            let text = read_input(input.as_deref())?;
            let root = doc
                .decode_with(&text, &options)
                .context("Failed to parse input JSON")?;
            let compact = doc.encode(root)?;
            let input_bytes = text.len();
            let compact_bytes = compact.len();
            let ratio = if input_bytes > 0 {
                (1.0 - (compact_bytes as f64 / input_bytes as f64)) * 100.0
            } else {
                0.0
            };
            println!("Input size:   {} bytes", input_bytes);
            println!("Compact size: {} bytes", compact_bytes);
            println!("Reduction:    {:.1}%", ratio);
            println!("Nodes:        {}", doc.live_nodes());
            println!("Root type:    {}", doc.type_of(root)?);
        }
    }

    Ok(())
}

/// Follow `path` from `root`. An empty path yields the root itself.
fn walk(doc: &Document, root: NodeId, path: &[String]) -> Result<Lookup> {
    let mut current = Lookup::Node(root);
    for segment in path {
        let id = match current {
            Lookup::Node(id) => id,
            Lookup::Absent => return Ok(Lookup::Absent),
            _ => bail!("Cannot descend into a primitive value at '{}'", segment),
        };
        let key = segment_key(doc, id, segment)?;
        current = doc.get(id, key)?;
    }
    Ok(current)
}

/// Interpret a path segment according to the container it addresses.
fn segment_key<'a>(doc: &Document, container: NodeId, segment: &'a str) -> Result<Key<'a>> {
    match doc.type_of(container)? {
        ValueType::Array => {
            let index: i64 = segment
                .parse()
                .with_context(|| format!("Array index must be an integer, got '{}'", segment))?;
            Ok(Key::Index(index))
        }
        _ => Ok(Key::Name(segment)),
    }
}

/// Render a lookup result as compact JSON, or `None` if absent.
fn render(doc: &mut Document, found: Lookup) -> Result<Option<String>> {
    let id = match found {
        Lookup::Absent => return Ok(None),
        Lookup::Node(id) => id,
        Lookup::Null => doc.create_null(),
        Lookup::Bool(b) => doc.create_bool(b),
        Lookup::Number(n) => doc.create_number(n),
        Lookup::String(s) => doc.create_string(s),
    };
    Ok(Some(doc.encode(id)?))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
