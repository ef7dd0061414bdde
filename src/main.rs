use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "univ-inspect")]
#[command(author, version, about = "Inspect legacy BusinessObjects .unv universe files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a .unv file and print its statistics and diagnostics
    Inspect {
        /// Path to the .unv file
        #[arg(short, long)]
        file: PathBuf,

        /// Print progress as each section decodes
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { file, verbose } => inspect(&file, verbose)?,
    }

    Ok(())
}

fn inspect(path: &PathBuf, verbose: bool) -> Result<()> {
    if verbose {
        println!("Reading {}", path.display());
    }
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    if verbose {
        println!("Read {} bytes, decoding sections", bytes.len());
    }
    let outcome = univ_decoder::parse(&bytes)
        .with_context(|| format!("decoding {}", path.display()))?;

    if verbose {
        println!("Decode complete, running cross-reference analysis");
    }

    let universe = &outcome.universe;
    let params = &universe.parameters;
    println!(
        "Universe: {}",
        params.universe_name.as_deref().unwrap_or("<unnamed>")
    );
    if let Some(filename) = &params.universe_filename {
        println!("  filename: {filename}");
    }
    println!("  revision: {}", params.revision);
    if let Some(by) = &params.created_by {
        println!("  created by: {by}");
    }
    if let Some(engine) = &params.dbms_engine {
        println!("  dbms engine: {engine}");
    }

    let stats = universe.statistics();
    println!("Statistics:");
    println!("  classes: {}", stats.classes);
    println!("  objects: {}", stats.objects);
    println!("  conditions: {}", stats.conditions);
    println!("  tables: {}", stats.tables);
    println!("  aliases: {}", stats.aliases);
    println!("  joins: {}", stats.joins);
    println!("  contexts: {}", stats.contexts);

    if !universe.custom_parameters.is_empty() {
        println!("Custom parameters:");
        let mut entries: Vec<_> = universe.custom_parameters.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in entries {
            println!("  {name} = {value}");
        }
    }

    if outcome.diagnostics.is_empty() {
        println!("Diagnostics: none");
    } else {
        println!("Diagnostics ({}):", outcome.diagnostics.len());
        for diagnostic in &outcome.diagnostics {
            println!("  {diagnostic}");
        }
    }

    Ok(())
}
