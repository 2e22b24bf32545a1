use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shelfstock::stocking::{expand_template, WhitelistDoc, WhitelistTemplate};

#[derive(Parser, Debug)]
#[command(name = "whitelist_gen", version, about = "Build and inspect shelf-stocking whitelists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a template (.ron or .json) into a full whitelist JSON document.
    Generate {
        /// Template file with shelf repeat counts and member index lists.
        template: PathBuf,
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Seed for the member shuffle; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Emit indented JSON.
        #[arg(long)]
        pretty: bool,
    },
    /// Parse a whitelist and print what it declares.
    Inspect {
        whitelist: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate { template, output, seed, pretty } => generate(&template, output.as_deref(), seed, pretty),
        Command::Inspect { whitelist } => inspect(&whitelist),
    }
}

fn read_template(path: &Path) -> Result<WhitelistTemplate> {
    let bytes = fs::read(path).with_context(|| format!("failed to read template {}", path.display()))?;
    let template = match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => WhitelistTemplate::from_ron_slice(&bytes),
        Some("json") => WhitelistTemplate::from_json_slice(&bytes),
        other => bail!("unsupported template extension {:?} (expected .ron or .json)", other),
    };
    template.with_context(|| format!("failed to parse template {}", path.display()))
}

fn generate(template: &Path, output: Option<&Path>, seed: Option<u64>, pretty: bool) -> Result<()> {
    let template = read_template(template)?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let doc = expand_template(&template, &mut ChaCha8Rng::seed_from_u64(seed));

    let text = (if pretty { serde_json::to_string_pretty(&doc) } else { serde_json::to_string(&doc) })
        .context("failed to serialize whitelist")?;

    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "wrote {} ({} shelves, {} members, seed {})",
                path.display(),
                doc.shelf_count(),
                doc.member_count(),
                seed
            );
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let doc = WhitelistDoc::load_file(path).with_context(|| format!("failed to load whitelist {}", path.display()))?;
    let Some(body) = doc.whitelist.as_ref() else {
        bail!("{} has no 'Whitelist' root object", path.display());
    };

    println!("{:<32} {:>7} {}", "SHELF", "LEVELS", "COMPACTION");
    for shelf in body.shelves.iter().flatten() {
        println!("{:<32} {:>7} {:?}", shelf.name, shelf.shelfbase.len(), shelf.compaction);
    }
    println!();
    println!("{:<32} {:<24} {:>7} {}", "GROUP", "SHELF", "MEMBERS", "DISCARD");
    for group in body.products.iter().flatten() {
        println!("{:<32} {:<24} {:>7} {}", group.group_name, group.shelf_name, group.members.len(), group.discard);
    }
    Ok(())
}
