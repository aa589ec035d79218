//! Minimal CLI: generate <input-yaml> <output-dir>
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::value::Node;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer a typed schema from a YAML document and emit Rust record definitions
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// walk the document and write one record definition per nested mapping
    Generate(GenerateOut),
}

#[derive(Args, Debug, Clone)]
struct GenerateOut {
    /// YAML document to infer from
    input: PathBuf,

    /// destination directory for the generated record sources
    out_dir: PathBuf,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let root = crate::reader::load(&target.input)
                    .with_context(|| format!("failed to read {}", target.input.display()))?;
                let Node::Map(map) = root else {
                    // the reader guarantees a mapping root; keep the bail anyway
                    anyhow::bail!("document root must be a mapping");
                };

                let mut generator = crate::generator::Generator::new(&target.out_dir);
                let written = generator.generate(&map).with_context(|| {
                    format!("failed to generate into {}", target.out_dir.display())
                })?;

                for path in &written {
                    println!("wrote {}", path.display());
                }
                Ok(())
            }
        }
    }
}
