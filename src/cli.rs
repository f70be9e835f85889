//! Minimal CLI: contract schema directories in, TypeScript clients out.
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use crate::schema::ContractSchemaSet;

/// generate statically-typed TypeScript clients from CosmWasm contract
/// JSON Schema exports
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate one client file per contract
    Generate(GenerateTarget),
}

#[derive(Args, Debug)]
struct GenerateTarget {
    /// One or more contracts as name=schema_dir pairs
    #[arg(long, short, num_args = 1.., required = true)]
    contract: Vec<String>,

    /// output directory for the generated clients
    #[arg(short, long)]
    out: PathBuf,

    /// treat each contract input as a single packed IDL bundle
    #[arg(long, default_value_t = false)]
    packed: bool,
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => target.run(),
        }
    }
}

impl GenerateTarget {
    fn jobs(&self) -> anyhow::Result<Vec<(String, PathBuf)>> {
        self.contract
            .iter()
            .map(|spec| {
                let (name, dir) = spec
                    .split_once('=')
                    .with_context(|| format!("expected name=schema_dir, got `{spec}`"))?;
                Ok((name.to_string(), PathBuf::from(dir)))
            })
            .collect()
    }

    fn run(&self) -> anyhow::Result<()> {
        let jobs = self.jobs()?;

        // contract runs are independent: disjoint inputs, distinct output
        // files
        let failed: Vec<String> = jobs
            .par_iter()
            .filter_map(|(name, schema_dir)| {
                match generate_one(name, schema_dir, &self.out, self.packed) {
                    Ok(path) => {
                        println!("{} {name} -> {}", "generated".green(), path.display());
                        None
                    }
                    Err(error) => {
                        eprintln!("{} {name}: {error:#}", "failed".red());
                        Some(name.clone())
                    }
                }
            })
            .collect();

        if failed.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("generation failed for: {}", failed.join(", "))
        }
    }
}

fn generate_one(
    name: &str,
    schema_dir: &Path,
    out: &Path,
    packed: bool,
) -> anyhow::Result<PathBuf> {
    let schemas = ContractSchemaSet::from_dir(schema_dir, packed)
        .with_context(|| format!("loading schemas from {}", schema_dir.display()))?;
    let path = crate::generate::generate(name, &schemas, out)
        .with_context(|| format!("generating client for {name}"))?;
    Ok(path)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_specs_parse_into_jobs() {
        let target = GenerateTarget {
            contract: vec!["counter=./schema".to_string(), "cw20=./other".to_string()],
            out: PathBuf::from("./client"),
            packed: false,
        };
        let jobs = target.jobs().unwrap();
        assert_eq!(jobs[0].0, "counter");
        assert_eq!(jobs[0].1, PathBuf::from("./schema"));
        assert_eq!(jobs[1].0, "cw20");
    }

    #[test]
    fn malformed_contract_specs_are_rejected() {
        let target = GenerateTarget {
            contract: vec!["counter".to_string()],
            out: PathBuf::from("./client"),
            packed: false,
        };
        assert!(target.jobs().is_err());
    }
}
