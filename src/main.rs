//! idlgen driver
//!
//! Reads a resolved IDL program (JSON) and runs the selected backends.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use idlgen::ast::loader::load_program;
use idlgen::ast::Program;
use idlgen::{generate_program, Registry};

/// idlgen - IDL backend generator
#[derive(Parser, Debug)]
#[command(name = "idlgen")]
#[command(version = "0.1.0")]
#[command(about = "Generate sources for many target languages from a resolved IDL program")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Resolved program (.json)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Target to generate, as ID[:OPTIONS] (repeatable)
    #[arg(long = "gen", value_name = "TARGET")]
    targets: Vec<String>,

    /// Output root directory (overrides the program's)
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available targets and their options
    List,
    /// Load a program and resolve all of its typedefs
    Check {
        /// Resolved program (.json)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let registry = Registry::global();

    match &cli.command {
        Some(Commands::List) => {
            list_targets(registry);
            Ok(())
        }
        Some(Commands::Check { input }) => check_file(input),
        None => {
            let Some(input) = &cli.input else {
                bail!("no input file specified\nUsage: idlgen --gen <TARGET> <FILE>");
            };
            if cli.targets.is_empty() {
                bail!("no target specified, use --gen <TARGET> (see `idlgen list`)");
            }
            generate_file(registry, input, &cli.targets, cli.out.as_ref())
        }
    }
}

fn list_targets(registry: &Registry) {
    println!("Available targets:");
    for factory in registry.factories() {
        println!("  {} ({}):", factory.id, factory.long_name);
        print!("{}", factory.documentation);
    }
}

/// Run every requested backend over one program
fn generate_file(
    registry: &Registry,
    input: &PathBuf,
    targets: &[String],
    out: Option<&PathBuf>,
) -> Result<()> {
    let mut program = load_program(input).with_context(|| format!("loading {}", input.display()))?;
    if let Some(out) = out {
        program.out_path = out.display().to_string();
    }

    // Fail on a bad target before any backend writes output
    let mut generators = Vec::with_capacity(targets.len());
    for spec in targets {
        let generator = registry.create_from_spec(spec, &program).map_err(|e| {
            let hint = if e.is_target_error() { " (see `idlgen list`)" } else { "" };
            anyhow::Error::new(e).context(format!("selecting target '{}'{}", spec, hint))
        })?;
        generators.push((spec, generator));
    }

    for (spec, mut generator) in generators {
        generate_program(generator.as_mut())
            .with_context(|| format!("generating '{}' for {}", spec, program.name))?;
        info!("{} done: {}", spec, generator.get_out_dir());
    }
    Ok(())
}

/// Resolve every typedef of a program and its includes
fn check_file(input: &PathBuf) -> Result<()> {
    let program = load_program(input).with_context(|| format!("loading {}", input.display()))?;
    let count = check_program(&program)?;
    println!("{}: {} typedefs resolved", program.name, count);
    Ok(())
}

fn check_program(program: &Program) -> Result<usize> {
    let mut count = 0;
    for include in &program.includes {
        count += check_program(include)?;
    }
    for typedef in &program.typedefs {
        program
            .true_type(&typedef.aliased)
            .with_context(|| format!("typedef {}.{}", program.name, typedef.name))?;
        count += 1;
    }
    Ok(count)
}
