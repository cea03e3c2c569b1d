mod error;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use crease_syntax::CSourceParser;
use crease_transform::{find_transformation, transformations, TransformConfig};
use log::info;

use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "crease")]
#[command(about = "Source-to-source C test-case reducer", long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Apply one transformation instance to a source file
    Transform {
        /// Source file to transform
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Transformation to apply
        #[arg(short = 't', long, default_value = "inline-call")]
        name: String,
        /// 1-based ordinal of the instance to transform
        #[arg(short, long, default_value_t = 1)]
        counter: usize,
        /// Complexity threshold for inlinable functions
        #[arg(long, default_value_t = 10)]
        max_stmts: u32,
        /// Report the number of valid instances instead of transforming
        #[arg(short, long)]
        query_instances: bool,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// List the registered transformations
    List,
}

fn main() -> miette::Result<()> {
    env_logger::init();
    let args = Args::parse();
    match args.command {
        Command::Transform {
            file,
            name,
            counter,
            max_stmts,
            query_instances,
            output,
        } => {
            handle_transform(file, name, counter, max_stmts, query_instances, output)?;
        }
        Command::List => {
            for transformation in transformations() {
                println!("{:<16} {}", transformation.name(), transformation.description());
            }
        }
    }
    Ok(())
}

fn handle_transform(
    file: PathBuf,
    name: String,
    counter: usize,
    max_stmts: u32,
    query_instances: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let transformation =
        find_transformation(&name).ok_or_else(|| CliError::UnknownTransformation(name.clone()))?;

    let source = fs::read_to_string(&file).map_err(|e| CliError::ReadError {
        path: file.clone(),
        source: e,
    })?;

    let mut parser = CSourceParser::new()?;
    let unit = parser.parse_unit(source)?;
    if unit.has_errors() {
        return Err(CliError::SourceErrors {
            path: file,
            src: unit.source().to_string(),
            errors: unit.syntax_errors(),
        });
    }

    let config = TransformConfig {
        max_stmts,
        target_instance: counter,
        query_only: query_instances,
    };
    info!("running `{}` on {} (counter {})", name, file.display(), counter);
    let result = transformation.transform(&unit, &config)?;

    if query_instances {
        println!("{}", result.valid_instances);
        return Ok(());
    }

    // `transform` only returns without a buffer in query mode.
    let rewritten = result.source.unwrap_or_default();
    match output {
        Some(path) => fs::write(&path, rewritten).map_err(|e| CliError::WriteError {
            path,
            source: e,
        })?,
        None => print!("{}", rewritten),
    }
    Ok(())
}
