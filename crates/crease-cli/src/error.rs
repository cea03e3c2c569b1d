use std::path::PathBuf;

use crease_syntax::SyntaxError;
use crease_transform::TransformError;
use miette::Diagnostic;
use thiserror::Error;

/// CLI-specific error type that provides rich diagnostics
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Failed to read {path}")]
    #[diagnostic(code(crease::cli::io_error))]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    #[diagnostic(code(crease::cli::io_error))]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} contains syntax errors")]
    #[diagnostic(code(crease::cli::syntax_error))]
    SourceErrors {
        path: PathBuf,
        #[source_code]
        src: String,
        #[related]
        errors: Vec<SyntaxError>,
    },

    #[error("Unknown transformation `{0}`")]
    #[diagnostic(
        code(crease::cli::unknown_transformation),
        help("run `crease list` to see the registered transformations")
    )]
    UnknownTransformation(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Transform(#[from] TransformError),
}
