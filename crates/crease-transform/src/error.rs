use crease_rewrite::RewriteError;
use crease_syntax::SyntaxError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TransformError {
    /// The requested ordinal exceeds the number of valid call sites in
    /// the unit. Recoverable: the driver picks a smaller ordinal or
    /// moves on.
    #[error("no instance {requested} to transform: unit has {available} valid call site(s)")]
    #[diagnostic(code(crease_transform::no_more_instances))]
    NoMoreInstances { requested: usize, available: usize },

    /// A collaborator failed while staging or applying edits.
    #[error("rewrite buffer rejected staged edits")]
    #[diagnostic(code(crease_transform::internal))]
    Internal(#[from] RewriteError),

    /// Source text for a selected node could not be rendered.
    #[error("failed to render source text")]
    #[diagnostic(code(crease_transform::internal))]
    InternalSyntax(#[from] SyntaxError),

    /// A precondition the pass depends on does not hold. This is a
    /// defect in the pass, not a property of the input program; the
    /// invocation aborts without committing any edits.
    #[error("invariant violated: {0}")]
    #[diagnostic(code(crease_transform::invariant))]
    InvariantViolation(String),
}

pub type TransformResult<T> = Result<T, TransformError>;

/// Checks a precondition of the pass, mapping failure to
/// [`TransformError::InvariantViolation`] instead of panicking.
macro_rules! invariant {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::TransformError::InvariantViolation(format!($($arg)*)));
        }
    };
}

pub(crate) use invariant;
