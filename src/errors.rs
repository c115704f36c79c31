//! Error types with rich diagnostics using miette
//!
//! Script errors carry source spans so hosts can print the offending text with
//! a label. Structured-input and pipeline errors carry the index or value that
//! failed instead.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::NumericError;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<script>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Script Errors
// ============================================================================

/// Errors that occur while parsing or lowering a script
#[derive(Error, Diagnostic, Debug)]
pub enum ScriptError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(turtlestitch::parse::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unsupported construct: {construct}")]
    #[diagnostic(
        code(turtlestitch::parse::unsupported_construct),
        help("scripts may only call pen operations and use `for _ in range(n):` loops")
    )]
    UnsupportedConstruct {
        construct: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not allowed in a stitch script")]
        span: SourceSpan,
    },

    #[error("unsupported operation: {name}")]
    #[diagnostic(code(turtlestitch::parse::unsupported_operation))]
    UnsupportedOperation {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown operation")]
        span: SourceSpan,
        #[help]
        suggestion: Option<String>,
    },

    #[error("{op}() takes {expected} argument(s) but {found} were given")]
    #[diagnostic(code(turtlestitch::parse::arity))]
    Arity {
        op: &'static str,
        expected: usize,
        found: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("wrong number of arguments")]
        span: SourceSpan,
    },

    #[error("invalid argument to {op}(): {reason}")]
    #[diagnostic(
        code(turtlestitch::parse::invalid_argument),
        help("arguments must be plain numbers such as `10`, `-2.5` or `1e3`")
    )]
    InvalidArgument {
        op: &'static str,
        reason: &'static str,
        #[source_code]
        src: NamedSource<String>,
        #[label("{reason}")]
        span: SourceSpan,
    },

    #[error("invalid loop: {message}")]
    #[diagnostic(
        code(turtlestitch::parse::invalid_loop),
        help("loops must have the form `for _ in range(n):` with n a literal between 0 and {max_count}")
    )]
    InvalidLoop {
        message: String,
        max_count: u32,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("script too large: expands to {count} commands (limit {limit})")]
    #[diagnostic(
        code(turtlestitch::parse::script_too_large),
        help("reduce the loop counts or raise `max_commands`")
    )]
    ScriptTooLarge { count: u64, limit: usize },
}

// ============================================================================
// Structured Command Errors
// ============================================================================

/// Errors that occur while converting structured command records
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("command {index}: {op} requires field `{field}`")]
    #[diagnostic(code(turtlestitch::command::missing_field))]
    MissingField {
        index: usize,
        op: &'static str,
        field: &'static str,
    },

    #[error("command {index}: unsupported operation `{op}`")]
    #[diagnostic(
        code(turtlestitch::command::unsupported_operation),
        help("supported operations: penup, pendown, goto, forward, backward, left, right")
    )]
    UnsupportedOperation { index: usize, op: String },

    #[error("command {index}: field `{field}` of {op} must be a finite number")]
    #[diagnostic(code(turtlestitch::command::non_finite_value))]
    NonFiniteValue {
        index: usize,
        op: &'static str,
        field: &'static str,
    },
}

// ============================================================================
// Pipeline Errors
// ============================================================================

/// Errors that occur while turning points into stitches
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("at least two points are required to make stitches, got {count}")]
    #[diagnostic(
        code(turtlestitch::pipeline::insufficient_points),
        help("put the pen down and move it at least once")
    )]
    InsufficientPoints { count: usize },

    #[error("invalid {field}: {value} ({reason})")]
    #[diagnostic(code(turtlestitch::pipeline::invalid_config))]
    InvalidConfig {
        field: &'static str,
        value: f64,
        #[source]
        reason: NumericError,
    },

    #[error("point {index} is not finite")]
    #[diagnostic(code(turtlestitch::pipeline::non_finite_point))]
    NonFinitePoint { index: usize },

    #[error("design needs {count} stitches (limit {limit})")]
    #[diagnostic(
        code(turtlestitch::pipeline::too_many_stitches),
        help("increase `max_stitch_mm` or shrink the design")
    )]
    TooManyStitches { count: u64, limit: usize },
}

// ============================================================================
// Crate Error
// ============================================================================

/// Any error produced by the script-to-stitches pipeline
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] PipelineError),
}
