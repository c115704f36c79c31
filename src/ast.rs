//! Abstract Syntax Tree types for turtle scripts
//!
//! The tree is already validated: every call names a whitelisted operation with
//! literal arguments of the right arity, and every loop has a bounded count.

use miette::SourceSpan;

use crate::command::Command;

/// A complete script
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub statements: Vec<Statement>,
}

/// A script statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Pen operation: forward(10)
    Call(Call),
    /// Bounded loop: for _ in range(4): ...
    Repeat(Repeat),
}

/// A validated operation call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub command: Command,
    pub span: SourceSpan,
}

/// A loop whose body runs `count` times
#[derive(Debug, Clone, PartialEq)]
pub struct Repeat {
    pub count: u32,
    pub body: Vec<Statement>,
    pub span: SourceSpan,
}
