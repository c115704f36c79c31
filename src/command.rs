//! Pen commands and the structured record format they are exchanged in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CommandError;

/// The seven whitelisted pen operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    PenUp,
    PenDown,
    Goto,
    Forward,
    Backward,
    Left,
    Right,
}

impl Op {
    pub const ALL: [Op; 7] = [
        Op::PenUp,
        Op::PenDown,
        Op::Goto,
        Op::Forward,
        Op::Backward,
        Op::Left,
        Op::Right,
    ];

    /// Canonical lowercase name, as written in scripts and records.
    pub fn name(self) -> &'static str {
        match self {
            Op::PenUp => "penup",
            Op::PenDown => "pendown",
            Op::Goto => "goto",
            Op::Forward => "forward",
            Op::Backward => "backward",
            Op::Left => "left",
            Op::Right => "right",
        }
    }

    /// Number of numeric arguments the operation takes.
    pub fn arity(self) -> usize {
        match self {
            Op::PenUp | Op::PenDown => 0,
            Op::Forward | Op::Backward | Op::Left | Op::Right => 1,
            Op::Goto => 2,
        }
    }

    /// Build the command from positional arguments, `None` on an arity mismatch.
    pub fn command(self, args: &[f64]) -> Option<Command> {
        match (self, args) {
            (Op::PenUp, []) => Some(Command::PenUp),
            (Op::PenDown, []) => Some(Command::PenDown),
            (Op::Goto, &[x, y]) => Some(Command::Goto { x, y }),
            (Op::Forward, &[d]) => Some(Command::Forward(d)),
            (Op::Backward, &[d]) => Some(Command::Backward(d)),
            (Op::Left, &[a]) => Some(Command::Left(a)),
            (Op::Right, &[a]) => Some(Command::Right(a)),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name is not one of the whitelisted operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOp;

impl FromStr for Op {
    type Err = UnknownOp;

    /// Case-insensitive lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownOp)
    }
}

/// One pen operation. Distances are in drawing units, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "CommandRecord")]
pub enum Command {
    PenUp,
    PenDown,
    Goto { x: f64, y: f64 },
    Forward(f64),
    Backward(f64),
    Left(f64),
    Right(f64),
}

impl Command {
    pub fn op(&self) -> Op {
        match self {
            Command::PenUp => Op::PenUp,
            Command::PenDown => Op::PenDown,
            Command::Goto { .. } => Op::Goto,
            Command::Forward(_) => Op::Forward,
            Command::Backward(_) => Op::Backward,
            Command::Left(_) => Op::Left,
            Command::Right(_) => Op::Right,
        }
    }
}

/// Loosely typed command as it arrives from a request body.
///
/// `op` is matched case-insensitively; `value` defaults to zero; `goto` needs
/// both `x` and `y`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub op: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl CommandRecord {
    pub fn new(op: impl Into<String>) -> Self {
        Self {
            op: op.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_xy(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Validate into a [`Command`]; `index` is the record's position for error reports.
    pub fn to_command(&self, index: usize) -> Result<Command, CommandError> {
        let op: Op = self
            .op
            .trim()
            .parse()
            .map_err(|_| CommandError::UnsupportedOperation {
                index,
                op: self.op.clone(),
            })?;

        let finite = |field: &'static str, v: f64| {
            if v.is_finite() {
                Ok(v)
            } else {
                Err(CommandError::NonFiniteValue {
                    index,
                    op: op.name(),
                    field,
                })
            }
        };
        let required = |field: &'static str, v: Option<f64>| {
            v.ok_or(CommandError::MissingField {
                index,
                op: op.name(),
                field,
            })
            .and_then(|v| finite(field, v))
        };
        let value = || finite("value", self.value.unwrap_or(0.0));

        Ok(match op {
            Op::PenUp => Command::PenUp,
            Op::PenDown => Command::PenDown,
            Op::Goto => Command::Goto {
                x: required("x", self.x)?,
                y: required("y", self.y)?,
            },
            Op::Forward => Command::Forward(value()?),
            Op::Backward => Command::Backward(value()?),
            Op::Left => Command::Left(value()?),
            Op::Right => Command::Right(value()?),
        })
    }
}

impl From<Command> for CommandRecord {
    fn from(command: Command) -> Self {
        let record = CommandRecord::new(command.op().name());
        match command {
            Command::PenUp | Command::PenDown => record,
            Command::Goto { x, y } => record.with_xy(x, y),
            Command::Forward(v) | Command::Backward(v) | Command::Left(v) | Command::Right(v) => {
                record.with_value(v)
            }
        }
    }
}

/// Convert a whole record sequence, failing on the first invalid record.
pub fn commands_from_records<I>(records: I) -> Result<Vec<Command>, CommandError>
where
    I: IntoIterator,
    I::Item: std::borrow::Borrow<CommandRecord>,
{
    use std::borrow::Borrow;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.borrow().to_command(index))
        .collect()
}
