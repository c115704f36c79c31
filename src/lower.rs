//! Unroll a validated script into a flat command list
//!
//! Loop bodies are copied in place. The expanded size is computed first with
//! saturating arithmetic, so an oversized script is rejected before anything
//! is allocated.

use crate::ast::*;
use crate::command::Command;
use crate::config::ScriptLimits;
use crate::errors::ScriptError;

/// Expand every loop, preserving source order.
pub fn lower(script: &Script, limits: &ScriptLimits) -> Result<Vec<Command>, ScriptError> {
    let count = expanded_len(&script.statements);
    let limit = u64::try_from(limits.max_commands).unwrap_or(u64::MAX);
    if count > limit {
        return Err(ScriptError::ScriptTooLarge {
            count,
            limit: limits.max_commands,
        });
    }

    // count <= max_commands, so it fits in usize
    let mut commands = Vec::with_capacity(count as usize);
    emit(&script.statements, &mut commands);
    crate::log::debug!(commands = commands.len(), "unrolled script");
    Ok(commands)
}

/// Number of commands the statements expand to, saturating at `u64::MAX`.
pub fn expanded_len(statements: &[Statement]) -> u64 {
    statements.iter().fold(0u64, |total, statement| {
        let len = match statement {
            Statement::Call(_) => 1,
            Statement::Repeat(r) => expanded_len(&r.body).saturating_mul(u64::from(r.count)),
        };
        total.saturating_add(len)
    })
}

fn emit(statements: &[Statement], out: &mut Vec<Command>) {
    for statement in statements {
        match statement {
            Statement::Call(call) => out.push(call.command),
            Statement::Repeat(r) if r.count == 0 => {}
            Statement::Repeat(r) => {
                let start = out.len();
                emit(&r.body, out);
                let end = out.len();
                for _ in 1..r.count {
                    out.extend_from_within(start..end);
                }
            }
        }
    }
}
