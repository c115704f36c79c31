//! Turtle scripts to embroidery stitches.
//!
//! A script (or a list of structured command records) is lowered to
//! [`Command`]s, run through a virtual [`pen`] to get points, and turned into
//! centered, evenly spaced integer stitches by [`pipeline::build_stitches`].
//!
//! ```
//! let out = turtlestitch::stitch_script(
//!     "pendown()\nforward(10)",
//!     &turtlestitch::StitchConfig::new(1.0, 3.0),
//! )
//! .unwrap();
//! assert_eq!(out.plan.stitch_count, 5);
//! ```

use std::borrow::Borrow;

use pest_derive::Parser;
use serde::Serialize;

pub mod ast;
pub mod command;
pub mod config;
pub mod defaults;
pub mod errors;
pub mod log;
pub mod lower;
pub mod parse;
pub mod pen;
pub mod pipeline;
pub mod types;

pub use command::{Command, CommandRecord, Op};
pub use config::{ScriptLimits, StitchConfig};
pub use errors::{CommandError, Error, PipelineError, ScriptError};
pub use pipeline::{StitchPlan, build_stitches};

#[derive(Parser)]
#[grammar = "turtle.pest"]
pub struct TurtleParser;

/// Parse and unroll a script with the default limits.
pub fn compile_script(source: &str) -> Result<Vec<Command>, ScriptError> {
    compile_script_with(source, &ScriptLimits::default())
}

/// Parse and unroll a script.
pub fn compile_script_with(source: &str, limits: &ScriptLimits) -> Result<Vec<Command>, ScriptError> {
    let script = parse::parse(source, limits)?;
    lower::lower(&script, limits)
}

/// Stitches for a script, along with the commands it lowered to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptStitches {
    pub commands: Vec<Command>,
    #[serde(flatten)]
    pub plan: StitchPlan,
}

/// Script text to stitches.
pub fn stitch_script(source: &str, config: &StitchConfig) -> Result<ScriptStitches, Error> {
    let commands = compile_script_with(source, &config.limits)?;
    let points = pen::execute(&commands);
    let plan = build_stitches(&points, config)?;
    Ok(ScriptStitches { commands, plan })
}

/// Structured command records to stitches.
pub fn stitch_commands<I>(records: I, config: &StitchConfig) -> Result<StitchPlan, Error>
where
    I: IntoIterator,
    I::Item: Borrow<CommandRecord>,
{
    let commands = command::commands_from_records(records)?;
    let points = pen::execute(&commands);
    Ok(build_stitches(&points, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    #[test]
    fn parse_single_call() {
        let input = "forward(10)";
        let result = TurtleParser::parse(Rule::program, input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_empty_program() {
        let result = TurtleParser::parse(Rule::program, "");
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_indented_block() {
        let input = "for _ in range(4):\n    forward(10)\n    left(90)\n";
        let result = TurtleParser::parse(Rule::program, input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_inline_loop_with_comment() {
        let input = "for i in range(3): forward(1); left(120)  # triangle";
        let result = TurtleParser::parse(Rule::program, input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_crlf_lines() {
        let input = "pendown()\r\nforward(1)\r\n";
        let result = TurtleParser::parse(Rule::program, input);
        assert!(result.is_ok(), "Failed to parse: {:?}", result.err());
    }

    #[test]
    fn parse_rejected_constructs_still_tokenize() {
        // These are rejected later by kind, not as syntax errors
        for input in [
            "x = 10",
            "import turtle",
            "while True:",
            "t.forward(10)",
            "forward(10 * 2)",
            "print('hi')",
        ] {
            let result = TurtleParser::parse(Rule::program, input);
            assert!(result.is_ok(), "Failed to parse {input:?}: {:?}", result.err());
        }
    }

    #[test]
    fn parse_number_rule() {
        for input in ["10", "1.5", ".5", "3.", "1e3", "2.5E-2", "1_000", "0.000_1"] {
            let result = TurtleParser::parse(Rule::number, input);
            assert!(result.is_ok(), "Failed to parse number {input:?}: {:?}", result.err());
        }
    }

    #[test]
    fn parse_call_rule() {
        let result = TurtleParser::parse(Rule::call, "goto(-30, 40)");
        assert!(result.is_ok(), "Failed to parse call: {:?}", result.err());
    }

    #[test]
    fn parse_unclosed_call_fails() {
        assert!(TurtleParser::parse(Rule::program, "forward(10").is_err());
    }

    #[test]
    fn parse_two_calls_on_one_line_fails() {
        assert!(TurtleParser::parse(Rule::program, "forward(1) forward(2)").is_err());
    }

    #[test]
    fn compile_unrolls_loops() {
        let commands = compile_script("pendown()\nfor _ in range(3): forward(1)").unwrap();
        assert_eq!(commands.len(), 4);
    }

    #[test]
    fn stitch_script_end_to_end() {
        let out = stitch_script("pendown()\nforward(10)", &StitchConfig::new(1.0, 3.0)).unwrap();
        assert_eq!(out.commands, vec![Command::PenDown, Command::Forward(10.0)]);
        assert_eq!(out.plan.stitch_count, 5);
    }

    #[test]
    fn stitch_script_uses_config_limits() {
        let config = StitchConfig::default().with_limits(ScriptLimits {
            max_loop_count: 2,
            ..ScriptLimits::default()
        });
        let err = stitch_script("for _ in range(3): forward(1)", &config).unwrap_err();
        assert!(matches!(err, Error::Script(ScriptError::InvalidLoop { .. })));
    }

    #[test]
    fn stitch_commands_single_pendown() {
        let err = stitch_commands([CommandRecord::new("pendown")], &StitchConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Pipeline(PipelineError::InsufficientPoints { count: 1 })
        ));
    }

    #[test]
    fn stitch_commands_bad_record() {
        let err = stitch_commands(
            [CommandRecord::new("pendown"), CommandRecord::new("goto").with_xy(1.0, 2.0), CommandRecord::new("goto")],
            &StitchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Command(CommandError::MissingField { index: 2, .. })
        ));
    }
}
