//! Parse pest pairs into the validated AST
//!
//! The grammar yields one `line` pair per source line. Lines are folded into
//! blocks by comparing their indentation, and each statement is checked against
//! the supported subset while it is converted, so the resulting [`Script`] only
//! ever holds whitelisted calls and bounded loops.

use miette::SourceSpan;
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use crate::ast::*;
use crate::command::Op;
use crate::config::ScriptLimits;
use crate::errors::{ScriptError, SourceContext};
use crate::{Rule, TurtleParser};

/// Name reported for scripts that did not come from a file
pub const DEFAULT_SOURCE_NAME: &str = "<script>";

/// Parse script source into a validated AST
pub fn parse(source: &str, limits: &ScriptLimits) -> Result<Script, ScriptError> {
    parse_named(DEFAULT_SOURCE_NAME, source, limits)
}

/// Parse script source, reporting errors against `name`
pub fn parse_named(
    name: &str,
    source: &str,
    limits: &ScriptLimits,
) -> Result<Script, ScriptError> {
    let ctx = SourceContext::new(name, source);
    let pairs =
        TurtleParser::parse(Rule::program, source).map_err(|e| syntax_from_pest(&ctx, e))?;

    let lines: Vec<Line> = pairs
        .flat_map(|program| program.into_inner())
        .filter(|pair| pair.as_rule() == Rule::line)
        .filter_map(Line::from_pair)
        .collect();

    let mut parser = BlockParser {
        ctx: &ctx,
        limits,
        lines,
        pos: 0,
    };
    let statements = parser.block("")?;
    crate::log::debug!(statements = statements.len(), "parsed script");
    Ok(Script { statements })
}

/// A source line that holds at least one statement
#[derive(Clone)]
struct Line<'i> {
    indent: Pair<'i, Rule>,
    body: Pair<'i, Rule>,
}

impl<'i> Line<'i> {
    fn from_pair(pair: Pair<'i, Rule>) -> Option<Self> {
        let mut indent = None;
        let mut body = None;
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::indent => indent = Some(inner),
                Rule::body => body = Some(inner),
                _ => {}
            }
        }
        Some(Line {
            indent: indent?,
            body: body?,
        })
    }

    fn indent(&self) -> &'i str {
        self.indent.as_str()
    }
}

struct BlockParser<'a, 'i> {
    ctx: &'a SourceContext,
    limits: &'a ScriptLimits,
    lines: Vec<Line<'i>>,
    pos: usize,
}

impl<'a, 'i> BlockParser<'a, 'i> {
    /// Consume lines at exactly `indent`, stopping at the first dedent.
    fn block(&mut self, indent: &'i str) -> Result<Vec<Statement>, ScriptError> {
        let mut statements = Vec::new();
        while let Some(line) = self.lines.get(self.pos).cloned() {
            let here = line.indent();
            if here == indent {
                self.pos += 1;
                let pairs = statement_pairs(line.body);
                self.statements(pairs, indent, true, &mut statements)?;
            } else if indent.starts_with(here) {
                break;
            } else if here.starts_with(indent) {
                return Err(self.syntax(&line.indent, "unexpected indent"));
            } else {
                return Err(self.syntax(
                    &line.indent,
                    "indentation does not match any enclosing block",
                ));
            }
        }
        Ok(statements)
    }

    /// The indented block that follows a loop header on the previous line.
    fn nested_block(
        &mut self,
        indent: &'i str,
        header: &Pair<'i, Rule>,
    ) -> Result<Vec<Statement>, ScriptError> {
        let deeper = self
            .lines
            .get(self.pos)
            .map(Line::indent)
            .filter(|next| next.len() > indent.len() && next.starts_with(indent));
        match deeper {
            Some(inner) => self.block(inner),
            None => {
                let end = header.as_span().end();
                Err(ScriptError::Syntax {
                    message: "expected an indented block".into(),
                    src: self.ctx.named_source(),
                    span: (end, 0).into(),
                })
            }
        }
    }

    /// Convert the statements of one line. `ends_line` is true when nothing
    /// follows the last of them on the same line.
    fn statements(
        &mut self,
        pairs: Vec<Pair<'i, Rule>>,
        indent: &'i str,
        ends_line: bool,
        out: &mut Vec<Statement>,
    ) -> Result<(), ScriptError> {
        let last = pairs.len().saturating_sub(1);
        for (i, pair) in pairs.into_iter().enumerate() {
            let ends_line = ends_line && i == last;
            let inner = self.first_inner(pair)?;
            match inner.as_rule() {
                Rule::call_stmt => {
                    let call = self.first_inner(inner)?;
                    out.push(Statement::Call(self.call(call)?));
                }
                Rule::for_stmt => {
                    out.push(Statement::Repeat(self.repeat(inner, indent, ends_line)?));
                }
                Rule::keyword_stmt => return Err(self.keyword_stmt(inner)),
                Rule::assignment => return Err(self.unsupported(&inner, "assignment")),
                Rule::expr_stmt => {
                    return Err(self.unsupported(&inner, "expression statement"));
                }
                other => {
                    return Err(self.syntax(&inner, format!("unexpected {other:?}")));
                }
            }
        }
        Ok(())
    }

    fn repeat(
        &mut self,
        pair: Pair<'i, Rule>,
        indent: &'i str,
        ends_line: bool,
    ) -> Result<Repeat, ScriptError> {
        let span = to_span(&pair);
        let mut count = None;
        let mut inline = None;
        for inner in pair.clone().into_inner() {
            match inner.as_rule() {
                Rule::range_call => count = Some(self.loop_count(inner)?),
                Rule::expr => {
                    return Err(self.invalid_loop(&inner, "loops must iterate over `range(n)`"));
                }
                Rule::inline_body => inline = Some(inner),
                _ => {}
            }
        }
        let count = count.ok_or_else(|| self.syntax(&pair, "malformed loop header"))?;

        let body = match inline {
            Some(inline) => {
                let mut body = Vec::new();
                self.statements(statement_pairs(inline), indent, ends_line, &mut body)?;
                body
            }
            None if ends_line => self.nested_block(indent, &pair)?,
            None => return Err(self.syntax(&pair, "a loop header must end its line")),
        };

        if count == 0 {
            crate::log::warn!("range(0) loop body never runs");
        }
        Ok(Repeat { count, body, span })
    }

    fn loop_count(&self, range_call: Pair<'i, Rule>) -> Result<u32, ScriptError> {
        let call = self.first_inner(range_call)?;
        let (callee, args) = self.split_call(call.clone())?;
        if callee.as_str() != "range" {
            return Err(self.invalid_loop(
                &callee,
                format!("loops must iterate over `range(n)`, not `{}`", callee.as_str()),
            ));
        }
        let [arg] = args.as_slice() else {
            return Err(self.invalid_loop(&call, "range() takes exactly one count"));
        };

        let literal = classify(arg)
            .map_err(|_| self.invalid_loop(arg, "loop count must be a literal integer"))?;
        if literal.signed {
            return Err(self.invalid_loop(arg, "loop count must be an unsigned integer"));
        }
        if !literal.text.bytes().all(|b| b.is_ascii_digit() || b == b'_') {
            return Err(self.invalid_loop(arg, "loop count must be an integer"));
        }

        let max = self.limits.max_loop_count;
        let out_of_range = || {
            self.invalid_loop(
                arg,
                format!("loop count {} is outside 0..={max}", arg.as_str().trim()),
            )
        };
        let count: u64 = literal.digits().parse().map_err(|_| out_of_range())?;
        u32::try_from(count)
            .ok()
            .filter(|&n| n <= max)
            .ok_or_else(out_of_range)
    }

    fn call(&self, pair: Pair<'i, Rule>) -> Result<Call, ScriptError> {
        let span = to_span(&pair);
        let (callee, args) = self.split_call(pair)?;
        let name = callee.as_str();
        let op: Op = name
            .parse()
            .map_err(|_| ScriptError::UnsupportedOperation {
                name: name.to_string(),
                src: self.ctx.named_source(),
                span: to_span(&callee),
                suggestion: suggest(name),
            })?;

        let arity_error = || ScriptError::Arity {
            op: op.name(),
            expected: op.arity(),
            found: args.len(),
            src: self.ctx.named_source(),
            span,
        };
        if args.len() != op.arity() {
            return Err(arity_error());
        }

        let values = args
            .iter()
            .map(|arg| self.argument(op, arg))
            .collect::<Result<Vec<f64>, _>>()?;
        let command = op.command(&values).ok_or_else(arity_error)?;
        Ok(Call { command, span })
    }

    fn argument(&self, op: Op, arg: &Pair<'i, Rule>) -> Result<f64, ScriptError> {
        let invalid = |reason| ScriptError::InvalidArgument {
            op: op.name(),
            reason,
            src: self.ctx.named_source(),
            span: to_span(arg),
        };
        let literal = classify(arg).map_err(invalid)?;
        let magnitude: f64 = literal
            .digits()
            .parse()
            .map_err(|_| invalid("not a valid number"))?;
        let value = if literal.negative { -magnitude } else { magnitude };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid("number is out of range"))
        }
    }

    /// Split a `call` pair into its callee and argument pairs.
    fn split_call(
        &self,
        pair: Pair<'i, Rule>,
    ) -> Result<(Pair<'i, Rule>, Vec<Pair<'i, Rule>>), ScriptError> {
        let whole = pair.clone();
        let mut inner = pair.into_inner();
        let callee = inner
            .next()
            .ok_or_else(|| self.syntax(&whole, "expected an operation name"))?;
        let args = inner
            .next()
            .map(|args| args.into_inner().collect())
            .unwrap_or_default();
        Ok((callee, args))
    }

    fn keyword_stmt(&self, pair: Pair<'i, Rule>) -> ScriptError {
        let keyword = pair
            .clone()
            .into_inner()
            .find(|p| p.as_rule() == Rule::keyword)
            .map(|p| p.as_str())
            .unwrap_or_default();
        let construct = match keyword {
            "while" => return self.invalid_loop(&pair, "`while` loops are unbounded"),
            "if" | "elif" | "else" => "conditional".to_string(),
            "def" | "lambda" => "function definition".to_string(),
            "class" => "class definition".to_string(),
            "import" | "from" => "import".to_string(),
            "break" | "continue" => "loop control".to_string(),
            other => format!("`{other}` statement"),
        };
        self.unsupported(&pair, construct)
    }

    fn first_inner(&self, pair: Pair<'i, Rule>) -> Result<Pair<'i, Rule>, ScriptError> {
        let whole = pair.clone();
        pair.into_inner()
            .next()
            .ok_or_else(|| self.syntax(&whole, "incomplete statement"))
    }

    fn syntax(&self, pair: &Pair<'_, Rule>, message: impl Into<String>) -> ScriptError {
        ScriptError::Syntax {
            message: message.into(),
            src: self.ctx.named_source(),
            span: to_span(pair),
        }
    }

    fn unsupported(&self, pair: &Pair<'_, Rule>, construct: impl Into<String>) -> ScriptError {
        ScriptError::UnsupportedConstruct {
            construct: construct.into(),
            src: self.ctx.named_source(),
            span: to_span(pair),
        }
    }

    fn invalid_loop(&self, pair: &Pair<'_, Rule>, message: impl Into<String>) -> ScriptError {
        ScriptError::InvalidLoop {
            message: message.into(),
            max_count: self.limits.max_loop_count,
            src: self.ctx.named_source(),
            span: to_span(pair),
        }
    }
}

/// A numeric literal with at most one leading sign
struct Literal<'i> {
    signed: bool,
    negative: bool,
    text: &'i str,
}

impl Literal<'_> {
    /// The literal text without `_` digit separators
    fn digits(&self) -> String {
        self.text.replace('_', "")
    }
}

/// Accept only `number`, `-number` or `+number`; anything else yields the reason.
fn classify<'i>(arg: &Pair<'i, Rule>) -> Result<Literal<'i>, &'static str> {
    if arg.as_rule() == Rule::kwarg {
        return Err("keyword arguments are not supported");
    }
    let mut terms = arg.clone().into_inner();
    let term = terms.next().ok_or("expected a number")?;
    if terms.next().is_some() {
        return Err("arithmetic is not allowed");
    }

    let mut negative = false;
    let mut signs = 0;
    let mut atom = None;
    for part in term.into_inner() {
        match part.as_rule() {
            Rule::unary_op => {
                signs += 1;
                match part.as_str() {
                    "-" => negative = !negative,
                    "+" => {}
                    _ => return Err("operators are not allowed"),
                }
            }
            Rule::postfix => return Err("calls, indexing and attributes are not allowed"),
            _ => atom = Some(part),
        }
    }
    if signs > 1 {
        return Err("only a single sign is allowed");
    }

    let atom = atom.ok_or("expected a number")?;
    match atom.as_rule() {
        Rule::number => Ok(Literal {
            signed: signs == 1,
            negative,
            text: atom.as_str(),
        }),
        Rule::name => Err("names are not allowed"),
        Rule::string => Err("strings are not numbers"),
        _ => Err("expected a number"),
    }
}

/// Help text for an unknown operation name
fn suggest(name: &str) -> Option<String> {
    if let Some((_, method)) = name.rsplit_once('.') {
        if let Ok(op) = method.parse::<Op>() {
            return Some(format!("call `{op}(...)` directly; scripts have no turtle objects"));
        }
    }
    let alias = match name.to_ascii_lowercase().as_str() {
        "fd" => Op::Forward,
        "bk" | "back" => Op::Backward,
        "lt" => Op::Left,
        "rt" => Op::Right,
        "pu" | "up" => Op::PenUp,
        "pd" | "down" => Op::PenDown,
        "setpos" | "setposition" | "teleport" => Op::Goto,
        _ => return None,
    };
    Some(format!("did you mean `{alias}`?"))
}

fn statement_pairs(pair: Pair<'_, Rule>) -> Vec<Pair<'_, Rule>> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::statement)
        .collect()
}

fn to_span(pair: &Pair<'_, Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

fn syntax_from_pest(ctx: &SourceContext, error: pest::error::Error<Rule>) -> ScriptError {
    let error = error.renamed_rules(describe_rule);
    let span = match error.location {
        InputLocation::Pos(pos) => (pos, 0).into(),
        InputLocation::Span((start, end)) => (start, end - start).into(),
    };
    ScriptError::Syntax {
        message: error.variant.message().into_owned(),
        src: ctx.named_source(),
        span,
    }
}

fn describe_rule(rule: &Rule) -> String {
    let text = match rule {
        Rule::EOI => "end of input",
        Rule::body | Rule::statement | Rule::inline_body => "a statement",
        Rule::expr | Rule::term => "an expression",
        Rule::args | Rule::kwarg => "an argument",
        Rule::number => "a number",
        Rule::string => "a string",
        Rule::ident | Rule::name | Rule::callee | Rule::target => "a name",
        Rule::unary_op | Rule::bin_op | Rule::assign_op => "an operator",
        Rule::postfix => "`(`, `[` or `.`",
        Rule::kw_in => "`in`",
        Rule::paren | Rule::list => "a bracketed expression",
        other => return format!("{other:?}"),
    };
    text.to_string()
}
