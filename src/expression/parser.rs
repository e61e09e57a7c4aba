//! nom grammar for parameter expressions.
//!
//! Precedence, loosest first: `||`, `&&`, `== !=`, `< <= > >=`, `+ -`,
//! `* / %`, unary `- !`, then primaries (parentheses, function calls,
//! identifiers, numbers, quoted strings). Binary operators associate left.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0},
    combinator::{all_consuming, map, opt, recognize},
    error::{context, ErrorKind, ParseError, VerboseError},
    multi::{fold_many0, many0, separated_list0},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use super::{ast::Expr, ExpressionError};

pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Deepest nesting of parentheses and unary operators the grammar accepts.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parses a complete expression; trailing input is an error.
pub fn parse_expression(source: &str) -> Result<Expr, ExpressionError> {
    if source.trim().is_empty() {
        return Err(ExpressionError::malformed(source, "expression is empty"));
    }
    if exceeds_nesting_depth(source, MAX_NESTING_DEPTH) {
        return Err(ExpressionError::malformed(
            source,
            "expression nested too deeply",
        ));
    }
    match all_consuming(ws(parse_or))(source) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ExpressionError::malformed(
            source,
            nom::error::convert_error(source, e),
        )),
        Err(nom::Err::Incomplete(needed)) => Err(ExpressionError::malformed(
            source,
            format!("incomplete input, {:?}", needed),
        )),
    }
}

/// Scans `source` for nesting beyond `limit` before the recursive grammar
/// sees it. Each open parenthesis is one level. A unary operator counts as
/// one more level until its enclosing parenthesis closes, which over-counts
/// sibling operands but never under-counts.
fn exceeds_nesting_depth(source: &str, limit: usize) -> bool {
    let mut unary_per_level: Vec<usize> = vec![0];
    let mut unary_total = 0;
    let mut quote: Option<char> = None;
    let mut previous: Option<char> = None;
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(open) = quote {
            if c == open {
                quote = None;
                previous = Some(c);
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => unary_per_level.push(0),
            ')' if unary_per_level.len() > 1 => {
                unary_total -= unary_per_level.pop().unwrap_or_default();
            }
            '!' if chars.peek() == Some(&'=') => {}
            '-' | '!' if previous.map_or(true, |p| "(,+-*/%<>=!&|".contains(p)) => {
                if let Some(count) = unary_per_level.last_mut() {
                    *count += 1;
                }
                unary_total += 1;
            }
            _ => {}
        }
        if !c.is_whitespace() {
            previous = Some(c);
        }
        if unary_per_level.len() - 1 + unary_total > limit {
            return true;
        }
    }
    false
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> ParserResult<'a, O>
where
    F: FnMut(&'a str) -> ParserResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Matches the first operator of `operators` that prefixes the input.
/// Longer operators must come before their prefixes.
fn operator<'a>(
    operators: &'static [&'static str],
) -> impl FnMut(&'a str) -> ParserResult<'a, &'a str> {
    move |input: &'a str| {
        for op in operators {
            if let Some(rest) = input.strip_prefix(op) {
                return Ok((rest, &input[..op.len()]));
            }
        }
        Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::Tag,
        )))
    }
}

fn fold_binary<'a>(
    input: &'a str,
    operators: &'static [&'static str],
    operand: fn(&'a str) -> ParserResult<'a, Expr>,
) -> ParserResult<'a, Expr> {
    let (input, first) = operand(input)?;
    fold_many0(
        pair(ws(operator(operators)), operand),
        move || first.clone(),
        |left, (op, right)| Expr::apply(op, vec![left, right]),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_or(input: &str) -> ParserResult<Expr> {
    context("or", |i| fold_binary(i, &["||"], parse_and))(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_and(input: &str) -> ParserResult<Expr> {
    context("and", |i| fold_binary(i, &["&&"], parse_equality))(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_equality(input: &str) -> ParserResult<Expr> {
    context("equality", |i| fold_binary(i, &["==", "!="], parse_comparison))(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_comparison(input: &str) -> ParserResult<Expr> {
    context("comparison", |i| {
        fold_binary(i, &["<=", ">=", "<", ">"], parse_additive)
    })(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_additive(input: &str) -> ParserResult<Expr> {
    context("additive", |i| fold_binary(i, &["+", "-"], parse_multiplicative))(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_multiplicative(input: &str) -> ParserResult<Expr> {
    context("multiplicative", |i| {
        fold_binary(i, &["*", "/", "%"], parse_unary)
    })(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_unary(input: &str) -> ParserResult<Expr> {
    context(
        "unary",
        alt((
            map(
                pair(ws(alt((tag("-"), tag("!")))), parse_unary),
                |(op, operand)| Expr::apply(op, vec![operand]),
            ),
            parse_primary,
        )),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_primary(input: &str) -> ParserResult<Expr> {
    context(
        "primary",
        ws(alt((
            delimited(char('('), ws(parse_or), char(')')),
            parse_number,
            parse_string,
            parse_call_or_variable,
        ))),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_number(input: &str) -> ParserResult<Expr> {
    context(
        "number",
        map(
            recognize(pair(digit1, opt(pair(char('.'), digit1)))),
            |digits: &str| Expr::literal(digits),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_string(input: &str) -> ParserResult<Expr> {
    context(
        "string",
        map(
            alt((
                delimited(char('"'), take_while(|c| c != '"'), char('"')),
                delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            )),
            |content: &str| Expr::literal(content),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_identifier(input: &str) -> ParserResult<&str> {
    context(
        "identifier",
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_call_or_variable(input: &str) -> ParserResult<Expr> {
    context(
        "call or variable",
        map(
            tuple((
                parse_identifier,
                opt(preceded(
                    multispace0,
                    delimited(
                        char('('),
                        separated_list0(char(','), ws(parse_or)),
                        ws(char(')')),
                    ),
                )),
            )),
            |(name, args)| match args {
                Some(args) => Expr::apply(name, args),
                None => Expr::variable(name),
            },
        ),
    )(input)
}
