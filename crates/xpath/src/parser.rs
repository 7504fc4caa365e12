//! XPath 1.0 expression grammar, built from `nom` combinators.
//!
//! Binary operators are parsed by precedence level from [`PRECEDENCE`]; union,
//! unary minus and paths sit below the table as dedicated parsers.

use crate::ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, PathOrigin, Step};
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_while, take_while1},
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{map, map_res, not, opt, peek, recognize, success, value, verify},
    error::ErrorKind,
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

type ParseError<'a> = nom::error::Error<&'a str>;

/// Binary operators grouped by binding strength, loosest first.
const PRECEDENCE: &[&[BinaryOperator]] = &[
    &[BinaryOperator::Or],
    &[BinaryOperator::And],
    &[BinaryOperator::Eq, BinaryOperator::Ne],
    &[BinaryOperator::Le, BinaryOperator::Ge, BinaryOperator::Lt, BinaryOperator::Gt],
    &[BinaryOperator::Add, BinaryOperator::Sub],
    &[BinaryOperator::Mul, BinaryOperator::Div, BinaryOperator::Mod],
];

/// Parses a complete expression. Leading and trailing whitespace is ignored,
/// anything else left over is an error.
pub fn parse_expression(input: &str) -> Result<Expression, XPathError> {
    let syntax_error = |message: String| XPathError::XPathParse(input.to_string(), message);
    let (rest, expr) = expression(input.trim()).map_err(|e| syntax_error(e.to_string()))?;
    if !rest.is_empty() {
        return Err(syntax_error(format!("unexpected '{}'", rest)));
    }
    Ok(expr)
}

fn ws<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = ParseError<'a>>
where
    F: Parser<&'a str, Output = O, Error = ParseError<'a>>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// An operator name like `div` that must not run on into a longer name.
fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = ParseError<'a>> {
    terminated(tag(word), not(peek(satisfy(is_name_char))))
}

fn expression(input: &str) -> IResult<&str, Expression> {
    binary_expr(input, 0)
}

fn binary_expr(input: &str, level: usize) -> IResult<&str, Expression> {
    let Some(operators) = PRECEDENCE.get(level) else {
        return unary_expr(input);
    };
    let (mut input, mut lhs) = binary_expr(input, level + 1)?;
    while let Ok((rest, op)) = ws(|i| operator(i, operators)).parse(input) {
        let (rest, rhs) = binary_expr(rest, level + 1)?;
        lhs = Expression::binary(op, lhs, rhs);
        input = rest;
    }
    Ok((input, lhs))
}

fn operator<'a>(input: &'a str, candidates: &[BinaryOperator]) -> IResult<&'a str, BinaryOperator> {
    for &op in candidates {
        let symbol = op.symbol();
        let matched = if symbol.starts_with(char::is_alphabetic) {
            keyword(symbol).parse(input)
        } else {
            tag(symbol).parse(input)
        };
        if let Ok((rest, _)) = matched {
            return Ok((rest, op));
        }
    }
    Err(nom::Err::Error(ParseError::new(input, ErrorKind::Tag)))
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    alt((
        map(preceded(ws(char('-')), unary_expr), |expr| Expression::Negate(Box::new(expr))),
        union_expr,
    ))
    .parse(input)
}

fn union_expr(input: &str) -> IResult<&str, Expression> {
    let (input, first) = path_expr(input)?;
    let (input, rest) = many0(preceded(char('|'), path_expr)).parse(input)?;
    let expr = rest
        .into_iter()
        .fold(first, |lhs, rhs| Expression::binary(BinaryOperator::Union, lhs, rhs));
    Ok((input, expr))
}

/// A filter expression or location path, optionally continued by `/` steps.
fn path_expr(input: &str) -> IResult<&str, Expression> {
    // Primary expressions go first so that `position()` is not read as a step named `position`.
    let (input, head) = ws(alt((filter_expr, location_path))).parse(input)?;
    let (input, tail) = many0(pair(separator, step)).parse(input)?;
    let (input, _) = multispace0(input)?;
    if tail.is_empty() {
        return Ok((input, head));
    }

    let mut path = match head {
        Expression::Path(path) => path,
        primary => LocationPath::new(PathOrigin::Expression(Box::new(primary)), Vec::new()),
    };
    for (expansion, step) in tail {
        path.steps.extend(expansion);
        path.steps.push(step);
    }
    Ok((input, Expression::Path(path)))
}

/// `/` or `//`, the latter standing for an extra `descendant-or-self::node()` step.
fn separator(input: &str) -> IResult<&str, Option<Step>> {
    ws(alt((
        value(Some(Step::descendant_or_self()), tag("//")),
        value(None, char('/')),
    )))
    .parse(input)
}

/// The start of a location path: `//step`, `/` with an optional step, or a bare step.
fn location_path(input: &str) -> IResult<&str, Expression> {
    if let Ok((rest, _)) = tag::<_, _, ParseError<'_>>("//").parse(input) {
        let (rest, first) = step(rest)?;
        let steps = vec![Step::descendant_or_self(), first];
        return Ok((rest, Expression::Path(LocationPath::new(PathOrigin::Root, steps))));
    }
    if let Ok((rest, _)) = char::<_, ParseError<'_>>('/').parse(input) {
        let (rest, first) = opt(step).parse(rest)?;
        let steps = first.into_iter().collect();
        return Ok((rest, Expression::Path(LocationPath::new(PathOrigin::Root, steps))));
    }
    map(step, |first| Expression::Path(LocationPath::new(PathOrigin::Context, vec![first]))).parse(input)
}

fn step(input: &str) -> IResult<&str, Step> {
    alt((
        value(Step::any_node(Axis::Parent), tag("..")),
        value(Step::any_node(Axis::SelfAxis), char('.')),
        map(
            (axis_specifier, node_test, many0(predicate)),
            |(axis, node_test, predicates)| Step {
                axis,
                node_test,
                predicates,
            },
        ),
    ))
    .parse(input)
}

fn axis_specifier(input: &str) -> IResult<&str, Axis> {
    alt((value(Axis::Attribute, ws(char('@'))), axis_name, success(Axis::Child))).parse(input)
}

fn axis_name(input: &str) -> IResult<&str, Axis> {
    let (rest, name) =
        terminated(take_while1(|c: char| c.is_ascii_lowercase() || c == '-'), ws(tag("::"))).parse(input)?;
    match Axis::from_name(name) {
        Some(axis) => Ok((rest, axis)),
        None => Err(nom::Err::Error(ParseError::new(input, ErrorKind::Verify))),
    }
}

fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((value(NodeTest::Any, char('*')), kind_test, map(q_name, NodeTest::Name))).parse(input)
}

/// `text()`, `node()`, `comment()` or `processing-instruction()`.
fn kind_test(input: &str) -> IResult<&str, NodeTest> {
    let (rest, name) = terminated(nc_name, (multispace0, char('('), multispace0, char(')'))).parse(input)?;
    match NodeTest::from_kind_name(name) {
        Some(test) => Ok((rest, test)),
        None => Err(nom::Err::Error(ParseError::new(input, ErrorKind::Verify))),
    }
}

fn predicate(input: &str) -> IResult<&str, Expression> {
    delimited(ws(char('[')), expression, ws(char(']'))).parse(input)
}

fn filter_expr(input: &str) -> IResult<&str, Expression> {
    map((primary_expr, many0(predicate)), |(primary, predicates)| {
        if predicates.is_empty() {
            primary
        } else {
            Expression::Filter {
                primary: Box::new(primary),
                predicates,
            }
        }
    })
    .parse(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    alt((
        map(number_literal, Expression::Number),
        map(string_literal, Expression::Literal),
        function_call,
        delimited(ws(char('(')), expression, ws(char(')'))),
    ))
    .parse(input)
}

/// `Digits ('.' Digits?)? | '.' Digits`. There are no exponents, and `inf`/`nan` are names.
fn number_literal(input: &str) -> IResult<&str, f64> {
    let digits = alt((
        recognize((digit1, opt((char('.'), opt(digit1))))),
        recognize((char('.'), digit1)),
    ));
    map_res(digits, str::parse::<f64>).parse(input)
}

fn quoted<'a>(quote: char) -> impl Parser<&'a str, Output = &'a str, Error = ParseError<'a>> {
    delimited(char(quote), take_till(move |c| c == quote), char(quote))
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(alt((quoted('"'), quoted('\''))), str::to_string).parse(input)
}

fn nc_name(input: &str) -> IResult<&str, &str> {
    recognize((take_while1(|c: char| c.is_alphabetic() || c == '_'), take_while(is_name_char))).parse(input)
}

fn q_name(input: &str) -> IResult<&str, String> {
    map(recognize((nc_name, opt((char(':'), nc_name)))), str::to_string).parse(input)
}

fn function_call(input: &str) -> IResult<&str, Expression> {
    // Kind tests look like calls but belong to steps.
    let (rest, function) = verify(q_name, |name: &str| NodeTest::from_kind_name(name).is_none()).parse(input)?;
    let (rest, args) = preceded(
        multispace0,
        delimited(char('('), separated_list0(ws(char(',')), expression), ws(char(')'))),
    )
    .parse(rest)?;
    Ok((rest, Expression::Call { function, args }))
}
