//! Built-in implementations of the XPath 1.0 core function library.

use super::engine::{EvaluationContext, XPathValue, expect_node_set, string_to_number};
use crate::error::XPathError;
use crate::navigator::Navigator;

/// Dispatches a function call to the correct implementation.
pub fn evaluate_function<N: Navigator>(
    name: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<N>,
) -> Result<XPathValue<N>, XPathError> {
    match name {
        // Node-Set
        "last" => func_last(args, e_ctx),
        "position" => func_position(args, e_ctx),
        "count" => func_count(args),
        "local-name" | "name" => func_name(name, args, e_ctx),

        // String
        "string" => func_string(args, e_ctx),
        "concat" => func_concat(args),
        "starts-with" => func_starts_with(args),
        "contains" => func_contains(args),
        "substring-before" => func_substring_before(args),
        "substring-after" => func_substring_after(args),
        "substring" => func_substring(args),
        "string-length" => func_string_length(args, e_ctx),
        "normalize-space" => func_normalize_space(args, e_ctx),
        "translate" => func_translate(args),

        // Boolean
        "boolean" => func_boolean(args),
        "not" => func_not(args),
        "true" => func_constant("true", args, true),
        "false" => func_constant("false", args, false),

        // Number
        "number" => func_number(args, e_ctx),
        "sum" => func_sum(args),
        "floor" => func_rounding("floor", args, f64::floor),
        "ceiling" => func_rounding("ceiling", args, f64::ceil),
        "round" => func_rounding("round", args, xpath_round),

        _ => Err(XPathError::function(name, "Unknown XPath function")),
    }
}

fn expect_args<N>(function: &str, args: &[XPathValue<N>], expected: std::ops::RangeInclusive<usize>) -> Result<(), XPathError> {
    if expected.contains(&args.len()) {
        return Ok(());
    }
    let message = if expected.start() == expected.end() {
        format!("Expected {} argument(s), got {}", expected.start(), args.len())
    } else {
        format!("Expected {} to {} arguments, got {}", expected.start(), expected.end(), args.len())
    };
    Err(XPathError::function(&format!("{}()", function), message))
}

/// The single argument as a string, or the context node's string value when omitted.
fn string_or_context<N: Navigator>(mut args: Vec<XPathValue<N>>, e_ctx: &EvaluationContext<N>) -> String {
    match args.pop() {
        Some(arg) => arg.to_string(),
        None => e_ctx.context_node.value(),
    }
}

/// Pops two arguments as strings, returning them in call order.
fn two_strings<N: Navigator>(mut args: Vec<XPathValue<N>>) -> (String, String) {
    let second = args.pop().map(|v| v.to_string()).unwrap_or_default();
    let first = args.pop().map(|v| v.to_string()).unwrap_or_default();
    (first, second)
}

// --- Node-Set Functions ---

fn func_last<N: Navigator>(args: Vec<XPathValue<N>>, e_ctx: &EvaluationContext<N>) -> Result<XPathValue<N>, XPathError> {
    expect_args("last", &args, 0..=0)?;
    Ok(XPathValue::Number(e_ctx.context_size as f64))
}

fn func_position<N: Navigator>(args: Vec<XPathValue<N>>, e_ctx: &EvaluationContext<N>) -> Result<XPathValue<N>, XPathError> {
    expect_args("position", &args, 0..=0)?;
    Ok(XPathValue::Number(e_ctx.context_position as f64))
}

fn func_count<N: Navigator>(mut args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    expect_args("count", &args, 1..=1)?;
    let nodes = args
        .pop()
        .map(|arg| expect_node_set(arg, "count() argument"))
        .transpose()?
        .unwrap_or_default();
    Ok(XPathValue::Number(nodes.len() as f64))
}

/// `name()` and `local-name()` coincide because the navigator contract has no prefixes.
fn func_name<N: Navigator>(
    function: &str,
    mut args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<N>,
) -> Result<XPathValue<N>, XPathError> {
    expect_args(function, &args, 0..=1)?;
    let name = match args.pop() {
        None => e_ctx.context_node.local_name().to_string(),
        Some(arg) => {
            let nodes = expect_node_set(arg, &format!("{}() argument", function))?;
            nodes
                .iter()
                .min()
                .map(|n| n.local_name().to_string())
                .unwrap_or_default()
        }
    };
    Ok(XPathValue::String(name))
}

// --- String Functions ---

fn func_string<N: Navigator>(args: Vec<XPathValue<N>>, e_ctx: &EvaluationContext<N>) -> Result<XPathValue<N>, XPathError> {
    expect_args("string", &args, 0..=1)?;
    Ok(XPathValue::String(string_or_context(args, e_ctx)))
}

fn func_concat<N: Navigator>(args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    if args.len() < 2 {
        return Err(XPathError::function("concat()", "Expected at least 2 arguments"));
    }
    let result = args.iter().map(|v| v.to_string()).collect::<String>();
    Ok(XPathValue::String(result))
}

fn func_starts_with<N: Navigator>(args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    expect_args("starts-with", &args, 2..=2)?;
    let (s1, s2) = two_strings(args);
    Ok(XPathValue::Boolean(s1.starts_with(&s2)))
}

fn func_contains<N: Navigator>(args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    expect_args("contains", &args, 2..=2)?;
    let (s1, s2) = two_strings(args);
    Ok(XPathValue::Boolean(s1.contains(&s2)))
}

fn func_substring_before<N: Navigator>(args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    expect_args("substring-before", &args, 2..=2)?;
    let (s1, s2) = two_strings(args);
    let result = s1.find(&s2).map(|index| s1[..index].to_string()).unwrap_or_default();
    Ok(XPathValue::String(result))
}

fn func_substring_after<N: Navigator>(args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    expect_args("substring-after", &args, 2..=2)?;
    let (s1, s2) = two_strings(args);
    let result = s1
        .find(&s2)
        .map(|index| s1[index + s2.len()..].to_string())
        .unwrap_or_default();
    Ok(XPathValue::String(result))
}

fn func_substring<N: Navigator>(mut args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    expect_args("substring", &args, 2..=3)?;
    let length_val = if args.len() == 3 {
        args.pop().map(|v| v.to_number())
    } else {
        None
    };
    let start_val = args.pop().map_or(f64::NAN, |v| v.to_number());
    let s = args.pop().map(|v| v.to_string()).unwrap_or_default();

    // XPath rounding rules for start/length
    let first = xpath_round(start_val);
    let last = length_val.map_or(f64::INFINITY, |l| first + xpath_round(l));

    let result = s
        .chars()
        .enumerate()
        .filter_map(|(i, c)| {
            let pos = (i + 1) as f64; // XPath positions are 1-based
            (pos >= first && pos < last).then_some(c)
        })
        .collect::<String>();
    Ok(XPathValue::String(result))
}

fn func_string_length<N: Navigator>(args: Vec<XPathValue<N>>, e_ctx: &EvaluationContext<N>) -> Result<XPathValue<N>, XPathError> {
    expect_args("string-length", &args, 0..=1)?;
    let s = string_or_context(args, e_ctx);
    Ok(XPathValue::Number(s.chars().count() as f64))
}

fn func_normalize_space<N: Navigator>(args: Vec<XPathValue<N>>, e_ctx: &EvaluationContext<N>) -> Result<XPathValue<N>, XPathError> {
    expect_args("normalize-space", &args, 0..=1)?;
    let s = string_or_context(args, e_ctx);
    Ok(XPathValue::String(s.split_whitespace().collect::<Vec<_>>().join(" ")))
}

fn func_translate<N: Navigator>(mut args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    expect_args("translate", &args, 3..=3)?;
    let to_str: Vec<char> = args.pop().map(|v| v.to_string()).unwrap_or_default().chars().collect();
    let from_str: Vec<char> = args.pop().map(|v| v.to_string()).unwrap_or_default().chars().collect();
    let source_str = args.pop().map(|v| v.to_string()).unwrap_or_default();
    let result = source_str
        .chars()
        .filter_map(|c| match from_str.iter().position(|&fc| fc == c) {
            Some(pos) => to_str.get(pos).copied(),
            None => Some(c),
        })
        .collect::<String>();
    Ok(XPathValue::String(result))
}

// --- Boolean Functions ---

fn func_boolean<N: Navigator>(mut args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    expect_args("boolean", &args, 1..=1)?;
    Ok(XPathValue::Boolean(args.pop().is_some_and(|v| v.to_bool())))
}

fn func_not<N: Navigator>(mut args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    expect_args("not", &args, 1..=1)?;
    Ok(XPathValue::Boolean(!args.pop().is_some_and(|v| v.to_bool())))
}

fn func_constant<N: Navigator>(function: &str, args: Vec<XPathValue<N>>, value: bool) -> Result<XPathValue<N>, XPathError> {
    expect_args(function, &args, 0..=0)?;
    Ok(XPathValue::Boolean(value))
}

// --- Number Functions ---

fn func_number<N: Navigator>(mut args: Vec<XPathValue<N>>, e_ctx: &EvaluationContext<N>) -> Result<XPathValue<N>, XPathError> {
    expect_args("number", &args, 0..=1)?;
    let n = match args.pop() {
        Some(arg) => arg.to_number(),
        None => string_to_number(&e_ctx.context_node.value()),
    };
    Ok(XPathValue::Number(n))
}

fn func_sum<N: Navigator>(mut args: Vec<XPathValue<N>>) -> Result<XPathValue<N>, XPathError> {
    expect_args("sum", &args, 1..=1)?;
    let nodes = args
        .pop()
        .map(|arg| expect_node_set(arg, "sum() argument"))
        .transpose()?
        .unwrap_or_default();
    let sum = nodes.iter().map(|node| string_to_number(&node.value())).sum();
    Ok(XPathValue::Number(sum))
}

fn func_rounding<N: Navigator>(function: &str, mut args: Vec<XPathValue<N>>, f: fn(f64) -> f64) -> Result<XPathValue<N>, XPathError> {
    expect_args(function, &args, 1..=1)?;
    let n = args.pop().map_or(f64::NAN, |v| v.to_number());
    Ok(XPathValue::Number(f(n)))
}

/// XPath 1.0 `round()`: halves round towards positive infinity.
fn xpath_round(n: f64) -> f64 {
    if n.is_nan() || n.is_infinite() || n == 0.0 {
        n
    } else {
        (n + 0.5).floor()
    }
}
