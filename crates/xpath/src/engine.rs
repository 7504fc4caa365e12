//! The evaluation engine for executing a parsed XPath AST through a [`Navigator`].

use super::ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, PathOrigin, Step};
use super::{axes, functions, operators};
use crate::error::XPathError;
use crate::navigator::{Navigator, NodeType};
use std::collections::HashSet;
use std::fmt;

/// Represents the possible result types of an XPath expression evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue<N> {
    NodeSet(Vec<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<N: Navigator> XPathValue<N> {
    /// Coerces the XPath value to a boolean as per XPath 1.0 rules.
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    /// Coerces the XPath value to a number as per XPath 1.0 rules.
    pub fn to_number(&self) -> f64 {
        match self {
            XPathValue::Number(n) => *n,
            XPathValue::String(s) => string_to_number(s),
            XPathValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            XPathValue::NodeSet(nodes) => nodes
                .first()
                .map_or(f64::NAN, |n| string_to_number(&n.value())),
        }
    }
}

impl<N: Navigator> fmt::Display for XPathValue<N> {
    /// Coerces the XPath value to a string as per XPath 1.0 rules.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(nodes) => match nodes.first() {
                Some(node) => f.write_str(&node.value()),
                None => Ok(()),
            },
            XPathValue::String(s) => f.write_str(s),
            XPathValue::Number(n) => f.write_str(&number_to_string(*n)),
            XPathValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Parses a string the way XPath's `number()` does: optional minus, digits and
/// at most one decimal point, surrounded by whitespace. Anything else is NaN.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let well_formed = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().filter(|&c| c == '.').count() <= 1
        && digits != ".";
    if well_formed {
        trimmed.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Formats a number the way XPath's `string()` does.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A container for all state needed during expression evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationContext<N> {
    pub context_node: N,
    pub root_node: N,
    pub context_position: usize, // 1-based index
    pub context_size: usize,
}

impl<N: Navigator> EvaluationContext<N> {
    pub fn new(context_node: N, root_node: N, context_position: usize, context_size: usize) -> Self {
        Self {
            context_node,
            root_node,
            context_position,
            context_size,
        }
    }

    /// A top-level context for `node`: position and size 1, root taken from the navigator.
    pub fn for_node(node: N) -> Self {
        let mut root = node.copy();
        root.move_to_root();
        Self::new(node, root, 1, 1)
    }

    fn with_focus(&self, node: N, position: usize, size: usize) -> Self {
        Self::new(node, self.root_node.copy(), position, size)
    }
}

/// Evaluates a compiled expression and returns a concrete `XPathValue`.
pub fn evaluate<N: Navigator>(
    expr: &Expression,
    e_ctx: &EvaluationContext<N>,
) -> Result<XPathValue<N>, XPathError> {
    match expr {
        Expression::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expression::Number(n) => Ok(XPathValue::Number(*n)),
        Expression::Path(path) => Ok(XPathValue::NodeSet(evaluate_location_path(path, e_ctx)?)),
        Expression::Filter { primary, predicates } => {
            let mut nodes = expect_node_set(evaluate(primary, e_ctx)?, "filter expression")?;
            nodes.sort();
            nodes.dedup();
            Ok(XPathValue::NodeSet(apply_predicates(nodes, predicates, e_ctx)?))
        }
        Expression::Call { function, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, e_ctx))
                .collect::<Result<Vec<_>, _>>()?;
            functions::evaluate_function(function, args, e_ctx)
        }
        // `and` and `or` only look at the right operand when they have to.
        Expression::Binary {
            op: BinaryOperator::Or,
            lhs,
            rhs,
        } => Ok(XPathValue::Boolean(
            evaluate(lhs, e_ctx)?.to_bool() || evaluate(rhs, e_ctx)?.to_bool(),
        )),
        Expression::Binary {
            op: BinaryOperator::And,
            lhs,
            rhs,
        } => Ok(XPathValue::Boolean(
            evaluate(lhs, e_ctx)?.to_bool() && evaluate(rhs, e_ctx)?.to_bool(),
        )),
        Expression::Binary { op, lhs, rhs } => operators::evaluate(*op, evaluate(lhs, e_ctx)?, evaluate(rhs, e_ctx)?),
        Expression::Negate(operand) => Ok(XPathValue::Number(-evaluate(operand, e_ctx)?.to_number())),
    }
}

pub(crate) fn expect_node_set<N>(value: XPathValue<N>, what: &str) -> Result<Vec<N>, XPathError> {
    match value {
        XPathValue::NodeSet(nodes) => Ok(nodes),
        XPathValue::String(_) => Err(XPathError::TypeError(format!("{} must be a node-set, got a string", what))),
        XPathValue::Number(_) => Err(XPathError::TypeError(format!("{} must be a node-set, got a number", what))),
        XPathValue::Boolean(_) => Err(XPathError::TypeError(format!("{} must be a node-set, got a boolean", what))),
    }
}

fn evaluate_location_path<N: Navigator>(
    path: &LocationPath,
    e_ctx: &EvaluationContext<N>,
) -> Result<Vec<N>, XPathError> {
    let initial_context = match &path.origin {
        PathOrigin::Context => vec![e_ctx.context_node.copy()],
        PathOrigin::Root => vec![e_ctx.root_node.copy()],
        PathOrigin::Expression(start) => expect_node_set(evaluate(start, e_ctx)?, "path start")?,
    };

    let mut current_nodes = initial_context;
    for step in &path.steps {
        current_nodes = evaluate_step(step, &current_nodes, e_ctx)?;
    }
    Ok(current_nodes)
}

/// Evaluates a single step for every context node, then merges the per-node
/// results into one identity-deduplicated node-set in document order.
fn evaluate_step<N: Navigator>(
    step: &Step,
    context_nodes: &[N],
    e_ctx: &EvaluationContext<N>,
) -> Result<Vec<N>, XPathError> {
    let mut seen = HashSet::new();
    let mut result_nodes = Vec::new();

    for node in context_nodes {
        let axis_nodes = axes::collect(step.axis, node);
        let tested_nodes = filter_by_node_test(axis_nodes, &step.node_test, step.axis);
        // Predicates see proximity positions, so they run per context node.
        for selected in apply_predicates(tested_nodes, &step.predicates, e_ctx)? {
            if seen.insert(selected.clone()) {
                result_nodes.push(selected);
            }
        }
    }

    result_nodes.sort();
    Ok(result_nodes)
}

fn filter_by_node_test<N: Navigator>(nodes: Vec<N>, test: &NodeTest, axis: Axis) -> Vec<N> {
    nodes
        .into_iter()
        .filter(|node| match test {
            NodeTest::Any => axis != Axis::Attribute && node.node_type() == NodeType::Element,
            NodeTest::Name(name) => node.node_type() == NodeType::Element && node.local_name() == name,
            NodeTest::Text => node.node_type() == NodeType::Text,
            NodeTest::Node => true,
            NodeTest::Comment | NodeTest::ProcessingInstruction => false,
        })
        .collect()
}

/// Filters a set of nodes by applying a series of predicates, each against the
/// survivors of the previous one.
fn apply_predicates<N: Navigator>(
    nodes: Vec<N>,
    predicates: &[Expression],
    e_ctx: &EvaluationContext<N>,
) -> Result<Vec<N>, XPathError> {
    let mut final_nodes = nodes;
    for predicate in predicates {
        let context_size = final_nodes.len();
        let mut predicate_results = Vec::with_capacity(context_size);
        for (i, node) in final_nodes.into_iter().enumerate() {
            let predicate_e_ctx = e_ctx.with_focus(node.copy(), i + 1, context_size);
            let keep = match evaluate(predicate, &predicate_e_ctx)? {
                XPathValue::Number(n) => n == (i + 1) as f64,
                other => other.to_bool(),
            };
            if keep {
                predicate_results.push(node);
            }
        }
        final_nodes = predicate_results;
    }
    Ok(final_nodes)
}
