//! Binary operators with XPath 1.0 comparison and arithmetic semantics.

use crate::ast::BinaryOperator;
use crate::engine::{XPathValue, expect_node_set, string_to_number};
use crate::error::XPathError;
use crate::navigator::Navigator;
use std::collections::HashSet;

/// A single value pulled out of an operand for comparison.
#[derive(Debug, Clone)]
enum Atom {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Atom {
    fn number(&self) -> f64 {
        match self {
            Atom::String(s) => string_to_number(s),
            Atom::Number(n) => *n,
            Atom::Boolean(b) => f64::from(u8::from(*b)),
        }
    }

    fn boolean(&self) -> bool {
        match self {
            Atom::String(s) => !s.is_empty(),
            Atom::Number(n) => *n != 0.0 && !n.is_nan(),
            Atom::Boolean(b) => *b,
        }
    }
}

/// Evaluates every operator except the short-circuiting `and`/`or`.
pub fn evaluate<N: Navigator>(
    op: BinaryOperator,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    match op {
        BinaryOperator::Or => Ok(XPathValue::Boolean(left.to_bool() || right.to_bool())),
        BinaryOperator::And => Ok(XPathValue::Boolean(left.to_bool() && right.to_bool())),
        BinaryOperator::Eq
        | BinaryOperator::Ne
        | BinaryOperator::Lt
        | BinaryOperator::Le
        | BinaryOperator::Gt
        | BinaryOperator::Ge => Ok(XPathValue::Boolean(compare(op, &left, &right))),
        BinaryOperator::Add => Ok(arithmetic(left, right, |a, b| a + b)),
        BinaryOperator::Sub => Ok(arithmetic(left, right, |a, b| a - b)),
        BinaryOperator::Mul => Ok(arithmetic(left, right, |a, b| a * b)),
        BinaryOperator::Div => Ok(arithmetic(left, right, |a, b| a / b)),
        // Truncating remainder, which is what XPath's `mod` specifies.
        BinaryOperator::Mod => Ok(arithmetic(left, right, |a, b| a % b)),
        BinaryOperator::Union => union(left, right),
    }
}

fn arithmetic<N: Navigator>(left: XPathValue<N>, right: XPathValue<N>, f: impl Fn(f64, f64) -> f64) -> XPathValue<N> {
    XPathValue::Number(f(left.to_number(), right.to_number()))
}

fn union<N: Navigator>(left: XPathValue<N>, right: XPathValue<N>) -> Result<XPathValue<N>, XPathError> {
    let left = expect_node_set(left, "left operand of '|'")?;
    let right = expect_node_set(right, "right operand of '|'")?;
    let mut seen = HashSet::new();
    let mut merged: Vec<N> = left
        .into_iter()
        .chain(right)
        .filter(|node| seen.insert(node.clone()))
        .collect();
    merged.sort();
    Ok(XPathValue::NodeSet(merged))
}

fn atoms<N: Navigator>(value: &XPathValue<N>) -> Vec<Atom> {
    match value {
        XPathValue::NodeSet(nodes) => nodes.iter().map(|n| Atom::String(n.value())).collect(),
        XPathValue::String(s) => vec![Atom::String(s.clone())],
        XPathValue::Number(n) => vec![Atom::Number(*n)],
        XPathValue::Boolean(b) => vec![Atom::Boolean(*b)],
    }
}

/// Comparison follows the XPath 1.0 rules: a node-set compared with a boolean
/// is first converted to a boolean, otherwise the comparison holds if it holds
/// for any pair of atoms drawn from the two operands.
fn compare<N: Navigator>(op: BinaryOperator, left: &XPathValue<N>, right: &XPathValue<N>) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(_), XPathValue::Boolean(b)) => {
            compare_atoms(op, &Atom::Boolean(left.to_bool()), &Atom::Boolean(*b))
        }
        (XPathValue::Boolean(b), XPathValue::NodeSet(_)) => {
            compare_atoms(op, &Atom::Boolean(*b), &Atom::Boolean(right.to_bool()))
        }
        _ => {
            let left_atoms = atoms(left);
            let right_atoms = atoms(right);
            left_atoms
                .iter()
                .any(|l| right_atoms.iter().any(|r| compare_atoms(op, l, r)))
        }
    }
}

fn compare_atoms(op: BinaryOperator, left: &Atom, right: &Atom) -> bool {
    match op {
        BinaryOperator::Eq | BinaryOperator::Ne => {
            let equal = match (left, right) {
                (Atom::Boolean(_), _) | (_, Atom::Boolean(_)) => left.boolean() == right.boolean(),
                (Atom::Number(_), _) | (_, Atom::Number(_)) => left.number() == right.number(),
                (Atom::String(l), Atom::String(r)) => l == r,
            };
            if op == BinaryOperator::Eq { equal } else { !equal }
        }
        BinaryOperator::Lt => left.number() < right.number(),
        BinaryOperator::Le => left.number() <= right.number(),
        BinaryOperator::Gt => left.number() > right.number(),
        BinaryOperator::Ge => left.number() >= right.number(),
        _ => false,
    }
}
