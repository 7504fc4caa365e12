//! The query façade: compile through the selector cache, evaluate with a
//! navigator rooted at the given node, hand back matched nodes.

use crate::cache::SelectorCache;
use crate::error::{ProtoQueryError, Result};
use crate::navigator::NodeNavigator;
use crate::node::Node;
use crate::selector::Selector;
use log::warn;
use protoquery_xpath::{EvaluationContext, XPathError, XPathValue};

/// The result of [`evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue<'d> {
    Nodes(Vec<Node<'d>>),
    String(String),
    Number(f64),
    Boolean(bool),
}

/// Every node matched by `expr`, in document order and without duplicates.
///
/// `expr` must evaluate to a node-set; a scalar result is an
/// [`ProtoQueryError::EvaluationError`].
pub fn query_all<'d>(node: impl Into<Node<'d>>, expr: &str) -> Result<Vec<Node<'d>>> {
    let selector = SelectorCache::global().get(expr)?;
    query_selector_all(node, &selector)
}

/// The first node matched by `expr`, or `None` when nothing matches.
pub fn query<'d>(node: impl Into<Node<'d>>, expr: &str) -> Result<Option<Node<'d>>> {
    let selector = SelectorCache::global().get(expr)?;
    query_selector(node, &selector)
}

/// Like [`query_all`], with errors logged and reported as no match.
pub fn find<'d>(node: impl Into<Node<'d>>, expr: &str) -> Vec<Node<'d>> {
    query_all(node, expr).unwrap_or_else(|e| {
        warn!("find('{}') failed: {}", expr, e);
        Vec::new()
    })
}

/// Like [`query`], with errors logged and reported as no match.
pub fn find_one<'d>(node: impl Into<Node<'d>>, expr: &str) -> Option<Node<'d>> {
    query(node, expr).unwrap_or_else(|e| {
        warn!("find_one('{}') failed: {}", expr, e);
        None
    })
}

/// Runs a precompiled selector, bypassing the cache.
pub fn query_selector_all<'d>(node: impl Into<Node<'d>>, selector: &Selector) -> Result<Vec<Node<'d>>> {
    match run(node.into(), selector)? {
        XPathValue::NodeSet(navigators) => Ok(navigators.iter().map(NodeNavigator::current).collect()),
        other => Err(ProtoQueryError::EvaluationError {
            expression: selector.as_str().to_string(),
            source: XPathError::TypeError(format!("expected a node-set, got '{}'", other)),
        }),
    }
}

pub fn query_selector<'d>(node: impl Into<Node<'d>>, selector: &Selector) -> Result<Option<Node<'d>>> {
    Ok(query_selector_all(node, selector)?.into_iter().next())
}

/// Evaluates an expression of any result type, e.g. `count(//people)`.
pub fn evaluate<'d>(node: impl Into<Node<'d>>, expr: &str) -> Result<QueryValue<'d>> {
    let selector = SelectorCache::global().get(expr)?;
    let value = match run(node.into(), &selector)? {
        XPathValue::NodeSet(navigators) => QueryValue::Nodes(navigators.iter().map(NodeNavigator::current).collect()),
        XPathValue::String(s) => QueryValue::String(s),
        XPathValue::Number(n) => QueryValue::Number(n),
        XPathValue::Boolean(b) => QueryValue::Boolean(b),
    };
    Ok(value)
}

fn run<'d>(node: Node<'d>, selector: &Selector) -> Result<XPathValue<NodeNavigator<'d>>> {
    let e_ctx = EvaluationContext::for_node(NodeNavigator::new(node));
    protoquery_xpath::evaluate(selector.expression(), &e_ctx).map_err(|source| ProtoQueryError::EvaluationError {
        expression: selector.as_str().to_string(),
        source,
    })
}
