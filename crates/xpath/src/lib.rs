//! An XPath 1.0 engine that walks trees exclusively through a stateful
//! [`Navigator`] cursor, so any tree-shaped data that can move a cursor
//! between parent, child and sibling positions can be queried.

pub mod ast;
pub mod axes;
pub mod engine;
pub mod error;
pub mod functions;
pub mod navigator;
pub mod operators;
pub mod parser;

pub use ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, PathOrigin, Step};
pub use engine::{EvaluationContext, XPathValue, evaluate};
pub use error::XPathError;
pub use navigator::{Navigator, NodeType};
pub use parser::parse_expression;

// The mock tree, for tests in crates that implement `Navigator`.
pub use navigator::tests;
