use crate::error::{ProtoQueryError, Result};
use protoquery_xpath::{Expression, XPathError, parse_expression};

/// A compiled, reusable query expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    source: String,
    expression: Expression,
}

impl Selector {
    /// Compiles `source`, failing with [`ProtoQueryError::InvalidExpression`] when it does not parse.
    pub fn compile(source: &str) -> Result<Self> {
        let expression = parse_expression(source).map_err(|e| {
            let message = match e {
                XPathError::XPathParse(_, message) => message,
                other => other.to_string(),
            };
            ProtoQueryError::InvalidExpression {
                expression: source.to_string(),
                message,
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            expression,
        })
    }

    /// The text the selector was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_keeps_source() {
        let selector = Selector::compile("//people[1]/name").unwrap();
        assert_eq!(selector.as_str(), "//people[1]/name");
        assert!(matches!(selector.expression(), Expression::Path(_)));
    }

    #[test]
    fn test_compile_rejects_invalid_text() {
        let err = Selector::compile("//people[").unwrap_err();
        assert!(matches!(
            err,
            ProtoQueryError::InvalidExpression { ref expression, .. } if expression == "//people["
        ));
    }
}
