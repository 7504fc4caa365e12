//! Syntax tree produced by [`crate::parser`] and walked by [`crate::engine`].

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(String),
    Number(f64),
    Path(LocationPath),
    /// A primary expression narrowed by predicates, e.g. `(//phones)[last()]`.
    Filter {
        primary: Box<Expression>,
        predicates: Vec<Expression>,
    },
    Call {
        function: String,
        args: Vec<Expression>,
    },
    Binary {
        op: BinaryOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Negate(Box<Expression>),
}

impl Expression {
    pub fn binary(op: BinaryOperator, lhs: Expression, rhs: Expression) -> Self {
        Expression::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Union,
}

impl BinaryOperator {
    /// The operator as written in an expression.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Or => "or",
            BinaryOperator::And => "and",
            BinaryOperator::Eq => "=",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "div",
            BinaryOperator::Mod => "mod",
            BinaryOperator::Union => "|",
        }
    }
}

/// Where a location path starts before its first step.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOrigin {
    /// The context node, for relative paths like `name`.
    Context,
    /// The navigator's root, for `/name` and `//name`.
    Root,
    /// The node-set produced by another expression, as in `(//people)[1]/name`.
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    pub origin: PathOrigin,
    pub steps: Vec<Step>,
}

impl LocationPath {
    pub fn new(origin: PathOrigin, steps: Vec<Step>) -> Self {
        Self { origin, steps }
    }
}

/// One step of a location path, like `child::foo[position() > 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Expression>,
}

impl Step {
    /// A predicate-free `axis::node()` step, which is what `.`, `..` and `//` stand for.
    pub fn any_node(axis: Axis) -> Self {
        Step {
            axis,
            node_test: NodeTest::Node,
            predicates: Vec::new(),
        }
    }

    pub fn descendant_or_self() -> Self {
        Self::any_node(Axis::DescendantOrSelf)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Attribute,
    Parent,
    Ancestor,
    AncestorOrSelf,
    SelfAxis,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
}

impl Axis {
    /// Looks up an axis by its name in `axis::test` syntax.
    pub fn from_name(name: &str) -> Option<Self> {
        let axis = match name {
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "attribute" => Axis::Attribute,
            "parent" => Axis::Parent,
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "self" => Axis::SelfAxis,
            "following-sibling" => Axis::FollowingSibling,
            "preceding-sibling" => Axis::PrecedingSibling,
            "following" => Axis::Following,
            "preceding" => Axis::Preceding,
            _ => return None,
        };
        Some(axis)
    }

    /// Reverse axes number their proximity positions backwards from the context node.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Ancestor | Axis::AncestorOrSelf | Axis::PrecedingSibling | Axis::Preceding
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// An element name. Prefixed names compare on their full text.
    Name(String),
    /// `*`
    Any,
    /// `text()`
    Text,
    /// `node()`
    Node,
    /// `comment()`, which never matches a projected tree.
    Comment,
    /// `processing-instruction()`, which never matches a projected tree.
    ProcessingInstruction,
}

impl NodeTest {
    /// The test written as `name()`, if `name` is one of the node kinds.
    pub fn from_kind_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(NodeTest::Text),
            "node" => Some(NodeTest::Node),
            "comment" => Some(NodeTest::Comment),
            "processing-instruction" => Some(NodeTest::ProcessingInstruction),
            _ => None,
        }
    }
}
