//! Parse tree node types.
//!
//! A [`ParseNode`] is either a token leaf (no children) or an internal node
//! created by a grammar reduction. Nodes are built bottom-up and never mutated
//! after a reduction completes.

use std::fmt;

use crate::lexer::tokens::{Token, TokenClass, TokenValue};

/// The grammar's nonterminals, a closed set.
///
/// Declaration order doubles as recognition priority: when a node list satisfies
/// several rules, the first one in this order names the reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleName {
    Assign,
    While,
    Expression,
    Statement,
    Relop,
    Program,
    BoolExpression,
    MathExpression,
    Factor,
}

impl RuleName {
    pub const ALL: [RuleName; 9] = [
        RuleName::Assign,
        RuleName::While,
        RuleName::Expression,
        RuleName::Statement,
        RuleName::Relop,
        RuleName::Program,
        RuleName::BoolExpression,
        RuleName::MathExpression,
        RuleName::Factor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleName::Assign => "assign",
            RuleName::While => "while",
            RuleName::Expression => "expression",
            RuleName::Statement => "statement",
            RuleName::Relop => "relop",
            RuleName::Program => "program",
            RuleName::BoolExpression => "boolExpression",
            RuleName::MathExpression => "mathExpression",
            RuleName::Factor => "factor",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class of a parse tree node: a terminal token category at the leaves, a
/// grammar nonterminal everywhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeClass {
    Terminal(TokenClass),
    Rule(RuleName),
}

impl NodeClass {
    pub fn is_rule(&self, rule: RuleName) -> bool {
        *self == NodeClass::Rule(rule)
    }

    pub fn is_terminal(&self, class: TokenClass) -> bool {
        matches!(self, NodeClass::Terminal(c) if *c == class)
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeClass::Terminal(class) => write!(f, "{class}"),
            NodeClass::Rule(rule) => write!(f, "{rule}"),
        }
    }
}

/// A parse tree node. `line`/`position` come from the first token the subtree
/// covers.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    pub name: String,
    pub class: NodeClass,
    pub line: u32,
    pub position: u32,
    pub value: Option<TokenValue>,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    /// A token becomes a leaf node with no children.
    pub fn leaf(token: Token) -> Self {
        Self {
            name: token.name,
            class: NodeClass::Terminal(token.class),
            line: token.line,
            position: token.position,
            value: token.value,
            children: Vec::new(),
        }
    }

    /// An internal node produced by reducing `children` under `rule`.
    pub fn reduction(rule: RuleName, children: Vec<ParseNode>) -> Self {
        let (line, position) = children
            .first()
            .map(|first| (first.line, first.position))
            .unwrap_or((0, 0));
        Self {
            name: rule.as_str().to_string(),
            class: NodeClass::Rule(rule),
            line,
            position,
            value: None,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The node's textual value, if it carries one.
    pub fn value_text(&self) -> Option<&str> {
        self.value.as_ref().and_then(TokenValue::as_text)
    }
}
