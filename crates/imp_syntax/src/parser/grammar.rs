//! The Imp grammar as a static table of productions.
//!
//! Each rule is a list of alternative productions; a production is an ordered
//! list of [`Slot`]s constraining a node's class, optionally its name, and
//! optionally its value. One generic evaluator answers both questions the
//! parser asks:
//!
//! - [`recognize`]: does a node list satisfy some production at its exact
//!   length (and under which rule)?
//! - [`is_viable_prefix_with`] / [`prefix_opens_with`]: could a node list keep
//!   growing into some production if the next node is appended, either filling
//!   the following slot outright or beginning it through the expression chain?

use crate::lexer::tokens::TokenClass;
use crate::tree::{NodeClass, ParseNode, RuleName};

/// Node category a slot accepts. Grammar slots only ever constrain the four
/// terminal categories and the nonterminals, so `skip` and free-form categories
/// have no slot form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotClass {
    Keyword,
    Identifier,
    Literal,
    Operation,
    Rule(RuleName),
}

/// One position of a production.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    class: SlotClass,
    name: Option<&'static str>,
    /// Accepted normalized values; empty means any value.
    values: &'static [&'static str],
}

impl Slot {
    fn matches(&self, node: &ParseNode) -> bool {
        let class_ok = match self.class {
            SlotClass::Keyword => node.class == NodeClass::Terminal(TokenClass::Keyword),
            SlotClass::Identifier => node.class == NodeClass::Terminal(TokenClass::Identifier),
            SlotClass::Literal => node.class == NodeClass::Terminal(TokenClass::Literal),
            SlotClass::Operation => node.class == NodeClass::Terminal(TokenClass::Operation),
            SlotClass::Rule(rule) => node.class == NodeClass::Rule(rule),
        };
        class_ok
            && self.name.is_none_or(|name| node.name == name)
            && (self.values.is_empty()
                || node.value_text().is_some_and(|v| self.values.contains(&v)))
    }

    /// Whether `node` can be the leftmost piece of what this slot accepts,
    /// short of matching it outright. Identifiers, literals and `factor`
    /// nodes climb the factor / mathExpression / boolExpression chain;
    /// keywords and operators never begin a rule slot.
    fn opens_with(&self, node: &ParseNode) -> bool {
        let SlotClass::Rule(target) = self.class else {
            return false;
        };
        let atom = matches!(
            node.class,
            NodeClass::Terminal(TokenClass::Identifier)
                | NodeClass::Terminal(TokenClass::Literal)
                | NodeClass::Rule(RuleName::Factor)
        );
        match target {
            RuleName::Factor => atom,
            RuleName::MathExpression | RuleName::BoolExpression => {
                atom || node.class == NodeClass::Rule(RuleName::MathExpression)
            }
            RuleName::Expression => {
                atom || matches!(
                    node.class,
                    NodeClass::Rule(RuleName::MathExpression)
                        | NodeClass::Rule(RuleName::BoolExpression)
                )
            }
            RuleName::Statement | RuleName::Program => {
                atom || matches!(
                    node.class,
                    NodeClass::Rule(RuleName::MathExpression)
                        | NodeClass::Rule(RuleName::BoolExpression)
                        | NodeClass::Rule(RuleName::Expression)
                )
            }
            // assign and while begin with keywords and relop with its
            // operator; nothing folds upward into those.
            RuleName::Assign | RuleName::While | RuleName::Relop => false,
        }
    }
}

const fn kw(name: &'static str) -> Slot {
    Slot {
        class: SlotClass::Keyword,
        name: Some(name),
        values: &[],
    }
}

const fn ident() -> Slot {
    Slot {
        class: SlotClass::Identifier,
        name: None,
        values: &[],
    }
}

const fn literal() -> Slot {
    Slot {
        class: SlotClass::Literal,
        name: None,
        values: &[],
    }
}

const fn op(name: &'static str) -> Slot {
    Slot {
        class: SlotClass::Operation,
        name: Some(name),
        values: &[],
    }
}

const fn op_valued(name: &'static str, values: &'static [&'static str]) -> Slot {
    Slot {
        class: SlotClass::Operation,
        name: Some(name),
        values,
    }
}

const fn rule(rule: RuleName) -> Slot {
    Slot {
        class: SlotClass::Rule(rule),
        name: None,
        values: &[],
    }
}

type Production = &'static [Slot];

const ASSIGN: &[Production] = &[
    &[kw("type"), ident(), op("assign"), rule(RuleName::Expression)],
    &[ident(), op("assign"), rule(RuleName::Expression)],
];

const WHILE: &[Production] = &[&[
    kw("while"),
    rule(RuleName::BoolExpression),
    kw("do"),
    rule(RuleName::Statement),
    kw("end"),
]];

const EXPRESSION: &[Production] = &[
    &[rule(RuleName::BoolExpression)],
    &[rule(RuleName::MathExpression)],
];

const STATEMENT: &[Production] = &[
    &[rule(RuleName::Expression)],
    &[rule(RuleName::While)],
    &[rule(RuleName::Assign)],
];

const RELOP: &[Production] = &[&[op("relop")]];

const PROGRAM: &[Production] = &[
    &[rule(RuleName::Statement)],
    &[rule(RuleName::Program), rule(RuleName::Statement)],
];

const BOOL_EXPRESSION: &[Production] = &[&[
    rule(RuleName::MathExpression),
    op("relop"),
    rule(RuleName::MathExpression),
]];

const MATH_EXPRESSION: &[Production] = &[
    &[
        rule(RuleName::MathExpression),
        op_valued("math", &["ADD", "SUB"]),
        rule(RuleName::MathExpression),
    ],
    &[rule(RuleName::Factor)],
];

const FACTOR: &[Production] = &[
    &[
        rule(RuleName::Factor),
        op_valued("math", &["MUL"]),
        rule(RuleName::Factor),
    ],
    &[ident()],
    &[literal()],
];

fn productions(rule: RuleName) -> &'static [Production] {
    match rule {
        RuleName::Assign => ASSIGN,
        RuleName::While => WHILE,
        RuleName::Expression => EXPRESSION,
        RuleName::Statement => STATEMENT,
        RuleName::Relop => RELOP,
        RuleName::Program => PROGRAM,
        RuleName::BoolExpression => BOOL_EXPRESSION,
        RuleName::MathExpression => MATH_EXPRESSION,
        RuleName::Factor => FACTOR,
    }
}

/// The rule (first in declaration order) some production of which matches
/// `nodes` at its exact length.
pub fn recognize(nodes: &[ParseNode]) -> Option<RuleName> {
    RuleName::ALL.into_iter().find(|r| {
        productions(*r).iter().any(|p| {
            p.len() == nodes.len() && nodes.iter().zip(p.iter()).all(|(n, s)| s.matches(n))
        })
    })
}

/// Whether `nodes` extended by `next` is still a viable prefix of some
/// production, without materializing the extended list.
pub fn is_viable_prefix_with(nodes: &[ParseNode], next: &ParseNode) -> bool {
    let len = nodes.len() + 1;
    RuleName::ALL.into_iter().any(|r| {
        productions(r).iter().any(|p| {
            p.len() >= len
                && nodes
                    .iter()
                    .chain(std::iter::once(next))
                    .zip(p.iter())
                    .all(|(n, s)| s.matches(n))
        })
    })
}

/// Whether `next` can begin the production slot that follows `nodes`.
///
/// This is the shift test for a node that does not fill the next slot
/// outright but will fold upward into something that does: an identifier or
/// literal awaiting an `expression` slot, say. A slot whose rule cannot start
/// from `next` refuses, so a suffix that is only a complete production with
/// nothing left to fill never absorbs the next statement's first token.
pub fn prefix_opens_with(nodes: &[ParseNode], next: &ParseNode) -> bool {
    RuleName::ALL.into_iter().any(|r| {
        productions(r).iter().any(|p| {
            p.len() > nodes.len()
                && nodes.iter().zip(p.iter()).all(|(n, s)| s.matches(n))
                && p[nodes.len()].opens_with(next)
        })
    })
}
