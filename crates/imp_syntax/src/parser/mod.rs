//! Shift-reduce parser over the token stream.
//!
//! The parser keeps a stack of parse nodes and, for each incoming token,
//! scans ever-deeper stack suffixes. A suffix that stays a viable prefix of
//! some production once the incoming node is appended wins immediately and
//! the node is shifted; so does a suffix whose next unfilled slot the
//! incoming node can begin through the expression chain. Otherwise the
//! deepest suffix recognized as a complete production is reduced and the
//! scan restarts. When neither applies, the input is rejected.

use thiserror::Error;
use tracing::trace;

use crate::lexer::tokens::Token;
use crate::tree::{NodeClass, ParseNode, RuleName};

pub mod grammar;

use grammar::{is_viable_prefix_with, prefix_opens_with, recognize};

// ====================================================================
// Errors
// ====================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("cannot parse an empty token stream")]
    EmptyInput,
    /// No shift applies and no stack suffix reduces.
    #[error("unexpected {name} at line {line}, position {position}")]
    Stuck {
        name: String,
        line: u32,
        position: u32,
    },
    /// Input consumed but the stack never collapsed to a single rule node.
    #[error("could not reduce {name} at line {line} into a program")]
    Unreduced { name: String, line: u32 },
}

// ====================================================================
// Entry point
// ====================================================================

/// Parses a token stream into a single parse tree.
///
/// The root is the recognized rule for the whole input: `assign` or `while`
/// for a lone statement, `program` for a statement sequence.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: Vec<Token>) -> Result<ParseNode, ParseError> {
    let mut nodes = tokens.into_iter().map(ParseNode::leaf);
    let first = nodes.next().ok_or(ParseError::EmptyInput)?;
    let mut parser = Parser { stack: vec![first] };
    for node in nodes {
        parser.apply(node)?;
    }
    parser.finish()
}

// ====================================================================
// Parser core
// ====================================================================

enum Step {
    Shift,
    Reduce { depth: usize, rule: RuleName },
}

struct Parser {
    stack: Vec<ParseNode>,
}

impl Parser {
    /// Consumes one node, reducing the stack as far as needed first.
    fn apply(&mut self, incoming: ParseNode) -> Result<(), ParseError> {
        loop {
            // A lone program node accumulates statements; any follower starts
            // the next statement, so shift it unconditionally.
            if self.stack.len() == 1
                && self.stack[0].class == NodeClass::Rule(RuleName::Program)
            {
                self.stack.push(incoming);
                return Ok(());
            }

            let mut step = None;
            for depth in 1..=self.stack.len() {
                let suffix = &self.stack[self.stack.len() - depth..];
                if is_viable_prefix_with(suffix, &incoming) {
                    step = Some(Step::Shift);
                    break;
                }
                // An atom that can begin the suffix's next unfilled slot
                // still belongs to the statement being built. A suffix with
                // no open slot the atom can begin reduces instead, so a
                // second statement's leading identifier is never shifted
                // onto a finished one.
                if prefix_opens_with(suffix, &incoming) {
                    step = Some(Step::Shift);
                    break;
                }
                if let Some(rule) = recognize(suffix) {
                    // Keep scanning: a deeper suffix may recognize too, and
                    // the deepest recognition wins.
                    step = Some(Step::Reduce { depth, rule });
                }
            }

            match step {
                Some(Step::Shift) => {
                    self.stack.push(incoming);
                    return Ok(());
                }
                Some(Step::Reduce { depth, rule }) => self.reduce_top(depth, rule),
                None => {
                    return Err(ParseError::Stuck {
                        name: incoming.name.clone(),
                        line: incoming.line,
                        position: incoming.position,
                    });
                }
            }
        }
    }

    /// Drains the stack after the last token: reduce the longest recognized
    /// trailing slice until one node remains, then fold leftover expression
    /// chains up to their statement form.
    fn finish(mut self) -> Result<ParseNode, ParseError> {
        while self.stack.len() > 1 {
            let mut best = None;
            for depth in 1..=self.stack.len() {
                let suffix = &self.stack[self.stack.len() - depth..];
                if let Some(rule) = recognize(suffix) {
                    best = Some(Step::Reduce { depth, rule });
                }
            }
            match best {
                Some(Step::Reduce { depth, rule }) => self.reduce_top(depth, rule),
                _ => {
                    let top = self
                        .stack
                        .last()
                        .expect("INVARIANT: finish loop runs with at least two nodes");
                    return Err(ParseError::Stuck {
                        name: top.name.clone(),
                        line: top.line,
                        position: top.position,
                    });
                }
            }
        }

        // A lone factor or mathExpression still needs wrapping up to its
        // statement form; assign, while and program are already roots.
        loop {
            let root = &self.stack[0];
            if matches!(
                root.class,
                NodeClass::Rule(RuleName::Assign)
                    | NodeClass::Rule(RuleName::While)
                    | NodeClass::Rule(RuleName::Program)
            ) {
                break;
            }
            match recognize(&self.stack) {
                Some(rule) => self.reduce_top(1, rule),
                None => break,
            }
        }

        let root = self
            .stack
            .pop()
            .expect("INVARIANT: drain loop leaves exactly one node");
        match root.class {
            NodeClass::Rule(_) => Ok(root),
            NodeClass::Terminal(_) => Err(ParseError::Unreduced {
                name: root.name,
                line: root.line,
            }),
        }
    }

    fn reduce_top(&mut self, depth: usize, rule: RuleName) {
        let children = self.stack.split_off(self.stack.len() - depth);
        trace!(rule = %rule, depth, "reduce");
        self.stack.push(ParseNode::reduction(rule, children));
    }
}
