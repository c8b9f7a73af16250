//! Declaration linting for Imp parse trees.
//!
//! The language has a single flat scope. The linter walks the tree in
//! pre-order, collecting declared identifiers from `int x = ...` forms and
//! flagging two faults: re-declaring a name, and assigning to a name that
//! was never declared.

#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::fmt;

use imp_syntax::lexer::tokens::TokenClass;
use imp_syntax::tree::{NodeClass, ParseNode, RuleName};

// ====================================================================
// Findings
// ====================================================================

/// One declaration fault, pinned to the offending identifier token.
#[derive(Debug, Clone, PartialEq)]
pub struct LintError {
    pub message: String,
    pub line: u32,
    pub position: u32,
}

impl fmt::Display for LintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, position {}",
            self.message, self.line, self.position
        )
    }
}

// ====================================================================
// Entry point
// ====================================================================

/// Checks every assignment in the tree against the flat declaration scope.
///
/// Findings come back in source order. An empty vector means the program is
/// clean.
#[tracing::instrument(skip_all)]
pub fn lint(root: &ParseNode) -> Vec<LintError> {
    let mut declared = HashSet::new();
    let mut errors = Vec::new();
    visit(root, &mut declared, &mut errors);
    errors
}

fn visit(node: &ParseNode, declared: &mut HashSet<String>, errors: &mut Vec<LintError>) {
    if node.class == NodeClass::Rule(RuleName::Assign) {
        check_assign(node, declared, errors);
    }
    for child in &node.children {
        visit(child, declared, errors);
    }
}

fn check_assign(node: &ParseNode, declared: &mut HashSet<String>, errors: &mut Vec<LintError>) {
    let Some(first) = node.children.first() else {
        return;
    };
    match first.class {
        // Declaring form: `int x = ...`. The identifier sits after the
        // type keyword.
        NodeClass::Terminal(TokenClass::Keyword) => {
            let Some(target) = node.children.get(1) else {
                return;
            };
            let Some(name) = target.value_text() else {
                return;
            };
            if !declared.insert(name.to_string()) {
                errors.push(LintError {
                    message: format!("Identifier {name} has already been declared"),
                    line: target.line,
                    position: target.position,
                });
            }
        }
        // Plain form: `x = ...` requires a prior declaration.
        NodeClass::Terminal(TokenClass::Identifier) => {
            let Some(name) = first.value_text() else {
                return;
            };
            if !declared.contains(name) {
                errors.push(LintError {
                    message: format!("Identifier {name} hasn't been declared"),
                    line: first.line,
                    position: first.position,
                });
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imp_syntax::lexer::LexicalAnalyzer;
    use imp_syntax::parser::parse;
    use imp_syntax::patterns::PatternTable;

    fn lint_source(source: &str) -> Vec<LintError> {
        let analyzer = LexicalAnalyzer::new(PatternTable::builtin());
        let analysis = analyzer.analyze(source).unwrap();
        assert!(analysis.errors.is_empty(), "lexing {source:?} failed");
        let root = parse(analysis.tokens).unwrap();
        lint(&root)
    }

    #[test]
    fn declare_then_assign_is_clean() {
        assert!(lint_source("int a = 1 a = 2").is_empty());
    }

    #[test]
    fn assignment_without_declaration_is_flagged() {
        let errors = lint_source("a = 1");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Identifier a hasn't been declared");
        assert_eq!((errors[0].line, errors[0].position), (1, 1));
    }

    #[test]
    fn double_declaration_is_flagged() {
        let errors = lint_source("int a = 1 int a = 2");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Identifier a has already been declared");
        assert_eq!((errors[0].line, errors[0].position), (1, 15));
    }

    #[test]
    fn loop_bodies_share_the_outer_scope() {
        assert!(lint_source("int a = 1 while a < 3 do a = a + 1 end").is_empty());
    }

    #[test]
    fn statements_after_a_loop_share_the_scope() {
        assert!(lint_source("int a = 1 while a < 3 do a = a + 1 end a = 5").is_empty());
    }

    #[test]
    fn assignment_inside_a_loop_is_checked() {
        let errors = lint_source("int a = 1 while a < 3 do b = 2 end");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Identifier b hasn't been declared");
    }

    #[test]
    fn findings_come_back_in_source_order() {
        let errors = lint_source("a = 1 int b = 2 int b = 3");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("a hasn't"));
        assert!(errors[1].message.contains("b has already"));
    }
}
