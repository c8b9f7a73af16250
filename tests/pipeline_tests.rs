//! Integration tests for the Imp checker pipeline

use imp::semantics::lint;
use imp::syntax::lexer::{Analysis, LexicalAnalyzer};
use imp::syntax::lexer::tokens::{TokenClass, TokenValue};
use imp::syntax::parser::{self, ParseError};
use imp::syntax::patterns::PatternTable;
use imp::syntax::tree::{NodeClass, ParseNode, RuleName};

/// Helper to run the lexer with the built-in pattern table
fn analyze(source: &str) -> Analysis {
    let analyzer = LexicalAnalyzer::new(PatternTable::builtin());
    analyzer.analyze(source).expect("built-in table is unambiguous")
}

/// Helper to run the full pipeline and return the tree plus lint findings
fn check(source: &str) -> (ParseNode, Vec<imp::semantics::LintError>) {
    let analysis = analyze(source);
    assert!(
        analysis.errors.is_empty(),
        "unexpected lexical errors for {source:?}: {:?}",
        analysis.errors
    );
    let root = parser::parse(analysis.tokens).expect("source should parse");
    let findings = lint(&root);
    (root, findings)
}

// =============================================================================
// Tokenization
// =============================================================================

#[test]
fn tokenizes_a_declaration() {
    let analysis = analyze("int a = 1");
    assert!(analysis.errors.is_empty());

    let names: Vec<&str> = analysis.tokens.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["type", "identifier", "assign", "literal"]);

    let positions: Vec<u32> = analysis.tokens.iter().map(|t| t.position).collect();
    assert_eq!(positions, [1, 5, 7, 9]);

    assert_eq!(analysis.tokens[0].class, TokenClass::Keyword);
    assert_eq!(
        analysis.tokens[3].value,
        Some(TokenValue::Number(1.0))
    );
}

#[test]
fn relational_operators_carry_symbolic_values() {
    let analysis = analyze("a <= 2");
    assert_eq!(analysis.tokens[1].name, "relop");
    assert_eq!(
        analysis.tokens[1].value,
        Some(TokenValue::Text("LE".to_string()))
    );
}

#[test]
fn unmatched_input_becomes_one_maximal_error() {
    let analysis = analyze("in._t a = 1");
    assert_eq!(analysis.errors.len(), 1);
    assert_eq!(analysis.errors[0].value, "._");
    assert_eq!(analysis.errors[0].from_position, 3);
    // The rest of the line still tokenizes.
    assert_eq!(analysis.tokens.len(), 5);
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn a_single_declaration_parses_to_assign() {
    let (root, findings) = check("int a = 1");
    assert_eq!(root.class, NodeClass::Rule(RuleName::Assign));
    assert!(findings.is_empty());
}

#[test]
fn a_statement_sequence_parses_to_program() {
    let (root, _) = check("int a = 1\nint b = 2");
    assert_eq!(root.class, NodeClass::Rule(RuleName::Program));
    assert_eq!(root.children.len(), 2);
}

#[test]
fn a_while_loop_parses_with_its_full_shape() {
    let (root, findings) = check("int a = 1 while a < 3 do a = a + 1 end");
    assert!(findings.is_empty());
    assert_eq!(root.class, NodeClass::Rule(RuleName::Program));

    let statement = &root.children[1];
    assert_eq!(statement.class, NodeClass::Rule(RuleName::Statement));
    let while_node = &statement.children[0];
    assert_eq!(while_node.class, NodeClass::Rule(RuleName::While));
    assert_eq!(while_node.children.len(), 5);
    assert_eq!(
        while_node.children[1].class,
        NodeClass::Rule(RuleName::BoolExpression)
    );
}

#[test]
fn a_lone_while_loop_parses_to_while() {
    let analysis = analyze("while a < 2 do a = a + 1 end");
    assert!(analysis.errors.is_empty());
    let root = parser::parse(analysis.tokens).unwrap();
    assert_eq!(root.class, NodeClass::Rule(RuleName::While));

    let child_classes: Vec<&NodeClass> = root.children.iter().map(|c| &c.class).collect();
    assert_eq!(
        child_classes,
        [
            &NodeClass::Terminal(TokenClass::Keyword),
            &NodeClass::Rule(RuleName::BoolExpression),
            &NodeClass::Terminal(TokenClass::Keyword),
            &NodeClass::Rule(RuleName::Statement),
            &NodeClass::Terminal(TokenClass::Keyword),
        ]
    );
}

#[test]
fn precedence_is_reflected_in_the_tree() {
    let (root, _) = check("int a = 1 + 2 * 3");
    let expression = &root.children[3];
    assert_eq!(expression.class, NodeClass::Rule(RuleName::Expression));
    let sum = &expression.children[0];
    assert_eq!(sum.class, NodeClass::Rule(RuleName::MathExpression));
    assert_eq!(sum.children.len(), 3);
    // The product hangs off the right addend, below the sum.
    let product = &sum.children[2].children[0];
    assert_eq!(product.class, NodeClass::Rule(RuleName::Factor));
    assert_eq!(product.children.len(), 3);
}

#[test]
fn grammatical_nonsense_is_a_parse_error() {
    let analysis = analyze("while while");
    let err = parser::parse(analysis.tokens).unwrap_err();
    assert!(matches!(err, ParseError::Stuck { .. }));
}

#[test]
fn an_empty_token_stream_is_a_parse_error() {
    assert_eq!(parser::parse(Vec::new()), Err(ParseError::EmptyInput));
}

// =============================================================================
// Linting
// =============================================================================

#[test]
fn lint_findings_flow_through_the_pipeline() {
    let (_, findings) = check("int a = 1 int a = 2");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "Identifier a has already been declared");
}

#[test]
fn redeclaration_across_lines_points_at_the_second_declaration() {
    let (_, findings) = check("int a = 1\nint a = 2");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "Identifier a has already been declared");
    assert_eq!((findings[0].line, findings[0].position), (2, 5));
}

#[test]
fn undeclared_assignment_is_reported_with_its_location() {
    let (_, findings) = check("int a = 1\nb = 2");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "Identifier b hasn't been declared");
    assert_eq!((findings[0].line, findings[0].position), (2, 1));
}

#[test]
fn a_declaration_then_a_plain_assignment_is_clean() {
    let (root, findings) = check("int a = 1\na = 2");
    assert_eq!(root.class, NodeClass::Rule(RuleName::Program));
    assert_eq!(root.children.len(), 2);
    assert!(findings.is_empty());
}

#[test]
fn a_plain_assignment_between_declarations_is_checked() {
    let (root, findings) = check("int a = 1\nb = 2\nint c = 3");
    assert_eq!(root.class, NodeClass::Rule(RuleName::Program));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "Identifier b hasn't been declared");
    assert_eq!((findings[0].line, findings[0].position), (2, 1));
}

// =============================================================================
// Custom pattern tables
// =============================================================================

#[test]
fn a_custom_pattern_table_drives_the_lexer() {
    let json = r#"{
        "word": { "regex": ["[a-z]+"], "actions": "class:identifier, value:string" },
        "space": { "regex": [" "], "actions": "class:skip" }
    }"#;
    let table = PatternTable::from_json_str(json).unwrap();
    let analyzer = LexicalAnalyzer::new(table);
    let analysis = analyzer.analyze("hello world").unwrap();
    assert!(analysis.errors.is_empty());
    assert_eq!(analysis.tokens.len(), 2);
    assert_eq!(analysis.tokens[1].value, Some(TokenValue::Text("world".to_string())));
}
