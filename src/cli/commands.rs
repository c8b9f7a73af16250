//! CLI command implementations
//!
//! Each command reads input, drives the library crates, prints its report
//! and returns a `CliResult<ExitCode>` for `run()` to act on.

use std::fs;
use std::path::Path;

use imp_semantics::lint;
use imp_syntax::lexer::{Analysis, LexicalAnalyzer};
use imp_syntax::patterns::PatternTable;
use imp_syntax::tree::ParseNode;

use crate::automata::{Automaton, RegularGrammar};
use crate::cli::{CliError, CliResult, ExitCode};

// ============================================================================
// Pattern loading
// ============================================================================

/// Load the pattern table: the built-in one, or a JSON file given on the
/// command line.
pub fn load_patterns(path: Option<&Path>) -> CliResult<PatternTable> {
    let table = match path {
        None => PatternTable::builtin(),
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                CliError::failure(format!("Error reading '{}': {}", path.display(), e))
            })?;
            PatternTable::from_json_str(&text).map_err(|e| {
                CliError::failure(format!("Error in patterns file '{}': {}", path.display(), e))
            })?
        }
    };
    tracing::debug!(patterns = table.len(), "pattern table loaded");
    Ok(table)
}

// ============================================================================
// Commands
// ============================================================================

/// Run the full pipeline on a source file: print tokens, the parse tree and
/// lint findings. Lexical errors and lint findings fail the exit code but do
/// not stop the later stages.
pub fn check_file(path: &str, patterns: PatternTable) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let analysis = analyze(&source, patterns)?;

    print_tokens(&analysis);
    for error in &analysis.errors {
        eprintln!("{}", error);
    }

    let root = imp_syntax::parser::parse(analysis.tokens)
        .map_err(|e| CliError::failure(format!("Parse error: {}", e)))?;

    println!();
    print_tree(&root, 0);

    let findings = lint(&root);
    if !findings.is_empty() {
        println!();
        for finding in &findings {
            println!("{}", finding);
        }
    }

    if analysis.errors.is_empty() && findings.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Tokenize a source file and print the token stream.
pub fn tokens_file(path: &str, patterns: PatternTable) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let analysis = analyze(&source, patterns)?;

    print_tokens(&analysis);
    for error in &analysis.errors {
        eprintln!("{}", error);
    }

    if analysis.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Print the demo grammar's automaton and the DFA it determinizes to.
pub fn show_dfa() -> CliResult<ExitCode> {
    let grammar = RegularGrammar::demo();
    let nfa = grammar
        .to_automaton()
        .map_err(|e| CliError::failure(format!("Error: {}", e)))?;

    println!("NFA:");
    print_automaton(&nfa);

    let dfa = nfa.to_deterministic();
    println!();
    println!("DFA:");
    print_automaton(&dfa);

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Helpers
// ============================================================================

fn read_source(path: &str) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading '{}': {}", path, e)))
}

fn analyze(source: &str, patterns: PatternTable) -> CliResult<Analysis> {
    let analyzer = LexicalAnalyzer::new(patterns);
    let analysis = analyzer
        .analyze(source)
        .map_err(|e| CliError::failure(format!("Error in pattern table: {}", e)))?;
    tracing::debug!(
        tokens = analysis.tokens.len(),
        errors = analysis.errors.len(),
        "lexical analysis finished"
    );
    Ok(analysis)
}

fn print_tokens(analysis: &Analysis) {
    for token in &analysis.tokens {
        match &token.value {
            Some(value) => println!(
                "{}:{} {} ({}) = {}",
                token.line, token.position, token.name, token.class, value
            ),
            None => println!(
                "{}:{} {} ({})",
                token.line, token.position, token.name, token.class
            ),
        }
    }
}

fn print_tree(node: &ParseNode, depth: usize) {
    let indent = "--".repeat(depth);
    match &node.value {
        Some(value) => println!("{}{}:{}({})", indent, node.class, node.name, value),
        None => println!("{}{}:{}", indent, node.class, node.name),
    }
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}

fn print_automaton(automaton: &Automaton) {
    println!("start: {}", automaton.start());
    println!(
        "accepting: {}",
        automaton
            .accepting()
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );
    for (state, symbol, targets) in automaton.transition_rows() {
        println!("  {} -{}-> {}", state, symbol, targets.join(", "));
    }
}
