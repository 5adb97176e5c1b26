//! Property-based tests for the dfascript lexer and interpreter
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. Table compilation and classification are deterministic and total
//! 2. Scanning never panics and always makes progress
//! 3. Rollback leaves lexemes and cursors consistent with the input, and
//!    rescanning the lexemes of well-formed input gives the same kinds
//! 4. The interpreter never panics and honours shadowing and conditionals

use std::collections::HashMap;

use dfascript::{
    lexicon, tokenize, CompiledTable, Environment, Graph, Interpreter, Scanner, Symbol,
    SymbolClassifier, TokenKind, Value,
};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Random ASCII input, control characters included
fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x00-\x7F]{0,200}").unwrap()
}

/// Sequences of plausible dfascript tokens
fn script_like_string() -> impl Strategy<Value = String> {
    prop::collection::vec(script_token(), 0..40).prop_map(|tokens| tokens.join(" "))
}

fn script_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just(";".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
        Just("!=".to_string()),
        Just("<".to_string()),
        Just(">=".to_string()),
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("**".to_string()),
        Just("/".to_string()),
        Just("%".to_string()),
        Just("IF".to_string()),
        Just("PRINT".to_string()),
        Just("SQRT".to_string()),
        Just("'text'".to_string()),
        Just("\"unterminated".to_string()),
        Just("# comment\n".to_string()),
        Just("@".to_string()),
        "[a-z][a-z0-9_]{0,4}",
        (0u32..1000).prop_map(|n| n.to_string()),
        (0.0f64..100.0).prop_map(|f| format!("{:.3}", f)),
        (1u32..9, 0u32..5).prop_map(|(m, e)| format!("{}e-{}", m, e)),
    ]
}

/// Tokens that rescan to the same kind on their own
fn well_formed_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just(";".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
        Just("!=".to_string()),
        Just("<=".to_string()),
        Just(">".to_string()),
        Just("%".to_string()),
        Just("**".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("IF".to_string()),
        Just("PRINT".to_string()),
        Just("\"double\"".to_string()),
        "'[a-z ]{0,6}'",
        "[a-zA-Z][a-zA-Z0-9_]{0,5}",
        (0u32..1000).prop_map(|n| n.to_string()),
        (0.0f64..100.0).prop_map(|f| format!("{:.2}", f)),
        (1u32..9, 0u32..30).prop_map(|(m, e)| format!("{}e+{}", m, e)),
    ]
}

/// Well-formed tokens separated by assorted blanks
fn well_formed_string() -> impl Strategy<Value = String> {
    let blank = prop_oneof![Just(" "), Just("  "), Just("\t"), Just("\n"), Just(" \r\n")];
    prop::collection::vec((well_formed_token(), blank), 0..30).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(token, blank)| token + blank)
            .collect::<String>()
    })
}

/// Well-formed assignments `name = number;`
fn assignment() -> impl Strategy<Value = (String, u32)> {
    ("[a-d]", 0u32..1000)
}

/// A random small graph over a three-symbol alphabet
fn random_graph() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((0usize..6, 0usize..3, 0usize..6), 0..20)
}

// =============================================================================
// AUTOMATON PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn compile_is_deterministic(edges in random_graph()) {
        let alphabet = ['a', 'b', 'c'];
        let mut graph = Graph::new();
        let mut states = vec![graph.start()];
        let mut finals = HashMap::new();
        for &(from, symbol, to) in &edges {
            let from = states[from % states.len()];
            if to < states.len() {
                graph.transition_to(from, alphabet[symbol], states[to]);
            } else {
                let fresh = graph.transition(from, alphabet[symbol]);
                graph.set_final(fresh, to % 2 == 0);
                finals.insert(fresh, TokenKind::Ident);
                states.push(fresh);
            }
        }

        let first = CompiledTable::compile(&graph, &HashMap::new(), &finals);
        let second = CompiledTable::compile(&graph, &HashMap::new(), &finals);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.state_count() >= 1);
        prop_assert!(first.symbol_count() <= alphabet.len());
    }

    #[test]
    fn classifier_is_total_and_disjoint(c in any::<char>()) {
        let classifier = SymbolClassifier::standard().unwrap();
        let symbol = classifier.classify(c);
        let claimed_by: Vec<Symbol> = Symbol::ALL
            .iter()
            .copied()
            .filter(|s| s.characters().contains(c))
            .collect();
        match claimed_by.as_slice() {
            [] => prop_assert_eq!(symbol, Symbol::Error),
            [only] => prop_assert_eq!(symbol, *only),
            _ => prop_assert!(false, "{:?} claimed by {:?}", c, claimed_by),
        }
    }
}

// =============================================================================
// SCANNER PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn scanner_never_panics(source in arbitrary_source_string()) {
        let _ = tokenize(&source);
    }

    #[test]
    fn scanner_terminates_with_single_eof(source in arbitrary_source_string()) {
        let tokens = tokenize(&source).unwrap();
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eofs, 1);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        prop_assert!(tokens.len() <= source.chars().count() + 1);
    }

    #[test]
    fn lexemes_are_slices_of_the_input(source in script_like_string()) {
        let chars: Vec<char> = source.chars().collect();
        let mut end_of_previous = 0;
        for token in tokenize(&source).unwrap() {
            let length = token.lexeme.chars().count();
            let slice: String = chars[token.offset..token.offset + length].iter().collect();
            prop_assert_eq!(&slice, &token.lexeme);
            prop_assert!(token.offset >= end_of_previous);
            end_of_previous = token.offset + length;
        }
    }

    #[test]
    fn rollback_leaves_cursor_after_lexeme(source in script_like_string()) {
        let mut scanner = Scanner::new(&source).unwrap();
        loop {
            let token = scanner.next_token();
            prop_assert_eq!(scanner.cursor(), token.offset + token.lexeme.chars().count());
            if token.kind == TokenKind::Eof {
                break;
            }
        }
    }

    #[test]
    fn has_next_does_not_consume(source in script_like_string()) {
        let mut scanner = Scanner::new(&source).unwrap();
        while scanner.has_next_token() {
            let before = scanner.cursor();
            prop_assert!(scanner.has_next_token());
            prop_assert_eq!(scanner.cursor(), before);
            scanner.next_token();
        }
        prop_assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn rescanning_joined_lexemes_round_trips(source in well_formed_string()) {
        let tokens = tokenize(&source).unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        prop_assert!(!kinds.contains(&TokenKind::Error), "{:?} in {:?}", kinds, source);

        let joined = tokens
            .iter()
            .map(|t| t.lexeme.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let rescanned: Vec<TokenKind> = tokenize(&joined).unwrap().iter().map(|t| t.kind).collect();
        prop_assert_eq!(rescanned, kinds);
    }

    #[test]
    fn final_states_report_their_kind(source in script_like_string()) {
        let table = lexicon().unwrap().table();
        let kinds: Vec<TokenKind> = table.final_states().map(|s| table.token_kind(s)).collect();
        for token in tokenize(&source).unwrap() {
            let kind = match token.kind {
                TokenKind::If | TokenKind::Print | TokenKind::Sqrt => TokenKind::Ident,
                kind => kind,
            };
            prop_assert!(kinds.contains(&kind), "{:?} not produced by any final state", kind);
        }
    }
}

// =============================================================================
// ENVIRONMENT & INTERPRETER PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn nearest_binding_wins(bindings in prop::collection::vec(assignment(), 1..30)) {
        let mut env = Environment::empty();
        let mut expected = HashMap::new();
        for (name, value) in &bindings {
            env = env.define(name.clone(), Value::Number(*value as f64));
            expected.insert(name.clone(), *value as f64);
        }
        for (name, value) in expected {
            prop_assert_eq!(env.lookup(&name), Some(&Value::Number(value)));
        }
        prop_assert_eq!(env.depth(), bindings.len());
    }

    #[test]
    fn interpreter_never_panics(source in script_like_string()) {
        let mut interpreter = Interpreter::new();
        let _ = interpreter.compile(&source);
    }

    #[test]
    fn interpreter_never_panics_on_raw_input(source in arbitrary_source_string()) {
        let mut interpreter = Interpreter::new();
        let _ = interpreter.compile(&source);
    }

    #[test]
    fn program_assignments_match_last_write(bindings in prop::collection::vec(assignment(), 1..20)) {
        let program: String = bindings
            .iter()
            .map(|(name, value)| format!("{} = {};", name, value))
            .collect();
        let mut interpreter = Interpreter::new();
        interpreter.compile(&program).unwrap();

        let mut expected = HashMap::new();
        for (name, value) in &bindings {
            expected.insert(name.clone(), *value as f64);
        }
        for (name, value) in expected {
            prop_assert_eq!(interpreter.lookup(&name), Some(&Value::Number(value)));
        }
    }

    #[test]
    fn false_guard_leaves_environment_untouched(
        (name, value) in assignment(),
        left in 0u32..100,
        right in 0u32..100,
    ) {
        let mut interpreter = Interpreter::new();
        interpreter.compile("a = 1; b = 2; c = 3; d = 4;").unwrap();
        let before = interpreter.environment().clone();

        let program = format!("IF({} < {}) {} = {};", left, right, name, value);
        interpreter.compile(&program).unwrap();

        if left < right {
            prop_assert_eq!(interpreter.lookup(&name), Some(&Value::Number(value as f64)));
        } else {
            prop_assert!(interpreter.environment().ptr_eq(&before));
        }
    }

    #[test]
    fn arithmetic_matches_f64(a in 0u32..1000, b in 1u32..1000, c in 0u32..1000) {
        let mut interpreter = Interpreter::new();
        interpreter
            .compile(&format!("r = {} + {} * {} - {} / {} % {};", a, b, c, a, b, b))
            .unwrap();
        let (a, b, c) = (a as f64, b as f64, c as f64);
        let expected = a + b * c - (a / b) % b;
        prop_assert_eq!(interpreter.lookup("r"), Some(&Value::Number(expected)));
    }
}
