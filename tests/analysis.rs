//! End-to-end behaviour of tokenize -> validate -> parse on whole inputs.

use expr_automata::parser::{NonTerminal, Terminal};
use expr_automata::tokenizer::{Token, TokenKind};
use expr_automata::{analyzer, SyntaxError, ValidationError};
use rstest::rstest;

#[rstest]
#[case("a+b")]
#[case("12*(x-3)")]
#[case("a + b*2")]
#[case("(a)")]
#[case("x_1 / (2.5 - y)")]
#[case("a * (+b)")]
#[case("((1))*(2)/(3)")]
fn grammar_sentences_pass_every_layer(#[case] input: &str) {
    let analysis = analyzer().analyze(input).unwrap();
    assert!(analysis.validation.valid, "{}: {}", input, analysis.validation.message);
    assert_eq!(analysis.parse, Ok(()));
    assert!(analysis.accepted());
}

#[test]
fn end_to_end_token_stream() {
    let tokens = analyzer().tokenize("a + b*2").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::new(TokenKind::Id, "a", 0),
            Token::new(TokenKind::Plus, "+", 2),
            Token::new(TokenKind::Id, "b", 4),
            Token::new(TokenKind::Star, "*", 5),
            Token::new(TokenKind::Number, "2", 6),
            Token::new(TokenKind::Eof, "$", 7),
        ]
    );
}

#[test]
fn unmatched_opening_paren() {
    let analysis = analyzer().analyze("(a+b").unwrap();
    assert_eq!(analysis.validation.error, Some(ValidationError::UnmatchedOpen));
    assert_eq!(analysis.validation.index, Some(0));
    assert_eq!(
        analysis.parse,
        Err(SyntaxError::Mismatch {
            expected: Terminal::RParen,
            found: Terminal::End,
            position: 4,
        })
    );
}

#[test]
fn maximal_munch_on_decimal() {
    let tokens = analyzer().tokenize("123.45").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].lexeme, "123.45");
}

#[test]
fn bare_unary_minus_divergence() {
    let analysis = analyzer().analyze("-3").unwrap();
    assert_eq!(
        analysis.validation.error,
        Some(ValidationError::UnaryOutsideParens("-".into()))
    );
    assert_eq!(analysis.parse, Ok(()));
}

#[test]
fn adjacent_operators_reported_at_first() {
    let analysis = analyzer().analyze("3++5").unwrap();
    assert_eq!(
        analysis.validation.error,
        Some(ValidationError::AdjacentOperators("+".into(), "+".into()))
    );
    assert_eq!(analysis.validation.index, Some(1));
    // F -> + F lets the grammar read this as 3 + (+5)
    assert_eq!(analysis.parse, Ok(()));
}

#[rstest]
#[case("@")]
#[case("a @ b")]
#[case("1 # 2")]
#[case("x\n")]
fn unsupported_characters_fail_tokenization(#[case] input: &str) {
    assert!(analyzer().tokenize(input).is_err());
    assert!(analyzer().analyze(input).is_err());
}

#[test]
fn juxtaposed_operands_only_fail_the_parser() {
    let analysis = analyzer().analyze("a b").unwrap();
    assert!(analysis.validation.valid);
    assert_eq!(
        analysis.parse,
        Err(SyntaxError::NoRule {
            nonterminal: NonTerminal::TPrime,
            lookahead: Terminal::Id,
            position: 1,
        })
    );
}

#[rstest]
#[case("a*", ValidationError::TrailingOperator("*".into()), 1)]
#[case("/a", ValidationError::LeadingOperator("/".into()), 0)]
#[case(")a(", ValidationError::UnmatchedClose, 0)]
#[case("", ValidationError::Empty, 0)]
#[case("a*-b", ValidationError::AdjacentOperators("*".into(), "-".into()), 1)]
fn structural_rejections(
    #[case] input: &str,
    #[case] expected: ValidationError,
    #[case] index: usize,
) {
    let analysis = analyzer().analyze(input).unwrap();
    assert_eq!(analysis.validation.error, Some(expected));
    assert_eq!(analysis.validation.index, Some(index));
    assert!(!analysis.accepted());
}

#[test]
fn stepping_matches_batch_parse() {
    let tokens = analyzer().tokenize("(a-1)*b").unwrap();
    let mut stepped = analyzer().parser(&tokens);
    let mut steps = 0;
    while !stepped.is_done() {
        stepped.step().unwrap();
        steps += 1;
    }
    let trace = analyzer().parser(&tokens).run_traced();
    assert_eq!(trace.outcome, Ok(()));
    assert_eq!(trace.entries.len(), steps);
    assert_eq!(stepped.position(), tokens.len() - 1);
}

#[test]
fn dfa_is_built_deterministically() {
    use expr_automata::Analyzer;

    let a = Analyzer::new();
    let b = Analyzer::new();
    assert_eq!(a.dfa().state_count(), b.dfa().state_count());
    for (x, y) in a.dfa().states().iter().zip(b.dfa().states()) {
        assert_eq!(x.tokens, y.tokens);
        assert_eq!(x.transitions, y.transitions);
    }
    assert!(!a.dfa().has_accepting_start());
}
