use super::dfa::{Alphabet, DFA};
use super::nfa::{Label, NFA};
use super::token::TokenKind;

/// Combined NFA of every expression token pattern, each hung off the super-start.
///
/// ```text
/// ID      letter (alnum | _)*
/// NUMBER  digit+ ('.' digit+)?
/// + - * / ( )
/// WS      (' ' | '\t')+
/// ```
///
/// None of the patterns accepts the empty string.
pub fn build_expr_nfa() -> NFA<TokenKind> {
    let mut nfa = NFA::new();

    let letter = nfa.atomic(Label::Letter);
    let alnum = nfa.atomic(Label::AlnumOrUnderscore);
    let tail = nfa.star(alnum);
    let id = nfa.concat(letter, tail);
    nfa.insert(id, TokenKind::Id);

    let digit = nfa.atomic(Label::Digit);
    let int = nfa.plus(digit);
    let dot = nfa.literal('.');
    let frac_digit = nfa.atomic(Label::Digit);
    let frac_digits = nfa.plus(frac_digit);
    let frac = nfa.concat(dot, frac_digits);
    let frac = nfa.optional(frac);
    let num = nfa.concat(int, frac);
    nfa.insert(num, TokenKind::Number);

    for (symbol, kind) in [
        ('+', TokenKind::Plus),
        ('-', TokenKind::Minus),
        ('*', TokenKind::Star),
        ('/', TokenKind::Slash),
        ('(', TokenKind::LParen),
        (')', TokenKind::RParen),
    ] {
        let op = nfa.literal(symbol);
        nfa.insert(op, kind);
    }

    let space = nfa.literal(' ');
    let tab = nfa.literal('\t');
    let blank = nfa.union(space, tab);
    let blanks = nfa.plus(blank);
    nfa.insert(blanks, TokenKind::Whitespace);

    nfa
}

pub fn get_expr_tokenizer(nfa: &NFA<TokenKind>) -> DFA<TokenKind> {
    DFA::subset_construct(nfa, &Alphabet::ascii())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tokenizer::Token;

    fn tokenizer() -> DFA<TokenKind> {
        get_expr_tokenizer(&build_expr_nfa())
    }

    fn kinds(tokens: &[Token<TokenKind>]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn registers_every_kind_but_eof() {
        let nfa = build_expr_nfa();
        let mut registered: Vec<TokenKind> = nfa.accept_states().values().copied().collect();
        registered.sort();
        assert_eq!(
            registered,
            vec![
                TokenKind::Id,
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Whitespace,
            ]
        );
    }

    #[test]
    fn start_state_not_accepting() {
        let dfa = tokenizer();
        assert!(!dfa.has_accepting_start());
    }

    #[test]
    fn number_is_one_token() {
        let tokens = tokenizer().tokenize("123.45").unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::Number, TokenKind::Eof]);
        assert_eq!(tokens[0].lexeme, "123.45");
    }

    #[test]
    fn dangling_dot_is_lexical_error() {
        let err = tokenizer().tokenize("12.").unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.found, '.');
    }

    #[test]
    fn identifiers_take_digits_and_underscores() {
        let tokens = tokenizer().tokenize("x_1 9y").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Id, TokenKind::Number, TokenKind::Id, TokenKind::Eof]
        );
        assert_eq!(tokens[0].lexeme, "x_1");
        assert_eq!(tokens[1].lexeme, "9");
        assert_eq!(tokens[2].offset, 5);
    }

    #[test]
    fn tabs_and_spaces_are_dropped() {
        let tokens = tokenizer().tokenize(" \t(a)\t").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::LParen, TokenKind::Id, TokenKind::RParen, TokenKind::Eof]
        );
        assert_eq!(tokens[3].offset, 6);
    }

    #[test]
    fn empty_input_yields_only_eof() {
        let tokens = tokenizer().tokenize("").unwrap();
        assert_eq!(tokens, vec![Token::new(TokenKind::Eof, "$", 0)]);
    }

    #[test]
    fn newline_is_not_whitespace() {
        assert!(tokenizer().tokenize("a\nb").is_err());
    }

    #[test]
    fn non_ascii_fails() {
        let err = tokenizer().tokenize("a+é").unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.found, 'é');
    }
}
