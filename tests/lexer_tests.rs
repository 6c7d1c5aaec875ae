use minipascal::lexer::lex_source;
use minipascal::token::{LexicalError, Token, RESERVED_WORDS};
use logos::Logos;

// Função helper para facilitar a escrita dos testes de lexing
fn lex_source_unwrap<'source>(source: &'source str) -> Vec<Token<'source>> {
    Token::lexer(source)
        .map(|res| res.unwrap_or_else(|_| panic!("Lexing failed for: {}", source)))
        .collect()
}

#[test]
fn test_keywords() {
    let source = "program var procedure function begin end if then else while do read write div or and not true false";
    let tokens = lex_source_unwrap(source);
    assert_eq!(tokens, vec![
        Token::KwProgram, Token::KwVar, Token::KwProcedure, Token::KwFunction, Token::KwBegin,
        Token::KwEnd, Token::KwIf, Token::KwThen, Token::KwElse, Token::KwWhile, Token::KwDo,
        Token::KwRead, Token::KwWrite, Token::KwDiv, Token::KwOr, Token::KwAnd, Token::KwNot,
        Token::KwTrue, Token::KwFalse,
    ]);
}

#[test]
fn test_reserved_words_never_lex_as_identifiers() {
    for word in RESERVED_WORDS {
        let tokens = lex_source_unwrap(word);
        assert_eq!(tokens.len(), 1, "{}", word);
        assert!(!matches!(tokens[0], Token::Identifier(_)), "'{}' lexed as identifier", word);
        assert_eq!(tokens[0].to_string(), word);
    }
}

#[test]
fn test_identifiers() {
    let source = "numero resultado_1 integer boolean programa";
    let tokens = lex_source_unwrap(source);
    assert_eq!(tokens, vec![
        Token::Identifier("numero"),
        Token::Identifier("resultado_1"),
        Token::Identifier("integer"),
        Token::Identifier("boolean"),
        Token::Identifier("programa"),
    ]);
}

#[test]
fn test_number_literals() {
    let tokens = lex_source_unwrap("0 42 98765");
    assert_eq!(tokens, vec![Token::Number(0), Token::Number(42), Token::Number(98765)]);
}

#[test]
fn test_operators_and_punctuation() {
    let source = "+ - * := = <> < <= > >= ( ) ; . , :";
    let tokens = lex_source_unwrap(source);
    assert_eq!(tokens, vec![
        Token::Plus, Token::Minus, Token::Star, Token::Assign, Token::Equal, Token::NotEqual,
        Token::LessThan, Token::LessThanEqual, Token::GreaterThan, Token::GreaterThanEqual,
        Token::LParen, Token::RParen, Token::Semicolon, Token::Dot, Token::Comma, Token::Colon,
    ]);
}

#[test]
fn test_operators_without_spaces() {
    let tokens = lex_source_unwrap("x:=a<=b");
    assert_eq!(tokens, vec![
        Token::Identifier("x"), Token::Assign, Token::Identifier("a"), Token::LessThanEqual, Token::Identifier("b"),
    ]);
}

#[test]
fn test_comments_are_skipped() {
    let source = "resultado := {oce ta bao}resultado * numero (* outro ** comentario *) - 1";
    let tokens = lex_source_unwrap(source);
    assert_eq!(tokens, vec![
        Token::Identifier("resultado"), Token::Assign, Token::Identifier("resultado"), Token::Star,
        Token::Identifier("numero"), Token::Minus, Token::Number(1),
    ]);
}

#[test]
fn test_line_numbers_across_multiline_comments() {
    let source = "program t;\n{ comentario\n  de varias linhas }\nvar (* e\n outro *) x";
    let output = lex_source(source);
    assert!(output.errors.is_empty());
    let lines: Vec<(Token, usize)> = output.tokens.iter().map(|t| (t.token, t.line)).collect();
    assert_eq!(lines, vec![
        (Token::KwProgram, 1),
        (Token::Identifier("t"), 1),
        (Token::Semicolon, 1),
        (Token::KwVar, 4),
        (Token::Identifier("x"), 5),
    ]);
}

#[test]
fn test_illegal_character_does_not_stop_scan() {
    let output = lex_source("a := 10 $ 20;\nb");
    assert_eq!(output.errors, vec![LexicalError::IllegalCharacter { ch: '$', line: 1 }]);
    let tokens: Vec<Token> = output.tokens.iter().map(|t| t.token).collect();
    assert_eq!(tokens, vec![
        Token::Identifier("a"), Token::Assign, Token::Number(10), Token::Number(20), Token::Semicolon,
        Token::Identifier("b"),
    ]);
    assert!(output.has_errors());
}

#[test]
fn test_malformed_identifier_is_reported_and_skipped() {
    let output = lex_source("var\n   1arvore : integer;");
    assert_eq!(output.errors, vec![LexicalError::MalformedIdentifier { text: "1arvore".to_string(), line: 2 }]);
    let tokens: Vec<Token> = output.tokens.iter().map(|t| t.token).collect();
    assert_eq!(tokens, vec![Token::KwVar, Token::Colon, Token::Identifier("integer"), Token::Semicolon]);
}

#[test]
fn test_number_overflow_is_reported() {
    let output = lex_source("x := 99999999999999999999999");
    assert_eq!(output.tokens.len(), 2);
    assert!(matches!(
        &output.errors[..],
        [LexicalError::InvalidNumberLiteral { value, line: 1 }] if value == "99999999999999999999999"
    ));
}
