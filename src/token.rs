// src/token.rs
use logos::Logos;
use std::fmt;

/// Reserved words of the language, in the order the lexer declares them.
pub const RESERVED_WORDS: [&str; 19] = [
    "program", "var", "procedure", "function", "begin", "end", "if", "then", "else", "while",
    "do", "read", "write", "div", "or", "and", "not", "true", "false",
];

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"\{[^}]*\}")]
#[logos(skip r"\(\*(?:[^*]|\*+[^*)])*\*+\)")]
pub enum Token<'source> {
    // Keywords
    #[token("program")] KwProgram,
    #[token("var")] KwVar,
    #[token("procedure")] KwProcedure,
    #[token("function")] KwFunction,
    #[token("begin")] KwBegin,
    #[token("end")] KwEnd,
    #[token("if")] KwIf,
    #[token("then")] KwThen,
    #[token("else")] KwElse,
    #[token("while")] KwWhile,
    #[token("do")] KwDo,
    #[token("read")] KwRead,
    #[token("write")] KwWrite,
    #[token("div")] KwDiv,
    #[token("or")] KwOr,
    #[token("and")] KwAnd,
    #[token("not")] KwNot,
    #[token("true")] KwTrue,
    #[token("false")] KwFalse,

    // Identifiers (integer/boolean are plain identifiers at this level)
    #[regex("[a-zA-Z][a-zA-Z0-9_]*", |lex| lex.slice())]
    Identifier(&'source str),

    // Digits followed by letters: never a valid token, reported by the lexer
    #[regex("[0-9]+[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice())]
    MalformedIdentifier(&'source str),

    // Literals
    #[regex("[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Number(i64),

    // Operators and Punctuation
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token(":=")] Assign,
    #[token("=")] Equal,
    #[token("<>")] NotEqual,
    #[token("<")] LessThan,
    #[token("<=")] LessThanEqual,
    #[token(">")] GreaterThan,
    #[token(">=")] GreaterThanEqual,
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token(";")] Semicolon,
    #[token(".")] Dot,
    #[token(",")] Comma,
    #[token(":")] Colon,
}

impl<'source> Token<'source> {
    /// Token kind as shown in syntax errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::KwProgram => "PROGRAM",
            Token::KwVar => "VAR",
            Token::KwProcedure => "PROCEDURE",
            Token::KwFunction => "FUNCTION",
            Token::KwBegin => "BEGIN",
            Token::KwEnd => "END",
            Token::KwIf => "IF",
            Token::KwThen => "THEN",
            Token::KwElse => "ELSE",
            Token::KwWhile => "WHILE",
            Token::KwDo => "DO",
            Token::KwRead => "READ",
            Token::KwWrite => "WRITE",
            Token::KwDiv => "DIV",
            Token::KwOr => "OR",
            Token::KwAnd => "AND",
            Token::KwNot => "NOT",
            Token::KwTrue => "TRUE",
            Token::KwFalse => "FALSE",
            Token::Identifier(_) => "IDENTIFIER",
            Token::MalformedIdentifier(_) => "MALFORMED_IDENTIFIER",
            Token::Number(_) => "NUMBER",
            Token::Plus => "PLUS",
            Token::Minus => "MINUS",
            Token::Star => "TIMES",
            Token::Assign => "ASSIGN",
            Token::Equal => "EQUAL",
            Token::NotEqual => "NOT_EQUAL",
            Token::LessThan => "LESS",
            Token::LessThanEqual => "LESS_EQUAL",
            Token::GreaterThan => "GREATER",
            Token::GreaterThanEqual => "GREATER_EQUAL",
            Token::LParen => "LPAREN",
            Token::RParen => "RPAREN",
            Token::Semicolon => "SEMICOLON",
            Token::Dot => "DOT",
            Token::Comma => "COMMA",
            Token::Colon => "COLON",
        }
    }
}

// Display mostra o lexema como aparece no fonte
impl<'source> fmt::Display for Token<'source> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Identifier(s) | Token::MalformedIdentifier(s) => *s,
            Token::Number(n) => return write!(f, "{}", n),
            Token::KwProgram => "program",
            Token::KwVar => "var",
            Token::KwProcedure => "procedure",
            Token::KwFunction => "function",
            Token::KwBegin => "begin",
            Token::KwEnd => "end",
            Token::KwIf => "if",
            Token::KwThen => "then",
            Token::KwElse => "else",
            Token::KwWhile => "while",
            Token::KwDo => "do",
            Token::KwRead => "read",
            Token::KwWrite => "write",
            Token::KwDiv => "div",
            Token::KwOr => "or",
            Token::KwAnd => "and",
            Token::KwNot => "not",
            Token::KwTrue => "true",
            Token::KwFalse => "false",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Assign => ":=",
            Token::Equal => "=",
            Token::NotEqual => "<>",
            Token::LessThan => "<",
            Token::LessThanEqual => "<=",
            Token::GreaterThan => ">",
            Token::GreaterThanEqual => ">=",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Semicolon => ";",
            Token::Dot => ".",
            Token::Comma => ",",
            Token::Colon => ":",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexicalError {
    #[error("Illegal character '{ch}' on line {line}")]
    IllegalCharacter { ch: char, line: usize },
    #[error("Invalid identifier '{text}' on line {line}: identifiers cannot start with a digit")]
    MalformedIdentifier { text: String, line: usize },
    #[error("Invalid number literal '{value}' on line {line}")]
    InvalidNumberLiteral { value: String, line: usize },
}
