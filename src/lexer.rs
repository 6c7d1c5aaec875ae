// src/lexer.rs
use crate::token::{LexicalError, Token};
use crate::utils::LineIndex;
use logos::Logos;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'source> {
    pub token: Token<'source>,
    pub span: Range<usize>,
    pub line: usize,
}

/// Result of a full scan. Lexical errors never stop the scan, the offending
/// text is simply left out of `tokens`.
#[derive(Debug, Clone, Default)]
pub struct LexOutput<'source> {
    pub tokens: Vec<SpannedToken<'source>>,
    pub errors: Vec<LexicalError>,
}

impl<'source> LexOutput<'source> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn lex_source<'source>(source: &'source str) -> LexOutput<'source> {
    let lines = LineIndex::new(source);
    let mut output = LexOutput::default();

    for (tok_res, span) in Token::lexer(source).spanned() {
        let line = lines.line_of(span.start);
        let error = match tok_res {
            Ok(Token::MalformedIdentifier(text)) => LexicalError::MalformedIdentifier {
                text: text.to_string(),
                line,
            },
            Ok(token) => {
                output.tokens.push(SpannedToken { token, span, line });
                continue;
            }
            Err(_) => {
                let slice = &source[span.clone()];
                if !slice.is_empty() && slice.bytes().all(|b| b.is_ascii_digit()) {
                    LexicalError::InvalidNumberLiteral { value: slice.to_string(), line }
                } else {
                    LexicalError::IllegalCharacter { ch: slice.chars().next().unwrap_or('\0'), line }
                }
            }
        };
        tracing::debug!(%error, "lexical error");
        output.errors.push(error);
    }

    tracing::debug!(tokens = output.tokens.len(), errors = output.errors.len(), "scan finished");
    output
}
