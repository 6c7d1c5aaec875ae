// tests/common.rs
use minipascal::ast::{Command, ProgramNode};
use minipascal::lexer::lex_source;
use minipascal::parser::{ParseError, Parser};
use minipascal::semantic_analyzer::{analyze, Analysis};

#[allow(dead_code)]
pub fn parse_test_source(source: &str) -> Result<ProgramNode, ParseError> {
    let lexed = lex_source(source);
    assert!(lexed.errors.is_empty(), "unexpected lexical errors: {:?}", lexed.errors);
    Parser::new(&lexed.tokens).parse_program()
}

#[allow(dead_code)]
pub fn analyze_source(source: &str) -> Analysis {
    let ast = parse_test_source(source)
        .unwrap_or_else(|e| panic!("Parsing failed for semantic test: {}, source: {}", e, source));
    analyze(&ast)
}

/// Top-level commands of the main block, in source order.
#[allow(dead_code)]
pub fn main_commands(program: &ProgramNode) -> Vec<&Command> {
    program.body.commands.iter().collect()
}

#[allow(dead_code)]
pub const END_TO_END_PROGRAM: &str = r#"
program exemplo;
var
    x, y: integer;
    b: boolean;
begin
    b := x < y;
    if b then y := x else y := y + 1
end.
"#;
