pub mod token;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod symbol_table;
pub mod semantic_analyzer;
pub mod tree;
pub mod dot;
pub mod ast_io;
pub mod utils;

// Reexportar tipos de erro principais para serem acessíveis aos usuários da biblioteca
pub use token::LexicalError;
pub use parser::ParseError;
pub use semantic_analyzer::{Analysis, SemanticError};

use ast::ProgramNode;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CompilationError {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    /// A syntax error, together with the lexical diagnostics of the same scan.
    #[error("{error}")]
    Parse { error: ParseError, lexical_errors: Vec<LexicalError> },
    #[error("AST serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("AST graph rendering error")]
    Render(#[from] std::fmt::Error),
}

/// Everything a successful parse produces. Rejection by the analyzer is
/// reported in `analysis`, not as an error.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub program: ProgramNode,
    pub lexical_errors: Vec<LexicalError>,
    pub analysis: Analysis,
}

impl CompileOutput {
    pub fn is_accepted(&self) -> bool {
        self.analysis.is_accepted()
    }
}

/// Lexes, parses and analyzes `source`. Only a syntax error aborts.
pub fn compile_source(source: &str) -> Result<CompileOutput, CompilationError> {
    // 1. Lexing
    tracing::debug!("phase 1: lexing");
    let lexed = lexer::lex_source(source);

    // 2. Parsing
    tracing::debug!("phase 2: parsing");
    let mut parser = parser::Parser::new(&lexed.tokens);
    let program: ProgramNode = match parser.parse_program() {
        Ok(program) => program,
        Err(error) => return Err(CompilationError::Parse { error, lexical_errors: lexed.errors }),
    };

    // 3. Semantic Analysis
    tracing::debug!("phase 3: semantic analysis");
    let analysis = semantic_analyzer::analyze(&program);

    Ok(CompileOutput { program, lexical_errors: lexed.errors, analysis })
}

pub fn check_file(source_path: impl AsRef<Path>) -> Result<CompileOutput, CompilationError> {
    let source_code = fs::read_to_string(source_path.as_ref())?;
    tracing::info!(path = %source_path.as_ref().display(), "checking source file");
    compile_source(&source_code)
}

/// Runs only the semantic pass over an AST previously saved as JSON.
pub fn analyze_ast_file(ast_path: impl AsRef<Path>) -> Result<(ProgramNode, Analysis), CompilationError> {
    let program = ast_io::read_ast_file(ast_path.as_ref())?;
    tracing::info!(path = %ast_path.as_ref().display(), "analyzing stored AST");
    let analysis = semantic_analyzer::analyze(&program);
    Ok((program, analysis))
}
