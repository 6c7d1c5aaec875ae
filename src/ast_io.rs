// src/ast_io.rs
//! JSON persistence of the AST, so analysis can run as a separate step.

use crate::ast::ProgramNode;
use std::fs;
use std::path::Path;

pub fn to_json(program: &ProgramNode) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(program)
}

pub fn from_json(json: &str) -> Result<ProgramNode, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn write_ast_file(path: impl AsRef<Path>, program: &ProgramNode) -> Result<(), crate::CompilationError> {
    let json = to_json(program)?;
    fs::write(path.as_ref(), json)?;
    tracing::debug!(path = %path.as_ref().display(), "AST written");
    Ok(())
}

pub fn read_ast_file(path: impl AsRef<Path>) -> Result<ProgramNode, crate::CompilationError> {
    let json = fs::read_to_string(path.as_ref())?;
    Ok(from_json(&json)?)
}
