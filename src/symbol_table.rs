// src/symbol_table.rs
use crate::ast::Type;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Variable,
    Parameter,
    Procedure,
    Function,
    Type,
    Constant,
    Program,
}

impl Category {
    /// Names that can appear on the left of `:=` or inside `read(...)`.
    pub fn is_storage(self) -> bool {
        matches!(self, Category::Variable | Category::Parameter)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Category::Variable => "variable",
            Category::Parameter => "parameter",
            Category::Procedure => "procedure",
            Category::Function => "function",
            Category::Type => "type",
            Category::Constant => "constant",
            Category::Program => "program",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub category: Category,
    /// Value type; for functions, the return type.
    pub ty: Option<Type>,
    /// Parameter types, only for procedures and functions.
    pub params: Option<Vec<Type>>,
}

type Scope = HashMap<String, Symbol>;

/// Stack of lexical scopes. The bottom (global) scope is created with the
/// table, holds the predeclared names and is never popped.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = SymbolTable { scopes: vec![Scope::new()] };
        table.define("integer", Category::Type, None, None);
        table.define("boolean", Category::Type, None, None);
        table.define("true", Category::Constant, Some(Type::Boolean), None);
        table.define("false", Category::Constant, Some(Type::Boolean), None);
        table
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Returns `false` (and does nothing) when only the global scope is left.
    pub fn exit_scope(&mut self) -> bool {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Installs `name` in the innermost scope. Returns `false` without
    /// touching the table when that scope already has the name.
    pub fn define(&mut self, name: &str, category: Category, ty: Option<Type>, params: Option<Vec<Type>>) -> bool {
        let Some(current) = self.scopes.last_mut() else {
            return false;
        };
        if current.contains_key(name) {
            return false;
        }
        current.insert(name.to_string(), Symbol { category, ty, params });
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn is_defined_in_current_scope(&self, name: &str) -> bool {
        self.scopes.last().map_or(false, |scope| scope.contains_key(name))
    }
}
