// src/ast.rs
//
// Enum-valued positions (subroutines, commands, expressions) carry a `kind`
// tag when serialized; fixed-shape positions are plain objects.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Integer,
    Boolean,
}

impl Type {
    /// Resolves a type name as written in declarations.
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "integer" => Some(Type::Integer),
            "boolean" => Some(Type::Boolean),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Integer => "integer",
            Type::Boolean => "boolean",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum BinaryOperator {
    #[serde(rename = "+")] Add,
    #[serde(rename = "-")] Sub,
    #[serde(rename = "*")] Mul,
    #[serde(rename = "div")] Div,
    #[serde(rename = "=")] Eq,
    #[serde(rename = "<>")] Neq,
    #[serde(rename = "<")] Lt,
    #[serde(rename = "<=")] Lte,
    #[serde(rename = ">")] Gt,
    #[serde(rename = ">=")] Gte,
    #[serde(rename = "and")] And,
    #[serde(rename = "or")] Or,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "div",
            BinaryOperator::Eq => "=",
            BinaryOperator::Neq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Gte => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum UnaryOperator {
    #[serde(rename = "not")] Not,
    #[serde(rename = "-")] Neg,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "not",
            UnaryOperator::Neg => "-",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expression {
    #[serde(rename = "exp_binaria")]
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename = "exp_unaria")]
    Unary { op: UnaryOperator, expr: Box<Expression> },
    #[serde(rename = "exp_var")]
    Variable { id: Identifier },
    #[serde(rename = "exp_num")]
    Number { value: i64 },
    #[serde(rename = "logico")]
    Boolean { value: bool },
    #[serde(rename = "chamada_func")]
    FunctionCall { name: Identifier, args: Vec<Expression> },
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Command {
    #[serde(rename = "cmd_atrib")]
    Assign { id: Identifier, expr: Expression },
    #[serde(rename = "chamada_proc")]
    ProcedureCall { name: Identifier, args: Vec<Expression> },
    #[serde(rename = "cmd_condicional")]
    If {
        condition: Expression,
        body: Box<Command>,
        #[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
        else_branch: Option<Box<Command>>,
    },
    #[serde(rename = "cmd_repeticao")]
    While { condition: Expression, body: Box<Command> },
    #[serde(rename = "cmd_leitura")]
    Read { vars: Vec<Identifier> },
    #[serde(rename = "cmd_escrita")]
    Write { exprs: Vec<Expression> },
    /// A nested `begin ... end`.
    #[serde(rename = "seq_commands")]
    Compound { seq: CommandSeq },
}

/// Linked statement list. `first == None` only for the empty list, and a
/// `rest` is never present without a `first`.
///
/// Serialized as a flat array of commands, so long blocks do not nest.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct CommandSeq {
    pub first: Option<Box<Command>>,
    pub rest: Option<Box<CommandSeq>>,
}

impl CommandSeq {
    pub fn empty() -> Self {
        CommandSeq::default()
    }

    pub fn single(command: Command) -> Self {
        CommandSeq { first: Some(Box::new(command)), rest: None }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Appends at the rightmost open slot, keeping source order.
    pub fn push(&mut self, command: Command) {
        if self.first.is_none() {
            self.first = Some(Box::new(command));
            return;
        }
        let mut tail = &mut self.rest;
        while let Some(link) = tail {
            tail = &mut link.rest;
        }
        *tail = Some(Box::new(CommandSeq::single(command)));
    }

    pub fn iter(&self) -> CommandSeqIter<'_> {
        CommandSeqIter { next: Some(self) }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

// Built back to front, one link per command.
impl FromIterator<Command> for CommandSeq {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let commands: Vec<Command> = iter.into_iter().collect();
        let mut seq = CommandSeq::empty();
        for command in commands.into_iter().rev() {
            let rest = if seq.is_empty() { None } else { Some(Box::new(seq)) };
            seq = CommandSeq { first: Some(Box::new(command)), rest };
        }
        seq
    }
}

impl Serialize for CommandSeq {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CommandSeq {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let commands = Vec::<Command>::deserialize(deserializer)?;
        Ok(commands.into_iter().collect())
    }
}

pub struct CommandSeqIter<'a> {
    next: Option<&'a CommandSeq>,
}

impl<'a> Iterator for CommandSeqIter<'a> {
    type Item = &'a Command;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.rest.as_deref();
        node.first.as_deref()
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    pub id: Identifier,
    pub declared_type: Type,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ParamDecl {
    pub id: Identifier,
    pub declared_type: Type,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ProcedureDecl {
    pub name: Identifier,
    pub params: Vec<ParamDecl>,
    pub body: Block,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<ParamDecl>,
    pub return_type: Type,
    pub body: Block,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Subroutine {
    #[serde(rename = "decl_proc")]
    Procedure(ProcedureDecl),
    #[serde(rename = "decl_func")]
    Function(FunctionDecl),
}

impl Subroutine {
    pub fn name(&self) -> &Identifier {
        match self {
            Subroutine::Procedure(proc_decl) => &proc_decl.name,
            Subroutine::Function(func_decl) => &func_decl.name,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Block {
    pub vars: Vec<VarDecl>,
    pub subroutines: Vec<Subroutine>,
    pub commands: CommandSeq,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ProgramNode {
    pub name: Identifier,
    pub body: Block,
}
