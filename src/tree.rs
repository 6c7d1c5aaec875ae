// src/tree.rs
//! Generic, kind-tagged view of the AST.
//!
//! Every node reports its kind tag and a fixed list of named children, so
//! renderers can walk the tree without matching on concrete node types.

use crate::ast::*;

pub enum Child<'a> {
    Absent,
    Leaf(String),
    Node(&'a dyn TreeNode),
    List(Vec<&'a dyn TreeNode>),
}

pub trait TreeNode {
    fn kind(&self) -> &'static str;
    fn children(&self) -> Vec<(&'static str, Child<'_>)>;
}

fn list<T: TreeNode>(items: &[T]) -> Child<'_> {
    Child::List(items.iter().map(|item| item as &dyn TreeNode).collect())
}

fn leaf(value: impl ToString) -> Child<'static> {
    Child::Leaf(value.to_string())
}

impl TreeNode for ProgramNode {
    fn kind(&self) -> &'static str {
        "program"
    }

    fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        vec![("name", leaf(&self.name.0)), ("body", Child::Node(&self.body))]
    }
}

impl TreeNode for Block {
    fn kind(&self) -> &'static str {
        "block"
    }

    fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        vec![
            ("vars", list(&self.vars)),
            ("subroutines", list(&self.subroutines)),
            ("commands", Child::Node(&self.commands)),
        ]
    }
}

impl TreeNode for Identifier {
    fn kind(&self) -> &'static str {
        "id"
    }

    fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        vec![("name", leaf(&self.0))]
    }
}

impl TreeNode for VarDecl {
    fn kind(&self) -> &'static str {
        "decl_var"
    }

    fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        vec![("id", Child::Node(&self.id)), ("declared_type", leaf(self.declared_type))]
    }
}

impl TreeNode for ParamDecl {
    fn kind(&self) -> &'static str {
        "decl_param"
    }

    fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        vec![("id", Child::Node(&self.id)), ("declared_type", leaf(self.declared_type))]
    }
}

impl TreeNode for Subroutine {
    fn kind(&self) -> &'static str {
        match self {
            Subroutine::Procedure(_) => "decl_proc",
            Subroutine::Function(_) => "decl_func",
        }
    }

    fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        match self {
            Subroutine::Procedure(p) => vec![
                ("name", leaf(&p.name.0)),
                ("params", list(&p.params)),
                ("body", Child::Node(&p.body)),
            ],
            Subroutine::Function(f) => vec![
                ("name", leaf(&f.name.0)),
                ("params", list(&f.params)),
                ("return_type", leaf(f.return_type)),
                ("body", Child::Node(&f.body)),
            ],
        }
    }
}

impl TreeNode for CommandSeq {
    fn kind(&self) -> &'static str {
        "seq_commands"
    }

    fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        let first = match &self.first {
            Some(command) => Child::Node(&**command),
            None => Child::Absent,
        };
        let rest = match &self.rest {
            Some(seq) => Child::Node(&**seq),
            None => Child::Absent,
        };
        vec![("first", first), ("rest", rest)]
    }
}

impl TreeNode for Command {
    fn kind(&self) -> &'static str {
        match self {
            Command::Assign { .. } => "cmd_atrib",
            Command::ProcedureCall { .. } => "chamada_proc",
            Command::If { .. } => "cmd_condicional",
            Command::While { .. } => "cmd_repeticao",
            Command::Read { .. } => "cmd_leitura",
            Command::Write { .. } => "cmd_escrita",
            Command::Compound { seq } => seq.kind(),
        }
    }

    fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        match self {
            Command::Assign { id, expr } => vec![("id", Child::Node(id)), ("expr", Child::Node(expr))],
            Command::ProcedureCall { name, args } => vec![("name", leaf(&name.0)), ("args", list(args))],
            Command::If { condition, body, else_branch } => vec![
                ("condition", Child::Node(condition)),
                ("body", Child::Node(&**body)),
                (
                    "else",
                    match else_branch {
                        Some(command) => Child::Node(&**command),
                        None => Child::Absent,
                    },
                ),
            ],
            Command::While { condition, body } => {
                vec![("condition", Child::Node(condition)), ("body", Child::Node(&**body))]
            }
            Command::Read { vars } => vec![("vars", list(vars))],
            Command::Write { exprs } => vec![("exprs", list(exprs))],
            // o composto é o próprio seq_commands
            Command::Compound { seq } => seq.children(),
        }
    }
}

impl TreeNode for Expression {
    fn kind(&self) -> &'static str {
        match self {
            Expression::Binary { .. } => "exp_binaria",
            Expression::Unary { .. } => "exp_unaria",
            Expression::Variable { .. } => "exp_var",
            Expression::Number { .. } => "exp_num",
            Expression::Boolean { .. } => "logico",
            Expression::FunctionCall { .. } => "chamada_func",
        }
    }

    fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        match self {
            Expression::Binary { op, left, right } => vec![
                ("left", Child::Node(&**left)),
                ("op", leaf(op)),
                ("right", Child::Node(&**right)),
            ],
            Expression::Unary { op, expr } => vec![("op", leaf(op)), ("expr", Child::Node(&**expr))],
            Expression::Variable { id } => vec![("id", Child::Node(id))],
            Expression::Number { value } => vec![("value", leaf(value))],
            Expression::Boolean { value } => vec![("value", leaf(value))],
            Expression::FunctionCall { name, args } => vec![("name", leaf(&name.0)), ("args", list(args))],
        }
    }
}

/// Counts every node reachable from `root`, the root included. Leaves are not nodes.
pub fn count_nodes(root: &dyn TreeNode) -> usize {
    1 + root
        .children()
        .into_iter()
        .map(|(_, child)| match child {
            Child::Node(node) => count_nodes(node),
            Child::List(items) => items.into_iter().map(count_nodes).sum(),
            Child::Absent | Child::Leaf(_) => 0,
        })
        .sum::<usize>()
}
