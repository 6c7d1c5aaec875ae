// src/semantic_analyzer.rs
use crate::ast::*;
use crate::symbol_table::{Category, SymbolTable};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SemanticError {
    #[error("Identifier '{name}' already declared in this scope (as {category}).")]
    AlreadyDeclared { name: String, category: Category },
    #[error("Identifier '{0}' not declared.")]
    Undeclared(String),
    #[error("Invalid assignment to '{name}': it is a {category}, not a variable.")]
    NotAssignable { name: String, category: Category },
    #[error("Incompatible types in assignment to '{name}': expected {expected}, found {found}.")]
    IncompatibleTypes { name: String, expected: Type, found: Type },
    #[error("Condition of '{construct}' must be boolean, found {found}.")]
    ConditionNotBoolean { construct: &'static str, found: Type },
    #[error("Procedure '{0}' not declared.")]
    UndeclaredProcedure(String),
    #[error("Function '{0}' not declared.")]
    UndeclaredFunction(String),
    #[error("'{name}' is a {category} and cannot be called as a procedure.")]
    NotAProcedure { name: String, category: Category },
    #[error("Invalid use of procedure '{0}' in an expression: procedures do not return a value.")]
    ProcedureInExpression(String),
    #[error("'{name}' is a {category} and cannot be called as a function.")]
    NotAFunction { name: String, category: Category },
    #[error("Call to '{name}' expects {expected} argument(s), got {found}.")]
    ArityMismatch { name: String, expected: usize, found: usize },
    #[error("Argument {position} of '{name}' is incompatible: expected {expected}, found {found}.")]
    ArgumentTypeMismatch { name: String, position: usize, expected: Type, found: Type },
    #[error("Variable '{0}' not declared for reading.")]
    InvalidReadTarget(String),
    #[error("Operator '{op}' requires {expected} operands, found {left} and {right}.")]
    OperandTypeMismatch { op: BinaryOperator, expected: Type, left: Type, right: Type },
    #[error("Operator '{op}' requires operands of the same type, found {left} and {right}.")]
    EqualityTypeMismatch { op: BinaryOperator, left: Type, right: Type },
    #[error("Operator '{op}' requires a {expected} operand, found {found}.")]
    UnaryOperandMismatch { op: UnaryOperator, expected: Type, found: Type },
    #[error("'{name}' is a {category} and has no value.")]
    NotAValue { name: String, category: Category },
}

/// Outcome of one semantic pass. An empty error list means the program is accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub errors: Vec<SemanticError>,
}

impl Analysis {
    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| format!("Semantic error: {}", e)).collect()
    }
}

/// Runs a fresh analyzer over `program`.
pub fn analyze(program: &ProgramNode) -> Analysis {
    SemanticAnalyzer::new().analyze_program(program)
}

#[derive(Debug, Clone)]
struct FunctionContext {
    name: String,
    return_type: Type,
}

pub struct SemanticAnalyzer {
    symbols: SymbolTable,
    errors: Vec<SemanticError>,
    current_function: Option<FunctionContext>, // para a atribuição ao nome da função
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        SemanticAnalyzer {
            symbols: SymbolTable::new(),
            errors: Vec::new(),
            current_function: None,
        }
    }

    pub fn analyze_program(mut self, program: &ProgramNode) -> Analysis {
        let name = program.name.as_str();
        if !self.symbols.define(name, Category::Program, None, None) {
            self.report(SemanticError::AlreadyDeclared { name: name.to_string(), category: Category::Program });
        }
        // The top-level block lives in the global scope.
        self.analyze_block(&program.body);
        tracing::debug!(errors = self.errors.len(), "semantic analysis finished");
        Analysis { errors: self.errors }
    }

    fn report(&mut self, error: SemanticError) {
        tracing::debug!(%error, "semantic error");
        self.errors.push(error);
    }

    /// Runs `f` inside a new scope; the scope is closed on every path out.
    fn with_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.symbols.enter_scope();
        tracing::debug!(depth = self.symbols.depth(), "enter scope");
        let result = f(self);
        self.symbols.exit_scope();
        tracing::debug!(depth = self.symbols.depth(), "exit scope");
        result
    }

    fn declare(&mut self, name: &str, category: Category, ty: Option<Type>, params: Option<Vec<Type>>) {
        if !self.symbols.define(name, category, ty, params) {
            self.report(SemanticError::AlreadyDeclared { name: name.to_string(), category });
        }
    }

    fn analyze_block(&mut self, block: &Block) {
        for var in &block.vars {
            self.declare(var.id.as_str(), Category::Variable, Some(var.declared_type), None);
        }
        for subroutine in &block.subroutines {
            self.analyze_subroutine(subroutine);
        }
        self.analyze_seq(&block.commands);
    }

    fn declare_params(&mut self, params: &[ParamDecl]) {
        for param in params {
            self.declare(param.id.as_str(), Category::Parameter, Some(param.declared_type), None);
        }
    }

    fn analyze_subroutine(&mut self, subroutine: &Subroutine) {
        match subroutine {
            Subroutine::Procedure(proc_decl) => {
                let param_types = proc_decl.params.iter().map(|p| p.declared_type).collect();
                // Declared in the enclosing scope first so the body can call itself.
                self.declare(proc_decl.name.as_str(), Category::Procedure, None, Some(param_types));
                self.with_scope(|this| {
                    this.declare_params(&proc_decl.params);
                    this.analyze_block(&proc_decl.body);
                });
            }
            Subroutine::Function(func_decl) => {
                let param_types = func_decl.params.iter().map(|p| p.declared_type).collect();
                self.declare(
                    func_decl.name.as_str(),
                    Category::Function,
                    Some(func_decl.return_type),
                    Some(param_types),
                );

                let outer_function = self.current_function.replace(FunctionContext {
                    name: func_decl.name.0.clone(),
                    return_type: func_decl.return_type,
                });
                self.with_scope(|this| {
                    this.declare_params(&func_decl.params);
                    this.analyze_block(&func_decl.body);
                });
                self.current_function = outer_function;
            }
        }
    }

    fn analyze_seq(&mut self, seq: &CommandSeq) {
        for command in seq.iter() {
            self.analyze_command(command);
        }
    }

    fn analyze_command(&mut self, command: &Command) {
        match command {
            Command::Assign { id, expr } => self.analyze_assignment(id.as_str(), expr),
            Command::ProcedureCall { name, args } => {
                let name = name.as_str();
                match self.symbols.lookup(name).cloned() {
                    None => self.report(SemanticError::UndeclaredProcedure(name.to_string())),
                    Some(symbol) if symbol.category == Category::Procedure => {
                        let params = symbol.params.unwrap_or_default();
                        self.check_arguments(name, &params, args);
                    }
                    Some(symbol) => self.report(SemanticError::NotAProcedure {
                        name: name.to_string(),
                        category: symbol.category,
                    }),
                }
            }
            Command::If { condition, body, else_branch } => {
                self.check_condition("if", condition);
                self.analyze_command(body);
                if let Some(else_branch) = else_branch {
                    self.analyze_command(else_branch);
                }
            }
            Command::While { condition, body } => {
                self.check_condition("while", condition);
                self.analyze_command(body);
            }
            Command::Read { vars } => {
                for var in vars {
                    let readable = self
                        .symbols
                        .lookup(var.as_str())
                        .map_or(false, |symbol| symbol.category.is_storage());
                    if !readable {
                        self.report(SemanticError::InvalidReadTarget(var.0.clone()));
                    }
                }
            }
            Command::Write { exprs } => {
                for expr in exprs {
                    self.analyze_expression(expr);
                }
            }
            Command::Compound { seq } => self.analyze_seq(seq),
        }
    }

    fn current_function_return(&self, name: &str) -> Option<Type> {
        self.current_function
            .as_ref()
            .filter(|ctx| ctx.name == name)
            .map(|ctx| ctx.return_type)
    }

    fn analyze_assignment(&mut self, name: &str, expr: &Expression) {
        let found = self.analyze_expression(expr);

        let expected = match self.symbols.lookup(name).cloned() {
            Some(symbol) if symbol.category.is_storage() => symbol.ty,
            resolved => match (self.current_function_return(name), resolved) {
                (Some(return_type), _) => Some(return_type),
                (None, Some(symbol)) => {
                    self.report(SemanticError::NotAssignable { name: name.to_string(), category: symbol.category });
                    return;
                }
                (None, None) => {
                    self.report(SemanticError::Undeclared(name.to_string()));
                    return;
                }
            },
        };

        if let Some(expected) = expected {
            if expected != found {
                self.report(SemanticError::IncompatibleTypes { name: name.to_string(), expected, found });
            }
        }
    }

    fn check_condition(&mut self, construct: &'static str, condition: &Expression) {
        let found = self.analyze_expression(condition);
        if found != Type::Boolean {
            self.report(SemanticError::ConditionNotBoolean { construct, found });
        }
    }

    // Arity first; argument types only when the count matches.
    fn check_arguments(&mut self, name: &str, params: &[Type], args: &[Expression]) {
        if args.len() != params.len() {
            self.report(SemanticError::ArityMismatch {
                name: name.to_string(),
                expected: params.len(),
                found: args.len(),
            });
            return;
        }
        for (index, (arg, &expected)) in args.iter().zip(params).enumerate() {
            let found = self.analyze_expression(arg);
            if found != expected {
                self.report(SemanticError::ArgumentTypeMismatch {
                    name: name.to_string(),
                    position: index + 1,
                    expected,
                    found,
                });
            }
        }
    }

    fn analyze_expression(&mut self, expr: &Expression) -> Type {
        match expr {
            Expression::Number { .. } => Type::Integer,
            Expression::Boolean { .. } => Type::Boolean,
            Expression::Variable { id } => match self.symbols.lookup(id.as_str()).cloned() {
                Some(symbol) => match symbol.ty {
                    Some(ty) => {
                        // A bare function name is a call without arguments, except
                        // inside that function's own body.
                        let expected = symbol.params.as_ref().map_or(0, Vec::len);
                        if symbol.category == Category::Function
                            && expected > 0
                            && self.current_function_return(id.as_str()).is_none()
                        {
                            self.report(SemanticError::ArityMismatch { name: id.0.clone(), expected, found: 0 });
                        }
                        ty
                    }
                    None => {
                        self.report(SemanticError::NotAValue { name: id.0.clone(), category: symbol.category });
                        Type::Integer
                    }
                },
                None => {
                    self.report(SemanticError::Undeclared(id.0.clone()));
                    Type::Integer // tipo fictício para seguir a análise
                }
            },
            Expression::FunctionCall { name, args } => {
                let name = name.as_str();
                match self.symbols.lookup(name).cloned() {
                    None => {
                        self.report(SemanticError::UndeclaredFunction(name.to_string()));
                        Type::Integer
                    }
                    Some(symbol) if symbol.category == Category::Function => {
                        let params = symbol.params.unwrap_or_default();
                        self.check_arguments(name, &params, args);
                        symbol.ty.unwrap_or(Type::Integer)
                    }
                    Some(symbol) if symbol.category == Category::Procedure => {
                        self.report(SemanticError::ProcedureInExpression(name.to_string()));
                        Type::Integer
                    }
                    Some(symbol) => {
                        self.report(SemanticError::NotAFunction { name: name.to_string(), category: symbol.category });
                        Type::Integer
                    }
                }
            }
            Expression::Unary { op, expr } => {
                let found = self.analyze_expression(expr);
                let expected = match op {
                    UnaryOperator::Not => Type::Boolean,
                    UnaryOperator::Neg => Type::Integer,
                };
                if found != expected {
                    self.report(SemanticError::UnaryOperandMismatch { op: *op, expected, found });
                }
                expected
            }
            Expression::Binary { op, left, right } => {
                let left = self.analyze_expression(left);
                let right = self.analyze_expression(right);
                self.check_binary(*op, left, right)
            }
        }
    }

    /// Result type of `left op right`; on a mismatch the error is reported and
    /// the operator's usual result type is still returned.
    fn check_binary(&mut self, op: BinaryOperator, left: Type, right: Type) -> Type {
        use BinaryOperator::*;

        let (operand, result) = match op {
            Add | Sub | Mul | Div => (Type::Integer, Type::Integer),
            Lt | Lte | Gt | Gte => (Type::Integer, Type::Boolean),
            And | Or => (Type::Boolean, Type::Boolean),
            Eq | Neq => {
                if left != right {
                    self.report(SemanticError::EqualityTypeMismatch { op, left, right });
                }
                return Type::Boolean;
            }
        };
        if left != operand || right != operand {
            self.report(SemanticError::OperandTypeMismatch { op, expected: operand, left, right });
        }
        result
    }
}
