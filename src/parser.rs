// src/parser.rs
use crate::ast::*;
use crate::lexer::SpannedToken;
use crate::token::Token;
use std::iter::Peekable;
use std::mem::discriminant;

type TokenStream<'a, 'source> = Peekable<std::slice::Iter<'a, SpannedToken<'source>>>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at token '{found}' (kind: {kind}) on line {line}: expected {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        kind: &'static str,
        line: usize,
    },
    #[error("Syntax error: unexpected end of input while expecting {expected}")]
    UnexpectedEof { expected: String },
}

impl ParseError {
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { line, .. } => Some(*line),
            ParseError::UnexpectedEof { .. } => None,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Binding power of operators, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Or,
    And,
    Not,
    Relational,
    Additive,
    Multiplicative,
    Unary,
}

impl Precedence {
    fn next(self) -> Precedence {
        match self {
            Precedence::Lowest => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Not,
            Precedence::Not => Precedence::Relational,
            Precedence::Relational => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative | Precedence::Unary => Precedence::Unary,
        }
    }
}

fn binary_operator(token: &Token<'_>) -> Option<(BinaryOperator, Precedence)> {
    let entry = match token {
        Token::KwOr => (BinaryOperator::Or, Precedence::Or),
        Token::KwAnd => (BinaryOperator::And, Precedence::And),
        Token::Equal => (BinaryOperator::Eq, Precedence::Relational),
        Token::NotEqual => (BinaryOperator::Neq, Precedence::Relational),
        Token::LessThan => (BinaryOperator::Lt, Precedence::Relational),
        Token::LessThanEqual => (BinaryOperator::Lte, Precedence::Relational),
        Token::GreaterThan => (BinaryOperator::Gt, Precedence::Relational),
        Token::GreaterThanEqual => (BinaryOperator::Gte, Precedence::Relational),
        Token::Plus => (BinaryOperator::Add, Precedence::Additive),
        Token::Minus => (BinaryOperator::Sub, Precedence::Additive),
        Token::Star => (BinaryOperator::Mul, Precedence::Multiplicative),
        Token::KwDiv => (BinaryOperator::Div, Precedence::Multiplicative),
        _ => return None,
    };
    Some(entry)
}

pub struct Parser<'a, 'source> {
    tokens: TokenStream<'a, 'source>,
}

impl<'a, 'source> Parser<'a, 'source> {
    pub fn new(tokens: &'a [SpannedToken<'source>]) -> Self {
        Parser { tokens: tokens.iter().peekable() }
    }

    fn peek(&mut self) -> Option<&'a SpannedToken<'source>> {
        self.tokens.peek().copied()
    }

    fn next_is(&mut self, expected: &Token<'source>) -> bool {
        self.peek().map_or(false, |t| discriminant(&t.token) == discriminant(expected))
    }

    fn consume_if(&mut self, expected: &Token<'source>) -> bool {
        if self.next_is(expected) {
            self.tokens.next();
            true
        } else {
            false
        }
    }

    /// Error for whatever token sits at the cursor.
    fn unexpected(&mut self, expected_desc: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedToken {
                expected: expected_desc.to_string(),
                found: found.token.to_string(),
                kind: found.token.kind_name(),
                line: found.line,
            },
            None => ParseError::UnexpectedEof { expected: expected_desc.to_string() },
        }
    }

    fn expect(&mut self, expected: &Token<'source>, expected_desc: &str) -> ParseResult<&'a SpannedToken<'source>> {
        match self.peek() {
            Some(tok) if discriminant(&tok.token) == discriminant(expected) => {
                self.tokens.next();
                Ok(tok)
            }
            _ => Err(self.unexpected(expected_desc)),
        }
    }

    fn expect_identifier(&mut self, expected_desc: &str) -> ParseResult<Identifier> {
        match self.peek().map(|t| t.token) {
            Some(Token::Identifier(name)) => {
                self.tokens.next();
                Ok(Identifier::new(name))
            }
            _ => Err(self.unexpected(expected_desc)),
        }
    }

    pub fn parse_program(&mut self) -> ParseResult<ProgramNode> {
        self.expect(&Token::KwProgram, "'program'")?;
        let name = self.expect_identifier("program name")?;
        self.expect(&Token::Semicolon, "';'")?;
        let body = self.parse_block(true)?;
        self.expect(&Token::Dot, "'.'")?;
        if self.peek().is_some() {
            return Err(self.unexpected("end of input"));
        }
        Ok(ProgramNode { name, body })
    }

    // Corpos de sub-rotinas não aceitam sub-rotinas aninhadas
    fn parse_block(&mut self, allow_subroutines: bool) -> ParseResult<Block> {
        let vars = if self.next_is(&Token::KwVar) {
            self.parse_var_section()?
        } else {
            Vec::new()
        };

        let mut subroutines = Vec::new();
        while allow_subroutines {
            let subroutine = match self.peek().map(|t| t.token) {
                Some(Token::KwProcedure) => Subroutine::Procedure(self.parse_procedure()?),
                Some(Token::KwFunction) => Subroutine::Function(self.parse_function()?),
                _ => break,
            };
            tracing::trace!(name = subroutine.name().as_str(), "parsed subroutine");
            subroutines.push(subroutine);
            self.expect(&Token::Semicolon, "';' after subroutine declaration")?;
        }

        let commands = self.parse_compound()?;
        Ok(Block { vars, subroutines, commands })
    }

    fn parse_var_section(&mut self) -> ParseResult<Vec<VarDecl>> {
        self.expect(&Token::KwVar, "'var'")?;
        let mut vars = Vec::new();
        loop {
            let (ids, declared_type) = self.parse_typed_id_group()?;
            vars.extend(ids.into_iter().map(|id| VarDecl { id, declared_type }));
            self.expect(&Token::Semicolon, "';'")?;
            if !self.next_is(&Token::Identifier("")) {
                break;
            }
        }
        Ok(vars)
    }

    /// `a, b, c : type`
    fn parse_typed_id_group(&mut self) -> ParseResult<(Vec<Identifier>, Type)> {
        let ids = self.parse_id_list()?;
        self.expect(&Token::Colon, "':'")?;
        let declared_type = self.parse_type()?;
        Ok((ids, declared_type))
    }

    fn parse_id_list(&mut self) -> ParseResult<Vec<Identifier>> {
        let mut ids = vec![self.expect_identifier("identifier")?];
        while self.consume_if(&Token::Comma) {
            ids.push(self.expect_identifier("identifier")?);
        }
        Ok(ids)
    }

    fn parse_type(&mut self) -> ParseResult<Type> {
        const EXPECTED: &str = "type (integer or boolean)";
        match self.peek().map(|t| t.token) {
            Some(Token::Identifier(name)) => match Type::from_name(name) {
                Some(ty) => {
                    self.tokens.next();
                    Ok(ty)
                }
                None => Err(self.unexpected(EXPECTED)),
            },
            _ => Err(self.unexpected(EXPECTED)),
        }
    }

    fn parse_formal_params(&mut self) -> ParseResult<Vec<ParamDecl>> {
        let mut params = Vec::new();
        if !self.consume_if(&Token::LParen) {
            return Ok(params);
        }
        loop {
            let (ids, declared_type) = self.parse_typed_id_group()?;
            params.extend(ids.into_iter().map(|id| ParamDecl { id, declared_type }));
            if !self.consume_if(&Token::Semicolon) {
                break;
            }
        }
        self.expect(&Token::RParen, "')'")?;
        Ok(params)
    }

    fn parse_procedure(&mut self) -> ParseResult<ProcedureDecl> {
        self.expect(&Token::KwProcedure, "'procedure'")?;
        let name = self.expect_identifier("procedure name")?;
        let params = self.parse_formal_params()?;
        self.expect(&Token::Semicolon, "';'")?;
        let body = self.parse_block(false)?;
        Ok(ProcedureDecl { name, params, body })
    }

    fn parse_function(&mut self) -> ParseResult<FunctionDecl> {
        self.expect(&Token::KwFunction, "'function'")?;
        let name = self.expect_identifier("function name")?;
        let params = self.parse_formal_params()?;
        self.expect(&Token::Colon, "':' and function return type")?;
        let return_type = self.parse_type()?;
        self.expect(&Token::Semicolon, "';'")?;
        let body = self.parse_block(false)?;
        Ok(FunctionDecl { name, params, return_type, body })
    }

    fn parse_compound(&mut self) -> ParseResult<CommandSeq> {
        self.expect(&Token::KwBegin, "'begin'")?;
        if self.consume_if(&Token::KwEnd) {
            return Ok(CommandSeq::empty());
        }
        let mut commands = vec![self.parse_command()?];
        while self.consume_if(&Token::Semicolon) {
            commands.push(self.parse_command()?);
        }
        self.expect(&Token::KwEnd, "';' or 'end'")?;
        Ok(commands.into_iter().collect())
    }

    fn parse_command(&mut self) -> ParseResult<Command> {
        let Some(peeked) = self.peek() else {
            return Err(self.unexpected("command"));
        };

        match peeked.token {
            Token::Identifier(name) => {
                self.tokens.next();
                let name = Identifier::new(name);
                if self.consume_if(&Token::Assign) {
                    let expr = self.parse_expression()?;
                    Ok(Command::Assign { id: name, expr })
                } else if self.consume_if(&Token::LParen) {
                    let args = self.parse_call_args()?;
                    Ok(Command::ProcedureCall { name, args })
                } else {
                    Err(self.unexpected("':=' or '('"))
                }
            }
            Token::KwIf => {
                self.tokens.next();
                let condition = self.parse_expression()?;
                self.expect(&Token::KwThen, "'then'")?;
                let body = Box::new(self.parse_command()?);
                // o else fica com o if mais interno ainda aberto
                let else_branch = if self.consume_if(&Token::KwElse) {
                    Some(Box::new(self.parse_command()?))
                } else {
                    None
                };
                Ok(Command::If { condition, body, else_branch })
            }
            Token::KwWhile => {
                self.tokens.next();
                let condition = self.parse_expression()?;
                self.expect(&Token::KwDo, "'do'")?;
                let body = Box::new(self.parse_command()?);
                Ok(Command::While { condition, body })
            }
            Token::KwWrite => {
                self.tokens.next();
                self.expect(&Token::LParen, "'('")?;
                let exprs = self.parse_expression_list()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(Command::Write { exprs })
            }
            Token::KwRead => {
                self.tokens.next();
                self.expect(&Token::LParen, "'('")?;
                let vars = self.parse_id_list()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(Command::Read { vars })
            }
            Token::KwBegin => Ok(Command::Compound { seq: self.parse_compound()? }),
            _ => Err(self.unexpected("command")),
        }
    }

    /// Arguments after an already consumed `(`, up to and including `)`.
    fn parse_call_args(&mut self) -> ParseResult<Vec<Expression>> {
        if self.consume_if(&Token::RParen) {
            return Ok(Vec::new());
        }
        let args = self.parse_expression_list()?;
        self.expect(&Token::RParen, "',' or ')'")?;
        Ok(args)
    }

    fn parse_expression_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut exprs = vec![self.parse_expression()?];
        while self.consume_if(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_expression_at(Precedence::Lowest)
    }

    // Precedence climbing. Relational operators are non-associative, so a
    // second one directly after a relational result is rejected.
    fn parse_expression_at(&mut self, min: Precedence) -> ParseResult<Expression> {
        let mut lhs = self.parse_prefix()?;
        let mut after_relational = false;

        while let Some((op, prec)) = self.peek().and_then(|t| binary_operator(&t.token)) {
            if prec < min {
                break;
            }
            if prec == Precedence::Relational && after_relational {
                return Err(self.unexpected("operand or operator other than a second comparison"));
            }
            self.tokens.next();
            let rhs = self.parse_expression_at(prec.next())?;
            lhs = Expression::Binary { op, left: Box::new(lhs), right: Box::new(rhs) };
            after_relational = prec == Precedence::Relational;
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expression> {
        if self.consume_if(&Token::KwNot) {
            let expr = self.parse_expression_at(Precedence::Not)?;
            return Ok(Expression::Unary { op: UnaryOperator::Not, expr: Box::new(expr) });
        }
        if self.consume_if(&Token::Minus) {
            let expr = self.parse_expression_at(Precedence::Unary)?;
            return Ok(Expression::Unary { op: UnaryOperator::Neg, expr: Box::new(expr) });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let Some(peeked) = self.peek() else {
            return Err(self.unexpected("expression"));
        };

        let expr = match peeked.token {
            Token::Number(value) => {
                self.tokens.next();
                Expression::Number { value }
            }
            Token::KwTrue => {
                self.tokens.next();
                Expression::Boolean { value: true }
            }
            Token::KwFalse => {
                self.tokens.next();
                Expression::Boolean { value: false }
            }
            Token::Identifier(name) => {
                self.tokens.next();
                if self.consume_if(&Token::LParen) {
                    let args = self.parse_call_args()?;
                    Expression::FunctionCall { name: Identifier::new(name), args }
                } else {
                    Expression::Variable { id: Identifier::new(name) }
                }
            }
            Token::LParen => {
                self.tokens.next();
                let inner = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                inner
            }
            _ => return Err(self.unexpected("expression")),
        };
        Ok(expr)
    }
}
