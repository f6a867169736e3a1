//! Tree-walking evaluation of parsed programs.

use std::error::Error;
use std::fmt;
use std::io;
use std::io::prelude::*;

use crate::ast::{Expr, Lit, Stmt};
use crate::environment::Environment;
use crate::token::{Token, TokenKind};

/// Runtime values.  Immutable: operators never mutate an operand.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Value {
    /// `nil` and `false` are falsey; every other value, including `0`, is
    /// truthy.
    fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }
}

impl From<&Lit> for Value {
    fn from(lit: &Lit) -> Value {
        match lit {
            Lit::Nil => Value::Nil,
            Lit::Bool(b) => Value::Bool(*b),
            Lit::Number(n) => Value::Number(*n),
            Lit::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            // An integral f64 renders without its fractional part, so 4.0
            // prints as 4.
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Errors raised during evaluation.
///
/// Each variant except `Io` carries the offending token so the report can
/// name the source line.
#[derive(Debug)]
pub enum RuntimeError {
    OperandMustBeNumber(Token),
    OperandsMustBeNumbers(Token),
    OperandsMustBeNumbersOrStrings(Token),
    UndefinedVariable(Token),
    Io(io::Error),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::OperandMustBeNumber(t) => {
                write!(f, "[line {}] Operand must be a number.", t.line)
            }
            RuntimeError::OperandsMustBeNumbers(t) => {
                write!(f, "[line {}] Operands must be numbers.", t.line)
            }
            RuntimeError::OperandsMustBeNumbersOrStrings(t) => {
                write!(f, "[line {}] Operands must be two numbers or two strings.", t.line)
            }
            RuntimeError::UndefinedVariable(t) => {
                write!(f, "[line {}] Undefined variable '{}'.", t.line, t.lexeme)
            }
            RuntimeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> RuntimeError {
        RuntimeError::Io(e)
    }
}

/// Walks the syntax tree, executing statements for effect and reducing
/// expressions to values.
///
/// The evaluator owns the environment chain; the global frame persists for
/// the evaluator's whole lifetime so state carries over between programs run
/// against the same instance.
#[derive(Debug)]
pub struct Evaluator<'t, W: Write> {
    output: &'t mut W,
    environment: Environment,
}

impl<'t, W: Write> Evaluator<'t, W> {
    pub fn new(output: &'t mut W) -> Evaluator<'t, W> {
        Evaluator {
            output,
            environment: Environment::new(),
        }
    }

    /// Execute statements in order, stopping at the first runtime error.
    /// Environment changes made by earlier statements are kept.
    pub fn interpret(&mut self, program: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in program {
            self.execute(stmt)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.evaluate(expr)?;
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value)?;
            }
            Stmt::VarDecl(name, init) => {
                let value = match init {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(&name.lexeme, value);
            }
            Stmt::Block(stmts) => {
                self.environment.push();
                let result = stmts.iter().try_for_each(|stmt| self.execute(stmt));
                // The block's frame is discarded on the error path too.
                self.environment.pop();
                result?;
            }
        }
        Ok(())
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit) => Ok(Value::from(lit)),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Variable(name) => match self.environment.get(&name.lexeme) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::UndefinedVariable(name.clone())),
            },
            Expr::Assign(name, rhs) => {
                let value = self.evaluate(rhs)?;
                if self.environment.assign(&name.lexeme, value.clone()) {
                    // The assignment's own value, for chained assignment.
                    Ok(value)
                } else {
                    Err(RuntimeError::UndefinedVariable(name.clone()))
                }
            }
            Expr::Unary(operator, rhs) => {
                let right = self.evaluate(rhs)?;
                match operator.kind {
                    TokenKind::Minus => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(RuntimeError::OperandMustBeNumber(operator.clone())),
                    },
                    TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
                    _ => unreachable!("unary operator {:?}", operator.kind),
                }
            }
            Expr::Binary(lhs, operator, rhs) => {
                let left = self.evaluate(lhs)?;
                let right = self.evaluate(rhs)?;
                eval_binary(left, operator, right)
            }
        }
    }
}

fn eval_binary(left: Value, operator: &Token, right: Value) -> Result<Value, RuntimeError> {
    match operator.kind {
        TokenKind::Plus => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::Str(l), Value::Str(r)) => Ok(Value::Str(l + &r)),
            _ => Err(RuntimeError::OperandsMustBeNumbersOrStrings(operator.clone())),
        },
        TokenKind::Minus => {
            let (l, r) = number_operands(left, right, operator)?;
            Ok(Value::Number(l - r))
        }
        TokenKind::Star => {
            let (l, r) = number_operands(left, right, operator)?;
            Ok(Value::Number(l * r))
        }
        // Division by zero is not guarded; it yields the host float's
        // infinity or NaN.
        TokenKind::Slash => {
            let (l, r) = number_operands(left, right, operator)?;
            Ok(Value::Number(l / r))
        }
        TokenKind::Greater => {
            let (l, r) = number_operands(left, right, operator)?;
            Ok(Value::Bool(l > r))
        }
        TokenKind::GreaterEqual => {
            let (l, r) = number_operands(left, right, operator)?;
            Ok(Value::Bool(l >= r))
        }
        TokenKind::Less => {
            let (l, r) = number_operands(left, right, operator)?;
            Ok(Value::Bool(l < r))
        }
        TokenKind::LessEqual => {
            let (l, r) = number_operands(left, right, operator)?;
            Ok(Value::Bool(l <= r))
        }
        TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
        TokenKind::BangEqual => Ok(Value::Bool(left != right)),
        _ => unreachable!("binary operator {:?}", operator.kind),
    }
}

fn number_operands(
    left: Value,
    right: Value,
    operator: &Token,
) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((l, r)),
        _ => Err(RuntimeError::OperandsMustBeNumbers(operator.clone())),
    }
}
