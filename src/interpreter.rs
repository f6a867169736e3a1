//! API to control the interpreter.

use std::error::Error;
use std::fmt;
use std::io::prelude::*;

use log::{debug, trace};

use crate::diag::Diagnostics;
use crate::eval::{Evaluator, RuntimeError};
use crate::parser::Parser;
use crate::scanner::Scanner;

/// Tree-walk interpreter.
///
/// Each call to [`Interpreter::run`] pushes one unit of input (a whole file,
/// or one interactive line) through the scan/parse/evaluate pipeline.  The
/// global environment is shared across calls, which is what an interactive
/// session relies on:
///
/// ```
/// # use lox::interpreter::{Interpreter, LoxError};
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// interp.run("var greeting = \"hello\";")?;
/// interp.run("print greeting + \" world\";")?;
///
/// assert_eq!(output, b"hello world\n");
/// # Ok::<(), LoxError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write> {
    evaluator: Evaluator<'t, W>,
}

/// Errors the interpreter can raise.
#[derive(Debug)]
pub enum LoxError {
    /// Lexical or syntax errors.  Evaluation was skipped for this unit.
    Parse(Diagnostics),

    /// Error occurring during evaluation.
    Runtime(RuntimeError),
}

impl fmt::Display for LoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoxError::Parse(diags) => write!(f, "{}", diags),
            LoxError::Runtime(e) => write!(f, "runtime error: {}", e),
        }
    }
}

impl Error for LoxError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoxError::Parse(_) => None,
            LoxError::Runtime(e) => Some(e),
        }
    }
}

impl From<RuntimeError> for LoxError {
    fn from(e: RuntimeError) -> LoxError {
        LoxError::Runtime(e)
    }
}

impl<W: Write> Interpreter<'_, W> {
    pub fn new(output: &mut W) -> Interpreter<'_, W> {
        Interpreter {
            evaluator: Evaluator::new(output),
        }
    }

    /// Run one unit of input.
    ///
    /// Scanning and parsing always run to completion so that every lexical
    /// and syntax error in the unit is collected; if any was found the unit
    /// is not evaluated at all.
    pub fn run(&mut self, source: &str) -> Result<(), LoxError> {
        let mut diags = Diagnostics::new();

        trace!("scanning {} bytes", source.len());
        let tokens = Scanner::new(source, &mut diags).scan_tokens();

        trace!("parsing {} tokens", tokens.len());
        let program = Parser::new(&tokens, &mut diags).parse();

        if diags.had_error() {
            return Err(LoxError::Parse(diags));
        }

        debug!("executing {} statements", program.len());
        self.evaluator.interpret(&program)?;
        Ok(())
    }
}
