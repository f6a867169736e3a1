//! A scanner, parser, and tree-walking evaluator for the Lox scripting
//! language.
//!
//! Source text is scanned into tokens, the tokens are parsed into a syntax
//! tree, and the tree is evaluated directly.  Lexical and syntax errors are
//! collected per unit of input so several can be reported in one pass;
//! runtime errors stop the offending unit without tearing down the session.
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod interpreter;
pub mod printer;
pub mod token;

mod diag;
mod environment;
mod eval;
mod parser;
mod scanner;
