//! Lox interpreter command-line.
//!
//! When called without argument it drops into an interactive
//! read-evaluate-print loop.  When called with the path of a script it runs
//! the script once and exits 65 if the script had a lexical or syntax error,
//! 70 if it raised a runtime error.

use std::env;
use std::fs;
use std::io;
use std::io::prelude::*;
use std::process;

use anyhow::{self, Context};

use lox::interpreter::{Interpreter, LoxError};

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    match args.as_slice() {
        [] => run_prompt()?,
        [path] => run_file(path)?,
        _ => {
            eprintln!("Usage: lox [script]");
            process::exit(64);
        }
    }
    Ok(())
}

fn run_file(path: &str) -> Result<(), anyhow::Error> {
    let source = fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;

    let mut interp_stdout = io::stdout();
    let mut interp = Interpreter::new(&mut interp_stdout);

    if let Err(e) = interp.run(&source) {
        eprintln!("{}", e);
        let code = match e {
            LoxError::Parse(_) => 65,
            LoxError::Runtime(_) => 70,
        };
        process::exit(code);
    }

    Ok(())
}

fn run_prompt() -> Result<(), io::Error> {
    let stdin = io::stdin();
    let mut repl_stdout = io::stdout();
    let mut interp_stdout = io::stdout();

    let mut interp = Interpreter::new(&mut interp_stdout);

    let mut input = String::new();
    loop {
        repl_stdout.write_all(b"> ")?;
        repl_stdout.flush()?;

        input.clear();
        let nbytes = stdin.read_line(&mut input)?;
        if nbytes == 0 {
            break;
        }

        // A bad line is reported and the next one starts clean.
        if let Err(e) = interp.run(&input) {
            eprintln!("{}", e);
        }
    }

    Ok(())
}
