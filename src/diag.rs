//! Collection and rendering of lexical and syntax errors.

use std::fmt;

use crate::token::{Token, TokenKind};

/// Line number (starting at one).
pub type Position = u32;

/// A single lexical or syntax error tied to a source line.
#[derive(Debug, PartialEq)]
pub struct Diagnostic {
    pub line: Position,
    pub location: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error{}: {}", self.line, self.location, self.message)
    }
}

/// Accumulates the errors found while scanning and parsing one unit of input
/// (a whole file, or one interactive line).
///
/// A fresh accumulator is created per unit, so "clearing the error flag"
/// between interactive lines needs no reset protocol.  The caller consults
/// [`Diagnostics::had_error`] before letting evaluation proceed.
#[derive(Debug, PartialEq, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    /// Record an error with no associated token, as raised by the scanner.
    pub fn report(&mut self, line: Position, message: &str) {
        self.0.push(Diagnostic {
            line,
            location: String::new(),
            message: message.to_owned(),
        });
    }

    /// Record an error at the given token.
    pub fn report_at(&mut self, token: &Token, message: &str) {
        let location = if token.kind == TokenKind::Eof {
            " at end".to_owned()
        } else {
            format!(" at '{}'", token.lexeme)
        };
        self.0.push(Diagnostic {
            line: token.line,
            location,
            message: message.to_owned(),
        });
    }

    pub fn had_error(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diag) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_accumulator_has_no_errors() {
        let diags = Diagnostics::new();
        assert!(!diags.had_error());
        assert_eq!(diags.to_string(), "");
    }

    #[test]
    fn scanner_style_report() {
        let mut diags = Diagnostics::new();
        diags.report(3, "Unexpected character.");
        assert!(diags.had_error());
        assert_eq!(diags.to_string(), "[line 3] Error: Unexpected character.");
    }

    #[test]
    fn report_at_token_quotes_its_lexeme() {
        let mut diags = Diagnostics::new();
        let token = Token::new(TokenKind::Semicolon, ";".to_owned(), None, 2);
        diags.report_at(&token, "Expect expression.");
        assert_eq!(diags.to_string(), "[line 2] Error at ';': Expect expression.");
    }

    #[test]
    fn report_at_eof_says_at_end() {
        let mut diags = Diagnostics::new();
        let token = Token::new(TokenKind::Eof, String::new(), None, 7);
        diags.report_at(&token, "Expect ')' after expression.");
        assert_eq!(
            diags.to_string(),
            "[line 7] Error at end: Expect ')' after expression."
        );
    }

    #[test]
    fn several_reports_render_one_per_line() {
        let mut diags = Diagnostics::new();
        diags.report(1, "Unexpected character.");
        diags.report(2, "Unterminated string.");
        assert_eq!(diags.len(), 2);
        assert_eq!(
            diags.to_string(),
            "[line 1] Error: Unexpected character.\n[line 2] Error: Unterminated string."
        );
    }
}
