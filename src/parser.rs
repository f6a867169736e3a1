//! Recursive-descent parser.
//!
//! Each grammar rule is one method; precedence is encoded by the call order
//! between the expression methods, and left associativity by folding repeated
//! operators of one level into a left-leaning `Binary` node.

use crate::ast::{Expr, Lit, Stmt};
use crate::diag::Diagnostics;
use crate::token::{Literal, Token, TokenKind};

/// A syntax error on its way to the diagnostics accumulator: the offending
/// token and a human-readable message.
///
/// Expression- and statement-level rules return this through `Result` so the
/// statement loop in [`Parser::parse`] decides where to resynchronize.
#[derive(Debug, PartialEq)]
pub struct SyntaxError {
    pub token: Token,
    pub message: String,
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    diags: &'a mut Diagnostics,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], diags: &'a mut Diagnostics) -> Parser<'a> {
        Parser {
            tokens,
            current: 0,
            diags,
        }
    }

    /// Parse a whole program.
    ///
    /// A statement that fails to parse is reported and skipped; the parser
    /// then discards tokens up to the next statement boundary and goes on, so
    /// each malformed statement costs one diagnostic rather than a cascade.
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut program = vec![];
        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => program.push(stmt),
                Err(e) => {
                    self.diags.report_at(&e.token, &e.message);
                    self.synchronize();
                }
            }
        }
        program
    }

    /// Parse a single expression (the interactive sub-mode).
    #[allow(dead_code)]
    pub fn parse_expression(&mut self) -> Option<Expr> {
        match self.expression() {
            Ok(expr) => Some(expr),
            Err(e) => {
                self.diags.report_at(&e.token, &e.message);
                None
            }
        }
    }

    fn declaration(&mut self) -> Result<Stmt, SyntaxError> {
        if self.matches(&[TokenKind::Var]) {
            self.var_decl()
        } else {
            self.statement()
        }
    }

    /// Current position is just past the `var` keyword.
    fn var_decl(&mut self) -> Result<Stmt, SyntaxError> {
        let name = self
            .consume(TokenKind::Identifier, "Expect variable name.")?
            .clone();
        let init = if self.matches(&[TokenKind::Equal]) {
            Some(Box::new(self.expression()?))
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::VarDecl(name, init))
    }

    fn statement(&mut self) -> Result<Stmt, SyntaxError> {
        if self.matches(&[TokenKind::Print]) {
            let expr = Box::new(self.expression()?);
            self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
            Ok(Stmt::Print(expr))
        } else if self.matches(&[TokenKind::LeftCurly]) {
            Ok(Stmt::Block(self.block()?))
        } else {
            let expr = Box::new(self.expression()?);
            self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
            Ok(Stmt::Expr(expr))
        }
    }

    fn block(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        let mut stmts = vec![];
        while !self.check(TokenKind::RightCurly) && !self.is_at_end() {
            stmts.push(self.declaration()?);
        }
        self.consume(TokenKind::RightCurly, "Expect '}' after block.")?;
        Ok(stmts)
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        self.assignment()
    }

    /// Right-recursive so `a = b = c` parses as `a = (b = c)`.
    fn assignment(&mut self) -> Result<Expr, SyntaxError> {
        let expr = self.equality()?;

        if self.matches(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(name) => Ok(Expr::Assign(name, Box::new(value))),
                other => {
                    // Reported without unwinding; the accumulator already
                    // prevents this unit from being evaluated.
                    self.diags.report_at(&equals, "Invalid assignment target.");
                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.comparison()?;
        while self.matches(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right));
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.term()?;
        while self.matches(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right));
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.factor()?;
        while self.matches(&[TokenKind::Minus, TokenKind::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right));
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.unary()?;
        while self.matches(&[TokenKind::Slash, TokenKind::Star]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(Box::new(expr), operator, Box::new(right));
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        if self.matches(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            Ok(Expr::Unary(operator, Box::new(right)))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek().kind {
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(Lit::Bool(false)))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal(Lit::Bool(true)))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Expr::Literal(Lit::Nil))
            }
            TokenKind::Number | TokenKind::String => {
                let token = self.advance().clone();
                match token.literal.clone() {
                    Some(Literal::Number(n)) => Ok(Expr::Literal(Lit::Number(n))),
                    Some(Literal::Str(s)) => Ok(Expr::Literal(Lit::Str(s))),
                    None => Err(SyntaxError {
                        token,
                        message: "Expect expression.".to_owned(),
                    }),
                }
            }
            TokenKind::Identifier => Ok(Expr::Variable(self.advance().clone())),
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
                Ok(Expr::Grouping(Box::new(expr)))
            }
            _ => Err(self.error_here("Expect expression.")),
        }
    }

    /// Discard tokens until just past a `;` or just before a token that can
    /// begin a statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(message))
        }
    }

    fn error_here(&self, message: &str) -> SyntaxError {
        SyntaxError {
            token: self.peek().clone(),
            message: message.to_owned(),
        }
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        for kind in kinds {
            if self.check(*kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::render;
    use crate::scanner::Scanner;

    fn parse_expr(input: &str) -> Expr {
        let mut diags = Diagnostics::new();
        let tokens = Scanner::new(input, &mut diags).scan_tokens();
        let expr = Parser::new(&tokens, &mut diags).parse_expression();
        assert!(!diags.had_error(), "unexpected diagnostics: {}", diags);
        expr.expect("no expression parsed")
    }

    fn parse_prg(input: &str) -> Vec<Stmt> {
        let mut diags = Diagnostics::new();
        let tokens = Scanner::new(input, &mut diags).scan_tokens();
        let program = Parser::new(&tokens, &mut diags).parse();
        assert!(!diags.had_error(), "unexpected diagnostics: {}", diags);
        program
    }

    fn parse_with_errors(input: &str) -> (Vec<Stmt>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let tokens = Scanner::new(input, &mut diags).scan_tokens();
        let program = Parser::new(&tokens, &mut diags).parse();
        (program, diags)
    }

    #[test]
    fn literals() {
        assert_eq!(parse_expr("42"), Expr::Literal(Lit::Number(42.0)));
        assert_eq!(parse_expr("true"), Expr::Literal(Lit::Bool(true)));
        assert_eq!(parse_expr("false"), Expr::Literal(Lit::Bool(false)));
        assert_eq!(parse_expr("nil"), Expr::Literal(Lit::Nil));
        assert_eq!(
            parse_expr("\"abc\""),
            Expr::Literal(Lit::Str("abc".to_owned()))
        );
    }

    #[test]
    fn factors_bind_tighter_than_terms() {
        assert_eq!(render(&parse_expr("1 + 2 * 3")), "(+ 1 (* 2 3))");
    }

    #[test]
    fn grouping_overrides_precedence() {
        assert_eq!(render(&parse_expr("(1 + 2) * 3")), "(* (group (+ 1 2)) 3)");
    }

    #[test]
    fn terms_are_left_associative() {
        assert_eq!(render(&parse_expr("1 - 2 - 3")), "(- (- 1 2) 3)");
    }

    #[test]
    fn comparison_binds_tighter_than_equality() {
        assert_eq!(render(&parse_expr("1 < 2 == true")), "(== (< 1 2) true)");
        assert_eq!(render(&parse_expr("1 >= 2 != 3 <= 4")), "(!= (>= 1 2) (<= 3 4))");
    }

    #[test]
    fn unary_operators_nest() {
        assert_eq!(render(&parse_expr("!!true")), "(! (! true))");
        assert_eq!(render(&parse_expr("--1")), "(- (- 1))");
        assert_eq!(render(&parse_expr("-1 * 2")), "(* (- 1) 2)");
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(render(&parse_expr("a = b = 1")), "(= a (= b 1))");
    }

    #[test]
    fn invalid_assignment_target() {
        let mut diags = Diagnostics::new();
        let tokens = Scanner::new("(1 + a) = b", &mut diags).scan_tokens();
        let expr = Parser::new(&tokens, &mut diags).parse_expression();
        assert_eq!(
            diags.to_string(),
            "[line 1] Error at '=': Invalid assignment target."
        );
        // The left-hand expression is kept so parsing can continue.
        assert_eq!(render(&expr.expect("no expression parsed")), "(group (+ 1 a))");
    }

    #[test]
    fn missing_right_paren() {
        let mut diags = Diagnostics::new();
        let tokens = Scanner::new("(1", &mut diags).scan_tokens();
        let expr = Parser::new(&tokens, &mut diags).parse_expression();
        assert_eq!(expr, None);
        assert_eq!(
            diags.to_string(),
            "[line 1] Error at end: Expect ')' after expression."
        );
    }

    #[test]
    fn missing_expression() {
        let mut diags = Diagnostics::new();
        let tokens = Scanner::new("+", &mut diags).scan_tokens();
        assert_eq!(Parser::new(&tokens, &mut diags).parse_expression(), None);
        assert_eq!(diags.to_string(), "[line 1] Error at '+': Expect expression.");
    }

    #[test]
    fn expr_stmts() {
        let program = parse_prg("1; 1 + 2;");
        assert_eq!(program.len(), 2);
        assert!(matches!(program[0], Stmt::Expr(_)));
        assert!(matches!(program[1], Stmt::Expr(_)));
    }

    #[test]
    fn print_stmt() {
        let program = parse_prg("print 1 + 2;");
        match &program[..] {
            [Stmt::Print(expr)] => assert_eq!(render(expr), "(+ 1 2)"),
            p => panic!("unexpected output: {:?}", p),
        }
    }

    #[test]
    fn var_decl_with_initializer() {
        let program = parse_prg("var foo = 2 * 3.14;");
        match &program[..] {
            [Stmt::VarDecl(name, Some(init))] => {
                assert_eq!(name.lexeme, "foo");
                assert_eq!(render(init), "(* 2 3.14)");
            }
            p => panic!("unexpected output: {:?}", p),
        }
    }

    #[test]
    fn var_decl_without_initializer() {
        let program = parse_prg("var foo;");
        match &program[..] {
            [Stmt::VarDecl(name, None)] => assert_eq!(name.lexeme, "foo"),
            p => panic!("unexpected output: {:?}", p),
        }
    }

    #[test]
    fn empty_block() {
        assert_eq!(parse_prg("{ }"), vec![Stmt::Block(vec![])]);
    }

    #[test]
    fn nested_blocks() {
        let program = parse_prg("{ 1; { 2; } }");
        match &program[..] {
            [Stmt::Block(outer)] => {
                assert_eq!(outer.len(), 2);
                assert!(matches!(outer[1], Stmt::Block(_)));
            }
            p => panic!("unexpected output: {:?}", p),
        }
    }

    #[test]
    fn missing_semicolon_after_print_value() {
        let (_, diags) = parse_with_errors("print 1");
        assert_eq!(
            diags.to_string(),
            "[line 1] Error at end: Expect ';' after value."
        );
    }

    #[test]
    fn missing_variable_name() {
        let (_, diags) = parse_with_errors("var = 1;");
        assert_eq!(
            diags.to_string(),
            "[line 1] Error at '=': Expect variable name."
        );
    }

    #[test]
    fn unclosed_block() {
        let (_, diags) = parse_with_errors("{ 1;");
        assert_eq!(diags.to_string(), "[line 1] Error at end: Expect '}' after block.");
    }

    #[test]
    fn parser_recovers_at_statement_boundary() {
        let (program, diags) = parse_with_errors("var = 1; print 2;");
        assert_eq!(diags.len(), 1);
        match &program[..] {
            [Stmt::Print(expr)] => assert_eq!(render(expr), "2"),
            p => panic!("unexpected output: {:?}", p),
        }
    }

    #[test]
    fn one_diagnostic_per_malformed_statement() {
        let (program, diags) = parse_with_errors("print ; var ; print 3;");
        assert_eq!(diags.len(), 2);
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn parsing_is_idempotent() {
        let mut diags = Diagnostics::new();
        let tokens = Scanner::new("var a = 1 + 2; { print a; a = a * 2; }", &mut diags).scan_tokens();
        let first = Parser::new(&tokens, &mut diags).parse();
        let second = Parser::new(&tokens, &mut diags).parse();
        assert!(!diags.had_error());
        assert_eq!(first, second);
    }
}
