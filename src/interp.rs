//! Bundled reference implementation of the runtime capability.
//!
//! A deliberately small scripting runtime so the console binary is usable
//! out of the box: `say <expr>`, `<name> = <expr>`, bare expressions,
//! 64-bit integer arithmetic, text literals with `+` concatenation, and
//! `#` line comments. Globals persist across units within one session.
//! The console driver itself stays generic over [`Runtime`]; nothing in it
//! depends on this module.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use indexmap::IndexMap;

use crate::loader::RawSource;
use crate::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Identifier,
    Number,
    Text,
    Say,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Assign,
    Terminator,
    Eof,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    lexeme: String,
    line: u32,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}

#[derive(Debug)]
struct ParseError {
    line: u32,
    message: String,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: u32,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.chars.next() {
            match ch {
                ' ' | '\t' | '\r' => {}
                '\n' => {
                    tokens.push(Token::new(TokenKind::Terminator, "\n", self.line));
                    self.line += 1;
                }
                ';' => tokens.push(Token::new(TokenKind::Terminator, ";", self.line)),
                '#' => {
                    while let Some(&next) = self.chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                '+' => tokens.push(Token::new(TokenKind::Plus, "+", self.line)),
                '-' => tokens.push(Token::new(TokenKind::Minus, "-", self.line)),
                '*' => tokens.push(Token::new(TokenKind::Star, "*", self.line)),
                '/' => tokens.push(Token::new(TokenKind::Slash, "/", self.line)),
                '%' => tokens.push(Token::new(TokenKind::Percent, "%", self.line)),
                '(' => tokens.push(Token::new(TokenKind::LParen, "(", self.line)),
                ')' => tokens.push(Token::new(TokenKind::RParen, ")", self.line)),
                '=' => tokens.push(Token::new(TokenKind::Assign, "=", self.line)),
                '"' => {
                    let value = self.text_literal()?;
                    tokens.push(Token::new(TokenKind::Text, value, self.line));
                }
                ch if ch.is_ascii_digit() => {
                    let mut lexeme = String::from(ch);
                    while let Some(&next) = self.chars.peek() {
                        if !next.is_ascii_digit() {
                            break;
                        }
                        lexeme.push(next);
                        self.chars.next();
                    }
                    tokens.push(Token::new(TokenKind::Number, lexeme, self.line));
                }
                ch if ch.is_ascii_alphabetic() || ch == '_' => {
                    let mut lexeme = String::from(ch);
                    while let Some(&next) = self.chars.peek() {
                        if !next.is_ascii_alphanumeric() && next != '_' {
                            break;
                        }
                        lexeme.push(next);
                        self.chars.next();
                    }
                    let kind = if lexeme == "say" {
                        TokenKind::Say
                    } else {
                        TokenKind::Identifier
                    };
                    tokens.push(Token::new(kind, lexeme, self.line));
                }
                other => {
                    return Err(ParseError {
                        line: self.line,
                        message: format!("unexpected character `{other}`"),
                    });
                }
            }
        }
        tokens.push(Token::new(TokenKind::Eof, "", self.line));
        Ok(tokens)
    }

    fn text_literal(&mut self) -> Result<String, ParseError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                None | Some('\n') => {
                    return Err(ParseError {
                        line: self.line,
                        message: "unterminated text literal".into(),
                    });
                }
                Some('"') => return Ok(value),
                Some('\\') => match self.chars.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some(other) => {
                        return Err(ParseError {
                            line: self.line,
                            message: format!("unknown escape `\\{other}`"),
                        });
                    }
                    None => {
                        return Err(ParseError {
                            line: self.line,
                            message: "unterminated text literal".into(),
                        });
                    }
                },
                Some(ch) => value.push(ch),
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum UnaryOp {
    Neg,
}

#[derive(Debug, Clone, Copy)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

#[derive(Debug, Clone)]
enum Expr {
    Number(i64),
    Text(String),
    Variable(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone)]
enum StmtKind {
    Say(Expr),
    Assign { name: String, value: Expr },
    Expr(Expr),
}

#[derive(Debug, Clone)]
struct Stmt {
    kind: StmtKind,
    line: u32,
}

fn parse_program(source: &str) -> Result<Vec<Stmt>, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser::new(tokens);
    let mut stmts = Vec::new();
    loop {
        parser.skip_terminators();
        if parser.check(TokenKind::Eof) {
            break;
        }
        stmts.push(parser.parse_statement()?);
        if !parser.check(TokenKind::Eof) {
            parser.expect_terminator()?;
        }
    }
    Ok(stmts)
}

struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.current + 1)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> &Token {
        if self.tokens[self.current].kind != TokenKind::Eof {
            self.current += 1;
            &self.tokens[self.current - 1]
        } else {
            &self.tokens[self.current]
        }
    }

    fn skip_terminators(&mut self) {
        while self.matches(TokenKind::Terminator) {}
    }

    fn expect_terminator(&mut self) -> Result<(), ParseError> {
        if self.matches(TokenKind::Terminator) {
            Ok(())
        } else {
            Err(self.error_here(format!(
                "expected end of statement, found {}",
                describe(self.peek())
            )))
        }
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.peek().line,
            message: message.into(),
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.peek().line;
        let kind = if self.matches(TokenKind::Say) {
            StmtKind::Say(self.parse_expression()?)
        } else if self.check(TokenKind::Identifier)
            && self.peek_next().map(|token| token.kind) == Some(TokenKind::Assign)
        {
            let name = self.advance().lexeme.clone();
            self.advance();
            StmtKind::Assign {
                name,
                value: self.parse_expression()?,
            }
        } else {
            StmtKind::Expr(self.parse_expression()?)
        };
        Ok(Stmt { kind, line })
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = if self.matches(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.matches(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let rhs = self.parse_multiplicative()?;
            expr = Expr::Binary {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = if self.matches(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.matches(TokenKind::Slash) {
                BinaryOp::Div
            } else if self.matches(TokenKind::Percent) {
                BinaryOp::Rem
            } else {
                break;
            };
            let rhs = self.parse_unary()?;
            expr = Expr::Binary {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.matches(TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Number) {
            let token = self.advance();
            let line = token.line;
            return token.lexeme.parse::<i64>().map(Expr::Number).map_err(|_| {
                ParseError {
                    line,
                    message: "integer literal out of range".into(),
                }
            });
        }
        if self.check(TokenKind::Text) {
            return Ok(Expr::Text(self.advance().lexeme.clone()));
        }
        if self.check(TokenKind::Identifier) {
            return Ok(Expr::Variable(self.advance().lexeme.clone()));
        }
        if self.matches(TokenKind::LParen) {
            let expr = self.parse_expression()?;
            if !self.matches(TokenKind::RParen) {
                return Err(self.error_here(format!(
                    "expected `)` after expression, found {}",
                    describe(self.peek())
                )));
            }
            return Ok(expr);
        }
        Err(self.error_here(format!(
            "expected expression, found {}",
            describe(self.peek())
        )))
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Terminator => "end of statement".to_string(),
        _ => format!("`{}`", token.lexeme),
    }
}

/// A value produced by evaluating Oleander code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug)]
struct EvalError {
    message: String,
}

impl EvalError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A compiled unit: the parsed statements plus the source buffer they were
/// compiled from. With debug symbols the per-statement line annotations are
/// used in diagnostics and in the structural dump.
pub struct Program {
    label: String,
    source: Vec<u8>,
    stmts: Vec<Stmt>,
    debug_symbols: bool,
}

impl Program {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The retained source buffer, terminator included.
    pub fn source(&self) -> &[u8] {
        &self.source
    }
}

/// One Oleander session: globals persist across every unit executed in it.
#[derive(Debug, Default)]
pub struct Interpreter {
    globals: IndexMap<String, Value>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a session global.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), EvalError> {
        match &stmt.kind {
            StmtKind::Say(expr) => {
                let value = self.evaluate(expr)?;
                println!("{value}");
            }
            StmtKind::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.globals.insert(name.clone(), value);
            }
            StmtKind::Expr(expr) => {
                self.evaluate(expr)?;
            }
        }
        Ok(())
    }

    fn evaluate(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Number(value) => Ok(Value::Int(*value)),
            Expr::Text(text) => Ok(Value::Text(text.clone())),
            Expr::Variable(name) => self
                .globals
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::new(format!("undefined variable `{name}`"))),
            Expr::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                match (op, value) {
                    (UnaryOp::Neg, Value::Int(value)) => value
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or_else(|| EvalError::new("integer overflow")),
                    (UnaryOp::Neg, value) => Err(EvalError::new(format!(
                        "cannot negate {}",
                        value.type_name()
                    ))),
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                match op {
                    BinaryOp::Add => match (lhs, rhs) {
                        (Value::Int(a), Value::Int(b)) => a
                            .checked_add(b)
                            .map(Value::Int)
                            .ok_or_else(|| EvalError::new("integer overflow")),
                        (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{a}{b}"))),
                        (lhs, rhs) => Err(EvalError::new(format!(
                            "cannot add {} and {}",
                            lhs.type_name(),
                            rhs.type_name()
                        ))),
                    },
                    BinaryOp::Sub => int_binary(lhs, rhs, "subtract", i64::checked_sub),
                    BinaryOp::Mul => int_binary(lhs, rhs, "multiply", i64::checked_mul),
                    BinaryOp::Div => match (lhs, rhs) {
                        (Value::Int(_), Value::Int(0)) => {
                            Err(EvalError::new("division by zero"))
                        }
                        (lhs, rhs) => int_binary(lhs, rhs, "divide", i64::checked_div),
                    },
                    BinaryOp::Rem => match (lhs, rhs) {
                        (Value::Int(_), Value::Int(0)) => {
                            Err(EvalError::new("remainder by zero"))
                        }
                        (lhs, rhs) => int_binary(lhs, rhs, "take the remainder of", i64::checked_rem),
                    },
                }
            }
        }
    }
}

fn int_binary(
    lhs: Value,
    rhs: Value,
    verb: &str,
    apply: impl Fn(i64, i64) -> Option<i64>,
) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => apply(a, b)
            .map(Value::Int)
            .ok_or_else(|| EvalError::new("integer overflow")),
        (lhs, rhs) => Err(EvalError::new(format!(
            "cannot {verb} {} and {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

impl Runtime for Interpreter {
    type Unit = Program;

    fn parse_source(
        &mut self,
        source: RawSource,
        debug_symbols: bool,
        label: &str,
    ) -> Option<Program> {
        let text = source.text().into_owned();
        match parse_program(&text) {
            Ok(stmts) => Some(Program {
                label: label.to_string(),
                source: source.into_bytes(),
                stmts,
                debug_symbols,
            }),
            Err(err) => {
                eprintln!("error: {label}:{}: {}", err.line, err.message);
                None
            }
        }
    }

    fn execute(&mut self, unit: &Program) -> bool {
        for stmt in &unit.stmts {
            if let Err(err) = self.execute_statement(stmt) {
                if unit.debug_symbols {
                    eprintln!("error: {}:{}: {err}", unit.label, stmt.line);
                } else {
                    eprintln!("error: {}: {err}", unit.label);
                }
                return false;
            }
        }
        true
    }

    fn release(&mut self, unit: Program) {
        drop(unit);
    }

    fn dump(&self, unit: &Program) -> Option<String> {
        Some(render(unit))
    }
}

fn render(unit: &Program) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "unit {}", unit.label);
    for stmt in &unit.stmts {
        if unit.debug_symbols {
            let _ = writeln!(out, "  {:>4}| {}", stmt.line, render_statement(&stmt.kind));
        } else {
            let _ = writeln!(out, "  {}", render_statement(&stmt.kind));
        }
    }
    out
}

fn render_statement(kind: &StmtKind) -> String {
    match kind {
        StmtKind::Say(expr) => format!("say {}", render_expression(expr)),
        StmtKind::Assign { name, value } => format!("{name} = {}", render_expression(value)),
        StmtKind::Expr(expr) => render_expression(expr),
    }
}

fn render_expression(expr: &Expr) -> String {
    match expr {
        Expr::Number(value) => value.to_string(),
        Expr::Text(text) => format!("{text:?}"),
        Expr::Variable(name) => name.clone(),
        Expr::Unary { op: UnaryOp::Neg, operand } => {
            format!("(- {})", render_expression(operand))
        }
        Expr::Binary { op, lhs, rhs } => format!(
            "({} {} {})",
            op.symbol(),
            render_expression(lhs),
            render_expression(rhs)
        ),
    }
}
