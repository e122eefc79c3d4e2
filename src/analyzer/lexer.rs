//! This lexer tokenizes the MIPS subset.
//!
//! Rules are tried in a fixed order at the current position and the first
//! one that matches wins. Every identifier the lexer produces is recorded in
//! the symbol table the caller hands in.
use regex::Regex;
use std::fmt;

use super::error::{Diagnostic, Result};
use super::symbols::SymbolTable;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TokenKind {
    Comment,
    Register,
    LoadAddress,
    Move,
    JumpLink,
    LoadImmediate,
    Newline,
    Syscall,
    Jump,
    Whitespace,
    Name,
    Number,
    LParen,
    RParen,
    Colon,
    Comma,
    Dash,
}

impl TokenKind {
    /// Every kind, in report order.
    pub const ALL: [TokenKind; 17] = [
        TokenKind::Comment,
        TokenKind::Register,
        TokenKind::LoadAddress,
        TokenKind::Move,
        TokenKind::JumpLink,
        TokenKind::LoadImmediate,
        TokenKind::Newline,
        TokenKind::Syscall,
        TokenKind::Jump,
        TokenKind::Whitespace,
        TokenKind::Name,
        TokenKind::Number,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::Colon,
        TokenKind::Comma,
        TokenKind::Dash,
    ];

    /// Comments, newlines and whitespace are produced but never reported.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Newline | TokenKind::Whitespace)
    }

    pub fn name(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Comment       => "COMMENT",
            Register      => "REGISTER",
            LoadAddress   => "LOAD_ADDRESS",
            Move          => "MOVE",
            JumpLink      => "JUMPLINK",
            LoadImmediate => "LOAD_IMMEDIATE",
            Newline       => "NEWLINE",
            Syscall       => "SYSCALL",
            Jump          => "JUMP",
            Whitespace    => "WHITESPACE",
            Name          => "NAME",
            Number        => "NUMBER",
            LParen        => "LPAREN",
            RParen        => "RPAREN",
            Colon         => "COLON",
            Comma         => "COMMA",
            Dash          => "DASH",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The literal value of a token. Numbers are converted, everything else
/// keeps its source text.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Lexeme {
    Text(String),
    Number(u64),
}

impl Lexeme {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Lexeme::Text(s) => Some(s.as_str()),
            Lexeme::Number(_) => None,
        }
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Lexeme::Text(s) => write!(f, "{}", s),
            Lexeme::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Lexeme {
    fn from(s: &str) -> Self {
        Lexeme::Text(s.to_owned())
    }
}

impl From<u64> for Lexeme {
    fn from(n: u64) -> Self {
        Lexeme::Number(n)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Lexeme,
    pub line: usize,
}

impl Token {
    pub fn new<L: Into<Lexeme>>(kind: TokenKind, lexeme: L, line: usize) -> Self {
        Token { kind, lexeme: lexeme.into(), line }
    }
}

// Order matters: the first rule that matches at the cursor is taken.
// Keywords sit in front of Name and only match whole words.
const RULES: &[(TokenKind, &str)] = &[
    (TokenKind::Comment,       r"\A#.*"),
    (TokenKind::Register,      r"\A\$[a-zA-Z0-9]+"),
    (TokenKind::Newline,       r"\A(?:\r?\n)+"),
    (TokenKind::Whitespace,    r"\A[ \t]+"),
    (TokenKind::LParen,        r"\A\("),
    (TokenKind::RParen,        r"\A\)"),
    (TokenKind::Colon,         r"\A:"),
    (TokenKind::Comma,         r"\A,"),
    (TokenKind::Dash,          r"\A-"),
    (TokenKind::Syscall,       r"\Asyscall\b"),
    (TokenKind::Jump,          r"\Aj[ \t]+[a-zA-Z_][a-zA-Z0-9_]*"),
    (TokenKind::LoadAddress,   r"\Ala\b"),
    (TokenKind::Move,          r"\Amove\b"),
    (TokenKind::JumpLink,      r"\Ajal\b"),
    (TokenKind::LoadImmediate, r"\Ali\b"),
    (TokenKind::Name,          r"\A[a-zA-Z_][a-zA-Z0-9_]*"),
    (TokenKind::Number,        r"\A[0-9]+"),
];

pub struct Lexer<'a> {
    source: &'a str,
    rules: Vec<(TokenKind, Regex)>,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Result<Self> {
        let mut rules = Vec::with_capacity(RULES.len());
        for (kind, pattern) in RULES {
            rules.push((*kind, Regex::new(pattern)?));
        }
        Ok(Lexer { source, rules, pos: 0, line: 1 })
    }

    /// Run the lexer over the whole input, consuming itself.
    /// Illegal characters are skipped one at a time and reported, never fatal.
    pub fn run(mut self, symbols: &mut SymbolTable) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::with_capacity(self.source.len() / 2);
        let mut diagnostics = Vec::new();

        while let Some(next) = self.next_token(symbols) {
            match next {
                Ok(tok) => tokens.push(tok),
                Err(diag) => diagnostics.push(diag),
            }
        }

        debug!("lexed {} token(s) with {} diagnostic(s)", tokens.len(), diagnostics.len());
        (tokens, diagnostics)
    }

    /// Scans a single token starting at the cursor.
    /// Returns None once the input is exhausted.
    pub fn next_token(&mut self, symbols: &mut SymbolTable) -> Option<std::result::Result<Token, Diagnostic>> {
        let source = self.source;
        let rest = &source[self.pos..];
        let c = rest.chars().next()?;
        let line = self.line;

        let matched = self.rules.iter()
            .find_map(|(kind, re)| re.find(rest).map(|m| (*kind, m.end())));

        match matched {
            Some((kind, len)) => {
                let text = &rest[..len];
                self.pos += len;
                Some(Ok(self.make_token(kind, text, line, symbols)))
            },
            None => {
                self.pos += c.len_utf8();
                Some(Err(Diagnostic::IllegalCharacter { character: c, line }))
            },
        }
    }

    fn make_token(&mut self, kind: TokenKind, text: &str, line: usize, symbols: &mut SymbolTable) -> Token {
        trace!("line {}: {} {:?}", line, kind, text);
        match kind {
            TokenKind::Newline => {
                self.line += text.matches('\n').count();
                Token::new(kind, text, line)
            },
            TokenKind::Name => {
                symbols.insert_if_absent(text, Some(line));
                Token::new(kind, text, line)
            },
            TokenKind::Number => match text.parse::<u64>() {
                Ok(val) => Token::new(kind, val, line),
                Err(e) => {
                    warn!("number `{}` on line {} kept as text: {}", text, line, e);
                    Token::new(kind, text, line)
                },
            },
            _ => Token::new(kind, text, line),
        }
    }
}

/// The output of one lexing session.
#[derive(Debug)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Tokenizes `source` against a fresh symbol table.
pub fn tokenize(source: &str) -> Result<Lexed> {
    let mut symbols = SymbolTable::new();
    let (tokens, diagnostics) = Lexer::new(source)?.run(&mut symbols);
    Ok(Lexed { tokens, symbols, diagnostics })
}

/// Strips trivia, leaving the lexemes the structural parser consumes.
pub fn lexemes(tokens: &[Token]) -> Vec<Lexeme> {
    tokens.iter()
        .filter(|tok| !tok.kind.is_trivia())
        .map(|tok| tok.lexeme.clone())
        .collect()
}
