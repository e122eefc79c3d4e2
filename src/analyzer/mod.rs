//! The Analyzer module is in charge of taking MIPS source text and
//! producing a token stream and symbol table from it, and of building
//! a parse tree from a stream of lexemes.
//!
//! It does this with an ordered-rule regex tokenizer and a table driven,
//! non-lookahead instruction recognizer. Both passes share the symbol
//! table the caller owns.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbols;
