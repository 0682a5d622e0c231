//! T-SQL parser
//!
//! Pipeline entry: raw text is tokenized, trivia-attached, split into
//! batches at `GO` separators, and each batch is parsed statement by
//! statement. The parser never fails; malformed input degrades to raw
//! token runs so formatting can always proceed.

pub mod expr;
pub mod lexer;
pub mod stmt;
pub mod trivia;

use crate::ast::{Batch, SqlScript, Statement};
use expr::Parser;
use lexer::{tokenize, Token, TokenKind};
use trivia::attach_trivia;

/// Parse T-SQL source text into a script AST.
pub fn parse(input: &str) -> SqlScript {
    let tokens = attach_trivia(tokenize(input));
    parse_script(&tokens)
}

/// Parse a trivia-attached token stream into a script AST.
pub fn parse_script(tokens: &[Token]) -> SqlScript {
    let mut p = Parser::new(tokens);
    let mut batches: Vec<Batch> = Vec::new();
    let mut statements: Vec<Statement> = Vec::new();

    while !p.at_eof() {
        if p.current().kind == TokenKind::BatchSeparator {
            let separator = p.take();
            batches.push(Batch {
                statements: std::mem::take(&mut statements),
                separator: Some(separator),
            });
        } else {
            statements.push(stmt::parse_statement(&mut p));
        }
    }

    let eof = p.take();
    if !statements.is_empty() || batches.is_empty() {
        batches.push(Batch {
            statements,
            separator: None,
        });
    }

    SqlScript { batches, eof }
}
