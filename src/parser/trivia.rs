//! Trivia attachment
//!
//! Second pass over the raw token stream: whitespace tokens are dropped,
//! blank lines are recorded as flags, and every comment token is attached
//! to the nearest significant token as leading or trailing trivia. The
//! resulting stream contains only significant tokens plus the final Eof.

use crate::parser::lexer::{Token, TokenKind};

/// Strip whitespace and redistribute comments onto significant tokens.
///
/// A comment on the same line as the previous significant token becomes its
/// single trailing comment; all other comments buffer up as leading trivia
/// for the next significant token. Trivia still pending at end of input is
/// attached to `trailing_comments_at_eof` of both the Eof token and the
/// last real token so downstream consumers can find it via either.
pub fn attach_trivia(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut pending: Vec<Token> = Vec::new();
    let mut blank_pending = false;

    for token in tokens {
        match token.kind {
            TokenKind::Whitespace => {
                if token.text.matches('\n').count() >= 2 {
                    blank_pending = true;
                }
            }
            TokenKind::LineComment | TokenKind::BlockComment => {
                let same_line = pending.is_empty()
                    && out.last().is_some_and(|prev| prev.line == token.line);
                // A comment following a comma belongs to the token before
                // it; the comma itself is not kept in the AST.
                let target = if same_line {
                    trailing_target(&mut out)
                } else {
                    None
                };
                match target {
                    Some(prev) => prev.trailing_comment = Some(Box::new(token)),
                    None => {
                        let mut comment = token;
                        comment.preceded_by_blank_line = blank_pending;
                        blank_pending = false;
                        pending.push(comment);
                    }
                }
            }
            TokenKind::Eof => {
                let mut eof = token;
                if !pending.is_empty() {
                    eof.trailing_comments_at_eof = pending.clone();
                    if let Some(last) = out.last_mut() {
                        last.trailing_comments_at_eof = std::mem::take(&mut pending);
                    } else {
                        pending.clear();
                    }
                }
                eof.preceded_by_blank_line = blank_pending;
                blank_pending = false;
                out.push(eof);
            }
            _ => {
                // The flag on the token itself records a blank line between
                // the last leading comment (or previous token) and the token;
                // blanks above a comment live on that comment token.
                let mut significant = token;
                significant.leading_comments = std::mem::take(&mut pending);
                significant.preceded_by_blank_line = blank_pending;
                blank_pending = false;
                out.push(significant);
            }
        }
    }

    out
}

/// The token a same-line trailing comment should attach to: the last
/// significant token, skipping back over commas, provided the slot is
/// still free.
fn trailing_target(out: &mut [Token]) -> Option<&mut Token> {
    let mut idx = out.len().checked_sub(1)?;
    while out[idx].kind == TokenKind::Punctuation && out[idx].text == "," {
        idx = idx.checked_sub(1)?;
    }
    let target = &mut out[idx];
    if target.trailing_comment.is_none() {
        Some(target)
    } else {
        None
    }
}
