//! Trivia attachment tests
//!
//! After attachment the stream holds no whitespace or comment tokens;
//! every comment is reachable from exactly one significant token.

use tsqlfmt::parser::lexer::{tokenize, Token, TokenKind};
use tsqlfmt::parser::trivia::attach_trivia;

fn attach(input: &str) -> Vec<Token> {
    attach_trivia(tokenize(input))
}

#[test]
fn whitespace_tokens_are_dropped() {
    let tokens = attach("a   b\n\tc");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert!(!kinds.contains(&TokenKind::Whitespace));
    assert_eq!(tokens.len(), 4); // a, b, c, eof
}

#[test]
fn comment_tokens_are_redistributed() {
    let tokens = attach("-- lead\nSELECT 1 -- trail");
    assert!(tokens
        .iter()
        .all(|t| !matches!(t.kind, TokenKind::LineComment | TokenKind::BlockComment)));
}

#[test]
fn blank_line_sets_the_flag_on_the_next_token() {
    let tokens = attach("a\n\nb");
    assert!(!tokens[0].preceded_by_blank_line);
    assert!(tokens[1].preceded_by_blank_line);
}

#[test]
fn single_newline_does_not_set_the_flag() {
    let tokens = attach("a\nb");
    assert!(!tokens[1].preceded_by_blank_line);
}

#[test]
fn same_line_comment_becomes_trailing() {
    let tokens = attach("a -- note\nb");
    let trailing = tokens[0].trailing_comment.as_ref().expect("trailing");
    assert_eq!(trailing.text, "-- note");
    assert!(tokens[1].leading_comments.is_empty());
}

#[test]
fn comment_after_comma_attaches_before_the_comma() {
    // The comma is not kept in the AST, so its trailing comment walks back
    let tokens = attach("a, -- first\nb");
    let trailing = tokens[0].trailing_comment.as_ref().expect("trailing");
    assert_eq!(trailing.text, "-- first");
}

#[test]
fn own_line_comment_leads_the_next_token() {
    let tokens = attach("-- header\nSELECT 1");
    assert_eq!(tokens[0].leading_comments.len(), 1);
    assert_eq!(tokens[0].leading_comments[0].text, "-- header");
}

#[test]
fn consecutive_comments_attach_in_order() {
    let tokens = attach("-- one\n-- two\nx");
    let leads: Vec<&str> = tokens[0]
        .leading_comments
        .iter()
        .map(|c| c.text.as_str())
        .collect();
    assert_eq!(leads, ["-- one", "-- two"]);
}

#[test]
fn blank_line_between_comments_is_recorded_on_the_comment() {
    let tokens = attach("-- one\n\n-- two\nx");
    let leads = &tokens[0].leading_comments;
    assert!(!leads[0].preceded_by_blank_line);
    assert!(leads[1].preceded_by_blank_line);
}

#[test]
fn trivia_pending_at_eof_lands_on_both_eof_and_last_token() {
    let tokens = attach("SELECT 1\n-- tail");
    let eof = tokens.last().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.trailing_comments_at_eof.len(), 1);
    assert_eq!(eof.trailing_comments_at_eof[0].text, "-- tail");
    let last_real = &tokens[tokens.len() - 2];
    assert_eq!(last_real.trailing_comments_at_eof.len(), 1);
}

#[test]
fn comment_only_input_attaches_to_eof() {
    let tokens = attach("-- only a comment");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].trailing_comments_at_eof.len(), 1);
}
