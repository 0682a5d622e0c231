//! Lexer/Tokenizer tests for tsqlfmt
//!
//! Tests for the T-SQL tokenization layer.

use tsqlfmt::parser::lexer::{tokenize, TokenKind};

/// Significant (non-whitespace, non-eof) token texts.
fn texts(input: &str) -> Vec<String> {
    tokenize(input)
        .into_iter()
        .filter(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Eof))
        .map(|t| t.text)
        .collect()
}

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .map(|t| t.kind)
        .collect()
}

mod basics {
    use super::*;

    #[test]
    fn stream_always_ends_with_eof() {
        assert_eq!(tokenize("").last().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokenize("SELECT 1").last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn words_and_punctuation() {
        assert_eq!(texts("SELECT a, b FROM t"), ["SELECT", "a", ",", "b", "FROM", "t"]);
    }

    #[test]
    fn word_casing_is_preserved_in_tokens() {
        assert_eq!(texts("SeLeCt Col"), ["SeLeCt", "Col"]);
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = tokenize("a\n b");
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        let b = &tokens[2];
        assert_eq!((b.line, b.col), (2, 2));
    }

    #[test]
    fn unrecognized_characters_are_skipped() {
        assert_eq!(texts("a ? b"), ["a", "b"]);
    }
}

mod variables_and_temp_tables {
    use super::*;

    #[test]
    fn at_prefix_is_part_of_the_word() {
        assert_eq!(texts("@x @@ROWCOUNT"), ["@x", "@@ROWCOUNT"]);
    }

    #[test]
    fn hash_prefix_is_part_of_the_word() {
        assert_eq!(texts("#tmp ##global"), ["#tmp", "##global"]);
    }
}

mod strings {
    use super::*;

    #[test]
    fn single_quoted_string() {
        let tokens = tokenize("'hello'");
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "'hello'");
    }

    #[test]
    fn doubled_quote_is_an_escape() {
        let tokens = tokenize("'it''s'");
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "'it''s'");
    }

    #[test]
    fn unicode_prefix_belongs_to_the_literal() {
        let tokens = tokenize("N'héllo'");
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "N'héllo'");
    }
}

mod quoted_identifiers {
    use super::*;

    #[test]
    fn bracketed_identifier() {
        let tokens = tokenize("[My Col]");
        assert_eq!(tokens[0].kind, TokenKind::QuotedIdentifier);
        assert_eq!(tokens[0].text, "[My Col]");
    }

    #[test]
    fn double_quoted_identifier() {
        let tokens = tokenize("\"name\"");
        assert_eq!(tokens[0].kind, TokenKind::QuotedIdentifier);
        assert_eq!(tokens[0].text, "\"name\"");
    }
}

mod numbers {
    use super::*;

    #[test]
    fn integer_and_decimal() {
        assert_eq!(texts("1 2.5 .5"), ["1", "2.5", ".", "5"]);
        assert_eq!(kinds("42")[0], TokenKind::NumberLiteral);
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(texts("1e5 1.5e-3 2E+4"), ["1e5", "1.5e-3", "2E+4"]);
    }

    #[test]
    fn hex_literal() {
        let tokens = tokenize("0x1F");
        assert_eq!(tokens[0].kind, TokenKind::NumberLiteral);
        assert_eq!(tokens[0].text, "0x1F");
    }
}

mod comments {
    use super::*;

    #[test]
    fn line_comment_excludes_the_newline() {
        let tokens = tokenize("-- hi\nSELECT 1");
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
        assert_eq!(tokens[0].text, "-- hi");
    }

    #[test]
    fn block_comment() {
        let tokens = tokenize("/* note */ SELECT 1");
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[0].text, "/* note */");
    }

    #[test]
    fn block_comments_nest() {
        let tokens = tokenize("/* a /* b */ c */ x");
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[0].text, "/* a /* b */ c */");
    }

    #[test]
    fn unterminated_block_comment_runs_to_eof() {
        let tokens = tokenize("/* open");
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[0].text, "/* open");
    }
}

mod operators {
    use super::*;

    #[test]
    fn two_character_operators_are_single_tokens() {
        assert_eq!(texts("a <= b >= c <> d != e"), ["a", "<=", "b", ">=", "c", "<>", "d", "!=", "e"]);
    }

    #[test]
    fn arithmetic_operators() {
        assert_eq!(texts("a + b - c * d / e % f"), ["a", "+", "b", "-", "c", "*", "d", "/", "e", "%", "f"]);
    }
}

mod batch_separator {
    use super::*;

    fn separator_count(input: &str) -> usize {
        tokenize(input)
            .iter()
            .filter(|t| t.kind == TokenKind::BatchSeparator)
            .count()
    }

    #[test]
    fn go_alone_on_a_line_is_a_separator() {
        assert_eq!(separator_count("SELECT 1\nGO\nSELECT 2"), 1);
    }

    #[test]
    fn go_at_start_of_input_is_a_separator() {
        assert_eq!(separator_count("GO"), 1);
        assert_eq!(separator_count("go\n"), 1);
    }

    #[test]
    fn go_with_trailing_spaces_is_a_separator() {
        assert_eq!(separator_count("SELECT 1\nGO   \nSELECT 2"), 1);
    }

    #[test]
    fn go_mid_statement_is_a_plain_word() {
        // A column named go must not split the batch
        assert_eq!(separator_count("SELECT go FROM t"), 0);
        assert_eq!(separator_count("SELECT 1 GO"), 0);
    }

    #[test]
    fn go_with_count_argument_is_a_plain_word() {
        assert_eq!(separator_count("SELECT 1\nGO 5\n"), 0);
    }
}
