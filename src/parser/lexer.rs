//! SQL tokenization
//!
//! This module handles breaking T-SQL input into tokens. The raw stream
//! still contains whitespace and comment tokens; trivia attachment strips
//! them and redistributes comments onto the significant tokens.

use serde::Serialize;

/// Token kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Keywords, identifiers, `@`/`@@` variables, `#`/`##` temp names
    Word,
    /// `[bracketed]` or `"double quoted"` identifiers
    QuotedIdentifier,
    /// `'...'` or `N'...'` string literals
    StringLiteral,
    /// Decimal, floating point, scientific or `0x` hex literals
    NumberLiteral,
    /// `, . ( ) ;`
    Punctuation,
    /// Comparison and arithmetic operators
    Operator,
    Whitespace,
    /// `-- ...`
    LineComment,
    /// `/* ... */`, possibly nested
    BlockComment,
    /// A `GO` alone on its line
    BatchSeparator,
    Eof,
}

/// A single token with its source position and attached trivia.
///
/// The trivia slots (`leading_comments`, `trailing_comment`,
/// `trailing_comments_at_eof`, `preceded_by_blank_line`) are empty until
/// trivia attachment runs; after it, every comment in the source is
/// reachable from exactly one significant token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
    pub line: usize,
    pub col: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub leading_comments: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_comment: Option<Box<Token>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments_at_eof: Vec<Token>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub preceded_by_blank_line: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize, line: usize, col: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
            line,
            col,
            leading_comments: Vec::new(),
            trailing_comment: None,
            trailing_comments_at_eof: Vec::new(),
            preceded_by_blank_line: false,
        }
    }

    /// Check if this is a word token matching `word` case-insensitively.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(word)
    }

    /// Check if this is a punctuation or operator token with exactly `text`.
    pub fn is_symbol(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Punctuation | TokenKind::Operator) && self.text == text
    }

    /// Upper-cased token text.
    pub fn upper(&self) -> String {
        self.text.to_uppercase()
    }
}

/// Tokenize T-SQL input.
///
/// Always succeeds and always ends the stream with an [`TokenKind::Eof`]
/// token; unrecognized characters are silently skipped.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).scan_all()
}

struct Lexer<'a> {
    src: &'a str,
    chars: Vec<char>,
    /// Byte offset of each element of `chars`, plus one final entry at `src.len()`
    offsets: Vec<usize>,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        let mut chars = Vec::new();
        let mut offsets = Vec::new();
        for (offset, ch) in src.char_indices() {
            chars.push(ch);
            offsets.push(offset);
        }
        offsets.push(src.len());
        Self {
            src,
            chars,
            offsets,
            pos: 0,
            line: 1,
            col: 1,
            tokens: Vec::new(),
        }
    }

    fn scan_all(mut self) -> Vec<Token> {
        while self.pos < self.chars.len() {
            let start = self.mark();
            let ch = self.chars[self.pos];

            if ch.is_whitespace() {
                self.scan_whitespace(start);
            } else if ch == '-' && self.peek_at(1) == Some('-') {
                self.scan_line_comment(start);
            } else if ch == '/' && self.peek_at(1) == Some('*') {
                self.scan_block_comment(start);
            } else if ch == '\'' {
                self.scan_string(start);
            } else if (ch == 'N' || ch == 'n') && self.peek_at(1) == Some('\'') {
                self.bump();
                self.scan_string(start);
            } else if ch == '[' {
                self.scan_quoted(start, ']');
            } else if ch == '"' {
                self.scan_quoted(start, '"');
            } else if ch.is_ascii_digit() {
                self.scan_number(start);
            } else if is_word_start(ch) {
                self.scan_word(start);
            } else if is_punctuation(ch) {
                self.bump();
                self.emit(TokenKind::Punctuation, start);
            } else if is_operator_start(ch) {
                self.scan_operator(start);
            } else {
                // Unrecognized character: skip it
                self.bump();
            }
        }

        let eof_mark = self.mark();
        self.tokens.push(Token::new(
            TokenKind::Eof,
            "",
            eof_mark.offset,
            eof_mark.line,
            eof_mark.col,
        ));
        self.tokens
    }

    fn mark(&self) -> Mark {
        Mark {
            offset: self.offsets[self.pos],
            line: self.line,
            col: self.col,
        }
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn emit(&mut self, kind: TokenKind, start: Mark) {
        let text = &self.src[start.offset..self.offsets[self.pos]];
        self.tokens
            .push(Token::new(kind, text, start.offset, start.line, start.col));
    }

    fn scan_whitespace(&mut self, start: Mark) {
        while matches!(self.peek_at(0), Some(c) if c.is_whitespace()) {
            self.bump();
        }
        self.emit(TokenKind::Whitespace, start);
    }

    fn scan_line_comment(&mut self, start: Mark) {
        while let Some(c) = self.peek_at(0) {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        let mut text = &self.src[start.offset..self.offsets[self.pos]];
        // Keep carriage returns out of the comment text
        if let Some(stripped) = text.strip_suffix('\r') {
            text = stripped;
        }
        self.tokens.push(Token::new(
            TokenKind::LineComment,
            text,
            start.offset,
            start.line,
            start.col,
        ));
    }

    fn scan_block_comment(&mut self, start: Mark) {
        // Consume the opening /*
        self.bump();
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            match (self.peek_at(0), self.peek_at(1)) {
                (Some('/'), Some('*')) => {
                    self.bump();
                    self.bump();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.bump();
                    self.bump();
                    depth -= 1;
                }
                (Some(_), _) => {
                    self.bump();
                }
                (None, _) => break,
            }
        }
        self.emit(TokenKind::BlockComment, start);
    }

    fn scan_string(&mut self, start: Mark) {
        // Consume the opening quote
        self.bump();
        loop {
            match self.peek_at(0) {
                Some('\'') => {
                    self.bump();
                    // '' is an escaped quote inside the literal
                    if self.peek_at(0) == Some('\'') {
                        self.bump();
                    } else {
                        break;
                    }
                }
                Some(_) => {
                    self.bump();
                }
                None => break,
            }
        }
        self.emit(TokenKind::StringLiteral, start);
    }

    fn scan_quoted(&mut self, start: Mark, closer: char) {
        // No escape handling inside brackets: scan to the next closer
        self.bump();
        while let Some(c) = self.peek_at(0) {
            self.bump();
            if c == closer {
                break;
            }
        }
        self.emit(TokenKind::QuotedIdentifier, start);
    }

    fn scan_number(&mut self, start: Mark) {
        if self.peek_at(0) == Some('0') && matches!(self.peek_at(1), Some('x') | Some('X')) {
            self.bump();
            self.bump();
            while matches!(self.peek_at(0), Some(c) if c.is_ascii_hexdigit()) {
                self.bump();
            }
            self.emit(TokenKind::NumberLiteral, start);
            return;
        }

        let mut seen_dot = false;
        while let Some(c) = self.peek_at(0) {
            if c.is_ascii_digit() {
                self.bump();
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.bump();
            } else if (c == 'e' || c == 'E')
                && matches!(self.peek_at(1), Some(d) if d.is_ascii_digit())
            {
                self.bump();
                self.bump();
            } else if (c == 'e' || c == 'E')
                && matches!(self.peek_at(1), Some('+') | Some('-'))
                && matches!(self.peek_at(2), Some(d) if d.is_ascii_digit())
            {
                self.bump();
                self.bump();
                self.bump();
            } else {
                break;
            }
        }
        self.emit(TokenKind::NumberLiteral, start);
    }

    fn scan_word(&mut self, start: Mark) {
        // @@ and ## prefixes belong to the word
        while matches!(self.peek_at(0), Some('@') | Some('#')) {
            self.bump();
        }
        while matches!(self.peek_at(0), Some(c) if is_word_continue(c)) {
            self.bump();
        }
        let text = &self.src[start.offset..self.offsets[self.pos]];
        if text.eq_ignore_ascii_case("GO") && self.is_alone_on_line() {
            self.emit(TokenKind::BatchSeparator, start);
        } else {
            self.emit(TokenKind::Word, start);
        }
    }

    fn scan_operator(&mut self, start: Mark) {
        let ch = self.chars[self.pos];
        self.bump();
        if let Some(next) = self.peek_at(0) {
            let two: String = [ch, next].iter().collect();
            if matches!(two.as_str(), "<=" | ">=" | "<>" | "!=" | "!<" | "!>") {
                self.bump();
            }
        }
        self.emit(TokenKind::Operator, start);
    }

    /// A word is alone on its line when the previous token is either nothing
    /// or whitespace containing a newline, and the rest of the line holds
    /// nothing but whitespace.
    fn is_alone_on_line(&self) -> bool {
        let line_starts = match self.tokens.last() {
            None => true,
            Some(tok) => tok.kind == TokenKind::Whitespace && tok.text.contains('\n'),
        };
        if !line_starts {
            return false;
        }
        let mut i = self.pos;
        while let Some(&c) = self.chars.get(i) {
            if c == '\n' {
                return true;
            }
            if !c.is_whitespace() {
                return false;
            }
            i += 1;
        }
        // End of input counts as end of line
        true
    }
}

#[derive(Clone, Copy)]
struct Mark {
    offset: usize,
    line: usize,
    col: usize,
}

fn is_word_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '@' || ch == '#'
}

fn is_word_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn is_punctuation(ch: char) -> bool {
    matches!(ch, ',' | '.' | '(' | ')' | ';')
}

fn is_operator_start(ch: char) -> bool {
    matches!(ch, '=' | '<' | '>' | '!' | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '~')
}
