//! Expression parsing
//!
//! Hand-written precedence climbing over the trivia-attached token stream.
//! Every level is a left-associative loop building binary nodes with the
//! operator token retained for later casing and comment placement.

use crate::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::stmt;

/// Token cursor shared by the expression and statement parsers.
///
/// The parser never fails: `expect_*` operations that miss their token
/// still consume the current token and proceed, and every loop consumes at
/// least one token per iteration.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Guards BETWEEN's own `AND` against the boolean AND level.
    /// Set immediately before parsing BETWEEN's low bound, cleared
    /// immediately after consuming BETWEEN's `AND` token. Do not widen.
    pub(crate) in_between: bool,
    /// Trivia rescued from discarded tokens (dots, commas, dropped parens),
    /// re-attached to the next token taken.
    pending_leading: Vec<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            in_between: false,
            pending_leading: Vec::new(),
        }
    }

    /// Current token; the stream always ends with Eof, which is sticky.
    pub fn current(&self) -> &Token {
        let idx = self.pos.min(self.tokens.len().saturating_sub(1));
        &self.tokens[idx]
    }

    /// Lookahead without consuming.
    pub fn peek(&self, n: usize) -> &Token {
        let idx = (self.pos + n).min(self.tokens.len().saturating_sub(1));
        &self.tokens[idx]
    }

    pub fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    /// Take the current token for storage in the AST and advance.
    /// Pending trivia from previously discarded tokens is folded into the
    /// token's leading comments.
    pub fn take(&mut self) -> Token {
        let mut token = self.current().clone();
        if !self.at_eof() {
            self.pos += 1;
        }
        if !self.pending_leading.is_empty() {
            let mut leading = std::mem::take(&mut self.pending_leading);
            leading.append(&mut token.leading_comments);
            token.leading_comments = leading;
        }
        token
    }

    /// Consume the current token without storing it; its trivia is kept
    /// pending for the next taken token. Returns the trivia-stripped token.
    pub fn discard(&mut self) -> Token {
        let mut token = self.take();
        self.pending_leading.append(&mut token.leading_comments);
        if let Some(comment) = token.trailing_comment.take() {
            self.pending_leading.push(*comment);
        }
        token
    }

    /// Take the current token if it is the given word.
    pub fn consume_word(&mut self, word: &str) -> Option<Token> {
        if self.current().is_word(word) {
            Some(self.take())
        } else {
            None
        }
    }

    /// Discard the current token if it is the given symbol.
    pub fn consume_symbol(&mut self, symbol: &str) -> bool {
        if self.current().is_symbol(symbol) {
            self.discard();
            true
        } else {
            false
        }
    }

    /// Take the current token, expected to be the given word. On mismatch
    /// the token is consumed anyway: the tool is a formatter, not a
    /// validator, and forward progress beats strictness.
    pub fn expect_word(&mut self, word: &str) -> Token {
        if !self.current().is_word(word) {
            tracing::debug!(
                expected = word,
                found = %self.current().text,
                line = self.current().line,
                "expected keyword not found"
            );
        }
        self.take()
    }

    /// Take the current token, expected to be the given symbol; consumes
    /// the current token even on mismatch.
    pub fn expect_symbol(&mut self, symbol: &str) -> Token {
        if !self.current().is_symbol(symbol) {
            tracing::debug!(
                expected = symbol,
                found = %self.current().text,
                line = self.current().line,
                "expected symbol not found"
            );
        }
        self.take()
    }
}

fn binary(left: Expr, op: Token, right: Expr) -> Expr {
    Expr::new(ExprKind::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}

/// Parse a full expression (OR level and below).
pub fn parse_expression(p: &mut Parser) -> Expr {
    parse_or(p)
}

fn parse_or(p: &mut Parser) -> Expr {
    let mut left = parse_and(p);
    while p.current().is_word("OR") {
        let op = p.take();
        let right = parse_and(p);
        left = binary(left, op, right);
    }
    left
}

fn parse_and(p: &mut Parser) -> Expr {
    let mut left = parse_not(p);
    loop {
        // An AND that belongs to a pending BETWEEN is not ours to consume.
        if p.in_between || !p.current().is_word("AND") {
            break;
        }
        let op = p.take();
        let right = parse_not(p);
        left = binary(left, op, right);
    }
    left
}

fn parse_not(p: &mut Parser) -> Expr {
    if p.current().is_word("NOT") {
        let op = p.take();
        let operand = parse_not(p);
        return Expr::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        });
    }
    if p.current().is_word("EXISTS") && p.peek(1).is_symbol("(") {
        let exists_token = p.take();
        let group = parse_paren_group(p);
        return Expr::new(ExprKind::Exists(ExistsExpression { exists_token, group }));
    }
    parse_comparison(p)
}

fn parse_comparison(p: &mut Parser) -> Expr {
    let mut left = parse_additive(p);
    loop {
        let current = p.current();
        if current.is_word("IS") {
            let op = p.take();
            let right = if p.current().is_word("NOT") {
                let not = p.take();
                let operand = parse_additive(p);
                Expr::new(ExprKind::Unary {
                    op: not,
                    operand: Box::new(operand),
                })
            } else {
                parse_additive(p)
            };
            left = binary(left, op, right);
        } else if current.is_word("LIKE") {
            let op = p.take();
            let right = parse_additive(p);
            left = binary(left, op, right);
        } else if current.is_word("IN") {
            left = parse_in(p, left, None);
        } else if current.is_word("BETWEEN") {
            left = parse_between(p, left, None);
        } else if current.is_word("NOT") && p.peek(1).is_word("IN") {
            let not = p.take();
            left = parse_in(p, left, Some(not));
        } else if current.is_word("NOT") && p.peek(1).is_word("BETWEEN") {
            let not = p.take();
            left = parse_between(p, left, Some(not));
        } else if current.is_word("NOT") && p.peek(1).is_word("LIKE") {
            // Re-associated as prefix NOT over the LIKE comparison
            let not = p.take();
            let op = p.take();
            let right = parse_additive(p);
            left = Expr::new(ExprKind::Unary {
                op: not,
                operand: Box::new(binary(left, op, right)),
            });
        } else if current.kind == TokenKind::Operator && is_comparison_op(&current.text) {
            let op = p.take();
            let right = parse_additive(p);
            left = binary(left, op, right);
        } else {
            break;
        }
    }
    left
}

fn is_comparison_op(text: &str) -> bool {
    matches!(text, "=" | "<" | ">" | "<=" | ">=" | "<>" | "!=" | "!<" | "!>")
}

fn parse_in(p: &mut Parser, expr: Expr, not_token: Option<Token>) -> Expr {
    let in_token = p.take();
    let group = parse_paren_group(p);
    Expr::new(ExprKind::In(InExpression {
        expr: Box::new(expr),
        not_token,
        in_token,
        group,
    }))
}

fn parse_between(p: &mut Parser, expr: Expr, not_token: Option<Token>) -> Expr {
    let between_token = p.take();
    // Guard the AND level while the low bound parses; BETWEEN's own AND
    // must not be eaten as a boolean conjunction.
    p.in_between = true;
    let low = parse_and(p);
    let and_token = p.expect_word("AND");
    p.in_between = false;
    // The high bound parses below the AND level so any further AND is a
    // boolean conjunction again.
    let high = parse_not(p);
    Expr::new(ExprKind::Between(BetweenExpression {
        expr: Box::new(expr),
        not_token,
        between_token,
        low: Box::new(low),
        and_token,
        high: Box::new(high),
    }))
}

fn parse_additive(p: &mut Parser) -> Expr {
    let mut left = parse_multiplicative(p);
    while p.current().kind == TokenKind::Operator
        && matches!(p.current().text.as_str(), "+" | "-")
    {
        let op = p.take();
        let right = parse_multiplicative(p);
        left = binary(left, op, right);
    }
    left
}

fn parse_multiplicative(p: &mut Parser) -> Expr {
    let mut left = parse_unary(p);
    while p.current().kind == TokenKind::Operator
        && matches!(p.current().text.as_str(), "*" | "/" | "%")
    {
        let op = p.take();
        let right = parse_unary(p);
        left = binary(left, op, right);
    }
    left
}

fn parse_unary(p: &mut Parser) -> Expr {
    if p.current().kind == TokenKind::Operator
        && matches!(p.current().text.as_str(), "+" | "-" | "~")
    {
        let op = p.take();
        let operand = parse_unary(p);
        return Expr::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        });
    }
    parse_atom(p)
}

fn parse_atom(p: &mut Parser) -> Expr {
    let kind = p.current().kind;
    if matches!(kind, TokenKind::NumberLiteral | TokenKind::StringLiteral) {
        return Expr::new(ExprKind::Literal(p.take()));
    }
    if p.current().is_symbol("*") {
        return Expr::new(ExprKind::Star(p.take()));
    }
    if p.current().is_symbol("(") {
        return parse_paren_atom(p);
    }
    if p.current().is_word("NULL") {
        return Expr::new(ExprKind::Literal(p.take()));
    }
    if p.current().is_word("CASE") {
        return parse_case(p);
    }
    if matches!(kind, TokenKind::Word | TokenKind::QuotedIdentifier) {
        return parse_name_or_call(p);
    }
    // Forward progress on anything unrecognized
    Expr::new(ExprKind::Raw(vec![p.take()]))
}

/// Parse `( ... )`: a subquery group, an expression list group, or a single
/// parenthesized expression (returned unwrapped with its `parenthesized`
/// stamp set).
fn parse_paren_atom(p: &mut Parser) -> Expr {
    if p.peek(1).is_word("SELECT") || p.peek(1).is_word("WITH") {
        return Expr::new(ExprKind::Group(parse_paren_group(p)));
    }

    // Scalar-or-list: the paren tokens of a single parenthesized expression
    // are not stored, so their trivia is rescued via discard.
    let saved_in_between = p.in_between;
    p.in_between = false;
    let lparen = p.discard();
    let mut exprs = vec![parse_expression(p)];
    while p.consume_symbol(",") {
        exprs.push(parse_expression(p));
    }
    p.in_between = saved_in_between;

    if exprs.len() == 1 {
        if !p.current().is_symbol(")") {
            tracing::debug!(
                found = %p.current().text,
                line = p.current().line,
                "expected closing parenthesis"
            );
        }
        if p.current().is_symbol(")") {
            p.discard();
        }
        let mut inner = exprs.pop().unwrap();
        inner.parenthesized = true;
        inner
    } else {
        let rparen = p.expect_symbol(")");
        Expr::new(ExprKind::Group(ParenGroup {
            lparen: Token::new(
                TokenKind::Punctuation,
                "(",
                lparen.offset,
                lparen.line,
                lparen.col,
            ),
            body: ParenBody::Exprs(exprs),
            rparen,
        }))
    }
}

/// Parse a `( ... )` group where the paren tokens are stored: subqueries
/// and keyword-introduced lists (IN lists, CTE bodies, column lists).
pub fn parse_paren_group(p: &mut Parser) -> ParenGroup {
    let lparen = p.expect_symbol("(");
    let saved_in_between = p.in_between;
    p.in_between = false;
    let body = if p.current().is_word("SELECT") || p.current().is_word("WITH") {
        ParenBody::Query(Box::new(stmt::parse_statement(p)))
    } else {
        let mut exprs = Vec::new();
        if !p.current().is_symbol(")") && !p.at_eof() {
            exprs.push(parse_expression(p));
            while p.consume_symbol(",") {
                exprs.push(parse_expression(p));
            }
        }
        ParenBody::Exprs(exprs)
    };
    p.in_between = saved_in_between;
    let rparen = p.expect_symbol(")");
    ParenGroup { lparen, body, rparen }
}

/// Parse a dotted name, continuing into a function call when a `(` follows.
/// Exposed to the statement parser for table references and assignment
/// targets.
pub(crate) fn parse_table_name(p: &mut Parser) -> Expr {
    parse_name_or_call(p)
}

fn parse_name_or_call(p: &mut Parser) -> Expr {
    let mut parts = vec![p.take()];
    while p.current().is_symbol(".") && !p.at_eof() {
        p.discard();
        let next = p.current();
        if matches!(next.kind, TokenKind::Word | TokenKind::QuotedIdentifier)
            || next.is_symbol("*")
        {
            parts.push(p.take());
        } else {
            break;
        }
    }

    if p.current().is_symbol("(") {
        let name = Identifier::from_parts(parts);
        let lparen = p.take();
        let mut args = Vec::new();
        if !p.current().is_symbol(")") && !p.at_eof() {
            args.push(parse_function_arg(p));
            while p.consume_symbol(",") {
                args.push(parse_function_arg(p));
            }
        }
        let rparen = p.expect_symbol(")");
        let over = parse_over_clause(p);
        return Expr::new(ExprKind::FunctionCall(FunctionCall {
            name,
            lparen,
            args,
            rparen,
            over,
            as_token: None,
            alias: None,
        }));
    }

    Expr::new(ExprKind::Identifier(Identifier::from_parts(parts)))
}

/// A function argument, allowing a DISTINCT/ALL prefix (`COUNT(DISTINCT x)`).
fn parse_function_arg(p: &mut Parser) -> Expr {
    if (p.current().is_word("DISTINCT") || p.current().is_word("ALL"))
        && !p.peek(1).is_symbol(",")
        && !p.peek(1).is_symbol(")")
    {
        let op = p.take();
        let operand = parse_expression(p);
        return Expr::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        });
    }
    parse_expression(p)
}

/// `OVER ( ... )` captured as a balanced raw token run including parens.
fn parse_over_clause(p: &mut Parser) -> Option<OverClause> {
    if !(p.current().is_word("OVER") && p.peek(1).is_symbol("(")) {
        return None;
    }
    let over_token = p.take();
    let mut tokens = vec![p.take()];
    let mut depth = 1usize;
    while depth > 0 && !p.at_eof() {
        let token = p.take();
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth -= 1;
        }
        tokens.push(token);
    }
    Some(OverClause { over_token, tokens })
}

fn parse_case(p: &mut Parser) -> Expr {
    let case_token = p.take();
    let input = if p.current().is_word("WHEN") {
        None
    } else {
        Some(Box::new(parse_expression(p)))
    };
    let mut whens = Vec::new();
    while p.current().is_word("WHEN") && !p.at_eof() {
        let when_token = p.take();
        let condition = parse_expression(p);
        let then_token = p.expect_word("THEN");
        let result = parse_expression(p);
        whens.push(WhenClause {
            when_token,
            condition,
            then_token,
            result,
        });
    }
    let (else_token, else_result) = if p.current().is_word("ELSE") {
        let token = p.take();
        let result = parse_expression(p);
        (Some(token), Some(Box::new(result)))
    } else {
        (None, None)
    };
    let end_token = p.expect_word("END");
    Expr::new(ExprKind::Case(CaseExpression {
        case_token,
        input,
        whens,
        else_token,
        else_result,
        end_token,
    }))
}

/// Words that can only be column options, never a data type; seeing one in
/// type position means the type is missing.
const COLUMN_OPTION_WORDS: &[&str] = &[
    "CHECK", "CLUSTERED", "CONSTRAINT", "DEFAULT", "FOREIGN", "IDENTITY", "NONCLUSTERED", "NOT",
    "NULL", "PRIMARY", "REFERENCES", "UNIQUE",
];

/// Parse a data type: a bare identifier (`INT`) or a function-call shape
/// (`VARCHAR(50)`, `DECIMAL(10, 2)`) so it reuses the call rendering path.
pub fn parse_data_type(p: &mut Parser) -> Expr {
    let is_option_word = p.current().kind == TokenKind::Word
        && COLUMN_OPTION_WORDS.contains(&p.current().upper().as_str());
    if !is_option_word
        && matches!(
            p.current().kind,
            TokenKind::Word | TokenKind::QuotedIdentifier
        )
    {
        parse_name_or_call(p)
    } else {
        // Missing data type: substitute a sentinel placeholder and continue.
        tracing::warn!(
            line = p.current().line,
            col = p.current().col,
            "column definition is missing a data type"
        );
        let here = p.current();
        Expr::new(ExprKind::Identifier(Identifier::from_parts(vec![
            Token::new(TokenKind::Word, "", here.offset, here.line, here.col),
        ])))
    }
}
