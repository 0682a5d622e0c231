//! Expression rendering
//!
//! Inline rendering produces a single-line form used both for output and
//! for collapse measurement; the wrapped paths split expressions over
//! lines when the inline form exceeds the width budget. Any node stamped
//! `parenthesized` re-emits literal parentheses on every path.
//!
//! String conventions: inline strings carry no indentation; multi-line
//! expression renders leave their first line unprefixed (the caller is
//! mid-line) and prefix every continuation line themselves.
//!
//! Comment ownership: the line builder that places a node on a line owns
//! its shallow comments. Block renderers reached through `expr_fit`
//! (expanded subqueries, expanded CASE) own their subtree's comments;
//! `bool_chain` emits per-leaf comments only when the caller passes it
//! ownership.

use crate::ast::*;
use crate::formatter::casing;
use crate::formatter::comments;
use crate::parser::lexer::{Token, TokenKind};

use super::Fmt;

impl<'a> Fmt<'a> {
    /// Render an expression on a single line.
    pub(crate) fn expr_inline(&self, e: &Expr) -> String {
        let body = match &e.kind {
            ExprKind::Literal(t) => self.word_or_text(t),
            ExprKind::Star(t) => t.text.clone(),
            ExprKind::Identifier(id) => self.identifier_inline(id),
            ExprKind::Binary { left, op, right } => format!(
                "{} {} {}",
                self.expr_inline(left),
                self.op_text(op),
                self.expr_inline(right)
            ),
            ExprKind::Unary { op, operand } => {
                if op.kind == TokenKind::Word {
                    format!("{} {}", self.op_text(op), self.expr_inline(operand))
                } else {
                    format!("{}{}", op.text, self.expr_inline(operand))
                }
            }
            ExprKind::FunctionCall(call) => self.call_inline(call),
            ExprKind::Case(case) => self.case_inline(case),
            ExprKind::In(in_expr) => {
                let mut out = self.expr_inline(&in_expr.expr);
                if let Some(not) = &in_expr.not_token {
                    out.push(' ');
                    out.push_str(&self.op_text(not));
                }
                out.push(' ');
                out.push_str(&self.op_text(&in_expr.in_token));
                out.push(' ');
                out.push_str(&self.group_inline(&in_expr.group));
                out
            }
            ExprKind::Between(between) => {
                let mut out = self.expr_inline(&between.expr);
                if let Some(not) = &between.not_token {
                    out.push(' ');
                    out.push_str(&self.op_text(not));
                }
                out.push(' ');
                out.push_str(&self.op_text(&between.between_token));
                out.push(' ');
                out.push_str(&self.expr_inline(&between.low));
                out.push(' ');
                out.push_str(&self.op_text(&between.and_token));
                out.push(' ');
                out.push_str(&self.expr_inline(&between.high));
                out
            }
            ExprKind::Exists(exists) => format!(
                "{} {}",
                self.op_text(&exists.exists_token),
                self.group_inline(&exists.group)
            ),
            ExprKind::Group(group) => self.group_inline(group),
            ExprKind::Aliased {
                expr,
                as_token,
                alias,
            } => {
                let mut out = self.expr_inline(expr);
                out.push_str(&self.alias_suffix(as_token, &Some(alias.clone())));
                out
            }
            ExprKind::Raw(tokens) => self.token_run(tokens),
        };
        if e.parenthesized {
            format!("({body})")
        } else {
            body
        }
    }

    /// A word token re-cased per category, or the raw text for non-words.
    pub(crate) fn word_or_text(&self, t: &Token) -> String {
        casing::render_token(t, self.cfg)
    }

    /// Operator/keyword token text with keyword casing for word operators.
    pub(crate) fn op_text(&self, t: &Token) -> String {
        if t.kind == TokenKind::Word {
            casing::apply_case(&t.text, self.cfg.casing.keywords)
        } else {
            t.text.clone()
        }
    }

    pub(crate) fn identifier_inline(&self, id: &Identifier) -> String {
        let mut out = String::new();
        for (i, part) in id.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&self.name_part(part));
        }
        if let Some(pivot) = &id.pivot {
            out.push(' ');
            out.push_str(&self.pivot_inline(pivot));
        }
        out.push_str(&self.alias_suffix(&id.as_token, &id.alias));
        out
    }

    pub(crate) fn name_part(&self, t: &Token) -> String {
        match t.kind {
            TokenKind::QuotedIdentifier => casing::render_quoted_identifier(t, self.cfg),
            TokenKind::Operator => t.text.clone(),
            _ => casing::render_word(t, self.cfg),
        }
    }

    pub(crate) fn alias_suffix(&self, as_token: &Option<Token>, alias: &Option<Token>) -> String {
        let mut out = String::new();
        if let Some(as_token) = as_token {
            out.push(' ');
            out.push_str(&self.op_text(as_token));
        }
        if let Some(alias) = alias {
            out.push(' ');
            out.push_str(&self.alias_text(alias));
        }
        out
    }

    pub(crate) fn alias_text(&self, alias: &Token) -> String {
        match alias.kind {
            TokenKind::QuotedIdentifier => casing::render_quoted_identifier(alias, self.cfg),
            TokenKind::StringLiteral => alias.text.clone(),
            _ => {
                // Aliases are identifiers, never re-cased
                if alias.text.starts_with('@') || alias.text.starts_with('#') {
                    alias.text.clone()
                } else {
                    match self.cfg.brackets.identifiers {
                        crate::config::BracketMode::None => alias.text.clone(),
                        _ => format!("[{}]", alias.text),
                    }
                }
            }
        }
    }

    fn call_inline(&self, call: &FunctionCall) -> String {
        let mut out = String::new();
        for (i, part) in call.name.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&self.name_part(part));
        }
        out.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                out.push_str(self.comma_sep());
            }
            out.push_str(&self.expr_inline(arg));
        }
        out.push(')');
        if let Some(over) = &call.over {
            out.push(' ');
            out.push_str(&self.op_text(&over.over_token));
            out.push(' ');
            out.push_str(&self.token_run(&over.tokens));
        }
        out.push_str(&self.alias_suffix(&call.as_token, &call.alias));
        out
    }

    fn case_inline(&self, case: &CaseExpression) -> String {
        let mut out = self.op_text(&case.case_token);
        if let Some(input) = &case.input {
            out.push(' ');
            out.push_str(&self.expr_inline(input));
        }
        for when in &case.whens {
            out.push(' ');
            out.push_str(&self.op_text(&when.when_token));
            out.push(' ');
            out.push_str(&self.expr_inline(&when.condition));
            out.push(' ');
            out.push_str(&self.op_text(&when.then_token));
            out.push(' ');
            out.push_str(&self.expr_inline(&when.result));
        }
        if let (Some(else_token), Some(else_result)) = (&case.else_token, &case.else_result) {
            out.push(' ');
            out.push_str(&self.op_text(else_token));
            out.push(' ');
            out.push_str(&self.expr_inline(else_result));
        }
        out.push(' ');
        out.push_str(&self.op_text(&case.end_token));
        out
    }

    pub(crate) fn group_inline(&self, group: &ParenGroup) -> String {
        let mut out = String::from("(");
        match &group.body {
            ParenBody::Query(stmt) => out.push_str(&self.stmt_inline(stmt)),
            ParenBody::Exprs(exprs) => {
                for (i, e) in exprs.iter().enumerate() {
                    if i > 0 {
                        out.push_str(self.comma_sep());
                    }
                    out.push_str(&self.expr_inline(e));
                }
            }
        }
        out.push(')');
        out
    }

    pub(crate) fn pivot_inline(&self, pivot: &PivotClause) -> String {
        let mut out = self.op_text(&pivot.pivot_token);
        out.push_str(" (");
        out.push_str(&self.expr_inline(&pivot.aggregate));
        out.push(' ');
        out.push_str(&self.op_text(&pivot.for_token));
        out.push(' ');
        out.push_str(&self.expr_inline(&pivot.column));
        out.push(' ');
        out.push_str(&self.op_text(&pivot.in_token));
        out.push(' ');
        out.push_str(&self.group_inline(&pivot.in_list));
        out.push(')');
        out.push_str(&self.alias_suffix(&pivot.as_token, &pivot.alias));
        out
    }

    /// Render a raw token run inline: words cased, spacing normalized.
    pub(crate) fn token_run(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        let mut prev: Option<&Token> = None;
        for token in tokens {
            let text = casing::render_token(token, self.cfg);
            if text.is_empty() {
                continue;
            }
            if let Some(prev) = prev {
                if needs_space(prev, token) {
                    out.push(' ');
                }
            }
            out.push_str(&text);
            prev = Some(token);
        }
        out
    }

    /// Render a raw token run greedily packed under the width budget;
    /// continuation lines at indent+1. First line unprefixed.
    pub(crate) fn token_run_wrapped(&self, tokens: &[Token], indent: usize) -> String {
        let inline = self.token_run(tokens);
        if self.fits(indent, &inline) {
            return inline;
        }
        let mut out = String::new();
        let mut col = self.indent_cols(indent);
        let cont = self.indent_str(indent + 1);
        let cont_cols = self.indent_cols(indent + 1);
        let mut prev: Option<&Token> = None;
        for token in tokens {
            let text = casing::render_token(token, self.cfg);
            if text.is_empty() {
                continue;
            }
            let space = prev.is_some_and(|p| needs_space(p, token));
            let added = text.chars().count() + usize::from(space);
            if prev.is_some() && col + added > self.cfg.whitespace.max_line_width {
                out.push('\n');
                out.push_str(&cont);
                col = cont_cols + text.chars().count();
                out.push_str(&text);
            } else {
                if space {
                    out.push(' ');
                }
                col += added;
                out.push_str(&text);
            }
            prev = Some(token);
        }
        out
    }

    /// Render a data type: builtin type words and user-defined type names
    /// follow the data-type casing/bracket policy.
    pub(crate) fn data_type_inline(&self, e: &Expr) -> String {
        match &e.kind {
            ExprKind::Identifier(id) => {
                let mut out = String::new();
                for (i, part) in id.parts.iter().enumerate() {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(&self.data_type_part(part));
                }
                out
            }
            ExprKind::FunctionCall(call) => {
                let mut out = String::new();
                for (i, part) in call.name.parts.iter().enumerate() {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(&self.data_type_part(part));
                }
                out.push('(');
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(self.comma_sep());
                    }
                    out.push_str(&self.expr_inline(arg));
                }
                out.push(')');
                out
            }
            _ => self.expr_inline(e),
        }
    }

    fn data_type_part(&self, t: &Token) -> String {
        match t.kind {
            TokenKind::QuotedIdentifier => casing::render_quoted_identifier(t, self.cfg),
            _ => casing::render_data_type_word(t, self.cfg),
        }
    }

    /// Render an expression within the width budget: inline when it fits,
    /// otherwise wrapped. CASE expressions and subqueries collapse under
    /// their own thresholds rather than the general width budget, and
    /// expressions whose buried subtrees carry comments always take the
    /// structured path so those comments get placed.
    pub(crate) fn expr_fit(&self, e: &Expr, indent: usize) -> String {
        match &e.kind {
            ExprKind::Case(case) => {
                let inline = self.expr_inline(e);
                let case_cfg = &self.cfg.case_expressions;
                if case_cfg.collapse_short_case_expressions
                    && !comments::case_has_inner_comments(case)
                    && self.indent_cols(indent) + inline.chars().count()
                        <= case_cfg.collapse_threshold
                    && self.fits(indent, &inline)
                {
                    return inline;
                }
                return self.wrap_parens_if_needed(e, self.case_expanded(case, indent));
            }
            ExprKind::Group(group) if matches!(group.body, ParenBody::Query(_)) => {
                return self
                    .wrap_parens_if_needed(e, self.group_attached(String::new(), group, indent));
            }
            ExprKind::Exists(exists) => {
                let prefix = self.op_text(&exists.exists_token);
                return self.wrap_parens_if_needed(
                    e,
                    self.group_attached(prefix, &exists.group, indent),
                );
            }
            ExprKind::In(in_expr) if matches!(in_expr.group.body, ParenBody::Query(_)) => {
                let mut prefix = self.expr_fit(&in_expr.expr, indent);
                if let Some(not) = &in_expr.not_token {
                    prefix.push(' ');
                    prefix.push_str(&self.op_text(not));
                }
                prefix.push(' ');
                prefix.push_str(&self.op_text(&in_expr.in_token));
                return self.wrap_parens_if_needed(
                    e,
                    self.group_attached(prefix, &in_expr.group, indent),
                );
            }
            ExprKind::Between(_) if self.cfg.operators.between.keep_on_one_line => {
                return self.expr_inline(e);
            }
            _ => {}
        }
        let inline = self.expr_inline(e);
        if self.fits(indent, &inline) && !comments::has_buried_comments(e) {
            return inline;
        }
        self.expr_wrapped(e, indent)
    }

    /// Multi-line rendering, dispatching on node kind to one of the
    /// wrapping strategies.
    fn expr_wrapped(&self, e: &Expr, indent: usize) -> String {
        let body = match &e.kind {
            ExprKind::Binary { left, op, right } if is_bool_op(op) => {
                let mut leaves = Vec::new();
                flatten_bool(left, None, &mut leaves);
                flatten_bool(right, Some(op), &mut leaves);
                self.bool_chain_lines(&leaves, indent, None, false)
            }
            ExprKind::Binary { left, op, right } => {
                // Split at the top-level operator, both sides re-fit deeper
                let left_text = self.expr_fit(left, indent);
                let right_text = self.expr_fit(right, indent + 1);
                format!(
                    "{left_text}\n{}{} {right_text}",
                    self.indent_str(indent + 1),
                    self.op_text(op)
                )
            }
            ExprKind::Unary { op, operand } => {
                if op.kind == TokenKind::Word {
                    format!("{} {}", self.op_text(op), self.expr_fit(operand, indent))
                } else {
                    format!("{}{}", op.text, self.expr_fit(operand, indent))
                }
            }
            ExprKind::FunctionCall(call) => self.call_wrapped(call, indent),
            ExprKind::Case(case) => self.case_expanded(case, indent),
            ExprKind::In(in_expr) => {
                let mut prefix = self.expr_fit(&in_expr.expr, indent);
                if let Some(not) = &in_expr.not_token {
                    prefix.push(' ');
                    prefix.push_str(&self.op_text(not));
                }
                prefix.push(' ');
                prefix.push_str(&self.op_text(&in_expr.in_token));
                match &in_expr.group.body {
                    ParenBody::Exprs(exprs) => {
                        let open_col = self.indent_cols(indent) + last_line_len(&prefix) + 2;
                        format!("{prefix} {}", self.value_list(exprs, open_col))
                    }
                    ParenBody::Query(_) => self.group_attached(prefix, &in_expr.group, indent),
                }
            }
            ExprKind::Between(between) => {
                let mut first = self.expr_fit(&between.expr, indent);
                if let Some(not) = &between.not_token {
                    first.push(' ');
                    first.push_str(&self.op_text(not));
                }
                first.push(' ');
                first.push_str(&self.op_text(&between.between_token));
                first.push(' ');
                first.push_str(&self.expr_inline(&between.low));
                format!(
                    "{first}\n{}{} {}",
                    self.indent_str(indent + 1),
                    self.op_text(&between.and_token),
                    self.expr_inline(&between.high)
                )
            }
            ExprKind::Exists(exists) => {
                let prefix = self.op_text(&exists.exists_token);
                self.group_attached(prefix, &exists.group, indent)
            }
            ExprKind::Group(group) => match &group.body {
                ParenBody::Query(_) => self.group_attached(String::new(), group, indent),
                ParenBody::Exprs(exprs) => {
                    self.value_list(exprs, self.indent_cols(indent) + 1)
                }
            },
            ExprKind::Aliased {
                expr,
                as_token,
                alias,
            } => {
                let mut out = self.expr_fit(expr, indent);
                out.push_str(&self.alias_suffix(as_token, &Some(alias.clone())));
                out
            }
            ExprKind::Literal(_)
            | ExprKind::Star(_)
            | ExprKind::Identifier(_)
            | ExprKind::Raw(_) => {
                // Atomic; wrapping cannot split inside a token
                return self.expr_inline(e);
            }
        };
        self.wrap_parens_if_needed(e, body)
    }

    /// Re-apply the source-parenthesization stamp around a possibly
    /// multi-line body.
    fn wrap_parens_if_needed(&self, e: &Expr, body: String) -> String {
        if !e.parenthesized {
            return body;
        }
        format!("({body})")
    }

    /// Function-call argument wrapping: one argument per line at indent+1.
    fn call_wrapped(&self, call: &FunctionCall, indent: usize) -> String {
        let mut out = String::new();
        for (i, part) in call.name.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&self.name_part(part));
        }
        out.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            out.push('\n');
            out.push_str(&self.indent_str(indent + 1));
            out.push_str(&self.expr_fit(arg, indent + 1));
            if i + 1 < call.args.len() {
                out.push(',');
            }
        }
        out.push('\n');
        out.push_str(&self.indent_str(indent));
        out.push(')');
        if let Some(over) = &call.over {
            out.push(' ');
            out.push_str(&self.op_text(&over.over_token));
            out.push(' ');
            out.push_str(&self.token_run(&over.tokens));
        }
        out.push_str(&self.alias_suffix(&call.as_token, &call.alias));
        out
    }

    /// Expanded CASE: `CASE [input]`, one WHEN...THEN per line, ELSE, END.
    /// First line unprefixed; owns its inner comments.
    pub(crate) fn case_expanded(&self, case: &CaseExpression, indent: usize) -> String {
        let mut out = self.op_text(&case.case_token);
        if let Some(trailing) = &case.case_token.trailing_comment {
            out.push(' ');
            out.push_str(&trailing.text);
        }
        if let Some(input) = &case.input {
            out.push(' ');
            out.push_str(&self.expr_inline(input));
        }
        for when in &case.whens {
            let cond_nc = comments::shallow_comments(&when.condition);
            let result_nc = comments::shallow_comments(&when.result);
            for c in when.when_token.leading_comments.iter().chain(cond_nc.above.iter().copied()) {
                out.push('\n');
                out.push_str(&self.indent_str(indent + 1));
                out.push_str(&c.text);
            }
            out.push('\n');
            out.push_str(&self.indent_str(indent + 1));
            out.push_str(&self.op_text(&when.when_token));
            out.push(' ');
            out.push_str(&self.expr_fit(&when.condition, indent + 1));
            out.push(' ');
            out.push_str(&self.op_text(&when.then_token));
            out.push(' ');
            out.push_str(&self.expr_fit(&when.result, indent + 1));
            let mut trailing: Vec<&Token> = Vec::new();
            if let Some(t) = &when.when_token.trailing_comment {
                trailing.push(t.as_ref());
            }
            trailing.extend(cond_nc.at_end.iter().copied());
            if let Some(t) = &when.then_token.trailing_comment {
                trailing.push(t.as_ref());
            }
            trailing.extend(result_nc.above.iter().copied());
            trailing.extend(result_nc.at_end.iter().copied());
            for c in trailing {
                out.push(' ');
                out.push_str(&c.text);
            }
        }
        if let (Some(else_token), Some(else_result)) = (&case.else_token, &case.else_result) {
            let nc = comments::shallow_comments(else_result);
            for c in else_token.leading_comments.iter().chain(nc.above.iter().copied()) {
                out.push('\n');
                out.push_str(&self.indent_str(indent + 1));
                out.push_str(&c.text);
            }
            out.push('\n');
            out.push_str(&self.indent_str(indent + 1));
            out.push_str(&self.op_text(else_token));
            out.push(' ');
            out.push_str(&self.expr_fit(else_result, indent + 1));
            let mut trailing: Vec<&Token> = Vec::new();
            if let Some(t) = &else_token.trailing_comment {
                trailing.push(t.as_ref());
            }
            trailing.extend(nc.at_end.iter().copied());
            for c in trailing {
                out.push(' ');
                out.push_str(&c.text);
            }
        }
        for c in &case.end_token.leading_comments {
            out.push('\n');
            out.push_str(&self.indent_str(indent));
            out.push_str(&c.text);
        }
        out.push('\n');
        out.push_str(&self.indent_str(indent));
        out.push_str(&self.op_text(&case.end_token));
        if let Some(trailing) = &case.end_token.trailing_comment {
            out.push(' ');
            out.push_str(&trailing.text);
        }
        out
    }

    /// Attach a group to a prefix per the configured parenthesis style,
    /// collapsing short comment-free subqueries under their own threshold.
    pub(crate) fn group_attached(&self, prefix: String, group: &ParenGroup, indent: usize) -> String {
        let inline = self.group_inline(group);
        let collapse_ok = self.cfg.dml.collapse_short_subqueries
            && !comments::group_has_inner_comments(group)
            && self.indent_cols(indent) + inline.chars().count()
                <= self.cfg.dml.subquery_collapse_threshold;
        if collapse_ok {
            if prefix.is_empty() {
                return inline;
            }
            return format!("{prefix} {inline}");
        }
        let block = self.group_expanded_block(group, indent);
        if prefix.is_empty() {
            return block;
        }
        if self.parens_expanded() {
            format!("{prefix}\n{}{block}", self.indent_str(indent))
        } else {
            format!("{prefix} {block}")
        }
    }

    /// Expanded group: `(` (first line, unprefixed), body at indent+1, `)`
    /// at the style-dependent close indent. Owns the paren tokens' comments
    /// and, for query bodies, delegates the rest to the statement renderer;
    /// comments pending before the closing paren go above it.
    pub(crate) fn group_expanded_block(&self, group: &ParenGroup, indent: usize) -> String {
        let mut out = String::from("(");
        if let Some(trailing) = &group.lparen.trailing_comment {
            out.push(' ');
            out.push_str(&trailing.text);
        }
        match &group.body {
            ParenBody::Query(stmt) => {
                let body = self.statement_block(stmt, indent + 1);
                out.push('\n');
                out.push_str(&body);
            }
            ParenBody::Exprs(exprs) => {
                for (i, e) in exprs.iter().enumerate() {
                    let nc = comments::shallow_comments(e);
                    for c in &nc.above {
                        out.push('\n');
                        out.push_str(&self.indent_str(indent + 1));
                        out.push_str(&c.text);
                    }
                    out.push('\n');
                    out.push_str(&self.indent_str(indent + 1));
                    out.push_str(&self.expr_fit(e, indent + 1));
                    if i + 1 < exprs.len() {
                        out.push(',');
                    }
                    for c in &nc.at_end {
                        out.push(' ');
                        out.push_str(&c.text);
                    }
                }
            }
        }
        let close_indent = self.paren_close_indent(indent);
        for c in &group.rparen.leading_comments {
            out.push('\n');
            out.push_str(&self.indent_str(indent + 1));
            out.push_str(&c.text);
        }
        out.push('\n');
        out.push_str(&self.indent_str(close_indent));
        out.push(')');
        if let Some(trailing) = &group.rparen.trailing_comment {
            out.push(' ');
            out.push_str(&trailing.text);
        }
        out
    }

    /// Greedy value-list packing: values fill each line up to the width
    /// budget, continuation lines left-aligned just after the opening
    /// parenthesis. `open_col` is the absolute column of the first value.
    /// Comment-free rendering; the caller owns the list's comments.
    pub(crate) fn value_list(&self, exprs: &[Expr], open_col: usize) -> String {
        let mut out = String::from("(");
        let mut col = open_col;
        let pad = " ".repeat(open_col);
        for (i, e) in exprs.iter().enumerate() {
            let mut item = self.expr_inline(e);
            if i + 1 < exprs.len() {
                item.push(',');
            }
            if i == 0 {
                col += item.chars().count();
                out.push_str(&item);
                continue;
            }
            let sep = usize::from(self.cfg.lists.commas.space_after_comma);
            if col + sep + item.chars().count() > self.cfg.whitespace.max_line_width {
                out.push('\n');
                out.push_str(&pad);
                col = open_col + item.chars().count();
            } else {
                if sep == 1 {
                    out.push(' ');
                }
                col += sep + item.chars().count();
            }
            out.push_str(&item);
        }
        out.push(')');
        out
    }

    /// AND/OR chain rendering, one connective per line. In clause mode
    /// (`anchor` is the rendered clause keyword width) connectives are
    /// right-aligned under the keyword so every leaf starts at the same
    /// column, which is what makes comparison alignment hold across lines;
    /// without an anchor the chain wraps at indent+1. `emit_comments`
    /// passes comment ownership to the chain builder.
    pub(crate) fn bool_chain(
        &self,
        cond: &Expr,
        indent: usize,
        anchor: Option<usize>,
        emit_comments: bool,
    ) -> String {
        let mut leaves = Vec::new();
        flatten_bool(cond, None, &mut leaves);
        self.bool_chain_lines(&leaves, indent, anchor, emit_comments)
    }

    fn bool_chain_lines(
        &self,
        leaves: &[(Option<&Token>, &Expr)],
        indent: usize,
        anchor: Option<usize>,
        emit_comments: bool,
    ) -> String {
        let lhs_width = if anchor.is_some() && self.cfg.operators.comparison.align_operators {
            leaves
                .iter()
                .filter_map(|(_, leaf)| self.comparison_lhs(leaf))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        } else {
            0
        };
        let cont_indent = match anchor {
            Some(_) => indent,
            None => indent + 1,
        };

        let mut out = String::new();
        for (i, (op, leaf)) in leaves.iter().enumerate() {
            let mut nc = comments::shallow_comments(leaf);
            if let Some(op) = op {
                let mut above = op.leading_comments.iter().collect::<Vec<_>>();
                above.append(&mut nc.above);
                nc.above = above;
                if let Some(trailing) = &op.trailing_comment {
                    nc.at_end.insert(0, trailing.as_ref());
                }
            }
            if i > 0 {
                if emit_comments {
                    for c in &nc.above {
                        out.push('\n');
                        out.push_str(&self.indent_str(cont_indent));
                        out.push_str(&c.text);
                    }
                }
                out.push('\n');
                out.push_str(&self.indent_str(cont_indent));
            } else if emit_comments {
                // The caller renders the first line; its above comments
                // degrade to end-of-line placement to stay conserved
                let mut merged = std::mem::take(&mut nc.above);
                merged.extend(nc.at_end.drain(..));
                nc.at_end = merged;
            }
            if let Some(op) = op {
                if self.cfg.operators.and_or.place_before_condition {
                    let text = self.op_text(op);
                    if let Some(width) = anchor {
                        let len = text.chars().count();
                        if width > len {
                            out.push_str(&" ".repeat(width - len));
                        }
                    }
                    out.push_str(&text);
                    out.push(' ');
                }
            }
            if i > 0 && anchor.is_some() && !self.cfg.operators.and_or.place_before_condition {
                // Trailing connectives: pad so leaves still line up
                if let Some(width) = anchor {
                    out.push_str(&" ".repeat(width + 1));
                }
            }
            out.push_str(&self.render_chain_leaf(leaf, cont_indent + 1, lhs_width));
            if let Some(next_op) = leaves.get(i + 1).and_then(|(op, _)| op.as_ref()) {
                if !self.cfg.operators.and_or.place_before_condition {
                    out.push(' ');
                    out.push_str(&self.op_text(next_op));
                }
            }
            if emit_comments {
                for c in &nc.at_end {
                    out.push(' ');
                    out.push_str(&c.text);
                }
            }
        }
        out
    }

    /// One leaf of an AND/OR chain, with its comparison left-hand side
    /// padded when alignment is on.
    fn render_chain_leaf(&self, leaf: &Expr, indent: usize, lhs_width: usize) -> String {
        if lhs_width > 0 && !leaf.parenthesized {
            if let ExprKind::Binary { op, right, .. } = &leaf.kind {
                if let Some(lhs) = self.comparison_lhs(leaf) {
                    let padded = super::align::pad_to(&lhs, lhs_width);
                    return format!("{padded} {} {}", op.text, self.expr_inline(right));
                }
            }
        }
        self.expr_fit(leaf, indent)
    }

    /// The inline left-hand side of a simple comparison leaf, if this leaf
    /// qualifies for operator alignment.
    fn comparison_lhs(&self, leaf: &Expr) -> Option<String> {
        if leaf.parenthesized {
            return None;
        }
        match &leaf.kind {
            ExprKind::Binary { left, op, .. }
                if op.kind == TokenKind::Operator && !comments::expr_has_comments(leaf) =>
            {
                Some(self.expr_inline(left))
            }
            _ => None,
        }
    }

    /// Whether the condition is a multi-leaf AND/OR chain.
    pub(crate) fn is_bool_chain(&self, cond: &Expr) -> bool {
        match &cond.kind {
            ExprKind::Binary { op, .. } => is_bool_op(op) && !cond.parenthesized,
            _ => false,
        }
    }
}

pub(crate) fn is_bool_op(op: &Token) -> bool {
    op.is_word("AND") || op.is_word("OR")
}

/// Flatten an AND/OR tree into a linear run of (connective, leaf) pairs.
/// Parenthesized sub-chains stay intact as single leaves, since their
/// grouping is semantically meaningful.
fn flatten_bool<'e>(
    expr: &'e Expr,
    pending_op: Option<&'e Token>,
    out: &mut Vec<(Option<&'e Token>, &'e Expr)>,
) {
    match &expr.kind {
        ExprKind::Binary { left, op, right } if is_bool_op(op) && !expr.parenthesized => {
            flatten_bool(left, pending_op, out);
            flatten_bool(right, Some(op), out);
        }
        _ => out.push((pending_op, expr)),
    }
}

fn last_line_len(s: &str) -> usize {
    match s.rsplit_once('\n') {
        Some((_, last)) => last.chars().count(),
        None => s.chars().count(),
    }
}

fn needs_space(prev: &Token, next: &Token) -> bool {
    // No space before closers/separators, none after openers or dots
    if next.is_symbol(",") || next.is_symbol(")") || next.is_symbol(";") || next.is_symbol(".") {
        return false;
    }
    if prev.is_symbol("(") || prev.is_symbol(".") {
        return false;
    }
    true
}
