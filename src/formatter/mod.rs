//! SQL formatting / pretty-printing logic
//!
//! A configuration-driven tree walk over the AST. The only threaded state
//! is the indent level: every rendering function is a pure function of
//! (node, config, indent) and returns its text, so concurrent format runs
//! never interfere.
//!
//! The central algorithm is collapse-or-expand: statements and selected
//! expression kinds first render a fully inlined single-line form and emit
//! it when it fits the configured threshold and no clause-attached comment
//! would be lost; otherwise the expanded multi-line form is emitted. The
//! choice recurses, so a subquery inside an expanded SELECT may still
//! collapse under its own threshold.

pub mod align;
pub mod casing;
pub mod comments;
mod expr;

use crate::ast::*;
use crate::config::{FormatConfig, ParenthesisStyle};
use crate::parser::lexer::Token;
use comments::NodeComments;

/// Format a parsed script under the given configuration.
pub fn format_script(script: &SqlScript, cfg: &FormatConfig) -> String {
    let fmt = Fmt { cfg };
    let text = fmt.script(script);
    match cfg.statements.line_ending {
        crate::config::LineEnding::Lf => text,
        crate::config::LineEnding::Crlf => text.replace('\n', "\r\n"),
    }
}

pub(crate) struct Fmt<'a> {
    pub(crate) cfg: &'a FormatConfig,
}

impl<'a> Fmt<'a> {
    // -- infrastructure -----------------------------------------------------

    pub(crate) fn indent_str(&self, level: usize) -> String {
        self.cfg.whitespace.indent_unit().repeat(level)
    }

    pub(crate) fn indent_cols(&self, level: usize) -> usize {
        level * self.cfg.whitespace.indent_width
    }

    /// Whether a single-line rendering fits the width budget at this indent.
    pub(crate) fn fits(&self, indent: usize, text: &str) -> bool {
        !text.contains('\n')
            && self.indent_cols(indent) + text.chars().count() <= self.cfg.whitespace.max_line_width
    }

    pub(crate) fn comma_sep(&self) -> &'static str {
        if self.cfg.lists.commas.space_after_comma {
            ", "
        } else {
            ","
        }
    }

    pub(crate) fn parens_expanded(&self) -> bool {
        matches!(
            self.cfg.parentheses.style,
            ParenthesisStyle::ExpandedToStatement | ParenthesisStyle::ExpandedToParenthesis
        )
    }

    pub(crate) fn paren_close_indent(&self, indent: usize) -> usize {
        match self.cfg.parentheses.style {
            ParenthesisStyle::ExpandedToStatement | ParenthesisStyle::CompactToStatement => indent,
            ParenthesisStyle::ExpandedToParenthesis | ParenthesisStyle::CompactToParenthesis => {
                indent + 1
            }
        }
    }

    fn append_comments(&self, line: &mut String, comments: &[&Token]) {
        for c in comments {
            line.push(' ');
            line.push_str(&c.text);
        }
    }

    /// Emit comments on their own lines. The caller must be at the start
    /// of a fresh line (empty output or just after a newline); each comment
    /// line is terminated, so the caller continues with its own line.
    fn comment_lines(&self, out: &mut String, indent: usize, comments: &[&Token]) {
        for c in comments {
            out.push_str(&self.indent_str(indent));
            out.push_str(&c.text);
            out.push('\n');
        }
    }

    // -- script and statement sequencing ------------------------------------

    fn script(&self, script: &SqlScript) -> String {
        let mut out = String::new();
        let mut after_separator = false;
        for batch in &script.batches {
            self.statement_sequence_inner(&batch.statements, 0, &mut out, after_separator);
            after_separator = false;
            if let Some(separator) = &batch.separator {
                let blank = separator
                    .leading_comments
                    .first()
                    .map(|c| c.preceded_by_blank_line)
                    .unwrap_or(separator.preceded_by_blank_line);
                if !out.is_empty() {
                    out.push('\n');
                    if blank && self.cfg.statements.preserve_blank_lines {
                        out.push('\n');
                    }
                }
                self.comment_lines(
                    &mut out,
                    0,
                    &separator.leading_comments.iter().collect::<Vec<_>>(),
                );
                out.push_str(&casing::apply_case(&separator.text, self.cfg.casing.keywords));
                if let Some(trailing) = &separator.trailing_comment {
                    out.push(' ');
                    out.push_str(&trailing.text);
                }
                after_separator = true;
            }
        }
        // Comments trailing the last statement of the script
        let eof_comments: Vec<&Token> = script
            .eof
            .leading_comments
            .iter()
            .chain(script.eof.trailing_comments_at_eof.iter())
            .collect();
        for c in eof_comments {
            if !out.is_empty() {
                out.push('\n');
                if c.preceded_by_blank_line
                    && self.cfg.statements.preserve_blank_lines_between_comments
                {
                    out.push('\n');
                }
            }
            out.push_str(&c.text);
        }
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }

    /// Render a run of statements at one indent level, preserving blank
    /// lines and emitting each statement's leading comments above it.
    fn statement_sequence(&self, statements: &[Statement], indent: usize, out: &mut String) {
        self.statement_sequence_inner(statements, indent, out, false);
    }

    fn statement_sequence_inner(
        &self,
        statements: &[Statement],
        indent: usize,
        out: &mut String,
        after_separator: bool,
    ) {
        for (i, stmt) in statements.iter().enumerate() {
            let block = self.statement_block(stmt, indent);
            if block.is_empty() {
                continue;
            }
            let first = stmt.first_token();
            let blank_flag = first
                .map(|t| {
                    t.leading_comments
                        .first()
                        .map(|c| c.preceded_by_blank_line)
                        .unwrap_or(t.preceded_by_blank_line)
                })
                .unwrap_or(false);
            // Blank lines after a batch separator have their own switch
            let preserve = if i == 0 && after_separator {
                self.cfg.statements.blank_line_after_batch_separator
            } else {
                self.cfg.statements.preserve_blank_lines
            };
            if !out.is_empty() {
                out.push('\n');
                if blank_flag && preserve {
                    out.push('\n');
                }
            }
            out.push_str(&block);
        }
    }

    /// A statement with its leading comments, every line carrying its
    /// indent prefix.
    pub(crate) fn statement_block(&self, stmt: &Statement, indent: usize) -> String {
        let mut out = String::new();
        if let Some(first) = stmt.first_token() {
            for (i, c) in first.leading_comments.iter().enumerate() {
                if i > 0
                    && c.preceded_by_blank_line
                    && self.cfg.statements.preserve_blank_lines_between_comments
                {
                    out.push('\n');
                }
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&self.indent_str(indent));
                out.push_str(&c.text);
            }
            if !out.is_empty() {
                out.push('\n');
                if first.preceded_by_blank_line
                    && self.cfg.statements.preserve_blank_lines_between_comments
                {
                    out.push('\n');
                }
            }
        }
        out.push_str(&self.render_statement(stmt, indent));
        out
    }

    // -- statement dispatch -------------------------------------------------

    /// Render a statement body (without its leading comments); every line
    /// carries its indent prefix.
    pub(crate) fn render_statement(&self, stmt: &Statement, indent: usize) -> String {
        if let Some((enabled, threshold)) = self.collapse_params(stmt) {
            if enabled && !comments::blocks_collapse(stmt) {
                let inline = self.stmt_inline(stmt);
                if self.indent_cols(indent) + inline.chars().count() <= threshold
                    && self.fits(indent, &inline)
                {
                    let mut line = self.indent_str(indent);
                    line.push_str(&inline);
                    line.push_str(self.forced_semi(stmt));
                    let tokens = stmt.tokens();
                    if let Some(last) = tokens.last() {
                        if let Some(trailing) = &last.trailing_comment {
                            line.push(' ');
                            line.push_str(&trailing.text);
                        }
                    }
                    return line;
                }
            }
        }
        self.render_expanded(stmt, indent)
    }

    /// Collapse switch and threshold per statement kind; `None` for
    /// statements that are single-line by nature.
    fn collapse_params(&self, stmt: &Statement) -> Option<(bool, usize)> {
        match stmt {
            Statement::Select(_) | Statement::Update(_) | Statement::Delete(_) => Some((
                self.cfg.dml.collapse_short_statements,
                self.cfg.dml.collapse_threshold,
            )),
            Statement::Cte(c) => self.collapse_params(&c.body),
            Statement::Insert(_) => Some((
                self.cfg.inserts.collapse_short_inserts,
                self.cfg.inserts.collapse_threshold,
            )),
            Statement::CreateTable(_) => Some((
                self.cfg.ddl.collapse_short_definitions,
                self.cfg.ddl.collapse_threshold,
            )),
            Statement::IfElse(_) | Statement::BeginEnd(_) => Some((
                self.cfg.control_flow.collapse_short_blocks,
                self.cfg.control_flow.collapse_threshold,
            )),
            _ => None,
        }
    }

    fn render_expanded(&self, stmt: &Statement, indent: usize) -> String {
        match stmt {
            Statement::Select(s) => self.select_expanded(s, indent),
            Statement::Insert(s) => self.insert_expanded(s, indent),
            Statement::Update(s) => self.update_expanded(s, indent),
            Statement::Delete(s) => self.delete_expanded(s, indent),
            Statement::Cte(s) => self.cte_expanded(s, indent),
            Statement::BeginEnd(s) => self.begin_end_expanded(s, indent),
            Statement::IfElse(s) => self.if_expanded(s, indent),
            Statement::Declare(s) => self.declare_render(s, indent),
            Statement::SetVariable(s) => self.set_render(s, indent),
            Statement::Print(s) => self.print_render(s, indent),
            Statement::Return(s) => self.return_render(s, indent),
            Statement::CreateTable(s) => self.create_table_expanded(s, indent),
            Statement::AlterTable(s) => self.alter_render(s, indent),
            Statement::DropTable(s) => self.drop_render(s, indent),
            Statement::Expr(s) => self.expr_statement_render(s, indent),
            Statement::Raw(s) => self.raw_render(s, indent),
        }
    }

    fn semi_text(&self, semicolon: &Option<Token>) -> &'static str {
        if semicolon.is_some() || self.cfg.statements.insert_semicolons {
            ";"
        } else {
            ""
        }
    }

    /// The semicolon to add to an already-inlined statement when insertion
    /// is forced and the source had none.
    fn forced_semi(&self, stmt: &Statement) -> &'static str {
        if !self.cfg.statements.insert_semicolons {
            return "";
        }
        match statement_semicolon(stmt) {
            Some(None) => ";",
            _ => "",
        }
    }

    /// Append the semicolon and its attached comments to the last line.
    fn finish(&self, out: &mut String, semicolon: &Option<Token>) {
        out.push_str(self.semi_text(semicolon));
        if let Some(semi) = semicolon {
            let refs: Vec<&Token> = semi.leading_comments.iter().collect();
            self.append_comments(out, &refs);
            if let Some(trailing) = &semi.trailing_comment {
                out.push(' ');
                out.push_str(&trailing.text);
            }
        }
    }

    // -- inline statement forms ---------------------------------------------

    /// Fully inlined single-line form of a statement, including its
    /// semicolon when present in the source, excluding comments.
    pub(crate) fn stmt_inline(&self, stmt: &Statement) -> String {
        match stmt {
            Statement::Select(s) => {
                let mut out = self.select_inline(s);
                out.push_str(self.semi_text_present(&s.semicolon));
                out
            }
            Statement::Insert(s) => self.insert_inline(s),
            Statement::Update(s) => self.update_inline(s),
            Statement::Delete(s) => self.delete_inline(s),
            Statement::Cte(s) => self.cte_inline(s),
            Statement::BeginEnd(s) => self.begin_end_inline(s),
            Statement::IfElse(s) => self.if_inline(s),
            Statement::Declare(s) => self.declare_inline(s),
            Statement::SetVariable(s) => self.set_inline(s),
            Statement::Print(s) => {
                let mut out = self.op_text(&s.print_token);
                out.push(' ');
                out.push_str(&self.expr_inline(&s.value));
                out.push_str(self.semi_text_present(&s.semicolon));
                out
            }
            Statement::Return(s) => {
                let mut out = self.op_text(&s.return_token);
                if let Some(value) = &s.value {
                    out.push(' ');
                    out.push_str(&self.expr_inline(value));
                }
                out.push_str(self.semi_text_present(&s.semicolon));
                out
            }
            Statement::CreateTable(s) => self.create_table_inline(s),
            Statement::AlterTable(s) => {
                let mut out = format!(
                    "{} {} {}",
                    self.op_text(&s.alter_token),
                    self.op_text(&s.table_token),
                    self.identifier_inline(&s.name)
                );
                if !s.action.is_empty() {
                    out.push(' ');
                    out.push_str(&self.token_run(&s.action));
                }
                out.push_str(self.semi_text_present(&s.semicolon));
                out
            }
            Statement::DropTable(s) => self.drop_inline(s),
            Statement::Expr(s) => {
                let mut out = self.expr_inline(&s.expr);
                out.push_str(self.semi_text_present(&s.semicolon));
                out
            }
            Statement::Raw(s) => {
                let mut out = self.token_run(&s.tokens);
                out.push_str(self.semi_text_present(&s.semicolon));
                out
            }
        }
    }

    fn semi_text_present(&self, semicolon: &Option<Token>) -> &'static str {
        if semicolon.is_some() {
            ";"
        } else {
            ""
        }
    }

    fn select_inline(&self, s: &SelectStatement) -> String {
        let mut out = self.op_text(&s.select_token);
        if let Some(distinct) = &s.distinct_token {
            out.push(' ');
            out.push_str(&self.op_text(distinct));
        }
        if let Some(top) = &s.top {
            out.push(' ');
            out.push_str(&self.top_inline(top));
        }
        out.push(' ');
        for (i, col) in s.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(self.comma_sep());
            }
            out.push_str(&self.expr_inline(&col.expr));
            out.push_str(&self.alias_suffix(&col.as_token, &col.alias));
        }
        if let Some(from) = &s.from {
            out.push(' ');
            out.push_str(&self.op_text(&from.from_token));
            out.push(' ');
            for (i, table) in from.tables.iter().enumerate() {
                if i > 0 {
                    out.push_str(self.comma_sep());
                }
                out.push_str(&self.expr_inline(table));
            }
        }
        for join in &s.joins {
            out.push(' ');
            out.push_str(&self.join_keywords(join));
            out.push(' ');
            out.push_str(&self.expr_inline(&join.table));
            if let (Some(on), Some(cond)) = (&join.on_token, &join.condition) {
                out.push(' ');
                out.push_str(&self.op_text(on));
                out.push(' ');
                out.push_str(&self.expr_inline(cond));
            }
        }
        if let Some(w) = &s.where_clause {
            out.push(' ');
            out.push_str(&self.op_text(&w.keyword));
            out.push(' ');
            out.push_str(&self.expr_inline(&w.condition));
        }
        if let Some(g) = &s.group_by {
            out.push(' ');
            out.push_str(&self.op_text(&g.group_token));
            out.push(' ');
            out.push_str(&self.op_text(&g.by_token));
            out.push(' ');
            for (i, e) in g.exprs.iter().enumerate() {
                if i > 0 {
                    out.push_str(self.comma_sep());
                }
                out.push_str(&self.expr_inline(e));
            }
        }
        if let Some(h) = &s.having {
            out.push(' ');
            out.push_str(&self.op_text(&h.keyword));
            out.push(' ');
            out.push_str(&self.expr_inline(&h.condition));
        }
        if let Some(o) = &s.order_by {
            out.push(' ');
            out.push_str(&self.op_text(&o.order_token));
            out.push(' ');
            out.push_str(&self.op_text(&o.by_token));
            out.push(' ');
            for (i, item) in o.items.iter().enumerate() {
                if i > 0 {
                    out.push_str(self.comma_sep());
                }
                out.push_str(&self.order_item_inline(item));
            }
        }
        if let Some(u) = &s.union {
            out.push(' ');
            out.push_str(&self.keyword_run(&u.op_tokens));
            out.push(' ');
            out.push_str(&self.select_inline(&u.query));
        }
        out
    }

    fn top_inline(&self, top: &TopClause) -> String {
        let mut out = self.op_text(&top.top_token);
        out.push(' ');
        out.push_str(&self.expr_inline(&top.value));
        if let Some(percent) = &top.percent_token {
            out.push(' ');
            out.push_str(&self.op_text(percent));
        }
        out
    }

    fn order_item_inline(&self, item: &OrderByItem) -> String {
        let mut out = self.expr_inline(&item.expr);
        if let Some(direction) = &item.direction {
            out.push(' ');
            out.push_str(&self.op_text(direction));
        }
        out
    }

    fn join_keywords(&self, join: &JoinClause) -> String {
        join.keywords
            .iter()
            .map(|t| self.op_text(t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn keyword_run(&self, tokens: &[Token]) -> String {
        tokens
            .iter()
            .map(|t| self.op_text(t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn insert_inline(&self, s: &InsertStatement) -> String {
        let mut out = self.op_text(&s.insert_token);
        if let Some(into) = &s.into_token {
            out.push(' ');
            out.push_str(&self.op_text(into));
        }
        out.push(' ');
        out.push_str(&self.identifier_inline(&s.target));
        if let Some(columns) = &s.columns {
            out.push(' ');
            out.push_str(&self.group_inline(columns));
        }
        match &s.source {
            InsertSource::Values { values_token, rows } => {
                out.push(' ');
                out.push_str(&self.op_text(values_token));
                out.push(' ');
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        out.push_str(self.comma_sep());
                    }
                    out.push_str(&self.group_inline(row));
                }
            }
            InsertSource::Query(stmt) => {
                out.push(' ');
                out.push_str(&self.stmt_inline(stmt));
            }
            InsertSource::Raw(tokens) => {
                out.push(' ');
                out.push_str(&self.token_run(tokens));
            }
        }
        out.push_str(self.semi_text_present(&s.semicolon));
        out
    }

    fn update_inline(&self, s: &UpdateStatement) -> String {
        let mut out = self.op_text(&s.update_token);
        if let Some(top) = &s.top {
            out.push(' ');
            out.push_str(&self.top_inline(top));
        }
        out.push(' ');
        out.push_str(&self.identifier_inline(&s.target));
        out.push(' ');
        out.push_str(&self.op_text(&s.set_token));
        out.push(' ');
        for (i, a) in s.assignments.iter().enumerate() {
            if i > 0 {
                out.push_str(self.comma_sep());
            }
            out.push_str(&self.assignment_inline(a));
        }
        if let Some(from) = &s.from {
            out.push(' ');
            out.push_str(&self.op_text(&from.from_token));
            out.push(' ');
            for (i, table) in from.tables.iter().enumerate() {
                if i > 0 {
                    out.push_str(self.comma_sep());
                }
                out.push_str(&self.expr_inline(table));
            }
        }
        for join in &s.joins {
            out.push(' ');
            out.push_str(&self.join_keywords(join));
            out.push(' ');
            out.push_str(&self.expr_inline(&join.table));
            if let (Some(on), Some(cond)) = (&join.on_token, &join.condition) {
                out.push(' ');
                out.push_str(&self.op_text(on));
                out.push(' ');
                out.push_str(&self.expr_inline(cond));
            }
        }
        if let Some(w) = &s.where_clause {
            out.push(' ');
            out.push_str(&self.op_text(&w.keyword));
            out.push(' ');
            out.push_str(&self.expr_inline(&w.condition));
        }
        out.push_str(self.semi_text_present(&s.semicolon));
        out
    }

    fn assignment_inline(&self, a: &Assignment) -> String {
        format!(
            "{} {} {}",
            self.expr_inline(&a.target),
            a.op.text,
            self.expr_inline(&a.value)
        )
    }

    fn delete_inline(&self, s: &DeleteStatement) -> String {
        let mut out = self.op_text(&s.delete_token);
        if let Some(top) = &s.top {
            out.push(' ');
            out.push_str(&self.top_inline(top));
        }
        if let Some(from) = &s.from_token {
            out.push(' ');
            out.push_str(&self.op_text(from));
        }
        out.push(' ');
        out.push_str(&self.identifier_inline(&s.target));
        if let Some(from) = &s.from {
            out.push(' ');
            out.push_str(&self.op_text(&from.from_token));
            out.push(' ');
            for (i, table) in from.tables.iter().enumerate() {
                if i > 0 {
                    out.push_str(self.comma_sep());
                }
                out.push_str(&self.expr_inline(table));
            }
        }
        for join in &s.joins {
            out.push(' ');
            out.push_str(&self.join_keywords(join));
            out.push(' ');
            out.push_str(&self.expr_inline(&join.table));
            if let (Some(on), Some(cond)) = (&join.on_token, &join.condition) {
                out.push(' ');
                out.push_str(&self.op_text(on));
                out.push(' ');
                out.push_str(&self.expr_inline(cond));
            }
        }
        if let Some(w) = &s.where_clause {
            out.push(' ');
            out.push_str(&self.op_text(&w.keyword));
            out.push(' ');
            out.push_str(&self.expr_inline(&w.condition));
        }
        out.push_str(self.semi_text_present(&s.semicolon));
        out
    }

    fn cte_inline(&self, s: &CteStatement) -> String {
        let mut out = self.op_text(&s.with_token);
        out.push(' ');
        for (i, cte) in s.ctes.iter().enumerate() {
            if i > 0 {
                out.push_str(self.comma_sep());
            }
            out.push_str(&self.name_part(&cte.name));
            if let Some(columns) = &cte.columns {
                out.push(' ');
                out.push_str(&self.group_inline(columns));
            }
            out.push(' ');
            out.push_str(&self.op_text(&cte.as_token));
            out.push(' ');
            out.push_str(&self.group_inline(&cte.query));
        }
        out.push(' ');
        out.push_str(&self.stmt_inline(&s.body));
        out
    }

    fn begin_end_inline(&self, s: &BeginEndBlock) -> String {
        let mut out = self.op_text(&s.begin_token);
        for stmt in &s.statements {
            out.push(' ');
            out.push_str(&self.stmt_inline(stmt));
        }
        out.push(' ');
        out.push_str(&self.op_text(&s.end_token));
        out.push_str(self.semi_text_present(&s.semicolon));
        out
    }

    fn if_inline(&self, s: &IfStatement) -> String {
        let mut out = self.op_text(&s.if_token);
        out.push(' ');
        out.push_str(&self.expr_inline(&s.condition));
        out.push(' ');
        out.push_str(&self.stmt_inline(&s.then_branch));
        if let (Some(else_token), Some(else_branch)) = (&s.else_token, &s.else_branch) {
            out.push(' ');
            out.push_str(&self.op_text(else_token));
            out.push(' ');
            out.push_str(&self.stmt_inline(else_branch));
        }
        out
    }

    fn declare_inline(&self, s: &DeclareStatement) -> String {
        let mut out = self.op_text(&s.declare_token);
        out.push(' ');
        for (i, d) in s.declarations.iter().enumerate() {
            if i > 0 {
                out.push_str(self.comma_sep());
            }
            out.push_str(&self.declaration_inline(d, 0));
        }
        out.push_str(self.semi_text_present(&s.semicolon));
        out
    }

    fn declaration_inline(&self, d: &VariableDeclaration, name_width: usize) -> String {
        let mut out = align::pad_to(&d.name.text, name_width);
        if let Some(as_token) = &d.as_token {
            out.push(' ');
            out.push_str(&self.op_text(as_token));
        }
        let type_text = self.data_type_inline(&d.data_type);
        if !type_text.is_empty() {
            out.push(' ');
            out.push_str(&type_text);
        }
        if let (Some(eq), Some(default)) = (&d.eq_token, &d.default) {
            out.push(' ');
            out.push_str(&eq.text);
            out.push(' ');
            out.push_str(&self.expr_inline(default));
        }
        out
    }

    fn set_inline(&self, s: &SetStatement) -> String {
        let mut out = self.op_text(&s.set_token);
        out.push(' ');
        out.push_str(&self.word_or_text(&s.target));
        if let (Some(op), Some(value)) = (&s.op, &s.value) {
            out.push(' ');
            out.push_str(&op.text);
            out.push(' ');
            out.push_str(&self.expr_inline(value));
        }
        if !s.option_tokens.is_empty() {
            out.push(' ');
            out.push_str(&self.token_run(&s.option_tokens));
        }
        out.push_str(self.semi_text_present(&s.semicolon));
        out
    }

    fn create_table_inline(&self, s: &CreateTableStatement) -> String {
        let mut out = format!(
            "{} {} {} (",
            self.op_text(&s.create_token),
            self.op_text(&s.table_token),
            self.identifier_inline(&s.name)
        );
        for (i, element) in s.elements.iter().enumerate() {
            if i > 0 {
                out.push_str(self.comma_sep());
            }
            out.push_str(&self.table_element_inline(element, 0));
        }
        out.push(')');
        out.push_str(self.semi_text_present(&s.semicolon));
        out
    }

    fn table_element_inline(&self, element: &TableElement, name_width: usize) -> String {
        match element {
            TableElement::Column(col) => {
                let mut out = align::pad_to(&self.name_part(&col.name), name_width);
                let type_text = self.data_type_inline(&col.data_type);
                if !type_text.is_empty() {
                    out.push(' ');
                    out.push_str(&type_text);
                }
                if !col.options.is_empty() {
                    out.push(' ');
                    out.push_str(&self.token_run(&col.options));
                }
                out
            }
            TableElement::Constraint(c) => self.token_run(&c.tokens),
        }
    }

    fn drop_inline(&self, s: &DropTableStatement) -> String {
        let mut out = format!(
            "{} {}",
            self.op_text(&s.drop_token),
            self.op_text(&s.table_token)
        );
        for t in &s.if_exists {
            out.push(' ');
            out.push_str(&self.op_text(t));
        }
        out.push(' ');
        for (i, name) in s.names.iter().enumerate() {
            if i > 0 {
                out.push_str(self.comma_sep());
            }
            out.push_str(&self.identifier_inline(name));
        }
        out.push_str(self.semi_text_present(&s.semicolon));
        out
    }

    // -- expanded statement forms -------------------------------------------

    fn select_expanded(&self, s: &SelectStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.select_token));
        let mut head_comments = NodeComments::default();
        if let Some(trailing) = &s.select_token.trailing_comment {
            head_comments.at_end.push(trailing.as_ref());
        }
        if let Some(distinct) = &s.distinct_token {
            out.push(' ');
            out.push_str(&self.op_text(distinct));
            head_comments.absorb(distinct);
        }
        if let Some(top) = &s.top {
            out.push(' ');
            out.push_str(&self.top_inline(top));
            head_comments.absorb(&top.top_token);
            let nc = comments::shallow_comments(&top.value);
            head_comments.at_end.extend(nc.above);
            head_comments.at_end.extend(nc.at_end);
            if let Some(percent) = &top.percent_token {
                head_comments.absorb(percent);
            }
        }
        self.append_comments(&mut out, &head_comments.at_end);

        out.push('\n');
        out.push_str(&self.select_columns_block(&s.columns, indent + 1));

        if let Some(from) = &s.from {
            out.push('\n');
            out.push_str(&self.from_block(from, indent));
        }
        for join in &s.joins {
            out.push('\n');
            out.push_str(&self.join_block(join, indent));
        }
        if let Some(w) = &s.where_clause {
            out.push('\n');
            out.push_str(&self.condition_clause_block(&w.keyword, &w.condition, indent));
        }
        if let Some(g) = &s.group_by {
            out.push('\n');
            let kw = format!("{} {}", self.op_text(&g.group_token), self.op_text(&g.by_token));
            let items: Vec<(String, NodeComments)> = g
                .exprs
                .iter()
                .map(|e| (self.expr_inline(e), comments::shallow_comments(e)))
                .collect();
            let mut kw_comments: Vec<&Token> = g.group_token.leading_comments.iter().collect();
            kw_comments.extend(g.by_token.leading_comments.iter());
            out.push_str(&self.list_clause_block(&kw, &kw_comments, items, indent));
        }
        if let Some(h) = &s.having {
            out.push('\n');
            out.push_str(&self.condition_clause_block(&h.keyword, &h.condition, indent));
        }
        if let Some(o) = &s.order_by {
            out.push('\n');
            let kw = format!("{} {}", self.op_text(&o.order_token), self.op_text(&o.by_token));
            let items: Vec<(String, NodeComments)> = o
                .items
                .iter()
                .map(|item| {
                    let mut nc = comments::shallow_comments(&item.expr);
                    if let Some(direction) = &item.direction {
                        nc.absorb(direction);
                    }
                    (self.order_item_inline(item), nc)
                })
                .collect();
            let mut kw_comments: Vec<&Token> = o.order_token.leading_comments.iter().collect();
            kw_comments.extend(o.by_token.leading_comments.iter());
            out.push_str(&self.list_clause_block(&kw, &kw_comments, items, indent));
        }
        if let Some(u) = &s.union {
            out.push('\n');
            self.comment_lines(
                &mut out,
                indent,
                &u.op_tokens
                    .iter()
                    .flat_map(|t| t.leading_comments.iter())
                    .collect::<Vec<_>>(),
            );
            out.push_str(&self.indent_str(indent));
            out.push_str(&self.keyword_run(&u.op_tokens));
            for t in &u.op_tokens {
                if let Some(trailing) = &t.trailing_comment {
                    out.push(' ');
                    out.push_str(&trailing.text);
                }
            }
            out.push('\n');
            out.push_str(&self.select_render(&u.query, indent));
        }
        self.finish(&mut out, &s.semicolon);
        out
    }

    /// Render a plain SELECT (used for UNION tails) with its own collapse
    /// decision.
    fn select_render(&self, s: &SelectStatement, indent: usize) -> String {
        let mut tokens = Vec::new();
        s.for_each_token(&mut |t| tokens.push(t));
        if self.cfg.dml.collapse_short_statements && !comments::blocks_collapse_tokens(&tokens) {
            let inline = self.select_inline(s);
            if self.indent_cols(indent) + inline.chars().count() <= self.cfg.dml.collapse_threshold
            {
                let mut line = self.indent_str(indent);
                line.push_str(&inline);
                if let Some(last) = tokens.last() {
                    if let Some(trailing) = &last.trailing_comment {
                        line.push(' ');
                        line.push_str(&trailing.text);
                    }
                }
                return line;
            }
        }
        self.select_expanded(s, indent)
    }

    /// The SELECT column list, one item per line with the configured comma
    /// placement and optional alias alignment.
    fn select_columns_block(&self, columns: &[SelectColumn], indent: usize) -> String {
        let rendered: Vec<String> = columns
            .iter()
            .map(|col| self.expr_fit(&col.expr, indent))
            .collect();

        let alias_width = if self.cfg.lists.align_aliases {
            columns
                .iter()
                .zip(&rendered)
                .filter(|(col, _)| col.alias.is_some())
                .map(|(_, r)| align::trailing_line_width(r, self.indent_cols(indent)))
                .max()
                .unwrap_or(0)
        } else {
            0
        };

        let mut out = String::new();
        let last = columns.len().saturating_sub(1);
        for (i, (col, item)) in columns.iter().zip(rendered).enumerate() {
            let mut nc = comments::shallow_comments(&col.expr);
            if let Some(as_token) = &col.as_token {
                nc.absorb(as_token);
            }
            if let Some(alias) = &col.alias {
                nc.absorb(alias);
            }
            if !out.is_empty() {
                out.push('\n');
            }
            self.comment_lines(&mut out, indent, &nc.above);
            out.push_str(&self.indent_str(indent));

            let mut line = String::new();
            if self.cfg.lists.commas.place_commas_before_items && i > 0 {
                line.push(',');
                if self.cfg.lists.commas.space_after_comma {
                    line.push(' ');
                }
            }
            let mut body = item;
            if alias_width > 0 && col.alias.is_some() {
                body = align::pad_trailing_line(&body, alias_width, self.indent_cols(indent));
            }
            line.push_str(&body);
            line.push_str(&self.alias_suffix(&col.as_token, &col.alias));
            if !self.cfg.lists.commas.place_commas_before_items && i < last {
                line.push(',');
            }
            self.append_comments(&mut line, &nc.at_end);
            out.push_str(&line);
        }
        out
    }

    fn from_block(&self, from: &FromClause, indent: usize) -> String {
        let mut out = String::new();
        self.comment_lines(
            &mut out,
            indent,
            &from.from_token.leading_comments.iter().collect::<Vec<_>>(),
        );
        let kw = self.op_text(&from.from_token);
        let mut trailing: Vec<&Token> = Vec::new();
        if let Some(t) = &from.from_token.trailing_comment {
            trailing.push(t.as_ref());
        }

        if from.tables.len() == 1 {
            let nc = comments::shallow_comments(&from.tables[0]);
            self.comment_lines(&mut out, indent, &nc.above);
            let mut line = self.indent_str(indent);
            line.push_str(&self.table_source_text(kw, &from.tables[0], indent));
            self.append_comments(&mut line, &trailing);
            self.append_comments(&mut line, &nc.at_end);
            out.push_str(&line);
            return out;
        }

        // Multiple comma-joined sources: inline when short, else one per line
        let inline: Vec<String> = from.tables.iter().map(|t| self.expr_inline(t)).collect();
        let one_line = format!("{kw} {}", inline.join(self.comma_sep()));
        if self.fits(indent, &one_line)
            && !from.tables.iter().any(comments::expr_has_comments)
        {
            out.push_str(&self.indent_str(indent));
            out.push_str(&one_line);
            self.append_comments(&mut out, &trailing);
            return out;
        }
        out.push_str(&self.indent_str(indent));
        out.push_str(&kw);
        self.append_comments(&mut out, &trailing);
        let last = from.tables.len() - 1;
        for (i, table) in from.tables.iter().enumerate() {
            let nc = comments::shallow_comments(table);
            out.push('\n');
            self.comment_lines(&mut out, indent + 1, &nc.above);
            out.push_str(&self.indent_str(indent + 1));
            let mut line = String::new();
            if self.cfg.lists.commas.place_commas_before_items && i > 0 {
                line.push(',');
                if self.cfg.lists.commas.space_after_comma {
                    line.push(' ');
                }
            }
            line.push_str(&self.expr_fit(table, indent + 1));
            if !self.cfg.lists.commas.place_commas_before_items && i < last {
                line.push(',');
            }
            self.append_comments(&mut line, &nc.at_end);
            out.push_str(&line);
        }
        out
    }

    /// A table source with its clause prefix (`FROM`, join keywords):
    /// derived tables attach per the parenthesis style, named tables and
    /// table functions stay inline when they fit.
    fn table_source_text(&self, prefix: String, table: &Expr, indent: usize) -> String {
        match &table.kind {
            ExprKind::Group(group) => self.group_attached(prefix, group, indent),
            ExprKind::Aliased {
                expr,
                as_token,
                alias,
            } => {
                if let ExprKind::Group(group) = &expr.kind {
                    let mut out = self.group_attached(prefix, group, indent);
                    out.push_str(&self.alias_suffix(as_token, &Some(alias.clone())));
                    out
                } else {
                    format!("{prefix} {}", self.expr_fit(table, indent))
                }
            }
            ExprKind::Identifier(id) if id.pivot.is_some() => {
                let inline = format!("{prefix} {}", self.identifier_inline(id));
                if self.fits(indent, &inline) {
                    inline
                } else {
                    let pivot = id.pivot.as_deref().unwrap();
                    let mut bare = id.clone();
                    bare.pivot = None;
                    format!(
                        "{prefix} {}\n{}{}",
                        self.identifier_inline(&bare),
                        self.indent_str(indent),
                        self.pivot_wrapped(pivot, indent)
                    )
                }
            }
            _ => format!("{prefix} {}", self.expr_fit(table, indent)),
        }
    }

    /// PIVOT with a greedily packed IN list when the inline form is long.
    fn pivot_wrapped(&self, pivot: &PivotClause, indent: usize) -> String {
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
        if let ParenBody::Exprs(exprs) = &pivot.in_list.body {
            let open_col = self.indent_cols(indent) + last_line_len(&out) + 1;
            out.push_str(&self.value_list(exprs, open_col));
        } else {
            out.push_str(&self.group_inline(&pivot.in_list));
        }
        out.push(')');
        out.push_str(&self.alias_suffix(&pivot.as_token, &pivot.alias));
        out
    }

    fn join_block(&self, join: &JoinClause, indent: usize) -> String {
        let join_indent = if self.cfg.joins.indent_joins {
            indent + 1
        } else {
            indent
        };
        let mut out = String::new();
        let kw_leading: Vec<&Token> = join
            .keywords
            .iter()
            .flat_map(|t| t.leading_comments.iter())
            .collect();
        self.comment_lines(&mut out, join_indent, &kw_leading);
        out.push_str(&self.indent_str(join_indent));

        let prefix = self.join_keywords(join);
        let mut line = self.table_source_text(prefix, &join.table, join_indent);
        let table_nc = comments::shallow_comments(&join.table);
        let mut eol: Vec<&Token> = Vec::new();
        for t in &join.keywords {
            if let Some(trailing) = &t.trailing_comment {
                eol.push(trailing.as_ref());
            }
        }
        eol.extend(table_nc.above);
        eol.extend(table_nc.at_end);

        if let (Some(on), Some(cond)) = (&join.on_token, &join.condition) {
            if self.cfg.joins.on_condition_on_new_line {
                self.append_comments(&mut line, &eol);
                out.push_str(&line);
                out.push('\n');
                out.push_str(&self.condition_clause_block(on, cond, join_indent + 1));
                return out;
            }
            line.push(' ');
            line.push_str(&self.condition_text(on, cond, join_indent));
            eol.extend(on.leading_comments.iter());
            if let Some(trailing) = &on.trailing_comment {
                eol.push(trailing.as_ref());
            }
            for c in eol {
                append_to_first_line(&mut line, &c.text);
            }
            out.push_str(&line);
            return out;
        }
        self.append_comments(&mut line, &eol);
        out.push_str(&line);
        out
    }

    /// `KW condition` with chain layout, first line unprefixed.
    fn condition_text(&self, kw: &Token, cond: &Expr, indent: usize) -> String {
        let mut out = self.op_text(kw);
        let anchor = out.chars().count();
        out.push(' ');
        if self.cfg.operators.and_or.place_on_new_line && self.is_bool_chain(cond) {
            out.push_str(&self.bool_chain(cond, indent, Some(anchor), true));
        } else {
            out.push_str(&self.expr_fit(cond, indent));
            let nc = comments::shallow_comments(cond);
            self.append_comments(&mut out, &nc.above);
            self.append_comments(&mut out, &nc.at_end);
        }
        out
    }

    /// A keyword-introduced condition clause (WHERE / HAVING / ON) as a
    /// prefixed block.
    fn condition_clause_block(&self, kw: &Token, cond: &Expr, indent: usize) -> String {
        let mut out = String::new();
        self.comment_lines(
            &mut out,
            indent,
            &kw.leading_comments.iter().collect::<Vec<_>>(),
        );
        out.push_str(&self.indent_str(indent));
        let mut body = self.condition_text(kw, cond, indent);
        if let Some(trailing) = &kw.trailing_comment {
            append_to_first_line(&mut body, &trailing.text);
        }
        out.push_str(&body);
        out
    }

    /// `KW item, item` on one line when short, else one item per line.
    fn list_clause_block(
        &self,
        kw: &str,
        kw_leading: &[&Token],
        items: Vec<(String, NodeComments)>,
        indent: usize,
    ) -> String {
        let mut out = String::new();
        self.comment_lines(&mut out, indent, kw_leading);
        let inline = format!(
            "{kw} {}",
            items
                .iter()
                .map(|(s, _)| s.as_str())
                .collect::<Vec<_>>()
                .join(self.comma_sep())
        );
        let any_above = items.iter().any(|(_, nc)| !nc.above.is_empty());
        if self.fits(indent, &inline) && !any_above {
            out.push_str(&self.indent_str(indent));
            out.push_str(&inline);
            for (_, nc) in &items {
                self.append_comments(&mut out, &nc.at_end);
            }
            return out;
        }
        out.push_str(&self.indent_str(indent));
        out.push_str(kw);
        let last = items.len().saturating_sub(1);
        for (i, (item, nc)) in items.iter().enumerate() {
            out.push('\n');
            self.comment_lines(&mut out, indent + 1, &nc.above);
            out.push_str(&self.indent_str(indent + 1));
            let mut line = String::new();
            if self.cfg.lists.commas.place_commas_before_items && i > 0 {
                line.push(',');
                if self.cfg.lists.commas.space_after_comma {
                    line.push(' ');
                }
            }
            line.push_str(item);
            if !self.cfg.lists.commas.place_commas_before_items && i < last {
                line.push(',');
            }
            self.append_comments(&mut line, &nc.at_end);
            out.push_str(&line);
        }
        out
    }

    fn insert_expanded(&self, s: &InsertStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.insert_token));
        if let Some(into) = &s.into_token {
            out.push(' ');
            out.push_str(&self.op_text(into));
        }
        out.push(' ');
        out.push_str(&self.identifier_inline(&s.target));
        let mut head = NodeComments::default();
        if let Some(trailing) = &s.insert_token.trailing_comment {
            head.at_end.push(trailing.as_ref());
        }
        if let Some(into) = &s.into_token {
            head.absorb(into);
        }
        for t in &s.target.parts {
            head.absorb(t);
        }
        if let Some(columns) = &s.columns {
            let inline = self.group_inline(columns);
            if last_line_len(&out) + 1 + inline.chars().count()
                <= self.cfg.whitespace.max_line_width
            {
                out.push(' ');
                out.push_str(&inline);
            } else if let ParenBody::Exprs(exprs) = &columns.body {
                out.push(' ');
                let open_col = last_line_len(&out) + 1;
                out.push_str(&self.value_list(exprs, open_col));
            } else {
                out.push(' ');
                out.push_str(&inline);
            }
            columns.for_each_token(&mut |t| head.absorb(t));
        }
        self.append_comments(&mut out, &head.at_end);

        match &s.source {
            InsertSource::Values { values_token, rows } => {
                out.push('\n');
                self.comment_lines(
                    &mut out,
                    indent,
                    &values_token.leading_comments.iter().collect::<Vec<_>>(),
                );
                out.push_str(&self.indent_str(indent));
                out.push_str(&self.op_text(values_token));
                if let Some(trailing) = &values_token.trailing_comment {
                    out.push(' ');
                    out.push_str(&trailing.text);
                }
                let rows_inline: Vec<String> =
                    rows.iter().map(|row| self.group_inline(row)).collect();
                let one_line = rows_inline.join(self.comma_sep());
                let any_comments = rows.iter().any(|row| {
                    let mut found = false;
                    row.for_each_token(&mut |t| {
                        if !t.leading_comments.is_empty() || t.trailing_comment.is_some() {
                            found = true;
                        }
                    });
                    found
                });
                if !self.cfg.inserts.row_per_line
                    && self.fits(indent + 1, &one_line)
                    && !any_comments
                {
                    out.push(' ');
                    out.push_str(&one_line);
                } else {
                    let last = rows.len().saturating_sub(1);
                    for (i, (row, inline)) in rows.iter().zip(rows_inline).enumerate() {
                        let mut row_comments = NodeComments::default();
                        row.for_each_token(&mut |t| row_comments.absorb(t));
                        out.push('\n');
                        out.push_str(&self.indent_str(indent + 1));
                        let mut line = String::new();
                        if self.cfg.lists.commas.place_commas_before_items && i > 0 {
                            line.push(',');
                            if self.cfg.lists.commas.space_after_comma {
                                line.push(' ');
                            }
                        }
                        if self.fits(indent + 1, &inline) {
                            line.push_str(&inline);
                        } else if let ParenBody::Exprs(exprs) = &row.body {
                            let open_col = self.indent_cols(indent + 1) + line.chars().count() + 1;
                            line.push_str(&self.value_list(exprs, open_col));
                        } else {
                            line.push_str(&inline);
                        }
                        if !self.cfg.lists.commas.place_commas_before_items && i < last {
                            line.push(',');
                        }
                        self.append_comments(&mut line, &row_comments.at_end);
                        out.push_str(&line);
                    }
                }
            }
            InsertSource::Query(stmt) => {
                out.push('\n');
                out.push_str(&self.statement_block(stmt, indent));
            }
            InsertSource::Raw(tokens) => {
                out.push('\n');
                out.push_str(&self.indent_str(indent));
                out.push_str(&self.token_run_wrapped(tokens, indent));
                let refs: Vec<&Token> = tokens.iter().collect();
                let nc = comments::split_tokens(&refs);
                self.append_comments(&mut out, &nc.above);
                self.append_comments(&mut out, &nc.at_end);
            }
        }
        self.finish(&mut out, &s.semicolon);
        out
    }

    fn update_expanded(&self, s: &UpdateStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.update_token));
        if let Some(top) = &s.top {
            out.push(' ');
            out.push_str(&self.top_inline(top));
        }
        out.push(' ');
        out.push_str(&self.identifier_inline(&s.target));
        let mut head = NodeComments::default();
        if let Some(trailing) = &s.update_token.trailing_comment {
            head.at_end.push(trailing.as_ref());
        }
        for t in &s.target.parts {
            head.absorb(t);
        }
        self.append_comments(&mut out, &head.at_end);

        out.push('\n');
        self.comment_lines(
            &mut out,
            indent,
            &s.set_token.leading_comments.iter().collect::<Vec<_>>(),
        );
        out.push_str(&self.indent_str(indent));
        out.push_str(&self.op_text(&s.set_token));
        if let Some(trailing) = &s.set_token.trailing_comment {
            out.push(' ');
            out.push_str(&trailing.text);
        }
        if s.assignments.len() == 1 {
            let a = &s.assignments[0];
            out.push(' ');
            out.push_str(&self.assignment_fit(a, indent));
            let nc = self.assignment_comments(a);
            self.append_comments(&mut out, &nc.above);
            self.append_comments(&mut out, &nc.at_end);
        } else {
            let last = s.assignments.len() - 1;
            for (i, a) in s.assignments.iter().enumerate() {
                let nc = self.assignment_comments(a);
                out.push('\n');
                self.comment_lines(&mut out, indent + 1, &nc.above);
                out.push_str(&self.indent_str(indent + 1));
                let mut line = String::new();
                if self.cfg.lists.commas.place_commas_before_items && i > 0 {
                    line.push(',');
                    if self.cfg.lists.commas.space_after_comma {
                        line.push(' ');
                    }
                }
                line.push_str(&self.assignment_fit(a, indent + 1));
                if !self.cfg.lists.commas.place_commas_before_items && i < last {
                    line.push(',');
                }
                self.append_comments(&mut line, &nc.at_end);
                out.push_str(&line);
            }
        }

        if let Some(from) = &s.from {
            out.push('\n');
            out.push_str(&self.from_block(from, indent));
        }
        for join in &s.joins {
            out.push('\n');
            out.push_str(&self.join_block(join, indent));
        }
        if let Some(w) = &s.where_clause {
            out.push('\n');
            out.push_str(&self.condition_clause_block(&w.keyword, &w.condition, indent));
        }
        self.finish(&mut out, &s.semicolon);
        out
    }

    fn assignment_fit(&self, a: &Assignment, indent: usize) -> String {
        format!(
            "{} {} {}",
            self.expr_inline(&a.target),
            a.op.text,
            self.expr_fit(&a.value, indent)
        )
    }

    fn assignment_comments<'b>(&self, a: &'b Assignment) -> NodeComments<'b> {
        let mut nc = comments::shallow_comments(&a.target);
        nc.absorb(&a.op);
        let value = comments::shallow_comments(&a.value);
        nc.at_end.extend(value.above);
        nc.at_end.extend(value.at_end);
        nc
    }

    fn delete_expanded(&self, s: &DeleteStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.delete_token));
        if let Some(top) = &s.top {
            out.push(' ');
            out.push_str(&self.top_inline(top));
        }
        if let Some(from) = &s.from_token {
            out.push(' ');
            out.push_str(&self.op_text(from));
        }
        out.push(' ');
        out.push_str(&self.identifier_inline(&s.target));
        let mut head = NodeComments::default();
        if let Some(trailing) = &s.delete_token.trailing_comment {
            head.at_end.push(trailing.as_ref());
        }
        if let Some(from) = &s.from_token {
            head.absorb(from);
        }
        for t in &s.target.parts {
            head.absorb(t);
        }
        self.append_comments(&mut out, &head.at_end);

        if let Some(from) = &s.from {
            out.push('\n');
            out.push_str(&self.from_block(from, indent));
        }
        for join in &s.joins {
            out.push('\n');
            out.push_str(&self.join_block(join, indent));
        }
        if let Some(w) = &s.where_clause {
            out.push('\n');
            out.push_str(&self.condition_clause_block(&w.keyword, &w.condition, indent));
        }
        self.finish(&mut out, &s.semicolon);
        out
    }

    fn cte_expanded(&self, s: &CteStatement, indent: usize) -> String {
        let mut out = String::new();
        let last = s.ctes.len().saturating_sub(1);
        for (i, cte) in s.ctes.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.comment_lines(
                &mut out,
                indent,
                &cte.name.leading_comments.iter().collect::<Vec<_>>(),
            );
            out.push_str(&self.indent_str(indent));
            let mut prefix = String::new();
            if i == 0 {
                prefix.push_str(&self.op_text(&s.with_token));
                prefix.push(' ');
            } else if self.cfg.lists.commas.place_commas_before_items {
                prefix.push(',');
                if self.cfg.lists.commas.space_after_comma {
                    prefix.push(' ');
                }
            }
            prefix.push_str(&self.name_part(&cte.name));
            if let Some(columns) = &cte.columns {
                prefix.push(' ');
                prefix.push_str(&self.group_inline(columns));
            }
            prefix.push(' ');
            prefix.push_str(&self.op_text(&cte.as_token));
            let mut block = self.group_attached(prefix, &cte.query, indent);
            if !self.cfg.lists.commas.place_commas_before_items && i < last {
                block.push(',');
            }
            let mut glom = NodeComments::default();
            if i == 0 {
                if let Some(trailing) = &s.with_token.trailing_comment {
                    glom.at_end.push(trailing.as_ref());
                }
            }
            if let Some(trailing) = &cte.name.trailing_comment {
                glom.at_end.push(trailing.as_ref());
            }
            if let Some(columns) = &cte.columns {
                columns.for_each_token(&mut |t| glom.absorb(t));
            }
            glom.absorb(&cte.as_token);
            for c in glom.at_end.iter().chain(glom.above.iter()) {
                append_to_first_line(&mut block, &c.text);
            }
            out.push_str(&block);
        }
        out.push('\n');
        out.push_str(&self.statement_block(&s.body, indent));
        out
    }

    fn begin_end_expanded(&self, s: &BeginEndBlock, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.begin_token));
        if let Some(trailing) = &s.begin_token.trailing_comment {
            out.push(' ');
            out.push_str(&trailing.text);
        }
        let mut body = String::new();
        self.statement_sequence(&s.statements, indent + 1, &mut body);
        if !body.is_empty() {
            out.push('\n');
            out.push_str(&body);
        }
        out.push('\n');
        self.comment_lines(
            &mut out,
            indent,
            &s.end_token.leading_comments.iter().collect::<Vec<_>>(),
        );
        out.push_str(&self.indent_str(indent));
        out.push_str(&self.op_text(&s.end_token));
        self.finish(&mut out, &s.semicolon);
        if let Some(trailing) = &s.end_token.trailing_comment {
            out.push(' ');
            out.push_str(&trailing.text);
        }
        out
    }

    fn if_expanded(&self, s: &IfStatement, indent: usize) -> String {
        let mut out = String::new();
        out.push_str(&self.condition_clause_block(&s.if_token, &s.condition, indent));
        out.push('\n');
        out.push_str(&self.branch_block(&s.then_branch, indent));
        if let (Some(else_token), Some(else_branch)) = (&s.else_token, &s.else_branch) {
            out.push('\n');
            self.comment_lines(
                &mut out,
                indent,
                &else_token.leading_comments.iter().collect::<Vec<_>>(),
            );
            out.push_str(&self.indent_str(indent));
            out.push_str(&self.op_text(else_token));
            if let Some(trailing) = &else_token.trailing_comment {
                out.push(' ');
                out.push_str(&trailing.text);
            }
            out.push('\n');
            out.push_str(&self.branch_block(else_branch, indent));
        }
        out
    }

    /// IF/ELSE branch: blocks and nested IFs stay at the statement indent,
    /// single statements indent one level.
    fn branch_block(&self, branch: &Statement, indent: usize) -> String {
        match branch {
            Statement::BeginEnd(_) | Statement::IfElse(_) => self.statement_block(branch, indent),
            _ => self.statement_block(branch, indent + 1),
        }
    }

    fn declare_render(&self, s: &DeclareStatement, indent: usize) -> String {
        let inline = self.declare_inline(s);
        let probe = Statement::Declare(s.clone());
        if self.fits(indent, &inline) && !comments::blocks_collapse(&probe) {
            let mut out = self.indent_str(indent);
            out.push_str(&inline);
            out.push_str(self.forced_semi_slot(&s.semicolon));
            let tokens = probe.tokens();
            if let Some(last) = tokens.last() {
                if let Some(trailing) = &last.trailing_comment {
                    out.push(' ');
                    out.push_str(&trailing.text);
                }
            }
            return out;
        }

        let name_width = if self.cfg.lists.align_data_types {
            s.declarations
                .iter()
                .map(|d| d.name.text.chars().count())
                .max()
                .unwrap_or(0)
        } else {
            0
        };
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.declare_token));
        if let Some(trailing) = &s.declare_token.trailing_comment {
            out.push(' ');
            out.push_str(&trailing.text);
        }
        let last = s.declarations.len().saturating_sub(1);
        for (i, d) in s.declarations.iter().enumerate() {
            let mut nc = NodeComments::default();
            if i > 0 {
                nc.above.extend(d.name.leading_comments.iter());
            }
            if let Some(trailing) = &d.name.trailing_comment {
                nc.at_end.push(trailing.as_ref());
            }
            if let Some(as_token) = &d.as_token {
                nc.absorb(as_token);
            }
            let dt = comments::shallow_comments(&d.data_type);
            nc.at_end.extend(dt.above);
            nc.at_end.extend(dt.at_end);
            if let Some(eq) = &d.eq_token {
                nc.absorb(eq);
            }
            if let Some(default) = &d.default {
                let dc = comments::shallow_comments(default);
                nc.at_end.extend(dc.above);
                nc.at_end.extend(dc.at_end);
            }
            out.push('\n');
            self.comment_lines(&mut out, indent + 1, &nc.above);
            out.push_str(&self.indent_str(indent + 1));
            let mut line = String::new();
            if self.cfg.lists.commas.place_commas_before_items && i > 0 {
                line.push(',');
                if self.cfg.lists.commas.space_after_comma {
                    line.push(' ');
                }
            }
            line.push_str(&self.declaration_inline(d, name_width));
            if !self.cfg.lists.commas.place_commas_before_items && i < last {
                line.push(',');
            }
            self.append_comments(&mut line, &nc.at_end);
            out.push_str(&line);
        }
        self.finish(&mut out, &s.semicolon);
        out
    }

    fn forced_semi_slot(&self, semicolon: &Option<Token>) -> &'static str {
        if self.cfg.statements.insert_semicolons && semicolon.is_none() {
            ";"
        } else {
            ""
        }
    }

    fn set_render(&self, s: &SetStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.set_token));
        out.push(' ');
        out.push_str(&self.word_or_text(&s.target));
        let mut nc = NodeComments::default();
        if let Some(trailing) = &s.set_token.trailing_comment {
            nc.at_end.push(trailing.as_ref());
        }
        nc.absorb(&s.target);
        if let (Some(op), Some(value)) = (&s.op, &s.value) {
            out.push(' ');
            out.push_str(&op.text);
            out.push(' ');
            out.push_str(&self.expr_fit(value, indent));
            nc.absorb(op);
            let vc = comments::shallow_comments(value);
            nc.at_end.extend(vc.above);
            nc.at_end.extend(vc.at_end);
        }
        if !s.option_tokens.is_empty() {
            out.push(' ');
            out.push_str(&self.token_run(&s.option_tokens));
            for t in &s.option_tokens {
                nc.absorb(t);
            }
        }
        out.push_str(self.semi_text(&s.semicolon));
        if let Some(semi) = &s.semicolon {
            nc.absorb(semi);
        }
        self.append_comments(&mut out, &nc.above);
        self.append_comments(&mut out, &nc.at_end);
        out
    }

    fn print_render(&self, s: &PrintStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.print_token));
        out.push(' ');
        out.push_str(&self.expr_fit(&s.value, indent));
        out.push_str(self.semi_text(&s.semicolon));
        let mut nc = NodeComments::default();
        if let Some(trailing) = &s.print_token.trailing_comment {
            nc.at_end.push(trailing.as_ref());
        }
        let vc = comments::shallow_comments(&s.value);
        nc.at_end.extend(vc.above);
        nc.at_end.extend(vc.at_end);
        if let Some(semi) = &s.semicolon {
            nc.absorb(semi);
        }
        self.append_comments(&mut out, &nc.at_end);
        out
    }

    fn return_render(&self, s: &ReturnStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.return_token));
        let mut nc = NodeComments::default();
        if let Some(trailing) = &s.return_token.trailing_comment {
            nc.at_end.push(trailing.as_ref());
        }
        if let Some(value) = &s.value {
            out.push(' ');
            out.push_str(&self.expr_fit(value, indent));
            let vc = comments::shallow_comments(value);
            nc.at_end.extend(vc.above);
            nc.at_end.extend(vc.at_end);
        }
        out.push_str(self.semi_text(&s.semicolon));
        if let Some(semi) = &s.semicolon {
            nc.absorb(semi);
        }
        self.append_comments(&mut out, &nc.at_end);
        out
    }

    fn create_table_expanded(&self, s: &CreateTableStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.create_token));
        out.push(' ');
        out.push_str(&self.op_text(&s.table_token));
        out.push(' ');
        out.push_str(&self.identifier_inline(&s.name));
        let mut head = NodeComments::default();
        if let Some(trailing) = &s.create_token.trailing_comment {
            head.at_end.push(trailing.as_ref());
        }
        head.absorb(&s.table_token);
        for t in &s.name.parts {
            head.absorb(t);
        }
        head.absorb(&s.lparen);
        self.append_comments(&mut out, &head.at_end);

        if self.parens_expanded() {
            out.push('\n');
            out.push_str(&self.indent_str(indent));
            out.push('(');
        } else {
            out.push_str(" (");
        }

        let name_width = if self.cfg.lists.align_data_types {
            s.elements
                .iter()
                .filter_map(|e| match e {
                    TableElement::Column(col) => {
                        Some(self.name_part(&col.name).chars().count())
                    }
                    TableElement::Constraint(_) => None,
                })
                .max()
                .unwrap_or(0)
        } else {
            0
        };

        let last = s.elements.len().saturating_sub(1);
        for (i, element) in s.elements.iter().enumerate() {
            let tokens = table_element_tokens(element);
            let nc = comments::split_tokens(&tokens);
            out.push('\n');
            self.comment_lines(&mut out, indent + 1, &nc.above);
            out.push_str(&self.indent_str(indent + 1));
            let mut line = String::new();
            if self.cfg.lists.commas.place_commas_before_items && i > 0 {
                line.push(',');
                if self.cfg.lists.commas.space_after_comma {
                    line.push(' ');
                }
            }
            line.push_str(&self.table_element_inline(element, name_width));
            if !self.cfg.lists.commas.place_commas_before_items && i < last {
                line.push(',');
            }
            self.append_comments(&mut line, &nc.at_end);
            out.push_str(&line);
        }

        out.push('\n');
        self.comment_lines(
            &mut out,
            indent + 1,
            &s.rparen.leading_comments.iter().collect::<Vec<_>>(),
        );
        out.push_str(&self.indent_str(self.paren_close_indent(indent)));
        out.push(')');
        if let Some(trailing) = &s.rparen.trailing_comment {
            out.push(' ');
            out.push_str(&trailing.text);
        }
        self.finish(&mut out, &s.semicolon);
        out
    }

    fn alter_render(&self, s: &AlterTableStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.op_text(&s.alter_token));
        out.push(' ');
        out.push_str(&self.op_text(&s.table_token));
        out.push(' ');
        out.push_str(&self.identifier_inline(&s.name));
        if !s.action.is_empty() {
            out.push(' ');
            out.push_str(&self.token_run_wrapped(&s.action, indent));
        }
        let mut nc = NodeComments::default();
        if let Some(trailing) = &s.alter_token.trailing_comment {
            nc.at_end.push(trailing.as_ref());
        }
        nc.absorb(&s.table_token);
        for t in &s.name.parts {
            nc.absorb(t);
        }
        for t in &s.action {
            nc.absorb(t);
        }
        out.push_str(self.semi_text(&s.semicolon));
        if let Some(semi) = &s.semicolon {
            nc.absorb(semi);
        }
        self.append_comments(&mut out, &nc.at_end);
        out
    }

    fn drop_render(&self, s: &DropTableStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.drop_inline(s));
        out.push_str(self.forced_semi_slot(&s.semicolon));
        let stmt = Statement::DropTable(s.clone());
        let tokens = stmt.tokens();
        let nc = comments::split_tokens(&tokens);
        self.append_comments(&mut out, &nc.at_end);
        out
    }

    fn expr_statement_render(&self, s: &ExprStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.expr_fit(&s.expr, indent));
        out.push_str(self.semi_text(&s.semicolon));
        let nc = comments::shallow_comments(&s.expr);
        let mut at_end: Vec<&Token> = nc.at_end;
        if let Some(semi) = &s.semicolon {
            at_end.extend(semi.leading_comments.iter());
            if let Some(trailing) = &semi.trailing_comment {
                at_end.push(trailing.as_ref());
            }
        }
        self.append_comments(&mut out, &at_end);
        out
    }

    fn raw_render(&self, s: &RawStatement, indent: usize) -> String {
        let mut out = self.indent_str(indent);
        out.push_str(&self.token_run_wrapped(&s.tokens, indent));
        out.push_str(self.semi_text(&s.semicolon));
        let refs: Vec<&Token> = s.tokens.iter().collect();
        let mut nc = comments::split_tokens(&refs);
        if let Some(semi) = &s.semicolon {
            nc.absorb(semi);
        }
        self.append_comments(&mut out, &nc.at_end);
        out
    }
}

/// The semicolon slot of a statement, `None` when the kind has no slot.
fn statement_semicolon(stmt: &Statement) -> Option<&Option<Token>> {
    match stmt {
        Statement::Select(s) => Some(&s.semicolon),
        Statement::Insert(s) => Some(&s.semicolon),
        Statement::Update(s) => Some(&s.semicolon),
        Statement::Delete(s) => Some(&s.semicolon),
        Statement::Cte(s) => statement_semicolon(&s.body),
        Statement::BeginEnd(s) => Some(&s.semicolon),
        Statement::Declare(s) => Some(&s.semicolon),
        Statement::SetVariable(s) => Some(&s.semicolon),
        Statement::Print(s) => Some(&s.semicolon),
        Statement::Return(s) => Some(&s.semicolon),
        Statement::CreateTable(s) => Some(&s.semicolon),
        Statement::AlterTable(s) => Some(&s.semicolon),
        Statement::DropTable(s) => Some(&s.semicolon),
        Statement::Expr(s) => Some(&s.semicolon),
        Statement::Raw(s) => Some(&s.semicolon),
        Statement::IfElse(_) => None,
    }
}

fn table_element_tokens(element: &TableElement) -> Vec<&Token> {
    let mut tokens = Vec::new();
    match element {
        TableElement::Column(col) => {
            tokens.push(&col.name);
            col.data_type.for_each_token(&mut |t| tokens.push(t));
            tokens.extend(col.options.iter());
        }
        TableElement::Constraint(c) => tokens.extend(c.tokens.iter()),
    }
    tokens
}

fn append_to_first_line(text: &mut String, comment: &str) {
    match text.find('\n') {
        Some(pos) => {
            text.insert_str(pos, &format!(" {comment}"));
        }
        None => {
            text.push(' ');
            text.push_str(comment);
        }
    }
}

fn last_line_len(s: &str) -> usize {
    match s.rsplit_once('\n') {
        Some((_, last)) => last.chars().count(),
        None => s.chars().count(),
    }
}
