//! Read-only AST lint walker
//!
//! Walks the same AST the formatter consumes and produces warnings for
//! missing schema prefixes, missing table aliases, and unqualified EXEC
//! procedure names. CTE names in scope are tracked (upper-cased) so
//! references to them are not flagged as schema-less tables.

use std::collections::HashSet;

use crate::ast::*;
use crate::parser::lexer::{Token, TokenKind};

/// Switches for the individual checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    pub warn_missing_schema: bool,
    pub warn_missing_alias: bool,
}

/// A single analyzer warning with an optional source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
    pub line: Option<usize>,
    pub col: Option<usize>,
}

impl Warning {
    fn at(message: String, token: Option<&Token>) -> Self {
        Self {
            message,
            line: token.map(|t| t.line),
            col: token.map(|t| t.col),
        }
    }
}

/// Analyze a script and collect warnings.
pub fn analyze(script: &SqlScript, options: &AnalyzeOptions) -> Vec<Warning> {
    let mut analyzer = Analyzer {
        options: *options,
        cte_names: HashSet::new(),
        warnings: Vec::new(),
    };
    for batch in &script.batches {
        for stmt in &batch.statements {
            analyzer.walk_statement(stmt);
        }
    }
    analyzer.warnings
}

struct Analyzer {
    options: AnalyzeOptions,
    cte_names: HashSet<String>,
    warnings: Vec<Warning>,
}

impl Analyzer {
    fn walk_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Select(s) => self.walk_select(s),
            Statement::Insert(s) => {
                // DML targets are exempt from both checks
                if let Some(columns) = &s.columns {
                    self.walk_group(columns);
                }
                match &s.source {
                    InsertSource::Values { rows, .. } => {
                        for row in rows {
                            self.walk_group(row);
                        }
                    }
                    InsertSource::Query(query) => self.walk_statement(query),
                    InsertSource::Raw(tokens) => self.check_exec_run(tokens),
                }
            }
            Statement::Update(s) => {
                for a in &s.assignments {
                    self.walk_expr(&a.target);
                    self.walk_expr(&a.value);
                }
                if let Some(from) = &s.from {
                    self.walk_from(from);
                }
                for join in &s.joins {
                    self.walk_join(join);
                }
                if let Some(w) = &s.where_clause {
                    self.walk_expr(&w.condition);
                }
            }
            Statement::Delete(s) => {
                if let Some(from) = &s.from {
                    self.walk_from(from);
                }
                for join in &s.joins {
                    self.walk_join(join);
                }
                if let Some(w) = &s.where_clause {
                    self.walk_expr(&w.condition);
                }
            }
            Statement::Cte(s) => {
                // Register CTE names before walking anything that can
                // reference them (including recursive definitions)
                for cte in &s.ctes {
                    self.cte_names.insert(cte.name.text.to_uppercase());
                }
                for cte in &s.ctes {
                    self.walk_group(&cte.query);
                }
                self.walk_statement(&s.body);
            }
            Statement::BeginEnd(s) => {
                for inner in &s.statements {
                    self.walk_statement(inner);
                }
            }
            Statement::IfElse(s) => {
                self.walk_expr(&s.condition);
                self.walk_statement(&s.then_branch);
                if let Some(else_branch) = &s.else_branch {
                    self.walk_statement(else_branch);
                }
            }
            Statement::Declare(s) => {
                for d in &s.declarations {
                    if let Some(default) = &d.default {
                        self.walk_expr(default);
                    }
                }
            }
            Statement::SetVariable(s) => {
                if let Some(value) = &s.value {
                    self.walk_expr(value);
                }
            }
            Statement::Print(s) => self.walk_expr(&s.value),
            Statement::Return(s) => {
                if let Some(value) = &s.value {
                    self.walk_expr(value);
                }
            }
            Statement::Expr(s) => self.walk_expr(&s.expr),
            Statement::Raw(s) => self.check_exec_run(&s.tokens),
            Statement::CreateTable(_) | Statement::AlterTable(_) | Statement::DropTable(_) => {}
        }
    }

    fn walk_select(&mut self, s: &SelectStatement) {
        for col in &s.columns {
            self.walk_expr(&col.expr);
        }
        if let Some(from) = &s.from {
            self.walk_from(from);
        }
        for join in &s.joins {
            self.walk_join(join);
        }
        if let Some(w) = &s.where_clause {
            self.walk_expr(&w.condition);
        }
        if let Some(g) = &s.group_by {
            for e in &g.exprs {
                self.walk_expr(e);
            }
        }
        if let Some(h) = &s.having {
            self.walk_expr(&h.condition);
        }
        if let Some(o) = &s.order_by {
            for item in &o.items {
                self.walk_expr(&item.expr);
            }
        }
        if let Some(u) = &s.union {
            self.walk_select(&u.query);
        }
    }

    fn walk_from(&mut self, from: &FromClause) {
        for table in &from.tables {
            self.check_table_source(table);
        }
    }

    fn walk_join(&mut self, join: &JoinClause) {
        self.check_table_source(&join.table);
        if let Some(cond) = &join.condition {
            self.walk_expr(cond);
        }
    }

    /// Checks (a) and (b): schema-less and alias-less table sources in
    /// FROM/JOIN position.
    fn check_table_source(&mut self, table: &Expr) {
        match &table.kind {
            ExprKind::Identifier(id) => {
                let name = id.name();
                if self.options.warn_missing_schema
                    && id.parts.len() == 1
                    && !self.is_exempt_name(&name)
                {
                    self.warnings.push(Warning::at(
                        format!("Schema is missing from {name}"),
                        id.parts.first(),
                    ));
                }
                if self.options.warn_missing_alias && id.alias.is_none() {
                    self.warnings.push(Warning::at(
                        format!("Alias is missing from {name}"),
                        id.parts.first(),
                    ));
                }
            }
            ExprKind::FunctionCall(call) => {
                for arg in &call.args {
                    self.walk_expr(arg);
                }
                if self.options.warn_missing_alias && call.alias.is_none() {
                    self.warnings.push(Warning::at(
                        format!("Alias is missing from {}", call.name.name()),
                        call.name.parts.first(),
                    ));
                }
            }
            ExprKind::Group(group) => {
                if self.options.warn_missing_alias {
                    self.warnings.push(Warning::at(
                        "Alias is missing from derived table".to_string(),
                        Some(&group.lparen),
                    ));
                }
                self.walk_group(group);
            }
            ExprKind::Aliased { expr, .. } => {
                // Aliased derived table: alias present, only recurse
                if let ExprKind::Group(group) = &expr.kind {
                    self.walk_group(group);
                }
            }
            _ => self.walk_expr(table),
        }
    }

    fn is_exempt_name(&self, name: &str) -> bool {
        name.starts_with('#') || name.starts_with('@') || self.cte_names.contains(&name.to_uppercase())
    }

    fn walk_group(&mut self, group: &ParenGroup) {
        match &group.body {
            ParenBody::Query(stmt) => self.walk_statement(stmt),
            ParenBody::Exprs(exprs) => {
                for e in exprs {
                    self.walk_expr(e);
                }
            }
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Binary { left, right, .. } => {
                self.walk_expr(left);
                self.walk_expr(right);
            }
            ExprKind::Unary { operand, .. } => self.walk_expr(operand),
            ExprKind::FunctionCall(call) => {
                for arg in &call.args {
                    self.walk_expr(arg);
                }
            }
            ExprKind::Case(case) => {
                if let Some(input) = &case.input {
                    self.walk_expr(input);
                }
                for when in &case.whens {
                    self.walk_expr(&when.condition);
                    self.walk_expr(&when.result);
                }
                if let Some(else_result) = &case.else_result {
                    self.walk_expr(else_result);
                }
            }
            ExprKind::In(in_expr) => {
                self.walk_expr(&in_expr.expr);
                self.walk_group(&in_expr.group);
            }
            ExprKind::Between(between) => {
                self.walk_expr(&between.expr);
                self.walk_expr(&between.low);
                self.walk_expr(&between.high);
            }
            ExprKind::Exists(exists) => self.walk_group(&exists.group),
            ExprKind::Group(group) => self.walk_group(group),
            ExprKind::Aliased { expr, .. } => self.walk_expr(expr),
            ExprKind::Literal(_)
            | ExprKind::Identifier(_)
            | ExprKind::Star(_)
            | ExprKind::Raw(_) => {}
        }
    }

    /// Check (c): an EXEC whose procedure-name token run contains no `.`
    /// before the first parameter token.
    fn check_exec_run(&mut self, tokens: &[Token]) {
        if !self.options.warn_missing_schema {
            return;
        }
        match tokens.first() {
            Some(t) if t.is_word("EXEC") || t.is_word("EXECUTE") => {}
            _ => return,
        }
        let mut name_token: Option<&Token> = None;
        let mut has_dot = false;
        for token in &tokens[1..] {
            let is_param = token.text.starts_with('@')
                || token.is_symbol("=")
                || token.is_symbol(",");
            if is_param {
                break;
            }
            if token.is_symbol(".") {
                has_dot = true;
            } else if name_token.is_none() && token.kind != TokenKind::Punctuation {
                name_token = Some(token);
            }
        }
        if let Some(name) = name_token {
            if !has_dot && !name.text.starts_with('#') && !name.text.starts_with('@') {
                self.warnings.push(Warning::at(
                    format!("Schema is missing from {}", name.text),
                    Some(name),
                ));
            }
        }
    }
}
