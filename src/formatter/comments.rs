//! Comment queries for the formatter
//!
//! Comments ride on tokens. Line builders ask two questions about a node:
//! which comments go above its first line, and which must be appended at
//! the end of the line it lands on. Subquery groups and CASE expressions
//! place their internal comments themselves when rendered expanded, so the
//! shallow walk stops at those boundaries; their boundary token's leading
//! comments still belong to the enclosing line builder.

use crate::ast::{CaseExpression, Expr, ExprKind, ParenBody, ParenGroup, Statement};
use crate::parser::lexer::Token;

/// Comments attached to a node, split into those rendered above its first
/// line and those appended at the end of the line the node lands on.
#[derive(Default)]
pub struct NodeComments<'a> {
    pub above: Vec<&'a Token>,
    pub at_end: Vec<&'a Token>,
}

impl<'a> NodeComments<'a> {
    /// Fold another token's comments into the trailing set.
    pub fn absorb(&mut self, token: &'a Token) {
        self.at_end.extend(token.leading_comments.iter());
        if let Some(trailing) = &token.trailing_comment {
            self.at_end.push(trailing.as_ref());
        }
    }
}

/// Split the comments of an ordered token run.
pub fn split_tokens<'a>(tokens: &[&'a Token]) -> NodeComments<'a> {
    let mut nc = NodeComments::default();
    for (i, token) in tokens.iter().enumerate() {
        if i == 0 {
            nc.above.extend(token.leading_comments.iter());
            if let Some(trailing) = &token.trailing_comment {
                nc.at_end.push(trailing.as_ref());
            }
        } else {
            nc.absorb(token);
        }
    }
    nc
}

enum Item<'a> {
    /// A token whose comments the enclosing line builder owns entirely.
    Full(&'a Token),
    /// The boundary token of a skipped subtree: only its leading comments
    /// belong outside; everything deeper is placed by the subtree's own
    /// renderer.
    LeadingOnly(&'a Token),
}

/// Shallow comment split of an expression: stops at subquery-group and
/// CASE boundaries.
pub fn shallow_comments(expr: &Expr) -> NodeComments<'_> {
    let mut items = Vec::new();
    shallow_items(expr, &mut items);
    let mut nc = NodeComments::default();
    for (i, item) in items.iter().enumerate() {
        match item {
            Item::Full(token) => {
                if i == 0 {
                    nc.above.extend(token.leading_comments.iter());
                } else {
                    nc.at_end.extend(token.leading_comments.iter());
                }
                if let Some(trailing) = &token.trailing_comment {
                    nc.at_end.push(trailing.as_ref());
                }
            }
            Item::LeadingOnly(token) => {
                if i == 0 {
                    nc.above.extend(token.leading_comments.iter());
                } else {
                    nc.at_end.extend(token.leading_comments.iter());
                }
            }
        }
    }
    nc
}

fn shallow_items<'a>(expr: &'a Expr, out: &mut Vec<Item<'a>>) {
    match &expr.kind {
        ExprKind::Literal(t) | ExprKind::Star(t) => out.push(Item::Full(t)),
        ExprKind::Identifier(id) => {
            for t in &id.parts {
                out.push(Item::Full(t));
            }
            if let Some(pivot) = &id.pivot {
                out.push(Item::Full(&pivot.pivot_token));
                out.push(Item::Full(&pivot.lparen));
                shallow_items(&pivot.aggregate, out);
                out.push(Item::Full(&pivot.for_token));
                shallow_items(&pivot.column, out);
                out.push(Item::Full(&pivot.in_token));
                shallow_group(&pivot.in_list, out);
                out.push(Item::Full(&pivot.rparen));
                if let Some(t) = &pivot.as_token {
                    out.push(Item::Full(t));
                }
                if let Some(t) = &pivot.alias {
                    out.push(Item::Full(t));
                }
            }
            if let Some(t) = &id.as_token {
                out.push(Item::Full(t));
            }
            if let Some(t) = &id.alias {
                out.push(Item::Full(t));
            }
        }
        ExprKind::Binary { left, op, right } => {
            shallow_items(left, out);
            out.push(Item::Full(op));
            shallow_items(right, out);
        }
        ExprKind::Unary { op, operand } => {
            out.push(Item::Full(op));
            shallow_items(operand, out);
        }
        ExprKind::FunctionCall(call) => {
            for t in &call.name.parts {
                out.push(Item::Full(t));
            }
            out.push(Item::Full(&call.lparen));
            for arg in &call.args {
                shallow_items(arg, out);
            }
            out.push(Item::Full(&call.rparen));
            if let Some(over) = &call.over {
                out.push(Item::Full(&over.over_token));
                for t in &over.tokens {
                    out.push(Item::Full(t));
                }
            }
            if let Some(t) = &call.as_token {
                out.push(Item::Full(t));
            }
            if let Some(t) = &call.alias {
                out.push(Item::Full(t));
            }
        }
        ExprKind::Case(case) => out.push(Item::LeadingOnly(&case.case_token)),
        ExprKind::In(in_expr) => {
            shallow_items(&in_expr.expr, out);
            if let Some(t) = &in_expr.not_token {
                out.push(Item::Full(t));
            }
            out.push(Item::Full(&in_expr.in_token));
            shallow_group(&in_expr.group, out);
        }
        ExprKind::Between(between) => {
            shallow_items(&between.expr, out);
            if let Some(t) = &between.not_token {
                out.push(Item::Full(t));
            }
            out.push(Item::Full(&between.between_token));
            shallow_items(&between.low, out);
            out.push(Item::Full(&between.and_token));
            shallow_items(&between.high, out);
        }
        ExprKind::Exists(exists) => {
            out.push(Item::Full(&exists.exists_token));
            shallow_group(&exists.group, out);
        }
        ExprKind::Group(group) => shallow_group(group, out),
        ExprKind::Aliased {
            expr,
            as_token,
            alias,
        } => {
            shallow_items(expr, out);
            if let Some(t) = as_token {
                out.push(Item::Full(t));
            }
            out.push(Item::Full(alias));
        }
        ExprKind::Raw(tokens) => {
            for t in tokens {
                out.push(Item::Full(t));
            }
        }
    }
}

fn shallow_group<'a>(group: &'a ParenGroup, out: &mut Vec<Item<'a>>) {
    match &group.body {
        ParenBody::Query(_) => out.push(Item::LeadingOnly(&group.lparen)),
        ParenBody::Exprs(exprs) => {
            out.push(Item::Full(&group.lparen));
            for e in exprs {
                shallow_items(e, out);
            }
            out.push(Item::Full(&group.rparen));
        }
    }
}

/// Whether an expression carries any comment at all.
pub fn expr_has_comments(expr: &Expr) -> bool {
    let mut found = false;
    expr.for_each_token(&mut |t| {
        if !t.leading_comments.is_empty() || t.trailing_comment.is_some() {
            found = true;
        }
    });
    found
}

/// Whether a subquery group carries any comment beyond its opening paren's
/// leading slot (which the enclosing line builder owns).
pub fn group_has_inner_comments(group: &ParenGroup) -> bool {
    let mut found = false;
    let mut first = true;
    group.for_each_token(&mut |t| {
        if first {
            first = false;
            if t.trailing_comment.is_some() {
                found = true;
            }
            return;
        }
        if !t.leading_comments.is_empty() || t.trailing_comment.is_some() {
            found = true;
        }
    });
    found
}

/// Whether a CASE expression carries any comment beyond the CASE keyword's
/// leading slot.
pub fn case_has_inner_comments(case: &CaseExpression) -> bool {
    let probe = Expr::new(ExprKind::Case(case.clone()));
    let mut found = false;
    let mut first = true;
    probe.for_each_token(&mut |t| {
        if first {
            first = false;
            if t.trailing_comment.is_some() {
                found = true;
            }
            return;
        }
        if !t.leading_comments.is_empty() || t.trailing_comment.is_some() {
            found = true;
        }
    });
    found
}

/// Whether any skipped subtree (subquery group or CASE) inside this
/// expression carries comments its own renderer would need to place. Such
/// expressions must take the structured rendering path.
pub fn has_buried_comments(expr: &Expr) -> bool {
    let mut found = false;
    visit_buried(expr, &mut found);
    found
}

fn visit_buried(expr: &Expr, found: &mut bool) {
    if *found {
        return;
    }
    match &expr.kind {
        ExprKind::Case(case) => {
            if case_has_inner_comments(case) {
                *found = true;
            }
        }
        ExprKind::Group(group) if matches!(group.body, ParenBody::Query(_)) => {
            if group_has_inner_comments(group) {
                *found = true;
            }
        }
        ExprKind::Binary { left, right, .. } => {
            visit_buried(left, found);
            visit_buried(right, found);
        }
        ExprKind::Unary { operand, .. } => visit_buried(operand, found),
        ExprKind::FunctionCall(call) => {
            for arg in &call.args {
                visit_buried(arg, found);
            }
        }
        ExprKind::In(in_expr) => {
            visit_buried(&in_expr.expr, found);
            if matches!(in_expr.group.body, ParenBody::Query(_))
                && group_has_inner_comments(&in_expr.group)
            {
                *found = true;
            } else if let ParenBody::Exprs(exprs) = &in_expr.group.body {
                for e in exprs {
                    visit_buried(e, found);
                }
            }
        }
        ExprKind::Between(between) => {
            visit_buried(&between.expr, found);
            visit_buried(&between.low, found);
            visit_buried(&between.high, found);
        }
        ExprKind::Exists(exists) => {
            if group_has_inner_comments(&exists.group) {
                *found = true;
            }
        }
        ExprKind::Group(group) => {
            if let ParenBody::Exprs(exprs) = &group.body {
                for e in exprs {
                    visit_buried(e, found);
                }
            }
        }
        ExprKind::Aliased { expr, .. } => visit_buried(expr, found),
        ExprKind::Literal(_) | ExprKind::Star(_) | ExprKind::Identifier(_) | ExprKind::Raw(_) => {}
    }
}

/// Whether any attached comment would be lost by collapsing the statement
/// to one line. The statement's own leading comments render above the
/// collapsed line and its final token's trailing comment renders after it,
/// so neither blocks; everything else does.
pub fn blocks_collapse(stmt: &Statement) -> bool {
    blocks_collapse_tokens(&stmt.tokens())
}

/// Token-run form of [`blocks_collapse`].
pub fn blocks_collapse_tokens(tokens: &[&Token]) -> bool {
    let last = tokens.len().saturating_sub(1);
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 && !token.leading_comments.is_empty() {
            return true;
        }
        if i < last && token.trailing_comment.is_some() {
            return true;
        }
    }
    false
}
