//! AST node definitions for T-SQL statements
//!
//! The tree is the shared contract between the parser and the formatter.
//! Nodes own the tokens needed to reproduce casing and position metadata
//! (keyword tokens, operator tokens, identifier parts), which is also how
//! attached comments travel from source to output. Nodes are immutable
//! after construction.

use serde::Serialize;

use crate::parser::lexer::Token;

/// A whole script: an ordered list of batches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlScript {
    pub batches: Vec<Batch>,
    /// The final Eof token; carries comments trailing the last statement.
    pub eof: Token,
}

/// A sequence of statements terminated by an optional `GO` separator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    pub statements: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<Token>,
}

/// A single statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    Cte(CteStatement),
    BeginEnd(BeginEndBlock),
    IfElse(IfStatement),
    Declare(DeclareStatement),
    SetVariable(SetStatement),
    Print(PrintStatement),
    Return(ReturnStatement),
    CreateTable(CreateTableStatement),
    AlterTable(AlterTableStatement),
    DropTable(DropTableStatement),
    /// A bare scalar expression at statement level (e.g. a standalone
    /// CASE expression)
    Expr(ExprStatement),
    /// Token-run fallback for constructs without first-class grammar
    /// (EXEC argument lists, transaction control, unknown statements).
    Raw(RawStatement),
}

/// A bare expression used as a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprStatement {
    pub expr: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectStatement {
    pub select_token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_token: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<TopClause>,
    pub columns: Vec<SelectColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<FromClause>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<ConditionClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupByClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub having: Option<ConditionClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderByClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub union: Option<Box<SetOperation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// TOP clause; the count is an expression so `TOP (100)` keeps its parens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopClause {
    pub top_token: Token,
    pub value: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_token: Option<Token>,
}

/// A column in a SELECT list, possibly aliased.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectColumn {
    pub expr: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_token: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<Token>,
}

/// FROM clause: one or more comma-separated table sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FromClause {
    pub from_token: Token,
    pub tables: Vec<Expr>,
}

/// JOIN clause: the join keyword run (`LEFT OUTER JOIN`), the table source,
/// and the optional ON condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinClause {
    pub keywords: Vec<Token>,
    pub table: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_token: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expr>,
}

/// A keyword-introduced condition clause (WHERE, HAVING, ON).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionClause {
    pub keyword: Token,
    pub condition: Expr,
}

/// GROUP BY clause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupByClause {
    pub group_token: Token,
    pub by_token: Token,
    pub exprs: Vec<Expr>,
}

/// ORDER BY clause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderByClause {
    pub order_token: Token,
    pub by_token: Token,
    pub items: Vec<OrderByItem>,
}

/// A single ORDER BY item with an optional ASC/DESC token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderByItem {
    pub expr: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Token>,
}

/// UNION / INTERSECT / EXCEPT tail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetOperation {
    /// `UNION` or `UNION ALL` etc., as a token run
    pub op_tokens: Vec<Token>,
    pub query: SelectStatement,
}

/// WITH statement: named sub-queries plus the trailing statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CteStatement {
    pub with_token: Token,
    pub ctes: Vec<CteDefinition>,
    pub body: Box<Statement>,
}

/// A single CTE definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CteDefinition {
    pub name: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<ParenGroup>,
    pub as_token: Token,
    pub query: ParenGroup,
}

/// INSERT statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertStatement {
    pub insert_token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub into_token: Option<Token>,
    pub target: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<ParenGroup>,
    pub source: InsertSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// INSERT source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsertSource {
    Values {
        values_token: Token,
        rows: Vec<ParenGroup>,
    },
    Query(Box<Statement>),
    Raw(Vec<Token>),
}

/// UPDATE statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStatement {
    pub update_token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<TopClause>,
    pub target: Identifier,
    pub set_token: Token,
    pub assignments: Vec<Assignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<FromClause>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<ConditionClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// A `column = value` assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub target: Expr,
    pub op: Token,
    pub value: Expr,
}

/// DELETE statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteStatement {
    pub delete_token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<TopClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_token: Option<Token>,
    pub target: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<FromClause>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<JoinClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<ConditionClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// BEGIN ... END block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeginEndBlock {
    pub begin_token: Token,
    pub statements: Vec<Statement>,
    pub end_token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// IF ... [ELSE ...] statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub if_token: Token,
    pub condition: Expr,
    pub then_branch: Box<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_token: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_branch: Option<Box<Statement>>,
}

/// DECLARE statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclareStatement {
    pub declare_token: Token,
    pub declarations: Vec<VariableDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// A single `@name type [= default]` declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    pub name: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_token: Option<Token>,
    /// Bare identifier (`INT`) or function-call shape (`VARCHAR(50)`)
    pub data_type: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_token: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Expr>,
}

/// SET statement: variable assignment or a raw option run (`SET NOCOUNT ON`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetStatement {
    pub set_token: Token,
    pub target: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Expr>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub option_tokens: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// PRINT statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintStatement {
    pub print_token: Token,
    pub value: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// RETURN statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub return_token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTableStatement {
    pub create_token: Token,
    pub table_token: Token,
    pub name: Identifier,
    pub lparen: Token,
    pub elements: Vec<TableElement>,
    pub rparen: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// An element of a CREATE TABLE body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableElement {
    Column(ColumnDefinition),
    Constraint(TableConstraint),
}

/// Column definition: name, data type, and a raw option run
/// (`NOT NULL`, `IDENTITY(1,1)`, `DEFAULT ...`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    pub name: Token,
    pub data_type: Expr,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Token>,
}

/// Table-level constraint, kept as a raw token run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableConstraint {
    pub tokens: Vec<Token>,
}

/// ALTER TABLE statement; the action is a raw token run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterTableStatement {
    pub alter_token: Token,
    pub table_token: Token,
    pub name: Identifier,
    pub action: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// DROP TABLE statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropTableStatement {
    pub drop_token: Token,
    pub table_token: Token,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub if_exists: Vec<Token>,
    pub names: Vec<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// Raw statement fallback: the consumed token run, verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawStatement {
    pub tokens: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<Token>,
}

/// An expression together with its source-parenthesization stamp.
///
/// `parenthesized` is set on any node that was wrapped in parentheses in
/// the source; the formatter re-emits literal parens for such nodes on
/// every rendering path, since the grouping can change associativity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub parenthesized: bool,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            parenthesized: false,
        }
    }
}

/// Expression variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Literal(Token),
    Identifier(Identifier),
    Star(Token),
    Binary {
        left: Box<Expr>,
        op: Token,
        right: Box<Expr>,
    },
    Unary {
        op: Token,
        operand: Box<Expr>,
    },
    FunctionCall(FunctionCall),
    Case(CaseExpression),
    In(InExpression),
    Between(BetweenExpression),
    Exists(ExistsExpression),
    /// A parenthesized subquery or expression list
    Group(ParenGroup),
    /// An aliased wrapper around an expression that has no alias slot of
    /// its own (e.g. a derived table `(SELECT ...) AS x`)
    Aliased {
        expr: Box<Expr>,
        as_token: Option<Token>,
        alias: Token,
    },
    /// Token-run fallback
    Raw(Vec<Token>),
}

/// A dotted name with an optional alias and PIVOT/UNPIVOT attachment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub parts: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_token: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot: Option<Box<PivotClause>>,
}

impl Identifier {
    pub fn from_parts(parts: Vec<Token>) -> Self {
        Self {
            parts,
            as_token: None,
            alias: None,
            pivot: None,
        }
    }

    /// Dotted source text of the name, without alias.
    pub fn name(&self) -> String {
        self.parts
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Source text of the last name part.
    pub fn last_part(&self) -> &str {
        self.parts.last().map(|t| t.text.as_str()).unwrap_or("")
    }
}

/// Function call (also reused for parameterized data types).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: Identifier,
    pub lparen: Token,
    pub args: Vec<Expr>,
    pub rparen: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over: Option<OverClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_token: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<Token>,
}

/// OVER clause, captured as a balanced raw token run including its parens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverClause {
    pub over_token: Token,
    pub tokens: Vec<Token>,
}

/// CASE expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseExpression {
    pub case_token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Box<Expr>>,
    pub whens: Vec<WhenClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_token: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_result: Option<Box<Expr>>,
    pub end_token: Token,
}

/// WHEN ... THEN ... arm of a CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenClause {
    pub when_token: Token,
    pub condition: Expr,
    pub then_token: Token,
    pub result: Expr,
}

/// `expr [NOT] IN (...)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InExpression {
    pub expr: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_token: Option<Token>,
    pub in_token: Token,
    pub group: ParenGroup,
}

/// `expr [NOT] BETWEEN low AND high`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetweenExpression {
    pub expr: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_token: Option<Token>,
    pub between_token: Token,
    pub low: Box<Expr>,
    pub and_token: Token,
    pub high: Box<Expr>,
}

/// `EXISTS (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistsExpression {
    pub exists_token: Token,
    pub group: ParenGroup,
}

/// A parenthesized group wrapping a subquery or an expression list.
/// The paren tokens are kept so comments attached to them survive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenGroup {
    pub lparen: Token,
    pub body: ParenBody,
    pub rparen: Token,
}

/// Body of a [`ParenGroup`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParenBody {
    Query(Box<Statement>),
    Exprs(Vec<Expr>),
}

/// PIVOT / UNPIVOT clause attached to a table reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotClause {
    /// `PIVOT` or `UNPIVOT`
    pub pivot_token: Token,
    pub lparen: Token,
    pub aggregate: Expr,
    pub for_token: Token,
    pub column: Expr,
    pub in_token: Token,
    pub in_list: ParenGroup,
    pub rparen: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_token: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<Token>,
}

// ---------------------------------------------------------------------------
// Token walkers
//
// Visit every owned token in source order. Used for locating a node's first
// token (leading comments, blank-line flags) and for deciding whether any
// attached comment blocks single-line collapsing.
// ---------------------------------------------------------------------------

impl Statement {
    pub fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        match self {
            Statement::Select(s) => s.for_each_token(f),
            Statement::Insert(s) => s.for_each_token(f),
            Statement::Update(s) => s.for_each_token(f),
            Statement::Delete(s) => s.for_each_token(f),
            Statement::Cte(s) => s.for_each_token(f),
            Statement::BeginEnd(s) => s.for_each_token(f),
            Statement::IfElse(s) => s.for_each_token(f),
            Statement::Declare(s) => s.for_each_token(f),
            Statement::SetVariable(s) => s.for_each_token(f),
            Statement::Print(s) => s.for_each_token(f),
            Statement::Return(s) => s.for_each_token(f),
            Statement::CreateTable(s) => s.for_each_token(f),
            Statement::AlterTable(s) => s.for_each_token(f),
            Statement::DropTable(s) => s.for_each_token(f),
            Statement::Expr(s) => {
                s.expr.for_each_token(f);
                if let Some(t) = &s.semicolon {
                    f(t);
                }
            }
            Statement::Raw(s) => s.for_each_token(f),
        }
    }

    /// The lexically first token of the statement.
    pub fn first_token(&self) -> Option<&Token> {
        let mut first = None;
        self.for_each_token(&mut |t| {
            if first.is_none() {
                first = Some(t);
            }
        });
        first
    }

    /// All tokens of the statement, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.for_each_token(&mut |t| out.push(t));
        out
    }
}

impl SelectStatement {
    pub fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.select_token);
        if let Some(t) = &self.distinct_token {
            f(t);
        }
        if let Some(top) = &self.top {
            f(&top.top_token);
            top.value.for_each_token(f);
            if let Some(t) = &top.percent_token {
                f(t);
            }
        }
        for col in &self.columns {
            col.expr.for_each_token(f);
            if let Some(t) = &col.as_token {
                f(t);
            }
            if let Some(t) = &col.alias {
                f(t);
            }
        }
        if let Some(from) = &self.from {
            from.for_each_token(f);
        }
        for join in &self.joins {
            join.for_each_token(f);
        }
        if let Some(w) = &self.where_clause {
            f(&w.keyword);
            w.condition.for_each_token(f);
        }
        if let Some(g) = &self.group_by {
            f(&g.group_token);
            f(&g.by_token);
            for e in &g.exprs {
                e.for_each_token(f);
            }
        }
        if let Some(h) = &self.having {
            f(&h.keyword);
            h.condition.for_each_token(f);
        }
        if let Some(o) = &self.order_by {
            f(&o.order_token);
            f(&o.by_token);
            for item in &o.items {
                item.expr.for_each_token(f);
                if let Some(t) = &item.direction {
                    f(t);
                }
            }
        }
        if let Some(u) = &self.union {
            for t in &u.op_tokens {
                f(t);
            }
            u.query.for_each_token(f);
        }
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl FromClause {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.from_token);
        for table in &self.tables {
            table.for_each_token(f);
        }
    }
}

impl JoinClause {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        for t in &self.keywords {
            f(t);
        }
        self.table.for_each_token(f);
        if let Some(t) = &self.on_token {
            f(t);
        }
        if let Some(c) = &self.condition {
            c.for_each_token(f);
        }
    }
}

impl InsertStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.insert_token);
        if let Some(t) = &self.into_token {
            f(t);
        }
        self.target.for_each_token(f);
        if let Some(g) = &self.columns {
            g.for_each_token(f);
        }
        match &self.source {
            InsertSource::Values { values_token, rows } => {
                f(values_token);
                for row in rows {
                    row.for_each_token(f);
                }
            }
            InsertSource::Query(stmt) => stmt.for_each_token(f),
            InsertSource::Raw(tokens) => {
                for t in tokens {
                    f(t);
                }
            }
        }
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl UpdateStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.update_token);
        if let Some(top) = &self.top {
            f(&top.top_token);
            top.value.for_each_token(f);
            if let Some(t) = &top.percent_token {
                f(t);
            }
        }
        self.target.for_each_token(f);
        f(&self.set_token);
        for a in &self.assignments {
            a.target.for_each_token(f);
            f(&a.op);
            a.value.for_each_token(f);
        }
        if let Some(from) = &self.from {
            from.for_each_token(f);
        }
        for join in &self.joins {
            join.for_each_token(f);
        }
        if let Some(w) = &self.where_clause {
            f(&w.keyword);
            w.condition.for_each_token(f);
        }
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl DeleteStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.delete_token);
        if let Some(top) = &self.top {
            f(&top.top_token);
            top.value.for_each_token(f);
            if let Some(t) = &top.percent_token {
                f(t);
            }
        }
        if let Some(t) = &self.from_token {
            f(t);
        }
        self.target.for_each_token(f);
        if let Some(from) = &self.from {
            from.for_each_token(f);
        }
        for join in &self.joins {
            join.for_each_token(f);
        }
        if let Some(w) = &self.where_clause {
            f(&w.keyword);
            w.condition.for_each_token(f);
        }
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl CteStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.with_token);
        for cte in &self.ctes {
            f(&cte.name);
            if let Some(cols) = &cte.columns {
                cols.for_each_token(f);
            }
            f(&cte.as_token);
            cte.query.for_each_token(f);
        }
        self.body.for_each_token(f);
    }
}

impl BeginEndBlock {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.begin_token);
        for stmt in &self.statements {
            stmt.for_each_token(f);
        }
        f(&self.end_token);
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl IfStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.if_token);
        self.condition.for_each_token(f);
        self.then_branch.for_each_token(f);
        if let Some(t) = &self.else_token {
            f(t);
        }
        if let Some(b) = &self.else_branch {
            b.for_each_token(f);
        }
    }
}

impl DeclareStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.declare_token);
        for d in &self.declarations {
            f(&d.name);
            if let Some(t) = &d.as_token {
                f(t);
            }
            d.data_type.for_each_token(f);
            if let Some(t) = &d.eq_token {
                f(t);
            }
            if let Some(e) = &d.default {
                e.for_each_token(f);
            }
        }
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl SetStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.set_token);
        f(&self.target);
        if let Some(t) = &self.op {
            f(t);
        }
        if let Some(v) = &self.value {
            v.for_each_token(f);
        }
        for t in &self.option_tokens {
            f(t);
        }
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl PrintStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.print_token);
        self.value.for_each_token(f);
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl ReturnStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.return_token);
        if let Some(v) = &self.value {
            v.for_each_token(f);
        }
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl CreateTableStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.create_token);
        f(&self.table_token);
        self.name.for_each_token(f);
        f(&self.lparen);
        for element in &self.elements {
            match element {
                TableElement::Column(col) => {
                    f(&col.name);
                    col.data_type.for_each_token(f);
                    for t in &col.options {
                        f(t);
                    }
                }
                TableElement::Constraint(c) => {
                    for t in &c.tokens {
                        f(t);
                    }
                }
            }
        }
        f(&self.rparen);
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl AlterTableStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.alter_token);
        f(&self.table_token);
        self.name.for_each_token(f);
        for t in &self.action {
            f(t);
        }
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl DropTableStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.drop_token);
        f(&self.table_token);
        for t in &self.if_exists {
            f(t);
        }
        for name in &self.names {
            name.for_each_token(f);
        }
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl RawStatement {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        for t in &self.tokens {
            f(t);
        }
        if let Some(t) = &self.semicolon {
            f(t);
        }
    }
}

impl Expr {
    pub fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        match &self.kind {
            ExprKind::Literal(t) | ExprKind::Star(t) => f(t),
            ExprKind::Identifier(id) => id.for_each_token(f),
            ExprKind::Binary { left, op, right } => {
                left.for_each_token(f);
                f(op);
                right.for_each_token(f);
            }
            ExprKind::Unary { op, operand } => {
                f(op);
                operand.for_each_token(f);
            }
            ExprKind::FunctionCall(call) => call.for_each_token(f),
            ExprKind::Case(case) => {
                f(&case.case_token);
                if let Some(input) = &case.input {
                    input.for_each_token(f);
                }
                for when in &case.whens {
                    f(&when.when_token);
                    when.condition.for_each_token(f);
                    f(&when.then_token);
                    when.result.for_each_token(f);
                }
                if let Some(t) = &case.else_token {
                    f(t);
                }
                if let Some(e) = &case.else_result {
                    e.for_each_token(f);
                }
                f(&case.end_token);
            }
            ExprKind::In(in_expr) => {
                in_expr.expr.for_each_token(f);
                if let Some(t) = &in_expr.not_token {
                    f(t);
                }
                f(&in_expr.in_token);
                in_expr.group.for_each_token(f);
            }
            ExprKind::Between(between) => {
                between.expr.for_each_token(f);
                if let Some(t) = &between.not_token {
                    f(t);
                }
                f(&between.between_token);
                between.low.for_each_token(f);
                f(&between.and_token);
                between.high.for_each_token(f);
            }
            ExprKind::Exists(exists) => {
                f(&exists.exists_token);
                exists.group.for_each_token(f);
            }
            ExprKind::Group(group) => group.for_each_token(f),
            ExprKind::Aliased {
                expr,
                as_token,
                alias,
            } => {
                expr.for_each_token(f);
                if let Some(t) = as_token {
                    f(t);
                }
                f(alias);
            }
            ExprKind::Raw(tokens) => {
                for t in tokens {
                    f(t);
                }
            }
        }
    }

    /// The lexically first token of the expression.
    pub fn first_token(&self) -> Option<&Token> {
        let mut first = None;
        self.for_each_token(&mut |t| {
            if first.is_none() {
                first = Some(t);
            }
        });
        first
    }
}

impl Identifier {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        for t in &self.parts {
            f(t);
        }
        if let Some(t) = &self.as_token {
            f(t);
        }
        if let Some(t) = &self.alias {
            f(t);
        }
        if let Some(pivot) = &self.pivot {
            pivot.for_each_token(f);
        }
    }
}

impl FunctionCall {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        self.name.for_each_token(f);
        f(&self.lparen);
        for arg in &self.args {
            arg.for_each_token(f);
        }
        f(&self.rparen);
        if let Some(over) = &self.over {
            f(&over.over_token);
            for t in &over.tokens {
                f(t);
            }
        }
        if let Some(t) = &self.as_token {
            f(t);
        }
        if let Some(t) = &self.alias {
            f(t);
        }
    }
}

impl ParenGroup {
    pub fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.lparen);
        match &self.body {
            ParenBody::Query(stmt) => stmt.for_each_token(f),
            ParenBody::Exprs(exprs) => {
                for e in exprs {
                    e.for_each_token(f);
                }
            }
        }
        f(&self.rparen);
    }
}

impl PivotClause {
    fn for_each_token<'a>(&'a self, f: &mut dyn FnMut(&'a Token)) {
        f(&self.pivot_token);
        f(&self.lparen);
        self.aggregate.for_each_token(f);
        f(&self.for_token);
        self.column.for_each_token(f);
        f(&self.in_token);
        self.in_list.for_each_token(f);
        f(&self.rparen);
        if let Some(t) = &self.as_token {
            f(t);
        }
        if let Some(t) = &self.alias {
            f(t);
        }
    }
}
