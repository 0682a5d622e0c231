//! Statement parsing
//!
//! Dispatches on the leading keyword to one of the per-statement parsers.
//! Constructs without first-class grammar (EXEC argument lists, transaction
//! control, ALTER TABLE actions, table hints) degrade to raw token runs;
//! fully unrecognized leading tokens degrade to single-token raw statements
//! so forward progress is always guaranteed.

use crate::ast::*;
use crate::parser::expr::{parse_data_type, parse_expression, parse_paren_group, Parser};
use crate::parser::lexer::{Token, TokenKind};

/// Words that terminate a bare-alias position: clause and join keywords
/// plus everything that can start a new statement.
const ALIAS_DENY_LIST: &[&str] = &[
    "ALTER", "AND", "AS", "BEGIN", "BETWEEN", "BY", "CASE", "CREATE", "CROSS", "DECLARE",
    "DELETE", "DROP", "ELSE", "END", "EXCEPT", "EXEC", "EXECUTE", "FOR", "FROM", "FULL", "GO",
    "GROUP", "HAVING", "IF", "IN", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "LEFT",
    "LIKE", "NOT", "ON", "OPTION", "OR", "ORDER", "OUTER", "PIVOT", "PRINT", "RETURN", "RIGHT",
    "SELECT", "SET", "THEN", "UNION", "UNPIVOT", "UPDATE", "VALUES", "WHEN", "WHERE", "WHILE",
    "WITH",
];

/// Words that start a new statement; raw token runs stop in front of them.
const STATEMENT_START_WORDS: &[&str] = &[
    "ALTER", "BEGIN", "COMMIT", "CREATE", "DECLARE", "DELETE", "DROP", "ELSE", "END", "EXEC",
    "EXECUTE", "GRANT", "IF", "INSERT", "PRINT", "RAISERROR", "RETURN", "ROLLBACK", "SELECT",
    "SET", "TRUNCATE", "UPDATE", "USE", "WHILE", "WITH",
];

fn in_word_list(token: &Token, list: &[&str]) -> bool {
    token.kind == TokenKind::Word && list.contains(&token.upper().as_str())
}

/// Parse a single statement. Never fails; always consumes at least one token.
pub fn parse_statement(p: &mut Parser) -> Statement {
    if p.current().is_symbol(";") {
        return Statement::Raw(RawStatement {
            tokens: Vec::new(),
            semicolon: Some(p.take()),
        });
    }
    if p.current().kind != TokenKind::Word {
        return Statement::Raw(RawStatement {
            tokens: vec![p.take()],
            semicolon: None,
        });
    }

    match p.current().upper().as_str() {
        "SELECT" => Statement::Select(parse_select(p)),
        "WITH" => parse_with(p),
        "INSERT" => Statement::Insert(parse_insert(p)),
        "UPDATE" => Statement::Update(parse_update(p)),
        "DELETE" => Statement::Delete(parse_delete(p)),
        "BEGIN" => parse_begin(p),
        "IF" => Statement::IfElse(parse_if(p)),
        "DECLARE" => Statement::Declare(parse_declare(p)),
        "SET" => Statement::SetVariable(parse_set(p)),
        "PRINT" => Statement::Print(parse_print(p)),
        "RETURN" => Statement::Return(parse_return(p)),
        "CREATE" if p.peek(1).is_word("TABLE") => Statement::CreateTable(parse_create_table(p)),
        "ALTER" if p.peek(1).is_word("TABLE") => Statement::AlterTable(parse_alter_table(p)),
        "DROP" if p.peek(1).is_word("TABLE") => Statement::DropTable(parse_drop_table(p)),
        "EXEC" | "EXECUTE" | "TRUNCATE" | "USE" | "GRANT" | "RAISERROR" | "COMMIT"
        | "ROLLBACK" | "CREATE" | "ALTER" | "DROP" | "WHILE" | "GOTO" | "OPEN" | "CLOSE"
        | "FETCH" | "DEALLOCATE" | "BACKUP" | "CHECKPOINT" | "REVOKE" => {
            Statement::Raw(parse_raw_run(p))
        }
        "CASE" => {
            let expr = parse_expression(p);
            let semicolon = take_semicolon(p);
            Statement::Expr(ExprStatement { expr, semicolon })
        }
        _ => Statement::Raw(RawStatement {
            tokens: vec![p.take()],
            semicolon: None,
        }),
    }
}

/// Capture a raw token run up to the next statement boundary, balancing
/// parentheses so argument lists stay within the run.
fn parse_raw_run(p: &mut Parser) -> RawStatement {
    let mut tokens = vec![p.take()];
    let mut depth = 0usize;
    loop {
        let current = p.current();
        if p.at_eof() || current.kind == TokenKind::BatchSeparator {
            break;
        }
        if depth == 0 && current.is_symbol(";") {
            break;
        }
        if depth == 0 && in_word_list(current, STATEMENT_START_WORDS) {
            break;
        }
        let token = p.take();
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth = depth.saturating_sub(1);
        }
        tokens.push(token);
    }
    let semicolon = take_semicolon(p);
    RawStatement { tokens, semicolon }
}

fn take_semicolon(p: &mut Parser) -> Option<Token> {
    if p.current().is_symbol(";") {
        Some(p.take())
    } else {
        None
    }
}

/// Parse a dotted name without the function-call continuation, for targets
/// like `INSERT INTO dbo.t (...)` where a `(` is not an argument list.
fn parse_identifier_parts(p: &mut Parser) -> Identifier {
    let mut parts = Vec::new();
    if matches!(
        p.current().kind,
        TokenKind::Word | TokenKind::QuotedIdentifier
    ) {
        parts.push(p.take());
        while p.current().is_symbol(".") && !p.at_eof() {
            p.discard();
            if matches!(
                p.current().kind,
                TokenKind::Word | TokenKind::QuotedIdentifier
            ) {
                parts.push(p.take());
            } else {
                break;
            }
        }
    }
    Identifier::from_parts(parts)
}

/// Optional `[AS] alias` after a table reference or select column. A bare
/// word is an alias only if it is not on the clause/join keyword deny-list.
fn parse_optional_alias(p: &mut Parser) -> (Option<Token>, Option<Token>) {
    if p.current().is_word("AS") {
        let as_token = p.take();
        let alias = if matches!(
            p.current().kind,
            TokenKind::Word | TokenKind::QuotedIdentifier | TokenKind::StringLiteral
        ) {
            Some(p.take())
        } else {
            None
        };
        return (Some(as_token), alias);
    }
    if matches!(
        p.current().kind,
        TokenKind::Word | TokenKind::QuotedIdentifier
    ) && !in_word_list(p.current(), ALIAS_DENY_LIST)
    {
        return (None, Some(p.take()));
    }
    (None, None)
}

/// Parse SELECT statement
pub fn parse_select(p: &mut Parser) -> SelectStatement {
    let select_token = p.expect_word("SELECT");
    let distinct_token = p
        .consume_word("DISTINCT")
        .or_else(|| p.consume_word("ALL"));
    let top = parse_top(p);
    let columns = parse_select_columns(p);

    let from = parse_from_clause(p);
    let joins = parse_join_clauses(p);

    let where_clause = parse_condition_clause(p, "WHERE");

    let group_by = if p.current().is_word("GROUP") {
        let group_token = p.take();
        let by_token = p.expect_word("BY");
        let mut exprs = vec![parse_expression(p)];
        while p.consume_symbol(",") {
            exprs.push(parse_expression(p));
        }
        Some(GroupByClause {
            group_token,
            by_token,
            exprs,
        })
    } else {
        None
    };

    let having = parse_condition_clause(p, "HAVING");

    let order_by = parse_order_by(p);

    let union = if in_word_list(p.current(), &["EXCEPT", "INTERSECT", "UNION"]) {
        let mut op_tokens = vec![p.take()];
        if let Some(all) = p.consume_word("ALL") {
            op_tokens.push(all);
        }
        let query = parse_select(p);
        Some(Box::new(SetOperation { op_tokens, query }))
    } else {
        None
    };

    let semicolon = take_semicolon(p);

    SelectStatement {
        select_token,
        distinct_token,
        top,
        columns,
        from,
        joins,
        where_clause,
        group_by,
        having,
        order_by,
        union,
        semicolon,
    }
}

fn parse_top(p: &mut Parser) -> Option<TopClause> {
    if !p.current().is_word("TOP") {
        return None;
    }
    let top_token = p.take();
    let value = parse_expression(p);
    let percent_token = p.consume_word("PERCENT");
    Some(TopClause {
        top_token,
        value,
        percent_token,
    })
}

fn parse_condition_clause(p: &mut Parser, keyword: &str) -> Option<ConditionClause> {
    if !p.current().is_word(keyword) {
        return None;
    }
    let keyword = p.take();
    let condition = parse_expression(p);
    Some(ConditionClause { keyword, condition })
}

fn parse_order_by(p: &mut Parser) -> Option<OrderByClause> {
    if !p.current().is_word("ORDER") {
        return None;
    }
    let order_token = p.take();
    let by_token = p.expect_word("BY");
    let mut items = vec![parse_order_by_item(p)];
    while p.consume_symbol(",") {
        items.push(parse_order_by_item(p));
    }
    Some(OrderByClause {
        order_token,
        by_token,
        items,
    })
}

fn parse_order_by_item(p: &mut Parser) -> OrderByItem {
    let expr = parse_expression(p);
    let direction = p.consume_word("ASC").or_else(|| p.consume_word("DESC"));
    OrderByItem { expr, direction }
}

fn parse_select_columns(p: &mut Parser) -> Vec<SelectColumn> {
    let mut columns = vec![parse_select_column(p)];
    while p.consume_symbol(",") {
        columns.push(parse_select_column(p));
    }
    columns
}

fn parse_select_column(p: &mut Parser) -> SelectColumn {
    let expr = parse_expression(p);
    let (as_token, alias) = parse_optional_alias(p);
    SelectColumn {
        expr,
        as_token,
        alias,
    }
}

fn parse_from_clause(p: &mut Parser) -> Option<FromClause> {
    if !p.current().is_word("FROM") {
        return None;
    }
    let from_token = p.take();
    let mut tables = vec![parse_table_source(p)];
    while p.consume_symbol(",") {
        tables.push(parse_table_source(p));
    }
    Some(FromClause { from_token, tables })
}

/// Parse one table source: a dotted name, a table-valued function call, or
/// a derived table, plus optional PIVOT/UNPIVOT and alias attachments.
fn parse_table_source(p: &mut Parser) -> Expr {
    let mut expr = if p.current().is_symbol("(") {
        Expr::new(ExprKind::Group(parse_paren_group(p)))
    } else if matches!(
        p.current().kind,
        TokenKind::Word | TokenKind::QuotedIdentifier
    ) {
        crate::parser::expr::parse_table_name(p)
    } else {
        Expr::new(ExprKind::Raw(vec![p.take()]))
    };

    // PIVOT/UNPIVOT takes priority over the bare-alias heuristic; it is
    // only recognized immediately after a named table reference.
    if (p.current().is_word("PIVOT") || p.current().is_word("UNPIVOT"))
        && p.peek(1).is_symbol("(")
    {
        if let ExprKind::Identifier(id) = &mut expr.kind {
            id.pivot = Some(Box::new(parse_pivot(p)));
            return expr;
        }
    }

    let (as_token, alias) = parse_optional_alias(p);
    if alias.is_none() {
        return expr;
    }
    match expr.kind {
        ExprKind::Identifier(mut id) => {
            id.as_token = as_token;
            id.alias = alias;
            Expr::new(ExprKind::Identifier(id))
        }
        ExprKind::FunctionCall(mut call) => {
            call.as_token = as_token;
            call.alias = alias;
            Expr::new(ExprKind::FunctionCall(call))
        }
        _ => Expr::new(ExprKind::Aliased {
            expr: Box::new(expr),
            as_token,
            alias: alias.unwrap(),
        }),
    }
}

fn parse_pivot(p: &mut Parser) -> PivotClause {
    let pivot_token = p.take();
    let lparen = p.expect_symbol("(");
    let aggregate = parse_expression(p);
    let for_token = p.expect_word("FOR");
    // A bare name: the comparison level must not eat the pivot's IN list
    let column = crate::parser::expr::parse_table_name(p);
    let in_token = p.expect_word("IN");
    let in_list = parse_paren_group(p);
    let rparen = p.expect_symbol(")");
    let (as_token, alias) = parse_optional_alias(p);
    PivotClause {
        pivot_token,
        lparen,
        aggregate,
        for_token,
        column,
        in_token,
        in_list,
        rparen,
        as_token,
        alias,
    }
}

fn parse_join_clauses(p: &mut Parser) -> Vec<JoinClause> {
    let mut joins = Vec::new();
    loop {
        if !in_word_list(
            p.current(),
            &["CROSS", "FULL", "INNER", "JOIN", "LEFT", "RIGHT"],
        ) {
            break;
        }
        let mut keywords = Vec::new();
        loop {
            let is_join = p.current().is_word("JOIN");
            if is_join
                || in_word_list(
                    p.current(),
                    &["CROSS", "FULL", "INNER", "LEFT", "OUTER", "RIGHT"],
                )
            {
                keywords.push(p.take());
                if is_join {
                    break;
                }
            } else {
                break;
            }
        }
        let table = parse_table_source(p);
        let (on_token, condition) = if p.current().is_word("ON") {
            let on_token = p.take();
            let condition = parse_expression(p);
            (Some(on_token), Some(condition))
        } else {
            (None, None)
        };
        joins.push(JoinClause {
            keywords,
            table,
            on_token,
            condition,
        });
    }
    joins
}

/// `WITH` starts a CTE only when followed by a name and then `AS` or `(`;
/// anything else (table hints and the like) stays a raw statement.
fn parse_with(p: &mut Parser) -> Statement {
    let looks_like_cte = matches!(
        p.peek(1).kind,
        TokenKind::Word | TokenKind::QuotedIdentifier
    ) && (p.peek(2).is_word("AS") || p.peek(2).is_symbol("("));
    if !looks_like_cte {
        return Statement::Raw(parse_raw_run(p));
    }

    let with_token = p.take();
    let mut ctes = vec![parse_cte_definition(p)];
    while p.consume_symbol(",") {
        ctes.push(parse_cte_definition(p));
    }
    let body = Box::new(parse_statement(p));
    Statement::Cte(CteStatement {
        with_token,
        ctes,
        body,
    })
}

fn parse_cte_definition(p: &mut Parser) -> CteDefinition {
    let name = p.take();
    let columns = if p.current().is_symbol("(") {
        Some(parse_paren_group(p))
    } else {
        None
    };
    let as_token = p.expect_word("AS");
    let query = parse_paren_group(p);
    CteDefinition {
        name,
        columns,
        as_token,
        query,
    }
}

fn parse_insert(p: &mut Parser) -> InsertStatement {
    let insert_token = p.expect_word("INSERT");
    let into_token = p.consume_word("INTO");
    let target = parse_identifier_parts(p);
    let columns = if p.current().is_symbol("(") {
        Some(parse_paren_group(p))
    } else {
        None
    };

    let source = if p.current().is_word("VALUES") {
        let values_token = p.take();
        let mut rows = vec![parse_paren_group(p)];
        while p.consume_symbol(",") {
            rows.push(parse_paren_group(p));
        }
        InsertSource::Values { values_token, rows }
    } else if p.current().is_word("SELECT") || p.current().is_word("WITH") {
        InsertSource::Query(Box::new(parse_statement(p)))
    } else {
        InsertSource::Raw(parse_raw_run(p).tokens)
    };

    let semicolon = take_semicolon(p);
    InsertStatement {
        insert_token,
        into_token,
        target,
        columns,
        source,
        semicolon,
    }
}

fn parse_update(p: &mut Parser) -> UpdateStatement {
    let update_token = p.expect_word("UPDATE");
    let top = parse_top(p);
    let target = parse_identifier_parts(p);
    let set_token = p.expect_word("SET");

    let mut assignments = vec![parse_assignment(p)];
    while p.consume_symbol(",") {
        assignments.push(parse_assignment(p));
    }

    let from = parse_from_clause(p);
    let joins = parse_join_clauses(p);
    let where_clause = parse_condition_clause(p, "WHERE");
    let semicolon = take_semicolon(p);

    UpdateStatement {
        update_token,
        top,
        target,
        set_token,
        assignments,
        from,
        joins,
        where_clause,
        semicolon,
    }
}

fn parse_assignment(p: &mut Parser) -> Assignment {
    let target = crate::parser::expr::parse_table_name(p);
    let op = p.expect_symbol("=");
    let value = parse_expression(p);
    Assignment { target, op, value }
}

fn parse_delete(p: &mut Parser) -> DeleteStatement {
    let delete_token = p.expect_word("DELETE");
    let top = parse_top(p);
    let from_token = p.consume_word("FROM");
    let target = parse_identifier_parts(p);
    let from = parse_from_clause(p);
    let joins = parse_join_clauses(p);
    let where_clause = parse_condition_clause(p, "WHERE");
    let semicolon = take_semicolon(p);
    DeleteStatement {
        delete_token,
        top,
        from_token,
        target,
        from,
        joins,
        where_clause,
        semicolon,
    }
}

/// `BEGIN` opens a block unless it introduces a transaction statement.
fn parse_begin(p: &mut Parser) -> Statement {
    if p.peek(1).is_word("TRAN") || p.peek(1).is_word("TRANSACTION")
        || p.peek(1).is_word("TRY") || p.peek(1).is_word("CATCH")
    {
        return Statement::Raw(parse_raw_run(p));
    }
    let begin_token = p.take();
    let mut statements = Vec::new();
    while !p.at_eof()
        && !p.current().is_word("END")
        && p.current().kind != TokenKind::BatchSeparator
    {
        statements.push(parse_statement(p));
    }
    let end_token = p.expect_word("END");
    let semicolon = take_semicolon(p);
    Statement::BeginEnd(BeginEndBlock {
        begin_token,
        statements,
        end_token,
        semicolon,
    })
}

fn parse_if(p: &mut Parser) -> IfStatement {
    let if_token = p.expect_word("IF");
    let condition = parse_expression(p);
    let then_branch = Box::new(parse_statement(p));
    let (else_token, else_branch) = if p.current().is_word("ELSE") {
        let token = p.take();
        let branch = Box::new(parse_statement(p));
        (Some(token), Some(branch))
    } else {
        (None, None)
    };
    IfStatement {
        if_token,
        condition,
        then_branch,
        else_token,
        else_branch,
    }
}

fn parse_declare(p: &mut Parser) -> DeclareStatement {
    let declare_token = p.expect_word("DECLARE");
    let mut declarations = vec![parse_variable_declaration(p)];
    while p.consume_symbol(",") {
        declarations.push(parse_variable_declaration(p));
    }
    let semicolon = take_semicolon(p);
    DeclareStatement {
        declare_token,
        declarations,
        semicolon,
    }
}

fn parse_variable_declaration(p: &mut Parser) -> VariableDeclaration {
    let name = p.take();
    let as_token = p.consume_word("AS");
    let data_type = parse_data_type(p);
    let (eq_token, default) = if p.current().is_symbol("=") {
        let eq = p.take();
        let default = parse_expression(p);
        (Some(eq), Some(default))
    } else {
        (None, None)
    };
    VariableDeclaration {
        name,
        as_token,
        data_type,
        eq_token,
        default,
    }
}

fn parse_set(p: &mut Parser) -> SetStatement {
    let set_token = p.expect_word("SET");
    let target = p.take();
    if p.current().is_symbol("=") {
        let op = p.take();
        let value = parse_expression(p);
        let semicolon = take_semicolon(p);
        return SetStatement {
            set_token,
            target,
            op: Some(op),
            value: Some(value),
            option_tokens: Vec::new(),
            semicolon,
        };
    }

    // SET option form: capture the remainder of the statement raw
    let mut option_tokens = Vec::new();
    loop {
        let current = p.current();
        if p.at_eof()
            || current.kind == TokenKind::BatchSeparator
            || current.is_symbol(";")
            || in_word_list(current, STATEMENT_START_WORDS)
        {
            break;
        }
        option_tokens.push(p.take());
    }
    let semicolon = take_semicolon(p);
    SetStatement {
        set_token,
        target,
        op: None,
        value: None,
        option_tokens,
        semicolon,
    }
}

fn parse_print(p: &mut Parser) -> PrintStatement {
    let print_token = p.expect_word("PRINT");
    let value = parse_expression(p);
    let semicolon = take_semicolon(p);
    PrintStatement {
        print_token,
        value,
        semicolon,
    }
}

fn parse_return(p: &mut Parser) -> ReturnStatement {
    let return_token = p.expect_word("RETURN");
    let value = if p.at_eof()
        || p.current().is_symbol(";")
        || p.current().kind == TokenKind::BatchSeparator
        || in_word_list(p.current(), STATEMENT_START_WORDS)
        || p.current().is_word("END")
    {
        None
    } else {
        Some(parse_expression(p))
    };
    let semicolon = take_semicolon(p);
    ReturnStatement {
        return_token,
        value,
        semicolon,
    }
}

fn parse_create_table(p: &mut Parser) -> CreateTableStatement {
    let create_token = p.expect_word("CREATE");
    let table_token = p.expect_word("TABLE");
    let name = parse_identifier_parts(p);
    let lparen = p.expect_symbol("(");

    let mut elements = Vec::new();
    loop {
        if p.at_eof() || p.current().is_symbol(")") {
            break;
        }
        elements.push(parse_table_element(p));
        if !p.current().is_symbol(",") {
            break;
        }
        p.discard();
    }

    let rparen = p.expect_symbol(")");
    let semicolon = take_semicolon(p);
    CreateTableStatement {
        create_token,
        table_token,
        name,
        lparen,
        elements,
        rparen,
        semicolon,
    }
}

fn parse_table_element(p: &mut Parser) -> TableElement {
    if in_word_list(
        p.current(),
        &["CHECK", "CONSTRAINT", "FOREIGN", "PRIMARY", "UNIQUE"],
    ) {
        return TableElement::Constraint(TableConstraint {
            tokens: take_balanced_run(p),
        });
    }
    let name = p.take();
    let data_type = parse_data_type(p);
    let options = take_balanced_run(p);
    TableElement::Column(ColumnDefinition {
        name,
        data_type,
        options,
    })
}

/// Consume tokens up to a top-level `,` or `)`, balancing nested parens so
/// `DEFAULT (GETDATE())` and `IDENTITY(1, 1)` stay in one run.
fn take_balanced_run(p: &mut Parser) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    loop {
        let current = p.current();
        if p.at_eof() || current.kind == TokenKind::BatchSeparator {
            break;
        }
        if depth == 0 && (current.is_symbol(",") || current.is_symbol(")") || current.is_symbol(";"))
        {
            break;
        }
        let token = p.take();
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth = depth.saturating_sub(1);
        }
        tokens.push(token);
    }
    tokens
}

fn parse_alter_table(p: &mut Parser) -> AlterTableStatement {
    let alter_token = p.expect_word("ALTER");
    let table_token = p.expect_word("TABLE");
    let name = parse_identifier_parts(p);

    let mut action = Vec::new();
    let mut depth = 0usize;
    loop {
        let current = p.current();
        if p.at_eof() || current.kind == TokenKind::BatchSeparator {
            break;
        }
        if depth == 0 && current.is_symbol(";") {
            break;
        }
        if depth == 0 && in_word_list(current, STATEMENT_START_WORDS) {
            break;
        }
        let token = p.take();
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth = depth.saturating_sub(1);
        }
        action.push(token);
    }
    let semicolon = take_semicolon(p);
    AlterTableStatement {
        alter_token,
        table_token,
        name,
        action,
        semicolon,
    }
}

fn parse_drop_table(p: &mut Parser) -> DropTableStatement {
    let drop_token = p.expect_word("DROP");
    let table_token = p.expect_word("TABLE");
    let mut if_exists = Vec::new();
    if p.current().is_word("IF") && p.peek(1).is_word("EXISTS") {
        if_exists.push(p.take());
        if_exists.push(p.take());
    }
    let mut names = vec![parse_identifier_parts(p)];
    while p.consume_symbol(",") {
        names.push(parse_identifier_parts(p));
    }
    let semicolon = take_semicolon(p);
    DropTableStatement {
        drop_token,
        table_token,
        if_exists,
        names,
        semicolon,
    }
}
