//! Parser tests for tsqlfmt
//!
//! The parser never fails: malformed input degrades to raw token runs and
//! every statement parser guarantees forward progress.

use tsqlfmt::ast::*;
use tsqlfmt::parser::parse;

fn single_statement(input: &str) -> Statement {
    let script = parse(input);
    assert_eq!(script.batches.len(), 1, "expected one batch");
    assert_eq!(
        script.batches[0].statements.len(),
        1,
        "expected one statement"
    );
    script.batches[0].statements[0].clone()
}

fn select_of(input: &str) -> SelectStatement {
    match single_statement(input) {
        Statement::Select(s) => s,
        other => panic!("expected SELECT, got {other:?}"),
    }
}

mod batches {
    use super::*;

    #[test]
    fn go_splits_batches() {
        let script = parse("SELECT 1\nGO\nSELECT 2");
        assert_eq!(script.batches.len(), 2);
        assert!(script.batches[0].separator.is_some());
        assert!(script.batches[1].separator.is_none());
    }

    #[test]
    fn trailing_go_leaves_no_empty_batch() {
        let script = parse("SELECT 1\nGO\n");
        assert_eq!(script.batches.len(), 1);
        assert!(script.batches[0].separator.is_some());
    }

    #[test]
    fn empty_input_is_one_empty_batch() {
        let script = parse("");
        assert_eq!(script.batches.len(), 1);
        assert!(script.batches[0].statements.is_empty());
    }
}

mod select_clauses {
    use super::*;

    #[test]
    fn clauses_are_captured() {
        let s = select_of(
            "SELECT DISTINCT TOP 10 a, b FROM t WHERE a = 1 GROUP BY a HAVING COUNT(*) > 1 ORDER BY a DESC",
        );
        assert!(s.distinct_token.is_some());
        assert!(s.top.is_some());
        assert_eq!(s.columns.len(), 2);
        assert!(s.from.is_some());
        assert!(s.where_clause.is_some());
        assert!(s.group_by.is_some());
        assert!(s.having.is_some());
        assert!(s.order_by.is_some());
    }

    #[test]
    fn union_tail_is_chained() {
        let s = select_of("SELECT a FROM t UNION ALL SELECT b FROM u");
        let union = s.union.expect("union tail");
        assert_eq!(union.op_tokens.len(), 2);
        assert_eq!(union.query.columns.len(), 1);
    }

    #[test]
    fn semicolon_is_recorded() {
        assert!(select_of("SELECT 1;").semicolon.is_some());
        assert!(select_of("SELECT 1").semicolon.is_none());
    }

    #[test]
    fn select_star_parses() {
        let s = select_of("SELECT * FROM t");
        assert!(matches!(s.columns[0].expr.kind, ExprKind::Star(_)));
    }
}

mod aliases {
    use super::*;

    #[test]
    fn explicit_as_alias() {
        let s = select_of("SELECT a AS x FROM t");
        assert!(s.columns[0].as_token.is_some());
        assert_eq!(s.columns[0].alias.as_ref().unwrap().text, "x");
    }

    #[test]
    fn bare_alias() {
        let s = select_of("SELECT a x FROM t");
        assert!(s.columns[0].as_token.is_none());
        assert_eq!(s.columns[0].alias.as_ref().unwrap().text, "x");
    }

    #[test]
    fn clause_keyword_is_not_an_alias() {
        let s = select_of("SELECT a FROM t WHERE a = 1");
        assert!(s.columns[0].alias.is_none());
        match &s.from.unwrap().tables[0].kind {
            ExprKind::Identifier(id) => assert!(id.alias.is_none()),
            other => panic!("expected identifier table, got {other:?}"),
        }
    }

    #[test]
    fn bare_table_alias() {
        let s = select_of("SELECT a FROM t x WHERE a = 1");
        match &s.from.unwrap().tables[0].kind {
            ExprKind::Identifier(id) => assert_eq!(id.alias.as_ref().unwrap().text, "x"),
            other => panic!("expected identifier table, got {other:?}"),
        }
    }
}

mod expressions {
    use super::*;

    fn where_condition(input: &str) -> Expr {
        select_of(input).where_clause.expect("where").condition
    }

    #[test]
    fn between_owns_its_and() {
        let cond = where_condition("SELECT a FROM t WHERE x BETWEEN 1 AND 2");
        match cond.kind {
            ExprKind::Between(b) => {
                assert!(matches!(b.low.kind, ExprKind::Literal(_)));
                assert!(matches!(b.high.kind, ExprKind::Literal(_)));
            }
            other => panic!("expected BETWEEN, got {other:?}"),
        }
    }

    #[test]
    fn and_after_between_is_a_boolean_conjunction() {
        let cond = where_condition("SELECT a FROM t WHERE x BETWEEN 1 AND 2 AND y > 1");
        match cond.kind {
            ExprKind::Binary { left, op, right } => {
                assert!(op.is_word("AND"));
                assert!(matches!(left.kind, ExprKind::Between(_)));
                assert!(matches!(right.kind, ExprKind::Binary { .. }));
            }
            other => panic!("expected AND over BETWEEN, got {other:?}"),
        }
    }

    #[test]
    fn source_parentheses_are_stamped() {
        let cond = where_condition("SELECT a FROM t WHERE a = 1 AND (b = 2 OR c = 3)");
        match cond.kind {
            ExprKind::Binary { right, .. } => {
                assert!(right.parenthesized, "inner OR group keeps its parens");
                assert!(matches!(
                    right.kind,
                    ExprKind::Binary { ref op, .. } if op.is_word("OR")
                ));
            }
            other => panic!("expected AND chain, got {other:?}"),
        }
    }

    #[test]
    fn precedence_of_arithmetic_over_comparison() {
        let cond = where_condition("SELECT a FROM t WHERE a + 1 = b * 2");
        match cond.kind {
            ExprKind::Binary { left, op, right } => {
                assert_eq!(op.text, "=");
                assert!(matches!(left.kind, ExprKind::Binary { .. }));
                assert!(matches!(right.kind, ExprKind::Binary { .. }));
            }
            other => panic!("expected comparison, got {other:?}"),
        }
    }

    #[test]
    fn in_list_and_in_subquery() {
        let cond = where_condition("SELECT a FROM t WHERE x IN (1, 2, 3)");
        match cond.kind {
            ExprKind::In(in_expr) => match in_expr.group.body {
                ParenBody::Exprs(exprs) => assert_eq!(exprs.len(), 3),
                other => panic!("expected list, got {other:?}"),
            },
            other => panic!("expected IN, got {other:?}"),
        }
        let cond = where_condition("SELECT a FROM t WHERE x IN (SELECT a FROM u)");
        match cond.kind {
            ExprKind::In(in_expr) => {
                assert!(matches!(in_expr.group.body, ParenBody::Query(_)));
            }
            other => panic!("expected IN subquery, got {other:?}"),
        }
    }

    #[test]
    fn is_not_null_parses_as_binary_is() {
        let cond = where_condition("SELECT a FROM t WHERE x IS NOT NULL");
        match cond.kind {
            ExprKind::Binary { op, right, .. } => {
                assert!(op.is_word("IS"));
                assert!(matches!(right.kind, ExprKind::Unary { .. }));
            }
            other => panic!("expected IS, got {other:?}"),
        }
    }

    #[test]
    fn function_call_with_distinct_argument() {
        let s = select_of("SELECT COUNT(DISTINCT a) FROM t");
        match &s.columns[0].expr.kind {
            ExprKind::FunctionCall(call) => {
                assert_eq!(call.name.name(), "COUNT");
                assert!(matches!(call.args[0].kind, ExprKind::Unary { .. }));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn over_clause_is_captured_as_a_run() {
        let s = select_of("SELECT ROW_NUMBER() OVER (PARTITION BY a ORDER BY b) FROM t");
        match &s.columns[0].expr.kind {
            ExprKind::FunctionCall(call) => {
                let over = call.over.as_ref().expect("over clause");
                assert!(over.tokens.iter().any(|t| t.is_word("PARTITION")));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }
}

mod cte {
    use super::*;

    #[test]
    fn with_starts_a_cte_when_followed_by_name_and_as() {
        let stmt = single_statement("WITH x AS (SELECT 1) SELECT * FROM x");
        match stmt {
            Statement::Cte(cte) => {
                assert_eq!(cte.ctes.len(), 1);
                assert_eq!(cte.ctes[0].name.text, "x");
                assert!(matches!(*cte.body, Statement::Select(_)));
            }
            other => panic!("expected CTE, got {other:?}"),
        }
    }

    #[test]
    fn with_hint_shape_degrades_to_raw() {
        let script = parse("WITH (NOLOCK) SELECT 1");
        assert!(matches!(
            script.batches[0].statements[0],
            Statement::Raw(_)
        ));
    }

    #[test]
    fn multiple_ctes() {
        let stmt = single_statement("WITH a AS (SELECT 1), b (x) AS (SELECT 2) SELECT * FROM a");
        match stmt {
            Statement::Cte(cte) => {
                assert_eq!(cte.ctes.len(), 2);
                assert!(cte.ctes[1].columns.is_some());
            }
            other => panic!("expected CTE, got {other:?}"),
        }
    }
}

mod tables {
    use super::*;

    #[test]
    fn derived_table_with_alias() {
        let s = select_of("SELECT a FROM (SELECT a FROM t) x");
        match &s.from.unwrap().tables[0].kind {
            ExprKind::Aliased { expr, alias, .. } => {
                assert!(matches!(expr.kind, ExprKind::Group(_)));
                assert_eq!(alias.text, "x");
            }
            other => panic!("expected aliased derived table, got {other:?}"),
        }
    }

    #[test]
    fn joins_capture_keyword_runs() {
        let s = select_of("SELECT a FROM t LEFT OUTER JOIN u ON t.id = u.id");
        assert_eq!(s.joins.len(), 1);
        let kw: Vec<String> = s.joins[0].keywords.iter().map(|t| t.upper()).collect();
        assert_eq!(kw, ["LEFT", "OUTER", "JOIN"]);
        assert!(s.joins[0].condition.is_some());
    }

    #[test]
    fn pivot_attaches_to_the_table_reference() {
        let s = select_of("SELECT a FROM t PIVOT (SUM(x) FOR col IN (a, b)) p");
        match &s.from.unwrap().tables[0].kind {
            ExprKind::Identifier(id) => {
                let pivot = id.pivot.as_ref().expect("pivot attachment");
                assert!(pivot.pivot_token.is_word("PIVOT"));
                assert_eq!(pivot.alias.as_ref().unwrap().text, "p");
            }
            other => panic!("expected pivoted identifier, got {other:?}"),
        }
    }
}

mod other_statements {
    use super::*;

    #[test]
    fn exec_degrades_to_a_raw_run() {
        let stmt = single_statement("EXEC dbo.proc_name @p = 1");
        match stmt {
            Statement::Raw(raw) => {
                assert!(raw.tokens[0].is_word("EXEC"));
                assert!(raw.tokens.iter().any(|t| t.text == "@p"));
            }
            other => panic!("expected raw statement, got {other:?}"),
        }
    }

    #[test]
    fn missing_data_type_substitutes_a_sentinel() {
        let stmt = single_statement("CREATE TABLE t (col NOT NULL)");
        match stmt {
            Statement::CreateTable(create) => match &create.elements[0] {
                TableElement::Column(col) => {
                    assert_eq!(col.name.text, "col");
                    match &col.data_type.kind {
                        ExprKind::Identifier(id) => assert_eq!(id.name(), ""),
                        other => panic!("expected sentinel, got {other:?}"),
                    }
                    assert!(col.options.iter().any(|t| t.is_word("NOT")));
                }
                other => panic!("expected column, got {other:?}"),
            },
            other => panic!("expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn if_else_with_blocks() {
        let stmt = single_statement("IF x = 1 BEGIN SELECT 1 END ELSE BEGIN SELECT 2 END");
        match stmt {
            Statement::IfElse(s) => {
                assert!(matches!(*s.then_branch, Statement::BeginEnd(_)));
                assert!(matches!(s.else_branch.as_deref(), Some(Statement::BeginEnd(_))));
            }
            other => panic!("expected IF, got {other:?}"),
        }
    }

    #[test]
    fn declare_with_default() {
        let stmt = single_statement("DECLARE @a INT = 1, @b VARCHAR(10)");
        match stmt {
            Statement::Declare(s) => {
                assert_eq!(s.declarations.len(), 2);
                assert!(s.declarations[0].default.is_some());
                assert!(matches!(
                    s.declarations[1].data_type.kind,
                    ExprKind::FunctionCall(_)
                ));
            }
            other => panic!("expected DECLARE, got {other:?}"),
        }
    }

    #[test]
    fn set_variable_and_set_option() {
        match single_statement("SET @x = 5") {
            Statement::SetVariable(s) => assert!(s.op.is_some()),
            other => panic!("expected SET, got {other:?}"),
        }
        match single_statement("SET NOCOUNT ON") {
            Statement::SetVariable(s) => {
                assert!(s.op.is_none());
                assert!(s.option_tokens.iter().any(|t| t.is_word("ON")));
            }
            other => panic!("expected SET, got {other:?}"),
        }
    }

    #[test]
    fn bare_case_expression_statement() {
        let stmt = single_statement("CASE WHEN x = 1 THEN 'a' ELSE 'b' END");
        match stmt {
            Statement::Expr(s) => assert!(matches!(s.expr.kind, ExprKind::Case(_))),
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn unknown_leading_token_degrades_to_a_single_raw_token() {
        let script = parse("frobnicate SELECT 1");
        let statements = &script.batches[0].statements;
        assert!(matches!(statements[0], Statement::Raw(_)));
        assert!(matches!(statements[1], Statement::Select(_)));
    }

    #[test]
    fn update_and_delete_shapes() {
        match single_statement("UPDATE t SET a = 1 WHERE b = 2") {
            Statement::Update(s) => {
                assert_eq!(s.assignments.len(), 1);
                assert!(s.where_clause.is_some());
            }
            other => panic!("expected UPDATE, got {other:?}"),
        }
        match single_statement("DELETE FROM t WHERE a = 1") {
            Statement::Delete(s) => {
                assert!(s.from_token.is_some());
                assert!(s.where_clause.is_some());
            }
            other => panic!("expected DELETE, got {other:?}"),
        }
    }

    #[test]
    fn insert_values_and_insert_select() {
        match single_statement("INSERT INTO t (a, b) VALUES (1, 2), (3, 4)") {
            Statement::Insert(s) => {
                assert!(s.columns.is_some());
                match s.source {
                    InsertSource::Values { rows, .. } => assert_eq!(rows.len(), 2),
                    other => panic!("expected VALUES, got {other:?}"),
                }
            }
            other => panic!("expected INSERT, got {other:?}"),
        }
        match single_statement("INSERT INTO t SELECT a FROM u") {
            Statement::Insert(s) => assert!(matches!(s.source, InsertSource::Query(_))),
            other => panic!("expected INSERT, got {other:?}"),
        }
    }
}
