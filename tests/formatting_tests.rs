//! Formatting tests for tsqlfmt
//!
//! End-to-end coverage of the collapse-or-expand choice, comment fidelity,
//! casing, bracketing, alignment, wrapping, and idempotence under several
//! materially different style configurations.

use pretty_assertions::assert_eq;
use tsqlfmt::config::parse_style_json;
use tsqlfmt::FormatConfig;

fn fmt(input: &str) -> String {
    tsqlfmt::format(input)
}

fn fmt_cfg(input: &str, style: &str) -> String {
    let config = parse_style_json(style).expect("style should parse");
    tsqlfmt::format_with_config(input, &config)
}

/// Format twice under the same config and require a fixed point.
fn assert_idempotent_with(input: &str, config: &FormatConfig) {
    let once = tsqlfmt::format_with_config(input, config);
    let twice = tsqlfmt::format_with_config(&once, config);
    assert_eq!(once, twice, "formatting should be idempotent");
}

const NO_COLLAPSE: &str = r#"{"dml": {"collapseShortStatements": false}}"#;

// =============================================================================
// COLLAPSE-OR-EXPAND
// =============================================================================

mod collapse {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_select_collapses_to_one_line() {
        assert_eq!(fmt("select a, b from t"), "SELECT a, b FROM t\n");
    }

    #[test]
    fn collapse_is_skipped_when_disabled() {
        assert_eq!(
            fmt_cfg("SELECT a, b, c FROM t", NO_COLLAPSE),
            "SELECT\n    a,\n    b,\n    c\nFROM t\n"
        );
    }

    #[test]
    fn long_statements_expand_past_the_threshold() {
        let input = "SELECT first_column, second_column, third_column, fourth_column, fifth_column FROM some_schema.some_table";
        let out = fmt(input);
        assert!(out.lines().count() > 1, "should expand: {out}");
        assert!(out.contains("    first_column,"));
    }

    #[test]
    fn short_update_collapses() {
        assert_eq!(
            fmt("UPDATE t SET a = 1, b = 2 WHERE c = 3"),
            "UPDATE t SET a = 1, b = 2 WHERE c = 3\n"
        );
    }

    #[test]
    fn update_expands_when_disabled() {
        assert_eq!(
            fmt_cfg("UPDATE t SET a = 1, b = 2 WHERE c = 3", NO_COLLAPSE),
            "UPDATE t\nSET\n    a = 1,\n    b = 2\nWHERE c = 3\n"
        );
    }
}

// =============================================================================
// COMMAS
// =============================================================================

mod commas {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leading_commas_when_configured() {
        let style = r#"{
            "dml": {"collapseShortStatements": false},
            "lists": {"commas": {"placeCommasBeforeItems": true}}
        }"#;
        assert_eq!(
            fmt_cfg("SELECT a, b, c FROM t", style),
            "SELECT\n    a\n    , b\n    , c\nFROM t\n"
        );
    }

    #[test]
    fn leading_comma_input_normalizes_to_trailing_commas() {
        // Column order is preserved: a, then b, then c
        assert_eq!(
            fmt_cfg("SELECT a\n, b\n, c\nFROM t", NO_COLLAPSE),
            "SELECT\n    a,\n    b,\n    c\nFROM t\n"
        );
    }
}

// =============================================================================
// CASING AND BRACKETS
// =============================================================================

mod casing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keywords_uppercase_by_default() {
        let out = fmt("select a from t where a = 1");
        assert!(out.contains("SELECT") && out.contains("FROM") && out.contains("WHERE"));
    }

    #[test]
    fn lowercase_casing_leaves_identifiers_untouched() {
        let style = r#"{"casing": {
            "keywords": "lowercase",
            "functions": "lowercase",
            "dataTypes": "lowercase",
            "globalVariables": "lowercase"
        }}"#;
        assert_eq!(
            fmt_cfg("SELECT GETDATE(), MyCol FROM T", style),
            "select getdate(), MyCol from T\n"
        );
    }

    #[test]
    fn functions_and_keywords_case_independently() {
        let style = r#"{"casing": {"keywords": "uppercase", "functions": "lowercase"}}"#;
        assert_eq!(
            fmt_cfg("select getdate() from t", style),
            "SELECT getdate() FROM t\n"
        );
    }

    #[test]
    fn data_types_follow_their_own_category() {
        let style = r#"{"casing": {"keywords": "lowercase", "dataTypes": "uppercase"}}"#;
        let out = fmt_cfg("DECLARE @a int", style);
        assert_eq!(out, "declare @a INT\n");
    }

    #[test]
    fn global_variables_are_cased_as_their_category() {
        let style = r#"{"casing": {"globalVariables": "lowercase"}}"#;
        assert_eq!(fmt_cfg("SELECT @@rowcount", style), "SELECT @@rowcount\n");
        assert_eq!(fmt("SELECT @@rowcount"), "SELECT @@ROWCOUNT\n");
    }

    #[test]
    fn asis_preserves_source_casing() {
        let style = r#"{"casing": {"keywords": "asis"}}"#;
        assert_eq!(fmt_cfg("SeLeCt a FrOm t", style), "SeLeCt a FrOm t\n");
    }
}

mod brackets {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bracket_all_identifiers() {
        let style = r#"{"brackets": {"identifiers": "all"}}"#;
        assert_eq!(fmt_cfg("SELECT a FROM t", style), "SELECT [a] FROM [t]\n");
    }

    #[test]
    fn variables_are_never_bracketed() {
        let style = r#"{"brackets": {"identifiers": "all"}}"#;
        assert_eq!(fmt_cfg("SELECT @x", style), "SELECT @x\n");
    }

    #[test]
    fn brackets_are_stripped_when_safe() {
        assert_eq!(fmt("SELECT [a] FROM [t]"), "SELECT a FROM t\n");
    }

    #[test]
    fn reserved_word_brackets_are_preserved() {
        assert_eq!(fmt("SELECT [select] FROM t"), "SELECT [select] FROM t\n");
    }

    #[test]
    fn brackets_with_spaces_inside_are_kept() {
        assert_eq!(fmt("SELECT [my col] FROM t"), "SELECT [my col] FROM t\n");
    }

    #[test]
    fn double_quote_syntax_is_normalized() {
        assert_eq!(fmt("SELECT \"a\" FROM t"), "SELECT a FROM t\n");
        let style = r#"{"brackets": {"identifiers": "all"}}"#;
        assert_eq!(fmt_cfg("SELECT \"a\" FROM t", style), "SELECT [a] FROM [t]\n");
    }
}

// =============================================================================
// PARENTHESES AND SUBQUERIES
// =============================================================================

mod parentheses {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn source_parentheses_survive_formatting() {
        let out = fmt("SELECT a FROM t WHERE a = 1 AND (b = 2 OR c = 3)");
        assert!(out.contains("(b = 2 OR c = 3)"), "got: {out}");
    }

    #[test]
    fn short_subqueries_collapse_inline() {
        assert_eq!(
            fmt_cfg("SELECT a FROM (SELECT b FROM t) x", NO_COLLAPSE),
            "SELECT\n    a\nFROM (SELECT b FROM t) x\n"
        );
    }

    #[test]
    fn subqueries_expand_past_their_own_threshold() {
        let style = r#"{"dml": {
            "collapseShortStatements": false,
            "subqueryCollapseThreshold": 10
        }}"#;
        assert_eq!(
            fmt_cfg("SELECT a FROM (SELECT b FROM t) x", style),
            "SELECT\n    a\nFROM\n(\n    SELECT\n        b\n    FROM t\n) x\n"
        );
    }

    #[test]
    fn compact_paren_style_keeps_the_open_paren_on_the_line() {
        let style = r#"{
            "dml": {"collapseShortStatements": false, "subqueryCollapseThreshold": 10},
            "parentheses": {"style": "compactToStatement"}
        }"#;
        let out = fmt_cfg("SELECT a FROM (SELECT b FROM t) x", style);
        assert!(out.contains("FROM (\n"), "got: {out}");
        assert!(out.contains("\n) x\n"), "got: {out}");
    }

    #[test]
    fn to_parenthesis_styles_indent_the_closer() {
        let style = r#"{
            "dml": {"collapseShortStatements": false, "subqueryCollapseThreshold": 10},
            "parentheses": {"style": "expandedToParenthesis"}
        }"#;
        let out = fmt_cfg("SELECT a FROM (SELECT b FROM t) x", style);
        assert!(out.contains("\n    ) x\n"), "got: {out}");
    }
}

// =============================================================================
// CONDITIONS AND OPERATORS
// =============================================================================

mod conditions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn and_or_chain_breaks_one_connective_per_line() {
        assert_eq!(
            fmt_cfg("SELECT a FROM t WHERE a = 1 AND b = 2 OR c = 3", NO_COLLAPSE),
            "SELECT\n    a\nFROM t\nWHERE a = 1\n  AND b = 2\n   OR c = 3\n"
        );
    }

    #[test]
    fn chain_stays_inline_when_configured() {
        let style = r#"{
            "dml": {"collapseShortStatements": false},
            "operators": {"andOr": {"placeOnNewLine": false}}
        }"#;
        assert_eq!(
            fmt_cfg("SELECT a FROM t WHERE a = 1 AND b = 2", style),
            "SELECT\n    a\nFROM t\nWHERE a = 1 AND b = 2\n"
        );
    }

    #[test]
    fn comparison_operators_align_when_enabled() {
        let style = r#"{
            "dml": {"collapseShortStatements": false},
            "operators": {"comparison": {"alignOperators": true}}
        }"#;
        assert_eq!(
            fmt_cfg("SELECT a FROM t WHERE alpha = 1 AND b = 2", style),
            "SELECT\n    a\nFROM t\nWHERE alpha = 1\n  AND b     = 2\n"
        );
    }

    #[test]
    fn comparison_columns_differ_when_alignment_is_off() {
        let out = fmt_cfg("SELECT a FROM t WHERE alpha = 1 AND b = 2", NO_COLLAPSE);
        let eq_cols: Vec<usize> = out
            .lines()
            .filter(|l| l.contains('='))
            .map(|l| l.find('=').unwrap())
            .collect();
        assert_eq!(eq_cols.len(), 2);
        assert_ne!(eq_cols[0], eq_cols[1]);
    }

    #[test]
    fn between_keeps_its_and_inline() {
        assert_eq!(
            fmt("SELECT a FROM t WHERE x BETWEEN 1 AND 2 AND y > 1"),
            "SELECT a FROM t WHERE x BETWEEN 1 AND 2 AND y > 1\n"
        );
    }
}

// =============================================================================
// CASE EXPRESSIONS
// =============================================================================

mod case_expressions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_case_collapses_when_enabled() {
        let out = fmt("CASE WHEN x = 1 THEN 'a' ELSE 'b' END");
        assert_eq!(out, "CASE WHEN x = 1 THEN 'a' ELSE 'b' END\n");
    }

    #[test]
    fn case_expands_when_collapsing_is_disabled() {
        let style = r#"{"caseExpressions": {"collapseShortCaseExpressions": false}}"#;
        let out = fmt_cfg("CASE WHEN x = 1 THEN 'a' ELSE 'b' END", style);
        assert_eq!(out, "CASE\n    WHEN x = 1 THEN 'a'\n    ELSE 'b'\nEND\n");
        assert!(out.lines().count() >= 4);
    }

    #[test]
    fn case_with_input_expression() {
        let out = fmt("SELECT CASE x WHEN 1 THEN 'a' END FROM t");
        assert_eq!(out, "SELECT CASE x WHEN 1 THEN 'a' END FROM t\n");
    }
}

// =============================================================================
// JOINS
// =============================================================================

mod joins {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn joins_go_on_their_own_lines_when_expanded() {
        assert_eq!(
            fmt_cfg(
                "SELECT a FROM t1 JOIN t2 ON t1.id = t2.id WHERE x = 1",
                NO_COLLAPSE
            ),
            "SELECT\n    a\nFROM t1\nJOIN t2 ON t1.id = t2.id\nWHERE x = 1\n"
        );
    }

    #[test]
    fn join_keyword_runs_are_preserved() {
        let out = fmt_cfg("SELECT a FROM t LEFT OUTER JOIN u ON t.id = u.id", NO_COLLAPSE);
        assert!(out.contains("\nLEFT OUTER JOIN u ON t.id = u.id"), "got: {out}");
    }

    #[test]
    fn on_condition_moves_to_its_own_line_when_configured() {
        let style = r#"{
            "dml": {"collapseShortStatements": false},
            "joins": {"onConditionOnNewLine": true}
        }"#;
        let out = fmt_cfg("SELECT a FROM t JOIN u ON t.id = u.id", style);
        assert!(out.contains("\nJOIN u\n    ON t.id = u.id"), "got: {out}");
    }

    #[test]
    fn joins_indent_when_configured() {
        let style = r#"{
            "dml": {"collapseShortStatements": false},
            "joins": {"indentJoins": true}
        }"#;
        let out = fmt_cfg("SELECT a FROM t JOIN u ON t.id = u.id", style);
        assert!(out.contains("\n    JOIN u ON t.id = u.id"), "got: {out}");
    }
}

// =============================================================================
// STATEMENT KINDS
// =============================================================================

mod statements {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_collapses_then_expands() {
        assert_eq!(
            fmt("INSERT INTO t (a, b) VALUES (1, 2)"),
            "INSERT INTO t (a, b) VALUES (1, 2)\n"
        );
        let style = r#"{"inserts": {"collapseShortInserts": false}}"#;
        assert_eq!(
            fmt_cfg("INSERT INTO t (a, b) VALUES (1, 2), (3, 4)", style),
            "INSERT INTO t (a, b)\nVALUES\n    (1, 2),\n    (3, 4)\n"
        );
    }

    #[test]
    fn insert_select_keeps_the_query_below() {
        let style = r#"{"inserts": {"collapseShortInserts": false}}"#;
        assert_eq!(
            fmt_cfg("INSERT INTO t (a) SELECT a FROM u", style),
            "INSERT INTO t (a)\nSELECT a FROM u\n"
        );
    }

    #[test]
    fn create_table_expands_by_default() {
        assert_eq!(
            fmt("CREATE TABLE dbo.t (id INT NOT NULL, name VARCHAR(50) NULL)"),
            "CREATE TABLE dbo.t\n(\n    id INT NOT NULL,\n    name VARCHAR(50) NULL\n)\n"
        );
    }

    #[test]
    fn create_table_aligns_data_types_when_enabled() {
        let style = r#"{"lists": {"alignDataTypes": true}}"#;
        assert_eq!(
            fmt_cfg("CREATE TABLE t (id INT, name VARCHAR(50))", style),
            "CREATE TABLE t\n(\n    id   INT,\n    name VARCHAR(50)\n)\n"
        );
    }

    #[test]
    fn create_table_collapses_when_enabled() {
        let style = r#"{"ddl": {"collapseShortDefinitions": true, "collapseThreshold": 120}}"#;
        assert_eq!(
            fmt_cfg("CREATE TABLE t (id INT)", style),
            "CREATE TABLE t (id INT)\n"
        );
    }

    #[test]
    fn if_else_expands_by_default() {
        assert_eq!(
            fmt("IF x = 1 SELECT 1 ELSE SELECT 2"),
            "IF x = 1\n    SELECT 1\nELSE\n    SELECT 2\n"
        );
    }

    #[test]
    fn if_else_collapses_when_enabled() {
        let style = r#"{"controlFlow": {"collapseShortBlocks": true, "collapseThreshold": 80}}"#;
        assert_eq!(
            fmt_cfg("IF x = 1 SELECT 1 ELSE SELECT 2", style),
            "IF x = 1 SELECT 1 ELSE SELECT 2\n"
        );
    }

    #[test]
    fn begin_end_blocks_indent_their_body() {
        assert_eq!(
            fmt("BEGIN SELECT 1 SELECT 2 END"),
            "BEGIN\n    SELECT 1\n    SELECT 2\nEND\n"
        );
    }

    #[test]
    fn declare_stays_inline_when_it_fits() {
        assert_eq!(
            fmt("DECLARE @a INT = 1, @b VARCHAR(10)"),
            "DECLARE @a INT = 1, @b VARCHAR(10)\n"
        );
    }

    #[test]
    fn cte_collapses_and_expands() {
        assert_eq!(
            fmt("WITH x AS (SELECT a FROM t) SELECT * FROM x"),
            "WITH x AS (SELECT a FROM t) SELECT * FROM x\n"
        );
        assert_eq!(
            fmt_cfg("WITH x AS (SELECT a FROM t) SELECT * FROM x", NO_COLLAPSE),
            "WITH x AS (SELECT a FROM t)\nSELECT\n    *\nFROM x\n"
        );
    }

    #[test]
    fn union_splits_between_queries() {
        assert_eq!(
            fmt_cfg("SELECT a FROM t UNION ALL SELECT b FROM u", NO_COLLAPSE),
            "SELECT\n    a\nFROM t\nUNION ALL\nSELECT\n    b\nFROM u\n"
        );
    }

    #[test]
    fn exec_is_reprinted_with_keyword_casing() {
        assert_eq!(fmt("exec dbo.proc_name @p = 1"), "EXEC dbo.proc_name @p = 1\n");
    }

    #[test]
    fn set_statements_round_trip() {
        assert_eq!(fmt("set nocount on"), "SET NOCOUNT ON\n");
        assert_eq!(fmt("SET @x = 5"), "SET @x = 5\n");
    }
}

// =============================================================================
// BATCHES AND BLANK LINES
// =============================================================================

mod batches {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn go_separates_batches() {
        assert_eq!(fmt("SELECT 1\nGO\nSELECT 2"), "SELECT 1\nGO\nSELECT 2\n");
    }

    #[test]
    fn go_is_cased_as_a_keyword() {
        let style = r#"{"casing": {"keywords": "lowercase"}}"#;
        assert_eq!(fmt_cfg("SELECT 1\nGO", style), "select 1\ngo\n");
    }

    #[test]
    fn blank_line_after_go_is_preserved() {
        assert_eq!(fmt("SELECT 1\nGO\n\nSELECT 2"), "SELECT 1\nGO\n\nSELECT 2\n");
    }

    #[test]
    fn blank_line_after_go_can_be_suppressed() {
        let style = r#"{"statements": {"blankLineAfterBatchSeparator": false}}"#;
        assert_eq!(
            fmt_cfg("SELECT 1\nGO\n\nSELECT 2", style),
            "SELECT 1\nGO\nSELECT 2\n"
        );
    }

    #[test]
    fn blank_lines_between_statements_collapse_to_one() {
        assert_eq!(fmt("SELECT 1\n\n\nSELECT 2"), "SELECT 1\n\nSELECT 2\n");
    }

    #[test]
    fn blank_lines_can_be_suppressed() {
        let style = r#"{"statements": {"preserveBlankLines": false}}"#;
        assert_eq!(fmt_cfg("SELECT 1\n\nSELECT 2", style), "SELECT 1\nSELECT 2\n");
    }
}

// =============================================================================
// COMMENTS
// =============================================================================

mod comments {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leading_comment_stays_above_its_statement() {
        assert_eq!(fmt("-- header\nSELECT 1"), "-- header\nSELECT 1\n");
    }

    #[test]
    fn trailing_comment_stays_on_its_line() {
        assert_eq!(fmt("SELECT 1 -- done"), "SELECT 1 -- done\n");
    }

    #[test]
    fn inner_comments_block_collapsing() {
        assert_eq!(
            fmt("-- header\nSELECT a, -- first\n    b\nFROM t -- src"),
            "-- header\nSELECT\n    a, -- first\n    b\nFROM t -- src\n"
        );
    }

    #[test]
    fn comment_between_statements_keeps_its_position() {
        assert_eq!(
            fmt("SELECT a FROM t\n-- between\nSELECT b FROM u -- end"),
            "SELECT a FROM t\n-- between\nSELECT b FROM u -- end\n"
        );
    }

    #[test]
    fn comment_at_end_of_script_is_kept() {
        assert_eq!(fmt("SELECT 1\n-- tail"), "SELECT 1\n-- tail\n");
    }

    #[test]
    fn block_comments_are_preserved_verbatim() {
        let out = fmt("/* keep /* nested */ text */\nSELECT 1");
        assert_eq!(out, "/* keep /* nested */ text */\nSELECT 1\n");
    }

    #[test]
    fn every_comment_appears_exactly_once() {
        let input = "-- one\nSELECT a, -- two\n    b\nFROM t -- three\n-- four";
        let out = fmt(input);
        for marker in ["-- one", "-- two", "-- three", "-- four"] {
            assert_eq!(
                out.matches(marker).count(),
                1,
                "{marker} should appear once in: {out}"
            );
        }
    }

    #[test]
    fn blank_lines_between_leading_comments_are_preserved() {
        assert_eq!(
            fmt("-- one\n\n-- two\nSELECT 1"),
            "-- one\n\n-- two\nSELECT 1\n"
        );
    }
}

// =============================================================================
// WRAPPING
// =============================================================================

mod wrapping {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn function_arguments_wrap_one_per_line() {
        let style = r#"{"whitespace": {"maxLineWidth": 40}}"#;
        assert_eq!(
            fmt_cfg(
                "SELECT CONCAT(aaaaaaaaaa, bbbbbbbbbb, cccccccccc, dddddddddd) FROM t",
                style
            ),
            "SELECT\n    CONCAT(\n        aaaaaaaaaa,\n        bbbbbbbbbb,\n        cccccccccc,\n        dddddddddd\n    )\nFROM t\n"
        );
    }

    #[test]
    fn binary_expressions_split_at_the_operator() {
        let style = r#"{"whitespace": {"maxLineWidth": 30}}"#;
        let out = fmt_cfg(
            "SELECT aaaaaaaaaaaa + bbbbbbbbbbbb + cccccccccccc FROM t",
            style,
        );
        assert!(out.contains("+ bbbbbbbbbbbb"), "got: {out}");
        for line in out.lines() {
            assert!(line.chars().count() <= 30, "line too wide: {line:?}");
        }
    }

    #[test]
    fn in_lists_pack_values_greedily() {
        let style = r#"{"whitespace": {"maxLineWidth": 44}}"#;
        let out = fmt_cfg(
            "SELECT a FROM t WHERE x IN (1111111, 2222222, 3333333, 4444444, 5555555, 6666666)",
            style,
        );
        assert!(out.lines().count() > 3, "IN list should wrap: {out}");
        assert_eq!(out.matches("1111111").count(), 1);
        assert_eq!(out.matches("6666666").count(), 1);
    }

    #[test]
    fn semicolons_can_be_inserted() {
        let style = r#"{"statements": {"insertSemicolons": true}}"#;
        assert_eq!(fmt_cfg("SELECT 1", style), "SELECT 1;\n");
        assert_eq!(fmt("SELECT 1;"), "SELECT 1;\n");
    }

    #[test]
    fn crlf_line_endings() {
        let style = r#"{
            "dml": {"collapseShortStatements": false},
            "statements": {"lineEnding": "crlf"}
        }"#;
        let out = fmt_cfg("SELECT a, b FROM t", style);
        assert!(out.contains("\r\n"));
        assert!(!out.replace("\r\n", "").contains('\n'));
    }
}

// =============================================================================
// ALIGNMENT
// =============================================================================

mod alignment {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aliases_align_when_enabled() {
        let style = r#"{
            "dml": {"collapseShortStatements": false},
            "lists": {"alignAliases": true}
        }"#;
        assert_eq!(
            fmt_cfg("SELECT a AS x, bbbb AS y, c FROM t", style),
            "SELECT\n    a    AS x,\n    bbbb AS y,\n    c\nFROM t\n"
        );
    }

    #[test]
    fn alias_columns_differ_without_alignment() {
        let out = fmt_cfg("SELECT a AS x, bbbb AS y FROM t", NO_COLLAPSE);
        let cols: Vec<usize> = out
            .lines()
            .filter(|l| l.contains(" AS "))
            .map(|l| l.find(" AS ").unwrap())
            .collect();
        assert_eq!(cols.len(), 2);
        assert_ne!(cols[0], cols[1]);
    }

    #[test]
    fn declare_names_align_when_enabled() {
        let style = r#"{
            "whitespace": {"maxLineWidth": 20},
            "lists": {"alignDataTypes": true}
        }"#;
        let out = fmt_cfg("DECLARE @a INT = 1, @bbb VARCHAR(10)", style);
        assert!(out.contains("@a   INT"), "got: {out}");
        assert!(out.contains("@bbb VARCHAR(10)"), "got: {out}");
    }
}

// =============================================================================
// IDEMPOTENCE
// =============================================================================

mod idempotence {
    use super::*;
    use pretty_assertions::assert_eq;

    const INPUTS: &[&str] = &[
        "select a, b from t",
        "SELECT a FROM t WHERE a = 1 AND (b = 2 OR c = 3)",
        "SELECT first_column, second_column, third_column, fourth_column, fifth_column FROM some_schema.some_table WHERE first_column = 1 AND second_column = 2 ORDER BY first_column",
        "-- header\nSELECT a, -- first\n    b\nFROM t -- src",
        "SELECT 1\nGO\n\nSELECT 2",
        "INSERT INTO t (a, b) VALUES (1, 2), (3, 4)",
        "CREATE TABLE dbo.t (id INT NOT NULL, name VARCHAR(50) NULL)",
        "WITH x AS (SELECT a FROM t) SELECT * FROM x",
        "UPDATE t SET a = 1, b = 2 FROM t JOIN u ON t.id = u.id WHERE t.x > 5",
        "IF x = 1 BEGIN SELECT 1 END ELSE BEGIN SELECT 2 END",
        "DECLARE @a INT = 1, @b VARCHAR(10)",
        "SELECT CASE WHEN x = 1 THEN 'a' ELSE 'b' END FROM t WHERE y IN (1, 2, 3)",
        "EXEC dbo.proc_name @p = 1, @q = 'x'",
    ];

    fn styles() -> Vec<FormatConfig> {
        let texts = [
            "{}",
            r#"{"casing": {"keywords": "lowercase", "functions": "lowercase"},
                "lists": {"commas": {"placeCommasBeforeItems": true}},
                "dml": {"collapseShortStatements": false}}"#,
            r#"{"brackets": {"identifiers": "all"}}"#,
            r#"{"dml": {"collapseShortStatements": false},
                "lists": {"alignAliases": true},
                "operators": {"comparison": {"alignOperators": true}}}"#,
            r#"{"parentheses": {"style": "compactToParenthesis"},
                "dml": {"collapseShortStatements": false, "subqueryCollapseThreshold": 10},
                "whitespace": {"maxLineWidth": 60}}"#,
        ];
        texts
            .iter()
            .map(|t| parse_style_json(t).expect("style should parse"))
            .collect()
    }

    #[test]
    fn formatting_is_idempotent_across_the_config_matrix() {
        for config in styles() {
            for input in INPUTS {
                assert_idempotent_with(input, &config);
            }
        }
    }
}
