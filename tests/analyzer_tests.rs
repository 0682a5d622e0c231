//! Analyzer tests for tsqlfmt
//!
//! The analyzer walks the AST read-only and never affects formatting.

use tsqlfmt::analyzer::{analyze, AnalyzeOptions};
use tsqlfmt::parser::parse;

fn warnings(input: &str, options: AnalyzeOptions) -> Vec<String> {
    analyze(&parse(input), &options)
        .into_iter()
        .map(|w| w.message)
        .collect()
}

fn schema_only() -> AnalyzeOptions {
    AnalyzeOptions {
        warn_missing_schema: true,
        warn_missing_alias: false,
    }
}

fn alias_only() -> AnalyzeOptions {
    AnalyzeOptions {
        warn_missing_schema: false,
        warn_missing_alias: true,
    }
}

mod missing_schema {
    use super::*;

    #[test]
    fn single_part_table_is_flagged() {
        let w = warnings("SELECT a FROM t", schema_only());
        assert_eq!(w, ["Schema is missing from t"]);
    }

    #[test]
    fn qualified_table_is_not_flagged() {
        assert!(warnings("SELECT a FROM dbo.t", schema_only()).is_empty());
    }

    #[test]
    fn temp_tables_and_variables_are_exempt() {
        assert!(warnings("SELECT a FROM #tmp", schema_only()).is_empty());
        assert!(warnings("SELECT a FROM @tbl", schema_only()).is_empty());
    }

    #[test]
    fn cte_references_are_not_flagged() {
        let w = warnings(
            "WITH totals AS (SELECT a FROM dbo.t) SELECT * FROM totals",
            schema_only(),
        );
        assert!(w.is_empty(), "got: {w:?}");
    }

    #[test]
    fn cte_name_matching_is_case_insensitive() {
        let w = warnings(
            "WITH Totals AS (SELECT a FROM dbo.t) SELECT * FROM TOTALS",
            schema_only(),
        );
        assert!(w.is_empty(), "got: {w:?}");
    }

    #[test]
    fn joined_tables_are_checked() {
        let w = warnings("SELECT a FROM dbo.t JOIN u ON t.id = u.id", schema_only());
        assert_eq!(w, ["Schema is missing from u"]);
    }

    #[test]
    fn insert_target_is_exempt() {
        assert!(warnings("INSERT INTO t (a) VALUES (1)", schema_only()).is_empty());
    }

    #[test]
    fn update_and_delete_targets_are_exempt() {
        assert!(warnings("UPDATE t SET a = 1", schema_only()).is_empty());
        assert!(warnings("DELETE FROM t WHERE a = 1", schema_only()).is_empty());
    }

    #[test]
    fn subqueries_are_walked() {
        let w = warnings("SELECT a FROM dbo.t WHERE x IN (SELECT y FROM u)", schema_only());
        assert_eq!(w, ["Schema is missing from u"]);
    }
}

mod missing_alias {
    use super::*;

    #[test]
    fn table_without_alias_is_flagged() {
        let w = warnings("SELECT a FROM dbo.t", alias_only());
        assert_eq!(w, ["Alias is missing from dbo.t"]);
    }

    #[test]
    fn aliased_table_is_not_flagged() {
        assert!(warnings("SELECT a FROM dbo.t x", alias_only()).is_empty());
        assert!(warnings("SELECT a FROM dbo.t AS x", alias_only()).is_empty());
    }

    #[test]
    fn join_sources_are_checked() {
        let w = warnings(
            "SELECT a FROM dbo.t x JOIN dbo.u ON x.id = u.id",
            alias_only(),
        );
        assert_eq!(w, ["Alias is missing from dbo.u"]);
    }

    #[test]
    fn dml_targets_are_exempt() {
        assert!(warnings("UPDATE dbo.t SET a = 1", alias_only()).is_empty());
        assert!(warnings("DELETE FROM dbo.t", alias_only()).is_empty());
    }
}

mod exec_statements {
    use super::*;

    #[test]
    fn unqualified_procedure_name_is_flagged_once() {
        let w = warnings("EXEC proc_name @p = 1", schema_only());
        assert_eq!(w.len(), 1);
        assert!(w[0].contains("Schema is missing from proc_name"), "got: {w:?}");
    }

    #[test]
    fn qualified_procedure_name_is_not_flagged() {
        assert!(warnings("EXEC dbo.proc_name @p = 1", schema_only()).is_empty());
    }

    #[test]
    fn execute_spelling_is_recognized() {
        let w = warnings("EXECUTE proc_name", schema_only());
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn warnings_carry_positions() {
        let all = analyze(&parse("SELECT a FROM t"), &schema_only());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].line, Some(1));
        assert!(all[0].col.is_some());
    }

    #[test]
    fn analysis_is_silent_when_switched_off() {
        let options = AnalyzeOptions::default();
        assert!(warnings("EXEC proc_name @p = 1", options).is_empty());
        assert!(warnings("SELECT a FROM t", options).is_empty());
    }
}
