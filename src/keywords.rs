//! Static lexical category tables for T-SQL words.
//!
//! Every bare word falls into exactly one of the [`WordCategory`] buckets;
//! the lookup order is keyword, then function, then data type, then global
//! variable, with anything unmatched classified as a plain identifier.

/// Lexical category of a word token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCategory {
    Keyword,
    Function,
    DataType,
    GlobalVariable,
    Identifier,
}

/// Reserved keywords, including SET-option pseudo-keywords and the GO batch
/// separator. Sorted for binary search.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "ADD",
    "ALL",
    "ALTER",
    "AND",
    "ANSI_NULLS",
    "ANSI_PADDING",
    "ANY",
    "AS",
    "ASC",
    "AUTHORIZATION",
    "BACKUP",
    "BEGIN",
    "BETWEEN",
    "BREAK",
    "BY",
    "CASCADE",
    "CASE",
    "CHECK",
    "CHECKPOINT",
    "CLOSE",
    "CLUSTERED",
    "COLUMN",
    "COMMIT",
    "CONSTRAINT",
    "CONTINUE",
    "CREATE",
    "CROSS",
    "CURRENT",
    "CURSOR",
    "DATABASE",
    "DEALLOCATE",
    "DECLARE",
    "DEFAULT",
    "DELETE",
    "DESC",
    "DISTINCT",
    "DROP",
    "ELSE",
    "END",
    "ESCAPE",
    "EXCEPT",
    "EXEC",
    "EXECUTE",
    "EXISTS",
    "FETCH",
    "FOR",
    "FOREIGN",
    "FROM",
    "FULL",
    "FUNCTION",
    "GO",
    "GOTO",
    "GRANT",
    "GROUP",
    "HAVING",
    "HOLDLOCK",
    "IDENTITY",
    "IF",
    "IN",
    "INDEX",
    "INNER",
    "INSERT",
    "INTERSECT",
    "INTO",
    "IS",
    "JOIN",
    "KEY",
    "LEFT",
    "LIKE",
    "MERGE",
    "NOCOUNT",
    "NONCLUSTERED",
    "NOT",
    "NULL",
    "OFF",
    "OFFSET",
    "ON",
    "OPEN",
    "OPTION",
    "OR",
    "ORDER",
    "OUTER",
    "OVER",
    "PARTITION",
    "PERCENT",
    "PIVOT",
    "PRIMARY",
    "PRINT",
    "PROC",
    "PROCEDURE",
    "QUOTED_IDENTIFIER",
    "RAISERROR",
    "READ",
    "REFERENCES",
    "RETURN",
    "REVOKE",
    "RIGHT",
    "ROLLBACK",
    "SCHEMA",
    "SELECT",
    "SET",
    "TABLE",
    "THEN",
    "TOP",
    "TRANSACTION",
    "TRIGGER",
    "TRUNCATE",
    "UNION",
    "UNIQUE",
    "UNPIVOT",
    "UPDATE",
    "USE",
    "VALUES",
    "VIEW",
    "WHEN",
    "WHERE",
    "WHILE",
    "WITH",
    "XACT_ABORT",
];

/// Built-in functions. Sorted for binary search.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "ABS",
    "AVG",
    "CAST",
    "CEILING",
    "CHARINDEX",
    "COALESCE",
    "CONCAT",
    "CONVERT",
    "COUNT",
    "DATALENGTH",
    "DATEADD",
    "DATEDIFF",
    "DATENAME",
    "DATEPART",
    "DAY",
    "DENSE_RANK",
    "FLOOR",
    "FORMAT",
    "GETDATE",
    "GETUTCDATE",
    "IIF",
    "ISNULL",
    "LAG",
    "LEAD",
    "LEN",
    "LOWER",
    "LTRIM",
    "MAX",
    "MIN",
    "MONTH",
    "NEWID",
    "NTILE",
    "NULLIF",
    "OBJECT_ID",
    "PATINDEX",
    "POWER",
    "RANK",
    "REPLACE",
    "REVERSE",
    "ROUND",
    "ROW_NUMBER",
    "RTRIM",
    "SCOPE_IDENTITY",
    "SQRT",
    "SQUARE",
    "STDEV",
    "STR",
    "STRING_AGG",
    "STRING_SPLIT",
    "STUFF",
    "SUBSTRING",
    "SUM",
    "SUSER_SNAME",
    "TRIM",
    "TRY_CAST",
    "TRY_CONVERT",
    "UPPER",
    "VAR",
    "YEAR",
];

/// Built-in data types. Sorted for binary search.
pub const BUILTIN_DATA_TYPES: &[&str] = &[
    "BIGINT",
    "BINARY",
    "BIT",
    "CHAR",
    "DATE",
    "DATETIME",
    "DATETIME2",
    "DATETIMEOFFSET",
    "DECIMAL",
    "FLOAT",
    "IMAGE",
    "INT",
    "INTEGER",
    "MONEY",
    "NCHAR",
    "NTEXT",
    "NUMERIC",
    "NVARCHAR",
    "REAL",
    "SMALLDATETIME",
    "SMALLINT",
    "SMALLMONEY",
    "SQL_VARIANT",
    "TEXT",
    "TIME",
    "TIMESTAMP",
    "TINYINT",
    "UNIQUEIDENTIFIER",
    "VARBINARY",
    "VARCHAR",
    "XML",
];

/// `@@`-prefixed global variables. Sorted for binary search.
pub const GLOBAL_VARIABLES: &[&str] = &[
    "@@CONNECTIONS",
    "@@CPU_BUSY",
    "@@DATEFIRST",
    "@@DBTS",
    "@@ERROR",
    "@@FETCH_STATUS",
    "@@IDENTITY",
    "@@IDLE",
    "@@IO_BUSY",
    "@@LANGID",
    "@@LANGUAGE",
    "@@LOCK_TIMEOUT",
    "@@MAX_CONNECTIONS",
    "@@NESTLEVEL",
    "@@OPTIONS",
    "@@PROCID",
    "@@ROWCOUNT",
    "@@SERVERNAME",
    "@@SERVICENAME",
    "@@SPID",
    "@@TRANCOUNT",
    "@@VERSION",
];

/// Classify a bare word into its lexical category.
///
/// First match wins in the order keyword, function, data type, global
/// variable; anything not found is an identifier.
pub fn classify(word: &str) -> WordCategory {
    let upper = word.to_uppercase();
    if RESERVED_KEYWORDS.binary_search(&upper.as_str()).is_ok() {
        WordCategory::Keyword
    } else if BUILTIN_FUNCTIONS.binary_search(&upper.as_str()).is_ok() {
        WordCategory::Function
    } else if BUILTIN_DATA_TYPES.binary_search(&upper.as_str()).is_ok() {
        WordCategory::DataType
    } else if GLOBAL_VARIABLES.binary_search(&upper.as_str()).is_ok() {
        WordCategory::GlobalVariable
    } else {
        WordCategory::Identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_sorted() {
        for table in [
            RESERVED_KEYWORDS,
            BUILTIN_FUNCTIONS,
            BUILTIN_DATA_TYPES,
            GLOBAL_VARIABLES,
        ] {
            for pair in table.windows(2) {
                assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn classification_priority() {
        assert_eq!(classify("select"), WordCategory::Keyword);
        assert_eq!(classify("GetDate"), WordCategory::Function);
        assert_eq!(classify("varchar"), WordCategory::DataType);
        assert_eq!(classify("@@rowcount"), WordCategory::GlobalVariable);
        assert_eq!(classify("customer_id"), WordCategory::Identifier);
    }
}
