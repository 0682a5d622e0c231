//! Style configuration
//!
//! The [`FormatConfig`] tree is immutable and fully populated: a style
//! document is deep-merged over the defaults by the loader, so no field is
//! ever partially defined during formatting. The formatter never mutates
//! it; scoped overrides travel as function parameters.

mod loader;

pub use loader::{load_style_file, parse_style_json};

use serde::{Deserialize, Serialize};

/// Casing applied to a lexical category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseOption {
    #[serde(rename = "asis")]
    AsIs,
    #[serde(rename = "lowercase")]
    Lowercase,
    #[serde(rename = "uppercase")]
    Uppercase,
    #[serde(rename = "lowerCamelCase")]
    LowerCamelCase,
    #[serde(rename = "upperCamelCase")]
    UpperCamelCase,
}

/// Placement of the parentheses around expanded subqueries and DDL bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParenthesisStyle {
    /// `(` on its own line, `)` aligned with the statement indent
    #[serde(rename = "expandedToStatement")]
    ExpandedToStatement,
    /// `(` at the end of the preceding line, `)` at the statement indent
    #[serde(rename = "compactToStatement")]
    CompactToStatement,
    /// `(` on its own line, `)` aligned one level deeper
    #[serde(rename = "expandedToParenthesis")]
    ExpandedToParenthesis,
    /// `(` at the end of the preceding line, `)` one level deeper
    #[serde(rename = "compactToParenthesis")]
    CompactToParenthesis,
}

/// Identifier / data-type bracketing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketMode {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "userDefined")]
    UserDefined,
    #[serde(rename = "none")]
    None,
}

/// Output line endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    #[serde(rename = "lf")]
    Lf,
    #[serde(rename = "crlf")]
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// The complete style configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatConfig {
    pub whitespace: WhitespaceConfig,
    pub lists: ListsConfig,
    pub parentheses: ParenthesesConfig,
    pub casing: CasingConfig,
    pub brackets: BracketsConfig,
    pub dml: DmlConfig,
    pub ddl: DdlConfig,
    pub control_flow: ControlFlowConfig,
    pub case_expressions: CaseExpressionsConfig,
    pub inserts: InsertsConfig,
    pub joins: JoinsConfig,
    pub operators: OperatorsConfig,
    pub statements: StatementsConfig,
}

/// Indentation and line width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WhitespaceConfig {
    pub use_tabs: bool,
    pub indent_width: usize,
    pub max_line_width: usize,
}

impl Default for WhitespaceConfig {
    fn default() -> Self {
        Self {
            use_tabs: false,
            indent_width: 4,
            max_line_width: 120,
        }
    }
}

impl WhitespaceConfig {
    /// The indent string for one level.
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_width)
        }
    }
}

/// List layout: comma placement and alignment switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListsConfig {
    pub commas: CommasConfig,
    pub align_aliases: bool,
    pub align_data_types: bool,
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            commas: CommasConfig::default(),
            align_aliases: false,
            align_data_types: false,
        }
    }
}

/// Comma placement within expanded lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommasConfig {
    pub place_commas_before_items: bool,
    pub space_after_comma: bool,
}

impl Default for CommasConfig {
    fn default() -> Self {
        Self {
            place_commas_before_items: false,
            space_after_comma: true,
        }
    }
}

/// Parenthesis placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParenthesesConfig {
    pub style: ParenthesisStyle,
}

impl Default for ParenthesesConfig {
    fn default() -> Self {
        Self {
            style: ParenthesisStyle::ExpandedToStatement,
        }
    }
}

/// Casing per lexical category. Plain identifiers are never re-cased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CasingConfig {
    pub keywords: CaseOption,
    pub functions: CaseOption,
    pub data_types: CaseOption,
    pub global_variables: CaseOption,
}

impl Default for CasingConfig {
    fn default() -> Self {
        Self {
            keywords: CaseOption::Uppercase,
            functions: CaseOption::Uppercase,
            data_types: CaseOption::Uppercase,
            global_variables: CaseOption::Uppercase,
        }
    }
}

/// Identifier bracketing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BracketsConfig {
    pub identifiers: BracketMode,
    pub data_types: BracketMode,
    pub preserve_reserved_word_brackets: bool,
}

impl Default for BracketsConfig {
    fn default() -> Self {
        Self {
            identifiers: BracketMode::None,
            data_types: BracketMode::None,
            preserve_reserved_word_brackets: true,
        }
    }
}

/// DML collapse thresholds (SELECT / UPDATE / DELETE and subqueries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DmlConfig {
    pub collapse_short_statements: bool,
    pub collapse_threshold: usize,
    pub collapse_short_subqueries: bool,
    pub subquery_collapse_threshold: usize,
}

impl Default for DmlConfig {
    fn default() -> Self {
        Self {
            collapse_short_statements: true,
            collapse_threshold: 80,
            collapse_short_subqueries: true,
            subquery_collapse_threshold: 60,
        }
    }
}

/// DDL collapse thresholds (CREATE TABLE).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DdlConfig {
    pub collapse_short_definitions: bool,
    pub collapse_threshold: usize,
}

impl Default for DdlConfig {
    fn default() -> Self {
        Self {
            collapse_short_definitions: false,
            collapse_threshold: 60,
        }
    }
}

/// IF/ELSE and BEGIN/END collapse thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlFlowConfig {
    pub collapse_short_blocks: bool,
    pub collapse_threshold: usize,
}

impl Default for ControlFlowConfig {
    fn default() -> Self {
        Self {
            collapse_short_blocks: false,
            collapse_threshold: 60,
        }
    }
}

/// CASE expression collapse thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseExpressionsConfig {
    pub collapse_short_case_expressions: bool,
    pub collapse_threshold: usize,
}

impl Default for CaseExpressionsConfig {
    fn default() -> Self {
        Self {
            collapse_short_case_expressions: true,
            collapse_threshold: 60,
        }
    }
}

/// INSERT value-list layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsertsConfig {
    pub collapse_short_inserts: bool,
    pub collapse_threshold: usize,
    pub row_per_line: bool,
}

impl Default for InsertsConfig {
    fn default() -> Self {
        Self {
            collapse_short_inserts: true,
            collapse_threshold: 80,
            row_per_line: true,
        }
    }
}

/// JOIN layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinsConfig {
    pub join_on_new_line: bool,
    pub indent_joins: bool,
    pub on_condition_on_new_line: bool,
}

impl Default for JoinsConfig {
    fn default() -> Self {
        Self {
            join_on_new_line: true,
            indent_joins: false,
            on_condition_on_new_line: false,
        }
    }
}

/// Operator-level layout switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorsConfig {
    pub comparison: ComparisonConfig,
    pub and_or: AndOrConfig,
    pub between: BetweenConfig,
    pub in_lists: InListsConfig,
}

/// Comparison operator alignment within AND/OR chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComparisonConfig {
    pub align_operators: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            align_operators: false,
        }
    }
}

/// AND/OR chain layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AndOrConfig {
    pub place_on_new_line: bool,
    pub place_before_condition: bool,
}

impl Default for AndOrConfig {
    fn default() -> Self {
        Self {
            place_on_new_line: true,
            place_before_condition: true,
        }
    }
}

/// BETWEEN layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BetweenConfig {
    pub keep_on_one_line: bool,
}

impl Default for BetweenConfig {
    fn default() -> Self {
        Self {
            keep_on_one_line: true,
        }
    }
}

/// IN value-list layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InListsConfig {
    pub values_on_new_line: bool,
}

impl Default for InListsConfig {
    fn default() -> Self {
        Self {
            values_on_new_line: false,
        }
    }
}

/// Statement-level layout: blank lines, semicolons, line endings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatementsConfig {
    pub preserve_blank_lines: bool,
    pub preserve_blank_lines_between_comments: bool,
    pub blank_line_after_batch_separator: bool,
    pub insert_semicolons: bool,
    pub line_ending: LineEnding,
}

impl Default for StatementsConfig {
    fn default() -> Self {
        Self {
            preserve_blank_lines: true,
            preserve_blank_lines_between_comments: true,
            blank_line_after_batch_separator: true,
            insert_semicolons: false,
            line_ending: LineEnding::Lf,
        }
    }
}
