//! The clause grammar: keywords, operators and clause forms.

/// Every keyword the tokeniser recognises. Multi-word keywords must come
/// before their first word would match elsewhere, and tokenise as one token.
pub const KEYWORDS: &[&str] = &[
    "select", "update", "insert", "delete", "where", "from", "group by", "order by", "join",
    "limit", "count", "range", "sum", "distinct", "inner", "cross", "asc", "desc",
];

/// The operator characters. The comma shows up in column lists.
pub const OPERATORS: &[&str] = &["+", ","];

/// The kind of expression a clause carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExprKind {
    None,
    Number,
    TableName,
    ColumnList,
}

/// The form of a clause: which flags it accepts, which expression it carries
/// and which child clauses may or must follow it.
#[derive(Clone, Copy, Debug)]
pub struct Form {
    pub name: &'static str,
    pub expression: ExprKind,
    pub required_clauses: &'static [&'static str],
    pub optional_clauses: &'static [&'static str],
    pub prefix_flags: &'static [&'static str],
    pub infix_flags: &'static [&'static str],
    pub postfix_flags: &'static [&'static str],
    /// Whether the clause may stand at the top of a statement.
    pub primary: bool,
}

const DEFAULT: Form = Form {
    name: "",
    expression: ExprKind::None,
    required_clauses: &[],
    optional_clauses: &[],
    prefix_flags: &[],
    infix_flags: &[],
    postfix_flags: &[],
    primary: false,
};

pub const FORMS: &[Form] = &[
    Form {
        name: "select",
        primary: true,
        infix_flags: &["distinct"],
        expression: ExprKind::ColumnList,
        required_clauses: &["from"],
        optional_clauses: &["order by", "limit"],
        ..DEFAULT
    },
    Form {
        name: "limit",
        expression: ExprKind::Number,
        ..DEFAULT
    },
    Form {
        name: "where",
        ..DEFAULT
    },
    Form {
        name: "join",
        prefix_flags: &["inner"],
        ..DEFAULT
    },
    Form {
        name: "from",
        expression: ExprKind::TableName,
        ..DEFAULT
    },
    Form {
        name: "order by",
        expression: ExprKind::ColumnList,
        postfix_flags: &["asc", "desc"],
        ..DEFAULT
    },
];

/// Look up the form for a clause keyword.
pub fn form(name: &str) -> Option<&'static Form> {
    FORMS.iter().find(|form| form.name == name)
}
