//! Parser for SQL statements.

use super::Outcome;
use super::grammar::{self, ExprKind, Form};
use super::token::{Label, Token, tokenise};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

/// The expression a clause carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    None,
    Number(String),
    TableName(String),
    /// The `*` column list.
    Star,
    Columns(Vec<String>),
}

/// One parsed clause of a statement.
#[derive(Clone, Debug)]
pub struct Clause {
    pub form: &'static Form,
    pub flags: BTreeSet<String>,
    pub expression: Expr,
    pub children: HashMap<&'static str, Clause>,
}

/// A cursor over the token stream with lookahead and stable reads of the
/// current token.
struct Cursor {
    tokens: Vec<Token>,
    index: usize,
}

impl Cursor {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }
}

/// Parse a query into a clause tree.
///
/// Failures are reported through `Outcome::messages`; the notes describing
/// the parsed tree and token list are appended either way.
pub fn parse(query: &str) -> Outcome<Clause> {
    let tokens = tokenise(query);
    let token_texts = tokens
        .iter()
        .map(|token| token.text.as_str())
        .collect::<Vec<_>>();

    let mut cursor = Cursor::new(tokens.clone());
    let result = parse_clause(&mut cursor);

    if let Some(clause) = &result.value {
        if !clause.form.primary {
            let mut messages = result.messages;
            messages.push(format!(
                "Error: Clause `{}` is not primary.",
                clause.form.name
            ));
            return Outcome::err(messages);
        }
    }

    let mut result = result;
    result.messages.push(format!(
        "Note: {}",
        result
            .value
            .as_ref()
            .map(|clause| print_clause(clause, 2))
            .unwrap_or_default()
    ));
    result
        .messages
        .push(format!("Note: Tokens are {token_texts:?}."));
    result
}

fn parse_clause(cursor: &mut Cursor) -> Outcome<Clause> {
    let mut messages = Vec::new();
    let mut flags = BTreeSet::new();
    let mut children = HashMap::new();

    // Resolve the clause form, consuming an optional prefix flag.
    let Some(first) = cursor.current().cloned() else {
        return Outcome::err(vec!["Error: No tokens to consume.".to_string()]);
    };
    if first.label != Label::Keyword {
        return Outcome::err(vec![format!(
            "Error: Expected keyword, but got `{}`.",
            first.text
        )]);
    }
    let form = match grammar::form(&first.text) {
        Some(form) => form,
        None => {
            if cursor.peek(1).is_none() {
                return Outcome::err(vec![format!(
                    "Error: Keyword `{}` is not a valid clause name.",
                    first.text
                )]);
            }
            cursor.advance();
            // The cursor moved, so a current token exists.
            let Some(second) = cursor.current().cloned() else {
                return Outcome::err(vec!["Error: No tokens to consume.".to_string()]);
            };
            let Some(second_form) = grammar::form(&second.text) else {
                return Outcome::err(vec![format!(
                    "Error: Neither `{}` nor `{}` are valid clause names.",
                    first.text, second.text
                )]);
            };
            if !second_form.prefix_flags.contains(&first.text.as_str()) {
                return Outcome::err(vec![format!(
                    "Error: Keyword `{}` is not a valid prefix for `{}`.",
                    first.text, second.text
                )]);
            }
            flags.insert(first.text.clone());
            second_form
        }
    };
    cursor.advance();

    // An optional infix flag follows the clause keyword.
    if let Some(token) = cursor.current().cloned() {
        if token.label == Label::Keyword && form.infix_flags.contains(&token.text.as_str()) {
            flags.insert(token.text);
            cursor.advance();
        }
    }

    let expression = match parse_expression(cursor, form.expression) {
        Ok(expression) => expression,
        Err(message) => return Outcome::err(vec![message]),
    };

    // An optional postfix flag closes the clause.
    if let Some(token) = cursor.current().cloned() {
        if token.label == Label::Keyword && form.postfix_flags.contains(&token.text.as_str()) {
            flags.insert(token.text);
            cursor.advance();
        }
    }

    for &name in form.required_clauses {
        if cursor.current().map(|token| token.text.as_str()) != Some(name) {
            return Outcome::err(vec![format!("Error: `{name}` clause required.")]);
        }
        let result = parse_clause(cursor);
        let Some(clause) = result.value else {
            let mut failure = vec!["Error: Recursive call failed.".to_string()];
            failure.extend(result.messages);
            return Outcome::err(failure);
        };
        messages.extend(result.messages);
        children.insert(clause.form.name, clause);
    }

    for &name in form.optional_clauses {
        if cursor.current().map(|token| token.text.as_str()) != Some(name) {
            messages.push(format!("Note: Optional clause `{name}` is absent."));
            continue;
        }
        let result = parse_clause(cursor);
        let Some(clause) = result.value else {
            let mut failure = vec!["Error: Recursive call failed.".to_string()];
            failure.extend(result.messages);
            return Outcome::err(failure);
        };
        messages.extend(result.messages);
        children.insert(clause.form.name, clause);
    }

    Outcome::ok(
        messages,
        Clause {
            form,
            flags,
            expression,
            children,
        },
    )
}

fn parse_expression(cursor: &mut Cursor, kind: ExprKind) -> Result<Expr, String> {
    match kind {
        ExprKind::None => Ok(Expr::None),
        ExprKind::Number => {
            let token = cursor
                .current()
                .cloned()
                .ok_or_else(|| "Error: Unexpected end of query.".to_string())?;
            cursor.advance();
            Ok(Expr::Number(token.text))
        }
        ExprKind::TableName => {
            let token = cursor
                .current()
                .cloned()
                .ok_or_else(|| "Error: Unexpected end of query.".to_string())?;
            cursor.advance();
            Ok(Expr::TableName(token.text))
        }
        ExprKind::ColumnList => {
            if cursor.current().map(|token| token.text.as_str()) == Some("*") {
                cursor.advance();
                return Ok(Expr::Star);
            }
            let mut columns = Vec::new();
            while let Some(token) = cursor.current().cloned() {
                match token.label {
                    Label::Keyword => break,
                    Label::Operator if token.text != "," => {
                        return Err(format!(
                            "Error: `{}` is not a valid operator in column list.",
                            token.text
                        ));
                    }
                    Label::Operator => {}
                    _ => columns.push(token.text),
                }
                cursor.advance();
            }
            Ok(Expr::Columns(columns))
        }
    }
}

/// Pretty print a clause tree, one indented line per clause.
pub fn print_clause(clause: &Clause, depth: usize) -> String {
    let mut result = String::new();
    let indent = "\t".repeat(depth);
    let flags = clause.flags.iter().cloned().collect::<Vec<_>>();
    let _ = writeln!(
        result,
        "{indent}- {}: {flags:?} - {:?}",
        clause.form.name.to_uppercase(),
        clause.expression
    );
    // Children print in clause order, required before optional.
    for &name in clause
        .form
        .required_clauses
        .iter()
        .chain(clause.form.optional_clauses.iter())
    {
        if let Some(child) = clause.children.get(name) {
            result.push_str(&print_clause(child, depth + 1));
            result.push('\n');
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn messages(query: &str) -> Vec<String> {
        parse(query).messages
    }

    #[test]
    fn empty() {
        assert!(messages("").contains(&"Error: No tokens to consume.".to_string()));
    }

    #[rstest]
    #[case("2+2", "2")]
    #[case("hi", "hi")]
    #[case("hello world", "hello")]
    fn non_keyword_start(#[case] query: &str, #[case] got: &str) {
        assert!(
            messages(query)
                .contains(&format!("Error: Expected keyword, but got `{got}`."))
        );
    }

    #[test]
    fn floating_flag() {
        assert!(
            messages("distinct")
                .contains(&"Error: Keyword `distinct` is not a valid clause name.".to_string())
        );
    }

    #[test]
    fn nonprimary_clause() {
        assert!(
            messages("where").contains(&"Error: Clause `where` is not primary.".to_string())
        );
    }

    #[test]
    fn invalid_prefix() {
        assert!(
            messages("asc select")
                .contains(&"Error: Keyword `asc` is not a valid prefix for `select`.".to_string())
        );
    }

    #[test]
    fn two_non_clause_keywords() {
        assert!(
            messages("asc desc")
                .contains(&"Error: Neither `asc` nor `desc` are valid clause names.".to_string())
        );
    }

    #[test]
    fn truncated_child_clause_fails_the_recursive_call() {
        let result = messages("select * from pets limit");
        assert!(result.contains(&"Error: Recursive call failed.".to_string()));
        assert!(result.contains(&"Error: Unexpected end of query.".to_string()));
    }

    #[test]
    fn missing_from_clause() {
        assert!(messages("select *").contains(&"Error: `from` clause required.".to_string()));
    }

    #[test]
    fn select_star() {
        let result = parse("select * from pets");
        let clause = result.value.expect("clause");
        assert_eq!(clause.form.name, "select");
        assert_eq!(clause.expression, Expr::Star);
        let from = clause.children.get("from").expect("from clause");
        assert_eq!(from.expression, Expr::TableName("pets".into()));
    }

    #[test]
    fn select_columns_with_commas() {
        let result = parse("select name, species from pets");
        let clause = result.value.expect("clause");
        assert_eq!(
            clause.expression,
            Expr::Columns(vec!["name".into(), "species".into()])
        );
    }

    #[test]
    fn select_distinct_sets_flag() {
        let result = parse("select distinct name from pets");
        let clause = result.value.expect("clause");
        assert!(clause.flags.contains("distinct"));
    }

    #[test]
    fn optional_clauses_note_absence() {
        let result = parse("select * from pets");
        assert!(
            result
                .messages
                .contains(&"Note: Optional clause `order by` is absent.".to_string())
        );
        assert!(
            result
                .messages
                .contains(&"Note: Optional clause `limit` is absent.".to_string())
        );
    }

    #[test]
    fn select_with_order_and_limit() {
        let result = parse("select * from pets order by name limit 2");
        let clause = result.value.expect("clause");
        let order = clause.children.get("order by").expect("order by clause");
        assert_eq!(order.expression, Expr::Columns(vec!["name".into()]));
        let limit = clause.children.get("limit").expect("limit clause");
        assert_eq!(limit.expression, Expr::Number("2".into()));
    }

    #[test]
    fn bad_operator_in_column_list() {
        assert!(
            messages("select a+b from pets")
                .contains(&"Error: `+` is not a valid operator in column list.".to_string())
        );
    }

    #[test]
    fn printed_tree_lists_children_in_clause_order() {
        let clause = parse("select * from pets order by name limit 2")
            .value
            .expect("clause");
        let printed = print_clause(&clause, 0);
        let from = printed.find("FROM").expect("from line");
        let order = printed.find("ORDER BY").expect("order by line");
        let limit = printed.find("LIMIT").expect("limit line");
        assert!(from < order);
        assert!(order < limit);
    }

    #[test]
    fn notes_carry_the_token_list() {
        let result = parse("select * from pets");
        assert!(
            result
                .messages
                .iter()
                .any(|message| message.starts_with("Note: Tokens are "))
        );
    }
}
