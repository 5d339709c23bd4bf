//! The SQL engine: tokenise, parse, interpret, execute.

pub mod execute;
pub mod grammar;
pub mod interpret;
pub mod parse;
pub mod token;

use crate::database::{Database, Table};
use serde::{Deserialize, Serialize};

/// The carrier for user-facing diagnostics alongside an optional value.
///
/// Engine failures are not process errors: they travel back to the dashboard
/// as `Error: ...` messages with no value, and render in the messages table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub messages: Vec<String>,
    pub value: Option<T>,
}

impl<T> Outcome<T> {
    pub fn err(messages: Vec<String>) -> Self {
        Self {
            messages,
            value: None,
        }
    }

    pub fn ok(messages: Vec<String>, value: T) -> Self {
        Self {
            messages,
            value: Some(value),
        }
    }
}

/// The wire shape exchanged with the dashboard:
/// `{"messages": [...], "value": {"columns": [...], "rows": [...]}|null}`.
pub type Reply = Outcome<Table>;

/// Parse and run a query against the database.
pub fn run(query: &str, database: &Database) -> Reply {
    let parsed = parse::parse(query);
    let Some(clause) = parsed.value else {
        return Reply::err(parsed.messages);
    };
    let select = match interpret::make_select(&clause) {
        Ok(select) => select,
        Err(message) => {
            let mut messages = vec![message];
            messages.extend(parsed.messages);
            return Reply::err(messages);
        }
    };
    let mut outcome = execute::select(&select, database);
    outcome.messages.extend(parsed.messages);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Table;

    fn database() -> Database {
        let mut database = Database::new();
        database.insert(
            "pets".to_string(),
            Table {
                columns: vec!["name".into(), "species".into()],
                rows: vec![
                    vec!["rex".into(), "dog".into()],
                    vec!["felix".into(), "cat".into()],
                ],
            },
        );
        database
    }

    #[test]
    fn select_star_end_to_end() {
        let reply = run("select * from pets", &database());
        let table = reply.value.expect("value");
        assert_eq!(table.columns, vec!["name", "species"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn engine_errors_become_messages() {
        let reply = run("select * from missing", &database());
        assert!(reply.value.is_none());
        assert!(
            reply
                .messages
                .contains(&"Error: table `missing` not found".to_string())
        );
    }

    #[test]
    fn reply_serializes_with_null_value() {
        let reply = Reply::err(vec!["Error: nope".into()]);
        let json = serde_json::to_string(&reply).expect("serialize");
        assert_eq!(json, r#"{"messages":["Error: nope"],"value":null}"#);
    }
}
