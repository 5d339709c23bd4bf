//! Interpret a parsed clause tree as a command to be run.

use super::parse::{Clause, Expr};

/// The columns a select projects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Columns {
    All,
    Named(Vec<String>),
}

/// A SELECT statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Select {
    pub distinct: bool,
    pub columns: Columns,
    pub order: Option<Vec<String>>,
    /// Reverse the ordering (`order by ... desc`).
    pub descending: bool,
    pub table: String,
    pub limit: Option<usize>,
}

/// Build a [`Select`] from a parsed `select` clause.
///
/// The parser guarantees a `from` child on every well-formed select, so a
/// missing one is reported as a plain diagnostic rather than a panic.
pub fn make_select(clause: &Clause) -> Result<Select, String> {
    let distinct = clause.flags.contains("distinct");

    let columns = match &clause.expression {
        Expr::Star => Columns::All,
        Expr::Columns(names) => Columns::Named(names.clone()),
        other => {
            return Err(format!(
                "Error: `select` carries an invalid expression: {other:?}."
            ));
        }
    };

    let table = match clause.children.get("from").map(|from| &from.expression) {
        Some(Expr::TableName(name)) => name.clone(),
        _ => return Err("Error: `from` clause required.".to_string()),
    };

    let order_by = clause.children.get("order by");
    let order = match order_by.map(|clause| &clause.expression) {
        Some(Expr::Columns(names)) => Some(names.clone()),
        _ => None,
    };
    let descending = order_by.is_some_and(|clause| clause.flags.contains("desc"));

    let limit = match clause.children.get("limit").map(|limit| &limit.expression) {
        Some(Expr::Number(text)) => match text.parse::<usize>() {
            Ok(limit) => Some(limit),
            Err(_) => return Err(format!("Error: `{text}` is not a valid limit.")),
        },
        _ => None,
    };

    Ok(Select {
        distinct,
        columns,
        order,
        descending,
        table,
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parse::parse;

    fn select_for(query: &str) -> Select {
        let clause = parse(query).value.expect("clause");
        make_select(&clause).expect("select")
    }

    #[test]
    fn plain_select_star() {
        let select = select_for("select * from pets");
        assert_eq!(select.columns, Columns::All);
        assert_eq!(select.table, "pets");
        assert!(!select.distinct);
        assert_eq!(select.order, None);
        assert_eq!(select.limit, None);
    }

    #[test]
    fn full_select() {
        let select = select_for("select distinct name, species from pets order by name limit 5");
        assert!(select.distinct);
        assert_eq!(
            select.columns,
            Columns::Named(vec!["name".into(), "species".into()])
        );
        assert_eq!(select.order, Some(vec!["name".into()]));
        assert_eq!(select.limit, Some(5));
        assert!(!select.descending);
    }

    #[test]
    fn descending_order() {
        let select = select_for("select * from pets order by name desc limit 3");
        assert_eq!(select.order, Some(vec!["name".into()]));
        assert!(select.descending);
        assert_eq!(select.limit, Some(3));
    }
}
