//! Execute interpreted commands against the database.

use super::Outcome;
use super::interpret::{Columns, Select};
use crate::database::{Database, Table};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Run a select against the database.
pub fn select(statement: &Select, database: &Database) -> Outcome<Table> {
    let Some(table) = database.get(&statement.table) else {
        return Outcome::err(vec![format!(
            "Error: table `{}` not found",
            statement.table
        )]);
    };

    let columns = match &statement.columns {
        Columns::All => table.columns.clone(),
        Columns::Named(names) => names.clone(),
    };
    let indices = match resolve(&columns, &table.columns) {
        Ok(indices) => indices,
        Err(message) => return Outcome::err(vec![message]),
    };

    // Project each row onto the selected columns. Short rows pad out with
    // empty cells rather than aborting the query.
    let mut rows = table
        .rows
        .iter()
        .map(|row| {
            indices
                .iter()
                .map(|&index| row.get(index).cloned().unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    if let Some(order) = &statement.order {
        // Order columns resolve against the projected columns.
        let order_indices = match resolve(order, &columns) {
            Ok(indices) => indices,
            Err(message) => return Outcome::err(vec![message]),
        };
        rows.sort_by(|a, b| compare_on(a, b, &order_indices));
        if statement.descending {
            rows.reverse();
        }
    }

    if statement.distinct {
        let mut seen = HashSet::new();
        rows.retain(|row| seen.insert(row.clone()));
    }

    if let Some(limit) = statement.limit {
        rows.truncate(limit);
    }

    Outcome::ok(vec![], Table { columns, rows })
}

fn resolve(names: &[String], columns: &[String]) -> Result<Vec<usize>, String> {
    names
        .iter()
        .map(|name| {
            columns
                .iter()
                .position(|column| column == name)
                .ok_or_else(|| format!("Error: Column named `{name}` cannot be found."))
        })
        .collect()
}

fn compare_on(a: &[String], b: &[String], indices: &[usize]) -> Ordering {
    for &index in indices {
        let ordering = a
            .get(index)
            .cmp(&b.get(index));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
