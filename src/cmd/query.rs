use crate::common::{ERROR, SUCCESS};
use crate::config::{self, Configuration, rt::RtcCore};
use crate::database::{self, Table};
use crate::sql;
use anyhow::{Result, bail};
use clap::Args;
use std::path::PathBuf;

/// Run a query against the local tables and print the result.
#[derive(Clone, Debug, Args)]
#[command(name = "query")]
#[command(next_help_heading = "Query")]
pub struct Query {
    /// The SQL query to run
    pub query: String,

    /// The directory holding the CSV tables
    #[arg(short, long)]
    pub data: Option<PathBuf>,
}

impl Query {
    fn apply_to(self, mut config: Configuration) -> (String, Configuration) {
        let Self { query, data } = self;
        config.core.data = data.or(config.core.data);
        (query, config)
    }

    #[tracing::instrument(level = "trace", skip(self, config))]
    pub async fn run(self, config: Option<PathBuf>) -> Result<()> {
        let (query, cfg) = self.apply_to(config::load(config)?);
        let rtc = RtcCore::new(&cfg);
        let database = database::load_dir(&rtc.data_dir)?;

        let reply = sql::run(&query, &database);
        for message in &reply.messages {
            println!("{message}");
        }
        let Some(table) = reply.value else {
            bail!("{} query produced no result", ERROR);
        };
        print_table(&table);
        tracing::debug!("{} {} row(s)", SUCCESS, table.rows.len());
        Ok(())
    }
}

/// Print a table as aligned columns.
fn print_table(table: &Table) {
    let widths = column_widths(table);
    print_row(&table.columns, &widths);
    let rule = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join("-+-");
    println!("{rule}");
    for row in &table.rows {
        print_row(row, &widths);
    }
}

fn print_row(cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let width = widths.get(index).copied().unwrap_or(cell.len());
            format!("{cell:width$}")
        })
        .collect::<Vec<_>>()
        .join(" | ");
    println!("{line}");
}

fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths = table.columns.iter().map(String::len).collect::<Vec<_>>();
    for row in &table.rows {
        for (index, cell) in row.iter().enumerate() {
            if index < widths.len() {
                widths[index] = widths[index].max(cell.len());
            } else {
                widths.push(cell.len());
            }
        }
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_cover_ragged_rows() {
        let table = Table {
            columns: vec!["ab".into()],
            rows: vec![vec!["abcd".into(), "x".into()]],
        };
        assert_eq!(column_widths(&table), vec![4, 1]);
    }
}
