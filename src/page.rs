//! The dashboard page model.
//!
//! A [`Page`] holds named table elements, mirroring the two placeholder
//! tables of the served dashboard. Drawing into an element replaces its
//! content wholesale; rendering serializes the page to plain HTML.

use crate::database::Table;
use crate::sql::Reply;
use htmlescape::encode_minimal;
use std::fmt::Write;
use thiserror::Error;

/// The element id of the messages table.
pub const MESSAGES: &str = "messages";
/// The element id of the result table.
pub const RESULT: &str = "result";

#[derive(Debug, Error)]
pub enum PageError {
    #[error("no element with id {0:?}")]
    NoSuchElement(String),
    #[error("reply carried no result table")]
    MissingValue,
}

/// One cell of a table row.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Cell {
    Header(String),
    Data(String),
}

/// One table row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Cell>,
}

/// A table element addressable by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    id: String,
    rows: Vec<Row>,
}

impl Element {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rows: Vec::new(),
        }
    }

    /// Append one row containing a single data cell.
    pub fn add_row(&mut self, text: impl Into<String>) {
        self.rows.push(Row {
            cells: vec![Cell::Data(text.into())],
        });
    }

    /// Append one row of header cells.
    pub fn add_header_row(&mut self, columns: impl IntoIterator<Item = impl Into<String>>) {
        self.rows.push(Row {
            cells: columns
                .into_iter()
                .map(|column| Cell::Header(column.into()))
                .collect(),
        });
    }

    /// Drop all rows.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = writeln!(html, "<table id=\"{}\">", encode_minimal(&self.id));
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in &row.cells {
                match cell {
                    Cell::Header(text) => {
                        let _ = write!(html, "<th>{}</th>", encode_minimal(text));
                    }
                    Cell::Data(text) => {
                        let _ = write!(html, "<td>{}</td>", encode_minimal(text));
                    }
                }
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
        html
    }
}

/// The dashboard page: its table elements, in document order.
#[derive(Clone, Debug)]
pub struct Page {
    elements: Vec<Element>,
}

impl Default for Page {
    /// A dashboard page with its two placeholder tables.
    fn default() -> Self {
        Self {
            elements: vec![Element::new(MESSAGES), Element::new(RESULT)],
        }
    }
}

impl Page {
    pub fn element_mut(&mut self, id: &str) -> Result<&mut Element, PageError> {
        self.elements
            .iter_mut()
            .find(|element| element.id == id)
            .ok_or_else(|| PageError::NoSuchElement(id.to_string()))
    }

    pub fn element(&self, id: &str) -> Result<&Element, PageError> {
        self.elements
            .iter()
            .find(|element| element.id == id)
            .ok_or_else(|| PageError::NoSuchElement(id.to_string()))
    }

    /// Replace the content of the element `id` with a rendering of `table`:
    /// one header row, then one body row per data row, order preserved.
    pub fn draw_table(&mut self, id: &str, table: &Table) -> Result<(), PageError> {
        let element = self.element_mut(id)?;
        element.clear();
        element.add_header_row(table.columns.iter().cloned());
        for row in &table.rows {
            element.rows.push(Row {
                cells: row.iter().map(|cell| Cell::Data(cell.clone())).collect(),
            });
        }
        Ok(())
    }

    /// Apply a query reply to the page: rebuild the messages table, then
    /// draw the result table.
    ///
    /// A reply without a result value errors after the messages have been
    /// rendered, so the diagnostics it carried are still visible.
    pub fn apply(&mut self, reply: &Reply) -> Result<(), PageError> {
        tracing::debug!(?reply, "applying reply");
        let element = self.element_mut(MESSAGES)?;
        element.clear();
        element.add_header_row(["Messages"]);
        for message in &reply.messages {
            element.add_row(message);
        }
        let table = reply.value.as_ref().ok_or(PageError::MissingValue)?;
        self.draw_table(RESULT, table)
    }

    /// Render the page elements as an HTML fragment.
    pub fn to_html(&self) -> String {
        self.elements
            .iter()
            .map(Element::to_html)
            .collect::<String>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table {
            columns: vec!["X".into()],
            rows: vec![vec!["1".into()], vec!["2".into()]],
        }
    }

    #[test]
    fn draw_table_renders_header_then_rows() {
        let mut page = Page::default();
        page.draw_table(RESULT, &table()).expect("draw");

        let element = page.element(RESULT).expect("element");
        assert_eq!(element.row_count(), 1 + 2);
        let html = element.to_html();
        assert!(html.contains("<th>X</th>"));
        assert!(html.contains("<td>1</td>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn draw_table_twice_replaces() {
        let mut page = Page::default();
        page.draw_table(RESULT, &table()).expect("draw");
        let second = Table {
            columns: vec!["Y".into()],
            rows: vec![vec!["9".into()]],
        };
        page.draw_table(RESULT, &second).expect("draw");

        let html = page.element(RESULT).expect("element").to_html();
        assert_eq!(page.element(RESULT).expect("element").row_count(), 2);
        assert!(!html.contains("<th>X</th>"));
        assert!(html.contains("<th>Y</th>"));
    }

    #[test]
    fn draw_table_into_missing_element_errors() {
        let mut page = Page::default();
        let err = page.draw_table("nowhere", &table()).expect_err("no element");
        assert!(matches!(err, PageError::NoSuchElement(_)));
    }

    #[test]
    fn add_row_appends_one_single_cell_row() {
        let mut page = Page::default();
        let element = page.element_mut(MESSAGES).expect("element");
        let before = element.row_count();
        element.add_row("hello");
        assert_eq!(element.row_count(), before + 1);
        assert!(element.to_html().contains("<td>hello</td>"));
    }

    #[test]
    fn apply_renders_messages_and_result() {
        let mut page = Page::default();
        let reply = Reply::ok(vec!["a".into(), "b".into()], table());
        page.apply(&reply).expect("apply");

        let messages = page.element(MESSAGES).expect("element");
        assert_eq!(messages.row_count(), 1 + 2);
        assert!(messages.to_html().contains("<th>Messages</th>"));
        assert!(messages.to_html().contains("<td>a</td>"));

        let result = page.element(RESULT).expect("element");
        assert_eq!(result.row_count(), 1 + 2);
    }

    #[test]
    fn apply_without_value_errors_after_messages() {
        let mut page = Page::default();
        let reply = Reply::err(vec!["Error: nope".into()]);
        let err = page.apply(&reply).expect_err("missing value");
        assert!(matches!(err, PageError::MissingValue));

        // The messages table was still rebuilt.
        let messages = page.element(MESSAGES).expect("element");
        assert_eq!(messages.row_count(), 2);
        assert!(messages.to_html().contains("<td>Error: nope</td>"));
    }

    #[test]
    fn apply_twice_replaces_messages() {
        let mut page = Page::default();
        page.apply(&Reply::ok(vec!["first".into()], table()))
            .expect("apply");
        page.apply(&Reply::ok(vec!["second".into()], table()))
            .expect("apply");

        let html = page.element(MESSAGES).expect("element").to_html();
        assert!(!html.contains("first"));
        assert!(html.contains("second"));
    }

    #[test]
    fn html_is_escaped() {
        let mut page = Page::default();
        let sneaky = Table {
            columns: vec!["<script>".into()],
            rows: vec![vec!["a&b".into()]],
        };
        page.draw_table(RESULT, &sneaky).expect("draw");
        let html = page.to_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&amp;b"));
    }

    #[test]
    fn ragged_rows_render_ragged() {
        let mut page = Page::default();
        let ragged = Table {
            columns: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into()]],
        };
        page.draw_table(RESULT, &ragged).expect("draw");
        let html = page.element(RESULT).expect("element").to_html();
        assert!(html.contains("<tr><td>1</td></tr>"));
    }
}
