//! Render model and plain-text rendering of the board.
//!
//! [`BoardView::build`] turns a [`ViewState`] into everything a frontend needs:
//! title, optional loading status, table body and footer. `Display` lays the view
//! out as a boxed text table:
//!
//! ```text
//! Quotopia
//!
//! +--------+---------+-------------+
//! | Symbol | Price   | Time        |
//! +--------+---------+-------------+
//! | BTC    | $65,000 | 10:13:20 PM |
//! +--------+---------+-------------+
//! Refreshing every 2 sec • http://127.0.0.1:8080/quotes
//! ```
use std::fmt;
use std::time::Duration;

use quote_common::DisplayZone;
use quote_common::format::{format_price, format_time};

use crate::state::ViewState;

/// Board title.
pub const TITLE: &str = "Quotopia";
/// Status message shown next to the spinner while a fetch is in flight.
pub const LOADING_MESSAGE: &str = "Loading quotes...";
/// Call to action shown when there is nothing to display.
pub const PLACEHOLDER_MESSAGE: &str = "🚀 Start the quote service to see live prices";
/// Column headers, in display order.
pub const HEADERS: [&str; 3] = ["Symbol", "Price", "Time"];

const SPINNER: char = '◌';

/// Identity of a rendered row.
///
/// Symbols are not guaranteed unique, so the position takes part in the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    /// Index in the fetched list.
    pub position: usize,
    /// Symbol at that index.
    pub symbol: String,
}

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRow {
    /// Row identity.
    pub key: RowKey,
    /// Cells in [`HEADERS`] order.
    pub cells: [String; 3],
}

impl QuoteRow {
    /// Symbol cell.
    pub fn symbol(&self) -> &str {
        &self.cells[0]
    }

    /// Formatted price cell, e.g. `$65,000`.
    pub fn price(&self) -> &str {
        &self.cells[1]
    }

    /// Formatted time-of-day cell.
    pub fn time(&self) -> &str {
        &self.cells[2]
    }
}

/// Content below the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// One row per quote.
    Rows(Vec<QuoteRow>),
    /// A single row spanning every column.
    Placeholder(&'static str),
    /// Nothing yet; the first list is still loading.
    Pending,
}

/// Everything shown on screen for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Heading above the table.
    pub title: &'static str,
    /// Loading message, present only while a fetch is in flight.
    pub status: Option<&'static str>,
    /// Rows below the header.
    pub body: TableBody,
    /// Refresh interval and source origin.
    pub footer: String,
}

impl BoardView {
    /// Build the frame for `state`.
    ///
    /// `interval` and `origin` only feed the footer.
    pub fn build(state: &ViewState, zone: DisplayZone, interval: Duration, origin: &str) -> Self {
        let loading = state.is_loading();
        let quotes = state.quotes();

        let body = if !quotes.is_empty() {
            let rows = quotes
                .iter()
                .enumerate()
                .map(|(position, quote)| QuoteRow {
                    key: RowKey {
                        position,
                        symbol: quote.symbol.clone(),
                    },
                    cells: [
                        quote.symbol.clone(),
                        format_price(quote.price),
                        format_time(&quote.timestamp, zone),
                    ],
                })
                .collect();
            TableBody::Rows(rows)
        } else if loading {
            TableBody::Pending
        } else {
            TableBody::Placeholder(PLACEHOLDER_MESSAGE)
        };

        BoardView {
            title: TITLE,
            status: loading.then_some(LOADING_MESSAGE),
            body,
            footer: format!("Refreshing every {} • {}", describe_interval(interval), origin),
        }
    }

    /// Quote rows, empty when a placeholder or nothing is shown.
    pub fn rows(&self) -> &[QuoteRow] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            _ => &[],
        }
    }

    /// Number of table rows below the header, placeholder included.
    pub fn body_row_count(&self) -> usize {
        match &self.body {
            TableBody::Rows(rows) => rows.len(),
            TableBody::Placeholder(_) => 1,
            TableBody::Pending => 0,
        }
    }

    fn column_widths(&self) -> [usize; 3] {
        let mut widths = HEADERS.map(display_width);
        for row in self.rows() {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(display_width(cell));
            }
        }
        if let TableBody::Placeholder(message) = &self.body {
            // The placeholder spans all columns including the two inner separators.
            let spanned: usize = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
            let needed = display_width(message);
            if needed > spanned {
                widths[2] += needed - spanned;
            }
        }
        widths
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        if let Some(status) = self.status {
            writeln!(f, "{} {}", SPINNER, status)?;
            writeln!(f)?;
        }

        let widths = self.column_widths();
        let border = border_line(&widths);

        writeln!(f, "{}", border)?;
        write_cells(f, &widths, &HEADERS)?;
        writeln!(f, "{}", border)?;
        match &self.body {
            TableBody::Rows(rows) => {
                for row in rows {
                    write_cells(f, &widths, &row.cells)?;
                }
                writeln!(f, "{}", border)?;
            }
            TableBody::Placeholder(message) => {
                let spanned = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
                let free = spanned.saturating_sub(display_width(message));
                let left = free / 2;
                writeln!(
                    f,
                    "| {}{}{} |",
                    " ".repeat(left),
                    message,
                    " ".repeat(free - left)
                )?;
                writeln!(f, "{}", border)?;
            }
            TableBody::Pending => {}
        }
        writeln!(f, "{}", self.footer)
    }
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn write_cells<S: AsRef<str>>(
    f: &mut fmt::Formatter<'_>,
    widths: &[usize],
    cells: &[S],
) -> fmt::Result {
    write!(f, "|")?;
    for (width, cell) in widths.iter().zip(cells) {
        let cell = cell.as_ref();
        let pad = width.saturating_sub(display_width(cell));
        write!(f, " {}{} |", cell, " ".repeat(pad))?;
    }
    writeln!(f)
}

/// Terminal columns occupied by `text`; pictographs take two.
fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if (c as u32) >= 0x1F300 { 2 } else { 1 })
        .sum()
}

fn describe_interval(interval: Duration) -> String {
    if interval.subsec_millis() == 0 && interval.as_secs() > 0 {
        format!("{} sec", interval.as_secs())
    } else {
        format!("{} ms", interval.as_millis())
    }
}
