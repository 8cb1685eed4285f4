//! Verification table view.
//!
//! Renders the flagged rows of a [`VerificationResult`] as a bordered
//! [`ratatui::widgets::Table`]: the `note` column first, then the claim
//! columns in their original order. Claim exports are wide, so the claim
//! columns can be scrolled horizontally while `note` stays pinned.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use casemix_core::models::{columns, VerificationResult};

use crate::components::frequency_bar::pad_to_width;
use crate::themes::Theme;

/// Widest a claim column is drawn, in terminal columns.
pub const MAX_CELL_WIDTH: usize = 24;
/// Width reserved for the pinned `note` column.
pub const NOTE_WIDTH: usize = 32;

/// Scroll position within the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCursor {
    /// Highlighted flagged row.
    pub row: usize,
    /// Index of the first claim column drawn after `note`.
    pub column_offset: usize,
}

/// Display width of each claim column: the widest of header and cells,
/// capped at [`MAX_CELL_WIDTH`].
pub fn column_widths(result: &VerificationResult) -> Vec<usize> {
    result
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            result
                .rows
                .iter()
                .map(|r| r.row.cell(idx).width())
                .chain(std::iter::once(name.width()))
                .max()
                .unwrap_or(0)
                .clamp(1, MAX_CELL_WIDTH)
        })
        .collect()
}

/// Render the verification table into `area`.
pub fn render_verification_table(
    frame: &mut Frame,
    area: Rect,
    result: &VerificationResult,
    cursor: TableCursor,
    theme: &Theme,
) {
    let offset = cursor.column_offset.min(result.columns.len().saturating_sub(1));
    let widths = column_widths(result);
    let visible: Vec<usize> = (offset..result.columns.len()).collect();

    let header = Row::new(
        std::iter::once(columns::NOTE)
            .chain(visible.iter().map(|&i| result.columns[i].as_str()))
            .map(|h| Cell::from(h.to_string()).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = result
        .rows
        .iter()
        .enumerate()
        .map(|(n, annotated)| {
            let style = if n % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let mut cells = vec![Cell::from(pad_to_width(&annotated.note, NOTE_WIDTH))
                .style(theme.table_note)];
            cells.extend(
                visible
                    .iter()
                    .map(|&i| Cell::from(pad_to_width(annotated.row.cell(i), widths[i]))),
            );
            Row::new(cells).style(style)
        })
        .collect();

    let constraints: Vec<Constraint> = std::iter::once(NOTE_WIDTH)
        .chain(visible.iter().map(|&i| widths[i]))
        .map(|w| Constraint::Length(w as u16))
        .collect();

    let total = result.columns.len();
    let title = if total == 0 {
        format!(" Verification: {} flagged rows ", result.len())
    } else {
        format!(
            " Verification: {} flagged rows | columns {}-{total} of {total} ",
            result.len(),
            offset + 1,
        )
    };

    let table = Table::new(rows, constraints)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(title),
        )
        .row_highlight_style(theme.selected)
        .style(theme.text);

    let mut state = TableState::default().with_selected(Some(cursor.row));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Placeholder when no row is flagged.
pub fn render_no_flags(frame: &mut Frame, area: Rect, rule_count: usize, theme: &Theme) {
    let hint = if rule_count == 0 {
        "No rules defined. Add some with --rules FILE or --rule NAME|COLUMN|PATTERN|MESSAGE."
    } else {
        "No row matches any rule."
    };
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No rows flagged", theme.success)),
        Line::from(""),
        Line::from(Span::styled(hint, theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Verification "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
