//! Rules view: the session's rule set with per-rule hit counts.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use casemix_core::formatting::format_number;
use casemix_core::rules::RuleSet;

use crate::themes::Theme;

/// Render `rules` with the row at `selected` highlighted.
///
/// `hits[i]` is the number of rows rule `i` matches on its own; missing
/// entries read as zero.
pub fn render_rules_view(
    frame: &mut Frame,
    area: Rect,
    rules: &RuleSet,
    hits: &[usize],
    selected: usize,
    theme: &Theme,
) {
    if rules.is_empty() {
        render_no_rules(frame, area, theme);
        return;
    }

    let header = Row::new(
        ["#", "Name", "Column", "Pattern", "Message", "Hits"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let hit_count = hits.get(i).copied().unwrap_or(0);
            let hit_style = if hit_count > 0 {
                theme.table_note
            } else {
                theme.dim
            };
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(rule.name.clone()),
                Cell::from(rule.column.clone()),
                // Quoted so leading/trailing spaces and the empty pattern show.
                Cell::from(format!("\"{}\"", rule.pattern)),
                Cell::from(rule.message.clone()),
                Cell::from(format_number(hit_count as f64, 0)).style(hit_style),
            ])
            .style(theme.table_row)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(18),
        Constraint::Length(14),
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" Rules ({}) ", rules.len()))
                .title_bottom(Line::from(Span::styled(
                    " ↑/↓ select | a add | d delete | s save | e export ",
                    theme.dim,
                ))),
        )
        .row_highlight_style(theme.selected)
        .style(theme.text);

    let mut state = TableState::default().with_selected(Some(selected.min(rules.len() - 1)));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_no_rules(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No rules defined", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Load a JSON rules file with --rules FILE, or pass --rule NAME|COLUMN|PATTERN|MESSAGE.",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Rules "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
