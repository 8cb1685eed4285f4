//! Dashboard view: headline claim metrics above two frequency charts.
//!
//! The upper block is a plain [`Paragraph`] of label/value rows. Below it the
//! top diagnoses and top procedures sit side by side, each in its own
//! bordered block.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use casemix_core::formatting::{format_number, format_rupiah};
use casemix_core::models::columns;
use casemix_data::aggregator::ClaimSummary;

use crate::components::frequency_bar::{BarConfig, FrequencyChart};
use crate::components::header::Header;
use crate::themes::Theme;

/// Label column width for metric rows.
const LABEL_WIDTH: usize = 20;

/// Everything the dashboard needs for one frame.
pub struct DashboardData<'a> {
    /// Display name of the loaded file.
    pub source: &'a str,
    pub rule_count: usize,
    pub summary: &'a ClaimSummary,
}

// ── Line builders ─────────────────────────────────────────────────────────────

fn metric_row<'a>(label: &str, value: String, style: Style, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {label:<width$}", width = LABEL_WIDTH), theme.label),
        Span::styled(value, style),
    ])
}

/// Header plus metric rows (extracted for testability).
pub fn build_metric_lines<'a>(data: &DashboardData<'a>, theme: &'a Theme) -> Vec<Line<'a>> {
    let m = &data.summary.metrics;
    let mut lines = Header::new(data.source, m.row_count, data.rule_count, theme).to_lines();

    lines.push(metric_row(
        "Inpatient (PTD 1)",
        format_number(m.inpatient_count as f64, 0),
        theme.value,
        theme,
    ));
    lines.push(metric_row(
        "Outpatient (PTD 2)",
        format_number(m.outpatient_count as f64, 0),
        theme.value,
        theme,
    ));
    lines.push(Line::from(""));
    lines.push(metric_row(
        "Total tariff",
        format_rupiah(m.total_tariff),
        theme.value,
        theme,
    ));
    lines.push(metric_row(
        "Hospital tariff",
        format_rupiah(m.hospital_tariff),
        theme.value,
        theme,
    ));
    let delta = m.tariff_delta();
    lines.push(metric_row(
        "Difference",
        format_rupiah(delta),
        theme.delta_style(delta),
        theme,
    ));
    lines.push(Line::from(""));

    let pct = m.flagged_percentage();
    lines.push(metric_row(
        "Flagged rows",
        format!("{} ({pct:.1}%)", format_number(m.flagged_count as f64, 0)),
        theme.flagged_style(pct),
        theme,
    ));
    lines
}

// ── Main render ───────────────────────────────────────────────────────────────

/// Render the dashboard into `area`.
pub fn render_dashboard(frame: &mut Frame, area: Rect, data: &DashboardData, theme: &Theme) {
    let metric_lines = build_metric_lines(data, theme);
    let [metrics_area, charts_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(metric_lines.len() as u16 + 1),
            Constraint::Min(0),
        ])
        .areas(area);

    frame.render_widget(Paragraph::new(Text::from(metric_lines)), metrics_area);

    let [diag_area, proc_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .areas(charts_area);

    render_chart(
        frame,
        diag_area,
        &format!(" Top diagnoses ({}) ", columns::DIAGLIST),
        FrequencyChart::new(&data.summary.top_diagnoses, theme.bar_diagnosis, theme),
        theme,
    );
    render_chart(
        frame,
        proc_area,
        &format!(" Top procedures ({}) ", columns::PROCLIST),
        FrequencyChart::new(&data.summary.top_procedures, theme.bar_procedure, theme),
        theme,
    );
}

fn render_chart(frame: &mut Frame, area: Rect, title: &str, chart: FrequencyChart, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(title.to_string(), theme.header));

    // Code label, gap, and room for a count label.
    let reserved = BarConfig::default().label_width as u16 + 1 + 8;
    let bar_width = block.inner(area).width.saturating_sub(reserved);
    let lines = chart.width(bar_width).to_lines();

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

/// Placeholder shown before any claim file is loaded.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No claim file loaded", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Start with --input <FILE> to load a tab-delimited E-Klaim export.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Casemix Verifier "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
