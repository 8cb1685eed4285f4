use casemix_data::aggregator::CodeFrequency;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// Configuration controlling the look of a frequency chart.
pub struct BarConfig {
    /// Width in terminal columns of the bar portion (excluding labels).
    pub width: u16,
    /// Character used for the filled portion.
    pub filled_char: char,
    /// Character used for the empty portion.
    pub empty_char: char,
    /// Column width reserved for the code label; longer codes are cut.
    pub label_width: usize,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
            label_width: 10,
        }
    }
}

// ── FrequencyChart ───────────────────────────────────────────────────────────

/// Horizontal bar chart of code counts, one line per code.
///
/// Bars are scaled to the largest count in the chart, so the most frequent
/// code always fills the full width. Each line reads
/// `<code> <filled><empty> <count>`.
pub struct FrequencyChart<'a> {
    pub frequencies: &'a [CodeFrequency],
    /// Style of the filled portion.
    pub bar_style: Style,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> FrequencyChart<'a> {
    pub fn new(frequencies: &'a [CodeFrequency], bar_style: Style, theme: &'a Theme) -> Self {
        Self {
            frequencies,
            bar_style,
            theme,
            config: BarConfig::default(),
        }
    }

    /// Set the bar width, keeping the other settings.
    pub fn width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Number of filled columns for `count`.
    pub fn filled_columns(&self, count: usize) -> u16 {
        let max = self.frequencies.iter().map(|f| f.count).max().unwrap_or(0);
        if max == 0 || self.config.width == 0 {
            return 0;
        }
        let filled = ((count as f64 / max as f64) * self.config.width as f64).round() as u16;
        // A code that occurs at all gets at least one column.
        filled.clamp(u16::from(count > 0), self.config.width)
    }

    /// Render the chart, or a single dim placeholder line when empty.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        if self.frequencies.is_empty() {
            return vec![Line::from(Span::styled("(no codes)", self.theme.dim))];
        }

        self.frequencies
            .iter()
            .map(|f| {
                let filled = self.filled_columns(f.count);
                let empty = self.config.width.saturating_sub(filled);
                let filled_str: String =
                    std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
                let empty_str: String =
                    std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

                Line::from(vec![
                    Span::styled(
                        pad_to_width(&f.code, self.config.label_width),
                        self.theme.label,
                    ),
                    Span::raw(" "),
                    Span::styled(filled_str, self.bar_style),
                    Span::styled(empty_str, self.theme.bar_empty),
                    Span::styled(format!(" {}", f.count), self.theme.bar_label),
                ])
            })
            .collect()
    }
}

/// Cut or pad `text` to exactly `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(out.width())));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
