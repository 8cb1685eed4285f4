use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Width of the `=` separator under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering four lines:
///
/// 1. Application title.
/// 2. A 60-column `=` separator.
/// 3. Source file, row count and rule count as `[ file | N rows | M rules ]`.
/// 4. An empty line.
pub struct Header<'a> {
    /// File name of the loaded claim export, or `"no file"`.
    pub source: &'a str,
    pub rows: usize,
    pub rules: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, rows: usize, rules: usize, theme: &'a Theme) -> Self {
        Self {
            source,
            rows,
            rules,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(Span::styled("CASEMIX VERIFIER", self.theme.header)),
            Line::from(Span::styled(
                "=".repeat(SEPARATOR_WIDTH),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(plural(self.rows, "row"), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(plural(self.rules, "rule"), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

fn plural(n: usize, noun: &str) -> String {
    let count = casemix_core::formatting::format_number(n as f64, 0);
    if n == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let lines = Header::new("klaim.txt", 3, 1, &theme).to_lines();
        assert_eq!(lines.len(), 4, "header must produce exactly 4 lines");
        assert!(text(&lines[3]).is_empty());
    }

    #[test]
    fn test_header_title_and_separator() {
        let theme = Theme::dark();
        let lines = Header::new("klaim.txt", 0, 0, &theme).to_lines();
        assert_eq!(text(&lines[0]), "CASEMIX VERIFIER");
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), SEPARATOR_WIDTH);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::dark();
        let lines = Header::new("klaim.txt", 1250, 1, &theme).to_lines();
        assert_eq!(text(&lines[2]), "[ klaim.txt | 1,250 rows | 1 rule ]");
    }
}
