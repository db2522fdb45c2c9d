//! Markdown-style text tables for command messages.

/// Column alignment.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(super) enum Align {
    Left,
    Right,
}

/// A table that is rendered as Markdown so that it reads well in a terminal and pastes well into
/// documents.
#[derive(Debug, Clone)]
pub(super) struct Table {
    headers: Vec<(String, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(super) fn new<S: Into<String>>(headers: impl IntoIterator<Item = (S, Align)>) -> Self {
        Self {
            headers: headers.into_iter().map(|(h, a)| (h.into(), a)).collect(),
            rows: Vec::new(),
        }
    }

    /// Adds a row. Missing cells are rendered empty and extra cells are dropped.
    pub(super) fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub(super) fn render(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(ix, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(ix))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.line(self.headers.iter().map(|(h, _)| h.as_str()), &widths));
        let rule: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|((_, align), width)| match align {
                Align::Left => "-".repeat(*width),
                Align::Right => format!("{}:", "-".repeat(width - 1)),
            })
            .collect();
        lines.push(format!("| {} |", rule.join(" | ")));
        for row in &self.rows {
            let cells = (0..self.headers.len()).map(|ix| row.get(ix).map_or("", String::as_str));
            lines.push(self.line(cells, &widths));
        }
        lines.join("\n")
    }

    fn line<'a>(&self, cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
        let cells: Vec<String> = cells
            .zip(widths)
            .zip(&self.headers)
            .map(|((cell, width), (_, align))| {
                let pad = width.saturating_sub(cell.chars().count());
                match align {
                    Align::Left => format!("{cell}{}", " ".repeat(pad)),
                    Align::Right => format!("{}{cell}", " ".repeat(pad)),
                }
            })
            .collect();
        format!("| {} |", cells.join(" | "))
    }
}
