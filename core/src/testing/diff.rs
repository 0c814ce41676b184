use crate::style::Palette;

/// One aligned row of a [`DiffView`]. Either side is `None` past the end of its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffRow<'a> {
    pub actual: Option<&'a str>,
    pub expected: Option<&'a str>,
}

impl DiffRow<'_> {
    /// Exact comparison of the raw lines; `None` unless both sides have a line here.
    pub fn matches(&self) -> Option<bool> {
        Some(self.actual? == self.expected?)
    }
}

/// Side-by-side view of the solution's output (left) and the expected answer (right).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffView<'a> {
    width: usize,
    rows: Vec<DiffRow<'a>>,
}

impl<'a> DiffView<'a> {
    pub const MIN_COLUMN_WIDTH: usize = 15;
    /// Columns kept free for separators and markers.
    pub const RESERVED_COLUMNS: usize = 8;

    pub const ACTUAL_LABEL: &'static str = "Your Output:";
    pub const EXPECTED_LABEL: &'static str = "Correct Answer:";

    pub fn new(actual: &'a str, expected: &'a str, display_width: usize) -> Self {
        let actual_lines: Vec<_> = actual.lines().collect();
        let expected_lines: Vec<_> = expected.lines().collect();

        let longest = actual_lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let width = longest
            .max(Self::MIN_COLUMN_WIDTH)
            .min(display_width.saturating_sub(Self::RESERVED_COLUMNS));

        let num_rows = actual_lines.len().max(expected_lines.len());
        let rows = (0..num_rows)
            .map(|i| DiffRow {
                actual: actual_lines.get(i).copied(),
                expected: expected_lines.get(i).copied(),
            })
            .collect();

        Self { width, rows }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[DiffRow<'a>] {
        &self.rows
    }

    fn pad(&self, s: Option<&str>) -> String {
        format!("{:<w$}", s.unwrap_or(""), w = self.width)
    }

    /// Actual line at `row` right-padded to the column width (never truncated).
    pub fn left_cell(&self, row: usize) -> String {
        self.pad(self.rows.get(row).and_then(|r| r.actual))
    }

    pub fn right_cell(&self, row: usize) -> String {
        self.pad(self.rows.get(row).and_then(|r| r.expected))
    }

    pub fn header(&self, palette: &Palette) -> String {
        format!(
            "{}{}",
            palette.on_failure(&format!("{}|", self.pad(Some(Self::ACTUAL_LABEL)))),
            palette.on_success(&format!("|{}", Self::EXPECTED_LABEL)),
        )
    }

    /// Header line followed by one line per row.
    pub fn render(&self, palette: &Palette) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.header(palette));
        for (i, row) in self.rows.iter().enumerate() {
            let marker = row
                .matches()
                .map(|eq| palette.row_marker(eq))
                .unwrap_or_default();
            lines.push(format!("{}||{}{}", self.left_cell(i), self.right_cell(i), marker));
        }
        lines
    }
}
