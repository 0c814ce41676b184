use std::collections::BTreeMap;

use colored::{Color, ColoredString, Colorize};

use crate::testing::Verdict;

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false;
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

/// Rendering settings passed explicitly to every formatting function.
///
/// With `color == false` all output is plain text, which is what golden tests compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub color: bool,
    pub truecolor: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Self::plain()
    }
}

impl Palette {
    pub const fn plain() -> Self {
        Self {
            color: false,
            truecolor: false,
        }
    }

    /// Colored palette, using 24-bit colors when the terminal advertises them.
    pub fn detect(color: bool) -> Self {
        Self {
            color,
            truecolor: color && is_truecolor_supported(),
        }
    }

    fn paint(&self, s: &str, f: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color {
            f(s).to_string()
        } else {
            s.to_owned()
        }
    }

    pub fn verdict_color(&self, verdict: Verdict) -> Color {
        use Verdict::*;
        if !self.truecolor {
            return match verdict {
                Accepted => Color::Green,
                WrongAnswer => Color::Yellow,
                TimedOut => Color::Red,
                RuntimeError => Color::Magenta,
            };
        }
        match verdict {
            Accepted => Color::TrueColor {
                r: 30,
                g: 180,
                b: 40,
            },
            WrongAnswer => Color::TrueColor {
                r: 210,
                g: 138,
                b: 4,
            },
            TimedOut => Color::TrueColor {
                r: 220,
                g: 42,
                b: 42,
            },
            RuntimeError => Color::TrueColor {
                r: 171,
                g: 40,
                b: 200,
            },
        }
    }

    /// `[AC]` in plain mode, ` AC ` on the verdict's color otherwise.
    pub fn judge_icon(&self, verdict: Verdict) -> String {
        if !self.color {
            return format!("[{}]", verdict);
        }
        let fg = if self.truecolor {
            Color::TrueColor {
                r: 255,
                g: 255,
                b: 255,
            }
        } else {
            Color::BrightWhite
        };
        format!(" {} ", verdict)
            .on_color(self.verdict_color(verdict))
            .bold()
            .color(fg)
            .to_string()
    }

    pub fn on_success(&self, s: &str) -> String {
        self.paint(s, |s| s.on_green().bright_white())
    }

    pub fn on_failure(&self, s: &str) -> String {
        self.paint(s, |s| s.on_red().bright_white())
    }

    pub fn warn(&self, s: &str) -> String {
        self.paint(s, |s| s.yellow())
    }

    pub fn title(&self, s: &str) -> String {
        self.paint(s, |s| s.cyan().bold())
    }

    /// Marker after a diff row whose both sides are present.
    pub fn row_marker(&self, matches: bool) -> String {
        match (self.color, matches) {
            (true, true) => "  ".on_green().to_string(),
            (true, false) => "  ".on_red().to_string(),
            (false, true) => "==".to_owned(),
            (false, false) => "!=".to_owned(),
        }
    }

    /// Colors each `runtime error` occurrence in the solution's stderr.
    pub fn highlight_runtime_error(&self, stderr: &str) -> String {
        const NEEDLE: &str = "runtime error";
        if !self.color {
            return stderr.to_owned();
        }
        stderr.replace(NEEDLE, &NEEDLE.red().to_string())
    }

    /// One-line summary such as `----- 1/3 tests failed 💣 ([WA]x1, [TLE]x1) -----`.
    pub fn summary(&self, verdicts: &[Verdict], num_skipped: usize) -> String {
        let bar = "-".repeat(5);

        let count: BTreeMap<Verdict, usize> =
            verdicts.iter().fold(BTreeMap::new(), |mut count, &v| {
                *count.entry(v).or_default() += 1;
                count
            });

        let num_total = verdicts.len() + num_skipped;
        let num_passed = count.get(&Verdict::Accepted).copied().unwrap_or(0);
        let num_failed = num_total - num_passed;

        let body = if num_passed == num_total {
            self.paint(&format!("All {} tests passed ✨", num_total), |s| s.green())
        } else {
            let summary_msg = if num_passed > 0 {
                format!("{}/{} tests failed 💣", num_failed, num_total)
            } else {
                format!("All {} tests failed 💀", num_total)
            };

            let mut details: Vec<String> = count
                .iter()
                .filter(|(&v, _)| v != Verdict::Accepted)
                .map(|(&v, &cnt)| format!("{}x{}", self.judge_icon(v), cnt))
                .collect();
            if num_skipped > 0 {
                details.push(format!("skipped x{}", num_skipped));
            }

            format!(
                "{} ({})",
                self.paint(&summary_msg, |s| s.bright_red()),
                details.join(", ")
            )
        };

        format!("{} {} {}", bar, body, bar)
    }
}
