//! Console diagnostics.
//!
//! Every provider outcome is printed as a [`Diagnostic`]: a headline and a
//! list of remediation hints. The whole diagnostic is written with a single
//! `println!` so output from concurrent providers does not interleave
//! within one diagnostic.

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    headline: String,
    hints: Vec<String>,
}

impl Diagnostic {
    pub fn success(headline: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            headline: headline.into(),
            hints: Vec::new(),
        }
    }

    pub fn failure(headline: impl Into<String>) -> Self {
        Self {
            severity: Severity::Failure,
            headline: headline.into(),
            hints: Vec::new(),
        }
    }

    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    #[must_use]
    pub fn hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hints.extend(hints.into_iter().map(Into::into));
        self
    }

    pub const fn severity(&self) -> Severity {
        self.severity
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn hint_lines(&self) -> &[String] {
        &self.hints
    }

    pub fn render(&self) -> String {
        let mut out = match self.severity() {
            Severity::Success => format!("{} {}", "✔".green().bold(), self.headline.green()),
            Severity::Failure => format!("{} {}", "✖".red().bold(), self.headline.red()),
        };

        let hints = self.hint_lines();
        if !hints.is_empty() {
            out.push('\n');
            out.push_str(&format!("  {}", "hint:".yellow()));
            for hint in hints {
                out.push_str(&format!("\n    • {hint}"));
            }
        }

        out
    }

    pub fn print(&self) {
        println!("{}", self.render());
    }
}
