use colored::Colorize;
use formtree_common::{Diagnostic, DiagnosticCategory};

/// Renders diagnostics as `file:location - error FT3002: message`.
pub struct Reporter {
    color: bool,
    file: Option<String>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color, file: None }
    }

    /// The document the diagnostics belong to.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        if diagnostics.len() > 1 {
            out.push_str(&self.format_summary(diagnostics.len()));
            out.push('\n');
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = self.format_location(&diagnostic.location);
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);
        output
    }

    fn format_location(&self, location: &str) -> String {
        let text = match (&self.file, location.is_empty()) {
            (Some(file), true) => file.clone(),
            (Some(file), false) => format!("{file}:{location}"),
            (None, true) => "<unknown>".to_string(),
            (None, false) => location.to_string(),
        };
        if self.color {
            text.cyan().to_string()
        } else {
            text
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("FT{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }

    fn format_summary(&self, count: usize) -> String {
        let summary = format!("Found {count} errors.");
        if self.color {
            summary.bold().to_string()
        } else {
            summary
        }
    }
}
