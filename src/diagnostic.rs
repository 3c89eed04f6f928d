use std::fmt;

/// A source position with the width of the offending text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub column: u32,
    pub width: usize,
}

impl Span {
    pub fn new(line: u32, column: u32, width: usize) -> Self {
        Self {
            line,
            column,
            width: width.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();

        let severity = match diagnostic.severity {
            Severity::Error => self.red_bold("error"),
            Severity::Warning => self.yellow_bold("warning"),
        };
        match &diagnostic.code {
            Some(code) => out.push_str(&format!(
                "{}[{}]: {}\n",
                severity,
                code,
                self.bold(&diagnostic.message)
            )),
            None => out.push_str(&format!("{}: {}\n", severity, self.bold(&diagnostic.message))),
        }

        if let Some(label) = diagnostic.labels.first() {
            out.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.blue("-->"),
                self.file_name,
                label.span.line,
                label.span.column
            ));
            self.render_label(&mut out, label);
        }

        for note in &diagnostic.notes {
            out.push_str(&format!("  {} {}\n", self.blue("="), note));
        }

        out
    }

    fn render_label(&self, out: &mut String, label: &Label) {
        let Some(text) = source_line(self.source, label.span.line) else {
            return;
        };
        let line_number = label.span.line.to_string();
        let gutter = " ".repeat(line_number.len());

        out.push_str(&format!("{} {}\n", gutter, self.blue("|")));
        out.push_str(&format!("{} {} {}\n", self.blue(&line_number), self.blue("|"), text));

        let pad = " ".repeat(label.span.column.saturating_sub(1) as usize);
        let carets = "^".repeat(label.span.width);
        let underline = if label.message.is_empty() {
            format!("{}{}", pad, carets)
        } else {
            format!("{}{} {}", pad, carets, label.message)
        };
        out.push_str(&format!("{} {} {}\n", gutter, self.blue("|"), self.red(&underline)));
    }

    fn red(&self, s: &str) -> String {
        self.paint("\x1b[31m", s)
    }

    fn red_bold(&self, s: &str) -> String {
        self.paint("\x1b[1;31m", s)
    }

    fn yellow_bold(&self, s: &str) -> String {
        self.paint("\x1b[1;33m", s)
    }

    fn blue(&self, s: &str) -> String {
        self.paint("\x1b[34m", s)
    }

    fn bold(&self, s: &str) -> String {
        self.paint("\x1b[1m", s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{}{}\x1b[0m", code, s)
        } else {
            s.to_string()
        }
    }
}

fn source_line(source: &str, line: u32) -> Option<&str> {
    source.lines().nth(line.saturating_sub(1) as usize)
}

/// Renders every diagnostic followed by an error-count summary.
pub fn render_diagnostics(
    source: &str,
    file_name: &str,
    diagnostics: &[Diagnostic],
    use_color: bool,
) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut out = String::new();

    for diagnostic in diagnostics {
        out.push_str(&renderer.render(diagnostic));
        out.push('\n');
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if errors > 0 {
        out.push_str(&format!(
            "error: aborting due to {} error{}\n",
            errors,
            if errors == 1 { "" } else { "s" }
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_pointer_and_caret() {
        let source = "var x = ;\n";
        let diagnostic = Diagnostic::error("expected expression")
            .with_code("E0101")
            .with_label(Span::new(1, 9, 1), "here");

        let renderer = DiagnosticRenderer::new(source, "script", false);
        let output = renderer.render(&diagnostic);

        assert!(output.contains("error[E0101]: expected expression"));
        assert!(output.contains("script:1:9"));
        assert!(output.contains("var x = ;"));
        assert!(output.contains("^ here"));
    }

    #[test]
    fn summary_counts_errors() {
        let diags = vec![
            Diagnostic::error("one").with_label(Span::new(1, 1, 1), ""),
            Diagnostic::error("two").with_label(Span::new(1, 1, 1), ""),
        ];
        let out = render_diagnostics("x;", "script", &diags, false);
        assert!(out.contains("aborting due to 2 errors"));
    }

    #[test]
    fn width_is_at_least_one() {
        assert_eq!(Span::new(1, 1, 0).width, 1);
    }
}
