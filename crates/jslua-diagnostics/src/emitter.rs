//! Renderers for diagnostics: terminal, JSON lines, and one-line text.

use crate::diagnostic::{Diagnostic, Diagnostics, Severity};
use crate::source_cache::SourceCache;
use console::Style;
use std::io::Write;

pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()>;

    fn emit_all(&mut self, diagnostics: &Diagnostics, cache: &SourceCache) -> std::io::Result<()> {
        for diag in diagnostics {
            self.emit(diag, cache)?;
        }
        Ok(())
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()>;
}

/// Rustc-style output with a source snippet and caret underline.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colored: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, colored: bool) -> Self {
        Self { writer, colored }
    }

    fn style(&self, style: Style) -> Style {
        if self.colored {
            style.force_styling(true)
        } else {
            Style::new().force_styling(false)
        }
    }

    fn severity_style(&self, severity: Severity) -> Style {
        let base = match severity {
            Severity::Error => Style::new().red().bold(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Hint => Style::new().blue().bold(),
        };
        self.style(base)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let sev = self.severity_style(diagnostic.severity);
        let gutter = self.style(Style::new().cyan());

        // warning[U002]: message
        writeln!(
            self.writer,
            "{}: {}",
            sev.apply_to(format!(
                "{}[{}]",
                diagnostic.severity.as_str(),
                diagnostic.code.as_str()
            )),
            diagnostic.message
        )?;

        if let Some(loc) = cache.location(diagnostic.span) {
            writeln!(self.writer, "  {} {}", gutter.apply_to("-->"), loc)?;

            let line_text = cache
                .get_file(diagnostic.span.file_id)
                .and_then(|file| file.line_text(loc.line));
            if let Some(line_text) = line_text {
                let number = loc.line.to_string();
                let pad = " ".repeat(number.len());
                let col = (loc.column - 1) as usize;
                let width = (diagnostic.span.len() as usize)
                    .min(line_text.len().saturating_sub(col))
                    .max(1);

                writeln!(self.writer, "{} {}", pad, gutter.apply_to("|"))?;
                writeln!(self.writer, "{} {}", gutter.apply_to(format!("{} |", number)), line_text)?;
                writeln!(
                    self.writer,
                    "{} {} {}{}",
                    pad,
                    gutter.apply_to("|"),
                    " ".repeat(col),
                    sev.apply_to("^".repeat(width))
                )?;
            }
        }

        if let Some(help) = &diagnostic.help {
            writeln!(self.writer, "  {} {}", gutter.apply_to("= help:"), help)?;
        }

        writeln!(self.writer)
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let errors = diagnostics.error_count();
        let warnings = diagnostics.warning_count();
        if errors == 0 && warnings == 0 {
            return Ok(());
        }

        let plural = |n: usize| if n == 1 { "" } else { "s" };
        let mut parts = Vec::new();
        if errors > 0 {
            parts.push(format!("{} error{}", errors, plural(errors)));
        }
        if warnings > 0 {
            parts.push(format!("{} warning{}", warnings, plural(warnings)));
        }

        let severity = if errors > 0 {
            Severity::Error
        } else {
            Severity::Warning
        };
        let style = self.severity_style(severity);
        writeln!(self.writer, "{}", style.apply_to(format!("{} emitted", parts.join(" and "))))
    }
}

/// One JSON object per line, for editor and CI integration.
pub struct JsonEmitter<W: Write> {
    writer: W,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let json = serde_json::json!({
            "code": diagnostic.code.as_str(),
            "severity": diagnostic.severity.as_str(),
            "message": diagnostic.message,
            "location": cache.location(diagnostic.span).map(|l| serde_json::json!({
                "file": l.file,
                "line": l.line,
                "column": l.column,
            })),
            "span": if diagnostic.span.is_dummy() {
                serde_json::Value::Null
            } else {
                serde_json::json!({ "start": diagnostic.span.start, "end": diagnostic.span.end })
            },
            "help": diagnostic.help,
        });
        serde_json::to_writer(&mut self.writer, &json)?;
        writeln!(self.writer)
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let summary = serde_json::json!({
            "type": "summary",
            "errors": diagnostics.error_count(),
            "warnings": diagnostics.warning_count(),
            "hints": diagnostics.hint_count(),
            "total": diagnostics.len(),
        });
        serde_json::to_writer(&mut self.writer, &summary)?;
        writeln!(self.writer)
    }
}

/// `file:line:col: severity: message [CODE]`
pub struct SimpleEmitter<W: Write> {
    writer: W,
}

impl<W: Write> SimpleEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DiagnosticEmitter for SimpleEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        if let Some(loc) = cache.location(diagnostic.span) {
            write!(self.writer, "{}: ", loc)?;
        }
        writeln!(
            self.writer,
            "{}: {} [{}]",
            diagnostic.severity, diagnostic.message, diagnostic.code
        )
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "{} error(s), {} warning(s)",
            diagnostics.error_count(),
            diagnostics.warning_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;
    use crate::span::Span;

    fn sample() -> (SourceCache, Diagnostics) {
        let mut cache = SourceCache::new();
        let id = cache.add_file("t.js", "var a = 1;\nx => x;\n".to_string());
        let mut diags = Diagnostics::new();
        diags.push(
            Diagnostic::new(DiagnosticCode::UnsupportedExpression, "ArrowFunctionExpression")
                .with_span(Span::new(id, 11, 17))
                .with_help("use a function expression")
                .build(),
        );
        (cache, diags)
    }

    #[test]
    fn test_terminal_plain() {
        let (cache, diags) = sample();
        let mut out = Vec::new();
        {
            let mut emitter = TerminalEmitter::new(&mut out, false);
            emitter.emit_all(&diags, &cache).unwrap();
            emitter.emit_summary(&diags).unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("warning[U002]: ArrowFunctionExpression"));
        assert!(text.contains("--> t.js:2:1"));
        assert!(text.contains("2 | x => x;"));
        assert!(text.contains("^^^^^^"));
        assert!(text.contains("= help: use a function expression"));
        assert!(text.contains("1 warning emitted"));
    }

    #[test]
    fn test_json_lines() {
        let (cache, diags) = sample();
        let mut out = Vec::new();
        {
            let mut emitter = JsonEmitter::new(&mut out);
            emitter.emit_all(&diags, &cache).unwrap();
            emitter.emit_summary(&diags).unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["code"], "U002");
        assert_eq!(lines[0]["location"]["line"], 2);
        assert_eq!(lines[1]["warnings"], 1);
    }

    #[test]
    fn test_simple_without_location() {
        let cache = SourceCache::new();
        let diag = Diagnostic::new(DiagnosticCode::InternalError, "scope underflow").build();
        let mut out = Vec::new();
        SimpleEmitter::new(&mut out).emit(&diag, &cache).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "error: scope underflow [I001]\n");
    }
}
