//! Diagnostic rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;
use serde::Serialize;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[W301]: instance of undefined module `sub`
///   --> top.u_sub
///    = note: instance skipped
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        let head = format!("{}[{}]", diag.severity, diag.code);
        if self.color {
            out.push_str(&format!(
                "{}{head}\x1b[0m\x1b[1m: {}\x1b[0m\n",
                diag.severity.ansi_color(),
                diag.message
            ));
        } else {
            out.push_str(&format!("{head}: {}\n", diag.message));
        }

        if !diag.location.is_unknown() {
            out.push_str(&format!("  --> {}\n", diag.location));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

/// Renders each diagnostic as one line of JSON.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        json_line(diag, diag)
    }
}

/// Serializes `value` as one line, falling back to the code and message of
/// `diag` plus the serializer error if `value` cannot be written.
fn json_line(value: &impl Serialize, diag: &Diagnostic) -> String {
    let mut line = serde_json::to_string(value).unwrap_or_else(|err| {
        serde_json::json!({
            "code": diag.code.to_string(),
            "message": diag.message,
            "error": err.to_string(),
        })
        .to_string()
    });
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;
    use crate::location::Location;

    #[test]
    fn render_warning_with_location_and_notes() {
        let diag = Diagnostic::warning(
            DiagnosticCode::warning(301),
            "instance of undefined module `sub`",
            Location::item("top", "u_sub"),
        )
        .with_note("instance skipped")
        .with_help("add the module to the design");

        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.starts_with("warning[W301]: instance of undefined module `sub`\n"));
        assert!(output.contains("  --> top.u_sub\n"));
        assert!(output.contains("   = note: instance skipped\n"));
        assert!(output.contains("   = help: add the module to the design\n"));
    }

    #[test]
    fn render_unknown_location_has_no_arrow() {
        let diag = Diagnostic::error(DiagnosticCode::error(311), "empty design", Location::UNKNOWN);
        let output = TerminalRenderer::new(false).render(&diag);
        assert_eq!(output, "error[E311]: empty design\n");
    }

    #[test]
    fn render_with_color_wraps_header() {
        let diag = Diagnostic::error(DiagnosticCode::error(301), "boom", Location::UNKNOWN);
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;31merror[E301]"));
        assert!(output.contains("boom"));
    }

    #[test]
    fn json_renders_one_line() {
        let diag = Diagnostic::warning(
            DiagnosticCode::warning(302),
            "unsupported cell",
            Location::item("m", "c"),
        );
        let output = JsonRenderer.render(&diag);
        assert!(output.ends_with('\n'));
        assert_eq!(output.matches('\n').count(), 1);
        let back: Diagnostic = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(back, diag);
    }

    struct Unwritable;

    impl Serialize for Unwritable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("unwritable"))
        }
    }

    #[test]
    fn json_failure_still_yields_an_object() {
        let diag = Diagnostic::error(DiagnosticCode::error(305), "bad memory", Location::UNKNOWN);
        let output = json_line(&Unwritable, &diag);
        assert_eq!(output.matches('\n').count(), 1);
        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(value["code"], "E305");
        assert_eq!(value["message"], "bad memory");
        assert_eq!(value["error"], "unwritable");
    }
}
