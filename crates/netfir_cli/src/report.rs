//! Diagnostic filtering and rendering for the terminal.

use netfir_config::{ReportFormat, ResolvedSettings};
use netfir_diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticRenderer, JsonRenderer, Severity, TerminalRenderer,
};

/// Decides which diagnostics are shown and which warnings fail the run.
pub struct DiagnosticPolicy {
    allow: Vec<DiagnosticCode>,
    deny: Vec<DiagnosticCode>,
    deny_warnings: bool,
    verbose: bool,
    quiet: bool,
}

fn parse_codes(codes: &[String]) -> Vec<DiagnosticCode> {
    codes.iter().filter_map(|c| c.parse().ok()).collect()
}

impl DiagnosticPolicy {
    /// Builds the policy from resolved settings and the CLI verbosity flags.
    ///
    /// Code syntax was checked when the config was loaded.
    pub fn new(settings: &ResolvedSettings, verbose: bool, quiet: bool) -> Self {
        Self {
            allow: parse_codes(&settings.allow),
            deny: parse_codes(&settings.deny),
            deny_warnings: settings.deny_warnings,
            verbose,
            quiet,
        }
    }

    /// Filters and promotes diagnostics.
    ///
    /// A code in `deny` is promoted, then a code in `allow` is dropped, then
    /// `deny_warnings` promotes whatever warnings remain. Notes are kept only
    /// in verbose mode. Errors always survive.
    pub fn apply(&self, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        diagnostics
            .into_iter()
            .filter_map(|diag| match diag.severity {
                Severity::Error => Some(diag),
                Severity::Note => (self.verbose && !self.quiet).then_some(diag),
                Severity::Warning => {
                    if self.deny.contains(&diag.code) {
                        Some(diag.promoted())
                    } else if self.allow.contains(&diag.code) {
                        None
                    } else if self.deny_warnings {
                        Some(diag.promoted())
                    } else {
                        (!self.quiet).then_some(diag)
                    }
                }
            })
            .collect()
    }
}

/// Renders diagnostics in the requested format, in order.
pub fn render_all(diagnostics: &[Diagnostic], format: ReportFormat, color: bool) -> String {
    let renderer: Box<dyn DiagnosticRenderer> = match format {
        ReportFormat::Text => Box::new(TerminalRenderer::new(color)),
        ReportFormat::Json => Box::new(JsonRenderer),
    };
    diagnostics.iter().map(|d| renderer.render(d)).collect()
}

/// Counts `(errors, warnings)`.
pub fn count(diagnostics: &[Diagnostic]) -> (usize, usize) {
    diagnostics.iter().fold((0, 0), |(e, w), d| match d.severity {
        Severity::Error => (e + 1, w),
        Severity::Warning => (e, w + 1),
        Severity::Note => (e, w),
    })
}
