//! Settings resolution: merging the configuration file with command-line overrides.

use crate::types::{NetfirConfig, ReportFormat};
use std::path::PathBuf;

/// Values given on the command line. `None`/`false` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// `--top`.
    pub top: Option<String>,
    /// Positional OUTPUT argument.
    pub output: Option<PathBuf>,
    /// `--format`.
    pub format: Option<ReportFormat>,
    /// `--deny-warnings`.
    pub deny_warnings: bool,
}

/// The effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    /// Requested top module name, if any.
    pub top: Option<String>,
    /// Output file; `None` means stdout.
    pub output: Option<PathBuf>,
    /// Diagnostic rendering format.
    pub format: ReportFormat,
    /// Whether any warning fails the run.
    pub deny_warnings: bool,
    /// Suppressed warning codes.
    pub allow: Vec<String>,
    /// Warning codes promoted to errors.
    pub deny: Vec<String>,
}

/// Merges `overrides` over `config`.
///
/// Command-line values win over file values; `deny_warnings` is set if either
/// side sets it.
pub fn resolve_settings(config: &NetfirConfig, overrides: &Overrides) -> ResolvedSettings {
    ResolvedSettings {
        top: overrides.top.clone().or_else(|| config.design.top.clone()),
        output: overrides
            .output
            .clone()
            .or_else(|| config.output.path.as_ref().map(PathBuf::from)),
        format: overrides.format.unwrap_or(config.diagnostics.format),
        deny_warnings: overrides.deny_warnings || config.diagnostics.deny_warnings,
        allow: config.diagnostics.allow.clone(),
        deny: config.diagnostics.deny.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    const CONFIG: &str = r#"
[design]
top = "cpu"

[output]
path = "out/cpu.fir"

[diagnostics]
format = "json"
allow = "W305"
"#;

    #[test]
    fn file_values_without_overrides() {
        let config = load_config_from_str(CONFIG).unwrap();
        let settings = resolve_settings(&config, &Overrides::default());
        assert_eq!(settings.top.as_deref(), Some("cpu"));
        assert_eq!(settings.output, Some(PathBuf::from("out/cpu.fir")));
        assert_eq!(settings.format, ReportFormat::Json);
        assert!(!settings.deny_warnings);
        assert_eq!(settings.allow, vec!["W305"]);
    }

    #[test]
    fn overrides_win() {
        let config = load_config_from_str(CONFIG).unwrap();
        let overrides = Overrides {
            top: Some("alu".into()),
            output: Some(PathBuf::from("alu.fir")),
            format: Some(ReportFormat::Text),
            deny_warnings: true,
        };
        let settings = resolve_settings(&config, &overrides);
        assert_eq!(settings.top.as_deref(), Some("alu"));
        assert_eq!(settings.output, Some(PathBuf::from("alu.fir")));
        assert_eq!(settings.format, ReportFormat::Text);
        assert!(settings.deny_warnings);
    }

    #[test]
    fn defaults_select_stdout() {
        let settings = resolve_settings(&NetfirConfig::default(), &Overrides::default());
        assert_eq!(settings.output, None);
        assert_eq!(settings.top, None);
        assert_eq!(settings.format, ReportFormat::Text);
    }
}
