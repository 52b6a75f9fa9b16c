//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::NetfirConfig;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "netfir.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<NetfirConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Returns `<dir>/netfir.toml` if it exists.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Parses and validates a `netfir.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<NetfirConfig, ConfigError> {
    let config: NetfirConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Rejects empty strings and malformed diagnostic codes.
fn validate_config(config: &NetfirConfig) -> Result<(), ConfigError> {
    if config.design.top.as_deref() == Some("") {
        return Err(ConfigError::EmptyField("design.top".to_string()));
    }
    if config.output.path.as_deref() == Some("") {
        return Err(ConfigError::EmptyField("output.path".to_string()));
    }
    let diags = &config.diagnostics;
    for code in diags.allow.iter().chain(&diags.deny) {
        if !is_warning_code(code) {
            return Err(ConfigError::ValidationError(format!(
                "`{code}` is not a warning code (expected W followed by three digits)"
            )));
        }
    }
    if let Some(code) = diags.allow.iter().find(|c| diags.deny.contains(c)) {
        return Err(ConfigError::ValidationError(format!(
            "`{code}` is both allowed and denied"
        )));
    }
    Ok(())
}

fn is_warning_code(code: &str) -> bool {
    code.len() == 4 && code.starts_with('W') && code[1..].bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReportFormat;

    #[test]
    fn empty_config_is_default() {
        let config = load_config_from_str("").unwrap();
        assert!(config.design.top.is_none());
        assert!(config.output.path.is_none());
        assert!(!config.diagnostics.deny_warnings);
        assert_eq!(config.diagnostics.format, ReportFormat::Text);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[design]
top = "cpu"

[output]
path = "build/cpu.fir"

[diagnostics]
deny_warnings = true
format = "json"
allow = ["W305"]
deny = "W301"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.design.top.as_deref(), Some("cpu"));
        assert_eq!(config.output.path.as_deref(), Some("build/cpu.fir"));
        assert!(config.diagnostics.deny_warnings);
        assert_eq!(config.diagnostics.format, ReportFormat::Json);
        assert_eq!(config.diagnostics.allow, vec!["W305"]);
        assert_eq!(config.diagnostics.deny, vec!["W301"]);
    }

    #[test]
    fn empty_top_errors() {
        let err = load_config_from_str("[design]\ntop = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyField(f) if f == "design.top"));
    }

    #[test]
    fn empty_path_errors() {
        let err = load_config_from_str("[output]\npath = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyField(f) if f == "output.path"));
    }

    #[test]
    fn bad_code_errors() {
        let err = load_config_from_str("[diagnostics]\nallow = [\"E301\"]").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        let err = load_config_from_str("[diagnostics]\nallow = [\"W30\"]").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn conflicting_codes_error() {
        let toml = "[diagnostics]\nallow = \"W302\"\ndeny = [\"W302\"]";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(format!("{err}").contains("both allowed and denied"));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn bad_format_errors() {
        let err = load_config_from_str("[diagnostics]\nformat = \"sarif\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_file_and_find() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config(dir.path()).is_none());
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[design]\ntop = \"alu\"\n").unwrap();
        assert_eq!(find_config(dir.path()), Some(path.clone()));
        let config = load_config(&path).unwrap();
        assert_eq!(config.design.top.as_deref(), Some("alu"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
