//! Configuration types deserialized from `netfir.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level configuration parsed from `netfir.toml`.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetfirConfig {
    /// Design selection settings.
    #[serde(default)]
    pub design: DesignConfig,
    /// Output destination settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Diagnostic reporting settings.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Which module becomes the FIRRTL circuit top.
#[derive(Debug, Default, Deserialize)]
pub struct DesignConfig {
    /// Overrides the design's own top module choice.
    pub top: Option<String>,
}

/// Where the generated FIRRTL goes.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Default output file when none is given on the command line.
    pub path: Option<String>,
}

/// How diagnostics are reported and which ones fail the run.
#[derive(Debug, Default, Deserialize)]
pub struct DiagnosticsConfig {
    /// Treat every remaining warning as an error.
    #[serde(default)]
    pub deny_warnings: bool,
    /// Rendering format.
    #[serde(default)]
    pub format: ReportFormat,
    /// Warning codes to suppress, e.g. `"W305"`.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub allow: Vec<String>,
    /// Warning codes to promote to errors.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub deny: Vec<String>,
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `allow = "W305"` as well as `allow = ["W305", "W302"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut codes = Vec::new();
            while let Some(code) = seq.next_element::<String>()? {
                codes.push(code);
            }
            Ok(codes)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Diagnostic rendering format.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable terminal output (default).
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_format_default_is_text() {
        assert_eq!(ReportFormat::default(), ReportFormat::Text);
    }

    #[test]
    fn allow_accepts_string_or_list() {
        let one: DiagnosticsConfig = toml::from_str(r#"allow = "W305""#).unwrap();
        assert_eq!(one.allow, vec!["W305"]);
        let many: DiagnosticsConfig = toml::from_str(r#"allow = ["W301", "W302"]"#).unwrap();
        assert_eq!(many.allow, vec!["W301", "W302"]);
        assert!(many.deny.is_empty());
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(toml::from_str::<NetfirConfig>("[lint]\nx = 1").is_err());
    }
}
