pub mod json;
pub mod markdown;
pub(crate) mod util;
pub mod yaml;

use serde::Serialize;

pub use markdown::ToMarkdown;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
    Markdown,
}

impl Format {
    /// # Errors
    ///
    /// Returns an error naming the accepted formats.
    pub fn parse(name: &str) -> Result<Self, String> {
        match name {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!(
                "unknown format '{other}' (expected: yaml, json, markdown)"
            )),
        }
    }
}

/// Render a report in `format`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render<T: Serialize + ToMarkdown>(report: &T, format: Format) -> Result<String, String> {
    match format {
        Format::Yaml => yaml::emit_yaml(report),
        Format::Json => json::emit_json(report),
        Format::Markdown => Ok(report.to_markdown()),
    }
}
