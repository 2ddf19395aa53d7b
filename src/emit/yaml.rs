use serde::Serialize;

/// Emit a report as YAML.
///
/// # Errors
///
/// Returns an error if YAML serialization fails.
pub fn emit_yaml<T: Serialize + ?Sized>(report: &T) -> Result<String, String> {
    serde_yaml::to_string(report).map_err(|e| format!("yaml serialization failed: {e}"))
}
