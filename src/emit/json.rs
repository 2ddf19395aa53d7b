use serde::Serialize;

/// Emit a report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn emit_json<T: Serialize + ?Sized>(report: &T) -> Result<String, String> {
    serde_json::to_string_pretty(report)
        .map(|mut json| {
            json.push('\n');
            json
        })
        .map_err(|e| format!("json serialization failed: {e}"))
}
