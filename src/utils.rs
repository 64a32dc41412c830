//! Small string and file system helpers shared across the pipeline.

use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::error::Result;

/// Collapse every run of whitespace (including NBSP) into a single space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to `max` characters, appending `…` when anything was cut.
///
/// Counts characters rather than bytes, so Cyrillic text is never split
/// mid-codepoint.
///
/// ```ignore
/// assert_eq!(truncate_chars("привет", 3), "при…");
/// assert_eq!(truncate_chars("ok", 3), "ok");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…(+{} bytes)", &s[..idx], s.len() - idx),
        None => s.to_string(),
    }
}

/// Drop characters that are not allowed in XML 1.0 text.
///
/// Tab, LF and CR are kept. Other C0 controls and U+FFFE/U+FFFF are removed.
pub fn sanitize_xml_text(input: &str) -> String {
    input
        .chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}

/// Ensure the directory that will hold `file` exists and is writable.
///
/// Creates the directory if needed, then checks it by creating and removing
/// a scratch file.
#[instrument(level = "info", skip_all, fields(path = %file.display()))]
pub async fn ensure_writable_dir(file: &Path) -> Result<()> {
    let dir = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;

    let scratch_path = dir.join(".__write_check__");
    fs::File::create(&scratch_path).await?;
    if let Err(e) = fs::remove_file(&scratch_path).await {
        warn!(path = %scratch_path.display(), error = %e, "Failed to remove scratch file");
    }
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
