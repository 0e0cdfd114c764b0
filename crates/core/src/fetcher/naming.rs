//! Local file naming for fetched inputs.

use reqwest::Url;

/// Extensions left untouched when deriving a local file name.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &[".mp4", ".mov", ".avi", ".mp3", ".mkv"];

/// Appended when the derived name has no recognized extension.
pub const DEFAULT_EXTENSION: &str = ".mp4";

/// Derives the staging file name for an input: `<alias>_<url basename>`.
///
/// The query string and fragment never take part in the name. The basename
/// keeps its percent-encoding; any character outside the shell-safe set is
/// replaced by `_`, so the name is one path component and one word when
/// substituted into a command template.
pub fn local_file_name(alias: &str, url: &Url) -> String {
    let basename = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    let sanitized: String = format!("{}_{}", alias, basename)
        .chars()
        .map(|c| if is_shell_safe(c) { c } else { '_' })
        .collect();

    let lower = sanitized.to_ascii_lowercase();
    if RECOGNIZED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        sanitized
    } else {
        format!("{}{}", sanitized, DEFAULT_EXTENSION)
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '%' | '+' | ',' | '=' | '@' | ':')
}
