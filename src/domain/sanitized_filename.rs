use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

const FALLBACK_NAME: &str = "upload";
const MAX_NAME_BYTES: usize = 200;

/// A client-supplied filename reduced to `[A-Za-z0-9_.-]`.
///
/// Never contains a path separator, a control character or a leading dot,
/// so it can be joined onto the holding directory without escaping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedFilename(String);

impl SanitizedFilename {
    pub fn new(original: &str) -> Self {
        let ascii: String = original.nfkd().filter(char::is_ascii).collect();
        let separated = ascii.replace(['/', '\\'], " ");
        let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");
        let stripped = UNSAFE_CHARS.replace_all(&joined, "");
        let trimmed = stripped.trim_matches(|c: char| c == '.' || c == '_');

        if trimmed.is_empty() {
            return Self(FALLBACK_NAME.to_string());
        }

        Self(truncate_keeping_extension(trimmed, MAX_NAME_BYTES))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Input is pure ASCII at this point, so byte slicing is char-safe.
fn truncate_keeping_extension(name: &str, limit: usize) -> String {
    if name.len() <= limit {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(dot) if name.len() - dot < limit / 4 => {
            let extension = &name[dot..];
            format!("{}{}", &name[..limit - extension.len()], extension)
        }
        _ => name[..limit].to_string(),
    }
}
