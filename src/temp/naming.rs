// src/temp/naming.rs

pub const DEFAULT_PREFIX: &str = "tmp-";
pub const DEFAULT_SUFFIX: &str = ".tmp";

/// Missing or empty prefixes become `tmp-`; anything else is forced to end
/// with `-`.
pub fn normalize_prefix(prefix: Option<&str>) -> String {
    match prefix {
        None | Some("") => DEFAULT_PREFIX.to_string(),
        Some(p) if p.ends_with('-') => p.to_string(),
        Some(p) => format!("{p}-"),
    }
}

/// Missing or empty suffixes become `.tmp`; anything else is forced to start
/// with `.`.
pub fn normalize_suffix(suffix: Option<&str>) -> String {
    match suffix {
        None | Some("") => DEFAULT_SUFFIX.to_string(),
        Some(s) if s.starts_with('.') => s.to_string(),
        Some(s) => format!(".{s}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_and_empty() {
        assert_eq!(normalize_prefix(None), "tmp-");
        assert_eq!(normalize_prefix(Some("")), "tmp-");
        assert_eq!(normalize_suffix(None), ".tmp");
        assert_eq!(normalize_suffix(Some("")), ".tmp");
    }

    #[test]
    fn separators_are_added_once() {
        assert_eq!(normalize_prefix(Some("build")), "build-");
        assert_eq!(normalize_prefix(Some("build-")), "build-");
        assert_eq!(normalize_suffix(Some("log")), ".log");
        assert_eq!(normalize_suffix(Some(".log")), ".log");
        assert_eq!(normalize_suffix(Some("tar.gz")), ".tar.gz");
    }
}
