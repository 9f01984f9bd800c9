//! Pure path resolution.
//!
//! Paths resolve to segment lists from the root. Resolution is syntactic: the
//! result is never checked against the filesystem.

use crate::config::HOME_SEGMENTS;

/// Segments of the home directory.
pub fn home() -> Vec<String> {
    HOME_SEGMENTS.iter().map(|s| s.to_string()).collect()
}

/// Resolve `path` against the working directory `cwd`.
///
/// - `~` is home, `~/rest` is relative to home
/// - a leading `/` is absolute
/// - anything else is relative to `cwd`
///
/// `..` pops a segment and floors at the root; `.` and empty segments are
/// skipped. The result never contains `.` or `..`.
pub fn resolve_path(path: &str, cwd: &[String]) -> Vec<String> {
    if path == "~" {
        return home();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return push_segments(home(), rest);
    }
    if let Some(rest) = path.strip_prefix('/') {
        return push_segments(Vec::new(), rest);
    }
    push_segments(cwd.to_vec(), path)
}

fn push_segments(mut base: Vec<String>, path: &str) -> Vec<String> {
    for part in path.split('/').filter(|s| !s.is_empty()) {
        match part {
            ".." => {
                base.pop();
            }
            "." => {}
            _ => base.push(part.to_string()),
        }
    }
    base
}

/// Render segments as an absolute path.
pub fn display_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

/// Render segments the way the prompt shows them (`~` for home).
pub fn prompt_path(segments: &[String]) -> String {
    let home = home();
    if segments.starts_with(&home) {
        let rest = &segments[home.len()..];
        if rest.is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", rest.join("/"))
        }
    } else {
        display_path(segments)
    }
}

/// Split segments into (parent, name). `None` for the root.
pub fn split_last(segments: &[String]) -> Option<(&[String], &str)> {
    let (name, parent) = segments.split_last()?;
    Some((parent, name.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_home_forms() {
        assert_eq!(resolve_path("~", &segs(&["tmp"])), segs(&["home", "user"]));
        assert_eq!(
            resolve_path("~/documents", &[]),
            segs(&["home", "user", "documents"])
        );
        assert_eq!(
            resolve_path("~//documents/", &[]),
            segs(&["home", "user", "documents"])
        );
    }

    #[test]
    fn test_absolute() {
        assert_eq!(
            resolve_path("/etc/motd", &segs(&["home"])),
            segs(&["etc", "motd"])
        );
        assert_eq!(resolve_path("/", &segs(&["home"])), Vec::<String>::new());
    }

    #[test]
    fn test_relative() {
        assert_eq!(
            resolve_path("documents", &segs(&["home", "user"])),
            segs(&["home", "user", "documents"])
        );
        assert_eq!(
            resolve_path("./a/./b", &segs(&["x"])),
            segs(&["x", "a", "b"])
        );
        assert_eq!(resolve_path("", &segs(&["x"])), segs(&["x"]));
    }

    #[test]
    fn test_parent_floors_at_root() {
        assert_eq!(resolve_path("../../x", &segs(&["home", "user"])), segs(&["x"]));
        assert_eq!(resolve_path("..", &[]), Vec::<String>::new());
        assert_eq!(resolve_path("../../../..", &segs(&["a"])), Vec::<String>::new());
        assert_eq!(resolve_path("/../..", &segs(&["a"])), Vec::<String>::new());
    }

    #[test]
    fn test_never_contains_dot_segments() {
        let cwd = segs(&["home", "user"]);
        for path in ["..", ".", "../.", "./..", "a/../..", "~/../..", "/./a/../b/.."] {
            let resolved = resolve_path(path, &cwd);
            assert!(
                !resolved.iter().any(|s| s == "." || s == ".."),
                "{path} resolved to {resolved:?}"
            );
        }
    }

    #[test]
    fn test_display_and_prompt() {
        assert_eq!(display_path(&[]), "/");
        assert_eq!(display_path(&segs(&["etc", "motd"])), "/etc/motd");
        assert_eq!(prompt_path(&segs(&["home", "user"])), "~");
        assert_eq!(prompt_path(&segs(&["home", "user", "docs"])), "~/docs");
        assert_eq!(prompt_path(&segs(&["tmp"])), "/tmp");
    }

    #[test]
    fn test_split_last() {
        let path = segs(&["a", "b"]);
        let (parent, name) = split_last(&path).unwrap();
        assert_eq!(parent, &segs(&["a"])[..]);
        assert_eq!(name, "b");
        assert!(split_last(&[]).is_none());
    }
}
