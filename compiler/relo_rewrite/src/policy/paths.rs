//! Lexical path arithmetic for the project-relative stage.
//!
//! Module specifiers and origin paths are `/`-separated strings. Resolution
//! is purely lexical (`.` dropped, `..` pops a segment) — the core performs
//! no filesystem access, so symlinks and case-folding are out of scope.

/// Directory portion of a file path: everything before the last `/`.
/// A path with no separator has an empty directory.
pub(crate) fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Resolve `relative` against the directory `dir`, normalizing `.` and `..`
/// segments. A leading `/` on `dir` is preserved; `..` past the root is
/// dropped rather than failing.
pub(crate) fn resolve_against(dir: &str, relative: &str) -> String {
    let rooted = dir.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in dir.split('/').chain(relative.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if rooted {
        format!("/{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parent_dir_splits_on_last_separator() {
        assert_eq!(parent_dir("/proj/test/fixture/foo.ts"), "/proj/test/fixture");
        assert_eq!(parent_dir("foo.ts"), "");
        assert_eq!(parent_dir("/foo.ts"), "");
    }

    #[test]
    fn resolve_sibling() {
        assert_eq!(
            resolve_against("/proj/test/fixture", "./bar"),
            "/proj/test/fixture/bar"
        );
    }

    #[test]
    fn resolve_parent_then_descend() {
        assert_eq!(
            resolve_against("/proj/test/fixture", "../fixture/bar"),
            "/proj/test/fixture/bar"
        );
        assert_eq!(resolve_against("/proj/test/fixture", "../../lib"), "/proj/lib");
    }

    #[test]
    fn dotdot_past_root_is_dropped() {
        assert_eq!(resolve_against("/proj", "../../../x"), "/x");
    }

    #[test]
    fn relative_dir_stays_relative() {
        assert_eq!(resolve_against("test/fixture", "./bar"), "test/fixture/bar");
    }
}
