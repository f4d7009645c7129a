//! Path Resolver
//!
//! Expands configuration-supplied selection patterns into a concrete file
//! list plus the dependency edges the host build system must watch for the
//! result to stay valid. Literal patterns contribute exact-file edges;
//! wildcard patterns additionally contribute directory edges, because a
//! wildcard's result set can change when files are added or removed without
//! any existing file changing.

use std::path::{Path, PathBuf};

use crate::error::{GlyphpackError, GlyphpackResult};

/// The outcome of resolving a list of selection patterns.
///
/// `files` preserves pattern input order; matches of a single wildcard
/// follow filesystem enumeration order, which is not guaranteed stable
/// across platforms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFileSet {
    /// Absolute source files, in glyph order
    pub files: Vec<PathBuf>,
    /// Exact files that invalidate the build when changed
    pub file_deps: Vec<PathBuf>,
    /// Directories that invalidate the build when their contents change
    pub directory_deps: Vec<PathBuf>,
}

/// True if the pattern contains glob metacharacters understood by the
/// `glob` crate.
pub fn has_magic(pattern: &str) -> bool {
    pattern.chars().any(|c| matches!(c, '*' | '?' | '['))
}

/// Resolve selection patterns against `base_dir`.
///
/// Literal patterns are not checked for existence here; a missing file
/// surfaces later as a read failure inside the compositing engine. This
/// keeps resolution side-effect-light.
pub fn resolve(patterns: &[String], base_dir: &Path) -> GlyphpackResult<ResolvedFileSet> {
    let mut set = ResolvedFileSet::default();

    for pattern in patterns {
        if has_magic(pattern) {
            add_by_glob(&mut set, pattern, base_dir)?;
        } else {
            add_file(&mut set, pattern, base_dir);
        }
    }

    Ok(set)
}

fn add_file(set: &mut ResolvedFileSet, pattern: &str, base_dir: &Path) {
    set.file_deps.push(PathBuf::from(pattern));
    set.files.push(absolute(base_dir, Path::new(pattern)));
}

fn add_by_glob(set: &mut ResolvedFileSet, pattern: &str, base_dir: &Path) -> GlyphpackResult<()> {
    let rooted = absolute(base_dir, Path::new(pattern));
    let matches = expand(&rooted, pattern)?;
    set.files.extend(matches);

    // Watch every directory the pattern's parent portion expands to, so
    // added or removed files re-trigger resolution.
    let parent = Path::new(pattern)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| absolute(base_dir, p))
        .unwrap_or_else(|| base_dir.to_path_buf());

    // Only directories that exist at resolution time are watched, matching
    // the expansion the pattern itself would see.
    let dirs: Vec<PathBuf> = if has_magic(&parent.to_string_lossy()) {
        expand(&parent, pattern)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect()
    } else if parent.is_dir() {
        vec![parent]
    } else {
        Vec::new()
    };

    for dir in dirs {
        if !set.directory_deps.contains(&dir) {
            set.directory_deps.push(dir);
        }
    }

    Ok(())
}

fn expand(rooted: &Path, original: &str) -> GlyphpackResult<Vec<PathBuf>> {
    let paths = glob::glob(&rooted.to_string_lossy()).map_err(|e| {
        GlyphpackError::InvalidPattern {
            pattern: original.to_string(),
            message: e.msg.to_string(),
        }
    })?;

    // Unreadable entries are dropped rather than failing resolution.
    Ok(paths.filter_map(Result::ok).collect())
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "<svg/>").unwrap();
    }

    #[test]
    fn has_magic_detects_wildcards() {
        assert!(has_magic("icons/*.svg"));
        assert!(has_magic("icons/??.svg"));
        assert!(has_magic("icons/[ab].svg"));
        assert!(!has_magic("icons/star.svg"));
    }

    #[test]
    fn literal_patterns_preserve_order_and_become_file_deps() {
        let dir = tempdir().unwrap();
        let patterns = vec!["icons/b.svg".to_string(), "icons/a.svg".to_string()];

        let set = resolve(&patterns, dir.path()).unwrap();

        assert_eq!(
            set.files,
            vec![dir.path().join("icons/b.svg"), dir.path().join("icons/a.svg")]
        );
        assert_eq!(
            set.file_deps,
            vec![PathBuf::from("icons/b.svg"), PathBuf::from("icons/a.svg")]
        );
        assert!(set.directory_deps.is_empty());
    }

    #[test]
    fn literal_pattern_missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let set = resolve(&["nope/missing.svg".to_string()], dir.path()).unwrap();
        assert_eq!(set.files.len(), 1);
    }

    #[test]
    fn wildcard_pattern_expands_and_adds_directory_dep() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "icons/a.svg");
        touch(dir.path(), "icons/b.svg");

        let set = resolve(&["icons/*.svg".to_string()], dir.path()).unwrap();

        let mut files = set.files.clone();
        files.sort();
        assert_eq!(
            files,
            vec![dir.path().join("icons/a.svg"), dir.path().join("icons/b.svg")]
        );
        assert!(set.file_deps.is_empty());
        assert_eq!(set.directory_deps, vec![dir.path().join("icons")]);
    }

    #[test]
    fn wildcard_in_parent_expands_each_directory_once() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "pack1/icons/a.svg");
        touch(dir.path(), "pack2/icons/b.svg");

        let set = resolve(&["pack*/icons/*.svg".to_string()], dir.path()).unwrap();

        assert_eq!(set.files.len(), 2);
        let mut dirs = set.directory_deps.clone();
        dirs.sort();
        assert_eq!(
            dirs,
            vec![
                dir.path().join("pack1/icons"),
                dir.path().join("pack2/icons")
            ]
        );
    }

    #[test]
    fn duplicate_directory_deps_are_deduplicated() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "icons/a.svg");

        let set = resolve(
            &["icons/*.svg".to_string(), "icons/a*.svg".to_string()],
            dir.path(),
        )
        .unwrap();

        assert_eq!(set.directory_deps, vec![dir.path().join("icons")]);
    }

    #[test]
    fn bare_wildcard_watches_base_dir() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.svg");

        let set = resolve(&["*.svg".to_string()], dir.path()).unwrap();

        assert_eq!(set.files, vec![dir.path().join("a.svg")]);
        assert_eq!(set.directory_deps, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn mixed_patterns_keep_input_order() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "icons/z.svg");

        let set = resolve(
            &["first.svg".to_string(), "icons/*.svg".to_string()],
            dir.path(),
        )
        .unwrap();

        assert_eq!(set.files[0], dir.path().join("first.svg"));
        assert_eq!(set.files[1], dir.path().join("icons/z.svg"));
    }

    #[test]
    fn invalid_glob_pattern_is_an_error() {
        let dir = tempdir().unwrap();
        let err = resolve(&["icons/[.svg".to_string()], dir.path()).unwrap_err();
        assert!(err.to_string().contains("invalid selection pattern"));
    }

    #[test]
    fn resolution_is_deterministic_on_unchanged_tree() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "icons/a.svg");
        touch(dir.path(), "icons/b.svg");
        let patterns = vec!["icons/*.svg".to_string(), "extra.svg".to_string()];

        let first = resolve(&patterns, dir.path()).unwrap();
        let second = resolve(&patterns, dir.path()).unwrap();

        assert_eq!(first, second);
    }
}
