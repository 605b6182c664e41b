//! Predicates used to prune `ls` results.
//!
//! Several filters passed to `ls` together must all accept an entry; `with_exts` builds a
//! filter that accepts an entry if any one of its extensions does.

use glob::{MatchOptions, Pattern};

use crate::vfs::FileInfo;

/// A predicate over an entry's metadata.
pub type FileFilter = Box<dyn Fn(&FileInfo) -> bool + Send + Sync>;

/// Accepts entries whose name ends with `.{extension}`, ignoring case.
///
/// The leading `.` is optional: `"txt"` and `".txt"` are the same filter. Multi-segment
/// extensions like `"tar.gz"` compare as a plain suffix. An empty extension (or a bare `.`)
/// accepts everything.
///
/// ```
/// use filestore::filter::with_ext;
///
/// let txt = with_ext("txt");
/// ```
pub fn with_ext(extension: &str) -> FileFilter {
    if extension.is_empty() || extension == "." {
        return with_everything();
    }

    let extension = extension.to_lowercase();
    let suffix = format!(".{}", extension.strip_prefix('.').unwrap_or(&extension));

    Box::new(move |info: &FileInfo| info.name().to_lowercase().ends_with(&suffix))
}

/// Accepts entries matching at least one of the given extensions (see [`with_ext`]).
/// With no extensions at all, nothing is accepted.
pub fn with_exts<S: AsRef<str>>(extensions: &[S]) -> FileFilter {
    let filters: Vec<FileFilter> = extensions.iter().map(|e| with_ext(e.as_ref())).collect();
    Box::new(move |info: &FileInfo| filters.iter().any(|filter| filter(info)))
}

/// Accepts entries whose name matches a shell glob.
///
/// `*` matches any run of characters except `/`, `?` matches exactly one character.
/// An empty pattern accepts everything; a malformed one accepts nothing.
pub fn with_pattern(pattern: &str) -> FileFilter {
    if pattern.is_empty() {
        return with_everything();
    }

    let pattern = match Pattern::new(pattern) {
        Ok(pattern) => pattern,
        Err(err) => {
            tracing::debug!(pattern, %err, "invalid glob pattern, filter will reject everything");
            return Box::new(|_: &FileInfo| false);
        }
    };
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    Box::new(move |info: &FileInfo| pattern.matches_with(info.name(), options))
}

/// Accepts everything. Same as passing no filters at all.
pub fn with_everything() -> FileFilter {
    Box::new(|_: &FileInfo| true)
}

pub(crate) fn matches_all(info: &FileInfo, filters: &[FileFilter]) -> bool {
    filters.iter().all(|filter| filter(info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::EntryType;

    fn file(name: &str) -> FileInfo {
        FileInfo::new(name, EntryType::File)
    }

    fn allow(filter: &FileFilter, names: &[&str]) {
        for name in names {
            assert!(filter(&file(name)), "filter should allow '{}'", name);
        }
    }

    fn reject(filter: &FileFilter, names: &[&str]) {
        for name in names {
            assert!(!filter(&file(name)), "filter should NOT allow '{}'", name);
        }
    }

    mod ext {
        use super::*;

        #[test]
        fn test_with_ext_empty_accepts_everything() {
            let names = ["", "foo", "foo.", "foo.bar", "foo.bar.jpeg", "foo.bar.🍺🍺"];
            allow(&with_ext(""), &names);
            allow(&with_ext("."), &names);
        }

        #[test]
        fn test_with_ext_specific() {
            let filter = with_ext("png");
            allow(&filter, &[".png", "foo.bar.png", "foo.bar.png.png", "foo.🍺.png"]);
            reject(
                &filter,
                &["", "png", "foo", "foo.", "foo.bar.ping", "foo.bar.pngpng", "foo.png.jpg"],
            );
        }

        #[test]
        fn test_with_ext_multi_segment() {
            let filter = with_ext("a.b");
            allow(&filter, &[".a.b", "foo.bar.a.b", "foo.a.b.a.b"]);
            // "a.b" on its own only has the ".b" extension.
            reject(&filter, &["", "a.b", "foo.bar.aa.b", "foo.bar.a.b.a"]);
        }

        #[test]
        fn test_with_ext_leading_dot_is_optional() {
            let names = [
                ".a", "foo.a", "foo.bar.a", "foo.a.a.a", "", "a", "foo", "foo.", "foo.aa",
                "foo.a.b",
            ];
            let bare = with_ext("a");
            let dotted = with_ext(".a");
            for name in names {
                assert_eq!(bare(&file(name)), dotted(&file(name)), "mismatch on '{}'", name);
            }
        }

        #[test]
        fn test_with_ext_ignores_case() {
            allow(&with_ext("TXT"), &["notes.txt", "NOTES.TXT", "Notes.Txt"]);
            allow(&with_ext("txt"), &["NOTES.TXT"]);
        }

        #[test]
        fn test_with_ext_unicode() {
            let filter = with_ext("🍺🍺🍺");
            allow(&filter, &[".🍺🍺🍺", "foo.bar.🍺🍺🍺"]);
            reject(&filter, &["🍺🍺🍺", "foo.bar.🍺🍺", "foo.🍺🍺🍺.jpg"]);
        }
    }

    mod exts {
        use super::*;

        #[test]
        fn test_with_exts_empty_extensions_accept_everything() {
            allow(&with_exts(&["", "."]), &["", "foo", "foo.bar"]);
        }

        #[test]
        fn test_with_exts_is_a_union() {
            let filter = with_exts(&["png", "jpg", "🍺"]);
            allow(
                &filter,
                &[".png", ".jpg", "foo.bar.png", "foo.bar.jpg", "foo.png.jpg", "time.for.🍺"],
            );
            reject(
                &filter,
                &["", "png", "jpg", "🍺", "foo.bar", "foo.png.jpg.tiff", "🍺.png.jpg.txt"],
            );
        }

        #[test]
        fn test_with_exts_nothing_given_rejects_all() {
            let none: [&str; 0] = [];
            reject(&with_exts(&none), &["foo.txt", ""]);
        }
    }

    mod pattern {
        use super::*;

        #[test]
        fn test_with_pattern_empty_accepts_everything() {
            allow(&with_pattern(""), &["", ".", "foo", "foo.bar.baz", "foo.🍺"]);
        }

        #[test]
        fn test_with_pattern_literal() {
            let filter = with_pattern("foo.txt");
            allow(&filter, &["foo.txt"]);
            reject(&filter, &["", ".", "foo.txt.more", "foo txt", "foo🍺txt"]);
        }

        #[test]
        fn test_with_pattern_single_char() {
            let filter = with_pattern("foo?txt");
            allow(&filter, &["foo.txt", "foo txt", "foo,txt", "foo🍺txt"]);
            reject(&filter, &["", ".", "foo.txt.foo.txt", "footxt"]);
        }

        #[test]
        fn test_with_pattern_star_does_not_cross_separator() {
            let filter = with_pattern("foo/*.txt");
            allow(&filter, &["foo/a.txt", "foo/.txt", "foo/🍺🍺.txt"]);
            reject(&filter, &["", "foo.txt", "foo/bar.text", "foo/bar/baz.txt"]);
        }

        #[test]
        fn test_with_pattern_malformed_rejects() {
            reject(&with_pattern("[abc"), &["a", "[abc", ""]);
        }
    }

    #[test]
    fn test_with_everything() {
        allow(&with_everything(), &["", ".", "......", "foo/bar.a.txt", "foo/🍺.txt"]);
    }

    #[test]
    fn test_matches_all_is_conjunctive() {
        let filters = vec![with_pattern("b*"), with_pattern("?a*")];
        assert!(matches_all(&file("bar.txt"), &filters));
        assert!(!matches_all(&file("blah.blah"), &filters));
        assert!(!matches_all(&file("car.txt"), &filters));
        assert!(matches_all(&file("anything"), &[]));
    }
}
