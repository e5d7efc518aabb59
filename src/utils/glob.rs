use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::{DirEntry, WalkDir};

/// A shell-style path pattern such as `../../resources/assets/*/shapes/**/*`.
///
/// `*` and `?` stay within one path component, `[...]` is a character class and a `**` component
/// matches any number of components. A trailing `/` matches directories only. Hidden entries are
/// never matched, and neither is the literal directory the pattern starts from.
#[derive(Debug, Clone)]
pub(crate) struct Glob {
    base: PathBuf,
    matcher: Option<Regex>,
    max_depth: usize,
    dirs_only: bool,
}

impl Glob {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let (pattern, dirs_only) = match pattern.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => (stripped, true),
            _ => (pattern, false),
        };

        let components: Vec<&str> = pattern.split('/').collect();

        let literal_len = components
            .iter()
            .position(|component| has_wildcard(component))
            .unwrap_or(components.len());

        let (literal, wildcard) = components.split_at(literal_len);

        let base = match literal.join("/") {
            joined if joined.is_empty() && !pattern.starts_with('/') => PathBuf::from("."),
            joined if joined.is_empty() => PathBuf::from("/"),
            joined => PathBuf::from(joined),
        };

        if wildcard.is_empty() {
            return Ok(Self {
                base,
                matcher: None,
                max_depth: 0,
                dirs_only,
            });
        }

        let max_depth = if wildcard.contains(&"**") {
            usize::MAX
        } else {
            wildcard.len()
        };

        Ok(Self {
            base,
            matcher: Some(Regex::new(&translate(wildcard))?),
            max_depth,
            dirs_only,
        })
    }

    /// Every existing path the pattern matches, sorted by name within each directory.
    pub fn matching_paths(&self) -> Vec<PathBuf> {
        let Some(matcher) = &self.matcher else {
            let exists = match self.dirs_only {
                true => self.base.is_dir(),
                false => self.base.exists(),
            };

            return if exists {
                vec![self.base.clone()]
            } else {
                vec![]
            };
        };

        WalkDir::new(&self.base)
            .min_depth(1)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
            .filter_map(|entry| entry.ok())
            .filter(|entry| !self.dirs_only || entry.file_type().is_dir())
            .filter(|entry| {
                relative_path(&self.base, entry.path())
                    .is_some_and(|relative| matcher.is_match(&relative))
            })
            .map(DirEntry::into_path)
            .collect()
    }
}

fn has_wildcard(component: &str) -> bool {
    component.contains(['*', '?', '['])
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// `path` relative to `base`, with `/` separators.
fn relative_path(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;

    Some(
        relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

fn translate(components: &[&str]) -> String {
    let trailing_double_star = |i: usize| i + 1 == components.len() && components[i] == "**";

    let mut re = String::from("^");

    for (i, component) in components.iter().enumerate() {
        if *component == "**" {
            re.push_str(match (trailing_double_star(i), i) {
                (true, 0) => "(?:[^/]+(?:/[^/]+)*)?",
                (true, _) => "(?:/[^/]+)*",
                (false, _) => "(?:[^/]+/)*",
            });
            continue;
        }

        re.push_str(&translate_component(component));

        if i + 1 < components.len() && !trailing_double_star(i + 1) {
            re.push('/');
        }
    }

    re.push('$');
    re
}

fn translate_component(component: &str) -> String {
    // Names are never empty
    if component == "*" {
        return String::from("[^/]+");
    }

    let mut re = String::new();
    let mut chars = component.chars();

    while let Some(c) = chars.next() {
        match c {
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            '[' => {
                let rest: Vec<char> = chars.clone().collect();

                // A `]` right after the opening bracket (or `[!`) is part of the class
                let mut start = usize::from(rest.first() == Some(&'!'));
                if rest.get(start) == Some(&']') {
                    start += 1;
                }

                // Unterminated, so the bracket is literal
                let Some(end) = rest[start..].iter().position(|c| *c == ']') else {
                    re.push_str(r"\[");
                    continue;
                };
                let end = start + end;

                chars.nth(end);

                let (negated, body) = match rest[..end].split_first() {
                    Some((&'!', body)) => (true, body),
                    _ => (false, &rest[..end]),
                };

                re.push('[');
                if negated {
                    re.push('^');
                }
                for &c in body {
                    if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') {
                        re.push('\\');
                    }
                    re.push(c);
                }
                re.push(']');
            }
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
        }
    }

    re
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        let components: Vec<&str> = pattern.split('/').collect();
        Regex::new(&translate(&components)).unwrap().is_match(path)
    }

    #[test]
    fn star_stays_in_component() {
        assert!(matches("*/shapes", "survival/shapes"));
        assert!(!matches("*/shapes", "a/b/shapes"));
        assert!(matches("*.json", "stats.json"));
        assert!(matches("stats*", "stats"));
        assert!(!matches("*", ""));
        assert!(!matches("*.json", "stats.tsv"));
    }

    #[test]
    fn double_star_spans_components() {
        assert!(matches("*/shapes/**/*", "game/shapes/block"));
        assert!(matches("*/shapes/**/*", "game/shapes/block/wood/plank"));
        assert!(!matches("*/shapes/**/*", "game/shapes"));
        assert!(matches("shapes/**", "shapes"));
        assert!(matches("shapes/**", "shapes/a/b"));
    }

    #[test]
    fn character_classes() {
        assert!(matches("armor-[abc]", "armor-b"));
        assert!(!matches("armor-[!abc]", "armor-b"));
        assert!(matches("armor-[!abc]", "armor-d"));
        assert!(matches("x[y", "x[y"));
        assert!(matches("[^a]", "^"));
        assert!(!matches("[^a]", "b"));
        assert!(matches("[]a]", "]"));
        assert!(matches("[]a]", "a"));
        assert!(matches("[!]a]", "b"));
        assert!(!matches("[!]a]", "]"));
        assert!(matches("a?c", "abc"));
        assert!(matches("a.c", "a.c"));
        assert!(!matches("a.c", "abc"));
    }

    #[test]
    fn base_is_literal_prefix() {
        let glob = Glob::new("../../resources/assets/*/shapes/**/*").unwrap();
        assert_eq!(glob.base, PathBuf::from("../../resources/assets"));

        assert_eq!(Glob::new("*/shapes").unwrap().base, PathBuf::from("."));
        assert_eq!(Glob::new("/*").unwrap().base, PathBuf::from("/"));
        assert_eq!(Glob::new("/").unwrap().base, PathBuf::from("/"));
        assert!(Glob::new("resources").unwrap().matcher.is_none());
    }

    #[test]
    fn matching_paths_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");

        fs::create_dir_all(assets.join("game/shapes/block/wood")).unwrap();
        fs::create_dir_all(assets.join("game/textures")).unwrap();
        fs::create_dir_all(assets.join("game/shapes/.git")).unwrap();
        fs::write(assets.join("game/shapes/loose.json"), "{}").unwrap();

        let pattern = format!("{}/*/shapes/**/*", assets.display());
        let paths = Glob::new(&pattern).unwrap().matching_paths();

        assert_eq!(
            paths,
            vec![
                assets.join("game/shapes/block"),
                assets.join("game/shapes/block/wood"),
                assets.join("game/shapes/loose.json"),
            ]
        );
    }

    #[test]
    fn base_directory_is_never_matched() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");

        fs::create_dir_all(assets.join("survival")).unwrap();
        fs::create_dir_all(assets.join(".git")).unwrap();
        fs::write(assets.join("loose.json"), "{}").unwrap();

        let pattern = format!("{}/*", assets.display());
        let paths = Glob::new(&pattern).unwrap().matching_paths();

        assert_eq!(paths, vec![assets.join("loose.json"), assets.join("survival")]);
    }

    #[test]
    fn trailing_slash_matches_directories() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("assets");

        fs::create_dir_all(assets.join("survival")).unwrap();
        fs::write(assets.join("loose.json"), "{}").unwrap();

        let pattern = format!("{}/*/", assets.display());
        assert_eq!(
            Glob::new(&pattern).unwrap().matching_paths(),
            vec![assets.join("survival")]
        );

        let literal = format!("{}/loose.json/", assets.display());
        assert!(Glob::new(&literal).unwrap().matching_paths().is_empty());
    }
}
