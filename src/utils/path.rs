use glob::glob;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Which files directory walks and glob patterns pick up.
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// Extensions without the dot
    pub extensions: Vec<String>,
    pub respect_gitignore: bool,
}

impl PathFilter {
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted == ext))
    }
}

/// Expand files, directories and glob patterns into a list of file paths.
///
/// Files named directly are always kept. Files found by walking a directory or
/// expanding a glob are kept only when their extension matches `filter`.
pub fn expand_paths(patterns: &[String], filter: &PathFilter) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let path = PathBuf::from(pattern);
        if path.is_file() {
            paths.push(path);
            continue;
        }
        if path.is_dir() {
            walk_dir(&path, filter, &mut paths);
            continue;
        }

        match glob(pattern) {
            Ok(entries) => {
                let before = paths.len();
                for entry in entries.flatten() {
                    if entry.is_file() && filter.matches(&entry) {
                        paths.push(entry);
                    }
                }
                if paths.len() == before {
                    eprintln!("Warning: no files match '{}'", pattern);
                }
            }
            Err(err) => eprintln!("Invalid pattern '{}': {}", pattern, err),
        }
    }
    paths
}

fn walk_dir(dir: &Path, filter: &PathFilter, files: &mut Vec<PathBuf>) {
    let walker = WalkBuilder::new(dir)
        .git_ignore(filter.respect_gitignore)
        .git_global(filter.respect_gitignore)
        .git_exclude(filter.respect_gitignore)
        .ignore(filter.respect_gitignore)
        .parents(filter.respect_gitignore)
        .require_git(false)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build();

    for entry in walker.flatten() {
        let path = entry.path();
        if path.is_file() && filter.matches(path) {
            files.push(path.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn filter(respect_gitignore: bool) -> PathFilter {
        PathFilter {
            extensions: vec!["ts".to_string(), "js".to_string()],
            respect_gitignore,
        }
    }

    #[test]
    fn test_expand_paths() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let file1_path = dir_path.join("test1.ts");
        let file2_path = dir_path.join("test2.ts");
        let file3_path = dir_path.join("test3.js");
        let readme_path = dir_path.join("README.md");

        fs::write(&file1_path, "// test").unwrap();
        fs::write(&file2_path, "// test").unwrap();
        fs::write(&file3_path, "// test").unwrap();
        fs::write(&readme_path, "# test").unwrap();

        let expanded = expand_paths(&[file1_path.to_str().unwrap().to_string()], &filter(true));
        assert_eq!(expanded, vec![file1_path.clone()]);

        let pattern = format!("{}/*.ts", dir_path.to_str().unwrap());
        let expanded = expand_paths(&[pattern], &filter(true));
        assert_eq!(expanded.len(), 2);
        assert!(expanded.contains(&file1_path));
        assert!(expanded.contains(&file2_path));

        let expanded = expand_paths(&[dir_path.to_str().unwrap().to_string()], &filter(true));
        assert_eq!(expanded, vec![file1_path, file2_path, file3_path]);
    }

    #[test]
    fn test_named_file_ignores_extension_filter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("script.coffee");
        fs::write(&path, "x = 1").unwrap();
        let expanded = expand_paths(&[path.to_str().unwrap().to_string()], &filter(true));
        assert_eq!(expanded, vec![path]);
    }

    #[test]
    fn test_walk_respects_gitignore() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("build")).unwrap();
        fs::write(dir.path().join(".gitignore"), "build/\n").unwrap();
        fs::write(dir.path().join("main.ts"), "let a;").unwrap();
        fs::write(dir.path().join("build").join("out.js"), "let b;").unwrap();

        let root = dir.path().to_str().unwrap().to_string();
        let files = expand_paths(std::slice::from_ref(&root), &filter(true));
        assert_eq!(files.len(), 1, "Expected 1 file, got {}: {:?}", files.len(), files);
        assert!(files[0].ends_with("main.ts"));

        let files = expand_paths(&[root], &filter(false));
        assert_eq!(files.len(), 2, "Expected 2 files, got {}: {:?}", files.len(), files);
    }
}
