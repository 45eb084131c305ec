//! Tree source over a directory walk

use crate::error::{CliError, Result};
use labelsync_common::WorkItem;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Extensions selected when no `--type` is given
pub const DEFAULT_FILE_TYPES: &str = "jpg,jpeg,png,gif";

/// Extension allow-list, compared case-insensitively
#[derive(Debug, Clone, Default)]
pub struct FileTypeFilter {
    extensions: HashSet<String>,
    include_all: bool,
}

impl FileTypeFilter {
    /// Build from a comma separated list such as `jpg,.png, GIF`
    pub fn parse(list: &str) -> Self {
        let extensions = list
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self {
            extensions,
            include_all: false,
        }
    }

    pub fn include_all(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }

    pub fn is_target(&self, path: &Path) -> bool {
        if self.include_all {
            return true;
        }
        path.extension()
            .map(|ext| self.extensions.contains(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }
}

/// Yields one [`WorkItem`] per matching file below `root`, in file name
/// order.
///
/// The namespace is the file's directory relative to `root`, joined with
/// `/` (empty for files directly in `root`). Symbolic links are not
/// followed; a link is yielded like a regular file, so a broken one fails
/// only its own transfer. An unreadable entry below `root` is logged and
/// skipped, while failing to read `root` itself is yielded as an `Err` item.
pub struct TreeSource {
    root: PathBuf,
    walker: walkdir::IntoIter,
    filter: FileTypeFilter,
}

impl TreeSource {
    pub fn new(root: impl Into<PathBuf>, filter: FileTypeFilter) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CliError::NotADirectory(root.display().to_string()));
        }

        let walker = walkdir::WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Ok(Self {
            root,
            walker,
            filter,
        })
    }

    fn item_for(&self, path: &Path) -> WorkItem {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let namespace = relative
            .parent()
            .map(|dir| {
                dir.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        WorkItem::new(path.to_string_lossy(), namespace, file_name)
    }
}

impl Iterator for TreeSource {
    type Item = Result<WorkItem>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Some(Err(CliError::Walk(e))),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                },
            };
            if entry.file_type().is_dir() || !self.filter.is_target(entry.path()) {
                continue;
            }
            return Some(Ok(self.item_for(entry.path())));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("cats")).unwrap();
        std::fs::create_dir_all(root.join("dogs/small")).unwrap();
        std::fs::write(root.join("top.PNG"), b"").unwrap();
        std::fs::write(root.join("notes.txt"), b"").unwrap();
        std::fs::write(root.join("cats/b.jpg"), b"").unwrap();
        std::fs::write(root.join("cats/a.jpeg"), b"").unwrap();
        std::fs::write(root.join("dogs/small/c.gif"), b"").unwrap();
        temp
    }

    #[test]
    fn test_filter_parse() {
        let filter = FileTypeFilter::parse("jpg, .PNG,,gif");
        assert!(filter.is_target(Path::new("a.JPG")));
        assert!(filter.is_target(Path::new("dir/b.png")));
        assert!(!filter.is_target(Path::new("c.jpeg")));
        assert!(!filter.is_target(Path::new("Makefile")));
        assert!(FileTypeFilter::parse("").include_all(true).is_target(Path::new("Makefile")));
    }

    #[test]
    fn test_walk_yields_filtered_items_with_relative_namespace() {
        let temp = fixture();
        let items: Vec<_> = TreeSource::new(temp.path(), FileTypeFilter::parse(DEFAULT_FILE_TYPES))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        let summary: Vec<(&str, &str)> = items
            .iter()
            .map(|i| (i.namespace.as_str(), i.destination_name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("cats", "a.jpeg"),
                ("cats", "b.jpg"),
                ("dogs/small", "c.gif"),
                ("", "top.PNG"),
            ]
        );
        assert_eq!(PathBuf::from(&items[0].source_ref), temp.path().join("cats/a.jpeg"));
    }

    #[test]
    fn test_include_all() {
        let temp = fixture();
        let count = TreeSource::new(temp.path(), FileTypeFilter::default().include_all(true))
            .unwrap()
            .count();
        assert_eq!(count, 5);
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = fixture();
        assert!(matches!(
            TreeSource::new(temp.path().join("notes.txt"), FileTypeFilter::default()),
            Err(CliError::NotADirectory(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_yielded_as_item() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("a")).unwrap();
        std::fs::create_dir_all(root.join("z")).unwrap();
        std::fs::write(root.join("a/1.jpg"), b"").unwrap();
        std::fs::write(root.join("z/2.jpg"), b"").unwrap();
        std::os::unix::fs::symlink("/nonexistent/target.jpg", root.join("m_broken.jpg")).unwrap();

        let names: Vec<String> = TreeSource::new(root, FileTypeFilter::parse(DEFAULT_FILE_TYPES))
            .unwrap()
            .map(|item| item.unwrap().destination_name)
            .collect();
        assert_eq!(names, vec!["1.jpg", "m_broken.jpg", "2.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_not_descended() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("cats")).unwrap();
        std::fs::write(root.join("cats/a.jpg"), b"").unwrap();
        std::os::unix::fs::symlink(root.join("cats"), root.join("loop")).unwrap();

        let items: Vec<_> = TreeSource::new(root, FileTypeFilter::parse(DEFAULT_FILE_TYPES))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].namespace, "cats");
    }
}
