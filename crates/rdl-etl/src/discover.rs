//! File discovery and table routing
//!
//! Walks the data root recursively and pairs every regular file with its
//! target table. The routing rule is deliberate and fixed: a file's table is
//! the name of its immediate parent directory, never the file's own name or
//! extension. `data/orders/part-00000` routes to `orders`.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// A discovered input file paired with its inferred target table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedFile {
    pub path: PathBuf,
    pub table: String,
}

/// Lazily walk `root` and yield every regular file, routed to its table.
///
/// Directories at any depth are descended into but not yielded; symlinks are
/// followed, so a symlink to a file is yielded as a file. Entries that
/// cannot be read are logged and skipped. Each file is visited exactly once;
/// no ordering is guaranteed.
pub fn discover(root: &Path) -> impl Iterator<Item = RoutedFile> + '_ {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry during discovery");
                    return None;
                }
            };

            if !entry.file_type().is_file() {
                return None;
            }

            let path = entry.into_path();
            let table = path
                .parent()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())?;

            Some(RoutedFile { path, table })
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    #[test]
    fn test_files_route_to_parent_directory_name() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("orders")).unwrap();
        fs::create_dir_all(root.path().join("customers")).unwrap();
        fs::write(root.path().join("orders/part-00000"), "1,x\n").unwrap();
        fs::write(root.path().join("orders/part-00001"), "2,y\n").unwrap();
        fs::write(root.path().join("customers/customers.csv"), "1,a\n").unwrap();

        let routed: Vec<RoutedFile> = discover(root.path()).collect();
        assert_eq!(routed.len(), 3);

        let tables: HashSet<&str> = routed.iter().map(|r| r.table.as_str()).collect();
        assert_eq!(tables, HashSet::from(["orders", "customers"]));

        let order_files = routed.iter().filter(|r| r.table == "orders").count();
        assert_eq!(order_files, 2);
    }

    #[test]
    fn test_nested_directories_are_descended() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("archive/2013/orders")).unwrap();
        fs::write(root.path().join("archive/2013/orders/part-00000"), "1\n").unwrap();

        let routed: Vec<RoutedFile> = discover(root.path()).collect();
        assert_eq!(routed.len(), 1);
        // Table comes from the immediate parent, not the top-level directory
        assert_eq!(routed[0].table, "orders");
    }

    #[test]
    fn test_directories_are_not_yielded() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("orders/empty_subdir")).unwrap();

        let routed: Vec<RoutedFile> = discover(root.path()).collect();
        assert!(routed.is_empty());
    }

    #[test]
    fn test_each_file_visited_exactly_once() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("orders")).unwrap();
        for i in 0..5 {
            fs::write(root.path().join(format!("orders/part-{i}")), "1\n").unwrap();
        }

        let paths: Vec<PathBuf> = discover(root.path()).map(|r| r.path).collect();
        let unique: HashSet<&PathBuf> = paths.iter().collect();
        assert_eq!(paths.len(), 5);
        assert_eq!(unique.len(), 5);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_are_included() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("orders")).unwrap();
        fs::write(outside.path().join("data.csv"), "1\n").unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("data.csv"),
            root.path().join("orders/link.csv"),
        )
        .unwrap();

        let routed: Vec<RoutedFile> = discover(root.path()).collect();
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].table, "orders");
    }
}
