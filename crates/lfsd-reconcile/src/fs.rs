use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::source::{Entries, EntryKind, TreeEntry, TreeSource, WalkError};

/// Walks a content root on the local filesystem.
///
/// Symlinks are reported as [`EntryKind::Other`] and never followed. The
/// content root is only read, never modified.
#[derive(Clone, Debug)]
pub struct FsTreeSource {
    root: PathBuf,
}

impl FsTreeSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn convert(&self, entry: walkdir::DirEntry) -> Result<TreeEntry, WalkError> {
        let path = entry
            .path()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .map_err(|e| WalkError::new(Some(entry.path().to_path_buf()), e.to_string()))?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            return Ok(TreeEntry::dir(path));
        }
        if !file_type.is_file() {
            return Ok(TreeEntry {
                path,
                kind: EntryKind::Other,
                size: 0,
            });
        }

        let meta = entry
            .metadata()
            .map_err(|e| WalkError::new(Some(entry.path().to_path_buf()), e.to_string()))?;
        Ok(TreeEntry::file(path, meta.len()))
    }
}

impl TreeSource for FsTreeSource {
    fn root(&self) -> &Path {
        &self.root
    }

    fn entries(&self) -> Entries<'_> {
        let walk = WalkDir::new(&self.root).follow_links(false);
        Box::new(walk.into_iter().map(move |item| match item {
            Ok(entry) => self.convert(entry),
            Err(e) => Err(WalkError::new(e.path().map(Path::to_path_buf), e.to_string())),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, len: usize) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![0u8; len]).unwrap();
    }

    #[test]
    fn yields_relative_paths_and_sizes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ab/cd/ef0123", 10);
        write(dir.path(), "12/34/56789a", 20);

        let source = FsTreeSource::new(dir.path());
        let mut files: Vec<TreeEntry> = source
            .entries()
            .filter_map(Result::ok)
            .filter(TreeEntry::is_file)
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(
            files,
            vec![
                TreeEntry::file("12/34/56789a", 20),
                TreeEntry::file("ab/cd/ef0123", 10),
            ]
        );
    }

    #[test]
    fn directories_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ab/cd/ef0123", 1);

        let source = FsTreeSource::new(dir.path());
        let dirs: Vec<PathBuf> = source
            .entries()
            .filter_map(Result::ok)
            .filter(|e| e.kind == EntryKind::Dir)
            .map(|e| e.path)
            .collect();
        assert!(dirs.contains(&PathBuf::new()));
        assert!(dirs.contains(&PathBuf::from("ab")));
        assert!(dirs.contains(&PathBuf::from("ab/cd")));
    }

    #[test]
    fn missing_root_yields_an_error_item() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsTreeSource::new(dir.path().join("missing"));
        let items: Vec<_> = source.entries().collect();
        assert_eq!(items.len(), 1);
        let err = items[0].clone().unwrap_err();
        assert_eq!(err.path.as_deref(), Some(source.root()));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ab/cd/ef0123", 3);
        std::os::unix::fs::symlink(dir.path().join("ab"), dir.path().join("ab/cd/link")).unwrap();

        let source = FsTreeSource::new(dir.path());
        let link = source
            .entries()
            .filter_map(Result::ok)
            .find(|e| e.path == Path::new("ab/cd/link"))
            .unwrap();
        assert_eq!(link.kind, EntryKind::Other);
    }
}
