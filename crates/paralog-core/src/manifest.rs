//! File discovery and relative path reconciliation.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Name fragments that mark job storage entries which are not logs.
pub const JOB_LOG_EXCLUSIONS: [&str; 4] = [".mat", ".lck", "metadata", "matlab_mirror"];

/// Files discovered under a base directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileManifest {
    base: PathBuf,
    entries: Vec<PathBuf>,
}

impl FileManifest {
    /// Creates an empty manifest for `base`.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            entries: Vec::new(),
        }
    }

    /// Recursively lists every file under `base`, sorted.
    ///
    /// A missing `base` yields an empty manifest. Entries that disappear
    /// while walking are skipped.
    pub fn discover(base: impl Into<PathBuf>) -> Result<Self> {
        let mut manifest = Self::new(base);
        if manifest.base.is_dir() {
            let root = manifest.base.clone();
            walk(&root, &mut manifest.entries)?;
            manifest.entries.sort();
        }
        debug!(
            base = %manifest.base.display(),
            files = manifest.entries.len(),
            "discovered files"
        );
        Ok(manifest)
    }

    /// A manifest of one file whose base is the file's parent directory.
    #[must_use]
    pub fn single_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            base,
            entries: vec![path],
        }
    }

    /// Re-roots the manifest: entries keep their paths, relative paths are
    /// computed against `base` instead.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    /// Drops every entry whose path below the base contains one of
    /// `patterns`.
    #[must_use]
    pub fn exclude(mut self, patterns: &[&str]) -> Self {
        let base = self.base.clone();
        self.entries.retain(|entry| {
            let relative = relative_path(entry, &base);
            let text = relative.to_string_lossy();
            !patterns.iter().any(|p| text.contains(p))
        });
        self
    }

    /// Base directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Discovered files.
    #[must_use]
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every entry to `destination/<relative path>`.
    ///
    /// Files that vanished since discovery are skipped. Returns the number of
    /// files copied.
    pub fn copy_into(&self, destination: &Path) -> Result<usize> {
        let mut copied = 0;
        for entry in &self.entries {
            let target = destination.join(relative_path(entry, &self.base));
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            match fs::copy(entry, &target) {
                Ok(_) => copied += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(file = %entry.display(), "file vanished before copy, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(copied)
    }
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let Ok(file_type) = entry.file_type() else { continue };
        let path = entry.path();
        if file_type.is_dir() {
            walk(&path, out)?;
        } else if file_type.is_file() || path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Path of `path` relative to `base`, safe to join under a staging folder.
///
/// When `path` is not under `base`, or the relative part still carries a
/// drive or root indicator, everything up to and including that indicator is
/// dropped so the result never looks absolute.
#[must_use]
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let relative = path.strip_prefix(base).unwrap_or(path);
    sanitize_relative(relative)
}

/// Keeps only the normal components of `path`.
#[must_use]
pub fn sanitize_relative(path: &Path) -> PathBuf {
    let sanitized: PathBuf = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            Component::Prefix(_) | Component::RootDir | Component::CurDir | Component::ParentDir => {
                None
            }
        })
        .collect();
    strip_drive_indicator(&sanitized)
}

/// Drops everything through a leading `X:` drive indicator left in a
/// component, as seen when Windows paths are handled on other platforms.
fn strip_drive_indicator(path: &Path) -> PathBuf {
    let mut components = path.components();
    let Some(Component::Normal(first)) = components.clone().next() else {
        return path.to_path_buf();
    };
    let first = first.to_string_lossy();
    let bytes = first.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        components.next();
        let rest = first[2..].trim_start_matches(['\\', '/']);
        let mut out = PathBuf::new();
        for part in rest.split(['\\', '/']).filter(|p| !p.is_empty()) {
            out.push(part);
        }
        out.extend(components);
        return out;
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, b"log").expect("write");
    }

    #[test]
    fn discovers_nested_files_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("job2/task1.out"));
        touch(&dir.path().join("job1/task1.out"));
        touch(&dir.path().join("job1/sub/task2.log"));

        let manifest = FileManifest::discover(dir.path()).expect("discover");
        let rel: Vec<PathBuf> = manifest
            .entries()
            .iter()
            .map(|e| relative_path(e, manifest.base()))
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("job1/sub/task2.log"),
                PathBuf::from("job1/task1.out"),
                PathBuf::from("job2/task1.out"),
            ]
        );
    }

    #[test]
    fn missing_base_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = FileManifest::discover(dir.path().join("absent")).expect("discover");
        assert!(manifest.is_empty());
    }

    #[test]
    fn job_log_exclusions_filter_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in [
            "job1/task1.out",
            "job1/task1.mat",
            "job1/Job1.in.mat",
            "job1.lck",
            "matlab_metadata.mat",
            "metadata/state.txt",
            "matlab_mirror/x.log",
            "job1/task1.diary.txt",
        ] {
            touch(&dir.path().join(name));
        }

        let manifest = FileManifest::discover(dir.path())
            .expect("discover")
            .exclude(&JOB_LOG_EXCLUSIONS);

        let rel: Vec<PathBuf> = manifest
            .entries()
            .iter()
            .map(|e| relative_path(e, manifest.base()))
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("job1/task1.diary.txt"),
                PathBuf::from("job1/task1.out"),
            ]
        );
    }

    #[test]
    fn copy_preserves_relative_structure() {
        let src = tempfile::tempdir().expect("src");
        let dst = tempfile::tempdir().expect("dst");
        touch(&src.path().join("a/b/c.log"));
        touch(&src.path().join("x/c.log"));

        let copied = FileManifest::discover(src.path())
            .expect("discover")
            .copy_into(dst.path())
            .expect("copy");

        assert_eq!(copied, 2);
        assert!(dst.path().join("a/b/c.log").is_file());
        assert!(dst.path().join("x/c.log").is_file());
    }

    #[test]
    fn vanished_files_are_skipped() {
        let src = tempfile::tempdir().expect("src");
        let dst = tempfile::tempdir().expect("dst");
        touch(&src.path().join("keep.log"));
        touch(&src.path().join("gone.log"));

        let manifest = FileManifest::discover(src.path()).expect("discover");
        fs::remove_file(src.path().join("gone.log")).expect("remove");

        assert_eq!(manifest.copy_into(dst.path()).expect("copy"), 1);
        assert!(dst.path().join("keep.log").is_file());
        assert!(!dst.path().join("gone.log").exists());
    }

    #[test]
    fn single_file_is_keyed_by_name() {
        let manifest = FileManifest::single_file("/var/log/app/run.log");
        assert_eq!(manifest.len(), 1);
        assert_eq!(
            relative_path(&manifest.entries()[0], manifest.base()),
            PathBuf::from("run.log")
        );
    }

    #[test]
    fn relative_path_outside_base_never_absolute() {
        let rel = relative_path(Path::new("/other/place/f.log"), Path::new("/base"));
        assert_eq!(rel, PathBuf::from("other/place/f.log"));
        assert!(rel.is_relative());
    }

    #[test]
    fn drive_indicator_stripped() {
        assert_eq!(
            sanitize_relative(Path::new("C:\\jobs\\job1\\task1.log")),
            PathBuf::from("jobs/job1/task1.log")
        );
        assert_eq!(
            sanitize_relative(Path::new("D:/data/run.log")),
            PathBuf::from("data/run.log")
        );
        assert_eq!(
            sanitize_relative(Path::new("job1/../task.log")),
            PathBuf::from("job1/task.log")
        );
    }
}
