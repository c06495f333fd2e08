//! Staging directories and zip archives.
//!
//! This module provides:
//! - [`StagingDir`] - Uniquely named working directory removed on drop
//! - [`zip_directory`] - Deflate-compresses a directory tree
//! - [`reserve_archive_path`] - Claims an unused archive name in the save location
//! - [`move_file`] - Rename with a copy fallback across filesystems

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::Result;
use crate::manifest::{FileManifest, relative_path};

/// Timestamp format used in staging and archive names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Working directory for one gather run.
///
/// The whole directory, including any archive written into it, is removed
/// when the guard is dropped.
#[derive(Debug)]
pub struct StagingDir {
    dir: TempDir,
    name: String,
}

impl StagingDir {
    /// Creates a staging directory under `parent` for `label`.
    ///
    /// The archive root inside it is named `<label>_<timestamp>`.
    pub fn create(parent: &Path, label: &str, now: DateTime<Utc>) -> Result<Self> {
        let name = format!("{}_{}", sanitize_label(label), now.format(TIMESTAMP_FORMAT));
        let dir = tempfile::Builder::new()
            .prefix(&format!("{name}."))
            .tempdir_in(parent)?;
        fs::create_dir(dir.path().join(&name))?;
        debug!(staging = %dir.path().display(), "created staging directory");
        Ok(Self { dir, name })
    }

    /// The guarded directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Archive folder name, also used for the zip file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Folder whose contents end up in the archive.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.dir.path().join(&self.name)
    }

    /// Zips the archive root into `<name>.zip` next to it.
    pub fn archive(&self) -> Result<PathBuf> {
        let zip_path = self.dir.path().join(format!("{}.zip", self.name));
        zip_directory(&self.root(), &zip_path)?;
        Ok(zip_path)
    }
}

fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "cluster".to_string()
    } else {
        cleaned
    }
}

/// Writes every file under `source` into a zip at `destination`.
///
/// Entry names are rooted at the final component of `source` and always use
/// `/` separators. Returns the number of files written.
pub fn zip_directory(source: &Path, destination: &Path) -> Result<usize> {
    let root_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let manifest = FileManifest::discover(source)?;

    let file = File::create(destination)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(6));

    let mut written = 0;
    for entry in manifest.entries() {
        let relative = relative_path(entry, manifest.base());
        let mut name = root_name.clone();
        for part in relative.components() {
            name.push('/');
            name.push_str(&part.as_os_str().to_string_lossy());
        }

        let file = match File::open(entry) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        // Entries past 4 GiB need ZIP64 headers.
        let large = file.metadata()?.len() >= u64::from(u32::MAX);
        zip.start_file(name, options.large_file(large))?;
        io::copy(&mut BufReader::new(file), &mut zip)?;
        written += 1;
    }

    zip.finish()?;
    debug!(archive = %destination.display(), files = written, "wrote archive");
    Ok(written)
}

/// Creates an empty `<stem>.zip` in `dir` and returns its path.
///
/// When the name is taken, `_1`, `_2`, ... are appended to `stem` until an
/// unused name is found, so an earlier archive is never replaced.
pub fn reserve_archive_path(dir: &Path, stem: &str) -> Result<PathBuf> {
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("{stem}.zip")
        } else {
            format!("{stem}_{attempt}.zip")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Moves `from` to `to`, copying when a rename crosses filesystems.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Read;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).single().expect("valid time")
    }

    #[test]
    fn staging_dir_named_and_removed_on_drop() {
        let parent = tempfile::tempdir().expect("parent");
        let staging_path;
        {
            let staging = StagingDir::create(parent.path(), "my profile", fixed_time()).expect("create");
            assert_eq!(staging.name(), "my_profile_20240309_140507");
            assert!(staging.root().is_dir());
            staging_path = staging.path().to_path_buf();
        }
        assert!(!staging_path.exists());
        assert_eq!(fs::read_dir(parent.path()).expect("read").count(), 0);
    }

    #[test]
    fn staging_dirs_do_not_collide() {
        let parent = tempfile::tempdir().expect("parent");
        let a = StagingDir::create(parent.path(), "Local", fixed_time()).expect("a");
        let b = StagingDir::create(parent.path(), "Local", fixed_time()).expect("b");
        assert_ne!(a.path(), b.path());
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn zip_contains_nested_entries() {
        let src = tempfile::tempdir().expect("src");
        let root = src.path().join("bundle");
        fs::create_dir_all(root.join("a/b")).expect("mkdir");
        fs::write(root.join("a/b/c.log"), b"hello").expect("write");
        fs::write(root.join("top.txt"), b"top").expect("write");

        let out = tempfile::tempdir().expect("out");
        let zip_path = out.path().join("bundle.zip");
        assert_eq!(zip_directory(&root, &zip_path).expect("zip"), 2);

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).expect("open")).expect("read zip");
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["bundle/a/b/c.log", "bundle/top.txt"]);

        let mut content = String::new();
        archive
            .by_name("bundle/a/b/c.log")
            .expect("entry")
            .read_to_string(&mut content)
            .expect("read entry");
        assert_eq!(content, "hello");
    }

    #[test]
    fn reserved_archive_names_never_repeat() {
        let dir = tempfile::tempdir().expect("dir");
        let first = reserve_archive_path(dir.path(), "Local_20240309_140507").expect("first");
        let second = reserve_archive_path(dir.path(), "Local_20240309_140507").expect("second");
        let third = reserve_archive_path(dir.path(), "Local_20240309_140507").expect("third");

        assert_eq!(first, dir.path().join("Local_20240309_140507.zip"));
        assert_eq!(second, dir.path().join("Local_20240309_140507_1.zip"));
        assert_eq!(third, dir.path().join("Local_20240309_140507_2.zip"));
        assert!(first.is_file());
    }

    #[test]
    #[ignore = "writes a 4 GiB archive entry"]
    fn zip_handles_entries_over_four_gib() {
        let src = tempfile::tempdir().expect("src");
        let root = src.path().join("big");
        fs::create_dir_all(&root).expect("mkdir");
        let size = u64::from(u32::MAX) + 1;
        File::create(root.join("mwlog.txt"))
            .expect("create")
            .set_len(size)
            .expect("sparse file");

        let out = tempfile::tempdir().expect("out");
        let zip_path = out.path().join("big.zip");
        assert_eq!(zip_directory(&root, &zip_path).expect("zip"), 1);

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).expect("open")).expect("read zip");
        assert_eq!(archive.by_name("big/mwlog.txt").expect("entry").size(), size);
    }

    #[test]
    fn move_file_relocates() {
        let dir = tempfile::tempdir().expect("dir");
        let from = dir.path().join("a.zip");
        let to = dir.path().join("out").join("a.zip");
        fs::create_dir_all(to.parent().expect("parent")).expect("mkdir");
        fs::write(&from, b"zip").expect("write");

        move_file(&from, &to).expect("move");
        assert!(!from.exists());
        assert_eq!(fs::read(&to).expect("read"), b"zip");
    }
}
