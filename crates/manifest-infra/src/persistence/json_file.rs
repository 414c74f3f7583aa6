//! JSON store file helpers shared by the file repositories

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use manifest_types::Result;
use serde::Serialize;
use tracing::warn;

/// Write `value` as pretty JSON to a sibling temp file, then rename it over
/// `path`. A crash mid-write leaves the previous file intact.
pub(crate) fn write_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let temp_path = temp_path(path);
    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Move an unreadable store file to `<name>.corrupt.<timestamp>` so the next
/// save starts a fresh file instead of overwriting it
pub(crate) fn move_aside(path: &Path) -> Option<PathBuf> {
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let backup = PathBuf::from(format!("{}.corrupt.{}", path.display(), stamp));
    match fs::rename(path, &backup) {
        Ok(()) => {
            warn!(
                path = %path.display(),
                backup = %backup.display(),
                "Moved unreadable store file aside"
            );
            Some(backup)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to move unreadable store file aside");
            None
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_replaces_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, &vec!["a", "b"]).unwrap();

        let back: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, vec!["a", "b"]);
        assert!(!dir.path().join("store.json.tmp").exists());
    }

    #[test]
    fn test_move_aside_keeps_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ trunc").unwrap();

        let backup = move_aside(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&backup).unwrap(), "{ trunc");
        assert!(backup
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("store.json.corrupt."));
    }
}
