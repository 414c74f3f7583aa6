//! File-based implementation of ArchiveRepository

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use chrono::NaiveDate;
use manifest_domain::repository::ArchiveRepository;
use manifest_types::{Archive, Error, Result};
use tracing::{debug, warn};

use super::json_file::{move_aside, write_atomic};

/// Archive mirror stored in `archives.json`, keyed by date
pub struct FileArchiveRepository {
    store_path: PathBuf,
    archives: RefCell<BTreeMap<NaiveDate, Archive>>,
}

impl FileArchiveRepository {
    /// Create or load the archive mirror inside `store_dir`. An unreadable
    /// mirror is moved aside and the repository starts empty.
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("archives.json");

        let archives = if store_path.exists() {
            let file = File::open(&store_path)?;
            let parsed = serde_json::from_reader(BufReader::new(file));
            parsed.unwrap_or_else(|e| {
                warn!(path = %store_path.display(), error = %e, "Archive mirror unreadable, starting empty");
                move_aside(&store_path);
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            store_path,
            archives: RefCell::new(archives),
        })
    }

    fn persist(&self) -> Result<()> {
        write_atomic(&self.store_path, &*self.archives.borrow())
    }
}

impl ArchiveRepository for FileArchiveRepository {
    fn upsert(&self, archive: &Archive) -> std::result::Result<(), Error> {
        self.archives
            .borrow_mut()
            .insert(archive.date, archive.clone());
        self.persist()?;
        debug!(date = %archive.date, "Mirrored archive");
        Ok(())
    }

    fn find_all(&self) -> std::result::Result<Vec<Archive>, Error> {
        Ok(self.archives.borrow().values().rev().cloned().collect())
    }

    fn clear(&self) -> std::result::Result<(), Error> {
        self.archives.borrow_mut().clear();
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifest_types::{DailyManifest, ManifestRecord};
    use tempfile::tempdir;

    fn archive(day: u32, note: &str) -> Archive {
        let mut data = DailyManifest::default();
        let mut record = ManifestRecord {
            plate: "ABC-1".to_string(),
            ..Default::default()
        };
        record.values.insert("note".to_string(), note.to_string());
        data.morning.push(record);
        Archive {
            date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            data,
            columns: Vec::new(),
        }
    }

    #[test]
    fn test_find_all_newest_first() {
        let dir = tempdir().unwrap();
        let repo = FileArchiveRepository::open(dir.path().to_path_buf()).unwrap();
        repo.upsert(&archive(15, "a")).unwrap();
        repo.upsert(&archive(17, "b")).unwrap();
        repo.upsert(&archive(16, "c")).unwrap();

        let days: Vec<u32> = repo
            .find_all()
            .unwrap()
            .iter()
            .map(|a| chrono::Datelike::day(&a.date))
            .collect();
        assert_eq!(days, vec![17, 16, 15]);
    }

    #[test]
    fn test_upsert_overwrites_same_date_and_persists() {
        let dir = tempdir().unwrap();
        {
            let repo = FileArchiveRepository::open(dir.path().to_path_buf()).unwrap();
            repo.upsert(&archive(17, "first")).unwrap();
            repo.upsert(&archive(17, "second")).unwrap();
            assert_eq!(repo.find_all().unwrap().len(), 1);
        }

        let reopened = FileArchiveRepository::open(dir.path().to_path_buf()).unwrap();
        let all = reopened.find_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].data.morning[0].value("note"), "second");
    }

    #[test]
    fn test_unreadable_mirror_is_kept_aside() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("archives.json");
        fs::write(&path, "{\"2026-10-17\": {\"date\"").unwrap();

        let repo = FileArchiveRepository::open(dir.path().to_path_buf()).unwrap();
        assert!(repo.find_all().unwrap().is_empty());
        repo.upsert(&archive(18, "new")).unwrap();

        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .starts_with("archives.json.corrupt.")
            })
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(
            fs::read_to_string(&backups[0]).unwrap(),
            "{\"2026-10-17\": {\"date\""
        );
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let repo = FileArchiveRepository::open(dir.path().to_path_buf()).unwrap();
        repo.upsert(&archive(17, "x")).unwrap();
        repo.clear().unwrap();
        assert!(repo.find_all().unwrap().is_empty());
    }
}
