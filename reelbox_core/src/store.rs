//! Profile persistence.
//!
//! Storage problems never stop the game: a record that cannot be read
//! becomes a fresh profile and a failed write is logged and dropped.

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::profile::Profile;
use crate::progression::roll_over_day;
use crate::rng::RandomSource;

pub trait ProfileStore {
    /// Raw stored record, or [`StoreError::Missing`] when nothing is stored.
    fn read_raw(&self) -> StoreResult<String>;

    fn write_raw(&self, contents: &str) -> StoreResult<()>;

    /// Human-readable location, for logs and the stats screen.
    fn describe(&self) -> String;

    /// Loads the stored profile, back-fills and normalizes it, and applies
    /// the daily reset when `today` differs from the stored date.
    fn try_load(&self, today: &str, rng: &mut dyn RandomSource) -> StoreResult<Profile> {
        let raw = self.read_raw()?;
        let mut profile: Profile = serde_json::from_str(&raw)?;
        normalize(&mut profile, today);
        if roll_over_day(&mut profile, today, rng) {
            debug!(store = %self.describe(), "daily challenge rolled over");
        }
        Ok(profile)
    }

    /// Like [`ProfileStore::try_load`] but falls back to a fresh profile
    /// dated `today` on any error.
    fn load(&self, today: &str, rng: &mut dyn RandomSource) -> Profile {
        match self.try_load(today, rng) {
            Ok(profile) => profile,
            Err(StoreError::Missing) => {
                debug!(store = %self.describe(), "no saved profile, starting fresh");
                Profile::new(today)
            }
            Err(e) => {
                warn!(store = %self.describe(), error = %e, "unreadable profile, starting fresh");
                Profile::new(today)
            }
        }
    }

    fn try_save(&self, profile: &mut Profile) -> StoreResult<()> {
        profile.settle_high_score();
        let json = to_pretty_json(profile)?;
        self.write_raw(&json)
    }

    /// Best-effort save; errors are logged only.
    fn save(&self, profile: &mut Profile) {
        if let Err(e) = self.try_save(profile) {
            warn!(store = %self.describe(), error = %e, "failed to save profile");
        }
    }
}

/// Repairs records written by older or hand-edited saves.
fn normalize(profile: &mut Profile, today: &str) {
    if profile.last_date.is_empty() {
        profile.last_date = today.to_string();
    }
    if profile.level == 0 {
        profile.level = 1;
    }
    // pulls an over-threshold xp back under the curve
    profile.grant_xp(0);
}

fn to_pretty_json(profile: &Profile) -> StoreResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    profile.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    fn read_raw(&self) -> StoreResult<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::Missing),
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Writes a sibling temp file and renames it over the record so a crash
    /// mid-write never leaves a truncated save.
    fn write_raw(&self, contents: &str) -> StoreResult<()> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let temp_path = self.path.with_extension("json.tmp");
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(write_err)?;
        temp_file.write_all(contents.as_bytes()).map_err(write_err)?;
        temp_file.sync_all().map_err(write_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(write_err)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the record in memory. Used by tests and `--no-save` sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            contents: RefCell::new(Some(raw.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl ProfileStore for MemoryStore {
    fn read_raw(&self) -> StoreResult<String> {
        self.contents.borrow().clone().ok_or(StoreError::Missing)
    }

    fn write_raw(&self, contents: &str) -> StoreResult<()> {
        *self.contents.borrow_mut() = Some(contents.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;
    use crate::symbols::Symbol;

    #[test]
    fn missing_record_gives_fresh_profile() {
        let store = MemoryStore::new();
        let p = store.load("2024-05-01", &mut ScriptedRandom::default());
        assert_eq!(p, Profile::new("2024-05-01"));
    }

    #[test]
    fn garbage_record_gives_fresh_profile() {
        let store = MemoryStore::with_contents("{ not json");
        let p = store.load("2024-05-01", &mut ScriptedRandom::default());
        assert_eq!(p, Profile::new("2024-05-01"));
        assert!(matches!(
            store.try_load("2024-05-01", &mut ScriptedRandom::default()),
            Err(StoreError::Parse(_))
        ));
    }

    #[test]
    fn partial_record_is_back_filled_without_reset() {
        let store = MemoryStore::with_contents(r#"{"spent": 9, "earned": 4, "high_score": 20}"#);
        let p = store.load("2024-05-01", &mut ScriptedRandom::new(vec![3, 3]));
        assert_eq!(p.spent, 9);
        assert_eq!(p.level, 1);
        assert_eq!(p.last_date, "2024-05-01");
        // same day: the default challenge stays
        assert_eq!(p.challenge_type, Symbol::Lemon);
        assert_eq!(p.challenge_goal, 5);
    }

    #[test]
    fn stale_date_rolls_challenge() {
        let store = MemoryStore::with_contents(
            r#"{"challenge_type": "BELL", "challenge_goal": 9, "challenge_progress": 9,
                "challenge_completed": true, "last_date": "2024-04-30"}"#,
        );
        let p = store.load("2024-05-01", &mut ScriptedRandom::new(vec![2, 10]));
        assert_eq!(p.challenge_type, Symbol::Orange);
        assert_eq!(p.challenge_goal, 15);
        assert_eq!(p.challenge_progress, 0);
        assert!(!p.challenge_completed);
        assert_eq!(p.last_date, "2024-05-01");
    }

    #[test]
    fn broken_level_is_repaired() {
        let store = MemoryStore::with_contents(r#"{"level": 0, "xp": 150, "last_date": "2024-05-01"}"#);
        let p = store.load("2024-05-01", &mut ScriptedRandom::default());
        assert_eq!((p.level, p.xp), (2, 50));
    }

    #[test]
    fn save_settles_high_score_and_indents() {
        let store = MemoryStore::new();
        let mut p = Profile::new("2024-05-01");
        p.earned = 77;
        store.save(&mut p);
        assert_eq!(p.high_score, 77);
        let raw = store.contents().unwrap();
        assert!(raw.contains("\n    \"high_score\": 77"));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("slots_data.json"));
        let mut p = Profile::new("2024-05-01");
        p.spent = 3;
        p.earned = 11;
        p.streak = 2;
        store.save(&mut p);
        let loaded = store.load("2024-05-01", &mut ScriptedRandom::default());
        assert_eq!(loaded, p);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn unwritable_path_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let store = JsonFileStore::new(blocker.join("slots_data.json"));
        let mut p = Profile::new("2024-05-01");
        store.save(&mut p);
        assert!(matches!(store.try_save(&mut p), Err(StoreError::Write { .. })));
    }
}
