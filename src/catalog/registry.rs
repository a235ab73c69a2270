// Pattern registry - JSON-backed catalog deduplicated by content fingerprint
// Every accepted pattern gets a sequential id like TRAP_DRUM_0001

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fingerprint::fingerprint;
use crate::genre::Genre;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// What kind of musical content an entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Drum,
    Melody,
    Bass,
    Chords,
    Counter,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Drum => "drum",
            PatternType::Melody => "melody",
            PatternType::Bass => "bass",
            PatternType::Chords => "chords",
            PatternType::Counter => "counter",
        }
    }

    /// Uppercase segment used in catalog ids
    fn id_segment(&self) -> &'static str {
        match self {
            PatternType::Drum => "DRUM",
            PatternType::Melody => "MELODY",
            PatternType::Bass => "BASS",
            PatternType::Chords => "CHORDS",
            PatternType::Counter => "COUNTER",
        }
    }
}

/// One catalogued pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub pattern_type: PatternType,
    pub genre: String,
    /// Key name for melodic content, absent for drums
    pub key: Option<String>,
    pub fingerprint: String,
    pub note_count: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// JSON-backed pattern catalog.
///
/// The whole catalog is rewritten on every registration. Catalogs stay
/// small (hundreds of entries) so this is simpler and safer than
/// incremental appends.
pub struct PatternCatalog {
    path: PathBuf,
    entries: Vec<CatalogEntry>,
}

impl PatternCatalog {
    /// Open the catalog at `path`, creating an empty one if the file
    /// does not exist. A corrupt file is logged and treated as empty
    /// rather than blocking generation.
    ///
    /// On disk the catalog is a single JSON object keyed by entry id.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, CatalogEntry>>(&raw) {
                Ok(by_id) => {
                    let mut entries: Vec<CatalogEntry> = by_id.into_values().collect();
                    entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                    entries
                }
                Err(e) => {
                    log::warn!(
                        "Catalog at {} is corrupt ({}), starting fresh",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        PatternCatalog { path, entries }
    }

    /// Register a pattern's content.
    ///
    /// Returns the catalog entry and whether the content was already
    /// known. A repeat returns the EXISTING entry, so the original id
    /// keeps naming that content.
    pub fn register(
        &mut self,
        pattern_type: PatternType,
        genre: Genre,
        key: Option<&str>,
        events: &[(f64, u8, f64)],
    ) -> CatalogResult<(CatalogEntry, bool)> {
        let print = fingerprint(events);

        if let Some(existing) = self.entries.iter().find(|e| e.fingerprint == print) {
            log::info!("Pattern already catalogued as {}", existing.id);
            return Ok((existing.clone(), true));
        }

        let genre_name = genre.as_str();
        let sequence = self
            .entries
            .iter()
            .filter(|e| e.pattern_type == pattern_type && e.genre == genre_name)
            .count()
            + 1;

        let entry = CatalogEntry {
            id: format!(
                "{}_{}_{:04}",
                genre_name.to_uppercase().replace(' ', "_"),
                pattern_type.id_segment(),
                sequence
            ),
            pattern_type,
            genre: genre_name.to_string(),
            key: key.map(|k| k.to_string()),
            fingerprint: print,
            note_count: events.len(),
            created_at: chrono::Utc::now(),
        };

        self.entries.push(entry.clone());
        self.save()?;
        log::info!("Catalogued new pattern {}", entry.id);
        Ok((entry, false))
    }

    /// Check whether content is already catalogued without registering it
    pub fn contains(&self, events: &[(f64, u8, f64)]) -> bool {
        let print = fingerprint(events);
        self.entries.iter().any(|e| e.fingerprint == print)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries narrowed by genre and/or pattern type
    pub fn filtered(
        &self,
        genre: Option<Genre>,
        pattern_type: Option<PatternType>,
    ) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| {
                genre.map_or(true, |g| e.genre == g.as_str())
                    && pattern_type.map_or(true, |t| e.pattern_type == t)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> CatalogResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let by_id: BTreeMap<&str, &CatalogEntry> = self
            .entries
            .iter()
            .map(|e| (e.id.as_str(), e))
            .collect();
        let json = serde_json::to_string_pretty(&by_id)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn events_a() -> Vec<(f64, u8, f64)> {
        vec![(0.0, 36, 0.2), (2.0, 38, 0.2)]
    }

    fn events_b() -> Vec<(f64, u8, f64)> {
        vec![(0.0, 36, 0.2), (3.0, 38, 0.2)]
    }

    fn events_c() -> Vec<(f64, u8, f64)> {
        vec![(1.0, 36, 0.2), (2.0, 42, 0.2)]
    }

    #[test]
    fn test_ids_are_sequential_per_genre_and_type() {
        let dir = tempdir().unwrap();
        let mut catalog = PatternCatalog::open(dir.path().join("catalog.json"));

        let (first, repeat) = catalog
            .register(PatternType::Drum, Genre::Trap, None, &events_a())
            .unwrap();
        assert!(!repeat);
        assert_eq!(first.id, "TRAP_DRUM_0001");

        let (second, _) = catalog
            .register(PatternType::Drum, Genre::Trap, None, &events_b())
            .unwrap();
        assert_eq!(second.id, "TRAP_DRUM_0002");

        // Another genre starts its own sequence (with fresh content -
        // dedup is global, not per genre)
        let (other, repeat) = catalog
            .register(PatternType::Drum, Genre::HipHop, None, &events_c())
            .unwrap();
        assert!(!repeat);
        assert_eq!(other.id, "HIP_HOP_DRUM_0001");
    }

    #[test]
    fn test_dedup_crosses_genre_boundaries() {
        let dir = tempdir().unwrap();
        let mut catalog = PatternCatalog::open(dir.path().join("catalog.json"));

        let (original, _) = catalog
            .register(PatternType::Drum, Genre::Trap, None, &events_a())
            .unwrap();

        // Identical content under a different genre is still a repeat
        // of the first registration
        let (entry, repeat) = catalog
            .register(PatternType::Drum, Genre::HipHop, None, &events_a())
            .unwrap();
        assert!(repeat);
        assert_eq!(entry.id, original.id);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_repeat_returns_existing_entry() {
        let dir = tempdir().unwrap();
        let mut catalog = PatternCatalog::open(dir.path().join("catalog.json"));

        let (original, _) = catalog
            .register(PatternType::Melody, Genre::Rnb, Some("A#"), &events_a())
            .unwrap();
        let (again, repeat) = catalog
            .register(PatternType::Melody, Genre::Rnb, Some("A#"), &events_a())
            .unwrap();

        assert!(repeat);
        assert_eq!(again.id, original.id);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        {
            let mut catalog = PatternCatalog::open(&path);
            catalog
                .register(PatternType::Drum, Genre::Drill, None, &events_a())
                .unwrap();
        }

        let mut reopened = PatternCatalog::open(&path);
        assert_eq!(reopened.len(), 1);

        // Sequence continues from persisted state
        let (entry, _) = reopened
            .register(PatternType::Drum, Genre::Drill, None, &events_b())
            .unwrap();
        assert_eq!(entry.id, "DRILL_DRUM_0002");
    }

    #[test]
    fn test_catalog_file_is_object_keyed_by_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let mut catalog = PatternCatalog::open(&path);
        let (entry, _) = catalog
            .register(PatternType::Drum, Genre::Trap, None, &events_a())
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(doc.is_object());
        assert_eq!(doc[&entry.id]["fingerprint"], entry.fingerprint.as_str());
    }

    #[test]
    fn test_corrupt_catalog_treated_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "not json {{{").unwrap();

        let catalog = PatternCatalog::open(&path);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_filtered_narrows_by_genre_and_type() {
        let dir = tempdir().unwrap();
        let mut catalog = PatternCatalog::open(dir.path().join("catalog.json"));

        catalog
            .register(PatternType::Drum, Genre::Trap, None, &events_a())
            .unwrap();
        catalog
            .register(PatternType::Melody, Genre::Trap, Some("F"), &events_b())
            .unwrap();

        assert_eq!(catalog.filtered(Some(Genre::Trap), None).len(), 2);
        assert_eq!(
            catalog
                .filtered(Some(Genre::Trap), Some(PatternType::Drum))
                .len(),
            1
        );
        assert!(catalog.filtered(Some(Genre::Drill), None).is_empty());
    }

    #[test]
    fn test_contains_matches_registered_content() {
        let dir = tempdir().unwrap();
        let mut catalog = PatternCatalog::open(dir.path().join("catalog.json"));

        assert!(!catalog.contains(&events_a()));
        catalog
            .register(PatternType::Drum, Genre::Melodic, None, &events_a())
            .unwrap();
        assert!(catalog.contains(&events_a()));
        assert!(!catalog.contains(&events_b()));
    }
}
