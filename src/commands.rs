// Generation commands - the public operations callers drive the crate with
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::catalog::{
    seed_from_id, CatalogEntry, GeneratorHistory, HistoryEntry, PatternCatalog, PatternType,
};
use crate::generator::{kits, riffs, Hit, Note, PatternData, PatternSpec, RiffKind};
use crate::genre::Genre;
use crate::state::Workspace;
use crate::theory::{Key, Scale};

#[derive(Debug, Serialize)]
pub struct CommandError {
    message: String,
}

impl<E: std::fmt::Display> From<E> for CommandError {
    fn from(error: E) -> Self {
        CommandError {
            message: error.to_string(),
        }
    }
}

impl CommandError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Catalog-mode drum patterns are always two bars, the loop length
/// producers audition fastest
const CATALOG_DRUM_BARS: u32 = 2;

/// Accepted bpm range; anything outside falls back to the genre default
const BPM_MIN: u16 = 40;
const BPM_MAX: u16 = 240;

// ==================== PARAMETER SANITIZATION ====================

fn sanitize_bpm(genre: Genre, bpm: Option<u16>) -> u16 {
    match bpm {
        Some(b) if (BPM_MIN..=BPM_MAX).contains(&b) => b,
        Some(b) => {
            log::warn!("bpm {} out of range, using {} default", b, genre.as_str());
            genre.defaults().bpm
        }
        None => genre.defaults().bpm,
    }
}

fn sanitize_bars(bars: Option<u32>) -> u32 {
    match bars {
        Some(b @ (4 | 8)) => b,
        Some(b) => {
            log::warn!("{} bars not supported, using 4", b);
            4
        }
        None => 4,
    }
}

fn sanitize_key(genre: Genre, key: Option<&str>) -> Key {
    key.and_then(Key::from_string)
        .unwrap_or_else(|| genre.defaults().key)
}

fn sanitize_scale(genre: Genre, scale: Option<&str>) -> Scale {
    scale
        .and_then(Scale::from_string)
        .unwrap_or_else(|| genre.defaults().scale)
}

fn genre_slug(genre: Genre) -> String {
    genre.as_str().replace(' ', "_")
}

// ==================== CATALOG-MODE GENERATION ====================

/// A generated, catalogued, written-to-disk pattern
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPattern {
    pub id: String,
    pub file: String,
    pub path: String,
    pub genre: String,
    pub key: Option<String>,
    pub scale: Option<String>,
    pub bpm: u16,
    pub bars: u32,
    pub note_count: usize,
    /// True when the final content matched an already-catalogued pattern
    pub repeat: bool,
    /// The generated events, so the caller can display or audit them
    pub pattern: PatternData,
}

/// Generate a fresh drum pattern, register it in the catalog and write
/// it to the workspace.
///
/// Unknown genres fall back to trap; out-of-range bpm falls back to the
/// genre default.
pub fn generate_drum_pattern(
    workspace: &Workspace,
    catalog: &mut PatternCatalog,
    genre: &str,
    bpm: Option<u16>,
) -> CommandResult<GeneratedPattern> {
    let genre = Genre::from_string(genre);
    let bpm = sanitize_bpm(genre, bpm);
    let spec = PatternSpec::Drums {
        genre,
        bars: CATALOG_DRUM_BARS,
    };

    let mut rng = rand::thread_rng();
    let (data, entry, repeat) =
        register_with_retry(catalog, &spec, PatternType::Drum, None, &mut rng)?;

    let file = format!("{}_{}bpm.mid", entry.id, bpm);
    let bytes = spec.render(&data, bpm, &entry.id)?;
    let path = workspace.write_file(&file, &bytes)?;

    Ok(GeneratedPattern {
        id: entry.id,
        file,
        path: path.display().to_string(),
        genre: genre.as_str().to_string(),
        key: None,
        scale: None,
        bpm,
        bars: CATALOG_DRUM_BARS,
        note_count: data.len(),
        repeat,
        pattern: data,
    })
}

/// Generate a fresh melody, register it in the catalog and write it to
/// the workspace. Key and scale fall back to the genre defaults when
/// missing or unparseable.
pub fn generate_melody_pattern(
    workspace: &Workspace,
    catalog: &mut PatternCatalog,
    genre: &str,
    key: Option<&str>,
    scale: Option<&str>,
    bpm: Option<u16>,
    bars: Option<u32>,
) -> CommandResult<GeneratedPattern> {
    let genre = Genre::from_string(genre);
    let key = sanitize_key(genre, key);
    let scale = sanitize_scale(genre, scale);
    let bpm = sanitize_bpm(genre, bpm);
    let bars = sanitize_bars(bars);
    let spec = PatternSpec::Melody {
        genre,
        key,
        scale,
        bars,
    };

    let mut rng = rand::thread_rng();
    let (data, entry, repeat) = register_with_retry(
        catalog,
        &spec,
        PatternType::Melody,
        Some(key.as_str()),
        &mut rng,
    )?;

    let file = format!("{}_{}bpm.mid", entry.id, bpm);
    let bytes = spec.render(&data, bpm, &entry.id)?;
    let path = workspace.write_file(&file, &bytes)?;

    Ok(GeneratedPattern {
        id: entry.id,
        file,
        path: path.display().to_string(),
        genre: genre.as_str().to_string(),
        key: Some(key.as_str().to_string()),
        scale: Some(scale.as_str().to_string()),
        bpm,
        bars,
        note_count: data.len(),
        repeat,
        pattern: data,
    })
}

/// Generate, and if the content repeats something already catalogued,
/// regenerate exactly once. A second repeat is accepted and reported.
fn register_with_retry<R: rand::Rng>(
    catalog: &mut PatternCatalog,
    spec: &PatternSpec,
    pattern_type: PatternType,
    key: Option<&str>,
    rng: &mut R,
) -> CommandResult<(PatternData, CatalogEntry, bool)> {
    let mut data = spec.generate(rng);
    let (mut entry, mut repeat) =
        catalog.register(pattern_type, spec.genre(), key, &data.fingerprint_events())?;

    if repeat {
        log::info!("Content repeats {}, regenerating once", entry.id);
        data = spec.generate(rng);
        let registered =
            catalog.register(pattern_type, spec.genre(), key, &data.fingerprint_events())?;
        entry = registered.0;
        repeat = registered.1;
    }

    Ok((data, entry, repeat))
}

// ==================== RIFF GENERATION ====================

/// A preset riff written to the workspace. Riffs are fixed content, so
/// they are never catalogued.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedRiff {
    pub kind: String,
    pub file: String,
    pub path: String,
    pub genre: String,
    pub key: String,
    pub scale: String,
    pub bpm: u16,
    pub bars: u32,
    pub note_count: usize,
    pub notes: Vec<Note>,
}

/// Write the preset riff (hook, chords, bass or counter) for a genre
pub fn generate_riff(
    workspace: &Workspace,
    genre: &str,
    kind: &str,
    key: Option<&str>,
    scale: Option<&str>,
    bpm: Option<u16>,
    bars: Option<u32>,
) -> CommandResult<GeneratedRiff> {
    let genre = Genre::from_string(genre);
    let kind = RiffKind::from_string(kind);
    let key = sanitize_key(genre, key);
    let scale = sanitize_scale(genre, scale);
    let bpm = sanitize_bpm(genre, bpm);
    let bars = sanitize_bars(bars);

    let notes = riffs::generate_riff(genre, key, scale, kind, bars);
    let tag = format!("{}_{}", kind.as_str(), genre_slug(genre));
    let bytes = crate::midi::render_melody_midi(&notes, bpm, crate::midi::MELODY_CHANNEL, &tag)?;

    let file = format!(
        "midi_{}_{}_{}_{}_{}bars.mid",
        kind.as_str(),
        genre_slug(genre),
        key.as_str(),
        scale.as_str(),
        bars
    );
    let path = workspace.write_file(&file, &bytes)?;

    Ok(GeneratedRiff {
        kind: kind.as_str().to_string(),
        file,
        path: path.display().to_string(),
        genre: genre.as_str().to_string(),
        key: key.as_str().to_string(),
        scale: scale.as_str().to_string(),
        bpm,
        bars,
        note_count: notes.len(),
        notes,
    })
}

// ==================== DRUM KIT PRESETS ====================

/// An authored drum groove written to the workspace. Kits are fixed
/// content, so like riffs they are never catalogued.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedKit {
    pub file: String,
    pub path: String,
    pub genre: String,
    pub bpm: u16,
    pub bars: u32,
    pub note_count: usize,
    pub hits: Vec<Hit>,
}

/// Write the authored two-bar drum groove for a genre. When bpm is
/// missing or out of range the preset plays at the genre default.
pub fn generate_drum_kit(
    workspace: &Workspace,
    genre: &str,
    bpm: Option<u16>,
) -> CommandResult<GeneratedKit> {
    let genre = Genre::from_string(genre);
    let bpm = sanitize_bpm(genre, bpm);

    let hits = kits::kit_hits(genre);
    let tag = format!("kit_{}", genre_slug(genre));
    let bytes = crate::midi::render_drum_midi(&hits, bpm, &tag)?;

    let file = format!("drum_pattern_{}_{}bpm.mid", genre_slug(genre), bpm);
    let path = workspace.write_file(&file, &bytes)?;

    Ok(GeneratedKit {
        file,
        path: path.display().to_string(),
        genre: genre.as_str().to_string(),
        bpm,
        bars: kits::KIT_BARS,
        note_count: hits.len(),
        hits,
    })
}

// ==================== TRACKED GENERATION ====================

/// A seeded, reproducible generation recorded in the history
#[derive(Debug, Clone, Serialize)]
pub struct TrackedPattern {
    pub id: String,
    pub file: String,
    pub path: String,
    pub genre: String,
    pub key: Option<String>,
    pub scale: Option<String>,
    pub bpm: u16,
    pub bars: u32,
    pub seed: u64,
    pub note_count: usize,
    pub repeat: bool,
    pub pattern: PatternData,
}

/// Generate drums under a tracked id (GEN-0001, ...). The RNG seed is
/// derived from the id, so the pattern can be recalled byte-for-byte.
/// Repeats are catalogued as-is; regenerating would break recall.
pub fn generate_tracked_drums(
    workspace: &Workspace,
    catalog: &mut PatternCatalog,
    history: &mut GeneratorHistory,
    genre: &str,
    bpm: Option<u16>,
) -> CommandResult<TrackedPattern> {
    let genre = Genre::from_string(genre);
    let bpm = sanitize_bpm(genre, bpm);
    let spec = PatternSpec::Drums {
        genre,
        bars: CATALOG_DRUM_BARS,
    };
    run_tracked(workspace, catalog, history, spec, PatternType::Drum, bpm, "drums")
}

/// Generate a melody under a tracked id
pub fn generate_tracked_melody(
    workspace: &Workspace,
    catalog: &mut PatternCatalog,
    history: &mut GeneratorHistory,
    genre: &str,
    key: Option<&str>,
    scale: Option<&str>,
    bpm: Option<u16>,
    bars: Option<u32>,
) -> CommandResult<TrackedPattern> {
    let genre = Genre::from_string(genre);
    let key = sanitize_key(genre, key);
    let scale = sanitize_scale(genre, scale);
    let bpm = sanitize_bpm(genre, bpm);
    let bars = sanitize_bars(bars);
    let spec = PatternSpec::Melody {
        genre,
        key,
        scale,
        bars,
    };
    run_tracked(workspace, catalog, history, spec, PatternType::Melody, bpm, "melody")
}

fn run_tracked(
    workspace: &Workspace,
    catalog: &mut PatternCatalog,
    history: &mut GeneratorHistory,
    spec: PatternSpec,
    pattern_type: PatternType,
    bpm: u16,
    label: &str,
) -> CommandResult<TrackedPattern> {
    let id = history.next_id();
    let seed = seed_from_id(&id);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let data = spec.generate(&mut rng);
    let key = match spec {
        PatternSpec::Melody { key, .. } => Some(key),
        PatternSpec::Drums { .. } => None,
    };
    let scale = match spec {
        PatternSpec::Melody { scale, .. } => Some(scale),
        PatternSpec::Drums { .. } => None,
    };

    let (_, repeat) = catalog.register(
        pattern_type,
        spec.genre(),
        key.map(|k| k.as_str()),
        &data.fingerprint_events(),
    )?;

    let file = format!(
        "{}_{}_{}_{}bpm.mid",
        label,
        id,
        genre_slug(spec.genre()),
        bpm
    );
    let bytes = spec.render(&data, bpm, &id)?;
    let path = workspace.write_file(&file, &bytes)?;

    history.record(HistoryEntry {
        id: id.clone(),
        pattern_type,
        genre: spec.genre().as_str().to_string(),
        key: key.map(|k| k.as_str().to_string()),
        scale: scale.map(|s| s.as_str().to_string()),
        bpm,
        bars: spec.bars(),
        seed,
        file: file.clone(),
        created_at: chrono::Utc::now(),
    })?;

    Ok(TrackedPattern {
        id,
        file,
        path: path.display().to_string(),
        genre: spec.genre().as_str().to_string(),
        key: key.map(|k| k.as_str().to_string()),
        scale: scale.map(|s| s.as_str().to_string()),
        bpm,
        bars: spec.bars(),
        seed,
        note_count: data.len(),
        repeat,
        pattern: data,
    })
}

/// Everything a producer needs to start a track: tracked drums, a
/// tracked melody and the genre's preset bassline, all at the genre
/// defaults.
#[derive(Debug, Clone, Serialize)]
pub struct StarterKit {
    pub drums: TrackedPattern,
    pub melody: TrackedPattern,
    pub bass: GeneratedRiff,
}

pub fn generate_starter_kit(
    workspace: &Workspace,
    catalog: &mut PatternCatalog,
    history: &mut GeneratorHistory,
    genre: &str,
) -> CommandResult<StarterKit> {
    let drums = generate_tracked_drums(workspace, catalog, history, genre, None)?;
    let melody =
        generate_tracked_melody(workspace, catalog, history, genre, None, None, None, None)?;
    let bass = generate_riff(workspace, genre, "bass", None, None, None, None)?;

    Ok(StarterKit {
        drums,
        melody,
        bass,
    })
}

// ==================== RECALL AND LISTING ====================

/// Regenerate a tracked pattern from its recorded seed and parameters
/// and rewrite its file. The output is identical to the original run.
pub fn recall_pattern(
    workspace: &Workspace,
    history: &GeneratorHistory,
    id: &str,
) -> CommandResult<TrackedPattern> {
    let entry = history.find(id).ok_or_else(|| CommandError {
        message: format!("Unknown pattern id: {}", id),
    })?;

    let genre = Genre::from_string(&entry.genre);
    let spec = match entry.pattern_type {
        PatternType::Drum => PatternSpec::Drums {
            genre,
            bars: entry.bars,
        },
        PatternType::Melody => PatternSpec::Melody {
            genre,
            key: sanitize_key(genre, entry.key.as_deref()),
            scale: sanitize_scale(genre, entry.scale.as_deref()),
            bars: entry.bars,
        },
        other => {
            return Err(CommandError {
                message: format!("Pattern type {} is not recallable", other.as_str()),
            })
        }
    };

    let mut rng = ChaCha8Rng::seed_from_u64(entry.seed);
    let data = spec.generate(&mut rng);
    let bytes = spec.render(&data, entry.bpm, &entry.id)?;
    let path = workspace.write_file(&entry.file, &bytes)?;

    log::info!("Recalled {} into {}", entry.id, path.display());

    Ok(TrackedPattern {
        id: entry.id.clone(),
        file: entry.file.clone(),
        path: path.display().to_string(),
        genre: entry.genre.clone(),
        key: entry.key.clone(),
        scale: entry.scale.clone(),
        bpm: entry.bpm,
        bars: entry.bars,
        seed: entry.seed,
        note_count: data.len(),
        repeat: false,
        pattern: data,
    })
}

/// All catalogued patterns
pub fn list_patterns(catalog: &PatternCatalog) -> Vec<CatalogEntry> {
    catalog.entries().to_vec()
}

/// All tracked generations
pub fn list_history(history: &GeneratorHistory) -> Vec<HistoryEntry> {
    history.entries().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fingerprint;
    use tempfile::tempdir;

    struct Fixture {
        _dir: tempfile::TempDir,
        workspace: Workspace,
        catalog: PatternCatalog,
        history: GeneratorHistory,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let workspace = Workspace::new(dir.path().join("ws")).unwrap();
        let catalog = PatternCatalog::open(workspace.catalog_path());
        let history = GeneratorHistory::open(workspace.history_path());
        Fixture {
            _dir: dir,
            workspace,
            catalog,
            history,
        }
    }

    #[test]
    fn test_drum_command_catalogs_and_writes_midi() {
        let mut f = fixture();
        let result =
            generate_drum_pattern(&f.workspace, &mut f.catalog, "trap", Some(150)).unwrap();

        assert_eq!(result.id, "TRAP_DRUM_0001");
        assert_eq!(result.bpm, 150);
        assert_eq!(result.bars, 2);
        assert!(result.note_count > 0);

        let bytes = std::fs::read(&result.path).unwrap();
        assert_eq!(&bytes[..4], b"MThd");
        assert_eq!(f.catalog.len(), 1);
    }

    #[test]
    fn test_unknown_params_fall_back_to_genre_defaults() {
        let mut f = fixture();
        let result = generate_melody_pattern(
            &f.workspace,
            &mut f.catalog,
            "polka",
            Some("H"),
            Some("mixolydian"),
            Some(999),
            Some(7),
        )
        .unwrap();

        // Unknown genre -> trap, whose defaults are F minor at 140
        assert_eq!(result.genre, "trap");
        assert_eq!(result.key.as_deref(), Some("F"));
        assert_eq!(result.scale.as_deref(), Some("minor"));
        assert_eq!(result.bpm, 140);
        assert_eq!(result.bars, 4);
    }

    #[test]
    fn test_tracked_ids_are_sequential() {
        let mut f = fixture();
        let first =
            generate_tracked_drums(&f.workspace, &mut f.catalog, &mut f.history, "drill", None)
                .unwrap();
        let second = generate_tracked_melody(
            &f.workspace,
            &mut f.catalog,
            &mut f.history,
            "drill",
            None,
            None,
            None,
            None,
        )
        .unwrap();

        assert_eq!(first.id, "GEN-0001");
        assert_eq!(second.id, "GEN-0002");
        assert_eq!(first.seed, seed_from_id("GEN-0001"));
        assert!(first.file.contains("drums_GEN-0001_drill"));
    }

    #[test]
    fn test_recall_reproduces_identical_bytes() {
        let mut f = fixture();
        let original = generate_tracked_melody(
            &f.workspace,
            &mut f.catalog,
            &mut f.history,
            "rnb",
            Some("A#"),
            Some("dorian"),
            Some(85),
            Some(4),
        )
        .unwrap();

        let first_bytes = std::fs::read(&original.path).unwrap();
        std::fs::remove_file(&original.path).unwrap();

        let recalled = recall_pattern(&f.workspace, &f.history, &original.id).unwrap();
        let second_bytes = std::fs::read(&recalled.path).unwrap();

        assert_eq!(first_bytes, second_bytes);
        assert_eq!(recalled.file, original.file);
    }

    #[test]
    fn test_recall_unknown_id_fails() {
        let f = fixture();
        let result = recall_pattern(&f.workspace, &f.history, "GEN-4242");
        assert!(result.is_err());
    }

    #[test]
    fn test_velocity_changes_still_count_as_repeat() {
        let mut f = fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let spec = PatternSpec::Drums {
            genre: Genre::Trap,
            bars: 2,
        };
        let data = spec.generate(&mut rng);

        f.catalog
            .register(PatternType::Drum, Genre::Trap, None, &data.fingerprint_events())
            .unwrap();

        // Same hits with every velocity shifted still fingerprint the same
        let louder = match &data {
            PatternData::Drums(hits) => hits
                .iter()
                .map(|h| crate::generator::drums::Hit {
                    velocity: h.velocity.saturating_add(10).min(127),
                    ..*h
                })
                .collect::<Vec<_>>(),
            _ => unreachable!(),
        };
        let louder_events = PatternData::Drums(louder).fingerprint_events();
        assert_eq!(
            fingerprint(&louder_events),
            fingerprint(&data.fingerprint_events())
        );
        assert!(f.catalog.contains(&louder_events));
    }

    #[test]
    fn test_riff_is_not_catalogued() {
        let f = fixture();
        let riff = generate_riff(
            &f.workspace,
            "hip hop",
            "chords",
            None,
            None,
            None,
            Some(8),
        )
        .unwrap();

        assert_eq!(riff.file, "midi_chords_hip_hop_A_minor_pent_8bars.mid");
        assert!(std::path::Path::new(&riff.path).exists());
        assert!(f.catalog.is_empty());
    }

    #[test]
    fn test_drum_kit_writes_preset_without_cataloguing() {
        let f = fixture();
        let kit = generate_drum_kit(&f.workspace, "hip hop", None).unwrap();

        // Preset plays at the genre default bpm
        assert_eq!(kit.bpm, 90);
        assert_eq!(kit.bars, 2);
        assert_eq!(kit.file, "drum_pattern_hip_hop_90bpm.mid");
        assert!(kit.note_count > 0);

        let bytes = std::fs::read(&kit.path).unwrap();
        assert_eq!(&bytes[..4], b"MThd");
        assert!(f.catalog.is_empty());
    }

    #[test]
    fn test_starter_kit_produces_three_files() {
        let mut f = fixture();
        let kit =
            generate_starter_kit(&f.workspace, &mut f.catalog, &mut f.history, "melodic").unwrap();

        assert_eq!(kit.drums.id, "GEN-0001");
        assert_eq!(kit.melody.id, "GEN-0002");
        for path in [&kit.drums.path, &kit.melody.path, &kit.bass.path] {
            assert!(std::path::Path::new(path).exists());
        }
        assert_eq!(f.history.len(), 2);
    }
}
