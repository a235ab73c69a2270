// Riff presets - authored lead hooks, chord progressions, basslines and
// counter melodies per genre
// Fixed content (no randomness), so riffs are not registered in the catalog

use serde::{Deserialize, Serialize};

use super::melody::Note;
use crate::genre::Genre;
use crate::theory::{Key, Scale};

/// Kinds of preset riff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiffKind {
    /// Lead hook melody
    Hook,

    /// Chord progression, two beats per chord
    Chords,

    /// Bass line / 808 melody
    Bass,

    /// Counter melody that answers the hook
    Counter,
}

impl RiffKind {
    /// Convert from string representation. Unknown kinds default to hook.
    pub fn from_string(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "hook" | "melody" | "lead" => RiffKind::Hook,
            "chords" | "chord" | "progression" => RiffKind::Chords,
            "bass" | "808" | "bassline" => RiffKind::Bass,
            "counter" => RiffKind::Counter,
            _ => RiffKind::Hook, // Default
        }
    }

    /// Short label used in output filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            RiffKind::Hook => "melody",
            RiffKind::Chords => "chords",
            RiffKind::Bass => "bass",
            RiffKind::Counter => "counter",
        }
    }
}

/// (start_beat, scale-pool index, duration_beats, velocity)
type Step = (f64, usize, f64, u8);

/// Chord progressions as semitone offsets from the root. Four chords per
/// genre, cycled two beats per chord.
fn progression(genre: Genre) -> [&'static [i32]; 4] {
    match genre {
        Genre::Trap => [&[0, 3, 5, 8], &[3, 5, 8, 12], &[5, 8, 12, 15], &[3, 5, 8, 12]],
        Genre::HipHop => [&[0, 3, 5, 8], &[5, 8, 12, 15], &[3, 5, 8, 12], &[0, 3, 5, 8]],
        // Jazz-leaning voicings
        Genre::Rnb => [&[0, 4, 7, 11], &[3, 7, 10, 14], &[5, 9, 12, 16], &[0, 4, 7, 10]],
        Genre::Melodic => [&[0, 3, 7, 10], &[5, 8, 12, 15], &[3, 7, 10, 14], &[0, 3, 7, 10]],
        // Repetitive and cold
        Genre::Drill => [&[0, 3, 5, 8], &[0, 3, 5, 8], &[5, 8, 12, 15], &[3, 5, 8, 12]],
    }
}

fn hook_steps(genre: Genre) -> &'static [Step] {
    match genre {
        Genre::Trap => &[
            (0.0, 4, 0.5, 95),
            (0.5, 2, 0.25, 80),
            (1.0, 0, 1.0, 100),
            (2.0, 3, 0.5, 85),
            (2.75, 1, 0.25, 70),
            (3.0, 4, 1.0, 90),
            (4.0, 2, 0.5, 90),
            (4.5, 0, 1.5, 100),
            (6.0, 6, 0.5, 80),
            (6.5, 4, 0.5, 85),
            (7.0, 0, 1.0, 95),
        ],
        Genre::Drill => &[
            (0.0, 0, 0.25, 90),
            (0.25, 0, 0.25, 75),
            (0.75, 2, 0.5, 95),
            (1.5, 3, 0.25, 85),
            (2.0, 0, 0.25, 90),
            (2.25, 0, 0.25, 70),
            (2.75, 4, 0.5, 100),
            (3.5, 2, 0.5, 80),
            (4.0, 0, 0.25, 90),
            (4.75, 2, 0.5, 95),
            (5.5, 6, 0.25, 80),
            (6.0, 4, 1.0, 95),
            (7.0, 0, 1.0, 90),
        ],
        Genre::HipHop => &[
            (0.0, 4, 1.0, 90),
            (1.0, 5, 0.5, 85),
            (1.5, 4, 0.5, 80),
            (2.0, 2, 1.0, 95),
            (3.0, 0, 1.0, 100),
            (4.0, 3, 0.75, 85),
            (4.75, 4, 0.25, 75),
            (5.0, 5, 1.0, 90),
            (6.0, 4, 0.5, 85),
            (6.5, 2, 0.5, 80),
            (7.0, 0, 1.0, 100),
        ],
        Genre::Rnb => &[
            (0.0, 2, 0.75, 85),
            (1.0, 4, 1.0, 90),
            (2.25, 5, 0.5, 80),
            (3.0, 4, 1.0, 95),
            (4.0, 2, 0.5, 85),
            (4.75, 0, 1.5, 100),
            (6.5, 3, 0.5, 75),
            (7.0, 2, 1.0, 90),
        ],
        Genre::Melodic => &[
            (0.0, 7, 0.5, 95),
            (0.5, 6, 0.5, 85),
            (1.0, 4, 1.0, 100),
            (2.0, 5, 0.5, 90),
            (2.5, 4, 0.5, 80),
            (3.0, 2, 1.0, 95),
            (4.0, 4, 0.5, 90),
            (4.5, 2, 0.5, 85),
            (5.0, 0, 2.0, 100),
            (7.0, 2, 0.5, 70),
            (7.5, 4, 0.5, 80),
        ],
    }
}

fn bass_steps(genre: Genre) -> &'static [Step] {
    match genre {
        Genre::Trap => &[
            (0.0, 0, 2.0, 100),
            (2.0, 3, 0.5, 90),
            (2.75, 0, 1.25, 95),
            (4.0, 4, 1.0, 100),
            (5.0, 2, 1.0, 90),
            (6.0, 0, 2.0, 100),
        ],
        Genre::Drill => &[
            (0.0, 0, 1.0, 100),
            (1.0, 0, 0.5, 85),
            (1.75, 2, 0.5, 90),
            (2.5, 0, 1.5, 100),
            (4.0, 0, 1.0, 100),
            (5.0, 3, 1.0, 90),
            (6.0, 0, 2.0, 100),
        ],
        Genre::HipHop => &[
            (0.0, 0, 1.0, 95),
            (1.0, 2, 0.5, 85),
            (1.5, 3, 0.5, 80),
            (2.0, 4, 1.0, 90),
            (3.0, 0, 1.0, 95),
            (4.0, 0, 1.0, 95),
            (5.0, 5, 1.0, 85),
            (6.0, 4, 1.0, 90),
            (7.0, 0, 1.0, 100),
        ],
        Genre::Rnb => &[
            (0.0, 0, 1.5, 90),
            (1.5, 2, 0.5, 80),
            (2.0, 4, 1.0, 85),
            (3.0, 3, 1.0, 80),
            (4.0, 0, 2.0, 90),
            (6.0, 2, 1.0, 80),
            (7.0, 0, 1.0, 85),
        ],
        Genre::Melodic => &[
            (0.0, 0, 2.0, 100),
            (2.0, 4, 1.0, 90),
            (3.0, 2, 1.0, 85),
            (4.0, 0, 2.0, 100),
            (6.0, 3, 1.0, 90),
            (7.0, 0, 1.0, 95),
        ],
    }
}

/// Counter melody shared across genres - fills the gaps the hook leaves
const COUNTER_STEPS: &[Step] = &[
    (0.5, 5, 0.5, 75),
    (1.5, 4, 0.5, 70),
    (2.5, 2, 1.0, 80),
    (4.0, 6, 0.5, 75),
    (4.5, 5, 0.5, 70),
    (5.5, 3, 0.5, 75),
    (6.5, 2, 1.5, 80),
];

/// Produce the preset riff for a genre/key/scale.
///
/// Phrases are authored over an 8-beat loop; an 8-bar request appends a
/// second pass (the hook's repeat is played 5 velocity softer, floor 60).
pub fn generate_riff(genre: Genre, key: Key, scale: Scale, kind: RiffKind, bars: u32) -> Vec<Note> {
    let root = key.root_pitch();
    let pool = scale.pitch_pool(root, 3);

    let base = match kind {
        RiffKind::Hook => from_steps(hook_steps(genre), &pool),
        RiffKind::Bass => from_steps(bass_steps(genre), &pool),
        RiffKind::Counter => from_steps(COUNTER_STEPS, &pool),
        RiffKind::Chords => chords(genre, root, bars),
    };

    if kind == RiffKind::Chords || bars != 8 {
        return base;
    }

    let soften = kind == RiffKind::Hook;
    let mut notes = base.clone();
    notes.extend(base.into_iter().map(|n| Note {
        start_beat: n.start_beat + 8.0,
        velocity: if soften { n.velocity.saturating_sub(5).max(60) } else { n.velocity },
        ..n
    }));
    notes
}

fn from_steps(steps: &[Step], pool: &[u8]) -> Vec<Note> {
    steps
        .iter()
        .map(|&(start_beat, index, duration_beats, velocity)| Note {
            start_beat,
            pitch: pool[index.min(pool.len() - 1)],
            duration_beats,
            velocity,
        })
        .collect()
}

fn chords(genre: Genre, root: u8, bars: u32) -> Vec<Note> {
    let progression = progression(genre);
    let beats_per_chord = 2.0;
    let total_chords = bars * 2;

    let mut notes = Vec::new();
    for c in 0..total_chords {
        let chord = progression[c as usize % progression.len()];
        let start_beat = c as f64 * beats_per_chord;
        for &interval in chord {
            let mut pitch = root as i32 + interval;
            // Keep voicings within a reasonable register
            if pitch > 84 {
                pitch -= 12;
            }
            notes.push(Note {
                start_beat,
                pitch: pitch as u8,
                duration_beats: beats_per_chord - 0.1,
                velocity: 80,
            });
        }
    }
    notes
}
