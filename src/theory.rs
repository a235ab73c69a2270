// Music theory tables - note names, keys, and scale interval sets
// Pure lookup data shared by every generator

use serde::{Deserialize, Serialize};

/// Chromatic note names in ascending order from C
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Musical key - the root note of a scale
///
/// Pitches follow the C4=60 convention (FL Studio displays this as C5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    /// Parse a note name ("C", "F#", "a#"). Returns None for anything else.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" => Some(Key::C),
            "C#" | "DB" => Some(Key::CSharp),
            "D" => Some(Key::D),
            "D#" | "EB" => Some(Key::DSharp),
            "E" => Some(Key::E),
            "F" => Some(Key::F),
            "F#" | "GB" => Some(Key::FSharp),
            "G" => Some(Key::G),
            "G#" | "AB" => Some(Key::GSharp),
            "A" => Some(Key::A),
            "A#" | "BB" => Some(Key::ASharp),
            "B" => Some(Key::B),
            _ => None,
        }
    }

    /// Semitone offset from C (0..12)
    pub fn semitone(&self) -> u8 {
        match self {
            Key::C => 0,
            Key::CSharp => 1,
            Key::D => 2,
            Key::DSharp => 3,
            Key::E => 4,
            Key::F => 5,
            Key::FSharp => 6,
            Key::G => 7,
            Key::GSharp => 8,
            Key::A => 9,
            Key::ASharp => 10,
            Key::B => 11,
        }
    }

    /// MIDI root pitch in the middle register (C4=60)
    pub fn root_pitch(&self) -> u8 {
        60 + self.semitone()
    }

    /// Canonical note name ("C#", "A#", ...)
    pub fn as_str(&self) -> &'static str {
        NOTE_NAMES[self.semitone() as usize]
    }
}

/// Named scale - a set of semitone intervals from the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    /// Natural minor
    Minor,

    /// Minor pentatonic
    MinorPent,

    /// Dorian mode
    Dorian,

    /// Chromatic-flavored minor (raised 7th)
    Chromatic,

    /// Major (ionian)
    Major,
}

impl Scale {
    /// Parse a scale name. Returns None for anything unrecognized.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Some(Scale::Minor),
            "minor_pent" | "minor pent" | "pentatonic" => Some(Scale::MinorPent),
            "dorian" => Some(Scale::Dorian),
            "chromatic" => Some(Scale::Chromatic),
            "major" => Some(Scale::Major),
            _ => None,
        }
    }

    /// Canonical scale name
    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::Minor => "minor",
            Scale::MinorPent => "minor_pent",
            Scale::Dorian => "dorian",
            Scale::Chromatic => "chromatic",
            Scale::Major => "major",
        }
    }

    /// Semitone intervals from the root, one octave
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::MinorPent => &[0, 3, 5, 7, 10],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::Chromatic => &[0, 2, 3, 5, 7, 8, 11],
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
        }
    }

    /// Build an ascending pitch pool spanning `octaves` octaves above the root
    pub fn pitch_pool(&self, root: u8, octaves: u8) -> Vec<u8> {
        let mut pool = Vec::with_capacity(self.intervals().len() * octaves as usize);
        for octave in 0..octaves {
            for &interval in self.intervals() {
                pool.push(root + interval + octave * 12);
            }
        }
        pool
    }

    /// Note names of the scale degrees built on `key`
    pub fn note_names(&self, key: Key) -> Vec<&'static str> {
        let root = key.semitone() as usize;
        self.intervals()
            .iter()
            .map(|&i| NOTE_NAMES[(root + i as usize) % 12])
            .collect()
    }
}
