// Pattern generators - randomized drum and melody construction
// All generation takes an explicit RNG so the ambient and seeded paths
// share one code path

pub mod drums;
pub mod kits;
pub mod melody;
pub mod riffs;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use drums::{generate_drums, Hit};
pub use kits::{kit_hits, KIT_BARS};
pub use melody::{generate_melody, Note};
pub use riffs::{generate_riff, RiffKind};

use crate::genre::Genre;
use crate::theory::{Key, Scale};

/// Fixed note length for percussive hits, in beats
pub const HIT_LENGTH_BEATS: f64 = 0.2;

/// Drum instruments on the General MIDI percussion channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    Kick,
    Snare,
    Clap,
    Ghost,
    HihatClosed,
    HihatOpen,
    HihatPedal,
    Rim,
    Snap,
    Shaker,
    TomHi,
    TomLo,
    Ride,
    Crash,
    Cowbell,
}

impl Instrument {
    /// General MIDI drum note number (channel 10)
    pub fn gm_note(&self) -> u8 {
        match self {
            Instrument::Kick => 36,        // Bass Drum 1
            Instrument::Snare => 38,       // Acoustic Snare
            Instrument::Ghost => 38,       // Ghost snare (same note, lower velocity)
            Instrument::Clap => 39,        // Hand Clap
            Instrument::Snap => 39,        // Finger Snap (same as clap)
            Instrument::HihatClosed => 42, // Closed Hi-Hat
            Instrument::HihatOpen => 46,   // Open Hi-Hat
            Instrument::HihatPedal => 44,  // Pedal Hi-Hat
            Instrument::Rim => 37,         // Side Stick / Rim
            Instrument::Shaker => 70,      // Maracas / Shaker
            Instrument::TomHi => 50,       // High Tom
            Instrument::TomLo => 45,       // Low Tom
            Instrument::Ride => 51,        // Ride Cymbal
            Instrument::Crash => 49,       // Crash Cymbal
            Instrument::Cowbell => 56,     // Cowbell
        }
    }
}

/// A generated pattern - either drum hits or melodic notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternData {
    Drums(Vec<Hit>),
    Melody(Vec<Note>),
}

impl PatternData {
    /// Number of events in the pattern
    pub fn len(&self) -> usize {
        match self {
            PatternData::Drums(hits) => hits.len(),
            PatternData::Melody(notes) => notes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (time, pitch-or-GM-code, duration) triples for fingerprinting.
    /// Velocity is deliberately excluded: two patterns differing only in
    /// velocity are the same pattern.
    pub fn fingerprint_events(&self) -> Vec<(f64, u8, f64)> {
        match self {
            PatternData::Drums(hits) => hits
                .iter()
                .map(|h| (h.step as f64, h.instrument.gm_note(), HIT_LENGTH_BEATS))
                .collect(),
            PatternData::Melody(notes) => notes
                .iter()
                .map(|n| (n.start_beat, n.pitch, n.duration_beats))
                .collect(),
        }
    }
}

/// Generator parameters - a closed set of variants dispatched statically
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternSpec {
    Drums { genre: Genre, bars: u32 },
    Melody {
        genre: Genre,
        key: Key,
        scale: Scale,
        bars: u32,
    },
}

impl PatternSpec {
    /// Run the matching generator with the given random source
    pub fn generate<R: Rng>(&self, rng: &mut R) -> PatternData {
        match *self {
            PatternSpec::Drums { genre, bars } => {
                PatternData::Drums(drums::generate_drums(genre, bars, rng))
            }
            PatternSpec::Melody {
                genre,
                key,
                scale,
                bars,
            } => PatternData::Melody(melody::generate_melody(genre, key, scale, bars, rng)),
        }
    }

    /// Serialize a generated pattern to MIDI file bytes
    pub fn render(
        &self,
        data: &PatternData,
        bpm: u16,
        tag: &str,
    ) -> Result<Vec<u8>, crate::midi::MidiError> {
        match data {
            PatternData::Drums(hits) => crate::midi::render_drum_midi(hits, bpm, tag),
            PatternData::Melody(notes) => {
                crate::midi::render_melody_midi(notes, bpm, crate::midi::MELODY_CHANNEL, tag)
            }
        }
    }

    pub fn genre(&self) -> Genre {
        match *self {
            PatternSpec::Drums { genre, .. } => genre,
            PatternSpec::Melody { genre, .. } => genre,
        }
    }

    pub fn bars(&self) -> u32 {
        match *self {
            PatternSpec::Drums { bars, .. } => bars,
            PatternSpec::Melody { bars, .. } => bars,
        }
    }
}

/// Sample a velocity from an inclusive range, clamped to valid MIDI
pub(crate) fn velocity_in<R: Rng>(rng: &mut R, range: (u8, u8)) -> u8 {
    let (lo, hi) = range;
    let lo = lo.max(1);
    let hi = hi.clamp(lo, 127);
    rng.gen_range(lo..=hi)
}

/// Weighted choice over parallel value/weight slices
pub(crate) fn weighted_choice<R: Rng, T: Copy>(rng: &mut R, values: &[T], weights: &[u32]) -> T {
    debug_assert_eq!(values.len(), weights.len());
    let total: u32 = weights.iter().sum();
    let mut roll = rng.gen_range(0..total.max(1));
    for (value, &weight) in values.iter().zip(weights) {
        if roll < weight {
            return *value;
        }
        roll -= weight;
    }
    values[values.len() - 1]
}
