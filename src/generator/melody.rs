// Melody pattern generator
// Contour-shaped random walks over a scale pitch pool

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::weighted_choice;
use crate::genre::{Contour, Genre};
use crate::theory::{Key, Scale};

/// Room reserved at the end of the phrase for the closing cadence note
const CADENCE_RESERVE: f64 = 0.25;

/// One melodic event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Start position in beats from the top of the phrase
    pub start_beat: f64,

    /// MIDI note number
    pub pitch: u8,

    /// Length in beats
    pub duration_beats: f64,

    /// MIDI velocity (1-127)
    pub velocity: u8,
}

impl Note {
    /// End position in beats
    pub fn end_beat(&self) -> f64 {
        self.start_beat + self.duration_beats
    }
}

/// Generate a melody for `bars` bars in the given genre, key and scale.
///
/// The phrase always closes on the scale root an octave up, and same-pitch
/// overlaps are trimmed so a pitch never retriggers before it has finished.
/// Output is sorted by start beat.
pub fn generate_melody<R: Rng>(
    genre: Genre,
    key: Key,
    scale: Scale,
    bars: u32,
    rng: &mut R,
) -> Vec<Note> {
    let dna = genre.profile().melody;
    let root = key.root_pitch();
    let pool = scale.pitch_pool(root, 3);
    let pool_max = pool.last().copied().unwrap_or(root);
    let total_beats = (bars * 4) as f64;

    let note_count = rng.gen_range(dna.note_count.0..=dna.note_count.1) as usize;
    let indices = build_contour(dna.contour, note_count, pool.len(), rng);

    let mut notes: Vec<Note> = Vec::new();
    let mut beat = 0.0_f64;

    for mut idx in indices {
        if beat >= total_beats - CADENCE_RESERVE {
            break;
        }

        // Occasionally collapse to the previous pitch
        if let Some(last) = notes.last() {
            if rng.gen_bool(dna.repeat_note_chance) {
                if let Some(pos) = pool.iter().position(|&p| p == last.pitch) {
                    idx = pos;
                }
            }
        }

        let mut pitch = pool[idx % pool.len()];
        if rng.gen_bool(dna.octave_up_chance) {
            pitch = (pitch + 12).min(pool_max);
        }

        let duration = if rng.gen_bool(dna.long_note_chance) {
            weighted_choice(rng, &[1.0, 1.5, 2.0], &[40, 35, 25])
        } else {
            weighted_choice(rng, dna.duration_pool, dna.duration_weights)
        };
        // Clip so the note stays inside the grid with room for the cadence
        let duration = duration.min(total_beats - CADENCE_RESERVE - beat);
        if duration <= 0.0 {
            break;
        }

        notes.push(Note {
            start_beat: round3(beat),
            pitch,
            duration_beats: round3(duration),
            velocity: beat_velocity(beat, rng),
        });
        beat += duration;

        // Rest gap between phrases
        if rng.gen_bool(dna.rest_chance) {
            let gap = weighted_choice(rng, &[0.25, 0.5], &[70, 30]);
            if beat + gap > total_beats - CADENCE_RESERVE {
                break;
            }
            beat += gap;
        }
    }

    // Cadential closure is mandatory: fill the remainder with the root an
    // octave up
    notes.push(Note {
        start_beat: round3(beat),
        pitch: root + 12,
        duration_beats: round3(total_beats - beat),
        velocity: 100,
    });

    notes.sort_by(|a, b| {
        a.start_beat
            .partial_cmp(&b.start_beat)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    trim_overlaps(&mut notes);
    notes
}

/// Build a sequence of pool indices shaped by the contour direction
fn build_contour<R: Rng>(contour: Contour, length: usize, pool_len: usize, rng: &mut R) -> Vec<usize> {
    let clamp = |v: i32| v.clamp(0, pool_len as i32 - 1) as usize;
    let mid = (pool_len / 2) as i32;
    let high = (pool_len as i32 - 2).max(mid);
    let low = 0;

    let (start, end) = match contour {
        Contour::Descending => (rng.gen_range(mid..=high), rng.gen_range(low..mid)),
        Contour::Rising => (rng.gen_range(low..mid), rng.gen_range(mid..=high)),
        Contour::Flat => (mid, mid),
        Contour::Arch => {
            // Linear rise to a random peak, then linear fall, with light noise
            let peak = rng.gen_range(mid..=high);
            let half = length / 2;
            let mut seq = Vec::with_capacity(length);
            for i in 0..half {
                let t = i as f64 / (half.max(2) - 1) as f64;
                seq.push((peak as f64 * t) as i32);
            }
            for i in 0..length - half {
                let t = i as f64 / ((length - half).max(2) - 1) as f64;
                seq.push((peak as f64 * (1.0 - t)) as i32);
            }
            return seq
                .into_iter()
                .map(|v| clamp(v + rng.gen_range(-1..=1)))
                .collect();
        }
    };

    // Linear progression with noise
    (0..length)
        .map(|i| {
            let t = i as f64 / (length.max(2) - 1) as f64;
            let v = start as f64 + (end - start) as f64 * t;
            clamp(v as i32 + rng.gen_range(-2..=2))
        })
        .collect()
}

/// Velocity band keyed by position within the bar: strong on beats 1 and 3,
/// medium on 2 and 4, softer on subdivisions. Sampling inside the band is
/// the humanizing jitter.
fn beat_velocity<R: Rng>(beat: f64, rng: &mut R) -> u8 {
    let pos = beat % 4.0;
    if pos == 0.0 || pos == 2.0 {
        rng.gen_range(88..=100)
    } else if pos == 1.0 || pos == 3.0 {
        rng.gen_range(78..=92)
    } else {
        rng.gen_range(65..=82)
    }
}

/// Shorten any note whose pitch retriggers before it has finished, so the
/// earlier note ends exactly at the later note's start
fn trim_overlaps(notes: &mut [Note]) {
    use std::collections::HashMap;

    let mut last_index: HashMap<u8, usize> = HashMap::new();
    for i in 0..notes.len() {
        let (start, pitch) = (notes[i].start_beat, notes[i].pitch);
        if let Some(&prev) = last_index.get(&pitch) {
            if notes[prev].end_beat() > start {
                notes[prev].duration_beats = round3(start - notes[prev].start_beat);
            }
        }
        last_index.insert(pitch, i);
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_melody_stays_inside_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        for bars in [4u32, 8] {
            for genre in Genre::all() {
                let d = genre.defaults();
                let notes = generate_melody(genre, d.key, d.scale, bars, &mut rng);
                let total = (bars * 4) as f64;
                assert!(!notes.is_empty());
                for note in &notes {
                    assert!(note.duration_beats > 0.0);
                    assert!(
                        note.end_beat() <= total + 1e-9,
                        "{} note ends at {} past {}",
                        genre.as_str(),
                        note.end_beat(),
                        total
                    );
                }
            }
        }
    }

    #[test]
    fn test_cadence_on_root_octave_up() {
        let mut rng = ChaCha8Rng::seed_from_u64(43);
        for _ in 0..25 {
            let notes = generate_melody(Genre::Trap, Key::F, Scale::Minor, 4, &mut rng);
            let last = notes.last().unwrap();
            assert_eq!(last.pitch % 12, Key::F.root_pitch() % 12);
            assert_eq!(last.pitch, Key::F.root_pitch() + 12);
        }
    }

    #[test]
    fn test_rnb_dorian_pitches_stay_in_scale() {
        // A# dorian pitch-class set: {A#, C, C#, D#, F, G, G#}
        let classes: Vec<u8> = Scale::Dorian
            .intervals()
            .iter()
            .map(|i| (Key::ASharp.semitone() + i) % 12)
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(47);
        for _ in 0..25 {
            let notes = generate_melody(Genre::Rnb, Key::ASharp, Scale::Dorian, 4, &mut rng);
            for note in &notes {
                assert!(
                    classes.contains(&(note.pitch % 12)),
                    "pitch {} outside A# dorian",
                    note.pitch
                );
            }
        }
    }

    #[test]
    fn test_no_same_pitch_overlaps() {
        let mut rng = ChaCha8Rng::seed_from_u64(53);
        for _ in 0..50 {
            let notes = generate_melody(Genre::Drill, Key::GSharp, Scale::Minor, 4, &mut rng);
            for (i, a) in notes.iter().enumerate() {
                for b in notes.iter().skip(i + 1) {
                    if a.pitch == b.pitch && a.start_beat < b.start_beat {
                        assert!(
                            a.end_beat() <= b.start_beat + 1e-9,
                            "pitch {} at {} overlaps retrigger at {}",
                            a.pitch,
                            a.start_beat,
                            b.start_beat
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_output_sorted_by_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(59);
        let notes = generate_melody(Genre::Melodic, Key::CSharp, Scale::Minor, 8, &mut rng);
        assert!(notes.windows(2).all(|w| w[0].start_beat <= w[1].start_beat));
    }

    #[test]
    fn test_contour_indices_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(61);
        for contour in [
            Contour::Descending,
            Contour::Rising,
            Contour::Arch,
            Contour::Flat,
        ] {
            for length in [1usize, 2, 7, 16] {
                let indices = build_contour(contour, length, 21, &mut rng);
                assert_eq!(indices.len(), length);
                assert!(indices.iter().all(|&i| i < 21));
            }
        }
    }

    #[test]
    fn test_descending_contour_trends_down() {
        let mut rng = ChaCha8Rng::seed_from_u64(67);
        let indices = build_contour(Contour::Descending, 12, 21, &mut rng);
        // Starts in the upper half, ends in the lower half (noise is +/-2)
        assert!(indices[0] >= 8);
        assert!(indices[11] <= 11);
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let mut a = ChaCha8Rng::seed_from_u64(101);
        let mut b = ChaCha8Rng::seed_from_u64(101);
        assert_eq!(
            generate_melody(Genre::Rnb, Key::ASharp, Scale::Dorian, 4, &mut a),
            generate_melody(Genre::Rnb, Key::ASharp, Scale::Dorian, 4, &mut b)
        );
    }
}
