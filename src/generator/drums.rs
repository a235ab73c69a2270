// Drum pattern generator
// Genre DNA + randomness on a 16-steps-per-bar grid

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{velocity_in, Instrument};
use crate::genre::{AccentLayer, Genre, HatPattern, HatRules, KickRules, SnareRules};

/// Number of 16th-note steps in one bar of 4/4
pub const STEPS_PER_BAR: u32 = 16;

/// One drum event on the step grid
///
/// Multiple hits may share a step (layered instruments). Immutable once
/// produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// Position on the 16-steps-per-bar grid, across all bars
    pub step: u32,

    pub instrument: Instrument,

    /// MIDI velocity (1-127)
    pub velocity: u8,
}

/// Generate a drum pattern for `bars` bars of the given genre.
///
/// Returns hits sorted by step ascending (ties unordered).
pub fn generate_drums<R: Rng>(genre: Genre, bars: u32, rng: &mut R) -> Vec<Hit> {
    let dna = genre.profile().drums;
    let mut hits = Vec::new();

    for bar in 0..bars {
        let offset = bar * STEPS_PER_BAR;
        gen_kick(&dna.kick, offset, bar, rng, &mut hits);
        gen_snare(&dna.snare, offset, rng, &mut hits);
        gen_hihat(&dna.hihat, offset, rng, &mut hits);

        if let Some(layer) = &dna.accent {
            if rng.gen_bool(layer.chance) {
                gen_accent(layer, offset, rng, &mut hits);
            }
        }
    }

    hits.sort_by_key(|h| h.step);
    hits
}

fn gen_kick<R: Rng>(cfg: &KickRules, offset: u32, bar: u32, rng: &mut R, out: &mut Vec<Hit>) {
    for &step in cfg.mandatory {
        out.push(Hit {
            step: step + offset,
            instrument: Instrument::Kick,
            velocity: velocity_in(rng, cfg.velocity_main),
        });
    }

    // Variable placements - bar 2 gets a trimmed pool for variation
    let mut pool: Vec<u32> = cfg.variable.to_vec();
    if bar == 1 {
        pool.retain(|s| !matches!(*s, 1 | 9));
    }

    let count = rng.gen_range(cfg.variable_count.0..=cfg.variable_count.1) as usize;
    let chosen: Vec<u32> = pool
        .choose_multiple(rng, count.min(pool.len()))
        .copied()
        .collect();
    for step in chosen {
        out.push(Hit {
            step: step + offset,
            instrument: Instrument::Kick,
            velocity: velocity_in(rng, cfg.velocity_var),
        });
    }
}

fn gen_snare<R: Rng>(cfg: &SnareRules, offset: u32, rng: &mut R, out: &mut Vec<Hit>) {
    for &step in cfg.mandatory {
        let vel = velocity_in(rng, cfg.velocity_main);
        out.push(Hit {
            step: step + offset,
            instrument: Instrument::Snare,
            velocity: vel,
        });
        if cfg.clap_stack {
            // Clap sits just under the snare it stacks on
            let clap_vel = vel.saturating_sub(rng.gen_range(5..=12)).max(70);
            out.push(Hit {
                step: step + offset,
                instrument: Instrument::Clap,
                velocity: clap_vel,
            });
        }
    }

    if rng.gen_bool(cfg.ghost_chance) {
        let pool: Vec<u32> = cfg
            .ghost_steps
            .iter()
            .copied()
            .filter(|s| !cfg.mandatory.contains(s))
            .collect();
        if !pool.is_empty() {
            let count = rng.gen_range(1..=3usize.min(pool.len()));
            for &step in pool.choose_multiple(rng, count) {
                out.push(Hit {
                    step: step + offset,
                    instrument: Instrument::Ghost,
                    velocity: velocity_in(rng, cfg.velocity_ghost),
                });
            }
        }
    }
}

fn gen_hihat<R: Rng>(cfg: &HatRules, offset: u32, rng: &mut R, out: &mut Vec<Hit>) {
    let mut steps: Vec<u32> = match cfg.pattern {
        HatPattern::SixteenthRolling | HatPattern::SixteenthSliding => (0..STEPS_PER_BAR).collect(),
        HatPattern::EighthSwing => {
            let mut steps: Vec<u32> = (0..STEPS_PER_BAR).step_by(2).collect();
            // Random offbeat 16ths give the swing feel
            let offbeats: Vec<u32> = (1..STEPS_PER_BAR).step_by(2).collect();
            let extra = rng.gen_range(2..=5usize);
            steps.extend(offbeats.choose_multiple(rng, extra).copied());
            steps
        }
        HatPattern::EighthOpen => (0..STEPS_PER_BAR).step_by(2).collect(),
        HatPattern::Sparse => {
            let mut steps: Vec<u32> = cfg.accent_steps.to_vec();
            let fill: Vec<u32> = (0..STEPS_PER_BAR)
                .filter(|s| !cfg.accent_steps.contains(s))
                .collect();
            let extra = rng.gen_range(2..=4usize);
            steps.extend(fill.choose_multiple(rng, extra).copied());
            steps
        }
    };
    steps.sort_unstable();
    steps.dedup();

    for step in steps {
        let is_open = cfg.open_steps.contains(&step) && rng.gen_bool(cfg.open_chance);
        let instrument = if is_open {
            Instrument::HihatOpen
        } else {
            Instrument::HihatClosed
        };

        let velocity = if cfg.accent_steps.contains(&step) {
            velocity_in(rng, cfg.velocity_accent)
        } else {
            // Humanizing jitter, floored so hats never disappear
            let base = velocity_in(rng, cfg.velocity_normal) as i16;
            let jitter = rng.gen_range(-8i16..=8);
            (base + jitter).max(35) as u8
        };

        out.push(Hit {
            step: step + offset,
            instrument,
            velocity,
        });
    }
}

fn gen_accent<R: Rng>(layer: &AccentLayer, offset: u32, rng: &mut R, out: &mut Vec<Hit>) {
    for &step in layer.steps {
        // Not every step fires - keeps the layer musical
        if rng.gen_bool(0.70) {
            out.push(Hit {
                step: step + offset,
                instrument: layer.instrument,
                velocity: velocity_in(rng, layer.velocity),
            });
        }
    }
}
