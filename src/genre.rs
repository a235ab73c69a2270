// Genre DNA - per-genre probability and parameter profiles
// Drives the randomized drum and melody generators

use serde::{Deserialize, Serialize};

use crate::theory::{Key, Scale};

/// Supported genres - a closed set; unknown input falls back to trap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Trap,
    Drill,
    HipHop,
    Rnb,
    Melodic,
}

impl Genre {
    /// Convert from string representation. Unknown genres default to trap.
    pub fn from_string(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "trap" => Genre::Trap,
            "drill" => Genre::Drill,
            "hip hop" | "hiphop" | "hip-hop" | "boom bap" => Genre::HipHop,
            "rnb" | "r&b" => Genre::Rnb,
            "melodic" | "melodic trap" => Genre::Melodic,
            _ => Genre::Trap, // Default
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Trap => "trap",
            Genre::Drill => "drill",
            Genre::HipHop => "hip hop",
            Genre::Rnb => "rnb",
            Genre::Melodic => "melodic",
        }
    }

    /// All genres in menu order
    pub fn all() -> [Genre; 5] {
        [
            Genre::Trap,
            Genre::Drill,
            Genre::HipHop,
            Genre::Rnb,
            Genre::Melodic,
        ]
    }

    /// Session defaults for this genre (key, scale, tempo, swing)
    pub fn defaults(&self) -> GenreDefaults {
        match self {
            Genre::Trap => GenreDefaults {
                key: Key::F,
                scale: Scale::Minor,
                bpm: 140,
                swing: 0,
            },
            Genre::Drill => GenreDefaults {
                key: Key::GSharp,
                scale: Scale::Minor,
                bpm: 144,
                swing: 0,
            },
            Genre::HipHop => GenreDefaults {
                key: Key::A,
                scale: Scale::MinorPent,
                bpm: 90,
                swing: 12,
            },
            Genre::Rnb => GenreDefaults {
                key: Key::ASharp,
                scale: Scale::Dorian,
                bpm: 85,
                swing: 8,
            },
            Genre::Melodic => GenreDefaults {
                key: Key::CSharp,
                scale: Scale::Minor,
                bpm: 140,
                swing: 0,
            },
        }
    }

    /// The full generation profile (drum + melody DNA) for this genre
    pub fn profile(&self) -> GenreProfile {
        match self {
            Genre::Trap => GenreProfile {
                drums: DrumDna {
                    kick: KickRules {
                        mandatory: &[0, 8],
                        variable: &[2, 3, 10, 11, 13, 14, 15],
                        variable_count: (2, 4),
                        velocity_main: (100, 115),
                        velocity_var: (65, 90),
                    },
                    snare: SnareRules {
                        mandatory: &[4, 12],
                        clap_stack: true,
                        ghost_chance: 0.40,
                        ghost_steps: &[2, 6, 10, 14, 15],
                        velocity_main: (95, 105),
                        velocity_ghost: (28, 45),
                    },
                    hihat: HatRules {
                        pattern: HatPattern::SixteenthRolling,
                        open_steps: &[5, 13],
                        open_chance: 0.70,
                        accent_steps: &[0, 4, 8, 12],
                        velocity_accent: (95, 110),
                        velocity_normal: (55, 85),
                    },
                    accent: None,
                },
                melody: MelodyDna {
                    note_count: (7, 12),
                    duration_pool: &[0.25, 0.5, 0.75, 1.0, 1.5, 2.0],
                    duration_weights: &[10, 25, 15, 25, 15, 10],
                    rest_chance: 0.25,
                    contour: Contour::Descending,
                    repeat_note_chance: 0.20,
                    long_note_chance: 0.30,
                    octave_up_chance: 0.30,
                },
            },

            Genre::Drill => GenreProfile {
                drums: DrumDna {
                    kick: KickRules {
                        mandatory: &[0],
                        variable: &[2, 3, 5, 6, 8, 9, 10, 11, 13, 14, 15],
                        variable_count: (4, 7),
                        velocity_main: (105, 115),
                        velocity_var: (55, 80),
                    },
                    snare: SnareRules {
                        mandatory: &[4, 12],
                        clap_stack: false,
                        ghost_chance: 0.20,
                        ghost_steps: &[6, 14],
                        velocity_main: (90, 100),
                        velocity_ghost: (30, 45),
                    },
                    hihat: HatRules {
                        pattern: HatPattern::SixteenthSliding,
                        open_steps: &[3, 7, 11, 15],
                        open_chance: 0.80,
                        accent_steps: &[0, 8],
                        velocity_accent: (100, 110),
                        velocity_normal: (45, 70),
                    },
                    accent: None,
                },
                melody: MelodyDna {
                    note_count: (10, 16),
                    duration_pool: &[0.25, 0.25, 0.5, 0.75],
                    duration_weights: &[30, 30, 25, 15],
                    rest_chance: 0.15,
                    contour: Contour::Flat,
                    repeat_note_chance: 0.35,
                    long_note_chance: 0.10,
                    octave_up_chance: 0.50,
                },
            },

            Genre::HipHop => GenreProfile {
                drums: DrumDna {
                    kick: KickRules {
                        mandatory: &[0],
                        variable: &[2, 3, 8, 10, 11, 14],
                        variable_count: (2, 3),
                        velocity_main: (100, 115),
                        velocity_var: (70, 90),
                    },
                    snare: SnareRules {
                        mandatory: &[4, 12],
                        clap_stack: false,
                        ghost_chance: 0.55,
                        ghost_steps: &[1, 3, 6, 9, 14, 15],
                        velocity_main: (95, 110),
                        velocity_ghost: (32, 50),
                    },
                    hihat: HatRules {
                        pattern: HatPattern::EighthSwing,
                        open_steps: &[6, 14],
                        open_chance: 0.65,
                        accent_steps: &[0, 4, 8, 12],
                        velocity_accent: (85, 95),
                        velocity_normal: (55, 75),
                    },
                    accent: Some(AccentLayer {
                        instrument: crate::generator::Instrument::Rim,
                        chance: 0.50,
                        steps: &[2, 6, 10, 14],
                        velocity: (35, 50),
                    }),
                },
                melody: MelodyDna {
                    note_count: (8, 12),
                    duration_pool: &[0.5, 0.75, 1.0, 1.5],
                    duration_weights: &[20, 25, 35, 20],
                    rest_chance: 0.20,
                    contour: Contour::Arch,
                    repeat_note_chance: 0.15,
                    long_note_chance: 0.30,
                    octave_up_chance: 0.25,
                },
            },

            Genre::Rnb => GenreProfile {
                drums: DrumDna {
                    kick: KickRules {
                        mandatory: &[0],
                        variable: &[3, 5, 8, 10, 11],
                        variable_count: (1, 3),
                        velocity_main: (88, 100),
                        velocity_var: (55, 75),
                    },
                    snare: SnareRules {
                        mandatory: &[4, 12],
                        clap_stack: false,
                        ghost_chance: 0.30,
                        ghost_steps: &[3, 7, 11, 15],
                        velocity_main: (80, 95),
                        velocity_ghost: (28, 42),
                    },
                    hihat: HatRules {
                        pattern: HatPattern::Sparse,
                        open_steps: &[6, 14],
                        open_chance: 0.60,
                        accent_steps: &[0, 8],
                        velocity_accent: (70, 82),
                        velocity_normal: (50, 68),
                    },
                    accent: Some(AccentLayer {
                        instrument: crate::generator::Instrument::Shaker,
                        chance: 0.60,
                        steps: &[2, 6, 10, 14],
                        velocity: (42, 58),
                    }),
                },
                melody: MelodyDna {
                    note_count: (6, 10),
                    duration_pool: &[0.5, 0.75, 1.0, 1.5, 2.0],
                    duration_weights: &[15, 20, 30, 25, 10],
                    rest_chance: 0.30,
                    contour: Contour::Arch,
                    repeat_note_chance: 0.10,
                    long_note_chance: 0.40,
                    octave_up_chance: 0.20,
                },
            },

            Genre::Melodic => GenreProfile {
                drums: DrumDna {
                    kick: KickRules {
                        mandatory: &[0, 8],
                        variable: &[3, 5, 7, 11, 13, 15],
                        variable_count: (2, 3),
                        velocity_main: (100, 112),
                        velocity_var: (60, 80),
                    },
                    snare: SnareRules {
                        mandatory: &[4, 12],
                        clap_stack: true,
                        ghost_chance: 0.35,
                        ghost_steps: &[2, 6, 10, 14, 15],
                        velocity_main: (90, 102),
                        velocity_ghost: (30, 45),
                    },
                    hihat: HatRules {
                        pattern: HatPattern::EighthOpen,
                        open_steps: &[2, 6, 10, 14],
                        open_chance: 0.75,
                        accent_steps: &[0, 4, 8, 12],
                        velocity_accent: (82, 95),
                        velocity_normal: (55, 75),
                    },
                    accent: None,
                },
                melody: MelodyDna {
                    note_count: (8, 14),
                    duration_pool: &[0.25, 0.5, 0.75, 1.0, 1.5, 2.0],
                    duration_weights: &[10, 20, 20, 25, 15, 10],
                    rest_chance: 0.20,
                    contour: Contour::Rising,
                    repeat_note_chance: 0.10,
                    long_note_chance: 0.35,
                    octave_up_chance: 0.40,
                },
            },
        }
    }
}

/// Default session parameters for a genre
#[derive(Debug, Clone, Copy)]
pub struct GenreDefaults {
    pub key: Key,
    pub scale: Scale,
    pub bpm: u16,
    pub swing: u8,
}

/// Full genre profile - drum and melody DNA together
#[derive(Debug, Clone)]
pub struct GenreProfile {
    pub drums: DrumDna,
    pub melody: MelodyDna,
}

/// Drum generation rules for one genre
#[derive(Debug, Clone)]
pub struct DrumDna {
    pub kick: KickRules,
    pub snare: SnareRules,
    pub hihat: HatRules,

    /// Optional genre-specific accent layer (rim, shaker)
    pub accent: Option<AccentLayer>,
}

/// Kick placement rules on the 16-step grid
#[derive(Debug, Clone)]
pub struct KickRules {
    /// Steps that always get a kick
    pub mandatory: &'static [u32],

    /// Candidate pool for randomly placed kicks
    pub variable: &'static [u32],

    /// (min, max) number of variable kicks per bar
    pub variable_count: (u32, u32),

    /// Velocity range for mandatory kicks
    pub velocity_main: (u8, u8),

    /// Velocity range for variable kicks
    pub velocity_var: (u8, u8),
}

/// Snare and ghost-note rules
#[derive(Debug, Clone)]
pub struct SnareRules {
    pub mandatory: &'static [u32],

    /// Stack a clap on every mandatory snare
    pub clap_stack: bool,

    /// Probability of adding ghost notes in a bar
    pub ghost_chance: f64,

    pub ghost_steps: &'static [u32],
    pub velocity_main: (u8, u8),
    pub velocity_ghost: (u8, u8),
}

/// Hi-hat pattern rules
#[derive(Debug, Clone)]
pub struct HatRules {
    pub pattern: HatPattern,

    /// Steps eligible for promotion to an open hat
    pub open_steps: &'static [u32],

    /// Probability an eligible step becomes an open hat
    pub open_chance: f64,

    /// Steps that get the accent velocity range
    pub accent_steps: &'static [u32],

    pub velocity_accent: (u8, u8),
    pub velocity_normal: (u8, u8),
}

/// Named hi-hat pattern shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatPattern {
    /// Every 16th step - rolling trap hats
    SixteenthRolling,

    /// Every 16th step - drill slide feel comes from velocity
    SixteenthSliding,

    /// 8th-note grid plus a few random offbeat 16ths
    EighthSwing,

    /// Plain 8th-note grid with open-hat color
    EighthOpen,

    /// Accent steps plus a small random fill
    Sparse,
}

/// Extra percussion layer gated by a per-bar probability
#[derive(Debug, Clone)]
pub struct AccentLayer {
    pub instrument: crate::generator::Instrument,
    pub chance: f64,
    pub steps: &'static [u32],
    pub velocity: (u8, u8),
}

/// Melody generation rules for one genre
#[derive(Debug, Clone)]
pub struct MelodyDna {
    /// (min, max) notes to aim for per 4 bars
    pub note_count: (u32, u32),

    /// Candidate note durations in beats
    pub duration_pool: &'static [f64],

    /// Relative weights for the duration pool
    pub duration_weights: &'static [u32],

    /// Probability of a rest gap after a note
    pub rest_chance: f64,

    /// Overall melodic shape
    pub contour: Contour,

    /// Probability of repeating the previous pitch
    pub repeat_note_chance: f64,

    /// Probability of picking a long note (1.0/1.5/2.0 beats)
    pub long_note_chance: f64,

    /// Probability of promoting a note one octave up
    pub octave_up_chance: f64,
}

/// Melodic contour shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contour {
    /// Start high, end low
    Descending,

    /// Start low, end high
    Rising,

    /// Rise to a peak, then fall
    Arch,

    /// Hover around the middle of the pool
    Flat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_from_string() {
        assert_eq!(Genre::from_string("trap"), Genre::Trap);
        assert_eq!(Genre::from_string("Hip Hop"), Genre::HipHop);
        assert_eq!(Genre::from_string("r&b"), Genre::Rnb);
        // Unknown genres fall back to trap
        assert_eq!(Genre::from_string("polka"), Genre::Trap);
        assert_eq!(Genre::from_string(""), Genre::Trap);
    }

    #[test]
    fn test_genre_defaults() {
        let d = Genre::Rnb.defaults();
        assert_eq!(d.key, Key::ASharp);
        assert_eq!(d.scale, Scale::Dorian);
        assert_eq!(d.bpm, 85);
        assert_eq!(d.swing, 8);

        assert_eq!(Genre::Trap.defaults().bpm, 140);
        assert_eq!(Genre::Drill.defaults().bpm, 144);
    }

    #[test]
    fn test_trap_profile_numbers() {
        let p = Genre::Trap.profile();
        assert_eq!(p.drums.kick.mandatory, &[0, 8]);
        assert_eq!(p.drums.kick.velocity_main, (100, 115));
        assert_eq!(p.drums.snare.mandatory, &[4, 12]);
        assert!(p.drums.snare.clap_stack);
        assert_eq!(p.drums.hihat.pattern, HatPattern::SixteenthRolling);
        assert_eq!(p.melody.contour, Contour::Descending);
    }

    #[test]
    fn test_accent_layers() {
        assert!(Genre::HipHop.profile().drums.accent.is_some());
        assert!(Genre::Rnb.profile().drums.accent.is_some());
        assert!(Genre::Trap.profile().drums.accent.is_none());
        assert!(Genre::Drill.profile().drums.accent.is_none());
    }

    #[test]
    fn test_duration_tables_consistent() {
        for genre in Genre::all() {
            let m = genre.profile().melody;
            assert_eq!(
                m.duration_pool.len(),
                m.duration_weights.len(),
                "{} duration pool/weights mismatch",
                genre.as_str()
            );
            assert!(m.note_count.0 <= m.note_count.1);
        }
    }
}
