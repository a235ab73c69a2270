// Drum kit presets - authored two-bar grooves per genre on a 16th-note grid
// Fixed content (no randomness), so kits are not registered in the catalog

use super::drums::Hit;
use super::Instrument;
use crate::genre::Genre;

/// Every kit preset spans two bars
pub const KIT_BARS: u32 = 2;

/// (step, instrument, velocity) on the 32-step two-bar grid
type KitStep = (u32, Instrument, u8);

fn kit_steps(genre: Genre) -> &'static [KitStep] {
    use Instrument::*;
    match genre {
        // Hard kick, snare+clap stack on 2 and 4, rolling closed hats
        Genre::Trap => &[
            (0, Kick, 110),
            (2, Kick, 90),
            (4, Snare, 100),
            (4, Clap, 95),
            (8, Kick, 105),
            (10, Kick, 85),
            (11, Kick, 70),
            (12, Snare, 100),
            (12, Clap, 95),
            (14, Kick, 75),
            (0, HihatClosed, 90),
            (1, HihatClosed, 60),
            (2, HihatClosed, 80),
            (3, HihatClosed, 55),
            (4, HihatClosed, 70),
            (5, HihatClosed, 90),
            (6, HihatClosed, 60),
            (7, HihatClosed, 80),
            (8, HihatClosed, 90),
            (9, HihatClosed, 55),
            (10, HihatClosed, 70),
            (11, HihatClosed, 60),
            (12, HihatClosed, 80),
            (13, HihatClosed, 90),
            (14, HihatClosed, 60),
            (15, HihatClosed, 70),
            (5, HihatOpen, 75),
            (13, HihatOpen, 75),
            (16, Kick, 110),
            (18, Kick, 85),
            (20, Snare, 100),
            (20, Clap, 90),
            (23, Kick, 70),
            (24, Kick, 105),
            (26, Kick, 80),
            (27, Kick, 65),
            (28, Snare, 100),
            (28, Clap, 90),
            (30, Ghost, 35),
            (31, Kick, 60),
        ],
        // Syncopated kick, cold snare, hats sliding between closed and open
        Genre::Drill => &[
            (0, Kick, 110),
            (3, Kick, 80),
            (4, Snare, 95),
            (6, Kick, 75),
            (8, Kick, 105),
            (9, Kick, 70),
            (10, Kick, 60),
            (12, Snare, 95),
            (14, Kick, 80),
            (15, Kick, 65),
            (0, HihatClosed, 100),
            (1, HihatClosed, 50),
            (2, HihatClosed, 80),
            (3, HihatOpen, 65),
            (4, HihatClosed, 90),
            (5, HihatClosed, 55),
            (6, HihatClosed, 75),
            (7, HihatOpen, 60),
            (8, HihatClosed, 100),
            (9, HihatClosed, 50),
            (10, HihatClosed, 80),
            (11, HihatOpen, 65),
            (12, HihatClosed, 90),
            (13, HihatClosed, 55),
            (14, HihatClosed, 75),
            (15, HihatOpen, 70),
            (16, Kick, 110),
            (18, Kick, 75),
            (19, Kick, 55),
            (20, Snare, 95),
            (22, Kick, 80),
            (23, Kick, 60),
            (24, Kick, 100),
            (26, Kick, 70),
            (27, Kick, 50),
            (28, Snare, 95),
            (30, Kick, 75),
        ],
        // Boom bap: punchy kick, eighth-note hats, rim shot ghosts
        Genre::HipHop => &[
            (0, Kick, 110),
            (2, Kick, 85),
            (4, Snare, 100),
            (8, Kick, 105),
            (10, Kick, 70),
            (12, Snare, 100),
            (14, Kick, 65),
            (0, HihatClosed, 85),
            (2, HihatClosed, 65),
            (4, HihatClosed, 80),
            (6, HihatClosed, 60),
            (8, HihatClosed, 90),
            (10, HihatClosed, 65),
            (12, HihatClosed, 80),
            (14, HihatClosed, 55),
            (6, HihatOpen, 70),
            (14, HihatOpen, 70),
            (2, Rim, 40),
            (10, Rim, 35),
            (16, Kick, 110),
            (18, Kick, 80),
            (20, Snare, 105),
            (22, Kick, 60),
            (24, Kick, 100),
            (26, Kick, 75),
            (28, Snare, 105),
            (30, Ghost, 40),
            (31, Kick, 55),
        ],
        // Soft kick, snap instead of snare, sparse hats under a shaker layer
        Genre::Rnb => &[
            (0, Kick, 95),
            (3, Kick, 65),
            (4, Snap, 85),
            (6, Kick, 55),
            (8, Kick, 90),
            (10, Kick, 60),
            (12, Snap, 85),
            (14, Ghost, 30),
            (0, HihatClosed, 70),
            (4, HihatClosed, 65),
            (6, HihatClosed, 55),
            (8, HihatClosed, 75),
            (10, HihatClosed, 60),
            (12, HihatClosed, 65),
            (14, HihatOpen, 60),
            (2, Shaker, 50),
            (6, Shaker, 45),
            (10, Shaker, 50),
            (14, Shaker, 45),
            (16, Kick, 90),
            (19, Kick, 55),
            (20, Snap, 85),
            (22, Kick, 50),
            (24, Kick, 85),
            (27, Kick, 50),
            (28, Snap, 85),
            (30, Ghost, 35),
        ],
        // Punchy but airy, alternating closed and open hats
        Genre::Melodic => &[
            (0, Kick, 105),
            (3, Kick, 70),
            (4, Snare, 95),
            (4, Clap, 85),
            (7, Kick, 55),
            (8, Kick, 100),
            (11, Kick, 65),
            (12, Snare, 95),
            (12, Clap, 85),
            (14, Ghost, 35),
            (0, HihatClosed, 80),
            (2, HihatOpen, 65),
            (4, HihatClosed, 75),
            (6, HihatOpen, 60),
            (8, HihatClosed, 85),
            (10, HihatOpen, 65),
            (12, HihatClosed, 75),
            (14, HihatOpen, 60),
            (16, Kick, 105),
            (18, Kick, 70),
            (20, Snare, 95),
            (20, Clap, 85),
            (23, Kick, 55),
            (24, Kick, 100),
            (28, Snare, 95),
            (28, Clap, 85),
            (30, Ghost, 40),
            (31, Ghost, 30),
        ],
    }
}

/// The authored two-bar kit groove for a genre, sorted by step
pub fn kit_hits(genre: Genre) -> Vec<Hit> {
    let mut hits: Vec<Hit> = kit_steps(genre)
        .iter()
        .map(|&(step, instrument, velocity)| Hit {
            step,
            instrument,
            velocity,
        })
        .collect();
    hits.sort_by_key(|h| h.step);
    hits
}
