// Content fingerprinting - hash over timing, pitch and duration
// Velocity is deliberately excluded so dynamics tweaks do not defeat dedup

use sha2::{Digest, Sha256};

/// Length of the hex fingerprint kept in the catalog. 16 hex chars (64
/// bits) is plenty for collision resistance at catalog scale.
const FINGERPRINT_LEN: usize = 16;

/// Compute the content fingerprint for a pattern.
///
/// Events are (start_beat, pitch, duration_beats) triples. They are
/// rounded to 3 decimals and sorted before hashing so float noise and
/// event ordering never change the result.
pub fn fingerprint(events: &[(f64, u8, f64)]) -> String {
    let mut canonical: Vec<(i64, u8, i64)> = events
        .iter()
        .map(|&(start, pitch, duration)| (round3(start), pitch, round3(duration)))
        .collect();
    canonical.sort();

    let mut hasher = Sha256::new();
    for (start, pitch, duration) in &canonical {
        hasher.update(format!("{}:{}:{};", start, pitch, duration).as_bytes());
    }

    let hash = hex::encode(hasher.finalize());
    hash[..FINGERPRINT_LEN].to_string()
}

/// Round a beat value to 3 decimals, kept as integer thousandths so the
/// canonical form is exactly comparable
fn round3(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        let events = vec![(0.0, 60, 1.0), (1.0, 63, 0.5)];
        assert_eq!(fingerprint(&events), fingerprint(&events));
        assert_eq!(fingerprint(&events).len(), FINGERPRINT_LEN);
    }

    #[test]
    fn test_fingerprint_ignores_event_order() {
        let a = vec![(0.0, 60, 1.0), (1.0, 63, 0.5)];
        let b = vec![(1.0, 63, 0.5), (0.0, 60, 1.0)];
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_ignores_float_noise() {
        let a = vec![(0.5, 60, 1.0)];
        let b = vec![(0.5000001, 60, 0.9999999)];
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_differs_on_pitch_and_timing() {
        let base = vec![(0.0, 60, 1.0)];
        assert_ne!(fingerprint(&base), fingerprint(&[(0.0, 61, 1.0)]));
        assert_ne!(fingerprint(&base), fingerprint(&[(0.25, 60, 1.0)]));
        assert_ne!(fingerprint(&base), fingerprint(&[(0.0, 60, 0.5)]));
    }

    #[test]
    fn test_empty_pattern_has_a_fingerprint() {
        assert_eq!(fingerprint(&[]).len(), FINGERPRINT_LEN);
    }
}
