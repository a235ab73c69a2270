// MIDI Serialization - Convert generated patterns to MIDI files using midly crate
// Produces DAW-friendly single-track files with tempo and time signature metadata

use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use thiserror::Error;

use crate::generator::drums::{Hit, STEPS_PER_BAR};
use crate::generator::melody::Note;
use crate::generator::HIT_LENGTH_BEATS;

/// Pulses per quarter note. 480 gives clean ticks for 16th grids and
/// dotted durations alike.
pub const PPQ: u16 = 480;

/// Channel 10 (0-indexed 9) is the General MIDI drum channel
pub const DRUM_CHANNEL: u8 = 9;

/// Melodic content goes out on channel 1 (0-indexed 0)
pub const MELODY_CHANNEL: u8 = 0;

/// Errors that can occur during MIDI serialization
#[derive(Debug, Error)]
pub enum MidiError {
    #[error("midi write failed: {0}")]
    Write(String),

    #[error("pattern is empty, nothing to serialize")]
    EmptyPattern,
}

/// Serialize a drum pattern to MIDI file bytes.
///
/// `tag` is embedded as the track name so the file stays identifiable
/// after it has been dragged into a DAW.
pub fn render_drum_midi(hits: &[Hit], bpm: u16, tag: &str) -> Result<Vec<u8>, MidiError> {
    if hits.is_empty() {
        return Err(MidiError::EmptyPattern);
    }

    let mut events: Vec<(u32, TrackEventKind)> = Vec::new();
    let steps_per_beat = STEPS_PER_BAR / 4;

    for hit in hits {
        let beat = hit.step as f64 / steps_per_beat as f64;
        let tick_on = beat_to_tick(beat);
        let tick_off = beat_to_tick(beat + HIT_LENGTH_BEATS);

        events.push((
            tick_on,
            TrackEventKind::Midi {
                channel: DRUM_CHANNEL.into(),
                message: MidiMessage::NoteOn {
                    key: hit.instrument.gm_note().into(),
                    vel: hit.velocity.into(),
                },
            },
        ));
        events.push((
            tick_off,
            TrackEventKind::Midi {
                channel: DRUM_CHANNEL.into(),
                message: MidiMessage::NoteOff {
                    key: hit.instrument.gm_note().into(),
                    vel: 0.into(),
                },
            },
        ));
    }

    write_single_track(events, bpm, tag)
}

/// Serialize a melodic pattern to MIDI file bytes.
pub fn render_melody_midi(
    notes: &[Note],
    bpm: u16,
    channel: u8,
    tag: &str,
) -> Result<Vec<u8>, MidiError> {
    if notes.is_empty() {
        return Err(MidiError::EmptyPattern);
    }

    let mut events: Vec<(u32, TrackEventKind)> = Vec::new();

    for note in notes {
        let tick_on = beat_to_tick(note.start_beat);
        let tick_off = beat_to_tick(note.end_beat());

        events.push((
            tick_on,
            TrackEventKind::Midi {
                channel: channel.into(),
                message: MidiMessage::NoteOn {
                    key: note.pitch.into(),
                    vel: note.velocity.into(),
                },
            },
        ));
        events.push((
            tick_off,
            TrackEventKind::Midi {
                channel: channel.into(),
                message: MidiMessage::NoteOff {
                    key: note.pitch.into(),
                    vel: 0.into(),
                },
            },
        ));
    }

    write_single_track(events, bpm, tag)
}

/// Build a single-track SMF from absolute-tick events and write it to bytes
fn write_single_track(
    mut events: Vec<(u32, TrackEventKind)>,
    bpm: u16,
    tag: &str,
) -> Result<Vec<u8>, MidiError> {
    let header = Header {
        format: Format::SingleTrack,
        timing: Timing::Metrical(PPQ.into()),
    };

    let mut track = Track::new();

    track.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(tag.as_bytes())),
    });

    // Microseconds per quarter note
    let us_per_quarter = 60_000_000 / u32::from(bpm.max(1));
    track.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(us_per_quarter.into())),
    });

    // 4/4: denominator as power of two, 24 MIDI clocks per click,
    // 8 thirty-second notes per quarter
    track.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, 24, 8)),
    });

    // Note-offs before note-ons at the same tick so retriggered pitches
    // do not cancel themselves
    events.sort_by_key(|(tick, kind)| (*tick, midi_order(kind)));

    let mut last_tick = 0;
    for (tick, kind) in events {
        let delta = tick.saturating_sub(last_tick);
        track.push(TrackEvent {
            delta: delta.into(),
            kind,
        });
        last_tick = tick;
    }

    track.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let smf = Smf {
        header,
        tracks: vec![track],
    };

    let mut bytes = Vec::new();
    smf.write(&mut bytes)
        .map_err(|e| MidiError::Write(e.to_string()))?;
    Ok(bytes)
}

fn beat_to_tick(beat: f64) -> u32 {
    (beat * PPQ as f64).round() as u32
}

fn midi_order(kind: &TrackEventKind) -> u8 {
    match kind {
        TrackEventKind::Midi {
            message: MidiMessage::NoteOff { .. },
            ..
        } => 0,
        _ => 1,
    }
}
