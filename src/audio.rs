//! Sound effect notifications
//!
//! The simulation never waits on audio. Each tick it queues [`SoundEffect`]s;
//! the driver forwards them over a bounded channel and drops any that do not
//! fit. Whatever sits on the other end implements [`AudioSink`].

use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};

use crate::sim::AsteroidKind;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Torpedo destroyed an asteroid of this kind
    AsteroidDestroyed(AsteroidKind),
    /// Target lock
    TargetAcquired,
    /// Ship hit an asteroid
    Collision,
    /// Torpedo launched
    TorpedoFired,
}

/// Parameters a synthesizer would need to voice an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCue {
    pub freq_hz: f32,
    pub duration_secs: f32,
    pub gain: f32,
}

impl SoundEffect {
    /// Procedural voicing: bigger rocks boom lower and longer
    pub fn cue(&self) -> ToneCue {
        match self {
            SoundEffect::AsteroidDestroyed(kind) => {
                let size = kind.ordinal() as f32;
                ToneCue {
                    freq_hz: 220.0 / (1.0 + size),
                    duration_secs: 0.3 + 0.15 * size,
                    gain: 0.8,
                }
            }
            SoundEffect::TargetAcquired => ToneCue {
                freq_hz: 880.0,
                duration_secs: 0.08,
                gain: 0.4,
            },
            SoundEffect::Collision => ToneCue {
                freq_hz: 60.0,
                duration_secs: 0.5,
                gain: 1.0,
            },
            SoundEffect::TorpedoFired => ToneCue {
                freq_hz: 520.0,
                duration_secs: 0.12,
                gain: 0.5,
            },
        }
    }
}

/// Something that can voice sound effects
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Sink that writes effects to the log instead of a device
#[derive(Debug)]
pub struct LoggingAudio {
    master_volume: f32,
    muted: bool,
    played: u64,
}

impl Default for LoggingAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingAudio {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Effects voiced so far
    pub fn played(&self) -> u64 {
        self.played
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }
}

impl AudioSink for LoggingAudio {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let cue = effect.cue();
        log::debug!(
            "sfx {:?}: {:.0} Hz for {:.2}s at {:.2}",
            effect,
            cue.freq_hz,
            cue.duration_secs,
            cue.gain * vol
        );
        self.played += 1;
    }
}

/// Fire-and-forget delivery. Returns how many effects were dropped because
/// the channel was full or closed.
pub fn forward(effects: impl IntoIterator<Item = SoundEffect>, tx: &Sender<SoundEffect>) -> usize {
    let mut dropped = 0;
    for effect in effects {
        match tx.try_send(effect) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => dropped += 1,
        }
    }
    dropped
}

/// Voice everything currently queued on `rx` without blocking
pub fn drain(rx: &Receiver<SoundEffect>, sink: &mut impl AudioSink) -> usize {
    let mut n = 0;
    while let Ok(effect) = rx.try_recv() {
        sink.play(effect);
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[derive(Default)]
    struct Recorder(Vec<SoundEffect>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.0.push(effect);
        }
    }

    #[test]
    fn test_forward_drops_when_full() {
        let (tx, rx) = bounded(2);
        let effects = [
            SoundEffect::TorpedoFired,
            SoundEffect::Collision,
            SoundEffect::TargetAcquired,
        ];
        assert_eq!(forward(effects, &tx), 1);

        let mut rec = Recorder::default();
        assert_eq!(drain(&rx, &mut rec), 2);
        assert_eq!(rec.0, vec![SoundEffect::TorpedoFired, SoundEffect::Collision]);
    }

    #[test]
    fn test_forward_to_closed_channel() {
        let (tx, rx) = bounded(4);
        drop(rx);
        assert_eq!(forward([SoundEffect::Collision], &tx), 1);
    }

    #[test]
    fn test_bigger_rocks_sound_lower() {
        let pebble = SoundEffect::AsteroidDestroyed(AsteroidKind::Pebble).cue();
        let giant = SoundEffect::AsteroidDestroyed(AsteroidKind::Giant).cue();
        assert!(giant.freq_hz < pebble.freq_hz);
        assert!(giant.duration_secs > pebble.duration_secs);
    }

    #[test]
    fn test_muted_sink_plays_nothing() {
        let mut sink = LoggingAudio::new();
        sink.set_muted(true);
        sink.play(SoundEffect::Collision);
        assert_eq!(sink.played(), 0);
        sink.set_muted(false);
        sink.play(SoundEffect::Collision);
        assert_eq!(sink.played(), 1);
    }
}
