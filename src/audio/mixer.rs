// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Mixing of active cues into output buffers.
//!
//! New cues arrive over a channel so the engine never contends with the audio
//! callback for a lock. The mixer retires finished or cancelled cues and
//! releases their playback channel back to the registry; the release is
//! id-guarded there, so a retire racing a newer reservation is harmless.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::audio::source::CueSource;
use crate::cues::channel::{ChannelRegistry, CueChannel};

/// A cue registered for playback.
pub struct RegisteredCue {
    /// Unique cue id, matching the registry entry.
    pub id: u64,
    /// The render source.
    pub source: CueSource,
    /// The playback channel to release when the cue ends, if any.
    pub channel: Option<CueChannel>,
}

/// Channel for adding cues to the mixer without lock contention.
pub type CueSender = Sender<RegisteredCue>;

/// Mixes all active cues into interleaved output buffers.
pub struct CueMixer {
    /// Incoming cues from the engine.
    pending: Receiver<RegisteredCue>,
    /// Cues currently producing audio.
    active: Vec<RegisteredCue>,
    /// Number of output channels.
    channel_count: u16,
    /// Output sample rate.
    sample_rate: u32,
    /// Registry to release playback channels into on natural end.
    registry: Arc<Mutex<ChannelRegistry>>,
}

impl CueMixer {
    /// Creates a new mixer reading cues from the given receiver.
    pub fn new(
        channel_count: u16,
        sample_rate: u32,
        registry: Arc<Mutex<ChannelRegistry>>,
        pending: Receiver<RegisteredCue>,
    ) -> CueMixer {
        CueMixer {
            pending,
            active: Vec::new(),
            channel_count,
            sample_rate,
            registry,
        }
    }

    /// Renders one interleaved buffer: accepts newly registered cues, mixes
    /// everything active, and retires cues that finished.
    pub fn process_into(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        while let Ok(cue) = self.pending.try_recv() {
            self.active.push(cue);
        }

        let out_channels = self.channel_count as usize;
        for cue in self.active.iter_mut() {
            cue.source.mix_into(out, out_channels);
        }

        let registry = &self.registry;
        self.active.retain(|cue| {
            if !cue.source.is_finished() {
                return true;
            }
            cue.source.handle().mark_finished();
            if let Some(channel) = cue.channel {
                registry.lock().release(channel, cue.id);
            }
            false
        });
    }

    /// Number of cues currently playing.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// The output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The number of output channels.
    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }
}

impl std::fmt::Debug for CueMixer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CueMixer")
            .field("active_cues", &self.active.len())
            .field("channel_count", &self.channel_count)
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio;
    use crate::cues::channel::ActiveCue;
    use crate::cues::loader::LoadedAsset;
    use crate::cues::modulation::Modulation;
    use crate::playsync::CueHandle;

    fn test_mixer(
        registry: Arc<Mutex<ChannelRegistry>>,
    ) -> (CueMixer, CueSender) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (CueMixer::new(1, 48000, registry, rx), tx)
    }

    fn cue(samples: Vec<f32>, gain: f32, channel: Option<CueChannel>) -> (RegisteredCue, CueHandle) {
        let asset = LoadedAsset::from_samples(samples, 1, 48000);
        let handle = CueHandle::new();
        let modulation = Modulation {
            pitch_cents: 0.0,
            gain,
            falloff: None,
        };
        let source = CueSource::new(&asset, &modulation, 48000, handle.clone());
        (
            RegisteredCue {
                id: audio::next_cue_id(),
                source,
                channel,
            },
            handle,
        )
    }

    #[test]
    fn test_mixes_concurrent_cues_additively() {
        let registry = Arc::new(Mutex::new(ChannelRegistry::new()));
        let (mut mixer, tx) = test_mixer(registry);

        let (a, _) = cue(vec![0.25; 32], 1.0, None);
        let (b, _) = cue(vec![0.5; 32], 1.0, None);
        tx.send(a).unwrap();
        tx.send(b).unwrap();

        let mut out = vec![0.0f32; 16];
        mixer.process_into(&mut out);
        assert_eq!(mixer.active_count(), 2);
        for sample in &out {
            assert!((sample - 0.75).abs() < 1e-6);
        }
    }

    #[test]
    fn test_retires_finished_cues_and_releases_channel() {
        let registry = Arc::new(Mutex::new(ChannelRegistry::new()));
        let (mut mixer, tx) = test_mixer(registry.clone());

        let (cue, handle) = cue(vec![0.5; 8], 1.0, Some(CueChannel::Voice));
        let id = cue.id;
        registry.lock().reserve(
            CueChannel::Voice,
            ActiveCue {
                id,
                handle: handle.clone(),
            },
        );
        tx.send(cue).unwrap();

        // First buffer plays the cue out; it retires on the next pass.
        let mut out = vec![0.0f32; 16];
        mixer.process_into(&mut out);
        mixer.process_into(&mut out);
        assert_eq!(mixer.active_count(), 0);
        assert!(handle.is_finished());
        assert!(registry.lock().active(CueChannel::Voice).is_none());
    }

    #[test]
    fn test_retire_does_not_clobber_newer_reservation() {
        let registry = Arc::new(Mutex::new(ChannelRegistry::new()));
        let (mut mixer, tx) = test_mixer(registry.clone());

        let (old, old_handle) = cue(vec![0.5; 8], 1.0, Some(CueChannel::Voice));
        let old_id = old.id;
        registry.lock().reserve(
            CueChannel::Voice,
            ActiveCue {
                id: old_id,
                handle: old_handle,
            },
        );
        tx.send(old).unwrap();

        // A newer cue reserves the channel while the old one is still in the
        // mixer; the old cue's retire must not free the newer reservation.
        let newer_id = audio::next_cue_id();
        registry.lock().reserve(
            CueChannel::Voice,
            ActiveCue {
                id: newer_id,
                handle: CueHandle::new(),
            },
        );

        let mut out = vec![0.0f32; 32];
        mixer.process_into(&mut out);
        mixer.process_into(&mut out);
        assert_eq!(mixer.active_count(), 0);
        assert_eq!(
            registry.lock().active(CueChannel::Voice).map(|c| c.id),
            Some(newer_id)
        );
    }

    #[test]
    fn test_cancelled_cue_retires() {
        let registry = Arc::new(Mutex::new(ChannelRegistry::new()));
        let (mut mixer, tx) = test_mixer(registry);

        let (cue, handle) = cue(vec![0.5; 48000], 1.0, None);
        tx.send(cue).unwrap();

        let mut out = vec![0.0f32; 16];
        mixer.process_into(&mut out);
        assert_eq!(mixer.active_count(), 1);

        handle.cancel();
        mixer.process_into(&mut out);
        assert_eq!(mixer.active_count(), 0);
        assert!(handle.is_finished());
    }
}
