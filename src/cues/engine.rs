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

//! The cue engine coordinates asset loading, modulation, channel
//! reservation, and playback scheduling.
//!
//! `play` completes when the cue is scheduled, not when it finishes.
//! Classification, resolution, and modulation are synchronous; decoding is
//! the one suspension point and runs on the blocking pool.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::channel::{ActiveCue, ChannelRegistry, CueChannel};
use super::error::CueError;
use super::loader::AssetLoader;
use super::modulation;
use crate::audio::{self, AudioContext, CueSource, RegisteredCue};
use crate::config::Settings;
use crate::playsync::CueHandle;

/// The cue engine. One engine owns the shared audio context, the decoded
/// asset cache, and the channel registry for the life of the process.
pub struct CueEngine {
    /// Decoded-asset cache, shared with the blocking decode tasks.
    loader: Arc<AssetLoader>,
    /// Channel registry, shared with the mixer for natural-end releases.
    registry: Arc<Mutex<ChannelRegistry>>,
    /// The shared rendering context.
    context: AudioContext,
}

impl CueEngine {
    /// Creates an engine around an audio context. The registry must be the
    /// one the context's mixer releases into.
    pub fn new(context: AudioContext, registry: Arc<Mutex<ChannelRegistry>>) -> CueEngine {
        CueEngine {
            loader: Arc::new(AssetLoader::new()),
            registry,
            context,
        }
    }

    /// The engine's audio context.
    pub fn context(&self) -> &AudioContext {
        &self.context
    }

    /// The engine's channel registry.
    pub fn registry(&self) -> Arc<Mutex<ChannelRegistry>> {
        self.registry.clone()
    }

    /// Plays the asset at `path` for the given token, reserving `channel` if
    /// one is given. Completes once the cue is scheduled.
    ///
    /// A cue already active on the channel receives its cut fade; the new
    /// cue starts immediately and independently of that fade.
    pub async fn play(
        &self,
        path: &Path,
        token: &str,
        channel: Option<CueChannel>,
        settings: &Settings,
    ) -> Result<(), CueError> {
        if self.context.is_closed() {
            return Err(CueError::ContextClosed);
        }

        if !path.exists() {
            let path = path.to_path_buf();
            return Err(match settings.override_path() {
                Some(override_path) if override_path.as_path() == path => {
                    CueError::OverrideInvalid(path)
                }
                _ => CueError::UnknownAsset(path),
            });
        }

        // Decode (or fetch from cache) off the cooperative thread. A decode
        // failure skips playback for this event; no channel has been touched
        // yet, so it stays idle.
        let asset = {
            let loader = self.loader.clone();
            let path = path.to_path_buf();
            tokio::task::spawn_blocking(move || loader.load(&path)).await??
        };

        let modulation = modulation::compute(token, settings);
        let id = audio::next_cue_id();
        let handle = CueHandle::new();

        if let Some(channel) = channel {
            let previous = self.registry.lock().reserve(
                channel,
                ActiveCue {
                    id,
                    handle: handle.clone(),
                },
            );
            if let Some(previous) = previous {
                previous.begin_fade();
            }
        }

        let source = CueSource::new(&asset, &modulation, self.context.sample_rate(), handle);
        self.context
            .sender()
            .send(RegisteredCue {
                id,
                source,
                channel,
            })
            .map_err(|_| CueError::ContextClosed)?;

        debug!(
            token,
            ?channel,
            pitch_cents = modulation.pitch_cents,
            gain = modulation.gain,
            "Cue scheduled"
        );
        Ok(())
    }

    /// Stops all channels immediately (no fade) and closes the audio
    /// context. Used at process teardown.
    pub fn shutdown(&self) {
        let handles = self.registry.lock().clear();
        let stopped = handles.len();
        for handle in handles {
            handle.cancel();
        }
        self.context.close();
        if stopped > 0 {
            info!(stopped, "Cue engine shut down");
        }
    }

    /// Returns the total memory used by cached assets.
    pub fn memory_usage(&self) -> usize {
        self.loader.total_memory_usage()
    }
}

impl std::fmt::Debug for CueEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CueEngine")
            .field("cached_assets", &self.loader.cached_assets())
            .field("occupied_channels", &self.registry.lock().occupied())
            .field("memory_kb", &(self.memory_usage() / 1024))
            .finish()
    }
}
