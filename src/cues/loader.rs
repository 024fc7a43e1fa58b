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

//! Asset loading and caching for cue playback.
//!
//! Assets are decoded once and kept in memory; the buffers are Arc-shared so
//! repeated keystrokes reuse the same decoded data. At decode time the
//! leading silence baked into some recordings is measured once and stored as
//! the asset's intrinsic start offset.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::audio::decoder::decode_file;
use crate::audio::error::DecodeError;

/// Amplitude below which a frame counts as leading silence.
const SILENCE_THRESHOLD: f32 = 1e-3;

/// A decoded cue asset that can be played back. The sample data is stored in
/// an Arc for efficient sharing between concurrent cues.
#[derive(Clone)]
pub struct LoadedAsset {
    /// Interleaved f32 samples.
    data: Arc<Vec<f32>>,
    /// Number of channels.
    channel_count: u16,
    /// Sample rate of the decoded data.
    sample_rate: u32,
    /// Frames of leading silence to skip when playback starts.
    start_offset: usize,
}

impl LoadedAsset {
    /// The shared sample data.
    pub fn data(&self) -> Arc<Vec<f32>> {
        self.data.clone()
    }

    /// Returns the number of channels.
    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Returns the sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames of leading silence to skip when playback starts.
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// Returns the memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}

#[cfg(test)]
impl LoadedAsset {
    /// Creates an asset directly from samples (test only).
    pub fn from_samples(samples: Vec<f32>, channel_count: u16, sample_rate: u32) -> LoadedAsset {
        let start_offset = measure_start_offset(&samples, channel_count);
        LoadedAsset {
            data: Arc::new(samples),
            channel_count,
            sample_rate,
            start_offset,
        }
    }
}

/// First frame at which any channel rises above the silence threshold.
fn measure_start_offset(samples: &[f32], channel_count: u16) -> usize {
    let channels = channel_count.max(1) as usize;
    let frames = samples.len() / channels;
    for frame in 0..frames {
        let start = frame * channels;
        if samples[start..start + channels]
            .iter()
            .any(|s| s.abs() > SILENCE_THRESHOLD)
        {
            return frame;
        }
    }
    // Fully silent assets play from the top.
    0
}

/// Manages loading and caching of decoded cue assets.
pub struct AssetLoader {
    /// Cache of loaded assets by file path. Interior mutability so the
    /// loader can be shared behind an Arc with the playback engine.
    cache: Mutex<HashMap<PathBuf, LoadedAsset>>,
}

impl AssetLoader {
    /// Creates a new asset loader.
    pub fn new() -> AssetLoader {
        AssetLoader {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Loads an asset from a file, returning the cached version if present.
    pub fn load(&self, path: &Path) -> Result<LoadedAsset, DecodeError> {
        if let Some(asset) = self.cache.lock().get(path) {
            debug!(path = ?path, "Using cached asset");
            return Ok(asset.clone());
        }

        let decoded = decode_file(path)?;
        let start_offset = measure_start_offset(&decoded.samples, decoded.channel_count);

        let asset = LoadedAsset {
            data: Arc::new(decoded.samples),
            channel_count: decoded.channel_count,
            sample_rate: decoded.sample_rate,
            start_offset,
        };

        info!(
            path = ?path,
            channels = asset.channel_count,
            sample_rate = asset.sample_rate,
            start_offset_frames = start_offset,
            memory_kb = asset.memory_size() / 1024,
            "Asset loaded"
        );

        self.cache.lock().insert(path.to_path_buf(), asset.clone());
        Ok(asset)
    }

    /// Number of cached assets.
    pub fn cached_assets(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns the total memory used by cached assets.
    pub fn total_memory_usage(&self) -> usize {
        self.cache.lock().values().map(|a| a.memory_size()).sum()
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("cached_assets", &self.cached_assets())
            .field("total_memory_kb", &(self.total_memory_usage() / 1024))
            .finish()
    }
}
