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
use std::path::PathBuf;

use crate::audio::DecodeError;

/// Typed error for cue playback so the host can distinguish a packaging
/// defect from a bad user setting without string matching.
#[derive(Debug, thiserror::Error)]
pub enum CueError {
    /// A resolved (non-override) asset is missing. Classification always
    /// produces a valid path, so this indicates a packaging defect.
    #[error("Unknown sound asset: {0:?}")]
    UnknownAsset(PathBuf),

    /// The user-configured override points at a file that doesn't exist.
    #[error("User-configured sound path is invalid: {0:?}")]
    OverrideInvalid(PathBuf),

    /// An existing file failed to decode; playback for the event is skipped.
    #[error("Asset decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The decode task was cancelled or panicked.
    #[error("Asset load task failed: {0}")]
    LoadTask(#[from] tokio::task::JoinError),

    /// The audio context has been closed.
    #[error("Audio context is closed")]
    ContextClosed,
}
