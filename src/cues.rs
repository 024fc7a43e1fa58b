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

//! Cue playback: loading, modulation, channel management, and scheduling.

pub(crate) mod channel;
mod engine;
mod error;
pub(crate) mod loader;
pub mod modulation;

pub use channel::{ActiveCue, ChannelRegistry, CueChannel, CUT_FADE};
pub use engine::CueEngine;
pub use error::CueError;
pub use loader::{AssetLoader, LoadedAsset};
