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

//! Animalese keystroke sounds: classify input characters, resolve them to
//! audio assets, and play them through interruptible channels.

pub mod audio;
pub mod classify;
pub mod config;
pub mod cues;
pub mod playsync;
pub mod resolve;
#[cfg(test)]
pub(crate) mod testutil;
pub mod verify;

pub use audio::AudioContext;
pub use classify::{classify, is_melodic, CharacterClass};
pub use config::{load_settings, Settings, Voice};
pub use cues::{CueChannel, CueEngine};
pub use resolve::Resolver;
