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

use serde::{Deserialize, Serialize};

use super::voice::Voice;

/// A YAML representation of the keystroke sound settings. The settings are
/// externally owned; each classification/resolution/modulation call consumes
/// a read-only snapshot.
#[derive(Deserialize, Clone, Serialize, Debug)]
pub struct Settings {
    /// Output volume, 0-100.
    #[serde(default = "default_volume")]
    pub volume: u8,

    /// The voice used for alphabetical and voiced-punctuation sounds.
    #[serde(default)]
    pub voice: Voice,

    /// Flat pitch offset in cents applied to every cue.
    #[serde(default)]
    pub pitch_shift: f32,

    /// Half-width in cents of the uniform random detune applied to
    /// non-melodic cues. Must be non-negative.
    #[serde(default = "default_pitch_variation")]
    pub pitch_variation: f32,

    /// Percent boost applied to uppercase letters (volume and pitch).
    /// Zero disables the boost. Must be non-negative.
    #[serde(default)]
    pub louder_uppercase: f32,

    /// Falloff envelope duration in seconds.
    #[serde(default = "default_falloff_time")]
    pub falloff_time: f32,

    /// Disables the falloff envelope entirely (sustained gain).
    #[serde(default)]
    pub disable_falloff: bool,

    /// Uses an exponential falloff curve instead of a linear one.
    #[serde(default)]
    pub exponential_falloff: bool,

    /// Enables voiced punctuation (`!`, `?`, newline play recorded lines
    /// instead of shared sfx).
    #[serde(default = "default_true")]
    pub special_punctuation: bool,

    /// Absolute path to a single sound that overrides all resolution logic.
    /// Empty/absent means no override.
    #[serde(default)]
    pub sound_override: Option<PathBuf>,
}

fn default_volume() -> u8 {
    100
}

fn default_pitch_variation() -> f32 {
    100.0
}

fn default_falloff_time() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            volume: default_volume(),
            voice: Voice::default(),
            pitch_shift: 0.0,
            pitch_variation: default_pitch_variation(),
            louder_uppercase: 0.0,
            falloff_time: default_falloff_time(),
            disable_falloff: false,
            exponential_falloff: false,
            special_punctuation: default_true(),
            sound_override: None,
        }
    }
}

impl Settings {
    /// Returns the active override path, treating an empty path as no
    /// override. A non-empty override takes absolute precedence over all
    /// resolution logic.
    pub fn override_path(&self) -> Option<&PathBuf> {
        self.sound_override
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}
