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
use std::fmt;

use serde::{Deserialize, Serialize};

/// The gender half of the asset pack a voice draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// The directory name for this gender in the asset pack.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

/// One of the eight shipped voices. Voices 0-3 are female, 4-7 male; each
/// gender has four recorded slots. Using an enum here makes out-of-range
/// voice selectors unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
pub enum Voice {
    #[default]
    #[serde(rename = "female_1")]
    Female1,
    #[serde(rename = "female_2")]
    Female2,
    #[serde(rename = "female_3")]
    Female3,
    #[serde(rename = "female_4")]
    Female4,
    #[serde(rename = "male_1")]
    Male1,
    #[serde(rename = "male_2")]
    Male2,
    #[serde(rename = "male_3")]
    Male3,
    #[serde(rename = "male_4")]
    Male4,
}

/// All voices, in selector order.
pub const ALL_VOICES: [Voice; 8] = [
    Voice::Female1,
    Voice::Female2,
    Voice::Female3,
    Voice::Female4,
    Voice::Male1,
    Voice::Male2,
    Voice::Male3,
    Voice::Male4,
];

impl Voice {
    /// The selector index of this voice (0-7).
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// The gender half of the asset pack this voice draws from.
    pub fn gender(&self) -> Gender {
        if self.index() <= 3 {
            Gender::Female
        } else {
            Gender::Male
        }
    }

    /// The 1-based recording slot within the gender directory.
    pub fn slot(&self) -> u8 {
        (self.index() % 4) + 1
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.gender().dir_name(), self.slot())
    }
}
