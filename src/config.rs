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
use std::fs;
use std::path::Path;

mod error;
mod settings;
mod voice;

pub use error::ConfigError;
pub use settings::Settings;
pub use voice::{Gender, Voice, ALL_VOICES};

/// Parses settings from a YAML file.
pub fn load_settings(file: &Path) -> Result<Settings, ConfigError> {
    Ok(serde_yml::from_str(&fs::read_to_string(file)?)?)
}
