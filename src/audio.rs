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
use std::sync::atomic::{AtomicU64, Ordering};

pub mod decoder;
pub mod error;
pub mod mixer;
pub mod output;
pub mod source;

pub use error::{DecodeError, OutputError};
pub use mixer::{CueMixer, CueSender, RegisteredCue};
pub use output::{list_output_devices, AudioContext};
pub use source::CueSource;

/// Global cue id counter.
static NEXT_CUE_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a process-unique id for a new cue.
pub fn next_cue_id() -> u64 {
    NEXT_CUE_ID.fetch_add(1, Ordering::SeqCst)
}
