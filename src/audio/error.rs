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
/// Error types for asset decoding.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Audio file error: {0}")]
    AudioError(#[from] symphonia::core::errors::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported audio: {0}")]
    Unsupported(String),
}

/// Error types for the shared output context.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("No output device available")]
    NoOutputDevice,

    #[error("Device enumeration error: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("Stream config error: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Stream build error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Stream play error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Unsupported output sample format: {0}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("Audio thread exited before reporting a stream config")]
    ThreadExited,
}
