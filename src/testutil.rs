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

//! Shared helpers for tests.

use std::path::Path;

use crate::cues::LoadedAsset;

/// Writes a 16-bit PCM wav file with the given samples.
pub fn write_wav(path: &Path, samples: &[f32], channels: u16, sample_rate: u32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("unable to create wav file");
    for sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer.write_sample(value).expect("unable to write sample");
    }
    writer.finalize().expect("unable to finalize wav file");
}

/// Creates a decoded asset directly from samples, skipping the file round
/// trip.
pub fn asset_from_samples(samples: Vec<f32>, channels: u16, sample_rate: u32) -> LoadedAsset {
    LoadedAsset::from_samples(samples, channels, sample_rate)
}
