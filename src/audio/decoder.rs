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
use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};
use tracing::warn;

use super::error::DecodeError;

/// A fully decoded audio file as interleaved f32 samples.
/// Cue assets are short, so decoding whole files up front is cheap and keeps
/// the render path allocation-free.
pub struct DecodedAudio {
    /// Interleaved samples.
    pub samples: Vec<f32>,
    /// Number of channels.
    pub channel_count: u16,
    /// Sample rate of the decoded data.
    pub sample_rate: u32,
}

/// Decodes an entire audio file (WAV, OGG, MP3, FLAC, and other formats
/// supported by symphonia) into interleaved f32 samples.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    // Open the file, including the path in the error so the caller sees
    // which asset failed.
    let file = File::open(path).map_err(|e| {
        DecodeError::IoError(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Hint the probe with the file extension.
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let fmt_opts: FormatOptions = Default::default();
    let meta_opts: MetadataOptions = Default::default();
    let probed = get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
    let mut format_reader = probed.format;

    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            DecodeError::Unsupported(format!("{}: no audio track found", path.display()))
        })?;
    let track_id = track.id;

    let decoder_opts: DecoderOptions = Default::default();
    let mut decoder = get_codecs().make(&track.codec_params, &decoder_opts)?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut channel_count: u16 = 0;
    let mut sample_rate: u32 = 0;

    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            // End of stream surfaces as an unexpected EOF from the reader.
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if sample_buf.is_none() {
                    let spec = *decoded.spec();
                    channel_count = spec.channels.count() as u16;
                    sample_rate = spec.rate;
                    sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
                }
                if let Some(buf) = &mut sample_buf {
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
            }
            // Per symphonia's contract, decode errors are recoverable; skip
            // the malformed packet and continue.
            Err(SymphoniaError::DecodeError(e)) => {
                warn!(path = ?path, error = e, "Skipping malformed packet");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if channel_count == 0 || sample_rate == 0 {
        return Err(DecodeError::Unsupported(format!(
            "{}: no decodable audio data",
            path.display()
        )));
    }

    Ok(DecodedAudio {
        samples,
        channel_count,
        sample_rate,
    })
}
