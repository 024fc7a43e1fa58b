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

//! Render source for a single cue.
//!
//! A cue source walks its decoded buffer at a detuned rate (which doubles as
//! the sample rate conversion, using the same linear interpolation the player
//! uses for one-shot transcoding), applies the gain and falloff envelope,
//! and honors immediate cancellation and the short cut fade.

use std::sync::Arc;

use crate::cues::channel::CUT_FADE;
use crate::cues::loader::LoadedAsset;
use crate::cues::modulation::{Falloff, FalloffCurve, Modulation, GAIN_FLOOR};
use crate::playsync::CueHandle;

/// A single playing cue.
pub struct CueSource {
    /// Interleaved source data, shared with the loader cache.
    data: Arc<Vec<f32>>,
    /// Number of channels in the source data.
    channel_count: usize,
    /// Fractional read cursor in source frames.
    position: f64,
    /// Source frames advanced per output frame: the source/output rate ratio
    /// scaled by the pitch detune.
    step: f64,
    /// Starting gain. Can exceed 1.0 (uppercase boost); left to clip.
    gain: f32,
    /// Gain-decay envelope, or None for sustained gain.
    falloff: Option<Falloff>,
    /// Output sample rate, for envelope and fade timing.
    out_rate: u32,
    /// Output frames rendered so far.
    frames_rendered: u64,
    /// Output frame at which the cut fade began.
    fade_start: Option<u64>,
    /// Shared stop/fade signalling.
    handle: CueHandle,
    finished: bool,
}

impl CueSource {
    /// Creates a source for the asset, starting at its intrinsic offset.
    pub fn new(
        asset: &LoadedAsset,
        modulation: &Modulation,
        out_rate: u32,
        handle: CueHandle,
    ) -> CueSource {
        let detune = (modulation.pitch_cents as f64 / 1200.0).exp2();
        let step = asset.sample_rate() as f64 / out_rate as f64 * detune;
        CueSource {
            data: asset.data(),
            channel_count: asset.channel_count().max(1) as usize,
            position: asset.start_offset() as f64,
            step,
            gain: modulation.gain,
            falloff: modulation.falloff,
            out_rate,
            frames_rendered: 0,
            fade_start: None,
            handle,
            finished: false,
        }
    }

    /// The cue's handle.
    pub fn handle(&self) -> &CueHandle {
        &self.handle
    }

    /// Returns true once the source will produce no more audio.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Total frames in the source data.
    fn total_frames(&self) -> usize {
        self.data.len() / self.channel_count
    }

    /// Linearly interpolated sample at the current cursor for a channel.
    fn sample_at(&self, channel: usize) -> f32 {
        let frame = self.position.floor() as usize;
        let frac = self.position.fract() as f32;
        let idx0 = frame * self.channel_count + channel;
        let idx1 = (frame + 1) * self.channel_count + channel;
        let s0 = self.data.get(idx0).copied().unwrap_or(0.0);
        let s1 = self.data.get(idx1).copied().unwrap_or(s0);
        s0 + (s1 - s0) * frac
    }

    /// Envelope gain at the current output time.
    fn envelope(&self) -> f32 {
        let Some(falloff) = self.falloff else {
            return self.gain;
        };
        if self.gain <= GAIN_FLOOR {
            return self.gain;
        }
        let t = self.frames_rendered as f32 / self.out_rate as f32;
        let frac = if falloff.seconds > 0.0 {
            (t / falloff.seconds).min(1.0)
        } else {
            1.0
        };
        match falloff.curve {
            FalloffCurve::Linear => self.gain + (GAIN_FLOOR - self.gain) * frac,
            FalloffCurve::Exponential => self.gain * (GAIN_FLOOR / self.gain).powf(frac),
        }
    }

    /// Cut-fade factor at the current output time, or None once the fade has
    /// completed.
    fn fade_factor(&mut self) -> Option<f32> {
        if self.fade_start.is_none() && self.handle.fade_requested() {
            self.fade_start = Some(self.frames_rendered);
        }
        let Some(start) = self.fade_start else {
            return Some(1.0);
        };
        let fade_frames = (CUT_FADE.as_secs_f64() * self.out_rate as f64) as u64;
        let elapsed = self.frames_rendered - start;
        if elapsed >= fade_frames.max(1) {
            return None;
        }
        Some(1.0 - elapsed as f32 / fade_frames.max(1) as f32)
    }

    /// Mixes this cue into an interleaved output buffer. Frames beyond the
    /// end of the source are left untouched.
    pub fn mix_into(&mut self, out: &mut [f32], out_channels: usize) {
        if self.finished {
            return;
        }

        let total_frames = self.total_frames();
        for frame in out.chunks_mut(out_channels) {
            if self.handle.is_cancelled() || self.position.floor() as usize >= total_frames {
                self.finished = true;
                return;
            }
            let Some(fade) = self.fade_factor() else {
                self.finished = true;
                return;
            };

            let level = self.envelope() * fade;
            for (ch, slot) in frame.iter_mut().enumerate() {
                // Mono sources feed every output channel; multi-channel
                // sources map one-to-one and pin extras to their last channel.
                let src_ch = ch.min(self.channel_count - 1);
                *slot += self.sample_at(src_ch) * level;
            }

            self.position += self.step;
            self.frames_rendered += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::modulation::{Falloff, FalloffCurve};
    use crate::testutil::asset_from_samples;

    fn modulation(gain: f32, pitch_cents: f32, falloff: Option<Falloff>) -> Modulation {
        Modulation {
            pitch_cents,
            gain,
            falloff,
        }
    }

    fn render_all(source: &mut CueSource, chunk_frames: usize, out_channels: usize) -> Vec<f32> {
        let mut rendered = Vec::new();
        while !source.is_finished() {
            let mut chunk = vec![0.0f32; chunk_frames * out_channels];
            source.mix_into(&mut chunk, out_channels);
            rendered.extend(chunk);
        }
        rendered
    }

    #[test]
    fn test_gain_applied() {
        let asset = asset_from_samples(vec![1.0; 16], 1, 48000);
        let mut source = CueSource::new(
            &asset,
            &modulation(0.5, 0.0, None),
            48000,
            CueHandle::new(),
        );

        let mut out = vec![0.0f32; 16];
        source.mix_into(&mut out, 1);
        for sample in &out {
            assert!((sample - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mixes_additively_and_duplicates_mono() {
        let asset = asset_from_samples(vec![0.25; 8], 1, 48000);
        let mut source = CueSource::new(
            &asset,
            &modulation(1.0, 0.0, None),
            48000,
            CueHandle::new(),
        );

        // Stereo output prefilled with 0.1; the mono source lands on both.
        let mut out = vec![0.1f32; 16];
        source.mix_into(&mut out, 2);
        for sample in &out {
            assert!((sample - 0.35).abs() < 1e-6);
        }
    }

    #[test]
    fn test_finishes_at_end_of_data() {
        let asset = asset_from_samples(vec![0.5; 10], 1, 48000);
        let mut source = CueSource::new(
            &asset,
            &modulation(1.0, 0.0, None),
            48000,
            CueHandle::new(),
        );

        let mut out = vec![0.0f32; 32];
        source.mix_into(&mut out, 1);
        assert!(source.is_finished());
        // Frames past the end stay untouched.
        assert_eq!(out[10], 0.0);
    }

    #[test]
    fn test_start_offset_skips_leading_silence() {
        let mut samples = vec![0.0f32; 100];
        samples.extend(vec![0.9f32; 20]);
        let asset = asset_from_samples(samples, 1, 48000);
        assert_eq!(asset.start_offset(), 100);

        let mut source = CueSource::new(
            &asset,
            &modulation(1.0, 0.0, None),
            48000,
            CueHandle::new(),
        );
        let mut out = vec![0.0f32; 4];
        source.mix_into(&mut out, 1);
        // Playback starts right at the signal, not the silence.
        assert!((out[0] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_detune_changes_playback_length() {
        let samples = vec![0.5f32; 4800];
        let asset = asset_from_samples(samples.clone(), 1, 48000);

        // +1200 cents doubles the rate, halving the rendered length.
        let mut up = CueSource::new(
            &asset,
            &modulation(1.0, 1200.0, None),
            48000,
            CueHandle::new(),
        );
        let rendered_up = render_all(&mut up, 256, 1);
        let up_len = rendered_up.iter().filter(|s| **s != 0.0).count();
        assert!((up_len as i64 - 2400).abs() <= 2, "got {}", up_len);

        // -1200 cents halves the rate, doubling it.
        let mut down = CueSource::new(
            &asset,
            &modulation(1.0, -1200.0, None),
            48000,
            CueHandle::new(),
        );
        let rendered_down = render_all(&mut down, 256, 1);
        let down_len = rendered_down.iter().filter(|s| **s != 0.0).count();
        assert!((down_len as i64 - 9600).abs() <= 2, "got {}", down_len);
    }

    #[test]
    fn test_cancel_stops_immediately() {
        let asset = asset_from_samples(vec![0.5; 48000], 1, 48000);
        let handle = CueHandle::new();
        let mut source = CueSource::new(&asset, &modulation(1.0, 0.0, None), 48000, handle.clone());

        let mut out = vec![0.0f32; 64];
        source.mix_into(&mut out, 1);
        assert!(!source.is_finished());

        handle.cancel();
        let mut out = vec![0.0f32; 64];
        source.mix_into(&mut out, 1);
        assert!(source.is_finished());
        assert!(out.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_cut_fade_completes_within_fade_duration() {
        let out_rate = 48000u32;
        let fade_frames = (CUT_FADE.as_secs_f64() * out_rate as f64) as usize;
        let asset = asset_from_samples(vec![1.0; out_rate as usize], 1, out_rate);
        let handle = CueHandle::new();
        let mut source =
            CueSource::new(&asset, &modulation(1.0, 0.0, None), out_rate, handle.clone());

        handle.begin_fade();

        // The fade ramps linearly to zero and the source finishes within the
        // fade duration.
        let mut out = vec![0.0f32; fade_frames + 64];
        source.mix_into(&mut out, 1);
        assert!(source.is_finished());
        assert!((out[0] - 1.0).abs() < 1e-3);
        assert!(out[fade_frames / 2] < 0.6);
        for sample in &out[fade_frames..] {
            assert_eq!(*sample, 0.0);
        }
    }

    #[test]
    fn test_linear_falloff_decays_toward_floor() {
        let out_rate = 1000u32;
        let falloff = Falloff {
            seconds: 0.5,
            curve: FalloffCurve::Linear,
        };
        let asset = asset_from_samples(vec![1.0; 1000], 1, out_rate);
        let mut source = CueSource::new(
            &asset,
            &modulation(1.0, 0.0, Some(falloff)),
            out_rate,
            CueHandle::new(),
        );

        let mut out = vec![0.0f32; 1000];
        source.mix_into(&mut out, 1);
        assert!((out[0] - 1.0).abs() < 1e-3);
        // Halfway through the ramp: roughly half gain.
        assert!((out[250] - 0.5).abs() < 0.01);
        // Past the ramp: at the floor, never exactly zero.
        assert!(out[600] > 0.0);
        assert!(out[600] <= GAIN_FLOOR * 1.01);
    }

    #[test]
    fn test_exponential_falloff_decays_faster_than_linear() {
        let out_rate = 1000u32;
        let asset = asset_from_samples(vec![1.0; 1000], 1, out_rate);

        let mut linear = CueSource::new(
            &asset,
            &modulation(
                1.0,
                0.0,
                Some(Falloff {
                    seconds: 1.0,
                    curve: FalloffCurve::Linear,
                }),
            ),
            out_rate,
            CueHandle::new(),
        );
        let mut exponential = CueSource::new(
            &asset,
            &modulation(
                1.0,
                0.0,
                Some(Falloff {
                    seconds: 1.0,
                    curve: FalloffCurve::Exponential,
                }),
            ),
            out_rate,
            CueHandle::new(),
        );

        let mut linear_out = vec![0.0f32; 1000];
        let mut exponential_out = vec![0.0f32; 1000];
        linear.mix_into(&mut linear_out, 1);
        exponential.mix_into(&mut exponential_out, 1);

        // Midway through the ramp the exponential curve is well below the
        // linear one; both start at full gain.
        assert!((linear_out[0] - exponential_out[0]).abs() < 1e-3);
        assert!(exponential_out[500] < linear_out[500] / 5.0);
        assert!(exponential_out[500] > 0.0);
    }

    #[test]
    fn test_sustained_gain_without_falloff() {
        let asset = asset_from_samples(vec![1.0; 500], 1, 1000);
        let mut source =
            CueSource::new(&asset, &modulation(0.8, 0.0, None), 1000, CueHandle::new());

        let mut out = vec![0.0f32; 500];
        source.mix_into(&mut out, 1);
        assert!((out[0] - 0.8).abs() < 1e-6);
        assert!((out[499] - 0.8).abs() < 1e-6);
    }
}
