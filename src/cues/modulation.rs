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

//! Pitch and gain modulation for cues.
//!
//! Modulation is computed fresh per call and never cached: the detune is
//! randomized, and the uppercase boost depends on the live token. Keeping
//! this separate from the memoized path resolver avoids freezing randomized
//! values.

use rand::Rng;

use crate::classify::is_melodic;
use crate::config::Settings;

/// The floor gain an envelope ramps toward. Never exactly zero so the
/// exponential ramp stays in its domain.
pub const GAIN_FLOOR: f32 = 1e-4;

/// The shape of the falloff envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FalloffCurve {
    Linear,
    Exponential,
}

/// Parameters of the gain-decay envelope applied after a cue starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Falloff {
    /// Time to ramp from the starting gain to the floor.
    pub seconds: f32,
    pub curve: FalloffCurve,
}

/// The full modulation applied to one cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    /// Pitch detune in cents.
    pub pitch_cents: f32,
    /// Linear gain. Deliberately unclamped: the uppercase boost can push it
    /// above 1.0, and the backend is left to clip.
    pub gain: f32,
    /// Falloff envelope, or None for sustained gain.
    pub falloff: Option<Falloff>,
}

/// Returns true if the token is a single uppercase ASCII letter.
fn is_uppercase_letter(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if c.is_ascii_uppercase()
    )
}

/// Computes the pitch detune in cents for a token.
///
/// Melodic tokens always get the flat base shift with zero variance.
/// Uppercase letters with the boost enabled get a fixed upward shift that
/// replaces the random variation; everything else gets a uniform random
/// detune within the configured variation.
pub fn pitch(token: &str, settings: &Settings) -> f32 {
    let base = settings.pitch_shift;

    if is_melodic(token) {
        return base;
    }

    let variation = settings.pitch_variation;
    if settings.louder_uppercase > 0.0 && is_uppercase_letter(token) {
        return base + 1.5 * variation * (1.0 + settings.louder_uppercase / 100.0);
    }

    if variation <= 0.0 {
        return base;
    }
    base + rand::thread_rng().gen_range(-variation..=variation)
}

/// Computes the linear gain for a token. Not clamped to 1.0.
pub fn gain(token: &str, settings: &Settings) -> f32 {
    let mut gain = settings.volume as f32 / 100.0;
    if settings.louder_uppercase > 0.0 && is_uppercase_letter(token) {
        gain *= 1.0 + settings.louder_uppercase / 100.0;
    }
    gain
}

/// Decides the falloff envelope from settings, or None when disabled.
pub fn falloff(settings: &Settings) -> Option<Falloff> {
    if settings.disable_falloff {
        return None;
    }
    Some(Falloff {
        seconds: settings.falloff_time,
        curve: if settings.exponential_falloff {
            FalloffCurve::Exponential
        } else {
            FalloffCurve::Linear
        },
    })
}

/// Computes the full modulation for one cue.
pub fn compute(token: &str, settings: &Settings) -> Modulation {
    Modulation {
        pitch_cents: pitch(token, settings),
        gain: gain(token, settings),
        falloff: falloff(settings),
    }
}
