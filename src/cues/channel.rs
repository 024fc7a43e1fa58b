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

//! Channel management for cue playback.
//!
//! Each logical channel holds at most one active cue. Reserving an occupied
//! channel hands the previous occupant back to the caller for its cut fade;
//! the new cue owns the channel immediately, so the two can momentarily
//! coexist for the fade duration. That overlap is what avoids audible clicks.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::classify::CharacterClass;
use crate::playsync::CueHandle;

/// Length of the linear fade applied to a cue that is cut off by a newer
/// reservation on its channel.
pub const CUT_FADE: Duration = Duration::from_millis(25);

/// A logical playback slot. Two cues in different channels always play
/// concurrently without interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueChannel {
    /// Alphabetical animalese phonemes.
    Voice,
    /// Harmonic "vocal" tones.
    Melodic,
    /// Everything else.
    Sfx,
}

impl CueChannel {
    /// Channels are assigned by category, not by caller choice.
    pub fn for_class(class: CharacterClass) -> CueChannel {
        match class {
            CharacterClass::Alphabetical(_) => CueChannel::Voice,
            CharacterClass::Harmonic(_) => CueChannel::Melodic,
            _ => CueChannel::Sfx,
        }
    }
}

/// The cue currently occupying a channel.
#[derive(Clone)]
pub struct ActiveCue {
    /// Unique cue id, used to guard stale releases.
    pub id: u64,
    /// Handle for fading or stopping the cue.
    pub handle: CueHandle,
}

/// Registry of at most one active cue per channel. Shared between the
/// playback engine and the mixer (which releases channels on natural end),
/// so it lives behind a mutex.
#[derive(Default)]
pub struct ChannelRegistry {
    channels: HashMap<CueChannel, ActiveCue>,
}

impl ChannelRegistry {
    /// Creates an empty registry.
    pub fn new() -> ChannelRegistry {
        ChannelRegistry {
            channels: HashMap::new(),
        }
    }

    /// Registers a cue as the channel's occupant, returning the handle of
    /// the previous occupant (if any) so the caller can begin its fade. The
    /// new cue owns the channel immediately, even while the old one is still
    /// fading.
    pub fn reserve(&mut self, channel: CueChannel, cue: ActiveCue) -> Option<CueHandle> {
        let previous = self.channels.insert(channel, cue);
        if previous.is_some() {
            debug!(?channel, "Channel occupied, cutting previous cue");
        }
        previous.map(|active| active.handle)
    }

    /// Releases a channel when its cue ends naturally. A release for a cue
    /// that no longer occupies the channel (a stale release racing a newer
    /// reservation) is silently ignored.
    pub fn release(&mut self, channel: CueChannel, id: u64) {
        if self.channels.get(&channel).is_some_and(|c| c.id == id) {
            self.channels.remove(&channel);
        }
    }

    /// Empties all channels, returning the handles of the cues that occupied
    /// them. Used at shutdown, where the stop is immediate, without a fade.
    pub fn clear(&mut self) -> Vec<CueHandle> {
        self.channels
            .drain()
            .map(|(_, active)| active.handle)
            .collect()
    }

    /// Returns the occupant of a channel.
    pub fn active(&self, channel: CueChannel) -> Option<&ActiveCue> {
        self.channels.get(&channel)
    }

    /// Number of occupied channels.
    pub fn occupied(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(id: u64) -> ActiveCue {
        ActiveCue {
            id,
            handle: CueHandle::new(),
        }
    }

    #[test]
    fn test_channel_assignment_by_class() {
        assert_eq!(
            CueChannel::for_class(CharacterClass::Alphabetical('a')),
            CueChannel::Voice
        );
        assert_eq!(
            CueChannel::for_class(CharacterClass::Harmonic(3)),
            CueChannel::Melodic
        );
        assert_eq!(
            CueChannel::for_class(CharacterClass::Symbolic("at")),
            CueChannel::Sfx
        );
        assert_eq!(
            CueChannel::for_class(CharacterClass::ControlTab),
            CueChannel::Sfx
        );
        assert_eq!(
            CueChannel::for_class(CharacterClass::Default),
            CueChannel::Sfx
        );
    }

    #[test]
    fn test_reserve_idle_channel() {
        let mut registry = ChannelRegistry::new();
        assert!(registry.reserve(CueChannel::Voice, cue(1)).is_none());
        assert_eq!(registry.occupied(), 1);
        assert_eq!(registry.active(CueChannel::Voice).unwrap().id, 1);
    }

    #[test]
    fn test_later_reservation_wins() {
        let mut registry = ChannelRegistry::new();
        let first = cue(1);
        let first_handle = first.handle.clone();
        registry.reserve(CueChannel::Voice, first);

        let previous = registry.reserve(CueChannel::Voice, cue(2));
        assert!(previous.is_some());

        // The returned handle is the first cue's; the channel now belongs to
        // the second, even before the first finishes fading.
        previous.unwrap().begin_fade();
        assert!(first_handle.fade_requested());
        assert_eq!(registry.active(CueChannel::Voice).unwrap().id, 2);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut registry = ChannelRegistry::new();
        assert!(registry.reserve(CueChannel::Voice, cue(1)).is_none());
        assert!(registry.reserve(CueChannel::Melodic, cue(2)).is_none());
        assert!(registry.reserve(CueChannel::Sfx, cue(3)).is_none());
        assert_eq!(registry.occupied(), 3);
    }

    #[test]
    fn test_stale_release_is_ignored() {
        let mut registry = ChannelRegistry::new();
        registry.reserve(CueChannel::Voice, cue(1));
        registry.reserve(CueChannel::Voice, cue(2));

        // Release for the cut-off cue arrives late; the newer occupant stays.
        registry.release(CueChannel::Voice, 1);
        assert_eq!(registry.active(CueChannel::Voice).unwrap().id, 2);

        // The matching release frees the channel.
        registry.release(CueChannel::Voice, 2);
        assert!(registry.active(CueChannel::Voice).is_none());
    }

    #[test]
    fn test_clear_returns_all_handles() {
        let mut registry = ChannelRegistry::new();
        registry.reserve(CueChannel::Voice, cue(1));
        registry.reserve(CueChannel::Sfx, cue(2));

        let handles = registry.clear();
        assert_eq!(handles.len(), 2);
        assert_eq!(registry.occupied(), 0);
    }
}
