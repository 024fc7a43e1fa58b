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

//! Resolution of (token, voice, settings) into asset paths.
//!
//! Resolution is pure and idempotent for a fixed key; results are memoized
//! for the lifetime of the resolver. The key space is finite (character
//! classes x 8 voices x 2 flag states), so entries are never evicted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::classify::{classify, CharacterClass};
use crate::config::{Settings, Voice};

/// The extension the asset pack ships with.
pub const ASSET_EXT: &str = "wav";

/// Cache key for a resolved path. The same constructor is used for both the
/// lookup and the store so the two can never diverge in composition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    token: String,
    voice: u8,
    special_punctuation: bool,
}

impl CacheKey {
    fn new(token: &str, voice: Voice, special_punctuation: bool) -> CacheKey {
        CacheKey {
            token: token.to_string(),
            voice: voice.index(),
            special_punctuation,
        }
    }
}

/// Resolves tokens to asset paths beneath an asset root, memoizing results.
pub struct Resolver {
    /// Root of the asset pack; resolved paths live under `<root>/audio/`.
    asset_root: PathBuf,
    /// Memoized resolutions. Process-lifetime, never evicted.
    cache: Mutex<HashMap<CacheKey, PathBuf>>,
    /// Number of lookups served from the cache.
    cache_hits: AtomicU64,
}

impl Resolver {
    /// Creates a resolver over the given asset root.
    pub fn new<P: AsRef<Path>>(asset_root: P) -> Resolver {
        Resolver {
            asset_root: asset_root.as_ref().to_path_buf(),
            cache: Mutex::new(HashMap::new()),
            cache_hits: AtomicU64::new(0),
        }
    }

    /// Resolves a token to the path of the asset that should play for it.
    ///
    /// A non-empty `sound_override` in the settings is returned verbatim,
    /// bypassing classification and the cache entirely.
    pub fn resolve(&self, token: &str, voice: Voice, settings: &Settings) -> PathBuf {
        if let Some(override_path) = settings.override_path() {
            return override_path.clone();
        }

        let key = CacheKey::new(token, voice, settings.special_punctuation);
        {
            let cache = self.cache.lock();
            if let Some(path) = cache.get(&key) {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                return path.clone();
            }
        }

        let class = classify(token, settings.special_punctuation);
        let path = self.path_for_class(class, voice);
        debug!(token, voice = %voice, path = ?path, "Resolved cue path");

        self.cache.lock().insert(key, path.clone());
        path
    }

    /// Builds the asset path for a classified token.
    pub fn path_for_class(&self, class: CharacterClass, voice: Voice) -> PathBuf {
        let audio = self.asset_root.join("audio");
        let voice_dir = format!("voice_{}", voice.slot());
        let file = |stem: &str| format!("{}.{}", stem, ASSET_EXT);

        match class {
            CharacterClass::Alphabetical(letter) => audio
                .join("animalese")
                .join(voice.gender().dir_name())
                .join(voice_dir)
                .join(file(&letter.to_string())),
            CharacterClass::Harmonic(index) => audio
                .join("vocals")
                .join(voice.gender().dir_name())
                .join(voice_dir)
                .join(file(&index.to_string())),
            CharacterClass::VoicedPunctuation(noise) => audio
                .join("animalese")
                .join(voice.gender().dir_name())
                .join(voice_dir)
                .join(file(noise.asset_name())),
            CharacterClass::Symbolic(name) => audio.join("sfx").join(file(name)),
            CharacterClass::ControlTab => audio.join("sfx").join(file("tab")),
            CharacterClass::ControlBackspace => audio.join("sfx").join(file("backspace")),
            CharacterClass::Default => audio.join("sfx").join(file("default")),
        }
    }

    /// Number of lookups served from the cache.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Number of memoized resolutions.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("asset_root", &self.asset_root)
            .field("cached_paths", &self.cache_len())
            .field("cache_hits", &self.cache_hits())
            .finish()
    }
}
