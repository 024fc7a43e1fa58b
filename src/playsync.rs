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
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Condvar, Mutex,
};

/// A cue handle is shared between the playback engine, the channel registry,
/// and the render path of a single cue. All signalling is atomic so the audio
/// callback never takes a lock to observe it.
#[derive(Clone)]
pub struct CueHandle {
    /// Set when the cue should stop immediately, without a fade.
    cancelled: Arc<AtomicBool>,
    /// Set when the cue should begin its short cut fade. The render source
    /// starts the fade on the next chunk it produces.
    fade_requested: Arc<AtomicBool>,
    /// Set by the mixer once the cue has fully stopped producing audio.
    finished: Arc<AtomicBool>,
}

impl CueHandle {
    /// Creates a new cue handle.
    pub fn new() -> CueHandle {
        CueHandle {
            cancelled: Arc::new(AtomicBool::new(false)),
            fade_requested: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stops the cue immediately. Used at shutdown; interruption by a newer
    /// cue on the same channel goes through begin_fade instead.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true if the cue was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Requests the cut fade. Idempotent; the fade begins once.
    pub fn begin_fade(&self) {
        self.fade_requested.store(true, Ordering::Relaxed);
    }

    /// Returns true if a fade has been requested.
    pub fn fade_requested(&self) -> bool {
        self.fade_requested.load(Ordering::Relaxed)
    }

    /// Marks the cue as finished. Tolerates being invoked more than once,
    /// e.g. once from natural end and once from a forced stop.
    pub fn mark_finished(&self) {
        self.finished.store(true, Ordering::Relaxed);
    }

    /// Returns true once the cue has stopped producing audio.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}

impl Default for CueHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents the current shutdown state.
#[derive(PartialEq)]
enum ShutdownState {
    Running,
    Stopped,
}

/// A shutdown handle parks the audio thread until the shared rendering
/// context is closed. Closing is one-way; a stopped context is never reused.
#[derive(Clone)]
pub struct ShutdownHandle {
    state: Arc<Mutex<ShutdownState>>,
    condvar: Arc<Condvar>,
}

impl ShutdownHandle {
    /// Creates a new shutdown handle.
    pub fn new() -> ShutdownHandle {
        ShutdownHandle {
            state: Arc::new(Mutex::new(ShutdownState::Running)),
            condvar: Arc::new(Condvar::new()),
        }
    }

    /// Returns true if shutdown has been requested.
    pub fn is_stopped(&self) -> bool {
        *self.state.lock().expect("Error getting lock") == ShutdownState::Stopped
    }

    /// Blocks until shutdown is requested.
    pub fn wait(&self) {
        let _unused = self
            .condvar
            .wait_while(self.state.lock().expect("Error getting lock"), |state| {
                *state == ShutdownState::Running
            })
            .expect("Error getting lock");
    }

    /// Requests shutdown. Only the first call transitions the state.
    pub fn stop(&self) {
        let mut state = self.state.lock().expect("Error getting lock");
        if *state == ShutdownState::Running {
            *state = ShutdownState::Stopped;
            self.condvar.notify_all();
        }
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}
