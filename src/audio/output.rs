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

//! The shared audio rendering context.
//!
//! One context is reused across all cues rather than recreated per sound. It
//! owns a dedicated audio thread holding the cpal stream (cpal streams are
//! not Send, so the stream lives and dies on that thread), and closes exactly
//! once at shutdown. A mock backend renders on demand for tests and headless
//! runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::{error, info};

use super::error::OutputError;
use super::mixer::{CueMixer, CueSender};
use crate::cues::channel::ChannelRegistry;
use crate::playsync::ShutdownHandle;

enum Backend {
    Cpal {
        shutdown: ShutdownHandle,
        join: Mutex<Option<thread::JoinHandle<()>>>,
    },
    Mock {
        mixer: Arc<Mutex<CueMixer>>,
    },
}

/// The process-wide audio rendering context.
pub struct AudioContext {
    sender: CueSender,
    sample_rate: u32,
    channel_count: u16,
    closed: AtomicBool,
    backend: Backend,
}

impl AudioContext {
    /// Opens the default output device and starts the audio thread.
    pub fn open(registry: Arc<Mutex<ChannelRegistry>>) -> Result<AudioContext, OutputError> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let (config_tx, config_rx) = crossbeam_channel::bounded(1);
        let shutdown = ShutdownHandle::new();

        // The thread owns the only config sender. If it dies before
        // reporting a config, the dropped sender surfaces below instead of
        // leaving recv blocked forever.
        let join = {
            let shutdown = shutdown.clone();
            thread::spawn(move || {
                if let Err(e) = run_output(registry, receiver, &shutdown, &config_tx) {
                    error!(error = %e, "Audio output failed");
                    let _ = config_tx.send(Err(e));
                }
            })
        };

        let (sample_rate, channel_count) = recv_config(&config_rx)?;

        Ok(AudioContext {
            sender,
            sample_rate,
            channel_count,
            closed: AtomicBool::new(false),
            backend: Backend::Cpal {
                shutdown,
                join: Mutex::new(Some(join)),
            },
        })
    }

    /// Creates a mock context that renders only when asked. Doesn't touch
    /// any audio device.
    pub fn mock(
        channel_count: u16,
        sample_rate: u32,
        registry: Arc<Mutex<ChannelRegistry>>,
    ) -> AudioContext {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mixer = CueMixer::new(channel_count, sample_rate, registry, receiver);
        AudioContext {
            sender,
            sample_rate,
            channel_count,
            closed: AtomicBool::new(false),
            backend: Backend::Mock {
                mixer: Arc::new(Mutex::new(mixer)),
            },
        }
    }

    /// A sender for registering cues with the mixer.
    pub fn sender(&self) -> CueSender {
        self.sender.clone()
    }

    /// The output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The number of output channels.
    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Renders the given number of frames through the mock mixer. Returns an
    /// empty buffer on a device-backed context, where the audio thread owns
    /// rendering.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        match &self.backend {
            Backend::Mock { mixer } => {
                let mut out = vec![0.0f32; frames * self.channel_count as usize];
                mixer.lock().process_into(&mut out);
                out
            }
            Backend::Cpal { .. } => Vec::new(),
        }
    }

    /// Number of cues the mock mixer is currently playing. Always zero on a
    /// device-backed context.
    pub fn active_cues(&self) -> usize {
        match &self.backend {
            Backend::Mock { mixer } => mixer.lock().active_count(),
            Backend::Cpal { .. } => 0,
        }
    }

    /// Closes the context, stopping the audio thread. Only the first call
    /// does anything.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Backend::Cpal { shutdown, join } = &self.backend {
            shutdown.stop();
            if let Some(handle) = join.lock().take() {
                if handle.join().is_err() {
                    error!("Audio thread panicked during shutdown");
                }
            }
        }
        info!("Audio context closed");
    }

    /// Returns true once the context has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for AudioContext {
    fn drop(&mut self) {
        self.close();
    }
}

/// Lists the names of the available output devices.
pub fn list_output_devices() -> Result<Vec<String>, OutputError> {
    let host = cpal::default_host();
    let mut names = Vec::new();
    for device in host.output_devices()? {
        names.push(
            device
                .name()
                .unwrap_or_else(|_| "unreadable device name".to_string()),
        );
    }
    Ok(names)
}

type ConfigSender = Sender<Result<(u32, u16), OutputError>>;

/// Waits for the audio thread to report its negotiated stream config. A
/// thread that exits before reporting drops its sender, which turns into
/// ThreadExited here rather than a hang.
fn recv_config(
    config_rx: &crossbeam_channel::Receiver<Result<(u32, u16), OutputError>>,
) -> Result<(u32, u16), OutputError> {
    config_rx.recv().map_err(|_| OutputError::ThreadExited)?
}

/// Negotiates the output stream and runs it until shutdown. The negotiated
/// (sample_rate, channel_count) is reported through `config_tx` once the
/// stream is playing.
fn run_output(
    registry: Arc<Mutex<ChannelRegistry>>,
    receiver: crossbeam_channel::Receiver<super::mixer::RegisteredCue>,
    shutdown: &ShutdownHandle,
    config_tx: &ConfigSender,
) -> Result<(), OutputError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(OutputError::NoOutputDevice)?;
    let supported = device.default_output_config()?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    let mixer = CueMixer::new(config.channels, config.sample_rate, registry, receiver);
    match sample_format {
        cpal::SampleFormat::F32 => run_stream::<f32>(&device, &config, mixer, shutdown, config_tx),
        cpal::SampleFormat::I16 => run_stream::<i16>(&device, &config, mixer, shutdown, config_tx),
        cpal::SampleFormat::U16 => run_stream::<u16>(&device, &config, mixer, shutdown, config_tx),
        other => Err(OutputError::UnsupportedFormat(other)),
    }
}

fn run_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: CueMixer,
    shutdown: &ShutdownHandle,
    config_tx: &ConfigSender,
) -> Result<(), OutputError> {
    let mut scratch: Vec<f32> = Vec::new();
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            scratch.resize(data.len(), 0.0);
            mixer.process_into(&mut scratch);
            for (slot, sample) in data.iter_mut().zip(scratch.iter()) {
                *slot = T::from_sample(*sample);
            }
        },
        |err| error!(error = %err, "Output stream error"),
        None,
    )?;
    stream.play()?;

    let _ = config_tx.send(Ok((config.sample_rate, config.channels)));
    info!(
        sample_rate = config.sample_rate,
        channels = config.channels,
        "Audio output started"
    );

    // Park until shutdown; the stream renders on cpal's own thread.
    shutdown.wait();
    drop(stream);
    Ok(())
}
