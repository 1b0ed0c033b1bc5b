//! Microphone recorder backed by a cpal input stream.
//!
//! The cpal stream lives on a dedicated capture thread (streams are not
//! `Send` on every platform). Samples are buffered in memory while the
//! press is held and written as a 16-bit WAV file when capture stops.

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::JoinHandle;
use std::time::Instant;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use super::{AudioRecorder, RecorderFault, Recording, normalize_level};

/// Capture running on its worker thread.
struct ActiveCapture {
    path: PathBuf,
    started_at: Instant,
    stop_tx: mpsc::Sender<()>,
    worker: JoinHandle<Result<(), RecorderFault>>,
}

/// Records from a system input device into WAV files.
pub struct MicrophoneRecorder {
    /// Device name to use (None = system default)
    device_name: Option<String>,
    active: AsyncMutex<Option<ActiveCapture>>,
    /// Peak magnitude of the most recent input buffer, stored as `f32` bits
    peak: Arc<AtomicU32>,
}

impl MicrophoneRecorder {
    pub fn new(device_name: Option<String>) -> Self {
        Self {
            device_name,
            active: AsyncMutex::new(None),
            peak: Arc::new(AtomicU32::new(0)),
        }
    }
}

impl Default for MicrophoneRecorder {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl AudioRecorder for MicrophoneRecorder {
    async fn start_recording(&self, target_path: &Path) -> Result<(), RecorderFault> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(RecorderFault::AlreadyActive);
        }

        if let Some(parent) = target_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        self.peak.store(0, Ordering::Relaxed);
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let (stop_tx, stop_rx) = mpsc::channel();
        let device_name = self.device_name.clone();
        let path = target_path.to_path_buf();
        let peak = Arc::clone(&self.peak);

        let worker = std::thread::Builder::new()
            .name("voicetask-capture".to_string())
            .spawn(move || capture(device_name.as_deref(), &path, peak, ready_tx, stop_rx))?;

        // Wait until the stream is actually running so acquisition errors
        // surface from this call rather than from stop.
        let ready = tokio::task::spawn_blocking(move || ready_rx.recv()).await;
        match ready {
            Ok(Ok(Ok(()))) => {
                *active = Some(ActiveCapture {
                    path: target_path.to_path_buf(),
                    started_at: Instant::now(),
                    stop_tx,
                    worker,
                });
                Ok(())
            }
            Ok(Ok(Err(fault))) => Err(fault),
            _ => Err(RecorderFault::Unavailable(
                "capture thread exited before the stream opened".to_string(),
            )),
        }
    }

    async fn stop_recording(&self) -> Result<Recording, RecorderFault> {
        let Some(capture) = self.active.lock().await.take() else {
            return Ok(Recording::empty());
        };

        let ActiveCapture {
            path,
            started_at,
            stop_tx,
            worker,
        } = capture;
        let duration_sec = u32::try_from(started_at.elapsed().as_secs()).unwrap_or(u32::MAX);

        // The worker also stops if the sender is dropped, so a failed send is harmless
        let _ = stop_tx.send(());
        let joined = tokio::task::spawn_blocking(move || worker.join()).await;
        self.peak.store(0, Ordering::Relaxed);

        match joined {
            Ok(Ok(result)) => result?,
            Ok(Err(_)) => {
                return Err(RecorderFault::Encode("capture thread panicked".to_string()));
            }
            Err(err) => return Err(RecorderFault::Encode(err.to_string())),
        }

        debug!(path = %path.display(), duration_sec, "microphone capture finished");
        Ok(Recording {
            path: path.display().to_string(),
            duration_sec,
        })
    }

    async fn get_amplitude(&self) -> f32 {
        if self.active.lock().await.is_none() {
            return 0.0;
        }
        normalize_level(f32::from_bits(self.peak.load(Ordering::Relaxed)))
    }
}

/// Capture thread body: open the stream, report readiness, buffer until
/// told to stop, then write the WAV file.
fn capture(
    device_name: Option<&str>,
    path: &Path,
    peak: Arc<AtomicU32>,
    ready_tx: mpsc::SyncSender<Result<(), RecorderFault>>,
    stop_rx: mpsc::Receiver<()>,
) -> Result<(), RecorderFault> {
    let samples = Arc::new(Mutex::new(Vec::new()));

    let (stream, spec) = match open_stream(device_name, Arc::clone(&samples), peak) {
        Ok(opened) => opened,
        Err(fault) => {
            // Reported through the ready channel; nothing left to write
            let _ = ready_tx.send(Err(fault));
            return Ok(());
        }
    };
    let _ = ready_tx.send(Ok(()));

    // Returns on an explicit stop or when the recorder drops the sender
    let _ = stop_rx.recv();
    drop(stream);

    let samples = match Arc::try_unwrap(samples) {
        Ok(mutex) => mutex.into_inner().unwrap_or_else(|e| e.into_inner()),
        Err(shared) => shared.lock().map(|s| s.clone()).unwrap_or_default(),
    };
    write_wav(path, spec, &samples)
}

fn open_stream(
    device_name: Option<&str>,
    samples: Arc<Mutex<Vec<f32>>>,
    peak: Arc<AtomicU32>,
) -> Result<(cpal::Stream, hound::WavSpec), RecorderFault> {
    let host = cpal::default_host();
    let device = match device_name {
        Some(name) => host
            .input_devices()
            .map_err(|e| RecorderFault::Unavailable(e.to_string()))?
            .find(|d| {
                d.description()
                    .map(|desc| desc.to_string() == name)
                    .unwrap_or(false)
            })
            .ok_or_else(|| RecorderFault::Unavailable(format!("input device '{name}' not found")))?,
        None => host
            .default_input_device()
            .ok_or_else(|| RecorderFault::Unavailable("no default input device".to_string()))?,
    };

    let supported = device
        .default_input_config()
        .map_err(|e| RecorderFault::Unavailable(e.to_string()))?;
    let config: cpal::StreamConfig = supported.config();

    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, samples, peak)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, samples, peak)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, samples, peak)?,
        other => {
            return Err(RecorderFault::Unavailable(format!(
                "unsupported sample format: {other:?}"
            )));
        }
    };
    stream
        .play()
        .map_err(|e| RecorderFault::Unavailable(e.to_string()))?;

    Ok((stream, spec))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    samples: Arc<Mutex<Vec<f32>>>,
    peak: Arc<AtomicU32>,
) -> Result<cpal::Stream, RecorderFault>
where
    T: cpal::Sample + cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let err_fn = |err: cpal::StreamError| {
        warn!("audio stream error (recording continues): {err}");
    };

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let chunk: Vec<f32> = data.iter().map(|&s| cpal::Sample::from_sample(s)).collect();
                let chunk_peak = chunk.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
                peak.store(chunk_peak.to_bits(), Ordering::Relaxed);

                if let Ok(mut buffer) = samples.lock() {
                    buffer.extend_from_slice(&chunk);
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| RecorderFault::Unavailable(e.to_string()))
}

fn write_wav(path: &Path, spec: hound::WavSpec, samples: &[f32]) -> Result<(), RecorderFault> {
    let encode = |e: hound::Error| RecorderFault::Encode(e.to_string());

    let mut writer = hound::WavWriter::create(path, spec).map_err(encode)?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer
            .write_sample((clamped * i16::MAX as f32) as i16)
            .map_err(encode)?;
    }
    writer.finalize().map_err(encode)
}

/// Names of the available input devices, for settings and diagnostics.
pub fn list_input_devices() -> Result<Vec<String>, RecorderFault> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| RecorderFault::Unavailable(e.to_string()))?;
    Ok(devices
        .filter_map(|d| d.description().ok().map(|desc| desc.to_string()))
        .collect())
}
