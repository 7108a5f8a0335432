use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use rodio::{OutputStream, Sink};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

use super::cue::VoiceCue;
use super::voice::VoiceProfile;

enum SpeechCommand {
    Speak { text: String, profile: VoiceProfile },
    Stop,
}

/// Fire-and-forget playback of the simulated caller's voice. Callers never
/// await a result; a missing output device downgrades to a logged warning so
/// the rest of the call flow is unaffected.
#[derive(Clone)]
pub struct SpeechPlayer {
    tx: Arc<Mutex<Option<Sender<SpeechCommand>>>>,
    speaking: Arc<AtomicBool>,
}

impl SpeechPlayer {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
            speaking: Arc::new(AtomicBool::new(false)),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<SpeechCommand>> {
        let mut guard = self
            .tx
            .lock()
            .map_err(|e| anyhow!("speech channel poisoned: {e}"))?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<SpeechCommand>();

        // Dedicated thread holding the non-Send audio stream/sink
        thread::Builder::new()
            .name("speech-player".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        SpeechCommand::Speak { text, profile } => {
                            // Cut off any playback still going from a previous call
                            if let Some(old) = sink.take() {
                                old.stop();
                            }
                            _stream = None;

                            let (stream, handle) = match OutputStream::try_default() {
                                Ok(pair) => pair,
                                Err(e) => {
                                    warn!("No audio output for speech playback: {e}");
                                    continue;
                                }
                            };
                            let new_sink = match Sink::try_new(&handle) {
                                Ok(s) => s,
                                Err(e) => {
                                    warn!("Failed to create speech sink: {e}");
                                    continue;
                                }
                            };

                            let duration = profile.playback_duration(&text);
                            new_sink.append(VoiceCue::new(profile, duration));
                            new_sink.play();

                            _stream = Some(stream);
                            sink = Some(new_sink);
                        }
                        SpeechCommand::Stop => {
                            if let Some(old) = sink.take() {
                                old.stop();
                            }
                            _stream = None;
                        }
                    }
                }
            })
            .context("failed to spawn speech thread")?;

        let tx_clone = tx.clone();
        *guard = Some(tx);
        Ok(tx_clone)
    }

    /// Play the transcript with a voice chosen from the trust flag.
    pub fn speak(&self, text: &str, trusted: bool) {
        let profile = VoiceProfile::for_caller(trusted);
        debug!(
            "Speaking {} words with voice preference '{}' (pitch {}, rate {})",
            text.split_whitespace().count(),
            profile.preferred_voice,
            profile.pitch,
            profile.rate
        );
        match self.ensure_thread() {
            Ok(tx) => {
                let _ = tx.send(SpeechCommand::Speak {
                    text: text.to_string(),
                    profile,
                });
                self.speaking.store(true, Ordering::SeqCst);
            }
            Err(e) => warn!("Speech playback unavailable: {e}"),
        }
    }

    /// Cancel playback. A guaranteed side effect of ending a call; safe to
    /// call when nothing is playing.
    pub fn stop(&self) {
        if let Ok(guard) = self.tx.lock() {
            if let Some(tx) = guard.as_ref() {
                let _ = tx.send(SpeechCommand::Stop);
            }
        }
        self.speaking.store(false, Ordering::SeqCst);
    }

    /// Whether playback has been requested and not cancelled since. Tracks
    /// the command stream, not sink progress: a finished cue still counts
    /// until the next `stop()`.
    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }
}

impl Default for SpeechPlayer {
    fn default() -> Self {
        Self::new()
    }
}
