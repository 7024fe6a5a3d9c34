//! Seams between the sound engine and whatever actually makes noise.
//!
//! A browser build backs [`AudioResource`] with an `HTMLAudioElement` and
//! [`ClickSynth`] with a Web Audio graph; tests back them with recorders.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The platform refused playback, typically outside a user gesture.
    #[error("playback not allowed: {0}")]
    NotAllowed(String),
    #[error("no audio backend ready")]
    NoBackend,
}

/// How a `play()` call started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Playback began synchronously.
    Started,
    /// The platform will confirm later; the host reports the outcome back to
    /// the engine with [`super::AudioEngine::settle_unlock`].
    Pending,
}

/// A single pre-loaded sound addressed by a static path.
pub trait AudioResource {
    /// Path the sound was loaded from.
    fn source(&self) -> &str;

    /// Start playback from the current position.
    fn play(&mut self) -> Result<Playback, AudioError>;

    fn pause(&mut self);

    /// Seek back to the start.
    fn rewind(&mut self);

    fn set_muted(&mut self, muted: bool);

    fn set_looping(&mut self, looping: bool);

    /// 0.0–1.0
    fn set_volume(&mut self, volume: f32);
}

/// Richer click backend (synthesized), created asynchronously after unlock.
pub trait ClickSynth {
    fn is_ready(&self) -> bool;

    fn click(&mut self) -> Result<(), AudioError>;
}
