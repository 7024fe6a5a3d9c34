//! Split-flap sound engine.
//!
//! Mobile browsers only let audio start from inside the synchronous call
//! stack of a user gesture. The engine therefore "pre-warms" every sound it
//! will ever use (muted play, pause, rewind, unmute) from
//! [`AudioEngine::begin_unlock`], which is deliberately not `async`: nothing
//! can suspend between the gesture and the first `play()`.
//!
//! ```text
//!  Locked ──gesture──▶ Unlocking ──all settled, ≥1 ok──▶ Unlocked
//!    ▲                     │
//!    └── none ok / disable ┘          Unlocked: Idle ◀──▶ Spinning
//! ```
//!
//! Playback failures are logged and swallowed; the engine degrades to silence.

pub mod backend;
pub mod pool;
pub mod prefs;

pub use backend::{AudioError, AudioResource, ClickSynth, Playback};
pub use pool::ClickPool;
pub use prefs::{JsonFileStore, MemoryStore, PreferenceStore};

use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Storage key for the persisted on/off preference.
pub const SOUND_PREF_KEY: &str = "arsenal-countdown-sound";
pub const SPIN_SOUND_PATH: &str = "/split-flap.wav";
pub const CLICK_SOUND_PATH: &str = "/sounds/splitflap-click.mp3";
pub const CLICK_POOL_SIZE: usize = 5;

const SPIN_VOLUME: f32 = 0.6;
const CLICK_VOLUME: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockState {
    Locked,
    Unlocking,
    Unlocked,
}

/// Identifies one sound taking part in an unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceId {
    Spin,
    Click(usize),
}

/// An unlock whose outcome still depends on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockAttempt {
    pub generation: u64,
    /// Resources whose `play()` returned [`Playback::Pending`]
    pub pending: Vec<ResourceId>,
}

/// Snapshot of the engine's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioState {
    pub enabled: bool,
    pub unlocked: bool,
    pub spinning: bool,
}

enum Unlock {
    Locked,
    Unlocking {
        generation: u64,
        pending: HashSet<ResourceId>,
        succeeded: usize,
    },
    Unlocked,
}

pub struct AudioEngine {
    spin: Box<dyn AudioResource>,
    clicks: ClickPool,
    synth: Option<Box<dyn ClickSynth>>,
    prefs: Box<dyn PreferenceStore>,
    unlock: Unlock,
    generation: u64,
    enabled: bool,
    spinning: bool,
}

impl AudioEngine {
    /// Build an engine over the given sounds, restoring the persisted
    /// preference. The engine always starts `Locked`.
    pub fn new(
        mut spin: Box<dyn AudioResource>,
        mut clicks: Vec<Box<dyn AudioResource>>,
        prefs: Box<dyn PreferenceStore>,
    ) -> Self {
        spin.set_looping(true);
        spin.set_volume(SPIN_VOLUME);
        for clip in &mut clicks {
            clip.set_volume(CLICK_VOLUME);
        }
        let enabled = prefs.get(SOUND_PREF_KEY).as_deref() == Some("on");
        if enabled {
            info!("Sound enabled from saved preferences");
        }
        AudioEngine {
            spin,
            clicks: ClickPool::new(clicks),
            synth: None,
            prefs,
            unlock: Unlock::Locked,
            generation: 0,
            enabled,
            spinning: false,
        }
    }

    /// Load the standard spin loop and click pool through `open`.
    pub fn load<F>(mut open: F, prefs: Box<dyn PreferenceStore>) -> Self
    where
        F: FnMut(&str) -> Box<dyn AudioResource>,
    {
        let spin = open(SPIN_SOUND_PATH);
        let clicks = (0..CLICK_POOL_SIZE).map(|_| open(CLICK_SOUND_PATH)).collect();
        Self::new(spin, clicks, prefs)
    }

    pub fn state(&self) -> AudioState {
        AudioState {
            enabled: self.enabled,
            unlocked: matches!(self.unlock, Unlock::Unlocked),
            spinning: self.spinning,
        }
    }

    pub fn unlock_state(&self) -> UnlockState {
        match self.unlock {
            Unlock::Locked => UnlockState::Locked,
            Unlock::Unlocking { .. } => UnlockState::Unlocking,
            Unlock::Unlocked => UnlockState::Unlocked,
        }
    }

    /// Pre-warm every sound. Call from inside a user-gesture handler.
    ///
    /// Returns the attempt when some resources have not settled yet; the host
    /// reports each with [`settle_unlock`](Self::settle_unlock).
    pub fn begin_unlock(&mut self) -> Option<UnlockAttempt> {
        if matches!(self.unlock, Unlock::Unlocked) {
            return None;
        }
        self.generation += 1;
        let generation = self.generation;

        let mut pending = HashSet::new();
        let mut succeeded = 0;

        let mut attempts = vec![(ResourceId::Spin, prewarm(&mut *self.spin))];
        for (i, clip) in self.clicks.clips_mut().enumerate() {
            attempts.push((ResourceId::Click(i), prewarm(&mut **clip)));
        }

        for (id, result) in attempts {
            match result {
                Ok(Playback::Started) => succeeded += 1,
                Ok(Playback::Pending) => {
                    pending.insert(id);
                }
                Err(e) => warn!("Audio unlock failed for {:?}: {}", id, e),
            }
        }

        if pending.is_empty() {
            self.finish_unlock(succeeded);
            return None;
        }

        let mut waiting: Vec<ResourceId> = pending.iter().copied().collect();
        waiting.sort_by_key(|id| match id {
            ResourceId::Spin => 0,
            ResourceId::Click(i) => i + 1,
        });
        self.unlock = Unlock::Unlocking {
            generation,
            pending,
            succeeded,
        };
        Some(UnlockAttempt {
            generation,
            pending: waiting,
        })
    }

    /// Report the asynchronous outcome of one resource's unlock. Outcomes for
    /// an abandoned attempt are ignored.
    pub fn settle_unlock(&mut self, generation: u64, id: ResourceId, result: Result<(), AudioError>) {
        let Unlock::Unlocking {
            generation: current,
            pending,
            succeeded,
        } = &mut self.unlock
        else {
            debug!("Ignoring unlock outcome for {:?}: no unlock in flight", id);
            return;
        };
        if *current != generation || !pending.remove(&id) {
            debug!("Ignoring stale unlock outcome for {:?}", id);
            return;
        }
        match result {
            Ok(()) => *succeeded += 1,
            Err(e) => warn!("Audio unlock failed for {:?}: {}", id, e),
        }
        if pending.is_empty() {
            let ok = *succeeded;
            self.finish_unlock(ok);
        }
    }

    fn finish_unlock(&mut self, succeeded: usize) {
        if succeeded > 0 {
            info!("Audio unlocked ({} sounds ready)", succeeded);
            self.unlock = Unlock::Unlocked;
        } else {
            warn!("Audio unlock refused for every sound; staying silent");
            self.unlock = Unlock::Locked;
        }
    }

    /// Turn sound on and unlock within the same gesture.
    pub fn enable_from_gesture(&mut self) -> Option<UnlockAttempt> {
        self.enabled = true;
        let attempt = self.begin_unlock();
        self.persist();
        info!("Sound enabled");
        attempt
    }

    /// Stop any spin loop and turn sound off. Any unlock still in flight is
    /// abandoned.
    pub fn disable(&mut self) {
        self.stop_spin();
        self.clicks.silence();
        self.enabled = false;
        if matches!(self.unlock, Unlock::Unlocking { .. }) {
            self.unlock = Unlock::Locked;
        }
        self.persist();
        info!("Sound disabled");
    }

    /// Sound button handler. Returns the new `enabled` value.
    pub fn toggle_from_gesture(&mut self) -> bool {
        if self.enabled {
            self.disable();
        } else {
            self.enable_from_gesture();
        }
        self.enabled
    }

    /// Attach the synthesized click backend once it has finished
    /// initializing. Dropped if sound was turned off meanwhile.
    pub fn attach_synth(&mut self, synth: Box<dyn ClickSynth>) -> bool {
        if !self.enabled {
            debug!("Sound disabled before synth was ready, discarding it");
            return false;
        }
        self.synth = Some(synth);
        true
    }

    /// Begin the looping spin sound for a long animation.
    pub fn start_spin(&mut self) -> bool {
        if !self.enabled || !matches!(self.unlock, Unlock::Unlocked) {
            return false;
        }
        if self.spinning {
            return true;
        }
        self.spinning = true;
        self.spin.rewind();
        if let Err(e) = self.spin.play() {
            warn!("Spin sound failed to start: {}", e);
        }
        true
    }

    /// Stop the spin loop and rewind it. Safe in any state.
    pub fn stop_spin(&mut self) {
        self.spin.pause();
        self.spin.rewind();
        self.spinning = false;
    }

    /// One split-flap tick. Returns whether a sound was triggered.
    pub fn play_click(&mut self) -> bool {
        if !self.enabled || self.spinning || !matches!(self.unlock, Unlock::Unlocked) {
            return false;
        }

        if let Some(synth) = self.synth.as_mut().filter(|s| s.is_ready()) {
            match synth.click() {
                Ok(()) => return true,
                Err(e) => warn!("Synth click failed, falling back to clip pool: {}", e),
            }
        }

        match self.clicks.play_next() {
            Ok(()) => true,
            Err(e) => {
                warn!("Click sound failed: {}", e);
                false
            }
        }
    }

    fn persist(&mut self) {
        let value = if self.enabled { "on" } else { "off" };
        if let Err(e) = self.prefs.set(SOUND_PREF_KEY, value) {
            warn!("Failed to persist sound preference: {:#}", e);
        }
    }
}

/// Muted play-then-pause so later unmuted playback is permitted.
fn prewarm(resource: &mut dyn AudioResource) -> Result<Playback, AudioError> {
    resource.set_muted(true);
    let result = resource.play();
    resource.pause();
    resource.rewind();
    resource.set_muted(false);
    if let Err(e) = &result {
        debug!("Pre-warm of {} refused: {}", resource.source(), e);
    }
    result
}
