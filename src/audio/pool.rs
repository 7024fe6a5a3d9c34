use super::backend::{AudioError, AudioResource};

/// Fixed set of identical short clips played round-robin so rapid ticks can
/// overlap instead of cutting each other off.
pub struct ClickPool {
    clips: Vec<Box<dyn AudioResource>>,
    next: usize,
}

impl ClickPool {
    pub fn new(clips: Vec<Box<dyn AudioResource>>) -> Self {
        ClickPool { clips, next: 0 }
    }

    /// Rewind and play the next clip in rotation.
    pub fn play_next(&mut self) -> Result<(), AudioError> {
        let len = self.clips.len();
        let clip = self.clips.get_mut(self.next).ok_or(AudioError::NoBackend)?;
        self.next = (self.next + 1) % len;
        clip.rewind();
        clip.play().map(|_| ())
    }

    /// Pause and rewind every clip.
    pub fn silence(&mut self) {
        for clip in &mut self.clips {
            clip.pause();
            clip.rewind();
        }
    }

    pub(super) fn clips_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn AudioResource>> {
        self.clips.iter_mut()
    }
}
