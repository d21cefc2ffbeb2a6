/// Something that can run the show's tick before the next repaint.
pub trait AnimationClock {
    fn request_tick(&mut self);
}

/// Frame-loop clock: remembers a single pending tick request.
#[derive(Debug, Default)]
pub struct FrameClock {
    requested: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request; the frame loop ticks only when this is true.
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }

    #[cfg(test)]
    pub fn is_requested(&self) -> bool {
        self.requested
    }
}

impl AnimationClock for FrameClock {
    fn request_tick(&mut self) {
        self.requested = true;
    }
}
