//! Minimum interval between shots.

/// Fire-rate gate. A weapon that never fired may always fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    duration: f32,
    last_fired: Option<f32>,
}

impl Cooldown {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            last_fired: None,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn last_fired(&self) -> Option<f32> {
        self.last_fired
    }

    /// True iff `now - last_fired >= duration`.
    pub fn can_fire(&self, now: f32) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now - last >= self.duration,
        }
    }

    /// Stamp a committed shot.
    pub fn note_fire(&mut self, now: f32) {
        self.last_fired = Some(now);
    }

    /// Seconds until the next shot is allowed (zero when ready).
    pub fn remaining(&self, now: f32) -> f32 {
        self.last_fired
            .map_or(0.0, |last| (self.duration - (now - last)).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cooldown_is_ready() {
        assert!(Cooldown::new(1.0).can_fire(0.0));
    }

    #[test]
    fn boundary_is_inclusive() {
        let mut cd = Cooldown::new(0.5);
        cd.note_fire(1.0);
        assert!(!cd.can_fire(1.25));
        assert_eq!(cd.remaining(1.25), 0.25);
        assert!(cd.can_fire(1.5));
        assert_eq!(cd.remaining(2.0), 0.0);
    }
}
