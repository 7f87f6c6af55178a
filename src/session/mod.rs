//! Round lifecycle: countdown, score and the Idle/Active/Ended state machine.

/// Where the current round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Nothing started yet; the start button is showing.
    #[default]
    Idle,
    /// Countdown running, input and collection enabled.
    Active,
    /// Countdown reached zero; waiting for "play again".
    Ended,
}

/// Result of one countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session was not active; nothing changed.
    Ignored,
    /// One second elapsed and time remains.
    Running { remaining: u32 },
    /// This tick brought the countdown to zero and ended the session.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    phase: SessionPhase,
    duration: u32,
    remaining: u32,
    score: u32,
}

impl Session {
    #[must_use]
    pub fn new(duration: u32) -> Self {
        Self {
            phase: SessionPhase::Idle,
            duration,
            remaining: duration,
            score: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    /// Whole seconds left in the round.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Begin a fresh round. Returns `false` (and changes nothing) if a round
    /// is already running.
    pub fn start(&mut self, duration: u32) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = SessionPhase::Active;
        self.duration = duration.max(1);
        self.remaining = self.duration;
        self.score = 0;
        true
    }

    /// Advance the countdown by one step.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = SessionPhase::Ended;
            TickOutcome::Expired
        } else {
            TickOutcome::Running { remaining: self.remaining }
        }
    }

    /// Credit collected pickups. Ignored outside an active round.
    pub fn add_score(&mut self, collected: u32) {
        if self.is_active() {
            self.score = self.score.saturating_add(collected);
        }
    }

    /// Fraction of the round that has elapsed, 0 at start and 1 at the end.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            return 1.0;
        }
        (1.0 - self.remaining as f32 / self.duration as f32).clamp(0.0, 1.0)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_ignores_ticks_and_score() {
        let mut s = Session::new(60);
        assert_eq!(s.tick(), TickOutcome::Ignored);
        s.add_score(3);
        assert_eq!(s.remaining(), 60);
        assert_eq!(s.score(), 0);
        assert_eq!(s.phase(), SessionPhase::Idle);
    }

    #[test]
    fn countdown_reaches_zero_and_ends_once() {
        let mut s = Session::new(5);
        assert!(s.start(5));
        let mut last = s.remaining();
        let mut expirations = 0;
        for _ in 0..20 {
            match s.tick() {
                TickOutcome::Running { remaining } => {
                    assert!(remaining < last);
                    last = remaining;
                }
                TickOutcome::Expired => expirations += 1,
                TickOutcome::Ignored => {}
            }
            assert!(s.remaining() <= last);
        }
        assert_eq!(expirations, 1);
        assert_eq!(s.remaining(), 0);
        assert_eq!(s.phase(), SessionPhase::Ended);
    }

    #[test]
    fn restart_from_ended_resets() {
        let mut s = Session::new(1);
        s.start(1);
        s.add_score(4);
        assert_eq!(s.tick(), TickOutcome::Expired);
        assert!(s.start(30));
        assert_eq!(s.remaining(), 30);
        assert_eq!(s.score(), 0);
        assert!(s.is_active());
    }

    #[test]
    fn start_while_active_is_refused() {
        let mut s = Session::new(10);
        s.start(10);
        s.tick();
        assert!(!s.start(10));
        assert_eq!(s.remaining(), 9);
    }

    #[test]
    fn progress_spans_zero_to_one() {
        let mut s = Session::new(4);
        s.start(4);
        assert!(s.progress().abs() < f32::EPSILON);
        s.tick();
        assert!((s.progress() - 0.25).abs() < 1e-6);
        while s.tick() != TickOutcome::Expired {}
        assert!((s.progress() - 1.0).abs() < f32::EPSILON);
    }
}
