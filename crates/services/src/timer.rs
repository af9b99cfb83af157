//! Tick-driven clocks for sessions.
//!
//! Nothing here reads wall time. The caller delivers one `tick()` per second
//! and stops the clock when the view goes away; a stopped clock ignores ticks.

/// Counts seconds spent on the problem currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopwatch {
    elapsed_secs: u32,
    running: bool,
}

impl Stopwatch {
    /// A running stopwatch at zero.
    #[must_use]
    pub fn started() -> Self {
        Self {
            elapsed_secs: 0,
            running: true,
        }
    }

    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Back to zero and running, for the next problem.
    pub fn restart(&mut self) {
        *self = Self::started();
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::started()
    }
}

/// Competition countdown. Stops by itself when it reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    duration_secs: u32,
    remaining_secs: u32,
    running: bool,
}

impl Countdown {
    #[must_use]
    pub fn started(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            running: duration_secs > 0,
        }
    }

    /// Advance one second. Returns `true` on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            return true;
        }
        false
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn restart(&mut self) {
        *self = Self::started(self.duration_secs);
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.duration_secs - self.remaining_secs
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }
}
