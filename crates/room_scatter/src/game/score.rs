//! Score keeping.
use tracing::debug;

/// Score every session starts with.
pub const DEFAULT_STARTING_SCORE: i32 = 100;
/// Points lost when the player touches a laser.
pub const DEFAULT_LASER_HIT_PENALTY: u32 = 10;

/// Player score that never drops below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreBoard {
    starting: i32,
    current: i32,
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_SCORE)
    }
}

impl ScoreBoard {
    pub fn new(starting: i32) -> Self {
        let starting = starting.max(0);
        Self {
            starting,
            current: starting,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn starting(&self) -> i32 {
        self.starting
    }

    /// Subtracts `amount`, clamping at zero, and returns the new score.
    pub fn decrease(&mut self, amount: u32) -> i32 {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.current = self.current.saturating_sub(amount).max(0);
        debug!("Score decreased by {}. Current score: {}", amount, self.current);
        self.current
    }

    pub fn increase(&mut self, amount: u32) -> i32 {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.current = self.current.saturating_add(amount);
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.starting;
    }
}
