//! Gold and lives bookkeeping.

use serde::{Deserialize, Serialize};

/// The player's purse and remaining lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    pub gold: i32,
    pub lives: u32,
}

impl Economy {
    pub fn new(gold: i32, lives: u32) -> Self {
        Self { gold, lives }
    }

    /// Apply a change in gold. Positive amounts are costs, negative amounts
    /// are income. Fails without touching the purse if the balance would
    /// go negative.
    pub fn transaction(&mut self, amount: i32) -> bool {
        let Some(balance) = self.gold.checked_sub(amount) else {
            return false;
        };
        if balance < 0 {
            return false;
        }
        self.gold = balance;
        true
    }

    /// Take one life. Returns the lives left; never goes below zero.
    pub fn mutilate(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn is_defeated(&self) -> bool {
        self.lives == 0
    }
}
