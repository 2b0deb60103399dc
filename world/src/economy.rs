//! Coins, lives, and the wave counter.

/// Player resources tracked by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Economy {
    coins: u32,
    lives: u32,
    wave: u32,
}

impl Economy {
    pub(crate) const fn new(coins: u32, lives: u32, wave: u32) -> Self {
        Self { coins, lives, wave }
    }

    pub(crate) const fn coins(&self) -> u32 {
        self.coins
    }

    pub(crate) const fn lives(&self) -> u32 {
        self.lives
    }

    pub(crate) const fn wave(&self) -> u32 {
        self.wave
    }

    pub(crate) const fn can_afford(&self, cost: u32) -> bool {
        self.coins >= cost
    }

    /// Debits the cost. Callers check [`Economy::can_afford`] first.
    pub(crate) fn spend(&mut self, cost: u32) {
        self.coins = self.coins.saturating_sub(cost);
    }

    pub(crate) fn earn(&mut self, reward: u32) {
        self.coins = self.coins.saturating_add(reward);
    }

    /// Removes one life and returns the remaining count.
    pub(crate) fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub(crate) fn advance_wave(&mut self) -> u32 {
        self.wave = self.wave.saturating_add(1);
        self.wave
    }
}

#[cfg(test)]
mod tests {
    use super::Economy;

    #[test]
    fn resources_never_underflow() {
        let mut economy = Economy::new(10, 1, 1);
        assert!(!economy.can_afford(11));
        economy.spend(10);
        assert_eq!(economy.coins(), 0);
        assert_eq!(economy.lose_life(), 0);
        assert_eq!(economy.lose_life(), 0, "lives stay at zero");
        economy.earn(7);
        assert_eq!(economy.coins(), 7);
        assert_eq!(economy.advance_wave(), 2);
        assert_eq!(economy.wave(), 2);
        assert_eq!(economy.lives(), 0);
    }
}
