use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_HAND_SIZE: usize = 5;
pub const DEFAULT_EXPECTATION_DIGITS: u32 = 2;
pub const MAX_EXPECTATION_DIGITS: u32 = 9;
pub const DEFAULT_FIELD_SIZE: usize = 10;

/// Process-wide statistics settings, fixed once the process has started.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatsConfig {
    /// Cards drawn per turn.
    pub hand_size: usize,
    /// Decimal places of the expected-value figure.
    pub expectation_digits: u32,
    /// Action cards picked by a random field.
    pub field_size: usize,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("hand_size must be positive")]
    ZeroHandSize,
    #[error("expectation_digits must be at most {MAX_EXPECTATION_DIGITS}, got {0}")]
    TooManyDigits(u32),
    #[error("field_size must be positive")]
    ZeroFieldSize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            hand_size: DEFAULT_HAND_SIZE,
            expectation_digits: DEFAULT_EXPECTATION_DIGITS,
            field_size: DEFAULT_FIELD_SIZE,
        }
    }
}

impl StatsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hand_size == 0 {
            return Err(ConfigError::ZeroHandSize);
        }
        if self.expectation_digits > MAX_EXPECTATION_DIGITS {
            return Err(ConfigError::TooManyDigits(self.expectation_digits));
        }
        if self.field_size == 0 {
            return Err(ConfigError::ZeroFieldSize);
        }
        Ok(())
    }

    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    pub fn with_expectation_digits(mut self, digits: u32) -> Self {
        self.expectation_digits = digits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StatsConfig::default();
        assert_eq!(config.hand_size, 5);
        assert_eq!(config.expectation_digits, 2);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let config = StatsConfig::default().with_hand_size(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroHandSize));
        let config = StatsConfig::default().with_expectation_digits(12);
        assert_eq!(config.validate(), Err(ConfigError::TooManyDigits(12)));
    }
}
