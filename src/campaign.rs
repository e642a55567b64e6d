//! Campaign arithmetic: running total, target, fill ratio.
//! No UI types in here, the App owns one of these and formats messages around it.

use thiserror::Error;

/// Target a fresh (or reset) campaign starts with
pub const DEFAULT_TARGET: f64 = 100_000.0;

/// Preset donation buttons, in display order
pub const PRESET_AMOUNTS: [f64; 4] = [1000.0, 2500.0, 5000.0, 10000.0];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("no amount entered")]
    Empty,

    #[error("not a number: {0}")]
    NotANumber(String),

    #[error("amount must be finite")]
    NotFinite,

    #[error("amount must be positive, got {0}")]
    NotPositive(f64),

    #[error("total would overflow")]
    TooLarge,
}

/// Parse user text into a finite, strictly positive amount
pub fn parse_amount(input: &str) -> Result<f64, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;

    if !value.is_finite() {
        return Err(AmountError::NotFinite);
    }
    if value <= 0.0 {
        return Err(AmountError::NotPositive(value));
    }

    Ok(value)
}

/// Two-decimal money display, e.g. `2500.00`
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    target: f64,
    raised: f64,
}

impl Default for Campaign {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            raised: 0.0,
        }
    }
}

impl Campaign {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn raised(&self) -> f64 {
        self.raised
    }

    /// Add a validated amount and return the new total
    pub fn add(&mut self, amount: f64) -> Result<f64, AmountError> {
        validate(amount)?;
        let total = self.raised + amount;
        if !total.is_finite() {
            return Err(AmountError::TooLarge);
        }
        self.raised = total;
        Ok(total)
    }

    /// Replace the target; the old one is kept on error
    pub fn set_target(&mut self, target: f64) -> Result<(), AmountError> {
        validate(target)?;
        self.target = target;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_complete(&self) -> bool {
        self.raised >= self.target
    }

    /// `raised / target`, clamped to `[0, 1]`
    pub fn fill_ratio(&self) -> f64 {
        (self.raised / self.target).clamp(0.0, 1.0)
    }

    /// Fill ratio as a whole percentage for labels
    pub fn percent(&self) -> u16 {
        (self.fill_ratio() * 100.0).floor() as u16
    }
}

fn validate(amount: f64) -> Result<(), AmountError> {
    if !amount.is_finite() {
        return Err(AmountError::NotFinite);
    }
    if amount <= 0.0 {
        return Err(AmountError::NotPositive(amount));
    }
    Ok(())
}
