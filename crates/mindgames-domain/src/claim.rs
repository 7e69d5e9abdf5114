//! Claim module - assertions made during the Claim phase

use std::fmt;

/// Category of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimType {
    /// Asserting knowledge about the game
    Information,
    /// Forecasting an upcoming development
    Prediction,
    /// Calling out the opponent
    Accusation,
    /// Proposing cooperation
    Alliance,
}

impl ClaimType {
    /// Wire name of the claim type
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Information => "INFORMATION",
            ClaimType::Prediction => "PREDICTION",
            ClaimType::Accusation => "ACCUSATION",
            ClaimType::Alliance => "ALLIANCE",
        }
    }

    /// Parse a claim type, case-insensitive
    ///
    /// Unknown names map to `Information`, matching what the decision backend
    /// expects from older clients.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "PREDICTION" => ClaimType::Prediction,
            "ACCUSATION" => ClaimType::Accusation,
            "ALLIANCE" => ClaimType::Alliance,
            _ => ClaimType::Information,
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable, boldness-weighted assertion
///
/// Boldness is clamped to `[0, 1]` at construction and the potential gain and
/// loss are derived exactly once.
///
/// # Examples
///
/// ```
/// use mindgames_domain::{Claim, ClaimType};
///
/// let claim = Claim::new("The vault is empty", ClaimType::Information, 1.7);
/// assert_eq!(claim.boldness(), 1.0);
/// assert_eq!(claim.potential_gain(), 40);
/// assert_eq!(claim.potential_loss(), 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    description: String,
    claim_type: ClaimType,
    boldness: f64,
    potential_gain: i32,
    potential_loss: i32,
}

impl Claim {
    /// Create a new claim
    pub fn new(description: impl Into<String>, claim_type: ClaimType, boldness: f64) -> Self {
        let boldness = if boldness.is_nan() {
            0.0
        } else {
            boldness.clamp(0.0, 1.0)
        };

        Self {
            description: description.into(),
            claim_type,
            boldness,
            potential_gain: (10.0 + boldness * 30.0) as i32,
            potential_loss: (15.0 + boldness * 35.0) as i32,
        }
    }

    /// Free-text description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Category
    pub fn claim_type(&self) -> ClaimType {
        self.claim_type
    }

    /// Risk dial in `[0, 1]`
    pub fn boldness(&self) -> f64 {
        self.boldness
    }

    /// `10 + 30·boldness`, truncated
    pub fn potential_gain(&self) -> i32 {
        self.potential_gain
    }

    /// `15 + 35·boldness`, truncated
    pub fn potential_loss(&self) -> i32 {
        self.potential_loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_values() {
        let claim = Claim::new("x", ClaimType::Prediction, 0.5);
        assert_eq!(claim.potential_gain(), 25);
        assert_eq!(claim.potential_loss(), 32);

        let timid = Claim::new("x", ClaimType::Alliance, 0.0);
        assert_eq!(timid.potential_gain(), 10);
        assert_eq!(timid.potential_loss(), 15);
    }

    #[test]
    fn test_boldness_clamped() {
        assert_eq!(Claim::new("x", ClaimType::Information, -0.3).boldness(), 0.0);
        assert_eq!(Claim::new("x", ClaimType::Information, 3.0).boldness(), 1.0);
        assert_eq!(Claim::new("x", ClaimType::Information, f64::NAN).boldness(), 0.0);
    }

    #[test]
    fn test_claim_type_parse() {
        assert_eq!(ClaimType::parse_lenient("accusation"), ClaimType::Accusation);
        assert_eq!(ClaimType::parse_lenient(" Alliance "), ClaimType::Alliance);
        assert_eq!(ClaimType::parse_lenient("rumour"), ClaimType::Information);
    }
}
