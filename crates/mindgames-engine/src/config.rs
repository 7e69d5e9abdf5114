//! Rules configuration

use serde::{Deserialize, Serialize};

/// Who acts in each step of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnOrder {
    /// One player acts for the whole round (claim, response, resolution);
    /// the other player takes the next round
    #[default]
    Round,
    /// The claimant's opponent answers the claim and acknowledges the
    /// resolution, then makes the next claim
    Responder,
}

/// Tuning of the claim-truth probability
///
/// `p = clamp(min, max, base + (trust / 100)·reputation_weight − boldness·boldness_weight)`
///
/// # Examples
///
/// ```
/// use mindgames_engine::TruthModel;
///
/// let model = TruthModel::default();
/// assert!((model.probability(50, 0.0) - 0.7).abs() < 1e-9);
/// assert_eq!(model.probability(500, 0.0), 0.9);
/// assert_eq!(model.probability(-500, 1.0), 0.1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruthModel {
    /// Probability before adjustments
    pub base_probability: f64,

    /// Weight of the claimant's trust (per 100 points)
    pub reputation_weight: f64,

    /// Penalty per unit of boldness
    pub boldness_weight: f64,

    /// Lower clamp
    pub min_probability: f64,

    /// Upper clamp
    pub max_probability: f64,
}

impl Default for TruthModel {
    fn default() -> Self {
        Self {
            base_probability: 0.6,
            reputation_weight: 0.2,
            boldness_weight: 0.15,
            min_probability: 0.1,
            max_probability: 0.9,
        }
    }
}

impl TruthModel {
    /// Probability that a claim by a player with `claimant_trust` is true
    pub fn probability(&self, claimant_trust: i32, boldness: f64) -> f64 {
        let p = self.base_probability + (f64::from(claimant_trust) / 100.0) * self.reputation_weight
            - boldness * self.boldness_weight;
        p.max(self.min_probability).min(self.max_probability)
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Turn ownership within a round
    pub turn_order: TurnOrder,

    /// Claim-truth tuning
    pub truth: TruthModel,

    /// Seed for the claim-truth draws; entropy when absent
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_terms() {
        let model = TruthModel::default();
        // 0.6 + 0.5·0.2 − 0.45·0.15
        assert!((model.probability(50, 0.45) - 0.6325).abs() < 1e-9);
        // 0.6 + 0 − 0.15
        assert!((model.probability(0, 1.0) - 0.45).abs() < 1e-9);
        // negative trust lowers it
        assert!((model.probability(-50, 0.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_turn_order_names() {
        let config: RulesConfig = serde_json::from_str(r#"{"turn_order":"responder"}"#).unwrap();
        assert_eq!(config.turn_order, TurnOrder::Responder);
        assert_eq!(config.truth, TruthModel::default());
        assert_eq!(RulesConfig::default().turn_order, TurnOrder::Round);
    }
}
