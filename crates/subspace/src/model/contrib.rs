//! Contribution weights attached to operations (`base:0.1,data:0.6,algo:0.3`).

use crate::error::ValidationError;

/// Ordered `(name, weight)` pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contributions {
    pub weights: Vec<(String, f64)>,
}

impl Contributions {
    /// Parses comma-separated `name:weight` pairs.
    ///
    /// Weights must be finite and non-negative. They are not required to sum
    /// to one.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = |reason| ValidationError::InvalidContributions {
            contributions: s.to_string(),
            reason,
        };

        let mut weights = Vec::new();
        for part in s.split(',') {
            let (name, weight) = part
                .split_once(':')
                .ok_or_else(|| invalid("expected name:weight"))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid("empty contributor name"));
            }
            let weight: f64 = weight
                .trim()
                .parse()
                .map_err(|_| invalid("weight is not a number"))?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid("weight must be finite and non-negative"));
            }
            weights.push((name.to_string(), weight));
        }
        Ok(Self { weights })
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.iter().map(|(_, w)| w).sum()
    }

    /// Weight of `name`, if listed.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.weights.iter().find(|(n, _)| n == name).map(|(_, w)| *w)
    }
}
