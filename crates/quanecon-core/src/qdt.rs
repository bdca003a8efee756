//! Quantum Decision Theory prospect weighting.
//!
//! Each prospect carries a utility and an optional observed choice
//! frequency. The utility factor is a softmax of utilities at temperature
//! `tau`. When every prospect in the set carries a usable frequency, an
//! attraction term pulls the weights toward the observed frequencies with
//! strength `quarter` (the QDT quarter law); otherwise the attraction is
//! zero and the weights are the bare utility factors. Output probabilities
//! are non-negative and sum to 1 across the set.

use serde::{Deserialize, Serialize};

/// A named outcome with a utility and an optional observed frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prospect {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub utility: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<f64>,
}

impl Prospect {
    pub fn new(name: impl Into<String>, utility: f64, freq: Option<f64>) -> Self {
        Self {
            name: name.into(),
            utility,
            freq,
        }
    }
}

/// Prospect weighting result: three parallel sequences, one entry per input
/// prospect, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct QdtResult {
    pub ok: bool,
    pub names: Vec<String>,
    pub utility_factor: Vec<f64>,
    pub probabilities: Vec<f64>,
}

impl QdtResult {
    fn failed() -> Self {
        Self {
            ok: false,
            names: Vec::new(),
            utility_factor: Vec::new(),
            probabilities: Vec::new(),
        }
    }
}

/// Compute utility factors and final probabilities for a prospect set.
pub fn compute(prospects: &[Prospect], tau: f64, quarter: f64) -> QdtResult {
    if prospects.is_empty() || !(tau > 0.0) || !quarter.is_finite() {
        return QdtResult::failed();
    }

    // Softmax over utility/tau, shifted by the max for stability.
    let max_u = prospects
        .iter()
        .map(|p| p.utility)
        .fold(f64::NEG_INFINITY, f64::max);
    if !max_u.is_finite() {
        return QdtResult::failed();
    }
    let weights: Vec<f64> = prospects
        .iter()
        .map(|p| ((p.utility - max_u) / tau).exp())
        .collect();
    let norm: f64 = weights.iter().sum();
    if !(norm > 0.0) || !norm.is_finite() {
        return QdtResult::failed();
    }
    let utility_factor: Vec<f64> = weights.iter().map(|w| w / norm).collect();

    // Attraction requires a complete, positive frequency profile.
    let freqs: Option<Vec<f64>> = prospects.iter().map(|p| p.freq).collect();
    let quarter = quarter.clamp(0.0, 1.0);
    let probabilities: Vec<f64> = match freqs {
        Some(f) if f.iter().all(|x| x.is_finite() && *x >= 0.0) && f.iter().sum::<f64>() > 0.0 => {
            let fsum: f64 = f.iter().sum();
            utility_factor
                .iter()
                .zip(&f)
                .map(|(uf, fr)| (1.0 - quarter) * uf + quarter * (fr / fsum))
                .collect()
        }
        _ => utility_factor.clone(),
    };

    QdtResult {
        ok: true,
        names: prospects.iter().map(|p| p.name.clone()).collect(),
        utility_factor,
        probabilities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Prospect> {
        vec![
            Prospect::new("A", 0.1, Some(0.35)),
            Prospect::new("B", 0.25, Some(0.45)),
            Prospect::new("C", 0.15, Some(0.20)),
        ]
    }

    #[test]
    fn probabilities_sum_to_one() {
        let r = compute(&sample(), 1.0, 0.25);
        assert!(r.ok);
        assert_eq!(r.names.len(), 3);
        assert!((r.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-8);
        assert!((r.utility_factor.iter().sum::<f64>() - 1.0).abs() < 1e-8);
        assert!(r.probabilities.iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn missing_freq_disables_attraction() {
        let ps = vec![
            Prospect::new("A", 0.1, Some(0.5)),
            Prospect::new("B", 0.25, None),
        ];
        let r = compute(&ps, 1.0, 0.25);
        assert!(r.ok);
        assert_eq!(r.probabilities, r.utility_factor);
    }

    #[test]
    fn higher_utility_gets_higher_factor() {
        let r = compute(&sample(), 1.0, 0.25);
        assert!(r.utility_factor[1] > r.utility_factor[0]);
        assert!(r.utility_factor[1] > r.utility_factor[2]);
    }

    #[test]
    fn attraction_pulls_toward_frequencies() {
        let r = compute(&sample(), 1.0, 0.25);
        // B has both the top utility and the top frequency.
        assert!(r.probabilities[1] > r.probabilities[0]);
        // The pull moves A's weight from its bare factor toward freq 0.35.
        assert!((r.probabilities[0] - r.utility_factor[0]).abs() > 0.0);
    }

    #[test]
    fn invalid_inputs_fail() {
        assert!(!compute(&[], 1.0, 0.25).ok);
        assert!(!compute(&sample(), 0.0, 0.25).ok);
        assert!(!compute(&sample(), -1.0, 0.25).ok);
        let nan = vec![Prospect::new("A", f64::NAN, None)];
        assert!(!compute(&nan, 1.0, 0.25).ok);
    }

    #[test]
    fn names_preserve_input_order() {
        let r = compute(&sample(), 1.0, 0.25);
        assert_eq!(r.names, vec!["A", "B", "C"]);
    }
}
