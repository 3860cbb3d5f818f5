//! IG* aggregation.
//!
//! Combines per-EDU discourse-weighted information gain with a
//! description-length cost per abductive hypothesis:
//!
//! ```text
//! IG*(c,S) = Σ_i w_i * IG(c,e_i)  +  λ * Σ_{h∈Hc} Σ_{e_i explained by h} w_i * ell(h)
//! ```
//!
//! where `ell(h) = -log(freq(h) + smoothing)` is derived from a pluggable
//! frequency signal: a hypothesis that is common in the wild is mundane and
//! cheap, a rare one is expensive.

pub mod frequency;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::discourse::{DiscourseWeightModel, Edu, EduId};

pub use frequency::{FrequencyCache, FrequencyEstimator, SerperEstimator, StaticEstimator};

/// Abductive hypothesis used to support or repair entailment of a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub hyp_id: String,
    /// Query string used for frequency estimation.
    pub query: String,
    /// EDUs that rely on this hypothesis.
    pub explains_edus: Vec<EduId>,
}

impl Hypothesis {
    pub fn new(hyp_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            hyp_id: hyp_id.into(),
            query: query.into(),
            explains_edus: Vec::new(),
        }
    }

    pub fn explains(mut self, edu_id: impl Into<EduId>) -> Self {
        self.explains_edus.push(edu_id.into());
        self
    }
}

/// IG* parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgStarConfig {
    /// λ weighting for abductive complexity.
    pub lambda: f64,
    /// Smoothing added to the frequency before the log.
    pub smoothing: f64,
    /// Log base for `ell`; e by default.
    pub log_base: f64,
    /// Fixed hypothesis cost when no frequency function is supplied.
    pub default_hyp_cost: f64,
}

impl Default for IgStarConfig {
    fn default() -> Self {
        Self {
            lambda: 0.5,
            smoothing: 1.0,
            log_base: std::f64::consts::E,
            default_hyp_cost: 5.0,
        }
    }
}

/// IG* computation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgStarResult {
    /// Σ w_i * IG(c, e_i)
    pub ig_weighted: f64,
    /// Σ_h Σ_{edu ∈ h.explains} w_edu * ell(h)
    pub l_weighted: f64,
    /// ig_weighted + lambda * l_weighted
    pub ig_star: f64,
}

/// Convert a frequency into a description-length cost:
/// `ell = -log(freq + smoothing)`. Larger frequency, lower cost.
pub fn ell_from_frequency(freq: u64, smoothing: f64, log_base: f64) -> f64 {
    let val = (freq as f64 + smoothing).max(smoothing.max(f64::MIN_POSITIVE));
    let mut ln = val.ln();
    if (log_base - std::f64::consts::E).abs() > f64::EPSILON {
        ln /= log_base.ln();
    }
    -ln
}

/// Compute IG* for a document.
///
/// `weights` overrides the discourse-derived weight map; when absent the
/// weights are computed from the EDUs' role/relation metadata with the
/// default model. EDU ids missing from the map weigh 1.0. Without a
/// frequency estimator every hypothesis costs `default_hyp_cost`.
pub async fn compute_ig_star(
    edus: &[Edu],
    hypotheses: &[Hypothesis],
    config: &IgStarConfig,
    weights: Option<&HashMap<EduId, f64>>,
    freq: Option<&dyn FrequencyEstimator>,
) -> IgStarResult {
    let computed;
    let weights = match weights {
        Some(map) => map,
        None => {
            computed = DiscourseWeightModel::default().compute_weights(edus);
            &computed
        }
    };

    let ig_weighted: f64 = edus
        .iter()
        .map(|e| weights.get(&e.edu_id).copied().unwrap_or(1.0) * e.ig)
        .sum();

    let mut l_weighted = 0.0;
    for hypothesis in hypotheses {
        let ell = match freq {
            Some(estimator) => {
                let frequency = estimator.frequency(&hypothesis.query).await;
                ell_from_frequency(frequency, config.smoothing, config.log_base)
            }
            None => config.default_hyp_cost,
        };

        for edu_id in &hypothesis.explains_edus {
            let w = weights.get(edu_id).copied().unwrap_or(1.0);
            l_weighted += w * ell;
        }
    }

    IgStarResult {
        ig_weighted,
        l_weighted,
        ig_star: ig_weighted + config.lambda * l_weighted,
    }
}
