//! MDL-style claim scoring.
//!
//! The scorer assigns a description-length cost to a claim given an
//! abductive explanation. Lower cost = more plausible. The base formula is
//!
//! ```text
//! score = alpha_h * |H|  +  beta_residual * w_i * IG(c_i, S)
//! ```
//!
//! a simplification of `L(H) + Σ w_j L(EDU_j | H)` restricted to the focal
//! EDU: each abduced literal gets unit cost, and the residual is the
//! discourse-weighted information gain. The ensemble variant replaces the
//! unit costs with probabilistic description lengths from the engine and
//! adds argumentation and consistency penalties.

use serde::{Deserialize, Serialize};

use crate::discourse::Edu;
use crate::engine::{EngineSession, Explanation};
use crate::engine::session::PROBABILITY_FLOOR;

/// Scoring and decision thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight for hypothesis complexity L(H).
    pub alpha_h: f64,
    /// Weight for the discourse-weighted residual term.
    pub beta_residual: f64,
    /// Below this information gain an EDU is assumed source-consistent.
    pub ig_low_threshold: f64,
    /// Advisory upper threshold. Accepted for configuration compatibility
    /// but currently gates no branch of the decision procedure.
    pub ig_high_threshold: f64,
    /// Tolerance added to the baseline in the counter-abduction test.
    pub counter_margin: f64,
    /// Multiplier on argumentation-defeat strength (ensemble only).
    pub defeat_factor: f64,
    /// Flat penalty when the hard consistency check fails (ensemble only).
    pub consistency_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alpha_h: 1.0,
            beta_residual: 1.0,
            ig_low_threshold: 0.5,
            ig_high_threshold: 1.5,
            counter_margin: 0.1,
            defeat_factor: 2.0,
            consistency_penalty: 5.0,
        }
    }
}

/// MDL scorer over EDUs and explanations.
#[derive(Debug, Clone, Default)]
pub struct MdlScorer {
    config: ScoringConfig,
}

impl MdlScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Base MDL score: hypothesis complexity plus discourse-weighted
    /// residual. Larger explanations and larger weighted IG both increase
    /// cost.
    pub fn score(&self, edu: &Edu, explanation: &Explanation) -> f64 {
        let l_h = self.config.alpha_h * explanation.len() as f64;
        let l_residual = self.config.beta_residual * edu.weight * edu.ig;
        l_h + l_residual
    }

    /// Cost of explaining nothing while assuming minimal divergence: the
    /// residual term evaluated at the low-IG threshold.
    pub fn baseline_score(&self, edu: &Edu) -> f64 {
        self.config.beta_residual * edu.weight * self.config.ig_low_threshold
    }

    /// Full neuro-symbolic ensemble score.
    ///
    /// Sums probabilistic hypothesis description length, discourse-weighted
    /// entailment residual, argumentation-defeat penalty, the raw IG as an
    /// entropy-like term, and a hard-consistency penalty. All engine lookups
    /// go through the degraded session accessors, so an unavailable backend
    /// yields finite worst-case costs instead of an error.
    pub async fn ensemble_score(
        &self,
        edu: &Edu,
        explanation: &Explanation,
        session: &EngineSession,
    ) -> f64 {
        // (1) L(H) = sum over hypotheses of -ln P(h)
        let mut l_h = 0.0;
        for h in explanation.iter() {
            let p = session.probability(h).await;
            l_h += -(p.max(PROBABILITY_FLOOR)).ln();
        }

        // (2) Discourse-weighted conditional residual L(EDU | H)
        let p_edu_given_h = session
            .conditional_probability(&edu.claim_atom, &explanation.hypotheses)
            .await;
        let l_residual = edu.weight * -(p_edu_given_h.max(PROBABILITY_FLOOR)).ln();

        // (3) Argumentation defeat penalty
        let defeat = session.defeat_strength(&edu.claim_atom).await;
        let arg_cost = self.config.defeat_factor * defeat;

        // (4) Information gain as entropy-like term
        let info_entropy = edu.ig;

        // (5) Hard inconsistency penalty
        let lp_cost = if session.check_consistency(&explanation.hypotheses).await {
            0.0
        } else {
            self.config.consistency_penalty
        };

        l_h + l_residual + arg_cost + info_entropy + lp_cost
    }
}
