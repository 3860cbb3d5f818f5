//! Hallucination decision procedure.
//!
//! Per-EDU state machine combining information gain, abduction and MDL
//! scoring:
//!
//! 1. Refresh the EDU's information gain via the injected [`IgComputer`].
//! 2. Low IG short-circuits to "not hallucinated" without touching the
//!    engine — cheap EDUs are assumed source-consistent.
//! 3. No observation atoms, or an empty abduction result, is a
//!    counter-abductive failure: no supporting hypothesis exists at all.
//! 4. Otherwise compare the claim's MDL score against the no-commitment
//!    baseline; a claim that codes worse than the baseline beyond the
//!    configured margin is rejected.
//!
//! Every decision carries a human-readable reason naming the branch that
//! produced it. A failing engine or a malformed EDU never aborts the batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::discourse::Edu;
use crate::engine::{EngineSession, Explanation};
use crate::scoring::{MdlScorer, ScoringConfig};

/// Pluggable information-gain computation.
///
/// Implementations call out to an NLI/LLM/QA auditor to estimate how far the
/// EDU diverges from the source. The capability is a value, not a class
/// hierarchy: any `Fn(&Edu, &str) -> f64` works.
pub trait IgComputer: Send + Sync {
    fn compute_ig(&self, edu: &Edu, source: &str) -> f64;
}

impl<F> IgComputer for F
where
    F: Fn(&Edu, &str) -> f64 + Send + Sync,
{
    fn compute_ig(&self, edu: &Edu, source: &str) -> f64 {
        self(edu, source)
    }
}

/// Default IG computer: keeps whatever value the EDU already carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughIg;

impl IgComputer for PassthroughIg {
    fn compute_ig(&self, edu: &Edu, _source: &str) -> f64 {
        edu.ig
    }
}

/// Verdict for one EDU. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EduDecision {
    /// Snapshot of the EDU as scored (after the IG refresh).
    pub edu: Edu,
    /// True when the unit is judged hallucinated.
    pub hallucination: bool,
    /// Which branch of the state machine produced the verdict.
    pub reason: String,
    /// Explanation used for scoring, when abduction ran.
    pub explanation: Option<Explanation>,
    /// MDL score of the claim, when scoring occurred.
    pub score_claim: Option<f64>,
    /// Baseline score, when scoring occurred.
    pub score_base: Option<f64>,
    /// When the decision was made.
    pub decided_at: DateTime<Utc>,
}

impl EduDecision {
    fn unscored(edu: &Edu, hallucination: bool, reason: String) -> Self {
        Self {
            edu: edu.clone(),
            hallucination,
            reason,
            explanation: None,
            score_claim: None,
            score_base: None,
            decided_at: Utc::now(),
        }
    }

    fn scored(
        edu: &Edu,
        hallucination: bool,
        reason: String,
        explanation: Explanation,
        score_claim: f64,
        score_base: f64,
    ) -> Self {
        Self {
            edu: edu.clone(),
            hallucination,
            reason,
            explanation: Some(explanation),
            score_claim: Some(score_claim),
            score_base: Some(score_base),
            decided_at: Utc::now(),
        }
    }
}

/// IG + abduction + counter-abduction hallucination detector.
pub struct HallucinationDetector {
    session: EngineSession,
    scorer: MdlScorer,
    ig_computer: Box<dyn IgComputer>,
    use_ensemble: bool,
}

impl HallucinationDetector {
    pub fn new(session: EngineSession, config: ScoringConfig) -> Self {
        Self {
            session,
            scorer: MdlScorer::new(config),
            ig_computer: Box::new(PassthroughIg),
            use_ensemble: false,
        }
    }

    /// Inject a custom IG computer.
    pub fn with_ig_computer(mut self, ig_computer: impl IgComputer + 'static) -> Self {
        self.ig_computer = Box::new(ig_computer);
        self
    }

    /// Score claims with the probabilistic ensemble instead of the base
    /// formula.
    pub fn with_ensemble_scoring(mut self) -> Self {
        self.use_ensemble = true;
        self
    }

    pub fn scorer(&self) -> &MdlScorer {
        &self.scorer
    }

    /// Classify a single EDU against the source text.
    ///
    /// Mutates `edu.ig` in place during the refresh step; otherwise pure.
    /// Calling twice with the same inputs and a deterministic engine yields
    /// the same verdict.
    pub async fn classify_edu(&self, edu: &mut Edu, source_text: &str) -> EduDecision {
        // Step 1: refresh information gain.
        edu.ig = self.ig_computer.compute_ig(edu, source_text);

        let config = self.scorer.config();

        // Step 2: low IG, close to the source-supported distribution.
        if edu.ig < config.ig_low_threshold {
            tracing::debug!(edu = %edu.edu_id, ig = edu.ig, "low-IG short circuit");
            return EduDecision::unscored(
                edu,
                false,
                format!(
                    "Low IG ({:.3}) — close to source-supported distribution.",
                    edu.ig
                ),
            );
        }

        // Step 3: abductive explanation for the unit's observations.
        let explanation = if edu.symptoms.is_empty() {
            Explanation::empty()
        } else {
            self.session.explain(&edu.symptoms).await
        };

        if explanation.is_empty() {
            return EduDecision::unscored(
                edu,
                true,
                format!(
                    "IG={:.3} and no abductive explanation found (counter-abductive failure).",
                    edu.ig
                ),
            );
        }

        // Step 4: counter-abduction test against the baseline.
        let score_claim = if self.use_ensemble {
            self.scorer
                .ensemble_score(edu, &explanation, &self.session)
                .await
        } else {
            self.scorer.score(edu, &explanation)
        };
        let score_base = self.scorer.baseline_score(edu);

        if score_claim > score_base + config.counter_margin {
            EduDecision::scored(
                edu,
                true,
                format!(
                    "Counter-abductive failure: ScoreClaim={score_claim:.3} > ScoreBase={score_base:.3} + margin."
                ),
                explanation,
                score_claim,
                score_base,
            )
        } else {
            EduDecision::scored(
                edu,
                false,
                format!(
                    "Abductively supported: ScoreClaim={score_claim:.3} <= ScoreBase={score_base:.3} + margin."
                ),
                explanation,
                score_claim,
                score_base,
            )
        }
    }

    /// Classify every EDU of a document independently.
    ///
    /// No cross-EDU state is carried; a bad EDU affects only its own
    /// decision.
    pub async fn analyze_example(
        &self,
        source_text: &str,
        edus: &mut [Edu],
    ) -> Vec<EduDecision> {
        let mut decisions = Vec::with_capacity(edus.len());
        for edu in edus.iter_mut() {
            let decision = self.classify_edu(edu, source_text).await;
            tracing::debug!(
                edu = %decision.edu.edu_id,
                hallucination = decision.hallucination,
                "classified"
            );
            decisions.push(decision);
        }
        decisions
    }
}
