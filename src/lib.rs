//! # hdx-core
//!
//! Discourse-weighted abductive hallucination detection.
//!
//! The crate decides, per Elementary Discourse Unit (EDU) of a generated
//! text, whether the unit is supported by available evidence. It combines
//! three ingredients:
//!
//! - **Discourse structure**: nucleus/satellite roles and rhetorical
//!   relations from an external segmentation step become scalar weights.
//! - **Abduction**: an external inference engine proposes hypothesis sets
//!   that would explain the unit's observation atoms.
//! - **MDL scoring**: hypothesis complexity plus discourse-weighted residual
//!   cost, compared against a no-commitment baseline (counter-abduction).
//!
//! Two complementary analyses ride on the same artifacts: **IG\***, a
//! document-level informativeness metric that charges each abductive
//! hypothesis a frequency-derived description length, and **clause
//! attenuation**, the minimal relaxation of a support rule that makes a goal
//! succeed against a fact base.
//!
//! ## Example
//!
//! ```rust,ignore
//! use hdx_core::{
//!     DiscourseWeightModel, EngineSession, HallucinationDetector, ScoringConfig,
//! };
//!
//! let session = EngineSession::new(my_engine);
//! let detector = HallucinationDetector::new(session, ScoringConfig::default());
//!
//! DiscourseWeightModel::default().apply_weights(&mut edus);
//! let decisions = detector.analyze_example(source_text, &mut edus).await;
//!
//! for decision in &decisions {
//!     println!("{}: {} ({})", decision.edu.edu_id, decision.hallucination, decision.reason);
//! }
//! ```
//!
//! The inference engine, the discourse parser and any LLM generator are
//! external collaborators reached through capability traits
//! ([`ExplanationEngine`], [`IgComputer`], [`FrequencyEstimator`]); the
//! crate ships no inference engine of its own.

pub mod attenuation;
pub mod dataset;
pub mod detector;
pub mod discourse;
pub mod engine;
pub mod error;
pub mod eval;
pub mod igstar;
pub mod scoring;

// Re-exports for convenience
pub use attenuation::{attenuate, AttenuationAttempt, AttenuationOutcome};
pub use dataset::{load_dataset, parse_dataset, Example};
pub use detector::{EduDecision, HallucinationDetector, IgComputer, PassthroughIg};
pub use discourse::{
    DiscourseWeightModel, Edu, EduId, EduRole, GoldLabel, SegmentNode, SegmentTree, WeightConfig,
};
pub use engine::{
    is_valid_clause, strip_trailing_period, EngineSession, Explanation, ExplanationEngine,
    SessionConfig,
};
pub use error::{Error, Result};
pub use eval::{evaluate_decisions, EvaluationMetrics, EvaluationReport};
pub use igstar::{
    compute_ig_star, ell_from_frequency, FrequencyCache, FrequencyEstimator, Hypothesis,
    IgStarConfig, IgStarResult, SerperEstimator, StaticEstimator,
};
pub use scoring::{MdlScorer, ScoringConfig};
