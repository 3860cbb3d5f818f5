//! Explanation engine adapter.
//!
//! The crate never implements logical inference itself; it consumes an
//! external abduction/entailment backend through the [`ExplanationEngine`]
//! capability trait. Concrete backings are declarative rule/constraint
//! engines, but only the operations below are required.
//!
//! Engine failures are expected in normal operation (generated programs can
//! be malformed, predicates can be missing), so callers go through
//! [`EngineSession`], which serializes access to the process-wide fact base
//! and degrades failures to "no result" instead of aborting the decision
//! pipeline.

pub mod session;

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use session::{EngineSession, SessionConfig};

/// A candidate abductive explanation: the set of hypothesis literals that,
/// if assumed, would account for a set of observations.
///
/// Order is irrelevant. An empty explanation is a valid, meaningful result:
/// it signals abductive failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub hypotheses: Vec<String>,
}

impl Explanation {
    pub fn new(hypotheses: Vec<String>) -> Self {
        Self { hypotheses }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.hypotheses.iter()
    }
}

impl std::fmt::Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.hypotheses.join(", "))
    }
}

/// Capability interface to an external abduction/entailment engine.
///
/// Methods take `&mut self` because the backing engine's fact/rule base is
/// mutable state; [`EngineSession`] serializes access. The probabilistic
/// hooks are optional: backends without them keep the defaults, and callers
/// must treat `None` as a very small nonzero probability rather than zero so
/// logarithmic costs stay finite.
#[async_trait]
pub trait ExplanationEngine: Send + Sync {
    /// Abductive search: candidate explanations for a set of observation
    /// atoms. May return zero, one or many.
    async fn explain(&mut self, observations: &[String]) -> Result<Vec<Explanation>>;

    /// Does the goal succeed against the current fact/rule base?
    async fn entails(&mut self, goal: &str) -> Result<bool>;

    /// Assert a rule or fact into the engine's knowledge base.
    async fn assert_rule(&mut self, rule: &str) -> Result<()>;

    /// Retract a previously asserted rule or fact.
    async fn retract_rule(&mut self, rule: &str) -> Result<()>;

    /// P(h) for a single hypothesis literal, in (0, 1].
    async fn probability(&mut self, _literal: &str) -> Result<Option<f64>> {
        Ok(None)
    }

    /// P(H) for a hypothesis set, in (0, 1].
    async fn probability_of_set(&mut self, _literals: &[String]) -> Result<Option<f64>> {
        Ok(None)
    }

    /// P(claim | H): likelihood of the claim atom under a hypothesis set.
    async fn conditional_probability(
        &mut self,
        _claim: &str,
        _hypotheses: &[String],
    ) -> Result<Option<f64>> {
        Ok(None)
    }

    /// Argumentation-defeat strength of a claim atom in [0, 1]; 0 when the
    /// backend has no argumentation support.
    async fn defeat_strength(&mut self, _claim: &str) -> Result<f64> {
        Ok(0.0)
    }

    /// Hard consistency check over a hypothesis set.
    async fn check_consistency(&mut self, _hypotheses: &[String]) -> Result<bool> {
        Ok(true)
    }
}

fn fact_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-zA-Z0-9_]*\s*\(.*\)$").unwrap())
}

fn rule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-zA-Z0-9_]*\s*\(.*\)\s*:-\s*.+$").unwrap())
}

/// Validate that a string looks like a well-formed clause: either a fact
/// `predicate(args)` or a rule `head :- body`. Used to skip malformed
/// generated clauses before they reach the engine.
pub fn is_valid_clause(clause: &str) -> bool {
    let clause = strip_trailing_period(clause);
    fact_re().is_match(&clause) || rule_re().is_match(&clause)
}

/// Remove a trailing `.` from a clause string, if present.
pub fn strip_trailing_period(clause: &str) -> String {
    let clause = clause.trim();
    clause.strip_suffix('.').unwrap_or(clause).trim().to_string()
}
