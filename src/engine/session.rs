//! Engine session: serialized, failure-degrading access to the backend.
//!
//! The backing engine's fact/rule base is process-wide mutable state, so
//! assert/retract pairs must never interleave across callers. The session
//! wraps the engine behind an async mutex and holds the lock across each
//! compound operation ([`EngineSession::entails_with_rule`] in particular).
//!
//! Failure policy: any engine call may fail, and engine failures are
//! expected (malformed generated rules, missing predicates). The degraded
//! accessors here translate failures and timeouts into "no result" — empty
//! explanation, floor probability, zero defeat — with a warning, rather than
//! propagating. Callers that need the raw error use the `try_` variants.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::error::{Error, Result};

use super::{Explanation, ExplanationEngine};

/// Floor applied to probabilities so logarithmic costs stay finite.
pub const PROBABILITY_FLOOR: f64 = 1e-6;

/// Default P(claim | H) when the backend has no conditional hook or the
/// hypothesis set is empty.
pub const CONDITIONAL_DEFAULT: f64 = 1e-3;

/// Session tuning knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bound on each external engine call. Timeout counts as an engine
    /// failure and degrades like one. `None` means unbounded.
    pub call_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            call_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Handle to one engine connection, shared by the detector and the
/// attenuation search. Clones share the same underlying engine.
#[derive(Clone)]
pub struct EngineSession {
    inner: Arc<Mutex<dyn ExplanationEngine>>,
    config: SessionConfig,
}

impl EngineSession {
    pub fn new(engine: impl ExplanationEngine + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
            config: SessionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Bound each engine call; a timeout degrades like an engine failure.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.config.call_timeout = Some(timeout);
        self
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        match self.config.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(Error::timeout(limit.as_millis() as u64)),
            },
            None => fut.await,
        }
    }

    /// First abductive explanation for a set of observations, degraded:
    /// engine failure or no candidates yields the empty explanation.
    pub async fn explain(&self, observations: &[String]) -> Explanation {
        match self.try_explain(observations).await {
            Ok(mut candidates) => {
                if candidates.is_empty() {
                    Explanation::empty()
                } else {
                    candidates.swap_remove(0)
                }
            }
            Err(err) => {
                tracing::warn!("abduction failed, treating as no explanation: {err}");
                Explanation::empty()
            }
        }
    }

    /// All candidate explanations, propagating errors.
    pub async fn try_explain(&self, observations: &[String]) -> Result<Vec<Explanation>> {
        let mut engine = self.inner.lock().await;
        self.bounded(engine.explain(observations)).await
    }

    /// Entailment check, degraded: failure counts as "goal does not
    /// succeed".
    pub async fn entails(&self, goal: &str) -> bool {
        match self.try_entails(goal).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!("entailment query failed for {goal}: {err}");
                false
            }
        }
    }

    /// Entailment check, propagating errors.
    pub async fn try_entails(&self, goal: &str) -> Result<bool> {
        let mut engine = self.inner.lock().await;
        self.bounded(engine.entails(goal)).await
    }

    /// P(h) for one literal, floored at [`PROBABILITY_FLOOR`].
    pub async fn probability(&self, literal: &str) -> f64 {
        let mut engine = self.inner.lock().await;
        match self.bounded(engine.probability(literal)).await {
            Ok(Some(p)) => p.max(PROBABILITY_FLOOR),
            Ok(None) => PROBABILITY_FLOOR,
            Err(err) => {
                tracing::warn!("probability lookup failed for {literal}: {err}");
                PROBABILITY_FLOOR
            }
        }
    }

    /// P(H) for a hypothesis set, floored at [`PROBABILITY_FLOOR`]. An empty
    /// set has probability 1 (nothing is assumed).
    pub async fn probability_of_set(&self, literals: &[String]) -> f64 {
        if literals.is_empty() {
            return 1.0;
        }
        let mut engine = self.inner.lock().await;
        match self.bounded(engine.probability_of_set(literals)).await {
            Ok(Some(p)) => p.max(PROBABILITY_FLOOR),
            Ok(None) => PROBABILITY_FLOOR,
            Err(err) => {
                tracing::warn!("set probability lookup failed: {err}");
                PROBABILITY_FLOOR
            }
        }
    }

    /// P(claim | H), defaulting to [`CONDITIONAL_DEFAULT`] when the backend
    /// cannot answer or the hypothesis set is empty.
    pub async fn conditional_probability(&self, claim: &str, hypotheses: &[String]) -> f64 {
        if hypotheses.is_empty() {
            return CONDITIONAL_DEFAULT;
        }
        let mut engine = self.inner.lock().await;
        match self
            .bounded(engine.conditional_probability(claim, hypotheses))
            .await
        {
            Ok(Some(p)) => p.max(PROBABILITY_FLOOR),
            Ok(None) => CONDITIONAL_DEFAULT,
            Err(err) => {
                tracing::warn!("conditional probability failed for {claim}: {err}");
                CONDITIONAL_DEFAULT
            }
        }
    }

    /// Argumentation-defeat strength, 0.0 when unsupported or failing.
    pub async fn defeat_strength(&self, claim: &str) -> f64 {
        let mut engine = self.inner.lock().await;
        match self.bounded(engine.defeat_strength(claim)).await {
            Ok(strength) => strength.clamp(0.0, 1.0),
            Err(err) => {
                tracing::warn!("defeat strength lookup failed for {claim}: {err}");
                0.0
            }
        }
    }

    /// Hard consistency check; failures degrade to "consistent" so an
    /// unavailable checker never adds the hard penalty.
    pub async fn check_consistency(&self, hypotheses: &[String]) -> bool {
        let mut engine = self.inner.lock().await;
        match self.bounded(engine.check_consistency(hypotheses)).await {
            Ok(consistent) => consistent,
            Err(err) => {
                tracing::warn!("consistency check failed: {err}");
                true
            }
        }
    }

    /// Run a goal query with a transient rule asserted.
    ///
    /// The rule is retracted on every exit path: after a successful query,
    /// after a failed query, and even when the assert itself may have
    /// half-applied. The engine lock is held for the whole
    /// assert/query/retract sequence so no other caller can observe the
    /// transient rule.
    pub async fn entails_with_rule(&self, rule: &str, goal: &str) -> bool {
        let mut engine = self.inner.lock().await;

        let asserted = self.bounded(engine.assert_rule(rule)).await;
        if let Err(err) = &asserted {
            tracing::warn!("assertion failed for rule {rule}: {err}");
        }

        let outcome = if asserted.is_ok() {
            match self.bounded(engine.entails(goal)).await {
                Ok(success) => success,
                Err(err) => {
                    tracing::warn!("query failed for {goal}: {err}");
                    false
                }
            }
        } else {
            false
        };

        // Retraction is attempted regardless of what happened above; a
        // failed retract of a never-asserted rule is harmless.
        if let Err(err) = self.bounded(engine.retract_rule(rule)).await {
            if asserted.is_ok() {
                tracing::warn!("problem retracting {rule}: {err}");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::Error;

    /// Engine whose every call fails.
    struct FailingEngine;

    #[async_trait]
    impl ExplanationEngine for FailingEngine {
        async fn explain(&mut self, _obs: &[String]) -> Result<Vec<Explanation>> {
            Err(Error::engine_unavailable("backend down"))
        }
        async fn entails(&mut self, _goal: &str) -> Result<bool> {
            Err(Error::engine_unavailable("backend down"))
        }
        async fn assert_rule(&mut self, _rule: &str) -> Result<()> {
            Err(Error::engine_unavailable("backend down"))
        }
        async fn retract_rule(&mut self, _rule: &str) -> Result<()> {
            Err(Error::engine_unavailable("backend down"))
        }
        async fn probability(&mut self, _literal: &str) -> Result<Option<f64>> {
            Err(Error::engine_unavailable("backend down"))
        }
    }

    /// Engine that answers after a long delay.
    struct SlowEngine;

    #[async_trait]
    impl ExplanationEngine for SlowEngine {
        async fn explain(&mut self, _obs: &[String]) -> Result<Vec<Explanation>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(vec![Explanation::new(vec!["late(answer)".into()])])
        }
        async fn entails(&mut self, _goal: &str) -> Result<bool> {
            Ok(true)
        }
        async fn assert_rule(&mut self, _rule: &str) -> Result<()> {
            Ok(())
        }
        async fn retract_rule(&mut self, _rule: &str) -> Result<()> {
            Ok(())
        }
    }

    /// Engine tracking assert/retract balance.
    struct TrackingEngine {
        asserted: Arc<AtomicUsize>,
        retracted: Arc<AtomicUsize>,
        fail_query: bool,
    }

    #[async_trait]
    impl ExplanationEngine for TrackingEngine {
        async fn explain(&mut self, _obs: &[String]) -> Result<Vec<Explanation>> {
            Ok(vec![])
        }
        async fn entails(&mut self, _goal: &str) -> Result<bool> {
            if self.fail_query {
                Err(Error::engine_unavailable("query exploded"))
            } else {
                Ok(true)
            }
        }
        async fn assert_rule(&mut self, _rule: &str) -> Result<()> {
            self.asserted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn retract_rule(&mut self, _rule: &str) -> Result<()> {
            self.retracted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failures_degrade_to_defaults() {
        let session = EngineSession::new(FailingEngine);

        let explanation = session.explain(&["fever".to_string()]).await;
        assert!(explanation.is_empty());

        assert!(!session.entails("disease(gout)").await);
        assert_eq!(session.probability("h").await, PROBABILITY_FLOOR);
        assert_eq!(session.defeat_strength("c").await, 0.0);
        assert!(session.check_consistency(&["h".to_string()]).await);
    }

    #[tokio::test]
    async fn test_conditional_defaults() {
        let session = EngineSession::new(FailingEngine);
        // Empty hypothesis set short-circuits without an engine call.
        assert_eq!(
            session.conditional_probability("claim", &[]).await,
            CONDITIONAL_DEFAULT
        );
        assert_eq!(
            session
                .conditional_probability("claim", &["h".to_string()])
                .await,
            CONDITIONAL_DEFAULT
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades_like_failure() {
        let session =
            EngineSession::new(SlowEngine).with_call_timeout(Duration::from_millis(100));
        let explanation = session.explain(&["fever".to_string()]).await;
        assert!(explanation.is_empty());
    }

    #[tokio::test]
    async fn test_transient_rule_retracted_on_success_and_failure() {
        let asserted = Arc::new(AtomicUsize::new(0));
        let retracted = Arc::new(AtomicUsize::new(0));

        let session = EngineSession::new(TrackingEngine {
            asserted: asserted.clone(),
            retracted: retracted.clone(),
            fail_query: false,
        });
        assert!(session.entails_with_rule("p(x) :- q(x)", "p(x)").await);
        assert_eq!(asserted.load(Ordering::SeqCst), retracted.load(Ordering::SeqCst));

        let asserted = Arc::new(AtomicUsize::new(0));
        let retracted = Arc::new(AtomicUsize::new(0));
        let session = EngineSession::new(TrackingEngine {
            asserted: asserted.clone(),
            retracted: retracted.clone(),
            fail_query: true,
        });
        assert!(!session.entails_with_rule("p(x) :- q(x)", "p(x)").await);
        assert_eq!(asserted.load(Ordering::SeqCst), 1);
        assert_eq!(retracted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_probability_of_set_empty_is_one() {
        let session = EngineSession::new(FailingEngine);
        assert_eq!(session.probability_of_set(&[]).await, 1.0);
    }
}
