//! Clause attenuation search.
//!
//! Given a goal rule `head :- body` and a partition of the body into core
//! and removable literals, the search tests every removable-literal subset:
//! the attenuated rule is asserted transiently, the head is queried, and the
//! rule is retracted again on every path. The best attenuation is the
//! minimal relaxation that makes the goal succeed.
//!
//! The enumeration is exponential in the removable set. That is inherent to
//! the minimal-relaxation problem and acceptable because the removable set
//! is the discourse-derived satellite literals of the rule, typically no
//! more than 6-8, never the full body.

use serde::{Deserialize, Serialize};

use crate::engine::{is_valid_clause, strip_trailing_period, EngineSession};

/// One tested relaxation of the goal rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttenuationAttempt {
    /// Removable literals dropped in this attempt.
    pub removed: Vec<String>,
    /// The attenuated rule text.
    pub rule: String,
    /// Whether the goal succeeded under this rule.
    pub succeeds: bool,
    /// Body literals kept.
    pub kept_count: usize,
}

/// Result of a full attenuation search. Produced fresh per call and never
/// mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttenuationOutcome {
    /// Every tested attempt, zero-removal first, then by removal size.
    pub attempts: Vec<AttenuationAttempt>,
    /// Minimal successful relaxation: fewest removed literals, then most
    /// kept. `None` means the rule is not satisfiable under any relaxation
    /// tested — a terminal negative result, not an error.
    pub best: Option<AttenuationAttempt>,
}

impl AttenuationOutcome {
    /// The zero-removal attempt, if the full body was testable.
    pub fn baseline(&self) -> Option<&AttenuationAttempt> {
        self.attempts.iter().find(|a| a.removed.is_empty())
    }
}

impl std::fmt::Display for AttenuationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Attenuation Results:")?;
        for attempt in &self.attempts {
            let removed = if attempt.removed.is_empty() {
                "None".to_string()
            } else {
                attempt.removed.join(", ")
            };
            let status = if attempt.succeeds { "ok" } else { "fail" };
            writeln!(f, "  Removed: {removed:<40} | Success: {status}")?;
        }
        match &self.best {
            Some(best) => {
                writeln!(f, "Best Attenuation:")?;
                let removed = if best.removed.is_empty() {
                    "None".to_string()
                } else {
                    best.removed.join(", ")
                };
                writeln!(f, "  Removed: {removed}")?;
                writeln!(f, "  Rule: {}", best.rule)
            }
            None => writeln!(f, "Best Attenuation: None"),
        }
    }
}

/// Search all removable-literal subsets for the minimal relaxation under
/// which `head` still succeeds against the session's fact base.
///
/// The full rule is tested first for baseline comparison. Subsets that would
/// leave the body empty are skipped: a rule needs at least one literal to be
/// meaningful. Malformed attenuated rules are recorded as failed attempts
/// with a warning instead of aborting the search.
pub async fn attenuate(
    head: &str,
    body_literals: &[String],
    removable_literals: &[String],
    session: &EngineSession,
) -> AttenuationOutcome {
    let mut attempts = Vec::new();

    for removal in powerset(removable_literals) {
        let kept: Vec<&String> = body_literals
            .iter()
            .filter(|literal| !removal.contains(literal))
            .collect();
        if kept.is_empty() {
            continue;
        }

        let body_str = kept
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let rule = strip_trailing_period(&format!("{head} :- {body_str}"));

        let succeeds = if is_valid_clause(&rule) {
            tracing::debug!(rule = %rule, "testing attenuated rule");
            session.entails_with_rule(&rule, head).await
        } else {
            tracing::warn!(rule = %rule, "skipping malformed attenuated rule");
            false
        };

        attempts.push(AttenuationAttempt {
            removed: removal.into_iter().cloned().collect(),
            rule,
            succeeds,
            kept_count: kept.len(),
        });
    }

    // Fewest removed first, then most kept; ties go to the earlier attempt.
    let best = attempts
        .iter()
        .filter(|a| a.succeeds)
        .min_by_key(|a| (a.removed.len(), usize::MAX - a.kept_count))
        .cloned();

    AttenuationOutcome { attempts, best }
}

/// All subsets of `items` ordered by size, the empty subset first.
fn powerset<T>(items: &[T]) -> Vec<Vec<&T>> {
    let n = items.len();
    let mut masks: Vec<u32> = (0..(1u32 << n)).collect();
    masks.sort_by_key(|m| (m.count_ones(), *m));

    masks
        .into_iter()
        .map(|mask| {
            items
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, item)| item)
                .collect()
        })
        .collect()
}
