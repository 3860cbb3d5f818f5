//! Evaluation of decisions against gold labels.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::detector::EduDecision;
use crate::discourse::GoldLabel;

/// Confusion counts and derived metrics for hallucination detection.
/// Positive class = hallucination. Unlabeled EDUs are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub true_positives: u32,
    pub true_negatives: u32,
    pub false_positives: u32,
    pub false_negatives: u32,
}

impl EvaluationMetrics {
    pub fn labeled(&self) -> u32 {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        let n = self.labeled();
        if n == 0 {
            return 0.0;
        }
        (self.true_positives + self.true_negatives) as f64 / n as f64
    }

    pub fn precision(&self) -> f64 {
        let denom = self.true_positives + self.false_positives;
        if denom == 0 {
            return 0.0;
        }
        self.true_positives as f64 / denom as f64
    }

    pub fn recall(&self) -> f64 {
        let denom = self.true_positives + self.false_negatives;
        if denom == 0 {
            return 0.0;
        }
        self.true_positives as f64 / denom as f64
    }

    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }
}

impl std::fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Accuracy:  {:.4}", self.accuracy())?;
        writeln!(f, "Precision: {:.4}", self.precision())?;
        writeln!(f, "Recall:    {:.4}", self.recall())?;
        writeln!(f, "F1:        {:.4}", self.f1())?;
        write!(
            f,
            "TP={}, TN={}, FP={}, FN={}, N={}",
            self.true_positives,
            self.true_negatives,
            self.false_positives,
            self.false_negatives,
            self.labeled()
        )
    }
}

/// Metrics for one evaluation run over many examples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Identifier for this run.
    pub run_id: Uuid,
    pub metrics: EvaluationMetrics,
    /// All decisions, labeled or not.
    pub total_decisions: u32,
}

/// Score a batch of decisions against their gold labels.
pub fn evaluate_decisions(decisions: &[EduDecision]) -> EvaluationMetrics {
    let mut metrics = EvaluationMetrics::default();
    for decision in decisions {
        let Some(label) = decision.edu.label else {
            continue;
        };
        let gold_hallucination = label == GoldLabel::Hallucination;
        match (gold_hallucination, decision.hallucination) {
            (true, true) => metrics.true_positives += 1,
            (false, false) => metrics.true_negatives += 1,
            (false, true) => metrics.false_positives += 1,
            (true, false) => metrics.false_negatives += 1,
        }
    }
    metrics
}

/// Build a run report over a decision batch.
pub fn report(decisions: &[EduDecision]) -> EvaluationReport {
    EvaluationReport {
        run_id: Uuid::new_v4(),
        metrics: evaluate_decisions(decisions),
        total_decisions: decisions.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::discourse::Edu;

    fn decision(label: Option<GoldLabel>, predicted_hallucination: bool) -> EduDecision {
        let mut edu = Edu::new("e1", "text");
        edu.label = label;
        EduDecision {
            edu,
            hallucination: predicted_hallucination,
            reason: "test".into(),
            explanation: None,
            score_claim: None,
            score_base: None,
            decided_at: Utc::now(),
        }
    }

    #[test]
    fn test_confusion_counts() {
        let decisions = vec![
            decision(Some(GoldLabel::Hallucination), true),
            decision(Some(GoldLabel::Hallucination), false),
            decision(Some(GoldLabel::Supported), false),
            decision(Some(GoldLabel::Supported), true),
            decision(None, true), // unlabeled, skipped
        ];

        let m = evaluate_decisions(&decisions);
        assert_eq!(m.true_positives, 1);
        assert_eq!(m.false_negatives, 1);
        assert_eq!(m.true_negatives, 1);
        assert_eq!(m.false_positives, 1);
        assert_eq!(m.labeled(), 4);
        assert!((m.accuracy() - 0.5).abs() < 1e-12);
        assert!((m.precision() - 0.5).abs() < 1e-12);
        assert!((m.recall() - 0.5).abs() < 1e-12);
        assert!((m.f1() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_unlabeled_batches() {
        let m = evaluate_decisions(&[]);
        assert_eq!(m.labeled(), 0);
        assert_eq!(m.accuracy(), 0.0);
        assert_eq!(m.f1(), 0.0);

        let m = evaluate_decisions(&[decision(None, true), decision(None, false)]);
        assert_eq!(m.labeled(), 0);
    }

    #[test]
    fn test_perfect_detector() {
        let decisions = vec![
            decision(Some(GoldLabel::Hallucination), true),
            decision(Some(GoldLabel::Supported), false),
        ];
        let m = evaluate_decisions(&decisions);
        assert_eq!(m.accuracy(), 1.0);
        assert_eq!(m.f1(), 1.0);
    }

    #[test]
    fn test_report_counts_all_decisions() {
        let decisions = vec![decision(None, false), decision(Some(GoldLabel::Supported), false)];
        let r = report(&decisions);
        assert_eq!(r.total_decisions, 2);
        assert_eq!(r.metrics.labeled(), 1);
    }
}
