//! Discourse weight model.
//!
//! Converts an EDU's nucleus/satellite role and rhetorical relation into a
//! scalar weight w_i used by the MDL scorer and the IG* aggregator. The
//! scheme is multiplicative: `w = role_weight(role) * relation_weight(rel)`,
//! clamped to a configurable range, optionally normalized so the batch mean
//! is 1.0 (keeps scores comparable across documents with different role
//! distributions).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{Edu, EduId, EduRole};

/// Configuration for the discourse weight model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Base weight per role.
    pub role_weight: HashMap<EduRole, f64>,
    /// Multiplier per rhetorical relation label. Unlisted relations get 1.0.
    pub relation_weight: HashMap<String, f64>,
    /// Lower clamp for a single weight.
    pub min_w: f64,
    /// Upper clamp for a single weight.
    pub max_w: f64,
    /// Divide batch weights by their mean so the mean is 1.0.
    pub normalize: bool,
}

impl Default for WeightConfig {
    fn default() -> Self {
        let role_weight = HashMap::from([
            (EduRole::Nucleus, 1.00),
            (EduRole::Satellite, 0.65),
            (EduRole::Unknown, 0.80),
        ]);

        // Strongly justificatory relations weigh above 1.0, scene-setting
        // ones below.
        let relation_weight = HashMap::from([
            ("Evidence".to_string(), 1.15),
            ("Justify".to_string(), 1.15),
            ("Cause".to_string(), 1.12),
            ("Result".to_string(), 1.12),
            ("Explanation".to_string(), 1.10),
            ("Elaboration".to_string(), 1.00),
            ("Condition".to_string(), 1.05),
            ("Contrast".to_string(), 0.95),
            ("Antithesis".to_string(), 0.95),
            ("Background".to_string(), 0.85),
            ("Example".to_string(), 0.95),
        ]);

        Self {
            role_weight,
            relation_weight,
            min_w: 0.10,
            max_w: 1.25,
            normalize: true,
        }
    }
}

/// Discourse weight model.
///
/// Pure and infallible: unknown roles and relations degrade to default
/// multipliers rather than erroring.
#[derive(Debug, Clone, Default)]
pub struct DiscourseWeightModel {
    config: WeightConfig,
}

impl DiscourseWeightModel {
    pub fn new(config: WeightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WeightConfig {
        &self.config
    }

    /// Weight for a single (role, relation) pair, clamped to
    /// `[min_w, max_w]`.
    pub fn weight(&self, role: EduRole, relation: Option<&str>) -> f64 {
        let role_w = self
            .config
            .role_weight
            .get(&role)
            .copied()
            .unwrap_or_else(|| {
                self.config
                    .role_weight
                    .get(&EduRole::Unknown)
                    .copied()
                    .unwrap_or(1.0)
            });

        let rel_w = relation
            .and_then(|r| self.config.relation_weight.get(r))
            .copied()
            .unwrap_or(1.0);

        (role_w * rel_w).clamp(self.config.min_w, self.config.max_w)
    }

    /// Compute weights for a batch of EDUs, keyed by id.
    ///
    /// When normalization is enabled every weight is divided by the batch
    /// mean, so the mean over the returned map is 1.0. Normalized values may
    /// exceed `max_w`; the clamp applies to raw per-unit weights.
    pub fn compute_weights(&self, edus: &[Edu]) -> HashMap<EduId, f64> {
        let mut raw: HashMap<EduId, f64> = HashMap::with_capacity(edus.len());
        for edu in edus {
            let w = self.weight(edu.role, edu.relation.as_deref());
            raw.insert(edu.edu_id.clone(), w);
        }

        if !self.config.normalize || raw.is_empty() {
            return raw;
        }

        let mean = raw.values().sum::<f64>() / raw.len() as f64;
        if mean <= 0.0 {
            return raw;
        }

        raw.into_iter().map(|(k, v)| (k, v / mean)).collect()
    }

    /// Compute weights and write them back into the EDUs.
    pub fn apply_weights(&self, edus: &mut [Edu]) {
        let weights = self.compute_weights(edus);
        for edu in edus.iter_mut() {
            if let Some(w) = weights.get(&edu.edu_id) {
                edu.weight = *w;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::discourse::types::Edu;

    fn model() -> DiscourseWeightModel {
        DiscourseWeightModel::default()
    }

    #[test]
    fn test_weight_defaults() {
        let m = model();
        assert_eq!(m.weight(EduRole::Nucleus, None), 1.0);
        assert_eq!(m.weight(EduRole::Satellite, None), 0.65);
        assert_eq!(m.weight(EduRole::Unknown, None), 0.80);
    }

    #[test]
    fn test_weight_relation_multiplier() {
        let m = model();
        // satellite * Background = 0.65 * 0.85
        let w = m.weight(EduRole::Satellite, Some("Background"));
        assert!((w - 0.65 * 0.85).abs() < 1e-12);
        // unknown role * Background = 0.80 * 0.85
        let w = m.weight(EduRole::Unknown, Some("Background"));
        assert!((w - 0.80 * 0.85).abs() < 1e-12);
        // unknown relation degrades to 1.0
        assert_eq!(m.weight(EduRole::Nucleus, Some("NoSuchRelation")), 1.0);
    }

    #[test]
    fn test_weight_clamped() {
        let mut config = WeightConfig::default();
        config.role_weight.insert(EduRole::Nucleus, 5.0);
        config.relation_weight.insert("Evidence".into(), 3.0);
        let m = DiscourseWeightModel::new(config);

        assert_eq!(m.weight(EduRole::Nucleus, Some("Evidence")), 1.25);

        let mut config = WeightConfig::default();
        config.role_weight.insert(EduRole::Satellite, 0.01);
        let m = DiscourseWeightModel::new(config);
        assert_eq!(m.weight(EduRole::Satellite, None), 0.10);
    }

    #[test]
    fn test_batch_normalization_mean_is_one() {
        let m = model();
        let edus = vec![
            Edu::new("e1", "a").with_role(EduRole::Nucleus),
            Edu::new("e2", "b")
                .with_role(EduRole::Satellite)
                .with_relation("Background"),
            Edu::new("e3", "c")
                .with_role(EduRole::Nucleus)
                .with_relation("Evidence"),
        ];

        let weights = m.compute_weights(&edus);
        let mean = weights.values().sum::<f64>() / weights.len() as f64;
        assert!((mean - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalization_arithmetic_two_edus() {
        // satellite/Background against a plain nucleus: raw weights are
        // 0.65*0.85 = 0.5525 and 1.0, mean 0.77625, normalized values
        // raw/mean with mean exactly 1.0 afterwards.
        let m = model();
        let edus = vec![
            Edu::new("e1", "sat")
                .with_role(EduRole::Satellite)
                .with_relation("Background"),
            Edu::new("e2", "nuc").with_role(EduRole::Nucleus),
        ];

        let weights = m.compute_weights(&edus);
        let raw_sat = 0.65 * 0.85;
        let mean = (raw_sat + 1.0) / 2.0;

        let w_sat = weights[&EduId::from("e1")];
        let w_nuc = weights[&EduId::from("e2")];
        assert!((w_sat - raw_sat / mean).abs() < 1e-12);
        assert!((w_nuc - 1.0 / mean).abs() < 1e-12);
        assert!(((w_sat + w_nuc) / 2.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalization_disabled_returns_raw() {
        let config = WeightConfig {
            normalize: false,
            ..WeightConfig::default()
        };
        let m = DiscourseWeightModel::new(config);
        let edus = vec![
            Edu::new("e1", "a").with_role(EduRole::Satellite),
            Edu::new("e2", "b").with_role(EduRole::Nucleus),
        ];
        let weights = m.compute_weights(&edus);
        assert_eq!(weights[&EduId::from("e1")], 0.65);
        assert_eq!(weights[&EduId::from("e2")], 1.0);
    }

    #[test]
    fn test_apply_weights_writes_back() {
        let m = model();
        let mut edus = vec![
            Edu::new("e1", "a").with_role(EduRole::Nucleus),
            Edu::new("e2", "b").with_role(EduRole::Satellite),
        ];
        m.apply_weights(&mut edus);
        assert!(edus[0].weight > edus[1].weight);
    }

    #[test]
    fn test_empty_batch() {
        let m = model();
        assert!(m.compute_weights(&[]).is_empty());
    }
}
