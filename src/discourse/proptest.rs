//! Property-based tests for the discourse weight model.
//!
//! Validates the two weight invariants: every (role, relation) weight stays
//! inside the configured clamp range, and normalized batch weights always
//! average to 1.0.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::discourse::types::{Edu, EduRole};
    use crate::discourse::weights::{DiscourseWeightModel, WeightConfig};

    fn role() -> impl Strategy<Value = EduRole> {
        prop_oneof![
            Just(EduRole::Nucleus),
            Just(EduRole::Satellite),
            Just(EduRole::Unknown),
        ]
    }

    fn relation() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("Evidence".to_string())),
            Just(Some("Background".to_string())),
            Just(Some("Cause".to_string())),
            "[A-Z][a-z]{2,10}".prop_map(Some),
        ]
    }

    proptest! {
        /// For all inputs, min_w <= weight(role, relation) <= max_w.
        #[test]
        fn weight_stays_in_clamp_range(r in role(), rel in relation()) {
            let model = DiscourseWeightModel::default();
            let config = model.config().clone();
            let w = model.weight(r, rel.as_deref());
            prop_assert!(w >= config.min_w, "weight {} below min {}", w, config.min_w);
            prop_assert!(w <= config.max_w, "weight {} above max {}", w, config.max_w);
        }

        /// Clamping holds even for adversarial multiplier tables.
        #[test]
        fn weight_clamped_under_extreme_multipliers(
            r in role(),
            role_w in 0.0f64..10.0,
            rel_w in 0.0f64..10.0,
        ) {
            let mut config = WeightConfig::default();
            config.role_weight.insert(r, role_w);
            config.relation_weight.insert("X".to_string(), rel_w);
            let (min_w, max_w) = (config.min_w, config.max_w);
            let model = DiscourseWeightModel::new(config);

            let w = model.weight(r, Some("X"));
            prop_assert!((min_w..=max_w).contains(&w));
        }

        /// Normalized batch weights average to 1.0 for any non-empty batch.
        #[test]
        fn normalized_batch_mean_is_one(
            roles in prop::collection::vec(role(), 1..12)
        ) {
            let model = DiscourseWeightModel::default();
            let edus: Vec<Edu> = roles
                .into_iter()
                .enumerate()
                .map(|(i, r)| Edu::new(format!("e{i}"), "text").with_role(r))
                .collect();

            let weights = model.compute_weights(&edus);
            let mean = weights.values().sum::<f64>() / weights.len() as f64;
            prop_assert!((mean - 1.0).abs() < 1e-9, "mean {} != 1.0", mean);
        }
    }
}
