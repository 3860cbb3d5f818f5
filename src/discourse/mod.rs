//! Discourse structure: EDU types, segmentation-tree input and the
//! role/relation weight model.

pub mod tree;
pub mod types;
pub mod weights;

#[cfg(test)]
mod proptest;

pub use tree::{SegmentNode, SegmentTree};
pub use types::{Edu, EduId, EduRole, GoldLabel};
pub use weights::{DiscourseWeightModel, WeightConfig};
