//! Core discourse types.
//!
//! An [`Edu`] (Elementary Discourse Unit) is the unit of hallucination
//! analysis: a clause-level span of generated text carrying a discourse role,
//! an information-gain estimate against the source, and the logical atoms
//! that connect it to the abduction engine.

use serde::{Deserialize, Serialize};

/// Unique identifier for an EDU within a document.
///
/// Ids come from the segmentation step (`"e1"`, `"e2"`, ...) and are the join
/// key between EDUs, decisions, weight maps and hypotheses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EduId(pub String);

impl EduId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EduId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EduId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EduId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Discourse role of an EDU in the rhetorical structure tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EduRole {
    /// Central unit of a rhetorical relation.
    Nucleus,
    /// Supporting unit, depends on its nucleus.
    Satellite,
    /// Role could not be determined.
    #[default]
    Unknown,
}

impl EduRole {
    /// Parse a role label, degrading to [`EduRole::Unknown`] on anything
    /// unrecognized.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "nucleus" => Self::Nucleus,
            "satellite" => Self::Satellite,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for EduRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nucleus => write!(f, "nucleus"),
            Self::Satellite => write!(f, "satellite"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Gold annotation for evaluation datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldLabel {
    /// Annotated as supported by the source.
    Supported,
    /// Annotated as hallucinated.
    Hallucination,
}

/// Elementary Discourse Unit.
///
/// `weight` and `ig` are derived fields: the weight model and the injected IG
/// computer (re)populate them before scoring, and they are treated as
/// immutable within one decision cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edu {
    /// Identifier assigned by the segmentation step.
    pub edu_id: EduId,
    /// The unit's text.
    pub text: String,
    /// Nucleus/satellite role.
    pub role: EduRole,
    /// Rhetorical relation label, e.g. "Evidence", "Cause". Free-form.
    pub relation: Option<String>,
    /// Discourse weight w_i. Defaults to 1.0 until the weight model runs.
    pub weight: f64,
    /// Information gain IG(c_i, S) of this unit against the source.
    pub ig: f64,
    /// Observation atoms usable for abduction (the unit's "symptoms").
    pub symptoms: Vec<String>,
    /// Atom representing the claim to be entailed.
    pub claim_atom: String,
    /// Gold label, if the dataset is annotated.
    pub label: Option<GoldLabel>,
}

impl Edu {
    /// Create an EDU with default weight (1.0) and zero information gain.
    pub fn new<I: Into<EduId>>(edu_id: I, text: impl Into<String>) -> Self {
        Self {
            edu_id: edu_id.into(),
            text: text.into(),
            role: EduRole::Unknown,
            relation: None,
            weight: 1.0,
            ig: 0.0,
            symptoms: Vec::new(),
            claim_atom: String::new(),
            label: None,
        }
    }

    /// Set the discourse role.
    pub fn with_role(mut self, role: EduRole) -> Self {
        self.role = role;
        self
    }

    /// Set the rhetorical relation label.
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    /// Set the information gain.
    pub fn with_ig(mut self, ig: f64) -> Self {
        self.ig = ig;
        self
    }

    /// Set the discourse weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the observation atoms.
    pub fn with_symptoms(mut self, symptoms: Vec<String>) -> Self {
        self.symptoms = symptoms;
        self
    }

    /// Set the claim atom.
    pub fn with_claim_atom(mut self, atom: impl Into<String>) -> Self {
        self.claim_atom = atom.into();
        self
    }

    /// Set the gold label.
    pub fn with_label(mut self, label: GoldLabel) -> Self {
        self.label = Some(label);
        self
    }
}
