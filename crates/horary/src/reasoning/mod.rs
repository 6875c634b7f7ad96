//! Structuring of judgment reasoning into weighted stages.

pub mod classifier;
pub mod policy;
pub mod types;

pub use classifier::{group_by_stage, ReasoningBreakdown, ReasoningClassifier, StageGroup};
pub use policy::{ClassificationPolicy, KeywordPolicy, KeywordRule, KEYWORD_POLICY_V1};
pub use types::{ReasoningInput, ReasoningItem, Stage};
