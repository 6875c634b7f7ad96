use crate::reasoning::policy::{ClassificationPolicy, KeywordPolicy};
use crate::reasoning::types::{ReasoningInput, ReasoningItem, Stage};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageGroup {
    pub stage: Stage,
    pub items: Vec<ReasoningItem>,
    pub total_weight: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasoningBreakdown {
    pub policy_version: String,
    /// Stages in order of first appearance.
    pub stages: Vec<StageGroup>,
    pub total_weight: i32,
}

impl ReasoningBreakdown {
    pub fn stage(&self, stage: Stage) -> Option<&StageGroup> {
        self.stages.iter().find(|g| g.stage == stage)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReasoningClassifier<P = KeywordPolicy> {
    policy: P,
}

impl<P: ClassificationPolicy> ReasoningClassifier<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// Structured entries pass through untouched; text is tagged by the policy.
    pub fn classify(&self, inputs: &[ReasoningInput]) -> Vec<ReasoningItem> {
        inputs
            .iter()
            .map(|input| match input {
                ReasoningInput::Structured(item) => item.clone(),
                ReasoningInput::Text(text) => {
                    let (stage, weight) = self.policy.classify_text(text);
                    ReasoningItem {
                        stage,
                        rule: text.clone(),
                        weight,
                    }
                }
            })
            .collect()
    }

    pub fn breakdown(&self, inputs: &[ReasoningInput]) -> ReasoningBreakdown {
        let stages = group_by_stage(self.classify(inputs));
        let total_weight = stages.iter().map(|g| g.total_weight).sum();
        ReasoningBreakdown {
            policy_version: self.policy.version().to_string(),
            stages,
            total_weight,
        }
    }
}

/// Group keeping first-seen stage order and input order within a stage.
pub fn group_by_stage(items: Vec<ReasoningItem>) -> Vec<StageGroup> {
    let mut groups: Vec<StageGroup> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.stage == item.stage) {
            Some(group) => {
                group.total_weight += item.weight;
                group.items.push(item);
            }
            None => groups.push(StageGroup {
                stage: item.stage,
                total_weight: item.weight,
                items: vec![item],
            }),
        }
    }
    groups
}
