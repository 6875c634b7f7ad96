//! Keyword policy mapping free-text reasoning to a stage and weight.
//!
//! The table is a heuristic standing in for the upstream judgment engine's
//! own tagging. It is versioned so a replacement can be swapped in without
//! touching the grouping code.

use crate::reasoning::types::Stage;
use std::fmt;

pub trait ClassificationPolicy {
    fn version(&self) -> &str;

    /// Stage and weight for one reasoning sentence.
    fn classify_text(&self, text: &str) -> (Stage, i32);
}

/// One row: the first row with a matching keyword decides the stage.
pub struct KeywordRule {
    pub stage: Stage,
    pub keywords: &'static [&'static str],
    /// Weight from the lowercased text.
    pub weigh: fn(&str) -> i32,
}

#[derive(Clone, Copy)]
pub struct KeywordPolicy {
    pub version: &'static str,
    pub rules: &'static [KeywordRule],
}

impl fmt::Debug for KeywordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordPolicy")
            .field("version", &self.version)
            .field("rules", &self.rules.len())
            .finish()
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn weigh_radicality(text: &str) -> i32 {
    if contains_any(text, &["not radical", "early", "late"]) {
        -1
    } else {
        1
    }
}

fn weigh_neutral(_: &str) -> i32 {
    0
}

fn weigh_aspect(text: &str) -> i32 {
    if contains_any(text, &["applying", "perfection"]) {
        1
    } else {
        0
    }
}

fn weigh_reception(text: &str) -> i32 {
    if contains_any(text, &["mutual", "positive"]) {
        1
    } else {
        0
    }
}

fn weigh_dignity(text: &str) -> i32 {
    if contains_any(text, &["strong", "exalted"]) {
        1
    } else if contains_any(text, &["weak", "detriment"]) {
        -1
    } else {
        0
    }
}

fn weigh_solar(text: &str) -> i32 {
    if text.contains("cazimi") {
        2
    } else if text.contains("combusted") {
        -1
    } else {
        0
    }
}

fn weigh_timing(_: &str) -> i32 {
    1
}

const KEYWORD_RULES_V1: [KeywordRule; 7] = [
    KeywordRule {
        stage: Stage::Radicality,
        keywords: &["radical"],
        weigh: weigh_radicality,
    },
    KeywordRule {
        stage: Stage::Significators,
        keywords: &["significator"],
        weigh: weigh_neutral,
    },
    KeywordRule {
        stage: Stage::Aspects,
        keywords: &["aspect"],
        weigh: weigh_aspect,
    },
    KeywordRule {
        stage: Stage::Reception,
        keywords: &["reception"],
        weigh: weigh_reception,
    },
    KeywordRule {
        stage: Stage::Dignities,
        keywords: &["dignity"],
        weigh: weigh_dignity,
    },
    KeywordRule {
        stage: Stage::SolarConditions,
        keywords: &["solar", "cazimi", "combusted"],
        weigh: weigh_solar,
    },
    KeywordRule {
        stage: Stage::Timing,
        keywords: &["timing", "perfection"],
        weigh: weigh_timing,
    },
];

pub const KEYWORD_POLICY_V1: KeywordPolicy = KeywordPolicy {
    version: "keywords-v1",
    rules: &KEYWORD_RULES_V1,
};

impl Default for KeywordPolicy {
    fn default() -> Self {
        KEYWORD_POLICY_V1
    }
}

impl ClassificationPolicy for KeywordPolicy {
    fn version(&self) -> &str {
        self.version
    }

    fn classify_text(&self, text: &str) -> (Stage, i32) {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| contains_any(&lower, rule.keywords))
            .map(|rule| (rule.stage, (rule.weigh)(&lower)))
            .unwrap_or((Stage::General, 0))
    }
}
