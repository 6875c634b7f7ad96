use serde::{Deserialize, Serialize};

/// Stage of a horary judgment, in the order a judgment is usually read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Stage {
    Radicality,
    Significators,
    Aspects,
    Reception,
    Dignities,
    SolarConditions,
    Timing,
    General,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Radicality,
        Stage::Significators,
        Stage::Aspects,
        Stage::Reception,
        Stage::Dignities,
        Stage::SolarConditions,
        Stage::Timing,
        Stage::General,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Radicality => "Radicality",
            Self::Significators => "Significators",
            Self::Aspects => "Aspects",
            Self::Reception => "Reception",
            Self::Dignities => "Dignities",
            Self::SolarConditions => "Solar Conditions",
            Self::Timing => "Timing",
            Self::General => "General",
        }
    }

    /// Parse a stage name, ignoring case, spaces and underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let squash = |s: &str| {
            s.chars()
                .filter(|c| !c.is_whitespace() && *c != '_')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        };
        let wanted = squash(name);
        Self::ALL.into_iter().find(|s| squash(s.name()) == wanted)
    }
}

impl TryFrom<String> for Stage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Stage::from_name(&value).ok_or_else(|| format!("unknown reasoning stage '{}'", value))
    }
}

impl From<Stage> for &'static str {
    fn from(stage: Stage) -> Self {
        stage.name()
    }
}

/// One judgment testimony, with its stage and signed weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReasoningItem {
    pub stage: Stage,
    /// Kept verbatim.
    pub rule: String,
    #[serde(default)]
    pub weight: i32,
}

impl ReasoningItem {
    pub fn new(stage: Stage, rule: impl Into<String>, weight: i32) -> Self {
        Self {
            stage,
            rule: rule.into(),
            weight,
        }
    }
}

/// A reasoning entry as produced upstream: free text or already structured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReasoningInput {
    Structured(ReasoningItem),
    Text(String),
}

impl From<ReasoningItem> for ReasoningInput {
    fn from(item: ReasoningItem) -> Self {
        ReasoningInput::Structured(item)
    }
}

impl From<&str> for ReasoningInput {
    fn from(text: &str) -> Self {
        ReasoningInput::Text(text.to_string())
    }
}
