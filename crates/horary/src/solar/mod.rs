pub mod conditions;

pub use conditions::{
    ConditionDisplay, SolarAnalysis, SolarClassifier, SolarCondition, SolarConditionSet, SolarEntry,
};
