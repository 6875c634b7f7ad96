use chrono::{TimeZone, Utc};
use horary::chart::{load_chart_from_json, ChartLoadError, Planet};
use horary::moon::NO_APPLYING_REASON;
use horary::reasoning::{ReasoningInput, Stage};
use horary::solar::SolarCondition;
use horary::western::{DignityCategory, ScoreSource};
use horary::{DerivationCache, HoraryConfig, HoraryEngine};

const CHART: &str = include_str!("fixtures/job_question.json");
const REASONING: &str = include_str!("fixtures/reasoning.json");

fn reasoning() -> Vec<ReasoningInput> {
    serde_json::from_str(REASONING).unwrap()
}

#[test]
fn test_fixture_loads() {
    let chart = load_chart_from_json(CHART).unwrap();
    assert_eq!(chart.planets.len(), 7);
    assert!(chart.planet(Planet::Moon).is_some());
    // Moon-Pluto names a body outside the snapshot
    assert_eq!(chart.aspects.as_ref().map(Vec::len), Some(1));
    assert_eq!(chart.moon().unwrap().house, Some(3));
}

#[test]
fn test_derive_fixture() {
    let chart = load_chart_from_json(CHART).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 15, 30, 0).unwrap();
    let derived = HoraryEngine::default().derive(&chart, &reasoning(), Some(now));

    let solar = derived.solar_conditions.as_ref().unwrap();
    assert_eq!(solar.condition_of(Planet::Mercury), Some(SolarCondition::Cazimi));
    assert_eq!(solar.condition_of(Planet::Saturn), Some(SolarCondition::Combusted));
    assert_eq!(solar.condition_of(Planet::Mars), Some(SolarCondition::UnderBeams));
    assert_eq!(solar.condition_of(Planet::Venus), Some(SolarCondition::Free));
    assert_eq!(solar.significant_conditions, 3);

    // only the Sun-Saturn aspect was supplied, so the Moon is void
    let void = derived.void_of_course.as_ref().unwrap();
    assert!(void.is_void);
    assert_eq!(void.reason, NO_APPLYING_REASON);
    assert_eq!(derived.aspects.len(), 1);

    let mercury = derived.dignity(Planet::Mercury).unwrap();
    assert_eq!(mercury.source, ScoreSource::Supplied);
    assert_eq!(mercury.assessment.category, DignityCategory::Poor);
    assert_eq!(derived.dignity(Planet::Moon).unwrap().source, ScoreSource::Computed);

    let rulers = derived.house_rulers.as_ref().unwrap();
    assert_eq!(rulers[0], Planet::Moon);
    let time = derived.planetary_time.unwrap();
    assert_eq!(time.day_ruler, Planet::Venus);

    assert!(!derived.future_aspects.is_empty());
    assert!(derived.future_aspects.len() <= 10);
    assert_eq!(derived.geometry.houses.len(), 12);
}

#[test]
fn test_reasoning_breakdown_from_fixture() {
    let chart = load_chart_from_json(CHART).unwrap();
    let derived = HoraryEngine::default().derive(&chart, &reasoning(), None);
    let b = &derived.reasoning;

    let order: Vec<Stage> = b.stages.iter().map(|g| g.stage).collect();
    assert_eq!(
        order,
        vec![
            Stage::Radicality,
            Stage::Significators,
            Stage::Reception,
            Stage::General,
            Stage::Timing
        ]
    );
    // "significator" is matched before "combusted"
    assert_eq!(b.stage(Stage::Significators).unwrap().total_weight, 0);
    assert_eq!(b.stage(Stage::Reception).unwrap().items[0].rule, "Venus receives the Moon");
    assert_eq!(b.total_weight, 3);
}

#[test]
fn test_supplied_solar_set_wins() {
    let json = r#"{
        "ascendant": 0.0,
        "planets": {
            "Sun": { "longitude": 10.0, "speed": 1.0 },
            "Venus": { "longitude": 40.0, "speed": 1.2 }
        },
        "solar_conditions": { "combusted": ["Venus"] }
    }"#;
    let chart = load_chart_from_json(json).unwrap();
    let derived = HoraryEngine::default().derive(&chart, &[], None);
    let set = derived.solar_conditions.unwrap();
    assert_eq!(set.condition_of(Planet::Venus), Some(SolarCondition::Combusted));
    assert_eq!(derived.solar_analyses[0].condition, SolarCondition::Free);
}

#[test]
fn test_missing_moon_is_not_fatal() {
    let json = r#"{ "ascendant": 0.0, "planets": { "Sun": { "longitude": 10.0 } } }"#;
    let chart = load_chart_from_json(json).unwrap();
    let derived = HoraryEngine::default().derive(&chart, &[], Some(Utc::now()));
    assert!(derived.void_of_course.is_none());
    assert!(derived.moon_story.is_none());
    assert!(derived.future_aspects.is_empty());
}

#[test]
fn test_bad_snapshot_rejected() {
    let missing_asc = r#"{ "planets": { "Sun": { "longitude": 10.0 } } }"#;
    assert!(matches!(
        load_chart_from_json(missing_asc),
        Err(ChartLoadError::MissingField(_))
    ));

    let short_houses = r#"{ "ascendant": 0.0, "houses": [0, 30], "planets": {} }"#;
    assert!(matches!(
        load_chart_from_json(short_houses),
        Err(ChartLoadError::InvalidFieldValue(_))
    ));

    assert!(matches!(
        load_chart_from_json("{"),
        Err(ChartLoadError::InvalidJson(_))
    ));
}

#[test]
fn test_custom_config_flows_through() {
    let config = HoraryConfig::from_toml_str(
        r#"
        [moon]
        void_rule = "by_orb"
        void_orb_deg = 3.0
        projection_max_results = 2
        "#,
    )
    .unwrap();
    let chart = load_chart_from_json(CHART).unwrap();
    let derived = HoraryEngine::new(config).derive(&chart, &[], Some(Utc::now()));
    assert!(derived.future_aspects.len() <= 2);
    assert!(derived.void_of_course.is_some());
}

#[test]
fn test_cache_reuses_derivation() {
    let chart = load_chart_from_json(CHART).unwrap();
    let engine = HoraryEngine::default();
    let cache = DerivationCache::new();
    let a = cache.get_or_derive(&engine, &chart, &reasoning(), None);
    let b = cache.get_or_derive(&engine, &chart, &reasoning(), None);
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[test]
fn test_explicit_empty_aspect_list_keeps_moon_void() {
    let planets = r#"
        "Moon": { "longitude": 97.0, "speed": 13.0 },
        "Venus": { "longitude": 100.0, "speed": 1.0 }
    "#;
    let with_list = format!(r#"{{ "ascendant": 0.0, "aspects": [], "planets": {{ {} }} }}"#, planets);
    let without_list = format!(r#"{{ "ascendant": 0.0, "planets": {{ {} }} }}"#, planets);
    let engine = HoraryEngine::default();

    let supplied = engine.derive(&load_chart_from_json(&with_list).unwrap(), &[], None);
    assert!(supplied.aspects.is_empty());
    assert!(supplied.void_of_course.unwrap().is_void);

    let computed = engine.derive(&load_chart_from_json(&without_list).unwrap(), &[], None);
    assert_eq!(computed.aspects.len(), 1);
    assert!(!computed.void_of_course.unwrap().is_void);
}
