//! One-shot derivation of everything the presentation layer shows for a
//! chart snapshot.

use crate::aspects::{AspectCalculator, AspectDetail};
use crate::chart::general::{planetary_time, PlanetaryTime};
use crate::chart::houses::house_rulers;
use crate::chart::types::{Chart, Planet};
use crate::config::HoraryConfig;
use crate::layout::geometry::{WheelGeometry, WheelLayout};
use crate::moon::{FutureAspectEvent, FutureAspectProjector, MoonStory, MoonStoryBuilder, VoidDetector, VoidStatus};
use crate::reasoning::{ReasoningBreakdown, ReasoningClassifier, ReasoningInput};
use crate::solar::{SolarAnalysis, SolarClassifier, SolarConditionSet};
use crate::western::{DignityScorer, PlanetDignity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Side of the square the wheel is laid out in.
pub const WHEEL_SIZE: f64 = 500.0;

#[derive(Debug, Clone, Serialize)]
pub struct DerivedChart {
    pub chart_id: Uuid,
    pub dignities: Vec<PlanetDignity>,
    pub solar_analyses: Vec<SolarAnalysis>,
    /// Supplied set when the snapshot carried one, otherwise computed.
    pub solar_conditions: Option<SolarConditionSet>,
    pub aspects: Vec<AspectDetail>,
    pub void_of_course: Option<VoidStatus>,
    pub moon_story: Option<MoonStory>,
    pub future_aspects: Vec<FutureAspectEvent>,
    pub reasoning: ReasoningBreakdown,
    pub house_rulers: Option<Vec<Planet>>,
    pub planetary_time: Option<PlanetaryTime>,
    pub geometry: WheelGeometry,
}

impl DerivedChart {
    pub fn dignity(&self, planet: Planet) -> Option<&PlanetDignity> {
        self.dignities.iter().find(|d| d.planet == planet)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HoraryEngine {
    config: HoraryConfig,
    calculator: AspectCalculator,
    solar: SolarClassifier,
    dignity: DignityScorer,
    void: VoidDetector,
    projector: FutureAspectProjector,
    reasoning: ReasoningClassifier,
    layout: WheelLayout,
}

impl HoraryEngine {
    pub fn new(config: HoraryConfig) -> Self {
        Self {
            calculator: AspectCalculator::new(config.orbs.clone()),
            solar: SolarClassifier::new(config.solar.clone()),
            dignity: DignityScorer::new(config.dignity.clone()),
            void: VoidDetector::new(config.moon.clone()),
            projector: FutureAspectProjector::from_config(&config.moon),
            reasoning: ReasoningClassifier::default(),
            layout: WheelLayout::new(config.wheel.clone()),
            config,
        }
    }

    pub fn config(&self) -> &HoraryConfig {
        &self.config
    }

    pub fn calculator(&self) -> &AspectCalculator {
        &self.calculator
    }

    /// Derive the full state. `now` anchors projected dates; without it
    /// future aspects are empty and aspect dates are omitted.
    pub fn derive(
        &self,
        chart: &Chart,
        reasoning: &[ReasoningInput],
        now: Option<DateTime<Utc>>,
    ) -> DerivedChart {
        log::debug!("deriving chart {} ({} bodies)", chart.id, chart.planets.len());

        let solar_analyses = self.solar.classify_chart(chart);
        let solar_conditions = match &chart.solar_conditions {
            Some(supplied) => Some(supplied.clone()),
            None if chart.sun().is_some() => Some(SolarConditionSet::from_analyses(&solar_analyses)),
            None => None,
        };

        let dignities = chart
            .planets
            .values()
            .map(|p| {
                let solar = solar_analyses.iter().find(|a| a.planet == p.planet);
                self.dignity.assess(p, solar)
            })
            .collect();

        let current = self.calculator.current_aspects(chart);
        let aspects = current
            .iter()
            .map(|a| self.calculator.augment(a, chart, now, &self.config.timing))
            .collect();
        log::debug!("{} aspects in force", current.len());

        let void_of_course = self.void.evaluate(chart, &current);
        let moon_story =
            MoonStoryBuilder::new(&self.calculator, self.config.moon.last_aspect_orb_factor).build(chart);
        let future_aspects = now
            .map(|now| self.projector.project_chart(chart, now))
            .unwrap_or_default();

        DerivedChart {
            chart_id: chart.id,
            dignities,
            solar_analyses,
            solar_conditions,
            aspects,
            void_of_course,
            moon_story,
            future_aspects,
            reasoning: self.reasoning.breakdown(reasoning),
            house_rulers: chart.houses.map(|cusps| house_rulers(&cusps).to_vec()),
            planetary_time: chart.local_time.map(planetary_time),
            geometry: self.layout.build(
                chart,
                &current,
                WHEEL_SIZE / 2.0,
                WHEEL_SIZE / 2.0,
                WHEEL_SIZE / 2.0,
            ),
        }
    }
}
