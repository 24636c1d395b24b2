/// Generation tunables: every constant of the demographic model,
/// loadable from RON.
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::names::NamePools;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A historical year of plague or war with a chance of ending the
/// lives of everyone alive through it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrisisYear {
    pub year: i32,
    /// Percentage (0..=100) of the living who die that year.
    pub death_percent: i32,
}

/// Life-expectancy curve: `age = |slope * u + intercept|` for `u`
/// uniform in `0..=draw_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeCurve {
    pub slope: f64,
    pub intercept: f64,
    pub draw_max: i32,
}

impl Default for LifeCurve {
    fn default() -> Self {
        Self {
            slope: -0.01397,
            intercept: 113.0,
            draw_max: 10_000,
        }
    }
}

/// Yearly fertility, in percent, as a linear function of the mother's age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FertilityModel {
    pub slope: f64,
    pub legitimate_intercept: f64,
    pub illegitimate_intercept: f64,
    /// `percent draw < twin_percent` adds a twin.
    pub twin_percent: i32,
    /// One in `triplet_odds` deliveries without twins brings triplets.
    pub triplet_odds: i32,
}

impl Default for FertilityModel {
    fn default() -> Self {
        Self {
            slope: -3.1943,
            legitimate_intercept: 136.97,
            illegitimate_intercept: 126.97,
            twin_percent: 4,
            triplet_odds: 10_000,
        }
    }
}

impl FertilityModel {
    pub fn chance(&self, mother_age: i32, legitimate: bool) -> f64 {
        let intercept = if legitimate {
            self.legitimate_intercept
        } else {
            self.illegitimate_intercept
        };
        self.slope * f64::from(mother_age) + intercept
    }
}

/// Odds and limits of the marriage and romance searches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtshipRules {
    /// Yearly marriage draw is uniform in `0..=marriage_draw_max`.
    pub marriage_draw_max: i32,
    /// One in `male_romance_odds` men go looking for affairs.
    pub male_romance_odds: i32,
    pub female_romance_odds: i32,
    pub min_lovers: i32,
    pub max_lovers: i32,
    /// Base of the yearly affair draw `0..=(base - budget + partnerships)`.
    pub romance_draw_base: i32,
    pub max_affair_years: i32,
}

impl Default for CourtshipRules {
    fn default() -> Self {
        Self {
            marriage_draw_max: 10,
            male_romance_odds: 5,
            female_romance_odds: 16,
            min_lovers: 1,
            max_lovers: 6,
            romance_draw_base: 30,
            max_affair_years: 20,
        }
    }
}

/// Partner age rule: between `age / 2 + min_gap` and `(age - min_gap) * 2`,
/// or within `jitter` years of the initiator when that span is wider
/// than `max_span`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartnerAgeRule {
    pub min_gap: i32,
    pub max_span: i32,
    pub jitter: i32,
}

impl Default for PartnerAgeRule {
    fn default() -> Self {
        Self {
            min_gap: 7,
            max_span: 20,
            jitter: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub marriage_age: i32,
    pub romance_age: i32,
    pub crisis_years: Vec<CrisisYear>,
    pub life_curve: LifeCurve,
    pub fertility: FertilityModel,
    pub courtship: CourtshipRules,
    pub partner_age: PartnerAgeRule,
    /// Resamples of a partner's death before it is pinned to the
    /// initiator's.
    pub partner_death_retries: u32,
    /// Chance, in percent, that a descendant is bisexual or homosexual.
    pub queer_chance_percent: i32,
    pub commoner_house: String,
    pub root_lineage: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let crisis_years = [(30, 20), (49, 50), (80, 20), (119, 50), (155, 80), (192, 40), (250, 100)]
            .into_iter()
            .map(|(year, death_percent)| CrisisYear {
                year,
                death_percent,
            })
            .collect();
        Self {
            marriage_age: 18,
            romance_age: 16,
            crisis_years,
            life_curve: LifeCurve::default(),
            fertility: FertilityModel::default(),
            courtship: CourtshipRules::default(),
            partner_age: PartnerAgeRule::default(),
            partner_death_retries: 4,
            queer_chance_percent: 10,
            commoner_house: "Lowborn".to_string(),
            root_lineage: "0".to_string(),
        }
    }
}

impl GenerationConfig {
    /// Load a config from a RON file. Missing fields take defaults.
    pub fn load_from_ron(path: &Path) -> Result<GenerationConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<GenerationConfig, ConfigError> {
        let config: GenerationConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.marriage_age < 0 || self.romance_age < 0 {
            return invalid("marriage_age and romance_age must not be negative");
        }
        if self
            .crisis_years
            .iter()
            .any(|c| !(0..=100).contains(&c.death_percent))
        {
            return invalid("crisis death_percent must be within 0..=100");
        }
        if self.life_curve.draw_max < 0 {
            return invalid("life_curve.draw_max must not be negative");
        }
        if self.fertility.triplet_odds < 1 {
            return invalid("fertility.triplet_odds must be at least 1");
        }
        let c = &self.courtship;
        if c.marriage_draw_max < 0 || c.male_romance_odds < 1 || c.female_romance_odds < 1 {
            return invalid("courtship odds must be positive");
        }
        if c.min_lovers < 0 || c.max_lovers < c.min_lovers {
            return invalid("courtship lover range must satisfy 0 <= min <= max");
        }
        if c.max_affair_years < 0 {
            return invalid("courtship.max_affair_years must not be negative");
        }
        if !(0..=100).contains(&self.queer_chance_percent) {
            return invalid("queer_chance_percent must be within 0..=100");
        }
        if self.commoner_house.is_empty() || self.root_lineage.is_empty() {
            return invalid("commoner_house and root_lineage must not be empty");
        }
        Ok(())
    }
}

/// Everything a generative call reads besides the tree and the dice.
#[derive(Debug, Clone, Copy)]
pub struct Rules<'a> {
    pub config: &'a GenerationConfig,
    pub names: &'a NamePools,
}
