/// Name pools: given names by gender and noble house names.
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::dice::{Dice, Draw};
use crate::schema::person::Gender;

const DEFAULT_POOLS: &str = include_str!("../../data/names.ron");

#[derive(Debug, Error)]
pub enum NameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("name pool '{0}' is empty")]
    EmptyPool(&'static str),
}

/// Fixed pools the generator draws names from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamePools {
    pub male: Vec<String>,
    pub female: Vec<String>,
    pub houses: Vec<String>,
}

impl NamePools {
    /// The pools shipped with the crate.
    pub fn builtin() -> Result<NamePools, NameError> {
        Self::parse_ron(DEFAULT_POOLS)
    }

    pub fn load_from_ron(path: &Path) -> Result<NamePools, NameError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<NamePools, NameError> {
        let pools: NamePools = ron::from_str(input)?;
        if pools.male.is_empty() {
            return Err(NameError::EmptyPool("male"));
        }
        if pools.female.is_empty() {
            return Err(NameError::EmptyPool("female"));
        }
        if pools.houses.is_empty() {
            return Err(NameError::EmptyPool("houses"));
        }
        Ok(pools)
    }

    pub fn given_name<D: Dice + ?Sized>(&self, gender: Gender, dice: &mut D) -> String {
        let pool = match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        };
        pool[dice.pick(Draw::GivenName, pool.len())].clone()
    }

    pub fn house_name<D: Dice + ?Sized>(&self, dice: &mut D) -> String {
        self.houses[dice.pick(Draw::HouseName, self.houses.len())].clone()
    }
}
