use serde::{Deserialize, Serialize};

use super::partnership::PartnershipId;

/// Arena index of a person inside a `FamilyTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Row code: 0 for male, 1 for female.
    pub fn code(&self) -> u8 {
        match self {
            Self::Male => 0,
            Self::Female => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Male),
            1 => Some(Self::Female),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Sexuality {
    #[default]
    Heterosexual,
    Bisexual,
    Homosexual,
}

impl Sexuality {
    /// Row code: 0 heterosexual, 1 bisexual, 2 homosexual.
    pub fn code(&self) -> u8 {
        match self {
            Self::Heterosexual => 0,
            Self::Bisexual => 1,
            Self::Homosexual => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Heterosexual),
            1 => Some(Self::Bisexual),
            2 => Some(Self::Homosexual),
            _ => None,
        }
    }
}

/// Where a person came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ancestry {
    /// Founding ancestor with no recorded parents.
    Root,
    /// Synthesized spouse or lover; no parents are recorded.
    Partner,
    /// Born from a partnership, at `birth_order` among its children.
    Child {
        partnership: PartnershipId,
        birth_order: u32,
    },
}

/// An individual in the family tree.
///
/// Created once and never removed; the only mutation after creation is
/// appending to `partnerships`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    /// Id suffix after the given name, encoding the ancestry path.
    pub lineage: String,
    pub house: String,
    pub gender: Gender,
    pub sexuality: Sexuality,
    pub birth: i32,
    pub death: i32,
    pub ancestry: Ancestry,
    pub partnerships: Vec<PartnershipId>,
}

impl Person {
    /// Age reached in `year`, negative before birth.
    pub fn age_in(&self, year: i32) -> i32 {
        year - self.birth
    }

    pub fn is_alive_in(&self, year: i32) -> bool {
        self.birth <= year && year <= self.death
    }

    pub fn is_partnered(&self) -> bool {
        !self.partnerships.is_empty()
    }

    pub fn is_commoner(&self, commoner_house: &str) -> bool {
        self.house == commoner_house
    }

    pub fn parent_partnership(&self) -> Option<PartnershipId> {
        match self.ancestry {
            Ancestry::Child { partnership, .. } => Some(partnership),
            _ => None,
        }
    }
}
