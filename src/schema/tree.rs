/// Family tree arena: owns every person and partnership.
use rustc_hash::FxHashMap;
use thiserror::Error;

use super::partnership::{Partnership, PartnershipId};
use super::person::{Ancestry, Gender, Person, PersonId};

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("duplicate person id: {0}")]
    DuplicatePerson(String),
    #[error("duplicate partnership id: {0}")]
    DuplicatePartnership(String),
}

/// Arena of people and partnerships keyed by id.
///
/// Both sides of every relation hold only arena ids; ownership lives
/// here. Insertion order is kept so exports are deterministic.
#[derive(Debug, Clone, Default)]
pub struct FamilyTree {
    people: Vec<Person>,
    partnerships: Vec<Partnership>,
    person_labels: FxHashMap<String, PersonId>,
    partnership_labels: FxHashMap<String, PartnershipId>,
}

impl FamilyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_person(&mut self, person: Person) -> Result<PersonId, TreeError> {
        if self.person_labels.contains_key(&person.id) {
            return Err(TreeError::DuplicatePerson(person.id));
        }
        let id = PersonId(self.people.len() as u32);
        self.person_labels.insert(person.id.clone(), id);
        self.people.push(person);
        Ok(id)
    }

    pub fn insert_partnership(
        &mut self,
        partnership: Partnership,
    ) -> Result<PartnershipId, TreeError> {
        if self.partnership_labels.contains_key(&partnership.id) {
            return Err(TreeError::DuplicatePartnership(partnership.id));
        }
        let id = PartnershipId(self.partnerships.len() as u32);
        self.partnership_labels.insert(partnership.id.clone(), id);
        self.partnerships.push(partnership);
        Ok(id)
    }

    /// Register a partnership on both of its partners.
    pub fn link(&mut self, id: PartnershipId) {
        let (a, b) = {
            let u = self.partnership(id);
            (u.partner_a, u.partner_b)
        };
        self.person_mut(a).partnerships.push(id);
        if b != a {
            self.person_mut(b).partnerships.push(id);
        }
    }

    /// Panics if `id` was not issued by this tree.
    pub fn person(&self, id: PersonId) -> &Person {
        &self.people[id.0 as usize]
    }

    pub fn person_mut(&mut self, id: PersonId) -> &mut Person {
        &mut self.people[id.0 as usize]
    }

    /// Panics if `id` was not issued by this tree.
    pub fn partnership(&self, id: PartnershipId) -> &Partnership {
        &self.partnerships[id.0 as usize]
    }

    pub fn partnership_mut(&mut self, id: PartnershipId) -> &mut Partnership {
        &mut self.partnerships[id.0 as usize]
    }

    pub fn find_person(&self, label: &str) -> Option<PersonId> {
        self.person_labels.get(label).copied()
    }

    pub fn find_partnership(&self, label: &str) -> Option<PartnershipId> {
        self.partnership_labels.get(label).copied()
    }

    pub fn contains_person_label(&self, label: &str) -> bool {
        self.person_labels.contains_key(label)
    }

    pub fn people(&self) -> impl Iterator<Item = (PersonId, &Person)> {
        self.people
            .iter()
            .enumerate()
            .map(|(i, p)| (PersonId(i as u32), p))
    }

    pub fn partnerships(&self) -> impl Iterator<Item = (PartnershipId, &Partnership)> {
        self.partnerships
            .iter()
            .enumerate()
            .map(|(i, u)| (PartnershipId(i as u32), u))
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub fn partnership_count(&self) -> usize {
        self.partnerships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// The female partner of an opposite-gender union.
    pub fn mother_of(&self, id: PartnershipId) -> Option<PersonId> {
        let u = self.partnership(id);
        let a = self.person(u.partner_a);
        let b = self.person(u.partner_b);
        match (a.gender, b.gender) {
            (Gender::Female, Gender::Male) => Some(u.partner_a),
            (Gender::Male, Gender::Female) => Some(u.partner_b),
            _ => None,
        }
    }

    /// Whether `mother` already has a child born in `year` from any of
    /// her partnerships.
    pub fn has_birth_in(&self, mother: PersonId, year: i32) -> bool {
        self.person(mother).partnerships.iter().any(|&u| {
            self.partnership(u)
                .children
                .iter()
                .any(|&c| self.person(c).birth == year)
        })
    }

    /// Children of every partnership `person` belongs to.
    pub fn children_of(&self, person: PersonId) -> Vec<PersonId> {
        self.person(person)
            .partnerships
            .iter()
            .flat_map(|&u| self.partnership(u).children.iter().copied())
            .collect()
    }

    /// Split into (settled, pending). Pending are blood members with no
    /// partnerships; partners are never searched, so they always settle.
    pub fn split(&self) -> (Vec<PersonId>, Vec<PersonId>) {
        self.people()
            .map(|(id, p)| (id, p.is_partnered() || p.ancestry == Ancestry::Partner))
            .fold(
                (Vec::new(), Vec::new()),
                |(mut settled, mut pending), (id, settled_already)| {
                    if settled_already {
                        settled.push(id);
                    } else {
                        pending.push(id);
                    }
                    (settled, pending)
                },
            )
    }
}
