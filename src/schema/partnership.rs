use serde::{Deserialize, Serialize};

use super::person::PersonId;

/// Arena index of a partnership inside a `FamilyTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartnershipId(pub u32);

/// A union between two people: a marriage when `legitimate`, an affair
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partnership {
    pub id: String,
    /// The partner whose search formed this union.
    pub partner_a: PersonId,
    pub partner_b: PersonId,
    pub house: String,
    pub begin: i32,
    pub end: i32,
    pub legitimate: bool,
    pub children: Vec<PersonId>,
}

impl Partnership {
    pub fn involves(&self, person: PersonId) -> bool {
        self.partner_a == person || self.partner_b == person
    }

    /// The other side of the union, if `person` belongs to it.
    pub fn partner_of(&self, person: PersonId) -> Option<PersonId> {
        if self.partner_a == person {
            Some(self.partner_b)
        } else if self.partner_b == person {
            Some(self.partner_a)
        } else {
            None
        }
    }

    /// Whether `year` falls in the fertile span `[begin, end)`.
    pub fn is_active_in(&self, year: i32) -> bool {
        self.begin <= year && year < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_union() -> Partnership {
        Partnership {
            id: "0L0".to_string(),
            partner_a: PersonId(0),
            partner_b: PersonId(1),
            house: "Vell".to_string(),
            begin: 18,
            end: 40,
            legitimate: true,
            children: Vec::new(),
        }
    }

    #[test]
    fn partner_lookup() {
        let u = make_union();
        assert!(u.involves(PersonId(0)));
        assert!(u.involves(PersonId(1)));
        assert!(!u.involves(PersonId(2)));
        assert_eq!(u.partner_of(PersonId(0)), Some(PersonId(1)));
        assert_eq!(u.partner_of(PersonId(1)), Some(PersonId(0)));
        assert_eq!(u.partner_of(PersonId(7)), None);
    }

    #[test]
    fn active_span_is_half_open() {
        let u = make_union();
        assert!(u.is_active_in(18));
        assert!(u.is_active_in(39));
        assert!(!u.is_active_in(40));
        assert!(!u.is_active_in(17));
    }
}
