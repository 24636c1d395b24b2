/// Person construction: names, houses, lifespans and ids.
use crate::core::config::{GenerationConfig, Rules};
use crate::core::dice::{Dice, Draw};
use crate::schema::partnership::PartnershipId;
use crate::schema::person::{Ancestry, Gender, Person, PersonId, Sexuality};
use crate::schema::tree::{FamilyTree, TreeError};

/// How a new person enters the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonSeed {
    /// A founding ancestor with no parents.
    Founder {
        sexuality: Sexuality,
        force_noble: bool,
    },
    /// A partner synthesized for the union whose id is `lineage`.
    Partner {
        lineage: String,
        sexuality: Sexuality,
        force_noble: bool,
    },
    /// The `birth_order`-th child of a partnership.
    ChildOf {
        partnership: PartnershipId,
        birth_order: u32,
    },
}

/// Create a person and add them to the tree.
pub fn create_person<D: Dice + ?Sized>(
    tree: &mut FamilyTree,
    seed: PersonSeed,
    birth: i32,
    gender: Gender,
    rules: Rules<'_>,
    dice: &mut D,
) -> Result<PersonId, TreeError> {
    let config = rules.config;
    let name = rules.names.given_name(gender, dice);
    let death = sample_death(birth, config, dice);

    let (lineage, house, sexuality, ancestry) = match seed {
        PersonSeed::Founder {
            sexuality,
            force_noble,
        } => (
            config.root_lineage.clone(),
            generate_house(force_noble, rules, dice),
            sexuality,
            Ancestry::Root,
        ),
        PersonSeed::Partner {
            lineage,
            sexuality,
            force_noble,
        } => (
            lineage,
            generate_house(force_noble, rules, dice),
            sexuality,
            Ancestry::Partner,
        ),
        PersonSeed::ChildOf {
            partnership,
            birth_order,
        } => {
            let parents = tree.partnership(partnership);
            (
                format!("{}{}", parents.id, birth_order),
                parents.house.clone(),
                descendant_sexuality(config, dice),
                Ancestry::Child {
                    partnership,
                    birth_order,
                },
            )
        }
    };

    let lineage = free_lineage(tree, &name, lineage);
    tree.insert_person(Person {
        id: format!("{}{}", name, lineage),
        name,
        lineage,
        house,
        gender,
        sexuality,
        birth,
        death,
        ancestry,
        partnerships: Vec::new(),
    })
}

/// Sample a death year from the life-expectancy curve, then give every
/// crisis the person lives through a chance to end their life early.
pub fn sample_death<D: Dice + ?Sized>(birth: i32, config: &GenerationConfig, dice: &mut D) -> i32 {
    let curve = &config.life_curve;
    let u = dice.roll(Draw::Lifespan, 0, curve.draw_max);
    let age = (curve.slope * f64::from(u) + curve.intercept).trunc().abs() as i32;
    let mut death = birth.saturating_add(age);

    for crisis in &config.crisis_years {
        if birth < crisis.year && crisis.year < death && dice.percent(Draw::Crisis) < crisis.death_percent {
            death = crisis.year;
        }
    }
    death
}

/// A noble house when forced or on a coin flip, the commoner marker otherwise.
pub fn generate_house<D: Dice + ?Sized>(force_noble: bool, rules: Rules<'_>, dice: &mut D) -> String {
    if force_noble || dice.roll(Draw::NobleHouse, 0, 1) == 0 {
        rules.names.house_name(dice)
    } else {
        rules.config.commoner_house.clone()
    }
}

fn descendant_sexuality<D: Dice + ?Sized>(config: &GenerationConfig, dice: &mut D) -> Sexuality {
    if dice.percent(Draw::Sexuality) < config.queer_chance_percent {
        if dice.roll(Draw::Sexuality, 1, 2) == 1 {
            Sexuality::Bisexual
        } else {
            Sexuality::Homosexual
        }
    } else {
        Sexuality::Heterosexual
    }
}

// Lineage paths can collide when a name repeats (a partner of union
// "0L10" and the first child of union "0L1"); primes keep ids unique.
fn free_lineage(tree: &FamilyTree, name: &str, mut lineage: String) -> String {
    while tree.contains_person_label(&format!("{}{}", name, lineage)) {
        lineage.push('\'');
    }
    lineage
}
