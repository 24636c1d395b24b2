/// Fertility: yearly births over a partnership's active span.
use tracing::trace;

use crate::core::config::{FertilityModel, Rules};
use crate::core::dice::{Dice, Draw};
use crate::core::person_factory::{create_person, PersonSeed};
use crate::schema::partnership::PartnershipId;
use crate::schema::person::Gender;
use crate::schema::tree::{FamilyTree, TreeError};

/// Walk every year in `[begin, end)` of the union and add the children
/// born in it. Same-gender unions have none.
///
/// A mother who already delivered in a year, through any of her
/// partnerships, cannot deliver again that year.
pub fn generate_children<D: Dice + ?Sized>(
    tree: &mut FamilyTree,
    union: PartnershipId,
    rules: Rules<'_>,
    dice: &mut D,
) -> Result<(), TreeError> {
    let Some(mother) = tree.mother_of(union) else {
        return Ok(());
    };
    let model = &rules.config.fertility;
    let (begin, end, legitimate) = {
        let u = tree.partnership(union);
        (u.begin, u.end, u.legitimate)
    };
    let mother_birth = tree.person(mother).birth;
    let mut birth_order = tree.partnership(union).children.len() as u32;

    for year in begin..end {
        let chance = if tree.has_birth_in(mother, year) {
            0.0
        } else {
            model.chance(year - mother_birth, legitimate)
        };
        if chance <= f64::from(dice.percent(Draw::Fertility)) {
            continue;
        }

        let size = delivery_size(model, dice);
        for _ in 0..size {
            let gender = if dice.roll(Draw::Gender, 0, 1) == 0 {
                Gender::Male
            } else {
                Gender::Female
            };
            let child = create_person(
                tree,
                PersonSeed::ChildOf {
                    partnership: union,
                    birth_order,
                },
                year,
                gender,
                rules,
                dice,
            )?;
            tree.partnership_mut(union).children.push(child);
            birth_order += 1;
        }
        trace!(union = %tree.partnership(union).id, year, size, "birth");
    }
    Ok(())
}

/// Children in one delivery: twins or, more rarely, triplets.
pub fn delivery_size<D: Dice + ?Sized>(model: &FertilityModel, dice: &mut D) -> u32 {
    if dice.percent(Draw::Twins) < model.twin_percent {
        2
    } else if dice.roll(Draw::Triplets, 0, model.triplet_odds - 1) == 0 {
        3
    } else {
        1
    }
}
