/// Generation scheduler: grows a tree one generation at a time.
use tracing::info;

use crate::core::config::Rules;
use crate::core::dice::{Dice, Draw};
use crate::core::marriage::court;
use crate::core::person_factory::{create_person, PersonSeed};
use crate::schema::person::{Gender, Sexuality};
use crate::schema::tree::{FamilyTree, TreeError};

/// A tree holding a single founding ancestor born in `start_year`.
///
/// The founder is heterosexual, to give the line its best chance of
/// continuing, and always of a noble house.
pub fn seed_tree<D: Dice + ?Sized>(
    start_year: i32,
    rules: Rules<'_>,
    dice: &mut D,
) -> Result<FamilyTree, TreeError> {
    let mut tree = FamilyTree::new();
    let gender = if dice.roll(Draw::Gender, 0, 1) == 0 {
        Gender::Male
    } else {
        Gender::Female
    };
    create_person(
        &mut tree,
        PersonSeed::Founder {
            sexuality: Sexuality::Heterosexual,
            force_noble: true,
        },
        start_year,
        gender,
        rules,
        dice,
    )?;
    Ok(tree)
}

/// Run `max_generations` cycles of courtship over the unpartnered.
///
/// Each cycle searches every pending person; the children of the unions
/// formed become the next cycle's pending set and the searched join the
/// settled. Partnered people are never searched again.
pub fn expand<D: Dice + ?Sized>(
    mut tree: FamilyTree,
    max_generations: usize,
    rules: Rules<'_>,
    dice: &mut D,
) -> Result<FamilyTree, TreeError> {
    let (mut settled, mut pending) = tree.split();

    for generation in 1..=max_generations {
        let mut next_pending = Vec::new();
        for &person in &pending {
            for union in court(&mut tree, person, rules, dice)? {
                next_pending.extend(tree.partnership(union).children.iter().copied());
            }
        }

        info!(
            generation,
            searched = pending.len(),
            born = next_pending.len(),
            "generation expanded"
        );
        settled.append(&mut pending);
        pending = next_pending;
    }

    info!(
        settled = settled.len(),
        pending = pending.len(),
        people = tree.person_count(),
        partnerships = tree.partnership_count(),
        "tree expanded"
    );
    Ok(tree)
}
