/// Courtship: forward searches for marriages and affairs over a lifetime.
use crate::core::config::Rules;
use crate::core::dice::{Dice, Draw};
use crate::core::partnership_factory::create_partnership;
use crate::schema::partnership::PartnershipId;
use crate::schema::person::{Gender, PersonId};
use crate::schema::tree::{FamilyTree, TreeError};

/// Run both searches for `person`, marriages first.
pub fn court<D: Dice + ?Sized>(
    tree: &mut FamilyTree,
    person: PersonId,
    rules: Rules<'_>,
    dice: &mut D,
) -> Result<Vec<PartnershipId>, TreeError> {
    let mut formed = search_marriages(tree, person, rules, dice)?;
    formed.extend(search_affairs(tree, person, rules, dice)?);
    Ok(formed)
}

/// Scan forward from `birth + marriage_age`, one draw per year, until
/// death. Each marriage resumes the scan at its end, so marriages never
/// overlap.
///
/// The unmarried accept more readily (draw 0, 2 or 3) than widowers
/// (draw 0 only).
pub fn search_marriages<D: Dice + ?Sized>(
    tree: &mut FamilyTree,
    person: PersonId,
    rules: Rules<'_>,
    dice: &mut D,
) -> Result<Vec<PartnershipId>, TreeError> {
    let courtship = &rules.config.courtship;
    let (birth, death) = {
        let p = tree.person(person);
        (p.birth, p.death)
    };
    let mut next_label = initiated(tree, person, true);
    let mut formed = Vec::new();
    let mut year = birth.saturating_add(rules.config.marriage_age);

    while year < death {
        let draw = dice.roll(Draw::Marriage, 0, courtship.marriage_draw_max);
        let eager = !tree.person(person).is_partnered() && draw / 2 == 1;
        if draw != 0 && !eager {
            year += 1;
            continue;
        }

        let label = format!("L{}", next_label);
        let union = create_partnership(tree, person, year, true, &label, rules, dice)?;
        next_label += 1;
        formed.push(union);
        year = tree.partnership(union).end.max(year + 1);
    }
    Ok(formed)
}

/// A gender-skewed gate decides whether `person` seeks affairs at all;
/// if so they get a budget of lovers and a single pass over the years
/// from `birth + romance_age` to death.
///
/// Unlike marriages the pass does not jump past each affair, so affairs
/// may overlap one another and any marriage.
pub fn search_affairs<D: Dice + ?Sized>(
    tree: &mut FamilyTree,
    person: PersonId,
    rules: Rules<'_>,
    dice: &mut D,
) -> Result<Vec<PartnershipId>, TreeError> {
    let courtship = &rules.config.courtship;
    let (birth, death, gender) = {
        let p = tree.person(person);
        (p.birth, p.death, p.gender)
    };
    let odds = match gender {
        Gender::Male => courtship.male_romance_odds,
        Gender::Female => courtship.female_romance_odds,
    };
    let mut formed = Vec::new();
    if dice.roll(Draw::RomanceGate, 0, odds - 1) != 0 {
        return Ok(formed);
    }

    let mut budget = dice.roll(Draw::RomanceBudget, courtship.min_lovers, courtship.max_lovers);
    let mut next_label = initiated(tree, person, false);

    for year in birth.saturating_add(rules.config.romance_age)..death {
        if budget <= 0 {
            break;
        }
        let partnered = tree.person(person).partnerships.len() as i32;
        let draw_max = (courtship.romance_draw_base - budget + partnered).max(0);
        if dice.roll(Draw::Romance, 0, draw_max) != 0 {
            continue;
        }

        let label = format!("I{}", next_label);
        formed.push(create_partnership(tree, person, year, false, &label, rules, dice)?);
        next_label += 1;
        budget -= 1;
    }
    Ok(formed)
}

/// Number of unions of the given kind `person` already initiated.
fn initiated(tree: &FamilyTree, person: PersonId, legitimate: bool) -> usize {
    tree.person(person)
        .partnerships
        .iter()
        .map(|&u| tree.partnership(u))
        .filter(|u| u.partner_a == person && u.legitimate == legitimate)
        .count()
}
