/// Partnership construction: partner synthesis, house and span resolution.
use tracing::debug;

use crate::core::config::{CourtshipRules, GenerationConfig, PartnerAgeRule, Rules};
use crate::core::dice::{Dice, Draw};
use crate::core::fertility::generate_children;
use crate::core::person_factory::{create_person, sample_death, PersonSeed};
use crate::schema::partnership::{Partnership, PartnershipId};
use crate::schema::person::{Gender, Person, PersonId, Sexuality};
use crate::schema::tree::{FamilyTree, TreeError};

/// Form a union between `initiator` and a newly synthesized partner,
/// starting in `start_year`, and populate it with children.
///
/// `label` is the per-person sequence label (`"L0"`, `"I2"`, ...); the
/// partnership id is the initiator's lineage followed by the label.
pub fn create_partnership<D: Dice + ?Sized>(
    tree: &mut FamilyTree,
    initiator: PersonId,
    start_year: i32,
    legitimate: bool,
    label: &str,
    rules: Rules<'_>,
    dice: &mut D,
) -> Result<PartnershipId, TreeError> {
    let config = rules.config;
    let (id, gender, birth, sexuality, initiator_death) = {
        let person = tree.person(initiator);
        (
            free_partnership_id(tree, format!("{}{}", person.lineage, label)),
            calculate_gender(person, legitimate, dice),
            calculate_birth(start_year, person, &config.partner_age, dice),
            person.sexuality,
            person.death,
        )
    };

    let partner = create_person(
        tree,
        PersonSeed::Partner {
            lineage: id.clone(),
            sexuality,
            force_noble: legitimate,
        },
        birth,
        gender,
        rules,
        dice,
    )?;
    repair_partner_death(tree.person_mut(partner), start_year, initiator_death, config, dice);

    let (house, end) = {
        let a = tree.person(initiator);
        let b = tree.person(partner);
        (
            resolve_house(a, b, &config.commoner_house).to_string(),
            calculate_end(a, b, start_year, legitimate, &config.courtship, dice),
        )
    };

    let union = tree.insert_partnership(Partnership {
        id,
        partner_a: initiator,
        partner_b: partner,
        house,
        begin: start_year,
        end,
        legitimate,
        children: Vec::new(),
    })?;
    tree.link(union);
    generate_children(tree, union, rules, dice)?;

    let u = tree.partnership(union);
    debug!(
        id = %u.id,
        legitimate,
        begin = u.begin,
        end = u.end,
        children = u.children.len(),
        "partnership formed"
    );
    Ok(union)
}

/// Legitimate unions and straight initiators take the opposite gender,
/// homosexual initiators their own, bisexual ones either.
pub fn calculate_gender<D: Dice + ?Sized>(initiator: &Person, legitimate: bool, dice: &mut D) -> Gender {
    if legitimate || initiator.sexuality == Sexuality::Heterosexual {
        return initiator.gender.opposite();
    }
    match initiator.sexuality {
        Sexuality::Homosexual => initiator.gender,
        _ => {
            if dice.roll(Draw::PartnerGender, 0, 1) == 0 {
                Gender::Male
            } else {
                Gender::Female
            }
        }
    }
}

/// Birth year of a partner for someone starting a union in `start_year`.
pub fn calculate_birth<D: Dice + ?Sized>(
    start_year: i32,
    initiator: &Person,
    rule: &PartnerAgeRule,
    dice: &mut D,
) -> i32 {
    let age = initiator.age_in(start_year);
    let lower = (f64::from(age) / 2.0 + f64::from(rule.min_gap)).abs().trunc() as i32;
    let upper = ((age - rule.min_gap) * 2).abs();

    let partner_age = if lower == upper {
        lower
    } else if (upper - lower).abs() > rule.max_span {
        age + dice.roll(Draw::PartnerAge, -rule.jitter, rule.jitter)
    } else {
        dice.roll(Draw::PartnerAge, lower.min(upper), lower.max(upper))
    };
    start_year.saturating_sub(partner_age.abs())
}

/// Marriages end with the first death; affairs last up to
/// `max_affair_years` but never past either death.
pub fn calculate_end<D: Dice + ?Sized>(
    a: &Person,
    b: &Person,
    start_year: i32,
    legitimate: bool,
    rules: &CourtshipRules,
    dice: &mut D,
) -> i32 {
    let first_death = a.death.min(b.death);
    if legitimate {
        first_death
    } else {
        start_year
            .saturating_add(dice.roll(Draw::UnionLength, 0, rules.max_affair_years))
            .min(first_death)
    }
}

/// The initiator's house passes on when they are a noble man or marry a
/// commoner; otherwise the partner's does.
pub fn resolve_house<'a>(initiator: &'a Person, partner: &'a Person, commoner_house: &str) -> &'a str {
    if (initiator.gender == Gender::Male && !initiator.is_commoner(commoner_house))
        || partner.is_commoner(commoner_house)
    {
        &initiator.house
    } else {
        &partner.house
    }
}

// Two initiators may share a lineage path (child 10 of "0L1" and child 0
// of "0L11"); primes keep their union ids apart.
fn free_partnership_id(tree: &FamilyTree, mut id: String) -> String {
    while tree.find_partnership(&id).is_some() {
        id.push('\'');
    }
    id
}

// A partner who dies before the union begins is resampled a few times,
// then pinned to the initiator's death.
fn repair_partner_death<D: Dice + ?Sized>(
    partner: &mut Person,
    start_year: i32,
    initiator_death: i32,
    config: &GenerationConfig,
    dice: &mut D,
) {
    let mut tries = 0;
    while partner.death < start_year {
        if tries == config.partner_death_retries {
            debug!(partner = %partner.id, "partner death pinned to initiator's");
            partner.death = initiator_death;
            break;
        }
        partner.death = sample_death(partner.birth, config, dice);
        tries += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dice::testing::{highest, lowest, ScriptedDice};
    use crate::core::names::NamePools;
    use crate::core::person_factory::create_person;
    use crate::schema::person::Ancestry;

    fn make_person(gender: Gender, sexuality: Sexuality, birth: i32, death: i32) -> Person {
        Person {
            id: "Aric0".to_string(),
            name: "Aric".to_string(),
            lineage: "0".to_string(),
            house: "Ashford".to_string(),
            gender,
            sexuality,
            birth,
            death,
            ancestry: Ancestry::Root,
            partnerships: Vec::new(),
        }
    }

    #[test]
    fn gender_opposite_for_marriage_and_straights() {
        let gay = make_person(Gender::Male, Sexuality::Homosexual, 0, 60);
        let straight = make_person(Gender::Female, Sexuality::Heterosexual, 0, 60);
        assert_eq!(calculate_gender(&gay, true, &mut lowest()), Gender::Female);
        assert_eq!(calculate_gender(&straight, false, &mut lowest()), Gender::Male);
    }

    #[test]
    fn gender_for_affairs_follows_orientation() {
        let gay = make_person(Gender::Male, Sexuality::Homosexual, 0, 60);
        let bi = make_person(Gender::Female, Sexuality::Bisexual, 0, 60);
        assert_eq!(calculate_gender(&gay, false, &mut highest()), Gender::Male);
        assert_eq!(calculate_gender(&bi, false, &mut lowest()), Gender::Male);
        assert_eq!(calculate_gender(&bi, false, &mut highest()), Gender::Female);
    }

    #[test]
    fn partner_age_within_bounds() {
        let rule = PartnerAgeRule::default();
        let p = make_person(Gender::Male, Sexuality::Heterosexual, 0, 80);
        // Age 18: bounds 16..=22.
        assert_eq!(calculate_birth(18, &p, &rule, &mut lowest()), 2);
        assert_eq!(calculate_birth(18, &p, &rule, &mut highest()), -4);
    }

    #[test]
    fn partner_age_exact_when_bounds_meet() {
        let rule = PartnerAgeRule::default();
        let p = make_person(Gender::Male, Sexuality::Heterosexual, 0, 80);
        // Age 14: 14 / 2 + 7 == (14 - 7) * 2.
        let mut dice = lowest();
        assert_eq!(calculate_birth(14, &p, &rule, &mut dice), 0);
        assert_eq!(dice.count(Draw::PartnerAge), 0);
    }

    #[test]
    fn wide_span_jitters_around_own_age() {
        let rule = PartnerAgeRule::default();
        let p = make_person(Gender::Male, Sexuality::Heterosexual, 0, 80);
        // Age 40: bounds 27..=66, span 39 > 20, so 40 +/- 10.
        assert_eq!(calculate_birth(40, &p, &rule, &mut lowest()), 10);
        assert_eq!(calculate_birth(40, &p, &rule, &mut highest()), -10);
    }

    #[test]
    fn marriage_ends_at_first_death() {
        let rules = CourtshipRules::default();
        let a = make_person(Gender::Male, Sexuality::Heterosexual, 0, 60);
        let b = make_person(Gender::Female, Sexuality::Heterosexual, 5, 45);
        assert_eq!(calculate_end(&a, &b, 20, true, &rules, &mut highest()), 45);
    }

    #[test]
    fn affair_capped_by_length_and_death() {
        let rules = CourtshipRules::default();
        let a = make_person(Gender::Male, Sexuality::Heterosexual, 0, 60);
        let b = make_person(Gender::Female, Sexuality::Heterosexual, 5, 45);
        assert_eq!(calculate_end(&a, &b, 20, false, &rules, &mut lowest()), 20);
        assert_eq!(calculate_end(&a, &b, 20, false, &rules, &mut highest()), 40);
        assert_eq!(calculate_end(&a, &b, 30, false, &rules, &mut highest()), 45);
    }

    #[test]
    fn house_rules() {
        let lord = make_person(Gender::Male, Sexuality::Heterosexual, 0, 60);
        let mut lady = make_person(Gender::Female, Sexuality::Heterosexual, 0, 60);
        lady.house = "Frost".to_string();
        assert_eq!(resolve_house(&lord, &lady, "Lowborn"), "Ashford");
        assert_eq!(resolve_house(&lady, &lord, "Lowborn"), "Ashford");

        let mut commoner = lord.clone();
        commoner.house = "Lowborn".to_string();
        assert_eq!(resolve_house(&commoner, &lady, "Lowborn"), "Frost");
        assert_eq!(resolve_house(&lady, &commoner, "Lowborn"), "Frost");
    }

    #[test]
    fn dead_partner_repaired_then_pinned() {
        let config = GenerationConfig::default();
        let mut partner = make_person(Gender::Female, Sexuality::Heterosexual, 0, 10);
        // Every resample hits the first crisis at 30.
        let mut dice = lowest();
        repair_partner_death(&mut partner, 40, 70, &config, &mut dice);
        assert_eq!(partner.death, 70);
        assert_eq!(dice.count(Draw::Lifespan), 4);

        let mut partner = make_person(Gender::Female, Sexuality::Heterosexual, 0, 10);
        repair_partner_death(&mut partner, 20, 70, &config, &mut lowest());
        assert_eq!(partner.death, 30);
    }

    #[test]
    fn clashing_union_ids_get_primes() {
        let mut tree = FamilyTree::new();
        let a = tree
            .insert_person(make_person(Gender::Male, Sexuality::Heterosexual, 0, 60))
            .unwrap();
        tree.insert_partnership(Partnership {
            id: "0L110L0".to_string(),
            partner_a: a,
            partner_b: a,
            house: "Ashford".to_string(),
            begin: 20,
            end: 30,
            legitimate: true,
            children: Vec::new(),
        })
        .unwrap();
        assert_eq!(free_partnership_id(&tree, "0L110L0".to_string()), "0L110L0'");
        assert_eq!(free_partnership_id(&tree, "0L110L1".to_string()), "0L110L1");
    }

    #[test]
    fn create_links_both_partners() {
        let config = GenerationConfig::default();
        let names = NamePools::builtin().unwrap();
        let rules = Rules {
            config: &config,
            names: &names,
        };
        let mut tree = FamilyTree::new();
        let founder = create_person(
            &mut tree,
            PersonSeed::Founder {
                sexuality: Sexuality::Heterosexual,
                force_noble: true,
            },
            0,
            Gender::Male,
            rules,
            &mut lowest(),
        )
        .unwrap();

        // No crises, no births: isolate the union itself.
        let mut dice = ScriptedDice::new(|draw, lo, hi| match draw {
            Draw::Crisis | Draw::Fertility => hi,
            _ => lo,
        });
        let union = create_partnership(&mut tree, founder, 18, true, "L0", rules, &mut dice).unwrap();

        let u = tree.partnership(union);
        assert_eq!(u.id, "0L0");
        assert_eq!(u.partner_a, founder);
        assert_eq!(u.begin, 18);
        assert!(u.legitimate);
        let partner = tree.person(u.partner_b);
        assert_eq!(partner.gender, Gender::Female);
        assert_eq!(partner.birth, 2);
        assert_eq!(partner.ancestry, Ancestry::Partner);
        assert_eq!(partner.lineage, "0L0");
        assert_eq!(u.end, tree.person(founder).death.min(partner.death));
        assert_eq!(tree.person(founder).partnerships, vec![union]);
        assert_eq!(partner.partnerships, vec![union]);
        assert_eq!(u.house, tree.person(founder).house);
    }
}
