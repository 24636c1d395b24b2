/// Generation integration tests: demographic invariants across seeds.
use pedigree::core::genealogist::Genealogist;
use pedigree::schema::tree::FamilyTree;
use proptest::prelude::*;
use std::collections::HashMap;

fn grow(seed: u64, generations: usize) -> FamilyTree {
    let mut g = Genealogist::builder().seed(seed).build().unwrap();
    g.generate(0, generations).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn nobody_dies_before_birth(seed in any::<u64>(), generations in 0usize..4) {
        let tree = grow(seed, generations);
        for (_, p) in tree.people() {
            prop_assert!(p.birth <= p.death, "{} born {} died {}", p.id, p.birth, p.death);
        }
    }

    #[test]
    fn union_spans_respect_lifetimes(seed in any::<u64>(), generations in 0usize..4) {
        let tree = grow(seed, generations);
        for (_, u) in tree.partnerships() {
            let a = tree.person(u.partner_a);
            let b = tree.person(u.partner_b);
            let first_death = a.death.min(b.death);
            if u.legitimate {
                prop_assert_eq!(u.end, first_death);
            } else {
                prop_assert!(u.begin <= u.end);
                prop_assert!(u.end <= u.begin + 20);
                prop_assert!(u.end <= first_death);
            }
        }
    }

    #[test]
    fn children_born_while_union_lasts(seed in any::<u64>(), generations in 0usize..4) {
        let tree = grow(seed, generations);
        for (_, u) in tree.partnerships() {
            for &c in &u.children {
                let birth = tree.person(c).birth;
                prop_assert!(u.begin <= birth && birth < u.end, "{} born {} outside {}", u.id, birth, u.begin);
            }
        }
    }

    #[test]
    fn one_delivery_per_mother_per_year(seed in any::<u64>(), generations in 0usize..4) {
        let tree = grow(seed, generations);
        let mut deliveries: HashMap<(u32, i32), (u32, usize)> = HashMap::new();
        for (id, u) in tree.partnerships() {
            let Some(mother) = tree.mother_of(id) else {
                prop_assert!(u.children.is_empty());
                continue;
            };
            for &c in &u.children {
                let birth = tree.person(c).birth;
                let entry = deliveries.entry((mother.0, birth)).or_insert((id.0, 0));
                prop_assert_eq!(entry.0, id.0, "mother delivered twice in {}", birth);
                entry.1 += 1;
                prop_assert!(entry.1 <= 3);
            }
        }
    }

    #[test]
    fn short_lives_never_marry(seed in any::<u64>(), generations in 0usize..4) {
        let tree = grow(seed, generations);
        for (id, u) in tree.partnerships() {
            if !u.legitimate {
                continue;
            }
            let initiator = tree.person(u.partner_a);
            prop_assert!(initiator.death >= initiator.birth + 18, "{:?} married while too young", id);
            prop_assert!(u.begin >= initiator.birth + 18);
        }
    }

    #[test]
    fn zero_generations_is_identity(seed in any::<u64>()) {
        let mut g = Genealogist::builder().seed(seed).build().unwrap();
        let tree = g.seed_tree(0).unwrap();
        let before: Vec<_> = tree.people().map(|(_, p)| (p.id.clone(), p.birth, p.death)).collect();
        let tree = g.expand(tree, 0).unwrap();
        let after: Vec<_> = tree.people().map(|(_, p)| (p.id.clone(), p.birth, p.death)).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(tree.partnership_count(), 0);
    }
}

#[test]
fn ids_are_unique_and_linked_both_ways() {
    let tree = grow(2024, 4);
    for (id, u) in tree.partnerships() {
        assert_eq!(tree.find_partnership(&u.id), Some(id));
        assert!(tree.person(u.partner_a).partnerships.contains(&id));
        assert!(tree.person(u.partner_b).partnerships.contains(&id));
        for &c in &u.children {
            assert_eq!(tree.person(c).parent_partnership(), Some(id));
        }
    }
    for (id, p) in tree.people() {
        assert_eq!(tree.find_person(&p.id), Some(id));
    }
}

#[test]
fn descendants_carry_their_lineage() {
    let tree = grow(77, 3);
    for (_, u) in tree.partnerships() {
        let initiator = tree.person(u.partner_a);
        assert!(u.id.starts_with(&initiator.lineage));
        for (order, &c) in u.children.iter().enumerate() {
            let child = tree.person(c);
            assert!(child.lineage.starts_with(&format!("{}{}", u.id, order)));
            assert_eq!(child.house, u.house);
        }
    }
}
