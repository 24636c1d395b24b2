/// Read-only reports: a text summary and Graphviz instructions.
use std::fmt::Write;

use crate::schema::person::{Gender, Person};
use crate::schema::tree::FamilyTree;

fn line(person: &Person) -> String {
    format!("{} {} {} {}", person.name, person.house, person.birth, person.death)
}

/// Every person who initiated a union, each followed by their partners
/// and the children they share. A lone founder is listed on their own.
pub fn summary(tree: &FamilyTree) -> String {
    let mut out = String::from("DISPLAY FAMILY TREE\n");
    if tree.person_count() == 1 {
        if let Some((_, founder)) = tree.people().next() {
            let _ = writeln!(out, "\n{}", line(founder));
        }
        return out;
    }

    for (id, person) in tree.people() {
        let initiated: Vec<_> = person
            .partnerships
            .iter()
            .map(|&u| tree.partnership(u))
            .filter(|u| u.partner_a == id)
            .collect();
        if initiated.is_empty() {
            continue;
        }

        let _ = writeln!(out, "\n{}", line(person));
        for union in initiated {
            let _ = writeln!(out, " Partner: {}", line(tree.person(union.partner_b)));
            if union.children.is_empty() {
                continue;
            }
            out.push_str(" Kids:\n");
            for &child in &union.children {
                let _ = writeln!(out, "  {}", line(tree.person(child)));
            }
        }
    }
    out
}

// Body of a double-quoted DOT string.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A `digraph` drawing each person as a box, each union as a junction
/// between the partners, and each brood as a rank of child junctions.
pub fn graphviz(tree: &FamilyTree) -> String {
    let mut out = String::from("digraph {\nnode [shape=box];\nedge [dir=none];\n");

    for (_, person) in tree.people() {
        let colour = match person.gender {
            Gender::Male => "azure2",
            Gender::Female => "bisque",
        };
        let _ = writeln!(
            out,
            "\"{}\" [label=\"{} {}\\n{} † {}\",style=filled,fillcolor={}];",
            escape(&person.id),
            escape(&person.name),
            escape(&person.house),
            person.birth,
            person.death,
            colour
        );
    }

    for (i, (_, union)) in tree.partnerships().enumerate() {
        let junction = format!("h{}", i);
        let a = escape(&tree.person(union.partner_a).id);
        let b = escape(&tree.person(union.partner_b).id);
        let _ = writeln!(out, "{{ rank=same;");
        let _ = writeln!(out, "\"{}\" -> {} -> \"{}\";", a, junction, b);
        let _ = writeln!(out, "{}[shape=circle,label=\"\",height=0.01,width=0.01];}}", junction);

        if union.children.is_empty() {
            continue;
        }
        let kids: Vec<String> = (0..union.children.len())
            .map(|j| format!("{}_{}", junction, j))
            .collect();
        let _ = writeln!(out, "{{ rank=same;");
        let _ = writeln!(out, "{};", kids.join("->"));
        for kid in &kids {
            let _ = writeln!(out, "{}[shape=circle,label=\"\",height=0.01,width=0.01];", kid);
        }
        out.push_str("}\n");
        let _ = writeln!(out, "{} -> {};", junction, kids[0]);
        for (kid, &child) in kids.iter().zip(&union.children) {
            let _ = writeln!(out, "{} -> \"{}\";", kid, escape(&tree.person(child).id));
        }
    }

    out.push_str("}\n");
    out
}
