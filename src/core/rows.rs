/// Row format: flat person and partnership records for CSV/SQL exchange.
use std::io::{BufRead, Write};
use thiserror::Error;

use crate::core::partnership_factory::resolve_house;
use crate::schema::partnership::Partnership;
use crate::schema::person::{Ancestry, Gender, Person, Sexuality};
use crate::schema::tree::{FamilyTree, TreeError};

pub const HEADER: [&str; 8] = [
    "ID",
    "name",
    "house",
    "gender",
    "sexuality",
    "DOB",
    "DOD",
    "ParentsID",
];

const ROOT_MARKER: &str = "TRUE";
const PARTNER_MARKER: &str = "FALSE";

#[derive(Debug, Error)]
pub enum RowError {
    #[error("record {record}: expected 6 or 8 fields, found {found}")]
    FieldCount { record: usize, found: usize },
    #[error("record {record}: field '{field}' is not an integer: '{value}'")]
    BadInteger {
        record: usize,
        field: &'static str,
        value: String,
    },
    #[error("record {record}: invalid {field} code '{value}'")]
    BadCode {
        record: usize,
        field: &'static str,
        value: String,
    },
    #[error("record {record}: legitimacy must be True or False, found '{value}'")]
    BadFlag { record: usize, value: String },
    #[error("record {record}: unknown partnership '{id}'")]
    UnknownPartnership { record: usize, id: String },
    #[error("record {record}: unknown person '{id}'")]
    UnknownPerson { record: usize, id: String },
    #[error("record {record}: partner '{id}' belongs to no partnership")]
    UnclaimedPartner { record: usize, id: String },
    #[error("record {record}: unterminated quoted field")]
    Unterminated { record: usize },
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a person row names its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AncestryMarker {
    Root,
    Partner,
    Parents(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRow {
    pub id: String,
    pub name: String,
    pub house: String,
    pub gender: Gender,
    pub sexuality: Sexuality,
    pub birth: i32,
    pub death: i32,
    pub ancestry: AncestryMarker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnershipRow {
    pub id: String,
    pub partner_a: String,
    pub partner_b: String,
    pub begin: i32,
    pub end: i32,
    pub legitimate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Person(PersonRow),
    Partnership(PartnershipRow),
}

impl Row {
    pub fn fields(&self) -> Vec<String> {
        match self {
            Row::Person(p) => vec![
                p.id.clone(),
                p.name.clone(),
                p.house.clone(),
                p.gender.code().to_string(),
                p.sexuality.code().to_string(),
                p.birth.to_string(),
                p.death.to_string(),
                match &p.ancestry {
                    AncestryMarker::Root => ROOT_MARKER.to_string(),
                    AncestryMarker::Partner => PARTNER_MARKER.to_string(),
                    AncestryMarker::Parents(id) => id.clone(),
                },
            ],
            Row::Partnership(u) => vec![
                u.id.clone(),
                u.partner_a.clone(),
                u.partner_b.clone(),
                u.begin.to_string(),
                u.end.to_string(),
                if u.legitimate { "True" } else { "False" }.to_string(),
            ],
        }
    }

    /// Classify a record by width: six fields make a partnership row and
    /// eight a person row.
    pub fn parse(record: usize, fields: &[&str]) -> Result<Row, RowError> {
        match fields.len() {
            6 => Ok(Row::Partnership(PartnershipRow {
                id: fields[0].to_string(),
                partner_a: fields[1].to_string(),
                partner_b: fields[2].to_string(),
                begin: parse_int(record, "begin", fields[3])?,
                end: parse_int(record, "end", fields[4])?,
                legitimate: parse_flag(record, fields[5])?,
            })),
            8 => {
                let gender = parse_code(record, "gender", fields[3], Gender::from_code)?;
                let sexuality = parse_code(record, "sexuality", fields[4], Sexuality::from_code)?;
                let ancestry = match fields[7] {
                    ROOT_MARKER => AncestryMarker::Root,
                    PARTNER_MARKER => AncestryMarker::Partner,
                    id => AncestryMarker::Parents(id.to_string()),
                };
                Ok(Row::Person(PersonRow {
                    id: fields[0].to_string(),
                    name: fields[1].to_string(),
                    house: fields[2].to_string(),
                    gender,
                    sexuality,
                    birth: parse_int(record, "DOB", fields[5])?,
                    death: parse_int(record, "DOD", fields[6])?,
                    ancestry,
                }))
            }
            found => Err(RowError::FieldCount { record, found }),
        }
    }
}

fn parse_int(record: usize, field: &'static str, value: &str) -> Result<i32, RowError> {
    value.trim().parse().map_err(|_| RowError::BadInteger {
        record,
        field,
        value: value.to_string(),
    })
}

fn parse_code<T>(
    record: usize,
    field: &'static str,
    value: &str,
    decode: fn(u8) -> Option<T>,
) -> Result<T, RowError> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(decode)
        .ok_or_else(|| RowError::BadCode {
            record,
            field,
            value: value.to_string(),
        })
}

fn parse_flag(record: usize, value: &str) -> Result<bool, RowError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(RowError::BadFlag {
            record,
            value: value.to_string(),
        }),
    }
}

fn person_row(tree: &FamilyTree, person: &Person) -> PersonRow {
    PersonRow {
        id: person.id.clone(),
        name: person.name.clone(),
        house: person.house.clone(),
        gender: person.gender,
        sexuality: person.sexuality,
        birth: person.birth,
        death: person.death,
        ancestry: match person.ancestry {
            Ancestry::Root => AncestryMarker::Root,
            Ancestry::Partner => AncestryMarker::Partner,
            Ancestry::Child { partnership, .. } => {
                AncestryMarker::Parents(tree.partnership(partnership).id.clone())
            }
        },
    }
}

/// Flatten a tree into rows.
///
/// Each blood member follows their predecessors in tree order, and each
/// union they initiated follows them as a partner row then a
/// partnership row, so every reference points backwards.
pub fn export_rows(tree: &FamilyTree) -> Vec<Row> {
    let mut rows = Vec::new();
    for (id, person) in tree.people() {
        if person.ancestry == Ancestry::Partner {
            continue;
        }
        rows.push(Row::Person(person_row(tree, person)));

        for &union in &person.partnerships {
            let u = tree.partnership(union);
            if u.partner_a != id {
                continue;
            }
            let partner = tree.person(u.partner_b);
            if partner.ancestry == Ancestry::Partner {
                rows.push(Row::Person(person_row(tree, partner)));
            }
            rows.push(Row::Partnership(PartnershipRow {
                id: u.id.clone(),
                partner_a: person.id.clone(),
                partner_b: partner.id.clone(),
                begin: u.begin,
                end: u.end,
                legitimate: u.legitimate,
            }));
        }
    }
    rows
}

/// Rebuild a tree from rows. Union houses are re-derived from the
/// partners with `commoner_house` as the commoner marker.
pub fn import_rows<I>(rows: I, commoner_house: &str) -> Result<FamilyTree, RowError>
where
    I: IntoIterator<Item = Row>,
{
    let mut tree = FamilyTree::new();
    let mut partners = Vec::new();
    for (i, row) in rows.into_iter().enumerate() {
        let record = i + 1;
        match row {
            Row::Person(p) => {
                let ancestry = match p.ancestry {
                    AncestryMarker::Root => Ancestry::Root,
                    AncestryMarker::Partner => Ancestry::Partner,
                    AncestryMarker::Parents(ref id) => {
                        let partnership = tree.find_partnership(id).ok_or_else(|| {
                            RowError::UnknownPartnership {
                                record,
                                id: id.clone(),
                            }
                        })?;
                        Ancestry::Child {
                            partnership,
                            birth_order: tree.partnership(partnership).children.len() as u32,
                        }
                    }
                };
                let lineage = p.id.strip_prefix(p.name.as_str()).unwrap_or(&p.id).to_string();
                let person = tree.insert_person(Person {
                    id: p.id,
                    name: p.name,
                    lineage,
                    house: p.house,
                    gender: p.gender,
                    sexuality: p.sexuality,
                    birth: p.birth,
                    death: p.death,
                    ancestry,
                    partnerships: Vec::new(),
                })?;
                match ancestry {
                    Ancestry::Child { partnership, .. } => {
                        tree.partnership_mut(partnership).children.push(person)
                    }
                    Ancestry::Partner => partners.push((record, person)),
                    Ancestry::Root => {}
                }
            }
            Row::Partnership(u) => {
                let find = |id: &str| {
                    tree.find_person(id).ok_or_else(|| RowError::UnknownPerson {
                        record,
                        id: id.to_string(),
                    })
                };
                let a = find(&u.partner_a)?;
                let b = find(&u.partner_b)?;
                let house = resolve_house(tree.person(a), tree.person(b), commoner_house).to_string();
                let union = tree.insert_partnership(Partnership {
                    id: u.id,
                    partner_a: a,
                    partner_b: b,
                    house,
                    begin: u.begin,
                    end: u.end,
                    legitimate: u.legitimate,
                    children: Vec::new(),
                })?;
                tree.link(union);
            }
        }
    }

    if let Some(&(record, person)) = partners.iter().find(|(_, p)| !tree.person(*p).is_partnered()) {
        return Err(RowError::UnclaimedPartner {
            record,
            id: tree.person(person).id.clone(),
        });
    }
    Ok(tree)
}

/// Write the tree as CSV with a header line.
pub fn write_csv<W: Write>(tree: &FamilyTree, mut out: W) -> Result<(), RowError> {
    writeln!(out, "{}", HEADER.join(","))?;
    for row in export_rows(tree) {
        let fields: Vec<String> = row.fields().iter().map(|f| quote(f)).collect();
        writeln!(out, "{}", fields.join(","))?;
    }
    out.flush()?;
    Ok(())
}

/// Read a CSV written by [`write_csv`]. The first line is a header;
/// lines whose first field is empty are skipped.
pub fn read_csv<R: BufRead>(input: R, commoner_house: &str) -> Result<FamilyTree, RowError> {
    let mut rows = Vec::new();
    for (i, line) in input.lines().enumerate().skip(1) {
        let line = line?;
        let record = i + 1;
        let fields = split_fields(record, line.trim_end_matches('\r'))?;
        if fields.first().map_or(true, |f| f.is_empty()) {
            continue;
        }
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        rows.push(Row::parse(record, &refs)?);
    }
    import_rows(rows, commoner_house)
}

fn quote(field: &str) -> String {
    if field.contains([',', '"']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn split_fields(record: usize, line: &str) -> Result<Vec<String>, RowError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => quoted = false,
            ('"', false) if current.is_empty() => quoted = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if quoted {
        return Err(RowError::Unterminated { record });
    }
    fields.push(current);
    Ok(fields)
}
