use indexmap::IndexMap;
use strum::{Display, EnumString};

use crate::{diag::Warning, error::Error, preprocess::Line};

pub const DATA_MARKER: &str = ".data";
pub const TEXT_MARKER: &str = ".text";

/// What to do when a data label is declared twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Later declaration wins the table slot; both values stay in the list
    #[default]
    Overwrite,
    Reject,
}

/// Data label -> slot index
#[derive(Debug, Default, Clone)]
pub struct DataTable(IndexMap<String, (usize, usize)>);

impl DataTable {
    pub fn get(&self, name: &str) -> Option<usize> {
        self.0.get(name).map(|(slot, _)| *slot)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, (slot, _))| (name.as_str(), *slot))
    }
}

#[derive(Debug, Default, Clone)]
pub struct DataSection {
    pub table: DataTable,
    /// Raw literal per declaration, in declaration order
    pub values: Vec<String>,
}

impl DataSection {
    /// Split the optional leading `.data` section off the statements.
    ///
    /// Returns the section, the `.text` statements and any warnings.
    pub fn extract(
        lines: Vec<Line>,
        policy: DuplicatePolicy,
    ) -> Result<(DataSection, Vec<Line>, Vec<Warning>), Error> {
        let mut section = DataSection::default();
        let mut warnings = vec![];

        let mut iter = lines.into_iter();
        let first = match iter.next() {
            Some(line) => line,
            None => return Ok((section, vec![], warnings)),
        };
        if first.code == TEXT_MARKER {
            return Ok((section, iter.collect(), warnings));
        }
        if first.code != DATA_MARKER {
            let mut text = vec![first];
            text.extend(iter);
            return Ok((section, text, warnings));
        }

        for line in iter.by_ref() {
            if line.code == TEXT_MARKER {
                break;
            }
            let (label, value) = parse_decl(&line)?;
            let slot = section.values.len();
            if let Some((_, prev)) = section.table.0.insert(label.clone(), (slot, line.idx)) {
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(Error::RedefinedData {
                            line: line.idx,
                            label,
                        })
                    }
                    DuplicatePolicy::Overwrite => warnings.push(
                        Warning::new(line.idx, format!("Re-defined data label: `{}`", label))
                            .with_note(
                                prev,
                                format!("Already defined here. `{}` now refers to slot {}.", label, slot),
                            ),
                    ),
                }
            }
            section.values.push(value);
        }

        Ok((section, iter.collect(), warnings))
    }
}

// label: value
fn parse_decl(line: &Line) -> Result<(String, String), Error> {
    let malformed = || Error::MalformedData {
        line: line.idx,
        text: line.code.clone(),
    };
    let (label, rest) = line.code.split_once(':').ok_or_else(malformed)?;
    let label = label.trim();
    let value = rest.split_whitespace().next().ok_or_else(malformed)?;
    if label.is_empty() {
        return Err(malformed());
    }
    Ok((label.to_string(), value.to_string()))
}
