use indexmap::IndexMap;

use crate::{diag::Warning, preprocess::Line};

pub const LABEL_MARK: char = ':';

// name -> (instruction address, source line)
#[derive(Debug, Default, Clone)]
pub struct Labels(IndexMap<String, (usize, usize)>);

impl Labels {
    /// Separate label definitions from instructions.
    ///
    /// A label binds to the address of the next real instruction. The
    /// returned instructions are indexed by their final address.
    pub fn collect(lines: Vec<Line>) -> (Labels, Vec<Line>, Vec<Warning>) {
        let mut labels = Labels::default();
        let mut code = vec![];
        let mut warnings = vec![];

        for line in lines {
            let (name, rest) = match line.code.split_once(LABEL_MARK) {
                Some(split) => split,
                None => {
                    code.push(line);
                    continue;
                }
            };
            let name = name.trim().to_string();
            let rest = rest.trim();
            if !rest.is_empty() {
                warnings.push(Warning::new(
                    line.idx,
                    format!("Text after label `{}` is ignored: `{}`", name, rest),
                ));
            }
            if let Some((_, prev)) = labels.0.insert(name.clone(), (code.len(), line.idx)) {
                warnings.push(
                    Warning::new(line.idx, format!("Re-defined label: `{}`", name)).with_note(
                        prev,
                        "Already defined here. The value has been overridden.".to_string(),
                    ),
                );
            }
        }

        (labels, code, warnings)
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.0.get(name).map(|(addr, _)| *addr)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, (addr, _))| (name.as_str(), *addr))
    }
}
