pub mod data;
pub mod diag;
pub mod error;
pub mod label;
pub mod listing;
pub mod output;
pub mod parser;
pub mod preprocess;

pub use data::{DataSection, DataTable, DuplicatePolicy};
pub use diag::Warning;
pub use error::{Error, ErrorClass};
pub use label::Labels;
pub use output::Radix;
pub use preprocess::Line;

use std::path::{Path, PathBuf};

use parser::Code;

#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    pub radix: Radix,
    pub duplicate_data: DuplicatePolicy,
}

/// Everything a successful run produces.
#[derive(Debug)]
pub struct Assembled {
    pub data: DataSection,
    pub labels: Labels,
    /// Label-free instructions, indexed by address
    pub code: Vec<Line>,
    pub words: Vec<u16>,
    pub program_image: String,
    pub data_image: String,
    pub warnings: Vec<Warning>,
}

impl Assembled {
    /// Write the program and data images into `dir`; returns the paths written.
    pub fn write(&self, dir: &Path, radix: Radix) -> Result<Vec<PathBuf>, Error> {
        let outputs = [
            (output::program_path(dir, radix), &self.program_image),
            (output::data_path(dir, radix), &self.data_image),
        ];
        let mut written = vec![];
        for (path, image) in outputs {
            output::write_image(&path, image)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Encode every instruction in address order; stops at the first error.
pub fn encode(code: &[Line], labels: &Labels, data: &DataTable) -> Result<Vec<u16>, Error> {
    code.iter()
        .enumerate()
        .map(|(addr, line)| {
            Code::parse(&line.code)
                .and_then(|code| code.resolve(addr, labels, data))
                .map(|inst| inst.to_bin())
                .map_err(|err| err.at(addr, line.idx))
        })
        .collect()
}

pub fn assemble<S: AsRef<str>>(raw: &[S], config: &Config) -> Result<Assembled, Error> {
    let lines = preprocess::preprocess(raw);
    let (data, text, mut warnings) = DataSection::extract(lines, config.duplicate_data)?;
    let (labels, code, label_warnings) = Labels::collect(text);
    warnings.extend(label_warnings);

    let words = encode(&code, &labels, &data.table)?;

    let program_image = output::render_program(&words, config.radix);
    let data_image = output::render_data(&data.values, config.radix)?;

    Ok(Assembled {
        data,
        labels,
        code,
        words,
        program_image,
        data_image,
        warnings,
    })
}
