use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::Error;

/// Addressed-image header understood by the usual logic simulators.
pub const HEADER: &str = "v3.0 hex words addressed\n00: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Radix {
    #[default]
    Hex,
    Bin,
}

impl Radix {
    pub fn ext(&self) -> &'static str {
        match self {
            Radix::Hex => "hex",
            Radix::Bin => "bin",
        }
    }

    pub fn word(&self, word: u16) -> String {
        match self {
            Radix::Hex => format!("{:04x}", word),
            Radix::Bin => format!("{:016b}", word),
        }
    }
}

fn render(words: impl Iterator<Item = u16>, radix: Radix) -> String {
    let mut out = String::from(HEADER);
    for word in words {
        out.push_str(&radix.word(word));
        out.push(' ');
    }
    out
}

pub fn render_program(words: &[u16], radix: Radix) -> String {
    render(words.iter().copied(), radix)
}

/// Parse a data literal as a decimal integer.
///
/// Negative values down to -32768 are stored as 16-bit two's complement.
pub fn data_word(literal: &str) -> Result<u16, Error> {
    let invalid = || Error::InvalidData(literal.to_string());
    let v: i32 = literal.parse().map_err(|_| invalid())?;
    match v {
        0..=0xFFFF => Ok(v as u16),
        -0x8000..=-1 => Ok(v as i16 as u16),
        _ => Err(invalid()),
    }
}

pub fn render_data(values: &[String], radix: Radix) -> Result<String, Error> {
    let words = values
        .iter()
        .map(|v| data_word(v))
        .collect::<Result<Vec<u16>, Error>>()?;
    Ok(render(words.into_iter(), radix))
}

pub fn program_path(dir: &Path, radix: Radix) -> PathBuf {
    dir.join(format!("output.{}", radix.ext()))
}

pub fn data_path(dir: &Path, radix: Radix) -> PathBuf {
    dir.join(format!("data.{}", radix.ext()))
}

pub fn write_image(path: &Path, image: &str) -> Result<(), Error> {
    let name = path.display().to_string();
    let mut file = File::create(path).map_err(|e| Error::FileCreate(name.clone(), e))?;
    file.write_all(image.as_bytes())
        .map_err(|e| Error::FileWrite(name, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_hex() {
        assert_eq!(
            render_program(&[0xF000, 0x0053], Radix::Hex),
            "v3.0 hex words addressed\n00: f000 0053 "
        );
    }

    #[test]
    fn program_bin() {
        assert_eq!(
            render_program(&[0x0005], Radix::Bin),
            "v3.0 hex words addressed\n00: 0000000000000101 "
        );
    }

    #[test]
    fn empty_images_are_header_only() {
        assert_eq!(render_program(&[], Radix::Hex), HEADER);
        assert_eq!(render_data(&[], Radix::Bin).unwrap(), HEADER);
    }

    #[test]
    fn data_is_decimal() {
        let values = vec!["5".to_string(), "10".to_string()];
        assert_eq!(
            render_data(&values, Radix::Hex).unwrap(),
            "v3.0 hex words addressed\n00: 0005 000a "
        );
        assert_eq!(
            render_data(&values[..1], Radix::Bin).unwrap(),
            "v3.0 hex words addressed\n00: 0000000000000101 "
        );
    }

    #[test]
    fn data_word_range() {
        assert_eq!(data_word("65535").unwrap(), 0xFFFF);
        assert_eq!(data_word("-1").unwrap(), 0xFFFF);
        assert_eq!(data_word("-32768").unwrap(), 0x8000);
        assert!(matches!(data_word("65536"), Err(Error::InvalidData(_))));
        assert!(matches!(data_word("-32769"), Err(Error::InvalidData(_))));
        assert!(matches!(data_word("0x10"), Err(Error::InvalidData(_))));
        assert!(matches!(data_word("abc"), Err(Error::InvalidData(_))));
    }

    #[test]
    fn hex_and_bin_agree() {
        for word in [0x0000, 0x1234, 0xF000, 0xFFFF, 0x8001] {
            let hex = u16::from_str_radix(&Radix::Hex.word(word), 16).unwrap();
            let bin = u16::from_str_radix(&Radix::Bin.word(word), 2).unwrap();
            assert_eq!(hex, bin);
        }
    }

    #[test]
    fn paths() {
        let dir = Path::new("out");
        assert_eq!(program_path(dir, Radix::Bin), Path::new("out/output.bin"));
        assert_eq!(data_path(dir, Radix::Hex), Path::new("out/data.hex"));
    }
}
