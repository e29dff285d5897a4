use arch::inst::Inst;
use color_print::cformat;

use crate::{data::DataTable, label::Labels, preprocess::Line};

const RULE: &str = "+------+------+------------------+----------------------------------";

/// Address / word / decoded instruction / source, one row per instruction.
pub fn dump(code: &[Line], words: &[u16]) -> Vec<String> {
    let mut rows = vec![RULE.to_string()];
    rows.push(format!("| {:>4} | {:<4} | {:<16} | {}", "addr", "word", "decoded", "source"));
    rows.push(RULE.to_string());
    for (addr, (line, word)) in code.iter().zip(words).enumerate() {
        let decoded = match Inst::from_bin(*word) {
            Some(inst) => inst.cformat(),
            None => cformat!("<r,s>????</>"),
        };
        rows.push(format!(
            "| {} | {:04x} | {} | {:>4}: {}",
            cformat!("<green>{:>4}</>", addr),
            word,
            decoded,
            line.idx + 1,
            line.code
        ));
    }
    rows.push(RULE.to_string());
    rows
}

/// Label addresses followed by data slots, in definition order.
pub fn symbols(labels: &Labels, data: &DataTable) -> Vec<String> {
    let mut rows = vec![];
    for (name, addr) in labels.iter() {
        rows.push(cformat!("<green>{:>4}</> <b>{}</>:", addr, name));
    }
    for (name, slot) in data.iter() {
        rows.push(cformat!("<yellow>{:>4}</> <b>{}</> (data)", slot, name));
    }
    rows
}
