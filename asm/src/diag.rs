use color_print::cformat;

/// Non-fatal finding reported by a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub line: usize,
    pub msg: String,
    /// Earlier line the warning refers back to
    pub note: Option<(usize, String)>,
}

impl Warning {
    pub fn new(line: usize, msg: String) -> Self {
        Warning {
            line,
            msg,
            note: None,
        }
    }

    pub fn with_note(mut self, line: usize, msg: String) -> Self {
        self.note = Some((line, msg));
        self
    }

    pub fn print_diag(&self, file: &str, lines: &[String]) {
        let raw = |idx: usize| lines.get(idx).map(|s| s.as_str()).unwrap_or("");
        Msg::Warn(self.msg.clone()).diag(file, self.line, raw(self.line));
        if let Some((line, note)) = &self.note {
            Msg::Note(note.clone()).diag(file, *line, raw(*line));
        }
    }
}

#[derive(Debug)]
pub enum Msg {
    Error(String),
    Warn(String),
    Note(String),
}

impl Msg {
    fn head(&self) -> String {
        match self {
            Msg::Error(msg) => cformat!("<red,bold>error</>: {}", msg),
            Msg::Warn(msg) => cformat!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cformat!("<green,bold>note</>: {}", msg),
        }
    }

    pub fn print(&self) {
        eprintln!("{}", self.head());
    }

    /// `line_idx` is 0-based, displayed 1-based.
    pub fn diag(&self, file: &str, line_idx: usize, raw: &str) {
        let line = line_idx + 1;
        eprintln!("{}", self.head());
        eprintln!("{}", cformat!("     <blue>--></> <underline>{}:{}</>", file, line));
        eprintln!("{}", cformat!("      <blue>|</>"));
        eprintln!("{}", cformat!(" <blue>{:>4} |</> {}", line, raw));
        eprintln!("{}", cformat!("      <blue>|</>"));
    }
}
