use asm16::{Config, DuplicatePolicy, Error, Radix};
use color_print::cprintln;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "input.asm")]
    input: String,

    /// Write binary images instead of hex
    #[clap(short, long)]
    binary: bool,

    /// Directory receiving output.{hex,bin} and data.{hex,bin}
    #[clap(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Reject duplicate data labels instead of overwriting
    #[clap(long)]
    strict_data: bool,

    /// Dump assembled listing
    #[clap(short, long)]
    dump: bool,

    /// Suppress progress output
    #[clap(short, long)]
    quiet: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            radix: if self.binary { Radix::Bin } else { Radix::Hex },
            duplicate_data: if self.strict_data {
                DuplicatePolicy::Reject
            } else {
                DuplicatePolicy::Overwrite
            },
        }
    }
}

fn read_lines(path: &str) -> Result<Vec<String>, Error> {
    let file = File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
    BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::FileRead)
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    let config = args.config();
    macro_rules! step {
        ($($arg:tt)*) => {
            if !args.quiet {
                println!($($arg)*);
            }
        };
    }

    step!("asm16 Assembler");

    step!("1. Read File");
    step!("  < {}", args.input);
    let lines = match read_lines(&args.input) {
        Ok(lines) => lines,
        Err(err) => {
            err.print_diag(&args.input, &[]);
            std::process::exit(1);
        }
    };

    step!("2. Collect Data & Labels, Encode");
    let assembled = match asm16::assemble(&lines, &config) {
        Ok(assembled) => assembled,
        Err(err) => {
            err.print_diag(&args.input, &lines);
            std::process::exit(1);
        }
    };
    for warning in &assembled.warnings {
        warning.print_diag(&args.input, &lines);
    }
    step!(
        "  - {} data word(s), {} label(s), {} instruction(s)",
        assembled.data.values.len(),
        assembled.labels.len(),
        assembled.words.len()
    );

    step!("3. Write Images");
    match assembled.write(&args.out_dir, config.radix) {
        Ok(paths) => {
            for path in paths {
                step!("  > {}", path.display());
            }
        }
        Err(err) => {
            err.print_diag(&args.input, &lines);
            std::process::exit(1);
        }
    }

    if args.dump {
        for row in asm16::listing::symbols(&assembled.labels, &assembled.data.table) {
            println!("{}", row);
        }
        for row in asm16::listing::dump(&assembled.code, &assembled.words) {
            println!("{}", row);
        }
    }

    if !args.quiet {
        cprintln!("<green,bold>done</>");
    }
}
