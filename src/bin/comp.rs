use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use srcsim::common::{io_error_msg, reset_sigpipe};
use srcsim::comp::{self, DEFAULT_THRESHOLD};
use srcsim::sig::read_sig;

const TOOL_NAME: &str = "comp";

#[derive(Parser)]
#[command(name = "comp", about = "Compare fingerprints produced by sig")]
struct Cli {
    /// Base signature of shared boilerplate; its hashes are excluded
    #[arg(short = 'b', value_name = "BASE")]
    base: Option<PathBuf>,

    /// CSV output: name1;name2;resemblance;containment12;containment21
    #[arg(short = 'c', conflicts_with = "containments")]
    csv: bool,

    /// Print both containment directions instead of resemblance
    #[arg(short = 'i')]
    containments: bool,

    /// Only emit results of at least T percent (0-100)
    #[arg(short = 't', value_name = "T", default_value_t = DEFAULT_THRESHOLD)]
    threshold: u32,

    /// File with one signature path per line
    #[arg(short = 'L', value_name = "LIST", conflicts_with = "files")]
    list: Option<PathBuf>,

    /// Two signature files to compare
    files: Vec<PathBuf>,
}

/// A loaded signature with the name it was given on the command line.
struct Sig {
    name: String,
    hashes: Vec<u64>,
}

fn load(path: &Path) -> Sig {
    match read_sig(path) {
        Ok(hashes) => Sig {
            name: path.display().to_string(),
            hashes,
        },
        Err(e) => {
            eprintln!("{}: error reading {}: {}", TOOL_NAME, path.display(), e);
            process::exit(1);
        }
    }
}

fn sig_list(list: &Path) -> Vec<Sig> {
    let file = match std::fs::File::open(list) {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "{}: cannot open {}: {}",
                TOOL_NAME,
                list.display(),
                io_error_msg(&e)
            );
            process::exit(1);
        }
    };
    let mut sigs = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!(
                    "{}: error reading {}: {}",
                    TOOL_NAME,
                    list.display(),
                    io_error_msg(&e)
                );
                process::exit(1);
            }
        };
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        sigs.push(load(Path::new(line)));
    }
    sigs
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();

    if cli.threshold > 100 {
        eprintln!("{}: threshold must be between 0 and 100", TOOL_NAME);
        process::exit(1);
    }

    let base = match &cli.base {
        Some(path) => load(path).hashes,
        None => Vec::new(),
    };

    let sigs = match &cli.list {
        Some(list) => sig_list(list),
        None => {
            if cli.files.len() != 2 {
                eprintln!(
                    "{}: expected exactly two signature operands (or -L LIST)",
                    TOOL_NAME
                );
                process::exit(1);
            }
            cli.files.iter().map(|f| load(f)).collect()
        }
    };

    if sigs.len() < 2 {
        eprintln!("{}: nothing to compare", TOOL_NAME);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut res = Ok(());

    'pairs: for i in 0..sigs.len() {
        for j in i + 1..sigs.len() {
            let (a, b) = (&sigs[i], &sigs[j]);
            let c = comp::compare(&a.hashes, &b.hashes, &base);
            res = write_pair(&mut out, &cli, a, b, c);
            if res.is_err() {
                break 'pairs;
            }
        }
    }

    if let Err(e) = res.and_then(|_| out.flush()) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            process::exit(0);
        }
        eprintln!("{}: cannot print result: {}", TOOL_NAME, io_error_msg(&e));
        process::exit(1);
    }
}

fn write_pair(
    out: &mut impl Write,
    cli: &Cli,
    a: &Sig,
    b: &Sig,
    c: comp::Comparison,
) -> io::Result<()> {
    let t = cli.threshold;
    if cli.csv {
        if c.resemblance >= t || c.cont_ab >= t || c.cont_ba >= t {
            writeln!(
                out,
                "{};{};{};{};{}",
                a.name, b.name, c.resemblance, c.cont_ab, c.cont_ba
            )?;
        }
    } else if cli.containments {
        if c.cont_ab >= t {
            writeln!(out, "{} in {}: {}%", a.name, b.name, c.cont_ab)?;
        }
        if c.cont_ba >= t {
            writeln!(out, "{} in {}: {}%", b.name, a.name, c.cont_ba)?;
        }
    } else if c.resemblance >= t {
        writeln!(out, "{} and {}: {}%", a.name, b.name, c.resemblance)?;
    }
    Ok(())
}
