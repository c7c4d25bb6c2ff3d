use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use srcsim::common::io::read_file_bytes;
use srcsim::common::{io_error_msg, reset_sigpipe};
use srcsim::sig::{self, DEFAULT_NGRAM, DEFAULT_WINDOW};

const TOOL_NAME: &str = "sig";

#[derive(Parser)]
#[command(
    name = "sig",
    about = "Create winnowed fingerprints from source files"
)]
struct Cli {
    /// K-gram size: number of consecutive tokens hashed together
    #[arg(short = 'n', value_name = "N", default_value_t = DEFAULT_NGRAM)]
    ngram: usize,

    /// Winnowing window: every run of W consecutive hashes contributes a fingerprint
    #[arg(short = 'w', value_name = "W", default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// Write a sorted binary signature to OUTFILE instead of text records to stdout
    #[arg(short = 'o', value_name = "OUTFILE")]
    outfile: Option<PathBuf>,

    /// Source files to fingerprint
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();

    if cli.ngram < 1 {
        eprintln!("{}: k-gram size must be at least 1", TOOL_NAME);
        process::exit(1);
    }
    if cli.window < 1 {
        eprintln!("{}: winnowing window must be at least 1", TOOL_NAME);
        process::exit(1);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut sorted_buf: Vec<u64> = Vec::new();

    for file in &cli.files {
        // unopenable inputs are skipped; fingerprinting is best-effort
        // across a file list
        let path = match file.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                eprintln!(
                    "{}: cannot open {}: {} - skipping",
                    TOOL_NAME,
                    file.display(),
                    io_error_msg(&e)
                );
                continue;
            }
        };
        let data = match read_file_bytes(&path) {
            Ok(d) => d,
            Err(e) => {
                eprintln!(
                    "{}: cannot open {}: {} - skipping",
                    TOOL_NAME,
                    file.display(),
                    io_error_msg(&e)
                );
                continue;
            }
        };

        let prints = sig::file_fingerprints(&data, cli.ngram, cli.window);
        if cli.outfile.is_some() {
            sorted_buf.extend(prints.iter().map(|&(h, _)| h));
        } else if let Err(e) = write_text_records(&mut out, &path, &prints) {
            if e.kind() == io::ErrorKind::BrokenPipe {
                process::exit(0);
            }
            eprintln!("{}: write error: {}", TOOL_NAME, io_error_msg(&e));
            process::exit(1);
        }
    }

    match &cli.outfile {
        Some(outfile) => {
            sorted_buf.sort_unstable();
            let file = match File::create(outfile) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!(
                        "{}: cannot open outfile {}: {}",
                        TOOL_NAME,
                        outfile.display(),
                        io_error_msg(&e)
                    );
                    process::exit(1);
                }
            };
            let mut out = BufWriter::new(file);
            if let Err(e) = sig::write_sig(&mut out, &sorted_buf).and_then(|_| out.flush()) {
                eprintln!(
                    "{}: {}: {}",
                    TOOL_NAME,
                    outfile.display(),
                    io_error_msg(&e)
                );
                process::exit(1);
            }
        }
        None => {
            if let Err(e) = out.flush() {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    eprintln!("{}: write error: {}", TOOL_NAME, io_error_msg(&e));
                    process::exit(1);
                }
            }
        }
    }
}

/// Emit one file's records: the canonical path, then one
/// "<hash> <line>" pair per fingerprint, hash as 16 hex digits.
fn write_text_records(
    out: &mut impl Write,
    path: &std::path::Path,
    prints: &[(u64, u32)],
) -> io::Result<()> {
    writeln!(out, "{}", path.display())?;
    for &(hash, line) in prints {
        writeln!(out, "{:016x} {}", hash, line)?;
    }
    Ok(())
}
