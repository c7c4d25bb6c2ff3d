use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use srcsim::common::{io_error_msg, reset_sigpipe};
use srcsim::index::read_paths;

const TOOL_NAME: &str = "paths";

#[derive(Parser)]
#[command(
    name = "paths",
    about = "Print the paths of the files contained in an index"
)]
struct Cli {
    /// Index files
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for file in &cli.files {
        let paths = match read_paths(file) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{}: error reading '{}': {}", TOOL_NAME, file.display(), e);
                process::exit(1);
            }
        };
        for path in paths {
            if let Err(e) = writeln!(out, "{}", path) {
                if e.kind() == io::ErrorKind::BrokenPipe {
                    process::exit(0);
                }
                eprintln!("{}: cannot print path: {}", TOOL_NAME, io_error_msg(&e));
                process::exit(1);
            }
        }
    }

    if let Err(e) = out.flush() {
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("{}: cannot print path: {}", TOOL_NAME, io_error_msg(&e));
            process::exit(1);
        }
    }
}
