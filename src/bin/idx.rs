use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use srcsim::common::{io_error_msg, reset_sigpipe};
use srcsim::index::{IndexBuilder, write_index};

const TOOL_NAME: &str = "idx";

#[derive(Parser)]
#[command(
    name = "idx",
    about = "Merge fingerprint records from stdin into a binary index"
)]
struct Cli {
    /// Output index file
    #[arg(short = 'o', value_name = "OUTFILE")]
    outfile: PathBuf,
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();

    let mut builder = IndexBuilder::new();
    let stdin = io::stdin();
    if let Err(e) = builder.read_stream(stdin.lock(), TOOL_NAME) {
        eprintln!("{}: standard input: {}", TOOL_NAME, e);
        process::exit(1);
    }
    let index = builder.build();

    let file = match File::create(&cli.outfile) {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "{}: cannot open outfile {}: {}",
                TOOL_NAME,
                cli.outfile.display(),
                io_error_msg(&e)
            );
            process::exit(1);
        }
    };
    let mut out = BufWriter::new(file);
    if let Err(e) = write_index(&mut out, &index).and_then(|_| out.flush()) {
        eprintln!(
            "{}: {}: {}",
            TOOL_NAME,
            cli.outfile.display(),
            io_error_msg(&e)
        );
        process::exit(1);
    }
}
