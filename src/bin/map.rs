use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use srcsim::common::{io_error_msg, reset_sigpipe};
use srcsim::index::{Index, load_index};
use srcsim::map::{self, DEFAULT_MIN_REGION};

const TOOL_NAME: &str = "map";

#[derive(Parser)]
#[command(
    name = "map",
    about = "Show similar regions between two fingerprint indices"
)]
struct Cli {
    /// Use iterated longest-common-substring search instead of block moves
    #[arg(short = 'l')]
    lcs: bool,

    /// Matching regions (consecutive hashes) shorter than MIN are not emitted
    #[arg(short = 'm', value_name = "MIN", default_value_t = DEFAULT_MIN_REGION)]
    min_region_size: usize,

    /// Target index: regions are reported per position in this index
    tgt: PathBuf,

    /// Source index searched for matching chains
    src: PathBuf,
}

fn load(path: &Path) -> Index {
    match load_index(path) {
        Ok(idx) => idx,
        Err(e) => {
            eprintln!("{}: error reading '{}': {}", TOOL_NAME, path.display(), e);
            process::exit(1);
        }
    }
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();

    if cli.min_region_size < 1 {
        eprintln!("{}: minimum region size must be at least 1", TOOL_NAME);
        process::exit(1);
    }

    let mut tgt = load(&cli.tgt);
    let mut src = load(&cli.src);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let res = if cli.lcs {
        map::ilcs::map_regions(&mut tgt, &mut src, cli.min_region_size, &mut out)
    } else {
        map::stsc::map_regions(&tgt, &src, cli.min_region_size, &mut out)
    };

    if let Err(e) = res.and_then(|_| out.flush()) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            process::exit(0);
        }
        eprintln!("{}: cannot output match: {}", TOOL_NAME, io_error_msg(&e));
        process::exit(1);
    }
}
