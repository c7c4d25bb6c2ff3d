use std::io::{self, Write};

/// Matching regions (consecutive hashes) shorter than this are not
/// emitted. The unit is hashes, not lines.
pub const DEFAULT_MIN_REGION: usize = 4;

/// Print one matched region, target side first. Start is the line of the
/// region's first hash; the length is the line span, so a region within
/// a single line has length 0.
pub(crate) fn record(
    out: &mut impl Write,
    tgt_path: &str,
    tgt_beg: u16,
    tgt_end: u16,
    src_path: &str,
    src_beg: u16,
    src_end: u16,
) -> io::Result<()> {
    writeln!(
        out,
        "{}:{},{} -- {}:{},{}",
        tgt_path,
        tgt_beg,
        tgt_end - tgt_beg,
        src_path,
        src_beg,
        src_end - src_beg
    )
}
