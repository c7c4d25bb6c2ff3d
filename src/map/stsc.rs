use std::io::{self, Write};

use crate::index::Index;
use crate::map::core::record;

/// Tichy block-move search ("The String-to-String Correction Problem
/// with Block Moves", 1983), with binary search standing in for the
/// prefix lookup.
///
/// Walks the target's input-order chain. At each position, every source
/// entry with the same hash starts a candidate chain; both chains are
/// extended in parallel while the hashes keep matching and neither side
/// crosses a file boundary. The longest candidate wins (first one found
/// on a tie), is emitted if it reaches `min_region_size`, and the walk
/// resumes after the matched target span.
pub fn map_regions(
    tgt: &Index,
    src: &Index,
    min_region_size: usize,
    out: &mut impl Write,
) -> io::Result<()> {
    let mut k = tgt.entries[0].next as usize;
    while k != 0 {
        let mut best_len = 0usize;
        let mut best_src = 0usize;
        let mut best_src_end = 0usize;
        let mut tgt_end = k;

        for cand in src.matches(tgt.entries[k].hash) {
            let mut s = cand;
            let mut t = k;
            let mut len = 1usize;
            loop {
                let sn = src.entries[s].next as usize;
                let tn = tgt.entries[t].next as usize;
                if sn == 0 || tn == 0 {
                    break;
                }
                if src.entries[sn].filecnt != src.entries[s].filecnt
                    || tgt.entries[tn].filecnt != tgt.entries[t].filecnt
                {
                    break;
                }
                if src.entries[sn].hash != tgt.entries[tn].hash {
                    break;
                }
                s = sn;
                t = tn;
                len += 1;
            }
            if len > best_len {
                best_len = len;
                best_src = cand;
                best_src_end = s;
                tgt_end = t;
            }
        }

        if best_len >= min_region_size {
            let tb = tgt.entries[k];
            let te = tgt.entries[tgt_end];
            let sb = src.entries[best_src];
            let se = src.entries[best_src_end];
            record(
                out,
                tgt.path(tb.filecnt),
                tb.linepos,
                te.linepos,
                src.path(sb.filecnt),
                sb.linepos,
                se.linepos,
            )?;
        }
        k = tgt.entries[tgt_end].next as usize;
    }
    Ok(())
}
