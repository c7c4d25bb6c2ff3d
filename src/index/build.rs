use std::io::BufRead;

use super::entry::{HashEntry, Index, NO_FILE};
use super::load::IndexError;

/// Highest number of paths an index can carry; 0xFFFF is the dummy
/// head's sentinel ordinal.
const MAX_PATHS: usize = NO_FILE as usize;

/// Accumulates per-file hash records in input order and builds the
/// sorted, chain-linked index.
pub struct IndexBuilder {
    entries: Vec<HashEntry>,
    paths: Vec<String>,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexBuilder {
    pub fn new() -> Self {
        IndexBuilder {
            entries: vec![HashEntry::dummy()],
            paths: Vec::new(),
        }
    }

    /// Register the next fingerprinted file; hashes added afterwards
    /// belong to it.
    pub fn add_path(&mut self, path: &str) -> Result<(), IndexError> {
        if self.paths.len() >= MAX_PATHS {
            return Err(IndexError::TooManyPaths);
        }
        self.paths.push(path.to_string());
        Ok(())
    }

    /// True once at least one path has been registered.
    pub fn has_file(&self) -> bool {
        !self.paths.is_empty()
    }

    /// Append a hash record for the current file.
    pub fn add_hash(&mut self, hash: u64, linepos: u16) -> Result<(), IndexError> {
        debug_assert!(self.has_file());
        if self.entries.len() > u32::MAX as usize {
            return Err(IndexError::TooManyEntries);
        }
        let filecnt = (self.paths.len() - 1) as u16;
        self.entries.push(HashEntry {
            hash,
            linepos,
            filecnt,
            next: 0,
        });
        Ok(())
    }

    /// Consume the text stream produced by `sig`: a line starting with
    /// '/' names the next file, a "<hex-hash> <decimal-line>" record adds
    /// a fingerprint to it. Malformed lines warn on stderr and are
    /// dropped, as are records arriving before any path line.
    pub fn read_stream<R: BufRead>(&mut self, reader: R, tool_name: &str) -> Result<(), IndexError> {
        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                self.add_path(line)?;
            } else if let Some((hash, linepos)) = parse_hash_record(line) {
                if hash == 0 {
                    eprintln!("{}: reserved zero hash, ignoring: {}", tool_name, line);
                } else if self.has_file() {
                    self.add_hash(hash, linepos)?;
                } else {
                    eprintln!(
                        "{}: hash record before any path, ignoring: {}",
                        tool_name, line
                    );
                }
            } else {
                eprintln!("{}: malformed line, ignoring: {}", tool_name, line);
            }
        }
        Ok(())
    }

    /// Sort the entries by hash (stable, so records with equal hashes
    /// keep their input order) and thread the `next` chain: following it
    /// from the dummy head replays the records in input order.
    pub fn build(self) -> Index {
        let IndexBuilder { entries, paths } = self;
        let n = entries.len() - 1;
        if n == 0 {
            return Index { entries, paths };
        }

        // input ranks 1..=n, reordered by hash
        let mut order: Vec<u32> = (1..=n as u32).collect();
        order.sort_by_key(|&r| entries[r as usize].hash);

        // final physical slot of each input rank
        let mut slot_of_rank = vec![0u32; n + 1];
        for (i, &rank) in order.iter().enumerate() {
            slot_of_rank[rank as usize] = (i + 1) as u32;
        }

        let mut sorted = Vec::with_capacity(n + 1);
        sorted.push(entries[0]);
        for &rank in &order {
            sorted.push(entries[rank as usize]);
        }

        // each record's predecessor in input order points at its slot;
        // the last record keeps next = 0
        for rank in 1..=n {
            let prev_slot = if rank == 1 {
                0
            } else {
                slot_of_rank[rank - 1] as usize
            };
            sorted[prev_slot].next = slot_of_rank[rank];
        }

        Index {
            entries: sorted,
            paths,
        }
    }
}

/// Parse a "<hex-hash> <decimal-line>" record. Line numbers past the
/// u16 range saturate.
fn parse_hash_record(line: &str) -> Option<(u64, u16)> {
    let (hex, num) = line.split_once(' ')?;
    if hex.is_empty() || hex.len() > 16 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let hash = u64::from_str_radix(hex, 16).ok()?;
    let linepos = num.trim().parse::<u32>().ok()?.min(u16::MAX as u32) as u16;
    Some((hash, linepos))
}
