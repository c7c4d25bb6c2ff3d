use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use memchr::memchr;
use thiserror::Error;

use super::entry::{ENTRY_SIZE, HashEntry, Index, NO_FILE};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("truncated index ({0})")]
    Truncated(&'static str),
    #[error("entry {pos}: next link {next} out of range")]
    BadLink { pos: usize, next: u32 },
    #[error("entry {pos}: file ordinal {filecnt} out of range")]
    BadFile { pos: usize, filecnt: u16 },
    #[error("path table is not valid UTF-8")]
    BadPath,
    #[error("too many hash records for 32-bit entry links")]
    TooManyEntries,
    #[error("too many files for a 16-bit file ordinal")]
    TooManyPaths,
}

/// Serialize an index: hash count, the entries in hash-sorted order,
/// path count, NUL-terminated paths. All integers little-endian.
pub fn write_index(out: &mut impl Write, index: &Index) -> io::Result<()> {
    out.write_all(&(index.entries.len() as u32).to_le_bytes())?;
    for e in &index.entries {
        out.write_all(&e.to_bytes())?;
    }
    out.write_all(&(index.paths.len() as u32).to_le_bytes())?;
    for p in &index.paths {
        out.write_all(p.as_bytes())?;
        out.write_all(&[0])?;
    }
    Ok(())
}

/// Load an index file back into memory, validating that every `next`
/// link and file ordinal stays in range so the mappers can follow them
/// without bounds surprises.
pub fn load_index(path: &Path) -> Result<Index, IndexError> {
    let data = crate::common::io::read_file_bytes(path)?;

    let hash_cnt = read_u32(&data, 0).ok_or(IndexError::Truncated("hash count"))? as usize;
    if hash_cnt == 0 {
        return Err(IndexError::Truncated("missing dummy head"));
    }
    let body = 4usize;
    if (data.len() as u64) < 4 + hash_cnt as u64 * ENTRY_SIZE as u64 {
        return Err(IndexError::Truncated("entry array"));
    }
    let paths_at = body + hash_cnt * ENTRY_SIZE;

    let mut entries = Vec::with_capacity(hash_cnt);
    let mut raw = [0u8; ENTRY_SIZE];
    for i in 0..hash_cnt {
        let at = body + i * ENTRY_SIZE;
        raw.copy_from_slice(&data[at..at + ENTRY_SIZE]);
        entries.push(HashEntry::from_bytes(&raw));
    }

    let path_cnt = read_u32(&data, paths_at).ok_or(IndexError::Truncated("path count"))? as usize;
    let paths = parse_path_table(&data[paths_at + 4..], path_cnt)?;

    for (pos, e) in entries.iter().enumerate() {
        if e.next as usize >= hash_cnt {
            return Err(IndexError::BadLink { pos, next: e.next });
        }
        if e.filecnt != NO_FILE && e.filecnt as usize >= path_cnt {
            return Err(IndexError::BadFile {
                pos,
                filecnt: e.filecnt,
            });
        }
    }

    Ok(Index { entries, paths })
}

/// Read only the path table of an index, seeking past the entry records.
pub fn read_paths(path: &Path) -> Result<Vec<String>, IndexError> {
    let mut f = BufReader::new(File::open(path)?);
    let mut quad = [0u8; 4];
    f.read_exact(&mut quad)?;
    let hash_cnt = u32::from_le_bytes(quad) as u64;
    f.seek(SeekFrom::Current((hash_cnt * ENTRY_SIZE as u64) as i64))?;
    f.read_exact(&mut quad)?;
    let path_cnt = u32::from_le_bytes(quad) as usize;
    let mut rest = Vec::new();
    f.read_to_end(&mut rest)?;
    parse_path_table(&rest, path_cnt)
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let slice = data.get(at..at + 4)?;
    let mut quad = [0u8; 4];
    quad.copy_from_slice(slice);
    Some(u32::from_le_bytes(quad))
}

fn parse_path_table(data: &[u8], path_cnt: usize) -> Result<Vec<String>, IndexError> {
    let mut paths = Vec::with_capacity(path_cnt);
    let mut cur = 0usize;
    for _ in 0..path_cnt {
        let nul = memchr(0, &data[cur..]).ok_or(IndexError::Truncated("path table"))?;
        let s = std::str::from_utf8(&data[cur..cur + nul]).map_err(|_| IndexError::BadPath)?;
        paths.push(s.to_string());
        cur += nul + 1;
    }
    Ok(paths)
}
