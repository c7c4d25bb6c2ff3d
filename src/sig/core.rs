use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::Path;

use digest::Digest;
use md5::Md5;
use thiserror::Error;

use crate::lexer::{Lexer, Token};
use crate::sig::winnow::winnow;

/// Default k-gram size (tokens hashed together).
pub const DEFAULT_NGRAM: usize = 5;
/// Default winnowing window.
pub const DEFAULT_WINDOW: usize = 4;

/// Hash one k-gram: the first 8 bytes, as a little-endian u64, of MD5
/// over the token codes encoded as little-endian u32, oldest to newest.
///
/// The fixed-width encoding keeps fingerprints identical across
/// producer and consumer builds regardless of host.
pub fn kgram_hash(codes: impl IntoIterator<Item = u32>) -> u64 {
    let mut md5 = Md5::new();
    for code in codes {
        md5.update(code.to_le_bytes());
    }
    let digest = md5.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

/// Slides a k-gram window over a token stream and hashes each full
/// window. Yields `(hash, line)` where the line is that of the newest
/// token in the k-gram. Nothing is emitted until `n` tokens have been
/// seen. Hash value 0 is reserved as the no-hash sentinel; in the
/// astronomically rare case MD5 produces it, the k-gram is dropped.
pub struct HashStream<I> {
    tokens: I,
    window: VecDeque<u32>,
    n: usize,
}

pub fn hash_stream<I: Iterator<Item = Token>>(tokens: I, n: usize) -> HashStream<I> {
    HashStream {
        tokens,
        window: VecDeque::with_capacity(n.max(1)),
        n: n.max(1),
    }
}

impl<I: Iterator<Item = Token>> Iterator for HashStream<I> {
    type Item = (u64, u32);

    fn next(&mut self) -> Option<(u64, u32)> {
        loop {
            let tok = self.tokens.next()?;
            if self.window.len() == self.n {
                self.window.pop_front();
            }
            self.window.push_back(tok.code);
            if self.window.len() < self.n {
                continue;
            }
            let h = kgram_hash(self.window.iter().copied());
            if h == 0 {
                continue;
            }
            return Some((h, tok.line));
        }
    }
}

/// Fingerprint one source file already read into memory: tokenize, hash
/// k-grams, winnow. Returns the selected `(hash, line)` pairs in
/// emission order.
pub fn file_fingerprints(data: &[u8], ngram: usize, window: usize) -> Vec<(u64, u32)> {
    winnow(hash_stream(Lexer::new(data), ngram), window).collect()
}

#[derive(Debug, Error)]
pub enum SigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("truncated signature file")]
    Truncated,
}

/// Write a sorted signature: hash count, then the hashes, little-endian.
pub fn write_sig(out: &mut impl Write, hashes: &[u64]) -> io::Result<()> {
    out.write_all(&(hashes.len() as u32).to_le_bytes())?;
    for &h in hashes {
        out.write_all(&h.to_le_bytes())?;
    }
    Ok(())
}

/// Load a signature written by `write_sig`. The hashes come back in
/// file order, which the writer guarantees is sorted.
pub fn read_sig(path: &Path) -> Result<Vec<u64>, SigError> {
    let data = crate::common::io::read_file_bytes(path)?;
    if data.len() < 4 {
        return Err(SigError::Truncated);
    }
    let mut quad = [0u8; 4];
    quad.copy_from_slice(&data[..4]);
    let count = u32::from_le_bytes(quad) as usize;
    let body = &data[4..];
    if (body.len() as u64) < count as u64 * 8 {
        return Err(SigError::Truncated);
    }
    let mut hashes = Vec::with_capacity(count);
    let mut word = [0u8; 8];
    for chunk in body[..count * 8].chunks_exact(8) {
        word.copy_from_slice(chunk);
        hashes.push(u64::from_le_bytes(word));
    }
    Ok(hashes)
}
