/// Robust winnowing over a lazy `(hash, line)` stream.
///
/// A ring holds the last `w` hashes, initialized to all-ones so no
/// sentinel ever wins against real data. `r` is the ring's right end and
/// `m` the position of the current rightmost minimum. Selection starts
/// with the first full window: the w-th incoming hash emits that window's
/// rightmost minimum, and afterwards a hash is emitted exactly when the
/// rightmost minimum changes. Ties prefer the later occurrence (`<=`, the
/// robust variant), so identical substrings select identical hashes.
///
/// The line attached to an emission is the line of the hash that
/// triggered it, i.e. the lexer's position at emission time.
///
/// A stream that ends before the window ever fills emits its rightmost
/// minimum once at end-of-stream, so any nonempty hash stream yields at
/// least one selection.
pub struct Winnow<I> {
    inner: I,
    window: Vec<u64>,
    r: usize,
    m: usize,
    seen: usize,
    last_line: u32,
    done: bool,
}

pub fn winnow<I>(inner: I, w: usize) -> Winnow<I> {
    Winnow {
        inner,
        window: vec![u64::MAX; w.max(1)],
        r: 0,
        m: 0,
        seen: 0,
        last_line: 0,
        done: false,
    }
}

impl<I: Iterator<Item = (u64, u32)>> Iterator for Winnow<I> {
    type Item = (u64, u32);

    fn next(&mut self) -> Option<(u64, u32)> {
        if self.done {
            return None;
        }
        let w = self.window.len();
        loop {
            let Some((h, line)) = self.inner.next() else {
                self.done = true;
                if self.seen > 0 && self.seen < w {
                    // the window never filled; the partial window is the
                    // only one this stream has
                    return Some((self.window[self.m], self.last_line));
                }
                return None;
            };
            self.last_line = line;
            self.r = (self.r + 1) % w;
            self.window[self.r] = h;

            if self.seen < w {
                self.seen += 1;
                if self.window[self.r] <= self.window[self.m] {
                    self.m = self.r;
                }
                if self.seen == w {
                    // first full window
                    return Some((self.window[self.m], line));
                }
                continue;
            }

            if self.m == self.r {
                // The previous minimum was just overwritten. Scan leftward
                // from r for the rightmost minimal hash; the fresh hash at
                // r participates.
                let mut i = (self.r + w - 1) % w;
                while i != self.r {
                    if self.window[i] < self.window[self.m] {
                        self.m = i;
                    }
                    i = (i + w - 1) % w;
                }
                return Some((self.window[self.m], line));
            }
            if self.window[self.r] <= self.window[self.m] {
                self.m = self.r;
                return Some((self.window[self.m], line));
            }
        }
    }
}
