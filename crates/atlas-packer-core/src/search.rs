//! Integer binary search over candidate bin dimensions.

/// Binary search over `[min, max]` with an early-stop fuzziness tolerance
/// and one of three mutually exclusive quantization modes: plain integers,
/// powers of two (indices are exponents), or multiples of four.
pub struct BinarySearch {
    min: u32,
    max: u32,
    fuzziness: u32,
    pot: bool,
    mod4: bool,
    low: u32,
    high: u32,
    current: u32,
}

impl BinarySearch {
    pub fn new(min: u32, max: u32, fuzziness: u32, pot: bool, mod4: bool) -> Self {
        let (min, max) = if pot {
            (log2(next_pow2(min)), log2(next_pow2(max)))
        } else if mod4 {
            (round_mod4(min), round_mod4(max))
        } else {
            (min, max)
        };
        Self {
            min,
            max,
            // Powers of two are sparse enough already.
            fuzziness: if pot { 0 } else { fuzziness },
            pot,
            mod4,
            low: 0,
            high: 0,
            current: 0,
        }
    }

    /// Restarts the search and returns the midpoint candidate.
    pub fn reset(&mut self) -> u32 {
        self.low = self.min;
        self.high = self.max;
        self.current = (self.low + self.high) / 2;
        self.value()
    }

    /// Narrows the window given whether the last candidate packed fully.
    /// Returns `None` once the window is exhausted or narrower than the
    /// fuzziness tolerance.
    pub fn next(&mut self, fits: bool) -> Option<u32> {
        if self.low >= self.high {
            return None;
        }
        if fits {
            self.high = self.current.saturating_sub(1);
        } else {
            self.low = self.current + 1;
        }
        if self.high.abs_diff(self.low) < self.fuzziness {
            return None;
        }
        self.current = (self.low + self.high) / 2;
        Some(self.value())
    }

    fn value(&self) -> u32 {
        if self.pot {
            1 << self.current
        } else if self.mod4 {
            round_mod4(self.current)
        } else {
            self.current
        }
    }
}

/// Smallest power of two >= `v` (and >= 1).
pub fn next_pow2(mut v: u32) -> u32 {
    if v <= 1 {
        return 1;
    }
    v -= 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}

/// Smallest multiple of four >= `v`.
pub fn round_mod4(v: u32) -> u32 {
    if v % 4 == 0 { v } else { v + 4 - v % 4 }
}

fn log2(pow2: u32) -> u32 {
    31 - pow2.leading_zeros()
}
