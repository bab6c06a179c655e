//! Extended-interval algebra: the compact run-length representation used to
//! describe a set of equally spaced, equal-width byte ranges inside a shared
//! buffer, and the pure value operations on it.
//!
//! An [`ExtInterval`] denotes the union of `rep` blocks of `width` bytes each,
//! spaced `stride` bytes apart, starting at `start`. This module only defines
//! the value type and its canonicalisation; the merge algorithm lives in
//! [`merge`].

pub mod merge;

pub use merge::merge;

/// A quadruple `(start, width, stride, rep)` denoting the union of `rep`
/// equal-width blocks `[start + k*stride, start + k*stride + width)` for `k`
/// in `0..rep`.
///
/// Invariants: `width >= 0`, `rep >= 1`, and `rep == 1 implies stride == 0`.
/// These are upheld by [`ExtInterval::smooth`] and by every constructor in
/// this module; callers that build one by hand should run it through
/// `smooth` before handing it to a [`crate::damage::DamageSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtInterval {
    pub start: i32,
    pub width: i32,
    pub stride: i32,
    pub rep: i32,
}

impl ExtInterval {
    /// A single solid block, the common case for a one-shot damage report.
    pub fn solid(start: i32, width: i32) -> Self {
        Self { start, width, stride: 0, rep: 1 }
    }

    /// The canonical low (inclusive) end.
    ///
    /// Widened to `i64` so that interval arithmetic on large buffers cannot
    /// silently wrap around `i32::MAX`; the stored fields stay 32-bit,
    /// matching the wire sizes of the buffers they describe.
    pub fn low(&self) -> i64 {
        self.start as i64
    }

    /// The canonical high (exclusive) end.
    pub fn high(&self) -> i64 {
        self.start as i64 + (self.rep as i64 - 1) * self.stride as i64 + self.width as i64
    }

    /// Total bytes covered, counting overlaps within the interval as they
    /// occur (there are none, by construction: repetitions never overlap).
    pub fn covered_area(&self) -> i64 {
        self.width as i64 * self.rep as i64
    }

    /// Collapse a sparse interval whose internal gap (`stride - width`) is
    /// smaller than `margin` into a single solid interval, and zero the
    /// stride of any `rep == 1` interval.
    ///
    /// Mirrors `smooth_gaps` in the reference implementation.
    pub fn smooth(mut self, margin: i32) -> Self {
        if self.rep > 1 && self.width > self.stride - margin {
            self.width = self.stride * (self.rep - 1) + self.width;
            self.rep = 1;
        }
        if self.rep == 1 {
            self.stride = 0;
        }
        self
    }

    /// Drop the trailing `rep - nreps_left` repetitions, keeping the head.
    fn drop_tail(&self, nreps_left: i32) -> Self {
        Self {
            start: self.start,
            width: self.width,
            rep: nreps_left,
            stride: if nreps_left > 1 { self.stride } else { 0 },
        }
    }

    /// Drop the leading `rep - nreps_left` repetitions, keeping the tail.
    fn drop_head(&self, nreps_left: i32) -> Self {
        Self {
            start: self.start + self.stride * (self.rep - nreps_left),
            width: self.width,
            rep: nreps_left,
            stride: if nreps_left > 1 { self.stride } else { 0 },
        }
    }

    /// Drop `ncut_left` repetitions from the head and `ncut_right` from the
    /// tail, keeping whatever remains in the middle.
    fn drop_ends(&self, ncut_left: i32, ncut_right: i32) -> Self {
        let nreps_left = self.rep - ncut_left - ncut_right;
        Self {
            start: self.start + self.stride * ncut_left,
            width: self.width,
            rep: nreps_left,
            stride: if nreps_left > 1 { self.stride } else { 0 },
        }
    }
}

/// Divide `a` by `b` (both positive... `b` always is) rounding up.
pub(crate) fn ceildiv(a: i64, b: i64) -> i64 {
    if a <= 0 {
        0
    } else {
        (a + b - 1) / b
    }
}

/// The smallest single solid interval containing both `a` and `b`: the
/// convex hull of their covered ranges.
pub fn containing_interval(a: &ExtInterval, b: &ExtInterval) -> ExtInterval {
    let minv = a.low().min(b.low());
    let maxv = a.high().max(b.high());
    ExtInterval { start: minv as i32, width: (maxv - minv) as i32, rep: 1, stride: 0 }
}
