//! The merge algorithm itself: given two extended intervals and a merge
//! margin, produce zero to three disjoint intervals covering their union.
//!
//! This is a direct translation of the case analysis in the reference
//! implementation's `interval.c`: `merge_intervals` (here: [`merge`]),
//! `merge_contained`, `merge_assym` (here: [`merge_asymmetric`]), and
//! `merge_fully_consumed`.

use super::{ceildiv, containing_interval, ExtInterval};

/// Merge two intervals `a` and `b` under `margin`.
///
/// Returns an empty vector if `a` and `b` are separated by a gap strictly
/// greater than `margin` (no change; both stay in the enclosing set as
/// separate entries). Otherwise returns 1 to 3 disjoint intervals whose
/// union covers `a ∪ b`, with every pairwise gap at most `margin`.
pub fn merge(a: &ExtInterval, b: &ExtInterval, margin: i32) -> Vec<ExtInterval> {
    let a_low = a.low();
    let a_high = a.high();
    let b_low = b.low();
    let b_high = b.high();

    if a.stride == b.stride && (a.rep > 1 || b.rep > 1) {
        // Special case: two horizontally aligned buffers sharing a stride.
        let common_stride = if a.rep > 1 { a.stride } else { b.stride };
        let mod_a = a.start.rem_euclid(common_stride);
        let mod_b = b.start.rem_euclid(common_stride);

        if a.width == b.width && mod_a == mod_b {
            if a.start as i64 + a.rep as i64 * a.stride as i64 == b.start as i64 {
                return vec![ExtInterval {
                    start: a.start,
                    width: a.width,
                    stride: common_stride,
                    rep: a.rep + b.rep,
                }];
            }
            if b.start as i64 + b.rep as i64 * b.stride as i64 == a.start as i64 {
                return vec![ExtInterval {
                    start: b.start,
                    width: b.width,
                    stride: common_stride,
                    rep: a.rep + b.rep,
                }];
            }
        }

        // Don't merge two parallel buffers whose rows never come close.
        let mut mod_a = mod_a;
        let mut mod_b = mod_b;
        if mod_a > mod_b {
            mod_b += common_stride;
        }
        let gap_ab = mod_b - (mod_a + a.width);
        if mod_b > mod_a {
            mod_a += common_stride;
        }
        let gap_ba = mod_a - (mod_b + b.width);
        if gap_ab > margin && gap_ba > margin {
            return vec![];
        }
    }

    // Categorize by symmetry class.
    if a_low >= b_low && a_high <= b_high {
        return merge_contained(b, a, margin);
    }
    if b_low >= a_low && b_high <= a_high {
        return merge_contained(a, b, margin);
    }
    if a_low <= b_low {
        return merge_asymmetric(a, b, margin);
    }
    if b_low <= a_low {
        return merge_asymmetric(b, a, margin);
    }
    unreachable!("merge: endpoints of {a:?} and {b:?} could not be classified");
}

/// `inner` is fully contained inside `outer` (by low/high endpoints).
/// Splits `outer` into a head, a merged central band, and a tail.
fn merge_contained(outer: &ExtInterval, inner: &ExtInterval, margin: i32) -> Vec<ExtInterval> {
    if outer.stride == 0 || outer.rep == 1 {
        // Fast exit: one part is already a solid interval.
        return vec![*outer];
    }

    // [stride=5, start=0, width=3, rep=9] U [stride=5, start=17, width=2, rep=5]
    //
    // ===  ===  ===  ===  ===  ===  ===  ===  ===
    //                  ==   ==   ==   ==   ==
    // ===  ===  ===  ------------------------ ===
    let low_cutoff = inner.low() - margin as i64;
    let nlower = ceildiv(low_cutoff - outer.start as i64 - outer.width as i64, outer.stride as i64) as i32;
    let high_cutoff = inner.high() + margin as i64 + 1;
    let nupper = outer.rep - ceildiv(high_cutoff - outer.start as i64, outer.stride as i64) as i32;

    if nlower + nupper == outer.rep {
        // The new interval fits cleanly in an internal gap of outer.
        return vec![];
    }

    let mut out = Vec::with_capacity(3);
    let couter = outer.drop_ends(nlower, nupper);
    out.push(merge_fully_consumed(inner, &couter, margin));

    // Recompute the cut points against the merged central interval: merging
    // may have widened it into what were previously the head/tail.
    let low_cutoff = out[0].low() - margin as i64;
    let high_cutoff = out[0].high() + margin as i64 + 1;
    let nlower = ceildiv(low_cutoff - outer.start as i64 - outer.width as i64, outer.stride as i64) as i32;
    let nupper = outer.rep - ceildiv(high_cutoff - outer.start as i64, outer.stride as i64) as i32;
    if nlower > 0 {
        out.push(outer.drop_tail(nlower));
    }
    if nupper > 0 {
        out.push(outer.drop_head(nupper));
    }
    out
}

/// Merge an asymmetric pair, where `lower` starts no later than `upper`
/// (`low(lower) <= low(upper)`), and neither fully contains the other.
fn merge_asymmetric(lower: &ExtInterval, upper: &ExtInterval, margin: i32) -> Vec<ExtInterval> {
    if lower.high() < upper.low() - margin as i64 {
        return vec![];
    }

    //  ===  ===  ===  ===  ===  ===
    //                   ==   ==   ==   ==   ==
    //  ===  ===  ===  --------------   ==   ==
    let mut nlower = 0;
    if lower.rep > 1 {
        let cutoff = upper.low() - margin as i64;
        nlower = ceildiv(cutoff - lower.start as i64 - lower.width as i64, lower.stride as i64) as i32;
    }
    let mut nupper = 0;
    if upper.rep > 1 {
        let cutoff = lower.high() + margin as i64 + 1;
        nupper = upper.rep - ceildiv(cutoff - upper.start as i64, upper.stride as i64) as i32;
    }

    let mut out = Vec::with_capacity(3);
    let clower = lower.drop_head(lower.rep - nlower);
    let cupper = upper.drop_tail(upper.rep - nupper);
    out.push(merge_fully_consumed(&clower, &cupper, margin));

    if lower.rep > 1 {
        let low_cutoff = out[0].low() - margin as i64;
        let nlower = ceildiv(low_cutoff - lower.start as i64 - lower.width as i64, lower.stride as i64) as i32;
        if nlower > 0 {
            out.push(lower.drop_tail(nlower));
        }
    }
    if upper.rep > 1 {
        let high_cutoff = out[0].high() + margin as i64 + 1;
        let nupper = upper.rep - ceildiv(high_cutoff - upper.start as i64, upper.stride as i64) as i32;
        if nupper > 0 {
            out.push(upper.drop_head(nupper));
        }
    }
    out
}

/// Given two intervals that are known to need merging, produce a single
/// interval covering both with no internal gap exceeding `margin`.
fn merge_fully_consumed(a: &ExtInterval, b: &ExtInterval, margin: i32) -> ExtInterval {
    if (a.rep > 1 && b.rep > 1 && a.stride != b.stride) || (a.rep == 1 && b.rep == 1) {
        // The general multi-stride case is complicated and unlikely in
        // practice; fall back to the convex hull.
        return containing_interval(a, b);
    }
    let stride = if a.rep == 1 { b.stride } else { a.stride };

    let a_aligned = merge_fc_aligned(a, b, stride, margin);
    let b_aligned = merge_fc_aligned(b, a, stride, margin);
    if a_aligned.covered_area() < b_aligned.covered_area() {
        a_aligned
    } else {
        b_aligned
    }
}

/// Given two intervals of matching stride, produce an interval containing
/// both, with `start % common_stride` matching `a`'s alignment.
fn merge_fc_aligned(a: &ExtInterval, b: &ExtInterval, common_stride: i32, margin: i32) -> ExtInterval {
    let mod_a = a.start.rem_euclid(common_stride);
    let mod_b = b.start.rem_euclid(common_stride);
    let mut width = mod_b + b.width - mod_a + if mod_a > mod_b { common_stride } else { 0 };
    // Widen to the minimum level implied by e.g. long single intervals.
    width = width.max(a.width).max(b.width);
    if width >= common_stride - margin {
        return containing_interval(a, b);
    }

    let b_high = b.high();
    let pre_shift = ceildiv((a.start as i64 - b.start as i64).max(0), common_stride as i64) as i32;
    let post_shift = ceildiv(0i64.max(b_high - a.start as i64 - a.width as i64), common_stride as i64) as i32;

    let nreps = pre_shift + a.rep.max(post_shift);
    ExtInterval {
        start: a.start - common_stride * pre_shift,
        width,
        rep: nreps,
        stride: if nreps > 1 { common_stride } else { 0 },
    }
}
