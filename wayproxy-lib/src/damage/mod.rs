//! The damage set: the collection of extended intervals describing the
//! dirty byte ranges of one shared buffer, plus the coalescing loop that
//! keeps that collection small. This is a direct translation of
//! `merge_damage_records`/`merge_core` in the reference implementation.

use crate::interval::{merge, ExtInterval};

/// Summary of a damage set's current extent, returned by [`DamageSet::bounding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounding {
    /// Inclusive low end of the lowest interval.
    pub low_inclusive: i64,
    /// Exclusive high end of the highest interval.
    pub high_exclusive: i64,
    /// Sum of `rep * width` over all retained intervals.
    pub covered_area: i64,
}

#[derive(Debug, Clone)]
enum State {
    /// The whole buffer is dirty; no further bookkeeping is useful.
    Everything,
    Tracking(Vec<ExtInterval>),
}

/// A damage set: either the absorbing *everything* state, or a coalesced
/// list of disjoint extended intervals, plus diagnostic counters.
#[derive(Debug, Clone)]
pub struct DamageSet {
    state: State,
    /// Sum of `width * rep` over every interval ever submitted, pre-coalesce.
    pub acc_damage_stat: u64,
    /// Number of intervals ever submitted (an `insert` call carrying N
    /// intervals counts N submissions, not one).
    pub acc_count: u64,
}

impl Default for DamageSet {
    fn default() -> Self {
        Self::new()
    }
}

impl DamageSet {
    pub fn new() -> Self {
        Self { state: State::Tracking(Vec::new()), acc_damage_stat: 0, acc_count: 0 }
    }

    pub fn is_everything(&self) -> bool {
        matches!(self.state, State::Everything)
    }

    /// The intervals currently retained, or `None` if the set is in the
    /// *everything* state.
    pub fn intervals(&self) -> Option<&[ExtInterval]> {
        match &self.state {
            State::Everything => None,
            State::Tracking(v) => Some(v),
        }
    }

    /// Mark the whole buffer dirty. Absorbing: further inserts are no-ops
    /// until an explicit [`DamageSet::reset`].
    pub fn set_everything(&mut self) {
        self.state = State::Everything;
    }

    /// Drop all retained intervals and zero the diagnostic counters.
    pub fn reset(&mut self) {
        self.state = State::Tracking(Vec::new());
        self.acc_damage_stat = 0;
        self.acc_count = 0;
    }

    /// Insert a batch of newly reported intervals, coalescing them into the
    /// retained list under the given merge margin.
    ///
    /// `margin` must be greater than 8 (see [`crate::config`]); this is
    /// enforced at configuration load time, not here, so the hot path stays
    /// branch-free on that check.
    pub fn insert(&mut self, new_list: &[ExtInterval], margin: i32) {
        for iv in new_list {
            self.acc_damage_stat += iv.width as u64 * iv.rep as u64;
            self.acc_count += 1;
        }

        if matches!(self.state, State::Everything) || new_list.is_empty() {
            return;
        }

        let State::Tracking(list) = &mut self.state else { unreachable!() };
        coalesce(list, new_list, margin);
    }

    /// The bounding range and covered area of this set.
    ///
    /// If *everything*, returns the saturated range and area. If empty,
    /// returns inverted sentinels (`low > high`), signalling "nothing here".
    pub fn bounding(&self) -> Bounding {
        match &self.state {
            State::Everything => {
                Bounding { low_inclusive: i64::MIN, high_exclusive: i64::MAX, covered_area: i64::MAX }
            }
            State::Tracking(list) if list.is_empty() => {
                Bounding { low_inclusive: i64::MAX, high_exclusive: i64::MIN, covered_area: 0 }
            }
            State::Tracking(list) => {
                let mut low = i64::MAX;
                let mut high = i64::MIN;
                let mut area = 0i64;
                for iv in list {
                    low = low.min(iv.low());
                    high = high.max(iv.high());
                    area += iv.covered_area();
                }
                Bounding { low_inclusive: low, high_exclusive: high, covered_area: area }
            }
        }
    }
}

/// Merge `new_list` (after smoothing) into `list` in place, maintaining the
/// invariant that every pair of retained intervals is separated by more
/// than `margin`.
///
/// Mirrors `merge_core`: a work queue seeded from the new intervals is
/// repeatedly drained against the retained list. Each pop is compared with
/// every existing entry; a non-trivial merge removes the existing entry and
/// requeues every product, since a widened interval may now collide with
/// entries already scanned this pass.
fn coalesce(list: &mut Vec<ExtInterval>, new_list: &[ExtInterval], margin: i32) {
    let mut queue: Vec<ExtInterval> = new_list.iter().map(|iv| iv.smooth(margin)).collect();

    while let Some(intv) = queue.pop() {
        let mut next_list = Vec::with_capacity(list.len());
        let mut intv_changed = false;
        let mut read_index = 0;

        while read_index < list.len() {
            let test = list[read_index];
            read_index += 1;

            let products = merge(&intv, &test, margin);
            if products.is_empty() {
                // No interaction; keep the inspected element unchanged.
                next_list.push(test);
                continue;
            }

            let existing_unchanged = products.iter().any(|p| *p == test);
            if existing_unchanged {
                next_list.push(test);
            }

            let intv_unchanged = products.iter().any(|p| *p == intv);

            for p in &products {
                // Don't requeue the two trivial "nothing happened" copies;
                // they've already been accounted for above.
                if existing_unchanged && *p == test {
                    continue;
                }
                if intv_unchanged && *p == intv {
                    continue;
                }
                queue.push(*p);
            }

            if !intv_unchanged {
                intv_changed = true;
                break;
            }
        }

        if intv_changed {
            // This pass modified `intv`; whatever wasn't yet scanned stays
            // in the list untouched, everything already scanned has been
            // copied into `next_list` above.
            next_list.extend_from_slice(&list[read_index..]);
            *list = next_list;
        } else {
            // `intv` survived unscathed against the whole list; keep it.
            next_list.push(intv);
            *list = next_list;
        }
    }
}
