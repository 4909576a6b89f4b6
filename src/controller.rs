//! Decides when a [`SpareVec`](crate::SpareVec) has to move to a new block and how much spare
//! each side of that block gets.
//!
//! Nothing in here touches memory. Every function looks at the current spare counts and returns
//! the spare layout the container should relocate to, or `None` when the current block is fine.

/// Unused slots on each side of the live band.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Spares {
    pub(crate) left: usize,
    pub(crate) right: usize,
}

impl Spares {
    /// Block size needed to hold `len` live elements with these spares.
    pub(crate) fn allocation_for(self, len: usize) -> usize {
        sum(sum(self.left, len), self.right)
    }
}

#[inline]
fn sum(a: usize, b: usize) -> usize {
    match a.checked_add(b) {
        Some(n) => n,
        None => panic!("capacity overflow"),
    }
}

/// Plan for making room for `need` elements at the front.
///
/// When the front is exhausted and the back is nearly so, both sides are reset; otherwise only the
/// front is topped up and the back keeps whatever it had. Either way the front ends up with
/// `need + step` slots, so `step` remain once the `need` new elements are written.
pub(crate) fn grow_left(current: Spares, step: usize, need: usize) -> Option<Spares> {
    if current.left >= need {
        return None;
    }
    let left = sum(need, step);
    if current.left == 0 && current.right < step / 2 {
        Some(Spares { left, right: step })
    } else {
        Some(Spares {
            left,
            right: current.right,
        })
    }
}

/// Mirror image of [`grow_left`].
pub(crate) fn grow_right(current: Spares, step: usize, need: usize) -> Option<Spares> {
    let mirrored = Spares {
        left: current.right,
        right: current.left,
    };
    grow_left(mirrored, step, need).map(|plan| Spares {
        left: plan.right,
        right: plan.left,
    })
}

/// Plan for giving back spare that has grown past `threshold` on either side.
pub(crate) fn shrink(current: Spares, step: usize, threshold: usize) -> Option<Spares> {
    let left_excess = current.left > threshold;
    let right_excess = current.right > threshold;
    match (left_excess, right_excess) {
        (true, true) => Some(Spares {
            left: step,
            right: step,
        }),
        (true, false) => Some(Spares {
            left: step,
            right: current.right,
        }),
        (false, true) => Some(Spares {
            left: current.left,
            right: step,
        }),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spares(left: usize, right: usize) -> Spares {
        Spares { left, right }
    }

    #[test]
    fn grow_is_a_no_op_when_spare_suffices() {
        assert_eq!(grow_left(spares(3, 0), 10, 3), None);
        assert_eq!(grow_right(spares(0, 5), 10, 1), None);
    }

    #[test]
    fn grow_left_tops_up_only_the_front() {
        // back still has plenty, so it is left alone
        assert_eq!(grow_left(spares(0, 7), 10, 1), Some(spares(11, 7)));
        // front not fully exhausted: top-up even if the back is low
        assert_eq!(grow_left(spares(2, 1), 10, 5), Some(spares(15, 1)));
    }

    #[test]
    fn grow_left_rebalances_when_both_sides_are_low() {
        assert_eq!(grow_left(spares(0, 4), 10, 1), Some(spares(11, 10)));
        assert_eq!(grow_left(spares(0, 0), 10, 25), Some(spares(35, 10)));
    }

    #[test]
    fn grow_right_mirrors_grow_left() {
        assert_eq!(grow_right(spares(7, 0), 10, 1), Some(spares(7, 11)));
        assert_eq!(grow_right(spares(4, 0), 10, 3), Some(spares(10, 13)));
        assert_eq!(grow_right(spares(1, 2), 10, 5), Some(spares(1, 15)));
    }

    #[test]
    fn odd_step_rounds_half_down() {
        // step / 2 == 2, so a back spare of 2 is not considered low
        assert_eq!(grow_left(spares(0, 2), 5, 1), Some(spares(6, 2)));
        assert_eq!(grow_left(spares(0, 1), 5, 1), Some(spares(6, 5)));
    }

    #[test]
    fn shrink_trims_only_wasteful_sides() {
        assert_eq!(shrink(spares(20, 20), 10, 20), None);
        assert_eq!(shrink(spares(21, 3), 10, 20), Some(spares(10, 3)));
        assert_eq!(shrink(spares(3, 21), 10, 20), Some(spares(3, 10)));
        assert_eq!(shrink(spares(40, 21), 10, 20), Some(spares(10, 10)));
    }

    #[test]
    fn allocation_for_sums_the_bands() {
        assert_eq!(spares(10, 4).allocation_for(6), 20);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn allocation_for_detects_overflow() {
        spares(usize::MAX, 1).allocation_for(1);
    }
}
