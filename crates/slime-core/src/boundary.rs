//! Out-of-bounds handling for agent positions, deposits, and sensor samples.

/// How the simulation treats coordinates outside `[0,width) × [0,height)`.
///
/// One policy is applied uniformly to every boundary-crossing operation:
/// post-movement positions, deposits, and sensor samples. Leaving the field
/// is an expected steady-state event, never an error.
///
/// # Examples
///
/// ```
/// use slime_core::{resolve_axis, BoundaryPolicy};
///
/// assert_eq!(resolve_axis(-1, 4, BoundaryPolicy::Discard), None);
/// assert_eq!(resolve_axis(-1, 4, BoundaryPolicy::Clamp), Some(0));
/// assert_eq!(resolve_axis(-1, 4, BoundaryPolicy::Wrap), Some(3));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryPolicy {
    /// Positions are left unconstrained. Deposits outside the field are
    /// dropped and out-of-range sensor cells contribute nothing.
    Discard,
    /// Positions are clamped into the field; sample cells clamp to the edge.
    #[default]
    Clamp,
    /// Positions and sample cells wrap to the opposite side (torus).
    Wrap,
}

/// Resolve one integer axis coordinate against an axis of length `len`.
///
/// Returns `None` only for [`BoundaryPolicy::Discard`] out-of-range values.
/// `len` must be non-zero.
pub fn resolve_axis(val: i64, len: usize, policy: BoundaryPolicy) -> Option<usize> {
    let n = len as i64;
    if val >= 0 && val < n {
        return Some(val as usize);
    }
    match policy {
        BoundaryPolicy::Discard => None,
        BoundaryPolicy::Clamp => Some(val.clamp(0, n - 1) as usize),
        BoundaryPolicy::Wrap => Some(val.rem_euclid(n) as usize),
    }
}

/// The integer cell coordinate containing `v`.
///
/// Infinities saturate to `i64::MIN`/`i64::MAX` and so resolve like any
/// other far-away coordinate. NaN has no cell.
///
/// ```
/// use slime_core::boundary::quantize;
///
/// assert_eq!(quantize(-0.5), Some(-1));
/// assert_eq!(quantize(f32::INFINITY), Some(i64::MAX));
/// assert_eq!(quantize(f32::NAN), None);
/// ```
pub fn quantize(v: f32) -> Option<i64> {
    if v.is_nan() {
        None
    } else {
        Some(v.floor() as i64)
    }
}

/// Apply the policy to a continuous position after movement.
///
/// `Clamp` keeps the position strictly below the upper bound so that the
/// quantised cell is always in range; both map NaN to `0.0`. `Discard`
/// returns the input unchanged, including non-finite values, which then
/// have no in-range cell.
pub fn resolve_position(
    (x, y): (f32, f32),
    width: usize,
    height: usize,
    policy: BoundaryPolicy,
) -> (f32, f32) {
    match policy {
        BoundaryPolicy::Discard => (x, y),
        BoundaryPolicy::Clamp => (clamp_coord(x, width), clamp_coord(y, height)),
        BoundaryPolicy::Wrap => (wrap_coord(x, width), wrap_coord(y, height)),
    }
}

fn upper_bound(len: usize) -> f32 {
    let len = len as f32;
    len - len * f32::EPSILON
}

fn clamp_coord(v: f32, len: usize) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, upper_bound(len))
}

fn wrap_coord(v: f32, len: usize) -> f32 {
    if !v.is_finite() {
        return 0.0;
    }
    let l = len as f32;
    let wrapped = v.rem_euclid(l);
    if wrapped >= l {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn in_range_is_identity_for_all_policies() {
        for policy in [
            BoundaryPolicy::Discard,
            BoundaryPolicy::Clamp,
            BoundaryPolicy::Wrap,
        ] {
            assert_eq!(resolve_axis(2, 5, policy), Some(2));
            assert_eq!(resolve_axis(0, 5, policy), Some(0));
            assert_eq!(resolve_axis(4, 5, policy), Some(4));
        }
    }

    #[test]
    fn discard_drops_out_of_range() {
        assert_eq!(resolve_axis(-1, 5, BoundaryPolicy::Discard), None);
        assert_eq!(resolve_axis(5, 5, BoundaryPolicy::Discard), None);
    }

    #[test]
    fn clamp_pins_to_edges() {
        assert_eq!(resolve_axis(-3, 5, BoundaryPolicy::Clamp), Some(0));
        assert_eq!(resolve_axis(9, 5, BoundaryPolicy::Clamp), Some(4));
    }

    #[test]
    fn wrap_is_periodic() {
        assert_eq!(resolve_axis(-1, 5, BoundaryPolicy::Wrap), Some(4));
        assert_eq!(resolve_axis(5, 5, BoundaryPolicy::Wrap), Some(0));
        assert_eq!(resolve_axis(12, 5, BoundaryPolicy::Wrap), Some(2));
    }

    #[test]
    fn clamp_position_stays_below_upper_edge() {
        let (x, y) = resolve_position((4.0, -2.0), 4, 4, BoundaryPolicy::Clamp);
        assert!(x < 4.0);
        assert_eq!(x.floor(), 3.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn wrap_position_crosses_to_other_side() {
        let (x, y) = resolve_position((4.5, -0.5), 4, 4, BoundaryPolicy::Wrap);
        assert!((x - 0.5).abs() < 1e-6);
        assert!((y - 3.5).abs() < 1e-6);
    }

    #[test]
    fn discard_position_is_untouched() {
        let p = (-7.25, 100.5);
        assert_eq!(resolve_position(p, 4, 4, BoundaryPolicy::Discard), p);
    }

    #[test]
    fn clamp_and_wrap_recover_non_finite_positions() {
        for policy in [BoundaryPolicy::Clamp, BoundaryPolicy::Wrap] {
            let (x, y) = resolve_position((f32::NAN, f32::INFINITY), 4, 4, policy);
            assert!((0.0..4.0).contains(&x), "{policy:?} x={x}");
            assert!((0.0..4.0).contains(&y), "{policy:?} y={y}");
        }
    }

    #[test]
    fn far_coordinates_resolve_without_overflow() {
        assert_eq!(resolve_axis(i64::MAX, 4, BoundaryPolicy::Discard), None);
        assert_eq!(resolve_axis(i64::MIN, 4, BoundaryPolicy::Clamp), Some(0));
        assert_eq!(resolve_axis(i64::MAX, 4, BoundaryPolicy::Clamp), Some(3));
        assert_eq!(resolve_axis(i64::MAX, 4, BoundaryPolicy::Wrap), Some(3));
        assert_eq!(quantize(f32::NEG_INFINITY), Some(i64::MIN));
        assert_eq!(quantize(1.0e19), Some(i64::MAX));
    }

    proptest! {
        #[test]
        fn constrained_positions_land_in_bounds(
            x in -1.0e4f32..1.0e4,
            y in -1.0e4f32..1.0e4,
            w in 1usize..512,
            h in 1usize..512,
            wrap in any::<bool>(),
        ) {
            let policy = if wrap { BoundaryPolicy::Wrap } else { BoundaryPolicy::Clamp };
            let (rx, ry) = resolve_position((x, y), w, h, policy);
            prop_assert!(rx >= 0.0 && rx < w as f32, "x={rx} w={w}");
            prop_assert!(ry >= 0.0 && ry < h as f32, "y={ry} h={h}");
        }

        #[test]
        fn resolved_axis_is_in_range(val in -1000i64..1000, len in 1usize..64) {
            for policy in [BoundaryPolicy::Clamp, BoundaryPolicy::Wrap] {
                let r = resolve_axis(val, len, policy);
                prop_assert!(matches!(r, Some(v) if v < len));
            }
        }
    }
}
