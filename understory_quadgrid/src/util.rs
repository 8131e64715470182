// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Round to the nearest integer, ties away from zero.
///
/// This is `sign(v) * round(|v|)`: the magnitude is rounded and the sign
/// reattached, so `2.5 -> 3`, `-2.5 -> -3` and `-0.4 -> 0`. Out-of-range values
/// saturate to the `i64` bounds and NaN maps to 0.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Cell indices are intentionally i64; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn sign_round(v: f64) -> i64 {
    // Truncates toward zero. `t` is exact whenever `v` is in range, which makes
    // the fractional part below exact too.
    let t = v as i64;
    let frac = v - t as f64;
    if frac >= 0.5 {
        t.saturating_add(1)
    } else if frac <= -0.5 {
        t.saturating_sub(1)
    } else {
        t
    }
}
