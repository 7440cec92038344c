// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel and the mapping from iteration counts to
//! grey levels.

use num::{clamp, Complex};

/// The squared escape radius.  Comparing against |z|² saves a square
/// root per iteration.
const ESCAPE_NORM_SQR: f64 = 4.0;

/// This is our classic iterator function.  Starting from z = 0 it
/// iterates z = z² + c and returns the iteration on which |z|² first
/// exceeded 4.  Points that never escape return `budget`, which marks
/// them as members of the set.
///
/// Because the test follows the first squaring, a point that is
/// already far outside the radius escapes at iteration 0.
pub fn escape_time(c: Complex<f64>, budget: u32) -> u32 {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for i in 0..budget {
        z = z * z + c;
        if z.norm_sqr() > ESCAPE_NORM_SQR {
            return i;
        }
    }
    budget
}

/// Map an iteration count to a grey level.  Members of the set are
/// black; everything else is `255 * sqrt(count / budget)`, rounded,
/// which stretches out the crowded low counts near the boundary.
pub fn intensity(count: u32, budget: u32) -> u8 {
    if count >= budget {
        return 0;
    }
    let level = (255.0 * (f64::from(count) / f64::from(budget)).sqrt()).round();
    clamp(level, 0.0, 255.0) as u8
}

/// The grey level for a single point.
#[inline]
pub fn pixel_value(c: Complex<f64>, budget: u32) -> u8 {
    intensity(escape_time(c, budget), budget)
}
