//! Size-sensitive numeric bounds for generators.
//!
//! A [`Range`] describes inclusive bounds plus an origin, the shrink
//! target. In [`ScaleMode::Linear`] the bounds contract proportionally
//! toward the origin as the size parameter shrinks from 100 to 0; at
//! size 0 the range degenerates to the origin alone.

use crate::data::Size;
use crate::error::{NumericError, RangeError};
use crate::numeric::{Calculator, Real, Zero};
use std::cmp::Ordering;

/// How bounds respond to the size parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    /// Bounds are independent of size.
    Constant,
    /// Bounds contract toward the origin proportionally to size.
    Linear,
}

/// Inclusive integer bounds computed for a particular size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

/// Inclusive numeric bounds with a shrink origin, parameterized over the
/// arithmetic engine that computes sized bounds.
#[derive(Debug, Clone)]
pub struct Range<C: Calculator> {
    calc: C,
    min: C::Num,
    origin: C::Num,
    max: C::Num,
    mode: ScaleMode,
}

impl<C: Calculator> Range<C> {
    /// Build a range from three unordered values; the middle value
    /// becomes the origin, allowing an off-center shrink target.
    pub fn create_from(calc: C, x: i64, y: i64, z: i64, mode: ScaleMode) -> Range<C> {
        let mut values = [x, y, z];
        values.sort_unstable();
        let min = calc.from_i64(values[0]);
        let origin = calc.from_i64(values[1]);
        let max = calc.from_i64(values[2]);
        Range {
            calc,
            min,
            origin,
            max,
            mode,
        }
    }

    /// [`Range::create_from`] over raw engine values, validating each
    /// through the [`Real`] loader.
    pub fn create_from_nums(
        calc: C,
        x: C::Num,
        y: C::Num,
        z: C::Num,
        mode: ScaleMode,
    ) -> Result<Range<C>, NumericError> {
        let mut values = vec![
            Real::load(&calc, x)?.into_inner(),
            Real::load(&calc, y)?.into_inner(),
            Real::load(&calc, z)?.into_inner(),
        ];
        values.sort_by(|a, b| calc.compare(a, b));
        let max = values.pop().unwrap_or_else(|| calc.zero());
        let origin = values.pop().unwrap_or_else(|| calc.zero());
        let min = values.pop().unwrap_or_else(|| calc.zero());
        Ok(Range {
            calc,
            min,
            origin,
            max,
            mode,
        })
    }

    /// Build a range with an explicit origin. The origin must lie within
    /// the bounds.
    pub fn with_origin(
        calc: C,
        min: i64,
        max: i64,
        origin: i64,
        mode: ScaleMode,
    ) -> Result<Range<C>, RangeError> {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if origin < lo || origin > hi {
            return Err(RangeError::OriginOutsideBounds {
                min: lo,
                max: hi,
                origin,
            });
        }
        let min = calc.from_i64(lo);
        let max = calc.from_i64(hi);
        let origin = calc.from_i64(origin);
        Ok(Range {
            calc,
            min,
            origin,
            max,
            mode,
        })
    }

    pub fn mode(&self) -> ScaleMode {
        self.mode
    }

    pub fn min_i64(&self) -> i64 {
        self.calc.to_i64(&self.min)
    }

    pub fn origin_i64(&self) -> i64 {
        self.calc.to_i64(&self.origin)
    }

    pub fn max_i64(&self) -> i64 {
        self.calc.to_i64(&self.max)
    }

    /// Bounds for a particular size.
    ///
    /// Linear ranges scale each bound toward the origin by `size / 100`,
    /// rounding toward the origin; size 0 collapses to the origin, size
    /// 100 restores the full bounds.
    pub fn sized_bounds(&self, size: Size) -> Bounds {
        match self.mode {
            ScaleMode::Constant => Bounds {
                min: self.min_i64(),
                max: self.max_i64(),
            },
            ScaleMode::Linear => Bounds {
                min: self.scale_toward_origin(&self.min, size),
                max: self.scale_toward_origin(&self.max, size),
            },
        }
    }

    fn scale_toward_origin(&self, bound: &C::Num, size: Size) -> i64 {
        let calc = &self.calc;
        if size.get() == 0 {
            return self.origin_i64();
        }
        if size.get() >= 100 {
            return calc.to_i64(bound);
        }
        let span = calc.sub(bound, &self.origin);
        let portion = calc.mul(&span, &calc.from_i64(size.get() as i64));
        let scaled = calc.div(&portion, &calc.from_i64(100));
        let shifted = calc.add(&self.origin, &scaled);
        let rounded = calc.round_toward(&shifted, &self.origin);
        // The result lies between origin and bound by construction; the
        // clamp guards the native engine's inexactness at extreme spans.
        let result = calc.to_i64(&rounded);
        let origin = self.origin_i64();
        let bound = calc.to_i64(bound);
        if bound >= origin {
            result.clamp(origin, bound)
        } else {
            result.clamp(bound, origin)
        }
    }

    /// Distance of a value from the origin as a 0–100 proportion of its
    /// side of the range, rounded up so any non-origin value scores at
    /// least 1.
    pub fn proportional_distance(&self, value: i64) -> usize {
        let calc = &self.calc;
        let v = calc.from_i64(value);
        let side = if calc.compare(&v, &self.origin) == Ordering::Less {
            &self.min
        } else {
            &self.max
        };
        let span = calc.sub(side, &self.origin);
        if Zero::load(calc, span.clone()).is_ok() {
            return 0;
        }
        let dist = calc.sub(&v, &self.origin);
        let hundred = calc.from_i64(100);
        let pct = calc.div(&calc.mul(&dist, &hundred), &span);
        let rounded = calc.round_toward(&pct, &hundred);
        calc.to_i64(&rounded).clamp(0, 100) as usize
    }
}
