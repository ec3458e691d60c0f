//! Closed real intervals and their arithmetic.
//!
//! An [`Interval`] `[lo, hi]` is the primitive every bound in the search is
//! expressed in. The arithmetic here is the natural interval extension: an
//! objective written with these operators returns an enclosure of the true
//! range over its input intervals. Results are rounded to nearest, not
//! outward.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{MinimizeError, Result};

/// A closed interval `[lo, hi]` with `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    /// Lower bound.
    pub lo: f64,
    /// Upper bound.
    pub hi: f64,
}

impl Interval {
    /// Create a new interval. Bounds are expected to be ordered.
    #[inline]
    pub fn new(lo: f64, hi: f64) -> Self {
        debug_assert!(lo <= hi, "lo ({}) > hi ({})", lo, hi);
        Self { lo, hi }
    }

    /// Create a new interval, rejecting NaN and reversed bounds.
    pub fn try_new(lo: f64, hi: f64) -> Result<Self> {
        // `!(lo <= hi)` also catches NaN on either side.
        if !(lo <= hi) {
            return Err(MinimizeError::InvalidInterval { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Degenerate interval `[v, v]`.
    #[inline]
    pub fn point(v: f64) -> Self {
        Self { lo: v, hi: v }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// Midpoint. Halving each end first keeps it finite for any finite
    /// interval, including ones near `f64::MAX`.
    #[inline]
    pub fn mid(&self) -> f64 {
        0.5 * self.lo + 0.5 * self.hi
    }

    /// True if the midpoint falls strictly inside, so bisecting shrinks both
    /// halves. False once the interval is down to adjacent floats.
    #[inline]
    pub fn is_divisible(&self) -> bool {
        let m = self.mid();
        self.lo < m && m < self.hi
    }

    /// Split at the midpoint into `([lo, mid], [mid, hi])`.
    #[inline]
    pub fn bisect(&self) -> (Self, Self) {
        let m = self.mid();
        (Self::new(self.lo, m), Self::new(m, self.hi))
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }

    /// True if `other` lies entirely within `self`.
    #[inline]
    pub fn encloses(&self, other: &Self) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    /// Smallest interval containing both `self` and `other`.
    #[inline]
    pub fn hull(&self, other: &Self) -> Self {
        Self::new(self.lo.min(other.lo), self.hi.max(other.hi))
    }

    /// Square, tight when the interval straddles zero.
    pub fn sqr(self) -> Self {
        let (a, b) = (self.lo * self.lo, self.hi * self.hi);
        if self.lo >= 0.0 {
            Self::new(a, b)
        } else if self.hi <= 0.0 {
            Self::new(b, a)
        } else {
            Self::new(0.0, a.max(b))
        }
    }

    /// Integer power.
    pub fn powi(self, n: u32) -> Self {
        match n {
            0 => Self::point(1.0),
            1 => self,
            2 => self.sqr(),
            _ => {
                let e = n as i32;
                let (a, b) = (self.lo.powi(e), self.hi.powi(e));
                if n % 2 == 1 || self.lo >= 0.0 {
                    Self::new(a, b)
                } else if self.hi <= 0.0 {
                    Self::new(b, a)
                } else {
                    Self::new(0.0, a.max(b))
                }
            }
        }
    }

    /// Total order keyed on the lower bound, then the upper bound.
    #[inline]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.lo
            .total_cmp(&other.lo)
            .then_with(|| self.hi.total_cmp(&other.hi))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Forward the caller's precision to both bounds.
        write!(f, "[")?;
        fmt::Display::fmt(&self.lo, f)?;
        write!(f, ", ")?;
        fmt::Display::fmt(&self.hi, f)?;
        write!(f, "]")
    }
}

impl Add for Interval {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.lo + rhs.lo, self.hi + rhs.hi)
    }
}

impl Add<f64> for Interval {
    type Output = Self;

    #[inline]
    fn add(self, rhs: f64) -> Self {
        Self::new(self.lo + rhs, self.hi + rhs)
    }
}

impl Add<Interval> for f64 {
    type Output = Interval;

    #[inline]
    fn add(self, rhs: Interval) -> Interval {
        rhs + self
    }
}

impl Sub for Interval {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.lo - rhs.hi, self.hi - rhs.lo)
    }
}

impl Sub<f64> for Interval {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: f64) -> Self {
        Self::new(self.lo - rhs, self.hi - rhs)
    }
}

impl Sub<Interval> for f64 {
    type Output = Interval;

    #[inline]
    fn sub(self, rhs: Interval) -> Interval {
        Interval::new(self - rhs.hi, self - rhs.lo)
    }
}

impl Neg for Interval {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.hi, -self.lo)
    }
}

impl Mul for Interval {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let p = [
            self.lo * rhs.lo,
            self.lo * rhs.hi,
            self.hi * rhs.lo,
            self.hi * rhs.hi,
        ];
        let lo = p.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = p.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self::new(lo, hi)
    }
}

impl Mul<Interval> for f64 {
    type Output = Interval;

    #[inline]
    fn mul(self, rhs: Interval) -> Interval {
        if self >= 0.0 {
            Interval::new(self * rhs.lo, self * rhs.hi)
        } else {
            Interval::new(self * rhs.hi, self * rhs.lo)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_and_mid() {
        let i = Interval::new(-2.0, 6.0);
        assert_eq!(i.width(), 8.0);
        assert_eq!(i.mid(), 2.0);
    }

    #[test]
    fn test_try_new_rejects_reversed_and_nan() {
        assert!(Interval::try_new(1.0, 0.0).is_err());
        assert!(Interval::try_new(f64::NAN, 1.0).is_err());
        assert!(Interval::try_new(0.0, f64::NAN).is_err());
        assert!(Interval::try_new(1.0, 1.0).is_ok());
    }

    #[test]
    fn test_bisect_shares_midpoint() {
        let (l, r) = Interval::new(-2.0, 2.0).bisect();
        assert_eq!(l, Interval::new(-2.0, 0.0));
        assert_eq!(r, Interval::new(0.0, 2.0));
    }

    #[test]
    fn test_sqr_straddling_zero() {
        assert_eq!(Interval::new(-3.0, 2.0).sqr(), Interval::new(0.0, 9.0));
        assert_eq!(Interval::new(-3.0, -1.0).sqr(), Interval::new(1.0, 9.0));
        assert_eq!(Interval::new(1.0, 2.0).sqr(), Interval::new(1.0, 4.0));
    }

    #[test]
    fn test_powi_odd_and_even() {
        assert_eq!(Interval::new(-2.0, 1.0).powi(3), Interval::new(-8.0, 1.0));
        assert_eq!(Interval::new(-2.0, 1.0).powi(4), Interval::new(0.0, 16.0));
        assert_eq!(Interval::new(-2.0, -1.0).powi(4), Interval::new(1.0, 16.0));
        assert_eq!(Interval::new(-2.0, 1.0).powi(0), Interval::point(1.0));
    }

    #[test]
    fn test_mul_sign_cases() {
        let a = Interval::new(-1.0, 2.0);
        let b = Interval::new(-3.0, 4.0);
        assert_eq!(a * b, Interval::new(-6.0, 8.0));
        assert_eq!(-2.0 * a, Interval::new(-4.0, 2.0));
    }

    #[test]
    fn test_sub_is_not_cancelling() {
        // x - x over [0, 1] is [-1, 1]: the dependency problem of interval
        // arithmetic, still a valid enclosure of {0}.
        let x = Interval::new(0.0, 1.0);
        let d = x - x;
        assert_eq!(d, Interval::new(-1.0, 1.0));
        assert!(d.contains(0.0));
    }

    #[test]
    fn test_enclosure_holds_on_samples() {
        let x = Interval::new(-1.5, 0.75);
        let y = Interval::new(0.25, 2.0);
        let r = x.sqr() * y - 3.0 * x + 1.0;
        for i in 0..=20 {
            for j in 0..=20 {
                let px = x.lo + x.width() * (i as f64) / 20.0;
                let py = y.lo + y.width() * (j as f64) / 20.0;
                let v = px * px * py - 3.0 * px + 1.0;
                assert!(r.contains(v), "{} not in {}", v, r);
            }
        }
    }

    #[test]
    fn test_total_cmp_orders_by_lower_bound() {
        let a = Interval::new(0.0, 10.0);
        let b = Interval::new(1.0, 2.0);
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        assert_eq!(
            Interval::new(1.0, 2.0).total_cmp(&Interval::new(1.0, 3.0)),
            Ordering::Less
        );
    }

    #[test]
    fn test_display_forwards_precision() {
        let i = Interval::new(0.126, 1.0);
        assert_eq!(format!("{:.2}", i), "[0.13, 1.00]");
        assert_eq!(format!("{}", i), "[0.126, 1]");
    }

    #[test]
    fn test_mid_near_max_stays_finite() {
        let i = Interval::new(1e308, 1.5e308);
        let m = i.mid();
        assert!(m.is_finite());
        assert!(i.lo < m && m < i.hi);
        let (l, r) = i.bisect();
        assert!(l.width().is_finite() && r.width().is_finite());
        assert_eq!((l.lo, r.hi), (i.lo, i.hi));

        let wide = Interval::new(-f64::MAX, f64::MAX);
        assert_eq!(wide.mid(), 0.0);
    }

    #[test]
    fn test_divisible_until_adjacent_floats() {
        assert!(Interval::new(0.0, 1.0).is_divisible());
        let next = f64::from_bits(1.0f64.to_bits() + 1);
        assert!(!Interval::new(1.0, next).is_divisible());
        assert!(!Interval::point(2.0).is_divisible());
        let two_ulps = f64::from_bits(1.0f64.to_bits() + 2);
        assert!(Interval::new(1.0, two_ulps).is_divisible());
    }

    #[test]
    fn test_hull_and_encloses() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(2.0, 3.0);
        let h = a.hull(&b);
        assert_eq!(h, Interval::new(0.0, 3.0));
        assert!(h.encloses(&a) && h.encloses(&b));
        assert!(!a.encloses(&h));
    }
}
