//! Generic arithmetic for size-sensitive bounds calculation.
//!
//! A [`Calculator`] abstracts the number representation a range does its
//! arithmetic in. Two engines are provided: [`Native`] (f64, the fast
//! path) and [`Precise`] (arbitrary-precision rationals, exact division
//! and rounding). Engines are selected per generator, never globally.
//!
//! The branded wrappers ([`Real`], [`Integer`], [`Natural`], [`Zero`],
//! [`One`]) validate at construction time and carry no runtime overhead
//! beyond the wrapped value; passing the wrong shape of number becomes a
//! typed error at the boundary instead of a silent miscalculation later.

use crate::error::NumericError;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};
use std::cmp::Ordering;
use std::fmt;

/// Arithmetic capability over a number representation.
pub trait Calculator: Clone + 'static {
    /// The number representation this engine computes in.
    type Num: Clone + PartialEq + fmt::Debug + fmt::Display + 'static;

    fn from_i64(&self, value: i64) -> Self::Num;

    /// Convert back to `i64`, saturating at the representable extremes.
    fn to_i64(&self, value: &Self::Num) -> i64;

    fn add(&self, a: &Self::Num, b: &Self::Num) -> Self::Num;
    fn sub(&self, a: &Self::Num, b: &Self::Num) -> Self::Num;
    fn mul(&self, a: &Self::Num, b: &Self::Num) -> Self::Num;

    /// Divide `a` by `b`. `b` must be nonzero.
    fn div(&self, a: &Self::Num, b: &Self::Num) -> Self::Num;

    /// Remainder of `a / b`. `b` must be nonzero.
    fn rem(&self, a: &Self::Num, b: &Self::Num) -> Self::Num;

    fn pow(&self, base: &Self::Num, exp: u32) -> Self::Num;

    /// Round to an integral value, moving toward `target`.
    fn round_toward(&self, value: &Self::Num, target: &Self::Num) -> Self::Num;

    fn compare(&self, a: &Self::Num, b: &Self::Num) -> Ordering;

    fn is_finite(&self, value: &Self::Num) -> bool;
    fn is_integer(&self, value: &Self::Num) -> bool;

    fn zero(&self) -> Self::Num {
        self.from_i64(0)
    }

    fn one(&self) -> Self::Num {
        self.from_i64(1)
    }
}

/// Native floating-point engine: fast, inexact beyond 2^53.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Native;

impl Calculator for Native {
    type Num = f64;

    fn from_i64(&self, value: i64) -> f64 {
        value as f64
    }

    fn to_i64(&self, value: &f64) -> i64 {
        if *value >= i64::MAX as f64 {
            i64::MAX
        } else if *value <= i64::MIN as f64 {
            i64::MIN
        } else {
            *value as i64
        }
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    fn sub(&self, a: &f64, b: &f64) -> f64 {
        a - b
    }

    fn mul(&self, a: &f64, b: &f64) -> f64 {
        a * b
    }

    fn div(&self, a: &f64, b: &f64) -> f64 {
        a / b
    }

    fn rem(&self, a: &f64, b: &f64) -> f64 {
        a % b
    }

    fn pow(&self, base: &f64, exp: u32) -> f64 {
        base.powi(exp as i32)
    }

    fn round_toward(&self, value: &f64, target: &f64) -> f64 {
        if value.fract() == 0.0 {
            *value
        } else if value > target {
            value.floor()
        } else {
            value.ceil()
        }
    }

    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }

    fn is_finite(&self, value: &f64) -> bool {
        value.is_finite()
    }

    fn is_integer(&self, value: &f64) -> bool {
        value.is_finite() && value.fract() == 0.0
    }
}

/// Arbitrary-precision rational engine: exact division and rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Precise;

impl Calculator for Precise {
    type Num = BigRational;

    fn from_i64(&self, value: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(value))
    }

    fn to_i64(&self, value: &BigRational) -> i64 {
        match value.to_integer().to_i64() {
            Some(n) => n,
            None if value.is_negative() => i64::MIN,
            None => i64::MAX,
        }
    }

    fn add(&self, a: &BigRational, b: &BigRational) -> BigRational {
        a + b
    }

    fn sub(&self, a: &BigRational, b: &BigRational) -> BigRational {
        a - b
    }

    fn mul(&self, a: &BigRational, b: &BigRational) -> BigRational {
        a * b
    }

    fn div(&self, a: &BigRational, b: &BigRational) -> BigRational {
        a / b
    }

    fn rem(&self, a: &BigRational, b: &BigRational) -> BigRational {
        a % b
    }

    fn pow(&self, base: &BigRational, exp: u32) -> BigRational {
        let mut out = self.one();
        for _ in 0..exp {
            out = &out * base;
        }
        out
    }

    fn round_toward(&self, value: &BigRational, target: &BigRational) -> BigRational {
        if value.is_integer() {
            value.clone()
        } else if value > target {
            value.floor()
        } else {
            value.ceil()
        }
    }

    fn compare(&self, a: &BigRational, b: &BigRational) -> Ordering {
        a.cmp(b)
    }

    fn is_finite(&self, _value: &BigRational) -> bool {
        true
    }

    fn is_integer(&self, value: &BigRational) -> bool {
        value.is_integer()
    }
}

/// A finite real number.
#[derive(Debug, Clone, PartialEq)]
pub struct Real<C: Calculator>(C::Num);

impl<C: Calculator> Real<C> {
    pub fn load(calc: &C, value: C::Num) -> Result<Self, NumericError> {
        if calc.is_finite(&value) {
            Ok(Real(value))
        } else {
            Err(NumericError::NotReal(value.to_string()))
        }
    }

    pub fn get(&self) -> &C::Num {
        &self.0
    }

    pub fn into_inner(self) -> C::Num {
        self.0
    }
}

/// A finite integral number.
#[derive(Debug, Clone, PartialEq)]
pub struct Integer<C: Calculator>(C::Num);

impl<C: Calculator> Integer<C> {
    pub fn load(calc: &C, value: C::Num) -> Result<Self, NumericError> {
        if calc.is_integer(&value) {
            Ok(Integer(value))
        } else {
            Err(NumericError::NotInteger(value.to_string()))
        }
    }

    pub fn get(&self) -> &C::Num {
        &self.0
    }

    pub fn into_inner(self) -> C::Num {
        self.0
    }
}

/// A non-negative integral number.
#[derive(Debug, Clone, PartialEq)]
pub struct Natural<C: Calculator>(C::Num);

impl<C: Calculator> Natural<C> {
    pub fn load(calc: &C, value: C::Num) -> Result<Self, NumericError> {
        if calc.is_integer(&value) && calc.compare(&value, &calc.zero()) != Ordering::Less {
            Ok(Natural(value))
        } else {
            Err(NumericError::NotNatural(value.to_string()))
        }
    }

    pub fn get(&self) -> &C::Num {
        &self.0
    }

    pub fn into_inner(self) -> C::Num {
        self.0
    }
}

/// A witness that a value is exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Zero<C: Calculator>(C::Num);

impl<C: Calculator> Zero<C> {
    pub fn load(calc: &C, value: C::Num) -> Result<Self, NumericError> {
        if value == calc.zero() {
            Ok(Zero(value))
        } else {
            Err(NumericError::NotZero(value.to_string()))
        }
    }

    pub fn get(&self) -> &C::Num {
        &self.0
    }
}

/// A witness that a value is exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct One<C: Calculator>(C::Num);

impl<C: Calculator> One<C> {
    pub fn load(calc: &C, value: C::Num) -> Result<Self, NumericError> {
        if value == calc.one() {
            Ok(One(value))
        } else {
            Err(NumericError::NotOne(value.to_string()))
        }
    }

    pub fn get(&self) -> &C::Num {
        &self.0
    }
}
