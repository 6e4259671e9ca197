//! Arithmetic on surrogate values: combining two policy-bearing values joins
//! their policies; combining one with a plain scalar passes the policy
//! through unchanged, since a scalar carries no obligations of its own.

use legalease_parse::Policy;
use std::ops::{Add, Div, Mul, Sub};

use crate::dataframe::{Blackbox, NdArray, PolicyBearing};

macro_rules! join_with_surrogate {
    ($ty:ty) => {
        impl Add<&$ty> for &$ty {
            type Output = $ty;
            fn add(self, rhs: &$ty) -> $ty {
                combine(self, rhs)
            }
        }
        impl Sub<&$ty> for &$ty {
            type Output = $ty;
            fn sub(self, rhs: &$ty) -> $ty {
                combine(self, rhs)
            }
        }
        impl Mul<&$ty> for &$ty {
            type Output = $ty;
            fn mul(self, rhs: &$ty) -> $ty {
                combine(self, rhs)
            }
        }
        impl Div<&$ty> for &$ty {
            type Output = $ty;
            fn div(self, rhs: &$ty) -> $ty {
                combine(self, rhs)
            }
        }
    };
}

macro_rules! scalar_passthrough {
    ($ty:ty, $scalar:ty) => {
        impl Add<$scalar> for &$ty {
            type Output = $ty;
            fn add(self, _rhs: $scalar) -> $ty {
                passthrough(self)
            }
        }
        impl Sub<$scalar> for &$ty {
            type Output = $ty;
            fn sub(self, _rhs: $scalar) -> $ty {
                passthrough(self)
            }
        }
        impl Mul<$scalar> for &$ty {
            type Output = $ty;
            fn mul(self, _rhs: $scalar) -> $ty {
                passthrough(self)
            }
        }
        impl Div<$scalar> for &$ty {
            type Output = $ty;
            fn div(self, _rhs: $scalar) -> $ty {
                passthrough(self)
            }
        }
    };
}

fn combine<T: PolicyBearing, Out>(lhs: &T, rhs: &T) -> Out
where
    Out: From<Policy>,
{
    Out::from(lhs.policy().join(rhs.policy()))
}

fn passthrough<T: PolicyBearing, Out>(v: &T) -> Out
where
    Out: From<Policy>,
{
    Out::from(v.policy().clone())
}

impl From<Policy> for Blackbox {
    fn from(policy: Policy) -> Self {
        Blackbox { policy }
    }
}

impl From<Policy> for NdArray {
    fn from(policy: Policy) -> Self {
        NdArray::new(policy)
    }
}

join_with_surrogate!(Blackbox);
join_with_surrogate!(NdArray);
scalar_passthrough!(Blackbox, i64);
scalar_passthrough!(Blackbox, f64);
scalar_passthrough!(NdArray, i64);
scalar_passthrough!(NdArray, f64);
