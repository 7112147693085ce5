// MIT/Apache2 License

//! Floating point comparisons tolerant of accumulated rounding error.

use num_traits::Float;

#[inline]
fn ten<Num: Float>() -> Num {
    Num::from(10.0).unwrap_or_else(Num::one)
}

/// Whether two numbers are equal within a tolerance scaled by their magnitude.
#[inline]
pub fn are_close<Num: Float>(a: Num, b: Num) -> bool {
    // infinities are only close to themselves
    if a == b {
        return true;
    }

    let eps = (a.abs() + b.abs() + ten()) * Num::epsilon();
    let delta = a - b;
    -eps < delta && eps > delta
}

#[inline]
pub fn is_zero<Num: Float>(value: Num) -> bool {
    value.abs() < ten::<Num>() * Num::epsilon()
}

#[inline]
pub fn is_one<Num: Float>(value: Num) -> bool {
    (value - Num::one()).abs() < ten::<Num>() * Num::epsilon()
}

#[inline]
pub fn less_than<Num: Float>(a: Num, b: Num) -> bool {
    a < b && !are_close(a, b)
}

#[inline]
pub fn greater_than<Num: Float>(a: Num, b: Num) -> bool {
    a > b && !are_close(a, b)
}

#[inline]
pub fn less_than_or_close<Num: Float>(a: Num, b: Num) -> bool {
    a < b || are_close(a, b)
}

#[inline]
pub fn greater_than_or_close<Num: Float>(a: Num, b: Num) -> bool {
    a > b || are_close(a, b)
}

/// Whether `value` lies in `[0, 1]`, with both ends tolerant.
#[inline]
pub fn is_between_zero_and_one<Num: Float>(value: Num) -> bool {
    greater_than_or_close(value, Num::zero()) && less_than_or_close(value, Num::one())
}
