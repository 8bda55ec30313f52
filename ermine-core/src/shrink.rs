//! Reusable atomic shrinkers.
//!
//! These produce candidate lists, not trees; [`crate::tree::GenTree`]
//! expansion turns them into full shrink forests. Candidates are ordered
//! most-aggressive first (the origin itself, then progressively closer to
//! the failing value), which is what gives the minimizer its binary-search
//! behavior.

/// Candidates between `origin` and `value`, starting at the origin and
/// closing in on `value`.
///
/// Every candidate lies strictly between the two (inclusive of the
/// origin), so shrinking never escapes the domain the value was drawn
/// from. Arithmetic is done in i128 so extreme i64 spans cannot overflow.
pub fn towards(origin: i64, value: i64) -> Vec<i64> {
    if origin == value {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut step = value as i128 - origin as i128;
    while step != 0 {
        out.push((value as i128 - step) as i64);
        step /= 2;
    }
    out
}

/// Whole-structure list reductions: drop chunks of size `len`, `len/2`,
/// …, 1 at every position. The empty list comes first.
pub fn removes<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let len = items.len();
    let mut out = Vec::new();
    let mut chunk = len;
    while chunk > 0 {
        let mut start = 0;
        while start + chunk <= len {
            let mut reduced = Vec::with_capacity(len - chunk);
            reduced.extend_from_slice(&items[..start]);
            reduced.extend_from_slice(&items[start + chunk..]);
            out.push(reduced);
            start += chunk;
        }
        chunk /= 2;
    }
    out
}
