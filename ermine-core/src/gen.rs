//! Generator combinators for property-based testing.
//!
//! A generator is a function from `(Seed, Size)` to a lazy, infinite
//! stream of per-draw outcomes. Each pull is one logical draw: an
//! instance carrying a full shrink tree, a discard to be retried, or an
//! exhaustion when the domain has nothing left to offer. Streams are
//! single-use; a stream that terminates has broken the generator
//! contract and the engine aborts loudly.

use crate::data::{Seed, Size};
use crate::tree::{merge2, GenTree};
use std::fmt;
use std::rc::Rc;

/// The outcome of one draw from a generator.
#[derive(Clone)]
pub enum GenIteration<V> {
    /// A value together with its shrink tree.
    Instance(GenTree<V>),
    /// The draw was rejected by a filter; retry with the next draw.
    Discard,
    /// No value is obtainable from the generator's domain.
    Exhausted,
}

impl<V> GenIteration<V> {
    pub fn is_instance(&self) -> bool {
        matches!(self, GenIteration::Instance(_))
    }

    pub fn into_tree(self) -> Option<GenTree<V>> {
        match self {
            GenIteration::Instance(tree) => Some(tree),
            _ => None,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for GenIteration<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenIteration::Instance(tree) => f.debug_tuple("Instance").field(tree).finish(),
            GenIteration::Discard => f.write_str("Discard"),
            GenIteration::Exhausted => f.write_str("Exhausted"),
        }
    }
}

/// A single-use lazy stream of generation outcomes.
pub type GenStream<V> = Box<dyn Iterator<Item = GenIteration<V>>>;

/// A generator for test data of type `V`.
///
/// Generators are explicit, first-class values composed with combinator
/// functions rather than derived from types.
pub struct Gen<V> {
    run: Rc<dyn Fn(Seed, Size) -> GenStream<V>>,
}

impl<V> Clone for Gen<V> {
    fn clone(&self) -> Self {
        Gen {
            run: Rc::clone(&self.run),
        }
    }
}

impl<V: Clone + 'static> Gen<V> {
    /// Create a generator from a function producing one outcome stream
    /// per `(seed, size)`.
    pub fn new<F, I>(run: F) -> Self
    where
        F: Fn(Seed, Size) -> I + 'static,
        I: Iterator<Item = GenIteration<V>> + 'static,
    {
        Gen {
            run: Rc::new(move |seed, size| {
                Box::new(run(seed, size)) as GenStream<V>
            }),
        }
    }

    /// Start a stream of draws for the given seed and size.
    pub fn stream(&self, seed: Seed, size: Size) -> GenStream<V> {
        (self.run)(seed, size)
    }

    /// Pull one usable draw, retrying through discards.
    ///
    /// At most `discard_limit` discards are tolerated before the draw is
    /// reported as exhaustion. A terminating stream violates the
    /// generator contract and panics.
    pub fn draw(&self, seed: Seed, size: Size, discard_limit: usize) -> GenIteration<V> {
        let mut stream = self.stream(seed, size);
        for _ in 0..=discard_limit {
            match stream.next() {
                Some(GenIteration::Discard) => continue,
                Some(outcome) => return outcome,
                None => panic!("generator stream terminated: generator streams must be infinite"),
            }
        }
        GenIteration::Exhausted
    }

    /// A generator that always produces the same value, with no shrinks.
    pub fn constant(value: V) -> Self {
        Gen::new(move |_seed, _size| {
            let value = value.clone();
            std::iter::repeat_with(move || {
                GenIteration::Instance(GenTree::singleton(value.clone(), 0))
            })
        })
    }

    /// The degenerate generator whose domain is empty.
    pub fn exhausted() -> Self {
        Gen::new(|_seed, _size| std::iter::repeat_with(|| GenIteration::Exhausted))
    }

    /// Map a function over generated values, shrinks included.
    pub fn map<W, F>(&self, f: F) -> Gen<W>
    where
        W: Clone + 'static,
        F: Fn(&V) -> W + 'static,
    {
        let inner = self.clone();
        let f: Rc<dyn Fn(&V) -> W> = Rc::new(f);
        Gen::new(move |seed, size| {
            let f = f.clone();
            inner.stream(seed, size).map(move |draw| match draw {
                GenIteration::Instance(tree) => {
                    let f = f.clone();
                    GenIteration::Instance(tree.map(move |v| f(v)))
                }
                GenIteration::Discard => GenIteration::Discard,
                GenIteration::Exhausted => GenIteration::Exhausted,
            })
        })
    }

    /// Keep only values satisfying the predicate.
    ///
    /// A draw whose root fails becomes a discard; a surviving draw has
    /// its shrink forest pruned node-locally by the same predicate.
    pub fn filter<F>(&self, keep: F) -> Gen<V>
    where
        F: Fn(&V) -> bool + 'static,
    {
        let inner = self.clone();
        let keep: Rc<dyn Fn(&V) -> bool> = Rc::new(keep);
        Gen::new(move |seed, size| {
            let keep = keep.clone();
            inner.stream(seed, size).map(move |draw| match draw {
                GenIteration::Instance(tree) => {
                    if keep(tree.value()) {
                        let forest = tree.forest().filter(keep.clone());
                        GenIteration::Instance(GenTree::new(tree.node().clone(), forest))
                    } else {
                        GenIteration::Discard
                    }
                }
                GenIteration::Discard => GenIteration::Discard,
                GenIteration::Exhausted => GenIteration::Exhausted,
            })
        })
    }

    /// Pair two generators.
    ///
    /// The incoming seed is split once per component, so each argument
    /// draws from its own deterministically derived stream. Instances
    /// are merged into a tree of pairs; a discard on either side
    /// discards the joint draw, and exhaustion on either side exhausts
    /// it.
    pub fn zip<W: Clone + 'static>(&self, other: &Gen<W>) -> Gen<(V, W)> {
        let left = self.clone();
        let right = other.clone();
        Gen::new(move |seed, size| {
            let (left_seed, right_seed) = seed.split();
            let left_stream = left.stream(left_seed, size);
            let right_stream = right.stream(right_seed, size);
            left_stream.zip(right_stream).map(|pair| match pair {
                (GenIteration::Instance(a), GenIteration::Instance(b)) => {
                    GenIteration::Instance(merge2(&a, &b))
                }
                (GenIteration::Exhausted, _) | (_, GenIteration::Exhausted) => {
                    GenIteration::Exhausted
                }
                _ => GenIteration::Discard,
            })
        })
    }
}

/// Integer generators over sized ranges.
pub mod integer {
    use super::{Gen, GenIteration};
    use crate::numeric::{Calculator, Native};
    use crate::range::{Range, ScaleMode};
    use crate::shrink;
    use crate::tree::GenTree;

    /// Integers in `[min, max]`, bounds independent of size. Shrinks
    /// toward the in-bounds value closest to zero.
    pub fn constant(min: i64, max: i64) -> Gen<i64> {
        from_range(Range::create_from(
            Native,
            min,
            max,
            nearest_zero(min, max),
            ScaleMode::Constant,
        ))
    }

    /// Integers in `[min, max]` with bounds scaled linearly by size.
    /// Shrinks toward the in-bounds value closest to zero.
    pub fn linear(min: i64, max: i64) -> Gen<i64> {
        from_range(Range::create_from(
            Native,
            min,
            max,
            nearest_zero(min, max),
            ScaleMode::Linear,
        ))
    }

    /// The default shrink target: zero when the bounds straddle it,
    /// otherwise the bound nearest zero. Clamping keeps the origin inside
    /// `[min, max]` so it never widens the domain during sorting.
    fn nearest_zero(min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        0i64.clamp(lo, hi)
    }

    /// Linearly sized integers shrinking toward an explicit origin.
    ///
    /// Construction is total: an origin outside the bounds yields the
    /// degenerate always-exhausted generator rather than an error.
    pub fn linear_from(min: i64, max: i64, origin: i64) -> Gen<i64> {
        with_calculator(Native, min, max, origin, ScaleMode::Linear)
    }

    /// Integer generator with an explicit arithmetic engine; the
    /// per-generator selection point between the native fast path and
    /// arbitrary-precision bounds arithmetic.
    pub fn with_calculator<C: Calculator>(
        calc: C,
        min: i64,
        max: i64,
        origin: i64,
        mode: ScaleMode,
    ) -> Gen<i64> {
        match Range::with_origin(calc, min, max, origin, mode) {
            Ok(range) => from_range(range),
            Err(_) => Gen::exhausted(),
        }
    }

    fn from_range<C: Calculator>(range: Range<C>) -> Gen<i64> {
        Gen::new(move |seed, size| {
            let range = range.clone();
            seed.stream().map(move |draw_seed| {
                let bounds = range.sized_bounds(size);
                let value = draw_seed.next_int(bounds.min, bounds.max);
                let origin = range.origin_i64();
                let complexity_range = range.clone();
                let tree = GenTree::unfold(
                    value,
                    |v: &i64| *v,
                    move |v: &i64| complexity_range.proportional_distance(*v) as u64,
                    move |v: &i64| shrink::towards(origin, *v).into_iter(),
                );
                GenIteration::Instance(tree)
            })
        })
    }
}
