//! Property definitions and the minimal-counterexample runner.
//!
//! A property pairs a generator with a predicate. Checking it drives
//! iterations across a size schedule, splitting the run seed once per
//! iteration, and on a predicate failure performs a depth-first search
//! through the shrink tree for a locally-minimal counterexample. The
//! recorded seed, size, and shrink path fully reproduce the result
//! without re-running the search.

use crate::data::{PropertyConfig, Seed, Size};
use crate::error::{ValidationKind, ValidationProblem};
use crate::gen::{Gen, GenIteration};
use crate::tree::GenTree;
use std::fmt;
use std::rc::Rc;

/// The minimal failing values and the path that reached them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterexample<V> {
    /// The locally-minimal failing values.
    pub values: V,
    /// The values as originally generated, before shrinking.
    pub original_values: V,
    /// Child indices chosen during minimization; replaying them with
    /// [`GenTree::navigate`] relocates the minimal node exactly.
    pub shrink_path: Vec<usize>,
}

/// Outcome of checking a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyResult<V> {
    /// Every iteration passed.
    Success { iterations: u64 },

    /// The predicate was falsified and the counterexample minimized.
    Falsified {
        /// Seed to hand back to [`crate::property::Property::check`]
        /// (with `size` and the shrink path) to reproduce this failure.
        seed: Seed,
        size: Size,
        iteration: u64,
        shrinks: usize,
        counterexample: Counterexample<V>,
    },

    /// A generator ran out of usable values.
    Exhausted {
        iterations_requested: u64,
        iterations_completed: u64,
    },

    /// The configuration was malformed; nothing was generated.
    ValidationFailure(ValidationProblem),
}

impl<V> PropertyResult<V> {
    pub fn is_success(&self) -> bool {
        matches!(self, PropertyResult::Success { .. })
    }

    pub fn is_falsified(&self) -> bool {
        matches!(self, PropertyResult::Falsified { .. })
    }
}

impl<V: fmt::Debug> fmt::Display for PropertyResult<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyResult::Success { iterations } => {
                write!(f, "  ✓ property passed {iterations} iterations.")
            }
            PropertyResult::Falsified {
                seed,
                size,
                iteration,
                shrinks,
                counterexample,
            } => {
                writeln!(
                    f,
                    "  ✗ property falsified at iteration {iteration} ({seed}, {size}, {shrinks} shrinks examined)."
                )?;
                writeln!(f, "    original: {:?}", counterexample.original_values)?;
                writeln!(f, "    shrink path: {:?}", counterexample.shrink_path)?;
                write!(
                    f,
                    "    minimal counterexample: {:?}",
                    counterexample.values
                )
            }
            PropertyResult::Exhausted {
                iterations_requested,
                iterations_completed,
            } => {
                write!(
                    f,
                    "  ⚐ property exhausted after {iterations_completed} of {iterations_requested} iterations."
                )
            }
            PropertyResult::ValidationFailure(problem) => {
                write!(f, "  ✗ {problem}")
            }
        }
    }
}

/// A property that can be checked with generated inputs.
pub struct Property<V> {
    gen: Gen<V>,
    predicate: Rc<dyn Fn(&V) -> bool>,
}

/// Create a property from a generator and a predicate.
pub fn property<V, F>(gen: Gen<V>, predicate: F) -> Property<V>
where
    V: Clone + 'static,
    F: Fn(&V) -> bool + 'static,
{
    Property::new(gen, predicate)
}

impl<V: Clone + 'static> Property<V> {
    pub fn new<F>(gen: Gen<V>, predicate: F) -> Self
    where
        F: Fn(&V) -> bool + 'static,
    {
        Property {
            gen,
            predicate: Rc::new(predicate),
        }
    }

    /// Check the property under the given configuration.
    ///
    /// Predicate panics are not caught; they propagate to the caller
    /// as distinct from a predicate returning false.
    pub fn check(&self, config: &PropertyConfig) -> PropertyResult<V> {
        if let Err(problem) = validate(config) {
            return PropertyResult::ValidationFailure(problem);
        }
        if let Some(path) = &config.shrink_path {
            return self.replay(config, path);
        }

        let mut carry = config.seed;
        for iteration in 1..=config.iterations {
            let size = size_for(iteration, config.iterations, config.size);
            let iteration_seed = carry;
            let (draw_seed, next) = carry.split();
            carry = next;

            match self.gen.draw(draw_seed, size, config.discard_limit) {
                GenIteration::Exhausted => {
                    return PropertyResult::Exhausted {
                        iterations_requested: config.iterations,
                        iterations_completed: iteration - 1,
                    }
                }
                GenIteration::Discard => {
                    unreachable!("draw resolves discards before returning")
                }
                GenIteration::Instance(tree) => {
                    if !(self.predicate)(tree.value()) {
                        let (minimal, shrink_path, shrinks) =
                            self.minimize(&tree, config.shrink_limit);
                        return PropertyResult::Falsified {
                            seed: iteration_seed,
                            size,
                            iteration,
                            shrinks,
                            counterexample: Counterexample {
                                values: minimal.value().clone(),
                                original_values: tree.value().clone(),
                                shrink_path,
                            },
                        };
                    }
                }
            }
        }

        PropertyResult::Success {
            iterations: config.iterations,
        }
    }

    /// Depth-first minimal counterexample search.
    ///
    /// Scans each node's forest in order (culling shrinks before
    /// per-element shrinks), recursing into the first child that still
    /// fails; stops at a node none of whose children fail, or when the
    /// shrink limit is reached.
    fn minimize(
        &self,
        tree: &GenTree<V>,
        shrink_limit: usize,
    ) -> (GenTree<V>, Vec<usize>, usize) {
        let mut current = tree.clone();
        let mut path = Vec::new();
        let mut examined = 0usize;

        'search: loop {
            let forest = current.forest().clone();
            for (index, child) in forest.iter().enumerate() {
                if examined >= shrink_limit {
                    break 'search;
                }
                examined += 1;
                if !(self.predicate)(child.value()) {
                    path.push(index);
                    current = child;
                    continue 'search;
                }
            }
            break;
        }

        (current, path, examined)
    }

    /// Reproduce a recorded counterexample without searching.
    ///
    /// Regenerates the tree exactly as the first iteration of a run
    /// with this config would, then navigates the recorded path. A dead
    /// path means the generator, seed, or size changed since the path
    /// was recorded.
    fn replay(&self, config: &PropertyConfig, path: &[usize]) -> PropertyResult<V> {
        let size = size_for(1, config.iterations, config.size);
        let (draw_seed, _) = config.seed.split();

        match self.gen.draw(draw_seed, size, config.discard_limit) {
            GenIteration::Instance(tree) => match tree.navigate(path) {
                Some(found) => PropertyResult::Falsified {
                    seed: config.seed,
                    size,
                    iteration: 1,
                    shrinks: 0,
                    counterexample: Counterexample {
                        values: found.value().clone(),
                        original_values: tree.value().clone(),
                        shrink_path: path.to_vec(),
                    },
                },
                None => PropertyResult::ValidationFailure(ValidationProblem::new(
                    ValidationKind::ShrinkPath,
                    "shrink path does not exist for this generator, seed, and size",
                )),
            },
            _ => PropertyResult::ValidationFailure(ValidationProblem::new(
                ValidationKind::ShrinkPath,
                "generator produced no instance to navigate",
            )),
        }
    }
}

fn validate(config: &PropertyConfig) -> Result<(), ValidationProblem> {
    if config.iterations == 0 {
        return Err(ValidationProblem::new(
            ValidationKind::Iterations,
            "iterations must be a positive integer",
        ));
    }
    if let Some(size) = config.size {
        if !size.in_bounds() {
            return Err(ValidationProblem::new(
                ValidationKind::Size,
                format!("size must lie in [0, 100], got {}", size.get()),
            ));
        }
    }
    Ok(())
}

/// Size for a 1-based iteration under the schedule.
///
/// One iteration runs at size 0; up to 99 iterations are spaced evenly
/// across 0..=99; beyond that the sizes cycle. An explicit size is held
/// constant. A later iteration whose formula size would return to 0
/// takes the previous size instead: size rolls, it never resets
/// mid-run.
fn size_for(iteration: u64, iterations: u64, explicit: Option<Size>) -> Size {
    if let Some(size) = explicit {
        return size;
    }
    if iterations == 1 {
        return Size::new(0);
    }
    let index = iteration - 1;
    let raw = if iterations <= 99 {
        index * 99 / (iterations - 1)
    } else {
        index
    };
    let truncated = raw % 100;
    let rolled = if truncated == 0 && index > 0 {
        (raw - 1) % 100
    } else {
        truncated
    };
    Size::new(rolled as usize)
}
