//! Lazy shrink trees.
//!
//! A [`GenTree`] pairs one generated value (and its complexity score)
//! with a forest of every candidate shrink. Forests are producers, not
//! containers: nothing below an untraversed subtree is ever computed,
//! which is what makes unbounded shrink ladders affordable. Nodes own
//! their forests exclusively; merge and map build fresh trees rather
//! than mutating or back-referencing their sources.

use std::fmt;
use std::rc::Rc;

pub mod render;

/// A generated value with its complexity score.
///
/// Complexity is a non-negative ordering hint for shrink candidates; it
/// never constrains tree shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<V> {
    pub value: V,
    pub complexity: u64,
}

/// A lazy, possibly infinite producer of child shrink trees.
pub struct Forest<V> {
    produce: Rc<dyn Fn() -> Box<dyn Iterator<Item = GenTree<V>>>>,
}

impl<V> Clone for Forest<V> {
    fn clone(&self) -> Self {
        Forest {
            produce: Rc::clone(&self.produce),
        }
    }
}

impl<V> fmt::Debug for Forest<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Forest(..)")
    }
}

impl<V: 'static> Forest<V> {
    /// A forest with no shrink candidates.
    pub fn empty() -> Self {
        Forest::new(|| std::iter::empty())
    }

    /// A forest computed on demand by `produce`; each traversal starts a
    /// fresh iterator.
    pub fn new<F, I>(produce: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: Iterator<Item = GenTree<V>> + 'static,
    {
        Forest {
            produce: Rc::new(move || Box::new(produce())),
        }
    }

    /// Start traversing the shrink candidates.
    pub fn iter(&self) -> Box<dyn Iterator<Item = GenTree<V>>> {
        (self.produce)()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<V: Clone + 'static> Forest<V> {
    /// Prune subtrees whose root value fails the predicate.
    ///
    /// Filtering is node-local: a rejected node's children are dropped
    /// with it, since they are not guaranteed valid either.
    pub fn filter(&self, keep: Rc<dyn Fn(&V) -> bool>) -> Forest<V> {
        let inner = self.clone();
        Forest::new(move || {
            let keep = keep.clone();
            inner.iter().filter_map(move |tree| {
                if keep(&tree.node.value) {
                    let forest = tree.forest.filter(keep.clone());
                    Some(GenTree {
                        node: tree.node,
                        forest,
                    })
                } else {
                    None
                }
            })
        })
    }
}

/// A lazy tree of a generated value and all its candidate shrinks.
pub struct GenTree<V> {
    node: Node<V>,
    forest: Forest<V>,
}

impl<V: Clone> Clone for GenTree<V> {
    fn clone(&self) -> Self {
        GenTree {
            node: self.node.clone(),
            forest: self.forest.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for GenTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenTree")
            .field("value", &self.node.value)
            .field("complexity", &self.node.complexity)
            .finish_non_exhaustive()
    }
}

impl<V: Clone + 'static> GenTree<V> {
    pub fn new(node: Node<V>, forest: Forest<V>) -> Self {
        GenTree { node, forest }
    }

    /// A tree with no shrinks.
    pub fn singleton(value: V, complexity: u64) -> Self {
        GenTree {
            node: Node { value, complexity },
            forest: Forest::empty(),
        }
    }

    pub fn value(&self) -> &V {
        &self.node.value
    }

    pub fn complexity(&self) -> u64 {
        self.node.complexity
    }

    pub fn node(&self) -> &Node<V> {
        &self.node
    }

    pub fn forest(&self) -> &Forest<V> {
        &self.forest
    }

    /// Build a tree by unfolding from a state.
    ///
    /// The node comes from `value_fn`/`complexity_fn` applied to the
    /// state; the forest is computed on demand by recursively unfolding
    /// each state `expand_fn` yields. The whole tree is never enumerated
    /// eagerly, so `expand_fn` may yield unboundedly.
    pub fn unfold<S, FV, FC, FE, I>(
        state: S,
        value_fn: FV,
        complexity_fn: FC,
        expand_fn: FE,
    ) -> Self
    where
        S: Clone + 'static,
        FV: Fn(&S) -> V + Clone + 'static,
        FC: Fn(&S) -> u64 + Clone + 'static,
        FE: Fn(&S) -> I + Clone + 'static,
        I: Iterator<Item = S> + 'static,
    {
        let node = Node {
            value: value_fn(&state),
            complexity: complexity_fn(&state),
        };
        let forest = Forest::new(move || {
            let value_fn = value_fn.clone();
            let complexity_fn = complexity_fn.clone();
            let recurse = expand_fn.clone();
            expand_fn(&state).map(move |child| {
                GenTree::unfold(
                    child,
                    value_fn.clone(),
                    complexity_fn.clone(),
                    recurse.clone(),
                )
            })
        });
        GenTree { node, forest }
    }

    /// Transform every value, preserving structure and complexity.
    pub fn map<W, F>(&self, f: F) -> GenTree<W>
    where
        W: Clone + 'static,
        F: Fn(&V) -> W + 'static,
    {
        self.map_rc(Rc::new(f))
    }

    fn map_rc<W: Clone + 'static>(&self, f: Rc<dyn Fn(&V) -> W>) -> GenTree<W> {
        let node = Node {
            value: f(&self.node.value),
            complexity: self.node.complexity,
        };
        let inner = self.forest.clone();
        let forest = Forest::new(move || {
            let f = f.clone();
            inner.iter().map(move |child| child.map_rc(f.clone()))
        });
        GenTree { node, forest }
    }

    /// Add externally supplied shrink candidates ahead of any existing
    /// shrinks.
    ///
    /// Each candidate from `shrink_fn` is itself unfolded through the
    /// same shrinker, so a reusable atomic shrinker becomes a full
    /// shrink subtree.
    pub fn expand<FE, FC, I>(&self, shrink_fn: FE, complexity_fn: FC) -> GenTree<V>
    where
        FE: Fn(&V) -> I + Clone + 'static,
        FC: Fn(&V) -> u64 + Clone + 'static,
        I: Iterator<Item = V> + 'static,
    {
        let node = self.node.clone();
        let value = node.value.clone();
        let existing = self.forest.clone();
        let forest = Forest::new(move || {
            let shrink_fn = shrink_fn.clone();
            let complexity_fn = complexity_fn.clone();
            let fresh = shrink_fn(&value).map(move |candidate| {
                GenTree::unfold(
                    candidate,
                    |v: &V| v.clone(),
                    complexity_fn.clone(),
                    shrink_fn.clone(),
                )
            });
            fresh.chain(existing.iter())
        });
        GenTree { node, forest }
    }

    /// Combine N independent trees into one tree of vectors.
    ///
    /// The child forest is produced in two ordered phases, which is the
    /// central shrink-quality decision:
    ///
    /// 1. culling shrinks: whole-structure reductions from `cull` over
    ///    the current roots, tried before drilling into any element;
    /// 2. merging shrinks: for each input tree, each of its own child
    ///    shrinks substituted in place while every other element stays
    ///    fixed.
    pub fn merge(
        trees: Vec<GenTree<V>>,
        combine_complexity: Rc<dyn Fn(&[u64]) -> u64>,
        cull: Cull<V>,
    ) -> GenTree<Vec<V>> {
        let values: Vec<V> = trees.iter().map(|t| t.node.value.clone()).collect();
        let weights: Vec<u64> = trees.iter().map(|t| t.node.complexity).collect();
        let node = Node {
            value: values,
            complexity: combine_complexity(&weights),
        };
        let forest = Forest::new(move || {
            let combine = combine_complexity.clone();
            let cull_fn = cull.clone();
            let roots = trees.clone();

            let culled = cull_fn(&roots).into_iter().map({
                let combine = combine.clone();
                let cull_fn = cull_fn.clone();
                move |reduced| GenTree::merge(reduced, combine.clone(), cull_fn.clone())
            });

            let arity = roots.len();
            let substituted = (0..arity).flat_map(move |index| {
                let siblings = roots.clone();
                let combine = combine.clone();
                let cull_fn = cull_fn.clone();
                let children = siblings[index].forest.iter();
                children.map(move |child| {
                    let mut next = siblings.clone();
                    next[index] = child;
                    GenTree::merge(next, combine.clone(), cull_fn.clone())
                })
            });

            culled.chain(substituted)
        });
        GenTree { node, forest }
    }

    /// [`GenTree::merge`] specialized for lists: culling drops elements,
    /// and complexity is the sum of the children's plus a length
    /// penalty.
    pub fn concat(trees: Vec<GenTree<V>>) -> GenTree<Vec<V>> {
        GenTree::merge(
            trees,
            Rc::new(|weights: &[u64]| {
                let sum = weights
                    .iter()
                    .fold(0u64, |acc, w| acc.saturating_add(*w));
                sum.saturating_add(weights.len() as u64)
            }),
            Rc::new(|roots: &[GenTree<V>]| crate::shrink::removes(roots)),
        )
    }

    /// Deterministically re-locate a node by walking child indices.
    ///
    /// Indices are 0-based: each selects the nth child yielded by that
    /// node's forest, matching what the minimizer records.
    ///
    /// Returns `None` when the path does not exist in this tree, meaning
    /// the generator, seed, or size changed since the path was recorded.
    pub fn navigate(&self, path: &[usize]) -> Option<GenTree<V>> {
        let mut current = self.clone();
        for &index in path {
            current = current.forest.iter().nth(index)?;
        }
        Some(current)
    }
}

/// Whole-structure reduction shrinker consumed by [`GenTree::merge`].
pub type Cull<V> = Rc<dyn Fn(&[GenTree<V>]) -> Vec<Vec<GenTree<V>>>>;

/// A culling phase that produces nothing, for structures whose shape is
/// fixed (tuples of generator arguments).
pub fn no_cull<V>() -> Cull<V> {
    Rc::new(|_| Vec::new())
}

/// Combine a pair of independent trees into a tree of pairs.
///
/// The tuple specialization of [`GenTree::merge`]: there is no culling
/// phase, and the left component's shrinks are substituted before the
/// right's.
pub fn merge2<A, B>(left: &GenTree<A>, right: &GenTree<B>) -> GenTree<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let node = Node {
        value: (left.node.value.clone(), right.node.value.clone()),
        complexity: left.node.complexity.saturating_add(right.node.complexity),
    };
    let left = left.clone();
    let right = right.clone();
    let forest = Forest::new(move || {
        let fixed_right = right.clone();
        let fixed_left = left.clone();
        let from_left = left
            .forest
            .iter()
            .map(move |child| merge2(&child, &fixed_right));
        let from_right = right
            .forest
            .iter()
            .map(move |child| merge2(&fixed_left, &child));
        from_left.chain(from_right)
    });
    GenTree { node, forest }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shrink;
    use std::cell::Cell;

    fn int_tree(origin: i64, value: i64) -> GenTree<i64> {
        GenTree::singleton(value, value.unsigned_abs()).expand(
            move |v: &i64| shrink::towards(origin, *v).into_iter(),
            |v: &i64| v.unsigned_abs(),
        )
    }

    fn root_values<V: Clone + 'static>(tree: &GenTree<V>) -> Vec<V> {
        tree.forest().iter().map(|t| t.value().clone()).collect()
    }

    #[test]
    fn test_singleton_has_no_shrinks() {
        let tree = GenTree::singleton(42, 7);
        assert_eq!(*tree.value(), 42);
        assert_eq!(tree.complexity(), 7);
        assert!(tree.forest().is_empty());
    }

    #[test]
    fn test_unfold_builds_shrink_ladder() {
        let tree = GenTree::unfold(
            100i64,
            |v| *v,
            |v| v.unsigned_abs(),
            |v| shrink::towards(0, *v).into_iter(),
        );
        assert_eq!(*tree.value(), 100);
        assert_eq!(root_values(&tree), vec![0, 50, 75, 88, 94, 97, 99]);
        // Grandchildren unfold recursively through the same shrinker.
        let fifty = tree.forest().iter().nth(1).expect("child at index 1");
        assert_eq!(root_values(&fifty), vec![0, 25, 38, 44, 47, 49]);
    }

    #[test]
    fn test_unfold_is_lazy() {
        let expansions = Rc::new(Cell::new(0usize));
        let counter = expansions.clone();
        let tree = GenTree::unfold(
            10i64,
            |v| *v,
            |_| 0,
            move |v| {
                counter.set(counter.get() + 1);
                shrink::towards(0, *v).into_iter()
            },
        );
        assert_eq!(expansions.get(), 0, "forest computed before traversal");
        let _ = tree.forest().iter().next();
        assert!(expansions.get() > 0);
    }

    #[test]
    fn test_unfold_supports_infinite_expansion() {
        // An expansion that never runs dry; only the consumed prefix is
        // ever computed.
        let tree = GenTree::unfold(
            1u64,
            |v| *v,
            |_| 0,
            |v| {
                let base = *v;
                std::iter::successors(Some(base + 1), |n| Some(n + 1))
            },
        );
        let prefix: Vec<u64> = tree
            .forest()
            .iter()
            .take(4)
            .map(|t| *t.value())
            .collect();
        assert_eq!(prefix, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_map_preserves_structure_and_complexity() {
        let tree = int_tree(0, 8);
        let mapped = tree.map(|v| v * 10);
        assert_eq!(*mapped.value(), 80);
        assert_eq!(mapped.complexity(), tree.complexity());
        assert_eq!(
            root_values(&mapped),
            root_values(&tree).iter().map(|v| v * 10).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_filter_is_node_local() {
        // 8 -> [0, 4, 6, 7]; rejecting 4 drops its entire subtree even
        // though some of its descendants would pass.
        let tree = int_tree(0, 8);
        let filtered = tree.forest().filter(Rc::new(|v: &i64| *v != 4));
        let kept: Vec<i64> = filtered.iter().map(|t| *t.value()).collect();
        assert_eq!(kept, vec![0, 6, 7]);
    }

    #[test]
    fn test_filter_applies_recursively() {
        let tree = int_tree(0, 8);
        let filtered = tree.forest().filter(Rc::new(|v: &i64| v % 2 == 0));
        for child in filtered.iter() {
            assert_eq!(child.value() % 2, 0);
            for grandchild in child.forest().iter() {
                assert_eq!(grandchild.value() % 2, 0);
            }
        }
    }

    #[test]
    fn test_expand_prepends_fresh_shrinks() {
        let base = GenTree::new(
            Node {
                value: 6i64,
                complexity: 6,
            },
            Forest::new(|| std::iter::once(GenTree::singleton(99i64, 0))),
        );
        let expanded = base.expand(
            |v: &i64| shrink::towards(0, *v).into_iter(),
            |v: &i64| v.unsigned_abs(),
        );
        let children = root_values(&expanded);
        // Fresh candidates first, pre-existing shrink last.
        assert_eq!(children, vec![0, 3, 5, 99]);
    }

    #[test]
    fn test_merge_phases_are_ordered() {
        let trees = vec![int_tree(0, 2), int_tree(0, 3)];
        let merged = GenTree::concat(trees);
        assert_eq!(*merged.value(), vec![2, 3]);
        let children = root_values(&merged);
        // Culling shrinks first: drop both, drop first, drop second.
        assert_eq!(children[0], Vec::<i64>::new());
        assert_eq!(children[1], vec![3]);
        assert_eq!(children[2], vec![2]);
        // Then per-element substitutions, left element first.
        assert_eq!(children[3], vec![0, 3]);
        assert_eq!(children[4], vec![1, 3]);
        assert_eq!(children[5], vec![2, 0]);
    }

    #[test]
    fn test_merge_without_cull_only_substitutes() {
        let trees = vec![int_tree(0, 2), int_tree(0, 2)];
        let merged = GenTree::merge(trees, Rc::new(|ws: &[u64]| ws.iter().sum()), no_cull());
        let children = root_values(&merged);
        assert_eq!(children, vec![vec![0, 2], vec![1, 2], vec![2, 0], vec![2, 1]]);
    }

    #[test]
    fn test_concat_complexity_is_sum_plus_length() {
        let trees = vec![int_tree(0, 5), int_tree(0, 7)];
        let merged = GenTree::concat(trees);
        assert_eq!(merged.complexity(), 5 + 7 + 2);
    }

    #[test]
    fn test_merge_leaves_sources_untouched() {
        let left = int_tree(0, 4);
        let right = int_tree(0, 6);
        let before = root_values(&left);
        let merged = GenTree::concat(vec![left.clone(), right]);
        let _ = root_values(&merged);
        assert_eq!(root_values(&left), before);
    }

    #[test]
    fn test_merge2_substitutes_left_then_right() {
        let pair = merge2(&int_tree(0, 2), &int_tree(0, 2));
        assert_eq!(*pair.value(), (2, 2));
        assert_eq!(pair.complexity(), 4);
        let children = root_values(&pair);
        assert_eq!(children, vec![(0, 2), (1, 2), (2, 0), (2, 1)]);
    }

    #[test]
    fn test_navigate_walks_recorded_indices() {
        let tree = int_tree(0, 100);
        let child = tree.navigate(&[1]).expect("child 1");
        assert_eq!(*child.value(), 50);
        let grandchild = tree.navigate(&[1, 1]).expect("child 1,1");
        assert_eq!(*grandchild.value(), 25);
        assert_eq!(*tree.navigate(&[]).expect("empty path").value(), 100);
    }

    #[test]
    fn test_navigate_dead_path_is_none() {
        let tree = int_tree(0, 4);
        assert!(tree.navigate(&[100]).is_none());
        assert!(tree.navigate(&[0, 0]).is_none());
    }

    #[test]
    fn test_forest_retraversal_is_repeatable() {
        let tree = int_tree(0, 12);
        assert_eq!(root_values(&tree), root_values(&tree));
    }
}
