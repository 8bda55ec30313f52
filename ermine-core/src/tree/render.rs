//! Tree rendering for debugging and visualization.
//!
//! Forests may be infinite, so every rendering is bounded by an explicit
//! depth and width; truncation is marked with an ellipsis line.

use super::GenTree;
use std::fmt;

impl<V> GenTree<V>
where
    V: fmt::Display + Clone + 'static,
{
    /// Render the tree structure as a string, visiting at most
    /// `max_depth` levels of shrinks and `max_width` children per node.
    pub fn render(&self, max_depth: usize, max_width: usize) -> String {
        let mut result = String::new();
        result.push_str(&format!("{}\n", self.node.value));
        self.render_children(&mut result, "", max_depth, max_width);
        result
    }

    fn render_children(
        &self,
        result: &mut String,
        prefix: &str,
        depth_left: usize,
        max_width: usize,
    ) {
        if depth_left == 0 {
            return;
        }

        let children: Vec<GenTree<V>> = self.forest.iter().take(max_width + 1).collect();
        let truncated = children.len() > max_width;
        let shown = if truncated { max_width } else { children.len() };

        for (i, child) in children.iter().take(shown).enumerate() {
            let is_last = !truncated && i == shown - 1;
            result.push_str(prefix);
            if is_last {
                result.push_str("└── ");
            } else {
                result.push_str("├── ");
            }
            result.push_str(&format!("{}\n", child.node.value));

            let child_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };
            child.render_children(result, &child_prefix, depth_left - 1, max_width);
        }

        if truncated {
            result.push_str(prefix);
            result.push_str("└── …\n");
        }
    }

    /// Render compactly: the value followed by its bracketed shrink
    /// roots, one level deep.
    pub fn render_compact(&self, max_width: usize) -> String {
        let roots: Vec<String> = self
            .forest
            .iter()
            .take(max_width)
            .map(|child| format!("{}", child.node.value))
            .collect();
        if roots.is_empty() {
            format!("{}", self.node.value)
        } else {
            format!("{}[{}]", self.node.value, roots.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::shrink;
    use crate::tree::GenTree;

    fn ladder(value: i64) -> GenTree<i64> {
        GenTree::unfold(
            value,
            |v| *v,
            |v| v.unsigned_abs(),
            |v| shrink::towards(0, *v).into_iter(),
        )
    }

    #[test]
    fn test_render_shows_shrink_ladder() {
        let output = ladder(4).render(2, 10);
        assert!(output.starts_with("4\n"));
        assert!(output.contains("├── 0"));
        assert!(output.contains("└── 3"));
    }

    #[test]
    fn test_render_truncates_width() {
        let output = ladder(100).render(1, 3);
        assert!(output.contains('…'));
        // Only the first three children appear.
        assert!(output.contains("├── 0"));
        assert!(output.contains("├── 50"));
        assert!(output.contains("├── 75"));
        assert!(!output.contains("88"));
    }

    #[test]
    fn test_render_depth_zero_is_root_only() {
        let output = ladder(10).render(0, 10);
        assert_eq!(output, "10\n");
    }

    #[test]
    fn test_render_compact() {
        assert_eq!(ladder(4).render_compact(10), "4[0, 2, 3]");
        assert_eq!(ladder(0).render_compact(10), "0");
    }
}
