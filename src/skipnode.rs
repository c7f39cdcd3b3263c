// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// `SkipNode`s make up the levels of the `SkipMap`.
///
/// Every level is a singly linked list starting at a head node (which has no
/// entry) and running through the nodes of that level in ascending key order
/// via `right`. A key promoted to level `n` is represented by one node on each
/// of the levels `0..=n`, forming a column linked top to bottom through
/// `down`; all nodes of a column share the same `entry`.
///
/// Links are indices into the map's node arena and the entry is an index into
/// its entry arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SkipNode {
    // The entry should never be None, with the sole exception being the head
    // nodes.
    pub entry: Option<usize>,
    // The next node on the same level.
    pub right: Option<usize>,
    // The node for the same key one level closer to level 0. Head nodes link
    // to the head of the level below.
    pub down: Option<usize>,
}

impl SkipNode {
    /// Create a new head node sitting on top of `down`.
    pub fn head(down: Option<usize>) -> Self {
        SkipNode {
            entry: None,
            right: None,
            down,
        }
    }

    /// Create a new node for `entry`.
    pub fn new(entry: usize, right: Option<usize>, down: Option<usize>) -> Self {
        SkipNode {
            entry: Some(entry),
            right,
            down,
        }
    }

    /// Returns `true` is the node is a head-node.
    pub fn is_head(&self) -> bool {
        self.entry.is_none()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::SkipNode;

    #[test]
    fn head_and_new() {
        let head = SkipNode::head(Some(3));
        assert!(head.is_head());
        assert_eq!(head.down, Some(3));
        assert_eq!(head.right, None);

        let node = SkipNode::new(7, Some(1), None);
        assert!(!node.is_head());
        assert_eq!(node.entry, Some(7));
        assert_eq!(node.right, Some(1));
    }
}
