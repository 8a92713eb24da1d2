//! Scoped node lock.

use tracing::error;

use crate::NodePtr;

/// Keeps a node locked for as long as the guard is alive.
///
/// A guard created with `None` does nothing, which lets a pass lock an
/// optional node without checking it first.
///
/// # Examples
///
/// ```
/// use node::{Node, NodeLock, NodeType};
///
/// let node = Node::new(NodeType::Int64);
/// {
///     let _lock = NodeLock::new(Some(&node));
///     assert!(node.is_locked());
///     assert!(node.to_string().is_err());
/// }
/// assert!(!node.is_locked());
/// ```
#[derive(Debug)]
pub struct NodeLock {
    node: Option<NodePtr>,
}

impl NodeLock {
    /// Lock `node`, if any.
    pub fn new(node: Option<&NodePtr>) -> Self {
        if let Some(node) = node {
            node.lock();
        }
        Self {
            node: node.cloned(),
        }
    }

    /// Release the lock before the guard goes out of scope.
    ///
    /// Calling this more than once has no further effect.
    ///
    /// # Panics
    ///
    /// Panics when the node was already unlocked behind the guard's back,
    /// unless the thread is unwinding.
    pub fn unlock(&mut self) {
        if let Some(node) = self.node.take() {
            if let Err(err) = node.unlock() {
                error!(%err, "node lock guard released an unlocked node");
                if !std::thread::panicking() {
                    panic!("unbalanced lock on a {} node: {}", node.get_type(), err);
                }
            }
        }
    }
}

impl Drop for NodeLock {
    fn drop(&mut self) {
        self.unlock();
    }
}
