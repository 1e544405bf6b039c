//! Augmented red-black interval tree.
//!
//! Nodes are keyed by `(low, high)` and each caches `subtree_max`, the highest
//! `high` below it, so overlap searches can skip whole subtrees. Nodes live in
//! an arena; child and parent links are indices into it and never leave this
//! module.

use crate::models::Interval;
use std::cmp::Ordering;

type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug)]
struct Node<P> {
    key: Interval,
    payload: P,
    color: Color,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    subtree_max: u32,
}

/// Outcome of [`OverlapIndex::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    /// A node with the same `(low, high)` existed; its payload was replaced.
    Replaced,
}

/// Interval tree answering "which stored ranges contain this address".
///
/// Overlapping ranges with different keys are stored side by side, so
/// [`find_first_overlapping`](OverlapIndex::find_first_overlapping) returns
/// whichever of them the descent reaches first.
#[derive(Debug)]
pub struct OverlapIndex<P> {
    nodes: Vec<Node<P>>,
    root: Option<NodeId>,
}

impl<P> Default for OverlapIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> OverlapIndex<P> {
    pub fn new() -> OverlapIndex<P> {
        OverlapIndex {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            let n = &self.nodes[id];
            stack.extend(n.left.map(|l| (l, depth + 1)));
            stack.extend(n.right.map(|r| (r, depth + 1)));
        }
        max
    }

    /// Insert `interval`, or replace the payload of an identical key.
    pub fn upsert(&mut self, interval: Interval, payload: P) -> Upsert {
        let mut parent = None;
        let mut cur = self.root;
        let mut go_left = false;

        while let Some(id) = cur {
            match interval.cmp(&self.nodes[id].key) {
                Ordering::Equal => {
                    self.nodes[id].payload = payload;
                    return Upsert::Replaced;
                }
                Ordering::Less => {
                    go_left = true;
                    cur = self.nodes[id].left;
                }
                Ordering::Greater => {
                    go_left = false;
                    cur = self.nodes[id].right;
                }
            }
            parent = Some(id);
        }

        let id = self.nodes.len();
        self.nodes.push(Node {
            subtree_max: interval.high(),
            key: interval,
            payload,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        });

        match parent {
            None => self.root = Some(id),
            Some(p) if go_left => self.nodes[p].left = Some(id),
            Some(p) => self.nodes[p].right = Some(id),
        }

        self.update_max_upwards(parent);
        self.insert_fixup(id);
        Upsert::Inserted
    }

    /// Any one stored interval overlapping `query`.
    pub fn find_first_overlapping(&self, query: &Interval) -> Option<(&Interval, &P)> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let n = &self.nodes[id];
            if n.key.overlaps(query) {
                return Some((&n.key, &n.payload));
            }
            // If anything overlaps, it is on the left whenever the left subtree
            // reaches far enough right.
            cur = match n.left {
                Some(l) if self.nodes[l].subtree_max >= query.low() => Some(l),
                _ => n.right,
            };
        }
        None
    }

    /// Every stored interval overlapping `query`, in no particular order.
    pub fn find_all_overlapping<'a>(&'a self, query: &'a Interval) -> Overlapping<'a, P> {
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            if self.nodes[root].subtree_max >= query.low() {
                stack.push(root);
            }
        }
        Overlapping {
            index: self,
            query,
            stack,
        }
    }

    /// Stored intervals in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Interval, &P)> + '_ {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cur = self.root;
        while cur.is_some() || !stack.is_empty() {
            while let Some(id) = cur {
                stack.push(id);
                cur = self.nodes[id].left;
            }
            if let Some(id) = stack.pop() {
                out.push(id);
                cur = self.nodes[id].right;
            }
        }
        out.into_iter()
            .map(move |id| (&self.nodes[id].key, &self.nodes[id].payload))
    }

    fn max_of(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |i| self.nodes[i].subtree_max)
    }

    fn update_max(&mut self, id: NodeId) {
        let n = &self.nodes[id];
        let max = n
            .key
            .high()
            .max(self.max_of(n.left))
            .max(self.max_of(n.right));
        self.nodes[id].subtree_max = max;
    }

    fn update_max_upwards(&mut self, mut cur: Option<NodeId>) {
        while let Some(id) = cur {
            self.update_max(id);
            cur = self.nodes[id].parent;
        }
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|i| self.nodes[i].color == Color::Red)
    }

    /// Point `parent`'s link that referenced `old` at `new` (or the root).
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) {
        match parent {
            None => self.root = Some(new),
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = Some(new),
            Some(p) => self.nodes[p].right = Some(new),
        }
    }

    // The rotated pair covers the same set of intervals as before, so only
    // `x` and `y` need their subtree_max recomputed.
    fn rotate_left(&mut self, x: NodeId) {
        let Some(y) = self.nodes[x].right else { return };
        let y_left = self.nodes[y].left;

        self.nodes[x].right = y_left;
        if let Some(b) = y_left {
            self.nodes[b].parent = Some(x);
        }
        let x_parent = self.nodes[x].parent;
        self.nodes[y].parent = x_parent;
        self.replace_child(x_parent, x, y);
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);

        self.update_max(x);
        self.update_max(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let Some(y) = self.nodes[x].left else { return };
        let y_right = self.nodes[y].right;

        self.nodes[x].left = y_right;
        if let Some(b) = y_right {
            self.nodes[b].parent = Some(x);
        }
        let x_parent = self.nodes[x].parent;
        self.nodes[y].parent = x_parent;
        self.replace_child(x_parent, x, y);
        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);

        self.update_max(x);
        self.update_max(y);
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        while let Some(p) = self.nodes[z].parent {
            if self.nodes[p].color == Color::Black {
                break;
            }
            // a red parent is never the root
            let Some(g) = self.nodes[p].parent else { break };

            if self.nodes[g].left == Some(p) {
                let uncle = self.nodes[g].right;
                if self.is_red(uncle) {
                    self.nodes[p].color = Color::Black;
                    if let Some(u) = uncle {
                        self.nodes[u].color = Color::Black;
                    }
                    self.nodes[g].color = Color::Red;
                    z = g;
                    continue;
                }
                let mut p = p;
                if self.nodes[p].right == Some(z) {
                    z = p;
                    self.rotate_left(z);
                    p = self.nodes[z].parent.unwrap_or(g);
                }
                self.nodes[p].color = Color::Black;
                self.nodes[g].color = Color::Red;
                self.rotate_right(g);
            } else {
                let uncle = self.nodes[g].left;
                if self.is_red(uncle) {
                    self.nodes[p].color = Color::Black;
                    if let Some(u) = uncle {
                        self.nodes[u].color = Color::Black;
                    }
                    self.nodes[g].color = Color::Red;
                    z = g;
                    continue;
                }
                let mut p = p;
                if self.nodes[p].left == Some(z) {
                    z = p;
                    self.rotate_right(z);
                    p = self.nodes[z].parent.unwrap_or(g);
                }
                self.nodes[p].color = Color::Black;
                self.nodes[g].color = Color::Red;
                self.rotate_left(g);
            }
        }

        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
    }
}

/// Iterator returned by [`OverlapIndex::find_all_overlapping`].
///
/// Holds a shared borrow of the index, so the tree cannot change while it is
/// being walked.
pub struct Overlapping<'a, P> {
    index: &'a OverlapIndex<P>,
    query: &'a Interval,
    stack: Vec<NodeId>,
}

impl<'a, P> Iterator for Overlapping<'a, P> {
    type Item = (&'a Interval, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        let nodes = &index.nodes;
        while let Some(id) = self.stack.pop() {
            let n = &nodes[id];

            // Right descendants start at or after this node's low.
            if n.key.low() <= self.query.high() {
                if let Some(r) = n.right {
                    if nodes[r].subtree_max >= self.query.low() {
                        self.stack.push(r);
                    }
                }
            }
            if let Some(l) = n.left {
                if nodes[l].subtree_max >= self.query.low() {
                    self.stack.push(l);
                }
            }

            if n.key.overlaps(self.query) {
                return Some((&n.key, &n.payload));
            }
        }
        None
    }
}
