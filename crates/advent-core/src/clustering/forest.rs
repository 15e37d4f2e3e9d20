//! Disjoint-set forest over point indices.
//!
//! Union by size with path compression. Each root also owns the list of its
//! members so a cluster can be enumerated without scanning every point.

/// Disjoint sets of `0..len`, starting as singletons.
#[derive(Debug, Clone)]
pub struct DisjointForest {
    parent: Vec<usize>,
    /// Member indices, non-empty only at roots
    members: Vec<Vec<usize>>,
    roots: usize,
}

impl DisjointForest {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            members: (0..len).map(|i| vec![i]).collect(),
            roots: len,
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set containing `item`
    pub fn find(&mut self, item: usize) -> usize {
        let mut root = item;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Compress
        let mut cur = item;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }

        root
    }

    /// Join the sets containing `a` and `b`. Returns the new root, or `None` if
    /// they were already in the same set.
    pub fn union(&mut self, a: usize, b: usize) -> Option<usize> {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return None;
        }

        if self.members[ra].len() < self.members[rb].len() {
            std::mem::swap(&mut ra, &mut rb);
        }

        self.parent[rb] = ra;
        let moved = std::mem::take(&mut self.members[rb]);
        self.members[ra].extend(moved);
        self.roots -= 1;

        Some(ra)
    }

    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of disjoint sets
    pub fn set_count(&self) -> usize {
        self.roots
    }

    /// Size of the set whose root is `root`. Zero for non-roots.
    pub fn root_size(&self, root: usize) -> usize {
        self.members[root].len()
    }

    /// Iterate `(root, members)` for every set, in root order
    pub fn sets(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_empty())
            .map(|(root, m)| (root, m.as_slice()))
    }
}
