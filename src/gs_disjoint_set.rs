// union-find over dense indices 0..n, used for cycle detection in Kruskal

pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl DisjointSet {
    /// Every element starts as its own singleton set
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the set containing `x`. Flattens the path walked so later
    /// lookups are a single hop.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // second pass: point everything on the path straight at the root
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    /// Merge the sets of `a` and `b`. Returns false if they were already joined.
    ///
    /// Higher rank wins; on a tie the second root goes under the first and the
    /// first's rank grows by one.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        if self.rank[root_a] < self.rank[root_b] {
            self.parent[root_a] = root_b;
        } else if self.rank[root_a] > self.rank[root_b] {
            self.parent[root_b] = root_a;
        } else {
            self.parent[root_b] = root_a;
            self.rank[root_a] += 1;
        }

        true
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of disjoint sets currently represented
    pub fn set_count(&mut self) -> usize {
        (0..self.parent.len()).filter(|&x| self.find(x) == x).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut sets = DisjointSet::new(4);
        assert_eq!(sets.len(), 4);
        assert_eq!(sets.set_count(), 4);
        for x in 0..4 {
            assert_eq!(sets.find(x), x);
        }
    }

    #[test]
    fn test_union_joins_sets() {
        let mut sets = DisjointSet::new(5);

        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert!(sets.connected(0, 1));
        assert!(!sets.connected(1, 3));
        assert_eq!(sets.set_count(), 3);

        assert!(sets.union(1, 4));
        assert!(sets.connected(0, 3));
        assert_eq!(sets.set_count(), 2);
    }

    #[test]
    fn test_union_of_joined_sets_is_rejected() {
        let mut sets = DisjointSet::new(3);
        assert!(sets.union(0, 1));
        assert!(sets.union(1, 2));
        assert!(!sets.union(0, 2), "Would close a cycle");
    }

    #[test]
    fn test_tie_attaches_second_under_first() {
        let mut sets = DisjointSet::new(2);
        sets.union(0, 1);
        assert_eq!(sets.find(1), 0);
        assert_eq!(sets.rank[0], 1);
    }

    #[test]
    fn test_find_compresses_long_chain() {
        let size = 10_000;
        let mut sets = DisjointSet::new(size);
        // hand-build a worst-case chain: i -> i+1
        for i in 0..size - 1 {
            sets.parent[i] = i + 1;
        }

        assert_eq!(sets.find(0), size - 1);
        for i in 0..size {
            assert_eq!(sets.parent[i], size - 1, "Path not compressed at {}", i);
        }
    }

    #[test]
    fn test_empty() {
        let mut sets = DisjointSet::new(0);
        assert!(sets.is_empty());
        assert_eq!(sets.set_count(), 0);
    }
}
