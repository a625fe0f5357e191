use std::collections::HashMap;

use crate::brute::Item;

#[derive(Debug, Clone)]
pub struct FpNode {
    pub item: Option<Item>,
    pub count: usize,
    pub parent: Option<usize>,
    pub children: HashMap<Item, usize>,
}

/// Prefix tree of transactions in a fixed item order, with a header table
/// linking every node that carries a given item.
#[derive(Debug, Clone)]
pub struct FpTree {
    pub nodes: Vec<FpNode>,
    pub header: HashMap<Item, Vec<usize>>,
}

impl FpNode {
    fn root() -> Self {
        Self {
            item: None,
            count: 0,
            parent: None,
            children: HashMap::new(),
        }
    }

    fn leaf(item: Item, count: usize, parent: usize) -> Self {
        Self {
            item: Some(item),
            count,
            parent: Some(parent),
            children: HashMap::new(),
        }
    }
}

impl Default for FpTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FpTree {
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![FpNode::root()],
            header: HashMap::new(),
        }
    }

    /// Adds `path` (already in tree order) with weight `count`.
    pub fn insert(&mut self, path: &[Item], count: usize) {
        let mut current = Self::ROOT;

        for &item in path {
            if let Some(&child) = self.nodes[current].children.get(&item) {
                self.nodes[child].count += count;
                current = child;
            } else {
                let child = self.nodes.len();
                self.nodes.push(FpNode::leaf(item, count, current));
                self.nodes[current].children.insert(item, child);
                self.header.entry(item).or_default().push(child);
                current = child;
            }
        }
    }

    /// Summed count of every node carrying `item`.
    pub fn item_count(&self, item: Item) -> usize {
        self.header
            .get(&item)
            .map_or(0, |nodes| nodes.iter().map(|&idx| self.nodes[idx].count).sum())
    }

    /// Items strictly above `node`, nearest first, excluding the root.
    pub fn ancestors(&self, node: usize) -> impl Iterator<Item = Item> + '_ {
        std::iter::successors(self.nodes[node].parent, move |&idx| self.nodes[idx].parent)
            .filter_map(move |idx| self.nodes[idx].item)
    }

    /// Conditional pattern base of `item`: for every node carrying it, the
    /// items above it in tree order, weighted by that node's count. Nodes
    /// hanging directly off the root contribute nothing.
    pub fn prefix_paths(&self, item: Item) -> Vec<(Vec<Item>, usize)> {
        let Some(nodes) = self.header.get(&item) else {
            return Vec::new();
        };

        let mut paths = Vec::with_capacity(nodes.len());
        for &node in nodes {
            let mut path: Vec<Item> = self.ancestors(node).collect();
            if path.is_empty() {
                continue;
            }
            path.reverse();
            paths.push((path, self.nodes[node].count));
        }
        paths
    }

    /// The `(item, count)` chain when no node branches, `None` otherwise.
    pub fn single_path(&self) -> Option<Vec<(Item, usize)>> {
        let mut path = Vec::new();
        let mut current = &self.nodes[Self::ROOT];

        loop {
            let mut children = current.children.values();
            let next = match (children.next(), children.next()) {
                (None, _) => return Some(path),
                (Some(&only), None) => only,
                (Some(_), Some(_)) => return None,
            };
            current = &self.nodes[next];
            if let Some(item) = current.item {
                path.push((item, current.count));
            }
        }
    }
}
