use std::collections::{HashMap, HashSet};

use ndarray::{ArrayView2, Axis};

use super::tree::FpTree;
use crate::brute::support::fraction;
use crate::brute::Item;

/// Absolute-count view of a fractional `min_support`.
///
/// The test is the same `count / total >= min_support` comparison the
/// brute-force miner makes, so both engines agree at the boundary.
#[derive(Debug, Clone, Copy)]
pub struct SupportThreshold {
    pub min_support: f64,
    pub num_transactions: usize,
}

impl SupportThreshold {
    pub fn admits(&self, count: usize) -> bool {
        count > 0 && fraction(count, self.num_transactions) >= self.min_support
    }
}

/// Builds the initial tree over the frequent columns of a one-hot matrix.
/// Returns the tree and its items in descending count order.
pub fn build_tree(one_hot: ArrayView2<i32>, threshold: SupportThreshold) -> (FpTree, Vec<Item>) {
    let column_counts: Vec<usize> = one_hot
        .axis_iter(Axis(1))
        .map(|column| column.iter().filter(|&&cell| cell != 0).count())
        .collect();

    let mut frequent: Vec<(Item, usize)> = column_counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| threshold.admits(count))
        .collect();
    // ties broken by item id so the tree shape is reproducible
    frequent.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let ordered: Vec<Item> = frequent.iter().map(|&(item, _)| item).collect();

    let mut tree = FpTree::new();
    let mut path = Vec::with_capacity(ordered.len());
    for row in one_hot.rows() {
        path.clear();
        path.extend(ordered.iter().copied().filter(|&item| row[item] != 0));
        if !path.is_empty() {
            tree.insert(&path, 1);
        }
    }

    (tree, ordered)
}

pub fn build_conditional_tree(
    prefix_paths: &[(Vec<Item>, usize)],
    threshold: SupportThreshold,
) -> FpTree {
    let mut item_counts: HashMap<Item, usize> = HashMap::new();
    for (path, count) in prefix_paths {
        for &item in path {
            *item_counts.entry(item).or_insert(0) += count;
        }
    }

    let frequent: HashSet<Item> = item_counts
        .into_iter()
        .filter_map(|(item, count)| threshold.admits(count).then_some(item))
        .collect();

    let mut tree = FpTree::new();
    for (path, count) in prefix_paths {
        let filtered: Vec<Item> = path
            .iter()
            .copied()
            .filter(|item| frequent.contains(item))
            .collect();
        if !filtered.is_empty() {
            tree.insert(&filtered, *count);
        }
    }
    tree
}

/// Items of `tree` that pass `threshold`, most frequent first.
pub fn frequent_items(tree: &FpTree, threshold: SupportThreshold) -> Vec<Item> {
    let mut frequent: Vec<(Item, usize)> = tree
        .header
        .keys()
        .map(|&item| (item, tree.item_count(item)))
        .filter(|&(_, count)| threshold.admits(count))
        .collect();

    frequent.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    frequent.into_iter().map(|(item, _)| item).collect()
}
