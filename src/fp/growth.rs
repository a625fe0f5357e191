use ndarray::ArrayView2;
use rayon::prelude::*;
use tracing::debug;

use super::builder::{build_conditional_tree, build_tree, frequent_items, SupportThreshold};
use super::storage::{add_pattern, merge_levels, FrequentLevel};
use super::tree::FpTree;
use crate::brute::combinations::for_each_combination;
use crate::brute::Item;
use crate::config::check_unit;
use crate::error::{BasketError, Result};

/// FP-growth over a one-hot matrix (rows are transactions).
///
/// Level `k - 1` of the result holds the frequent k-itemsets with their
/// absolute counts.
pub fn fp_growth(one_hot: ArrayView2<i32>, min_support: f64) -> Result<Vec<FrequentLevel>> {
    let min_support = check_unit("min_support", min_support)?;
    let num_transactions = one_hot.nrows();
    if num_transactions == 0 {
        return Err(BasketError::EmptyTransactionSet);
    }

    let threshold = SupportThreshold {
        min_support,
        num_transactions,
    };
    let (tree, items) = build_tree(one_hot, threshold);
    debug!(
        nodes = tree.nodes.len(),
        frequent_items = items.len(),
        "built fp-tree"
    );

    Ok(grow(&tree, &items, &[], threshold))
}

fn grow(
    tree: &FpTree,
    items: &[Item],
    alpha: &[Item],
    threshold: SupportThreshold,
) -> Vec<FrequentLevel> {
    if let Some(path) = tree.single_path() {
        let mut result = Vec::new();
        for k in 1..=path.len() {
            path_combinations(&path, k, alpha, &mut result);
        }
        return result;
    }

    let per_item: Vec<Vec<FrequentLevel>> = items
        .par_iter()
        .rev()
        .filter_map(|&item| {
            let count = tree.item_count(item);
            if !threshold.admits(count) {
                return None;
            }

            let mut pattern = alpha.to_vec();
            pattern.push(item);
            let mut result = Vec::new();
            add_pattern(&mut result, pattern.clone(), count);

            let prefix_paths = tree.prefix_paths(item);
            if !prefix_paths.is_empty() {
                let cond_tree = build_conditional_tree(&prefix_paths, threshold);
                let cond_items = frequent_items(&cond_tree, threshold);
                if !cond_items.is_empty() {
                    let deeper = grow(&cond_tree, &cond_items, &pattern, threshold);
                    merge_levels(&mut result, &deeper);
                }
            }

            Some(result)
        })
        .collect();

    let mut merged = Vec::new();
    for levels in &per_item {
        merge_levels(&mut merged, levels);
    }
    merged
}

/// Every k-subset of a single-path tree, extended by `alpha`. Path counts
/// never grow towards the leaf, so a subset's count is its deepest node's.
fn path_combinations(
    path: &[(Item, usize)],
    k: usize,
    alpha: &[Item],
    result: &mut Vec<FrequentLevel>,
) {
    for_each_combination(path.len(), k, &mut |indices: &[usize]| {
        let mut pattern = Vec::with_capacity(alpha.len() + k);
        pattern.extend_from_slice(alpha);
        pattern.extend(indices.iter().map(|&idx| path[idx].0));
        let count = indices
            .iter()
            .map(|&idx| path[idx].1)
            .min()
            .unwrap_or_default();
        add_pattern(result, pattern, count);
    });
}
