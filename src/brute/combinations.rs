/// Calls `callback` with every k-combination of the indices `0..n`, in
/// lexicographic order. Nothing is emitted when `k == 0` or `k > n`.
pub fn for_each_combination<F>(n: usize, k: usize, callback: &mut F)
where
    F: FnMut(&[usize]),
{
    if k == 0 || k > n {
        return;
    }

    let mut current = Vec::with_capacity(k);
    combinations_recursive(n, k, 0, &mut current, callback);
}

fn combinations_recursive<F>(
    n: usize,
    k: usize,
    start: usize,
    current: &mut Vec<usize>,
    callback: &mut F,
) where
    F: FnMut(&[usize]),
{
    if current.len() == k {
        callback(current);
        return;
    }

    // Leave room for the slots still to fill.
    let last_start = n - (k - current.len());
    for i in start..=last_start {
        current.push(i);
        combinations_recursive(n, k, i + 1, current, callback);
        current.pop();
    }
}

/// Picks the elements of `items` addressed by `indices`.
pub fn select<T: Copy>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&idx| items[idx]).collect()
}

/// C(n, k), saturating at `usize::MAX`.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: usize = 1;
    for i in 0..k {
        acc = match acc.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return usize::MAX,
        };
    }
    acc
}
