//! Index-subset enumeration used for deals and determinization samples.

use rand::seq::SliceRandom;
use rand::Rng;

/// Binomial coefficient `C(n, k)`; `None` on overflow, `0` when `k > n`.
pub fn n_choose_k(n: usize, k: usize) -> Option<u128> {
    if k > n { return Some(0); }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 1..=k as u128 {
        result = result.checked_mul(n as u128 + 1 - i)? / i;
    }
    Some(result)
}

/// Every size-`k` subset of `0..n`, in lexicographic order.
///
/// ```
/// use dominoes_search::combinations::combinations_of;
/// assert_eq!(combinations_of(4, 2), vec![
///     vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3],
/// ]);
/// ```
pub fn combinations_of(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n { return out; }
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());
        // rightmost position that can still advance
        let mut i = k;
        while i > 0 && current[i - 1] == n - k + (i - 1) { i -= 1; }
        if i == 0 { break; }
        current[i - 1] += 1;
        for j in i..k { current[j] = current[j - 1] + 1; }
    }
    out
}

/// The `index`-th subset of [`combinations_of`]`(n, k)` without enumerating
/// the ones before it. `index` is clamped into range.
///
/// ```
/// use dominoes_search::combinations::{combinations_of, nth_combination};
/// let all = combinations_of(6, 3);
/// assert_eq!(nth_combination(6, 3, 7), all[7]);
/// assert_eq!(nth_combination(6, 3, 1_000), *all.last().unwrap());
/// ```
pub fn nth_combination(n: usize, k: usize, index: u128) -> Vec<usize> {
    let total = n_choose_k(n, k).unwrap_or(u128::MAX);
    if total == 0 { return Vec::new(); }
    let mut rank = index.min(total - 1);
    let mut out = Vec::with_capacity(k);
    let mut next = 0usize;
    for slot in 0..k {
        let remaining = k - slot - 1;
        loop {
            // subsets that start with `next` at this slot
            let block = n_choose_k(n - next - 1, remaining).unwrap_or(u128::MAX);
            if rank < block { break; }
            rank -= block;
            next += 1;
        }
        out.push(next);
        next += 1;
    }
    out
}

/// `0..C(n, k)` as indices, optionally shuffled with the caller's RNG.
pub fn shuffled_indices<R: Rng + ?Sized>(n: usize, k: usize, shuffle: bool, rng: &mut R) -> Vec<usize> {
    let len = n_choose_k(n, k).map(|c| c as usize).unwrap_or(0);
    let mut out: Vec<usize> = (0..len).collect();
    if shuffle { out.shuffle(rng); }
    out
}
