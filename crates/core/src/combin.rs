//! Binomial coefficients and positional k-combinations of a sequence.

/// `n` choose `k` as an exact integer, or `None` if it overflows `u128`.
///
/// Returns `Some(0)` when `k > n`.
pub fn binomial(n: u64, k: u64) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc == C(n, i) here, so the division is exact.
        acc = acc.checked_mul(u128::from(n - i))? / u128::from(i + 1);
    }
    Some(acc)
}

/// Lazily enumerates every `k`-element selection of `pool` by position.
///
/// Equal values at different positions are distinct selections and each
/// selection keeps the relative order of the pool. Selections come out in
/// lexicographic order of their index sets, `C(n, k)` of them in total.
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    pool: &'a [T],
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl<'a, T> Combinations<'a, T> {
    pub fn new(pool: &'a [T], k: usize) -> Self {
        let done = k > pool.len();
        Self {
            pool,
            indices: if done { Vec::new() } else { (0..k).collect() },
            started: false,
            done,
        }
    }

    /// Advances to the next selection and returns its positions in the pool.
    ///
    /// Unlike the `Iterator` impl this does not allocate per selection.
    pub fn next_indices(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.indices);
        }
        let n = self.pool.len();
        let k = self.indices.len();
        let Some(pivot) = (0..k).rev().find(|&i| self.indices[i] != i + n - k) else {
            self.done = true;
            return None;
        };
        self.indices[pivot] += 1;
        for j in pivot + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(&self.indices)
    }

    /// Advances and hands the selected elements to `f` without allocating.
    pub fn next_with<R>(&mut self, f: impl FnOnce(&mut dyn Iterator<Item = &'a T>) -> R) -> Option<R> {
        let pool = self.pool;
        let indices = self.next_indices()?;
        let mut items = indices.iter().map(|&idx| &pool[idx]);
        Some(f(&mut items))
    }

    pub fn pool(&self) -> &'a [T] {
        self.pool
    }

    /// Number of selections this enumerator produces in total.
    pub fn total(&self) -> Option<u128> {
        binomial(self.pool.len() as u64, self.indices.len() as u64)
    }
}

impl<T: Clone> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let pool = self.pool;
        let indices = self.next_indices()?;
        Some(indices.iter().map(|&idx| pool[idx].clone()).collect())
    }
}

/// Every `k`-element positional selection of `elements`, produced lazily.
pub fn combinations<T>(elements: &[T], k: usize) -> Combinations<'_, T> {
    Combinations::new(elements, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_small_values() {
        assert_eq!(binomial(5, 0), Some(1));
        assert_eq!(binomial(5, 1), Some(5));
        assert_eq!(binomial(5, 2), Some(10));
        assert_eq!(binomial(10, 5), Some(252));
        assert_eq!(binomial(0, 0), Some(1));
        assert_eq!(binomial(3, 4), Some(0));
    }

    #[test]
    fn binomial_large_deck_is_exact() {
        assert_eq!(binomial(52, 5), Some(2_598_960));
        assert_eq!(binomial(300, 10), Some(1_398_320_233_241_701_770));
        assert_eq!(binomial(500, 10), Some(245_810_588_801_891_098_700));
    }

    #[test]
    fn binomial_reports_overflow() {
        assert_eq!(binomial(1_000, 500), None);
    }

    #[test]
    fn oversized_selection_is_empty_without_allocating() {
        assert_eq!(combinations(&[1, 2, 3], 4).count(), 0);
        assert_eq!(combinations(&[1, 2, 3], usize::MAX).count(), 0);
        let mut hands = Combinations::new(&[1, 2, 3], usize::MAX / 2);
        assert_eq!(hands.next_indices(), None);
    }

    #[test]
    fn choose_two_of_three() {
        let all: Vec<Vec<i32>> = combinations(&[1, 2, 3], 2).collect();
        assert_eq!(all, vec![vec![1, 2], vec![1, 3], vec![2, 3]]);
    }

    #[test]
    fn pool_smaller_than_k_is_empty() {
        assert_eq!(combinations(&[1, 2], 3).count(), 0);
        assert_eq!(combinations::<i32>(&[], 1).count(), 0);
    }

    #[test]
    fn zero_k_yields_one_empty_selection() {
        let all: Vec<Vec<i32>> = combinations(&[1, 2, 3], 0).collect();
        assert_eq!(all, vec![Vec::<i32>::new()]);
        let empty: Vec<Vec<i32>> = combinations::<i32>(&[], 0).collect();
        assert_eq!(empty, vec![Vec::<i32>::new()]);
    }

    #[test]
    fn duplicate_values_are_distinct_selections() {
        let all: Vec<Vec<i32>> = combinations(&[1, 1, 0], 2).collect();
        assert_eq!(all, vec![vec![1, 1], vec![1, 0], vec![1, 0]]);
    }

    #[test]
    fn count_matches_binomial() {
        let pool: Vec<u8> = (0..12).collect();
        for k in 0..=13 {
            let produced = combinations(&pool, k).count() as u128;
            assert_eq!(Some(produced), binomial(12, k as u64), "k = {k}");
        }
    }

    #[test]
    fn selections_preserve_pool_order() {
        let pool = [5, 3, 9, 1, 7];
        let mut enumerator = combinations(&pool, 3);
        while let Some(indices) = enumerator.next_indices() {
            assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn next_with_visits_selected_elements() {
        let pool = [1, 2, 4];
        let mut enumerator = combinations(&pool, 2);
        let mut sums = Vec::new();
        while let Some(sum) = enumerator.next_with(|items| items.sum::<i32>()) {
            sums.push(sum);
        }
        assert_eq!(sums, vec![3, 5, 6]);
        assert_eq!(enumerator.total(), Some(3));
    }
}
