/// Quicksort around the middle element, with less / equal / greater buckets.
///
/// Elements equal to the pivot keep their relative order; the rest may not. Recursion depth
/// is unbounded (linear on adversarial inputs), which is acceptable only for the few
/// thousand records this is used on. Keys that compare unordered with the pivot (NaN) go to
/// the greater bucket: no item is lost, but their position is unspecified.
pub fn quicksort_by_key<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: PartialOrd,
    F: Fn(&T) -> K + Copy,
{
    if items.len() <= 1 { return items.to_vec() }

    let mid = items.len() / 2;
    let pivot = key(&items[mid]);
    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let k = key(item);
        // The pivot itself always lands in `equal`, so every recursion shrinks.
        if i == mid || k == pivot { equal.push(item.clone()) }
        else if k < pivot { less.push(item.clone()) }
        else { greater.push(item.clone()) }
    }

    let mut sorted = quicksort_by_key(&less, key);
    sorted.append(&mut equal);
    sorted.append(&mut quicksort_by_key(&greater, key));
    sorted
}

/// Stable recursive merge sort.
pub fn merge_sort_by_key<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: PartialOrd,
    F: Fn(&T) -> K + Copy,
{
    if items.len() <= 1 { return items.to_vec() }

    let (left, right) = items.split_at(items.len() / 2);
    let left = merge_sort_by_key(left, key);
    let right = merge_sort_by_key(right, key);

    let mut merged = Vec::with_capacity(items.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        // Take from the left on ties to stay stable.
        if key(&right[j]) < key(&left[i]) {
            merged.push(right[j].clone());
            j += 1;
        } else {
            merged.push(left[i].clone());
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    merged
}
