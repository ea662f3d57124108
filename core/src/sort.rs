//! Deterministic ordering of list results.

/// Sort `items` by the key `key` extracts, keeping equal keys in their
/// original relative order.
pub fn stable_sort_by_key<T, K>(items: &mut [T], key: impl Fn(&T) -> &K)
where
    K: Ord + ?Sized,
{
    // slice::sort_by is a stable merge sort
    items.sort_by(|a, b| key(a).cmp(key(b)));
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone)]
    struct Entry {
        name: String,
        arrival: usize,
    }

    fn entries(names: &[&str]) -> Vec<Entry> {
        names
            .iter()
            .enumerate()
            .map(|(arrival, name)| Entry {
                name: name.to_string(),
                arrival,
            })
            .collect()
    }

    #[test]
    fn equal_names_keep_server_order() {
        let mut items = entries(&["b", "a", "b"]);
        stable_sort_by_key(&mut items, |e| e.name.as_str());
        let order: Vec<(&str, usize)> = items.iter().map(|e| (e.name.as_str(), e.arrival)).collect();
        assert_eq!(order, vec![("a", 1), ("b", 0), ("b", 2)]);
    }

    #[test]
    fn numeric_keys_sort_numerically() {
        let mut numbers = vec![10u32, 2, 1];
        stable_sort_by_key(&mut numbers, |n| n);
        assert_eq!(numbers, vec![1, 2, 10]);
    }

    #[test]
    fn empty_input_is_fine() {
        let mut items: Vec<Entry> = Vec::new();
        stable_sort_by_key(&mut items, |e| e.name.as_str());
        assert!(items.is_empty());
    }

    proptest! {
        #[test]
        fn output_is_sorted_and_stable(names in proptest::collection::vec("[a-c]{0,2}", 0..40)) {
            let mut items: Vec<Entry> = names
                .into_iter()
                .enumerate()
                .map(|(arrival, name)| Entry { name, arrival })
                .collect();
            let before = items.len();
            stable_sort_by_key(&mut items, |e| e.name.as_str());

            prop_assert_eq!(items.len(), before);
            for pair in items.windows(2) {
                prop_assert!(pair[0].name <= pair[1].name);
                if pair[0].name == pair[1].name {
                    prop_assert!(pair[0].arrival < pair[1].arrival);
                }
            }
        }
    }
}
