//! Generic group-and-reduce over transactions.
//!
//! Every aggregate in [`crate::aggregator`] is one call to [`group_by`] with a
//! key extractor and an accumulator type.

use std::collections::HashMap;
use std::hash::Hash;

use sales_core::models::Transaction;

/// Accumulates transactions that share a key.
pub trait Reducer<'a>: Default {
    fn add(&mut self, txn: &'a Transaction);
}

/// Group `transactions` by `key_fn`, folding each group with `R`.
///
/// Groups come back in the order their key was first seen, so a stable sort
/// over the result breaks ties by first appearance in the input.
pub fn group_by<'a, K, R, F>(transactions: &'a [Transaction], key_fn: F) -> Vec<(K, R)>
where
    K: Eq + Hash + Clone,
    R: Reducer<'a>,
    F: Fn(&'a Transaction) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, R)> = Vec::new();

    for txn in transactions {
        let key = key_fn(txn);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, R::default()));
                groups.len() - 1
            }
        };
        groups[slot].1.add(txn);
    }

    groups
}

// ── Tests ─────────────────────────────────────────────────────────────────────
