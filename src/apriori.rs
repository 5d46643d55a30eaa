use crate::errors::ArlError;
use crate::incidence::IncidenceTable;
use crate::item::Item;
use fnv::FnvHashSet;
use itertools::Itertools;
use rayon::prelude::*;

/// A frequent itemset: items in canonical (ascending id) order, tagged with
/// the fraction of baskets containing all of them. Frozen once mined.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequentItemset {
    pub items: Vec<Item>,
    pub support: f64,
}

/// Level-wise Apriori. Enumerates every itemset whose support meets
/// `min_support`, without touching the power set: level k candidates come
/// from joining level k-1 itemsets on a shared (k-2)-prefix, and any
/// candidate with an infrequent (k-1)-subset is discarded before its
/// support is ever counted.
///
/// Output order is deterministic: by level, then lexicographically within a
/// level. An empty table yields an empty result.
pub fn mine_frequent_itemsets(
    table: &IncidenceTable,
    min_support: f64,
) -> Result<Vec<FrequentItemset>, ArlError> {
    if !(min_support > 0.0 && min_support <= 1.0) {
        return Err(ArlError::InvalidThreshold(min_support));
    }
    if table.is_empty() {
        return Ok(vec![]);
    }

    let basket_count = table.basket_count() as f64;
    let min_count = ((min_support * basket_count).ceil() as usize).max(1);

    // L1: per-item support comes straight off the tid-list lengths.
    // items() iterates in ascending id order, so L1 is already sorted.
    let mut current: Vec<FrequentItemset> = table
        .items()
        .filter_map(|item| {
            let count = table.support_count(&[item]);
            if count < min_count {
                return None;
            }
            Some(FrequentItemset {
                items: vec![item],
                support: count as f64 / basket_count,
            })
        })
        .collect();

    let mut frequent: Vec<FrequentItemset> = vec![];
    while !current.is_empty() {
        let candidates = generate_candidates(&current);

        // Support scans are independent per candidate; rayon's indexed
        // collect keeps candidate order, so parallelism cannot change the
        // output.
        let counts: Vec<usize> = candidates
            .par_iter()
            .map(|candidate| table.support_count(candidate))
            .collect();

        let next: Vec<FrequentItemset> = candidates
            .into_iter()
            .zip(counts)
            .filter(|&(_, count)| count >= min_count)
            .map(|(items, count)| FrequentItemset {
                items,
                support: count as f64 / basket_count,
            })
            .collect();

        frequent.append(&mut current);
        current = next;
    }
    Ok(frequent)
}

/// Join step plus anti-monotone prune. `prev` must be one level's itemsets
/// in lexicographic order; the returned candidates are one item larger and
/// again lexicographically ordered, which keeps the prefix-grouping
/// invariant across levels.
fn generate_candidates(prev: &[FrequentItemset]) -> Vec<Vec<Item>> {
    let prev_sets: FnvHashSet<&[Item]> = prev.iter().map(|f| f.items.as_slice()).collect();

    let mut candidates: Vec<Vec<Item>> = vec![];
    for (_, group) in &prev
        .iter()
        .chunk_by(|f| f.items[..f.items.len() - 1].to_vec())
    {
        let group: Vec<&FrequentItemset> = group.collect();
        for (a, b) in group.iter().tuple_combinations() {
            // Same prefix, and a < b lexicographically, so appending b's
            // last item to a yields a sorted candidate.
            let mut candidate = a.items.clone();
            candidate.push(*b.items.last().unwrap());
            if has_infrequent_subset(&candidate, &prev_sets) {
                continue;
            }
            candidates.push(candidate);
        }
    }
    candidates
}

// No itemset can be frequent if any of its subsets is infrequent. Checking
// the (k-1)-subsets against the previous level is enough: their own subsets
// were checked when they were candidates.
fn has_infrequent_subset(candidate: &[Item], prev_sets: &FnvHashSet<&[Item]>) -> bool {
    let mut subset: Vec<Item> = Vec::with_capacity(candidate.len() - 1);
    for omit in 0..candidate.len() {
        subset.clear();
        subset.extend(
            candidate
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != omit)
                .map(|(_, &item)| item),
        );
        if !prev_sets.contains(subset.as_slice()) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::{generate_candidates, mine_frequent_itemsets, FrequentItemset};
    use crate::encoder::{encode, BasketRecord};
    use crate::incidence::IncidenceTable;
    use crate::item::Item;
    use crate::itemizer::Itemizer;

    fn table_of(baskets: &[&[&str]], itemizer: &mut Itemizer) -> IncidenceTable {
        let mut records: Vec<BasketRecord> = vec![];
        for (tid, basket) in baskets.iter().enumerate() {
            for name in basket.iter() {
                records.push(BasketRecord::new(
                    &format!("inv{}", tid),
                    itemizer.id_of(name),
                    1.0,
                ));
            }
        }
        encode(&records).unwrap()
    }

    fn find<'a>(
        mined: &'a [FrequentItemset],
        items: &[Item],
    ) -> Option<&'a FrequentItemset> {
        mined.iter().find(|f| f.items == items)
    }

    #[test]
    fn test_four_basket_scenario() {
        let mut itemizer = Itemizer::new();
        let table = table_of(
            &[&["x", "y", "z"], &["x", "y"], &["x", "z"], &["x"]],
            &mut itemizer,
        );
        let mined = mine_frequent_itemsets(&table, 0.5).unwrap();

        let x = itemizer.id_of("x");
        let y = itemizer.id_of("y");
        let z = itemizer.id_of("z");

        assert_eq!(mined.len(), 5);
        assert_eq!(find(&mined, &[x]).unwrap().support, 1.0);
        assert_eq!(find(&mined, &[y]).unwrap().support, 0.5);
        assert_eq!(find(&mined, &[z]).unwrap().support, 0.5);
        assert_eq!(find(&mined, &[x, y]).unwrap().support, 0.5);
        assert_eq!(find(&mined, &[x, z]).unwrap().support, 0.5);
        // {y,z} misses the threshold, so {x,y,z} must not appear either.
        assert!(find(&mined, &[y, z]).is_none());
        assert!(find(&mined, &[x, y, z]).is_none());
    }

    #[test]
    fn test_prune_skips_candidate_with_infrequent_subset() {
        let mut itemizer = Itemizer::new();
        let x = itemizer.id_of("x");
        let y = itemizer.id_of("y");
        let z = itemizer.id_of("z");
        // L2 without {y,z}: joining {x,y} and {x,z} proposes {x,y,z}, but
        // the prune rejects it before any support scan.
        let level2 = vec![
            FrequentItemset {
                items: vec![x, y],
                support: 0.5,
            },
            FrequentItemset {
                items: vec![x, z],
                support: 0.5,
            },
        ];
        assert!(generate_candidates(&level2).is_empty());

        // With {y,z} present the join goes through.
        let mut full = level2.clone();
        full.push(FrequentItemset {
            items: vec![y, z],
            support: 0.5,
        });
        assert_eq!(generate_candidates(&full), vec![vec![x, y, z]]);
    }

    #[test]
    fn test_anti_monotonicity() {
        let mut itemizer = Itemizer::new();
        let table = table_of(
            &[
                &["a", "b", "c"],
                &["a", "b", "c"],
                &["a", "b"],
                &["b", "c"],
                &["a"],
            ],
            &mut itemizer,
        );
        let mined = mine_frequent_itemsets(&table, 0.4).unwrap();
        // Every subset of a mined itemset is itself mined, with support at
        // least as large.
        for itemset in &mined {
            for omit in 0..itemset.items.len() {
                let mut subset = itemset.items.clone();
                subset.remove(omit);
                if subset.is_empty() {
                    continue;
                }
                let parent = find(&mined, &subset).unwrap();
                assert!(parent.support >= itemset.support);
            }
        }
    }

    #[test]
    fn test_determinism() {
        let mut itemizer = Itemizer::new();
        let baskets: &[&[&str]] = &[
            &["a", "b", "c"],
            &["b", "c"],
            &["a", "c"],
            &["a", "b"],
            &["c"],
        ];
        let table = table_of(baskets, &mut itemizer);
        let first = mine_frequent_itemsets(&table, 0.4).unwrap();
        let second = mine_frequent_itemsets(&table, 0.4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_threshold_validation() {
        let table = IncidenceTable::new();
        assert!(mine_frequent_itemsets(&table, 0.0).is_err());
        assert!(mine_frequent_itemsets(&table, -0.1).is_err());
        assert!(mine_frequent_itemsets(&table, 1.5).is_err());
    }

    #[test]
    fn test_empty_table_yields_empty_result() {
        let table = IncidenceTable::new();
        let mined = mine_frequent_itemsets(&table, 0.5).unwrap();
        assert!(mined.is_empty());
    }
}
