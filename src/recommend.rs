use crate::errors::ArlError;
use crate::item::Item;
use crate::rules::{Metric, Rule};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Rank rules descending by `metric` (ties: descending support, then the
/// rule collection's own order — the sort is stable) and collect, from rules
/// whose antecedent contains `query`, the first consequent item of each,
/// deduplicated, until `count` items are found or the rules run out. A short
/// result is not an error; a zero `count` is.
pub fn recommend(
    rules: &[Rule],
    query: Item,
    metric: Metric,
    count: usize,
) -> Result<Vec<Item>, ArlError> {
    if count == 0 {
        return Err(ArlError::InvalidCount);
    }

    let mut order: Vec<usize> = (0..rules.len()).collect();
    order.sort_by_key(|&i| {
        (
            Reverse(OrderedFloat(metric.of(&rules[i]))),
            Reverse(OrderedFloat(rules[i].support)),
        )
    });

    let mut result: Vec<Item> = vec![];
    for i in order {
        let rule = &rules[i];
        // Antecedents are kept in canonical order.
        if rule.antecedent.binary_search(&query).is_err() {
            continue;
        }
        let candidate = rule.consequent[0];
        if !result.contains(&candidate) {
            result.push(candidate);
        }
        if result.len() == count {
            break;
        }
    }
    Ok(result)
}
