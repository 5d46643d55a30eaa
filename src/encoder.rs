use crate::errors::ArlError;
use crate::incidence::IncidenceTable;
use crate::item::Item;
use fnv::FnvHashMap;
use std::collections::BTreeMap;
use tracing::warn;

/// One cleaned transaction line: an item bought under an invoice. Quantities
/// are positive by the upstream cleaner's contract; the encoder re-checks.
#[derive(Clone, Debug)]
pub struct BasketRecord {
    pub basket_id: String,
    pub item: Item,
    pub quantity: f64,
}

impl BasketRecord {
    pub fn new(basket_id: &str, item: Item, quantity: f64) -> BasketRecord {
        BasketRecord {
            basket_id: String::from(basket_id),
            item,
            quantity,
        }
    }
}

/// Convert transaction records into the incidence table: an item is present
/// in a basket iff its quantities within that invoice sum to > 0. Baskets
/// are inserted in sorted basket-id order, so the table (and everything
/// mined from it) is independent of input record order. Zero records is a
/// valid empty table, not an error.
pub fn encode(records: &[BasketRecord]) -> Result<IncidenceTable, ArlError> {
    let mut baskets: BTreeMap<&str, FnvHashMap<Item, f64>> = BTreeMap::new();
    for record in records {
        if record.quantity <= 0.0 {
            return Err(ArlError::InvalidQuantity {
                basket_id: record.basket_id.clone(),
                quantity: record.quantity,
            });
        }
        *baskets
            .entry(&record.basket_id)
            .or_default()
            .entry(record.item)
            .or_insert(0.0) += record.quantity;
    }

    let mut table = IncidenceTable::new();
    for (basket_id, quantities) in baskets {
        let mut items: Vec<Item> = quantities
            .into_iter()
            .filter(|&(_, quantity)| quantity > 0.0)
            .map(|(item, _)| item)
            .collect();
        if items.is_empty() {
            warn!(basket_id, "dropping basket with no items after encoding");
            continue;
        }
        items.sort();
        table.insert(&items);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::{encode, BasketRecord};
    use crate::itemizer::Itemizer;

    #[test]
    fn test_duplicate_records_aggregate() {
        let mut itemizer = Itemizer::new();
        let x = itemizer.id_of("x");
        let y = itemizer.id_of("y");
        // Two lines for (536365, x) must collapse into one presence bit.
        let records = vec![
            BasketRecord::new("536365", x, 2.0),
            BasketRecord::new("536365", x, 3.0),
            BasketRecord::new("536365", y, 1.0),
            BasketRecord::new("536366", y, 4.0),
        ];
        let table = encode(&records).unwrap();
        assert_eq!(table.basket_count(), 2);
        assert_eq!(table.support(&[x]), 0.5);
        assert_eq!(table.support(&[y]), 1.0);
        assert_eq!(table.support(&[x, y]), 0.5);
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let mut itemizer = Itemizer::new();
        let x = itemizer.id_of("x");
        let records = vec![
            BasketRecord::new("536365", x, 1.0),
            BasketRecord::new("536366", x, -2.0),
        ];
        assert!(encode(&records).is_err());
        assert!(encode(&[BasketRecord::new("536367", x, 0.0)]).is_err());
    }

    #[test]
    fn test_empty_input_is_empty_table() {
        let table = encode(&[]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_encoding_is_idempotent_on_binary_input() {
        let mut itemizer = Itemizer::new();
        let x = itemizer.id_of("x");
        let y = itemizer.id_of("y");
        let records = vec![
            BasketRecord::new("b1", x, 1.0),
            BasketRecord::new("b1", y, 1.0),
            BasketRecord::new("b2", x, 1.0),
        ];
        let first = encode(&records).unwrap();

        // Re-encode the binary table's contents; supports must not change.
        let mut again: Vec<BasketRecord> = vec![];
        for (tid, items) in [(0, vec![x, y]), (1, vec![x])] {
            for item in items {
                again.push(BasketRecord::new(&format!("b{}", tid + 1), item, 1.0));
            }
        }
        let second = encode(&again).unwrap();
        assert_eq!(first.basket_count(), second.basket_count());
        for itemset in [vec![x], vec![y], vec![x, y]] {
            assert_eq!(first.support(&itemset), second.support(&itemset));
        }
    }

    #[test]
    fn test_record_order_does_not_matter() {
        let mut itemizer = Itemizer::new();
        let x = itemizer.id_of("x");
        let y = itemizer.id_of("y");
        let forward = vec![
            BasketRecord::new("b1", x, 1.0),
            BasketRecord::new("b2", y, 1.0),
        ];
        let reversed: Vec<BasketRecord> = forward.iter().rev().cloned().collect();
        let a = encode(&forward).unwrap();
        let b = encode(&reversed).unwrap();
        assert_eq!(a.support(&[x]), b.support(&[x]));
        assert_eq!(a.support(&[y]), b.support(&[y]));
    }
}
