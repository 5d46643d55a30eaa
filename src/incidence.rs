use crate::item::Item;

/// Sparse basket-by-item incidence structure: for each item, the sorted list
/// of ids of the baskets containing it. Built once per mining run by the
/// encoder and immutable afterwards; support queries intersect the sorted
/// basket-id lists rather than scanning a dense matrix.
pub struct IncidenceTable {
    tid_lists: Vec<Vec<usize>>,
    basket_count: usize,
}

impl IncidenceTable {
    pub fn new() -> IncidenceTable {
        IncidenceTable {
            tid_lists: Vec::new(),
            basket_count: 0,
        }
    }

    /// Insert one basket. `items` must be sorted and deduplicated; basket
    /// ids are assigned in insertion order so the per-item lists stay sorted.
    pub fn insert(&mut self, items: &[Item]) {
        let tid = self.basket_count;
        self.basket_count += 1;
        for &item in items {
            let item_index = item.as_index();
            if self.tid_lists.len() <= item_index {
                self.tid_lists.resize(item_index + 1, vec![]);
            }
            self.tid_lists[item_index].push(tid);
        }
    }

    pub fn basket_count(&self) -> usize {
        self.basket_count
    }

    pub fn is_empty(&self) -> bool {
        self.basket_count == 0
    }

    /// Every item that occurs in at least one basket, in canonical order.
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.tid_lists
            .iter()
            .enumerate()
            .filter(|(_, tids)| !tids.is_empty())
            .map(|(index, _)| Item::with_id(index as u32))
    }

    /// Number of baskets that are supersets of `itemset`.
    pub fn support_count(&self, itemset: &[Item]) -> usize {
        if itemset.is_empty() {
            return 0;
        }

        if itemset.len() == 1 {
            let item_index = itemset[0].as_index();
            if item_index >= self.tid_lists.len() {
                return 0;
            }
            return self.tid_lists[item_index].len();
        }

        let mut tid_lists: Vec<&Vec<usize>> = Vec::with_capacity(itemset.len());
        for &item in itemset {
            let item_index = item.as_index();
            if item_index >= self.tid_lists.len() {
                return 0;
            }
            tid_lists.push(&self.tid_lists[item_index]);
        }

        let mut p: Vec<usize> = vec![0; tid_lists.len()];

        // For each basket id in the first item's list, check whether every
        // other item's list also contains it. Lists are sorted, so each scan
        // pointer only ever moves forward.
        let mut count = 0;
        for &tid in tid_lists[0].iter() {
            let mut tid_in_all_item_tid_lists = true;
            for i in 1..tid_lists.len() {
                while p[i] < tid_lists[i].len() && tid_lists[i][p[i]] < tid {
                    p[i] += 1;
                }
                if p[i] == tid_lists[i].len() || tid_lists[i][p[i]] != tid {
                    tid_in_all_item_tid_lists = false;
                    break;
                }
            }
            if tid_in_all_item_tid_lists {
                count += 1
            }
        }
        count
    }

    /// support(itemset) = |baskets ⊇ itemset| / |baskets|, in [0, 1].
    pub fn support(&self, itemset: &[Item]) -> f64 {
        if self.basket_count == 0 {
            return 0.0;
        }
        (self.support_count(itemset) as f64) / (self.basket_count as f64)
    }
}
