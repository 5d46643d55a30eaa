use crate::itemizer::Itemizer;

/// An opaque product identifier. The `Ord` impl over the interned id is the
/// fixed canonical order used everywhere an itemset is kept sorted.
#[derive(Copy, Clone, Hash, PartialOrd, PartialEq, Eq, Ord, Debug)]
pub struct Item {
    id: u32,
}

impl Item {
    pub fn with_id(id: u32) -> Item {
        Item { id }
    }
    pub fn as_index(&self) -> usize {
        self.id as usize
    }
    pub fn item_vec_to_string(items: &[Item], itemizer: &Itemizer) -> String {
        let mut a: Vec<&str> = items.iter().map(|&item| itemizer.str_of(item)).collect();
        ensure_sorted(&mut a);
        a.join(" ")
    }
}

// If all items in the itemset convert to an integer, order by that integer,
// otherwise order lexicographically. Stock codes in retail exports are
// usually numeric but not always (e.g. "84029E").
fn ensure_sorted(a: &mut Vec<&str>) {
    let all_items_convert_to_ints = a.iter().all(|x| x.parse::<u32>().is_ok());
    if all_items_convert_to_ints {
        a.sort_by_key(|x| x.parse::<u32>().unwrap_or(0));
    } else {
        a.sort();
    }
}
