use crate::item::Item;
use fnv::FnvHashMap;

/// Interns product identifiers (stock codes or descriptions) as dense
/// integer ids, so itemsets are small `Vec<Item>`s rather than strings.
pub struct Itemizer {
    next_item_id: u32,
    item_str_to_id: FnvHashMap<String, Item>,
    item_id_to_str: Vec<String>,
}

impl Itemizer {
    pub fn new() -> Itemizer {
        Itemizer {
            next_item_id: 1,
            item_str_to_id: FnvHashMap::default(),
            item_id_to_str: vec![],
        }
    }
    pub fn id_of(&mut self, item: &str) -> Item {
        if let Some(id) = self.item_str_to_id.get(item) {
            return *id;
        }
        let id = self.next_item_id;
        self.next_item_id += 1;
        self.item_str_to_id
            .insert(String::from(item), Item::with_id(id));
        self.item_id_to_str.push(String::from(item));
        Item::with_id(id)
    }
    /// Lookup without interning, for query items supplied on the command
    /// line that may not occur in the dataset at all.
    pub fn lookup(&self, item: &str) -> Option<Item> {
        self.item_str_to_id.get(item).copied()
    }
    pub fn str_of(&self, id: Item) -> &str {
        &self.item_id_to_str[id.as_index() - 1]
    }
    #[cfg(test)]
    pub fn to_id_vec(&mut self, strs: &[&str]) -> Vec<Item> {
        let mut v: Vec<Item> = strs.iter().map(|s| self.id_of(s)).collect();
        v.sort();
        v
    }
}

#[cfg(test)]
mod tests {
    use super::Itemizer;

    #[test]
    fn test_round_trip() {
        let mut itemizer = Itemizer::new();
        let a = itemizer.id_of("POSTAGE");
        let b = itemizer.id_of("RED RETROSPOT CAKE STAND");
        assert_ne!(a, b);
        assert_eq!(itemizer.id_of("POSTAGE"), a);
        assert_eq!(itemizer.str_of(a), "POSTAGE");
        assert_eq!(itemizer.str_of(b), "RED RETROSPOT CAKE STAND");
        assert_eq!(itemizer.lookup("POSTAGE"), Some(a));
        assert_eq!(itemizer.lookup("NOT IN DATASET"), None);
    }
}
