use std::collections::HashSet;

use crate::models::domain::{Block, Chapter, Page, Question};

/// An entity that lives in an ordered sibling list under a single parent.
pub trait Sibling {
    fn id(&self) -> &str;
    fn parent_id(&self) -> &str;
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

macro_rules! impl_sibling {
    ($ty:ty, $parent:ident) => {
        impl Sibling for $ty {
            fn id(&self) -> &str {
                &self.id
            }
            fn parent_id(&self) -> &str {
                &self.$parent
            }
            fn order(&self) -> u32 {
                self.order
            }
            fn set_order(&mut self, order: u32) {
                self.order = order;
            }
        }
    };
}

impl_sibling!(Chapter, course_id);
impl_sibling!(Page, chapter_id);
impl_sibling!(Block, page_id);
impl_sibling!(Question, parent_id);

/// Flat storage for every sibling list of one entity kind, keyed by parent id.
#[derive(Debug, Clone)]
pub struct SiblingCollection<T> {
    items: Vec<T>,
}

impl<T> Default for SiblingCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Sibling> SiblingCollection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Children of `parent_id`, ascending by order. Ties keep insertion order.
    pub fn children(&self, parent_id: &str) -> Vec<&T> {
        let mut children: Vec<&T> = self
            .items
            .iter()
            .filter(|item| item.parent_id() == parent_id)
            .collect();
        children.sort_by_key(|item| item.order());
        children
    }

    pub fn child_ids(&self, parent_id: &str) -> Vec<String> {
        self.children(parent_id)
            .into_iter()
            .map(|item| item.id().to_string())
            .collect()
    }

    pub fn count(&self, parent_id: &str) -> u32 {
        self.items
            .iter()
            .filter(|item| item.parent_id() == parent_id)
            .count() as u32
    }

    pub fn next_order(&self, parent_id: &str) -> u32 {
        self.count(parent_id) + 1
    }

    /// Stores `item` with the order it already carries.
    pub fn push(&mut self, item: T) -> String {
        let id = item.id().to_string();
        self.items.push(item);
        id
    }

    /// Stores `item` at the end of its sibling list.
    pub fn append(&mut self, mut item: T) -> String {
        let order = self.next_order(item.parent_id());
        item.set_order(order);
        self.push(item)
    }

    /// Stores `item` at zero-based `index`, shifting later siblings down by one.
    /// An index past the end appends.
    pub fn insert_at(&mut self, mut item: T, index: usize) -> String {
        let count = self.count(item.parent_id()) as usize;
        let order = index.min(count) as u32 + 1;

        for sibling in self
            .items
            .iter_mut()
            .filter(|sibling| sibling.parent_id() == item.parent_id())
        {
            if sibling.order() >= order {
                sibling.set_order(sibling.order() + 1);
            }
        }

        item.set_order(order);
        self.push(item)
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let position = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(position))
    }

    pub fn remove_children(&mut self, parent_id: &str) -> Vec<T> {
        let (removed, kept): (Vec<T>, Vec<T>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.parent_id() == parent_id);
        self.items = kept;
        removed
    }

    /// Assigns `order = position + 1` following `ordered_ids`, counting only ids that are
    /// children of `parent_id` and skipping repeats. Returns the ids of children that were
    /// left out of the list; the caller decides what happens to them.
    pub fn apply_order(&mut self, parent_id: &str, ordered_ids: &[String]) -> Vec<String> {
        let mut placed: HashSet<&str> = HashSet::new();
        let mut next = 1;

        for id in ordered_ids {
            if placed.contains(id.as_str()) {
                continue;
            }
            let Some(item) = self
                .items
                .iter_mut()
                .find(|item| item.id() == id.as_str() && item.parent_id() == parent_id)
            else {
                continue;
            };
            item.set_order(next);
            next += 1;
            placed.insert(id.as_str());
        }

        self.items
            .iter()
            .filter(|item| item.parent_id() == parent_id && !placed.contains(item.id()))
            .map(|item| item.id().to_string())
            .collect()
    }

    pub fn first_child_id(&self, parent_id: &str) -> Option<String> {
        self.children(parent_id)
            .first()
            .map(|item| item.id().to_string())
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        parent: String,
        order: u32,
    }

    impl Sibling for Item {
        fn id(&self) -> &str {
            &self.id
        }
        fn parent_id(&self) -> &str {
            &self.parent
        }
        fn order(&self) -> u32 {
            self.order
        }
        fn set_order(&mut self, order: u32) {
            self.order = order;
        }
    }

    fn item(id: &str, parent: &str) -> Item {
        Item {
            id: id.to_string(),
            parent: parent.to_string(),
            order: 0,
        }
    }

    fn orders(collection: &SiblingCollection<Item>, parent: &str) -> Vec<(String, u32)> {
        collection
            .children(parent)
            .into_iter()
            .map(|item| (item.id.clone(), item.order))
            .collect()
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn append_numbers_siblings_per_parent() {
        let mut collection = SiblingCollection::default();
        collection.append(item("a", "p1"));
        collection.append(item("b", "p1"));
        collection.append(item("x", "p2"));

        assert_eq!(
            orders(&collection, "p1"),
            vec![("a".to_string(), 1), ("b".to_string(), 2)]
        );
        assert_eq!(orders(&collection, "p2"), vec![("x".to_string(), 1)]);
        assert_eq!(collection.count("p1"), 2);
        assert_eq!(collection.next_order("p3"), 1);
    }

    #[test]
    fn insert_at_shifts_later_siblings() {
        let mut collection = SiblingCollection::default();
        collection.append(item("a", "p"));
        collection.append(item("b", "p"));
        collection.append(item("c", "p"));

        collection.insert_at(item("new", "p"), 1);

        assert_eq!(
            orders(&collection, "p"),
            vec![
                ("a".to_string(), 1),
                ("new".to_string(), 2),
                ("b".to_string(), 3),
                ("c".to_string(), 4)
            ]
        );
    }

    #[test]
    fn insert_past_end_appends() {
        let mut collection = SiblingCollection::default();
        collection.append(item("a", "p"));

        collection.insert_at(item("b", "p"), 42);

        assert_eq!(collection.get("b").map(|i| i.order), Some(2));
        assert_eq!(collection.get("a").map(|i| i.order), Some(1));
    }

    #[test]
    fn apply_order_renumbers_and_reports_omitted() {
        let mut collection = SiblingCollection::default();
        for id in ["a", "b", "c", "d"] {
            collection.append(item(id, "p"));
        }
        collection.append(item("other", "q"));

        let omitted = collection.apply_order("p", &ids(&["c", "other", "a", "c", "b"]));

        assert_eq!(omitted, ids(&["d"]));
        assert_eq!(collection.get("c").map(|i| i.order), Some(1));
        assert_eq!(collection.get("a").map(|i| i.order), Some(2));
        assert_eq!(collection.get("b").map(|i| i.order), Some(3));
        assert_eq!(collection.get("other").map(|i| i.order), Some(1));
    }

    #[test]
    fn remove_children_keeps_other_parents() {
        let mut collection = SiblingCollection::default();
        collection.append(item("a", "p"));
        collection.append(item("b", "p"));
        collection.append(item("x", "q"));

        let removed = collection.remove_children("p");

        assert_eq!(removed.len(), 2);
        assert_eq!(collection.len(), 1);
        assert!(collection.contains("x"));
        assert!(collection.remove("a").is_none());
    }

    #[test]
    fn first_child_follows_order_not_insertion() {
        let mut collection = SiblingCollection::default();
        collection.append(item("a", "p"));
        collection.insert_at(item("b", "p"), 0);

        assert_eq!(collection.first_child_id("p"), Some("b".to_string()));
        assert_eq!(collection.first_child_id("missing"), None);
    }
}
