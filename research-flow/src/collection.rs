use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Identified;

/// Ordered, append-only list of items addressed by id.
///
/// Items are never removed or reordered; individual entries are replaced in
/// place through [`Collection::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified + Clone> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) -> Uuid {
        let id = item.id();
        self.items.push(item);
        id
    }

    /// Concatenates `items` after the existing entries, keeping their order.
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) -> usize {
        let before = self.items.len();
        self.items.extend(items);
        self.items.len() - before
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Applies `f` to the entry with `id`. Returns `false` when no such entry exists.
    pub fn update(&mut self, id: Uuid, f: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        }
    }

    /// Ids of the entries matching `predicate`, in collection order.
    ///
    /// Batch processors take this snapshot up front and then work through it
    /// one id at a time.
    pub fn ids_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<Uuid> {
        self.items
            .iter()
            .filter(|item| predicate(item))
            .map(Identified::id)
            .collect()
    }

    pub fn filter<'a>(&'a self, predicate: impl Fn(&T) -> bool + 'a) -> impl Iterator<Item = &'a T> {
        self.items.iter().filter(move |item| predicate(item))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T: Identified + Clone> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Paper;
    use crate::status::PaperStatus;

    fn papers(n: usize) -> Collection<Paper> {
        (0..n)
            .map(|i| Paper::new(format!("Paper {}", i), format!("10.1000/{}", i)))
            .collect()
    }

    #[test]
    fn extend_appends_after_existing_entries() {
        let mut store = papers(3);
        let original = store.to_vec();

        let added = store.extend(vec![Paper::new("New", "10.2000/new")]);

        assert_eq!(added, 1);
        assert_eq!(store.len(), 4);
        assert_eq!(&store.as_slice()[..3], original.as_slice());
        assert_eq!(store.as_slice()[3].title, "New");
    }

    #[test]
    fn update_mutates_only_the_addressed_entry() {
        let mut store = papers(3);
        let target = store.as_slice()[1].id;

        let found = store.update(target, |p| p.status = PaperStatus::Downloaded);

        assert!(found);
        assert_eq!(store.get(target).unwrap().status, PaperStatus::Downloaded);
        assert_eq!(store.as_slice()[0].status, PaperStatus::Pending);
        assert_eq!(store.as_slice()[2].status, PaperStatus::Pending);
        assert!(!store.update(Uuid::new_v4(), |p| p.title.clear()));
    }

    #[test]
    fn ids_where_keeps_collection_order() {
        let mut store = papers(4);
        let ids: Vec<Uuid> = store.iter().map(|p| p.id).collect();
        store.update(ids[1], |p| p.status = PaperStatus::Ready);
        store.update(ids[3], |p| p.status = PaperStatus::Ready);

        let ready = store.ids_where(|p| p.status == PaperStatus::Ready);
        assert_eq!(ready, vec![ids[1], ids[3]]);
        assert_eq!(store.filter(|p| p.status == PaperStatus::Pending).count(), 2);
    }

    #[test]
    fn serializes_as_plain_array() {
        let store = papers(2);
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
    }
}
