use salon_scheduler_domain::{Entity, ID};
use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

pub fn save<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    if let Some(existing) = collection.iter_mut().find(|item| item.id() == val.id()) {
        *existing = val.clone();
    }
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|item| item.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    let collection = collection.lock().unwrap();
    collection.iter().filter(|item| compare(item)).cloned().collect()
}

/// Returns the number of deleted items
pub fn delete_by<T, F: Fn(&T) -> bool>(collection: &Mutex<Vec<T>>, compare: F) -> usize {
    let mut collection = collection.lock().unwrap();
    let before = collection.len();
    collection.retain(|item| !compare(item));
    before - collection.len()
}

/// Applies `update` to every matching item and returns the updated items
pub fn update_many<T: Clone, F: Fn(&T) -> bool, U: Fn(&mut T)>(
    collection: &Mutex<Vec<T>>,
    compare: F,
    update: U,
) -> Vec<T> {
    let mut collection = collection.lock().unwrap();
    let mut updated = Vec::new();
    for item in collection.iter_mut().filter(|item| compare(item)) {
        update(item);
        updated.push(item.clone());
    }
    updated
}
