//! Observable cache cell backing every store.

use tokio::sync::watch;

/// A watch-backed cell holding the last-fetched value.
///
/// Observers subscribe and receive every replacement; readers get a clone of
/// the current value without blocking writers.
#[derive(Debug)]
pub struct Cached<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> Cached<T> {
    /// Creates an empty cell.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Returns a clone of the cached value, if any.
    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Replaces the cached value and notifies subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(Some(value));
    }

    /// Clears the cached value and notifies subscribers.
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    /// Updates the cached value in place, if present.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_if_modified(|slot| match slot {
            Some(value) => {
                f(value);
                true
            }
            None => false,
        });
    }

    /// Subscribes to cache replacements.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cell = Cached::new();
        assert!(cell.get().is_none());

        cell.set(vec![1, 2, 3]);
        assert_eq!(cell.get(), Some(vec![1, 2, 3]));

        cell.clear();
        assert!(cell.get().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_replacements() {
        let cell = Cached::new();
        let mut rx = cell.subscribe();

        cell.set("first".to_string());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().clone(), Some("first".to_string()));

        cell.set("second".to_string());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().clone(), Some("second".to_string()));
    }

    #[test]
    fn test_update_skips_empty_cell() {
        let cell: Cached<Vec<i32>> = Cached::new();
        cell.update(|v| v.push(1));
        assert!(cell.get().is_none());

        cell.set(vec![1]);
        cell.update(|v| v.push(2));
        assert_eq!(cell.get(), Some(vec![1, 2]));
    }
}
