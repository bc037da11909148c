//! Storage boxes keyed by the owning world object's persistent identity.

use std::collections::BTreeMap;

use super::{Container, ObjectUid};

/// Lazily created storage containers.
///
/// Entries outlive the owning object being loaded into the world; they are
/// only dropped through [`StorageRegistry::remove`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageRegistry {
    boxes: BTreeMap<ObjectUid, Container>,
}

impl StorageRegistry {
    pub fn get(&self, uid: &str) -> Option<&Container> {
        self.boxes.get(uid)
    }

    pub fn get_mut(&mut self, uid: &str) -> Option<&mut Container> {
        self.boxes.get_mut(uid)
    }

    /// Returns the container for `uid`, creating an empty one on first access.
    pub fn get_or_create(&mut self, uid: &ObjectUid, capacity: u16) -> &mut Container {
        self.boxes.entry(uid.clone()).or_insert_with(|| {
            tracing::debug!(storage = %uid, capacity, "created storage container");
            Container::new(capacity)
        })
    }

    /// Removes a storage container, returning its contents.
    pub fn remove(&mut self, uid: &str) -> Option<Container> {
        self.boxes.remove(uid)
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.boxes.contains_key(uid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectUid, &Container)> {
        self.boxes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ObjectUid, &mut Container)> {
        self.boxes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ItemStack, SlotIndex};

    #[test]
    fn containers_are_created_once_and_keep_contents() {
        let mut registry = StorageRegistry::default();
        let uid = ObjectUid::from("chest-7");

        registry
            .get_or_create(&uid, 4)
            .put(SlotIndex(2), ItemStack::new("rope", 3, 0.0));
        let again = registry.get_or_create(&uid, 99);

        assert_eq!(again.capacity(), 4);
        assert_eq!(again.count("rope"), 3);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("chest-8").is_none());
    }
}
