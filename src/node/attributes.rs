//! String-keyed side channel for metadata owned by external passes.
//!
//! Keys are dotted identifiers agreed on by the passes that read and write
//! them. Keys written by this crate:
//!
//! | Key | Value type | Writer |
//! |---|---|---|
//! | [`FORMAT_BODY_BEFORE_COMMENT`] | `Vec<String>` | [`CreateTableStatement::add_body_before_comment`](crate::CreateTableStatement::add_body_before_comment) |

use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt::{self, Debug};

use indexmap::IndexMap as IndexMapRaw;

/// Comments a formatter must print right before a statement body.
pub const FORMAT_BODY_BEFORE_COMMENT: &str = "format.body_before_comment";

/// An opaque attribute value.
pub type AttributeValue = Box<dyn Any + Send + Sync>;

/// `IndexMap` alias using hashbrown's default hasher for `no_std` compatibility.
type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// Lazily allocated, insertion-ordered attribute bag.
///
/// Nothing is allocated until the first [`Attributes::insert`]. Reading a key
/// with the wrong value type behaves exactly like a missing key.
#[derive(Default)]
pub struct Attributes {
    entries: Option<Box<IndexMap<String, AttributeValue>>>,
}

impl Attributes {
    /// Returns whether the bag holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries
            .as_ref()
            .is_none_or(|entries| entries.is_empty())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.len())
    }

    /// Returns whether the backing map has been allocated.
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.entries.is_some()
    }

    /// Returns whether an entry exists for `key`, whatever its type.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .as_ref()
            .is_some_and(|entries| entries.contains_key(key))
    }

    /// Returns the value stored under `key` if it has type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.as_ref()?.get(key)?.downcast_ref::<T>()
    }

    /// Returns the value stored under `key` mutably if it has type `T`.
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.entries.as_mut()?.get_mut(key)?.downcast_mut::<T>()
    }

    /// Stores `value` under `key`, returning the previous value if any.
    pub fn insert<T: Any + Send + Sync>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Option<AttributeValue> {
        self.entries
            .get_or_insert_with(Box::default)
            .insert(key.into(), Box::new(value))
    }

    /// Removes the entry under `key`, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.entries.as_mut()?.shift_remove(key)
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|entries| entries.keys())
            .map(String::as_str)
    }
}

impl Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_lazy_allocation() {
        let mut attributes = Attributes::default();
        assert!(!attributes.is_allocated());
        assert!(attributes.get::<u32>("missing").is_none());
        assert!(attributes.remove("missing").is_none());
        assert!(!attributes.is_allocated());

        attributes.insert("a.b", 7u32);
        assert!(attributes.is_allocated());
        assert_eq!(attributes.get::<u32>("a.b"), Some(&7));
    }

    #[test]
    fn test_type_mismatch_reads_as_missing() {
        let mut attributes = Attributes::default();
        attributes.insert("count", 3u64);
        assert!(attributes.get::<u32>("count").is_none());
        assert!(attributes.contains_key("count"));
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut attributes = Attributes::default();
        attributes.insert("z", 1u8);
        attributes.insert("a", 2u8);
        attributes.insert("m", 3u8);
        attributes.remove("a");
        assert_eq!(attributes.keys().collect::<Vec<_>>(), vec!["z", "m"]);
        assert_eq!(attributes.len(), 2);
    }

    #[test]
    fn test_get_mut_extends_value() {
        let mut attributes = Attributes::default();
        attributes.insert(FORMAT_BODY_BEFORE_COMMENT, vec![String::from("-- a")]);
        attributes
            .get_mut::<Vec<String>>(FORMAT_BODY_BEFORE_COMMENT)
            .unwrap()
            .push(String::from("-- b"));
        assert_eq!(
            attributes
                .get::<Vec<String>>(FORMAT_BODY_BEFORE_COMMENT)
                .unwrap()
                .len(),
            2
        );
    }
}
