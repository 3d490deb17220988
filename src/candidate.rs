//! Objects that can be validated

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

/// A flat, string-keyed object.
///
/// `field` returns `None` for a missing key; rules see that as an absent
/// value, distinct from an explicit JSON `null`.
pub trait Candidate {
    fn field(&self, key: &str) -> Option<&Value>;
}

impl Candidate for Map<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

/// Only objects have fields; any other value reads every field as absent.
impl Candidate for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl<S: std::hash::BuildHasher> Candidate for HashMap<String, Value, S> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Candidate for BTreeMap<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<C: Candidate + ?Sized> Candidate for &C {
    fn field(&self, key: &str) -> Option<&Value> {
        (**self).field(key)
    }
}
