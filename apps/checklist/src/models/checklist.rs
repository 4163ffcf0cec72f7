use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A named group of checklist items, rendered as a header followed by item rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// Categories keyed by name, in input-document order.
///
/// Serialized as a JSON object (`{"Produce": ["Apples", ...]}`). A repeated key replaces
/// the earlier entry's items but keeps the earlier position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryCollection {
    categories: Vec<Category>,
}

impl CategoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a category.
    pub fn insert(&mut self, name: impl Into<String>, items: Vec<String>) {
        let name = name.into();
        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.items = items,
            None => self.categories.push(Category::new(name, items)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<String>)> for CategoryCollection {
    fn from_iter<T: IntoIterator<Item = (N, Vec<String>)>>(iter: T) -> Self {
        let mut collection = CategoryCollection::new();
        for (name, items) in iter {
            collection.insert(name, items);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a CategoryCollection {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

impl Serialize for CategoryCollection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.categories.iter().map(|c| (&c.name, &c.items)))
    }
}

impl<'de> Deserialize<'de> for CategoryCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CollectionVisitor;

        impl<'de> Visitor<'de> for CollectionVisitor {
            type Value = CategoryCollection;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from category name to a list of item names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut collection = CategoryCollection::new();
                while let Some((name, items)) = map.next_entry::<String, Vec<String>>()? {
                    collection.insert(name, items);
                }
                Ok(collection)
            }
        }

        deserializer.deserialize_map(CollectionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_preserves_document_order() {
        let json = r#"{"Zucchini": ["a"], "Apples": ["b", "c"], "Milk": []}"#;
        let collection: CategoryCollection = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = collection.names().collect();
        assert_eq!(names, vec!["Zucchini", "Apples", "Milk"]);
        assert_eq!(collection.get("Apples").unwrap().items, vec!["b", "c"]);
    }

    #[test]
    fn test_duplicate_key_replaces_items_in_place() {
        let json = r#"{"A": ["1"], "B": ["2"], "A": ["3", "4"]}"#;
        let collection: CategoryCollection = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = collection.names().collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(collection.get("A").unwrap().items, vec!["3", "4"]);
    }

    #[test]
    fn test_duplicate_items_are_kept() {
        let json = r#"{"A": ["Eggs", "Eggs"]}"#;
        let collection: CategoryCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.get("A").unwrap().items.len(), 2);
    }

    #[test]
    fn test_non_string_items_are_rejected() {
        let json = r#"{"A": [1, 2]}"#;
        assert!(serde_json::from_str::<CategoryCollection>(json).is_err());
    }

    #[test]
    fn test_serialize_round_trips_order() {
        let collection: CategoryCollection = vec![
            ("B", vec!["x".to_string()]),
            ("A", vec!["y".to_string()]),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&collection).unwrap();
        assert_eq!(json, r#"{"B":["x"],"A":["y"]}"#);
    }
}
