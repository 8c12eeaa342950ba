use serde::{Deserialize, Serialize};

/// A single `<tag k=".." v=".."/>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "tag")]
pub struct Tag {
    /// Tag key.
    #[serde(rename = "@k")]
    pub key: String,
    /// Tag value.
    #[serde(rename = "@v")]
    pub value: String,
}

/// Ordered key/value tags with unique keys.
///
/// Inserting an existing key replaces its value in place, so duplicate keys
/// coming from the wire collapse to the last value seen.
///
/// ```
/// # use osm_common::Tags;
/// let mut tags = Tags::from([("comment", "first"), ("created_by", "me")]);
/// tags.insert("comment", "second");
/// assert_eq!(tags.get("comment"), Some("second"));
/// assert_eq!(tags.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Tag>", into = "Vec<Tag>")]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|tag| tag.key == key) {
            Some(tag) => Some(std::mem::replace(&mut tag.value, value)),
            None => {
                self.0.push(Tag { key, value });
                None
            }
        }
    }

    /// Value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|tag| tag.key == key)
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|tag| tag.key == key)?;
        Some(self.0.remove(index).value)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|tag| (tag.key.as_str(), tag.value.as_str()))
    }
}

impl From<Vec<Tag>> for Tags {
    fn from(raw: Vec<Tag>) -> Self {
        let mut tags = Tags::new();
        for tag in raw {
            tags.insert(tag.key, tag.value);
        }
        tags
    }
}

impl From<Tags> for Vec<Tag> {
    fn from(tags: Tags) -> Self {
        tags.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for (key, value) in iter {
            tags.insert(key, value);
        }
        tags
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Tags {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_wire_keys_keep_last_value_and_first_position() {
        let tags = Tags::from(vec![
            Tag {
                key: "name".into(),
                value: "a".into(),
            },
            Tag {
                key: "amenity".into(),
                value: "cafe".into(),
            },
            Tag {
                key: "name".into(),
                value: "b".into(),
            },
        ]);
        assert_eq!(
            tags.iter().collect::<Vec<_>>(),
            vec![("name", "b"), ("amenity", "cafe")]
        );
    }

    #[test]
    fn remove_and_contains() {
        let mut tags = Tags::from([("a", "1"), ("b", "2")]);
        assert!(tags.contains_key("a"));
        assert_eq!(tags.remove("a").as_deref(), Some("1"));
        assert!(!tags.contains_key("a"));
        assert_eq!(tags.remove("missing"), None);
    }
}
