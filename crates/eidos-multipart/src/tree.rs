//! Nested, insertion-ordered form values.
//!
//! The same [`FormTree`] holds scalar fields (`FormTree<String>`) and uploaded
//! files (`FormTree<UploadedFile>`), so both follow one placement algorithm.
//!
//! [`UploadedFile`]: crate::UploadedFile

use indexmap::IndexMap;
use serde::Serialize;

use crate::{FieldPath, Segment};

/// A node in a [`FormTree`]: a value or a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormNode<T> {
    /// A materialized value.
    Leaf(T),
    /// A nested mapping, e.g. `user` in `user[name]`.
    Map(FormTree<T>),
}

impl<T> FormNode<T> {
    /// Returns the value if this is a leaf.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Map(_) => None,
        }
    }

    /// Returns the nested mapping if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&FormTree<T>> {
        match self {
            Self::Map(map) => Some(map),
            Self::Leaf(_) => None,
        }
    }

    /// Looks up a direct child by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Returns the leaf values directly under this node, in insertion order.
    ///
    /// For `tags[]=x` followed by `tags[]=y`, the `tags` node yields `x`, `y`.
    /// A leaf yields itself.
    #[must_use]
    pub fn values(&self) -> Vec<&T> {
        match self {
            Self::Leaf(value) => vec![value],
            Self::Map(map) => map.iter().filter_map(|(_, node)| node.as_leaf()).collect(),
        }
    }

    fn ensure_map(&mut self) -> &mut FormTree<T> {
        if matches!(self, Self::Leaf(_)) {
            *self = Self::Map(FormTree::new());
        }
        match self {
            Self::Map(map) => map,
            Self::Leaf(_) => unreachable!("leaf was replaced by a map"),
        }
    }
}

/// Insertion-ordered mapping from keys to [`FormNode`]s.
///
/// # Example
///
/// ```rust
/// use eidos_multipart::{FieldPath, FormTree};
///
/// let mut tree = FormTree::new();
/// tree.insert(&FieldPath::parse("user[name]").unwrap(), "Alice".to_string());
/// tree.insert(&FieldPath::parse("user[age]").unwrap(), "30".to_string());
///
/// let user = tree.get("user").unwrap();
/// assert_eq!(user.get("name").and_then(|n| n.as_leaf()).unwrap(), "Alice");
/// assert_eq!(user.get("age").and_then(|n| n.as_leaf()).unwrap(), "30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormTree<T> {
    entries: IndexMap<String, FormNode<T>>,
}

impl<T> Default for FormTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FormTree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Places `value` at `path`, creating intermediate maps as needed.
    ///
    /// Existing siblings are never touched. A leaf standing where a map is
    /// needed is replaced by a map, and a repeated leaf path overwrites the
    /// earlier value in place.
    pub fn insert(&mut self, path: &FieldPath, value: T) {
        let mut map = self;
        let mut key = path.base().to_string();

        for segment in path.segments() {
            map = map
                .entries
                .entry(key)
                .or_insert_with(|| FormNode::Map(FormTree::new()))
                .ensure_map();
            key = match segment {
                Segment::Key(k) => k.clone(),
                Segment::Append => map.next_index().to_string(),
            };
        }

        map.entries.insert(key, FormNode::Leaf(value));
    }

    /// Looks up a top-level entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FormNode<T>> {
        self.entries.get(key)
    }

    /// Follows `keys` through nested maps.
    ///
    /// ```rust
    /// use eidos_multipart::{FieldPath, FormTree};
    ///
    /// let mut tree = FormTree::new();
    /// tree.insert(&FieldPath::parse("a[b][c]").unwrap(), 1);
    /// assert_eq!(tree.get_path(&["a", "b", "c"]).and_then(|n| n.as_leaf()), Some(&1));
    /// assert!(tree.get_path(&["a", "x"]).is_none());
    /// ```
    #[must_use]
    pub fn get_path(&self, keys: &[&str]) -> Option<&FormNode<T>> {
        let (first, rest) = keys.split_first()?;
        rest.iter()
            .try_fold(self.get(first)?, |node, key| node.get(key))
    }

    /// Iterates over top-level entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormNode<T>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over every leaf with its key path, depth first.
    #[must_use]
    pub fn leaves(&self) -> Vec<(Vec<&str>, &T)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    /// Returns the number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn collect_leaves<'a>(&'a self, prefix: &mut Vec<&'a str>, out: &mut Vec<(Vec<&'a str>, &'a T)>) {
        for (key, node) in &self.entries {
            prefix.push(key);
            match node {
                FormNode::Leaf(value) => out.push((prefix.clone(), value)),
                FormNode::Map(map) => map.collect_leaves(prefix, out),
            }
            prefix.pop();
        }
    }

    // One past the largest non-negative integer key, or 0.
    fn next_index(&self) -> u64 {
        self.entries
            .keys()
            .filter_map(|key| integer_key(key))
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }
}

// Canonical decimal only: "05" and "+5" stay string keys.
fn integer_key(key: &str) -> Option<u64> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(name: &str) -> FieldPath {
        FieldPath::parse(name).unwrap()
    }

    fn leaf<'a>(tree: &'a FormTree<&'static str>, keys: &[&str]) -> Option<&'a str> {
        tree.get_path(keys).and_then(FormNode::as_leaf).copied()
    }

    #[test]
    fn test_flat_insert() {
        let mut tree = FormTree::new();
        tree.insert(&path("a"), "1");
        tree.insert(&path("b"), "2");

        assert_eq!(tree.len(), 2);
        assert_eq!(leaf(&tree, &["a"]), Some("1"));
        assert_eq!(leaf(&tree, &["b"]), Some("2"));
    }

    #[test]
    fn test_nested_merge_keeps_siblings() {
        let mut tree = FormTree::new();
        tree.insert(&path("user[name]"), "Alice");
        tree.insert(&path("user[address][city]"), "Paris");
        tree.insert(&path("user[address][zip]"), "75001");
        tree.insert(&path("user[age]"), "30");

        assert_eq!(tree.len(), 1);
        let user = tree.get("user").and_then(FormNode::as_map).unwrap();
        assert_eq!(user.len(), 3);
        assert_eq!(leaf(&tree, &["user", "name"]), Some("Alice"));
        assert_eq!(leaf(&tree, &["user", "address", "city"]), Some("Paris"));
        assert_eq!(leaf(&tree, &["user", "address", "zip"]), Some("75001"));
        assert_eq!(leaf(&tree, &["user", "age"]), Some("30"));
    }

    #[test]
    fn test_append_builds_list_in_order() {
        let mut tree = FormTree::new();
        tree.insert(&path("tags[]"), "x");
        tree.insert(&path("tags[]"), "y");
        tree.insert(&path("tags[]"), "z");

        let tags = tree.get("tags").unwrap();
        assert_eq!(tags.values(), vec![&"x", &"y", &"z"]);
        assert_eq!(leaf(&tree, &["tags", "0"]), Some("x"));
        assert_eq!(leaf(&tree, &["tags", "2"]), Some("z"));
    }

    #[test]
    fn test_append_after_explicit_index() {
        let mut tree = FormTree::new();
        tree.insert(&path("list[5]"), "five");
        tree.insert(&path("list[name]"), "named");
        tree.insert(&path("list[]"), "six");

        assert_eq!(leaf(&tree, &["list", "6"]), Some("six"));
    }

    #[test]
    fn test_indexed_siblings_coexist() {
        let mut tree = FormTree::new();
        tree.insert(&path("photos[0]"), "a.png");
        tree.insert(&path("photos[1]"), "b.png");

        assert_eq!(tree.get("photos").unwrap().values(), vec![&"a.png", &"b.png"]);
    }

    #[test]
    fn test_nested_append() {
        let mut tree = FormTree::new();
        tree.insert(&path("items[][name]"), "first");
        tree.insert(&path("items[][name]"), "second");

        assert_eq!(leaf(&tree, &["items", "0", "name"]), Some("first"));
        assert_eq!(leaf(&tree, &["items", "1", "name"]), Some("second"));
    }

    #[test]
    fn test_repeated_scalar_last_wins() {
        let mut tree = FormTree::new();
        tree.insert(&path("a"), "1");
        tree.insert(&path("b"), "2");
        tree.insert(&path("a"), "3");

        assert_eq!(leaf(&tree, &["a"]), Some("3"));
        let keys: Vec<_> = tree.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_map_replaces_leaf() {
        let mut tree = FormTree::new();
        tree.insert(&path("a"), "scalar");
        tree.insert(&path("a[b]"), "nested");

        assert_eq!(leaf(&tree, &["a", "b"]), Some("nested"));
    }

    #[test]
    fn test_leaves_in_order() {
        let mut tree = FormTree::new();
        tree.insert(&path("a[x]"), "1");
        tree.insert(&path("b"), "2");
        tree.insert(&path("a[y]"), "3");

        let leaves: Vec<_> = tree
            .leaves()
            .into_iter()
            .map(|(keys, v)| (keys.join("."), *v))
            .collect();
        assert_eq!(
            leaves,
            vec![
                ("a.x".to_string(), "1"),
                ("a.y".to_string(), "3"),
                ("b".to_string(), "2"),
            ]
        );
    }

    #[test]
    fn test_integer_key() {
        assert_eq!(integer_key("0"), Some(0));
        assert_eq!(integer_key("42"), Some(42));
        assert_eq!(integer_key("05"), None);
        assert_eq!(integer_key("-1"), None);
        assert_eq!(integer_key(""), None);
        assert_eq!(integer_key("a"), None);
    }

    #[test]
    fn test_serializes_as_nested_objects() {
        let mut tree = FormTree::new();
        tree.insert(&path("user[name]"), "Alice");
        tree.insert(&path("tags[]"), "x");

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"user": {"name": "Alice"}, "tags": {"0": "x"}})
        );
    }
}
