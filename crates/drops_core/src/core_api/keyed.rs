use indexmap::IndexMap;

/// String-keyed map that keeps the key order of the document it was read from.
///
/// Catalog documents are JSON objects whose key order decides which of two
/// same-named activities is shown, so iteration must follow insertion order.
/// A repeated key keeps its first position and takes the last value.
pub type KeyedMap<T> = IndexMap<String, T>;
