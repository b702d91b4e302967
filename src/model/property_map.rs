//! PropertyMap: the key-value store on nodes and relationships.

use super::Value;

/// A map of property names to values.
pub type PropertyMap = hashbrown::HashMap<String, Value>;

/// Build a PropertyMap from `(key, value)` pairs.
pub fn props<K, V, I>(pairs: I) -> PropertyMap
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// True when every entry of `pattern` is present in `props` with an equal value.
///
/// This is the matching rule for `{key: value}` node patterns: extra
/// properties on the node are ignored.
pub fn contains_all(props: &PropertyMap, pattern: &PropertyMap) -> bool {
    pattern.iter().all(|(k, v)| props.get(k) == Some(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_subset_matches() {
        let node = props([("city", "Lviv"), ("street", "Shevchenka"), ("house", "5")]);
        assert!(contains_all(&node, &props([("city", "Lviv")])));
        assert!(contains_all(&node, &PropertyMap::new()));
        assert!(!contains_all(&node, &props([("city", "Odesa")])));
        assert!(!contains_all(&node, &props([("zip", "79000")])));
    }
}
