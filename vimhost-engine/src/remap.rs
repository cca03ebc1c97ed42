//! Key remapping: prefix-aware lookup with recursive expansion and cycle
//! detection.

use std::collections::HashMap;
use vimhost_core::keys::{KeyInputSet, KeyRemapMode};

/// Expansion depth cap, matching Vim's `maxmapdepth` default. Hitting it is
/// reported as a recursive mapping.
pub const MAX_MAP_DEPTH: usize = 1000;

/// Outcome of resolving a key sequence against the map table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMappingResult {
    /// No entry is involved; the sequence stands as typed.
    NoMapping,
    /// The sequence is a proper prefix of at least one entry.
    NeedsMoreInput,
    /// The sequence resolved to this replacement.
    Mapped(KeyInputSet),
    /// Expansion cycled or exceeded the depth cap.
    Recursive,
}

/// The lookup contract the input engine needs.
pub trait KeyMapping {
    fn get_key_mapping(&self, keys: &KeyInputSet, mode: KeyRemapMode) -> KeyMappingResult;
}

/// One mapping entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapEntry {
    pub rhs: KeyInputSet,
    /// False for `noremap`-style entries whose replacement is taken literally.
    pub allow_remap: bool,
}

/// An in-memory key-map table, one map per remap mode.
///
/// This is the mutation surface an interpreter of the map-family commands
/// drives: `MapKeys` adds, `UnmapKeys` removes, `ClearKeyMap` clears.
pub struct KeyMapTable {
    maps: HashMap<KeyRemapMode, HashMap<KeyInputSet, KeyMapEntry>>,
}

impl KeyMapTable {
    pub fn new() -> Self {
        Self {
            maps: HashMap::new(),
        }
    }

    pub fn add(&mut self, mode: KeyRemapMode, left: KeyInputSet, right: KeyInputSet, allow_remap: bool) {
        log::debug!("map {:?}: {} -> {}", mode, left, right);
        self.maps.entry(mode).or_default().insert(
            left,
            KeyMapEntry {
                rhs: right,
                allow_remap,
            },
        );
    }

    pub fn remove(&mut self, mode: KeyRemapMode, left: &KeyInputSet) -> bool {
        self.maps
            .get_mut(&mode)
            .map(|entries| entries.remove(left).is_some())
            .unwrap_or(false)
    }

    pub fn clear(&mut self, mode: KeyRemapMode) {
        if let Some(entries) = self.maps.get_mut(&mode) {
            entries.clear();
        }
    }

    pub fn get(&self, mode: KeyRemapMode, left: &KeyInputSet) -> Option<&KeyMapEntry> {
        self.maps.get(&mode)?.get(left)
    }

    pub fn mappings(
        &self,
        mode: KeyRemapMode,
    ) -> impl Iterator<Item = (&KeyInputSet, &KeyMapEntry)> {
        self.maps.get(&mode).into_iter().flatten()
    }

    fn resolve(&self, keys: &KeyInputSet, mode: KeyRemapMode, depth: usize) -> KeyMappingResult {
        if depth >= MAX_MAP_DEPTH {
            return KeyMappingResult::Recursive;
        }

        let Some(entries) = self.maps.get(&mode) else {
            return KeyMappingResult::NoMapping;
        };

        if let Some(entry) = entries.get(keys) {
            if !entry.allow_remap {
                return KeyMappingResult::Mapped(entry.rhs.clone());
            }
            // The replacement is itself subject to mapping.
            return match self.resolve(&entry.rhs, mode, depth + 1) {
                KeyMappingResult::Mapped(expanded) => KeyMappingResult::Mapped(expanded),
                KeyMappingResult::Recursive => KeyMappingResult::Recursive,
                KeyMappingResult::NoMapping | KeyMappingResult::NeedsMoreInput => {
                    KeyMappingResult::Mapped(entry.rhs.clone())
                }
            };
        }

        if entries
            .keys()
            .any(|candidate| candidate.len() > keys.len() && candidate.starts_with(keys))
        {
            return KeyMappingResult::NeedsMoreInput;
        }

        KeyMappingResult::NoMapping
    }
}

impl KeyMapping for KeyMapTable {
    fn get_key_mapping(&self, keys: &KeyInputSet, mode: KeyRemapMode) -> KeyMappingResult {
        self.resolve(keys, mode, 0)
    }
}

impl Default for KeyMapTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vimhost_core::keys::notation::parse_key_notation;

    fn keys(text: &str) -> KeyInputSet {
        parse_key_notation(text).unwrap()
    }

    #[test]
    fn test_no_mapping_for_unmapped_key() {
        let table = KeyMapTable::new();
        assert_eq!(
            table.get_key_mapping(&keys("x"), KeyRemapMode::Normal),
            KeyMappingResult::NoMapping
        );
    }

    #[test]
    fn test_exact_match_expands() {
        let mut table = KeyMapTable::new();
        table.add(KeyRemapMode::Normal, keys("gg"), keys("G"), true);
        assert_eq!(
            table.get_key_mapping(&keys("gg"), KeyRemapMode::Normal),
            KeyMappingResult::Mapped(keys("G"))
        );
    }

    #[test]
    fn test_prefix_needs_more_input() {
        let mut table = KeyMapTable::new();
        table.add(KeyRemapMode::Normal, keys("gg"), keys("G"), true);
        assert_eq!(
            table.get_key_mapping(&keys("g"), KeyRemapMode::Normal),
            KeyMappingResult::NeedsMoreInput
        );
    }

    #[test]
    fn test_mapping_is_per_mode() {
        let mut table = KeyMapTable::new();
        table.add(KeyRemapMode::Insert, keys("jk"), keys("<Esc>"), true);
        assert_eq!(
            table.get_key_mapping(&keys("jk"), KeyRemapMode::Normal),
            KeyMappingResult::NoMapping
        );
        assert_eq!(
            table.get_key_mapping(&keys("jk"), KeyRemapMode::Insert),
            KeyMappingResult::Mapped(keys("<Esc>"))
        );
    }

    #[test]
    fn test_recursive_expansion_follows_chain() {
        let mut table = KeyMapTable::new();
        table.add(KeyRemapMode::Normal, keys("a"), keys("b"), true);
        table.add(KeyRemapMode::Normal, keys("b"), keys("c"), true);
        assert_eq!(
            table.get_key_mapping(&keys("a"), KeyRemapMode::Normal),
            KeyMappingResult::Mapped(keys("c"))
        );
    }

    #[test]
    fn test_noremap_stops_expansion() {
        let mut table = KeyMapTable::new();
        table.add(KeyRemapMode::Normal, keys("a"), keys("b"), false);
        table.add(KeyRemapMode::Normal, keys("b"), keys("c"), true);
        assert_eq!(
            table.get_key_mapping(&keys("a"), KeyRemapMode::Normal),
            KeyMappingResult::Mapped(keys("b"))
        );
    }

    #[test]
    fn test_cycle_is_recursive() {
        let mut table = KeyMapTable::new();
        table.add(KeyRemapMode::Normal, keys("ab"), keys("bc"), true);
        table.add(KeyRemapMode::Normal, keys("bc"), keys("ab"), true);
        assert_eq!(
            table.get_key_mapping(&keys("ab"), KeyRemapMode::Normal),
            KeyMappingResult::Recursive
        );
    }

    #[test]
    fn test_self_mapping_is_recursive() {
        let mut table = KeyMapTable::new();
        table.add(KeyRemapMode::Normal, keys("g"), keys("g"), true);
        assert_eq!(
            table.get_key_mapping(&keys("g"), KeyRemapMode::Normal),
            KeyMappingResult::Recursive
        );
    }

    #[test]
    fn test_remove_and_clear() {
        let mut table = KeyMapTable::new();
        table.add(KeyRemapMode::Normal, keys("gg"), keys("G"), true);
        assert!(table.remove(KeyRemapMode::Normal, &keys("gg")));
        assert!(!table.remove(KeyRemapMode::Normal, &keys("gg")));

        table.add(KeyRemapMode::Normal, keys("x"), keys("y"), true);
        table.clear(KeyRemapMode::Normal);
        assert_eq!(
            table.get_key_mapping(&keys("x"), KeyRemapMode::Normal),
            KeyMappingResult::NoMapping
        );
    }

    #[test]
    fn test_exact_match_wins_over_longer_candidates() {
        let mut table = KeyMapTable::new();
        table.add(KeyRemapMode::Normal, keys("g"), keys("G"), false);
        table.add(KeyRemapMode::Normal, keys("gg"), keys("x"), false);
        assert_eq!(
            table.get_key_mapping(&keys("g"), KeyRemapMode::Normal),
            KeyMappingResult::Mapped(keys("G"))
        );
    }
}
