//! The component type list shared by the loader and the finalizer.
//!
//! Binary entity definitions identify each component by a dense wire index
//! (the position of its schema name in the list the application supplies).
//! [`TypeList`] maps that index to a [`DefType`] while loading and scans back
//! from a [`DefType`] to its index while finalizing.

use engine_component::DefType;

/// Ordered list of component schema tags, indexed by wire index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeList {
    types: Vec<DefType>,
}

impl TypeList {
    /// Create an empty type list.
    #[must_use]
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Build the list from schema names. The nth name becomes wire index n.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            types: names
                .into_iter()
                .map(|name| DefType::from_name(name.as_ref()))
                .collect(),
        }
    }

    /// The tag at `index`, or `None` for an out-of-range index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<DefType> {
        self.types.get(index).copied()
    }

    /// The wire index of `def_type`, or `None` if it was never listed.
    #[must_use]
    pub fn index_of(&self, def_type: DefType) -> Option<usize> {
        self.types.iter().position(|&t| t == def_type)
    }

    /// Number of listed types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
