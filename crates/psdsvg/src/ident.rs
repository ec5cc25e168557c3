//! Path-like node identifiers.

use std::fmt;

/// Identifier of a node, derived from its position in the source tree.
///
/// The root is `0`; each level appends `_{child index}`. Identifiers are
/// unique within a document and stable for a given tree, so they double
/// as element ids and resource file stems.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Identifier of the document root
    pub fn root() -> Self {
        Identifier("0".to_string())
    }

    /// Identifier of the child at `index` (counted over all source children)
    pub fn child(&self, index: usize) -> Self {
        Identifier(format!("{}_{}", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Element id, e.g. `p0_1_2`
    pub fn element_id(&self) -> String {
        format!("p{}", self.0)
    }

    /// Resource file name, e.g. `0_1_2.png`
    pub fn resource_file_name(&self) -> String {
        format!("{}.png", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_identifier() {
        assert_eq!(Identifier::root().as_str(), "0");
    }

    #[test]
    fn test_child_identifiers() {
        let id = Identifier::root().child(1).child(0);
        assert_eq!(id.as_str(), "0_1_0");
        assert_eq!(id.element_id(), "p0_1_0");
        assert_eq!(id.resource_file_name(), "0_1_0.png");
        assert_eq!(id.to_string(), "0_1_0");
    }
}
