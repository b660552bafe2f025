use crate::encode::encode;
use crate::errors::Error;
use crate::registry::TypeRegistry;
use crate::value::Value;

/// Tag carried by opaque tree nodes: records that intentionally store nested
/// items without flattening them into a runtime value. Decoding a node with
/// this tag rewraps its children into a fresh [`SaveEntry`] instead of
/// interpreting them.
pub const ENTRY_TAG: &str = "entry";

/// One node of a save tree.
///
/// An entry records the type of the value it describes, an optional
/// [`Directive`] telling the loader how to apply the value to its target, and
/// an ordered list of child items. Child order is significant: it encodes
/// list order, dict key/value pairing, and the field order of records.
///
/// ```
/// use savetree::{SaveEntry, TypeRegistry};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = TypeRegistry::new();
/// let mut record = SaveEntry::new("Player");
/// record.add_assign("health", 20i64, &registry)?;
/// record.add_assign("name", "Ida", &registry)?;
/// assert_eq!(record.items.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaveEntry {
    /// How the decoder should reconstruct this node's value
    pub type_tag: String,

    /// How the loader should apply the reconstructed value; `None` on the
    /// root and on pure data (container elements, pair nodes)
    pub directive: Option<Directive>,

    /// Ordered child items
    pub items: Vec<SaveItem>,
}

/// A single child of a [`SaveEntry`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SaveItem {
    /// Raw text payload: the textual encoding of a primitive
    Leaf(String),

    /// A nested tree node
    Entry(SaveEntry),
}

/// Tells the loader how to apply a decoded value to its target
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Directive {
    /// Set the named field to the decoded value
    Assign(String),

    /// Call the named handler with the decoded value and the load context
    Invoke(String),
}

impl Directive {
    pub fn assign<T: Into<String>>(name: T) -> Directive {
        Directive::Assign(name.into())
    }

    pub fn invoke<T: Into<String>>(name: T) -> Directive {
        Directive::Invoke(name.into())
    }

    /// The field or handler name this directive targets
    pub fn name(&self) -> &str {
        match self {
            Directive::Assign(name) => name,
            Directive::Invoke(name) => name,
        }
    }

    /// Wire form: assignments keep the original trailing `=` convention,
    /// invocations are the bare handler name.
    pub(crate) fn to_wire(&self) -> String {
        match self {
            Directive::Assign(name) => format!("{} =", name),
            Directive::Invoke(name) => name.clone(),
        }
    }

    /// Inverse of [`Directive::to_wire`]; an empty line means no directive.
    pub(crate) fn from_wire(line: &str) -> Option<Directive> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        match trimmed.strip_suffix('=') {
            Some(name) => Some(Directive::Assign(name.trim_end().to_string())),
            None => Some(Directive::Invoke(trimmed.to_string())),
        }
    }
}

impl SaveEntry {
    /// Create an empty entry with the given type tag and no directive
    pub fn new<T: Into<String>>(type_tag: T) -> SaveEntry {
        SaveEntry {
            type_tag: type_tag.into(),
            directive: None,
            items: Vec::new(),
        }
    }

    /// Create an empty opaque entry (tagged [`ENTRY_TAG`]). Useful for
    /// records whose children should survive decoding uninterpreted.
    pub fn opaque() -> SaveEntry {
        SaveEntry::new(ENTRY_TAG)
    }

    /// Encode `value` and append it as a field assignment
    pub fn add_assign<V: Into<Value>>(
        &mut self,
        field: &str,
        value: V,
        registry: &TypeRegistry,
    ) -> Result<(), Error> {
        let child = encode(Some(Directive::assign(field)), &value.into(), registry)?;
        self.items.push(SaveItem::Entry(child));
        Ok(())
    }

    /// Encode `value` and append it as a handler invocation
    pub fn add_invoke<V: Into<Value>>(
        &mut self,
        method: &str,
        value: V,
        registry: &TypeRegistry,
    ) -> Result<(), Error> {
        let child = encode(Some(Directive::invoke(method)), &value.into(), registry)?;
        self.items.push(SaveItem::Entry(child));
        Ok(())
    }

    /// Encode `value` and splice it in as a field assignment at `index`
    pub fn insert_assign<V: Into<Value>>(
        &mut self,
        index: usize,
        field: &str,
        value: V,
        registry: &TypeRegistry,
    ) -> Result<(), Error> {
        let child = encode(Some(Directive::assign(field)), &value.into(), registry)?;
        self.items.insert(index, SaveItem::Entry(child));
        Ok(())
    }
}

impl Default for SaveEntry {
    fn default() -> Self {
        SaveEntry::opaque()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case("health =", Some(Directive::assign("health")))]
    #[case("health = ", Some(Directive::assign("health")))]
    #[case("testInt  =", Some(Directive::assign("testInt")))]
    #[case("addEnemy", Some(Directive::invoke("addEnemy")))]
    #[case(" addEnemy ", Some(Directive::invoke("addEnemy")))]
    fn test_directive_from_wire(#[case] line: &str, #[case] expected: Option<Directive>) {
        assert_eq!(Directive::from_wire(line), expected);
    }

    #[test]
    fn test_directive_wire_roundtrip() {
        for directive in [Directive::assign("health"), Directive::invoke("addEnemy")] {
            assert_eq!(
                Directive::from_wire(&directive.to_wire()),
                Some(directive.clone())
            );
        }
    }

    #[test]
    fn test_default_is_opaque() {
        let entry = SaveEntry::default();
        assert_eq!(entry.type_tag, ENTRY_TAG);
        assert_eq!(entry.directive, None);
        assert!(entry.items.is_empty());
    }

    #[test]
    fn test_insert_assign_position() {
        let registry = TypeRegistry::new();
        let mut entry = SaveEntry::new("Player");
        entry.add_assign("first", 1i64, &registry).unwrap();
        entry.add_assign("third", 3i64, &registry).unwrap();
        entry.insert_assign(1, "second", 2i64, &registry).unwrap();

        let names: Vec<&str> = entry
            .items
            .iter()
            .filter_map(|item| match item {
                SaveItem::Entry(child) => child.directive.as_ref().map(|d| d.name()),
                SaveItem::Leaf(_) => None,
            })
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
