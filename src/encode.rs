use crate::depth::Depth;
use crate::entry::{Directive, SaveEntry, SaveItem};
use crate::errors::{Error, ErrorKind};
use crate::escape::{escape_bytes, escape_str};
use crate::registry::TypeRegistry;
use crate::value::{
    Value, BOOL_TAG, BYTES_TAG, DICT_TAG, FLOAT_TAG, INT_TAG, LIST_TAG, NONE_TAG, STR_TAG,
    TUPLE_TAG,
};

/// Encode a runtime value as a save tree node.
///
/// The produced node is tagged with the value's concrete runtime type name
/// (or the container tag for lists, tuples, and dicts) and carries `directive`
/// so a loader knows how to apply it. Pure data nested inside containers
/// carries no directive of its own.
///
/// Host types wrapped in [`Value::Custom`] are reduced through their
/// registered [`SpecialType`](crate::SpecialType) hooks; unregistered custom
/// values fall back to an opaque stringified leaf whose tag will fail loudly
/// at decode time. Encoding a [`Value::Callable`] is rejected outright.
///
/// ```
/// use savetree::{encode, Directive, SaveItem, TypeRegistry, Value};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = TypeRegistry::new();
/// let node = encode(
///     Some(Directive::assign("keys")),
///     &Value::List(vec![Value::Int(3), Value::Int(7)]),
///     &registry,
/// )?;
/// assert_eq!(node.type_tag, "list");
/// assert_eq!(node.items.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn encode(
    directive: Option<Directive>,
    value: &Value,
    registry: &TypeRegistry,
) -> Result<SaveEntry, Error> {
    encode_at(directive, value, registry, Depth::new())
}

fn encode_at(
    directive: Option<Directive>,
    value: &Value,
    registry: &TypeRegistry,
    depth: Depth,
) -> Result<SaveEntry, Error> {
    let depth = depth.descend()?;
    let entry = match value {
        Value::Entry(inner) => SaveEntry {
            type_tag: inner.type_tag.clone(),
            directive,
            items: inner.items.clone(),
        },
        Value::Dict(pairs) => {
            let mut items = Vec::with_capacity(pairs.len());
            for (key, val) in pairs {
                let pair = SaveEntry {
                    type_tag: TUPLE_TAG.to_string(),
                    directive: None,
                    items: vec![
                        SaveItem::Entry(encode_at(None, key, registry, depth)?),
                        SaveItem::Entry(encode_at(None, val, registry, depth)?),
                    ],
                };
                items.push(SaveItem::Entry(pair));
            }
            SaveEntry {
                type_tag: DICT_TAG.to_string(),
                directive,
                items,
            }
        }
        Value::List(elements) | Value::Tuple(elements) => {
            let tag = match value {
                Value::List(_) => LIST_TAG,
                _ => TUPLE_TAG,
            };
            let mut items = Vec::with_capacity(elements.len());
            for element in elements {
                items.push(SaveItem::Entry(encode_at(None, element, registry, depth)?));
            }
            SaveEntry {
                type_tag: tag.to_string(),
                directive,
                items,
            }
        }
        Value::Callable(name) => {
            return Err(Error::new(ErrorKind::Callable { name: name.clone() }))
        }
        Value::Custom(custom) => match registry.lookup_for_encode(custom.as_any()) {
            Some(handler) => {
                let repr = handler.encode(custom.as_any())?;
                SaveEntry {
                    type_tag: custom.type_name().to_string(),
                    directive,
                    items: vec![SaveItem::Entry(encode_at(None, &repr, registry, depth)?)],
                }
            }
            // deferred failure: the tag survives, so decoding it errors
            // instead of encoding
            None => leaf(
                custom.type_name(),
                directive,
                escape_str(&custom.debug_repr()),
            ),
        },
        Value::None => leaf(NONE_TAG, directive, NONE_TAG.to_string()),
        Value::Bool(b) => leaf(BOOL_TAG, directive, b.to_string()),
        Value::Int(i) => leaf(INT_TAG, directive, i.to_string()),
        Value::Float(x) => leaf(FLOAT_TAG, directive, x.to_string()),
        Value::Str(s) => leaf(STR_TAG, directive, escape_str(s)),
        Value::Bytes(b) => leaf(BYTES_TAG, directive, escape_bytes(b)),
    };
    Ok(entry)
}

fn leaf(type_tag: &str, directive: Option<Directive>, text: String) -> SaveEntry {
    SaveEntry {
        type_tag: type_tag.to_string(),
        directive,
        items: vec![SaveItem::Leaf(text)],
    }
}
