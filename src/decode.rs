use crate::depth::Depth;
use crate::entry::{Directive, SaveEntry, SaveItem, ENTRY_TAG};
use crate::errors::{Error, ErrorKind};
use crate::escape::{unescape_bytes, unescape_str};
use crate::registry::TypeRegistry;
use crate::saveable::Loadable;
use crate::value::{
    Value, BOOL_TAG, BYTES_TAG, DICT_TAG, FLOAT_TAG, FUNCTION_TAG, INT_TAG, LIST_TAG, METHOD_TAG,
    NONE_TAG, STR_TAG, TUPLE_TAG,
};

/// Decode a save tree node back into a runtime value.
///
/// The registry is consulted first, so a registered handler may satisfy any
/// tag its [`matches`](crate::SpecialType::matches) accepts, including the
/// built-in ones. Otherwise the node's tag selects the built-in
/// interpretation; a tag that is neither built in nor registered is an
/// [`ErrorKind::UnknownType`] failure rather than a silent default.
///
/// ```
/// use savetree::{decode, encode, TypeRegistry, Value};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = TypeRegistry::new();
/// let original = Value::List(vec![Value::Float(1.5), Value::Float(2.5)]);
/// let node = encode(None, &original, &registry)?;
/// assert_eq!(decode(&node, &registry)?, original);
/// # Ok(())
/// # }
/// ```
pub fn decode(entry: &SaveEntry, registry: &TypeRegistry) -> Result<Value, Error> {
    decode_at(entry, registry, Depth::new())
}

fn decode_at(entry: &SaveEntry, registry: &TypeRegistry, depth: Depth) -> Result<Value, Error> {
    let depth = depth.descend()?;
    if let Some(handler) = registry.lookup_for_decode(&entry.type_tag) {
        return handler.decode(&entry.items, registry);
    }

    match entry.type_tag.as_str() {
        LIST_TAG => Ok(Value::List(decode_elements(entry, registry, depth)?)),
        TUPLE_TAG => Ok(Value::Tuple(decode_elements(entry, registry, depth)?)),
        DICT_TAG => {
            let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(entry.items.len());
            for item in &entry.items {
                let child = expect_entry(item, &entry.type_tag)?;
                let elements = match decode_at(child, registry, depth)? {
                    Value::Tuple(kv) | Value::List(kv) => kv,
                    _ => {
                        return Err(shape(DICT_TAG, "children must decode to key-value pairs"))
                    }
                };
                let mut elements = elements.into_iter();
                let (key, value) = match (elements.next(), elements.next(), elements.next()) {
                    (Some(key), Some(value), None) => (key, value),
                    _ => return Err(shape(DICT_TAG, "pairs must hold exactly two elements")),
                };
                // last write wins, first occurrence keeps its position
                match pairs.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, slot)) => *slot = value,
                    None => pairs.push((key, value)),
                }
            }
            Ok(Value::Dict(pairs))
        }
        BOOL_TAG => {
            let text = expect_leaf(entry)?.trim().to_ascii_lowercase();
            Ok(Value::Bool(text == "true" || text == "1"))
        }
        NONE_TAG => Ok(Value::None),
        ENTRY_TAG => Ok(Value::Entry(SaveEntry {
            type_tag: entry.type_tag.clone(),
            directive: None,
            items: entry.items.clone(),
        })),
        STR_TAG => unescape_str(expect_leaf(entry)?).map(Value::Str),
        BYTES_TAG => unescape_bytes(expect_leaf(entry)?).map(Value::Bytes),
        INT_TAG => {
            let text = expect_leaf(entry)?;
            text.trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| invalid_scalar(INT_TAG, text))
        }
        FLOAT_TAG => {
            let text = expect_leaf(entry)?;
            text.trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| invalid_scalar(FLOAT_TAG, text))
        }
        FUNCTION_TAG | METHOD_TAG => {
            let name = match entry.items.first() {
                Some(SaveItem::Leaf(name)) => name.clone(),
                _ => String::new(),
            };
            Err(Error::new(ErrorKind::Callable { name }))
        }
        other => Err(Error::new(ErrorKind::UnknownType {
            tag: other.to_string(),
        })),
    }
}

fn decode_elements(
    entry: &SaveEntry,
    registry: &TypeRegistry,
    depth: Depth,
) -> Result<Vec<Value>, Error> {
    let mut elements = Vec::with_capacity(entry.items.len());
    for item in &entry.items {
        let child = expect_entry(item, &entry.type_tag)?;
        elements.push(decode_at(child, registry, depth)?);
    }
    Ok(elements)
}

fn expect_entry<'a>(item: &'a SaveItem, tag: &str) -> Result<&'a SaveEntry, Error> {
    match item {
        SaveItem::Entry(child) => Ok(child),
        SaveItem::Leaf(_) => Err(Error::new(ErrorKind::InvalidShape {
            tag: tag.to_string(),
            reason: "children must be nested entries",
        })),
    }
}

fn expect_leaf(entry: &SaveEntry) -> Result<&str, Error> {
    match entry.items.as_slice() {
        [SaveItem::Leaf(text)] => Ok(text),
        _ => Err(shape_owned(
            entry.type_tag.clone(),
            "expected a single leaf payload",
        )),
    }
}

fn shape(tag: &str, reason: &'static str) -> Error {
    shape_owned(tag.to_string(), reason)
}

fn shape_owned(tag: String, reason: &'static str) -> Error {
    Error::new(ErrorKind::InvalidShape { tag, reason })
}

fn invalid_scalar(tag: &str, value: &str) -> Error {
    Error::new(ErrorKind::InvalidScalar {
        tag: tag.to_string(),
        value: value.to_string(),
    })
}

/// Decode each child of `entry` in order and route it into `target` by its
/// directive: assignments go through [`Loadable::assign`], invocations
/// through [`Loadable::invoke`] together with the ambient `ctx` reference.
///
/// This is the default behavior of [`Loadable::load_save_data`]; hosts that
/// intercept specific directives call it (or reimplement its loop) for the
/// ones they do not handle themselves.
pub fn apply<C, T>(
    target: &mut T,
    entry: &SaveEntry,
    registry: &TypeRegistry,
    ctx: &mut C,
) -> Result<(), Error>
where
    T: Loadable<C> + ?Sized,
{
    for item in &entry.items {
        let child = expect_entry(item, &entry.type_tag)?;
        let value = decode(child, registry)?;
        match &child.directive {
            Some(Directive::Assign(field)) => target.assign(field, value, ctx)?,
            Some(Directive::Invoke(method)) => target.invoke(method, value, ctx)?,
            None => {
                return Err(Error::new(ErrorKind::MissingDirective {
                    tag: child.type_tag.clone(),
                }))
            }
        }
    }
    Ok(())
}
