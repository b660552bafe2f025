use crate::entry::SaveItem;
use crate::errors::Error;
use crate::value::Value;
use std::any::{Any, TypeId};

/// Encode and decode hooks for one host type.
///
/// A special type is how a host opts a value shape the engine has no built-in
/// handling for (vectors, colors, handles) into serialization. The
/// [`encode`](SpecialType::encode) hook reduces the host value to a
/// [`Value`] the engine already understands; the
/// [`decode`](SpecialType::decode) hook rebuilds the host value from the
/// recorded items.
///
/// [`matches`](SpecialType::matches) is consulted during decode dispatch and
/// defaults to exact tag equality. Override it to let one handler satisfy a
/// family of recorded tags, typically subclasses the engine has never heard
/// of:
///
/// ```
/// use savetree::{Error, SaveItem, SpecialType, TypeRegistry, Value};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Vec3(f64, f64, f64);
///
/// struct Vec3Type;
///
/// impl SpecialType for Vec3Type {
///     fn type_tag(&self) -> &str {
///         "Vec3"
///     }
///
///     fn matches(&self, type_tag: &str) -> bool {
///         matches!(type_tag, "Vec3" | "Point3" | "LVector3f")
///     }
///
///     fn encode(&self, value: &dyn std::any::Any) -> Result<Value, Error> {
///         let v = value
///             .downcast_ref::<Vec3>()
///             .ok_or_else(|| Error::message("expected a Vec3"))?;
///         Ok(Value::Tuple(vec![
///             Value::Float(v.0),
///             Value::Float(v.1),
///             Value::Float(v.2),
///         ]))
///     }
///
///     fn decode(&self, items: &[SaveItem], registry: &TypeRegistry) -> Result<Value, Error> {
///         let entry = match items {
///             [SaveItem::Entry(entry)] => entry,
///             _ => return Err(Error::message("expected a single nested tuple")),
///         };
///         let components = savetree::decode(entry, registry)?;
///         match components.as_slice() {
///             Some([x, y, z]) => Ok(Value::custom(Vec3(
///                 x.as_float().unwrap_or_default(),
///                 y.as_float().unwrap_or_default(),
///                 z.as_float().unwrap_or_default(),
///             ))),
///             _ => Err(Error::message("expected three components")),
///         }
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Vec3>(Vec3Type);
/// assert!(registry.lookup_for_decode("Point3").is_some());
/// ```
pub trait SpecialType {
    /// Tag recorded on nodes produced by this handler
    fn type_tag(&self) -> &str;

    /// Whether a recorded tag should be restored through this handler.
    /// Registration order decides priority when several handlers match.
    fn matches(&self, type_tag: &str) -> bool {
        type_tag == self.type_tag()
    }

    /// Build the saveable representation of `value`. The engine guarantees
    /// `value` downcasts to the type this handler was registered for.
    fn encode(&self, value: &dyn Any) -> Result<Value, Error>;

    /// Rebuild a value from the items recorded under this handler's tag
    fn decode(&self, items: &[SaveItem], registry: &TypeRegistry) -> Result<Value, Error>;
}

struct RegistryEntry {
    type_id: TypeId,
    handler: Box<dyn SpecialType>,
}

/// A caller-owned table of [`SpecialType`] handlers.
///
/// The registry is consulted by the encoder (exact runtime type match) and
/// the decoder (first handler whose [`SpecialType::matches`] accepts the
/// recorded tag, in registration order). Hosts build one during bootstrap,
/// pass it by reference into every encode/decode call, and drop it at
/// teardown.
#[derive(Default)]
pub struct TypeRegistry {
    entries: Vec<RegistryEntry>,
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry {
            entries: Vec::new(),
        }
    }

    /// Install `handler` for values of type `T`. Re-registering a type
    /// replaces its handler in place, keeping the original priority
    /// position; the last registration wins.
    pub fn register<T: Any>(&mut self, handler: impl SpecialType + 'static) {
        let entry = RegistryEntry {
            type_id: TypeId::of::<T>(),
            handler: Box::new(handler),
        };
        match self.entries.iter_mut().find(|e| e.type_id == entry.type_id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Closure-based registration for hosts that do not need a custom
    /// [`SpecialType::matches`]
    ///
    /// ```
    /// use savetree::{SaveItem, TypeRegistry, Value};
    ///
    /// #[derive(Debug, Clone, Copy)]
    /// struct Health(i64);
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register_fns::<Health, _, _>(
    ///     "Health",
    ///     |items: &[SaveItem], registry: &TypeRegistry| match items {
    ///         [SaveItem::Entry(entry)] => {
    ///             let raw = savetree::decode(entry, registry)?;
    ///             Ok(Value::custom(Health(raw.as_int().unwrap_or(0))))
    ///         }
    ///         _ => Err(savetree::Error::message("expected one item")),
    ///     },
    ///     |health: &Health| Value::Int(health.0),
    /// );
    /// assert!(registry.lookup_for_decode("Health").is_some());
    /// ```
    pub fn register_fns<T, D, E>(&mut self, type_tag: impl Into<String>, decode_fn: D, encode_fn: E)
    where
        T: Any,
        D: Fn(&[SaveItem], &TypeRegistry) -> Result<Value, Error> + 'static,
        E: Fn(&T) -> Value + 'static,
    {
        let encode_fn = Box::new(move |value: &dyn Any| match value.downcast_ref::<T>() {
            Some(v) => Ok(encode_fn(v)),
            None => Err(Error::message("encode hook received a mismatched type")),
        });
        self.register::<T>(FnSpecialType {
            type_tag: type_tag.into(),
            decode_fn,
            encode_fn,
        });
    }

    /// Find the handler whose registered type is exactly `value`'s runtime
    /// type. Encoding never needs subclass awareness: the concrete type is
    /// in hand.
    pub fn lookup_for_encode(&self, value: &dyn Any) -> Option<&dyn SpecialType> {
        let type_id = value.type_id();
        self.entries
            .iter()
            .find(|e| e.type_id == type_id)
            .map(|e| e.handler.as_ref())
    }

    /// Find the first handler, in registration order, that accepts the
    /// recorded tag
    pub fn lookup_for_decode(&self, type_tag: &str) -> Option<&dyn SpecialType> {
        self.entries
            .iter()
            .find(|e| e.handler.matches(type_tag))
            .map(|e| e.handler.as_ref())
    }

    /// Drop every handler. In-flight trees are unaffected; they simply stop
    /// resolving special tags.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct FnSpecialType<D> {
    type_tag: String,
    decode_fn: D,
    encode_fn: Box<dyn Fn(&dyn Any) -> Result<Value, Error>>,
}

impl<D> SpecialType for FnSpecialType<D>
where
    D: Fn(&[SaveItem], &TypeRegistry) -> Result<Value, Error>,
{
    fn type_tag(&self) -> &str {
        &self.type_tag
    }

    fn encode(&self, value: &dyn Any) -> Result<Value, Error> {
        (self.encode_fn)(value)
    }

    fn decode(&self, items: &[SaveItem], registry: &TypeRegistry) -> Result<Value, Error> {
        (self.decode_fn)(items, registry)
    }
}
