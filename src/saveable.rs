use crate::decode::apply;
use crate::entry::SaveEntry;
use crate::errors::Error;
use crate::registry::TypeRegistry;
use crate::value::Value;

/// The save side of a participant: builds the record describing the object.
///
/// The default [`save_data`](Saveable::save_data) produces an empty record
/// tagged with [`type_tag`](Saveable::type_tag). Implementations typically
/// obtain their supertype's record first (or start from the default) and
/// append their own fields with [`SaveEntry::add_assign`] and
/// [`SaveEntry::add_invoke`].
pub trait Saveable {
    /// The type name recorded on this object's root record
    fn type_tag(&self) -> &str;

    /// Build the record to persist for this object.
    ///
    /// `for_level_save` distinguishes a level file from a snapshot of an
    /// active game; the engine passes it through untouched.
    fn save_data(&self, for_level_save: bool, registry: &TypeRegistry) -> Result<SaveEntry, Error> {
        let _ = (for_level_save, registry);
        Ok(SaveEntry::new(self.type_tag()))
    }
}

/// The load side of a participant: receives a decoded record and applies it
/// to itself, with an ambient context reference of the host's choosing.
///
/// The default [`load_save_data`](Loadable::load_save_data) routes every
/// child through [`apply`]: assignment directives call
/// [`assign`](Loadable::assign), invocation directives call
/// [`invoke`](Loadable::invoke). Override it to intercept specific
/// directives (say, to resolve a saved integer id into a live reference
/// owned by `ctx`) and fall back to the default handling for the rest:
///
/// ```
/// use savetree::{Error, Loadable, SaveEntry, TypeRegistry, Value};
///
/// struct World {
///     target_names: Vec<String>,
/// }
///
/// #[derive(Default)]
/// struct Homing {
///     target: Option<String>,
/// }
///
/// impl Loadable<World> for Homing {
///     fn assign(&mut self, field: &str, value: Value, ctx: &mut World) -> Result<(), Error> {
///         match field {
///             // the save holds an index; resolve it against the world
///             "target" => {
///                 let idx = value.as_int().unwrap_or(-1);
///                 self.target = usize::try_from(idx)
///                     .ok()
///                     .and_then(|i| ctx.target_names.get(i))
///                     .cloned();
///                 Ok(())
///             }
///             other => Err(Error::message(format!("unknown field `{}`", other))),
///         }
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = TypeRegistry::new();
/// let mut record = SaveEntry::new("Homing");
/// record.add_assign("target", 1i64, &registry)?;
///
/// let mut world = World {
///     target_names: vec!["crate".into(), "goblin".into()],
/// };
/// let mut homing = Homing::default();
/// homing.load_save_data(&record, &registry, &mut world)?;
/// assert_eq!(homing.target.as_deref(), Some("goblin"));
/// # Ok(())
/// # }
/// ```
pub trait Loadable<C = ()> {
    /// Restore this object from `data`
    fn load_save_data(
        &mut self,
        data: &SaveEntry,
        registry: &TypeRegistry,
        ctx: &mut C,
    ) -> Result<(), Error> {
        apply(self, data, registry, ctx)
    }

    /// Apply a decoded value under an assignment directive
    fn assign(&mut self, field: &str, value: Value, ctx: &mut C) -> Result<(), Error>;

    /// Apply a decoded value under an invocation directive
    fn invoke(&mut self, method: &str, value: Value, ctx: &mut C) -> Result<(), Error> {
        let _ = (value, ctx);
        Err(Error::message(format!(
            "no method handler for `{}`",
            method
        )))
    }
}

/// Saves a bare [`Value`], such as a dictionary or a list, without
/// defining a participant type for it.
///
/// Copy the value into [`data`](SaveableWrapper::data), save the wrapper,
/// and on load restore into a fresh wrapper and copy the value back out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveableWrapper {
    pub data: Value,
}

impl SaveableWrapper {
    pub fn new(data: Value) -> SaveableWrapper {
        SaveableWrapper { data }
    }
}

impl Saveable for SaveableWrapper {
    fn type_tag(&self) -> &str {
        "SaveableWrapper"
    }

    fn save_data(&self, for_level_save: bool, registry: &TypeRegistry) -> Result<SaveEntry, Error> {
        let _ = for_level_save;
        let mut entry = SaveEntry::new(self.type_tag());
        entry.add_assign("data", self.data.clone(), registry)?;
        Ok(entry)
    }
}

impl<C> Loadable<C> for SaveableWrapper {
    fn assign(&mut self, field: &str, value: Value, _ctx: &mut C) -> Result<(), Error> {
        match field {
            "data" => {
                self.data = value;
                Ok(())
            }
            other => Err(Error::message(format!(
                "SaveableWrapper has no `{}` field",
                other
            ))),
        }
    }
}
