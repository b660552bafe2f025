/*!

A line-oriented object-tree serializer for game save files.

A host application describes its live objects as a tree of
[`SaveEntry`] nodes, savetree writes that tree as newline-terminated text,
and on load rebuilds the tree and decodes it back into [`Value`]s that are
applied to an already-constructed target. Arbitrary host types opt into
serialization through a caller-owned [`TypeRegistry`]; the engine itself
never needs to learn about them.

## Quick Start

```rust
use savetree::{read_entry, write_entry, Error, Loadable, SaveEntry, Saveable, TypeRegistry, Value};

#[derive(Debug, Default, PartialEq)]
struct Player {
    health: i64,
    name: String,
}

impl Saveable for Player {
    fn type_tag(&self) -> &str {
        "Player"
    }

    fn save_data(&self, _for_level_save: bool, registry: &TypeRegistry) -> Result<SaveEntry, Error> {
        let mut record = SaveEntry::new(self.type_tag());
        record.add_assign("health", self.health, registry)?;
        record.add_assign("name", self.name.as_str(), registry)?;
        Ok(record)
    }
}

impl Loadable for Player {
    fn assign(&mut self, field: &str, value: Value, _ctx: &mut ()) -> Result<(), Error> {
        match field {
            "health" => self.health = value.as_int().unwrap_or_default(),
            "name" => self.name = value.as_str().unwrap_or_default().to_string(),
            other => return Err(Error::message(format!("unknown field `{}`", other))),
        }
        Ok(())
    }
}

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let registry = TypeRegistry::new();
let player = Player { health: 20, name: "Ida".into() };

// in-memory here; `savetree::save` / `savetree::load` do the same through a file
let mut out: Vec<u8> = Vec::new();
write_entry(&mut out, &player.save_data(false, &registry)?)?;

let record = read_entry(&mut &out[..])?;
let mut restored = Player::default();
restored.load_save_data(&record, &registry, &mut ())?;
assert_eq!(restored, player);
# Ok(())
# }
```

## Special types

Types the engine has no built-in handling for, such as vectors or colors,
are registered in the [`TypeRegistry`] with a pair of hooks that reduce the
value to something the engine does understand and rebuild it later. The
decode-side dispatch goes through [`SpecialType::matches`], so one handler
can serve a whole family of recorded tags (say, every subclass of a vector
type the engine has never heard of). See [`SpecialType`] for a worked
example.

## File format

One node is three header lines (type tag, directive, child count)
followed by one line per child. The directive line is empty on the root. A child line holding the
sentinel [`ENTRY_MARKER`] announces a nested node written recursively in
the same shape. String and byte payloads are escaped at encode time so a
leaf can never span physical lines; the writer refuses to emit one that
would.

No file header, no checksum, no versioning: the format is deliberately
plain text, diffable, and hand-editable.

## Limits

Encode, decode, and the reader share a recursion depth limit of 128, so a
cyclic object graph or a hostile deeply-nested file fails with an error
instead of exhausting the stack. Integers narrow to `i64`; floats
round-trip exactly through Rust's shortest-representation formatting.

*/

mod decode;
mod depth;
mod encode;
mod entry;
mod errors;
mod escape;
mod file;
mod registry;
mod saveable;
mod text;
mod value;

pub use self::decode::{apply, decode};
pub use self::encode::encode;
pub use self::entry::{Directive, SaveEntry, SaveItem, ENTRY_TAG};
pub use self::errors::{Error, ErrorKind};
pub use self::file::{load, save};
pub use self::registry::{SpecialType, TypeRegistry};
pub use self::saveable::{Loadable, Saveable, SaveableWrapper};
pub use self::text::{read_entry, write_entry, ENTRY_MARKER};
pub use self::value::{AnyValue, CustomValue, Value};
