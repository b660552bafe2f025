use crate::entry::SaveEntry;
use crate::errors::Error;
use crate::registry::TypeRegistry;
use crate::saveable::Saveable;
use crate::text::{read_entry, write_entry};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Obtain `root`'s save record and write it to `path`.
///
/// The file handle is held only for the duration of the write and released
/// on every exit path. I/O failures propagate to the caller unchanged; no
/// retry, no cleanup of a partially written file.
pub fn save<T, P>(
    root: &T,
    path: P,
    for_level_save: bool,
    registry: &TypeRegistry,
) -> Result<(), Error>
where
    T: Saveable + ?Sized,
    P: AsRef<Path>,
{
    let data = root.save_data(for_level_save, registry)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_entry(&mut writer, &data)?;
    writer.flush()?;
    Ok(())
}

/// Read the root save record from `path`.
///
/// The caller decides what to do with the record, typically constructing
/// the right target type and handing the record to its
/// [`Loadable::load_save_data`](crate::Loadable::load_save_data).
pub fn load<P: AsRef<Path>>(path: P) -> Result<SaveEntry, Error> {
    let file = File::open(path)?;
    read_entry(&mut BufReader::new(file))
}
