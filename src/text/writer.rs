use super::ENTRY_MARKER;
use crate::depth::Depth;
use crate::entry::{SaveEntry, SaveItem};
use crate::errors::{Error, ErrorKind};
use std::io::Write;

/// Write `entry` to `writer` in the line-oriented wire format.
///
/// Every line is newline-terminated. The writer refuses to emit a tag,
/// directive, or leaf containing a line break (payloads are expected to
/// have been escaped at encode time), so a malformed tree fails here instead
/// of producing a file that cannot be read back.
///
/// ```
/// use savetree::{encode, write_entry, Directive, TypeRegistry, Value};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = TypeRegistry::new();
/// let node = encode(Some(Directive::assign("health")), &Value::Int(20), &registry)?;
/// let mut out: Vec<u8> = Vec::new();
/// write_entry(&mut out, &node)?;
/// assert_eq!(std::str::from_utf8(&out)?, "int\nhealth =\n1\n20\n");
/// # Ok(())
/// # }
/// ```
pub fn write_entry<W: Write>(writer: &mut W, entry: &SaveEntry) -> Result<(), Error> {
    write_entry_at(writer, entry, Depth::new())
}

fn write_entry_at<W: Write>(writer: &mut W, entry: &SaveEntry, depth: Depth) -> Result<(), Error> {
    let depth = depth.descend()?;
    write_line(writer, &entry.type_tag)?;
    match &entry.directive {
        Some(directive) => write_line(writer, &directive.to_wire())?,
        None => writer.write_all(b"\n")?,
    }
    write_count(writer, entry.items.len())?;
    for item in &entry.items {
        match item {
            SaveItem::Leaf(text) => write_line(writer, text)?,
            SaveItem::Entry(child) => {
                write_line(writer, ENTRY_MARKER)?;
                write_entry_at(writer, child, depth)?;
            }
        }
    }
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<(), Error> {
    if line.contains('\n') || line.contains('\r') {
        return Err(Error::new(ErrorKind::UnescapedNewline {
            text: line.to_string(),
        }));
    }
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(feature = "faster_writer")]
fn write_count<W: Write>(writer: &mut W, count: usize) -> Result<(), Error> {
    let mut buffer = itoa::Buffer::new();
    writer.write_all(buffer.format(count).as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(not(feature = "faster_writer"))]
fn write_count<W: Write>(writer: &mut W, count: usize) -> Result<(), Error> {
    write_line(writer, &count.to_string())
}
