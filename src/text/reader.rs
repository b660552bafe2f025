use super::ENTRY_MARKER;
use crate::depth::Depth;
use crate::entry::{Directive, SaveEntry, SaveItem};
use crate::errors::{Error, ErrorKind};
use std::io::BufRead;

/// Read one entry tree from `reader`.
///
/// This is the exact inverse of [`write_entry`](crate::write_entry): three
/// header lines, then one line per declared child, recursing whenever a
/// child line equals the [`ENTRY_MARKER`] sentinel. Structural problems
/// (truncation, an unparsable child count, nesting past the depth limit)
/// fail fast with the offending 1-based line number rather than yielding a
/// partial tree.
///
/// ```
/// use savetree::read_entry;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = b"Player\n\n1\nENTRY\nint\nhealth =\n1\n20\n";
/// let entry = read_entry(&mut &data[..])?;
/// assert_eq!(entry.type_tag, "Player");
/// assert_eq!(entry.items.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn read_entry<R: BufRead>(reader: &mut R) -> Result<SaveEntry, Error> {
    let mut lines = LineReader {
        reader,
        line: 0,
    };
    read_entry_at(&mut lines, Depth::new())
}

struct LineReader<'a, R> {
    reader: &'a mut R,
    line: usize,
}

impl<R: BufRead> LineReader<'_, R> {
    /// Next line with the terminator (and any `\r` before it) stripped
    fn next_line(&mut self) -> Result<String, Error> {
        let mut buf = String::new();
        let read = self.reader.read_line(&mut buf)?;
        if read == 0 {
            return Err(Error::new(ErrorKind::Eof { line: self.line }));
        }
        self.line += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(buf)
    }
}

fn read_entry_at<R: BufRead>(lines: &mut LineReader<R>, depth: Depth) -> Result<SaveEntry, Error> {
    let depth = depth.descend()?;
    let type_tag = lines.next_line()?;
    let directive = Directive::from_wire(&lines.next_line()?);
    let count_line = lines.next_line()?;
    let count: usize = count_line.trim().parse().map_err(|_| {
        Error::new(ErrorKind::InvalidChildCount {
            line: lines.line,
            value: count_line.clone(),
        })
    })?;

    // no up-front reservation: a hostile count should hit Eof, not OOM
    let mut items = Vec::new();
    for _ in 0..count {
        let line = lines.next_line()?;
        if line == ENTRY_MARKER {
            items.push(SaveItem::Entry(read_entry_at(lines, depth)?));
        } else {
            items.push(SaveItem::Leaf(line));
        }
    }

    Ok(SaveEntry {
        type_tag,
        directive,
        items,
    })
}
