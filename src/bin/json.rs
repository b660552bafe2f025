use std::env;
use std::error::Error;
use std::io::{stdout, Write};

/// Dump a save file's tree as JSON for inspection and diffing.
fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: json <save-file>");
            std::process::exit(1);
        }
    };

    let entry = savetree::load(&path)?;
    let out = stdout();
    let mut lock = out.lock();
    serde_json::to_writer_pretty(&mut lock, &entry)?;
    writeln!(lock)?;
    Ok(())
}
