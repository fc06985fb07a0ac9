//! JSON boundary of the consolidation workspace.
//!
//! Input files are arrays of flat string-valued objects as produced by the
//! query layer (`nounsQueried.json`, `verbsQueried.json`, ...). They are read
//! either through a memory map or into an owned buffer, chosen at runtime via
//! [`LoadMode`], and decoded into [`RawRecord`]s.
//!
//! Output is written the way downstream keyboards expect it: two-space
//! indentation, literal non-ASCII characters, and a trailing newline.
//!
//! # Example
//! ```no_run
//! use scribe_json::{LoadMode, load_records_with_mode, write_json};
//!
//! # fn main() -> anyhow::Result<()> {
//! let records = load_records_with_mode("German/nouns/nounsQueried.json", LoadMode::Owned)?;
//! println!("{} rows", records.len());
//! write_json("out/German/nouns.json", &std::collections::BTreeMap::<String, String>::new())?;
//! # Ok(()) }
//! ```

use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use memmap2::Mmap;
use scribe_consolidate::decode_records;
use scribe_types::RawRecord;
use serde::Serialize;
use serde_json::Value;

/// Strategy for reading input files.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file.
    #[default]
    Mmap,
    /// Read the file into an owned buffer.
    Owned,
}

impl LoadMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadMode::Mmap => "mmap",
            LoadMode::Owned => "owned",
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mmap" => Ok(LoadMode::Mmap),
            "owned" => Ok(LoadMode::Owned),
            other => Err(format!("unknown load mode `{other}` (expected mmap or owned)")),
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

/// Load records with the default [`LoadMode::Mmap`].
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    load_records_with_mode(path, LoadMode::default())
}

pub fn load_records_with_mode(path: impl AsRef<Path>, mode: LoadMode) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let buffer = load_file(path, mode)?;
    parse_records(buffer.as_slice()).with_context(|| format!("decode {}", path.display()))
}

/// Decode a JSON array of flat string-valued objects.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let values: Vec<Value> =
        serde_json::from_slice(bytes).context("expected a JSON array of records")?;
    Ok(decode_records(&values)?)
}

/// Render `value` as indented JSON with a trailing newline.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("serialize output")?;
    out.push('\n');
    Ok(out)
}

/// Write `value` to `path`, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let text = to_json_string(value)?;
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}
