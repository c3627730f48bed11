//! Offline subcommands that print from a loaded store.
//!
//! Each runner returns the text to print so `main` only does the I/O.

use super::{GetArgs, ListArgs};
use crate::error::EncodeError;
use crate::resolver::resolve;
use crate::store::ConfigStore;
use anyhow::Result;
use std::fmt::Write as _;

/// Summary of a validated store: one line per config with its source file.
pub fn run_check(store: &ConfigStore) -> String {
    if store.is_empty() {
        return format!("No configs in {}\n", store.dir().display());
    }

    let mut out = String::new();
    for name in store.sorted_names() {
        match store.source_path(&name) {
            Some(path) => {
                let _ = writeln!(out, "{name}\t{}", path.display());
            }
            None => {
                let _ = writeln!(out, "{name}");
            }
        }
    }
    let _ = writeln!(
        out,
        "{} config(s) in {} can be merged together",
        store.len(),
        store.dir().display()
    );
    out
}

/// Sorted config names in the requested encoding.
pub fn run_list(store: &ConfigStore, args: &ListArgs) -> Result<String, EncodeError> {
    args.format.encode(&store.sorted_names())
}

/// The merged document for the requested names, encoded.
pub fn run_get(store: &ConfigStore, args: &GetArgs) -> Result<String> {
    let merged = resolve(store, &args.names)?;
    Ok(args.format.encode(&merged)?)
}
