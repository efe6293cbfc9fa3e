//! Settings persistence using toml_edit to preserve formatting and comments.
//!
//! Only the `[settings]` and `[users.<id>]` tables are touched; the rest of
//! the config file is written back exactly as it was read.

use anyhow::{Context, Result};
use std::path::Path;
use toml_edit::{DocumentMut, Item, Table};

/// Set one deployment-wide setting in the `[settings]` table.
pub fn update_app_value(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut doc = read_document(path)?;

    let settings = table_mut(doc.as_table_mut(), "settings")?;
    settings[key] = toml_edit::value(value);

    write_document(path, &doc)
}

/// Set one per-user setting in the `[users.<user>]` table.
pub fn update_user_value(path: &Path, user: &str, key: &str, value: &str) -> Result<()> {
    let mut doc = read_document(path)?;

    let users = table_mut(doc.as_table_mut(), "users")?;
    // Keep `[users]` itself out of the output; only `[users.<id>]` headers.
    users.set_implicit(true);
    let user_table = table_mut(users, user)?;
    user_table[key] = toml_edit::value(value);

    write_document(path, &doc)
}

fn read_document(path: &Path) -> Result<DocumentMut> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read config file: {:?}", path))
        }
    };

    content
        .parse()
        .with_context(|| format!("Failed to parse config file: {:?}", path))
}

fn write_document(path: &Path, doc: &DocumentMut) -> Result<()> {
    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))
}

fn table_mut<'a>(parent: &'a mut Table, key: &str) -> Result<&'a mut Table> {
    parent
        .entry(key)
        .or_insert(Item::Table(Table::new()))
        .as_table_mut()
        .with_context(|| format!("`{key}` is not a table"))
}
