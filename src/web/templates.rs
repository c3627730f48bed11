//! HTML template for the config selection page.
//!
//! The page is embedded at compile time using `include_str!`. An `index.html`
//! in the configured web directory replaces it, which makes editing the page
//! possible without a rebuild.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The built-in index page.
pub const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Placeholder replaced by the list of config checkboxes.
pub const CONFIG_ITEMS_PLACEHOLDER: &str = "{{config_items}}";

/// The index page template, loaded once at startup.
#[derive(Debug, Clone)]
pub struct IndexPage {
    template: String,
    source: Option<PathBuf>,
}

impl IndexPage {
    /// The embedded page.
    pub fn embedded() -> Self {
        Self {
            template: INDEX_TEMPLATE.to_string(),
            source: None,
        }
    }

    /// Use `<web_dir>/index.html` if it exists, the embedded page otherwise.
    ///
    /// An override that exists but cannot be read is an error.
    pub fn load(web_dir: &Path) -> std::io::Result<Self> {
        let path = web_dir.join("index.html");
        if !path.is_file() {
            debug!(path = ?path, "No index override, using embedded page");
            return Ok(Self::embedded());
        }

        let template = std::fs::read_to_string(&path)?;
        info!(path = ?path, "Using index page from web directory");
        Ok(Self {
            template,
            source: Some(path),
        })
    }

    /// File the template was read from, `None` for the embedded page.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Render the page for the given config names.
    pub fn render(&self, names: &[String]) -> String {
        self.template
            .replace(CONFIG_ITEMS_PLACEHOLDER, &config_items(names))
    }
}

impl Default for IndexPage {
    fn default() -> Self {
        Self::embedded()
    }
}

fn config_items(names: &[String]) -> String {
    if names.is_empty() {
        return r#"            <li class="empty-state">No configs available</li>"#.to_string();
    }

    names
        .iter()
        .map(|name| {
            let escaped = html_escape(name);
            format!(
                r#"            <li><label><input type="checkbox" name="name" value="{escaped}"> {escaped}</label></li>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
