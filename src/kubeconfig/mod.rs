//! Typed kubeconfig documents.
//!
//! Only the fields a stored document is expected to carry are modelled:
//! clusters, contexts, users and the current context. The user credential is
//! kept as an opaque value because its shape depends on the auth plugin.

pub mod merge;

pub use merge::{Section, merge};

use crate::error::ParseError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// `apiVersion` written on every merged document.
pub const API_VERSION: &str = "v1";

/// `kind` written on every merged document.
pub const KIND: &str = "Config";

/// Current context forced onto a merge once the accumulator already has one.
pub const MERGED_CURRENT_CONTEXT: &str = "pp-dev";

/// A kubeconfig document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KubeConfig {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub clusters: Vec<NamedCluster>,

    #[serde(default)]
    pub contexts: Vec<NamedContext>,

    /// Empty means unset.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    #[serde(default)]
    pub users: Vec<NamedUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedCluster {
    #[serde(default)]
    pub cluster: Cluster,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Base64 encoded CA bundle, passed through untouched.
    #[serde(rename = "certificate-authority-data", default)]
    pub certificate_authority_data: String,
    #[serde(default)]
    pub server: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedContext {
    #[serde(default)]
    pub context: Context,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub user: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedUser {
    /// Credential payload (token, client cert, exec plugin, ...). Never inspected.
    #[serde(default, deserialize_with = "credential_payload")]
    pub user: Value,
    #[serde(default)]
    pub name: String,
}

impl KubeConfig {
    /// Parse a document from raw bytes.
    ///
    /// Empty input, or input holding only whitespace and comments, yields the
    /// zero document. Only the first YAML document of a stream is read.
    pub fn parse(data: &[u8]) -> Result<Self, serde_yaml::Error> {
        if is_blank(data) {
            return Ok(Self::default());
        }
        let Some(document) = serde_yaml::Deserializer::from_slice(data).next() else {
            return Ok(Self::default());
        };
        let doc = Option::<Self>::deserialize(document)?;
        Ok(doc.unwrap_or_default())
    }

    /// Read and parse a document from disk.
    pub fn from_file(path: &Path) -> Result<Self, ParseError> {
        let data = std::fs::read(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data).map_err(|source| ParseError::Syntax {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of entries in one section.
    pub fn section_len(&self, section: Section) -> usize {
        match section {
            Section::Cluster => self.clusters.len(),
            Section::Context => self.contexts.len(),
            Section::User => self.users.len(),
        }
    }

    /// Name of the first entry in a section, if any.
    pub fn first_name(&self, section: Section) -> Option<&str> {
        match section {
            Section::Cluster => self.clusters.first().map(|c| c.name.as_str()),
            Section::Context => self.contexts.first().map(|c| c.name.as_str()),
            Section::User => self.users.first().map(|u| u.name.as_str()),
        }
    }
}

/// Read a credential payload, resolving YAML merge keys (`<<`).
fn credential_payload<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    let mut raw = serde_yaml::Value::deserialize(deserializer)?;
    raw.apply_merge().map_err(<D::Error as de::Error>::custom)?;
    serde_json::to_value(raw).map_err(de::Error::custom)
}

/// Whitespace and `#` comment lines only.
fn is_blank(data: &[u8]) -> bool {
    data.split(|b| *b == b'\n').all(|line| {
        match line.iter().position(|b| !b.is_ascii_whitespace()) {
            None => true,
            Some(i) => line[i] == b'#',
        }
    })
}
