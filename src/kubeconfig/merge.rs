//! Merging of stored kubeconfig documents.
//!
//! `merge` folds exactly one freshly loaded document (`incoming`) into an
//! accumulator. It is not symmetric: every precondition is checked on
//! `incoming` only, and the accumulator is trusted to be the product of
//! earlier merges.

use super::{API_VERSION, KIND, KubeConfig, MERGED_CURRENT_CONTEXT};
use crate::error::MergeError;
use std::fmt;

/// The three named sections of a kubeconfig document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Cluster,
    Context,
    User,
}

impl Section {
    /// Sections in the order they are checked.
    pub const ALL: [Section; 3] = [Section::Cluster, Section::Context, Section::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Cluster => "cluster",
            Section::Context => "context",
            Section::User => "user",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merge `incoming` into `acc`, returning the combined document.
///
/// Checks, in order, each against `incoming`:
/// 1. every section holds at least one entry
/// 2. no section holds more than one entry
/// 3. the first entry of each section does not share its name with the
///    first entry of the same section in `acc`
///
/// Only the first entries are compared. A collision with a later entry of a
/// multi-source accumulator goes undetected.
///
/// Entries are appended after the accumulator's. The current context is taken
/// from `incoming` while the accumulator has none, and is forced to
/// [`MERGED_CURRENT_CONTEXT`] afterwards.
pub fn merge(acc: KubeConfig, incoming: &KubeConfig) -> Result<KubeConfig, MergeError> {
    for section in Section::ALL {
        if incoming.section_len(section) == 0 {
            return Err(MergeError::EmptySection(section));
        }
    }

    for section in Section::ALL {
        if incoming.section_len(section) > 1 {
            return Err(MergeError::MultipleEntries(section));
        }
    }

    for section in Section::ALL {
        if let (Some(existing), Some(name)) = (acc.first_name(section), incoming.first_name(section))
            && existing == name
        {
            return Err(MergeError::DuplicateName {
                section,
                name: name.to_string(),
            });
        }
    }

    let current_context = if acc.current_context.is_empty() {
        incoming.current_context.clone()
    } else {
        MERGED_CURRENT_CONTEXT.to_string()
    };

    let KubeConfig {
        mut clusters,
        mut contexts,
        mut users,
        ..
    } = acc;
    clusters.extend(incoming.clusters.iter().cloned());
    contexts.extend(incoming.contexts.iter().cloned());
    users.extend(incoming.users.iter().cloned());

    Ok(KubeConfig {
        api_version: API_VERSION.to_string(),
        kind: KIND.to_string(),
        clusters,
        contexts,
        current_context,
        users,
    })
}
