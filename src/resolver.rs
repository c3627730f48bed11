//! Turns a list of requested config names into one merged document.

use crate::error::ResolveError;
use crate::kubeconfig::{KubeConfig, merge};
use crate::store::ConfigStore;
use tracing::debug;

/// Merge the requested configs, in order, into a single document.
///
/// An empty request means every config in the store. The first unknown name
/// or failed merge aborts the request; nothing partial is returned.
pub fn resolve<S: AsRef<str>>(
    store: &ConfigStore,
    requested: &[S],
) -> Result<KubeConfig, ResolveError> {
    let names: Vec<String> = if requested.is_empty() {
        debug!("No config names provided, merging all configs");
        store.list()
    } else {
        requested.iter().map(|n| n.as_ref().to_string()).collect()
    };

    let mut merged = KubeConfig::default();
    for name in &names {
        let config = store
            .get(name)
            .ok_or_else(|| ResolveError::NotFound(name.clone()))?;

        debug!(name = %name, "Merging config");
        merged = merge(merged, config).map_err(|source| ResolveError::Merge {
            name: name.clone(),
            source,
        })?;
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MergeError;
    use crate::kubeconfig::{MERGED_CURRENT_CONTEXT, Section};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_config(dir: &Path, name: &str, cluster: &str) {
        let content = format!(
            r#"clusters:
- cluster:
    server: https://{name}.example.com
  name: {cluster}
contexts:
- context:
    cluster: {cluster}
    user: {name}-user
  name: {name}-context
current-context: {name}-context
users:
- name: {name}-user
  user:
    token: {name}-token
"#
        );
        std::fs::write(dir.join(format!("{name}.yaml")), content).unwrap();
    }

    fn store_with(names: &[&str]) -> (TempDir, ConfigStore) {
        let temp = TempDir::new().unwrap();
        for name in names {
            write_config(temp.path(), name, &format!("{name}-cluster"));
        }
        let store = ConfigStore::open(temp.path()).unwrap();
        (temp, store)
    }

    #[test]
    fn test_resolve_single() {
        let (_temp, store) = store_with(&["dev", "prod"]);

        let merged = resolve(&store, &["dev"]).unwrap();
        let dev = store.get("dev").unwrap();

        assert_eq!(merged.clusters, dev.clusters);
        assert_eq!(merged.contexts, dev.contexts);
        assert_eq!(merged.users, dev.users);
        assert_eq!(merged.current_context, "dev-context");
        assert_eq!(merged.api_version, "v1");
    }

    #[test]
    fn test_resolve_preserves_request_order() {
        let (_temp, store) = store_with(&["dev", "prod"]);

        let merged = resolve(&store, &["prod", "dev"]).unwrap();
        let names: Vec<_> = merged.clusters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["prod-cluster", "dev-cluster"]);
        assert_eq!(merged.current_context, MERGED_CURRENT_CONTEXT);
    }

    #[test]
    fn test_resolve_empty_request_means_all() {
        let (_temp, store) = store_with(&["a", "b", "c"]);

        let all = resolve::<&str>(&store, &[]).unwrap();
        assert_eq!(all.clusters.len(), 3);

        // Same content as asking for every name explicitly, in index order.
        let explicit = resolve(&store, &store.list()).unwrap();
        assert_eq!(all, explicit);
    }

    #[test]
    fn test_resolve_empty_store() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::open(temp.path()).unwrap();

        let merged = resolve::<&str>(&store, &[]).unwrap();
        assert_eq!(merged, KubeConfig::default());
    }

    #[test]
    fn test_resolve_unknown_name() {
        let (_temp, store) = store_with(&["dev"]);

        let err = resolve(&store, &["dev", "ghost", "also-missing"]).unwrap_err();
        assert_eq!(err, ResolveError::NotFound("ghost".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_resolve_same_name_twice_fails_merge() {
        let (_temp, store) = store_with(&["dev"]);

        let err = resolve(&store, &["dev", "dev"]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::Merge {
                name: "dev".to_string(),
                source: MergeError::DuplicateName {
                    section: Section::Cluster,
                    name: "dev-cluster".to_string(),
                },
            }
        );
    }
}
