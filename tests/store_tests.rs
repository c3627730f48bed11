//! Integration tests for loading a configs directory and resolving merges.

use kubedepot::error::{LoadError, MergeError, ResolveError};
use kubedepot::kubeconfig::{KubeConfig, MERGED_CURRENT_CONTEXT, Section};
use kubedepot::resolver::resolve;
use kubedepot::store::ConfigStore;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

/// Single-cluster kubeconfig named after `name`, with an exec-plugin user.
fn kubeconfig(name: &str) -> String {
    format!(
        r#"apiVersion: v1
kind: Config
clusters:
- cluster:
    certificate-authority-data: {name}-ca
    server: https://{name}.k8s.example.com:6443
  name: {name}
contexts:
- context:
    cluster: {name}
    user: {name}-admin
  name: {name}
current-context: {name}
users:
- name: {name}-admin
  user:
    exec:
      apiVersion: client.authentication.k8s.io/v1beta1
      command: kubelogin
      args:
      - get-token
      - --server-id
      - {name}
"#
    )
}

fn write(dir: &Path, file: &str, content: &str) {
    std::fs::write(dir.join(file), content).expect("Failed to write test file");
}

/// Helper to create a configs directory with one file per name.
fn setup_store(names: &[&str]) -> (TempDir, ConfigStore) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    for name in names {
        write(temp.path(), &format!("{name}.yaml"), &kubeconfig(name));
    }
    let store = ConfigStore::open(temp.path()).expect("Failed to open store");
    (temp, store)
}

#[test]
fn five_configs_merge_end_to_end() {
    let (_temp, store) = setup_store(&["dev", "prod", "a", "b", "c"]);

    let mut names = store.list();
    names.sort();
    assert_eq!(names, vec!["a", "b", "c", "dev", "prod"]);

    let all = resolve::<&str>(&store, &[]).expect("merge of all configs");
    assert_eq!(all.clusters.len(), 5);
    assert_eq!(all.contexts.len(), 5);
    assert_eq!(all.users.len(), 5);
    assert_eq!(all.current_context, MERGED_CURRENT_CONTEXT);

    let dev = resolve(&store, &["dev"]).expect("merge of dev");
    let stored = store.get("dev").expect("dev is loaded");
    assert_eq!(dev.clusters, stored.clusters);
    assert_eq!(dev.contexts, stored.contexts);
    assert_eq!(dev.users, stored.users);
    assert_eq!(dev.current_context, "dev");
    assert_eq!(dev.api_version, "v1");
    assert_eq!(dev.kind, "Config");
}

#[test]
fn empty_request_equals_full_explicit_request() {
    let (_temp, store) = setup_store(&["dev", "prod", "staging"]);

    let implicit = resolve::<&str>(&store, &[]).unwrap();
    let explicit = resolve(&store, &store.list()).unwrap();
    assert_eq!(implicit, explicit);
}

#[test]
fn unknown_name_returns_not_found() {
    let (_temp, store) = setup_store(&["dev", "prod"]);

    let err = resolve(&store, &["dev", "qa"]).unwrap_err();
    assert_eq!(err, ResolveError::NotFound("qa".to_string()));

    // The store is untouched and still answers.
    assert_eq!(store.len(), 2);
    assert!(resolve(&store, &["prod"]).is_ok());
}

#[test]
fn exec_credentials_preserved_through_merge() {
    let (_temp, store) = setup_store(&["dev", "prod"]);

    let merged = resolve(&store, &["prod", "dev"]).unwrap();
    assert_eq!(
        merged.users[0].user["exec"]["args"],
        json!(["get-token", "--server-id", "prod"])
    );

    let yaml = serde_yaml::to_string(&merged).unwrap();
    let reparsed = KubeConfig::parse(yaml.as_bytes()).unwrap();
    assert_eq!(reparsed, merged);
}

#[test]
fn colliding_cluster_names_fail_startup() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "dev.yaml", &kubeconfig("dev"));
    // Different file, same cluster/context/user names.
    write(temp.path(), "dev-copy.yaml", &kubeconfig("dev"));

    let err = ConfigStore::open(temp.path()).unwrap_err();
    match err {
        LoadError::Unmergeable { source, .. } => {
            assert_eq!(
                source,
                MergeError::DuplicateName {
                    section: Section::Cluster,
                    name: "dev".to_string()
                }
            );
        }
        other => panic!("Expected Unmergeable, got: {}", other),
    }
}

#[test]
fn multi_cluster_file_fails_startup() {
    let temp = TempDir::new().unwrap();
    let content = r#"clusters:
- cluster: {server: "https://one"}
  name: one
- cluster: {server: "https://two"}
  name: two
contexts:
- context: {cluster: one, user: admin}
  name: one
users:
- name: admin
  user: {token: abc}
"#;
    write(temp.path(), "multi.yaml", content);

    let err = ConfigStore::open(temp.path()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Unmergeable {
            source: MergeError::MultipleEntries(Section::Cluster),
            ..
        }
    ));
}

#[test]
fn malformed_file_fails_load_and_names_it() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "dev.yaml", &kubeconfig("dev"));
    write(temp.path(), "oops.yaml", "clusters: [unterminated");

    let err = ConfigStore::load(temp.path()).unwrap_err();
    assert!(matches!(err, LoadError::InvalidDocument { .. }));
    assert!(err.to_string().contains("oops.yaml"));
}

#[test]
fn configmap_mount_layout_is_loaded() {
    // Kubernetes projects ConfigMaps as symlinks into a hidden timestamped dir.
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("..2025_01_01_00_00_00.000000000");
    std::fs::create_dir(&data_dir).unwrap();
    write(&data_dir, "dev.yaml", &kubeconfig("dev"));
    write(&data_dir, "prod.yaml", &kubeconfig("prod"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::symlink;
        symlink(&data_dir, temp.path().join("..data")).unwrap();
        symlink(
            Path::new("..data").join("dev.yaml"),
            temp.path().join("dev.yaml"),
        )
        .unwrap();
        symlink(
            Path::new("..data").join("prod.yaml"),
            temp.path().join("prod.yaml"),
        )
        .unwrap();

        let store = ConfigStore::open(temp.path()).unwrap();
        let mut names = store.list();
        names.sort();
        assert_eq!(names, vec!["dev", "prod"]);
    }

    #[cfg(not(unix))]
    {
        let store = ConfigStore::open(temp.path()).unwrap();
        assert!(store.is_empty());
    }
}
