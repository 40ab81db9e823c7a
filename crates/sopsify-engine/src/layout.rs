//! Output layout under the repository root
//!
//! ```text
//! <root>/clusters/<cluster>/secrets/<namespace>/<template>.enc.yaml
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

static DNS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex"));

/// Directory holding all cluster directories
pub const CLUSTERS_DIR: &str = "clusters";

/// Subdirectory of a cluster receiving rendered secrets
pub const SECRETS_DIR: &str = "secrets";

/// Suffix of encrypted output files
pub const ENCRYPTED_SUFFIX: &str = ".enc.yaml";

/// Whether `name` is a DNS-1123 label, safe to use as a single path component
pub fn is_dns_label(name: &str) -> bool {
    name.len() <= 63 && DNS_LABEL.is_match(name)
}

/// `<root>/clusters/<cluster>`
pub fn cluster_dir(root: &Path, cluster: &str) -> PathBuf {
    root.join(CLUSTERS_DIR).join(cluster)
}

/// Confirm the cluster name is a DNS-1123 label and its directory exists
pub fn check_cluster_dir(root: &Path, cluster: &str) -> Result<PathBuf> {
    if !is_dns_label(cluster) {
        return Err(EngineError::InvalidClusterName {
            cluster: cluster.to_string(),
        });
    }

    let dir = cluster_dir(root, cluster);
    if !dir.is_dir() {
        return Err(EngineError::ClusterDirectory {
            cluster: cluster.to_string(),
            path: dir,
        });
    }
    Ok(dir)
}

/// Plaintext target of a rendered document, before encryption
pub fn target_path(root: &Path, cluster: &str, namespace: &str, base_name: &str) -> PathBuf {
    cluster_dir(root, cluster)
        .join(SECRETS_DIR)
        .join(namespace)
        .join(base_name)
}

/// Encrypted counterpart of a target: `db.yaml` becomes `db.enc.yaml`
pub fn encrypted_path(target: &Path) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!("{stem}{ENCRYPTED_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_path() {
        let path = target_path(Path::new("/repo"), "production", "backend", "db.yaml");
        assert_eq!(
            path,
            PathBuf::from("/repo/clusters/production/secrets/backend/db.yaml")
        );
    }

    #[test]
    fn test_encrypted_path() {
        assert_eq!(
            encrypted_path(Path::new("secrets/backend/db.yaml")),
            PathBuf::from("secrets/backend/db.enc.yaml")
        );
        assert_eq!(
            encrypted_path(Path::new("secrets/backend/db.yml")),
            PathBuf::from("secrets/backend/db.enc.yaml")
        );
    }

    #[test]
    fn test_check_cluster_dir() {
        let root = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("clusters/production")).unwrap();
        std::fs::write(root.path().join("clusters/staging"), "not a dir").unwrap();

        assert!(check_cluster_dir(root.path(), "production").is_ok());

        let err = check_cluster_dir(root.path(), "staging").unwrap_err();
        assert!(matches!(err, EngineError::ClusterDirectory { ref cluster, .. } if cluster == "staging"));

        let err = check_cluster_dir(root.path(), "qa").unwrap_err();
        assert!(err.to_string().contains("clusters/qa"));

        for name in ["../production", "prod/eu", ".", ""] {
            let err = check_cluster_dir(root.path(), name).unwrap_err();
            assert!(matches!(err, EngineError::InvalidClusterName { .. }), "{name}");
        }
    }

    #[test]
    fn test_dns_labels() {
        for name in ["backend", "team-a", "ns1", "a"] {
            assert!(is_dns_label(name), "{name}");
        }
        for name in ["", "..", "../../etc", "a/b", "Backend", "-a", "a-", "a_b"] {
            assert!(!is_dns_label(name), "{name}");
        }
        assert!(is_dns_label(&"a".repeat(63)));
        assert!(!is_dns_label(&"a".repeat(64)));
    }
}
