//! Cluster profiles and profile resolution.

use serde::{Deserialize, Serialize};

use crate::cluster::{ClusterRef, ClusterType, JobStorage, THREADS_PROFILE_TYPE};
use crate::error::{ParalogError, Result};
use crate::ports::ClusterResolver;

/// A named cluster profile as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterProfile {
    /// Profile name.
    pub name: String,
    /// Cluster type tag, e.g. `Local` or `MJS`.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Job storage location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_storage: Option<JobStorage>,
}

impl ClusterProfile {
    /// Converts the profile into a cluster reference.
    ///
    /// Thread-based profiles are rejected with a dedicated error; any other
    /// unknown tag is an invalid cluster type.
    pub fn to_cluster(&self) -> Result<ClusterRef> {
        if self.type_tag.trim().eq_ignore_ascii_case(THREADS_PROFILE_TYPE) {
            return Err(ParalogError::ProfileKindNotSupported {
                profile: self.name.clone(),
                kind: THREADS_PROFILE_TYPE.to_string(),
            });
        }
        let cluster_type: ClusterType = self.type_tag.parse()?;
        let mut cluster = ClusterRef::new(cluster_type).with_profile(&self.name);
        cluster.job_storage = self.job_storage.clone();
        Ok(cluster)
    }
}

/// Profiles loaded from configuration, with an optional default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRegistry {
    profiles: Vec<ClusterProfile>,
    default_profile: Option<String>,
}

impl ProfileRegistry {
    /// Creates a registry.
    #[must_use]
    pub fn new(profiles: Vec<ClusterProfile>, default_profile: Option<String>) -> Self {
        Self {
            profiles,
            default_profile,
        }
    }

    /// All profiles in configuration order.
    #[must_use]
    pub fn profiles(&self) -> &[ClusterProfile] {
        &self.profiles
    }

    /// Name of the default profile.
    #[must_use]
    pub fn default_profile(&self) -> Option<&str> {
        self.default_profile.as_deref()
    }

    /// Looks a profile up by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClusterProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}

impl ClusterResolver for ProfileRegistry {
    fn resolve(&self, profile: Option<&str>) -> Result<ClusterRef> {
        let name = profile
            .or(self.default_profile.as_deref())
            .ok_or(ParalogError::NoDefaultProfile)?;
        self.get(name)
            .ok_or_else(|| ParalogError::ProfileNotFound(name.to_string()))?
            .to_cluster()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn registry() -> ProfileRegistry {
        let profiles: Vec<ClusterProfile> = serde_json::from_str(
            r#"[
                {"name": "Processes", "type": "Local", "job_storage": "/home/u/jobs"},
                {"name": "prod", "type": "MJS"},
                {"name": "hpc", "type": "HPCServer",
                 "job_storage": {"windows": "\\\\fs\\jobs", "unix": "/mnt/jobs"}},
                {"name": "Threads", "type": "Threads"},
                {"name": "k8s", "type": "Kubernetes"}
            ]"#,
        )
        .expect("profiles");
        ProfileRegistry::new(profiles, Some("Processes".to_string()))
    }

    #[test]
    fn resolves_named_and_default_profiles() {
        let reg = registry();

        let cluster = reg.resolve(Some("prod")).expect("prod");
        assert_eq!(cluster.cluster_type, ClusterType::Mjs);
        assert_eq!(cluster.profile.as_deref(), Some("prod"));

        let cluster = reg.resolve(None).expect("default");
        assert_eq!(cluster.cluster_type, ClusterType::Local);
        assert_eq!(
            cluster.job_storage,
            Some(JobStorage::Path(PathBuf::from("/home/u/jobs")))
        );
    }

    #[test]
    fn unknown_profile_not_found() {
        let err = registry().resolve(Some("missing")).unwrap_err();
        assert!(matches!(err, ParalogError::ProfileNotFound(ref n) if n == "missing"));
    }

    #[test]
    fn no_default_profile() {
        let reg = ProfileRegistry::new(Vec::new(), None);
        assert!(matches!(reg.resolve(None).unwrap_err(), ParalogError::NoDefaultProfile));
    }

    #[test]
    fn thread_profiles_translated() {
        let err = registry().resolve(Some("Threads")).unwrap_err();
        assert!(matches!(err, ParalogError::ProfileKindNotSupported { .. }));
    }

    #[test]
    fn unsupported_type_is_invalid_cluster_type() {
        let err = registry().resolve(Some("k8s")).unwrap_err();
        assert!(matches!(err, ParalogError::InvalidClusterType(ref t) if t == "Kubernetes"));
    }
}
