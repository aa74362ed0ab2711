//! Permission model for image acquisition
//!
//! Camera capture needs the camera plus storage, gallery picking needs storage
//! only. Under the scoped storage policy storage access is implicit and is
//! never requested.

pub mod consent;

pub use consent::ConsentGate;

use serde::{Deserialize, Serialize};

use crate::capture::ImageSource;

/// A runtime permission the workflow may need
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Camera,
    Storage,
}

impl Permission {
    pub fn display_name(&self) -> &'static str {
        match self {
            Permission::Camera => "Camera",
            Permission::Storage => "Storage",
        }
    }
}

/// How the platform treats access to the user's image storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoragePolicy {
    /// Storage access is implicitly granted (current platforms)
    #[default]
    Scoped,
    /// Storage access must be granted explicitly
    Legacy,
}

impl StoragePolicy {
    /// Whether `Storage` has to be checked and requested at all
    pub fn requires_storage_permission(&self) -> bool {
        matches!(self, StoragePolicy::Legacy)
    }
}

/// Answer for a single permission in a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGrant {
    pub permission: Permission,
    pub granted: bool,
}

/// Permissions an image source needs under the given storage policy
pub fn required_permissions(source: ImageSource, policy: StoragePolicy) -> Vec<Permission> {
    let mut permissions = Vec::with_capacity(2);
    if source == ImageSource::Camera {
        permissions.push(Permission::Camera);
    }
    if policy.requires_storage_permission() {
        permissions.push(Permission::Storage);
    }
    permissions
}

/// Notice shown when the permissions for a source stay denied
pub fn denied_message(source: ImageSource) -> &'static str {
    match source {
        ImageSource::Camera => "Camera & Storage permission are required...",
        ImageSource::Gallery => "Storage permission is required...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_requires_camera_and_legacy_storage() {
        assert_eq!(
            required_permissions(ImageSource::Camera, StoragePolicy::Legacy),
            vec![Permission::Camera, Permission::Storage]
        );
        assert_eq!(
            required_permissions(ImageSource::Camera, StoragePolicy::Scoped),
            vec![Permission::Camera]
        );
    }

    #[test]
    fn test_gallery_needs_nothing_under_scoped_storage() {
        assert!(required_permissions(ImageSource::Gallery, StoragePolicy::Scoped).is_empty());
        assert_eq!(
            required_permissions(ImageSource::Gallery, StoragePolicy::Legacy),
            vec![Permission::Storage]
        );
    }

    #[test]
    fn test_permission_serializes_snake_case() {
        let json = serde_json::to_string(&Permission::Camera).unwrap();
        assert_eq!(json, "\"camera\"");
        let policy: StoragePolicy = serde_json::from_str("\"legacy\"").unwrap();
        assert_eq!(policy, StoragePolicy::Legacy);
    }
}
