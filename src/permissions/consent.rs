//! Consent-dialog permission gate
//!
//! Grants live in memory for the lifetime of the gate. A request parks a
//! pending consent prompt that the workflow screen renders; the request
//! resolves when the user answers or the prompt is dismissed.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use tokio::sync::oneshot;
use tracing::{debug, info};

use super::{Permission, PermissionGrant, StoragePolicy};
use crate::workflow::collaborators::PermissionGate;
use crate::workflow::events::RepaintHook;

struct PendingConsent {
    permissions: Vec<Permission>,
    responder: oneshot::Sender<bool>,
}

/// Permission gate backed by an in-app consent prompt
pub struct ConsentGate {
    policy: StoragePolicy,
    granted: RwLock<HashSet<Permission>>,
    pending: Mutex<Option<PendingConsent>>,
    repaint: Mutex<Option<RepaintHook>>,
}

impl ConsentGate {
    /// Create a gate with an initial set of granted permissions
    pub fn new(policy: StoragePolicy, granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            policy,
            granted: RwLock::new(granted.into_iter().collect()),
            pending: Mutex::new(None),
            repaint: Mutex::new(None),
        }
    }

    /// Hook called when a new prompt needs to be drawn
    pub fn set_repaint_hook(&self, hook: RepaintHook) {
        *self.repaint.lock() = Some(hook);
    }

    /// Permissions of the prompt currently awaiting an answer
    pub fn pending_request(&self) -> Option<Vec<Permission>> {
        self.pending.lock().as_ref().map(|p| p.permissions.clone())
    }

    /// Answer the pending prompt
    pub fn answer(&self, allow: bool) {
        let Some(pending) = self.pending.lock().take() else {
            return;
        };
        info!("Consent for {:?}: {}", pending.permissions, if allow { "allowed" } else { "denied" });
        if allow {
            self.granted.write().extend(pending.permissions.iter().copied());
        }
        let _ = pending.responder.send(allow);
    }

    /// Close the pending prompt without an answer
    pub fn dismiss(&self) {
        if self.pending.lock().take().is_some() {
            debug!("Consent prompt dismissed");
        }
    }

    /// Currently granted permissions
    pub fn granted(&self) -> Vec<Permission> {
        self.granted.read().iter().copied().collect()
    }
}

#[async_trait]
impl PermissionGate for ConsentGate {
    fn is_granted(&self, permission: Permission) -> bool {
        if permission == Permission::Storage && !self.policy.requires_storage_permission() {
            return true;
        }
        self.granted.read().contains(&permission)
    }

    async fn request(&self, permissions: &[Permission]) -> Vec<PermissionGrant> {
        let (responder, answer) = oneshot::channel();
        {
            let mut pending = self.pending.lock();
            // A newer prompt replaces an unanswered one; the older request resolves as dismissed
            *pending = Some(PendingConsent {
                permissions: permissions.to_vec(),
                responder,
            });
        }
        if let Some(hook) = self.repaint.lock().as_ref() {
            hook();
        }

        match answer.await {
            Ok(_) => permissions
                .iter()
                .map(|&permission| PermissionGrant {
                    permission,
                    granted: self.is_granted(permission),
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}
