// SPDX-License-Identifier: GPL-3.0-only

//! Permission gate
//!
//! Camera/microphone access gates capture entirely. Storage access is only
//! needed when saving to the gallery and is requested on demand.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Permissions the session consults before capturing or saving
pub trait PermissionGate: Send + Sync {
    fn has_camera_and_mic(&self) -> bool;

    fn has_storage(&self) -> bool;

    /// Ask for storage access, resolving to whether it was granted
    fn request_storage(&self) -> BoxFuture<'static, bool>;
}

/// Desktop permission gate
///
/// Desktop sessions have no runtime permission prompts: capture is allowed
/// whenever a device exists, and storage is granted once the gallery
/// directory exists and is writable.
#[derive(Debug, Clone)]
pub struct DesktopPermissions {
    gallery_dir: PathBuf,
    storage_granted: Arc<AtomicBool>,
}

impl DesktopPermissions {
    pub fn new(gallery_dir: PathBuf) -> Self {
        Self {
            gallery_dir,
            storage_granted: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl PermissionGate for DesktopPermissions {
    fn has_camera_and_mic(&self) -> bool {
        true
    }

    fn has_storage(&self) -> bool {
        self.storage_granted.load(Ordering::Acquire)
    }

    fn request_storage(&self) -> BoxFuture<'static, bool> {
        let dir = self.gallery_dir.clone();
        let granted = Arc::clone(&self.storage_granted);
        async move {
            let writable = match tokio::fs::create_dir_all(&dir).await {
                Ok(()) => tokio::fs::metadata(&dir)
                    .await
                    .map(|meta| meta.is_dir() && !meta.permissions().readonly())
                    .unwrap_or(false),
                Err(err) => {
                    warn!(path = %dir.display(), error = %err, "Cannot create gallery directory");
                    false
                }
            };
            granted.store(writable, Ordering::Release);
            info!(path = %dir.display(), granted = writable, "Storage permission resolved");
            writable
        }
        .boxed()
    }
}

/// Fixed answers, for headless runs and tests
#[derive(Debug)]
pub struct StaticPermissions {
    pub camera_and_mic: bool,
    storage: AtomicBool,
    grant_on_request: bool,
}

impl StaticPermissions {
    pub fn new(camera_and_mic: bool, storage: bool, grant_on_request: bool) -> Self {
        Self {
            camera_and_mic,
            storage: AtomicBool::new(storage),
            grant_on_request,
        }
    }

    pub fn all_granted() -> Self {
        Self::new(true, true, true)
    }
}

impl PermissionGate for StaticPermissions {
    fn has_camera_and_mic(&self) -> bool {
        self.camera_and_mic
    }

    fn has_storage(&self) -> bool {
        self.storage.load(Ordering::Acquire)
    }

    fn request_storage(&self) -> BoxFuture<'static, bool> {
        if self.grant_on_request {
            self.storage.store(true, Ordering::Release);
        }
        futures::future::ready(self.grant_on_request).boxed()
    }
}
