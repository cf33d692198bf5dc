//! Scoped resource access
//!
//! Sandboxed environments hand out temporary read grants for user-picked
//! files. A grant is taken and released inside a single ingest iteration.

use std::path::Path;

/// Platform hook for temporary access grants.
pub trait AccessScope {
    /// Requests access to `path`. Returns `false` when the grant is refused.
    fn start(&self, path: &Path) -> bool;

    /// Releases a grant previously obtained with [`AccessScope::start`].
    fn stop(&self, path: &Path);
}

/// No sandbox: every request is granted and release is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsandboxed;

impl AccessScope for Unsandboxed {
    fn start(&self, _path: &Path) -> bool {
        true
    }

    fn stop(&self, _path: &Path) {}
}

/// A held grant. Released on drop.
#[must_use = "access is released as soon as the guard is dropped"]
pub struct ScopedAccess<'a> {
    scope: &'a dyn AccessScope,
    path: &'a Path,
}

impl<'a> ScopedAccess<'a> {
    /// Acquires a grant, or `None` when the scope refuses it.
    pub fn acquire(scope: &'a dyn AccessScope, path: &'a Path) -> Option<Self> {
        scope.start(path).then(|| Self { scope, path })
    }
}

impl Drop for ScopedAccess<'_> {
    fn drop(&mut self) {
        self.scope.stop(self.path);
    }
}
