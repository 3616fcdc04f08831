//! Camera permission handling.

/// Trait implemented by the platform's camera permission prompt.
pub trait PermissionGate {
    fn has_permission(&mut self) -> bool;

    /// Asks the user for camera access. Returns whether it was granted.
    fn request_permission(&mut self) -> bool;
}

impl<G: PermissionGate + ?Sized> PermissionGate for Box<G> {
    fn has_permission(&mut self) -> bool {
        (**self).has_permission()
    }

    fn request_permission(&mut self) -> bool {
        (**self).request_permission()
    }
}

/// A [`PermissionGate`] with a fixed answer.
///
/// When `grant_on_request` is set, a denied permission is granted by the first request.
#[derive(Debug, Clone, Default)]
pub struct StaticPermission {
    granted: bool,
    grant_on_request: bool,
    requests: u32,
}

impl StaticPermission {
    pub fn granted() -> Self {
        Self {
            granted: true,
            ..Self::default()
        }
    }

    pub fn denied() -> Self {
        Self::default()
    }

    pub fn grant_on_request(mut self) -> Self {
        self.grant_on_request = true;
        self
    }

    /// Returns how often [`PermissionGate::request_permission`] was called.
    pub fn requests(&self) -> u32 {
        self.requests
    }
}

impl PermissionGate for StaticPermission {
    fn has_permission(&mut self) -> bool {
        self.granted
    }

    fn request_permission(&mut self) -> bool {
        self.requests += 1;
        if self.grant_on_request {
            self.granted = true;
        }
        self.granted
    }
}
