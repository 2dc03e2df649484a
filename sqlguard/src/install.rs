//! Process-wide access control instance.

use std::sync::OnceLock;

use crate::boundary::IsolatedAccessControl;
use crate::config::AccessControlConfig;
use crate::error::InstallError;
use crate::registry::ImplementationRegistry;

static INSTALLED: OnceLock<IsolatedAccessControl> = OnceLock::new();

/// Build the configured implementation and make it the process-wide
/// instance. Only the first successful call installs anything.
pub fn install(
    config: &AccessControlConfig,
    registry: &ImplementationRegistry,
) -> Result<&'static IsolatedAccessControl, InstallError> {
    if INSTALLED.get().is_some() {
        return Err(InstallError::AlreadyInstalled);
    }

    let control = IsolatedAccessControl::new(config, registry)?;
    INSTALLED
        .set(control)
        .map_err(|_| InstallError::AlreadyInstalled)?;
    installed().ok_or(InstallError::AlreadyInstalled)
}

/// The installed instance, if `install` has succeeded.
pub fn installed() -> Option<&'static IsolatedAccessControl> {
    INSTALLED.get()
}
