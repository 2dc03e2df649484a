//! Process-wide installation. Kept in its own test binary so the global
//! instance starts out empty.

mod common;

use std::sync::{Arc, Mutex};

use sqlguard::{AccessControlConfig, ImplementationRegistry, InstallError};

use common::{alice, scripted_config, scripted_registry, Behavior, Seen, SCRIPTED};

#[test]
fn test_install_once() {
    assert!(sqlguard::installed().is_none());

    // A failed install leaves nothing behind.
    let err = sqlguard::install(
        &AccessControlConfig::default(),
        &ImplementationRegistry::new(),
    )
    .unwrap_err();
    assert!(matches!(err, InstallError::UnknownImplementation(_)));
    assert!(sqlguard::installed().is_none());

    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let registry = scripted_registry(Behavior::Allow, &seen);
    let control = sqlguard::install(&scripted_config(), &registry).unwrap();
    assert_eq!(control.implementation(), SCRIPTED);

    let shared = sqlguard::installed().unwrap();
    assert!(std::ptr::eq(control, shared));
    assert!(shared.check_can_access_catalog(&alice(), "hive").is_ok());
    assert_eq!(seen.lock().unwrap().len(), 1);

    let err = sqlguard::install(&scripted_config(), &registry).unwrap_err();
    assert!(matches!(err, InstallError::AlreadyInstalled));
}
