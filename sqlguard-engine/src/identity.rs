//! Requester identity resolution.

use std::fmt;
use std::sync::Arc;

use crate::error::GroupLookupError;
use crate::resource::Resource;
use crate::types::{AccessRequest, AccessType, Identity, SecurityContext};

/// External identity-group service.
pub trait GroupResolver: Send + Sync {
    fn groups_for(&self, user: &str) -> Result<Vec<String>, GroupLookupError>;
}

/// How the requester's groups are determined.
#[derive(Clone, Default)]
pub enum IdentityResolver {
    /// Use the groups carried in the security context.
    #[default]
    Direct,
    /// Replace the supplied groups with the ones the group service reports.
    GroupLookup(Arc<dyn GroupResolver>),
}

impl IdentityResolver {
    pub fn resolve(&self, context: &SecurityContext) -> Result<Identity, GroupLookupError> {
        match self {
            IdentityResolver::Direct => Ok(context.identity.clone()),
            IdentityResolver::GroupLookup(resolver) => {
                let user = context.user();
                let groups = resolver.groups_for(user)?;
                Ok(Identity::with_groups(user, groups))
            }
        }
    }

    /// Build a fresh request for `resource` on behalf of the caller.
    pub fn request(
        &self,
        resource: Resource,
        context: &SecurityContext,
        access_type: AccessType,
    ) -> Result<AccessRequest, GroupLookupError> {
        let identity = self.resolve(context)?;
        Ok(AccessRequest::new(resource, access_type, identity))
    }
}

impl fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityResolver::Direct => f.write_str("Direct"),
            IdentityResolver::GroupLookup(_) => f.write_str("GroupLookup"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticGroups(Vec<String>);

    impl GroupResolver for StaticGroups {
        fn groups_for(&self, _user: &str) -> Result<Vec<String>, GroupLookupError> {
            Ok(self.0.clone())
        }
    }

    struct Unreachable;

    impl GroupResolver for Unreachable {
        fn groups_for(&self, user: &str) -> Result<Vec<String>, GroupLookupError> {
            Err(GroupLookupError {
                user: user.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    fn context() -> SecurityContext {
        SecurityContext::new(Identity::with_groups("alice", ["supplied"]))
    }

    #[test]
    fn test_direct_uses_supplied_groups() {
        let identity = IdentityResolver::Direct.resolve(&context()).unwrap();
        assert_eq!(identity, Identity::with_groups("alice", ["supplied"]));
    }

    #[test]
    fn test_lookup_overrides_supplied_groups() {
        let resolver = IdentityResolver::GroupLookup(Arc::new(StaticGroups(vec![
            "etl".to_string(),
            "analysts".to_string(),
        ])));
        let identity = resolver.resolve(&context()).unwrap();
        assert_eq!(identity.user, "alice");
        assert!(!identity.groups.contains("supplied"));
        assert!(identity.groups.contains("etl"));
        assert!(identity.groups.contains("analysts"));
    }

    #[test]
    fn test_empty_lookup_means_no_groups() {
        let resolver = IdentityResolver::GroupLookup(Arc::new(StaticGroups(Vec::new())));
        let identity = resolver.resolve(&context()).unwrap();
        assert!(identity.groups.is_empty());
    }

    #[test]
    fn test_lookup_failure_propagates() {
        let resolver = IdentityResolver::GroupLookup(Arc::new(Unreachable));
        let err = resolver
            .request(Resource::catalog("hive"), &context(), AccessType::Use)
            .unwrap_err();
        assert_eq!(err.user, "alice");
    }
}
