use super::*;

/// Declared authorization requirement of an endpoint. Static per route,
/// evaluated per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Public,
    AnyAuthenticated,
    AdminOnly,
}

/// A refused access decision. `Unauthenticated` renders as 401 or a login
/// redirect depending on the route's failure style; `Forbidden` as 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deny {
    Unauthenticated,
    Forbidden,
}

/// Evaluates the access matrix for one request. Ownership checks are
/// downstream business logic; this only gates on presence and role.
pub fn authorize(identity: Option<&Identity>, policy: Policy) -> Result<(), Deny> {
    match (policy, identity) {
        (Policy::Public, _) => Ok(()),
        (Policy::AnyAuthenticated, Some(_)) => Ok(()),
        (Policy::AnyAuthenticated, None) => Err(Deny::Unauthenticated),
        (Policy::AdminOnly, Some(found)) if found.role().admin() => Ok(()),
        (Policy::AdminOnly, Some(_)) => Err(Deny::Forbidden),
        (Policy::AdminOnly, None) => Err(Deny::Unauthenticated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_core::ID;

    fn user() -> Identity {
        Identity::new(
            ID::from(1),
            "ada".to_string(),
            "ada@example.com".to_string(),
            Role::User,
        )
    }

    fn admin() -> Identity {
        Identity::new(
            ID::from(2),
            "root".to_string(),
            "root@example.com".to_string(),
            Role::Admin,
        )
    }

    #[test]
    fn public_allows_everyone() {
        assert_eq!(authorize(None, Policy::Public), Ok(()));
        assert_eq!(authorize(Some(&user()), Policy::Public), Ok(()));
        assert_eq!(authorize(Some(&admin()), Policy::Public), Ok(()));
    }

    #[test]
    fn any_authenticated_requires_identity() {
        assert_eq!(
            authorize(None, Policy::AnyAuthenticated),
            Err(Deny::Unauthenticated)
        );
        assert_eq!(authorize(Some(&user()), Policy::AnyAuthenticated), Ok(()));
        assert_eq!(authorize(Some(&admin()), Policy::AnyAuthenticated), Ok(()));
    }

    #[test]
    fn admin_only_distinguishes_deny_reasons() {
        assert_eq!(authorize(None, Policy::AdminOnly), Err(Deny::Unauthenticated));
        assert_eq!(authorize(Some(&user()), Policy::AdminOnly), Err(Deny::Forbidden));
        assert_eq!(authorize(Some(&admin()), Policy::AdminOnly), Ok(()));
    }
}
