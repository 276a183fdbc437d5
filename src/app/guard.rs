//! Route Guard
//!
//! Pure decision for one navigation attempt. Checks run in order: authentication,
//! then the route's capability requirement, then allow. Denials are not remembered;
//! a user who gains a capability has to navigate again.

use crate::app::routes::Route;
use crate::auth::{AuthStatus, Capability, CapabilitySet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Where a user without the required capability is sent
pub fn fallback_route(caps: CapabilitySet) -> Route {
    if caps.contains(Capability::CanViewBusiness) {
        Route::BusinessOverview
    } else if caps.contains(Capability::CanViewOps) {
        Route::OpsFleet
    } else {
        Route::Login
    }
}

pub fn guard(status: AuthStatus, caps: CapabilitySet, route: &Route) -> GuardDecision {
    let authenticated = status == AuthStatus::Authenticated;

    if *route == Route::Login {
        return if authenticated {
            GuardDecision::Redirect(Route::BusinessOverview)
        } else {
            GuardDecision::Allow
        };
    }

    if route.is_protected() && !authenticated {
        return GuardDecision::Redirect(Route::Login);
    }

    if *route == Route::Root {
        return GuardDecision::Redirect(Route::BusinessOverview);
    }

    if let Some(required) = route.required_capability()
        && !caps.contains(required)
    {
        return GuardDecision::Redirect(fallback_route(caps));
    }

    GuardDecision::Allow
}

/// Follow redirects to the route that will actually render
pub fn settle(status: AuthStatus, caps: CapabilitySet, route: Route) -> Route {
    let mut current = route;
    // Redirect chains are at most three hops (protected → login → overview).
    for _ in 0..4 {
        match guard(status, caps, &current) {
            GuardDecision::Allow => return current,
            GuardDecision::Redirect(next) if next == current => return current,
            GuardDecision::Redirect(next) => current = next,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Persona, capabilities_of};

    fn caps(persona: Persona) -> CapabilitySet {
        capabilities_of(persona)
    }

    #[test]
    fn test_anonymous_redirected_to_login() {
        let decision = guard(AuthStatus::Anonymous, caps(Persona::Engineer), &Route::EngDevices);
        assert_eq!(decision, GuardDecision::Redirect(Route::Login));
        assert_eq!(
            guard(AuthStatus::Anonymous, caps(Persona::CustomerAdmin), &Route::Profile),
            GuardDecision::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_customer_admin_bounced_from_engineering() {
        let decision = guard(
            AuthStatus::Authenticated,
            caps(Persona::CustomerAdmin),
            &Route::EngDevices,
        );
        assert_eq!(decision, GuardDecision::Redirect(Route::BusinessOverview));
    }

    #[test]
    fn test_engineer_allowed() {
        for route in [
            Route::EngDevices,
            Route::EngFirmware,
            Route::EngDevice("dev-1".into()),
        ] {
            assert_eq!(
                guard(AuthStatus::Authenticated, caps(Persona::Engineer), &route),
                GuardDecision::Allow
            );
        }
    }

    #[test]
    fn test_fallback_priority() {
        assert_eq!(fallback_route(caps(Persona::InternalOps)), Route::BusinessOverview);
        let ops_only = CapabilitySet::from_slice(&[Capability::CanViewOps]);
        assert_eq!(fallback_route(ops_only), Route::OpsFleet);
        assert_eq!(fallback_route(CapabilitySet::empty()), Route::Login);
        assert_eq!(
            guard(AuthStatus::Authenticated, ops_only, &Route::EngFirmware),
            GuardDecision::Redirect(Route::OpsFleet)
        );
    }

    #[test]
    fn test_root_and_login_redirects() {
        let admin = caps(Persona::CustomerAdmin);
        assert_eq!(
            guard(AuthStatus::Authenticated, admin, &Route::Root),
            GuardDecision::Redirect(Route::BusinessOverview)
        );
        assert_eq!(
            guard(AuthStatus::Anonymous, admin, &Route::Root),
            GuardDecision::Redirect(Route::Login)
        );
        assert_eq!(
            guard(AuthStatus::Anonymous, admin, &Route::Login),
            GuardDecision::Allow
        );
        assert_eq!(
            guard(AuthStatus::Authenticated, admin, &Route::Login),
            GuardDecision::Redirect(Route::BusinessOverview)
        );
    }

    #[test]
    fn test_settle_follows_chain() {
        let admin = caps(Persona::CustomerAdmin);
        assert_eq!(
            settle(AuthStatus::Authenticated, admin, Route::Root),
            Route::BusinessOverview
        );
        assert_eq!(
            settle(AuthStatus::Anonymous, admin, Route::EngFirmware),
            Route::Login
        );
        // No capabilities: fallback is login, which bounces a signed-in user to overview
        assert_eq!(
            settle(AuthStatus::Authenticated, CapabilitySet::empty(), Route::EngFirmware),
            Route::BusinessOverview
        );
    }
}
