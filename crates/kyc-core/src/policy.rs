//! # Route-Access Policy
//!
//! Maps each [`Role`] to the ordered list of path prefixes it may open.
//! The first prefix is the role's default landing path: where a caller is
//! sent after signing in, and where they are sent back to when they stray
//! outside their scope.
//!
//! ## Invariants
//!
//! Enforced by [`RouteAccessPolicy::new`], so they hold for every value of
//! the type:
//!
//! - every role in [`Role::ALL`] has an entry;
//! - every entry is non-empty, hence every role has a landing path;
//! - every prefix is absolute.
//!
//! Since the landing path is itself one of the role's prefixes, a caller is
//! always allowed onto their own landing page.

use std::collections::BTreeMap;

use crate::error::PolicyError;
use crate::role::Role;
use crate::route::path_has_prefix;

/// Immutable role → allowed-prefixes table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAccessPolicy {
    table: BTreeMap<Role, Vec<String>>,
}

impl RouteAccessPolicy {
    /// Build and validate a policy.
    ///
    /// Later entries for the same role replace earlier ones.
    pub fn new<I, P, S>(entries: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (Role, P)>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table: BTreeMap<Role, Vec<String>> = entries
            .into_iter()
            .map(|(role, prefixes)| (role, prefixes.into_iter().map(Into::into).collect()))
            .collect();

        for role in Role::ALL {
            let prefixes = table.get(&role).ok_or(PolicyError::MissingRole(role))?;
            if prefixes.is_empty() {
                return Err(PolicyError::EmptyPrefixes(role));
            }
            if let Some(bad) = prefixes.iter().find(|p| !p.starts_with('/')) {
                return Err(PolicyError::RelativePrefix {
                    role,
                    prefix: bad.clone(),
                });
            }
        }

        Ok(Self { table })
    }

    /// The portal's compiled-in policy.
    pub fn standard() -> Self {
        Self {
            table: standard_table(),
        }
    }

    /// Prefixes the role may open, landing path first.
    pub fn allowed_prefixes(&self, role: Role) -> &[String] {
        self.table.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The role's default landing path.
    pub fn default_path(&self, role: Role) -> &str {
        self.allowed_prefixes(role)
            .first()
            .map(String::as_str)
            .unwrap_or("/")
    }

    /// Whether `role` may open `path`.
    pub fn is_allowed(&self, role: Role, path: &str) -> bool {
        self.allowed_prefixes(role)
            .iter()
            .any(|prefix| path_has_prefix(path, prefix))
    }
}

impl Default for RouteAccessPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_table() -> BTreeMap<Role, Vec<String>> {
    let entry = |role: Role, prefixes: &[&str]| {
        (
            role,
            prefixes.iter().map(|p| (*p).to_string()).collect::<Vec<_>>(),
        )
    };
    BTreeMap::from([
        entry(
            Role::Superadmin,
            &[
                "/dashboard/superadmin",
                "/admin",
                "/tenants",
                "/cases",
                "/documents",
                "/screening",
                "/review",
                "/reports",
                "/settings",
            ],
        ),
        entry(
            Role::Admin,
            &[
                "/dashboard/admin",
                "/admin/users",
                "/cases",
                "/documents",
                "/screening",
                "/review",
                "/reports",
                "/settings",
            ],
        ),
        entry(
            Role::Reviewer,
            &["/dashboard/reviewer", "/review", "/cases", "/documents"],
        ),
        entry(
            Role::Analyst,
            &["/dashboard/analyst", "/cases", "/documents", "/screening"],
        ),
        entry(
            Role::RelationshipManager,
            &[
                "/dashboard/relationship-manager",
                "/clients",
                "/cases",
                "/documents",
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn standard_policy_passes_validation() {
        let standard = RouteAccessPolicy::standard();
        let rebuilt = RouteAccessPolicy::new(
            Role::ALL.map(|r| (r, standard.allowed_prefixes(r).to_vec())),
        )
        .unwrap();
        assert_eq!(rebuilt, standard);
    }

    #[test]
    fn analyst_scope() {
        let policy = RouteAccessPolicy::standard();
        assert_eq!(
            policy.allowed_prefixes(Role::Analyst),
            ["/dashboard/analyst", "/cases", "/documents", "/screening"]
        );
        assert!(policy.is_allowed(Role::Analyst, "/screening/alerts"));
        assert!(!policy.is_allowed(Role::Analyst, "/admin/tenants"));
        assert_eq!(policy.default_path(Role::Analyst), "/dashboard/analyst");
    }

    #[test]
    fn admin_cannot_reach_tenant_administration() {
        let policy = RouteAccessPolicy::standard();
        assert!(policy.is_allowed(Role::Admin, "/admin/users/7"));
        assert!(!policy.is_allowed(Role::Admin, "/admin/tenants"));
        assert!(policy.is_allowed(Role::Superadmin, "/admin/tenants"));
    }

    #[test]
    fn no_role_may_open_another_roles_dashboard() {
        let policy = RouteAccessPolicy::standard();
        for role in Role::ALL {
            for other in Role::ALL.into_iter().filter(|o| *o != role) {
                assert!(
                    !policy.is_allowed(role, policy.default_path(other)),
                    "{role} reached {other}'s landing page"
                );
            }
        }
    }

    #[test]
    fn missing_role_rejected() {
        let err = RouteAccessPolicy::new([(Role::Analyst, vec!["/dashboard/analyst"])])
            .unwrap_err();
        assert!(matches!(err, PolicyError::MissingRole(_)));
    }

    #[test]
    fn empty_prefix_list_rejected() {
        let entries = Role::ALL.map(|r| {
            let prefixes: Vec<&str> = if r == Role::Reviewer {
                vec![]
            } else {
                vec!["/home"]
            };
            (r, prefixes)
        });
        assert_eq!(
            RouteAccessPolicy::new(entries).unwrap_err(),
            PolicyError::EmptyPrefixes(Role::Reviewer)
        );
    }

    #[test]
    fn relative_prefix_rejected() {
        let entries = Role::ALL.map(|r| {
            let prefixes = if r == Role::Admin {
                vec!["/dashboard/admin", "cases"]
            } else {
                vec!["/home"]
            };
            (r, prefixes)
        });
        assert_eq!(
            RouteAccessPolicy::new(entries).unwrap_err(),
            PolicyError::RelativePrefix {
                role: Role::Admin,
                prefix: "cases".into()
            }
        );
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn landing_path_and_below_always_allowed(
            role in any_role(),
            tail in "(/[a-z0-9-]{1,12}){0,3}",
        ) {
            let policy = RouteAccessPolicy::standard();
            let path = format!("{}{}", policy.default_path(role), tail);
            prop_assert!(policy.is_allowed(role, &path));
        }

        #[test]
        fn unknown_sections_never_allowed(
            role in any_role(),
            section in "x[a-z]{0,10}",
            tail in "(/[a-z0-9]{1,8}){0,2}",
        ) {
            let policy = RouteAccessPolicy::standard();
            let path = format!("/{section}{tail}");
            prop_assert!(!policy.is_allowed(role, &path));
        }

        #[test]
        fn allowed_iff_under_some_prefix(
            role in any_role(),
            path in "(/(cases|documents|review|admin|screening|clients|dashboard|reports|x)){1,3}",
        ) {
            let policy = RouteAccessPolicy::standard();
            let expected = policy
                .allowed_prefixes(role)
                .iter()
                .any(|p| path == *p || path.starts_with(&format!("{p}/")));
            prop_assert_eq!(policy.is_allowed(role, &path), expected);
        }
    }
}
