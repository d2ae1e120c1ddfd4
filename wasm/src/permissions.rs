use {
    crate::{
        api::req_post_json,
        state::state,
    },
    lunk::{
        link,
        ProcessingContext,
    },
    rooting::{
        scope_any,
        spawn_rooted,
        ScopeValue,
    },
    shared::interface::{
        shared::{
            default_role_permissions,
            PermissionKey,
            Role,
        },
        wire::c2s,
    },
    std::{
        cell::Cell,
        collections::HashSet,
        rc::Rc,
    },
};

/// Capability set for the current session. Membership lookup is synchronous
/// and the inner set is shared, so clones compare equal until the set is
/// actually replaced by a new resolution.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PermissionSet(Rc<HashSet<PermissionKey>>);

impl PermissionSet {
    pub fn new(keys: impl IntoIterator<Item = PermissionKey>) -> Self {
        return PermissionSet(Rc::new(keys.into_iter().collect()));
    }

    pub fn empty() -> Self {
        return PermissionSet(Rc::new(HashSet::new()));
    }

    pub fn has(&self, key: PermissionKey) -> bool {
        return self.0.contains(&key);
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        return PermissionSet::empty();
    }
}

/// Resolution lifecycle: `Idle` when unauthenticated, `Loading` while a fetch
/// for the current role is in flight (previous permissions already cleared),
/// then `Ready` with the fetched set or `Degraded` with the static per-role
/// defaults. No automatic retry out of `Degraded`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PermissionResolution {
    Idle,
    Loading,
    Ready(PermissionSet),
    Degraded(PermissionSet),
}

impl PermissionResolution {
    /// The effective capability set; empty until a resolution settles.
    pub fn permissions(&self) -> PermissionSet {
        match self {
            PermissionResolution::Idle | PermissionResolution::Loading => return PermissionSet::empty(),
            PermissionResolution::Ready(s) | PermissionResolution::Degraded(s) => return s.clone(),
        }
    }

    pub fn has(&self, key: PermissionKey) -> bool {
        match self {
            PermissionResolution::Idle | PermissionResolution::Loading => return false,
            PermissionResolution::Ready(s) | PermissionResolution::Degraded(s) => return s.has(key),
        }
    }
}

/// Generation counter arbitrating in-flight fetches against newer role
/// changes. Single UI thread, so a `Cell` is sufficient; an attempt records
/// the epoch when it begins and must re-check before committing.
pub struct ResolverEpoch(Cell<u64>);

impl ResolverEpoch {
    pub fn new() -> Self {
        return ResolverEpoch(Cell::new(0));
    }

    pub fn begin(&self) -> u64 {
        let epoch = self.0.get().wrapping_add(1);
        self.0.set(epoch);
        return epoch;
    }

    pub fn current(&self, epoch: u64) -> bool {
        return self.0.get() == epoch;
    }
}

pub fn resolution_from_fetch(role: Role, res: Result<Vec<PermissionKey>, String>) -> PermissionResolution {
    match res {
        Ok(keys) => return PermissionResolution::Ready(PermissionSet::new(keys)),
        Err(_) => return PermissionResolution::Degraded(
            PermissionSet::new(default_role_permissions(role).iter().copied()),
        ),
    }
}

async fn fetch_role_permissions(role: Role) -> Result<Vec<PermissionKey>, String> {
    return req_post_json(
        &state().env.base_url,
        c2s::PATH_ROLE_PERMISSIONS,
        &c2s::RolePermissionsGet { role: role },
    ).await;
}

/// Re-resolves permissions whenever the session role changes: clears the set
/// immediately, then commits the fetch result (or the default table on fetch
/// failure) only if no newer role change superseded it in the meantime.
pub fn setup_permission_resolver(pc: &mut ProcessingContext) -> ScopeValue {
    return scope_any(
        link!((pc = pc), (session = state().session.clone()), (permissions = state().permissions.clone()), () {
            let epoch = state().resolver.begin();
            let role = session.borrow().as_ref().map(|s| s.role);
            match role {
                None => {
                    *state().permission_fetch.borrow_mut() = None;
                    permissions.set(pc, PermissionResolution::Idle);
                },
                Some(role) => {
                    permissions.set(pc, PermissionResolution::Loading);
                    *state().permission_fetch.borrow_mut() = Some(scope_any(spawn_rooted(async move {
                        let res = fetch_role_permissions(role).await;
                        if let Err(e) = &res {
                            state()
                                .log
                                .log(
                                    &format!(
                                        "Error fetching permissions for role [{:?}], using defaults: {}",
                                        role,
                                        e
                                    ),
                                );
                        }
                        let resolution = resolution_from_fetch(role, res);
                        if !state().resolver.current(epoch) {
                            // A newer role change superseded this attempt
                            return;
                        }
                        state().eg.event(|pc| {
                            state().permissions.set(pc, resolution);
                        });
                    })));
                },
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::cell::RefCell,
    };

    #[test]
    fn test_permission_set_membership() {
        let s = PermissionSet::new([PermissionKey::TicketView, PermissionKey::TicketClose]);
        assert!(s.has(PermissionKey::TicketView));
        assert!(!s.has(PermissionKey::UserManage));
        assert!(!PermissionSet::empty().has(PermissionKey::TicketView));
    }

    #[test]
    fn test_set_identity_stable_across_clones() {
        let s = PermissionSet::new([PermissionKey::TicketView]);
        let s2 = s.clone();
        assert_eq!(s, s2);
        assert!(s2.has(PermissionKey::TicketView));
    }

    #[test]
    fn test_fetch_success_is_exact() {
        let got = resolution_from_fetch(Role::User, Ok(vec![PermissionKey::ReportView]));
        assert_eq!(got, PermissionResolution::Ready(PermissionSet::new([PermissionKey::ReportView])));
        assert!(got.has(PermissionKey::ReportView));
        assert!(!got.has(PermissionKey::TicketView));
    }

    #[test]
    fn test_fetch_failure_degrades_to_defaults() {
        let got = resolution_from_fetch(Role::Agent, Err("server unreachable".to_string()));
        let want = PermissionSet::new(default_role_permissions(Role::Agent).iter().copied());
        assert_eq!(got, PermissionResolution::Degraded(want));
    }

    #[test]
    fn test_unsettled_resolutions_expose_empty_set() {
        assert_eq!(PermissionResolution::Idle.permissions(), PermissionSet::empty());
        assert_eq!(PermissionResolution::Loading.permissions(), PermissionSet::empty());
        assert!(!PermissionResolution::Loading.has(PermissionKey::TicketView));
    }

    #[test]
    fn test_epoch_rejects_stale_attempt() {
        let epoch = ResolverEpoch::new();
        let e1 = epoch.begin();
        assert!(epoch.current(e1));
        let e2 = epoch.begin();
        assert!(!epoch.current(e1));
        assert!(epoch.current(e2));
    }

    #[test]
    fn test_latest_role_wins_when_results_arrive_out_of_order() {
        let epoch = ResolverEpoch::new();
        let settled = RefCell::new(PermissionResolution::Idle);
        let commit = |attempt: u64, resolution: PermissionResolution| {
            if epoch.current(attempt) {
                *settled.borrow_mut() = resolution;
            }
        };

        // Role changes to admin before the user fetch returns; the user result
        // arrives last but must not land.
        let user_attempt = epoch.begin();
        let admin_attempt = epoch.begin();
        commit(admin_attempt, resolution_from_fetch(Role::Admin, Err("timeout".to_string())));
        commit(user_attempt, resolution_from_fetch(Role::User, Ok(vec![PermissionKey::TicketView])));
        let got = settled.borrow();
        assert_eq!(
            *got,
            PermissionResolution::Degraded(
                PermissionSet::new(default_role_permissions(Role::Admin).iter().copied()),
            ),
        );
        assert!(got.has(PermissionKey::UserManage));
    }
}
