use {
    crate::{
        api::req_post,
        state::{
            state,
            LOCALSTORAGE_SESSION,
        },
    },
    gloo::{
        events::EventListener,
        storage::{
            LocalStorage,
            Storage,
        },
        timers::callback::Interval,
        utils::window,
    },
    jiff::Timestamp,
    shared::interface::wire::c2s,
    std::{
        cell::Cell,
        rc::Rc,
    },
};

/// Interactions that count as user activity.
pub const ACTIVITY_EVENTS: &[&str] = &["pointerdown", "pointermove", "keydown", "scroll", "touchstart"];
pub const ACTIVITY_CHECK_INTERVAL_MS: u32 = 60 * 1000;
pub const INACTIVITY_LOGOUT_SECS: i64 = 30 * 60;

pub fn should_force_logout(last_activity: Timestamp, now: Timestamp) -> bool {
    return now.duration_since(last_activity).as_secs() > INACTIVITY_LOGOUT_SECS;
}

/// Watches for user inactivity and forces a logout once the threshold is
/// exceeded. Listeners and the polling timer are owned values; dropping the
/// watcher detaches all of them. The activity clock is not persisted, so a
/// reload starts it fresh.
pub struct ActivityWatcher {
    _listeners: Vec<EventListener>,
    _check: Interval,
}

pub fn build_activity_watcher() -> ActivityWatcher {
    let last_activity = Rc::new(Cell::new(Timestamp::now()));
    let mut listeners = vec![];
    for event in ACTIVITY_EVENTS {
        listeners.push(EventListener::new(&window(), *event, {
            let last_activity = last_activity.clone();
            move |_ev| {
                last_activity.set(Timestamp::now());
            }
        }));
    }
    let check = Interval::new(ACTIVITY_CHECK_INTERVAL_MS, {
        let last_activity = last_activity.clone();
        move || {
            if should_force_logout(last_activity.get(), Timestamp::now()) {
                logout();
            }
        }
    });
    return ActivityWatcher {
        _listeners: listeners,
        _check: check,
    };
}

/// A logout may begin only when there is a session to end and no logout is
/// already in flight. Repeat triggers (further watcher ticks, a concurrent
/// manual logout) collapse into the in-flight one.
pub fn should_begin_logout(already_in_flight: bool, authenticated: bool) -> bool {
    return !already_in_flight && authenticated;
}

/// Ends the current session. Idempotent: repeat triggers while a logout is in
/// flight, or with no session at all, do nothing. The local session is
/// dropped even if the server call fails; a client that can't reach the
/// server must still lose its authenticated state.
pub fn logout() {
    let state1 = state();
    if !should_begin_logout(state1.logging_out.get(), state1.session.borrow().is_some()) {
        return;
    }
    state1.logging_out.set(true);
    crate::state::spawn_log("Logging out", async move {
        let res = req_post(&state().env.base_url, c2s::PATH_LOGOUT, &c2s::Logout {}).await;
        LocalStorage::delete(LOCALSTORAGE_SESSION);
        state().eg.event(|pc| {
            state().session.set(pc, None);
        });
        state().logging_out.set(false);
        return res;
    });
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        jiff::SignedDuration,
    };

    #[test]
    fn test_no_logout_before_threshold() {
        let t0 = Timestamp::UNIX_EPOCH;
        let now = t0.checked_add(SignedDuration::from_secs(29 * 60)).unwrap();
        assert!(!should_force_logout(t0, now));
    }

    #[test]
    fn test_no_logout_at_exact_threshold() {
        let t0 = Timestamp::UNIX_EPOCH;
        let now = t0.checked_add(SignedDuration::from_secs(INACTIVITY_LOGOUT_SECS)).unwrap();
        assert!(!should_force_logout(t0, now));
    }

    #[test]
    fn test_logout_past_threshold() {
        let t0 = Timestamp::UNIX_EPOCH;

        // First 60s poll tick past the threshold
        let now = t0.checked_add(SignedDuration::from_secs(31 * 60)).unwrap();
        assert!(should_force_logout(t0, now));
    }

    #[test]
    fn test_one_logout_per_violation() {
        let mut in_flight = false;
        let mut session = true;

        // Several violating poll ticks arrive while the first logout is still
        // talking to the server; only the first may start one
        let mut begun = 0;
        for _ in 0..3 {
            if should_begin_logout(in_flight, session) {
                in_flight = true;
                begun += 1;
            }
        }
        assert_eq!(begun, 1);

        // Logout settles: session gone, flag cleared; later ticks have nothing
        // left to end
        in_flight = false;
        session = false;
        assert!(!should_begin_logout(in_flight, session));
    }

    #[test]
    fn test_logout_requires_a_session() {
        assert!(should_begin_logout(false, true));
        assert!(!should_begin_logout(false, false));
        assert!(!should_begin_logout(true, true));
    }

    #[test]
    fn test_activity_resets_the_clock() {
        let t0 = Timestamp::UNIX_EPOCH;
        let touched = t0.checked_add(SignedDuration::from_secs(25 * 60)).unwrap();
        let now = t0.checked_add(SignedDuration::from_secs(40 * 60)).unwrap();
        assert!(should_force_logout(t0, now));
        assert!(!should_force_logout(touched, now));
    }
}
