use {
    crate::{
        async_::BgVal,
        js::{
            Env,
            Log,
            VecLog,
        },
        permissions::{
            PermissionResolution,
            ResolverEpoch,
        },
    },
    lunk::{
        EventGraph,
        Prim,
    },
    rooting::ScopeValue,
    shared::interface::shared::SessionInfo,
    std::{
        cell::{
            Cell,
            RefCell,
        },
        future::Future,
        rc::Rc,
    },
    wasm_bindgen_futures::spawn_local,
    web_sys::ServiceWorkerRegistration,
};

pub const LOCALSTORAGE_SESSION: &str = "session";

pub struct State_ {
    pub eg: EventGraph,
    pub env: Env,
    pub log: Rc<dyn Log>,
    pub log1: Rc<VecLog>,
    pub service_worker: BgVal<Result<ServiceWorkerRegistration, String>>,
    /// Consumed authentication state; `None` when unauthenticated.
    pub session: Prim<Option<SessionInfo>>,
    pub permissions: Prim<PermissionResolution>,
    pub resolver: ResolverEpoch,
    /// Handle for the in-flight permission fetch; replacing it drops (and so
    /// cancels) the previous attempt.
    pub permission_fetch: RefCell<Option<ScopeValue>>,
    pub logging_out: Cell<bool>,
}

thread_local!{
    pub static STATE: RefCell<Option<Rc<State_>>> = RefCell::new(None);
}

pub fn state() -> Rc<State_> {
    return STATE.with(|x| x.borrow().clone()).unwrap();
}

pub fn spawn_log(message: &'static str, f: impl Future<Output = Result<(), String>> + 'static) {
    spawn_local(async move {
        if let Err(e) = f.await {
            state().log.log(&format!("Error in background task [{}]: {}", message, e));
        }
    });
}
