use {
    gloo::{
        storage::{
            LocalStorage,
            Storage,
        },
        utils::window,
    },
    lunk::{
        EventGraph,
        Prim,
    },
    rooting::{
        el,
        scope_any,
        set_root,
    },
    shared::interface::shared::SessionInfo,
    std::{
        cell::{
            Cell,
            RefCell,
        },
        panic,
        rc::Rc,
    },
    wasm::{
        async_::bg_val,
        js::{
            scan_env,
            Log,
            LogJsErr,
            VecLog,
        },
        permissions::{
            setup_permission_resolver,
            PermissionResolution,
            ResolverEpoch,
        },
        session::build_activity_watcher,
        state::{
            state,
            State_,
            LOCALSTORAGE_SESSION,
            STATE,
        },
    },
    wasm_bindgen::JsCast,
    wasm_bindgen_futures::{
        spawn_local,
        JsFuture,
    },
    web_sys::ServiceWorkerRegistration,
};

async fn register_service_worker() -> Result<ServiceWorkerRegistration, String> {
    let reg =
        JsFuture::from(window().navigator().service_worker().register("serviceworker.js"))
            .await
            .map_err(|e| format!("Error registering service worker: {:?}", e.as_string()))?;
    return Ok(
        reg
            .dyn_into::<ServiceWorkerRegistration>()
            .map_err(|_| format!("Service worker registration has unexpected type"))?,
    );
}

pub fn main() {
    panic::set_hook(Box::new(console_error_panic_hook::hook));
    let eg = EventGraph::new();
    let log1 = Rc::new(VecLog { log: Default::default() });
    let log = log1.clone() as Rc<dyn Log>;
    eg.event(|pc| {
        let env = scan_env(&log);

        // Consume whatever authentication state the login flow left behind
        let session = match LocalStorage::get::<SessionInfo>(LOCALSTORAGE_SESSION) {
            Ok(s) => Some(s),
            Err(e) => match e {
                gloo::storage::errors::StorageError::KeyNotFound(_) => None,
                gloo::storage::errors::StorageError::SerdeError(..) |
                gloo::storage::errors::StorageError::JsError(..) => {
                    log.log(&format!("Error reading session from local storage: {}", e));
                    None
                },
            },
        };

        // Build app state
        STATE.with(|s| *s.borrow_mut() = Some(Rc::new(State_ {
            eg: pc.eg(),
            env: env,
            log: log.clone(),
            log1: log1.clone(),
            service_worker: bg_val(register_service_worker()),
            session: Prim::new(session),
            permissions: Prim::new(PermissionResolution::Idle),
            resolver: ResolverEpoch::new(),
            permission_fetch: RefCell::new(None),
            logging_out: Cell::new(false),
        })));

        // Push delivery depends on the worker; surface registration failures
        spawn_local({
            let log = log.clone();
            async move {
                state().service_worker.get().await.log(&log, &"Error registering service worker");
            }
        });

        // Minimal shell; the notification click target and the rest of the ticket
        // UI live at /tickets
        let root = el("main");
        root.ref_push(el("h1").text("Tickets"));

        // Root and display; the resolver link and the activity watcher live and
        // die with the shell
        set_root(vec![root.own(|_| (
            //. .
            setup_permission_resolver(pc),
            scope_any(build_activity_watcher()),
        ))]);
    });
}
