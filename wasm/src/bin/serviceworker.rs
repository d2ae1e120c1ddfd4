use {
    flowcontrol::ta_return,
    gloo::events::EventListener,
    js_sys::Array,
    rooting::set_root_non_dom,
    shared::interface::wire::s2c::{
        resolve_click_url,
        resolve_notification,
        same_origin,
    },
    wasm_bindgen::{
        JsCast,
        JsValue,
    },
    wasm_bindgen_futures::{
        future_to_promise,
        spawn_local,
        JsFuture,
    },
    web_sys::{
        console,
        ClientQueryOptions,
        ClientType,
        ExtendableEvent,
        NotificationEvent,
        NotificationOptions,
        PushEvent,
        ServiceWorkerGlobalScope,
        WindowClient,
    },
};

fn main() {
    let self_ =
        js_sys::global()
            .dyn_into::<ServiceWorkerGlobalScope>()
            .expect("Serviceworker self is not expected type");
    let mut root = vec![];
    root.push(EventListener::new(&self_, "install", {
        let self_ = self_.clone();
        move |_ev| {
            let f1 = self_.skip_waiting().expect("Error skipping waiting for service worker installation");
            spawn_local(async move {
                JsFuture::from(f1).await.expect("Error completing skip_waiting call");
            });
        }
    }));
    root.push(EventListener::new(&self_, "activate", {
        let self_ = self_.clone();
        move |ev| {
            // Take over open pages immediately so push/click handling is live
            // without a reload
            let self_ = self_.clone();
            ev.dyn_ref::<ExtendableEvent>().unwrap().wait_until(&future_to_promise(async move {
                JsFuture::from(self_.clients().claim()).await?;
                return Ok(JsValue::null());
            })).expect("Error waiting for clients claim");
        }
    }));
    root.push(EventListener::new(&self_, "push", {
        let self_ = self_.clone();
        move |ev| {
            // Render the payload as an OS notification; showing it must finish
            // before the push delivery is acknowledged, hence wait_until
            let ev = ev.dyn_ref::<PushEvent>().unwrap();
            let raw = ev.data().map(|d| d.text());
            if let Err(e) = ev.wait_until(&future_to_promise({
                let self_ = self_.clone();
                async move {
                    match async {
                        ta_return!((), String);
                        let data = resolve_notification(raw.as_deref());
                        JsFuture::from(self_.registration().show_notification_with_options(&data.title, &{
                            let o = NotificationOptions::new();
                            o.set_body(&data.body);
                            o.set_tag(&data.tag);
                            o.set_data(&JsValue::from_str(&data.url));
                            o
                        }).map_err(|e| format!("Error showing notification: {:?}", e.as_string()))?)
                            .await
                            .map_err(|e| format!("Error showing notification (async): {:?}", e.as_string()))?;
                        return Ok(());
                    }.await {
                        Ok(_) => { },
                        Err(e) => {
                            console::log_1(&JsValue::from(format!("Error handling push message: {}", e)));
                        },
                    }
                    return Ok(JsValue::null());
                }
            })) {
                console::log_2(&JsValue::from("Push event handler exited with error"), &e);
            };
        }
    }));
    root.push(EventListener::new(&self_, "notificationclick", {
        let self_ = self_.clone();
        move |ev| {
            // Route the click into an open same-origin window, or a fresh one;
            // navigation must complete before the worker may be torn down
            let ev = ev.dyn_ref::<NotificationEvent>().unwrap();
            let notification = ev.notification();
            notification.close();
            let url = notification.data().as_string();
            if let Err(e) = ev.wait_until(&future_to_promise({
                let self_ = self_.clone();
                async move {
                    match async {
                        ta_return!((), String);
                        let origin = self_.location().origin();
                        let target = resolve_click_url(&origin, url.as_deref());
                        let clients =
                            JsFuture::from(self_.clients().match_all_with_options(&{
                                let o = ClientQueryOptions::new();
                                o.set_include_uncontrolled(true);
                                o.set_type(ClientType::Window);
                                o
                            }))
                                .await
                                .map_err(|e| format!("Error listing window clients: {:?}", e.as_string()))?;
                        for client in Array::from(&clients) {
                            let client = WindowClient::from(client);
                            if !same_origin(&origin, &client.url()) {
                                continue;
                            }

                            // First enumerated same-origin window wins; no ordering is
                            // guaranteed across multiple open windows
                            let navigated =
                                JsFuture::from(
                                    client
                                        .navigate(&target)
                                        .map_err(|e| format!("Error navigating client: {:?}", e.as_string()))?,
                                )
                                    .await
                                    .map_err(|e| format!("Error navigating client (async): {:?}", e.as_string()))?;

                            // Navigation can replace the client; focus the handle the
                            // promise resolved to, not the pre-navigation one (the
                            // promise resolves null for uncontrolled pages)
                            let client = match navigated.dyn_into::<WindowClient>() {
                                Ok(c) => c,
                                Err(_) => client,
                            };
                            JsFuture::from(
                                client
                                    .focus()
                                    .map_err(|e| format!("Error focusing client: {:?}", e.as_string()))?,
                            )
                                .await
                                .map_err(|e| format!("Error focusing client (async): {:?}", e.as_string()))?;
                            return Ok(());
                        }
                        JsFuture::from(self_.clients().open_window(&target))
                            .await
                            .map_err(|e| format!("Error opening window: {:?}", e.as_string()))?;
                        return Ok(());
                    }.await {
                        Ok(_) => { },
                        Err(e) => {
                            console::log_1(&JsValue::from(format!("Error handling notification click: {}", e)));
                        },
                    }
                    return Ok(JsValue::null());
                }
            })) {
                console::log_2(&JsValue::from("Notification click handler exited with error"), &e);
            };
        }
    }));
    set_root_non_dom(root);
}
