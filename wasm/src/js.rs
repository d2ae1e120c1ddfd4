use {
    gloo::utils::window,
    std::{
        cell::RefCell,
        fmt::{
            Debug,
            Display,
        },
        rc::Rc,
    },
    wasm_bindgen::JsValue,
    web_sys::console,
};

pub trait Log {
    fn log(&self, text: &str);
}

/// Keeps messages around for in-app diagnostics, mirroring everything to the
/// browser console.
pub struct VecLog {
    pub log: RefCell<Vec<String>>,
}

impl Log for VecLog {
    fn log(&self, text: &str) {
        console::log_1(&JsValue::from(text));
        self.log.borrow_mut().push(text.to_string());
    }
}

pub trait LogJsErr {
    /// Log and discard the error branch, for results where nothing better can
    /// be done than noting the failure.
    fn log(self, log: &Rc<dyn Log>, context: &dyn Display);
}

impl<T, E: Debug> LogJsErr for Result<T, E> {
    fn log(self, log: &Rc<dyn Log>, context: &dyn Display) {
        if let Err(e) = self {
            log.log(&format!("{}: {:?}", context, e));
        }
    }
}

#[derive(Clone)]
pub struct Env {
    pub base_url: String,
}

pub fn scan_env(log: &Rc<dyn Log>) -> Env {
    let base_url = window().location().origin().unwrap_or_else(|e| {
        log.log(&format!("Error reading window origin, using empty base url: {:?}", e));
        return String::new();
    });
    return Env { base_url: base_url };
}
