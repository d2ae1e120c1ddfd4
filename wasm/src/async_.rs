use {
    futures::channel::oneshot,
    rooting::{
        scope_any,
        spawn_rooted,
        ScopeValue,
    },
    std::{
        cell::RefCell,
        future::Future,
        rc::Rc,
    },
};

struct BgVal_<T> {
    value: Option<T>,
    waiters: Vec<oneshot::Sender<T>>,
    _bg: Option<ScopeValue>,
}

/// A value computed once by a rooted background task. `get` resolves
/// immediately once the computation has finished.
pub struct BgVal<T>(Rc<RefCell<BgVal_<T>>>);

impl<T> Clone for BgVal<T> {
    fn clone(&self) -> Self {
        return BgVal(self.0.clone());
    }
}

pub fn bg_val<T: Clone + 'static>(f: impl Future<Output = T> + 'static) -> BgVal<T> {
    let out = Rc::new(RefCell::new(BgVal_ {
        value: None,
        waiters: vec![],
        _bg: None,
    }));
    out.borrow_mut()._bg = Some(scope_any(spawn_rooted({
        let out = out.clone();
        async move {
            let value = f.await;
            let mut inner = out.borrow_mut();
            for w in inner.waiters.split_off(0) {
                _ = w.send(value.clone());
            }
            inner.value = Some(value);
        }
    })));
    return BgVal(out);
}

impl<T: Clone + 'static> BgVal<T> {
    pub async fn get(&self) -> T {
        let rx;
        {
            let mut inner = self.0.borrow_mut();
            if let Some(v) = &inner.value {
                return v.clone();
            }
            let (tx, rx1) = oneshot::channel();
            inner.waiters.push(tx);
            rx = rx1;
        }
        match rx.await {
            Ok(v) => return v,
            Err(_) => {
                // Task dropped before completing; only reachable during teardown, so
                // pend forever rather than invent a value.
                return std::future::pending().await;
            },
        }
    }
}
