//! WebAssembly bindings.
//!
//! `startup` binds a session to `window.document`, installs it as the legacy
//! hub and publishes `window.MathJax.Hub.Queue` for older notebook code.
//! `typeset` and `typesetNode` drive the session directly.

use core::cell::RefCell;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;

use crate::adaptor::register_adaptor;
use crate::config::MathConfig;
use crate::legacy;
use crate::session::{Scope, Session, SharedSession, TypesetReport};
use crate::types::{SessionError, SessionErrorKind};
use crate::web::{WebAdaptor, WebNode};

thread_local! {
    static SESSION: RefCell<Option<SharedSession<WebAdaptor>>> = const { RefCell::new(None) };
}

fn to_js(err: &SessionError) -> JsValue {
    JsValue::from_str(&format!("{err}"))
}

fn session() -> Result<SharedSession<WebAdaptor>, JsValue> {
    SESSION
        .with(|slot| slot.borrow().clone())
        .ok_or_else(|| to_js(&SessionError::new(SessionErrorKind::SessionNotReady)))
}

fn fragments(report: &TypesetReport) -> u32 {
    u32::try_from(report.fragments).unwrap_or(u32::MAX)
}

/// Binds the page session. `config` is a JSON configuration string; the
/// defaults apply when it is omitted.
#[wasm_bindgen]
pub fn startup(config: Option<String>) -> Result<(), JsValue> {
    let config = MathConfig::from_json(config.as_deref().unwrap_or("{}")).map_err(|e| to_js(&e))?;
    match register_adaptor::<WebAdaptor>() {
        Ok(()) => {}
        Err(err) if matches!(*err.kind, SessionErrorKind::AdaptorAlreadyRegistered { .. }) => {}
        Err(err) => return Err(to_js(&err)),
    }
    let adaptor = WebAdaptor::from_window().ok_or_else(|| JsValue::from_str("no document available"))?;
    let session = Session::builder()
        .adaptor(adaptor)
        .input(config.input_processor())
        .output(config.output_processor())
        .options(config.options)
        .build()
        .map_err(|e| to_js(&e))?;
    let shared = SharedSession::new(session);
    legacy::install(shared.clone());
    SESSION.with(|slot| *slot.borrow_mut() = Some(shared));
    publish_hub()
}

/// Typesets the whole document and returns the number of fragments replaced.
#[wasm_bindgen]
pub fn typeset() -> Result<u32, JsValue> {
    let report = session()?.typeset().map_err(|e| to_js(&e))?;
    Ok(fragments(&report))
}

/// Typesets `node` and its descendants.
#[wasm_bindgen(js_name = typesetNode)]
pub fn typeset_node(node: web_sys::Node) -> Result<u32, JsValue> {
    let report = session()?
        .typeset_scope(&Scope::elements([WebNode(node)]))
        .map_err(|e| to_js(&e))?;
    Ok(fragments(&report))
}

/// Handles `MathJax.Hub.Queue(["Typeset", MathJax.Hub, node])`.
fn queue(call: &JsValue) -> Result<JsValue, JsValue> {
    if !Array::is_array(call) {
        return Err(JsValue::from_str("queue entry must be an array"));
    }
    let call = Array::from(call);
    let node = call
        .get(2)
        .dyn_into::<web_sys::Node>()
        .map_err(|_| JsValue::from_str("queue entry must end with a DOM node"))?;
    let report = legacy::hub_queue::<WebAdaptor, _, _>((call.get(0), call.get(1), WebNode(node)))
        .map_err(|e| to_js(&e))?;
    Ok(JsValue::from(fragments(&report)))
}

fn publish_hub() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
    let queue_fn = Closure::<dyn Fn(JsValue) -> Result<JsValue, JsValue>>::new(|call: JsValue| queue(&call));
    let hub = Object::new();
    Reflect::set(&hub, &JsValue::from_str("Queue"), queue_fn.as_ref().unchecked_ref::<Function>())?;
    queue_fn.forget();
    let root = Object::new();
    Reflect::set(&root, &JsValue::from_str("Hub"), &hub)?;
    Reflect::set(&window, &JsValue::from_str("MathJax"), &root)?;
    log::info!("Published legacy MathJax.Hub.Queue");
    Ok(())
}
