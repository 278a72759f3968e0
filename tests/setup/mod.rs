#![allow(dead_code)]

use std::fmt::Display;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Once;

use mathdoc::lite::{LiteAdaptor, LiteDocument, NodeId};
use mathdoc::{MathConfig, Session, SessionErrorKind, register_adaptor};

static INIT: Once = Once::new();

/// Installs the test logger and registers the lite adaptor, once per test
/// binary.
pub fn init() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
        match register_adaptor::<LiteAdaptor>() {
            Ok(()) => {}
            Err(err) if matches!(*err.kind, SessionErrorKind::AdaptorAlreadyRegistered { .. }) => {}
            Err(err) => panic!("could not register the lite adaptor: {err}"),
        }
    });
}

/// Binds a session over `html` with the given JSON configuration.
pub fn session_with(html: &str, config: &str) -> Session<LiteAdaptor> {
    init();
    let config = MathConfig::from_json(config).unwrap_or_else(|err| panic!("bad config: {err}"));
    Session::builder()
        .adaptor(LiteAdaptor::new(LiteDocument::from_html(html)))
        .input(config.input_processor())
        .output(config.output_processor())
        .options(config.options)
        .build()
        .unwrap_or_else(|err| panic!("could not bind: {err}"))
}

/// Binds a session over `html` with the default configuration.
pub fn session(html: &str) -> Session<LiteAdaptor> {
    session_with(html, "{}")
}

/// Body markup of the session's document.
pub fn body_html(session: &Session<LiteAdaptor>) -> String {
    let document = session.adaptor().document();
    document.inner_html(document.body())
}

/// Element with the given `id`.
pub fn by_id(session: &Session<LiteAdaptor>, id: &str) -> NodeId {
    session
        .adaptor()
        .document()
        .element_by_id(id)
        .unwrap_or_else(|| panic!("no element with id '{id}'"))
}

/// Number of rendered containers in the document.
pub fn containers(session: &Session<LiteAdaptor>) -> usize {
    session
        .adaptor()
        .document()
        .elements_by_tag("mjx-container")
        .len()
}

pub fn it<F, E>(desc: &str, test_fn: F)
where
    F: FnOnce() -> Result<(), E>,
    E: Display,
{
    init();
    match catch_unwind(AssertUnwindSafe(test_fn)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test '{desc}' failed with Result::Err: {e}"),
        Err(panic_payload) => {
            let msg = if let Some(s) = panic_payload.downcast_ref::<&str>() {
                (*s).to_owned()
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "<non-string panic payload>".to_owned()
            };
            panic!("Test '{desc}' panicked: {msg}");
        }
    }
}

#[macro_export]
macro_rules! assert_let {
    ($pat:pat = $expr:expr, $($arg:tt)+) => {
        let $pat = $expr else {
            panic!($($arg)+);
        };
    };
    ($pat:pat = $expr:expr) => {
        let $pat = $expr else {
            panic!(
                "assert_let failed: pattern `{}` did not match {} at {}:{} \n{:#?}",
                stringify!($pat), stringify!($expr),
                file!(), line!(),
                $expr
            );
        };
    };
}
