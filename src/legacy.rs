//! Legacy compatibility shim.
//!
//! Older notebook code calls a global queue function with a three-element
//! tuple: two ignored values (historically the command name and the engine
//! handle) and the node to typeset. The shim forwards such calls to the
//! installed session as a single-node scoped typeset.

use alloc::rc::Rc;
use core::any::Any;
use core::cell::RefCell;

use crate::adaptor::DocumentAdaptor;
use crate::session::{Scope, SharedSession, TypesetReport};
use crate::types::{SessionError, SessionErrorKind};

/// Queue entry point bound to one session.
#[derive(Debug)]
pub struct Hub<A: DocumentAdaptor> {
    session: SharedSession<A>,
}

impl<A: DocumentAdaptor> Clone for Hub<A> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
        }
    }
}

impl<A: DocumentAdaptor> Hub<A> {
    /// Creates a hub forwarding to `session`.
    #[must_use]
    pub const fn new(session: SharedSession<A>) -> Self {
        Self { session }
    }

    /// The session calls are forwarded to.
    #[must_use]
    pub const fn session(&self) -> &SharedSession<A> {
        &self.session
    }

    /// Typesets `node` and its descendants. The first two tuple elements are
    /// ignored.
    pub fn queue<X, Y>(&self, (_, _, node): (X, Y, A::Node)) -> Result<TypesetReport, SessionError> {
        log::debug!("Legacy queue call for {node:?}");
        self.session.typeset_scope(&Scope::elements([node]))
    }
}

thread_local! {
    static HUB: RefCell<Option<Rc<dyn Any>>> = const { RefCell::new(None) };
}

/// Publishes `session` at the global legacy location, replacing any earlier
/// one.
pub fn install<A: DocumentAdaptor + 'static>(session: SharedSession<A>) {
    let hub: Rc<dyn Any> = Rc::new(Hub::new(session));
    HUB.with(|slot| *slot.borrow_mut() = Some(hub));
    log::info!("Installed legacy hub for '{}'", A::KIND);
}

/// Removes the installed session, if any.
pub fn uninstall() {
    HUB.with(|slot| slot.borrow_mut().take());
}

/// The installed hub, if one was installed for adaptor type `A`.
#[must_use]
pub fn hub<A: DocumentAdaptor + 'static>() -> Option<Hub<A>> {
    HUB.with(|slot| {
        slot.borrow()
            .as_ref()
            .and_then(|hub| hub.downcast_ref::<Hub<A>>())
            .cloned()
    })
}

/// Global queue function: forwards to the installed hub.
///
/// Fails with [`SessionErrorKind::SessionNotReady`] when no session has been
/// installed for `A`.
pub fn hub_queue<A, X, Y>(call: (X, Y, A::Node)) -> Result<TypesetReport, SessionError>
where
    A: DocumentAdaptor + 'static,
{
    let hub = hub::<A>().ok_or_else(|| SessionError::new(SessionErrorKind::SessionNotReady))?;
    hub.queue(call)
}
