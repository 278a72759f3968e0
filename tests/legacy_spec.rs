mod setup;

use mathdoc::legacy::{self, Hub};
use mathdoc::lite::LiteAdaptor;
use mathdoc::{Scope, SessionError, SessionErrorKind, SharedSession};
use setup::*;

const PAGE: &str = r#"<div id="cell-1"><p>$a+b$ and \(c\)</p></div><div id="cell-2"><p>$$d$$</p></div>"#;

#[test]
fn the_legacy_queue() {
    it("should fail before a session is installed", || {
        legacy::uninstall();
        let node = by_id(&session(PAGE), "cell-1");
        let err = legacy::hub_queue::<LiteAdaptor, _, _>(("Typeset", (), node)).unwrap_err();
        assert!(matches!(*err.kind, SessionErrorKind::SessionNotReady));
        Ok::<_, SessionError>(())
    });

    it("should typeset only the target node", || {
        let session = session(PAGE);
        let cell = by_id(&session, "cell-1");
        let other = by_id(&session, "cell-2");
        let shared = SharedSession::new(session);
        legacy::install(shared.clone());

        let report = legacy::hub_queue::<LiteAdaptor, _, _>(("Typeset", "hub", cell))?;
        assert_eq!(report.fragments, 2);
        shared.with_session(|session| {
            let document = session.adaptor().document();
            assert_eq!(document.inner_html(other), "<p>$$d$$</p>");
            assert_eq!(containers(session), 2);
        })?;
        legacy::uninstall();
        Ok::<_, SessionError>(())
    });

    it("should match a scoped typeset for any ignored arguments", || {
        let scoped = session(PAGE);
        let node = by_id(&scoped, "cell-1");
        let scoped = SharedSession::new(scoped);
        scoped.typeset_scope(&Scope::elements([node]))?;
        let expected = scoped.with_session(|session| body_html(session))?;

        for (a, b) in [(0, 0), (7, -3)] {
            let queued = session(PAGE);
            let node = by_id(&queued, "cell-1");
            let queued = SharedSession::new(queued);
            legacy::install(queued.clone());
            legacy::hub_queue::<LiteAdaptor, _, _>((a, b, node))?;
            assert_eq!(queued.with_session(|session| body_html(session))?, expected);
        }
        legacy::uninstall();
        Ok::<_, SessionError>(())
    });

    it("should forward through a hub handle", || {
        let session = session(PAGE);
        let node = by_id(&session, "cell-2");
        let hub = Hub::new(SharedSession::new(session));
        let report = hub.queue(("Typeset", None::<()>, node))?;
        assert_eq!(report.fragments, 1);
        Ok::<_, SessionError>(())
    });

    it("should report a busy session instead of corrupting it", || {
        let session = session(PAGE);
        let node = by_id(&session, "cell-1");
        let shared = SharedSession::new(session);
        legacy::install(shared.clone());
        let nested = shared.with_session(|_| {
            legacy::hub_queue::<LiteAdaptor, _, _>(((), (), node))
        })?;
        assert!(matches!(*nested.unwrap_err().kind, SessionErrorKind::InvocationInProgress));
        legacy::uninstall();
        Ok::<_, SessionError>(())
    });
}
