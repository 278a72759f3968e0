mod setup;

use mathdoc::adaptor::{DocumentAdaptor, NodeKind};
use mathdoc::input::MatchKind;
use mathdoc::lite::{LiteAdaptor, LiteDocument, NodeId};
use mathdoc::types::MathMode;
use mathdoc::{
    MathConfig, Metrics, Scope, Session, SessionError, SessionErrorKind, SharedSession, Stage,
};
use setup::*;

/// Lite document under a kind nobody registers.
#[derive(Debug)]
struct Unregistered(LiteAdaptor);

impl DocumentAdaptor for Unregistered {
    type Node = NodeId;

    const KIND: &'static str = "unregistered";

    fn body(&self) -> NodeId {
        self.0.body()
    }
    fn head(&self) -> Option<NodeId> {
        self.0.head()
    }
    fn node_kind(&self, node: &NodeId) -> NodeKind {
        self.0.node_kind(node)
    }
    fn tag_name(&self, node: &NodeId) -> String {
        self.0.tag_name(node)
    }
    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.0.children(node)
    }
    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.0.parent(node)
    }
    fn text(&self, node: &NodeId) -> String {
        self.0.text(node)
    }
    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.0.attribute(node, name)
    }
    fn create_element(&mut self, tag: &str) -> Result<NodeId, SessionError> {
        self.0.create_element(tag)
    }
    fn create_text(&mut self, text: &str) -> Result<NodeId, SessionError> {
        self.0.create_text(text)
    }
    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), SessionError> {
        self.0.set_attribute(node, name, value)
    }
    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), SessionError> {
        self.0.append_child(parent, child)
    }
    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        reference: &NodeId,
    ) -> Result<(), SessionError> {
        self.0.insert_before(parent, child, reference)
    }
    fn remove(&mut self, node: &NodeId) -> Result<(), SessionError> {
        self.0.remove(node)
    }
    fn split_text(&mut self, node: &NodeId, offset: usize) -> Result<NodeId, SessionError> {
        self.0.split_text(node, offset)
    }
    fn upsert_stylesheet(&mut self, id: &str, css: &str) -> Result<(), SessionError> {
        self.0.upsert_stylesheet(id, css)
    }
    fn measure(&self, node: &NodeId) -> Metrics {
        self.0.measure(node)
    }
}

#[test]
fn a_document_without_math() {
    it("should be left byte-for-byte unchanged", || {
        let html = "<h1>Notes</h1><p>Prices are <b>5 &amp; 6</b> euros.</p><!-- draft --><pre>$ ls</pre>";
        let mut session = session(html);
        let before = session.adaptor().document().to_html();
        let report = session.typeset()?;
        assert_eq!(report.fragments, 0);
        assert!(report.errors.is_empty());
        assert_eq!(session.adaptor().document().to_html(), before);
        Ok::<_, SessionError>(())
    });

    it("should not create a stylesheet", || {
        let mut session = session("<p>plain text</p>");
        session.typeset()?;
        assert!(session.adaptor().document().element_by_id("MJX-CHTML-styles").is_none());
        Ok::<_, SessionError>(())
    });
}

#[test]
fn find_math() {
    it("should find one fragment per delimited region in document order", || {
        let mut session = session(r"<p>$a$, \(b\), $$c$$ and \[d\]</p>");
        let found = session.find_math(&Scope::document())?;
        let sources: Vec<(&str, MathMode)> = found
            .items()
            .iter()
            .map(|item| (item.source.as_str(), item.mode))
            .collect();
        assert_eq!(
            sources,
            [
                ("a", MathMode::Inline),
                ("b", MathMode::Inline),
                ("c", MathMode::Display),
                ("d", MathMode::Display),
            ]
        );
        session.reset();
        Ok::<_, SessionError>(())
    });

    it("should recognise environments outside delimiters", || {
        let mut session = session(r"<p>\begin{matrix} a & b \end{matrix}</p>");
        let found = session.find_math(&Scope::document())?;
        assert_eq!(found.items().len(), 1);
        let item = &found.items()[0];
        assert_eq!(item.source, r"\begin{matrix} a & b \end{matrix}");
        assert_eq!(item.mode, MathMode::Display);
        assert!(matches!(&item.kind, MatchKind::Environment { name } if name == "matrix"));
        session.reset();
        Ok::<_, SessionError>(())
    });

    it("should skip code blocks, ignored classes and rendered output", || {
        let mut session = session(concat!(
            "<pre>$a$</pre>",
            r#"<div class="tex2jax_ignore">$b$<span class="tex2jax_process">$c$</span></div>"#,
            "<p>$d$</p>",
        ));
        let found = session.find_math(&Scope::document())?;
        let sources: Vec<&str> = found.items().iter().map(|item| item.source.as_str()).collect();
        assert_eq!(sources, ["c", "d"]);
        session.reset();

        session.typeset()?;
        let html = body_html(&session);
        let report = session.typeset()?;
        assert_eq!(report.fragments, 0);
        assert_eq!(body_html(&session), html);
        Ok::<_, SessionError>(())
    });

    it("should find math spanning a line break", || {
        let mut session = session("<p>$a +<br>b$</p>");
        let found = session.find_math(&Scope::document())?;
        assert_eq!(found.items().len(), 1);
        assert_eq!(found.items()[0].source, "a +\nb");
        session.reset();

        session.typeset()?;
        assert_eq!(containers(&session), 1);
        assert!(session.adaptor().document().elements_by_tag("br").is_empty());
        Ok::<_, SessionError>(())
    });
}

#[test]
fn escaped_delimiters() {
    it("should render as the literal character", || {
        let mut session = session(r"<p>costs \$5 and \$6</p>");
        let report = session.typeset()?;
        assert_eq!(report.fragments, 2);
        assert_eq!(containers(&session), 0);
        assert_eq!(body_html(&session), "<p>costs $5 and $6</p>");
        Ok::<_, SessionError>(())
    });

    it("should not break a real fragment next to it", || {
        let mut session = session(r"<p>\$ and $x$</p>");
        let report = session.typeset()?;
        assert_eq!(report.fragments, 2);
        assert_eq!(containers(&session), 1);
        assert!(body_html(&session).starts_with("<p>$ and <mjx-container"));
        Ok::<_, SessionError>(())
    });
}

#[test]
fn non_ascii_math() {
    it("should typeset non-ASCII fragments", || {
        let mut session = session("<p>a $\u{3B1}+1$ b $x\u{2192}y$ c $\u{E9}^\u{B2}$</p>");
        let report = session.typeset()?;
        assert_eq!(report.fragments, 3);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(containers(&session), 3);
        let html = body_html(&session);
        assert!(html.starts_with("<p>a <mjx-container"));
        assert!(html.contains("mjx-c3B1"));
        Ok::<_, SessionError>(())
    });
}

#[test]
fn malformed_fragments() {
    it("should produce exactly one error indicator among N fragments", || {
        let mut session = session(r"<p>$a$ then $\nosuchmacro$ then $b^2$</p>");
        let report = session.typeset()?;
        assert_eq!(report.fragments, 3);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].source, r"\nosuchmacro");
        assert_eq!(containers(&session), 3);
        let document = session.adaptor().document();
        assert_eq!(document.elements_by_tag("mjx-merror").len(), 1);
        assert_eq!(report.stages.last(), Some(&Stage::Reset));
        assert_eq!(session.stage(), None);
        Ok::<_, SessionError>(())
    });

    it("should keep the source text inside the error indicator", || {
        let mut session = session("<p>$x^1^2$</p>");
        session.typeset()?;
        let document = session.adaptor().document();
        let errors = document.elements_by_tag("mjx-merror");
        assert_eq!(errors.len(), 1);
        assert_eq!(document.text_content(errors[0]), "x^1^2");
        assert!(document.attribute(errors[0], "data-mjx-error").is_some());
        Ok::<_, SessionError>(())
    });
}

#[test]
fn update_document() {
    it("should preserve surrounding text and fragment order", || {
        let mut session = session("<p>before $a$ middle $b$ after</p>");
        session.typeset()?;
        let document = session.adaptor().document();
        let paragraph = document.elements_by_tag("p")[0];
        assert_eq!(document.children(paragraph).len(), 5);
        let text = document.text_content(paragraph);
        assert!(text.starts_with("before "));
        assert!(text.contains(" middle "));
        assert!(text.ends_with(" after"));
        assert!(!text.contains('$'));
        let containers = document.elements_by_tag("mjx-container");
        assert_eq!(document.text_content(containers[0]), "");
        assert_eq!(containers.len(), 2);
        Ok::<_, SessionError>(())
    });

    it("should mark display fragments", || {
        let mut session = session(r"<p>\[x\]</p>");
        session.typeset()?;
        let document = session.adaptor().document();
        let container = document.elements_by_tag("mjx-container")[0];
        assert_eq!(document.attribute(container, "display"), Some("true"));
        assert_eq!(document.attribute(container, "jax"), Some("CHTML"));
        Ok::<_, SessionError>(())
    });
}

#[test]
fn scoped_invocations() {
    it("should never touch nodes outside the scope", || {
        let mut session = session(r#"<p id="a">$x$</p><p id="b">$y$</p>"#);
        let a = by_id(&session, "a");
        let b = by_id(&session, "b");
        let report = session.typeset_scope(&Scope::elements([a]))?;
        assert_eq!(report.fragments, 1);
        let document = session.adaptor().document();
        assert_eq!(document.inner_html(b), "$y$");
        assert_eq!(document.elements_by_tag("mjx-container").len(), 1);
        Ok::<_, SessionError>(())
    });

    it("should process nested and repeated scope nodes once", || {
        let mut session = session(r#"<div id="outer"><p id="inner">$x$</p></div>"#);
        let outer = by_id(&session, "outer");
        let inner = by_id(&session, "inner");
        let report = session.typeset_scope(&Scope::elements([inner, outer, inner]))?;
        assert_eq!(report.fragments, 1);
        assert_eq!(containers(&session), 1);
        Ok::<_, SessionError>(())
    });
}

#[test]
fn pipeline_stages() {
    it("should report every stage in order", || {
        let mut session = session("<p>$x$</p>");
        let report = session.typeset()?;
        assert_eq!(
            report.stages,
            [
                Stage::FindMath,
                Stage::Compile,
                Stage::GetMetrics,
                Stage::Typeset,
                Stage::UpdateDocument,
                Stage::Reset
            ]
        );
        Ok::<_, SessionError>(())
    });

    it("should run manually, one stage value at a time", || {
        let mut session = session("<p>$x$ and $y$</p>");
        let found = session.find_math(&Scope::document())?;
        let compiled = session.compile(found)?;
        let measured = session.get_metrics(compiled)?;
        assert_eq!(measured.items().len(), 2);
        let rendered = session.typeset_math(measured)?;
        assert_eq!(containers(&session), 0);
        let update = session.update_document(rendered)?;
        assert_eq!(update.fragments(), 2);
        assert_eq!(session.stage(), Some(Stage::UpdateDocument));
        session.reset();
        assert_eq!(containers(&session), 2);
        Ok::<_, SessionError>(())
    });

    it("should reject a new invocation before reset", || {
        let mut session = session("<p>$x$</p>");
        let _found = session.find_math(&Scope::document())?;
        let err = session.typeset().unwrap_err();
        assert!(matches!(*err.kind, SessionErrorKind::InvocationInProgress));
        session.reset();
        assert_eq!(session.typeset()?.fragments, 1);
        Ok::<_, SessionError>(())
    });

    it("should reject stage values from an earlier run", || {
        let mut session = session("<p>$x$</p>");
        let stale = session.find_math(&Scope::document())?;
        session.reset();
        let _fresh = session.find_math(&Scope::document())?;
        let err = session.compile(stale).unwrap_err();
        assert!(matches!(*err.kind, SessionErrorKind::StageOutOfOrder { stage: "compile" }));
        session.reset();
        Ok::<_, SessionError>(())
    });
}

#[test]
fn font_policies() {
    it("should write glyph rules for the TeX font", || {
        let mut session = session("<p>$x+1$</p>");
        let report = session.typeset()?;
        assert!(!report.font_rules.is_empty());
        let document = session.adaptor().document();
        let sheet = document
            .element_by_id("MJX-CHTML-styles")
            .ok_or("missing stylesheet")?;
        assert_eq!(document.tag(sheet), Some("style"));
        assert!(document.text_content(sheet).contains("::before"));
        Ok::<_, Box<dyn std::error::Error>>(())
    });

    it("should never write glyph rules for the empty font", || {
        let html = r"<p>$x+1$ and \[\frac{a}{b}\] and $\alpha \to \beta$</p>";
        let mut session = session_with(html, r#"{"chtml": {"font": "empty"}}"#);
        let report = session.typeset()?;
        assert!(report.font_rules.is_empty());
        assert!(session.adaptor().document().element_by_id("MJX-CHTML-styles").is_none());
        Ok::<_, SessionError>(())
    });

    it("should produce identical markup under both policies", || {
        let html = r"<p>$x^2 + \sqrt{y}$ and $$\sum_{i=1}^n i$$</p>";
        let mut tex = session(html);
        let mut empty = session_with(html, r#"{"chtml": {"font": "empty"}}"#);
        tex.typeset()?;
        empty.typeset()?;
        assert_eq!(body_html(&tex), body_html(&empty));
        Ok::<_, SessionError>(())
    });
}

#[test]
fn shared_sessions() {
    it("should reject an invocation while another holds the session", || {
        let shared = SharedSession::new(session("<p>$x$</p>"));
        let other = shared.clone();
        let nested = shared.with_session(|_| other.typeset())?;
        let err = nested.unwrap_err();
        assert!(matches!(*err.kind, SessionErrorKind::InvocationInProgress));
        assert_eq!(shared.typeset()?.fragments, 1);
        Ok::<_, SessionError>(())
    });
}

#[test]
fn configuration() {
    it("should reject adaptors that were never registered", || {
        let err = Session::bind(
            Unregistered(LiteAdaptor::new(LiteDocument::from_html("<p>$x$</p>"))),
            MathConfig::default().input_processor(),
            MathConfig::default().output_processor(),
        )
        .unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(
            *err.kind,
            SessionErrorKind::AdaptorNotRegistered { kind: "unregistered" }
        ));
        Ok::<_, SessionError>(())
    });

    it("should reject overlapping delimiters at bind time", || {
        let err = MathConfig::from_json(r#"{"tex": {"inlineMath": [["$", "$"]], "displayMath": [["$", "$$"]]}}"#)
            .unwrap_err();
        assert!(matches!(*err.kind, SessionErrorKind::OverlappingDelimiters { .. }));
        Ok::<_, SessionError>(())
    });

    it("should honour custom delimiters", || {
        let config = r#"{"tex": {"inlineMath": [["@@", "@@"]], "displayMath": []}}"#;
        let mut session = session_with("<p>$a$ and @@b@@</p>", config);
        let report = session.typeset()?;
        assert_eq!(report.fragments, 1);
        assert!(body_html(&session).starts_with("<p>$a$ and <mjx-container"));
        Ok::<_, SessionError>(())
    });
}
