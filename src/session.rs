//! Document Session: the typesetting pipeline bound to one document.
//!
//! A [`Session`] owns an adaptor, an input processor and an output processor.
//! One invocation runs six stages in fixed order:
//!
//! 1. [`Session::find_math`] walks the document (or a [`Scope`]) and locates
//!    fragments in its text,
//! 2. [`Session::compile`] turns each fragment into a tree or an error,
//! 3. [`Session::get_metrics`] measures each fragment's container,
//! 4. [`Session::typeset_math`] renders detached output,
//! 5. [`Session::update_document`] splices output into the document and
//!    injects glyph rules,
//! 6. [`Session::reset`] clears per-invocation state.
//!
//! Each stage consumes the value produced by the previous one, so the order
//! is checked by the compiler. [`Session::typeset`] runs all six and always
//! ends with `reset`.

use alloc::sync::Arc;
use std::sync::{Mutex, MutexGuard, TryLockError};

use bon::bon;
use strum::{Display, EnumIter, IntoStaticStr};

use crate::adaptor::{DocumentAdaptor, NodeKind, is_registered};
use crate::dom_tree::HtmlDomNode;
use crate::input::{InputProcessor, MatchKind, ParseNode};
use crate::metrics::Metrics;
use crate::namespace::KeyMap;
use crate::output::{GlyphCache, OutputProcessor};
use crate::tree::VirtualNode as _;
use crate::types::{DocumentOptions, MathMode, ParseError, SessionError, SessionErrorKind};

/// Stages of one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum Stage {
    /// Locate fragments
    FindMath,
    /// Compile fragments
    Compile,
    /// Measure containers
    GetMetrics,
    /// Render output
    Typeset,
    /// Splice output into the document
    UpdateDocument,
    /// Clear per-invocation state
    Reset,
}

/// Part of the document one invocation searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope<N> {
    elements: Vec<N>,
}

impl<N> Scope<N> {
    /// The whole document body.
    #[must_use]
    pub const fn document() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Only the given nodes and their descendants. An empty list means the
    /// whole document.
    #[must_use]
    pub fn elements(elements: impl IntoIterator<Item = N>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    /// Whether this scope is the whole document.
    #[must_use]
    pub fn is_document(&self) -> bool {
        self.elements.is_empty()
    }

    /// The scope nodes, as given.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.elements
    }
}

impl<N> Default for Scope<N> {
    fn default() -> Self {
        Self::document()
    }
}

/// A position inside a text node: byte offset into its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor<N> {
    /// Text node
    pub node: N,
    /// Byte offset
    pub offset: usize,
}

/// One fragment located in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathItem<N> {
    /// Math source (see [`crate::input::MathMatch::source`])
    pub source: String,
    /// Inline or display
    pub mode: MathMode,
    /// How the fragment was recognised
    pub kind: MatchKind,
    /// First character of the opening delimiter
    pub start: Anchor<N>,
    /// Just past the last character of the closing delimiter
    pub end: Anchor<N>,
    /// Element whose text run holds the fragment
    pub container: N,
}

/// Result of compiling one fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Compiled {
    /// A compiled tree
    Tree(ParseNode),
    /// The fragment failed to compile
    Error(ParseError),
    /// An escaped character shown as plain text
    Literal(String),
}

/// A fragment that failed to compile, as reported to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentError {
    /// Fragment source
    pub source: String,
    /// What went wrong
    pub error: ParseError,
}

/// Output of [`Session::find_math`].
#[derive(Debug)]
pub struct FoundMath<N> {
    generation: u64,
    items: Vec<MathItem<N>>,
}

impl<N> FoundMath<N> {
    /// Fragments in discovery order.
    #[must_use]
    pub fn items(&self) -> &[MathItem<N>] {
        &self.items
    }
}

/// Output of [`Session::compile`].
#[derive(Debug)]
pub struct CompiledMath<N> {
    generation: u64,
    items: Vec<(MathItem<N>, Compiled)>,
}

impl<N> CompiledMath<N> {
    /// Fragments with their compile results.
    #[must_use]
    pub fn items(&self) -> &[(MathItem<N>, Compiled)] {
        &self.items
    }
}

/// Output of [`Session::get_metrics`].
#[derive(Debug)]
pub struct MeasuredMath<N> {
    generation: u64,
    items: Vec<(MathItem<N>, Compiled, Metrics)>,
}

impl<N> MeasuredMath<N> {
    /// Fragments with their compile results and container metrics.
    #[must_use]
    pub fn items(&self) -> &[(MathItem<N>, Compiled, Metrics)] {
        &self.items
    }
}

/// One rendered fragment.
#[derive(Debug)]
pub struct RenderedItem<N> {
    /// The fragment
    pub item: MathItem<N>,
    /// Detached output
    pub output: HtmlDomNode,
    /// Compile error, when `output` is an error indicator
    pub error: Option<ParseError>,
}

/// Output of [`Session::typeset_math`].
#[derive(Debug)]
pub struct RenderedMath<N> {
    generation: u64,
    items: Vec<RenderedItem<N>>,
}

impl<N> RenderedMath<N> {
    /// Rendered fragments in discovery order.
    #[must_use]
    pub fn items(&self) -> &[RenderedItem<N>] {
        &self.items
    }
}

/// Output of [`Session::update_document`].
#[derive(Debug)]
pub struct DocumentUpdate {
    fragments: usize,
    errors: Vec<FragmentError>,
    font_rules: Vec<String>,
}

impl DocumentUpdate {
    /// Number of fragments replaced in the document.
    #[must_use]
    pub const fn fragments(&self) -> usize {
        self.fragments
    }

    /// Fragments that failed to compile.
    #[must_use]
    pub fn errors(&self) -> &[FragmentError] {
        &self.errors
    }

    /// Glyph rules needed by this invocation's output.
    #[must_use]
    pub fn font_rules(&self) -> &[String] {
        &self.font_rules
    }
}

/// Summary of one complete invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TypesetReport {
    /// Number of fragments replaced in the document
    pub fragments: usize,
    /// Fragments that failed to compile
    pub errors: Vec<FragmentError>,
    /// Glyph rules needed by this invocation's output
    pub font_rules: Vec<String>,
    /// Stages run, in order
    pub stages: Vec<Stage>,
}

/// One node of a text run and its byte range in the joined run text.
struct Segment<N> {
    node: N,
    start: usize,
    len: usize,
    text: bool,
}

/// The typesetting pipeline bound to one document.
#[derive(Debug)]
pub struct Session<A: DocumentAdaptor> {
    adaptor: A,
    input: Arc<dyn InputProcessor>,
    output: Arc<dyn OutputProcessor>,
    options: DocumentOptions,
    generation: u64,
    stage: Option<Stage>,
    metrics: KeyMap<A::Node, Metrics>,
    glyphs: GlyphCache,
    emitted: GlyphCache,
}

#[bon]
impl<A: DocumentAdaptor> Session<A> {
    /// Binds a session to a document.
    ///
    /// Fails when no adaptor was registered for `A::KIND` or when the input
    /// configuration is invalid.
    #[builder]
    pub fn new(
        /// Host document
        adaptor: A,
        /// Input processor
        input: Arc<dyn InputProcessor>,
        /// Output processor
        output: Arc<dyn OutputProcessor>,
        /// Document discovery options
        options: Option<DocumentOptions>,
    ) -> Result<Self, SessionError> {
        if !is_registered(A::KIND) {
            return Err(SessionError::new(SessionErrorKind::AdaptorNotRegistered {
                kind: A::KIND,
            }));
        }
        input.validate()?;
        log::info!(
            "Bound session: adaptor '{}', input {}, output {} with font '{}'",
            A::KIND,
            input.name(),
            output.name(),
            output.font().name()
        );
        Ok(Self {
            adaptor,
            input,
            output,
            options: options.unwrap_or_default(),
            generation: 0,
            stage: None,
            metrics: KeyMap::default(),
            glyphs: GlyphCache::new(),
            emitted: GlyphCache::new(),
        })
    }
}

impl<A: DocumentAdaptor> Session<A> {
    /// Binds a session with default document options.
    pub fn bind(
        adaptor: A,
        input: Arc<dyn InputProcessor>,
        output: Arc<dyn OutputProcessor>,
    ) -> Result<Self, SessionError> {
        Self::builder()
            .adaptor(adaptor)
            .input(input)
            .output(output)
            .build()
    }

    /// The host document adaptor.
    #[must_use]
    pub const fn adaptor(&self) -> &A {
        &self.adaptor
    }

    /// Mutable access to the host document adaptor.
    pub const fn adaptor_mut(&mut self) -> &mut A {
        &mut self.adaptor
    }

    /// Unbinds the session, returning the adaptor.
    #[must_use]
    pub fn into_adaptor(self) -> A {
        self.adaptor
    }

    /// The input processor.
    #[must_use]
    pub fn input(&self) -> &dyn InputProcessor {
        self.input.as_ref()
    }

    /// The output processor.
    #[must_use]
    pub fn output(&self) -> &dyn OutputProcessor {
        self.output.as_ref()
    }

    /// Document discovery options.
    #[must_use]
    pub const fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Last stage run by the current invocation; `None` when idle.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        self.stage
    }

    /// Typesets the whole document.
    pub fn typeset(&mut self) -> Result<TypesetReport, SessionError> {
        self.typeset_scope(&Scope::document())
    }

    /// Typesets the given scope, running all six stages. `reset` runs even
    /// when a later stage fails.
    pub fn typeset_scope(&mut self, scope: &Scope<A::Node>) -> Result<TypesetReport, SessionError> {
        let found = self.find_math(scope)?;
        let result = self.run_from(found);
        self.reset();
        let mut report = result?;
        report.stages.push(Stage::Reset);
        log::debug!(
            "Typeset {} fragment(s), {} error(s), {} glyph rule(s)",
            report.fragments,
            report.errors.len(),
            report.font_rules.len()
        );
        Ok(report)
    }

    fn run_from(&mut self, found: FoundMath<A::Node>) -> Result<TypesetReport, SessionError> {
        let compiled = self.compile(found)?;
        let measured = self.get_metrics(compiled)?;
        let rendered = self.typeset_math(measured)?;
        let update = self.update_document(rendered)?;
        Ok(TypesetReport {
            fragments: update.fragments,
            errors: update.errors,
            font_rules: update.font_rules,
            stages: vec![
                Stage::FindMath,
                Stage::Compile,
                Stage::GetMetrics,
                Stage::Typeset,
                Stage::UpdateDocument,
            ],
        })
    }

    fn advance(&mut self, generation: u64, from: Stage, to: Stage) -> Result<(), SessionError> {
        if generation != self.generation || self.stage != Some(from) {
            return Err(SessionError::new(SessionErrorKind::StageOutOfOrder {
                stage: to.into(),
            }));
        }
        log::debug!("Executing stage: {to}");
        self.stage = Some(to);
        Ok(())
    }

    /// Locates every fragment in `scope`.
    ///
    /// Fails with [`SessionErrorKind::InvocationInProgress`] when a previous
    /// invocation has not been reset.
    pub fn find_math(&mut self, scope: &Scope<A::Node>) -> Result<FoundMath<A::Node>, SessionError> {
        if self.stage.is_some() {
            return Err(SessionError::new(SessionErrorKind::InvocationInProgress));
        }
        log::debug!("Executing stage: {}", Stage::FindMath);
        self.generation += 1;
        self.stage = Some(Stage::FindMath);

        let mut items = Vec::new();
        for root in self.scope_roots(scope) {
            match self.adaptor.node_kind(&root) {
                NodeKind::Element => self.visit(&root, true, &mut items),
                NodeKind::Text => {
                    let container = self.adaptor.parent(&root).unwrap_or_else(|| root.clone());
                    self.scan_run(&[root], &container, &mut items);
                }
                NodeKind::Comment | NodeKind::Other => {}
            }
        }
        log::trace!("Found {} fragment(s)", items.len());
        Ok(FoundMath {
            generation: self.generation,
            items,
        })
    }

    /// Scope nodes with duplicates and nested nodes removed.
    fn scope_roots(&self, scope: &Scope<A::Node>) -> Vec<A::Node> {
        if scope.is_document() {
            return vec![self.adaptor.body()];
        }
        let nodes = scope.nodes();
        let mut roots: Vec<A::Node> = Vec::with_capacity(nodes.len());
        for node in nodes {
            let nested = nodes
                .iter()
                .any(|other| other != node && self.adaptor.contains(other, node));
            if !nested && !roots.contains(node) {
                roots.push(node.clone());
            }
        }
        roots
    }

    fn has_any_class(&self, node: &A::Node, classes: &[String]) -> bool {
        classes.iter().any(|class| self.adaptor.has_class(node, class))
    }

    /// Walks an element, collecting text runs when `inherited` processing is
    /// on and honouring skip tags and ignore/process classes.
    fn visit(&self, element: &A::Node, inherited: bool, items: &mut Vec<MathItem<A::Node>>) {
        let tag = self.adaptor.tag_name(element);
        if tag == "mjx-container" {
            return;
        }
        let process = self.has_any_class(element, &self.options.process_html_class);
        let processing = if process {
            true
        } else if self.options.skips_tag(&tag) {
            return;
        } else if self.has_any_class(element, &self.options.ignore_html_class) {
            false
        } else {
            inherited
        };

        let mut run = Vec::new();
        for child in self.adaptor.children(element) {
            match self.adaptor.node_kind(&child) {
                NodeKind::Text | NodeKind::Comment => run.push(child),
                NodeKind::Element => match self.adaptor.tag_name(&child).as_str() {
                    "br" | "wbr" => run.push(child),
                    _ => {
                        if processing {
                            self.scan_run(&run, element, items);
                        }
                        run.clear();
                        self.visit(&child, processing, items);
                    }
                },
                NodeKind::Other => {
                    if processing {
                        self.scan_run(&run, element, items);
                    }
                    run.clear();
                }
            }
        }
        if processing {
            self.scan_run(&run, element, items);
        }
    }

    /// Joins one run of sibling nodes and searches it.
    fn scan_run(&self, run: &[A::Node], container: &A::Node, items: &mut Vec<MathItem<A::Node>>) {
        let mut joined = String::new();
        let mut segments = Vec::with_capacity(run.len());
        for node in run {
            let start = joined.len();
            let text = match self.adaptor.node_kind(node) {
                NodeKind::Text => true,
                NodeKind::Element if self.adaptor.tag_name(node) == "br" => {
                    joined.push('\n');
                    false
                }
                _ => false,
            };
            if text {
                joined.push_str(&self.adaptor.text(node));
            }
            segments.push(Segment {
                node: node.clone(),
                start,
                len: joined.len() - start,
                text,
            });
        }
        if !segments.iter().any(|segment| segment.text && segment.len > 0) {
            return;
        }

        for found in self.input.find_math(&joined) {
            let start = segments
                .iter()
                .find(|s| s.text && s.start <= found.start && found.start < s.start + s.len);
            let end = segments
                .iter()
                .find(|s| s.text && s.start < found.end && found.end <= s.start + s.len);
            let (Some(start), Some(end)) = (start, end) else {
                log::warn!("Fragment {:?} does not start and end in text", found.source);
                continue;
            };
            log::trace!("Found {} fragment {:?}", found.mode, found.source);
            items.push(MathItem {
                source: found.source,
                mode: found.mode,
                kind: found.kind,
                start: Anchor {
                    node: start.node.clone(),
                    offset: found.start - start.start,
                },
                end: Anchor {
                    node: end.node.clone(),
                    offset: found.end - end.start,
                },
                container: container.clone(),
            });
        }
    }

    /// Compiles every fragment. Failures become [`Compiled::Error`].
    pub fn compile(
        &mut self,
        found: FoundMath<A::Node>,
    ) -> Result<CompiledMath<A::Node>, SessionError> {
        self.advance(found.generation, Stage::FindMath, Stage::Compile)?;
        let items = found
            .items
            .into_iter()
            .map(|item| {
                let compiled = if item.kind == MatchKind::Escaped {
                    Compiled::Literal(item.source.clone())
                } else {
                    match self.input.compile(&item.source) {
                        Ok(tree) => Compiled::Tree(tree),
                        Err(error) => Compiled::Error(error),
                    }
                };
                (item, compiled)
            })
            .collect();
        Ok(CompiledMath {
            generation: found.generation,
            items,
        })
    }

    /// Measures the container of every fragment, once per container.
    pub fn get_metrics(
        &mut self,
        compiled: CompiledMath<A::Node>,
    ) -> Result<MeasuredMath<A::Node>, SessionError> {
        self.advance(compiled.generation, Stage::Compile, Stage::GetMetrics)?;
        let mut items = Vec::with_capacity(compiled.items.len());
        for (item, result) in compiled.items {
            let metrics = *self
                .metrics
                .entry(item.container.clone())
                .or_insert_with(|| self.adaptor.measure(&item.container));
            items.push((item, result, metrics));
        }
        Ok(MeasuredMath {
            generation: compiled.generation,
            items,
        })
    }

    /// Renders every fragment into detached output.
    pub fn typeset_math(
        &mut self,
        measured: MeasuredMath<A::Node>,
    ) -> Result<RenderedMath<A::Node>, SessionError> {
        self.advance(measured.generation, Stage::GetMetrics, Stage::Typeset)?;
        let mut items = Vec::with_capacity(measured.items.len());
        for (item, result, metrics) in measured.items {
            let (output, error) = match result {
                Compiled::Tree(tree) => (
                    self.output
                        .render(&tree, item.mode, &metrics, &mut self.glyphs),
                    None,
                ),
                Compiled::Error(error) => {
                    log::warn!("Fragment {:?} failed to compile: {error}", item.source);
                    let output = self
                        .output
                        .render_error(&error, &item.source, item.mode, &metrics);
                    (output, Some(error))
                }
                Compiled::Literal(text) => (HtmlDomNode::text(text), None),
            };
            items.push(RenderedItem {
                item,
                output,
                error,
            });
        }
        Ok(RenderedMath {
            generation: measured.generation,
            items,
        })
    }

    /// Replaces every fragment's source text with its output, last fragment
    /// first so earlier anchors stay valid, then writes glyph rules.
    pub fn update_document(
        &mut self,
        rendered: RenderedMath<A::Node>,
    ) -> Result<DocumentUpdate, SessionError> {
        self.advance(rendered.generation, Stage::Typeset, Stage::UpdateDocument)?;
        let fragments = rendered.items.len();
        let mut errors = Vec::new();
        for rendered_item in rendered.items.into_iter().rev() {
            self.replace(&rendered_item.item, &rendered_item.output)?;
            if let Some(error) = rendered_item.error {
                errors.push(FragmentError {
                    source: rendered_item.item.source,
                    error,
                });
            }
        }
        errors.reverse();

        let font_rules = self.output.font_rules(&self.glyphs);
        let before = self.emitted.len();
        self.emitted.extend(self.glyphs.iter().copied());
        if self.emitted.len() > before && !font_rules.is_empty() {
            let css = self.output.font_rules(&self.emitted).join("\n");
            let id = self.output.stylesheet_id();
            self.adaptor.upsert_stylesheet(id, &css)?;
            log::debug!("Updated stylesheet '{id}'");
        }

        Ok(DocumentUpdate {
            fragments,
            errors,
            font_rules,
        })
    }

    fn replace(&mut self, item: &MathItem<A::Node>, output: &HtmlDomNode) -> Result<(), SessionError> {
        let detached = || SessionError::new(SessionErrorKind::DetachedAnchor);
        let parent = self.adaptor.parent(&item.start.node).ok_or_else(detached)?;

        let end_len = self.adaptor.text(&item.end.node).len();
        if item.end.offset > end_len {
            return Err(detached());
        }
        if item.end.offset < end_len {
            self.adaptor.split_text(&item.end.node, item.end.offset)?;
        }
        let first = if item.start.offset == 0 {
            item.start.node.clone()
        } else {
            self.adaptor.split_text(&item.start.node, item.start.offset)?
        };
        let last = if item.start.node == item.end.node {
            first.clone()
        } else {
            item.end.node.clone()
        };

        let replacement = output.to_host(&mut self.adaptor)?;
        self.adaptor.insert_before(&parent, &replacement, &first)?;

        let siblings = self.adaptor.children(&parent);
        let from = siblings
            .iter()
            .position(|node| *node == first)
            .ok_or_else(detached)?;
        let to = siblings[from..]
            .iter()
            .position(|node| *node == last)
            .ok_or_else(detached)?;
        for node in &siblings[from..=from + to] {
            self.adaptor.remove(node)?;
        }
        Ok(())
    }

    /// Clears per-invocation state. Always succeeds.
    pub fn reset(&mut self) {
        log::debug!("Executing stage: {}", Stage::Reset);
        self.stage = None;
        self.metrics.clear();
        self.glyphs.clear();
    }
}

/// Cloneable handle to a session that admits one invocation at a time.
#[derive(Debug)]
pub struct SharedSession<A: DocumentAdaptor> {
    inner: Arc<Mutex<Session<A>>>,
}

impl<A: DocumentAdaptor> Clone for SharedSession<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: DocumentAdaptor> SharedSession<A> {
    /// Wraps a session.
    #[must_use]
    pub fn new(session: Session<A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn gate(&self) -> Result<MutexGuard<'_, Session<A>>, SessionError> {
        match self.inner.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => {
                Err(SessionError::new(SessionErrorKind::InvocationInProgress))
            }
        }
    }

    /// Typesets the whole document.
    pub fn typeset(&self) -> Result<TypesetReport, SessionError> {
        self.gate()?.typeset()
    }

    /// Typesets the given scope.
    pub fn typeset_scope(&self, scope: &Scope<A::Node>) -> Result<TypesetReport, SessionError> {
        self.gate()?.typeset_scope(scope)
    }

    /// Runs `f` with exclusive access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session<A>) -> R) -> Result<R, SessionError> {
        let mut guard = self.gate()?;
        Ok(f(&mut guard))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Once;

    use super::*;
    use crate::adaptor::register_adaptor;
    use crate::input::TexInput;
    use crate::lite::{LiteAdaptor, LiteDocument};
    use crate::output::ChtmlOutput;

    fn session(html: &str) -> Session<LiteAdaptor> {
        static REGISTER: Once = Once::new();
        REGISTER.call_once(|| {
            let _ = register_adaptor::<LiteAdaptor>();
        });
        Session::bind(
            LiteAdaptor::new(LiteDocument::from_html(html)),
            Arc::new(TexInput::default()),
            Arc::new(ChtmlOutput::default()),
        )
        .unwrap()
    }

    #[test]
    fn anchors_point_into_text_nodes() {
        let mut session = session("<p>a $x$ b<br>c \\(y\\)</p>");
        let found = session.find_math(&Scope::document()).unwrap();
        let items = found.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].start.offset, 2);
        assert_eq!(items[0].end.offset, 5);
        assert_ne!(items[0].start.node, items[1].start.node);
        assert_eq!(items[1].start.offset, 2);
        session.reset();
    }

    #[test]
    fn stages_from_an_old_run_are_rejected() {
        let mut session = session("<p>$x$</p>");
        let stale = session.find_math(&Scope::document()).unwrap();
        session.reset();
        let _fresh = session.find_math(&Scope::document()).unwrap();
        let err = session.compile(stale).unwrap_err();
        assert!(matches!(
            *err.kind,
            SessionErrorKind::StageOutOfOrder { stage: "compile" }
        ));
    }

    #[test]
    fn a_second_find_before_reset_is_rejected() {
        let mut session = session("<p>$x$</p>");
        let _found = session.find_math(&Scope::document()).unwrap();
        assert!(matches!(
            *session.typeset().unwrap_err().kind,
            SessionErrorKind::InvocationInProgress
        ));
        session.reset();
        assert!(session.typeset().is_ok());
    }

    #[test]
    fn fragments_sharing_a_text_node_are_all_replaced() {
        let mut session = session("<p>$a$ and $b$, $c$</p>");
        let report = session.typeset().unwrap();
        assert_eq!(report.fragments, 3);
        assert_eq!(
            session
                .adaptor()
                .document()
                .elements_by_tag("mjx-container")
                .len(),
            3
        );
        let html = session.adaptor().document().to_html();
        assert!(html.contains("<mjx-container"));
        assert!(!html.contains('$'));
    }

    #[test]
    fn metrics_are_cached_per_container() {
        let mut session = session("<p>$a$ $b$</p><p>$c$</p>");
        let found = session.find_math(&Scope::document()).unwrap();
        let compiled = session.compile(found).unwrap();
        let measured = session.get_metrics(compiled).unwrap();
        assert_eq!(measured.items().len(), 3);
        assert_eq!(session.metrics.len(), 2);
        session.reset();
        assert!(session.metrics.is_empty());
    }
}
