//! mathdoc - selective math typesetting for live documents
//!
//! A [`Session`] finds TeX math in a host document, compiles and renders
//! each fragment to CommonHTML markup, and splices the result back in
//! place. The host is reached only through a [`DocumentAdaptor`], so the
//! same pipeline drives the in-memory [`lite`] document and (with the
//! `wasm` feature) the browser DOM.
//!
//! ```
//! use mathdoc::lite::{LiteAdaptor, LiteDocument};
//! use mathdoc::{MathConfig, Session, register_adaptor};
//!
//! let _ = register_adaptor::<LiteAdaptor>();
//! let config = MathConfig::default();
//! let document = LiteDocument::from_html("<p>Area: $\\pi r^2$</p>");
//! let mut session = Session::bind(
//!     LiteAdaptor::new(document),
//!     config.input_processor(),
//!     config.output_processor(),
//! )?;
//! let report = session.typeset()?;
//! assert_eq!(report.fragments, 1);
//! # Ok::<(), mathdoc::SessionError>(())
//! ```
#![warn(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::str_to_string)]
#![warn(clippy::non_ascii_literal)]
#![warn(clippy::pointer_format)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::absolute_paths)]
#![warn(clippy::panic)]
#![warn(clippy::expect_used)]
#![warn(clippy::unwrap_in_result)]
#![warn(clippy::if_then_some_else_none)]
#![warn(clippy::unused_trait_names)]
#![warn(clippy::get_unwrap)]
#![warn(clippy::impl_trait_in_params)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::unimplemented)]
#![warn(clippy::return_and_then)]
#![warn(clippy::needless_raw_strings)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::rc_buffer)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::map_with_unused_argument_over_ranges)]
#![warn(clippy::missing_asserts_for_indexing)]
#![warn(clippy::separated_literal_suffix)]
#![warn(clippy::ref_patterns)]
// Not sure
#![allow(clippy::indexing_slicing)]
#![allow(clippy::string_slice)]
#![allow(clippy::pub_use)]
// clippy exceptions
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::default_numeric_fallback)]
#![allow(clippy::single_call_fn)]

extern crate alloc;

pub mod adaptor;
pub mod config;
pub mod dom_tree;
pub mod input;
pub mod legacy;
pub mod lite;
pub mod menu;
pub mod metrics;
pub mod namespace;
pub mod output;
pub mod session;
pub mod tick;
pub mod tree;
pub mod types;
pub mod utils;
#[cfg(feature = "wasm")]
pub mod wasm;
#[cfg(feature = "wasm")]
pub mod web;

pub use crate::adaptor::{DocumentAdaptor, NodeKind, register_adaptor};
pub use crate::config::MathConfig;
pub use crate::input::{InputProcessor, TexInput};
pub use crate::menu::{MenuProps, PopupMenu};
pub use crate::metrics::Metrics;
pub use crate::output::{ChtmlOutput, EmptyFont, FontPolicy, OutputProcessor, TexFont};
pub use crate::session::{Scope, Session, SharedSession, Stage, TypesetReport};
pub use crate::tick::TickQueue;
pub use crate::types::{ParseError, SessionError, SessionErrorKind};

/// Crate version, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
