//! Input processing: finding math in document text and compiling it.
//!
//! The session only talks to the [`InputProcessor`] trait. [`TexInput`] is
//! the TeX implementation, built from a [`TexConfig`].

use core::fmt;

use crate::types::{ParseError, SessionError, TexConfig};

mod find;
pub use find::{MatchKind, MathFinder, MathMatch};

mod lexer;
pub use lexer::{Lexer, Token};

pub mod packages;
pub use packages::Package;

mod parse_node;
pub use parse_node::{Family, FracStyle, Notation, ParseNode, Variant};

mod parser;
pub use parser::parse;

/// Recognises and compiles math fragments.
pub trait InputProcessor: Send + Sync + fmt::Debug {
    /// Short name used in logs (`"TeX"`).
    fn name(&self) -> &'static str;

    /// Checks the configuration. Called when a session is bound.
    fn validate(&self) -> Result<(), SessionError>;

    /// Finds every fragment of one text run, in order.
    fn find_math(&self, text: &str) -> Vec<MathMatch>;

    /// Compiles the source of one fragment.
    fn compile(&self, source: &str) -> Result<ParseNode, ParseError>;
}

/// TeX input processor.
#[derive(Debug, Clone)]
pub struct TexInput {
    config: TexConfig,
    finder: MathFinder,
}

impl TexInput {
    /// Creates a processor for `config`. The configuration is checked by
    /// [`InputProcessor::validate`], not here.
    #[must_use]
    pub fn new(config: TexConfig) -> Self {
        let finder = MathFinder::new(&config);
        Self { config, finder }
    }

    /// The configuration this processor was built from.
    #[must_use]
    pub const fn config(&self) -> &TexConfig {
        &self.config
    }
}

impl Default for TexInput {
    fn default() -> Self {
        Self::new(TexConfig::default())
    }
}

impl InputProcessor for TexInput {
    fn name(&self) -> &'static str {
        "TeX"
    }

    fn validate(&self) -> Result<(), SessionError> {
        self.config.validate()
    }

    fn find_math(&self, text: &str) -> Vec<MathMatch> {
        self.finder.find(text)
    }

    fn compile(&self, source: &str) -> Result<ParseNode, ParseError> {
        parse(source, self.config.packages)
    }
}
