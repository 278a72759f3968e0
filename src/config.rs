//! JSON configuration surface.
//!
//! ```json
//! {
//!   "tex": { "packages": ["ams", "color"], "inlineMath": [["$", "$"]] },
//!   "chtml": { "font": "empty", "scale": 1.2 },
//!   "options": { "ignoreHtmlClass": ["no-math"] }
//! }
//! ```
//!
//! Every section and every key is optional; missing values take the
//! defaults of [`TexConfig`], [`ChtmlConfig`] and [`DocumentOptions`].

use alloc::sync::Arc;

use serde::Deserialize;

use crate::input::{InputProcessor, TexInput};
use crate::output::{ChtmlOutput, OutputProcessor};
use crate::types::{ChtmlConfig, DocumentOptions, SessionError, TexConfig};

/// Complete configuration of one typesetting setup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MathConfig {
    /// Input processor configuration
    pub tex: TexConfig,
    /// Output processor configuration
    pub chtml: ChtmlConfig,
    /// Document discovery options
    pub options: DocumentOptions,
}

impl MathConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// ```
    /// use mathdoc::config::MathConfig;
    /// use mathdoc::types::FontChoice;
    ///
    /// let config = MathConfig::from_json(r#"{"chtml": {"font": "empty"}}"#).unwrap();
    /// assert_eq!(config.chtml.font, FontChoice::Empty);
    /// assert!(MathConfig::from_json(r#"{"tex": {"packages": ["nope"]}}"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let config: Self = serde_json::from_str(json)?;
        config.tex.validate()?;
        Ok(config)
    }

    /// Builds the input processor.
    #[must_use]
    pub fn input_processor(&self) -> Arc<dyn InputProcessor> {
        Arc::new(TexInput::new(self.tex.clone()))
    }

    /// Builds the output processor.
    #[must_use]
    pub fn output_processor(&self) -> Arc<dyn OutputProcessor> {
        Arc::new(ChtmlOutput::new(self.chtml.clone()))
    }
}
