//! Builder for creating ConvertEngine instances.

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::engine::{ConvertEngine, ConvertSummary};
use crate::error::{ConfigError, ConvertError};
use crate::format::{FormatError, FormatKind, FormatRegistry, default_registry};
use crate::io::{InputProvider, OutputTarget, resolve_source, resolve_target};

/// Collects the pieces of one conversion and resolves them into a
/// [`ConvertEngine`].
///
/// Setters only record values. Codecs are constructed and locations
/// resolved in [`build`](Self::build), after [`validate`](Self::validate)
/// has confirmed both sides are complete.
pub struct ConvertBuilder {
    config: PipelineConfig,
    registry: FormatRegistry,
    source_provider: Option<Arc<dyn InputProvider>>,
    target_provider: Option<Arc<dyn OutputTarget>>,
}

impl Default for ConvertBuilder {
    fn default() -> Self {
        Self::new(default_registry())
    }
}

/// The two format decisions made by [`ConvertBuilder::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedKinds {
    pub source: FormatKind,
    pub target: FormatKind,
}

impl ConvertBuilder {
    pub fn new(registry: FormatRegistry) -> Self {
        Self {
            config: PipelineConfig::default(),
            registry,
            source_provider: None,
            target_provider: None,
        }
    }

    /// Start from a scanned or deserialized configuration.
    pub fn from_config(config: PipelineConfig, registry: FormatRegistry) -> Self {
        Self {
            config,
            ..Self::new(registry)
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn source(mut self, raw: impl Into<String>) -> Self {
        self.config.source = Some(raw.into());
        self
    }

    pub fn source_type(mut self, kind: FormatKind) -> Self {
        self.config.source_type = Some(kind);
        self
    }

    pub fn target(mut self, raw: impl Into<String>) -> Self {
        self.config.target = Some(raw.into());
        self
    }

    pub fn target_type(mut self, kind: FormatKind) -> Self {
        self.config.target_type = Some(kind);
        self
    }

    pub fn source_delimiter(mut self, delimiter: char) -> Self {
        self.config.source_delimiter = Some(delimiter);
        self
    }

    pub fn target_delimiter(mut self, delimiter: char) -> Self {
        self.config.target_delimiter = Some(delimiter);
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.config.compress = compress;
        self
    }

    pub fn coerce(mut self, coerce: bool) -> Self {
        self.config.coerce = coerce;
        self
    }

    /// Read from an already-constructed provider instead of resolving the
    /// source string. The source string still names the location for
    /// detection and error messages.
    pub fn with_source_provider(mut self, provider: Arc<dyn InputProvider>) -> Self {
        if self.config.source.is_none() {
            self.config.source = Some(provider.id().to_string());
        }
        self.source_provider = Some(provider);
        self
    }

    /// Write to an already-constructed target instead of resolving the
    /// target string.
    pub fn with_target_provider(mut self, target: Arc<dyn OutputTarget>) -> Self {
        if self.config.target.is_none() {
            self.config.target = Some(target.id().to_string());
        }
        self.target_provider = Some(target);
        self
    }

    /// Check that both sides are complete, detecting formats where no
    /// explicit type was given. Performs no I/O.
    ///
    /// Checks run in a fixed order (source, source type, target, target type)
    /// and the first gap is reported.
    pub fn validate(&self) -> Result<ResolvedKinds, ConfigError> {
        let source = self.config.source.as_deref().ok_or(ConfigError::MissingSource)?;
        let source_kind = self
            .config
            .source_type
            .or_else(|| self.registry.detect(source))
            .ok_or(ConfigError::MissingSourceType)?;

        let target = self.config.target.as_deref().ok_or(ConfigError::MissingTarget)?;
        let target_kind = self
            .config
            .target_type
            .or_else(|| self.registry.detect(target))
            .ok_or(ConfigError::MissingTargetType)?;

        if !self.registry.has_format(source_kind) {
            return Err(ConfigError::UnknownSourceType(source_kind.to_string()));
        }
        if !self.registry.has_format(target_kind) {
            return Err(ConfigError::UnknownTargetType(target_kind.to_string()));
        }

        Ok(ResolvedKinds {
            source: source_kind,
            target: target_kind,
        })
    }

    /// Validate, construct both codecs, then resolve locations.
    ///
    /// The source is resolved before the target, so a missing source file
    /// fails before any target directory is created.
    pub fn build(self) -> Result<ConvertEngine, ConvertError> {
        let kinds = self.validate()?;

        let Self {
            config,
            registry,
            source_provider,
            target_provider,
        } = self;
        // validate() has confirmed both are present.
        let source = config.source.unwrap_or_default();
        let target = config.target.unwrap_or_default();

        tracing::debug!(
            source = %source,
            source_type = %kinds.source,
            explicit = config.source_type.is_some(),
            "resolved source format"
        );
        tracing::debug!(
            target = %target,
            target_type = %kinds.target,
            explicit = config.target_type.is_some(),
            "resolved target format"
        );

        let decoder = registry
            .decoder(kinds.source, config.source_delimiter)
            .map_err(|e| codec_error(e, ConfigError::UnknownSourceType))?;
        let encoder = registry
            .encoder(kinds.target, config.target_delimiter, config.compress)
            .map_err(|e| codec_error(e, ConfigError::UnknownTargetType))?;

        let input = match source_provider {
            Some(p) => p,
            None => resolve_source(&source)?,
        };
        let output = match target_provider {
            Some(t) => t,
            None => resolve_target(&target)?,
        };

        Ok(ConvertEngine::new(input, decoder, output, encoder).with_coerce(config.coerce))
    }

    /// Build and run in one step.
    pub fn run(self) -> Result<ConvertSummary, ConvertError> {
        self.build()?.run()
    }
}

fn codec_error(error: FormatError, unknown: fn(String) -> ConfigError) -> ConfigError {
    match error {
        FormatError::InvalidDelimiter(c) => ConfigError::InvalidDelimiter(c.to_string()),
        FormatError::UnknownFormat(name) => unknown(name),
        other => unknown(other.to_string()),
    }
}
