//! # Superinstruction Service
//!
//! Entry point for the interpreter: owns the automaton, the converted code
//! cache and the counters.
//!
//! ## Lifecycle
//!
//! 1. `initialize` loads the dictionary from a [`PatternSource`] exactly once,
//!    validates it and builds the automaton.
//! 2. `convert` is only reachable on an initialized service.
//! 3. Clones share the automaton, cache and metrics.

use crate::adapters::{JsonPatternSource, StaticPatternSource};
use crate::cache::CodeCache;
use crate::config::SuperinstructionConfig;
use crate::domain::entities::ConvertedCode;
use crate::domain::services::keccak256;
use crate::domain::value_objects::Hash;
use crate::errors::{ConfigError, ConversionError, SuperinstructionError};
use crate::metrics::{ConversionMetrics, MetricsSnapshot};
use crate::optimizer::{Automaton, CodeRewriter};
use crate::ports::inbound::CodeConverter;
use crate::ports::outbound::PatternSource;

use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// The superinstruction conversion service.
#[derive(Clone, Debug)]
pub struct SuperinstructionService {
    /// Service configuration.
    config: Arc<SuperinstructionConfig>,
    /// Matcher, scheduler and rewriter over the loaded dictionary.
    rewriter: CodeRewriter,
    /// Converted code keyed by code hash; may be shared with other services.
    cache: Arc<CodeCache>,
    /// Service counters.
    metrics: Arc<ConversionMetrics>,
}

impl SuperinstructionService {
    /// Load the dictionary from `source` and build the automaton.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from the source, or
    /// [`ConfigError::EmptyDictionary`] if it yields no patterns.
    pub fn initialize<S>(source: &S, config: SuperinstructionConfig) -> Result<Self, ConfigError>
    where
        S: PatternSource + ?Sized,
    {
        Self::with_cache(source, config, Arc::new(CodeCache::new()))
    }

    /// Like [`initialize`](Self::initialize), converting into an existing cache.
    ///
    /// Services sharing a cache must be built from the same dictionary.
    ///
    /// # Errors
    ///
    /// See [`initialize`](Self::initialize).
    pub fn with_cache<S>(
        source: &S,
        config: SuperinstructionConfig,
        cache: Arc<CodeCache>,
    ) -> Result<Self, ConfigError>
    where
        S: PatternSource + ?Sized,
    {
        let dictionary = source.load_patterns()?;
        dictionary.validate()?;
        let automaton = Automaton::from_dictionary(&dictionary)?;

        info!(
            superinstructions = dictionary.len(),
            longest_pattern = dictionary.max_pattern_len(),
            nodes = automaton.node_count(),
            identity_conversion = config.identity_conversion,
            cache_enabled = config.cache_enabled,
            "Superinstruction dictionary loaded"
        );

        Ok(Self {
            config: Arc::new(config),
            rewriter: CodeRewriter::new(Arc::new(automaton)),
            cache,
            metrics: Arc::new(ConversionMetrics::new()),
        })
    }

    /// Initialize from configuration alone: the dictionary file when
    /// `dictionary_path` is set, the built-in pattern set otherwise.
    ///
    /// # Errors
    ///
    /// [`SuperinstructionError::Config`] for any failure described under
    /// [`initialize`](Self::initialize).
    pub fn from_config(config: SuperinstructionConfig) -> Result<Self, SuperinstructionError> {
        let service = match config.dictionary_path.clone() {
            Some(path) => Self::initialize(&JsonPatternSource::new(path), config)?,
            None => Self::initialize(&StaticPatternSource::evm_common(), config)?,
        };
        Ok(service)
    }

    /// Convert `code`, using the cache under `code_hash` when allowed.
    ///
    /// Identity conversion returns immediately and never touches the cache.
    /// The zero hash, or a disabled cache, recomputes on every call.
    ///
    /// # Errors
    ///
    /// [`ConversionError`] on an internal invariant violation. Nothing is
    /// cached for a failed call.
    #[instrument(skip(self, code), fields(code_len = code.len(), code_hash = %code_hash))]
    pub fn convert(
        &self,
        code: &[u8],
        code_hash: Hash,
    ) -> Result<Arc<ConvertedCode>, ConversionError> {
        if self.config.identity_conversion {
            self.metrics.record_identity();
            return Ok(Arc::new(ConvertedCode::identity(code)));
        }

        if !self.config.cache_enabled || code_hash.is_zero() {
            self.metrics.record_uncacheable();
            return self.compute(code).map(Arc::new);
        }

        let (converted, cache_hit) = self.cache.get_or_convert(code_hash, || self.compute(code))?;
        if cache_hit {
            self.metrics.record_cache_hit();
        } else {
            self.metrics.record_cache_miss();
        }
        debug!(cache_hit, symbols = converted.superinstructions, "Code converted");
        Ok(converted)
    }

    /// Convert `code`, hashing it with Keccak-256 for the cache key.
    ///
    /// # Errors
    ///
    /// See [`convert`](Self::convert).
    pub fn convert_code(&self, code: &[u8]) -> Result<Arc<ConvertedCode>, ConversionError> {
        self.convert(code, keccak256(code))
    }

    fn compute(&self, code: &[u8]) -> Result<ConvertedCode, ConversionError> {
        match self.rewriter.convert(code) {
            Ok(converted) => {
                self.metrics
                    .record_conversion(converted.superinstructions, converted.dispatches_saved);
                Ok(converted)
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(error = %e, code_len = code.len(), "Superinstruction conversion failed");
                Err(e)
            }
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &SuperinstructionConfig {
        &self.config
    }

    /// The shared cache.
    pub fn cache(&self) -> &Arc<CodeCache> {
        &self.cache
    }

    /// Counter snapshot.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Number of superinstructions in the loaded dictionary.
    pub fn symbol_count(&self) -> usize {
        self.rewriter.automaton().pattern_count()
    }
}

impl CodeConverter for SuperinstructionService {
    fn convert(&self, code: &[u8], code_hash: Hash) -> Result<Arc<ConvertedCode>, ConversionError> {
        SuperinstructionService::convert(self, code, code_hash)
    }
}

// =============================================================================
// TESTS
// =============================================================================
