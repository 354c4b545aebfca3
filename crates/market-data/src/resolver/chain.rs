//! Field chain - tries lookup strategies in order for a single quote field.
//!
//! Each strategy names the source it needs and a pure extractor over that
//! source's payload. The [`EvidenceCache`] fetches every source at most once
//! per ticker, so a field that resolves from the quote summary never causes
//! a history request.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{Bar, Lookup, QuoteSummary, SourceKind, Unavailable};
use crate::provider::QuoteSource;

/// Data returned by one source.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Summary(QuoteSummary),
    Bars(Vec<Bar>),
}

impl Payload {
    pub fn summary(&self) -> Option<&QuoteSummary> {
        match self {
            Self::Summary(summary) => Some(summary),
            Self::Bars(_) => None,
        }
    }

    pub fn bars(&self) -> Option<&[Bar]> {
        match self {
            Self::Summary(_) => None,
            Self::Bars(bars) => Some(bars),
        }
    }
}

/// One way of resolving a field.
pub struct Strategy<T> {
    /// Name used in diagnostics, e.g. `summaryDetail.open`
    pub name: &'static str,
    /// Source the extractor reads from
    pub source: SourceKind,
    /// Pure extractor; `None` means the source did not carry the field
    pub extract: fn(&Payload) -> Option<T>,
}

impl<T> Strategy<T> {
    pub const fn new(
        name: &'static str,
        source: SourceKind,
        extract: fn(&Payload) -> Option<T>,
    ) -> Self {
        Self {
            name,
            source,
            extract,
        }
    }
}

/// Ordered strategies for one field. The first strategy to yield a value wins.
pub struct FieldChain<T> {
    strategies: Vec<Strategy<T>>,
}

impl<T> FieldChain<T> {
    pub fn starting_with(strategy: Strategy<T>) -> Self {
        Self {
            strategies: vec![strategy],
        }
    }

    /// Append a fallback strategy.
    pub fn or(mut self, strategy: Strategy<T>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategies(&self) -> &[Strategy<T>] {
        &self.strategies
    }
}

/// Per-ticker cache of fetched sources.
pub struct EvidenceCache<'a> {
    source: &'a dyn QuoteSource,
    symbol: &'a str,
    loaded: HashMap<SourceKind, Lookup<Payload>>,
}

impl<'a> EvidenceCache<'a> {
    pub fn new(source: &'a dyn QuoteSource, symbol: &'a str) -> Self {
        Self {
            source,
            symbol,
            loaded: HashMap::new(),
        }
    }

    async fn fetch(&self, kind: SourceKind) -> Lookup<Payload> {
        let fetched = match kind {
            SourceKind::Summary => self
                .source
                .quote_summary(self.symbol)
                .await
                .map(Payload::Summary),
            SourceKind::History(window) => self
                .source
                .price_history(self.symbol, window)
                .await
                .map(Payload::Bars),
        };

        match fetched {
            Ok(payload) => Lookup::Value(payload),
            Err(e) => {
                debug!(
                    "{} {} unavailable for {}: {}",
                    self.source.id(),
                    kind,
                    self.symbol,
                    e
                );
                Lookup::Unavailable(Unavailable::SourceFailed {
                    source: kind,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Load a source, fetching it on first use.
    pub async fn load(&mut self, kind: SourceKind) -> &Lookup<Payload> {
        let lookup = match self.loaded.remove(&kind) {
            Some(lookup) => lookup,
            None => self.fetch(kind).await,
        };
        self.loaded.entry(kind).or_insert(lookup)
    }

    /// Evaluate a chain, stopping at the first strategy that yields a value.
    ///
    /// When nothing resolves, the reason from the last strategy is returned.
    pub async fn resolve<T>(&mut self, chain: &FieldChain<T>) -> Lookup<T> {
        let mut reason = Unavailable::NotResolved;

        for strategy in chain.strategies() {
            match self.load(strategy.source).await {
                Lookup::Value(payload) => {
                    if let Some(value) = (strategy.extract)(payload) {
                        return Lookup::Value(value);
                    }
                    reason = Unavailable::Missing {
                        source: strategy.source,
                        strategy: strategy.name,
                    };
                }
                Lookup::Unavailable(unavailable) => reason = unavailable.clone(),
            }
        }

        Lookup::Unavailable(reason)
    }

    /// Number of distinct sources fetched so far.
    pub fn sources_consulted(&self) -> usize {
        self.loaded.len()
    }

    /// Sources that failed, with their error message.
    pub fn failures(&self) -> Vec<(SourceKind, String)> {
        self.loaded
            .values()
            .filter_map(|lookup| match lookup.reason() {
                Some(Unavailable::SourceFailed { source, message }) => {
                    Some((*source, message.clone()))
                }
                _ => None,
            })
            .collect()
    }
}
