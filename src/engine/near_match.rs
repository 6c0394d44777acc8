//! Near-match resolution: which stored values are "close" to an input value.
//!
//! Every method except [`SimilarityMethod::Equal`] scores the full candidate
//! value set one comparison at a time, so the resolver refuses candidate
//! sets above a configured ceiling instead of running unbounded.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::{DedupeError, Result};
use crate::similarity::{fold, metaphone, similar_text_percent, soundex};
use crate::traits::notifier::Notifier;
use crate::traits::store::ValueStore;
use crate::types::config::{NearMatchConfig, ResourceFilter, SimilarityMethod};
use crate::types::resource::{PropertyId, ResourceKind};

/// Whether two case-folded values sit within an edit distance, exclusive.
///
/// Monotone in `cutoff`: raising it can only admit more pairs.
pub(crate) fn within_edit_distance(a: &str, b: &str, cutoff: usize) -> bool {
    strsim::levenshtein(a, b) < cutoff
}

/// Resolves values similar to an input under a chosen heuristic.
pub struct NearMatchResolver<S: ValueStore> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    config: NearMatchConfig,
}

impl<S: ValueStore> NearMatchResolver<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_config(store, notifier, NearMatchConfig::default())
    }

    pub fn with_config(
        store: Arc<S>,
        notifier: Arc<dyn Notifier>,
        config: NearMatchConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// The stored literal values of `property` considered near `input`.
    ///
    /// [`SimilarityMethod::Equal`] is a fast path that echoes the input
    /// without touching the store; whether that value actually exists is the
    /// caller's question to ask. Every other method fetches the candidate
    /// set first and refuses with
    /// [`DedupeError::TooManyCandidates`] when it exceeds the configured
    /// ceiling; narrow `filter` and retry. An empty input or an unknown
    /// property yields an empty result.
    pub async fn near_values(
        &self,
        kind: ResourceKind,
        method: SimilarityMethod,
        input: &str,
        property: PropertyId,
        filter: Option<&ResourceFilter>,
    ) -> Result<Vec<String>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let folded_input = fold(input);
        let keep: Box<dyn Fn(&str) -> bool> = match method {
            SimilarityMethod::Equal => return Ok(vec![input.to_owned()]),
            SimilarityMethod::SimilarText => {
                let cutoff = self.config.similar_text_cutoff;
                Box::new(move |folded| similar_text_percent(&folded_input, folded) > cutoff)
            }
            SimilarityMethod::Levenshtein => {
                let cutoff = self.config.levenshtein_cutoff;
                Box::new(move |folded| within_edit_distance(&folded_input, folded, cutoff))
            }
            SimilarityMethod::Metaphone => {
                // Phonetic code of the input, computed once.
                let input_code = metaphone(&folded_input);
                Box::new(move |folded| {
                    let code = metaphone(folded);
                    !code.is_empty() && code == input_code
                })
            }
            SimilarityMethod::Soundex => {
                let input_code = soundex(&folded_input);
                Box::new(move |folded| {
                    let code = soundex(folded);
                    !code.is_empty() && code == input_code
                })
            }
        };

        let rows = self.store.literal_values(kind, property, filter).await?;
        let candidates: BTreeSet<String> = rows
            .into_iter()
            .map(|row| row.value)
            .filter(|v| !v.is_empty())
            .collect();

        if candidates.len() > self.config.max_candidates {
            self.notifier.warn(&format!(
                "{} candidate values for property {property}, limit is {}; \
                 narrow the filter and retry",
                candidates.len(),
                self.config.max_candidates,
            ));
            return Err(DedupeError::TooManyCandidates {
                count: candidates.len(),
                limit: self.config.max_candidates,
            });
        }

        let matches: Vec<String> = candidates
            .into_iter()
            .filter(|candidate| keep(&fold(candidate)))
            .collect();

        debug!(
            kind = %kind,
            property = %property,
            method = ?method,
            matches = matches.len(),
            "near-match resolution complete"
        );

        Ok(matches)
    }
}
