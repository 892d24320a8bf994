// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request matchers: substring, regex, and token-overlap similarity.
//!
//! A [`MatchSpec`] describes what a rule should accept. Specs compile
//! once at registration time; matching itself never fails and never
//! allocates beyond the text normalization it needs.

use crate::error::RuleError;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Matcher criteria for a rule.
///
/// Every configured criterion must accept (AND); a spec with none set
/// matches any request. Case sensitivity of `contains` follows engine
/// configuration; `regex` is always case-insensitive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchSpec {
    /// Substring needle(s); any one hit satisfies the criterion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<Needles>,

    /// Regex applied to the request's primary text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// Reference phrase for token-overlap similarity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<String>,

    /// Per-rule similarity threshold; engine default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_threshold: Option<f64>,
}

/// One substring needle or several alternatives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Needles {
    One(String),
    Any(Vec<String>),
}

impl Needles {
    fn to_vec(&self) -> Vec<String> {
        match self {
            Needles::One(needle) => vec![needle.clone()],
            Needles::Any(needles) => needles.clone(),
        }
    }
}

impl MatchSpec {
    /// Match any request.
    pub fn any() -> Self {
        Self::default()
    }

    /// Substring match against one needle.
    pub fn contains(needle: impl Into<String>) -> Self {
        Self {
            contains: Some(Needles::One(needle.into())),
            ..Self::default()
        }
    }

    /// Substring match against any of several needles.
    pub fn contains_any<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contains: Some(Needles::Any(needles.into_iter().map(Into::into).collect())),
            ..Self::default()
        }
    }

    /// Case-insensitive regex match.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            regex: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Token-overlap similarity against a reference phrase.
    pub fn similar_to(phrase: impl Into<String>) -> Self {
        Self {
            semantic: Some(phrase.into()),
            ..Self::default()
        }
    }

    /// Override the engine's similarity threshold for this rule.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.semantic_threshold = Some(threshold);
        self
    }

    /// Whether no criterion is configured.
    pub fn is_empty(&self) -> bool {
        self.contains.is_none() && self.regex.is_none() && self.semantic.is_none()
    }
}

/// Compiled criterion over the request's primary text.
type Criterion = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A matcher compiled at registration time.
pub(crate) struct CompiledMatcher {
    criteria: Vec<Criterion>,
}

impl fmt::Debug for CompiledMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMatcher")
            .field("criteria", &self.criteria.len())
            .finish_non_exhaustive()
    }
}

impl CompiledMatcher {
    /// Compile `spec`, validating the regex and threshold.
    pub(crate) fn compile(
        spec: &MatchSpec,
        default_threshold: f64,
        case_sensitive: bool,
    ) -> Result<Self, RuleError> {
        if let Some(threshold) = spec.semantic_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(RuleError::Threshold(threshold));
            }
        }

        let mut criteria: Vec<Criterion> = Vec::new();

        if let Some(needles) = &spec.contains {
            if case_sensitive {
                let needles = needles.to_vec();
                criteria.push(Arc::new(move |text| {
                    needles.iter().any(|needle| text.contains(needle.as_str()))
                }));
            } else {
                let needles: Vec<String> =
                    needles.to_vec().into_iter().map(|n| n.to_lowercase()).collect();
                criteria.push(Arc::new(move |text| {
                    let haystack = text.to_lowercase();
                    needles.iter().any(|needle| haystack.contains(needle.as_str()))
                }));
            }
        }

        if let Some(pattern) = &spec.regex {
            let re = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            criteria.push(Arc::new(move |text| re.is_match(text)));
        }

        if let Some(phrase) = &spec.semantic {
            let threshold = spec.semantic_threshold.unwrap_or(default_threshold);
            if !(0.0..=1.0).contains(&threshold) {
                return Err(RuleError::Threshold(threshold));
            }
            let reference = tokenize(phrase);
            criteria.push(Arc::new(move |text| {
                jaccard(&tokenize(text), &reference) >= threshold
            }));
        }

        Ok(Self { criteria })
    }

    /// True when every configured criterion accepts `text`.
    ///
    /// An empty criteria list accepts everything.
    pub(crate) fn matches(&self, text: &str) -> bool {
        self.criteria.iter().all(|criterion| criterion(text))
    }
}

/// Lowercased word tokens: runs of ASCII alphanumerics, `_`, or `'`.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '\''))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Jaccard similarity of two token sets.
///
/// Both sets empty is 1.0; exactly one empty is 0.0.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}

/// Similarity of two raw texts, tokenized with [`tokenize`].
pub fn similarity(a: &str, b: &str) -> f64 {
    jaccard(&tokenize(a), &tokenize(b))
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
