use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub category: String,
    pub keywords: Vec<String>,
}

/// Ordered keyword rules with an explicit fallback category.
///
/// Matching is case-insensitive substring containment; the first rule with a
/// matching keyword wins, so rule order is part of the policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Classifier {
    name: String,
    rules: Vec<Rule>,
    fallback: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification<'a> {
    pub category: &'a str,
    pub matched_keyword: Option<&'a str>,
}

impl Classification<'_> {
    pub fn is_fallback(&self) -> bool {
        self.matched_keyword.is_none()
    }
}

impl Classifier {
    pub fn new(
        name: impl Into<String>,
        rules: Vec<Rule>,
        fallback: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        let fallback = fallback.into().trim().to_owned();
        if fallback.is_empty() {
            return Err(CatalogError::MissingFallback { classifier: name });
        }

        let mut seen = BTreeSet::new();
        let mut normalized = Vec::with_capacity(rules.len());
        for rule in rules {
            let category = rule.category.trim().to_owned();
            if !seen.insert(category.clone()) {
                return Err(CatalogError::DuplicateCategory { classifier: name, category });
            }

            let keywords = rule
                .keywords
                .iter()
                .map(|keyword| keyword.trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect::<Vec<_>>();
            if category.is_empty() || keywords.is_empty() {
                return Err(CatalogError::EmptyRule { classifier: name, category });
            }

            normalized.push(Rule { category, keywords });
        }

        Ok(Self { name, rules: normalized, fallback })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Every category this classifier can produce, rules first, fallback last.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> =
            self.rules.iter().map(|rule| rule.category.as_str()).collect();
        if !categories.contains(&self.fallback.as_str()) {
            categories.push(&self.fallback);
        }
        categories
    }

    pub fn classify(&self, value: &str) -> Classification<'_> {
        let haystack = value.to_lowercase();
        for rule in &self.rules {
            if let Some(keyword) = rule.keywords.iter().find(|keyword| haystack.contains(*keyword)) {
                return Classification {
                    category: &rule.category,
                    matched_keyword: Some(keyword.as_str()),
                };
            }
        }

        Classification { category: &self.fallback, matched_keyword: None }
    }
}
