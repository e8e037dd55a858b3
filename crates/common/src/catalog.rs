//! Static catalog data: the rubric, the reviewable samples and the badge set
//!
//! The engine only reads this. It is loaded once at startup, either from the
//! embedded default or from a JSON file with the same layout.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Badge, BadgeCategory, CodeSample, ReferenceAnswerKey, Rubric};

const BUILTIN_CATALOG: &str = include_str!("../catalog/default.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub rubric: Rubric,
    pub samples: Vec<CodeSample>,
    pub badges: Vec<Badge>,
}

impl Catalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json(&content)?;
        info!(
            "Loaded catalog from {} ({} samples, {} badges)",
            path.display(),
            catalog.samples.len(),
            catalog.badges.len()
        );
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn sample(&self, id: &str) -> Option<&CodeSample> {
        self.samples.iter().find(|s| s.id == id)
    }

    pub fn answer_key(&self) -> ReferenceAnswerKey {
        self.samples
            .iter()
            .map(|s| (s.id.clone(), s.reference_scores()))
            .collect()
    }

    pub fn badges_in(&self, category: BadgeCategory) -> impl Iterator<Item = &Badge> {
        self.badges.iter().filter(move |b| b.category == category)
    }

    /// Reject catalogs the engine cannot score against
    pub fn validate(&self) -> Result<()> {
        let rubric = &self.rubric;
        if rubric.criteria.is_empty() {
            return Err(Error::Config("rubric has no criteria".to_string()));
        }

        let mut names = HashSet::new();
        for criterion in &rubric.criteria {
            if !names.insert(criterion.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate criterion: {}",
                    criterion.name
                )));
            }
            if criterion.max_score <= 0.0 || criterion.max_score < rubric.min_score {
                return Err(Error::Config(format!(
                    "criterion {} has invalid max score {}",
                    criterion.name, criterion.max_score
                )));
            }
        }

        let mut sample_ids = HashSet::new();
        for sample in &self.samples {
            if !sample_ids.insert(sample.id.as_str()) {
                return Err(Error::Config(format!("duplicate sample: {}", sample.id)));
            }
            for criterion in &rubric.criteria {
                let grade = sample.reference.get(&criterion.name).ok_or_else(|| {
                    Error::Config(format!(
                        "sample {} has no reference grade for {}",
                        sample.id, criterion.name
                    ))
                })?;
                if grade.score < rubric.min_score || grade.score > criterion.max_score {
                    return Err(Error::Config(format!(
                        "sample {} reference grade {} for {} out of range",
                        sample.id, grade.score, criterion.name
                    )));
                }
            }
            if let Some(extra) = sample
                .reference
                .keys()
                .find(|name| rubric.criterion(name).is_none())
            {
                return Err(Error::Config(format!(
                    "sample {} grades unknown criterion {}",
                    sample.id, extra
                )));
            }
        }

        let mut badge_ids = HashSet::new();
        for badge in &self.badges {
            if !badge_ids.insert(badge.id.as_str()) {
                return Err(Error::Config(format!("duplicate badge: {}", badge.id)));
            }
        }

        Ok(())
    }
}
