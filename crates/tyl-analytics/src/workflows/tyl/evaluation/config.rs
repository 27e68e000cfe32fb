use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::super::domain::{BaseCode, Category, CoreVariant};

/// Threshold for a core subject level, optionally specific to its odd/full offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreThreshold {
    pub level: u8,
    /// `None` applies whatever suffix the code carries.
    #[serde(default)]
    pub variant: Option<CoreVariant>,
    pub threshold: u16,
}

/// Suffix-independent threshold for a category level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub category: Category,
    pub level: u8,
    pub threshold: u16,
}

/// Immutable threshold and category tables handed to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TylRules {
    pub core: Vec<CoreThreshold>,
    pub levels: Vec<LevelThreshold>,
    /// Levels that make up each category, walked in ascending order.
    pub categories: BTreeMap<Category, Vec<u8>>,
    pub fallback_threshold: u16,
}

impl TylRules {
    /// Tables used by the department today.
    pub fn standard() -> Self {
        let core = vec![
            core(2, Some(CoreVariant::Odd), 10),
            core(2, Some(CoreVariant::Full), 10),
            core(3, Some(CoreVariant::Odd), 25),
            core(3, Some(CoreVariant::Full), 50),
            core(4, Some(CoreVariant::Odd), 50),
            core(4, Some(CoreVariant::Full), 50),
            core(5, None, 50),
        ];

        let mut levels = vec![
            level(Category::Programming, 1, 50),
            level(Category::Programming, 2, 50),
            level(Category::Programming, 3, 60),
            level(Category::Programming, 4, 70),
            level(Category::Language, 1, 65),
            level(Category::Language, 2, 65),
            level(Category::Language, 3, 70),
            level(Category::Language, 4, 70),
            level(Category::Aptitude, 1, 50),
            level(Category::Aptitude, 2, 50),
            level(Category::Aptitude, 3, 50),
            level(Category::Aptitude, 4, 60),
        ];
        levels.extend((1..=4).map(|lvl| level(Category::SoftSkills, lvl, 50)));

        let categories = BTreeMap::from([
            (Category::Aptitude, vec![1, 2, 3, 4]),
            (Category::Language, vec![1, 2, 3, 4]),
            (Category::SoftSkills, vec![1, 2, 3, 4]),
            (Category::Programming, vec![1, 2, 3, 4]),
            (Category::Core, vec![2, 3, 4, 5]),
        ]);

        Self {
            core,
            levels,
            categories,
            fallback_threshold: 50,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rules: TylRules = serde_json::from_str(&raw)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Base codes of a category in ascending level order.
    pub fn category_subjects(&self, category: Category) -> Vec<BaseCode> {
        let mut levels = self
            .categories
            .get(&category)
            .cloned()
            .unwrap_or_default();
        levels.sort_unstable();
        levels.dedup();
        levels
            .into_iter()
            .map(|lvl| BaseCode::new(category, lvl))
            .collect()
    }

    pub(crate) fn validate(&self) -> Result<(), RulesError> {
        let out_of_range = self
            .core
            .iter()
            .map(|entry| entry.threshold)
            .chain(self.levels.iter().map(|entry| entry.threshold))
            .chain(std::iter::once(self.fallback_threshold))
            .find(|threshold| *threshold > 100);

        if let Some(threshold) = out_of_range {
            return Err(RulesError::ThresholdOutOfRange(threshold));
        }

        if let Some((category, _)) = self
            .categories
            .iter()
            .find(|(_, levels)| levels.iter().any(|lvl| !(1..=9).contains(lvl)))
        {
            return Err(RulesError::InvalidLevel(*category));
        }

        Ok(())
    }
}

impl Default for TylRules {
    fn default() -> Self {
        Self::standard()
    }
}

fn core(level: u8, variant: Option<CoreVariant>, threshold: u16) -> CoreThreshold {
    CoreThreshold {
        level,
        variant,
        threshold,
    }
}

fn level(category: Category, level: u8, threshold: u16) -> LevelThreshold {
    LevelThreshold {
        category,
        level,
        threshold,
    }
}

/// Failure to load a rules override.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("unable to read TYL rules from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TYL rules document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("threshold {0} exceeds the 100 point combined maximum")]
    ThresholdOutOfRange(u16),
    #[error("category {0:?} lists a level outside 1-9")]
    InvalidLevel(Category),
}
