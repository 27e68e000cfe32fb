use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::super::domain::{Category, StudentMarks, SubjectCode, Variant};
use super::TylEvaluator;

/// Number of distinct students passing, keyed by base code (`a1`) or variant (`c2-odd`).
pub type PassCounts = BTreeMap<String, usize>;

/// Distinct students with at least one pass per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReach {
    pub lx: usize,
    pub sx: usize,
    pub ax: usize,
    pub px: usize,
    pub cx: usize,
}

impl CategoryReach {
    fn bump(&mut self, category: Category) {
        match category {
            Category::Language => self.lx += 1,
            Category::SoftSkills => self.sx += 1,
            Category::Aptitude => self.ax += 1,
            Category::Programming => self.px += 1,
            Category::Core => self.cx += 1,
        }
    }
}

pub(crate) fn pass_counts(evaluator: &TylEvaluator, students: &[StudentMarks]) -> PassCounts {
    let mut counts = PassCounts::new();

    for student in students {
        let keys: BTreeSet<String> = passed_codes(evaluator, student)
            .flat_map(|code| counter_keys(&code))
            .collect();

        for key in keys {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    counts
}

pub(crate) fn category_reach(evaluator: &TylEvaluator, students: &[StudentMarks]) -> CategoryReach {
    let mut reach = CategoryReach::default();

    for student in students {
        let categories: BTreeSet<Category> = passed_codes(evaluator, student)
            .map(|code| code.category)
            .collect();

        for category in categories {
            reach.bump(category);
        }
    }

    reach
}

fn passed_codes<'a>(
    evaluator: &'a TylEvaluator,
    student: &'a StudentMarks,
) -> impl Iterator<Item = SubjectCode> + 'a {
    student.marks.iter().filter_map(move |record| {
        let code = record.tyl_code()?;
        evaluator.passes(record).then_some(code)
    })
}

/// Variants count under their full code too; `p4` electives also feed the `p4-mad/fsd` or `p4-ds`
/// track. Duplicate keys collapse in the caller's set.
fn counter_keys(code: &SubjectCode) -> Vec<String> {
    let base = code.base();
    let mut keys = vec![base.to_string()];

    let Some(variant) = code.variant else {
        return keys;
    };
    keys.push(code.to_string());

    if base.category == Category::Programming && base.level == 4 {
        match variant {
            Variant::Mad | Variant::Fsd => keys.push(format!("{base}-mad/fsd")),
            Variant::Ds => keys.push(format!("{base}-ds")),
            _ => {}
        }
    }

    keys
}
