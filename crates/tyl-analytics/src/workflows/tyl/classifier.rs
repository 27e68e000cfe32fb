use std::sync::OnceLock;

use regex::Regex;

use super::domain::{BaseCode, Category, SubjectCode, Variant};

const TYL_PATTERN: &str =
    r"^(a[1-4]|c[2-5]|l[1-4]|p[1-4]|s[1-4])(-odd|-full|-python|-java|-c|-mad|-fsd|-ds)?$";

fn tyl_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(TYL_PATTERN).expect("TYL subject pattern compiles"))
}

fn base_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([a-z])(\d)(?:-(.*))?").expect("base prefix compiles"))
}

/// Canonical form used for storage keys and matching.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Whole-string match against the TYL subject pattern after lowercasing.
///
/// Surrounding whitespace is not stripped here; callers normalise first.
pub fn is_tyl_subject(code: &str) -> bool {
    tyl_pattern().is_match(&code.to_ascii_lowercase())
}

pub(crate) fn parse(raw: &str) -> Option<SubjectCode> {
    let normalized = normalize(raw);
    let captures = tyl_pattern().captures(&normalized)?;
    let base = captures.get(1)?.as_str();
    let variant = match captures.get(2) {
        Some(suffix) => Some(Variant::from_suffix(suffix.as_str().trim_start_matches('-'))?),
        None => None,
    };
    let base = split_base(base)?;

    Some(SubjectCode {
        category: base.category,
        level: base.level,
        variant,
    })
}

/// Lenient shape of any code that starts with a letter and a digit.
///
/// Used only for threshold lookup, where `p4-anything` or an out-of-range level such as `a5`
/// still resolves through its category and level. Unknown suffixes carry no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CodeShape {
    pub(crate) base: BaseCode,
    pub(crate) variant: Option<Variant>,
}

pub(crate) fn shape(raw: &str) -> Option<CodeShape> {
    let normalized = normalize(raw);
    if let Some(code) = parse(&normalized) {
        return Some(CodeShape {
            base: code.base(),
            variant: code.variant,
        });
    }

    let captures = base_prefix().captures(&normalized)?;
    let category = Category::from_letter(captures.get(1)?.as_str().chars().next()?)?;
    let level = captures.get(2)?.as_str().parse::<u8>().ok()?;
    let variant = captures
        .get(3)
        .and_then(|suffix| Variant::from_suffix(suffix.as_str()));

    Some(CodeShape {
        base: BaseCode::new(category, level),
        variant,
    })
}

fn split_base(base: &str) -> Option<BaseCode> {
    let mut chars = base.chars();
    let category = Category::from_letter(chars.next()?)?;
    let level = chars.next()?.to_digit(10)? as u8;
    Some(BaseCode::new(category, level))
}

