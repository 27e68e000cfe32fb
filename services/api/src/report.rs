use crate::infra::{parse_core_variant, InMemoryRecordStore};
use clap::Args;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tyl_analytics::config::AppConfig;
use tyl_analytics::error::AppError;
use tyl_analytics::workflows::tyl::{
    Category, CohortFilter, CohortReport, CoreVariant, EvaluationScope, ResolvedThreshold,
    StudentId, StudentReport, TylAnalysisService, TylEvaluator, TylRules,
};

#[derive(Args, Debug)]
pub(crate) struct StudentReportArgs {
    /// Student profile CSV export
    #[arg(long)]
    pub(crate) profiles: PathBuf,
    /// Mark record CSV export
    #[arg(long)]
    pub(crate) marks: PathBuf,
    /// Student identifier (USN)
    #[arg(long)]
    pub(crate) student: String,
    /// Only list subjects recorded in this semester; levels still use the full history
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub(crate) semester: Option<u8>,
}

#[derive(Args, Debug)]
pub(crate) struct CohortReportArgs {
    /// Student profile CSV export
    #[arg(long)]
    pub(crate) profiles: PathBuf,
    /// Mark record CSV export
    #[arg(long)]
    pub(crate) marks: PathBuf,
    /// Department code, matched case-insensitively
    #[arg(long)]
    pub(crate) department: String,
    /// Restrict to one section
    #[arg(long)]
    pub(crate) section: Option<String>,
    /// Restrict to one year of study
    #[arg(long)]
    pub(crate) year: Option<u8>,
    /// Only count marks recorded in this semester
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub(crate) semester: Option<u8>,
}

#[derive(Args, Debug)]
pub(crate) struct ThresholdArgs {
    /// Subject code such as c3-full or p4-mad
    pub(crate) code: String,
    /// Core offering to assume when the code carries no suffix
    #[arg(long, value_parser = parse_core_variant)]
    pub(crate) variant: Option<CoreVariant>,
}

fn configured_rules() -> Result<TylRules, AppError> {
    let config = AppConfig::load()?;
    Ok(config.tyl.rules()?)
}

fn load_service(
    profiles: &Path,
    marks: &Path,
) -> Result<TylAnalysisService<InMemoryRecordStore>, AppError> {
    let store = InMemoryRecordStore::from_csv(profiles, marks)?;
    Ok(TylAnalysisService::new(Arc::new(store), configured_rules()?))
}

pub(crate) fn run_student_report(args: StudentReportArgs) -> Result<(), AppError> {
    let service = load_service(&args.profiles, &args.marks)?;
    let scope = EvaluationScope::from_optional(args.semester);
    let report = service.student_report(&StudentId(args.student), scope)?;
    print!("{}", render_student_report(&report));
    Ok(())
}

pub(crate) fn run_cohort_report(args: CohortReportArgs) -> Result<(), AppError> {
    let service = load_service(&args.profiles, &args.marks)?;
    let mut filter = CohortFilter::department(args.department);
    if let Some(section) = args.section {
        filter = filter.with_section(section);
    }
    if let Some(year) = args.year {
        filter = filter.with_year(year);
    }

    let scope = EvaluationScope::from_optional(args.semester);
    let report = service.cohort_report(&filter, scope)?;
    print!("{}", render_cohort_report(&report));
    Ok(())
}

pub(crate) fn run_threshold(args: ThresholdArgs) -> Result<(), AppError> {
    let evaluator = TylEvaluator::new(configured_rules()?);
    let resolved = evaluator.threshold_for(&args.code, args.variant);
    println!("{}", render_threshold(&args.code, resolved));
    Ok(())
}

pub(crate) fn render_student_report(report: &StudentReport) -> String {
    let mut out = String::new();
    let profile = &report.profile;
    let _ = writeln!(
        out,
        "TYL report for {} ({}) | {} | semester {} | {}",
        profile.name,
        profile.student_id,
        profile.department,
        profile.current_semester,
        report.scope.label()
    );

    if report.subjects.is_empty() {
        let _ = writeln!(out, "No TYL subjects recorded.");
    } else {
        let _ = writeln!(
            out,
            "{} of {} TYL subjects passed:",
            report.passed_subjects(),
            report.subjects.len()
        );
        for subject in &report.subjects {
            let result = if !subject.entered {
                "not entered"
            } else if subject.passed {
                "pass"
            } else {
                "fail"
            };
            let _ = writeln!(
                out,
                "- sem {} {:<10} {:>5.1} / {:<3} {}",
                subject.semester,
                subject.subject_code,
                subject.combined_score,
                subject.threshold,
                result
            );
        }
    }

    let _ = writeln!(out, "Levels reached (all semesters):");
    for category in Category::ordered() {
        let _ = writeln!(
            out,
            "  {:<12} {}",
            category.label(),
            report.levels.get(category)
        );
    }

    if !report.unrecognized_thresholds.is_empty() {
        let _ = writeln!(
            out,
            "Warning: fallback threshold used for {}",
            report.unrecognized_thresholds.join(", ")
        );
    }
    out
}

pub(crate) fn render_cohort_report(report: &CohortReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;
    let filter = &summary.filter;

    let mut heading = filter.department.clone();
    if let Some(section) = &filter.section {
        let _ = write!(heading, " section {section}");
    }
    if let Some(year) = filter.year {
        let _ = write!(heading, " year {year}");
    }

    let _ = writeln!(
        out,
        "TYL cohort summary for {} | {} | {} students",
        heading,
        summary.scope.label(),
        summary.total_students
    );

    if summary.passed_counts.is_empty() {
        let _ = writeln!(out, "No passing TYL marks in scope.");
    } else {
        let _ = writeln!(out, "Students passing:");
        for (code, count) in &summary.passed_counts {
            let _ = writeln!(out, "  {:<12} {}", code, count);
        }
    }

    let reach = &summary.levels_reached;
    let _ = writeln!(
        out,
        "Category reach: language {} | soft skills {} | aptitude {} | programming {} | core {}",
        reach.lx, reach.sx, reach.ax, reach.px, reach.cx
    );
    out
}

pub(crate) fn render_threshold(code: &str, resolved: ResolvedThreshold) -> String {
    if resolved.is_fallback() {
        format!(
            "{}: {} (fallback; no rule matches this code)",
            code.trim(),
            resolved.value
        )
    } else {
        format!("{}: {}", code.trim(), resolved.value)
    }
}
