//! Skill-track (TYL) eligibility evaluation for academic records.
//!
//! The crate turns persisted internal-assessment marks into pass/fail outcomes, contiguous
//! "level reached" values per skill category and cohort-wide summaries. Storage stays behind the
//! [`workflows::tyl::TylRecordStore`] trait so the evaluator only ever sees in-memory records.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
