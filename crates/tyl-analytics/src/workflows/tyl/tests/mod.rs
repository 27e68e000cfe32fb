mod cohort;
mod common;
