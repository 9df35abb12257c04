//! applicant-dedup: fuzzy duplicate detection for job applications.
//!
//! Given the submitted applications, partition them into groups that likely
//! represent the same person applying more than once. Names are compared
//! approximately; birth dates must match exactly.
//!
//! # Pipeline
//!
//! 1. [`normalization`]: lowercase, strip non letter/digit characters, collapse whitespace
//! 2. [`similarity`]: max of bigram Dice and token Jaccard, also with tokens reversed
//! 3. [`clustering`]: greedy single-linkage clusters inside each birth-date bucket
//! 4. [`report`]: groups of two or more plus an id index for row flagging
//!
//! The pipeline is a pure function of its input: no I/O, no shared state, and
//! the same input list always yields the same report.
//!
//! ```
//! use applicant_dedup::{find_duplicates, ApplicationRecord, DedupConfig};
//!
//! let records = vec![
//!     ApplicationRecord::new("1", "Ali Valiyev", Some("1990-01-01")),
//!     ApplicationRecord::new("2", "Valiyev Ali", Some("1990-01-01")),
//! ];
//! let report = find_duplicates(&records, &DedupConfig::default());
//! assert_eq!(report.groups.len(), 1);
//! assert!(report.is_duplicate("2"));
//! ```

pub mod clustering;
pub mod config;
pub mod error;
pub mod normalization;
pub mod notify;
pub mod record;
pub mod report;
pub mod similarity;

pub use clustering::{cluster, cluster_with};
pub use config::DedupConfig;
pub use error::{DedupError, Result};
pub use normalization::{normalize, tokenize};
pub use notify::{DuplicateNotification, NotificationSink};
pub use record::ApplicationRecord;
pub use report::{
    find_duplicates, find_duplicates_and_notify, report, DuplicateGroup, DuplicateReport,
};
pub use similarity::{
    names_match, similarity, similarity_breakdown, SimilarityBreakdown, DEFAULT_THRESHOLD,
};
