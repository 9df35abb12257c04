//! Duplicate reporting
//!
//! Flattens clusters into the groups a reviewer sees and the id index used
//! to flag individual rows.

use std::collections::HashSet;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::clustering::cluster_with;
use crate::config::DedupConfig;
use crate::notify::{DuplicateNotification, NotificationSink};
use crate::record::ApplicationRecord;

/// Records that likely belong to the same applicant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup<'a> {
    /// Shared birth-date key (`""` when missing)
    pub date_of_birth: &'a str,
    /// Members in input order, always at least two
    pub members: Vec<&'a ApplicationRecord>,
}

impl<'a> DuplicateGroup<'a> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.members.iter().map(|&r| r.id.as_str())
    }
}

/// Result of one duplicate-detection run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DuplicateReport<'a> {
    pub groups: Vec<DuplicateGroup<'a>>,
    #[serde(serialize_with = "serialize_sorted")]
    pub duplicate_ids: HashSet<&'a str>,
}

/// Serialize ids in sorted order so repeated runs produce identical output
fn serialize_sorted<S: Serializer>(ids: &HashSet<&str>, serializer: S) -> Result<S::Ok, S::Error> {
    let mut sorted: Vec<&&str> = ids.iter().collect();
    sorted.sort();
    sorted.serialize(serializer)
}

impl<'a> DuplicateReport<'a> {
    /// Whether a record was placed in any duplicate group
    pub fn is_duplicate(&self, id: &str) -> bool {
        self.duplicate_ids.contains(id)
    }

    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// The "duplicates found" event for badge/notification components
    pub fn notification(&self) -> DuplicateNotification {
        DuplicateNotification {
            has_duplicates: self.has_duplicates(),
            count: self.groups.len(),
        }
    }
}

/// Keep clusters of two or more and index their ids.
pub fn report<'a>(clusters: Vec<Vec<&'a ApplicationRecord>>) -> DuplicateReport<'a> {
    let mut groups = Vec::new();
    let mut duplicate_ids = HashSet::new();

    for members in clusters {
        if members.len() < 2 {
            continue;
        }

        let first: &'a ApplicationRecord = members[0];
        duplicate_ids.extend(members.iter().map(|&r| r.id.as_str()));
        groups.push(DuplicateGroup {
            date_of_birth: first.dob_key(),
            members,
        });
    }

    DuplicateReport {
        groups,
        duplicate_ids,
    }
}

/// Run the full pipeline: bucket, cluster, report.
pub fn find_duplicates<'a>(
    records: &'a [ApplicationRecord],
    config: &DedupConfig,
) -> DuplicateReport<'a> {
    let result = report(cluster_with(records, config));
    debug!(
        records = records.len(),
        groups = result.groups.len(),
        flagged = result.duplicate_ids.len(),
        "duplicate detection complete"
    );
    result
}

/// Run the full pipeline and deliver the notification to `sink` once.
pub fn find_duplicates_and_notify<'a, S: NotificationSink + ?Sized>(
    records: &'a [ApplicationRecord],
    config: &DedupConfig,
    sink: &mut S,
) -> DuplicateReport<'a> {
    let result = find_duplicates(records, config);
    sink.notify(&result.notification());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_drops_singletons() {
        let a = ApplicationRecord::new("1", "Ali", Some("d"));
        let b = ApplicationRecord::new("2", "Ali", Some("d"));
        let c = ApplicationRecord::new("3", "Botir", Some("d"));

        let result = report(vec![vec![&a, &b], vec![&c]]);
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].date_of_birth, "d");
        assert_eq!(result.groups[0].ids().collect::<Vec<_>>(), vec!["1", "2"]);
        assert!(result.is_duplicate("1"));
        assert!(result.is_duplicate("2"));
        assert!(!result.is_duplicate("3"));
    }

    #[test]
    fn test_report_empty() {
        let result = report(Vec::new());
        assert!(result.groups.is_empty());
        assert!(result.duplicate_ids.is_empty());
        assert_eq!(
            result.notification(),
            DuplicateNotification {
                has_duplicates: false,
                count: 0
            }
        );
    }

    #[test]
    fn test_notify_called_once() {
        let records = vec![
            ApplicationRecord::new("1", "Ali Karimov", Some("1990-01-01")),
            ApplicationRecord::new("2", "Karimov Ali", Some("1990-01-01")),
        ];
        let mut seen = Vec::new();
        let mut sink = |n: &DuplicateNotification| seen.push(n.clone());

        let result = find_duplicates_and_notify(&records, &DedupConfig::default(), &mut sink);
        assert_eq!(result.groups.len(), 1);
        assert_eq!(
            seen,
            vec![DuplicateNotification {
                has_duplicates: true,
                count: 1
            }]
        );
    }
}
