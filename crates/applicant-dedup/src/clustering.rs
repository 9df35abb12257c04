//! Greedy single-linkage clustering within date-of-birth buckets
//!
//! Records are bucketed by exact birth date. Inside a bucket each record, in
//! input order, joins the first open cluster that holds at least one member
//! scoring at or above the threshold, otherwise it opens a new cluster.
//! First match wins; this is an order-dependent partition, not a transitive
//! closure, and two members of one cluster may score below the threshold.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::DedupConfig;
use crate::record::ApplicationRecord;
use crate::similarity::PreparedName;

/// Cluster records with the default configuration.
pub fn cluster(records: &[ApplicationRecord]) -> Vec<Vec<&ApplicationRecord>> {
    cluster_with(records, &DedupConfig::default())
}

/// Cluster records, returning every cluster (singletons included).
///
/// Buckets come out in first-appearance order of their birth date,
/// clusters within a bucket in discovery order.
pub fn cluster_with<'a>(
    records: &'a [ApplicationRecord],
    config: &DedupConfig,
) -> Vec<Vec<&'a ApplicationRecord>> {
    let buckets = bucket_by_dob(records);
    let mut clusters = Vec::new();

    for (dob, members) in &buckets {
        let bucket_clusters = cluster_bucket(members, config);
        trace!(
            dob = %dob,
            records = members.len(),
            clusters = bucket_clusters.len(),
            "clustered bucket"
        );
        clusters.extend(bucket_clusters);
    }

    debug!(
        records = records.len(),
        buckets = buckets.len(),
        clusters = clusters.len(),
        "clustering complete"
    );

    clusters
}

/// Group records by birth-date key, preserving first-appearance order.
fn bucket_by_dob(records: &[ApplicationRecord]) -> Vec<(&str, Vec<&ApplicationRecord>)> {
    let mut buckets: Vec<(&str, Vec<&ApplicationRecord>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let key = record.dob_key();
        match index.get(key) {
            Some(&i) => buckets[i].1.push(record),
            None => {
                index.insert(key, buckets.len());
                buckets.push((key, vec![record]));
            }
        }
    }

    buckets
}

fn cluster_bucket<'a>(
    members: &[&'a ApplicationRecord],
    config: &DedupConfig,
) -> Vec<Vec<&'a ApplicationRecord>> {
    // Each cluster keeps its members alongside their prepared names
    let mut clusters: Vec<Vec<(&'a ApplicationRecord, PreparedName)>> = Vec::new();

    for &record in members {
        let name = PreparedName::new(&record.full_name);

        let target = clusters.iter().position(|cluster| {
            cluster
                .iter()
                .any(|(_, other)| other.score(&name, config.reverse_tokens) >= config.threshold)
        });

        match target {
            Some(i) => {
                trace!(id = %record.id, cluster = i, "joined cluster");
                clusters[i].push((record, name));
            }
            None => clusters.push(vec![(record, name)]),
        }
    }

    clusters
        .into_iter()
        .map(|cluster| cluster.into_iter().map(|(record, _)| record).collect())
        .collect()
}
