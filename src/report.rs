//! Duplicate-collection analysis over the reconciled indexes

use crate::record::{Collection, CollectionsIndex, OwnerId, UsersIndex};
use chrono::SecondsFormat;
use console::style;

/// A user holding more collections than the threshold
#[derive(Debug, Clone, PartialEq)]
pub struct AffectedUser<'a> {
    pub owner: OwnerId,
    pub collections: &'a [Collection],
}

/// Owners with more than `threshold` collections, sorted by owner id
pub fn affected_users(users: &UsersIndex, threshold: usize) -> Vec<AffectedUser<'_>> {
    let mut affected: Vec<_> = users
        .iter()
        .filter(|(_, collections)| collections.len() > threshold)
        .map(|(&owner, collections)| AffectedUser {
            owner,
            collections: collections.as_slice(),
        })
        .collect();
    affected.sort_by_key(|a| a.owner);
    affected
}

/// Share of users affected, as a percentage. Zero when there are no users.
pub fn affected_percent(affected: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        affected as f64 / total as f64 * 100.0
    }
}

/// Print one block per affected user plus the overall ratio
pub fn print_affected(users: &UsersIndex, collections: &CollectionsIndex, threshold: usize) {
    let affected = affected_users(users, threshold);

    for user in &affected {
        println!(
            "{} {} has {} collections:",
            style("User").bold(),
            user.owner,
            user.collections.len()
        );
        for c in user.collections {
            let items = collections.get(&c.collection_id).map_or(0, Vec::len);
            println!(
                "\t{} {} {} ({} items)",
                c.collection_id,
                c.collection_type,
                c.last_modified.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                items
            );
        }
    }

    println!(
        "A total of {} users out of {} were affected, that's {:.1}%",
        affected.len(),
        users.len(),
        affected_percent(affected.len(), users.len())
    );
}
