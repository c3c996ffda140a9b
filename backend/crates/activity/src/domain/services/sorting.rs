//! Event Orderings and Grouping

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::entity::cause::Cause;
use crate::domain::entity::event::EventListing;

/// Date ascending, ties broken by distance ascending. Unknown distances go last.
pub fn sort_by_time_and_distance(events: &mut [EventListing]) {
    events.sort_by(|a, b| {
        a.event
            .date
            .cmp(&b.event.date)
            .then_with(|| compare_distance(a.distance, b.distance))
    });
}

/// Date ascending.
pub fn sort_by_time(events: &mut [EventListing]) {
    events.sort_by_key(|listing| listing.event.date);
}

/// Keep events at most `max_miles` away. Events without a known distance are dropped.
pub fn filter_max_distance(events: Vec<EventListing>, max_miles: f64) -> Vec<EventListing> {
    events
        .into_iter()
        .filter(|listing| listing.distance.is_some_and(|miles| miles <= max_miles))
        .collect()
}

/// Group events under the name of each of `causes` they belong to.
///
/// An event linked to several of the causes appears in each group. Order
/// within a group follows the input order.
pub fn group_by_cause(
    events: Vec<EventListing>,
    causes: &[Cause],
) -> BTreeMap<String, Vec<EventListing>> {
    let mut groups: BTreeMap<String, Vec<EventListing>> = BTreeMap::new();
    for listing in events {
        for cause in causes.iter().filter(|c| listing.causes.contains(&c.id)) {
            groups
                .entry(cause.name.clone())
                .or_default()
                .push(listing.clone());
        }
    }
    groups
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
