use std::collections::{HashMap, HashSet};

use crate::orders::models::{LocalOrder, RemoteOrder, UpdateRequest};

/// Dispatch updates for every undispatched remote order whose reference
/// equals a local order name. The dispatch time is the local order's
/// creation time, so repeated runs over the same data produce the same set.
/// A remote order listed more than once (offset paging can repeat rows)
/// is only considered the first time.
pub fn reconcile(local: &[LocalOrder], remote: &[RemoteOrder]) -> Vec<UpdateRequest> {
    let mut seen = HashSet::with_capacity(remote.len());
    let mut by_reference: HashMap<&str, Vec<&RemoteOrder>> = HashMap::with_capacity(remote.len());
    for order in remote.iter().filter(|o| !o.is_dispatched()) {
        if !seen.insert(order.id) {
            continue;
        }
        if let Some(reference) = order.reference.as_deref() {
            by_reference.entry(reference).or_default().push(order);
        }
    }

    local
        .iter()
        .flat_map(|local_order| {
            by_reference
                .get(local_order.name.as_str())
                .into_iter()
                .flatten()
                .map(move |remote_order| UpdateRequest {
                    id: remote_order.id,
                    dispatched_date: local_order.created_at,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::models::RemoteOrderId;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn local(name: &str, day: u32) -> LocalOrder {
        LocalOrder {
            name: name.to_string(),
            created_at: ts(day),
            updated_at: ts(day),
        }
    }

    fn remote(id: i64, reference: &str, dispatched: Option<u32>) -> RemoteOrder {
        RemoteOrder {
            id: RemoteOrderId(id),
            reference: Some(reference.to_string()),
            created_date: Some(ts(10)),
            dispatched_date: dispatched.map(ts),
        }
    }

    #[test]
    fn test_single_match_among_others() {
        let updates = reconcile(
            &[local("A1001", 10)],
            &[remote(7, "A1001", None), remote(8, "A1002", None)],
        );

        assert_eq!(
            updates,
            vec![UpdateRequest {
                id: RemoteOrderId(7),
                dispatched_date: ts(10),
            }]
        );
    }

    #[test]
    fn test_already_dispatched_is_skipped() {
        let updates = reconcile(&[local("A1001", 10)], &[remote(7, "A1001", Some(11))]);
        assert!(updates.is_empty());
    }

    #[test]
    fn test_reference_match_is_case_sensitive() {
        let updates = reconcile(&[local("a1001", 10)], &[remote(7, "A1001", None)]);
        assert!(updates.is_empty());
    }

    #[test]
    fn test_one_update_per_matching_pair() {
        let locals = vec![local("A1", 10), local("A2", 11), local("A3", 12)];
        let remotes = vec![
            remote(1, "A1", None),
            remote(2, "A2", Some(12)),
            remote(3, "A3", None),
            remote(4, "A3", None),
            remote(5, "B9", None),
            RemoteOrder {
                id: RemoteOrderId(6),
                reference: None,
                created_date: None,
                dispatched_date: None,
            },
        ];

        let updates = reconcile(&locals, &remotes);

        let ids: Vec<_> = updates.iter().map(|u| u.id.0).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert!(updates
            .iter()
            .all(|u| remotes.iter().any(|r| r.id == u.id && !r.is_dispatched())));
        assert_eq!(updates[1].dispatched_date, ts(12));
    }

    #[test]
    fn test_repeated_remote_order_updated_once() {
        let remotes = vec![
            remote(7, "A1", None),
            remote(8, "A2", None),
            remote(7, "A1", None),
        ];

        let updates = reconcile(&[local("A1", 10), local("A2", 11)], &remotes);

        let ids: Vec<_> = updates.iter().map(|u| u.id.0).collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[test]
    fn test_idempotent() {
        let locals = vec![local("A1", 10), local("A2", 11)];
        let remotes = vec![remote(1, "A1", None), remote(2, "A2", None), remote(3, "A2", Some(3))];

        assert_eq!(reconcile(&locals, &remotes), reconcile(&locals, &remotes));
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(reconcile(&[local("A1", 10)], &[]).is_empty());
        assert!(reconcile(&[], &[remote(1, "A1", None)]).is_empty());
    }
}
