use crate::models::StudentRecord;
use crate::store::RecordStore;

const DETAIL_PREFIX: &str = "/student/";

/// Record for a bare id or a detail address. A miss is a normal outcome.
pub fn lookup<'a>(store: &'a RecordStore, target: &str) -> Option<&'a StudentRecord> {
    store.find_by_id(resolve_target(target))
}

/// Address of a student's detail view.
pub fn detail_path(id: &str) -> String {
    format!("{DETAIL_PREFIX}{id}")
}

/// Id from a detail address, `None` for any other address.
pub fn parse_detail_path(path: &str) -> Option<&str> {
    let id = path.strip_prefix(DETAIL_PREFIX)?.trim_end_matches('/');
    if id.is_empty() || id.contains('/') {
        None
    } else {
        Some(id)
    }
}

/// A bare id, or a detail address reduced to its id.
pub fn resolve_target(target: &str) -> &str {
    parse_detail_path(target).unwrap_or(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::student;

    fn store() -> RecordStore {
        RecordStore::new(vec![
            student("1", "Avery Lee", "CS", 2024, 90.0),
            student("2", "Jules Moreno", "CS", 2025, 40.0),
            student("3", "Kiara Patel", "Art", 2024, 70.0),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_miss_is_none() {
        let store = store();
        assert!(lookup(&store, "4").is_none());
        assert!(lookup(&store, "/student/4").is_none());
    }

    #[test]
    fn lookup_by_id_or_address() {
        let store = store();
        assert_eq!(lookup(&store, "2").map(|r| r.name.as_str()), Some("Jules Moreno"));
        assert_eq!(lookup(&store, "/student/3").map(|r| r.name.as_str()), Some("Kiara Patel"));
    }

    #[test]
    fn paths_round_trip() {
        assert_eq!(detail_path("abc"), "/student/abc");
        assert_eq!(parse_detail_path("/student/abc"), Some("abc"));
        assert_eq!(parse_detail_path("/student/abc/"), Some("abc"));
        assert_eq!(parse_detail_path("/student/"), None);
        assert_eq!(parse_detail_path("/"), None);
        assert_eq!(parse_detail_path("/student/a/b"), None);
    }

    #[test]
    fn targets_accept_ids_or_paths() {
        assert_eq!(resolve_target("7"), "7");
        assert_eq!(resolve_target("/student/7"), "7");
    }
}
