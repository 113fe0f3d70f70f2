/// Join a parent prefix and a child segment, parent first
///
/// Segments are separated by exactly one `/`, empty segments are dropped,
/// the result always starts with `/` and never ends with one (except the
/// root path itself).
pub fn join_paths(prefix: &str, segment: &str) -> String {
    let joined = prefix
        .split('/')
        .chain(segment.split('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

/// Normalize a single path with the same rules as [`join_paths`]
pub fn normalize_path(path: &str) -> String {
    join_paths("", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("", ""), "/");
        assert_eq!(join_paths("", "users"), "/users");
        assert_eq!(join_paths("api", "users"), "/api/users");
        assert_eq!(join_paths("/api/", "/users/"), "/api/users");
        assert_eq!(join_paths("/api//v1", "users/:id"), "/api/v1/users/:id");
        assert_eq!(join_paths("/api", ""), "/api");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("items/"), "/items");
    }
}
