//! Route labels for spans and metrics.

use uuid::Uuid;

/// Collapse id-like path segments so labels stay low-cardinality.
pub(super) fn route_label(path: &str) -> String {
    let segments = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_collapsed() {
        assert_eq!(
            route_label("/api/v1/orders/0190b0a4-5a4e-7c1d-9f1e-2b3c4d5e6f70/items"),
            "/api/v1/orders/{id}/items"
        );
    }

    #[test]
    fn plain_paths_are_unchanged() {
        assert_eq!(route_label("/"), "/");
        assert_eq!(route_label("/api/v1/products"), "/api/v1/products");
    }
}
