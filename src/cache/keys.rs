//! Key derivation inside a region.
//!
//! Keys only need to be unique within their region; the region itself is
//! part of every store operation.

use uuid::Uuid;

use crate::application::pagination::PageRequest;

/// Key for single-valued regions such as `featuredDestinations`.
pub const ALL: &str = "all";

pub fn by_id(id: Uuid) -> String {
    format!("id:{id}")
}

pub fn by_slug(slug: &str) -> String {
    format!("slug:{slug}")
}

/// `page_size_field:DIR`, taken from the normalized request.
pub fn page(request: &PageRequest) -> String {
    request.cache_key()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pagination::{DESTINATION_SORT, PageParams};

    #[test]
    fn id_and_slug_keys_do_not_collide() {
        let id = Uuid::nil();
        assert_ne!(by_id(id), by_slug(&id.to_string()));
        assert_eq!(by_slug("taj-mahal"), "slug:taj-mahal");
    }

    #[test]
    fn page_key_carries_sort() {
        let asc = PageRequest::normalize(
            &PageParams {
                sort_by: Some("rating".into()),
                sort_dir: Some("asc".into()),
                ..PageParams::default()
            },
            &DESTINATION_SORT,
            100,
        )
        .unwrap();
        let desc = PageRequest::normalize(
            &PageParams {
                sort_by: Some("rating".into()),
                sort_dir: Some("desc".into()),
                ..PageParams::default()
            },
            &DESTINATION_SORT,
            100,
        )
        .unwrap();
        assert_eq!(page(&asc), "0_10_rating:ASC");
        assert_ne!(page(&asc), page(&desc));
    }
}
