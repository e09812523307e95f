use super::ApiError;
use crate::domain::{MediaId, MediaKind};

pub fn validate_media_id(id: i32) -> Result<MediaId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid media ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(MediaId::new(id))
}

pub fn validate_page_size(page_size: u64) -> Result<u64, ApiError> {
    const MAX_PAGE_SIZE: u64 = 100;
    const MIN_PAGE_SIZE: u64 = 1;

    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ApiError::validation(format!(
            "Invalid page size: {page_size}. Page size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}"
        )));
    }
    Ok(page_size)
}

/// Pages are 1-based; a missing page is the first one.
pub fn validate_page(page: Option<u64>) -> Result<u64, ApiError> {
    const MAX_PAGE: u64 = 10_000;

    let page = page.unwrap_or(1);
    if !(1..=MAX_PAGE).contains(&page) {
        return Err(ApiError::validation(format!(
            "Invalid page: {page}. Page must be between 1 and {MAX_PAGE}"
        )));
    }
    Ok(page)
}

/// A list path segment: a media type, or `all` for every type.
pub fn parse_list_kind(kind: &str) -> Result<Option<MediaKind>, ApiError> {
    if kind.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    kind.parse::<MediaKind>()
        .map(Some)
        .map_err(ApiError::validation)
}

pub fn parse_media_kind(kind: Option<&str>) -> Result<Option<MediaKind>, ApiError> {
    kind.filter(|k| !k.is_empty())
        .map(|k| k.parse::<MediaKind>().map_err(ApiError::validation))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_media_id() {
        assert!(validate_media_id(1).is_ok());
        assert!(validate_media_id(0).is_err());
        assert!(validate_media_id(-5).is_err());
    }

    #[test]
    fn test_validate_page_size() {
        assert!(validate_page_size(1).is_ok());
        assert!(validate_page_size(100).is_ok());
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(101).is_err());
    }

    #[test]
    fn test_validate_page() {
        assert_eq!(validate_page(None).unwrap(), 1);
        assert_eq!(validate_page(Some(3)).unwrap(), 3);
        assert!(validate_page(Some(0)).is_err());
        assert!(validate_page(Some(u64::MAX / 2)).is_err());
    }

    #[test]
    fn test_parse_list_kind() {
        assert_eq!(parse_list_kind("films").unwrap(), Some(MediaKind::Film));
        assert_eq!(parse_list_kind("ALL").unwrap(), None);
        assert!(parse_list_kind("comics").is_err());
    }

    #[test]
    fn test_parse_media_kind() {
        assert_eq!(parse_media_kind(None).unwrap(), None);
        assert_eq!(parse_media_kind(Some("")).unwrap(), None);
        assert_eq!(parse_media_kind(Some("book")).unwrap(), Some(MediaKind::Book));
    }
}
