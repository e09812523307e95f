pub mod list_entry;
pub mod media;
pub mod related_media;
pub mod user;

use sea_orm::sea_query::{LikeExpr, SimpleExpr};
use sea_orm::ColumnTrait;

use crate::domain::ConstraintViolation;

/// Case-insensitive substring match with `%`, `_` and `\` in `query` taken literally.
pub(crate) fn contains_literal<C: ColumnTrait>(column: C, query: &str) -> SimpleExpr {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    column.like(LikeExpr::new(format!("%{escaped}%")).escape('\\'))
}

/// Rejects a zero-based `page` whose row offset does not fit a SQL `OFFSET`.
pub(crate) fn check_page(page: u64, page_size: u64) -> Result<(), ConstraintViolation> {
    let in_range = page
        .checked_mul(page_size)
        .is_some_and(|offset| i64::try_from(offset).is_ok());
    if in_range {
        Ok(())
    } else {
        Err(ConstraintViolation::invalid("page", "out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_page_rejects_overflowing_offsets() {
        assert!(check_page(0, 25).is_ok());
        assert!(check_page(399, 25).is_ok());
        assert!(check_page(u64::MAX / 2, 100).is_err());
        assert!(check_page(1 << 62, 2).is_err());
    }
}
