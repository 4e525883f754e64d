/// Query-string keys understood by the list endpoints.
pub struct QueryFields;

impl QueryFields {
    pub const SEARCH: &'static str = "q";
    pub const CATEGORY_ID: &'static str = "categoryId";
    pub const TENANT_ID: &'static str = "tenantId";
    pub const IS_PUBLISH: &'static str = "isPublish";
    pub const ROLE: &'static str = "role";
    pub const PER_PAGE: &'static str = "perPage";
    pub const CURRENT_PAGE: &'static str = "currentPage";

    /// Returns `true` for the pagination keys, which are never user filters.
    #[must_use]
    pub fn is_pagination(key: &str) -> bool {
        key == Self::PER_PAGE || key == Self::CURRENT_PAGE
    }
}
