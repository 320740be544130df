//! JSON response shapes shared by the route handlers. Field names are
//! camelCase on the wire; timestamps are RFC 3339 strings.

pub mod catalog;
pub mod library;
pub mod notification;
pub mod review;
pub mod user;

use serde::Serialize;

use crate::services::Page;

pub use catalog::{
    CategoryResponse, DeveloperDetailResponse, DeveloperResponse, GameResponse, HomeResponse,
};
pub use library::{LibraryAddResponse, LibraryEntryResponse, LibraryStatsResponse};
pub use notification::NotificationResponse;
pub use review::ReviewResponse;
pub use user::{AuthResponse, PublicProfileResponse, UserResponse};

/// Envelope for every paginated list endpoint.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> PaginatedResponse<T> {
    /// Convert a service page, mapping each item into its response shape.
    pub fn from_page<S>(page: Page<S>, convert: impl FnMut(S) -> T) -> Self {
        Self {
            data: page.items.into_iter().map(convert).collect(),
            total: page.total,
            offset: page.pagination.offset,
            limit: page.pagination.limit,
        }
    }
}
