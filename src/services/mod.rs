pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, Registration, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod list_service;
pub mod list_service_impl;
pub use list_service::{ListError, ListService, NewEntry, UserList};
pub use list_service_impl::SeaOrmListService;

pub mod media_service;
pub mod media_service_impl;
pub use media_service::{MediaError, MediaRelations, MediaService};
pub use media_service_impl::SeaOrmMediaService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{ListCounts, Profile, SearchPage, SearchType, UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
