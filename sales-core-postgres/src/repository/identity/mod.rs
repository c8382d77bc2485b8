pub mod user_profile_repository;
pub mod user_repository;

pub use user_profile_repository::UserProfileRepositoryImpl;
pub use user_repository::UserRepositoryImpl;
