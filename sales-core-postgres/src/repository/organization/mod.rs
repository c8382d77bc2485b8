pub mod department_repository;
pub mod zone_repository;

pub use department_repository::DepartmentRepositoryImpl;
pub use zone_repository::ZoneRepositoryImpl;
