use uuid::Uuid;

/// Trait for entities that can be uniquely identified by a UUID
pub trait Identifiable {
    /// Human readable entity name, used in not-found reports
    const ENTITY_NAME: &'static str;

    /// Returns the unique identifier of the entity
    fn get_id(&self) -> Uuid;
}
