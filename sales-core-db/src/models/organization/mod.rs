pub mod department;
pub mod zone;

pub use department::*;
pub use zone::*;
