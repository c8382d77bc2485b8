pub mod actor_scope;
pub mod policy;
pub mod resolver;

pub use actor_scope::*;
pub use policy::*;
pub use resolver::*;
