pub mod credential;
pub mod rules;
pub mod token;

pub use credential::*;
pub use rules::*;
pub use token::*;
