// Directory collaborators (user directory, refresh token store)
pub mod repositories;

pub use repositories::*;
