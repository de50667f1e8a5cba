pub mod map;
pub mod places;
pub mod session;
