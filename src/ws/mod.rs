pub mod handler;
pub mod hub;
pub mod presence;
pub mod rooms;
