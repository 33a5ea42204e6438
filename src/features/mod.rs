pub mod auth;
pub mod files;
pub mod messages_ws;
pub mod products;
pub mod seed;
