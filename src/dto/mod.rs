pub mod auth;
pub mod merchants;
pub mod orders;
pub mod payments;
pub mod products;
