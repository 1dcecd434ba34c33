//! Application services
//!
//! Backend construction and the identity delegation used by the login
//! screen.

mod identity;
mod store;

pub use store::Backend;
