//! Operations behind the HTTP surface. Each function receives the store
//! ports it touches and performs no locking of its own.

pub mod accounts;
pub mod conversation;
pub mod friends;
pub mod groups;
pub mod messages;
