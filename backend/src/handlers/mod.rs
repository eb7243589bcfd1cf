//! HTTP handlers for the Kargo back-office

pub mod admin;
pub mod bco;
pub mod calendar;
pub mod chat;
pub mod chb;
pub mod forwarder;
pub mod health;
pub mod requests;
pub mod session;

pub use health::{health_check, root};
