//! Shared data model for the mediarr card: configuration, delivered entity
//! snapshots, raw and normalized media items, and section identities.

pub mod config;
pub mod entity;
pub mod item;
pub mod platform;
pub mod source;
