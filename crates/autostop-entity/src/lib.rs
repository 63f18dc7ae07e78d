//! # autostop-entity
//!
//! Domain entity models for the Cirrus auto-shutdown policy service.
//! Every struct in this crate represents a database table row or a domain
//! value object. Database entities derive `Debug`, `Clone`, `Serialize`,
//! `Deserialize`, and `sqlx::FromRow`.

pub mod policy;
pub mod preference;
pub mod user;
