//! # autostop-database
//!
//! PostgreSQL access for the Cirrus auto-shutdown service: connection
//! pool management, migrations, and the repositories the rule engine
//! reads from and reconciles against.

pub mod connection;
pub mod migration;
pub mod repositories;
