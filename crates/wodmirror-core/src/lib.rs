//! wodmirror Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `ItemReference`, `Record`, `RecordKey`
//! - **Identity** - `ShortId::derive`, the content-addressed record name
//! - **Port definitions** - Traits for adapters: `IDocumentFetcher`, `IRecordStore`
//! - **Configuration** - `Config` loaded from YAML
//!
//! # Architecture
//!
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement
//! (`wodmirror-feed` for HTTP, `wodmirror-sync` for the record store).

pub mod config;
pub mod domain;
pub mod ports;
