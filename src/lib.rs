//! Intranet backend
//!
//! Credential verification against a MySQL account table and ingestion of
//! multipart content submissions (course materials, PDF documents and
//! announcements), exposed over HTTP with a uniform result envelope.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
