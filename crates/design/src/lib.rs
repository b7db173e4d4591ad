//! # Join Design Documentation
//!
//! This crate contains design documentation and architectural decision
//! records for the Join project.
//!
//! ## Documentation Location
//!
//! All design documents are located in the `docs/` directory at the root
//! of this crate.
//!
//! Key documents:
//! - `architecture.md` - Overall system architecture
//! - `adr/` - Architectural Decision Records

// This is a documentation-only crate
#![no_std]
