#![warn(missing_docs)]
// Note: this overwrites the link in the README to point to the rust docs of the sibling crates.
//! [acp_core]: https://docs.rs/acp_core/latest/acp_core/index.html
//! [acp_axum]: https://docs.rs/acp_axum/latest/acp_axum/index.html
//! [acp_sqlite]: https://docs.rs/acp_sqlite/latest/acp_sqlite/index.html
#![doc = include_str!("../README.md")]

/// Configuration knobs for the auction lifecycle.
pub mod config;

/// Core domain models for the auction subsystem.
///
/// This module contains the fundamental data structures that represent the domain entities:
/// auctions and their bids, plus the slices of the artwork, artform and user collections
/// the auction subsystem reads or writes.
///
/// The models in this module are primarily data structures with minimal business logic,
/// following the principles of the hexagonal architecture to separate domain entities
/// from their persistence and processing implementations. The one exception is bid
/// admission, which is a pure function of an auction record and lives alongside it.
pub mod models;

/// Interface traits for the auction subsystem.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
///
/// These traits define the contract between the domain logic and external adapters
/// (such as databases, APIs, or identity providers) without specifying implementation details.
/// This separation allows for easier testing and the ability to swap out infrastructure
/// components without affecting the core business logic.
pub mod ports;

/// The auction lifecycle manager.
///
/// Owns auction creation, bid placement, and the ongoing-to-completed transition,
/// driving the repository ports with an explicitly injected repository.
pub mod lifecycle;
