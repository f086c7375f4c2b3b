//! Document store client for vodsite.
//!
//! This crate provides the HTTP-backed `DocumentStore` implementation used
//! by the route cache builder.

pub mod firestore;

pub use firestore::{FirestoreClient, FirestoreConfig, FirestoreError};
