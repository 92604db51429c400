#![forbid(unsafe_code)]

//! Typed key-value persistence.
//!
//! The engine mirrors each in-memory collection to one string key holding one
//! JSON value, the same shape a browser's `localStorage` offers. This crate
//! provides that contract and the typed layer on top of it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        TypedStore                             │
//! │   - StorageKey<T> → JSON encode/decode                        │
//! │   - load_or: parse-or-default with logged fallback            │
//! │   - persist: fire-and-forget write with logged failure        │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     StorageBackend                            │
//! │   - MemoryStorage: in-memory (testing, ephemeral)             │
//! │   - FileStorage: JSON file (requires file-storage)            │
//! │   - host adapters (browser localStorage, ...)                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returned; `persist` logs and moves on |
//! | `StorageError::Serialization` | JSON encode/decode | `load_or` falls back to the default |
//! | `StorageError::Corruption` | Poisoned lock, bad file | Returned; callers degrade |
//! | Missing key | First run, new season | `load_or` uses the default |

pub mod backend;
pub mod keys;
pub mod typed;

pub use backend::{MemoryStorage, StorageBackend, StorageError, StorageResult};
#[cfg(feature = "file-storage")]
pub use backend::FileStorage;
pub use keys::KeyScheme;
pub use typed::{StorageKey, TypedStore};
