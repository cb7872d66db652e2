//! File actions module.
//!
//! This module provides functionality for:
//! - Confirmation providers gating deletion
//! - Permanent deletion or move to trash of redundant copies
//!
//! ```no_run
//! use dupscan::actions::{Confirmer, PromptConfirmer, DELETE_PROMPT};
//!
//! let mut confirmer = PromptConfirmer::stdio();
//! if !confirmer.confirm(DELETE_PROMPT).unwrap() {
//!     eprintln!("Abort ...");
//! }
//! ```

pub mod confirm;
pub mod delete;

// Re-export commonly used types
pub use confirm::{is_affirmative, Confirmer, PromptConfirmer, ScriptedConfirmer, DELETE_PROMPT};
pub use delete::{
    delete_entry, delete_to_trash, identity_path, permanent_delete, verify_unchanged,
    DeleteConfig, DeleteError, DeleteResult,
};
