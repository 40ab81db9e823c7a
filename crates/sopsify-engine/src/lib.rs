//! Sopsify Engine - per-namespace rendering of secret templates
//!
//! This crate turns a cluster's template bindings into encrypted secrets:
//! - `ValueMap`: key → namespace → value table built from value entries
//! - `placeholder`: `${KEY}` detection and coverage checks
//! - `Renderer`: one `RenderedDocument` per namespace
//! - `RunCoordinator`: clusters → bindings → namespaces, fail-fast
//! - `output`: writing and sops encryption behind the `Encryptor` trait

pub mod error;
pub mod layout;
pub mod output;
pub mod placeholder;
pub mod renderer;
pub mod run;
pub mod value_map;
pub mod warning;

pub use error::{EngineError, Result};
pub use output::{DiscardWriter, DocumentWriter, EncryptingWriter, Encryptor, SopsEncryptor};
pub use placeholder::{parse_placeholder, resolve_placeholders};
pub use renderer::{RenderOutput, RenderedDocument, Renderer};
pub use run::{RunCoordinator, RunReport};
pub use value_map::{BindingRef, ValueMap};
pub use warning::Warning;
