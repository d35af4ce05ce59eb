//! BCP 47 language tags: parsing, validation against the IANA subtag
//! registry, canonicalization, RFC 4647 matching and POSIX locale conversion.

pub mod config;
pub mod error;
pub mod extension;
pub mod locale;
pub mod registry;
pub mod tag;

pub use error::{Error, Result};
pub use registry::Registry;
pub use tag::{Parser, Tag, TagState, TagSummary};
