//! Version parsing, ordering and selector matching
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Scheme    │────▶│  Selector   │────▶│ Comparator  │
//! │ (parse/     │     │  (accept)   │     │ (ordering)  │
//! │  render)    │     └─────────────┘     └─────────────┘
//! └─────────────┘            │                   │
//!        │                   ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Cache    │     │  Metadata   │     │ Candidates  │
//! │ (by string) │     │  (status)   │     │(latest wins)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`parser`]: `Version` and the string splitting rules
//! - [`comparator`]: ordering of versions, with standard and extended qualifier tables
//! - [`selector`]: the `VersionSelector` variants and their accept rules
//! - [`scheme`]: default and Maven selector syntaxes
//! - [`cache`]: selector cache and the caching scheme decorator
//! - [`metadata`]: component metadata used by status-based selectors
//! - [`candidates`]: choosing the best candidate for a selector
//! - [`error`]: selector errors

pub mod cache;
pub mod candidates;
pub mod comparator;
pub mod error;
pub mod metadata;
pub mod parser;
pub mod scheme;
pub mod selector;

pub use comparator::{VersionComparator, VersionOrdering};
pub use error::SelectorError;
pub use parser::{Version, VersionParser};
pub use scheme::{DefaultVersionSelectorScheme, MavenVersionSelectorScheme, VersionSelectorScheme};
pub use selector::VersionSelector;
