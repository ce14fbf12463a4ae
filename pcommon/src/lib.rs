//! Values shared by every parley crate: the boxed future alias, conversation
//! identifiers, generation settings, and a small keyed registry.
//!
//! ```rust
//! use pcommon::{GenerationOptions, SessionId};
//!
//! let session = SessionId::from("kitchen-speaker");
//! let options = GenerationOptions::streaming().with_temperature(0.3);
//!
//! assert_eq!(session.as_str(), "kitchen-speaker");
//! assert!(options.stream);
//! ```

mod options;
mod registry;
mod session;

pub use options::GenerationOptions;
pub use registry::Registry;
pub use session::SessionId;

/// Send-able boxed future used by every async trait in the workspace.
///
/// ```rust
/// use pcommon::BoxFuture;
///
/// fn word_count<'a>(value: &'a str) -> BoxFuture<'a, usize> {
///     Box::pin(async move { value.split_whitespace().count() })
/// }
///
/// let _future = word_count("what's the weather");
/// ```
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;
