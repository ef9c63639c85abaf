//! Model endpoint access.
//!
//! [`traits::ChatProvider`] is the seam between the pipeline and the
//! outside world: one async chat call against a named model.
//! [`openrouter::OpenRouterClient`] is the production implementation;
//! tests inject scripted mocks. [`fallback::FallbackChain`] layers the
//! retry and model-fallback policy on top of whichever provider is
//! installed.

pub mod fallback;
pub mod openrouter;
pub mod traits;

pub use fallback::FallbackChain;
pub use openrouter::OpenRouterClient;
pub use traits::ChatProvider;
