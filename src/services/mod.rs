pub mod notifier;
pub mod pipeline;
pub mod reconciler;
pub mod verifier;
