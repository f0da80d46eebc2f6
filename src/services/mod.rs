//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
pub mod container;
mod email_verifier;
pub mod engagement;
mod post_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use email_verifier::EmailVerifier;
pub use engagement::{EngagementEngine, EngagementService, ReactionOutcome};
pub use post_service::{PostManager, PostService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
