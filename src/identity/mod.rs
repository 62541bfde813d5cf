//! Persona identities: records, the process-wide registry, and the
//! registration workflow that fills it.

pub mod registry;
pub mod types;
pub mod workflow;

pub use registry::IdentityRegistry;
pub use types::{Coordinates, PersonaIdentity};
pub use workflow::{RegistrationRequest, RegistrationService};
