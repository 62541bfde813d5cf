//! Video generation adapter
//!
//! The `VideoGenerator` trait is the seam between the registration workflow
//! and whatever produces persona videos: a mock today, a remote provider
//! when configured.

mod factory;
mod minimax;
mod mock;
mod traits;

pub use factory::{GeneratorFactory, GeneratorType};
pub use minimax::{MiniMaxConfig, MiniMaxGenerator};
pub use mock::{MockConfig, MockGenerator, DEFAULT_MOCK_VIDEO_URL};
pub use traits::*;
