pub mod hub;
pub mod launcher;
pub mod library;
pub mod providers;
pub mod remote;
pub mod resolver;
pub mod speaker;

pub use launcher::{LaunchOutcome, LaunchSequencer, LaunchStep};
pub use library::{LibrarySource, SonarrClient};
pub use remote::RemoteDispatcher;
pub use resolver::ProviderResolver;
pub use speaker::{SpeakerCommand, SpeakerController, SpeakerEntities};
