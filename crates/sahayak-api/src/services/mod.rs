// Service layer between the HTTP handlers and the collaborators

mod assistant;
mod corpus;
mod speech;
mod translate;

pub use assistant::AssistantService;
pub use corpus::{parse_subject, CorpusService};
pub use speech::SpeechService;
pub use translate::TranslationService;
