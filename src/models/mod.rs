pub mod loaders;
pub mod resume;
pub mod search;

pub use loaders::{load_example_resume, load_raw_resume};
pub use resume::{ExampleResume, PromptPayload, RawResume, ResumeSection, StructuredResume};
pub use search::SearchHit;
