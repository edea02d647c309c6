pub mod resume_flow;

pub use resume_flow::ResumeFlow;
