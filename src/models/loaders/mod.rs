pub mod docx_loader;
pub mod text_loader;

pub use docx_loader::{load_example_resume, paragraph_text, read_paragraphs};
pub use text_loader::load_raw_resume;
