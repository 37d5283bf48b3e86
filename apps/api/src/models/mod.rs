// Structured records exchanged with the model and fed to the renderers.
// Constructed per request, never persisted.

pub mod cover_letter;
pub mod extended;
pub mod lenient;
pub mod resume;

pub use cover_letter::{CoverLetterDraft, CoverLetterParagraphs, CoverLetterRecord};
pub use extended::ExtendedResume;
pub use resume::{ResumeRecord, Skills};
