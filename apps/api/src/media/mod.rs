// Speech synthesis (ElevenLabs) and PDF text extraction.
// PDF parsing is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod pdf;
pub mod tts;

pub use pdf::extract_pdf_text;
pub use tts::TtsClient;
