//! Boundary traits for the external speech collaborators.
//!
//! The core never touches audio signal features or network services; it
//! consumes these capabilities as trait objects and only sees their
//! already-materialized text results. Timeout and retry behavior for the
//! listening window belongs to the implementations, not to this crate.

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("listening window elapsed before speech was captured")]
    Timeout,
    #[error("audio could not be recognized as speech")]
    Unrecognized,
    #[error("recognition service error: {0}")]
    Service(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("speech synthesis failed: {0}")]
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("unsupported language pair {source_lang}-{target_lang}")]
    UnsupportedLanguagePair {
        source_lang: String,
        target_lang: String,
    },
    #[error("translation service error: {0}")]
    Service(String),
}

/// Speech recognition: audio samples in, transcript text out.
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio samples (expected at 16kHz mono).
    fn transcribe(&self, audio: &[f32]) -> Result<String, CaptureError>;
}

/// Speech synthesis, used to render phrases back as audio for playback.
/// Failures are reported to the caller and never affect scoring.
pub trait TextToSpeech: Send + Sync {
    fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthesisError>;
}

/// Machine translation, consumed by the translation-practice flow only.
pub trait Translator: Send + Sync {
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationError>;
}

/// A `SpeechToText` that returns a fixed outcome regardless of audio.
///
/// For tests and demos; real recognizers live outside this repository.
pub enum FixedTranscript {
    Text(String),
    Timeout,
    Unrecognized,
}

impl SpeechToText for FixedTranscript {
    fn transcribe(&self, _audio: &[f32]) -> Result<String, CaptureError> {
        match self {
            FixedTranscript::Text(text) => Ok(text.clone()),
            FixedTranscript::Timeout => Err(CaptureError::Timeout),
            FixedTranscript::Unrecognized => Err(CaptureError::Unrecognized),
        }
    }
}
