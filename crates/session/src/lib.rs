//! Practice session state machine.
//!
//! Owns the current reference phrase and drives one round at a time:
//! select phrase, obtain transcript, align, score, expose results, reset.
//! A session must be driven by one caller at a time; the engines it calls
//! are pure and freely shareable across sessions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use parrot_align::{align, AlignmentResult};
use parrot_score::{score, ScoreReport};
use parrot_speech::{CaptureError, SpeechToText};
use parrot_text::{tokenize_with, TokenSequence, TokenizerConfig};

/// The fixed set of reference phrases shipped with the application.
pub const PHRASE_BANK: &[&str] = &[
    "Hello, how are you?",
    "I would like a cup of coffee.",
    "Can you help me, please?",
    "This is a beautiful day.",
    "I love learning English.",
    "Where is the nearest station?",
    "The weather is nice today.",
    "I have two brothers and one sister.",
    "What time is the meeting?",
    "I am going to the supermarket.",
];

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("phrase bank is empty")]
    EmptyPhraseBank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    PhraseSelected,
    AwaitingTranscript,
    Aligned,
    Scored,
}

/// Tagged outcome of one practice round.
///
/// "No speech understood" is a transition decision, not a fault: the
/// session stays on the current phrase and keeps its stored results.
#[derive(Debug)]
pub enum RoundOutcome {
    Scored(ScoreReport),
    NoTranscript,
    UpstreamFailure(CaptureError),
}

/// One learner's practice state. Created with a randomly drawn phrase,
/// mutated only through its transitions, never persisted.
#[derive(Debug)]
pub struct PracticeSession {
    bank: Vec<String>,
    rng: StdRng,
    tokenizer: TokenizerConfig,
    current_index: usize,
    current_tokens: TokenSequence,
    last_result: Option<AlignmentResult>,
    last_score: Option<ScoreReport>,
    state: SessionState,
}

impl PracticeSession {
    /// Default phrase bank, entropy-seeded draws.
    pub fn new() -> Self {
        Self::build(
            PHRASE_BANK.iter().map(|s| s.to_string()).collect(),
            StdRng::from_entropy(),
        )
        .expect("built-in phrase bank is non-empty")
    }

    /// Default phrase bank, deterministic draws for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(
            PHRASE_BANK.iter().map(|s| s.to_string()).collect(),
            StdRng::seed_from_u64(seed),
        )
        .expect("built-in phrase bank is non-empty")
    }

    /// Custom phrase bank with deterministic draws.
    pub fn with_bank(bank: Vec<String>, seed: u64) -> Result<Self, SessionError> {
        Self::build(bank, StdRng::seed_from_u64(seed))
    }

    fn build(bank: Vec<String>, mut rng: StdRng) -> Result<Self, SessionError> {
        if bank.is_empty() {
            return Err(SessionError::EmptyPhraseBank);
        }
        let tokenizer = TokenizerConfig::default();
        let current_index = rng.gen_range(0..bank.len());
        let current_tokens = tokenize_with(&bank[current_index], tokenizer);
        Ok(Self {
            bank,
            rng,
            tokenizer,
            current_index,
            current_tokens,
            last_result: None,
            last_score: None,
            state: SessionState::PhraseSelected,
        })
    }

    /// Change how phrases and transcripts are tokenized.
    ///
    /// Retokenizes the current phrase and clears stored results, since they
    /// were produced under the previous configuration.
    pub fn set_tokenizer_config(&mut self, config: TokenizerConfig) {
        self.tokenizer = config;
        self.current_tokens = tokenize_with(&self.bank[self.current_index], config);
        self.last_result = None;
        self.last_score = None;
        self.state = SessionState::PhraseSelected;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_phrase(&self) -> &str {
        &self.bank[self.current_index]
    }

    pub fn current_tokens(&self) -> &TokenSequence {
        &self.current_tokens
    }

    pub fn last_result(&self) -> Option<&AlignmentResult> {
        self.last_result.as_ref()
    }

    pub fn last_score(&self) -> Option<&ScoreReport> {
        self.last_score.as_ref()
    }

    /// Draw a new phrase uniformly at random and reset the round.
    ///
    /// Valid from any state. With more than one phrase in the bank the
    /// current phrase is excluded from the draw, so the learner never gets
    /// the same phrase twice in a row; a single-phrase bank redraws it.
    pub fn select_new_phrase(&mut self) -> &str {
        if self.bank.len() > 1 {
            let drawn = self.rng.gen_range(0..self.bank.len() - 1);
            self.current_index = if drawn >= self.current_index {
                drawn + 1
            } else {
                drawn
            };
        }
        self.current_tokens = tokenize_with(&self.bank[self.current_index], self.tokenizer);
        self.last_result = None;
        self.last_score = None;
        self.state = SessionState::PhraseSelected;
        tracing::debug!(phrase = %self.current_phrase(), "phrase_selected");
        self.current_phrase()
    }

    /// Run one round against the current phrase.
    ///
    /// An empty or whitespace-only transcript means no speech was
    /// recognized: the session stays in `PhraseSelected` and stored results
    /// are left untouched. No alignment is ever computed against it.
    pub fn submit_transcript(&mut self, spoken_text: &str) -> RoundOutcome {
        if spoken_text.trim().is_empty() {
            tracing::debug!("empty_transcript_rejected");
            return RoundOutcome::NoTranscript;
        }

        self.state = SessionState::AwaitingTranscript;
        let spoken = tokenize_with(spoken_text, self.tokenizer);

        let result = align(&self.current_tokens, &spoken);
        self.state = SessionState::Aligned;

        let report = score(&result);
        tracing::debug!(
            phrase = %self.current_phrase(),
            matched = report.matched_count,
            total = report.total_reference_tokens,
            percentage = report.percentage,
            "round_scored"
        );

        self.last_result = Some(result);
        self.last_score = Some(report.clone());
        self.state = SessionState::Scored;
        RoundOutcome::Scored(report)
    }

    /// Consume a SpeechToText capture result.
    ///
    /// Upstream failures are surfaced verbatim without being interpreted;
    /// the session is left exactly as it was.
    pub fn submit_capture(&mut self, capture: Result<String, CaptureError>) -> RoundOutcome {
        match capture {
            Ok(transcript) => self.submit_transcript(&transcript),
            Err(err) => {
                tracing::debug!(error = %err, "capture_failed");
                RoundOutcome::UpstreamFailure(err)
            }
        }
    }

    /// Capture audio through a recognizer and score the round.
    pub fn capture_and_score(&mut self, stt: &dyn SpeechToText, audio: &[f32]) -> RoundOutcome {
        self.submit_capture(stt.transcribe(audio))
    }
}

impl Default for PracticeSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sessions_are_deterministic() {
        let mut a = PracticeSession::with_seed(7);
        let mut b = PracticeSession::with_seed(7);
        assert_eq!(a.current_phrase(), b.current_phrase());
        for _ in 0..20 {
            assert_eq!(a.select_new_phrase(), b.select_new_phrase());
        }
    }

    #[test]
    fn test_no_immediate_repeat_with_multiple_phrases() {
        let mut session = PracticeSession::with_seed(42);
        let mut previous = session.current_phrase().to_string();
        for _ in 0..50 {
            let next = session.select_new_phrase().to_string();
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_single_phrase_bank_redraws_same_phrase() {
        let mut session =
            PracticeSession::with_bank(vec!["only one".to_string()], 0).unwrap();
        assert_eq!(session.select_new_phrase(), "only one");
    }

    #[test]
    fn test_empty_bank_rejected() {
        assert!(matches!(
            PracticeSession::with_bank(Vec::new(), 0),
            Err(SessionError::EmptyPhraseBank)
        ));
    }

    #[test]
    fn test_empty_transcript_is_no_transcript() {
        let mut session = PracticeSession::with_seed(1);
        let outcome = session.submit_transcript("   ");
        assert!(matches!(outcome, RoundOutcome::NoTranscript));
        assert_eq!(session.state(), SessionState::PhraseSelected);
        assert!(session.last_result().is_none());
        assert!(session.last_score().is_none());
    }

    #[test]
    fn test_scored_round_stores_results() {
        let mut session =
            PracticeSession::with_bank(vec!["hello how are you".to_string()], 0).unwrap();
        let outcome = session.submit_transcript("hello how are you");
        match outcome {
            RoundOutcome::Scored(report) => assert_eq!(report.percentage, 100.0),
            other => panic!("expected scored outcome, got {other:?}"),
        }
        assert_eq!(session.state(), SessionState::Scored);
        assert!(session.last_result().is_some());
        assert!(session.last_score().is_some());
    }

    #[test]
    fn test_select_new_phrase_clears_results() {
        let mut session =
            PracticeSession::with_bank(
                vec!["one phrase".to_string(), "another phrase".to_string()],
                3,
            )
            .unwrap();
        session.submit_transcript("one phrase");
        assert!(session.last_score().is_some());

        session.select_new_phrase();
        assert_eq!(session.state(), SessionState::PhraseSelected);
        assert!(session.last_result().is_none());
        assert!(session.last_score().is_none());
    }

    #[test]
    fn test_upstream_failure_leaves_session_untouched() {
        let mut session =
            PracticeSession::with_bank(vec!["hello there".to_string()], 0).unwrap();
        session.submit_transcript("hello there");

        let outcome = session.submit_capture(Err(CaptureError::Timeout));
        assert!(matches!(
            outcome,
            RoundOutcome::UpstreamFailure(CaptureError::Timeout)
        ));
        assert_eq!(session.state(), SessionState::Scored);
        assert!(session.last_score().is_some());
    }

    #[test]
    fn test_tokenizer_config_change_retokenizes_phrase() {
        let mut session =
            PracticeSession::with_bank(vec!["Hello, how are you?".to_string()], 0).unwrap();
        session.set_tokenizer_config(TokenizerConfig {
            strip_punctuation: true,
        });
        match session.submit_transcript("hello how are you") {
            RoundOutcome::Scored(report) => assert_eq!(report.percentage, 100.0),
            other => panic!("expected scored outcome, got {other:?}"),
        }
    }
}
