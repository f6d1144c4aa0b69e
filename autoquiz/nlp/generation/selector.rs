use serde::{Deserialize, Serialize};

use crate::{
    generation::question::SkipReason,
    random::RandomSource,
    sentence::{NounChunk, Sentence},
};

/// A filtered chunk eligible to become the question's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCandidate {
    /// First token index.
    pub start: usize,
    /// One past the last token index.
    pub end: usize,
    /// Span text.
    pub text: String,
}

/// Chunks whose text does not mention `keyword` (case-insensitive).
#[must_use]
pub fn eligible_candidates(
    sentence: &Sentence,
    chunks: &[NounChunk],
    keyword: &str,
) -> Vec<AnswerCandidate> {
    let keyword = keyword.to_lowercase();
    chunks
        .iter()
        .map(|chunk| AnswerCandidate {
            start: chunk.start,
            end: chunk.end,
            text: sentence.span_text(chunk.start, chunk.end),
        })
        .filter(|candidate| !candidate.text.to_lowercase().contains(&keyword))
        .collect()
}

/// Uniformly picks one candidate.
pub fn choose_candidate<R: RandomSource>(
    candidates: &[AnswerCandidate],
    random: &mut R,
) -> Result<AnswerCandidate, SkipReason> {
    random
        .pick(candidates)
        .cloned()
        .ok_or(SkipReason::NoSuitableCandidate)
}
