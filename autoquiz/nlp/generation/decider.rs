use crate::{
    generation::{
        question::{QuestionKind, Resolution, SkipReason},
        selector::AnswerCandidate,
        substitution::{find_replacement, Replacement, SubstitutionError},
    },
    lexicon::LexicalOntology,
    random::RandomSource,
    sentence::Sentence,
};

/// Answer token for a true statement.
pub const TRUE_ANSWER: &str = "t";
/// Answer token for a false statement.
pub const FALSE_ANSWER: &str = "f";

/// What the decider settled on for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Blank out the candidate span.
    FillBlank,
    /// Keep the sentence as is, answer true.
    TrueStatement,
    /// Swap the candidate span for a sibling term, answer false.
    FalseStatement(Replacement),
    /// False was drawn but substitution failed; answer true.
    DowngradedTrue(SubstitutionError),
}

impl Decision {
    /// Question format implied by the decision.
    #[must_use]
    pub const fn kind(&self) -> QuestionKind {
        match self {
            Self::FillBlank => QuestionKind::FillBlank,
            _ => QuestionKind::TrueFalse,
        }
    }

    /// Terminal state label.
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        match self {
            Self::FillBlank => Resolution::FillBlank,
            Self::TrueStatement => Resolution::TrueStatement,
            Self::FalseStatement(_) => Resolution::FalseStatement,
            Self::DowngradedTrue(_) => Resolution::DowngradedTrue,
        }
    }

    /// Value stored as the question's answer.
    #[must_use]
    pub fn answer_value(&self, candidate: &AnswerCandidate) -> String {
        match self {
            Self::FillBlank => candidate.text.clone(),
            Self::FalseStatement(_) => FALSE_ANSWER.to_string(),
            Self::TrueStatement | Self::DowngradedTrue(_) => TRUE_ANSWER.to_string(),
        }
    }

    /// Text written over the candidate span. True statements keep the span
    /// text with its original spacing.
    #[must_use]
    pub fn span_replacement<'a>(
        &'a self,
        candidate: &'a AnswerCandidate,
        placeholder: &'a str,
    ) -> &'a str {
        match self {
            Self::FillBlank => placeholder,
            Self::FalseStatement(replacement) => &replacement.surface,
            Self::TrueStatement | Self::DowngradedTrue(_) => &candidate.text,
        }
    }
}

/// Refuses sentences whose text is shorter than `min_chars` characters.
pub fn ensure_substantial(sentence: &Sentence, min_chars: usize) -> Result<(), SkipReason> {
    let chars = sentence.text.chars().count();
    if chars < min_chars {
        Err(SkipReason::DegenerateSentence { chars })
    } else {
        Ok(())
    }
}

/// Draws the question type, then for true/false the truth value, running the
/// substitution engine when a false statement is wanted.
pub fn decide<R: RandomSource>(
    candidate: &AnswerCandidate,
    ontology: &dyn LexicalOntology,
    random: &mut R,
) -> Decision {
    let question_type = random.below(2) + 1;
    if question_type == usize::from(QuestionKind::FillBlank.code()) {
        return Decision::FillBlank;
    }
    if random.coin() {
        return Decision::TrueStatement;
    }
    match find_replacement(ontology, &candidate.text, random) {
        Ok(replacement) => Decision::FalseStatement(replacement),
        Err(reason) => Decision::DowngradedTrue(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lexicon::memory::fixtures::animals, random::ScriptedRandom,
        sentence::fixtures::cat_on_mat,
    };

    fn candidate(text: &str) -> AnswerCandidate {
        AnswerCandidate {
            start: 1,
            end: 2,
            text: text.into(),
        }
    }

    #[test]
    fn type_one_is_fill_blank() {
        let mut random = ScriptedRandom::new([0]);
        let decision = decide(&candidate("cat"), &animals(), &mut random);
        assert_eq!(decision, Decision::FillBlank);
        assert_eq!(decision.answer_value(&candidate("cat")), "cat");
        assert_eq!(decision.span_replacement(&candidate("cat"), "___"), "___");
    }

    #[test]
    fn heads_is_a_true_statement() {
        let mut random = ScriptedRandom::new([1, 1]);
        let decision = decide(&candidate("cat"), &animals(), &mut random);
        assert_eq!(decision, Decision::TrueStatement);
        assert_eq!(decision.answer_value(&candidate("cat")), TRUE_ANSWER);
        assert_eq!(decision.span_replacement(&candidate("cat"), "___"), "cat");
    }

    #[test]
    fn tails_substitutes_a_sibling() {
        let mut random = ScriptedRandom::new([1, 0, 1, 0]);
        let decision = decide(&candidate("cat"), &animals(), &mut random);
        assert_eq!(decision.resolution(), Resolution::FalseStatement);
        assert_eq!(decision.answer_value(&candidate("cat")), FALSE_ANSWER);
        assert_eq!(decision.span_replacement(&candidate("cat"), "___"), "dog");
    }

    #[test]
    fn failed_substitution_downgrades_to_true() {
        let mut random = ScriptedRandom::new([1, 0]);
        let decision = decide(&candidate("mat"), &animals(), &mut random);
        assert_eq!(
            decision,
            Decision::DowngradedTrue(SubstitutionError::NoSenseFound("mat".into()))
        );
        assert_eq!(decision.kind(), QuestionKind::TrueFalse);
        assert_eq!(decision.answer_value(&candidate("mat")), TRUE_ANSWER);
        let glued = candidate("Obama's dog");
        assert_eq!(decision.span_replacement(&glued, "___"), "Obama's dog");
    }

    #[test]
    fn short_sentences_are_degenerate() {
        let mut sentence = cat_on_mat();
        assert!(ensure_substantial(&sentence, 3).is_ok());
        sentence.text = "Ok".into();
        assert_eq!(
            ensure_substantial(&sentence, 3),
            Err(SkipReason::DegenerateSentence { chars: 2 })
        );
    }
}
