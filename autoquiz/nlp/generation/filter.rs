use crate::sentence::{NounChunk, PartOfSpeech, Sentence};

/// Cleans the parser's noun chunks into usable answer spans.
///
/// Chunks containing a pronoun are dropped, a leading determiner is trimmed
/// off (dropping the chunk if nothing is left), everything else is kept.
/// Output keeps left-to-right sentence order.
#[must_use]
pub fn filter_noun_chunks(sentence: &Sentence) -> Vec<NounChunk> {
    sentence
        .chunks
        .iter()
        .filter_map(|chunk| usable_span(sentence, *chunk))
        .collect()
}

fn usable_span(sentence: &Sentence, chunk: NounChunk) -> Option<NounChunk> {
    let tokens = sentence.span(chunk.start, chunk.end);
    let first = tokens.first()?;
    if tokens.iter().any(|token| token.pos == PartOfSpeech::Pron) {
        return None;
    }
    if first.pos == PartOfSpeech::Det {
        return (chunk.len() > 1).then(|| NounChunk::new(chunk.start + 1, chunk.end));
    }
    Some(chunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::{fixtures::cat_on_mat, Token};

    #[test]
    fn strips_leading_determiners() {
        let chunks = filter_noun_chunks(&cat_on_mat());
        assert_eq!(chunks, vec![NounChunk::new(1, 2), NounChunk::new(5, 6)]);
    }

    #[test]
    fn drops_pronoun_and_bare_determiner_chunks() {
        let tokens = vec![
            Token::new("She", PartOfSpeech::Pron),
            Token::new("liked", PartOfSpeech::Verb),
            Token::new("this", PartOfSpeech::Det),
            Token::new("and", PartOfSpeech::Other),
            Token::new("her", PartOfSpeech::Pron),
            Token::new("red", PartOfSpeech::Adj),
            Token::new("bicycle", PartOfSpeech::Noun),
        ];
        let sentence = Sentence::from_tokens(
            tokens,
            vec![
                NounChunk::new(0, 1),
                NounChunk::new(2, 3),
                NounChunk::new(4, 7),
                NounChunk::new(5, 7),
            ],
        );
        assert_eq!(filter_noun_chunks(&sentence), vec![NounChunk::new(5, 7)]);
    }

    #[test]
    fn skips_out_of_range_chunks() {
        let mut sentence = cat_on_mat();
        sentence.chunks.insert(0, NounChunk::new(9, 11));
        assert_eq!(filter_noun_chunks(&sentence).len(), 2);
    }
}
