use crate::sentence::Sentence;

/// Joins the sentence's tokens with single spaces, writing `replacement` over
/// `[start, end)`.
#[must_use]
pub fn assemble(sentence: &Sentence, start: usize, end: usize, replacement: &str) -> String {
    let words = sentence.words();
    let start = start.min(words.len());
    let end = end.clamp(start, words.len());
    let mut out: Vec<&str> = Vec::with_capacity(words.len() + 1);
    out.extend(words[..start].iter().map(String::as_str));
    out.push(replacement);
    out.extend(words[end..].iter().map(String::as_str));
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::fixtures::{cat_on_mat, obama_dog};

    #[test]
    fn replaces_the_span() {
        let sentence = cat_on_mat();
        assert_eq!(
            assemble(&sentence, 1, 2, "__________"),
            "The __________ sat on the mat ."
        );
        assert_eq!(assemble(&sentence, 4, 6, "rug"), "The cat sat on rug .");
    }

    #[test]
    fn span_text_keeps_glued_tokens_together() {
        let sentence = obama_dog();
        let span = sentence.span_text(0, 3);
        assert_eq!(assemble(&sentence, 0, 3, &span), "Obama's dog chased the ball .");
    }
}
