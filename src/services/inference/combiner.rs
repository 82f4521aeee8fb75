// Verdict Combiner
// Merges the independent text and URL verdicts into the final answer.
// Plain OR, no weighting: in this domain a missed phish costs more than
// a false alarm.

use crate::models::{ClassificationResult, Verdict};

/// OR across per-URL verdicts: one malicious link condemns the whole
/// submission. `None` when no URLs were scored.
pub fn combine_url_verdicts(verdicts: &[Verdict]) -> Option<Verdict> {
    verdicts
        .iter()
        .copied()
        .reduce(|acc, v| acc.or(v))
}

/// Final-verdict policy, in priority order: a lone sub-verdict wins
/// outright; when both ran, Phishing if either says Phishing. Returns
/// `None` when neither pipeline produced a verdict (the caller rejects
/// such submissions before reaching here).
pub fn combine(
    text_prediction: Option<Verdict>,
    url_prediction: Option<Verdict>,
) -> Option<ClassificationResult> {
    let final_prediction = match (text_prediction, url_prediction) {
        (Some(text), None) => text,
        (None, Some(url)) => url,
        (Some(text), Some(url)) => text.or(url),
        (None, None) => return None,
    };

    Some(ClassificationResult {
        text_prediction,
        url_prediction,
        final_prediction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_final_equals_text() {
        let result = combine(Some(Verdict::Safe), None).unwrap();
        assert_eq!(result.final_prediction, Verdict::Safe);
        assert!(result.url_prediction.is_none());
    }

    #[test]
    fn test_url_only_final_equals_url() {
        let result = combine(None, Some(Verdict::Phishing)).unwrap();
        assert_eq!(result.final_prediction, Verdict::Phishing);
        assert!(result.text_prediction.is_none());
    }

    #[test]
    fn test_both_present_or_policy() {
        let cases = [
            (Verdict::Safe, Verdict::Safe, Verdict::Safe),
            (Verdict::Safe, Verdict::Phishing, Verdict::Phishing),
            (Verdict::Phishing, Verdict::Safe, Verdict::Phishing),
            (Verdict::Phishing, Verdict::Phishing, Verdict::Phishing),
        ];
        for (text, url, expected) in cases {
            let result = combine(Some(text), Some(url)).unwrap();
            assert_eq!(result.final_prediction, expected);
        }
    }

    #[test]
    fn test_no_verdicts_yields_none() {
        assert!(combine(None, None).is_none());
    }

    #[test]
    fn test_url_or_any_phishing_wins() {
        let verdicts = [Verdict::Safe, Verdict::Safe, Verdict::Phishing, Verdict::Safe];
        assert_eq!(combine_url_verdicts(&verdicts), Some(Verdict::Phishing));
        assert_eq!(
            combine_url_verdicts(&[Verdict::Safe, Verdict::Safe]),
            Some(Verdict::Safe)
        );
        assert_eq!(combine_url_verdicts(&[]), None);
    }
}
