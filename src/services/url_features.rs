// URL Feature Pipeline
// Derives the fixed six-feature vector the URL model was trained on,
// and applies the fitted standard scaler.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::error::ClassifyError;

/// Fixed width of the URL feature vector. The scaler and URL model are
/// version-pinned to this schema; any other length is a fatal input error.
pub const URL_FEATURE_COUNT: usize = 6;

/// Keyword set counted by the suspicious-keyword feature.
pub const SUSPICIOUS_KEYWORDS: [&str; 6] =
    ["login", "verify", "account", "secure", "banking", "confirm"];

fn ipv4_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\d{1,3}\.){3}\d{1,3}").unwrap())
}

/// Compute the six features for one URL string, in fixed order:
/// {has dotted-quad IPv4, length, `.` count, https flag, non-word char
/// count, suspicious keyword hits}.
///
/// The https flag matches the literal substring anywhere in the URL, not
/// the scheme prefix. That is the heuristic the model was trained
/// against; correcting it would shift classifier behavior.
pub fn extract_url_features(url: &str) -> [f64; URL_FEATURE_COUNT] {
    let lowered = url.to_lowercase();

    let has_ip = if ipv4_pattern().is_match(url) { 1.0 } else { 0.0 };
    let length = url.chars().count() as f64;
    let dot_count = url.matches('.').count() as f64;
    let has_https = if lowered.contains("https") { 1.0 } else { 0.0 };
    let non_word = url
        .chars()
        .filter(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        .count() as f64;
    let keyword_hits = SUSPICIOUS_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .count() as f64;

    [has_ip, length, dot_count, has_https, non_word, keyword_hits]
}

// ============ Standard Scaler ============

/// Fitted standard scaler: the same `(x - mean) / scale` transform used
/// at training time. Zero scale entries pass values through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ClassifyError> {
        if features.len() != self.mean.len() || self.scale.len() != self.mean.len() {
            return Err(ClassifyError::ModelSchemaMismatch(format!(
                "scaler expects {} features, got {}",
                self.mean.len(),
                features.len()
            )));
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (m, s))| if *s == 0.0 { x - m } else { (x - m) / s })
            .collect())
    }

    /// Inverse of [`transform`](Self::transform); used to validate that
    /// feature order survives scaling unchanged.
    pub fn inverse_transform(&self, scaled: &[f64]) -> Result<Vec<f64>, ClassifyError> {
        if scaled.len() != self.mean.len() {
            return Err(ClassifyError::ModelSchemaMismatch(format!(
                "scaler expects {} features, got {}",
                self.mean.len(),
                scaled.len()
            )));
        }
        Ok(scaled
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (m, s))| if *s == 0.0 { x + m } else { x * s + m })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_for_ip_login_url() {
        let f = extract_url_features("http://192.168.0.1/verify");
        assert_eq!(f[0], 1.0); // dotted-quad present
        assert_eq!(f[1], 25.0); // length
        assert_eq!(f[2], 3.0); // dots
        assert_eq!(f[3], 0.0); // no https substring
        assert!(f[5] >= 1.0); // "verify"
    }

    #[test]
    fn test_https_flag_matches_substring_anywhere() {
        // Known heuristic: "https" embedded in the path still sets the flag.
        let f = extract_url_features("http://evil.com/https-login");
        assert_eq!(f[3], 1.0);
        let g = extract_url_features("http://evil.com/plain");
        assert_eq!(g[3], 0.0);
    }

    #[test]
    fn test_keyword_hits_count_distinct_keywords() {
        let f = extract_url_features("http://x.com/login?do=verify&acct=banking");
        assert_eq!(f[5], 3.0);
    }

    #[test]
    fn test_non_word_count() {
        let f = extract_url_features("ab_c:/d");
        assert_eq!(f[4], 2.0); // ':' and '/'
    }

    #[test]
    fn test_all_features_non_negative() {
        for url in ["", "x", "https://a.b.c/login", "http://1.2.3.4"] {
            for v in extract_url_features(url) {
                assert!(v >= 0.0);
            }
        }
    }

    #[test]
    fn test_scaler_round_trip() {
        let scaler = StandardScaler {
            mean: vec![0.5, 40.0, 3.0, 0.6, 10.0, 1.0],
            scale: vec![0.5, 12.0, 1.5, 0.49, 4.0, 0.8],
        };
        let features = extract_url_features("http://192.168.0.1/verify");
        let scaled = scaler.transform(&features).unwrap();
        let restored = scaler.inverse_transform(&scaled).unwrap();
        for (a, b) in features.iter().zip(restored.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_scaler_rejects_wrong_width() {
        let scaler = StandardScaler {
            mean: vec![0.0; URL_FEATURE_COUNT],
            scale: vec![1.0; URL_FEATURE_COUNT],
        };
        assert!(scaler.transform(&[1.0, 2.0]).is_err());
    }
}
