use serde::{Deserialize, Serialize};
use std::fmt;

pub const EXTENSION_WEIGHT: u8 = 40;
pub const KEYWORD_WEIGHT: u8 = 40;
pub const MIME_WEIGHT: u8 = 20;

const HIGH_THRESHOLD: u8 = 60;
const MEDIUM_THRESHOLD: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three heuristic signals that make up a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub suspicious_extension: bool,
    pub keyword_match: bool,
    pub application_mime: bool,
}

impl Signals {
    pub fn score(&self) -> Score {
        let mut value = 0;
        if self.suspicious_extension {
            value += EXTENSION_WEIGHT;
        }
        if self.keyword_match {
            value += KEYWORD_WEIGHT;
        }
        if self.application_mime {
            value += MIME_WEIGHT;
        }
        Score(value)
    }
}

/// Additive risk score. Only obtainable from [`Signals`], so the value is
/// always one of 0, 20, 40, 60, 80 or 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn tier(&self) -> RiskTier {
        if self.0 >= HIGH_THRESHOLD {
            RiskTier::High
        } else if self.0 >= MEDIUM_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True for `application` MIME types (`application/javascript`,
/// `application/x-msdownload`, ...).
pub fn is_application_mime(mime_type: Option<&str>) -> bool {
    mime_type.map_or(false, |m| m.starts_with("application"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_signals() -> Vec<Signals> {
        let mut out = Vec::new();
        for bits in 0u8..8 {
            out.push(Signals {
                suspicious_extension: bits & 1 != 0,
                keyword_match: bits & 2 != 0,
                application_mime: bits & 4 != 0,
            });
        }
        out
    }

    #[test]
    fn score_domain_is_closed() {
        for signals in all_signals() {
            let value = signals.score().value();
            assert!([0, 20, 40, 60, 80, 100].contains(&value), "{:?} -> {}", signals, value);
        }
    }

    #[test]
    fn adding_a_signal_never_lowers_the_score() {
        for base in all_signals() {
            let variants = [
                Signals { suspicious_extension: true, ..base },
                Signals { keyword_match: true, ..base },
                Signals { application_mime: true, ..base },
            ];
            for raised in variants {
                assert!(raised.score() >= base.score());
                assert!(raised.score().tier() >= base.score().tier());
            }
        }
    }

    #[test]
    fn tier_thresholds() {
        let tier = |s: Signals| s.score().tier();
        assert_eq!(tier(Signals::default()), RiskTier::Low);
        assert_eq!(tier(Signals { application_mime: true, ..Default::default() }), RiskTier::Low);
        assert_eq!(tier(Signals { keyword_match: true, ..Default::default() }), RiskTier::Medium);
        assert_eq!(
            tier(Signals { suspicious_extension: true, application_mime: true, ..Default::default() }),
            RiskTier::High
        );
    }

    #[test]
    fn application_prefix() {
        assert!(is_application_mime(Some("application/javascript")));
        assert!(is_application_mime(Some("application/x-msdownload")));
        assert!(!is_application_mime(Some("text/plain")));
        assert!(!is_application_mime(None));
    }

    #[test]
    fn tier_serializes_as_name() {
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "\"High\"");
        assert_eq!(serde_json::to_string(&Signals::default().score()).unwrap(), "0");
    }
}
