//! Candidate reply tokens.

/// The two actionable reply tokens. Everything else a candidate sends while
/// an offer is pending is ignored and the wait continues until the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyToken {
    Accept,
    Decline,
}

impl ReplyToken {
    /// Normalize (trim + lowercase) and match. Exactly "sim" and "não" are
    /// recognized; no synonyms, no unaccented variants.
    pub fn parse(text: &str) -> Option<ReplyToken> {
        match text.trim().to_lowercase().as_str() {
            "sim" => Some(ReplyToken::Accept),
            "não" => Some(ReplyToken::Decline),
            _ => None,
        }
    }
}
