use serde::{Deserialize, Serialize};

/// Categorical sentiment label assigned by the upstream classifier.
///
/// Stored and transported as one of three known strings; anything else
/// (including the empty string) is treated as "no label".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Positive" => Some(Sentiment::Positive),
            "Negative" => Some(Sentiment::Negative),
            "Neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    /// Numeric mapping used by the timeline and summary aggregations.
    pub fn score(&self) -> i32 {
        match self {
            Sentiment::Positive => 1,
            Sentiment::Negative => -1,
            Sentiment::Neutral => 0,
        }
    }
}

/// Engagement counter a minimum-threshold filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementField {
    Likes,
    Retweets,
    Replies,
}

impl EngagementField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementField::Likes => "likes",
            EngagementField::Retweets => "retweets",
            EngagementField::Replies => "replies",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "likes" => Some(EngagementField::Likes),
            "retweets" => Some(EngagementField::Retweets),
            "replies" | "comments" => Some(EngagementField::Replies),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_round_trips_known_labels() {
        for label in ["Positive", "Negative", "Neutral"] {
            let parsed = Sentiment::parse(label).unwrap();
            assert_eq!(parsed.as_str(), label);
        }
    }

    #[test]
    fn sentiment_rejects_unknown_labels() {
        assert_eq!(Sentiment::parse(""), None);
        assert_eq!(Sentiment::parse("positive"), None);
        assert_eq!(Sentiment::parse("Mixed"), None);
    }

    #[test]
    fn score_mapping() {
        assert_eq!(Sentiment::Positive.score(), 1);
        assert_eq!(Sentiment::Negative.score(), -1);
        assert_eq!(Sentiment::Neutral.score(), 0);
    }

    #[test]
    fn engagement_field_accepts_comments_alias() {
        assert_eq!(
            EngagementField::parse("comments"),
            Some(EngagementField::Replies)
        );
    }
}
