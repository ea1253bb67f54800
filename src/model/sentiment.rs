// Sentiment labels — the two classes the model distinguishes.

use serde::{Deserialize, Serialize};

/// Number of classes every model is trained for.
pub const NUM_CLASSES: usize = 2;

/// Review polarity. The discriminant is the class index used by the model
/// (0 = negative, 1 = positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative = 0,
    Positive = 1,
}

impl Sentiment {
    pub const ALL: [Sentiment; NUM_CLASSES] = [Sentiment::Negative, Sentiment::Positive];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Sentiment::Negative),
            1 => Some(Sentiment::Positive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Positive => "positive",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
