use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentiment tag attached to content by some upstreams.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// A news article from a content provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Stable identifier
    pub id: String,

    /// Headline
    pub title: String,

    /// Summary/description (may be empty)
    pub description: String,

    /// Source label (e.g., "CoinDesk")
    pub source: String,

    /// Canonical URL
    pub url: String,

    /// Publication timestamp
    pub published_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A social post from a feed provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Stable identifier
    pub id: String,

    /// Body text
    pub text: String,

    /// Author handle without the leading '@'
    pub username: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Engagement counters
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// Content item polymorphic over the two upstream shapes.
///
/// A closed set of tagged variants unified behind one normalization step per
/// adapter - different upstream JSON shapes all collapse into this union.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    Article(Article),
    Post(Post),
}

impl ContentItem {
    /// Stable identifier shared by both variants.
    pub fn id(&self) -> &str {
        match self {
            Self::Article(article) => &article.id,
            Self::Post(post) => &post.id,
        }
    }

    /// Primary display text: article headline or post body.
    pub fn title(&self) -> &str {
        match self {
            Self::Article(article) => &article.title,
            Self::Post(post) => &post.text,
        }
    }

    /// Source/channel label: article source or author handle.
    pub fn channel(&self) -> String {
        match self {
            Self::Article(article) => article.source.clone(),
            Self::Post(post) => format!("@{}", post.username),
        }
    }

    /// Sortable timestamp shared by both variants.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Article(article) => article.published_at,
            Self::Post(post) => post.created_at,
        }
    }

    /// Searchable secondary text: article description, empty for posts.
    pub fn description(&self) -> &str {
        match self {
            Self::Article(article) => &article.description,
            Self::Post(_) => "",
        }
    }
}
