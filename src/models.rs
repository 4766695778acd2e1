//! Data models for news articles and scraped page elements.
//!
//! - [`NewsResponse`] / [`Article`]: the JSON payload returned by the news
//!   search endpoint. Only the fields the viewer renders are modelled.
//! - [`ScrapedElement`] / [`Extraction`]: the result of selecting elements by
//!   tag name from a fetched HTML page.
//!
//! All of these are ephemeral: they are rebuilt on every fetch and dropped on
//! the next one.

use serde::Deserialize;

/// Shown in place of a missing or empty article title.
pub const NO_TITLE: &str = "No title available";
/// Shown in place of a missing or empty article description.
pub const NO_DESCRIPTION: &str = "No description available";

/// Top-level news search response.
///
/// Any field other than `articles` (`status`, `totalResults`, ...) is
/// ignored. A missing or `null` `articles` array decodes as empty.
#[derive(Debug, Default, Deserialize)]
pub struct NewsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub articles: Vec<Article>,
}

/// A single article entry from the news search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Article {
    /// The title to display, falling back to [`NO_TITLE`].
    pub fn display_title(&self) -> &str {
        non_empty(self.title.as_deref()).unwrap_or(NO_TITLE)
    }

    /// The description to display, falling back to [`NO_DESCRIPTION`].
    pub fn display_description(&self) -> &str {
        non_empty(self.description.as_deref()).unwrap_or(NO_DESCRIPTION)
    }

    /// The article link, if it has a non-empty one.
    pub fn link(&self) -> Option<&str> {
        non_empty(self.url.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Article>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Article>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Text extracted from one element matching the requested tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedElement {
    pub tag: String,
    /// Whitespace-normalized text; never empty.
    pub text: String,
}

/// Outcome of selecting elements by tag name from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Number of elements whose tag matched, including empty ones.
    pub matched: usize,
    /// Matched elements with non-empty text, in document order.
    pub elements: Vec<ScrapedElement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_response_deserialization() {
        let json = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": {"id": null, "name": "Example"},
                    "title": "First",
                    "description": "About the first",
                    "url": "https://example.com/1"
                },
                {"title": null, "description": "", "url": null}
            ]
        }"#;

        let response: NewsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.articles.len(), 2);
        assert_eq!(response.articles[0].display_title(), "First");
        assert_eq!(response.articles[0].link(), Some("https://example.com/1"));
        assert_eq!(response.articles[1].display_title(), NO_TITLE);
        assert_eq!(response.articles[1].display_description(), NO_DESCRIPTION);
        assert_eq!(response.articles[1].link(), None);
    }

    #[test]
    fn test_news_response_missing_articles() {
        let response: NewsResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(response.articles.is_empty());

        let response: NewsResponse = serde_json::from_str(r#"{"articles": null}"#).unwrap();
        assert!(response.articles.is_empty());
    }

    #[test]
    fn test_article_empty_fields_fall_back() {
        let article = Article {
            title: Some(String::new()),
            description: None,
            url: Some(String::new()),
        };

        assert_eq!(article.display_title(), NO_TITLE);
        assert_eq!(article.display_description(), NO_DESCRIPTION);
        assert_eq!(article.link(), None);
    }

    #[test]
    fn test_article_missing_fields() {
        let article: Article = serde_json::from_str("{}").unwrap();
        assert_eq!(article, Article::default());
    }
}
