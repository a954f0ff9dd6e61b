//! Web检索工具（Tavily）

use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::SearchConfig;

/// 近似用户位置，影响检索结果的地域偏好
#[derive(Debug, Clone, PartialEq)]
pub struct UserLocation {
    pub country: String,
    pub timezone: String,
}

impl UserLocation {
    /// Tavily 的 `country` 参数使用小写英文国名
    pub fn tavily_country(&self) -> Option<&'static str> {
        match self.country.to_uppercase().as_str() {
            "JP" => Some("japan"),
            "US" => Some("united states"),
            "KR" => Some("south korea"),
            "CN" => Some("china"),
            "TW" => Some("taiwan"),
            "GB" => Some("united kingdom"),
            _ => None,
        }
    }
}

/// Web检索工具
#[derive(Debug, Clone)]
pub struct AgentToolWebSearch {
    api_key: String,
    endpoint: String,
    location: UserLocation,
    max_results: u32,
    search_depth: String,
    http: reqwest::Client,
}

/// 检索参数
#[derive(Debug, Deserialize)]
pub struct WebSearchArgs {
    pub query: String,
    pub max_results: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct WebSearchHit {
    pub title: String,
    pub url: String,
    pub content: Option<String>,
    pub score: Option<f64>,
}

/// 检索结果
#[derive(Debug, Serialize)]
pub struct WebSearchOutput {
    pub answer: Option<String>,
    pub results: Vec<WebSearchHit>,
    pub searched_from: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WebSearchError {
    #[error("search API key not configured")]
    MissingApiKey,
    #[error("search API error: {0}")]
    ApiError(String),
    #[error("search request failed: {0}")]
    RequestError(String),
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    answer: Option<String>,
    results: Option<Vec<TavilyResponseItem>>,
}

#[derive(Debug, Deserialize)]
struct TavilyResponseItem {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
    score: Option<f64>,
}

impl AgentToolWebSearch {
    pub fn new(config: &SearchConfig, http: reqwest::Client) -> Self {
        Self {
            api_key: config.api_key.clone(),
            endpoint: config.api_base_url.clone(),
            location: UserLocation {
                country: config.country.clone(),
                timezone: config.timezone.clone(),
            },
            max_results: config.max_results,
            search_depth: config.search_depth.clone(),
            http,
        }
    }

    pub fn location(&self) -> &UserLocation {
        &self.location
    }

    fn request_body(&self, args: &WebSearchArgs) -> serde_json::Value {
        let mut body = json!({
            "api_key": self.api_key,
            "query": args.query,
            "search_depth": self.search_depth,
            "include_answer": true,
            "max_results": args.max_results.unwrap_or(self.max_results),
        });
        if let Some(country) = self.location.tavily_country() {
            body["country"] = json!(country);
        }
        body
    }

    fn convert(&self, data: TavilyResponse) -> WebSearchOutput {
        let results = data
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| {
                Some(WebSearchHit {
                    title: item.title?,
                    url: item.url?,
                    content: item.content,
                    score: item.score,
                })
            })
            .collect();

        WebSearchOutput {
            answer: data.answer,
            results,
            searched_from: format!("{} ({})", self.location.country, self.location.timezone),
        }
    }
}

impl Tool for AgentToolWebSearch {
    const NAME: &'static str = "web_search";

    type Error = WebSearchError;
    type Args = WebSearchArgs;
    type Output = WebSearchOutput;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: format!(
                "Webを検索して最新の情報と出典URLを取得します。利用者の所在地は {}（{}）付近です。",
                self.location.country, self.location.timezone
            ),
            parameters: json!({
                "type": "object",
                "required": ["query"],
                "properties": {
                    "query": { "type": "string", "description": "検索クエリ" },
                    "max_results": {
                        "type": "integer",
                        "description": "返す検索結果の最大件数"
                    }
                }
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        if self.api_key.trim().is_empty() {
            return Err(WebSearchError::MissingApiKey);
        }
        debug!(query = %args.query, "web_search called");

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&self.request_body(&args))
            .send()
            .await
            .map_err(|err| WebSearchError::RequestError(err.to_string()))?;

        if !resp.status().is_success() {
            return Err(WebSearchError::ApiError(resp.status().to_string()));
        }

        let data: TavilyResponse = resp
            .json()
            .await
            .map_err(|err| WebSearchError::RequestError(err.to_string()))?;

        Ok(self.convert(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> AgentToolWebSearch {
        let config = SearchConfig {
            api_key: "key".to_string(),
            ..Default::default()
        };
        AgentToolWebSearch::new(&config, reqwest::Client::new())
    }

    #[test]
    fn test_request_body_carries_location_and_defaults() {
        let body = tool().request_body(&WebSearchArgs {
            query: "開成高校 入試日程".to_string(),
            max_results: None,
        });

        assert_eq!(body["query"], "開成高校 入試日程");
        assert_eq!(body["max_results"], 5);
        assert_eq!(body["country"], "japan");
        assert_eq!(body["include_answer"], true);
    }

    #[test]
    fn test_unknown_country_is_omitted() {
        let location = UserLocation {
            country: "ZZ".to_string(),
            timezone: "UTC".to_string(),
        };
        assert_eq!(location.tavily_country(), None);
    }

    #[test]
    fn test_convert_drops_hits_without_url() {
        let output = tool().convert(TavilyResponse {
            answer: Some("summary".to_string()),
            results: Some(vec![
                TavilyResponseItem {
                    title: Some("公式".to_string()),
                    url: Some("https://example.ed.jp".to_string()),
                    content: None,
                    score: Some(0.9),
                },
                TavilyResponseItem {
                    title: Some("no url".to_string()),
                    url: None,
                    content: None,
                    score: None,
                },
            ]),
        });

        assert_eq!(output.results.len(), 1);
        assert_eq!(output.searched_from, "JP (Asia/Tokyo)");
    }

    #[tokio::test]
    async fn test_call_without_key_fails_fast() {
        let tool = AgentToolWebSearch::new(
            &SearchConfig {
                api_key: String::new(),
                ..Default::default()
            },
            reqwest::Client::new(),
        );
        let result = tool
            .call(WebSearchArgs {
                query: "q".to_string(),
                max_results: None,
            })
            .await;
        assert!(matches!(result, Err(WebSearchError::MissingApiKey)));
    }
}
