use crate::app::repository::SnippetRepository;
use crate::domain::snippet::SnippetCriteria;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<SnippetRepository>,
}

impl AppState {
    pub fn new(repository: SnippetRepository) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}

/// Uniform response envelope used by every endpoint.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            success: true,
            data: Some(serde_json::to_value(data)?),
            error: None,
        })
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Query parameters accepted by `GET /api/snippets`. Anything else is ignored,
/// and a repeated key keeps its first value.
#[derive(Debug, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSnippetsParams {
    /// Case-insensitive text matched against title, code, category and language.
    pub search: Option<String>,
    /// Case-insensitive substring of the category.
    pub category: Option<String>,
    /// Case-insensitive substring of the language.
    pub language: Option<String>,
    /// Maximum number of results, read from the leading integer (`2abc` is 2,
    /// `1.5` is 1). Non-numeric or non-positive values mean no limit.
    pub limit: Option<String>,
}

impl ListSnippetsParams {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search" => &mut params.search,
                "category" => &mut params.category,
                "language" => &mut params.language,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    pub fn into_criteria(self) -> SnippetCriteria {
        SnippetCriteria {
            limit: parse_limit(self.limit.as_deref()),
            query: self.search,
            category: self.category,
            language: self.language,
        }
    }
}

/// Reads the leading integer of `raw`: optional whitespace, optional sign, then
/// digits up to the first non-digit. No digits means no limit; values past the
/// `i64` range saturate.
pub fn parse_limit(raw: Option<&str>) -> Option<i64> {
    let rest = raw?.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let parsed = if negative {
        format!("-{}", digits).parse::<i64>().unwrap_or(i64::MIN)
    } else {
        digits.parse::<i64>().unwrap_or(i64::MAX)
    };
    Some(parsed)
}

/// Payload of `GET /health`.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    /// `connected` or `unavailable`.
    pub store: String,
    /// Where reads are answered from: `store`, `fixtures`, or `none`.
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_parsing_tolerates_garbage() {
        assert_eq!(parse_limit(Some("3")), Some(3));
        assert_eq!(parse_limit(Some(" 10 ")), Some(10));
        assert_eq!(parse_limit(Some("-2")), Some(-2));
        assert_eq!(parse_limit(Some("+4")), Some(4));
        assert_eq!(parse_limit(Some("ten")), None);
        assert_eq!(parse_limit(Some("")), None);
        assert_eq!(parse_limit(Some("-")), None);
        assert_eq!(parse_limit(None), None);
    }

    #[test]
    fn limit_parsing_reads_the_leading_integer() {
        assert_eq!(parse_limit(Some(" 2abc")), Some(2));
        assert_eq!(parse_limit(Some("1.5")), Some(1));
        assert_eq!(parse_limit(Some("007")), Some(7));
        assert_eq!(parse_limit(Some("abc2")), None);
        assert_eq!(parse_limit(Some("- 3")), None);
        assert_eq!(parse_limit(Some("99999999999999999999")), Some(i64::MAX));
        assert_eq!(parse_limit(Some("-99999999999999999999")), Some(i64::MIN));
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let pairs = [
            ("limit", "1"),
            ("search", "css"),
            ("page", "2"),
            ("limit", "2"),
            ("search", "python"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()));

        let params = ListSnippetsParams::from_pairs(pairs);
        assert_eq!(
            params,
            ListSnippetsParams {
                search: Some("css".into()),
                category: None,
                language: None,
                limit: Some("1".into()),
            }
        );
    }

    #[test]
    fn params_map_search_to_query() {
        let params = ListSnippetsParams {
            search: Some("hook".into()),
            category: Some("react".into()),
            language: None,
            limit: Some("abc".into()),
        };
        let criteria = params.into_criteria();

        assert_eq!(criteria.query(), Some("hook"));
        assert_eq!(criteria.category(), Some("react"));
        assert_eq!(criteria.language(), None);
        assert_eq!(criteria.cap(), None);
    }

    #[test]
    fn failure_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::failure("Snippet not found")).expect("json");
        assert_eq!(json, serde_json::json!({ "success": false, "error": "Snippet not found" }));
    }
}
