use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use reqwest::Url;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::entity::scenario::ScenarioSource;
use crate::config::AppConfig;
use crate::utils::error::AppError;

/// 외부 사이트에서 읽어온 시나리오 메타데이터 (등록 폼 미리 채우기용)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedScenario {
    pub name: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub distribute_url: String,
    pub source_type: ScenarioSource,
    pub external_id: String,
}

/// 외부 시나리오 스크래퍼 인터페이스
///
/// 테스트에서는 Mock으로 대체합니다.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ScenarioScraperTrait: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ParsedScenario, AppError>;
}

pub type ScenarioScraper = Arc<dyn ScenarioScraperTrait>;

/// 지원하는 배포 사이트의 URL인지 판별하고 외부 ID를 뽑아냅니다.
///
/// - Booth: `https://booth.pm/{lang}/items/{id}`, `https://{shop}.booth.pm/items/{id}`
/// - TALTO: `https://talto.cc/projects/{id}`
pub fn detect_source(raw_url: &str) -> Option<(ScenarioSource, String)> {
    let url = Url::parse(raw_url.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let host = url.host_str()?.to_ascii_lowercase();
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

    if host == "booth.pm" || host.ends_with(".booth.pm") {
        let position = segments.iter().position(|s| *s == "items")?;
        let id = segments.get(position + 1)?;
        if id.chars().all(|c| c.is_ascii_digit()) {
            return Some((ScenarioSource::Booth, id.to_string()));
        }
        return None;
    }

    if host == "talto.cc" || host == "www.talto.cc" {
        return match segments.as_slice() {
            ["projects", id, ..] => Some((ScenarioSource::Talto, id.to_string())),
            _ => None,
        };
    }

    None
}

/// Booth 상품 JSON(`/items/{id}.json`)에서 메타데이터 추출
pub fn parse_booth_item(
    body: &serde_json::Value,
    distribute_url: &str,
    external_id: &str,
) -> Result<ParsedScenario, AppError> {
    let name = body
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::ExternalServiceError("Booth 응답에 상품명이 없습니다.".into()))?;

    let text = |value: Option<&serde_json::Value>| {
        value
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(ParsedScenario {
        name: name.to_string(),
        author: text(body.get("shop").and_then(|shop| shop.get("name"))),
        description: text(body.get("description")),
        image_url: text(
            body.get("images")
                .and_then(|images| images.get(0))
                .and_then(|image| image.get("original")),
        ),
        distribute_url: distribute_url.to_string(),
        source_type: ScenarioSource::Booth,
        external_id: external_id.to_string(),
    })
}

/// `<meta ...>` 태그 하나
const META_TAG_PATTERN: &str = r"(?is)<meta\s[^>]*>";
/// 태그 안의 `name="value"` / `name='value'` 속성
const META_ATTR_PATTERN: &str = r#"(?is)([a-z:_-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#;

fn meta_patterns() -> Option<&'static (Regex, Regex)> {
    static PATTERNS: OnceLock<Option<(Regex, Regex)>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            let tag = Regex::new(META_TAG_PATTERN).ok()?;
            let attr = Regex::new(META_ATTR_PATTERN).ok()?;
            Some((tag, attr))
        })
        .as_ref()
}

/// 페이지의 `<meta property|name="..." content="...">` 값 (키는 소문자, 먼저 나온 값 우선)
///
/// 페이지마다 한 번만 훑고, 속성 순서는 상관없습니다.
#[derive(Debug, Default)]
pub struct MetaTags(HashMap<String, String>);

impl MetaTags {
    pub fn parse(html: &str) -> Self {
        let Some((tag_re, attr_re)) = meta_patterns() else {
            warn!("meta 태그 패턴을 만들 수 없습니다.");
            return Self::default();
        };

        let mut values = HashMap::new();
        for tag in tag_re.find_iter(html) {
            let mut key = None;
            let mut content = None;
            for attr in attr_re.captures_iter(tag.as_str()) {
                let value = attr.get(2).or_else(|| attr.get(3)).map(|m| m.as_str());
                match attr[1].to_ascii_lowercase().as_str() {
                    "property" | "name" => key = value.map(str::to_ascii_lowercase),
                    "content" => content = value.map(|v| decode_entities(v.trim())),
                    _ => {}
                }
            }
            if let (Some(key), Some(content)) = (key, content) {
                if !content.is_empty() {
                    values.entry(key).or_insert(content);
                }
            }
        }

        Self(values)
    }

    pub fn get(&self, property: &str) -> Option<String> {
        self.0.get(property).cloned()
    }
}

/// TALTO 프로젝트 페이지의 OpenGraph 태그에서 메타데이터 추출
pub fn parse_talto_page(
    html: &str,
    distribute_url: &str,
    external_id: &str,
) -> Result<ParsedScenario, AppError> {
    let meta = MetaTags::parse(html);
    let name = meta
        .get("og:title")
        .ok_or_else(|| AppError::ExternalServiceError("TALTO 페이지에 제목이 없습니다.".into()))?;

    Ok(ParsedScenario {
        name,
        author: meta.get("author"),
        description: meta.get("og:description"),
        image_url: meta.get("og:image"),
        distribute_url: distribute_url.to_string(),
        source_type: ScenarioSource::Talto,
        external_id: external_id.to_string(),
    })
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// reqwest 기반 기본 구현체
#[derive(Clone)]
pub struct HttpScenarioScraper {
    client: reqwest::Client,
}

impl HttpScenarioScraper {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.scraper_timeout_secs))
            .user_agent(config.scraper_user_agent.clone())
            .build()
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Result<reqwest::Response, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = url, error = %e, "외부 사이트 요청 실패");
            AppError::ExternalServiceError(format!("외부 사이트에 연결할 수 없습니다: {}", e))
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::bad_request("존재하지 않는 시나리오 페이지입니다."));
        }
        if !status.is_success() {
            warn!(url = url, status = status.as_u16(), "외부 사이트 응답 오류");
            return Err(AppError::ExternalServiceError(format!(
                "외부 사이트 응답 오류 (status {})",
                status.as_u16()
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl ScenarioScraperTrait for HttpScenarioScraper {
    async fn scrape(&self, url: &str) -> Result<ParsedScenario, AppError> {
        let (source, external_id) = detect_source(url)
            .ok_or_else(|| AppError::bad_request("지원하지 않는 URL입니다. (Booth, TALTO만 가능)"))?;

        let distribute_url = url.trim().trim_end_matches('/');

        let parsed = match source {
            ScenarioSource::Booth => {
                let json_url = format!("https://booth.pm/ja/items/{}.json", external_id);
                let body: serde_json::Value =
                    self.fetch(&json_url).await?.json().await.map_err(|e| {
                        AppError::ExternalServiceError(format!("Booth 응답 파싱 실패: {}", e))
                    })?;
                parse_booth_item(&body, distribute_url, &external_id)?
            }
            ScenarioSource::Talto => {
                let html = self.fetch(distribute_url).await?.text().await.map_err(|e| {
                    AppError::ExternalServiceError(format!("TALTO 응답 읽기 실패: {}", e))
                })?;
                parse_talto_page(&html, distribute_url, &external_id)?
            }
            ScenarioSource::Manual => {
                return Err(AppError::bad_request("지원하지 않는 URL입니다."));
            }
        };

        info!(
            source = ?parsed.source_type,
            external_id = %parsed.external_id,
            "외부 시나리오 메타데이터 수집 완료"
        );

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_detect_booth_item_urls() {
        assert_eq!(
            detect_source("https://booth.pm/ja/items/1234567"),
            Some((ScenarioSource::Booth, "1234567".to_string()))
        );
        assert_eq!(
            detect_source("https://some-shop.booth.pm/items/42/"),
            Some((ScenarioSource::Booth, "42".to_string()))
        );
    }

    #[test]
    fn should_detect_talto_project_urls() {
        assert_eq!(
            detect_source("https://talto.cc/projects/abcDEF_123"),
            Some((ScenarioSource::Talto, "abcDEF_123".to_string()))
        );
    }

    #[test]
    fn should_reject_unsupported_urls() {
        assert_eq!(detect_source("https://example.com/items/1"), None);
        assert_eq!(detect_source("https://booth.pm/ja/items/not-a-number"), None);
        assert_eq!(detect_source("https://talto.cc/users/someone"), None);
        assert_eq!(detect_source("ftp://booth.pm/items/1"), None);
        assert_eq!(detect_source("not a url"), None);
    }

    #[test]
    fn should_parse_booth_item_json() {
        // Arrange
        let body = json!({
            "name": " 밤의 저택 ",
            "description": "호러 시나리오",
            "images": [{ "original": "https://img.example/1.png" }],
            "shop": { "name": "어둠상점" }
        });

        // Act
        let parsed =
            parse_booth_item(&body, "https://booth.pm/ja/items/1", "1").unwrap();

        // Assert
        assert_eq!(parsed.name, "밤의 저택");
        assert_eq!(parsed.author.as_deref(), Some("어둠상점"));
        assert_eq!(parsed.image_url.as_deref(), Some("https://img.example/1.png"));
        assert_eq!(parsed.source_type, ScenarioSource::Booth);
    }

    #[test]
    fn booth_item_without_name_should_be_external_error() {
        let result = parse_booth_item(&json!({ "description": "x" }), "u", "1");

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[test]
    fn should_read_meta_in_either_attribute_order() {
        // Arrange
        let html = r#"
            <head>
              <META Property="og:title" content="Tom &amp; Jerry">
              <meta content='https://img.example/og.png' property="og:image" />
              <meta name="author" content="작가">
              <meta property="og:title" content="두 번째 제목">
              <meta property="og:description" content="  ">
            </head>
        "#;

        // Act
        let meta = MetaTags::parse(html);

        // Assert
        assert_eq!(meta.get("og:title").as_deref(), Some("Tom & Jerry"));
        assert_eq!(meta.get("og:image").as_deref(), Some("https://img.example/og.png"));
        assert_eq!(meta.get("author").as_deref(), Some("작가"));
        assert_eq!(meta.get("og:description"), None);
    }

    #[test]
    fn talto_page_should_fill_preview_from_og_tags() {
        let html = r#"<meta property="og:title" content="잊혀진 섬"><meta property="og:image" content="https://img.example/t.png">"#;

        let parsed = parse_talto_page(html, "https://talto.cc/projects/abc", "abc").unwrap();

        assert_eq!(parsed.name, "잊혀진 섬");
        assert_eq!(parsed.image_url.as_deref(), Some("https://img.example/t.png"));
        assert_eq!(parsed.author, None);
        assert_eq!(parsed.source_type, ScenarioSource::Talto);
    }

    #[test]
    fn talto_page_without_title_should_be_external_error() {
        let result = parse_talto_page("<html></html>", "https://talto.cc/projects/x", "x");

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }
}
