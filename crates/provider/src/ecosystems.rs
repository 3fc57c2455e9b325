//! ecosyste.ms 카탈로그 클라이언트
//!
//! [`EcosystemsClient`]는 [Ecosystems API](https://packages.ecosyste.ms/docs/index.html)의
//! 패키지 조회 엔드포인트를 호출하는 [`Provider`] 구현입니다.
//!
//! # 상태 코드 매핑
//!
//! - 404 → [`LookupError::NotFound`]
//! - 429 → [`LookupError::RateLimited`]
//! - 502/503/504 → [`LookupError::Unavailable`]
//! - 그 외 비정상 상태, 본문 디코딩 실패 → [`LookupError::Protocol`]
//!
//! 재시도는 하지 않습니다. 일시적 장애의 처리는 호출자의 몫입니다.

use std::time::Duration;

use metrics::counter;
use serde::Deserialize;

use purlin_core::error::LookupError;
use purlin_core::metrics::{LABEL_RESULT, PROVIDER_LOOKUPS_TOTAL};
use purlin_core::provider::Provider;

/// 공개 Ecosystems API 기본 URL
pub const DEFAULT_BASE_URL: &str = "https://packages.ecosyste.ms";

/// 패키지 조회 API 경로
const LOOKUP_PATH: &str = "/api/v1/packages/lookup";

/// HTTP 요청 기본 타임아웃
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// [`EcosystemsClient`] 생성 옵션
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// API 기본 URL. `None`이면 공개 Ecosystems API를 사용합니다.
    pub base_url: Option<String>,
    /// polite pool 식별용 운영자 이메일.
    ///
    /// 설정하면 user-agent에 `mailto:` 토큰이 포함되어 공개 API에서
    /// 우대 쿼터를 받습니다. <https://ecosyste.ms/api> 참고.
    pub email: Option<String>,
    /// HTTP 요청 타임아웃. `None`이면 30초.
    pub timeout: Option<Duration>,
}

/// Ecosystems API 조회 응답의 단일 결과
///
/// 응답 배열의 각 원소에서 필요한 필드만 모델링합니다.
#[derive(Debug, Deserialize)]
struct LookupResult {
    #[serde(default)]
    normalized_licenses: Vec<String>,
}

/// ecosyste.ms 카탈로그 클라이언트
pub struct EcosystemsClient {
    base_url: String,
    http: reqwest::Client,
}

impl EcosystemsClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(options: ClientOptions) -> Result<Self, LookupError> {
        let base_url = options
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        let http = reqwest::Client::builder()
            .timeout(options.timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT))
            .user_agent(build_user_agent(options.email.as_deref()))
            .build()
            .map_err(|e| LookupError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    async fn lookup_inner(&self, purl: &str) -> Result<String, LookupError> {
        let url = format!(
            "{}{}?purl={}",
            self.base_url,
            LOOKUP_PATH,
            urlencoding::encode(purl)
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;
        parse_lookup_body(&body)
    }
}

impl Provider for EcosystemsClient {
    async fn lookup(&self, purl: &str) -> Result<String, LookupError> {
        let result = self.lookup_inner(purl).await;
        counter!(PROVIDER_LOOKUPS_TOTAL, LABEL_RESULT => result_label(&result)).increment(1);
        result
    }
}

/// user-agent 문자열을 구성합니다.
///
/// 이메일이 있으면 polite pool 규약에 따라 `mailto:` 토큰을 덧붙입니다.
fn build_user_agent(email: Option<&str>) -> String {
    let version = env!("CARGO_PKG_VERSION");
    match email {
        Some(email) if !email.is_empty() => format!("purlin/{version} (mailto:{email})"),
        _ => format!("purlin/{version}"),
    }
}

/// 비정상 HTTP 상태 코드를 [`LookupError`]로 매핑합니다.
fn map_status(status: u16) -> LookupError {
    match status {
        404 => LookupError::NotFound,
        429 => LookupError::RateLimited,
        502 | 503 | 504 => LookupError::Unavailable(status),
        other => LookupError::Protocol(format!("unexpected status: HTTP {other}")),
    }
}

/// 조회 응답 본문을 파싱하여 첫 결과의 첫 라이선스를 반환합니다.
///
/// 결과 배열이 비었거나 첫 결과의 라이선스 목록이 비어 있으면
/// [`LookupError::NotFound`]입니다.
fn parse_lookup_body(body: &[u8]) -> Result<String, LookupError> {
    let results: Vec<LookupResult> = serde_json::from_slice(body)
        .map_err(|e| LookupError::Protocol(format!("failed to decode lookup response: {e}")))?;

    results
        .first()
        .and_then(|result| result.normalized_licenses.first())
        .cloned()
        .ok_or(LookupError::NotFound)
}

/// 메트릭 레이블용 결과 분류
fn result_label(result: &Result<String, LookupError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(LookupError::NotFound) => "not_found",
        Err(e) if e.is_transient() => "transient",
        Err(LookupError::Request(_)) => "request",
        Err(_) => "protocol",
    }
}
