//! 에러 타입 — 도메인별 에러 정의
//!
//! [`PurlinError`]는 모든 하위 도메인 에러를 묶는 최상위 타입입니다.
//! 각 도메인 에러는 `#[from]` 구현을 통해 `?` 연산자로 자연스럽게
//! 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **설정**: [`ConfigError`]
//! - **캐시**: [`CacheError`] — 미스(miss)는 에러가 아니라 `Ok(None)`으로
//!   표현되므로 여기에는 실제 장애만 포함됩니다.
//! - **라이선스 조회**: [`LookupError`]
//! - **SBOM 문서**: [`DocumentError`]

/// Purlin 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum PurlinError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 캐시 저장소 에러
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// 라이선스 조회 에러
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// SBOM 문서 처리 에러
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 필수 설정 값 누락
    #[error("missing required config value: {field}")]
    MissingValue { field: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 캐시 저장소 에러
///
/// 키 부재(miss)는 [`Cache::get`](crate::cache::Cache::get)의 `Ok(None)`으로
/// 표현됩니다. 이 타입은 닫힌 캐시 접근과 저장소 장애만 나타냅니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// 닫힌 캐시에 대한 연산
    #[error("cache is closed")]
    Closed,

    /// 빈 키 (durable 백엔드는 빈 키를 저장할 수 없음)
    #[error("cache key must not be empty")]
    EmptyKey,

    /// 저장소 I/O 에러
    #[error("cache storage error: {0}")]
    Storage(String),
}

/// 라이선스 조회 에러
///
/// 외부 카탈로그 조회와 캐시-스루 경로에서 발생하는 에러입니다.
/// 429/502/503/504는 일시적(transient) 장애로 분류됩니다.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// 카탈로그에 패키지 또는 라이선스 정보 없음 (HTTP 404 포함)
    #[error("license not found")]
    NotFound,

    /// 카탈로그 요청 제한 (HTTP 429)
    #[error("rate limited by catalog: HTTP 429")]
    RateLimited,

    /// 카탈로그 서비스 불가 (HTTP 502/503/504)
    #[error("catalog unavailable: HTTP {0}")]
    Unavailable(u16),

    /// 그 외 비정상 응답 또는 응답 본문 디코딩 실패
    #[error("catalog protocol error: {0}")]
    Protocol(String),

    /// HTTP 요청 자체의 실패 (연결, 타임아웃 등)
    #[error("request failed: {0}")]
    Request(String),

    /// 조회 중 발생한 캐시 에러
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

impl LookupError {
    /// 일시적 장애인지 확인합니다 (나중에 재시도하면 성공할 수 있는 부류).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Unavailable(_))
    }

    /// 카탈로그에 정보가 없는 경우인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// SBOM 문서 처리 에러
///
/// 문서 단위 에러만 포함합니다. 개별 패키지/컴포넌트의 실패는
/// 로깅 후 건너뛰며 여기로 전파되지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// JSON 파싱 실패 또는 구조 불일치
    #[error("invalid SBOM document: {0}")]
    Invalid(String),

    /// SPDX / CycloneDX 마커를 찾을 수 없음
    #[error("unknown SBOM format: could not detect SPDX or CycloneDX markers")]
    UnknownFormat,

    /// 보강된 문서의 직렬화 실패
    #[error("failed to serialize enriched SBOM: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_error_display() {
        assert_eq!(CacheError::Closed.to_string(), "cache is closed");
        assert_eq!(
            CacheError::EmptyKey.to_string(),
            "cache key must not be empty"
        );
        assert!(
            CacheError::Storage("disk full".to_owned())
                .to_string()
                .contains("disk full")
        );
    }

    #[test]
    fn lookup_error_transient_classification() {
        assert!(LookupError::RateLimited.is_transient());
        assert!(LookupError::Unavailable(503).is_transient());
        assert!(!LookupError::NotFound.is_transient());
        assert!(!LookupError::Protocol("bad body".to_owned()).is_transient());
        assert!(!LookupError::Cache(CacheError::Closed).is_transient());
    }

    #[test]
    fn lookup_error_not_found_classification() {
        assert!(LookupError::NotFound.is_not_found());
        assert!(!LookupError::RateLimited.is_not_found());
    }

    #[test]
    fn lookup_error_display_contains_status() {
        assert!(LookupError::Unavailable(502).to_string().contains("502"));
        assert!(LookupError::RateLimited.to_string().contains("429"));
    }

    #[test]
    fn cache_error_converts_into_lookup_error() {
        let err: LookupError = CacheError::Closed.into();
        assert!(matches!(err, LookupError::Cache(CacheError::Closed)));
    }

    #[test]
    fn domain_errors_convert_into_purlin_error() {
        let err: PurlinError = CacheError::Closed.into();
        assert!(matches!(err, PurlinError::Cache(_)));

        let err: PurlinError = LookupError::NotFound.into();
        assert!(matches!(err, PurlinError::Lookup(_)));

        let err: PurlinError = DocumentError::UnknownFormat.into();
        assert!(matches!(err, PurlinError::Document(_)));

        let err: PurlinError = ConfigError::MissingValue {
            field: "email".to_owned(),
        }
        .into();
        assert!(matches!(err, PurlinError::Config(_)));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "parallel".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("parallel"));
        assert!(msg.contains("must be greater than 0"));
    }

    #[test]
    fn document_error_display() {
        let err = DocumentError::Invalid("unexpected end of input".to_owned());
        assert!(err.to_string().contains("unexpected end of input"));
        assert!(
            DocumentError::UnknownFormat
                .to_string()
                .contains("could not detect")
        );
    }
}
