//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 crate는 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `purlin_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(purlin_core::metrics::ENRICH_REQUESTS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, not_found, transient, protocol, error)
pub const LABEL_RESULT: &str = "result";

/// SBOM 형식 레이블 키 (spdx, cyclonedx)
pub const LABEL_FORMAT: &str = "format";

// ─── Enricher 메트릭 ────────────────────────────────────────────────

/// Enricher: 처리된 보강 요청 수 (counter, label: format)
pub const ENRICH_REQUESTS_TOTAL: &str = "purlin_enrich_requests_total";

/// Enricher: 라이선스가 기록된 아이템 수 (counter)
pub const ENRICH_ITEMS_ENRICHED_TOTAL: &str = "purlin_enrich_items_enriched_total";

/// Enricher: 보강 소요 시간 (histogram, 초)
pub const ENRICH_DURATION_SECONDS: &str = "purlin_enrich_duration_seconds";

// ─── Lookup 메트릭 ──────────────────────────────────────────────────

/// Lookup: 캐시 히트 수 (counter)
pub const LOOKUP_CACHE_HITS_TOTAL: &str = "purlin_lookup_cache_hits_total";

/// Lookup: 캐시 미스 수 (counter)
pub const LOOKUP_CACHE_MISSES_TOTAL: &str = "purlin_lookup_cache_misses_total";

/// Lookup: 제공자 호출 수 (counter, label: result)
pub const PROVIDER_LOOKUPS_TOTAL: &str = "purlin_provider_lookups_total";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 보강 소요 시간 히스토그램 버킷 (초)
///
/// 10ms ~ 600s 범위 (제공자 왕복이 지배적)
pub const ENRICH_DURATION_BUCKETS: [f64; 9] =
    [0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0, 120.0, 600.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `purlin-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        ENRICH_REQUESTS_TOTAL,
        "Total number of SBOM enrichment requests processed"
    );
    describe_counter!(
        ENRICH_ITEMS_ENRICHED_TOTAL,
        "Total number of packages/components that received a license"
    );
    describe_histogram!(
        ENRICH_DURATION_SECONDS,
        "Time to enrich a single SBOM document in seconds"
    );
    describe_counter!(
        LOOKUP_CACHE_HITS_TOTAL,
        "Total number of license lookups served from the cache"
    );
    describe_counter!(
        LOOKUP_CACHE_MISSES_TOTAL,
        "Total number of license lookups that fell through to the provider"
    );
    describe_counter!(
        PROVIDER_LOOKUPS_TOTAL,
        "Total number of provider calls by result"
    );
}
