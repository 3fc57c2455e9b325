//! SBOM 보강 엔진 — 전체 보강 흐름 관리
//!
//! [`Enricher`]는 형식 감지, 문서 파싱, 병렬 조회, 결과 반영,
//! 재직렬화를 순서대로 수행하는 공개 진입점입니다.
//!
//! # 내부 아키텍처
//!
//! ```text
//! bytes --> detect_format --> SpdxDocument / CycloneDxBom
//!                                   |
//!                             extract jobs (has_license / purl 검사)
//!                                   |
//!                             run_workers --> CachedLookup --> Provider
//!                                   |
//!                             set_license(index, license)
//!                                   |
//!                             serde_json --> bytes
//! ```
//!
//! # 치명 / 비치명 에러
//!
//! 문서 단위 실패(파싱, 미지원 형식, 직렬화)만 치명적입니다.
//! 아이템 단위 실패(purl 없음, 조회 실패, 조회 중 캐시 에러)는 모두
//! 아이템 식별자와 함께 로깅하고 건너뜁니다. 패키지 하나가 SBOM 전체를
//! 망치지 않습니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use tracing::{debug, error};

use purlin_core::cache::Cache;
use purlin_core::error::DocumentError;
use purlin_core::metrics::{
    ENRICH_DURATION_SECONDS, ENRICH_ITEMS_ENRICHED_TOTAL, ENRICH_REQUESTS_TOTAL, LABEL_FORMAT,
};
use purlin_core::provider::DynProvider;
use purlin_provider::CachedLookup;

use crate::cyclonedx;
use crate::format::{SbomFormat, detect_format};
use crate::spdx;
use crate::worker::{EnrichJob, run_workers};

/// 보강 가능한 아이템의 능력 집합
///
/// SPDX 패키지와 CycloneDX 컴포넌트가 구현하며, 엔진의 보강 루프는
/// 이 trait 하나로 두 형식을 동일하게 처리합니다.
pub(crate) trait Enrichable {
    /// 조회에 사용할 purl. `None`이면 추출 실패(아이템 건너뜀).
    fn purl(&self) -> Option<String>;

    /// 이미 의미 있는 라이선스를 갖고 있는지.
    fn has_license(&self) -> bool;

    /// 라이선스를 형식별 규칙에 따라 기록합니다.
    ///
    /// 한 번의 실행에서 아이템당 최대 한 번 호출됩니다.
    fn set_license(&mut self, license: &str);

    /// 진단 로그용 안정 식별자 (SPDX ID / bom-ref).
    fn log_id(&self) -> String;
}

/// 보강 요청 옵션
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// 보강할 SBOM 문서 바이트
    pub sbom: Vec<u8>,
    /// 동시 조회 워커 수. `0`은 `1`로 보정되며, 아이템 수를 넘지 않습니다.
    pub parallelism: usize,
    /// 조회 데드라인. 지나면 남은 조회를 포기하고 부분 결과로 마무리합니다.
    pub deadline: Option<Instant>,
}

/// SBOM 보강 엔진
///
/// 제공자와 캐시를 묶어 생성하면 여러 요청에서 재사용할 수 있습니다.
/// 내부 상태는 모두 공유 가능(`Send + Sync`)합니다.
pub struct Enricher {
    lookup: Arc<CachedLookup>,
}

impl Enricher {
    /// 새 엔진을 생성합니다.
    ///
    /// `cache`가 `None`이면 모든 조회가 제공자로 직행합니다.
    /// `cache_ttl`은 캐시 기록에 사용할 TTL입니다 (`None` = 만료 없음).
    pub fn new(
        provider: Arc<dyn DynProvider>,
        cache: Option<Arc<dyn Cache>>,
        cache_ttl: Option<Duration>,
    ) -> Self {
        Self {
            lookup: Arc::new(CachedLookup::new(provider, cache, cache_ttl)),
        }
    }

    /// SBOM을 보강하여 재직렬화된 바이트를 반환합니다.
    ///
    /// 보강할 아이템이 없는 문서는 입력 바이트를 그대로 반환합니다
    /// (재직렬화 없음 — 호출자는 이를 항등 보장으로 사용합니다).
    pub async fn enrich(&self, opts: EnrichOptions) -> Result<Vec<u8>, DocumentError> {
        let started = Instant::now();
        let format = detect_format(&opts.sbom)?;
        debug!(format = %format, "detected SBOM format");

        let enriched = match &format {
            SbomFormat::Spdx(_) => {
                counter!(ENRICH_REQUESTS_TOTAL, LABEL_FORMAT => "spdx").increment(1);
                let mut doc = spdx::parse(&opts.sbom)?;
                if doc.packages.is_empty() {
                    return Ok(opts.sbom);
                }
                self.enrich_items(&mut doc.packages, &opts).await;
                serde_json::to_vec(&doc).map_err(|e| DocumentError::Serialize(e.to_string()))?
            }
            SbomFormat::CycloneDx(_) => {
                counter!(ENRICH_REQUESTS_TOTAL, LABEL_FORMAT => "cyclonedx").increment(1);
                let mut bom = cyclonedx::parse(&opts.sbom)?;
                if bom.components.is_empty() {
                    return Ok(opts.sbom);
                }
                self.enrich_items(&mut bom.components, &opts).await;
                serde_json::to_vec(&bom).map_err(|e| DocumentError::Serialize(e.to_string()))?
            }
        };

        histogram!(ENRICH_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        Ok(enriched)
    }

    /// 한 형식의 아이템 목록에 대해 공통 보강 루프를 수행합니다.
    async fn enrich_items<T: Enrichable>(&self, items: &mut [T], opts: &EnrichOptions) {
        // 메인 태스크에서 작업을 사전 추출: 라이선스 보유 아이템은 제외,
        // purl 추출 실패는 여기에서만 진단한다.
        let mut jobs = Vec::new();
        for (index, item) in items.iter().enumerate() {
            if item.has_license() {
                continue;
            }
            let Some(purl) = item.purl() else {
                error!(id = %item.log_id(), "failed to get purl for item");
                continue;
            };
            jobs.push(EnrichJob {
                index,
                purl,
                log_id: item.log_id(),
            });
        }

        let results = run_workers(
            jobs,
            opts.parallelism,
            Arc::clone(&self.lookup),
            opts.deadline.map(tokio::time::Instant::from_std),
        )
        .await;

        let enriched_count = u64::try_from(results.len()).unwrap_or(u64::MAX);
        for (index, license) in results {
            items[index].set_license(&license);
        }
        if enriched_count > 0 {
            counter!(ENRICH_ITEMS_ENRICHED_TOTAL).increment(enriched_count);
        }
    }
}
