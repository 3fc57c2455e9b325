//! 병렬 보강 워커 풀
//!
//! 사전에 추출된 작업 목록을 고정 폭의 동시성으로 소진합니다.
//! 작업마다 tokio 태스크 하나를 [`JoinSet`]에 스폰하고,
//! [`Semaphore`]로 동시에 진행되는 조회 수를 제한합니다.
//!
//! # 계약
//!
//! - 각 작업은 정확히 한 번 실행된다.
//! - 동시에 진행 중인 조회는 최대 `parallelism`개다 (`0`은 `1`로 보정).
//! - 작업 실패는 로깅 후 흡수되며 배치를 중단시키지 않는다.
//! - 모든 태스크가 합류한 뒤에만 반환한다. 실행 순서는 보장하지 않는다.
//! - 데드라인이 지나면 아직 끝나지 않은 조회는 포기(로깅)하고,
//!   이미 끝난 조회 결과는 그대로 반영된다.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, warn};

use purlin_provider::CachedLookup;

/// 보강 작업 하나 — 아이템 인덱스와 조회에 필요한 정보
///
/// 인덱스는 문서 뷰의 아이템 슬롯을 가리키는 핸들입니다. 각 작업의
/// 슬롯은 서로 다르므로 결과 반영에 동기화가 필요 없습니다.
#[derive(Debug)]
pub(crate) struct EnrichJob {
    pub index: usize,
    pub purl: String,
    pub log_id: String,
}

/// 작업 목록을 병렬로 처리하고 `(인덱스, 라이선스)` 결과를 반환합니다.
///
/// 빈 라이선스, 조회 실패, 데드라인 초과는 결과에 포함되지 않습니다.
pub(crate) async fn run_workers(
    jobs: Vec<EnrichJob>,
    parallelism: usize,
    lookup: Arc<CachedLookup>,
    deadline: Option<tokio::time::Instant>,
) -> Vec<(usize, String)> {
    if jobs.is_empty() {
        return Vec::new();
    }

    let width = parallelism.max(1).min(jobs.len());
    let semaphore = Arc::new(Semaphore::new(width));
    let mut join_set: JoinSet<Option<(usize, String)>> = JoinSet::new();

    for job in jobs {
        let semaphore = Arc::clone(&semaphore);
        let lookup = Arc::clone(&lookup);

        join_set.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return None;
            };

            let result = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, lookup.get(&job.purl)).await {
                        Ok(result) => result,
                        Err(_) => {
                            warn!(
                                purl = %job.purl,
                                id = %job.log_id,
                                "license lookup abandoned: deadline exceeded"
                            );
                            return None;
                        }
                    }
                }
                None => lookup.get(&job.purl).await,
            };

            match result {
                Ok(license) if license.is_empty() => None,
                Ok(license) => Some((job.index, license)),
                Err(e) => {
                    error!(
                        purl = %job.purl,
                        id = %job.log_id,
                        error = %e,
                        "failed to get license for item"
                    );
                    None
                }
            }
        });
    }

    let mut enriched = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Some(result)) => enriched.push(result),
            Ok(None) => {}
            Err(e) => error!(error = %e, "enrichment worker task failed"),
        }
    }
    enriched
}
