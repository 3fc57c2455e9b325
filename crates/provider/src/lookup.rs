//! 캐시-스루 라이선스 조회
//!
//! [`CachedLookup`]은 캐시와 제공자를 묶어 미스/히트 정책을 감추는
//! 래퍼입니다. 모든 보강 워커는 이 경로를 통해 라이선스를 조회합니다.
//!
//! # 알고리즘
//!
//! 1. 캐시가 설정되어 있으면 먼저 읽는다. 히트는 즉시 반환.
//! 2. 미스는 제공자로 폴스루한다. 미스가 아닌 캐시 에러(닫힘, I/O)는
//!    제공자를 호출하지 않고 즉시 전파한다.
//! 3. 제공자가 비어 있지 않은 값을 반환하면 설정된 TTL로 캐시에 기록한
//!    뒤 반환한다. 기록 실패는 호출자에게 전파된다 (이번 호출의 값은
//!    유효하지만 이후 호출을 위한 캐시는 남지 않음).
//! 4. 빈 문자열 결과는 캐시하지 않고 그대로 반환한다.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;

use purlin_core::cache::Cache;
use purlin_core::error::LookupError;
use purlin_core::metrics::{LOOKUP_CACHE_HITS_TOTAL, LOOKUP_CACHE_MISSES_TOTAL};
use purlin_core::provider::DynProvider;

/// 캐시-스루 라이선스 조회기
///
/// 캐시는 선택적입니다. `None`이면 모든 조회가 제공자로 직행합니다.
pub struct CachedLookup {
    provider: Arc<dyn DynProvider>,
    cache: Option<Arc<dyn Cache>>,
    ttl: Option<Duration>,
}

impl CachedLookup {
    /// 새 조회기를 생성합니다.
    ///
    /// `ttl`은 캐시 기록에 사용할 TTL입니다. `None`이면 만료 없음.
    pub fn new(
        provider: Arc<dyn DynProvider>,
        cache: Option<Arc<dyn Cache>>,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            provider,
            cache,
            ttl,
        }
    }

    /// purl에 대한 라이선스를 캐시 우선으로 조회합니다.
    pub async fn get(&self, purl: &str) -> Result<String, LookupError> {
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(purl)? {
                counter!(LOOKUP_CACHE_HITS_TOTAL).increment(1);
                return Ok(cached);
            }
            counter!(LOOKUP_CACHE_MISSES_TOTAL).increment(1);
        }

        let license = self.provider.lookup(purl).await?;

        if !license.is_empty() {
            if let Some(cache) = &self.cache {
                cache.set_with_ttl(purl, &license, self.ttl)?;
            }
        }

        Ok(license)
    }
}
