//! 라이선스 제공자 trait — 외부 카탈로그 조회 인터페이스
//!
//! [`Provider`]는 purl 하나에 대한 라이선스 문자열을 반환하는 단일
//! 연산을 정의합니다. 구체 구현(`EcosystemsClient`)과 캐시-스루
//! 래퍼(`CachedLookup`)는 `purlin-provider` crate에 있습니다.

use std::future::Future;
use std::pin::Pin;

use crate::error::LookupError;

/// dyn-compatible Future 타입 별칭
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 라이선스 제공자 trait
///
/// purl로 외부 카탈로그를 조회하여 라이선스 문자열을 반환합니다.
///
/// # 반환 규약
///
/// - 성공: 첫 번째 결과의 첫 번째 정규화된 라이선스
/// - 정보 없음: [`LookupError::NotFound`]
/// - 일시적 장애: [`LookupError::RateLimited`] / [`LookupError::Unavailable`]
/// - 그 외 비정상 응답: [`LookupError::Protocol`]
pub trait Provider: Send + Sync {
    /// purl에 대한 라이선스를 조회합니다.
    fn lookup(&self, purl: &str) -> impl Future<Output = Result<String, LookupError>> + Send;
}

/// dyn-compatible 제공자 trait
///
/// `Provider` trait은 RPITIT를 사용하므로 `dyn Provider`가 불가합니다.
/// `DynProvider`는 `BoxFuture`를 반환하여 `Arc<dyn DynProvider>`로
/// 엔진과 워커 간에 공유할 수 있게 합니다.
/// `Provider`를 구현한 타입은 blanket impl으로 자동으로 `DynProvider`도
/// 구현됩니다.
pub trait DynProvider: Send + Sync {
    /// purl에 대한 라이선스를 조회합니다.
    fn lookup<'a>(&'a self, purl: &'a str) -> BoxFuture<'a, Result<String, LookupError>>;
}

impl<T: Provider> DynProvider for T {
    fn lookup<'a>(&'a self, purl: &'a str) -> BoxFuture<'a, Result<String, LookupError>> {
        Box::pin(Provider::lookup(self, purl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Provider trait 구현 테스트를 위한 mock
    struct FixedProvider {
        license: &'static str,
        calls: AtomicUsize,
    }

    impl Provider for FixedProvider {
        async fn lookup(&self, purl: &str) -> Result<String, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if purl.is_empty() {
                return Err(LookupError::NotFound);
            }
            Ok(self.license.to_owned())
        }
    }

    #[tokio::test]
    async fn provider_lookup_returns_license() {
        let provider = FixedProvider {
            license: "MIT",
            calls: AtomicUsize::new(0),
        };
        let license = Provider::lookup(&provider, "pkg:npm/express@4.17.1")
            .await
            .unwrap();
        assert_eq!(license, "MIT");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_can_be_shared_as_dyn() {
        let provider: Arc<dyn DynProvider> = Arc::new(FixedProvider {
            license: "Apache-2.0",
            calls: AtomicUsize::new(0),
        });

        let license = provider.lookup("pkg:cargo/serde@1.0.204").await.unwrap();
        assert_eq!(license, "Apache-2.0");

        let err = provider.lookup("").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
