//! 캐시 trait — purl→라이선스 키-값 저장소 인터페이스
//!
//! [`Cache`]는 모든 캐시 백엔드가 구현하는 인터페이스입니다.
//! 휘발성(`MemoryCache`)과 영속성(`SqliteCache`) 구현은
//! `purlin-cache` crate에 있습니다.
//!
//! # 미스와 에러의 구분
//!
//! 키 부재와 만료는 `Ok(None)`으로, 실제 장애(닫힌 캐시, 저장소 I/O)는
//! [`CacheError`]로 구분됩니다. 캐시-스루 조회 경로는 이 구분에
//! 의존합니다: 미스는 제공자(provider)로 폴스루하지만, 장애는 즉시
//! 호출자에게 전파됩니다.

use std::time::Duration;

use crate::error::CacheError;

/// purl→라이선스 캐시 인터페이스
///
/// 모든 연산은 동기적이며, 구현체는 임의의 동시 호출을 허용해야 합니다.
/// 엔진의 워커들이 `Arc<dyn Cache>`로 공유하여 사용합니다.
pub trait Cache: Send + Sync {
    /// 키에 해당하는 값을 조회합니다.
    ///
    /// 키가 없거나 만료된 경우 `Ok(None)`을 반환합니다.
    /// 만료 검사는 조회 시점에 수행되며, 만료된 값이 반환되는 일은 없습니다.
    /// 닫힌 캐시에 대해서는 [`CacheError::Closed`]를 반환합니다.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// 값을 TTL과 함께 저장합니다.
    ///
    /// `ttl`이 `None`이면 만료되지 않습니다. 기존 값은 무조건 덮어쓰며
    /// 만료 시각도 재설정됩니다. durable 백엔드는 빈 키를
    /// [`CacheError::EmptyKey`]로 거부합니다.
    fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;

    /// 키를 삭제합니다.
    ///
    /// 멱등 연산입니다. 존재하지 않는 키의 삭제는 성공으로 처리됩니다.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// 캐시를 닫고 자원을 해제합니다.
    ///
    /// 멱등 연산입니다. 닫힌 후의 다른 연산은 모두
    /// [`CacheError::Closed`]를 반환합니다.
    fn close(&self) -> Result<(), CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Cache trait 구현 테스트를 위한 mock (TTL은 무시)
    struct MapCache {
        inner: Mutex<Option<HashMap<String, String>>>,
    }

    impl MapCache {
        fn new() -> Self {
            Self {
                inner: Mutex::new(Some(HashMap::new())),
            }
        }
    }

    impl Cache for MapCache {
        fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            let guard = self.inner.lock().unwrap();
            let map = guard.as_ref().ok_or(CacheError::Closed)?;
            Ok(map.get(key).cloned())
        }

        fn set_with_ttl(
            &self,
            key: &str,
            value: &str,
            _ttl: Option<Duration>,
        ) -> Result<(), CacheError> {
            let mut guard = self.inner.lock().unwrap();
            let map = guard.as_mut().ok_or(CacheError::Closed)?;
            map.insert(key.to_owned(), value.to_owned());
            Ok(())
        }

        fn delete(&self, key: &str) -> Result<(), CacheError> {
            let mut guard = self.inner.lock().unwrap();
            let map = guard.as_mut().ok_or(CacheError::Closed)?;
            map.remove(key);
            Ok(())
        }

        fn close(&self) -> Result<(), CacheError> {
            let mut guard = self.inner.lock().unwrap();
            *guard = None;
            Ok(())
        }
    }

    #[test]
    fn cache_can_be_used_as_trait_object() {
        let cache: Box<dyn Cache> = Box::new(MapCache::new());

        assert_eq!(cache.get("pkg:npm/lodash@4.17.21").unwrap(), None);
        cache
            .set_with_ttl("pkg:npm/lodash@4.17.21", "MIT", None)
            .unwrap();
        assert_eq!(
            cache.get("pkg:npm/lodash@4.17.21").unwrap(),
            Some("MIT".to_owned())
        );
    }

    #[test]
    fn closed_cache_reports_closed() {
        let cache = MapCache::new();
        cache.close().unwrap();
        assert_eq!(cache.get("k"), Err(CacheError::Closed));
        assert_eq!(cache.set_with_ttl("k", "v", None), Err(CacheError::Closed));
        assert_eq!(cache.delete("k"), Err(CacheError::Closed));
        // close는 멱등
        cache.close().unwrap();
    }
}
