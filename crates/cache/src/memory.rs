//! 휘발성 인메모리 캐시
//!
//! [`MemoryCache`]는 프로세스 수명 동안만 유지되는 맵 기반 캐시입니다.
//! CLI처럼 한 번의 실행으로 끝나는 경우에 사용합니다.
//!
//! 만료 검사는 [`get`](MemoryCache::get) 시점에 수행되는 lazy 방식이며,
//! 백그라운드 청소 태스크는 없습니다.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use purlin_core::cache::Cache;
use purlin_core::error::CacheError;

/// 만료 시각을 가진 캐시 엔트리
#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    /// `None`이면 만료되지 않음
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| Instant::now() > deadline)
    }
}

/// 캐시 내부 상태 — 엔트리 맵과 닫힘 플래그
#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, MemoryEntry>,
    closed: bool,
}

/// 휘발성 인메모리 캐시
///
/// `RwLock`으로 임의의 동시 읽기/쓰기를 허용합니다.
/// 빈 키도 그대로 저장합니다 (durable 백엔드와 달리 제약 없음).
#[derive(Debug, Default)]
pub struct MemoryCache {
    inner: RwLock<MemoryState>,
}

impl MemoryCache {
    /// 새 `MemoryCache`를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return Err(CacheError::Closed);
        }

        match state.entries.get(key) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.value.clone())),
            _ => Ok(None),
        }
    }

    fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return Err(CacheError::Closed);
        }

        state.entries.insert(
            key.to_owned(),
            MemoryEntry {
                value: value.to_owned(),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return Err(CacheError::Closed);
        }

        state.entries.remove(key);
        Ok(())
    }

    fn close(&self) -> Result<(), CacheError> {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return Ok(()); // 이미 닫힘, 멱등
        }

        state.closed = true;
        state.entries.clear();
        Ok(())
    }
}
