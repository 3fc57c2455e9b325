//! 영속성 SQLite 캐시
//!
//! [`SqliteCache`]는 단일 SQLite 파일의 `licenses` 테이블 하나를
//! 논리적 버킷으로 사용하는 캐시입니다. 데몬처럼 프로세스 재시작 후에도
//! 조회 결과를 유지해야 하는 경우에 사용합니다.
//!
//! # 레코드 형식
//!
//! 각 행은 자기 기술적(self-describing) JSON 레코드를 저장합니다:
//!
//! ```json
//! {"value": "MIT", "expires_at_ms": 1730000000000}
//! ```
//!
//! `expires_at_ms`가 없으면 만료되지 않습니다. 이 형식으로 파싱되지 않는
//! 행은 TTL 도입 이전에 기록된 레거시 값으로 간주하여 저장된 텍스트
//! 전체를 만료 없는 값으로 반환합니다. 새 쓰기는 항상 구조화된 형식을
//! 사용합니다.

use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use purlin_core::cache::Cache;
use purlin_core::error::CacheError;

/// 테이블 초기화 SQL — 단일 버킷
const INIT_SCHEMA: &str =
    "CREATE TABLE IF NOT EXISTS licenses (key TEXT PRIMARY KEY, record TEXT NOT NULL)";

/// 저장 레코드 — 값과 선택적 만료 시각 (Unix epoch 밀리초)
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at_ms: Option<u64>,
}

impl StoredRecord {
    fn is_expired(&self) -> bool {
        self.expires_at_ms
            .is_some_and(|deadline| now_unix_ms() > deadline)
    }
}

/// 현재 시각을 Unix epoch 밀리초로 반환합니다.
fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// 영속성 SQLite 캐시
///
/// 내부 mutex가 읽기/쓰기를 직렬화하며, 각 호출은 단일 SQL 문으로
/// 수행되어 호출 단위 트랜잭션이 됩니다. `close()` 이후의 연산은
/// [`CacheError::Closed`]를 반환합니다.
pub struct SqliteCache {
    conn: Mutex<Option<Connection>>,
}

impl SqliteCache {
    /// 주어진 경로의 데이터베이스 파일을 열거나 생성합니다.
    ///
    /// 상위 디렉토리가 없으면 생성하고, 파일 모드는 `0600`으로
    /// 설정합니다 (unix).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CacheError::Storage(format!("create cache directory: {e}")))?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| CacheError::Storage(format!("open cache database: {e}")))?;
        conn.execute_batch(INIT_SCHEMA)
            .map_err(|e| CacheError::Storage(format!("init cache schema: {e}")))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| CacheError::Storage(format!("set cache file mode: {e}")))?;
        }

        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }
}

impl Cache for SqliteCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let conn = guard.as_ref().ok_or(CacheError::Closed)?;

        let record: Option<String> = conn
            .query_row(
                "SELECT record FROM licenses WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CacheError::Storage(e.to_string()))?;

        let Some(raw) = record else {
            return Ok(None);
        };

        match serde_json::from_str::<StoredRecord>(&raw) {
            Ok(record) if record.is_expired() => Ok(None),
            Ok(record) => Ok(Some(record.value)),
            // 레거시 호환: 구조화 이전의 행은 저장된 텍스트가 곧 값
            Err(_) => Ok(Some(raw)),
        }
    }

    fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        let guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let conn = guard.as_ref().ok_or(CacheError::Closed)?;

        let record = StoredRecord {
            value: value.to_owned(),
            expires_at_ms: ttl.map(|ttl| {
                now_unix_ms().saturating_add(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
            }),
        };
        let encoded = serde_json::to_string(&record)
            .map_err(|e| CacheError::Storage(format!("encode cache record: {e}")))?;

        conn.execute(
            "INSERT OR REPLACE INTO licenses (key, record) VALUES (?1, ?2)",
            params![key, encoded],
        )
        .map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let conn = guard.as_ref().ok_or(CacheError::Closed)?;

        conn.execute("DELETE FROM licenses WHERE key = ?1", params![key])
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(())
    }

    fn close(&self) -> Result<(), CacheError> {
        let mut guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(conn) = guard.take() else {
            return Ok(()); // 이미 닫힘, 멱등
        };

        conn.close()
            .map_err(|(_, e)| CacheError::Storage(format!("close cache database: {e}")))
    }
}
