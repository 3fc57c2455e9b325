//! SPDX 2.x JSON 문서 뷰
//!
//! 엔진이 건드리는 필드만 타입으로 모델링하고, 나머지 필드는
//! `#[serde(flatten)]` 맵에 담아 왕복 시 그대로 보존합니다.
//!
//! # 라이선스 의미 규칙
//!
//! `licenseConcluded` / `licenseDeclared`가 비어 있지 않고 `NONE` 또는
//! `NOASSERTION` 센티널이 아닐 때만 의미 있는 라이선스로 간주합니다.
//! 센티널만 있는 패키지는 라이선스 없음으로 취급되어 보강 대상이 됩니다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use purlin_core::error::DocumentError;

use crate::enricher::Enrichable;
use crate::format::unwrap_envelope;

/// SPDX 라이선스 필드의 NONE 센티널
pub(crate) const LICENSE_NONE: &str = "NONE";

/// SPDX 라이선스 필드의 NOASSERTION 센티널
pub(crate) const LICENSE_NOASSERTION: &str = "NOASSERTION";

/// purl을 가리키는 외부 참조 타입 값
const REFERENCE_TYPE_PURL: &str = "purl";

/// SPDX 문서 (보강에 필요한 필드만 모델링)
#[derive(Debug, Serialize, Deserialize)]
pub struct SpdxDocument {
    /// 문서의 패키지 목록
    #[serde(default)]
    pub packages: Vec<SpdxPackage>,

    /// 모델링하지 않은 나머지 필드 (왕복 보존용)
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// SPDX 패키지
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxPackage {
    /// 패키지의 SPDX 식별자 (로깅용)
    #[serde(rename = "SPDXID", default)]
    pub spdx_id: String,

    /// 분석으로 결론지은 라이선스
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,

    /// 패키지가 선언한 라이선스
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_declared: Option<String>,

    /// 외부 참조 목록 (purl 추출 대상)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_refs: Vec<SpdxExternalRef>,

    /// 모델링하지 않은 나머지 필드 (왕복 보존용)
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// SPDX 외부 참조 (purl 등)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxExternalRef {
    #[serde(default)]
    pub reference_type: String,
    #[serde(default)]
    pub reference_locator: String,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// SBOM 바이트를 SPDX 문서로 파싱합니다.
///
/// GitHub 봉투가 있으면 해제한 뒤 파싱하며, 출력 시 봉투는 복원되지
/// 않습니다.
pub fn parse(data: &[u8]) -> Result<SpdxDocument, DocumentError> {
    let unwrapped = unwrap_envelope(data)?;
    serde_json::from_slice(&unwrapped)
        .map_err(|e| DocumentError::Invalid(format!("failed to parse SPDX document: {e}")))
}

/// 라이선스 필드 값이 의미 있는지 검사합니다.
fn is_meaningful(license: Option<&str>) -> bool {
    matches!(
        license,
        Some(value) if !value.is_empty() && value != LICENSE_NONE && value != LICENSE_NOASSERTION
    )
}

impl Enrichable for SpdxPackage {
    fn purl(&self) -> Option<String> {
        self.external_refs
            .iter()
            .find(|r| r.reference_type == REFERENCE_TYPE_PURL)
            .map(|r| r.reference_locator.clone())
    }

    fn has_license(&self) -> bool {
        is_meaningful(self.license_concluded.as_deref())
            || is_meaningful(self.license_declared.as_deref())
    }

    fn set_license(&mut self, license: &str) {
        self.license_concluded = Some(license.to_owned());
        // declared는 비어 있거나 센티널인 경우에만 덮어씀
        if !is_meaningful(self.license_declared.as_deref()) {
            self.license_declared = Some(license.to_owned());
        }
    }

    fn log_id(&self) -> String {
        self.spdx_id.clone()
    }
}
