//! CycloneDX JSON 문서 뷰
//!
//! 컴포넌트의 `purl`과 `licenses`만 타입으로 모델링하고, 나머지 필드는
//! `#[serde(flatten)]` 맵에 담아 왕복 시 그대로 보존합니다.
//!
//! # 라이선스 판정
//!
//! `licenses` 배열에 다음 중 하나라도 비어 있지 않은 항목이 있으면
//! 라이선스가 있는 것으로 간주합니다: 선택지의 `expression`, 또는 중첩된
//! `license` 객체의 `id` / `name` / `expression`. 빈 선택지만 있는
//! 배열은 라이선스 없음으로 취급하며, 보강 시 기존 선택지를 채우는 대신
//! 새 `{expression: ...}` 선택지를 덧붙입니다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use purlin_core::error::DocumentError;

use crate::enricher::Enrichable;

/// CycloneDX BOM (보강에 필요한 필드만 모델링)
#[derive(Debug, Serialize, Deserialize)]
pub struct CycloneDxBom {
    /// BOM의 컴포넌트 목록
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<CycloneDxComponent>,

    /// 모델링하지 않은 나머지 필드 (왕복 보존용)
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// CycloneDX 컴포넌트
#[derive(Debug, Serialize, Deserialize)]
pub struct CycloneDxComponent {
    /// BOM 내 참조 식별자 (로깅용)
    #[serde(rename = "bom-ref", default, skip_serializing_if = "String::is_empty")]
    pub bom_ref: String,

    /// 패키지 URL. 없거나 빈 문자열일 수 있으며, 에러가 아닙니다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,

    /// 라이선스 선택지 목록
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Vec<LicenseChoice>>,

    /// 모델링하지 않은 나머지 필드 (왕복 보존용)
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// 단일 라이선스 선택지 — `license` 객체 또는 `expression` 문자열
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LicenseChoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<CycloneDxLicense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// 중첩 `license` 객체
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CycloneDxLicense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// SBOM 바이트를 CycloneDX BOM으로 파싱합니다.
pub fn parse(data: &[u8]) -> Result<CycloneDxBom, DocumentError> {
    serde_json::from_slice(data)
        .map_err(|e| DocumentError::Invalid(format!("failed to parse CycloneDX document: {e}")))
}

/// 선택지 하나가 의미 있는 라이선스를 담고 있는지 검사합니다.
fn choice_is_meaningful(choice: &LicenseChoice) -> bool {
    if choice.expression.as_deref().is_some_and(|e| !e.is_empty()) {
        return true;
    }
    if let Some(license) = &choice.license {
        return [&license.id, &license.name, &license.expression]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.is_empty()));
    }
    false
}

impl Enrichable for CycloneDxComponent {
    fn purl(&self) -> Option<String> {
        // 빈 문자열도 그대로 반환 — 조회는 NotFound로 끝난다
        Some(self.purl.clone().unwrap_or_default())
    }

    fn has_license(&self) -> bool {
        self.licenses
            .as_deref()
            .is_some_and(|choices| choices.iter().any(choice_is_meaningful))
    }

    fn set_license(&mut self, license: &str) {
        self.licenses
            .get_or_insert_with(Vec::new)
            .push(LicenseChoice {
                expression: Some(license.to_owned()),
                ..Default::default()
            });
    }

    fn log_id(&self) -> String {
        self.bom_ref.clone()
    }
}
