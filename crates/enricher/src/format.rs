//! SBOM 형식 감지
//!
//! JSON 바이트를 검사하여 SPDX 또는 CycloneDX 형식을 판별합니다.
//! GitHub이 내보내는 `{"sbom": {...}}` 봉투는 한 단계만 해제합니다.
//!
//! # 감지 규칙 (순서대로 적용)
//!
//! 1. 최상위 값이 JSON 객체가 아니면 거부
//! 2. `sbom` 키의 값이 객체이면 그 내부 객체를 대상으로 교체
//! 3. 문자열 `spdxVersion`이 있으면 그대로 태그로 반환,
//!    없고 비어 있지 않은 `SPDXID`가 있으면 `SPDX-2.3` 기본값
//! 4. `bomFormat == "CycloneDX"`이면 `CycloneDX-<specVersion>`,
//!    버전이 없으면 `CycloneDX-1.4` 기본값
//! 5. 그 외에는 [`DocumentError::UnknownFormat`]

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use serde_json::value::RawValue;

use purlin_core::error::DocumentError;

/// GitHub 봉투의 키
const ENVELOPE_KEY: &str = "sbom";

/// 버전 마커가 없을 때의 기본 SPDX 태그
const DEFAULT_SPDX_TAG: &str = "SPDX-2.3";

/// 버전 마커가 없을 때의 기본 CycloneDX 태그
const DEFAULT_CYCLONEDX_TAG: &str = "CycloneDX-1.4";

/// 감지된 SBOM 형식
///
/// 내부 문자열은 `SPDX-2.3`, `CycloneDX-1.5` 같은 전체 형식 태그입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SbomFormat {
    /// SPDX 계열 (태그: `SPDX-<version>`)
    Spdx(String),
    /// CycloneDX 계열 (태그: `CycloneDX-<specVersion>`)
    CycloneDx(String),
}

impl SbomFormat {
    /// 전체 형식 태그 문자열을 반환합니다.
    pub fn tag(&self) -> &str {
        match self {
            Self::Spdx(tag) | Self::CycloneDx(tag) => tag,
        }
    }
}

impl fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// SBOM 데이터의 형식을 감지합니다.
pub fn detect_format(data: &[u8]) -> Result<SbomFormat, DocumentError> {
    let root: Value = serde_json::from_slice(data)
        .map_err(|e| DocumentError::Invalid(format!("invalid JSON: {e}")))?;

    let Some(object) = root.as_object() else {
        return Err(DocumentError::Invalid(
            "top-level JSON value is not an object".to_owned(),
        ));
    };

    // 봉투 해제는 한 단계만
    let object = match object.get(ENVELOPE_KEY).and_then(Value::as_object) {
        Some(inner) => inner,
        None => object,
    };

    if let Some(version) = object.get("spdxVersion").and_then(Value::as_str) {
        return Ok(SbomFormat::Spdx(version.to_owned()));
    }
    if object
        .get("SPDXID")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty())
    {
        // 버전 필드가 없어도 SPDXID가 있으면 SPDX로 간주
        return Ok(SbomFormat::Spdx(DEFAULT_SPDX_TAG.to_owned()));
    }

    if object.get("bomFormat").and_then(Value::as_str) == Some("CycloneDX") {
        let tag = match object.get("specVersion").and_then(Value::as_str) {
            Some(version) => format!("CycloneDX-{version}"),
            None => DEFAULT_CYCLONEDX_TAG.to_owned(),
        };
        return Ok(SbomFormat::CycloneDx(tag));
    }

    Err(DocumentError::UnknownFormat)
}

/// GitHub 봉투가 있으면 내부 문서 바이트를 반환합니다.
///
/// 봉투가 없으면 입력을 그대로 반환합니다. 해제는 zero-copy로 수행되며
/// 내부 문서의 원본 바이트가 보존됩니다.
pub(crate) fn unwrap_envelope(data: &[u8]) -> Result<Cow<'_, [u8]>, DocumentError> {
    let wrapper: HashMap<String, &RawValue> = serde_json::from_slice(data)
        .map_err(|e| DocumentError::Invalid(format!("failed to parse JSON: {e}")))?;

    match wrapper.get(ENVELOPE_KEY) {
        Some(inner) if inner.get().trim_start().starts_with('{') => {
            Ok(Cow::Borrowed(inner.get().as_bytes()))
        }
        _ => Ok(Cow::Borrowed(data)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_spdx_version_verbatim() {
        let data = br#"{"spdxVersion": "SPDX-2.3", "SPDXID": "SPDXRef-DOCUMENT"}"#;
        assert_eq!(
            detect_format(data).unwrap(),
            SbomFormat::Spdx("SPDX-2.3".to_owned())
        );
    }

    #[test]
    fn detects_spdx_2_2_tag() {
        let data = br#"{"spdxVersion": "SPDX-2.2"}"#;
        assert_eq!(detect_format(data).unwrap().tag(), "SPDX-2.2");
    }

    #[test]
    fn spdx_id_without_version_defaults_to_2_3() {
        let data = br#"{"SPDXID": "SPDXRef-DOCUMENT"}"#;
        assert_eq!(detect_format(data).unwrap().tag(), "SPDX-2.3");
    }

    #[test]
    fn empty_spdx_id_is_not_spdx() {
        let data = br#"{"SPDXID": ""}"#;
        assert!(matches!(
            detect_format(data),
            Err(DocumentError::UnknownFormat)
        ));
    }

    #[test]
    fn detects_cyclonedx_with_spec_version() {
        let data = br#"{"bomFormat": "CycloneDX", "specVersion": "1.5"}"#;
        assert_eq!(
            detect_format(data).unwrap(),
            SbomFormat::CycloneDx("CycloneDX-1.5".to_owned())
        );
    }

    #[test]
    fn cyclonedx_without_spec_version_defaults_to_1_4() {
        let data = br#"{"bomFormat": "CycloneDX"}"#;
        assert_eq!(detect_format(data).unwrap().tag(), "CycloneDX-1.4");
    }

    #[test]
    fn wrong_bom_format_value_is_unknown() {
        let data = br#"{"bomFormat": "SWID"}"#;
        assert!(matches!(
            detect_format(data),
            Err(DocumentError::UnknownFormat)
        ));
    }

    #[test]
    fn github_envelope_is_unwrapped_for_detection() {
        let data = br#"{"sbom": {"spdxVersion": "SPDX-2.3", "SPDXID": "SPDXRef-DOCUMENT"}}"#;
        assert_eq!(detect_format(data).unwrap().tag(), "SPDX-2.3");
    }

    #[test]
    fn envelope_with_non_object_sbom_is_not_unwrapped() {
        let data = br#"{"sbom": "not an object"}"#;
        assert!(matches!(
            detect_format(data),
            Err(DocumentError::UnknownFormat)
        ));
    }

    #[test]
    fn unknown_object_is_rejected() {
        let data = br#"{"foo": "bar"}"#;
        assert!(matches!(
            detect_format(data),
            Err(DocumentError::UnknownFormat)
        ));
    }

    #[test]
    fn non_object_input_is_invalid() {
        assert!(matches!(
            detect_format(b"[1, 2, 3]"),
            Err(DocumentError::Invalid(_))
        ));
        assert!(matches!(
            detect_format(b"\"just a string\""),
            Err(DocumentError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_json_is_invalid() {
        assert!(matches!(
            detect_format(b"{not json"),
            Err(DocumentError::Invalid(_))
        ));
    }

    #[test]
    fn unwrap_envelope_returns_inner_bytes() {
        let data = br#"{"sbom": {"spdxVersion": "SPDX-2.3"}}"#;
        let unwrapped = unwrap_envelope(data).unwrap();
        let value: Value = serde_json::from_slice(&unwrapped).unwrap();
        assert_eq!(value["spdxVersion"], "SPDX-2.3");
        assert!(value.get("sbom").is_none());
    }

    #[test]
    fn unwrap_envelope_passes_through_plain_document() {
        let data = br#"{"spdxVersion": "SPDX-2.3"}"#;
        let unwrapped = unwrap_envelope(data).unwrap();
        assert_eq!(unwrapped.as_ref(), data.as_slice());
    }

    #[test]
    fn format_display_prints_tag() {
        let format = SbomFormat::CycloneDx("CycloneDX-1.5".to_owned());
        assert_eq!(format.to_string(), "CycloneDX-1.5");
    }
}
