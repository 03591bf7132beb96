//! Upload admission
//!
//! `validate_upload` is the only admission check in the crate graph. The multipart
//! extractor and the conversion service both call it with the same rules, so the
//! two call sites cannot disagree about a given upload.

use crate::config::Config;
use crate::constants::MIN_UPLOAD_SIZE_BYTES;
use crate::models::{FileRole, UploadedFile};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("{role} is missing or empty.")]
    MissingOrEmpty { role: FileRole },

    #[error("{role} is too small. Minimum size is {min_size} bytes.")]
    TooSmall {
        role: FileRole,
        size: u64,
        min_size: u64,
    },

    #[error("{role} has unsupported content type '{content_type}'. Allowed types: {}", .allowed.join(", "))]
    UnsupportedType {
        role: FileRole,
        content_type: String,
        allowed: Vec<String>,
    },
}

impl UploadRejection {
    pub fn role(&self) -> FileRole {
        match self {
            UploadRejection::MissingOrEmpty { role }
            | UploadRejection::TooSmall { role, .. }
            | UploadRejection::UnsupportedType { role, .. } => *role,
        }
    }
}

/// Role-specific admission thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionRule {
    pub min_size_bytes: u64,
    /// Lowercased media types. Empty accepts any type.
    pub allowed_content_types: Vec<String>,
}

impl AdmissionRule {
    pub fn new(min_size_bytes: u64, allowed_content_types: &[String]) -> Self {
        Self {
            min_size_bytes,
            allowed_content_types: allowed_content_types
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Minimum size only; any media type.
    pub fn permissive() -> Self {
        Self::new(MIN_UPLOAD_SIZE_BYTES, &[])
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(MIN_UPLOAD_SIZE_BYTES, config.allowed_upload_content_types())
    }

    fn accepts_type(&self, media_type: &str) -> bool {
        self.allowed_content_types.is_empty()
            || self
                .allowed_content_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(media_type))
    }
}

impl Default for AdmissionRule {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Check one upload against a rule. Pure: no I/O, no logging.
pub fn validate_upload(
    file: Option<&UploadedFile>,
    role: FileRole,
    rule: &AdmissionRule,
) -> Result<(), UploadRejection> {
    let file = match file {
        Some(f) if !f.is_empty() && f.declared_size > 0 => f,
        _ => return Err(UploadRejection::MissingOrEmpty { role }),
    };

    if file.declared_size < rule.min_size_bytes {
        return Err(UploadRejection::TooSmall {
            role,
            size: file.declared_size,
            min_size: rule.min_size_bytes,
        });
    }

    let media_type = file.media_type();
    if !rule.accepts_type(&media_type) {
        return Err(UploadRejection::UnsupportedType {
            role,
            content_type: media_type,
            allowed: rule.allowed_content_types.clone(),
        });
    }

    Ok(())
}

/// Admission rules for both roles of a conversion request.
#[derive(Debug, Clone, Default)]
pub struct AdmissionPolicy {
    pub tone: AdmissionRule,
    pub content: AdmissionRule,
}

impl AdmissionPolicy {
    pub fn new(tone: AdmissionRule, content: AdmissionRule) -> Self {
        Self { tone, content }
    }

    pub fn uniform(rule: AdmissionRule) -> Self {
        Self {
            tone: rule.clone(),
            content: rule,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::uniform(AdmissionRule::from_config(config))
    }

    pub fn rule_for(&self, role: FileRole) -> &AdmissionRule {
        match role {
            FileRole::Tone => &self.tone,
            FileRole::Content => &self.content,
        }
    }

    /// Validate the tone file, then the content file; the first rejection wins.
    pub fn admit(
        &self,
        tone: Option<&UploadedFile>,
        content: Option<&UploadedFile>,
    ) -> Result<(), UploadRejection> {
        validate_upload(tone, FileRole::Tone, &self.tone)?;
        validate_upload(content, FileRole::Content, &self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DOCX_CONTENT_TYPE;

    fn docx(role: FileRole, size: usize) -> UploadedFile {
        UploadedFile::new(role, vec![1u8; size], Some(DOCX_CONTENT_TYPE.to_string()))
    }

    fn docx_rule() -> AdmissionRule {
        AdmissionRule::new(MIN_UPLOAD_SIZE_BYTES, &[DOCX_CONTENT_TYPE.to_string()])
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = validate_upload(None, FileRole::Tone, &docx_rule()).unwrap_err();
        assert_eq!(err, UploadRejection::MissingOrEmpty { role: FileRole::Tone });
        assert_eq!(err.to_string(), "Tone file is missing or empty.");
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = docx(FileRole::Content, 0);
        let err = validate_upload(Some(&file), FileRole::Content, &docx_rule()).unwrap_err();
        assert!(matches!(err, UploadRejection::MissingOrEmpty { .. }));
    }

    #[test]
    fn test_threshold_is_strict() {
        let below = docx(FileRole::Content, 1023);
        let err = validate_upload(Some(&below), FileRole::Content, &docx_rule()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Content file is too small. Minimum size is 1024 bytes."
        );

        let exact = docx(FileRole::Content, 1024);
        assert!(validate_upload(Some(&exact), FileRole::Content, &docx_rule()).is_ok());
    }

    #[test]
    fn test_content_type_case_insensitive() {
        let file = UploadedFile::new(
            FileRole::Tone,
            vec![1u8; 2000],
            Some(DOCX_CONTENT_TYPE.to_uppercase()),
        );
        assert!(validate_upload(Some(&file), FileRole::Tone, &docx_rule()).is_ok());
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let file = UploadedFile::new(
            FileRole::Tone,
            vec![1u8; 2000],
            Some("application/pdf".to_string()),
        );
        let err = validate_upload(Some(&file), FileRole::Tone, &docx_rule()).unwrap_err();
        match err {
            UploadRejection::UnsupportedType { content_type, .. } => {
                assert_eq!(content_type, "application/pdf")
            }
            other => panic!("unexpected rejection: {:?}", other),
        }
    }

    #[test]
    fn test_empty_allow_list_accepts_any_type() {
        let file = UploadedFile::new(FileRole::Tone, vec![1u8; 2000], None);
        assert!(validate_upload(Some(&file), FileRole::Tone, &AdmissionRule::permissive()).is_ok());
    }

    #[test]
    fn test_revalidation_is_stable() {
        let file = docx(FileRole::Tone, 2000);
        let rule = docx_rule();
        for _ in 0..3 {
            assert!(validate_upload(Some(&file), FileRole::Tone, &rule).is_ok());
        }
    }

    #[test]
    fn test_policy_checks_tone_first() {
        let policy = AdmissionPolicy::uniform(docx_rule());
        let err = policy.admit(None, None).unwrap_err();
        assert_eq!(err.role(), FileRole::Tone);

        let tone = docx(FileRole::Tone, 2000);
        let content = docx(FileRole::Content, 500);
        let err = policy.admit(Some(&tone), Some(&content)).unwrap_err();
        assert_eq!(err.role(), FileRole::Content);
        assert!(matches!(err, UploadRejection::TooSmall { size: 500, .. }));
    }

    #[test]
    fn test_policy_from_default_config_is_docx_only() {
        let policy = AdmissionPolicy::from_config(&Config::default());
        assert_eq!(policy.rule_for(FileRole::Content), &docx_rule());
    }
}
