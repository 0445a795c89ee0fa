use crate::error::ValidationError;
use crate::models::UploadRequest;

use super::RequiredField;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check the pre-flight requirements of an upload.
///
/// Every unmet field is reported, not just the first one.
/// `require_pictures` enforces at least one auxiliary image.
pub fn validate_upload_request(
    request: &UploadRequest,
    require_pictures: bool,
) -> Result<(), ValidationError> {
    let mut missing = Vec::new();

    if is_blank(&request.log_line) {
        missing.push(RequiredField::LogLine);
    }
    if is_blank(&request.production_year) {
        missing.push(RequiredField::ProductionYear);
    }
    if is_blank(&request.star1) {
        missing.push(RequiredField::Star1);
    }
    if request.primary_file.is_none() {
        missing.push(RequiredField::PrimaryFile);
    }
    if require_pictures && request.auxiliary_files.is_empty() {
        missing.push(RequiredField::AuxiliaryFiles);
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaFile;

    fn valid_request() -> UploadRequest {
        UploadRequest {
            log_line: "A spy film".to_string(),
            production_year: "2023".to_string(),
            star1: "Jane Doe".to_string(),
            primary_file: Some(MediaFile::new("video.mp4", vec![0u8; 8])),
            auxiliary_files: vec![MediaFile::new("poster.jpg", vec![0u8; 4])],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_upload_request(&valid_request(), true).is_ok());
    }

    #[test]
    fn test_empty_log_line_is_reported() {
        let request = UploadRequest {
            log_line: String::new(),
            ..valid_request()
        };
        let err = validate_upload_request(&request, true).unwrap_err();
        assert_eq!(err.fields, vec![RequiredField::LogLine]);
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let request = UploadRequest {
            star1: "   ".to_string(),
            ..valid_request()
        };
        let err = validate_upload_request(&request, true).unwrap_err();
        assert_eq!(err.fields, vec![RequiredField::Star1]);
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let err = validate_upload_request(&UploadRequest::default(), true).unwrap_err();
        assert_eq!(
            err.fields,
            vec![
                RequiredField::LogLine,
                RequiredField::ProductionYear,
                RequiredField::Star1,
                RequiredField::PrimaryFile,
                RequiredField::AuxiliaryFiles,
            ]
        );
    }

    #[test]
    fn test_pictures_optional_when_policy_allows() {
        let request = UploadRequest {
            auxiliary_files: Vec::new(),
            ..valid_request()
        };
        assert!(validate_upload_request(&request, false).is_ok());

        let err = validate_upload_request(&request, true).unwrap_err();
        assert_eq!(err.fields, vec![RequiredField::AuxiliaryFiles]);
    }

    #[test]
    fn test_optional_stars_are_not_required() {
        let request = UploadRequest {
            star2: None,
            star3: Some(String::new()),
            ..valid_request()
        };
        assert!(validate_upload_request(&request, true).is_ok());
    }
}
