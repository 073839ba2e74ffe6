use std::fmt;

/// App password 去除空白後的長度
pub const CREDENTIAL_LENGTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialIssue {
    Empty,
    WrongLength { actual: usize },
}

impl fmt::Display for CredentialIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialIssue::Empty => write!(f, "Password cannot be empty"),
            CredentialIssue::WrongLength { actual } => write!(
                f,
                "App Password should be {} characters (got {})",
                CREDENTIAL_LENGTH, actual
            ),
        }
    }
}

/// 驗證結果與可讀的原因說明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialVerdict {
    pub issue: Option<CredentialIssue>,
}

impl CredentialVerdict {
    pub fn is_valid(&self) -> bool {
        self.issue.is_none()
    }

    pub fn reason(&self) -> String {
        match self.issue {
            Some(issue) => issue.to_string(),
            None => "Valid App Password format".to_string(),
        }
    }
}

/// 只檢查格式：非空，且移除空白後剛好 16 個字元。
/// 通過檢查不代表 relay 會接受這組密碼。
pub fn validate_credential(candidate: Option<&str>) -> CredentialVerdict {
    let issue = match candidate {
        None | Some("") => Some(CredentialIssue::Empty),
        Some(secret) => {
            let length = secret.chars().filter(|c| *c != ' ').count();
            (length != CREDENTIAL_LENGTH).then_some(CredentialIssue::WrongLength { actual: length })
        }
    };

    CredentialVerdict { issue }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced_app_password_is_valid() {
        let verdict = validate_credential(Some("abcd efgh ijkl mnop"));
        assert!(verdict.is_valid());
        assert_eq!(verdict.reason(), "Valid App Password format");
    }

    #[test]
    fn test_short_password_reports_length() {
        let verdict = validate_credential(Some("short"));
        assert!(!verdict.is_valid());
        assert_eq!(verdict.issue, Some(CredentialIssue::WrongLength { actual: 5 }));
        assert_eq!(verdict.reason(), "App Password should be 16 characters (got 5)");
    }

    #[test]
    fn test_empty_and_absent_are_invalid() {
        assert_eq!(validate_credential(None).issue, Some(CredentialIssue::Empty));
        assert_eq!(validate_credential(Some("")).issue, Some(CredentialIssue::Empty));
    }

    #[test]
    fn test_only_spaces_count_as_zero_length() {
        let verdict = validate_credential(Some("    "));
        assert_eq!(verdict.issue, Some(CredentialIssue::WrongLength { actual: 0 }));
    }

    #[test]
    fn test_tabs_are_not_stripped() {
        let verdict = validate_credential(Some("abcdefghijklmno\t"));
        assert!(verdict.is_valid());
        let verdict = validate_credential(Some("abcdefghijklmnop\t"));
        assert_eq!(verdict.issue, Some(CredentialIssue::WrongLength { actual: 17 }));
    }

    #[test]
    fn test_validity_matches_stripped_length() {
        for candidate in ["", "a", "abcdefghijklmnop", " abcdefghijklmnop ", "abcdefghijklmnopq", "ünïcödé ünïcödé xy"] {
            let stripped = candidate.replace(' ', "");
            let expected = !candidate.is_empty() && stripped.chars().count() == CREDENTIAL_LENGTH;
            assert_eq!(validate_credential(Some(candidate)).is_valid(), expected, "{:?}", candidate);
        }
    }
}
