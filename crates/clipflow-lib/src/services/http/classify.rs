// Response classification decision table
// Feature: Unified HTTP Client (001-http-client)

/// Classification of a completed transport call. The dispatcher applies the
/// side effects (session clearing, login prompt, notifications); this table
/// only decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Transport status and application code both indicate success
    Success,
    /// 401 at either layer: the session must be cleared regardless of
    /// whether the caller suppressed the login prompt
    AuthFailure,
    /// Any other non-success status or envelope code
    ApplicationFailure { code: i64, message: String },
}

/// Success range shared by transport statuses and application codes
pub fn is_http_status_ok(code: i64) -> bool {
    (200..300).contains(&code)
}

/// Evaluate the decision table for a settled response.
///
/// `code` is the application-level envelope code; `0` is the backend's
/// "no code" success sentinel and never fails a call on its own.
pub fn classify(status: u16, code: i64, message: &str) -> Disposition {
    let status = status as i64;

    if status == 401 || code == 401 {
        return Disposition::AuthFailure;
    }

    if !is_http_status_ok(status) || (code != 0 && !is_http_status_ok(code)) {
        let failing_code = if code != 0 { code } else { status };
        let message = if message.is_empty() {
            "Request failed".to_string()
        } else {
            message.to_string()
        };
        return Disposition::ApplicationFailure {
            code: failing_code,
            message,
        };
    }

    Disposition::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(is_http_status_ok(200));
        assert!(is_http_status_ok(204));
        assert!(is_http_status_ok(299));
        assert!(!is_http_status_ok(300));
        assert!(!is_http_status_ok(0));
        assert!(!is_http_status_ok(503));
    }

    #[test]
    fn test_transport_401_is_auth_failure() {
        assert_eq!(classify(401, 0, ""), Disposition::AuthFailure);
    }

    #[test]
    fn test_application_401_is_auth_failure_even_on_2xx_transport() {
        assert_eq!(classify(200, 401, "expired"), Disposition::AuthFailure);
    }

    #[test]
    fn test_auth_check_precedes_generic_failure() {
        // 401 on both layers must not fall through to ApplicationFailure
        assert_eq!(classify(401, 401, "expired"), Disposition::AuthFailure);
    }

    #[test]
    fn test_non_2xx_transport_fails_with_status() {
        assert_eq!(
            classify(500, 0, "boom"),
            Disposition::ApplicationFailure {
                code: 500,
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_envelope_code_wins_over_transport_status() {
        assert_eq!(
            classify(200, 503, "busy"),
            Disposition::ApplicationFailure {
                code: 503,
                message: "busy".to_string()
            }
        );
    }

    #[test]
    fn test_zero_code_is_success_sentinel() {
        assert_eq!(classify(200, 0, ""), Disposition::Success);
    }

    #[test]
    fn test_2xx_application_code_is_success() {
        assert_eq!(classify(200, 200, "ok"), Disposition::Success);
        assert_eq!(classify(204, 201, ""), Disposition::Success);
    }

    #[test]
    fn test_empty_message_gets_fallback() {
        match classify(500, 0, "") {
            Disposition::ApplicationFailure { message, .. } => {
                assert_eq!(message, "Request failed");
            }
            other => panic!("unexpected disposition: {other:?}"),
        }
    }

    /// The table is total: every (status, code) pair maps to exactly one row.
    #[test]
    fn test_table_is_total_over_representative_grid() {
        let statuses = [200u16, 204, 299, 300, 400, 401, 403, 500, 503];
        let codes = [0i64, 200, 299, 300, 400, 401, 404, 503, -1];
        for status in statuses {
            for code in codes {
                // Must not panic, and every outcome is one of the three rows
                let disposition = classify(status, code, "msg");
                match disposition {
                    Disposition::Success
                    | Disposition::AuthFailure
                    | Disposition::ApplicationFailure { .. } => {}
                }
            }
        }
    }
}
