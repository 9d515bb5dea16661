//! 공통 API 응답 모델
//!
//! 모든 엔드포인트가 쓰는 통일된 응답 형식 정의

use chrono::Utc;
use chrono_tz::Asia::Seoul;
use serde::{Deserialize, Serialize};

/// 한국 시간 (UTC+9)
fn get_seoul_time() -> chrono::DateTime<chrono_tz::Tz> {
    Utc::now().with_timezone(&Seoul)
}

/// 통일 API 응답 구조
///
/// 모든 엔드포인트가 같은 형식으로 반환한다:
/// - success: 요청 성공 여부
/// - data: 응답 데이터 (성공 시)
/// - message: 응답 메시지
/// - timestamp: 응답 시각 (한국 시간)
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 요청 성공 여부
    pub success: bool,
    /// 응답 데이터
    pub data: Option<T>,
    /// 응답 메시지
    pub message: String,
    /// 응답 시각 (ISO 8601 형식)
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 성공 응답 생성
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: get_seoul_time().to_rfc3339(),
        }
    }

    /// 오류 응답 생성
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            timestamp: get_seoul_time().to_rfc3339(),
        }
    }
}
