//! 공통 상수와 보조 함수

use chrono::{Datelike, Duration, Utc, Weekday};
use chrono_tz::Asia::Seoul;
use regex::Regex;

/// 요청 User-Agent
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// 쉼표 구분 숫자 문자열을 f64로 변환
///
/// "70,000" → 70000.0, 파싱 불가 값은 0
pub fn clean_numeric(value: &str) -> f64 {
    let re = Regex::new(r"[,\s]").unwrap();
    re.replace_all(value.trim(), "")
        .parse::<f64>()
        .unwrap_or(0.0)
}

/// 종목코드를 6자리 0 채움 문자열로 정규화
///
/// 숫자로 읽혀 앞자리 0이 떨어진 코드를 복원한다 ("5930" → "005930")
pub fn normalize_code(code: &str) -> String {
    let code = code.trim();
    if code.len() >= 6 {
        code.to_string()
    } else {
        format!("{:0>6}", code)
    }
}

/// 최근 평일 거래일 (YYYYMMDD, KST)
///
/// 주말이면 금요일로 내린다. 공휴일은 구분하지 못하므로 빈 응답은
/// 호출 측에서 데이터 없음으로 처리한다.
pub fn recent_trading_day() -> String {
    let mut day = Utc::now().with_timezone(&Seoul).date_naive();
    loop {
        match day.weekday() {
            Weekday::Sat | Weekday::Sun => day -= Duration::days(1),
            _ => break,
        }
    }
    day.format("%Y%m%d").to_string()
}
