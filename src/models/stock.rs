//! 주식 데이터 모델
//!
//! KRX 상장 종목과 검색 조건 관련 데이터 구조 정의

use serde::{Deserialize, Serialize};

/// 시가총액 환산 단위 (1억 원)
pub const EOK: f64 = 100_000_000.0;

/// 필터 중립값 ("제한 없음")
pub const FILTER_ALL: &str = "전체";
/// 최소 시가총액 기본값 (억 원)
pub const DEFAULT_MIN_CAP: f64 = 1000.0;
/// 최대 시가총액 기본값 (억 원)
pub const DEFAULT_MAX_CAP: f64 = 5_000_000.0;
/// 소속부 정보가 없을 때의 기본값
pub const DEFAULT_DEPT: &str = "기타";

/// 시장 구분
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Market {
    /// 유가증권시장
    Kospi,
    /// 코스닥
    Kosdaq,
    /// 코스닥 글로벌 세그먼트
    KosdaqGlobal,
    /// 코넥스
    Konex,
    /// 그 외 시장 (원문 그대로 보존)
    Etc(String),
}

impl Market {
    pub fn as_str(&self) -> &str {
        match self {
            Market::Kospi => "KOSPI",
            Market::Kosdaq => "KOSDAQ",
            Market::KosdaqGlobal => "KOSDAQ GLOBAL",
            Market::Konex => "KONEX",
            Market::Etc(name) => name,
        }
    }
}

impl From<String> for Market {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "KOSPI" | "STK" => Market::Kospi,
            "KOSDAQ" | "KSQ" => Market::Kosdaq,
            "KOSDAQ GLOBAL" => Market::KosdaqGlobal,
            "KONEX" | "KNX" => Market::Konex,
            _ => Market::Etc(value),
        }
    }
}

impl From<Market> for String {
    fn from(value: Market) -> Self {
        value.as_str().to_string()
    }
}

/// 상장 종목 레코드
///
/// 종목코드는 항상 6자리 0 채움 문자열로 다룬다 (숫자 변환 금지)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecord {
    /// 종목코드 (6자리)
    pub code: String,
    /// 종목명
    pub name: String,
    /// 시장 구분
    pub market: Market,
    /// 소속부 (없으면 "기타")
    pub dept: String,
    /// 종가 (원)
    pub close: f64,
    /// 시가총액 (원)
    pub marcap: f64,
    /// 상장주식수
    pub stocks: f64,
}

impl StockRecord {
    /// 시가총액 (억 원)
    pub fn marcap_eok(&self) -> f64 {
        self.marcap / EOK
    }
}

/// 종목 검색 조건
///
/// min_cap / max_cap 단위는 억 원
#[derive(Debug, Clone, Deserialize)]
pub struct StockQuery {
    /// 종목명 키워드 (부분 일치, 대소문자 무시)
    #[serde(default)]
    pub keyword: String,
    /// 시장 필터 ("전체"면 제한 없음)
    #[serde(default = "default_filter_all")]
    pub market: String,
    /// 소속부 필터 ("전체"면 제한 없음)
    #[serde(default = "default_filter_all")]
    pub dept: String,
    /// 최소 시가총액 (억)
    #[serde(default = "default_min_cap")]
    pub min_cap: f64,
    /// 최대 시가총액 (억)
    #[serde(default = "default_max_cap")]
    pub max_cap: f64,
}

fn default_filter_all() -> String {
    FILTER_ALL.to_string()
}
fn default_min_cap() -> f64 {
    DEFAULT_MIN_CAP
}
fn default_max_cap() -> f64 {
    DEFAULT_MAX_CAP
}

impl StockQuery {
    /// 시장 필터 (전체/ALL이면 None)
    pub fn market_filter(&self) -> Option<Market> {
        if Self::is_all(&self.market) {
            None
        } else {
            Some(Market::from(self.market.clone()))
        }
    }

    /// 소속부 필터 (전체/ALL이면 None)
    pub fn dept_filter(&self) -> Option<&str> {
        if Self::is_all(&self.dept) {
            None
        } else {
            Some(self.dept.as_str())
        }
    }

    /// 모든 필터가 중립값인지 판정
    ///
    /// 키워드 없음 + 시장/소속부 전체 + 최소 시가총액이 기본값이면 중립.
    /// 최대 시가총액은 판정에 들어가지 않는다.
    pub fn is_neutral(&self) -> bool {
        self.keyword.is_empty()
            && self.market_filter().is_none()
            && self.dept_filter().is_none()
            && self.min_cap == DEFAULT_MIN_CAP
    }

    fn is_all(value: &str) -> bool {
        value.is_empty() || value == FILTER_ALL || value.eq_ignore_ascii_case("ALL")
    }
}

impl Default for StockQuery {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            market: default_filter_all(),
            dept: default_filter_all(),
            min_cap: DEFAULT_MIN_CAP,
            max_cap: DEFAULT_MAX_CAP,
        }
    }
}

/// 검색 결과 한 건 (파생 컬럼과 외부 링크 포함)
#[derive(Debug, Serialize)]
pub struct SearchItem {
    pub code: String,
    pub name: String,
    pub market: Market,
    pub dept: String,
    /// 현재가 (원)
    pub close: f64,
    /// 시가총액 (원)
    pub marcap: f64,
    /// 시가총액 (억 원)
    pub marcap_eok: f64,
    pub stocks: f64,
    /// 네이버 시세
    pub naver_url: String,
    /// FnGuide 재무
    pub fnguide_url: String,
    /// DART 공시
    pub dart_url: String,
    /// 증권사 리포트
    pub report_url: String,
}

/// 종목 검색 응답
#[derive(Debug, Serialize)]
pub struct SearchResult {
    /// 필터가 모두 중립값이면 false (검색 미실행)
    pub executed: bool,
    pub total: usize,
    pub message: String,
    pub items: Vec<SearchItem>,
}

/// 종목 입체 분석 링크
#[derive(Debug, Serialize)]
pub struct AnalysisLinks {
    pub code: String,
    pub name: String,
    /// 트레이딩뷰 차트
    pub tradingview_url: String,
    /// 구글 관심도 추이
    pub google_trends_url: String,
    /// 삼프로TV 해설
    pub sampro_tv_url: String,
    /// 구글 뉴스 심층
    pub google_news_url: String,
}
