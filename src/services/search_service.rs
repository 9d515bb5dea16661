//! 종목 검색 서비스
//!
//! 키워드/시장/소속부/시가총액 필터를 모두 만족하는 종목을 걸러
//! 시가총액 내림차순으로 정렬한다

use std::cmp::Ordering;

use crate::models::{SearchItem, StockQuery, StockRecord};
use crate::services::links;

/// 단일 종목이 검색 조건을 모두 만족하는지 검사
///
/// 키워드는 종목명 부분 일치(대소문자 무시), 시장/소속부는 정확 일치,
/// 시가총액은 억 원 단위 [min_cap, max_cap] 구간 포함 검사.
/// 중립값 필터는 항상 통과한다.
pub fn matches(record: &StockRecord, query: &StockQuery) -> bool {
    if !query.keyword.is_empty()
        && !record
            .name
            .to_lowercase()
            .contains(&query.keyword.to_lowercase())
    {
        return false;
    }
    if let Some(market) = query.market_filter() {
        if record.market != market {
            return false;
        }
    }
    if let Some(dept) = query.dept_filter() {
        if record.dept != dept {
            return false;
        }
    }
    let cap_eok = record.marcap_eok();
    cap_eok >= query.min_cap && cap_eok <= query.max_cap
}

/// 조건에 맞는 종목을 시가총액 내림차순으로 반환
///
/// 동일 시가총액은 원본 순서를 유지한다 (안정 정렬)
pub fn evaluate(records: &[StockRecord], query: &StockQuery) -> Vec<StockRecord> {
    let mut result: Vec<StockRecord> = records
        .iter()
        .filter(|record| matches(record, query))
        .cloned()
        .collect();
    result.sort_by(|a, b| b.marcap.partial_cmp(&a.marcap).unwrap_or(Ordering::Equal));
    result
}

/// 검색 결과 행 구성 (파생 컬럼 + 외부 링크)
pub fn to_search_item(record: &StockRecord) -> SearchItem {
    SearchItem {
        naver_url: links::naver_price(&record.code),
        fnguide_url: links::fnguide(&record.code),
        dart_url: links::dart_filings(&record.code),
        report_url: links::research_reports(&record.code),
        marcap_eok: record.marcap_eok(),
        code: record.code.clone(),
        name: record.name.clone(),
        market: record.market.clone(),
        dept: record.dept.clone(),
        close: record.close,
        marcap: record.marcap,
        stocks: record.stocks,
    }
}
