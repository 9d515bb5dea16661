//! KRX 정보데이터시스템 상장 종목 수집
//!
//! 전종목 일별 시세 화면(MDCSTAT01501)의 JSON API를 받아 종목
//! 레코드로 변환한다. 대상: http://data.krx.co.kr

use anyhow::{anyhow, Result};
use reqwest::Client;

use super::common::{clean_numeric, normalize_code, recent_trading_day, USER_AGENT};
use crate::models::{Market, StockRecord, DEFAULT_DEPT};

/// KRX 통계 JSON API
const KRX_JSON_API: &str = "http://data.krx.co.kr/comm/bldAttendant/getJsonData.cmd";
/// 전종목 시세 화면 ID
const KRX_DAILY_QUOTE_BLD: &str = "dbms/MDC/STAT/standard/MDCSTAT01501";

/// 전 시장 상장 종목 목록 조회
pub async fn fetch_listing(client: &Client) -> Result<Vec<StockRecord>> {
    let trd_dd = recent_trading_day();
    log::info!("📡 KRX 전종목 시세 요청: 기준일 {}", trd_dd);

    let response = client
        .post(KRX_JSON_API)
        .header("Referer", "http://data.krx.co.kr/contents/MDC/MDI/mdiLoader")
        .header("User-Agent", USER_AGENT)
        .form(&[
            ("bld", KRX_DAILY_QUOTE_BLD),
            ("mktId", "ALL"),
            ("trdDd", trd_dd.as_str()),
            ("share", "1"),
            ("money", "1"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("KRX 시세 조회 실패: {}", response.status()));
    }

    let json: serde_json::Value = response.json().await?;
    let records = parse_krx_listing(&json)?;
    log::info!("KRX 전종목 시세 수신: {}건", records.len());
    Ok(records)
}

/// KRX JSON 응답을 종목 레코드로 변환
///
/// 숫자 컬럼은 쉼표 포함 문자열이므로 정리 후 변환한다.
/// 변환 실패 값은 0으로 둔다.
fn parse_krx_listing(json: &serde_json::Value) -> Result<Vec<StockRecord>> {
    let rows = json["OutBlock_1"]
        .as_array()
        .ok_or_else(|| anyhow!("KRX 응답에 OutBlock_1이 없습니다"))?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let raw_code = row["ISU_SRT_CD"].as_str().unwrap_or("").trim();
        if raw_code.is_empty() {
            continue;
        }
        records.push(StockRecord {
            code: normalize_code(raw_code),
            name: row["ISU_ABBRV"].as_str().unwrap_or("").to_string(),
            market: Market::from(row["MKT_NM"].as_str().unwrap_or("").to_string()),
            // 시세 화면에는 소속부 정보가 없다
            dept: DEFAULT_DEPT.to_string(),
            close: clean_numeric(row["TDD_CLSPRC"].as_str().unwrap_or("")),
            marcap: clean_numeric(row["MKTCAP"].as_str().unwrap_or("")),
            stocks: clean_numeric(row["LIST_SHRS"].as_str().unwrap_or("")),
        });
    }

    if records.is_empty() {
        return Err(anyhow!("KRX 응답에 종목 데이터가 없습니다"));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_comma_formatted_fields() {
        let body = json!({
            "OutBlock_1": [
                {
                    "ISU_SRT_CD": "005930",
                    "ISU_ABBRV": "삼성전자",
                    "MKT_NM": "KOSPI",
                    "TDD_CLSPRC": "70,000",
                    "MKTCAP": "417,923,663,300,000",
                    "LIST_SHRS": "5,969,782,550"
                },
                {
                    "ISU_SRT_CD": "035720",
                    "ISU_ABBRV": "카카오",
                    "MKT_NM": "KOSPI",
                    "TDD_CLSPRC": "-",
                    "MKTCAP": "20,000,000,000,000",
                    "LIST_SHRS": "445,000,000"
                }
            ]
        });

        let records = parse_krx_listing(&body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "005930");
        assert_eq!(records[0].market, Market::Kospi);
        assert_eq!(records[0].close, 70_000.0);
        assert_eq!(records[0].dept, "기타");
        // 파싱 불가 종가는 0
        assert_eq!(records[1].close, 0.0);
    }

    #[test]
    fn rejects_response_without_outblock() {
        let body = json!({ "message": "서비스 점검 중" });
        assert!(parse_krx_listing(&body).is_err());
    }

    #[test]
    fn rejects_empty_listing() {
        let body = json!({ "OutBlock_1": [] });
        assert!(parse_krx_listing(&body).is_err());
    }
}
