//! 로컬 상장 종목 CSV 파일 로더
//!
//! `Code,Name,Market,Close,Marcap,Stocks` 컬럼과 선택적 `Dept` 컬럼을
//! 가진 CSV를 읽는다. UTF-8이 아니면 EUC-KR로 다시 디코딩한다.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};

use super::common::{clean_numeric, normalize_code};
use crate::models::{Market, StockRecord, DEFAULT_DEPT};

/// 로컬 CSV 파일에서 종목 목록 로드
pub fn load_listing<P: AsRef<Path>>(path: P) -> Result<Vec<StockRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(anyhow!("상장 종목 파일이 없습니다: {}", path.display()));
    }

    let bytes = fs::read(path)?;
    let text = decode_text(&bytes);
    let records = parse_listing_csv(&text)?;
    log::info!(
        "상장 종목 파일 로드 완료: {}건 ({})",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// UTF-8 우선, 실패 시 EUC-KR
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => encoding_rs::EUC_KR.decode(bytes).0.to_string(),
    }
}

/// CSV 본문을 종목 레코드로 변환
///
/// 헤더 행에서 컬럼 위치를 찾는다. Dept 컬럼이 없으면 전 종목
/// "기타"로 채운다. 숫자 컬럼의 변환 실패 값은 0.
fn parse_listing_csv(text: &str) -> Result<Vec<StockRecord>> {
    let mut lines = text.lines();
    let header = lines.next().ok_or_else(|| anyhow!("빈 파일입니다"))?;
    let columns = split_csv_line(header);
    let position =
        |name: &str| columns.iter().position(|c| c.trim().eq_ignore_ascii_case(name));

    let code_idx = position("Code").ok_or_else(|| anyhow!("Code 컬럼이 없습니다"))?;
    let name_idx = position("Name").ok_or_else(|| anyhow!("Name 컬럼이 없습니다"))?;
    let market_idx = position("Market").ok_or_else(|| anyhow!("Market 컬럼이 없습니다"))?;
    let close_idx = position("Close");
    let marcap_idx = position("Marcap");
    let stocks_idx = position("Stocks");
    let dept_idx = position("Dept"); // 선택 컬럼

    let mut records = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(line);
        let field = |idx: Option<usize>| {
            idx.and_then(|i| fields.get(i))
                .map(|v| v.trim())
                .unwrap_or("")
        };

        let raw_code = field(Some(code_idx));
        if raw_code.is_empty() {
            continue;
        }

        let dept = field(dept_idx);
        records.push(StockRecord {
            code: normalize_code(raw_code),
            name: field(Some(name_idx)).to_string(),
            market: Market::from(field(Some(market_idx)).to_string()),
            dept: if dept.is_empty() {
                DEFAULT_DEPT.to_string()
            } else {
                dept.to_string()
            },
            close: clean_numeric(field(close_idx)),
            marcap: clean_numeric(field(marcap_idx)),
            stocks: clean_numeric(field(stocks_idx)),
        });
    }

    if records.is_empty() {
        return Err(anyhow!("종목 데이터가 없습니다"));
    }
    Ok(records)
}

/// 따옴표를 존중하는 CSV 한 줄 분리
fn split_csv_line(line: &str) -> Vec<String> {
    let line = line.trim_end_matches('\r');
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                // 연속된 따옴표는 이스케이프
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_with_dept_column() {
        let text = "Code,Name,Market,Close,Marcap,Stocks,Dept\n\
                    005930,삼성전자,KOSPI,\"70,000\",\"417,923,663,300,000\",\"5,969,782,550\",\n\
                    247540,에코프로비엠,KOSDAQ,250000,24000000000000,97801344,우량기업부\n";

        let records = parse_listing_csv(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "005930");
        assert_eq!(records[0].close, 70_000.0);
        // Dept 값이 빈 행은 기본값
        assert_eq!(records[0].dept, "기타");
        assert_eq!(records[1].dept, "우량기업부");
        assert_eq!(records[1].market, Market::Kosdaq);
    }

    #[test]
    fn parses_csv_without_dept_column() {
        let text = "Code,Name,Market,Close,Marcap,Stocks\n\
                    5930,삼성전자,KOSPI,70000,417923663300000,5969782550\n";

        let records = parse_listing_csv(text).unwrap();
        // 코드 0 채움
        assert_eq!(records[0].code, "005930");
        assert_eq!(records[0].dept, "기타");
    }

    #[test]
    fn quoted_name_with_comma() {
        let text = "Code,Name,Market,Close,Marcap,Stocks\n\
                    000001,\"가나다, 주식회사\",KOSPI,1000,1000000000,1000000\n";

        let records = parse_listing_csv(text).unwrap();
        assert_eq!(records[0].name, "가나다, 주식회사");
    }

    #[test]
    fn missing_required_column_is_error() {
        let text = "Name,Market\n삼성전자,KOSPI\n";
        assert!(parse_listing_csv(text).is_err());
    }

    #[test]
    fn euc_kr_bytes_are_decoded() {
        let (encoded, _, _) = encoding_rs::EUC_KR.encode("삼성전자");
        let decoded = decode_text(&encoded);
        assert_eq!(decoded, "삼성전자");
    }
}
