//! 네이버 금융 시가총액 페이지 수집 (보조 데이터 소스)
//!
//! KRX 응답이 없을 때 코스피/코스닥 시가총액 표를 페이지 단위로
//! 긁어온다. 응답은 EUC-KR 인코딩이다.
//! 대상: https://finance.naver.com/sise/sise_market_sum.naver

use anyhow::{anyhow, Result};
use reqwest::Client;
use scraper::{Html, Selector};

use super::common::{clean_numeric, normalize_code, USER_AGENT};
use crate::models::{Market, StockRecord, DEFAULT_DEPT, EOK};

/// 시가총액 목록 페이지
const NAVER_MARKET_SUM_URL: &str = "https://finance.naver.com/sise/sise_market_sum.naver";
/// sosok 파라미터와 시장 이름
const NAVER_MARKETS: [(&str, &str); 2] = [("0", "KOSPI"), ("1", "KOSDAQ")];
/// 시장별 최대 페이지 수 (한 페이지 50종목)
const MAX_PAGES: usize = 50;

/// 코스피 + 코스닥 전 종목 수집
pub async fn fetch_listing(client: &Client) -> Result<Vec<StockRecord>> {
    let mut records = Vec::new();

    for (sosok, market_name) in NAVER_MARKETS {
        log::info!("📡 네이버 금융 시가총액 요청: {} 시장", market_name);
        for page in 1..=MAX_PAGES {
            let page_records = fetch_page(client, sosok, market_name, page).await?;
            // 마지막 페이지 뒤로는 빈 표가 돌아온다
            if page_records.is_empty() {
                break;
            }
            records.extend(page_records);
        }
    }

    if records.is_empty() {
        return Err(anyhow!("네이버 금융 응답에 종목 데이터가 없습니다"));
    }
    log::info!("네이버 금융 시가총액 수신: {}건", records.len());
    Ok(records)
}

async fn fetch_page(
    client: &Client,
    sosok: &str,
    market_name: &str,
    page: usize,
) -> Result<Vec<StockRecord>> {
    let response = client
        .get(NAVER_MARKET_SUM_URL)
        .query(&[("sosok", sosok), ("page", &page.to_string())])
        .header("Referer", "https://finance.naver.com/sise/")
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "네이버 금융 시가총액 조회 실패: {}",
            response.status()
        ));
    }

    // EUC-KR 응답 디코딩
    let bytes = response.bytes().await?;
    let text = encoding_rs::EUC_KR.decode(&bytes).0.to_string();

    Ok(parse_market_sum_page(&text, market_name))
}

/// 시가총액 표 한 페이지 파싱
///
/// 표 컬럼: 순위, 종목명, 현재가, 전일비, 등락률, 액면가,
/// 시가총액(억), 상장주식수(천주), ...
/// 종목코드는 종목명 링크의 code 파라미터에서 꺼낸다.
fn parse_market_sum_page(html: &str, market_name: &str) -> Vec<StockRecord> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table.type_2").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();
    let link_selector = Selector::parse("a.tltle").unwrap();

    let mut records = Vec::new();

    let table = match document.select(&table_selector).next() {
        Some(table) => table,
        None => return records,
    };

    for row in table.select(&tr_selector) {
        let link = match row.select(&link_selector).next() {
            Some(link) => link,
            None => continue, // 구분선/머리글 행
        };
        let name = link.text().collect::<String>().trim().to_string();
        let code = extract_code_param(link.value().attr("href").unwrap_or(""));
        if name.is_empty() || code.is_empty() {
            continue;
        }

        let cells: Vec<String> = row
            .select(&td_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < 8 {
            continue;
        }

        records.push(StockRecord {
            code: normalize_code(&code),
            name,
            market: Market::from(market_name.to_string()),
            dept: DEFAULT_DEPT.to_string(),
            close: clean_numeric(&cells[2]),
            // 표 단위: 시가총액은 억 원, 상장주식수는 천 주
            marcap: clean_numeric(&cells[6]) * EOK,
            stocks: clean_numeric(&cells[7]) * 1000.0,
        });
    }

    records
}

/// href의 code 파라미터 값 추출
fn extract_code_param(href: &str) -> String {
    href.split("code=")
        .nth(1)
        .map(|tail| {
            tail.chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect()
        })
        .unwrap_or_default()
}
