use std::sync::Mutex;

use actix_web::{web, HttpResponse, Result};

use crate::models::{AnalysisLinks, ApiResponse, SearchResult, StockQuery};
use crate::services::history_service::HistoryStore;
use crate::services::listing::ListingService;
use crate::services::{links, search_service};

/// 종목 검색
///
/// 필터가 모두 중립값이면 검색을 실행하지 않고 빈 결과를 돌려준다.
/// 키워드가 있는 검색은 검색 기록에 남긴다.
pub async fn search_stocks(
    query: web::Query<StockQuery>,
    listing: web::Data<ListingService>,
    history: web::Data<Mutex<HistoryStore>>,
) -> Result<HttpResponse> {
    let query = query.into_inner();

    if query.is_neutral() {
        let result = SearchResult {
            executed: false,
            total: 0,
            message: "검색 조건을 입력하세요".to_string(),
            items: Vec::new(),
        };
        return Ok(HttpResponse::Ok().json(ApiResponse::success(result)));
    }

    let records = match listing.get_listing().await {
        Ok(records) => records,
        Err(e) => {
            log::error!("시장 데이터 로딩 실패: {}", e);
            let response = ApiResponse::<SearchResult>::error(
                "데이터를 불러오지 못했습니다. 잠시 후 다시 시도해주세요.".to_string(),
            );
            return Ok(HttpResponse::ServiceUnavailable().json(response));
        }
    };

    // 기록 실패가 검색을 막지는 않는다
    if !query.keyword.is_empty() {
        match history.lock() {
            Ok(mut store) => {
                if let Err(e) = store.record(&query.keyword) {
                    log::warn!("검색 기록 저장 실패: {}", e);
                }
            }
            Err(e) => log::warn!("검색 기록 잠금 실패: {}", e),
        }
    }

    let matched = search_service::evaluate(&records, &query);
    let total = matched.len();
    let message = if total == 0 {
        "조건에 맞는 종목이 없습니다".to_string()
    } else {
        format!("검색 결과: {}개", total)
    };
    let items = matched.iter().map(search_service::to_search_item).collect();

    let result = SearchResult {
        executed: true,
        total,
        message,
        items,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

/// 종목 입체 분석 링크
///
/// 네이버/FnGuide 밖의 다른 시각 데이터 소스 링크 묶음
pub async fn stock_analysis(
    path: web::Path<String>,
    listing: web::Data<ListingService>,
) -> Result<HttpResponse> {
    let code = path.into_inner();

    match listing.find_by_code(&code).await {
        Ok(Some(record)) => {
            let analysis = AnalysisLinks {
                tradingview_url: links::tradingview_chart(&record.code),
                google_trends_url: links::google_trends(&record.name),
                sampro_tv_url: links::sampro_tv(&record.name),
                google_news_url: links::google_news(&record.name),
                code: record.code,
                name: record.name,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(analysis)))
        }
        Ok(None) => {
            let response =
                ApiResponse::<AnalysisLinks>::error(format!("종목을 찾을 수 없습니다: {}", code));
            Ok(HttpResponse::NotFound().json(response))
        }
        Err(e) => {
            log::error!("시장 데이터 로딩 실패: {}", e);
            let response = ApiResponse::<AnalysisLinks>::error(
                "데이터를 불러오지 못했습니다. 잠시 후 다시 시도해주세요.".to_string(),
            );
            Ok(HttpResponse::ServiceUnavailable().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stocks")
            .route("/search", web::get().to(search_stocks))
            .route("/{code}/analysis", web::get().to(stock_analysis)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use tempfile::TempDir;

    use crate::config::AppConfig;

    /// 로컬 CSV를 소스로 쓰는 테스트 환경 구성
    fn file_backed_config(dir: &TempDir) -> AppConfig {
        let listing_path = dir.path().join("krx_list.csv");
        std::fs::write(
            &listing_path,
            "Code,Name,Market,Close,Marcap,Stocks\n\
             005930,삼성전자,KOSPI,70000,417923663300000,5969782550\n\
             035720,카카오,KOSPI,45000,20000000000000,445000000\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.data.source = "file".to_string();
        config.data.listing_file = listing_path.to_string_lossy().into_owned();
        config
    }

    fn history_data(dir: &TempDir) -> web::Data<Mutex<HistoryStore>> {
        web::Data::new(Mutex::new(HistoryStore::open(
            dir.path().join("search_history.csv"),
        )))
    }

    #[actix_web::test]
    async fn neutral_search_is_not_executed() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_backed_config(&dir);
        let listing = web::Data::new(ListingService::new(&config).unwrap());
        let history = history_data(&dir);

        let app = test::init_service(
            App::new()
                .app_data(listing)
                .app_data(history.clone())
                .configure(crate::handlers::config),
        )
        .await;

        // 조건 없는 요청과 최대값만 바꾼 요청 모두 실행되지 않는다
        for uri in ["/api/v1/stocks/search", "/api/v1/stocks/search?max_cap=9999"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

            assert_eq!(body["success"], true);
            assert_eq!(body["data"]["executed"], false);
            assert_eq!(body["data"]["total"], 0);
        }

        // 실행되지 않은 검색은 기록에도 남지 않는다
        assert!(history.lock().unwrap().entries().is_empty());
    }

    #[actix_web::test]
    async fn keyword_search_filters_and_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_backed_config(&dir);
        let listing = web::Data::new(ListingService::new(&config).unwrap());
        let history = history_data(&dir);

        let app = test::init_service(
            App::new()
                .app_data(listing)
                .app_data(history.clone())
                .configure(crate::handlers::config),
        )
        .await;

        // keyword=삼성
        let req = test::TestRequest::get()
            .uri("/api/v1/stocks/search?keyword=%EC%82%BC%EC%84%B1")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["executed"], true);
        assert_eq!(body["data"]["total"], 1);
        let item = &body["data"]["items"][0];
        assert_eq!(item["code"], "005930");
        assert_eq!(item["marcap_eok"], 4_179_236.633);
        assert!(item["naver_url"].as_str().unwrap().contains("code=005930"));

        assert_eq!(history.lock().unwrap().entries()[0].keyword, "삼성");
    }

    #[actix_web::test]
    async fn zero_match_search_is_informational() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_backed_config(&dir);
        let listing = web::Data::new(ListingService::new(&config).unwrap());
        let history = history_data(&dir);

        let app = test::init_service(
            App::new()
                .app_data(listing)
                .app_data(history)
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/stocks/search?keyword=%EC%97%86%EB%8A%94%EC%A2%85%EB%AA%A9")
            .to_request();
        let response = test::call_service(&app, req).await;
        assert!(response.status().is_success());

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["data"]["executed"], true);
        assert_eq!(body["data"]["total"], 0);
        assert_eq!(body["data"]["message"], "조건에 맞는 종목이 없습니다");
    }

    #[actix_web::test]
    async fn analysis_links_for_known_and_unknown_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_backed_config(&dir);
        let listing = web::Data::new(ListingService::new(&config).unwrap());
        let history = history_data(&dir);

        let app = test::init_service(
            App::new()
                .app_data(listing)
                .app_data(history)
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/stocks/005930/analysis")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["name"], "삼성전자");
        assert!(body["data"]["tradingview_url"]
            .as_str()
            .unwrap()
            .contains("KRX:005930"));

        let req = test::TestRequest::get()
            .uri("/api/v1/stocks/999999/analysis")
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
