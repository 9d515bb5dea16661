//! KRX 종목 검색 백엔드 서비스
//!
//! 상장 종목 검색/필터링과 검색 기록 관리 RESTful API 제공
//! 데이터 출처: KRX 정보데이터시스템, 네이버 금융, 로컬 CSV

mod config; // 설정 로드
mod handlers; // HTTP 요청 핸들러
mod middleware; // 미들웨어
mod models; // 데이터 모델 정의
mod services; // 비즈니스 로직 서비스

use std::sync::Mutex;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::history_service::HistoryStore;
use crate::services::listing::ListingService;

/// 애플리케이션 진입점
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load();

    env_logger::init_from_env(Env::default().default_filter_or(&config.log.level));

    log::info!("KRX 종목 검색 백엔드 시작");

    let listing_service = match ListingService::new(&config) {
        Ok(service) => web::Data::new(service),
        Err(e) => {
            log::error!("데이터 서비스 초기화 실패: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                e.to_string(),
            ));
        }
    };

    // 검색 기록은 프로세스 시작 시 한 번만 로드한다
    let history_store = web::Data::new(Mutex::new(HistoryStore::open(&config.data.history_file)));

    let api_key = config.api.api_key.clone();
    if api_key.is_empty() {
        log::warn!("API Key가 설정되지 않아 인증 없이 동작합니다");
    }

    let bind_addr = config.bind_addr();
    let workers = config.server.workers;
    log::info!("서버 시작: {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default()) // 요청 로그 미들웨어
            .wrap(ApiKeyMiddleware::new(api_key.clone())) // API Key 인증
            .app_data(listing_service.clone())
            .app_data(history_store.clone())
            .configure(handlers::config) // 라우팅 설정
    })
    .bind(&bind_addr)?;

    if workers > 0 {
        server = server.workers(workers);
    }

    server.run().await
}
