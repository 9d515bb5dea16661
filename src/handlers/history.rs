use std::sync::Mutex;

use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;

use crate::models::{ApiResponse, HistoryEntry};
use crate::services::history_service::HistoryStore;

/// 기본 표시 건수
const DEFAULT_DISPLAY_LIMIT: usize = 10;

/// 기록 조회 파라미터
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// 최근 n건만 (기본 10)
    pub limit: Option<usize>,
}

/// 최근 검색 기록 조회 (최신순)
pub async fn list_history(
    query: web::Query<HistoryQuery>,
    history: web::Data<Mutex<HistoryStore>>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_DISPLAY_LIMIT);

    match history.lock() {
        Ok(store) => {
            let entries = store.recent(limit).to_vec();
            Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
        }
        Err(e) => {
            let response = ApiResponse::<Vec<HistoryEntry>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

/// 기록 한 건 삭제
///
/// 범위 밖 인덱스는 변경 없이 현재 목록을 돌려준다
pub async fn remove_history(
    path: web::Path<usize>,
    history: web::Data<Mutex<HistoryStore>>,
) -> Result<HttpResponse> {
    let index = path.into_inner();

    match history.lock() {
        Ok(mut store) => match store.remove(index) {
            Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(entries.to_vec()))),
            Err(e) => {
                let response = ApiResponse::<Vec<HistoryEntry>>::error(e.to_string());
                Ok(HttpResponse::InternalServerError().json(response))
            }
        },
        Err(e) => {
            let response = ApiResponse::<Vec<HistoryEntry>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

/// 기록 전체 비우기
pub async fn clear_history(history: web::Data<Mutex<HistoryStore>>) -> Result<HttpResponse> {
    match history.lock() {
        Ok(mut store) => match store.clear() {
            Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success(Vec::<HistoryEntry>::new()))),
            Err(e) => {
                let response = ApiResponse::<Vec<HistoryEntry>>::error(e.to_string());
                Ok(HttpResponse::InternalServerError().json(response))
            }
        },
        Err(e) => {
            let response = ApiResponse::<Vec<HistoryEntry>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/history")
            .route("", web::get().to(list_history))
            .route("", web::delete().to(clear_history))
            .route("/{index}", web::delete().to(remove_history)),
    );
}
