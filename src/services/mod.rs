//! 비즈니스 로직 서비스 모듈
//!
//! 데이터 수집과 검색/기록 처리 로직 캡슐화

pub mod history_service; // 검색 기록 서비스
pub mod links; // 외부 사이트 링크 생성
pub mod listing; // 상장 종목 데이터 수집
pub mod search_service; // 종목 검색 서비스
