//! 설정 모듈
//!
//! JSON 파일에서 시스템 설정을 로드한다

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 바인딩 주소
    #[serde(default = "default_host")]
    pub host: String,
    /// 바인딩 포트
    #[serde(default = "default_port")]
    pub port: u16,
    /// 워커 스레드 수 (0이면 CPU 코어 수)
    #[serde(default)]
    pub workers: usize,
}

/// API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key (비어 있으면 인증 비활성)
    #[serde(default)]
    pub api_key: String,
    /// 외부 요청 타임아웃 (초)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 연결 타임아웃 (초)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 로그 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 로그 레벨: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 데이터 소스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// 종목 데이터 소스: auto, krx, naver, file
    #[serde(default = "default_source")]
    pub source: String,
    /// 로컬 상장 종목 CSV 경로
    #[serde(default = "default_listing_file")]
    pub listing_file: String,
    /// 검색 기록 CSV 경로
    #[serde(default = "default_history_file")]
    pub history_file: String,
    /// 종목 테이블 캐시 유지 시간 (초)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

/// 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// API 설정
    #[serde(default)]
    pub api: ApiConfig,
    /// 로그 설정
    #[serde(default)]
    pub log: LogConfig,
    /// 데이터 소스 설정
    #[serde(default)]
    pub data: DataConfig,
}

// 기본값 함수
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    30
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_source() -> String {
    "auto".to_string()
}
fn default_listing_file() -> String {
    "krx_list.csv".to_string()
}
fn default_history_file() -> String {
    "search_history.csv".to_string()
}
fn default_cache_ttl() -> u64 {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            listing_file: default_listing_file(),
            history_file: default_history_file(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            log: LogConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl AppConfig {
    /// JSON 파일에서 설정 로드
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 설정 로드 (파일 우선, 실패 시 기본값)
    pub fn load() -> Self {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        log::info!("{} 에서 설정 로드 성공", path);
                        return config;
                    }
                    Err(e) => {
                        log::warn!("설정 파일 {} 로드 실패: {}", path, e);
                    }
                }
            }
        }

        log::info!("기본 설정 사용");
        Self::default()
    }

    /// 서버 바인딩 주소
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_falls_back_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.data.source, "auto");
        assert_eq!(config.data.cache_ttl_secs, 3600);
        assert_eq!(config.data.history_file, "search_history.csv");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "data": { "source": "file" } }"#).unwrap();
        assert_eq!(config.data.source, "file");
        assert_eq!(config.data.listing_file, "krx_list.csv");
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }
}
