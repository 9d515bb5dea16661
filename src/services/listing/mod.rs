//! 상장 종목 데이터 수집 서비스
//!
//! KRX 정보데이터시스템 → 네이버 금융 → 로컬 CSV 순으로 시도하고,
//! 성공한 결과를 TTL 동안 메모리에 캐싱한다. 캐시 창 안의 검색은
//! 같은 테이블을 재사용한다.

pub mod common;
mod file;
mod krx;
mod naver;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use reqwest::Client;
use tokio::sync::RwLock;

use crate::config::{AppConfig, DataConfig};
use crate::models::StockRecord;

struct CacheSlot {
    loaded_at: Instant,
    records: Arc<Vec<StockRecord>>,
}

/// 상장 종목 서비스
///
/// 실패한 조회는 캐싱하지 않는다
pub struct ListingService {
    client: Client,
    data: DataConfig,
    ttl: Duration,
    cache: RwLock<Option<CacheSlot>>,
}

impl ListingService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            ttl: Duration::from_secs(config.data.cache_ttl_secs),
            data: config.data.clone(),
            cache: RwLock::new(None),
        })
    }

    /// 종목 테이블 조회 (캐시 우선)
    pub async fn get_listing(&self) -> Result<Arc<Vec<StockRecord>>> {
        if let Some(records) = self.cached().await {
            return Ok(records);
        }

        let mut slot = self.cache.write().await;
        // 쓰기 잠금을 기다리는 동안 다른 작업이 갱신했을 수 있다
        if let Some(ref cached) = *slot {
            if cached.loaded_at.elapsed() < self.ttl {
                return Ok(cached.records.clone());
            }
        }

        let records = Arc::new(self.load_from_source().await?);
        *slot = Some(CacheSlot {
            loaded_at: Instant::now(),
            records: records.clone(),
        });
        Ok(records)
    }

    /// 코드로 종목 찾기
    pub async fn find_by_code(&self, code: &str) -> Result<Option<StockRecord>> {
        let records = self.get_listing().await?;
        let code = common::normalize_code(code);
        Ok(records.iter().find(|r| r.code == code).cloned())
    }

    async fn cached(&self) -> Option<Arc<Vec<StockRecord>>> {
        let slot = self.cache.read().await;
        slot.as_ref()
            .filter(|cached| cached.loaded_at.elapsed() < self.ttl)
            .map(|cached| cached.records.clone())
    }

    /// 설정된 소스에서 목록을 읽는다
    ///
    /// auto 모드는 KRX, 네이버 금융, 로컬 파일 순서로 시도한다
    async fn load_from_source(&self) -> Result<Vec<StockRecord>> {
        match self.data.source.as_str() {
            "krx" => krx::fetch_listing(&self.client).await,
            "naver" => naver::fetch_listing(&self.client).await,
            "file" => file::load_listing(&self.data.listing_file),
            _ => {
                match krx::fetch_listing(&self.client).await {
                    Ok(records) => return Ok(records),
                    Err(e) => log::warn!("KRX 조회 실패, 네이버 금융으로 전환: {}", e),
                }
                match naver::fetch_listing(&self.client).await {
                    Ok(records) => return Ok(records),
                    Err(e) => log::warn!("네이버 금융 조회 실패, 로컬 파일로 전환: {}", e),
                }
                file::load_listing(&self.data.listing_file)
                    .map_err(|e| anyhow!("모든 데이터 소스 조회 실패: {}", e))
            }
        }
    }
}
