//! 검색 기록 서비스
//!
//! 검색 키워드를 `"[HH:MM] 키워드"` 로그 문자열로 기록하고 단일 컬럼
//! CSV 파일에 영속화한다. 같은 키워드를 다시 검색하면 기존 항목을
//! 지우고 맨 앞에 새 항목을 넣는다 (키워드 기준 중복 제거).
//!
//! 파일 잠금은 없다. 여러 프로세스가 동시에 쓰면 마지막 쓰기가 남는다.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use chrono_tz::Asia::Seoul;

use crate::models::HistoryEntry;

/// 단일 컬럼 CSV 헤더
const CSV_HEADER: &str = "log";

/// 검색 기록 저장소
///
/// 메모리 목록과 파일 내용을 항상 일치시킨다. 모든 변경 직후
/// 전체 목록을 파일에 덮어쓴다.
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// 파일에서 기록을 읽어 저장소를 연다
    ///
    /// 파일이 없거나 읽기/파싱에 실패하면 빈 목록으로 시작한다.
    /// 호출자에게 오류를 올리지 않는다.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = Self::load(&path);
        log::info!("검색 기록 로드: {}건 ({})", entries.len(), path.display());
        Self { path, entries }
    }

    fn load(path: &Path) -> Vec<HistoryEntry> {
        if !path.exists() {
            return Vec::new();
        }
        match fs::read_to_string(path) {
            Ok(content) => parse_history_csv(&content),
            Err(e) => {
                log::warn!("검색 기록 파일 읽기 실패: {} ({})", path.display(), e);
                Vec::new()
            }
        }
    }

    /// 전체 목록 (최신순)
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// 최근 n건 (표시용)
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        &self.entries[..self.entries.len().min(n)]
    }

    /// 키워드 기록
    ///
    /// 같은 키워드의 기존 항목을 제거한 뒤 현재 시각(KST)으로 맨 앞에
    /// 추가한다. 빈 키워드는 기록하지 않는다.
    pub fn record(&mut self, keyword: &str) -> Result<&[HistoryEntry]> {
        let timestamp = Utc::now()
            .with_timezone(&Seoul)
            .format("%H:%M")
            .to_string();
        self.record_at(&timestamp, keyword)
    }

    fn record_at(&mut self, timestamp: &str, keyword: &str) -> Result<&[HistoryEntry]> {
        if keyword.is_empty() {
            return Ok(&self.entries);
        }
        self.entries.retain(|e| e.keyword != keyword);
        self.entries.insert(0, HistoryEntry::new(timestamp, keyword));
        self.persist()?;
        Ok(self.entries())
    }

    /// index 위치 항목 삭제
    ///
    /// 범위 밖 인덱스는 조용히 무시한다
    pub fn remove(&mut self, index: usize) -> Result<&[HistoryEntry]> {
        if index < self.entries.len() {
            self.entries.remove(index);
            self.persist()?;
        }
        Ok(self.entries())
    }

    /// 전체 비우기
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.persist()
    }

    /// 전체 목록을 파일에 덮어쓴다
    ///
    /// 트랜잭션 보장은 없다. `fs::write`가 모든 종료 경로에서
    /// 닫힘/플러시를 보장한다.
    fn persist(&self) -> Result<()> {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for entry in &self.entries {
            out.push_str(&quote_csv_field(&entry.to_log()));
            out.push('\n');
        }
        fs::write(&self.path, out)?;
        Ok(())
    }
}

/// 단일 컬럼 CSV 본문 파싱
///
/// 헤더가 맞지 않는 파일은 통째로 빈 목록 처리한다
fn parse_history_csv(content: &str) -> Vec<HistoryEntry> {
    let mut lines = content.lines();
    match lines.next() {
        Some(header) if header.trim() == CSV_HEADER => {}
        _ => return Vec::new(),
    }
    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| HistoryEntry::from_log(&unquote_csv_field(line)))
        .collect()
}

/// 쉼표/따옴표/개행이 들어간 필드는 따옴표로 감싸 쓴다
fn quote_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn unquote_csv_field(line: &str) -> String {
    let line = line.trim_end_matches('\r');
    if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
        line[1..line.len() - 1].replace("\"\"", "\"")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::open(dir.path().join("search_history.csv"))
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.entries().is_empty());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("search_history.csv");
        fs::write(&path, "전혀 다른 내용\n이상한 줄\n").unwrap();
        let store = HistoryStore::open(&path);
        assert!(store.entries().is_empty());
    }

    #[test]
    fn record_dedups_and_moves_to_front() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        store.record_at("09:00", "AAPL").unwrap();
        store.record_at("09:05", "MSFT").unwrap();
        store.record_at("09:10", "AAPL").unwrap();

        let logs: Vec<String> = store.entries().iter().map(|e| e.to_log()).collect();
        assert_eq!(logs, vec!["[09:10] AAPL", "[09:05] MSFT"]);
    }

    #[test]
    fn record_is_case_sensitive() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        store.record_at("09:00", "samsung").unwrap();
        store.record_at("09:01", "Samsung").unwrap();

        assert_eq!(store.entries().len(), 2);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.record_at("09:00", "a").unwrap();
        store.record_at("09:01", "b").unwrap();
        store.record_at("09:02", "c").unwrap();

        // 현재 순서: c, b, a
        store.remove(1).unwrap();

        let keywords: Vec<&str> = store.entries().iter().map(|e| e.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["c", "a"]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.record_at("09:00", "a").unwrap();

        store.remove(5).unwrap();
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn clear_empties_store_and_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("search_history.csv");
        let mut store = HistoryStore::open(&path);
        store.record_at("09:00", "a").unwrap();
        store.clear().unwrap();

        assert!(store.entries().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "log\n");
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("search_history.csv");
        {
            let mut store = HistoryStore::open(&path);
            store.record_at("09:00", "삼성전자").unwrap();
            store.record_at("09:05", "카카오").unwrap();
        }

        let reopened = HistoryStore::open(&path);
        let keywords: Vec<&str> = reopened
            .entries()
            .iter()
            .map(|e| e.keyword.as_str())
            .collect();
        assert_eq!(keywords, vec!["카카오", "삼성전자"]);
    }

    #[test]
    fn keyword_with_comma_survives_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("search_history.csv");
        {
            let mut store = HistoryStore::open(&path);
            store.record_at("09:00", "LG, 화학").unwrap();
        }

        let reopened = HistoryStore::open(&path);
        assert_eq!(reopened.entries()[0].keyword, "LG, 화학");
    }

    #[test]
    fn recent_caps_display_length() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        for i in 0..15 {
            store.record_at("09:00", &format!("종목{}", i)).unwrap();
        }

        assert_eq!(store.recent(10).len(), 10);
        assert_eq!(store.entries().len(), 15);
        // 표시 목록은 최신순 앞부분
        assert_eq!(store.recent(10)[0].keyword, "종목14");
    }

    #[test]
    fn empty_keyword_is_not_recorded() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        store.record_at("09:00", "").unwrap();
        assert!(store.entries().is_empty());
    }
}
