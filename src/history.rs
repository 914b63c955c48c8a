use crate::models::quote::HistoryEntry;
use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// 最近选择记录：定长、最新在前、按代码去重。
/// 持久化失败只记录日志，不影响内存状态，也不上报给用户——
/// 丢失历史记录不应阻塞核心功能。
pub struct HistoryStore {
    path: PathBuf,
    capacity: usize,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new(path: &str, capacity: usize) -> Self {
        Self {
            path: PathBuf::from(path),
            capacity,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// 最近一次选择的条目
    pub fn front(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// 记录一次选择：同代码条目移到最前并更新名称，超出容量的最旧条目丢弃
    pub fn record(&mut self, entry: HistoryEntry) {
        if let Some(pos) = self.entries.iter().position(|e| e.symbol == entry.symbol) {
            self.entries.remove(pos);
        }
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
        self.persist();
    }

    /// 启动时从文件加载一次，文件缺失或损坏都静默降级为空列表
    pub fn load(&mut self) {
        match fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str::<Vec<HistoryEntry>>(&text) {
                Ok(entries) => {
                    self.entries = entries;
                    self.entries.truncate(self.capacity);
                    info!("从存储加载历史记录: {} 条", self.entries.len());
                }
                Err(e) => warn!("历史记录文件格式损坏，忽略: {}", e),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("历史记录文件不存在: {}", self.path.display());
            }
            Err(e) => warn!("加载历史记录失败: {}", e),
        }
    }

    pub fn persist(&self) {
        if let Err(e) = self.try_persist() {
            warn!("保存历史记录失败: {}", e);
        }
    }

    fn try_persist(&self) -> crate::errors::Result<()> {
        let text = serde_json::to_string(&self.entries)?;
        fs::write(&self.path, text)?;
        debug!("历史记录已保存到 {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store(capacity: usize) -> HistoryStore {
        let path = std::env::temp_dir().join(format!(
            "stockview_history_test_{}_{}.json",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        HistoryStore::new(path.to_str().unwrap(), capacity)
    }

    fn entry(symbol: &str, name: &str) -> HistoryEntry {
        HistoryEntry {
            symbol: symbol.to_string(),
            name: name.to_string(),
            long_name: name.to_string(),
        }
    }

    #[test]
    fn record_keeps_most_recent_first() {
        let mut store = temp_store(5);
        store.record(entry("AAPL", "Apple"));
        store.record(entry("TSLA", "Tesla"));

        let symbols: Vec<&str> = store.entries().iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TSLA", "AAPL"]);
    }

    #[test]
    fn same_symbol_moves_to_front_with_latest_name() {
        let mut store = temp_store(5);
        store.record(entry("0700.HK", "腾讯"));
        store.record(entry("AAPL", "Apple"));
        store.record(entry("0700.HK", "腾讯控股"));

        assert_eq!(store.entries().len(), 2);
        let front = store.front().unwrap();
        assert_eq!(front.symbol, "0700.HK");
        assert_eq!(front.name, "腾讯控股");
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let mut store = temp_store(5);
        for i in 0..20 {
            store.record(entry(&format!("S{}", i), "name"));
        }
        assert_eq!(store.entries().len(), 5);
        assert_eq!(store.front().unwrap().symbol, "S19");
    }

    #[test]
    fn load_round_trips_persisted_entries() {
        let mut store = temp_store(5);
        store.record(entry("600519.SH", "贵州茅台"));
        store.record(entry("AAPL", "Apple"));

        let mut reloaded = HistoryStore::new(store.path.to_str().unwrap(), 5);
        reloaded.load();
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn load_tolerates_missing_and_corrupt_files() {
        let mut store = temp_store(5);
        store.load();
        assert!(store.entries().is_empty());

        fs::write(&store.path, "not json at all").unwrap();
        store.load();
        assert!(store.entries().is_empty());
    }
}
