use crate::providers::ProviderId;

pub struct Config {
    pub yahoo_base_url: String,
    pub sina_base_url: String,
    pub history_path: String,
    pub history_capacity: usize,
    pub request_timeout_secs: u64,
    /// 强制使用指定数据源，跳过探测
    pub forced_provider: Option<ProviderId>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            yahoo_base_url: "https://query1.finance.yahoo.com/v8/finance".to_string(),
            sina_base_url: "https://hq.sinajs.cn".to_string(),
            history_path: "stockview_history.json".to_string(),
            history_capacity: 5,
            request_timeout_secs: 30,
            forced_provider: None,
        }
    }

    pub fn with_yahoo_base_url(mut self, url: &str) -> Self {
        self.yahoo_base_url = url.to_string();
        self
    }

    pub fn with_sina_base_url(mut self, url: &str) -> Self {
        self.sina_base_url = url.to_string();
        self
    }

    pub fn with_history_path(mut self, path: &str) -> Self {
        self.history_path = path.to_string();
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_forced_provider(mut self, provider: Option<ProviderId>) -> Self {
        self.forced_provider = provider;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
