use serde::{Deserialize, Serialize};

/// 单只股票的实时快照
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub long_name: String,
    pub current_price: f64,
    pub open_price: f64,
    pub yesterday_close: f64,
}

impl Quote {
    /// 相对昨收的涨跌额
    pub fn price_change(&self) -> f64 {
        self.current_price - self.yesterday_close
    }

    /// 相对昨收的涨跌幅（百分比），昨收为0时返回0
    pub fn price_change_percent(&self) -> f64 {
        if self.yesterday_close > 0.0 {
            self.price_change() / self.yesterday_close * 100.0
        } else {
            0.0
        }
    }
}

/// 分时序列：时间标签与价格一一对应，None表示缺失采样
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub prices: Vec<Option<f64>>,
}

impl Series {
    pub fn new(labels: Vec<String>, prices: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(labels.len(), prices.len());
        Self { labels, prices }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 过滤掉缺失采样后的 (标签, 价格) 对，保持两列对齐
    pub fn points(&self) -> Vec<(&str, f64)> {
        self.labels
            .iter()
            .zip(self.prices.iter())
            .filter_map(|(label, price)| price.map(|p| (label.as_str(), p)))
            .collect()
    }
}

/// 最近选择记录条目，字段名与扩展存储格式保持一致
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub symbol: String,
    pub name: String,
    pub long_name: String,
}
