use crate::errors::Result;
use crate::models::quote::{Quote, Series};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub mod probe;
pub mod sina;
pub mod yahoo;

/// 可用的行情数据源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderId {
    /// 主数据源：Yahoo Finance JSON 图表接口
    Yahoo,
    /// 备用数据源：新浪财经文本快照接口
    Sina,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Yahoo => "yahoo",
            ProviderId::Sina => "sina",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(ProviderId::Yahoo),
            "sina" => Ok(ProviderId::Sina),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// 行情抓取器的统一契约，屏蔽各数据源的响应格式差异。
/// 两个实现产出的 Quote/Series 遵循同一套模型。
#[async_trait]
pub trait QuoteFetcher {
    fn provider_id(&self) -> ProviderId;

    /// 抓取实时快照
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote>;

    /// 抓取分时序列
    async fn fetch_series(&self, symbol: &str) -> Result<Series>;

    /// 一次选择流程需要的快照+序列组合，实现可复用请求
    async fn fetch_view(&self, symbol: &str) -> Result<(Quote, Series)> {
        let quote = self.fetch_quote(symbol).await?;
        let series = self.fetch_series(symbol).await?;
        Ok((quote, series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_parses_case_insensitively() {
        assert_eq!("Yahoo".parse::<ProviderId>().unwrap(), ProviderId::Yahoo);
        assert_eq!("SINA".parse::<ProviderId>().unwrap(), ProviderId::Sina);
        assert!("tencent".parse::<ProviderId>().is_err());
    }
}
