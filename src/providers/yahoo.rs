use crate::errors::{Result, ViewerError};
use crate::models::quote::{Quote, Series};
use crate::providers::{ProviderId, QuoteFetcher};
use crate::util;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use log::debug;
use reqwest::Client;
use serde_json::Value;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Yahoo Finance 数据抓取器（主数据源）
pub struct YahooFetcher {
    client: Client,
    base_url: String,
}

impl YahooFetcher {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 请求图表接口并做状态码检查，403单独区分（Yahoo按来源封禁）
    async fn chart(&self, symbol: &str, interval: &str, range: &str) -> Result<Value> {
        let url = format!(
            "{}/chart/{}?interval={}&range={}",
            self.base_url, symbol, interval, range
        );
        debug!("请求Yahoo图表接口: {}", url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Referer", "https://finance.yahoo.com/")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 403 {
                return Err(ViewerError::AccessDenied {
                    provider: "Yahoo Finance",
                    status: 403,
                });
            }
            return Err(ViewerError::HttpStatus(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        Ok(payload)
    }

    /// 当日5分钟线与5日日线并发抓取，任一失败则整体失败。
    /// 5日数据仅用于恢复昨收（排除其中的当日条目）。
    async fn chart_pair(&self, symbol: &str) -> Result<(Value, Value)> {
        tokio::try_join!(
            self.chart(symbol, "5m", "1d"),
            self.chart(symbol, "1d", "5d")
        )
    }
}

#[async_trait]
impl QuoteFetcher for YahooFetcher {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        let (today, five_day) = self.chart_pair(symbol).await?;
        parse_quote(symbol, &today, &five_day)
    }

    async fn fetch_series(&self, symbol: &str) -> Result<Series> {
        let (today, _) = self.chart_pair(symbol).await?;
        parse_series(&today)
    }

    async fn fetch_view(&self, symbol: &str) -> Result<(Quote, Series)> {
        let (today, five_day) = self.chart_pair(symbol).await?;
        let quote = parse_quote(symbol, &today, &five_day)?;
        let series = parse_series(&today)?;
        Ok((quote, series))
    }
}

/// 校验响应外层结构并取出 result[0]。
/// 载荷内嵌错误描述按数据错误处理，缺少 result/meta 按无效代码处理。
fn chart_result(payload: &Value) -> Result<&Value> {
    let chart = payload
        .get("chart")
        .ok_or_else(|| ViewerError::InvalidSymbol("响应缺少chart结构".to_string()))?;

    if let Some(error) = chart.get("error") {
        if !error.is_null() {
            let description = error
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("未知错误");
            return Err(ViewerError::DataError(description.to_string()));
        }
    }

    let result = chart
        .get("result")
        .and_then(|r| r.get(0))
        .ok_or_else(|| ViewerError::InvalidSymbol("股票代码无效或数据不可用".to_string()))?;

    if result.get("meta").is_none() {
        return Err(ViewerError::InvalidSymbol(
            "股票代码无效或数据不可用".to_string(),
        ));
    }

    Ok(result)
}

/// 取 indicators.quote[0] 下指定价格列，空洞保留为None
fn price_column(result: &Value, field: &str) -> Vec<Option<f64>> {
    result
        .pointer(&format!("/indicators/quote/0/{}", field))
        .and_then(Value::as_array)
        .map(|values| values.iter().map(Value::as_f64).collect())
        .unwrap_or_default()
}

pub(crate) fn parse_quote(symbol: &str, today: &Value, five_day: &Value) -> Result<Quote> {
    let today_result = chart_result(today)?;
    let five_day_result = chart_result(five_day)?;

    let closes = price_column(today_result, "close");
    if closes.is_empty() {
        return Err(ViewerError::InvalidSymbol("图表数据不完整".to_string()));
    }
    let opens = price_column(today_result, "open");

    // 当前价取最后一个非空收盘价，开盘价取第一个非空开盘价
    let current_price = util::last_valid(&closes);
    let open_price = util::first_valid(&opens).unwrap_or(current_price);

    // 昨收来自5日数据，排除最后一个（当日）条目
    let five_day_closes = price_column(five_day_result, "close");
    let yesterday_close = match five_day_closes.split_last() {
        Some((_, earlier)) => util::last_valid(earlier),
        None => 0.0,
    };

    let meta = &today_result["meta"];
    let name = meta
        .get("symbol")
        .and_then(Value::as_str)
        .unwrap_or(symbol)
        .to_string();
    let long_name = meta
        .get("longName")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| name.clone());

    Ok(Quote {
        symbol: symbol.to_string(),
        name,
        long_name,
        current_price,
        open_price,
        yesterday_close,
    })
}

pub(crate) fn parse_series(today: &Value) -> Result<Series> {
    let result = chart_result(today)?;

    let labels: Vec<String> = result
        .get("timestamp")
        .and_then(Value::as_array)
        .map(|timestamps| {
            timestamps
                .iter()
                .map(|ts| {
                    ts.as_i64()
                        .and_then(|secs| DateTime::from_timestamp(secs, 0))
                        .map(|dt| util::time_label(dt.with_timezone(&Local)))
                        .unwrap_or_else(|| "--:--".to_string())
                })
                .collect()
        })
        .unwrap_or_default();

    let mut prices = price_column(result, "close");
    // 两列长度对齐是Series的不变量
    prices.resize(labels.len(), None);

    Ok(Series::new(labels, prices))
}
