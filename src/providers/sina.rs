use crate::errors::{Result, ViewerError};
use crate::models::quote::{Quote, Series};
use crate::providers::{ProviderId, QuoteFetcher};
use crate::util;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local};
use log::debug;
use rand::Rng;
use reqwest::Client;

/// 快照接口至少返回 名称,今开,昨收,当前价 四个字段
const MIN_QUOTE_FIELDS: usize = 4;
/// 完整快照行的字段数（含五档行情与日期时间）
const MIN_CHART_FIELDS: usize = 32;
/// 模拟分时序列的采样点数与间隔
const SYNTHETIC_POINTS: usize = 10;
const SYNTHETIC_STEP_MINUTES: i64 = 30;

/// 新浪财经数据抓取器（备用数据源）。
/// 该接口只提供单点快照，不提供真实分时采样，
/// 分时序列由快照价格加随机扰动模拟生成，仅用于展示。
pub struct SinaFetcher {
    client: Client,
    base_url: String,
}

impl SinaFetcher {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn snapshot_text(&self, symbol: &str) -> Result<String> {
        let url = format!("{}/list={}", self.base_url, to_sina_symbol(symbol));
        debug!("请求新浪快照接口: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ViewerError::HttpStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl QuoteFetcher for SinaFetcher {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Sina
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        let text = self.snapshot_text(symbol).await?;
        let snapshot = parse_snapshot(&text, MIN_QUOTE_FIELDS)?;
        Ok(snapshot.into_quote(symbol))
    }

    async fn fetch_series(&self, symbol: &str) -> Result<Series> {
        let text = self.snapshot_text(symbol).await?;
        let snapshot = parse_snapshot(&text, MIN_CHART_FIELDS)?;
        Ok(synthetic_series(snapshot.current_price, Local::now()))
    }

    async fn fetch_view(&self, symbol: &str) -> Result<(Quote, Series)> {
        let text = self.snapshot_text(symbol).await?;
        let snapshot = parse_snapshot(&text, MIN_CHART_FIELDS)?;
        let series = synthetic_series(snapshot.current_price, Local::now());
        Ok((snapshot.into_quote(symbol), series))
    }
}

/// 交易所代码转新浪格式：美股去掉.O/.N后缀，
/// 港股加hk前缀，A股按交易所加sz/sh前缀
pub fn to_sina_symbol(symbol: &str) -> String {
    if let Some(code) = symbol.strip_suffix(".O") {
        return code.to_string();
    }
    if let Some(code) = symbol.strip_suffix(".N") {
        return code.to_string();
    }
    if let Some(code) = symbol.strip_suffix(".HK") {
        return format!("hk{}", code);
    }
    if let Some(code) = symbol.strip_suffix(".SZ") {
        return format!("sz{}", code);
    }
    if let Some(code) = symbol.strip_suffix(".SH") {
        return format!("sh{}", code);
    }
    // 默认按美股处理
    symbol.to_string()
}

/// 新浪格式转回交易所代码
pub fn from_sina_symbol(sina_symbol: &str) -> String {
    if let Some(code) = sina_symbol.strip_prefix("hk") {
        return format!("{}.HK", code);
    }
    if let Some(code) = sina_symbol.strip_prefix("sz") {
        return format!("{}.SZ", code);
    }
    if let Some(code) = sina_symbol.strip_prefix("sh") {
        return format!("{}.SH", code);
    }
    sina_symbol.to_string()
}

/// 快照行解析结果。
/// 字段布局：0=名称 1=今开 2=昨收 3=当前价，后续为五档行情等
pub(crate) struct Snapshot {
    pub name: String,
    pub open_price: f64,
    pub yesterday_close: f64,
    pub current_price: f64,
}

impl Snapshot {
    fn into_quote(self, symbol: &str) -> Quote {
        let name = if self.name.is_empty() {
            symbol.to_string()
        } else {
            self.name
        };
        Quote {
            symbol: symbol.to_string(),
            long_name: name.clone(),
            name,
            current_price: self.current_price,
            open_price: self.open_price,
            yesterday_close: self.yesterday_close,
        }
    }
}

/// 从响应文本中找到 hq_str 赋值行并按逗号切分。
/// 找不到行或字段数不足都视为无效代码。
pub(crate) fn parse_snapshot(text: &str, min_fields: usize) -> Result<Snapshot> {
    for line in text.lines() {
        if !line.contains("var hq_str_") {
            continue;
        }
        let Some((_, value)) = line.split_once('=') else {
            continue;
        };
        let cleaned = value.replace('"', "");
        let fields: Vec<&str> = cleaned.split(',').collect();
        if fields.len() < min_fields {
            continue;
        }

        let current_price = parse_price(fields.get(3)).unwrap_or(0.0);
        let open_price = parse_price(fields.get(1)).unwrap_or(current_price);
        let yesterday_close = parse_price(fields.get(2)).unwrap_or(current_price);

        return Ok(Snapshot {
            name: fields[0].to_string(),
            open_price,
            yesterday_close,
            current_price,
        });
    }

    Err(ViewerError::InvalidSymbol(
        "股票代码无效或数据不可用".to_string(),
    ))
}

fn parse_price(field: Option<&&str>) -> Option<f64> {
    field.and_then(|s| s.parse::<f64>().ok()).filter(|p| *p > 0.0)
}

/// 以当前价为基准、±1%随机扰动生成的模拟分时序列，
/// 30分钟间隔、以当前时刻结尾。这是展示用的近似，不是真实历史数据。
pub(crate) fn synthetic_series(current_price: f64, now: DateTime<Local>) -> Series {
    let mut rng = rand::thread_rng();
    let mut labels = Vec::with_capacity(SYNTHETIC_POINTS);
    let mut prices = Vec::with_capacity(SYNTHETIC_POINTS);

    for i in 0..SYNTHETIC_POINTS {
        let offset = (SYNTHETIC_POINTS - 1 - i) as i64 * SYNTHETIC_STEP_MINUTES;
        let time = now - Duration::minutes(offset);
        labels.push(util::time_label(time));

        let variation = (rng.gen::<f64>() - 0.5) * 0.02;
        prices.push(Some(current_price * (1.0 + variation)));
    }

    Series::new(labels, prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot_line(fields: &[&str]) -> String {
        format!("var hq_str_sz000001=\"{}\";\n", fields.join(","))
    }

    fn full_snapshot_line() -> String {
        let mut fields = vec!["Example", "10.00", "9.50", "10.25"];
        fields.extend(std::iter::repeat("0.00").take(28));
        snapshot_line(&fields)
    }

    #[test]
    fn symbol_codec_round_trips_per_exchange() {
        for symbol in ["AAPL", "0700.HK", "000001.SZ", "600036.SH"] {
            assert_eq!(from_sina_symbol(&to_sina_symbol(symbol)), symbol);
        }
    }

    #[test]
    fn sina_symbol_encoding_matches_exchange_prefixes() {
        assert_eq!(to_sina_symbol("AAPL"), "AAPL");
        assert_eq!(to_sina_symbol("AAPL.O"), "AAPL");
        assert_eq!(to_sina_symbol("0700.HK"), "hk0700");
        assert_eq!(to_sina_symbol("000001.SZ"), "sz000001");
        assert_eq!(to_sina_symbol("600036.SH"), "sh600036");
    }

    #[test]
    fn snapshot_fields_parse_by_position() {
        let text = full_snapshot_line();
        let snapshot = parse_snapshot(&text, MIN_CHART_FIELDS).unwrap();
        assert_eq!(snapshot.name, "Example");
        assert_eq!(snapshot.open_price, 10.00);
        assert_eq!(snapshot.yesterday_close, 9.50);
        assert_eq!(snapshot.current_price, 10.25);
    }

    #[test]
    fn quote_falls_back_to_current_price_for_zero_fields() {
        let text = snapshot_line(&["Example", "0.00", "0.00", "10.25"]);
        let snapshot = parse_snapshot(&text, MIN_QUOTE_FIELDS).unwrap();
        assert_eq!(snapshot.open_price, 10.25);
        assert_eq!(snapshot.yesterday_close, 10.25);
    }

    #[test]
    fn missing_line_is_invalid_symbol() {
        assert!(matches!(
            parse_snapshot("no match here\n", MIN_QUOTE_FIELDS),
            Err(ViewerError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn short_line_is_invalid_symbol() {
        let text = snapshot_line(&["Example", "10.00"]);
        assert!(matches!(
            parse_snapshot(&text, MIN_QUOTE_FIELDS),
            Err(ViewerError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn synthetic_series_shape_and_bounds() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap();
        let series = synthetic_series(100.0, now);

        assert_eq!(series.len(), SYNTHETIC_POINTS);
        assert_eq!(series.labels.len(), series.prices.len());
        assert_eq!(series.labels.last().unwrap(), "15:00");
        assert_eq!(series.labels.first().unwrap(), "10:30");
        for price in series.points().iter().map(|(_, p)| *p) {
            assert!(price >= 99.0 && price <= 101.0);
        }
    }
}
