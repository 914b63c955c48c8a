use crate::config::Config;
use crate::errors::Result;
use crate::history::HistoryStore;
use crate::models::quote::{HistoryEntry, Quote, Series};
use crate::providers::probe;
use crate::providers::sina::SinaFetcher;
use crate::providers::yahoo::YahooFetcher;
use crate::providers::{ProviderId, QuoteFetcher};
use crate::resolver;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::OnceCell;

/// 一次成功选择的产出：快照、分时序列与实际使用的数据源
pub struct StockView {
    pub quote: Quote,
    pub series: Series,
    pub provider: ProviderId,
}

/// 查看器会话：持有配置、HTTP客户端、数据源探测结果和历史记录，
/// 在弹窗打开时构建、关闭时销毁。探测结果通过OnceCell只计算一次，
/// 所有后续查询共享同一个结论。
pub struct ViewerSession {
    config: Config,
    client: Client,
    yahoo: YahooFetcher,
    sina: SinaFetcher,
    provider: OnceCell<ProviderId>,
    history: HistoryStore,
}

impl ViewerSession {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let yahoo = YahooFetcher::new(client.clone(), &config.yahoo_base_url);
        let sina = SinaFetcher::new(client.clone(), &config.sina_base_url);
        let history = HistoryStore::new(&config.history_path, config.history_capacity);

        Ok(Self {
            config,
            client,
            yahoo,
            sina,
            provider: OnceCell::new(),
            history,
        })
    }

    /// 本会话使用的数据源。首次调用触发探测，之后复用同一结果；
    /// 配置强制指定数据源时跳过探测。
    pub async fn provider(&self) -> ProviderId {
        if let Some(forced) = self.config.forced_provider {
            return forced;
        }
        *self
            .provider
            .get_or_init(|| probe::detect(&self.client, &self.config))
            .await
    }

    fn fetcher(&self, id: ProviderId) -> &(dyn QuoteFetcher + Send + Sync) {
        match id {
            ProviderId::Yahoo => &self.yahoo,
            ProviderId::Sina => &self.sina,
        }
    }

    /// 选择流程：解析输入 → 等待数据源探测 → 抓取行情 → 记入历史。
    /// 历史记录写入发生在抓取成功之后，失败的查询不留痕。
    pub async fn select(&mut self, query: &str) -> Result<StockView> {
        let symbol = resolver::resolve(query);
        let provider = self.provider().await;
        info!("使用 {} 数据源查询 {}", provider, symbol);

        let (quote, series) = self.fetcher(provider).fetch_view(&symbol).await?;

        self.history.record(HistoryEntry {
            symbol: quote.symbol.clone(),
            name: quote.name.clone(),
            long_name: quote.long_name.clone(),
        });

        Ok(StockView {
            quote,
            series,
            provider,
        })
    }

    /// 启动流程：加载历史记录并自动恢复最近一次选择。
    /// 恢复失败只记录日志，过期或无效的缓存代码不能阻塞启动。
    pub async fn start(&mut self) -> Option<StockView> {
        self.history.load();
        let last = self.history.front().cloned()?;
        info!("自动恢复上次选择: {}", last.symbol);

        match self.select(&last.symbol).await {
            Ok(view) => Some(view),
            Err(e) => {
                warn!("自动恢复 {} 失败: {}", last.symbol, e);
                None
            }
        }
    }

    pub fn load_history(&mut self) {
        self.history.load();
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
}
