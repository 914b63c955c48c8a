use crate::config::Config;
use crate::providers::{yahoo, ProviderId};
use log::{info, warn};
use reqwest::Client;

/// 根据两个数据源的可达性选择本次会话使用的数据源。
/// 主数据源可达则优先；否则退到备用；两者都不可达时默认备用
/// （新浪在典型部署网络环境下更可能连通）。
pub fn choose(yahoo_reachable: bool, sina_reachable: bool) -> ProviderId {
    match (yahoo_reachable, sina_reachable) {
        (true, _) => ProviderId::Yahoo,
        (false, true) => ProviderId::Sina,
        (false, false) => ProviderId::Sina,
    }
}

/// 探测数据源可用性，每个会话只执行一次（由会话层memoize）。
/// 任何分支都落在一个确定的数据源上，本函数永不失败。
pub async fn detect(client: &Client, config: &Config) -> ProviderId {
    info!("开始检测数据源可用性");

    if head_ok(
        client,
        &format!(
            "{}/chart/AAPL?interval=1d&range=1d",
            config.yahoo_base_url
        ),
        "Yahoo Finance",
        true,
    )
    .await
    {
        info!("使用 Yahoo Finance 数据源");
        return ProviderId::Yahoo;
    }

    if head_ok(
        client,
        &format!("{}/list=sh000001", config.sina_base_url),
        "新浪财经",
        false,
    )
    .await
    {
        info!("使用新浪财经数据源");
        return ProviderId::Sina;
    }

    let fallback = choose(false, false);
    warn!("两个数据源均不可达，默认使用新浪财经");
    fallback
}

async fn head_ok(client: &Client, url: &str, provider: &str, browser_headers: bool) -> bool {
    let mut request = client.head(url);
    if browser_headers {
        request = request.header("User-Agent", yahoo::USER_AGENT);
    }

    match request.send().await {
        Ok(response) if response.status().is_success() => true,
        Ok(response) => {
            let status = response.status().as_u16();
            if status == 403 {
                // 403意味着按来源封禁，重试无意义，直接检测下一个数据源
                warn!("{} 拒绝访问 (HTTP 403)，可能存在反爬机制", provider);
            } else {
                warn!("{} 返回状态码: {}", provider, status);
            }
            false
        }
        Err(e) => {
            warn!("{} 连接失败: {}", provider, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yahoo_reachable_always_wins() {
        assert_eq!(choose(true, true), ProviderId::Yahoo);
        assert_eq!(choose(true, false), ProviderId::Yahoo);
    }

    #[test]
    fn sina_selected_when_yahoo_unreachable() {
        assert_eq!(choose(false, true), ProviderId::Sina);
    }

    #[test]
    fn sina_is_the_default_when_both_unreachable() {
        assert_eq!(choose(false, false), ProviderId::Sina);
    }
}
