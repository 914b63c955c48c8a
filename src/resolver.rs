use std::collections::HashMap;
use std::sync::OnceLock;

/// 中文别名/常用名到交易所代码的映射表，沿用浏览器扩展内置的数据。
/// 注意：比亚迪在原始数据里定义了两次（先 1211.HK 后 002594.SZ），
/// 按插入顺序后者覆盖前者。这是继承自源数据的行为，保持原样。
const STOCK_MAPPINGS: &[(&str, &str)] = &[
    // 美股
    ("苹果", "AAPL"),
    ("苹果公司", "AAPL"),
    ("特斯拉", "TSLA"),
    ("谷歌", "GOOGL"),
    ("微软", "MSFT"),
    ("亚马逊", "AMZN"),
    ("脸书", "META"),
    ("奈飞", "NFLX"),
    ("英伟达", "NVDA"),
    ("英特尔", "INTC"),
    ("AMD", "AMD"),
    ("波音", "BA"),
    ("迪士尼", "DIS"),
    ("星巴克", "SBUX"),
    ("麦当劳", "MCD"),
    ("可口可乐", "KO"),
    ("百事", "PEP"),
    ("强生", "JNJ"),
    ("辉瑞", "PFE"),
    ("摩根大通", "JPM"),
    ("高盛", "GS"),
    ("伯克希尔", "BRK-A"),
    ("伯克希尔B", "BRK-B"),
    // 港股
    ("腾讯", "0700.HK"),
    ("腾讯控股", "0700.HK"),
    ("阿里巴巴", "9988.HK"),
    ("美团", "3690.HK"),
    ("小米", "1810.HK"),
    ("京东", "9618.HK"),
    ("网易", "9999.HK"),
    ("比亚迪", "1211.HK"),
    ("中国移动", "0941.HK"),
    ("中国联通", "0762.HK"),
    ("中国电信", "0728.HK"),
    // A股
    ("平安银行", "000001.SZ"),
    ("万科A", "000002.SZ"),
    ("中国平安", "000001.SZ"),
    ("招商银行", "600036.SH"),
    ("浦发银行", "600000.SH"),
    ("工商银行", "601398.SH"),
    ("建设银行", "601939.SH"),
    ("中国银行", "601988.SH"),
    ("农业银行", "601288.SH"),
    ("贵州茅台", "600519.SH"),
    ("五粮液", "000858.SZ"),
    ("格力电器", "000651.SZ"),
    ("美的集团", "000333.SZ"),
    ("海尔智家", "600690.SH"),
    ("比亚迪", "002594.SZ"),
    ("宁德时代", "300750.SZ"),
    ("隆基绿能", "601012.SH"),
    ("中国石油", "601857.SH"),
    ("中国石化", "600028.SH"),
    ("中国海油", "600938.SH"),
];

fn mappings() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = HashMap::with_capacity(STOCK_MAPPINGS.len());
        // 按定义顺序插入，重复键以最后一次定义为准
        for &(alias, symbol) in STOCK_MAPPINGS {
            map.insert(alias, symbol);
        }
        map
    })
}

/// 将自由文本（中文别名或代码）解析为交易所代码。
/// 未命中别名表时按大写原样返回，代码是否真实存在由后续抓取揭示。
/// 本函数永不失败。
pub fn resolve(query: &str) -> String {
    let query = query.trim();
    match mappings().get(query) {
        Some(symbol) => (*symbol).to_string(),
        None => query.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_aliases_resolve_to_canonical_symbols() {
        assert_eq!(resolve("苹果"), "AAPL");
        assert_eq!(resolve("苹果公司"), "AAPL");
        assert_eq!(resolve("腾讯"), "0700.HK");
        assert_eq!(resolve("贵州茅台"), "600519.SH");
        assert_eq!(resolve("宁德时代"), "300750.SZ");
    }

    #[test]
    fn duplicate_alias_last_definition_wins() {
        // 源数据中比亚迪定义了两次，A股定义覆盖港股定义
        assert_eq!(resolve("比亚迪"), "002594.SZ");
    }

    #[test]
    fn two_names_may_share_one_symbol() {
        assert_eq!(resolve("平安银行"), "000001.SZ");
        assert_eq!(resolve("中国平安"), "000001.SZ");
    }

    #[test]
    fn unknown_input_is_uppercased_verbatim() {
        assert_eq!(resolve("aapl"), "AAPL");
        assert_eq!(resolve("brk-b"), "BRK-B");
        assert_eq!(resolve("0700.hk"), "0700.HK");
        assert_eq!(resolve("  msft  "), "MSFT");
    }
}
