use stockview::config::Config;
use stockview::providers::ProviderId;
use stockview::services::viewer::{StockView, ViewerSession};

use clap::{App, Arg, SubCommand};
use log::{error, info};
use std::error::Error;

const SPARK_LEVELS: &[char] = &['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    let app = App::new("stockview")
        .version("0.1.0")
        .about("Stock quote viewer with dual data sources (Yahoo Finance / Sina)")
        .subcommand(
            SubCommand::with_name("view")
                .about("Look up a stock by name or ticker and show quote and intraday chart")
                .arg(
                    Arg::with_name("query")
                        .value_name("QUERY")
                        .help("Stock name (Chinese alias) or ticker; omit to restore the last selection")
                        .takes_value(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("provider")
                        .short('p')
                        .long("provider")
                        .value_name("PROVIDER")
                        .help("Force a data provider (yahoo, sina) instead of probing")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("history-file")
                        .long("history-file")
                        .value_name("PATH")
                        .help("Path of the persisted selection history")
                        .takes_value(true)
                        .default_value("stockview_history.json"),
                ),
        )
        .subcommand(
            SubCommand::with_name("history")
                .about("List recently selected stocks")
                .arg(
                    Arg::with_name("history-file")
                        .long("history-file")
                        .value_name("PATH")
                        .help("Path of the persisted selection history")
                        .takes_value(true)
                        .default_value("stockview_history.json"),
                ),
        )
        .subcommand(
            SubCommand::with_name("resolve")
                .about("Show how a free-text query canonicalizes to a symbol")
                .arg(
                    Arg::with_name("query")
                        .value_name("QUERY")
                        .required(true)
                        .takes_value(true)
                        .index(1),
                ),
        );

    let matches = app.get_matches();

    if let Some(matches) = matches.subcommand_matches("view") {
        let forced_provider = match matches.value_of("provider") {
            Some(value) => match value.parse::<ProviderId>() {
                Ok(provider) => Some(provider),
                Err(e) => {
                    error!("{}", e);
                    return Err(e.into());
                }
            },
            None => None,
        };

        let config = Config::new()
            .with_history_path(matches.value_of("history-file").unwrap())
            .with_forced_provider(forced_provider);

        let mut session = ViewerSession::new(config)?;

        let view = if let Some(query) = matches.value_of("query") {
            session.load_history();
            match session.select(query).await {
                Ok(view) => Some(view),
                Err(e) => {
                    // 与弹窗一致：同一时刻只展示一条错误信息
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        } else {
            let restored = session.start().await;
            if restored.is_none() {
                eprintln!("没有可恢复的历史选择，请指定股票名称或代码");
                std::process::exit(1);
            }
            restored
        };

        if let Some(view) = view {
            print_view(&view);
        }
    } else if let Some(matches) = matches.subcommand_matches("history") {
        let config = Config::new().with_history_path(matches.value_of("history-file").unwrap());
        let mut session = ViewerSession::new(config)?;
        session.load_history();

        let entries = session.history().entries();
        if entries.is_empty() {
            println!("暂无选择记录");
        } else {
            for (i, entry) in entries.iter().enumerate() {
                println!("{}. {} ({})", i + 1, entry.long_name, entry.symbol);
            }
        }
    } else if let Some(matches) = matches.subcommand_matches("resolve") {
        let query = matches.value_of("query").unwrap();
        println!("{}", stockview::resolver::resolve(query));
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}

fn print_view(view: &StockView) {
    let quote = &view.quote;
    let change = quote.price_change();
    let sign = if change >= 0.0 { "+" } else { "" };

    println!("{} ({})", quote.long_name, quote.symbol);
    println!(
        "当前价: {:.2}  涨跌: {}{:.2} ({}{:.2}%)",
        quote.current_price,
        sign,
        change,
        sign,
        quote.price_change_percent()
    );
    println!(
        "今开: {:.2}  昨收: {:.2}",
        quote.open_price, quote.yesterday_close
    );

    let points = view.series.points();
    if !points.is_empty() {
        println!("{}", sparkline(&points));
        println!(
            "{} .. {}",
            points.first().map(|(label, _)| *label).unwrap_or(""),
            points.last().map(|(label, _)| *label).unwrap_or("")
        );
    }

    if view.provider == ProviderId::Sina {
        println!("(新浪数据源不提供分时采样，走势为基于当前价的模拟近似)");
    }
}

fn sparkline(points: &[(&str, f64)]) -> String {
    let min = points.iter().map(|(_, p)| *p).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|(_, p)| *p)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = (max - min).max(f64::EPSILON);

    points
        .iter()
        .map(|(_, price)| {
            let level = ((price - min) / range * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}
