use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// 上游明确拒绝访问（403），提示切换数据源
    #[error("{provider} access denied (HTTP {status}), try the other provider or a proxy")]
    AccessDenied { provider: &'static str, status: u16 },

    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// 上游响应成功但携带错误描述
    #[error("Data error: {0}")]
    DataError(String),

    /// 响应结构完整但缺少预期字段，或快照行解析失败
    #[error("Invalid symbol or data unavailable: {0}")]
    InvalidSymbol(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

// 用于从字符串创建错误
impl From<String> for ViewerError {
    fn from(s: String) -> Self {
        ViewerError::Unknown(s)
    }
}

// 用于从&str创建错误
impl From<&str> for ViewerError {
    fn from(s: &str) -> Self {
        ViewerError::Unknown(s.to_string())
    }
}
