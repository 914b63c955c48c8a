use chrono::{DateTime, Local};

/// 取序列中最后一个非空值，全空时回退为0
pub fn last_valid(values: &[Option<f64>]) -> f64 {
    values.iter().rev().flatten().copied().next().unwrap_or(0.0)
}

/// 取序列中第一个非空值
pub fn first_valid(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().next()
}

/// 分时图时间标签，HH:MM
pub fn time_label(time: DateTime<Local>) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_valid_skips_trailing_nulls() {
        assert_eq!(last_valid(&[Some(100.0), None, Some(102.0), None]), 102.0);
        assert_eq!(last_valid(&[Some(100.0), None, Some(102.0)]), 102.0);
    }

    #[test]
    fn last_valid_falls_back_to_zero() {
        assert_eq!(last_valid(&[]), 0.0);
        assert_eq!(last_valid(&[None, None]), 0.0);
    }

    #[test]
    fn first_valid_skips_leading_nulls() {
        assert_eq!(first_valid(&[None, Some(9.8), Some(10.0)]), Some(9.8));
        assert_eq!(first_valid(&[None, None]), None);
    }
}
