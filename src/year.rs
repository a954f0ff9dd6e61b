//! 年度の計算

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;

/// 手動指定できる年度の下限
pub const MIN_MANUAL_YEAR: i32 = 2000;
/// 手動指定できる年度の上限
pub const MAX_MANUAL_YEAR: i32 = 2100;

/// 年度の指定方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YearOption {
    /// 現在の日付から自動計算
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// 手動で年度を指定
    #[serde(rename = "manual")]
    Manual,
}

impl std::fmt::Display for YearOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearOption::Auto => write!(f, "現在の情報に基づいて自動計算"),
            YearOption::Manual => write!(f, "手動で年度を指定"),
        }
    }
}

/// 今日の日付（ローカルタイム）
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 基準日から入試の対象年度（西暦）を求める。4月1日以降は翌年。
pub fn academic_year_for(reference: NaiveDate) -> i32 {
    if reference.month() >= 4 {
        reference.year() + 1
    } else {
        reference.year()
    }
}

pub fn format_year_label(year: i32) -> String {
    format!("{}年度", year)
}

/// 年度ラベルを解決する
///
/// `Auto` では `reference` から計算し、`Manual` では `manual_year` をそのまま使う。
/// 手動年度の範囲チェックは入力時に行われる前提。
pub fn resolve_academic_year(option: YearOption, manual_year: i32, reference: NaiveDate) -> String {
    match option {
        YearOption::Auto => format_year_label(academic_year_for(reference)),
        YearOption::Manual => format_year_label(manual_year),
    }
}

/// 手動入力欄の初期値（今年 + 1）
pub fn default_manual_year(reference: NaiveDate) -> i32 {
    reference.year() + 1
}

/// 手動入力された年度を検証する
pub fn validate_manual_year(year: i32) -> Result<i32, ScoutError> {
    if (MIN_MANUAL_YEAR..=MAX_MANUAL_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(ScoutError::YearOutOfRange(year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_auto_year_switches_on_april_first() {
        assert_eq!(
            resolve_academic_year(YearOption::Auto, 0, date(2025, 4, 1)),
            "2026年度"
        );
        assert_eq!(
            resolve_academic_year(YearOption::Auto, 0, date(2025, 3, 31)),
            "2025年度"
        );
    }

    #[test]
    fn test_auto_year_across_months() {
        for month in 1..=12 {
            let expected = if month >= 4 { 2031 } else { 2030 };
            assert_eq!(academic_year_for(date(2030, month, 15)), expected);
        }
    }

    #[test]
    fn test_manual_year_ignores_reference_date() {
        for reference in [date(2025, 1, 1), date(2025, 4, 1), date(2099, 12, 31)] {
            assert_eq!(
                resolve_academic_year(YearOption::Manual, 2030, reference),
                "2030年度"
            );
        }
    }

    #[test]
    fn test_default_manual_year() {
        assert_eq!(default_manual_year(date(2026, 10, 18)), 2027);
        assert_eq!(default_manual_year(date(2026, 1, 5)), 2027);
    }

    #[test]
    fn test_validate_manual_year_bounds() {
        assert_eq!(validate_manual_year(2000).unwrap(), 2000);
        assert_eq!(validate_manual_year(2100).unwrap(), 2100);
        assert!(matches!(
            validate_manual_year(1999),
            Err(ScoutError::YearOutOfRange(1999))
        ));
        assert!(validate_manual_year(2101).is_err());
    }
}
