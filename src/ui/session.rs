//! 画面の状態

use chrono::NaiveDate;

use crate::config::Config;
use crate::error::ScoutError;
use crate::year::{self, YearOption};

/// セッション1つ分の状態。永続化はしない
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub target_school: String,
    pub year_option: YearOption,
    pub manual_year: i32,
    pub result_text: String,
    pub is_running: bool,
}

impl SessionState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            target_school: String::new(),
            year_option: YearOption::Auto,
            manual_year: year::default_manual_year(today),
            result_text: String::new(),
            is_running: false,
        }
    }

    /// 設定の学校名と手動年度を初期入力として使う
    pub fn from_config(config: &Config, today: NaiveDate) -> Result<Self, ScoutError> {
        let mut state = Self::new(today);
        if let Some(school) = config.school_name() {
            state.set_school(school)?;
        }
        if let Some(manual_year) = config.manual_year {
            state.set_manual_year(manual_year)?;
        }
        Ok(state)
    }

    /// 現在の入力から年度ラベルを求める
    pub fn year_label(&self, today: NaiveDate) -> String {
        year::resolve_academic_year(self.year_option, self.manual_year, today)
    }

    pub fn set_school(&mut self, name: &str) -> Result<(), ScoutError> {
        self.ensure_unlocked()?;
        self.target_school = name.to_string();
        Ok(())
    }

    pub fn set_year_auto(&mut self) -> Result<(), ScoutError> {
        self.ensure_unlocked()?;
        self.year_option = YearOption::Auto;
        Ok(())
    }

    /// 手動モードに切り替える。範囲外の年度は状態を変えずに拒否する
    pub fn set_manual_year(&mut self, manual_year: i32) -> Result<(), ScoutError> {
        self.ensure_unlocked()?;
        self.manual_year = year::validate_manual_year(manual_year)?;
        self.year_option = YearOption::Manual;
        Ok(())
    }

    /// すべての入力と結果を初期値に戻す
    pub fn reset(&mut self, today: NaiveDate) -> Result<(), ScoutError> {
        self.ensure_unlocked()?;
        *self = Self::new(today);
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<(), ScoutError> {
        if self.is_running {
            Err(ScoutError::InputLocked)
        } else {
            Ok(())
        }
    }
}
