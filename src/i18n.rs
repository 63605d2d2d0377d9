use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

pub struct Strings {
    pub tab_countdown: &'static str,
    pub tab_journal: &'static str,
    pub hero_title: &'static str,
    pub hero_subtitle: &'static str,
    pub empty_title: &'static str,
    pub empty_subtitle: &'static str,
    pub loading: &'static str,
    pub load_failed: &'static str,
    pub retry_hint: &'static str,
    pub add_title: &'static str,
    pub edit_title: &'static str,
    pub event_name: &'static str,
    pub date_label: &'static str,
    pub add_label: &'static str,
    pub labels: &'static str,
    pub notes: &'static str,
    pub add: &'static str,
    pub update: &'static str,
    pub cancel: &'static str,
    pub today: &'static str,
    pub days_left: &'static str,
    pub days_ago: &'static str,
    pub invalid_date: &'static str,
    pub reactions: &'static str,
    pub comments: &'static str,
    pub no_comments: &'static str,
}

const EN: Strings = Strings {
    tab_countdown: "Countdown",
    tab_journal: "Journal",
    hero_title: "Couple countdown · Shared view",
    hero_subtitle: "Capture every heartfelt milestone",
    empty_title: "No events yet",
    empty_subtitle: "Press n to add your first day",
    loading: "Loading events...",
    load_failed: "Failed to load events. Please try again.",
    retry_hint: "Press R to retry",
    add_title: "Add new event",
    edit_title: "Edit event",
    event_name: "Title",
    date_label: "Date",
    add_label: "Label",
    labels: "Labels",
    notes: "Notes",
    add: "Add",
    update: "Update",
    cancel: "Cancel",
    today: "Today",
    days_left: "Days left",
    days_ago: "Days ago",
    invalid_date: "Invalid date",
    reactions: "React",
    comments: "Comments",
    no_comments: "No comments yet",
};

const ZH: Strings = Strings {
    tab_countdown: "倒数日",
    tab_journal: "日记",
    hero_title: "绑定情侣 · 双方可见",
    hero_subtitle: "记录你们的每一个心动瞬间",
    empty_title: "暂无事件",
    empty_subtitle: "按 n 添加你的第一个日子",
    loading: "正在加载...",
    load_failed: "加载事件失败，请重试。",
    retry_hint: "按 R 重试",
    add_title: "添加新事件",
    edit_title: "编辑事件",
    event_name: "标题",
    date_label: "日期",
    add_label: "标签",
    labels: "已选",
    notes: "备注",
    add: "添加",
    update: "更新",
    cancel: "取消",
    today: "今天",
    days_left: "天后",
    days_ago: "天前",
    invalid_date: "日期无效",
    reactions: "心情",
    comments: "评论",
    no_comments: "还没有评论",
};

impl Language {
    pub fn strings(self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Zh => &ZH,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }

    /// Date printed on an event card.
    pub fn event_date(self, date: NaiveDate) -> String {
        match self {
            Language::En => date.format("%b %d, %Y").to_string(),
            Language::Zh => date.format("%Y年%m月%d日").to_string(),
        }
    }

    /// Date line above the clock.
    pub fn header_date(self, date: NaiveDate) -> String {
        match self {
            Language::En => date.format("%B %d, %A").to_string(),
            Language::Zh => format!("{} {}", date.format("%m月%d日"), zh_weekday(date.weekday())),
        }
    }
}

fn zh_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::En => "en",
            Language::Zh => "zh",
        })
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "zh" | "zh-cn" | "chinese" => Ok(Language::Zh),
            other => Err(format!("unsupported language {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dates_per_language() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(Language::En.event_date(date), "Oct 19, 2026");
        assert_eq!(Language::Zh.event_date(date), "2026年10月19日");
        assert_eq!(Language::En.header_date(date), "October 19, Monday");
        assert_eq!(Language::Zh.header_date(date), "10月19日 星期一");
    }

    #[test]
    fn parses_and_toggles() {
        assert_eq!("ZH".parse::<Language>(), Ok(Language::Zh));
        assert_eq!(" english ".parse::<Language>(), Ok(Language::En));
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::En.toggle(), Language::Zh);
        assert_eq!(Language::Zh.to_string(), "zh");
    }
}
