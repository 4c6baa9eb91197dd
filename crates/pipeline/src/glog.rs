//! glog 접두어 추출기
//!
//! glog/klog 형식의 라인 접두어를 인식하여 메시지에서 떼어내고,
//! 레벨 문자와 타임스탬프를 레코드 필드로 옮깁니다.
//!
//! # glog 라인 형식
//! ```text
//! Lmmdd hh:mm:ss.uuuuuu threadid file:line] msg
//! I0101 12:00:00 msg
//! ```
//!
//! 접두어에는 연도가 없으므로 처리 시점의 연도를 사용합니다.
//! 마이크로초, 스레드 ID, 소스 위치는 선택 사항이며 인식되면 함께 제거됩니다.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use regex::Regex;

use crate::config::RecordKeys;
use crate::error::LogPipelineError;
use crate::record::{Record, TIMESTAMP_FORMAT};

/// glog 접두어 정규식
///
/// 그룹: 1=레벨 문자, 2=월, 3=일, 4=시, 5=분, 6=초
const GLOG_PATTERN: &str = r"^([IWEF])(\d{2})(\d{2}) (\d{2}):(\d{2}):(\d{2})(?:\.\d+)?(?:\s+\d+\s+[^\s\]]+:\d+\])?(?: |$)";

/// glog 레벨 문자 → 정규 레벨 이름
pub const GLOG_LEVELS: &[(&str, &str)] = &[
    ("I", "INFO"),
    ("W", "WARNING"),
    ("E", "ERROR"),
    ("F", "FATAL"),
];

/// 레벨 문자를 정규 레벨 이름으로 변환합니다.
pub fn glog_level(letter: &str) -> Option<&'static str> {
    GLOG_LEVELS
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, name)| *name)
}

/// glog 접두어 추출기
pub struct GlogExtractor {
    regex: Regex,
}

impl GlogExtractor {
    /// 접두어 정규식을 컴파일하여 추출기를 생성합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Ok(Self {
            regex: Regex::new(GLOG_PATTERN)?,
        })
    }

    /// 메시지 필드에 glog 접두어가 있으면 추출하여 레코드를 갱신합니다.
    ///
    /// 접두어가 없으면 아무것도 바꾸지 않고 `false`를 반환합니다.
    /// 숫자 구성 요소를 해석할 수 없으면 0으로 취급하며, 범위를 넘는 값은
    /// 다음 단위로 넘어가도록 정규화합니다 (예: 13월 → 다음 해 1월).
    pub fn apply(&self, record: &mut Record, keys: &RecordKeys, now: DateTime<Utc>) -> bool {
        let Some(message) = record.get(&keys.message) else {
            return false;
        };
        let Some(caps) = self.regex.captures(message) else {
            return false;
        };

        let prefix_len = caps.get(0).map_or(0, |m| m.end());
        let letter = caps.get(1).map_or("", |m| m.as_str());
        let level = glog_level(letter).unwrap_or_default();
        let number = |idx: usize| -> i64 {
            caps.get(idx)
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .unwrap_or(0)
        };
        let (month, day, hour, minute, second) =
            (number(2), number(3), number(4), number(5), number(6));
        let remainder = message[prefix_len..].to_owned();

        record.set(keys.message.as_str(), remainder);

        if let Some(ref level_key) = keys.level {
            record.set(level_key.as_str(), level);
        }

        if let Some(ref timestamp_key) = keys.timestamp {
            match normalized_utc(now.year(), month, day, hour, minute, second) {
                Some(ts) => record.set(
                    timestamp_key.as_str(),
                    ts.format(TIMESTAMP_FORMAT).to_string(),
                ),
                None => tracing::debug!(
                    month,
                    day,
                    hour,
                    minute,
                    second,
                    "glog timestamp out of representable range, keeping default"
                ),
            }
        }

        true
    }
}

/// 범위를 넘는 구성 요소를 다음 단위로 넘겨 UTC 시각을 만듭니다.
fn normalized_utc(
    year: i32,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
) -> Option<DateTime<Utc>> {
    let months = month - 1;
    let year = i64::from(year) + months.div_euclid(12);
    let month = months.rem_euclid(12) + 1;

    let first_of_month = NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        1,
    )?
    .and_hms_opt(0, 0, 0)?;

    let offset = Duration::try_days(day - 1)?
        .checked_add(&Duration::try_hours(hour)?)?
        .checked_add(&Duration::try_minutes(minute)?)?
        .checked_add(&Duration::try_seconds(second)?)?;

    let naive = first_of_month.checked_add_signed(offset)?;
    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}
