//! 순서 보존 레코드 -- 한 입력 라인을 표현하는 키-값 컨테이너
//!
//! [`Record`]는 필드가 처음 삽입된 순서를 기억하고, JSON 직렬화 시 그 순서대로
//! 멤버를 출력합니다. 같은 키를 다시 설정하면 위치는 그대로 두고 값만 바꿉니다.
//!
//! # 사용 예시
//! ```
//! use logrecycler_pipeline::record::Record;
//!
//! let mut record = Record::new();
//! record.set("level", "INFO");
//! record.set("message", "hello");
//! record.set("level", "WARN");
//! assert_eq!(record.to_json().unwrap(), r#"{"level":"WARN","message":"hello"}"#);
//! ```

use std::collections::HashMap;

use regex::{Captures, Regex};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// 타임스탬프 필드 출력 형식 (UTC, 밀리초 정밀도)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// 삽입 순서를 보존하는 문자열 키-값 레코드
///
/// 키 순서는 `keys`가, 값은 `values`가 보관합니다.
/// 모든 값은 문자열이며 타입 추론을 하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    keys: Vec<String>,
    values: HashMap<String, String>,
}

impl Record {
    /// 빈 레코드를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드 수를 미리 알 때 사용합니다.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: HashMap::with_capacity(capacity),
        }
    }

    /// 필드를 삽입하거나 갱신합니다.
    ///
    /// 이미 있는 키는 값만 바뀌고 순서상 위치는 유지됩니다.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.values.get_mut(&key) {
            Some(slot) => *slot = value,
            None => {
                self.keys.push(key.clone());
                self.values.insert(key, value);
            }
        }
    }

    /// 필드 값을 조회합니다.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 필드 존재 여부
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// 필드를 삭제하고 값을 반환합니다.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let value = self.values.remove(key)?;
        self.keys.retain(|k| k != key);
        Some(value)
    }

    /// 정규식 매칭 결과의 named capture를 레코드에 병합합니다.
    ///
    /// 패턴에 선언된 순서대로 처리하며, 이름 없는 그룹과
    /// 매칭에 참여하지 않은 그룹은 건너뜁니다.
    pub fn merge_captures(&mut self, regex: &Regex, captures: &Captures<'_>) {
        for (idx, name) in regex.capture_names().enumerate() {
            let Some(name) = name else {
                continue;
            };
            if let Some(matched) = captures.get(idx) {
                self.set(name, matched.as_str());
            }
        }
    }

    /// 정적 (키, 값) 목록을 순서대로 병합합니다.
    pub fn merge_static(&mut self, fields: &[(String, String)]) {
        for (key, value) in fields {
            self.set(key.as_str(), value.as_str());
        }
    }

    /// 삽입 순서대로 (키, 값)을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .iter()
            .filter_map(|k| self.values.get(k).map(|v| (k.as_str(), v.as_str())))
    }

    /// 삽입 순서대로 키를 순회합니다.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// 필드 수
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 삽입 순서를 따르는 JSON 객체 텍스트로 직렬화합니다.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.set(key, value);
        }
        record
    }
}
