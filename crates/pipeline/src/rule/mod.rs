//! 패턴 규칙 엔진 -- 첫 매칭 규칙 하나만 적용
//!
//! [`RuleEngine`]은 설정된 순서대로 규칙을 평가하다가 처음 매칭된 규칙의 효과만
//! 레코드에 적용하고 멈춥니다. 우선순위 목록이지 누적이 아닙니다.
//!
//! # 매칭 시 적용 순서
//! 1. `discard`면 즉시 [`RuleOutcome::Discard`] 반환 (레코드 변경 없음)
//! 2. 레벨 오버라이드 (레벨 필드가 활성일 때만)
//! 3. named capture 병합
//! 4. 정적 필드 병합
//! 5. 메트릭 레이블 목록 기록
//!
//! # 사용 예시
//! ```
//! use logrecycler_pipeline::config::RecordKeys;
//! use logrecycler_pipeline::record::Record;
//! use logrecycler_pipeline::rule::{PatternRule, RuleEngine, RuleOutcome};
//!
//! let engine = RuleEngine::new(vec![
//!     PatternRule::new(r"user=(?P<user>\w+)").unwrap().with_metric_labels(["user"]),
//! ]);
//! let mut record = Record::new();
//! record.set("message", "user=alice logged in");
//!
//! let outcome = engine.apply(&mut record, &RecordKeys::default());
//! assert!(matches!(outcome, RuleOutcome::Applied { index: 0, .. }));
//! assert_eq!(record.get("user"), Some("alice"));
//! ```

pub mod types;

pub use types::PatternRule;

use logrecycler_core::config::PatternConfig;

use crate::config::RecordKeys;
use crate::error::LogPipelineError;
use crate::record::Record;

/// 규칙 평가 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome<'a> {
    /// 매칭된 규칙 없음
    NoMatch,
    /// discard 규칙에 매칭됨 -- 출력과 메트릭 전송 모두 생략
    Discard {
        /// 매칭된 규칙 순번
        index: usize,
    },
    /// 규칙 효과가 적용됨
    Applied {
        /// 매칭된 규칙 순번
        index: usize,
        /// 메트릭 레이블 제한 (없으면 전체 레코드)
        metric_labels: Option<&'a [String]>,
    },
}

impl RuleOutcome<'_> {
    /// 이 라인을 버려야 하는지 여부
    pub fn is_discard(&self) -> bool {
        matches!(self, Self::Discard { .. })
    }

    /// 메트릭 레이블 제한 목록
    pub fn metric_labels(&self) -> Option<&[String]> {
        match self {
            Self::Applied { metric_labels, .. } => *metric_labels,
            Self::NoMatch | Self::Discard { .. } => None,
        }
    }
}

/// 순서가 있는 패턴 규칙 목록
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<PatternRule>,
}

impl RuleEngine {
    /// 주어진 순서대로 평가할 규칙 엔진을 생성합니다.
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// YAML 설정의 규칙 목록을 컴파일합니다.
    pub fn from_config(patterns: &[PatternConfig]) -> Result<Self, LogPipelineError> {
        let rules = patterns
            .iter()
            .enumerate()
            .map(|(idx, config)| PatternRule::compile(idx, config))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = rules.len(), "compiled pattern rules");
        Ok(Self { rules })
    }

    /// 등록된 규칙 수
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// 규칙이 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 등록된 규칙 목록
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// 메시지 필드에 규칙을 순서대로 평가하고 첫 매칭 규칙을 적용합니다.
    pub fn apply(&self, record: &mut Record, keys: &RecordKeys) -> RuleOutcome<'_> {
        if self.rules.is_empty() {
            return RuleOutcome::NoMatch;
        }

        let Some(message) = record.get(&keys.message) else {
            return RuleOutcome::NoMatch;
        };
        let message = message.to_owned();

        for (index, rule) in self.rules.iter().enumerate() {
            let Some(caps) = rule.regex.captures(&message) else {
                continue;
            };

            if rule.discard {
                return RuleOutcome::Discard { index };
            }

            if let (Some(level), Some(level_key)) = (&rule.level, &keys.level) {
                record.set(level_key.as_str(), level.as_str());
            }

            record.merge_captures(&rule.regex, &caps);
            record.merge_static(&rule.add);

            // 한 라인에는 규칙 하나만 적용
            return RuleOutcome::Applied {
                index,
                metric_labels: rule.metric_labels(),
            };
        }

        RuleOutcome::NoMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> RecordKeys {
        RecordKeys {
            timestamp: None,
            level: Some("level".to_owned()),
            message: "message".to_owned(),
        }
    }

    fn record_with(message: &str) -> Record {
        let mut record = Record::new();
        record.set("level", "INFO");
        record.set("message", message);
        record
    }

    #[test]
    fn empty_engine_never_matches() {
        let engine = RuleEngine::default();
        let mut record = record_with("anything");
        assert_eq!(engine.apply(&mut record, &keys()), RuleOutcome::NoMatch);
    }

    #[test]
    fn first_matching_rule_wins() {
        let engine = RuleEngine::new(vec![
            PatternRule::new("timeout")
                .unwrap()
                .with_level("WARN")
                .with_field("rule", "first"),
            PatternRule::new("time")
                .unwrap()
                .with_level("ERROR")
                .with_field("rule", "second")
                .with_field("only_second", "yes"),
        ]);
        let mut record = record_with("request timeout after 5s");

        let outcome = engine.apply(&mut record, &keys());
        assert!(matches!(outcome, RuleOutcome::Applied { index: 0, .. }));
        assert_eq!(record.get("level"), Some("WARN"));
        assert_eq!(record.get("rule"), Some("first"));
        assert!(!record.contains_key("only_second"));
    }

    #[test]
    fn later_rule_applies_when_earlier_misses() {
        let engine = RuleEngine::new(vec![
            PatternRule::new("^never$").unwrap().with_level("FATAL"),
            PatternRule::new("disk").unwrap().with_level("ERROR"),
        ]);
        let mut record = record_with("disk full");

        let outcome = engine.apply(&mut record, &keys());
        assert!(matches!(outcome, RuleOutcome::Applied { index: 1, .. }));
        assert_eq!(record.get("level"), Some("ERROR"));
    }

    #[test]
    fn discard_rule_stops_without_changes() {
        let engine = RuleEngine::new(vec![
            PatternRule::new("health").unwrap().discarding(),
            PatternRule::new("health").unwrap().with_level("ERROR"),
        ]);
        let mut record = record_with("GET /health 200");
        let before = record.clone();

        let outcome = engine.apply(&mut record, &keys());
        assert_eq!(outcome, RuleOutcome::Discard { index: 0 });
        assert!(outcome.is_discard());
        assert_eq!(record, before);
    }

    #[test]
    fn captures_merge_before_static_fields() {
        let engine = RuleEngine::new(vec![
            PatternRule::new(r"user=(?P<user>\w+) action=(?P<action>\w+)")
                .unwrap()
                .with_field("team", "auth"),
        ]);
        let mut record = record_with("user=alice action=login");
        engine.apply(&mut record, &keys());

        assert_eq!(
            record.to_json().unwrap(),
            r#"{"level":"INFO","message":"user=alice action=login","user":"alice","action":"login","team":"auth"}"#
        );
    }

    #[test]
    fn static_field_overrides_capture_with_same_name() {
        let engine = RuleEngine::new(vec![
            PatternRule::new(r"code=(?P<code>\d+)")
                .unwrap()
                .with_field("code", "redacted"),
        ]);
        let mut record = record_with("code=500");
        engine.apply(&mut record, &keys());
        assert_eq!(record.get("code"), Some("redacted"));
    }

    #[test]
    fn level_override_ignored_when_level_disabled() {
        let engine = RuleEngine::new(vec![PatternRule::new("x").unwrap().with_level("ERROR")]);
        let keys = RecordKeys {
            timestamp: None,
            level: None,
            message: "message".to_owned(),
        };
        let mut record = Record::new();
        record.set("message", "x");

        engine.apply(&mut record, &keys);
        assert_eq!(record.to_json().unwrap(), r#"{"message":"x"}"#);
    }

    #[test]
    fn outcome_carries_metric_labels() {
        let engine = RuleEngine::new(vec![
            PatternRule::new("x").unwrap().with_metric_labels(["user"]),
        ]);
        let mut record = record_with("x");
        let outcome = engine.apply(&mut record, &keys());
        assert_eq!(outcome.metric_labels(), Some(&["user".to_owned()][..]));
    }

    #[test]
    fn no_match_has_no_label_restriction() {
        let engine = RuleEngine::new(vec![
            PatternRule::new("zzz").unwrap().with_metric_labels(["user"]),
        ]);
        let mut record = record_with("abc");
        let outcome = engine.apply(&mut record, &keys());
        assert_eq!(outcome, RuleOutcome::NoMatch);
        assert_eq!(outcome.metric_labels(), None);
    }

    #[test]
    fn from_config_preserves_order() {
        let patterns: Vec<PatternConfig> = serde_yaml::from_str(
            r#"
- regex: a
  level: WARN
- regex: b
  discard: true
"#,
        )
        .unwrap();
        let engine = RuleEngine::from_config(&patterns).unwrap();
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.rules()[0].pattern(), "a");
        assert!(engine.rules()[1].is_discard());
    }
}
