//! 패턴 규칙 타입
//!
//! YAML의 [`PatternConfig`]를 정규식이 컴파일된 [`PatternRule`]로 변환합니다.

use regex::Regex;

use logrecycler_core::config::PatternConfig;

use crate::error::LogPipelineError;

/// 컴파일된 패턴 규칙
///
/// # YAML 스키마
/// ```yaml
/// patterns:
///   - regex: 'user=(?P<user>\w+)'
///     level: WARN
///     add:
///       team: auth
///     metric_labels: [user]
///   - regex: 'healthcheck'
///     discard: true
/// ```
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub(crate) regex: Regex,
    pub(crate) discard: bool,
    pub(crate) level: Option<String>,
    pub(crate) add: Vec<(String, String)>,
    pub(crate) metric_labels: Option<Vec<String>>,
}

impl PatternRule {
    /// 정규식만 가진 규칙을 생성합니다.
    pub fn new(pattern: &str) -> Result<Self, LogPipelineError> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            discard: false,
            level: None,
            add: Vec::new(),
            metric_labels: None,
        })
    }

    /// YAML 설정에서 규칙을 컴파일합니다. `index`는 에러 메시지에 쓰입니다.
    pub fn compile(index: usize, config: &PatternConfig) -> Result<Self, LogPipelineError> {
        let regex = Regex::new(&config.regex).map_err(|e| LogPipelineError::RuleValidation {
            index,
            reason: format!("invalid regex: {e}"),
        })?;

        if let Some(ref level) = config.level {
            if level.is_empty() {
                return Err(LogPipelineError::RuleValidation {
                    index,
                    reason: "level must not be empty when given".to_owned(),
                });
            }
        }

        let add = config.static_fields(index)?;

        Ok(Self {
            regex,
            discard: config.discard,
            level: config.level.clone(),
            add,
            metric_labels: config.metric_labels.clone(),
        })
    }

    /// 매칭 시 라인을 버리도록 설정합니다.
    pub fn discarding(mut self) -> Self {
        self.discard = true;
        self
    }

    /// 레벨 오버라이드를 설정합니다.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// 정적 필드를 추가합니다. 호출 순서대로 병합됩니다.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add.push((key.into(), value.into()));
        self
    }

    /// 메트릭 레이블로 노출할 필드를 지정합니다.
    pub fn with_metric_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metric_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// 규칙 정규식 원문
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// discard 규칙 여부
    pub fn is_discard(&self) -> bool {
        self.discard
    }

    /// 메트릭 레이블 목록
    pub fn metric_labels(&self) -> Option<&[String]> {
        self.metric_labels.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_from_yaml(yaml: &str) -> PatternConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn compile_from_yaml() {
        let config = pattern_from_yaml(
            r#"
regex: 'user=(?P<user>\w+)'
level: WARN
add:
  team: auth
  port: 8080
metric_labels: [user, team]
"#,
        );
        let rule = PatternRule::compile(0, &config).unwrap();

        assert_eq!(rule.pattern(), r"user=(?P<user>\w+)");
        assert!(!rule.is_discard());
        assert_eq!(rule.level.as_deref(), Some("WARN"));
        assert_eq!(
            rule.add,
            vec![
                ("team".to_owned(), "auth".to_owned()),
                ("port".to_owned(), "8080".to_owned()),
            ]
        );
        assert_eq!(
            rule.metric_labels(),
            Some(&["user".to_owned(), "team".to_owned()][..])
        );
    }

    #[test]
    fn compile_discard_rule() {
        let config = pattern_from_yaml("regex: healthcheck\ndiscard: true");
        let rule = PatternRule::compile(0, &config).unwrap();
        assert!(rule.is_discard());
        assert!(rule.metric_labels().is_none());
    }

    #[test]
    fn compile_reports_rule_index() {
        let config = pattern_from_yaml("regex: '(oops'");
        let err = PatternRule::compile(4, &config).unwrap_err();
        assert!(matches!(err, LogPipelineError::RuleValidation { index: 4, .. }));
    }

    #[test]
    fn compile_rejects_nested_add_value() {
        let config = pattern_from_yaml("regex: x\nadd:\n  a: {b: c}");
        assert!(PatternRule::compile(0, &config).is_err());
    }

    #[test]
    fn unknown_rule_key_is_rejected() {
        let result: Result<PatternConfig, _> = serde_yaml::from_str("regex: x\nlabels: [a]");
        assert!(result.is_err());
    }

    #[test]
    fn builder_methods_compose() {
        let rule = PatternRule::new("x")
            .unwrap()
            .with_level("ERROR")
            .with_field("a", "1")
            .with_field("b", "2")
            .with_metric_labels(["a"]);
        assert_eq!(rule.level.as_deref(), Some("ERROR"));
        assert_eq!(rule.add.len(), 2);
        assert_eq!(rule.metric_labels(), Some(&["a".to_owned()][..]));
    }
}
