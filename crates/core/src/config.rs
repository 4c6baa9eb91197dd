//! 설정 관리 -- logrecycler.yaml 파싱 및 검증
//!
//! [`RecyclerConfig`]는 라인 처리기와 메트릭 싱크가 읽는 최상위 설정입니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`LOGRECYCLER_STATSD_ADDRESS=127.0.0.1:8125` 형식)
//! 2. 설정 파일 (`logrecycler.yaml`)
//! 3. 기본값 (`Default` 구현)
//!
//! # YAML 예시
//! ```yaml
//! timestamp_key: ts
//! level_key: level
//! glog: true
//! patterns:
//!   - regex: 'user=(?P<user>\w+)'
//!     level: WARN
//!     add:
//!       team: auth
//!     metric_labels: [user]
//! prometheus:
//!   port: 9090
//! ```
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logrecycler_core::error::RecyclerError> {
//! use logrecycler_core::config::RecyclerConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드 + 검증
//! let config = RecyclerConfig::load("logrecycler.yaml").await?;
//!
//! // YAML 문자열에서 직접 파싱
//! let config = RecyclerConfig::parse("glog: true")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::error::{ConfigError, RecyclerError};

/// 메시지 필드 기본 키
pub const DEFAULT_MESSAGE_KEY: &str = "message";

/// Prometheus 카운터 기본 이름
pub const DEFAULT_PROMETHEUS_METRIC: &str = "logrecycler_lines_total";

/// StatsD 카운터 기본 이름
pub const DEFAULT_STATSD_METRIC: &str = "logrecycler.lines";

/// logrecycler 통합 설정
///
/// `logrecycler.yaml` 파일의 최상위 구조를 나타냅니다.
/// 알 수 없는 키는 오타로 간주하여 거부합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecyclerConfig {
    /// 타임스탬프 필드 키 (없거나 비어 있으면 비활성)
    pub timestamp_key: Option<String>,
    /// 레벨 필드 키 (없거나 비어 있으면 비활성)
    pub level_key: Option<String>,
    /// 메시지 필드 키
    pub message_key: String,
    /// 전처리 정규식 (named capture 그룹을 레코드에 병합)
    pub preprocess: Option<String>,
    /// glog 접두어 추출 활성화
    pub glog: bool,
    /// 순서대로 평가되는 패턴 규칙 목록
    pub patterns: Vec<PatternConfig>,
    /// Prometheus 싱크 설정
    pub prometheus: Option<PrometheusConfig>,
    /// StatsD 싱크 설정
    pub statsd: Option<StatsdConfig>,
}

impl Default for RecyclerConfig {
    fn default() -> Self {
        Self {
            timestamp_key: None,
            level_key: None,
            message_key: DEFAULT_MESSAGE_KEY.to_owned(),
            preprocess: None,
            glog: false,
            patterns: Vec::new(),
            prometheus: None,
            statsd: None,
        }
    }
}

impl RecyclerConfig {
    /// YAML 파일에서 설정을 로드하고 환경변수 오버라이드와 검증을 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RecyclerError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// YAML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, RecyclerError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RecyclerError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                RecyclerError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// YAML 문자열에서 설정을 파싱합니다.
    ///
    /// 빈 문서는 기본 설정으로 취급합니다.
    pub fn parse(yaml_str: &str) -> Result<Self, RecyclerError> {
        if yaml_str.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml_str).map_err(|e| {
            RecyclerError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 싱크 섹션이 없는 상태에서 포트/주소 변수가 주어지면
    /// 기본값으로 섹션을 만든 뒤 덮어씁니다.
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.message_key, "LOGRECYCLER_MESSAGE_KEY");
        override_bool(&mut self.glog, "LOGRECYCLER_GLOG");

        // 해석 가능한 포트일 때만 섹션을 만듦
        if let Some(port) = env_u16("LOGRECYCLER_PROMETHEUS_PORT") {
            self.prometheus
                .get_or_insert_with(PrometheusConfig::default)
                .port = port;
        }

        if std::env::var_os("LOGRECYCLER_STATSD_ADDRESS").is_some() {
            let statsd = self.statsd.get_or_insert_with(StatsdConfig::default);
            override_string(&mut statsd.address, "LOGRECYCLER_STATSD_ADDRESS");
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), RecyclerError> {
        if self.message_key.is_empty() {
            return Err(invalid("message_key", "must not be empty"));
        }

        if let Some(ref pattern) = self.preprocess {
            compile_regex("preprocess", pattern)?;
        }

        for (idx, pattern) in self.patterns.iter().enumerate() {
            pattern.validate(idx)?;
        }

        if let Some(ref prometheus) = self.prometheus {
            if prometheus.metric.is_empty() {
                return Err(invalid("prometheus.metric", "must not be empty"));
            }
            if prometheus.listen_addr.is_empty() {
                return Err(invalid("prometheus.listen_addr", "must not be empty"));
            }
        }

        if let Some(ref statsd) = self.statsd {
            if statsd.metric.is_empty() {
                return Err(invalid("statsd.metric", "must not be empty"));
            }
            validate_host_port(&statsd.address)
                .map_err(|reason| invalid("statsd.address", &reason))?;
        }

        Ok(())
    }

    /// 활성화된 타임스탬프 키를 반환합니다.
    pub fn timestamp_key(&self) -> Option<&str> {
        self.timestamp_key.as_deref().filter(|k| !k.is_empty())
    }

    /// 활성화된 레벨 키를 반환합니다.
    pub fn level_key(&self) -> Option<&str> {
        self.level_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// 패턴 규칙 설정
///
/// 첫 번째로 매칭된 규칙 하나만 적용됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternConfig {
    /// 메시지에 적용할 정규식
    pub regex: String,
    /// 매칭 시 라인을 버림
    #[serde(default)]
    pub discard: bool,
    /// 레벨 오버라이드
    #[serde(default)]
    pub level: Option<String>,
    /// 정적으로 추가할 필드 (선언 순서 유지)
    #[serde(default)]
    pub add: Mapping,
    /// 메트릭 레이블로 노출할 필드 이름
    #[serde(default)]
    pub metric_labels: Option<Vec<String>>,
}

impl PatternConfig {
    /// 규칙 하나를 검증합니다. `idx`는 에러 메시지의 필드 경로에 쓰입니다.
    pub fn validate(&self, idx: usize) -> Result<(), RecyclerError> {
        compile_regex(&format!("patterns[{idx}].regex"), &self.regex)?;

        if let Some(ref level) = self.level {
            if level.is_empty() {
                return Err(invalid(
                    &format!("patterns[{idx}].level"),
                    "must not be empty when given",
                ));
            }
        }

        self.static_fields(idx)?;
        Ok(())
    }

    /// `add` 매핑을 선언 순서대로 (키, 값) 문자열 쌍으로 변환합니다.
    ///
    /// 스칼라 값만 허용하며 숫자/불리언은 리터럴 텍스트로 렌더링합니다.
    pub fn static_fields(&self, idx: usize) -> Result<Vec<(String, String)>, RecyclerError> {
        self.add
            .iter()
            .map(|(key, value)| {
                let key = scalar_to_string(key).ok_or_else(|| {
                    invalid(&format!("patterns[{idx}].add"), "keys must be scalars")
                })?;
                let value = scalar_to_string(value).ok_or_else(|| {
                    invalid(
                        &format!("patterns[{idx}].add.{key}"),
                        "value must be a scalar",
                    )
                })?;
                Ok((key, value))
            })
            .collect()
    }
}

/// Prometheus 싱크 설정 (pull 방식)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrometheusConfig {
    /// 스크레이프 포트
    pub port: u16,
    /// 바인드 주소
    pub listen_addr: String,
    /// 카운터 이름
    pub metric: String,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            port: 9090,
            listen_addr: "0.0.0.0".to_owned(),
            metric: DEFAULT_PROMETHEUS_METRIC.to_owned(),
        }
    }
}

/// StatsD 싱크 설정 (push 방식)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatsdConfig {
    /// 수신 측 주소 (`host:port`)
    pub address: String,
    /// 카운터 이름
    pub metric: String,
}

impl Default for StatsdConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8125".to_owned(),
            metric: DEFAULT_STATSD_METRIC.to_owned(),
        }
    }
}

fn invalid(field: &str, reason: &str) -> RecyclerError {
    RecyclerError::Config(ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.to_owned(),
    })
}

fn compile_regex(field: &str, pattern: &str) -> Result<Regex, RecyclerError> {
    Regex::new(pattern).map_err(|e| invalid(field, &format!("invalid regex: {e}")))
}

fn validate_host_port(address: &str) -> Result<(), String> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| format!("'{address}' must be in host:port form"))?;
    if host.is_empty() {
        return Err(format!("'{address}' is missing a host"));
    }
    port.parse::<u16>()
        .map_err(|_| format!("'{address}' has an invalid port"))?;
    Ok(())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn env_u16(env_key: &str) -> Option<u16> {
    let val = std::env::var(env_key).ok()?;
    match val.parse::<u16>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            );
            None
        }
    }
}
