//! 라인 파이프라인 에러 타입
//!
//! [`LogPipelineError`]는 처리기 구성, 출력, 메트릭 싱크에서 발생하는 에러를 표현합니다.
//! 라인 단위 변환 자체에는 실패 경로가 없습니다. 매칭되지 않는 정규식은 정상적인
//! no-op이며 에러가 아닙니다.
//! `From<LogPipelineError> for RecyclerError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use logrecycler_core::error::{ConfigError, RecyclerError};

/// 라인 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// 패턴 규칙 검증 실패
    #[error("rule validation error: patterns[{index}]: {reason}")]
    RuleValidation {
        /// 규칙 순번 (설정 파일 내 위치)
        index: usize,
        /// 검증 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 메트릭 싱크 전송 실패
    #[error("sink error: {sink}: {reason}")]
    Sink {
        /// 싱크 이름 (prometheus, statsd)
        sink: String,
        /// 실패 사유
        reason: String,
    },

    /// 레코드 직렬화 실패
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<LogPipelineError> for RecyclerError {
    fn from(err: LogPipelineError) -> Self {
        match err {
            LogPipelineError::Config { field, reason } => {
                RecyclerError::Config(ConfigError::InvalidValue { field, reason })
            }
            LogPipelineError::Io(e) => RecyclerError::Io(e),
            other => RecyclerError::Pipeline(other.to_string()),
        }
    }
}

impl From<RecyclerError> for LogPipelineError {
    fn from(err: RecyclerError) -> Self {
        match err {
            RecyclerError::Config(ConfigError::InvalidValue { field, reason }) => {
                LogPipelineError::Config { field, reason }
            }
            RecyclerError::Io(e) => LogPipelineError::Io(e),
            other => LogPipelineError::Config {
                field: "config".to_owned(),
                reason: other.to_string(),
            },
        }
    }
}
