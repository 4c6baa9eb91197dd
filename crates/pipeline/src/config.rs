//! 레코드 필드 키 설정
//!
//! core의 [`RecyclerConfig`](logrecycler_core::config::RecyclerConfig)에서
//! 각 단계가 레코드를 채울 때 쓰는 필드 이름을 추출합니다.

use logrecycler_core::config::RecyclerConfig;

/// 규칙/glog로 덮어쓰기 전의 기본 레벨
pub const DEFAULT_LEVEL: &str = "INFO";

/// 레코드 필드 키
///
/// `timestamp`와 `level`은 `None`이면 해당 필드를 아예 만들지 않습니다.
/// 메시지 필드는 항상 존재합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKeys {
    /// 타임스탬프 필드 키
    pub timestamp: Option<String>,
    /// 레벨 필드 키
    pub level: Option<String>,
    /// 메시지 필드 키
    pub message: String,
}

impl RecordKeys {
    /// core 설정에서 키를 추출합니다. 빈 키는 비활성으로 취급합니다.
    pub fn from_core(config: &RecyclerConfig) -> Self {
        Self {
            timestamp: config.timestamp_key().map(str::to_owned),
            level: config.level_key().map(str::to_owned),
            message: config.message_key.clone(),
        }
    }
}

impl Default for RecordKeys {
    fn default() -> Self {
        Self::from_core(&RecyclerConfig::default())
    }
}
