//! 전처리 단계 -- 다른 추출 단계보다 먼저 원본 메시지에 적용되는 범용 정규식
//!
//! 특정 로그 형식과 무관한 필드(스레드 이름, 요청 ID 등)를 뽑아내는 데 씁니다.
//! 매칭되지 않으면 아무 일도 하지 않습니다.

use regex::Regex;

use crate::error::LogPipelineError;
use crate::record::Record;

/// 전처리 정규식
pub struct Preprocessor {
    regex: Regex,
}

impl Preprocessor {
    /// 정규식을 컴파일하여 전처리기를 생성합니다.
    pub fn new(pattern: &str) -> Result<Self, LogPipelineError> {
        let regex = Regex::new(pattern).map_err(|e| LogPipelineError::Config {
            field: "preprocess".to_owned(),
            reason: format!("invalid regex: {e}"),
        })?;
        Ok(Self { regex })
    }

    /// 메시지 필드에 정규식을 적용하고 named capture를 병합합니다.
    ///
    /// 매칭되면 `true`를 반환합니다.
    pub fn apply(&self, record: &mut Record, message_key: &str) -> bool {
        let Some(message) = record.get(message_key) else {
            return false;
        };
        let message = message.to_owned();
        match self.regex.captures(&message) {
            Some(caps) => {
                record.merge_captures(&self.regex, &caps);
                true
            }
            None => false,
        }
    }
}
