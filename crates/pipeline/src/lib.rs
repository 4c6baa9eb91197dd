#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`record`]: 삽입 순서를 보존하는 키-값 레코드와 JSON 직렬화
//! - [`preprocess`]: 범용 전처리 정규식
//! - [`glog`]: glog 접두어 추출 (레벨, 타임스탬프)
//! - [`rule`]: 첫 매칭 규칙만 적용하는 패턴 규칙 엔진
//! - [`labels`]: 메트릭 레이블 투영
//! - [`sink`]: Prometheus / StatsD 메트릭 싱크
//! - [`processor`]: 라인 단위 오케스트레이션
//! - [`config`]: 레코드 필드 키
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! line -> Record -> Preprocessor -> GlogExtractor -> RuleEngine -> JSON out
//!                                                        |
//!                                            project_labels -> MetricSink(s)
//! ```

pub mod config;
pub mod error;
pub mod glog;
pub mod labels;
pub mod preprocess;
pub mod processor;
pub mod record;
pub mod rule;
pub mod sink;

// --- 주요 타입 re-export ---

// 처리기
pub use processor::{LineOutcome, LineProcessor, LineProcessorBuilder, TransformedLine};

// 레코드
pub use record::{Record, TIMESTAMP_FORMAT};

// 설정
pub use config::RecordKeys;

// 에러
pub use error::LogPipelineError;

// 규칙 엔진
pub use rule::{PatternRule, RuleEngine, RuleOutcome};

// 싱크
pub use sink::{MetricSink, PrometheusSink, StatsdSink};
