//! 메트릭 싱크 -- 라인마다 투영된 레이블로 카운터를 증가시킵니다.
//!
//! - [`PrometheusSink`]: `metrics` 파사드를 통해 전역 Prometheus 레코더에 기록 (pull)
//! - [`StatsdSink`]: DogStatsD 카운터 데이터그램을 UDP로 전송 (push)
//!
//! 싱크는 라인 처리기와 독립된 자원입니다. 전송 실패는 해당 라인의 메트릭만
//! 잃을 뿐 출력이나 다음 라인 처리에 영향을 주지 않습니다.

pub mod prometheus;
pub mod statsd;

pub use prometheus::PrometheusSink;
pub use statsd::StatsdSink;

use crate::error::LogPipelineError;
use crate::record::Record;

/// 메트릭 싱크 trait
///
/// 새로운 메트릭 백엔드를 지원하려면 이 trait을 구현합니다.
pub trait MetricSink: Send + Sync {
    /// 싱크 이름 (로그와 자체 메트릭 레이블에 사용)
    fn name(&self) -> &str;

    /// 레이블 집합으로 카운터를 1 증가시킵니다.
    fn increment(&self, labels: &Record) -> Result<(), LogPipelineError>;
}
