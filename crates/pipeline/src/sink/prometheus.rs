//! Prometheus 싱크
//!
//! 레이블별 카운터를 `metrics` 파사드로 기록합니다. 실제 노출은 바이너리가 설치하는
//! `metrics-exporter-prometheus` 레코더의 `/metrics` 엔드포인트가 담당합니다.
//! 레코더가 설치되지 않은 상태에서는 기록이 무시됩니다.

use metrics::{Label, counter};

use super::MetricSink;
use crate::error::LogPipelineError;
use crate::record::Record;

/// Prometheus 카운터 싱크
pub struct PrometheusSink {
    metric: String,
}

impl PrometheusSink {
    /// 카운터 이름으로 싱크를 생성합니다.
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
        }
    }

    /// 카운터 이름
    pub fn metric(&self) -> &str {
        &self.metric
    }
}

impl MetricSink for PrometheusSink {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn increment(&self, labels: &Record) -> Result<(), LogPipelineError> {
        let labels: Vec<Label> = labels
            .iter()
            .map(|(key, value)| Label::new(key.to_owned(), value.to_owned()))
            .collect();
        counter!(self.metric.clone(), labels).increment(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn increments_labelled_counter() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let sink = PrometheusSink::new("test_lines_total");

        let labels: Record = [("level", "INFO"), ("user", "alice")].into_iter().collect();
        metrics::with_local_recorder(&recorder, || {
            sink.increment(&labels).unwrap();
            sink.increment(&labels).unwrap();
        });

        let rendered = handle.render();
        assert!(
            rendered.contains(r#"test_lines_total{level="INFO",user="alice"} 2"#),
            "{rendered}"
        );
    }

    #[test]
    fn empty_label_set_uses_bare_counter() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let sink = PrometheusSink::new("bare_lines_total");

        metrics::with_local_recorder(&recorder, || {
            sink.increment(&Record::new()).unwrap();
        });

        assert!(handle.render().contains("bare_lines_total 1"));
    }

    #[test]
    fn without_recorder_increment_is_noop() {
        let sink = PrometheusSink::new("unrecorded_total");
        sink.increment(&Record::new()).unwrap();
        assert_eq!(sink.name(), "prometheus");
        assert_eq!(sink.metric(), "unrecorded_total");
    }
}
