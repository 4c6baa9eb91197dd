//! 라인 처리기 -- 단계별 추출기를 라인 단위 순서로 연결합니다.
//!
//! # 라인 처리 순서
//! ```text
//! 기본 필드 → 전처리 → glog 추출 → 패턴 규칙 → JSON 출력 → 메시지 제거 → 레이블 투영 → 싱크
//!  ts/level/msg   (선택)     (선택)      첫 매칭    (discard면 여기서 종료)
//! ```
//!
//! 처리는 호출한 스레드에서 동기적으로 끝납니다. 라인 간 상태는 공유하지 않으며
//! 레코드는 라인마다 새로 만들어 처리 후 버립니다.
//!
//! # 사용 예시
//! ```
//! use logrecycler_core::config::RecyclerConfig;
//! use logrecycler_pipeline::LineProcessorBuilder;
//!
//! let config = RecyclerConfig::parse("level_key: level").unwrap();
//! let processor = LineProcessorBuilder::new().config(config).build().unwrap();
//!
//! let mut out = Vec::new();
//! processor.process_line("hello", &mut out).unwrap();
//! assert_eq!(out, b"{\"level\":\"INFO\",\"message\":\"hello\"}\n");
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};
use metrics::counter;

use logrecycler_core::config::RecyclerConfig;
use logrecycler_core::metrics as names;

use crate::config::{DEFAULT_LEVEL, RecordKeys};
use crate::error::LogPipelineError;
use crate::glog::GlogExtractor;
use crate::labels::project_labels;
use crate::preprocess::Preprocessor;
use crate::record::{Record, TIMESTAMP_FORMAT};
use crate::rule::{RuleEngine, RuleOutcome};
use crate::sink::MetricSink;

/// 현재 시각 공급 함수
pub type Clock = fn() -> DateTime<Utc>;

/// 한 라인의 처리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// JSON 레코드를 출력하고 싱크에 전송함
    Emitted,
    /// discard 규칙에 의해 버려짐
    Discarded,
}

/// 변환이 끝난 라인 (출력 전)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedLine<'a> {
    /// 완성된 레코드
    pub record: Record,
    /// 매칭된 규칙의 메트릭 레이블 제한
    pub metric_labels: Option<&'a [String]>,
}

/// 라인 처리기
pub struct LineProcessor {
    keys: RecordKeys,
    preprocessor: Option<Preprocessor>,
    glog: Option<GlogExtractor>,
    rules: RuleEngine,
    sinks: Vec<Box<dyn MetricSink>>,
    clock: Clock,
}

impl LineProcessor {
    /// 레코드 필드 키
    pub fn keys(&self) -> &RecordKeys {
        &self.keys
    }

    /// 패턴 규칙 엔진
    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    /// 연결된 싱크 이름 목록
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// 라인을 레코드로 변환합니다. discard 규칙에 매칭되면 `None`을 반환합니다.
    pub fn transform(&self, line: &str) -> Option<TransformedLine<'_>> {
        let now = (self.clock)();
        let mut record = Record::with_capacity(4);

        if let Some(ref key) = self.keys.timestamp {
            record.set(key.as_str(), now.format(TIMESTAMP_FORMAT).to_string());
        }
        if let Some(ref key) = self.keys.level {
            record.set(key.as_str(), DEFAULT_LEVEL);
        }
        record.set(self.keys.message.as_str(), line);

        if let Some(ref preprocessor) = self.preprocessor {
            preprocessor.apply(&mut record, &self.keys.message);
        }

        if let Some(ref glog) = self.glog {
            glog.apply(&mut record, &self.keys, now);
        }

        let metric_labels = match self.rules.apply(&mut record, &self.keys) {
            RuleOutcome::Discard { index } => {
                counter!(names::RULE_MATCHES_TOTAL).increment(1);
                tracing::trace!(rule = index, "line discarded");
                return None;
            }
            RuleOutcome::Applied {
                index,
                metric_labels,
            } => {
                counter!(names::RULE_MATCHES_TOTAL).increment(1);
                tracing::trace!(rule = index, "pattern rule applied");
                metric_labels
            }
            RuleOutcome::NoMatch => None,
        };

        Some(TransformedLine {
            record,
            metric_labels,
        })
    }

    /// 라인 하나를 처리합니다.
    ///
    /// discard되지 않았다면 JSON 레코드 한 줄을 `out`에 쓰고 플러시한 뒤,
    /// 출력 성공 여부와 관계없이 모든 싱크에 레이블을 전송합니다.
    /// 출력 실패만 에러로 반환되며 싱크 실패는 로그로 남기고 넘어갑니다.
    pub fn process_line<W: Write + ?Sized>(
        &self,
        line: &str,
        out: &mut W,
    ) -> Result<LineOutcome, LogPipelineError> {
        counter!(names::LINES_READ_TOTAL).increment(1);

        let Some(TransformedLine {
            mut record,
            metric_labels,
        }) = self.transform(line)
        else {
            counter!(names::LINES_DISCARDED_TOTAL).increment(1);
            return Ok(LineOutcome::Discarded);
        };

        let written = write_record(&record, out);
        if written.is_ok() {
            counter!(names::LINES_EMITTED_TOTAL).increment(1);
        }

        // 메시지는 레이블로 쓰지 않음
        record.remove(&self.keys.message);
        let labels = project_labels(record, metric_labels);
        self.dispatch(&labels);

        written.map(|()| LineOutcome::Emitted)
    }

    /// 모든 싱크에 레이블 집합을 전송합니다. 실패한 싱크는 건너뜁니다.
    pub fn dispatch(&self, labels: &Record) {
        for sink in &self.sinks {
            if let Err(e) = sink.increment(labels) {
                counter!(names::SINK_ERRORS_TOTAL, names::LABEL_SINK => sink.name().to_owned())
                    .increment(1);
                tracing::warn!(sink = sink.name(), error = %e, "metric increment failed");
            }
        }
    }
}

fn write_record<W: Write + ?Sized>(record: &Record, out: &mut W) -> Result<(), LogPipelineError> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// 라인 처리기 빌더
///
/// 설정, 싱크, 시계를 조합합니다.
pub struct LineProcessorBuilder {
    config: RecyclerConfig,
    sinks: Vec<Box<dyn MetricSink>>,
    clock: Clock,
}

impl LineProcessorBuilder {
    /// 기본 설정으로 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: RecyclerConfig::default(),
            sinks: Vec::new(),
            clock: Utc::now,
        }
    }

    /// 설정을 지정합니다.
    pub fn config(mut self, config: RecyclerConfig) -> Self {
        self.config = config;
        self
    }

    /// 메트릭 싱크를 추가합니다. 추가한 순서대로 호출됩니다.
    pub fn sink(mut self, sink: Box<dyn MetricSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// 현재 시각 공급 함수를 지정합니다.
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// 설정을 검증하고 정규식을 컴파일하여 처리기를 생성합니다.
    pub fn build(self) -> Result<LineProcessor, LogPipelineError> {
        self.config.validate()?;

        let preprocessor = self
            .config
            .preprocess
            .as_deref()
            .map(Preprocessor::new)
            .transpose()?;

        let glog = if self.config.glog {
            Some(GlogExtractor::new()?)
        } else {
            None
        };

        let rules = RuleEngine::from_config(&self.config.patterns)?;

        tracing::info!(
            rules = rules.len(),
            preprocess = preprocessor.is_some(),
            glog = glog.is_some(),
            sinks = self.sinks.len(),
            "line processor ready"
        );

        Ok(LineProcessor {
            keys: RecordKeys::from_core(&self.config),
            preprocessor,
            glog,
            rules,
            sinks: self.sinks,
            clock: self.clock,
        })
    }
}

impl Default for LineProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
