//! 자체 텔레메트리 메트릭 상수 및 설명 등록
//!
//! 사용자 정의 카운터(설정의 `prometheus.metric`, `statsd.metric`)와 별개로,
//! logrecycler 자신의 처리량을 기록하는 메트릭 이름을 정의합니다.
//! 전역 레코더가 설치되지 않았다면 `metrics` 매크로 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logrecycler_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logrecycler_core::metrics::LINES_READ_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 싱크 이름 레이블 키 (prometheus, statsd)
pub const LABEL_SINK: &str = "sink";

// ─── 라인 처리 메트릭 ──────────────────────────────────────────────

/// 입력에서 읽은 전체 라인 수 (counter, 버려진 라인 포함)
pub const LINES_READ_TOTAL: &str = "logrecycler_lines_read_total";

/// JSON 레코드로 출력된 라인 수 (counter)
pub const LINES_EMITTED_TOTAL: &str = "logrecycler_lines_emitted_total";

/// discard 규칙으로 버려진 라인 수 (counter)
pub const LINES_DISCARDED_TOTAL: &str = "logrecycler_lines_discarded_total";

/// 패턴 규칙 매칭 수 (counter)
pub const RULE_MATCHES_TOTAL: &str = "logrecycler_rule_matches_total";

/// 메트릭 싱크 전송 실패 수 (counter, label: sink)
pub const SINK_ERRORS_TOTAL: &str = "logrecycler_sink_errors_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 자체 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        LINES_READ_TOTAL,
        "Total number of input lines read, including discarded lines"
    );
    describe_counter!(
        LINES_EMITTED_TOTAL,
        "Total number of JSON records written to the output stream"
    );
    describe_counter!(
        LINES_DISCARDED_TOTAL,
        "Total number of lines dropped by a discard pattern"
    );
    describe_counter!(
        RULE_MATCHES_TOTAL,
        "Total number of lines matched by a pattern rule"
    );
    describe_counter!(
        SINK_ERRORS_TOTAL,
        "Total number of failed metric sink increments"
    );
}
