//! StatsD 싱크
//!
//! 증가 한 번마다 DogStatsD 카운터 데이터그램 하나를 UDP로 보냅니다.
//!
//! # 데이터그램 형식
//! ```text
//! <metric>:1|c|#key1:value1,key2:value2
//! ```
//! 레이블이 없으면 `|#...` 부분을 생략합니다.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use super::MetricSink;
use crate::error::LogPipelineError;
use crate::record::Record;

/// StatsD UDP 카운터 싱크
pub struct StatsdSink {
    socket: UdpSocket,
    target: SocketAddr,
    metric: String,
}

impl StatsdSink {
    /// 대상 주소를 해석하고 UDP 소켓을 연결합니다.
    ///
    /// 소켓은 논블로킹이므로 전송이 막히면 해당 증가분을 버리고 에러를 반환합니다.
    pub fn connect(address: &str, metric: impl Into<String>) -> Result<Self, LogPipelineError> {
        let target = address
            .to_socket_addrs()
            .map_err(|e| sink_error(format!("failed to resolve '{address}': {e}")))?
            .next()
            .ok_or_else(|| sink_error(format!("'{address}' resolved to no addresses")))?;

        let bind_addr: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };

        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(target)?;
        socket.set_nonblocking(true)?;

        tracing::info!(target = %target, "statsd sink connected");

        Ok(Self {
            socket,
            target,
            metric: metric.into(),
        })
    }

    /// 전송 대상 주소
    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl MetricSink for StatsdSink {
    fn name(&self) -> &str {
        "statsd"
    }

    fn increment(&self, labels: &Record) -> Result<(), LogPipelineError> {
        let datagram = format_counter(&self.metric, labels);
        self.socket
            .send(datagram.as_bytes())
            .map_err(|e| sink_error(format!("send to {} failed: {e}", self.target)))?;
        Ok(())
    }
}

/// 카운터 증가 데이터그램을 만듭니다.
pub fn format_counter(metric: &str, labels: &Record) -> String {
    let mut datagram = format!("{}:1|c", sanitize(metric));
    for (idx, (key, value)) in labels.iter().enumerate() {
        datagram.push_str(if idx == 0 { "|#" } else { "," });
        datagram.push_str(&sanitize(key));
        datagram.push(':');
        datagram.push_str(&sanitize(value));
    }
    datagram
}

/// 프로토콜 구분자와 개행을 `_`로 치환합니다.
fn sanitize(text: &str) -> String {
    text.replace(['|', ',', '#', '\n', '\r'], "_")
}

fn sink_error(reason: String) -> LogPipelineError {
    LogPipelineError::Sink {
        sink: "statsd".to_owned(),
        reason,
    }
}
