//! 메트릭 레이블 투영
//!
//! 완성된 레코드(메시지 필드 제거 후)를 메트릭 싱크로 넘길 레이블 집합으로 줄입니다.

use crate::record::Record;

/// 레코드를 메트릭 레이블 집합으로 투영합니다.
///
/// - `labels`가 `Some`이면 목록에 있는 키만 남깁니다. 레코드에 없는 키는 결과에서 빠질 뿐
///   에러가 아닙니다. 결과 순서는 레코드의 순서를 따릅니다.
/// - `None`이면 레코드 전체를 그대로 사용합니다.
pub fn project_labels(record: Record, labels: Option<&[String]>) -> Record {
    match labels {
        None => record,
        Some(names) => record
            .iter()
            .filter(|(key, _)| names.iter().any(|name| name == key))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished_record() -> Record {
        // 메시지 필드는 이미 제거된 상태
        [("level", "INFO"), ("user", "alice"), ("extra", "x")]
            .into_iter()
            .collect()
    }

    #[test]
    fn restricts_to_listed_labels() {
        let labels = vec!["user".to_owned()];
        let projected = project_labels(finished_record(), Some(&labels));
        assert_eq!(projected.to_json().unwrap(), r#"{"user":"alice"}"#);
    }

    #[test]
    fn missing_labels_are_absent() {
        let labels = vec!["user".to_owned(), "region".to_owned()];
        let projected = project_labels(finished_record(), Some(&labels));
        assert_eq!(projected.len(), 1);
        assert!(!projected.contains_key("region"));
    }

    #[test]
    fn empty_label_list_yields_empty_set() {
        let projected = project_labels(finished_record(), Some(&[]));
        assert!(projected.is_empty());
    }

    #[test]
    fn absent_list_keeps_full_record() {
        let projected = project_labels(finished_record(), None);
        assert_eq!(projected, finished_record());
    }

    #[test]
    fn projection_keeps_record_order() {
        let labels = vec!["extra".to_owned(), "level".to_owned()];
        let projected = project_labels(finished_record(), Some(&labels));
        let keys: Vec<&str> = projected.keys().collect();
        assert_eq!(keys, vec!["level", "extra"]);
    }
}
