//! Prometheus text exposition.

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, TextEncoder};

/// Content type of [`encode_text`] output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Encode gathered families in the text exposition format.
pub fn encode_text(families: &[MetricFamily]) -> prometheus::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(families, &mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use prometheus::core::Collector;
    use prometheus::{GaugeVec, IntCounterVec, Opts};

    use super::*;

    fn encode(families: Vec<MetricFamily>) -> String {
        String::from_utf8(encode_text(&families).unwrap()).unwrap()
    }

    #[test]
    fn help_and_type_lines() {
        let errors = IntCounterVec::new(Opts::new("errors_total", "Errors seen."), &["subsystem"])
            .unwrap();
        errors.with_label_values(&["volume"]).inc_by(3);

        let out = encode(errors.collect());
        assert_eq!(
            out,
            "# HELP errors_total Errors seen.\n\
             # TYPE errors_total counter\n\
             errors_total{subsystem=\"volume\"} 3\n"
        );
    }

    #[test]
    fn escapes_label_values_and_help() {
        let sizes = GaugeVec::new(Opts::new("size_bytes", "Size in\nbytes \\ total"), &["name"])
            .unwrap();
        sizes.with_label_values(&["a\"b\\c\nd"]).set(1.0);

        let out = encode(sizes.collect());
        assert!(out.contains("# HELP size_bytes Size in\\nbytes \\\\ total\n"), "{out}");
        assert!(out.contains("size_bytes{name=\"a\\\"b\\\\c\\nd\"} 1\n"), "{out}");
    }

    #[test]
    fn large_gauge_values_print_without_exponent() {
        let sizes = GaugeVec::new(Opts::new("size_bytes", "Size."), &["id"]).unwrap();
        sizes.with_label_values(&["v1"]).set(10_737_418_240.0);

        let out = encode(sizes.collect());
        assert!(out.contains("size_bytes{id=\"v1\"} 10737418240\n"), "{out}");
    }
}
