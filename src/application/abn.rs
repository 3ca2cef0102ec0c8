//! A/B/n experiment bucket of the current request.

use tracing::debug;

use super::request::{ABN_BUCKET_HEADER, RequestContext};

/// Bucket forwarded by the edge proxy, or a fresh uniform draw in `[0, 1)`.
///
/// Repeatable bucketing requires the header; without it every call differs.
pub fn get_abn_bucket(ctx: &dyn RequestContext) -> f64 {
    let forwarded = match ctx.header(ABN_BUCKET_HEADER) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, "bucket header unavailable");
            None
        }
    };

    forwarded
        .as_deref()
        .and_then(parse_bucket)
        .unwrap_or_else(rand::random::<f64>)
}

/// A finite number in `[0, 1)`, or `None`.
pub fn parse_bucket(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && (0.0..1.0).contains(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::request::Unavailable;
    use crate::application::testing::StubContext;

    #[test]
    fn accepts_values_in_unit_interval() {
        assert_eq!(parse_bucket("0"), Some(0.0));
        assert_eq!(parse_bucket("0.42"), Some(0.42));
        assert_eq!(parse_bucket(" 0.999 "), Some(0.999));
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        for raw in ["1", "1.5", "-0.1", "abc", "", "NaN", "inf"] {
            assert_eq!(parse_bucket(raw), None, "{raw:?} must be rejected");
        }
    }

    #[test]
    fn header_value_is_used_when_valid() {
        let ctx = StubContext::default().with_header(ABN_BUCKET_HEADER, "0.25");
        assert_eq!(get_abn_bucket(&ctx), 0.25);
    }

    #[test]
    fn invalid_or_missing_header_draws_randomly() {
        let invalid = StubContext::default().with_header(ABN_BUCKET_HEADER, "2");
        for ctx in [&invalid as &dyn RequestContext, &StubContext::default(), &Unavailable] {
            let bucket = get_abn_bucket(ctx);
            assert!((0.0..1.0).contains(&bucket));
        }
    }
}
