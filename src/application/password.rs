//! Password-gate cookies.

use tracing::debug;

use super::request::RequestContext;

pub const PASSWORD_COOKIE_PREFIX: &str = "__pp_";

pub fn password_cookie_name(entity_id: &str) -> String {
    format!("{PASSWORD_COOKIE_PREFIX}{entity_id}")
}

/// Whether the visitor already unlocked the protected page or post `entity_id`.
pub fn has_valid_password_cookie(ctx: &dyn RequestContext, entity_id: &str) -> bool {
    match ctx.cookie(&password_cookie_name(entity_id)) {
        Ok(value) => value.is_some_and(|value| !value.is_empty()),
        Err(err) => {
            debug!(entity_id, error = %err, "cookies unavailable");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::request::Unavailable;
    use crate::application::testing::StubContext;

    #[test]
    fn cookie_with_value_unlocks() {
        let ctx = StubContext::default().with_cookie("__pp_page-1", "verified");

        assert!(has_valid_password_cookie(&ctx, "page-1"));
        assert_eq!(ctx.requested(), vec!["__pp_page-1".to_string()]);
    }

    #[test]
    fn empty_or_missing_cookie_does_not_unlock() {
        let ctx = StubContext::default().with_cookie("__pp_page-1", "");

        assert!(!has_valid_password_cookie(&ctx, "page-1"));
        assert!(!has_valid_password_cookie(&ctx, "page-2"));
    }

    #[test]
    fn unavailable_context_does_not_unlock() {
        assert!(!has_valid_password_cookie(&Unavailable, "page-1"));
    }
}
