//! Scalar slices: busy indicator, authentication flag, error banner

use dms_store::Slice;

use crate::action::Action;

pub fn ajax_status(state: Slice<bool>, action: &Action) -> Slice<bool> {
    match action {
        Action::AjaxCallStart => Slice::new(true),
        Action::AjaxCallEnd => Slice::new(false),
        _ => state,
    }
}

pub fn auth(state: Slice<bool>, action: &Action) -> Slice<bool> {
    match action {
        Action::AuthAuthenticate { .. } => Slice::new(true),
        Action::AuthDeauthenticate => Slice::new(false),
        _ => state,
    }
}

pub fn error_message(state: Slice<String>, action: &Action) -> Slice<String> {
    match action {
        Action::ErrorMessageSet(message) => Slice::new(message.clone()),
        Action::ErrorMessageClear => Slice::new(String::new()),
        _ => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ajax_status() {
        let state = ajax_status(Slice::new(false), &Action::AjaxCallStart);
        assert!(*state);
        let state = ajax_status(state, &Action::AjaxCallEnd);
        assert!(!*state);
    }

    #[test]
    fn test_auth_flag() {
        let state = auth(
            Slice::new(false),
            &Action::AuthAuthenticate {
                token: "abc".into(),
            },
        );
        assert!(*state);
        assert!(!*auth(state, &Action::AuthDeauthenticate));
    }

    #[test]
    fn test_error_message() {
        let state = error_message(Slice::default(), &Action::ErrorMessageSet("boom".into()));
        assert_eq!(state.as_str(), "boom");
        assert_eq!(error_message(state, &Action::ErrorMessageClear).as_str(), "");
    }

    #[test]
    fn test_repeated_start_is_still_a_new_snapshot() {
        let state = Slice::new(true);
        let next = ajax_status(state.clone(), &Action::AjaxCallStart);
        assert!(!next.same(&state));
    }

    #[test]
    fn test_unrelated_actions_pass_through() {
        let flag = Slice::new(true);
        assert!(ajax_status(flag.clone(), &Action::CurrentUserLogout).same(&flag));
        assert!(auth(flag.clone(), &Action::AjaxCallEnd).same(&flag));

        let message = Slice::new("kept".to_string());
        assert!(error_message(message.clone(), &Action::AjaxCallEnd).same(&message));
    }
}
