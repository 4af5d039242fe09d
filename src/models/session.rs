use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

pub type SharedState = Arc<Mutex<AppState>>;

/// Session handed over by the auth provider after sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub access_token: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Ocean,
    Private,
    Heatmap,
    Sonar,
    Radial,
}

impl View {
    /// Views that stay locked until the user has posted today.
    pub fn is_advanced(self) -> bool {
        matches!(self, View::Heatmap | View::Sonar | View::Radial)
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "ocean" => Ok(View::Ocean),
            "private" => Ok(View::Private),
            "heatmap" => Ok(View::Heatmap),
            "sonar" => Ok(View::Sonar),
            "radial" => Ok(View::Radial),
            other => Err(format!("UNKNOWN_VIEW: {other}")),
        }
    }
}

/// Process-wide UI state shared between commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppState {
    session: Option<Session>,
    current_view: View,
    unlocked_today: bool,
}

impl AppState {
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user_id(&self) -> Result<&str, String> {
        self.session
            .as_ref()
            .map(|s| s.user_id.as_str())
            .ok_or_else(|| "NOT_AUTHENTICATED: Sign in first".to_string())
    }

    pub fn set_session(&mut self, session: Session) {
        if self.session.as_ref().map(|s| &s.user_id) != Some(&session.user_id) {
            self.unlocked_today = false;
            self.current_view = View::Ocean;
        }
        self.session = Some(session);
    }

    pub fn clear_session(&mut self) {
        *self = AppState::default();
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked_today
    }

    /// Dropping the unlock also moves the user off any advanced view.
    pub fn set_unlocked(&mut self, unlocked: bool) {
        self.unlocked_today = unlocked;
        if !unlocked && self.current_view.is_advanced() {
            self.current_view = View::Ocean;
        }
    }

    /// Applies `unlocked` only while `user_id` is still the signed-in user.
    pub fn set_unlocked_for(&mut self, user_id: &str, unlocked: bool) -> bool {
        if self.user_id().ok() != Some(user_id) {
            return false;
        }
        self.set_unlocked(unlocked);
        true
    }

    pub fn select_view(&mut self, view: View) -> Result<View, String> {
        if view.is_advanced() && !self.unlocked_today {
            return Err("LOCKED: post a bubble today to unlock this view".to_string());
        }
        self.current_view = view;
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user: &str) -> Session {
        Session {
            user_id: user.to_string(),
            email: None,
            access_token: "token".to_string(),
            expires_at: 0,
        }
    }

    #[test]
    fn advanced_views_need_unlock() {
        let mut state = AppState::default();
        state.set_session(session("u1"));

        assert!(state.select_view(View::Heatmap).is_err());
        assert_eq!(state.select_view(View::Private), Ok(View::Private));

        state.set_unlocked(true);
        assert_eq!(state.select_view(View::Sonar), Ok(View::Sonar));

        state.set_unlocked(false);
        assert_eq!(state.current_view(), View::Ocean);
    }

    #[test]
    fn switching_user_resets_unlock() {
        let mut state = AppState::default();
        state.set_session(session("u1"));
        state.set_unlocked(true);

        state.set_session(session("u1"));
        assert!(state.is_unlocked());

        state.set_session(session("u2"));
        assert!(!state.is_unlocked());
        assert!(AppState::default().user_id().is_err());
    }

    #[test]
    fn locked_views_report_why() {
        let mut state = AppState::default();
        state.set_session(session("u1"));

        let err = state.select_view(View::Radial).unwrap_err();
        assert_eq!(err, "LOCKED: post a bubble today to unlock this view");
        assert_eq!(state.current_view(), View::Ocean);
    }

    #[test]
    fn unknown_view_names_are_rejected() {
        assert_eq!(View::parse("sonar"), Ok(View::Sonar));
        assert_eq!(View::parse("abyss"), Err("UNKNOWN_VIEW: abyss".to_string()));
        assert!(View::parse("Heatmap").is_err());
    }

    #[test]
    fn stale_unlock_does_not_reach_another_user() {
        let mut state = AppState::default();
        state.set_session(session("u2"));

        assert!(!state.set_unlocked_for("u1", true));
        assert!(!state.is_unlocked());

        assert!(state.set_unlocked_for("u2", true));
        assert!(state.is_unlocked());
        assert!(!AppState::default().set_unlocked_for("u2", true));
    }
}
