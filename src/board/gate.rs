/// Which of the three screens the admin control is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionGate {
    #[default]
    Anonymous,
    LoginPrompt,
    Authenticated,
}

impl SessionGate {
    /// Outcome of the session check at startup.
    pub fn session_checked(self, signed_in: bool) -> Self {
        match (self, signed_in) {
            (_, true) => SessionGate::Authenticated,
            (SessionGate::Authenticated, false) => SessionGate::Anonymous,
            (gate, false) => gate,
        }
    }

    pub fn show_login(self) -> Self {
        match self {
            SessionGate::Anonymous => SessionGate::LoginPrompt,
            other => other,
        }
    }

    pub fn login_succeeded(self) -> Self {
        SessionGate::Authenticated
    }

    /// Logging out always lands on the public list.
    pub fn logged_out(self) -> Self {
        SessionGate::Anonymous
    }

    pub fn is_admin(self) -> bool {
        self == SessionGate::Authenticated
    }
}

/// The screen a renderer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loading,
    PublicList,
    LoginForm,
    AdminPanel,
}

impl View {
    pub fn derive(gate: SessionGate, loading: bool) -> Self {
        match gate {
            SessionGate::LoginPrompt => View::LoginForm,
            SessionGate::Authenticated => View::AdminPanel,
            SessionGate::Anonymous if loading => View::Loading,
            SessionGate::Anonymous => View::PublicList,
        }
    }
}
