use std::sync::Arc;

use crate::mail::Mailer;

pub struct AppState {
    pub mailer: Box<dyn Mailer>,
    /// Every contact submission is mailed to this address
    pub recipient: String,
}

pub type SharedState = Arc<AppState>;
