use axum::{extract::State, Json};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{app_state::SharedState, http_error::ApiResult, mail::OutgoingEmail};

/// Acknowledgement shown to the visitor once the relay accepted the email.
pub const SENT_MESSAGE: &str = "ایمیل ارسال شد";

/// Contact form fields, passed through as entered. Missing fields are empty,
/// any other JSON value is taken as text (see [`form_text`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    #[serde(deserialize_with = "deserialize_form_text")]
    pub fullname: String,
    #[serde(deserialize_with = "deserialize_form_text")]
    pub email: String,
    #[serde(deserialize_with = "deserialize_form_text")]
    pub phone: String,
    #[serde(deserialize_with = "deserialize_form_text")]
    pub company: String,
    #[serde(deserialize_with = "deserialize_form_text")]
    pub service: String,
    #[serde(deserialize_with = "deserialize_form_text")]
    pub description: String,
}

fn deserialize_form_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| form_text(&value))
}

/// Renders a JSON value the way it reads when pasted into a text template:
/// `null` and numbers as their literal text, arrays joined with commas
/// (null elements empty), objects as `[object Object]`.
pub fn form_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                item => form_text(item),
            })
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

impl ContactSubmission {
    pub fn subject(&self) -> String {
        format!("درخواست مشاوره جدید از {}", self.fullname)
    }

    /// Field values are inserted as-is, without HTML escaping.
    pub fn html_body(&self) -> String {
        format!(
            r#"
<h2>درخواست مشاوره جدید</h2>
<p><strong>نام:</strong> {fullname}</p>
<p><strong>شرکت:</strong> {company}</p>
<p><strong>تلفن:</strong> {phone}</p>
<p><strong>ایمیل:</strong> {email}</p>
<p><strong>نوع خدمت:</strong> {service}</p>
<p><strong>توضیحات:</strong></p>
<p>{description}</p>
"#,
            fullname = self.fullname,
            company = self.company,
            phone = self.phone,
            email = self.email,
            service = self.service,
            description = self.description,
        )
    }

    /// Sent from the submitter's own address to `recipient`.
    pub fn to_email(&self, recipient: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: self.email.clone(),
            to: recipient.to_owned(),
            subject: self.subject(),
            html: self.html_body(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

#[tracing::instrument(skip(app_state, submission), fields(fullname = %submission.fullname))]
pub async fn post_contact(
    State(app_state): State<SharedState>,
    Json(submission): Json<ContactSubmission>,
) -> ApiResult<Json<ContactResponse>> {
    let email = submission.to_email(&app_state.recipient);
    app_state.mailer.send(email).await?;
    info!("contact request forwarded");
    Ok(Json(ContactResponse {
        success: true,
        message: SENT_MESSAGE.to_owned(),
    }))
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use claims::assert_ok;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        app_state::AppState,
        mail::{MailError, Mailer},
        routes,
    };

    use super::*;

    const RECIPIENT: &str = "info@kdmine.com";

    /// Records every send attempt, optionally failing all of them.
    #[derive(Clone, Default)]
    struct RecordingMailer {
        attempts: Arc<Mutex<Vec<OutgoingEmail>>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
            self.attempts.lock().unwrap().push(email);
            match &self.fail_with {
                Some(message) => Err(MailError::Other(message.clone())),
                None => Ok(()),
            }
        }
    }

    fn app_with(mailer: RecordingMailer) -> axum::Router {
        routes::app(Arc::new(AppState {
            mailer: Box::new(mailer),
            recipient: RECIPIENT.to_owned(),
        }))
    }

    fn contact_request(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn full_submission() -> Value {
        json!({
            "fullname": "Sara Ahmadi",
            "email": "sara@example.com",
            "phone": "+98 21 5555 0101",
            "company": "Zagros Copper",
            "service": "flotation-design",
            "description": "Need a plant audit"
        })
    }

    #[tokio::test]
    async fn successful_send_mails_all_fields_once() {
        let mailer = RecordingMailer::default();
        let app = app_with(mailer.clone());

        let response = assert_ok!(app.oneshot(contact_request(&full_submission())).await);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(
            response_json(response).await,
            json!({"success": true, "message": "ایمیل ارسال شد"})
        );

        let attempts = mailer.attempts.lock().unwrap();
        assert_eq!(attempts.len(), 1);
        let email = &attempts[0];
        assert_eq!(email.to, RECIPIENT);
        assert_eq!(email.from, "sara@example.com");
        assert_eq!(email.subject, "درخواست مشاوره جدید از Sara Ahmadi");
        for field in [
            "Sara Ahmadi",
            "sara@example.com",
            "+98 21 5555 0101",
            "Zagros Copper",
            "flotation-design",
            "Need a plant audit",
        ] {
            assert!(email.html.contains(field), "body is missing {}", field);
        }
    }

    #[tokio::test]
    async fn transport_failure_is_reported_with_raw_message() {
        let mailer = RecordingMailer {
            fail_with: Some("535 authentication failed".to_owned()),
            ..Default::default()
        };
        let app = app_with(mailer.clone());

        let response = assert_ok!(app.oneshot(contact_request(&full_submission())).await);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response_json(response).await,
            json!({"success": false, "error": "535 authentication failed"})
        );
        assert_eq!(mailer.attempts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_fields_are_sent_empty() {
        let mailer = RecordingMailer::default();
        let app = app_with(mailer.clone());

        let response = assert_ok!(
            app.oneshot(contact_request(&json!({"fullname": "Ali"})))
                .await
        );
        assert_eq!(response.status(), StatusCode::OK);
        let attempts = mailer.attempts.lock().unwrap();
        assert_eq!(attempts[0].from, "");
        assert!(attempts[0].html.contains("<p><strong>شرکت:</strong> </p>"));
    }

    #[tokio::test]
    async fn non_string_fields_are_sent_as_text() {
        let mailer = RecordingMailer::default();
        let app = app_with(mailer.clone());

        let body = json!({
            "fullname": "Reza",
            "email": "reza@example.com",
            "company": null,
            "phone": 9121234567_u64,
            "service": ["audit", null, "design"],
            "description": {"text": "hi"}
        });
        let response = assert_ok!(app.oneshot(contact_request(&body)).await);
        assert_eq!(response.status(), StatusCode::OK);

        let attempts = mailer.attempts.lock().unwrap();
        assert_eq!(attempts.len(), 1);
        let html = &attempts[0].html;
        assert!(html.contains("<p><strong>شرکت:</strong> null</p>"));
        assert!(html.contains("<p><strong>تلفن:</strong> 9121234567</p>"));
        assert!(html.contains("<p><strong>نوع خدمت:</strong> audit,,design</p>"));
        assert!(html.contains("<p>[object Object]</p>"));
    }

    #[test]
    fn form_text_of_scalars() {
        assert_eq!(form_text(&json!(2.5)), "2.5");
        assert_eq!(form_text(&json!(true)), "true");
        assert_eq!(form_text(&json!("متن")), "متن");
        assert_eq!(form_text(&json!([])), "");
    }

    #[test]
    fn markup_is_not_escaped() {
        let submission = ContactSubmission {
            description: "<b>urgent</b>".to_owned(),
            ..Default::default()
        };
        assert!(submission.html_body().contains("<p><b>urgent</b></p>"));
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let app = app_with(RecordingMailer::default());
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/contact")
            .header(header::ORIGIN, "https://kdmine.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = assert_ok!(app.oneshot(request).await);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
