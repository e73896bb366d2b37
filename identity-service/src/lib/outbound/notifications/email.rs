use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::identity::errors::NotificationError;
use crate::identity::models::Identity;
use crate::identity::ports::ConfirmationNotifier;

/// Sends confirmation links through a transactional-mail HTTP API.
#[derive(Clone)]
pub struct HttpConfirmationNotifier {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl HttpConfirmationNotifier {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            from,
        }
    }
}

/// Link the identity follows to confirm its email.
pub fn confirmation_link(base_url: &str, verify_token: &str) -> String {
    format!(
        "{}/api/auth/confirmed_email/{}",
        base_url.trim_end_matches('/'),
        verify_token
    )
}

/// Escape text for an HTML body or a quoted attribute.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn confirmation_body(identity: &Identity, link: &str) -> String {
    let link = escape_html(link);
    format!(
        "<p>Hi {},</p>\
         <p>Please confirm your email address by following the link below.</p>\
         <p><a href=\"{link}\">{link}</a></p>\
         <p>If you did not create an account, you can ignore this message.</p>",
        escape_html(&identity.display_name())
    )
}

#[async_trait]
impl ConfirmationNotifier for HttpConfirmationNotifier {
    async fn send_confirmation(
        &self,
        identity: &Identity,
        verify_token: &str,
        base_url: &str,
    ) -> Result<(), NotificationError> {
        let link = confirmation_link(base_url, verify_token);
        let html = confirmation_body(identity, &link);
        let body = OutgoingEmail {
            from: &self.from,
            to: [identity.email.as_str()],
            subject: "Confirm your email",
            html: &html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}
