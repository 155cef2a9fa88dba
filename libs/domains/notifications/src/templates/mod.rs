//! Handlebars rendering for outgoing mail.

use crate::error::{NotificationError, NotificationResult};
use crate::models::InvitationEmailData;
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

pub const INVITATION_SUBJECT: &str = "API Documentation Invitation";

#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub html: String,
    pub text: String,
    pub subject: String,
}

pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> NotificationResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        for (name, source) in [
            ("invitation_html", INVITATION_HTML_TEMPLATE),
            ("invitation_text", INVITATION_TEXT_TEMPLATE),
        ] {
            handlebars.register_template_string(name, source).map_err(|e| {
                NotificationError::TemplateError(format!("Failed to register {}: {}", name, e))
            })?;
        }

        Ok(Self { handlebars })
    }

    fn render<T: Serialize>(&self, template_name: &str, data: &T) -> NotificationResult<String> {
        Ok(self.handlebars.render(template_name, data)?)
    }

    pub fn render_invitation(&self, data: &InvitationEmailData) -> NotificationResult<RenderedEmail> {
        debug!(recipient = %data.recipient, "Rendering invitation email");

        Ok(RenderedEmail {
            html: self.render("invitation_html", data)?,
            text: self.render("invitation_text", data)?,
            subject: INVITATION_SUBJECT.to_string(),
        })
    }
}

const INVITATION_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>API Documentation Invitation</title>
</head>
<body>
    <div style="font-family: Arial, sans-serif; text-align: center;">
        <h2 style="background-color: #4CAF50; color: white; padding: 10px;">API Documentation Invitation</h2>
        <p>Hello,</p>
        <p>You are invited to view the User Directory API documentation on <strong>ReDoc</strong>.</p>
        <p>Open it with the button below:</p>
        <a href="{{docs_url}}" style="display: inline-block; padding: 10px 20px; font-size: 16px; color: white; background-color: #4CAF50; text-decoration: none; border-radius: 5px;">View API Documentation</a>
        <p>If you have any questions, reply to this email.</p>
    </div>
</body>
</html>
"#;

const INVITATION_TEXT_TEMPLATE: &str = r#"Hello,

You are invited to view the User Directory API documentation on ReDoc.

View API Documentation: {{{docs_url}}}

If you have any questions, reply to this email.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> InvitationEmailData {
        InvitationEmailData {
            recipient: "ada@example.com".into(),
            docs_url: "https://directory.example.com/redoc".into(),
        }
    }

    #[test]
    fn test_render_invitation() {
        let engine = TemplateEngine::new().unwrap();
        let email = engine.render_invitation(&data()).unwrap();

        assert_eq!(email.subject, "API Documentation Invitation");
        assert!(email.text.contains("View API Documentation: https://directory.example.com/redoc"));
        assert!(email.html.contains(r#"href="https://directory.example.com/redoc""#));
    }

    #[test]
    fn test_text_body_is_not_html_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let email = engine
            .render_invitation(&InvitationEmailData {
                recipient: "ada@example.com".into(),
                docs_url: "https://docs.example.com/redoc?team=a&b".into(),
            })
            .unwrap();

        assert!(email.text.contains("https://docs.example.com/redoc?team=a&b"));
        assert!(!email.html.contains("team=a&b"));
    }
}
