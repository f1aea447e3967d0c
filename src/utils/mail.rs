//! SMTP 邮件发送（lettre），未启用时只写日志

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::config::{AppConfig, MailConfig};
use crate::errors::{InstituteError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailOutcome {
    Sent,
    Logged,
}

fn build_message(config: &MailConfig, to: &str, subject: &str, body: &str) -> Result<Message> {
    let from: Mailbox = config
        .from
        .parse()
        .map_err(|e| InstituteError::mail_delivery(format!("发件人地址无效: {e}")))?;
    let to: Mailbox = to
        .parse()
        .map_err(|e| InstituteError::mail_delivery(format!("收件人地址无效: {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| InstituteError::mail_delivery(format!("构建邮件失败: {e}")))
}

pub async fn send_mail(to: &str, subject: &str, body: &str) -> Result<MailOutcome> {
    let config = &AppConfig::get().mail;

    if !config.enabled {
        info!("邮件发送未启用，收件人 {}，主题 {}:\n{}", to, subject, body);
        return Ok(MailOutcome::Logged);
    }

    let message = build_message(config, to, subject, body)?;

    let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        .map_err(|e| InstituteError::mail_delivery(format!("SMTP 配置错误: {e}")))?
        .port(config.port);
    if !config.username.is_empty() {
        builder = builder.credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ));
    }
    let mailer = builder.build();

    match mailer.send(message).await {
        Ok(_) => Ok(MailOutcome::Sent),
        Err(e) => {
            warn!("发送邮件到 {} 失败: {}", to, e);
            Err(InstituteError::mail_delivery(format!("发送邮件失败: {e}")))
        }
    }
}

/// 密码重置邮件正文
pub fn password_reset_body(display_name: &str, link: &str, institute: &str) -> String {
    format!(
        "Hello {display_name},\n\n\
         We received a request to reset the password of your {institute} account.\n\
         Open the link below to choose a new password:\n\n{link}\n\n\
         If you did not request this, you can ignore this email.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config(from: &str) -> MailConfig {
        MailConfig {
            enabled: true,
            host: "smtp.example.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: from.to_string(),
        }
    }

    #[test]
    fn test_build_message() {
        let config = mail_config("Institute <office@example.com>");
        assert!(build_message(&config, "student@example.com", "Hi", "body").is_ok());
        assert!(build_message(&config, "not an address", "Hi", "body").is_err());
        assert!(build_message(&mail_config("broken"), "student@example.com", "Hi", "body").is_err());
    }

    #[test]
    fn test_password_reset_body_contains_link() {
        let body = password_reset_body("Ravi", "http://x/reset-password/1/tok/", "Skill Centre");
        assert!(body.contains("http://x/reset-password/1/tok/"));
        assert!(body.starts_with("Hello Ravi"));
    }
}
