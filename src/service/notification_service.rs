// service/notification_service.rs
use crate::{config::Config, models::jobmodel::Job, utils::phone::normalize_phone};

const SMS_API_URL: &str = "https://api.africastalking.com/version1/messaging";

/// SMS delivery boundary. Delivery is fire-and-forget from the core's
/// perspective: callers spawn these futures and failures are logged, never
/// propagated into the triggering operation.
#[derive(Debug, Clone)]
pub struct NotificationService {
    production: bool,
    sms_username: String,
    sms_api_key: String,
    sms_sender_id: String,
    http_client: reqwest::Client,
}

impl NotificationService {
    pub fn new(config: &Config) -> Self {
        Self {
            production: config.is_production(),
            sms_username: config.sms_username.clone(),
            sms_api_key: config.sms_api_key.clone(),
            sms_sender_id: config.sms_sender_id.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    fn delivers_for_real(&self) -> bool {
        self.production && !self.sms_api_key.is_empty()
    }

    pub async fn send_sms(&self, phone: &str, message: &str) -> Result<(), reqwest::Error> {
        let recipient = match normalize_phone(phone) {
            Some(normalized) => format!("+{}", normalized),
            None => {
                tracing::warn!("Refusing to send SMS to unrecognized number: {}", phone);
                return Ok(());
            }
        };

        if !self.delivers_for_real() {
            // Outside production we log the content instead of sending.
            tracing::info!("[mock sms] To: {} Message: {}", recipient, message);
            return Ok(());
        }

        let params = [
            ("username", self.sms_username.as_str()),
            ("to", recipient.as_str()),
            ("message", message),
            ("from", self.sms_sender_id.as_str()),
        ];

        let response = self
            .http_client
            .post(SMS_API_URL)
            .header("apiKey", &self.sms_api_key)
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::error!(
                "SMS gateway returned {} for recipient {}",
                response.status(),
                recipient
            );
        }

        Ok(())
    }

    pub async fn send_verification_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<(), reqwest::Error> {
        let message = format!(
            "Your JuaKazi verification code is: {}. Valid for 10 minutes.",
            code
        );
        self.send_sms(phone, &message).await
    }

    pub async fn send_password_reset_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<(), reqwest::Error> {
        let message = format!(
            "Your JuaKazi password reset code is: {}. Valid for 30 minutes.",
            code
        );
        self.send_sms(phone, &message).await
    }

    pub fn notify_new_job(&self, job: &Job) {
        tracing::info!(
            "New job posted: {} in {} ({} category, {})",
            job.title,
            job.county,
            job.category.to_str(),
            job.formatted_salary()
        );
    }
}
