use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    Registration,
    Otp,
}

impl Template {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Otp => "otp",
        }
    }
}

/// A rendered plain-text email.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(skip)]
    pub template: Template,
}

impl EmailMessage {
    pub fn registration(to: &str, username: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Registration Successful".to_string(),
            body: format!(
                "Welcome {username}! You have successfully registered. \
                 Please request an OTP to verify your email."
            ),
            template: Template::Registration,
        }
    }

    pub fn otp(to: &str, code: &str, valid_minutes: i64) -> Self {
        Self {
            to: to.to_string(),
            subject: "Your OTP for Email Verification".to_string(),
            body: format!("Your OTP is: {code}. It is valid for {valid_minutes} minutes."),
            template: Template::Otp,
        }
    }
}
