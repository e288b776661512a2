//! Verification email rendering

/// Subject line of the verification email
pub const SUBJECT: &str = "Your verification code | 您的验证码";

/// A rendered verification email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Render the verification email for `code`, valid for `expire_minutes`
pub fn render_verification_email(code: &str, expire_minutes: i64) -> VerificationEmail {
    let text = format!(
        "Your verification code is {code}. It expires in {expire_minutes} minutes.\n\
         If you did not request this code, you can ignore this email.\n\n\
         您的验证码是 {code}，{expire_minutes} 分钟内有效。如非本人操作，请忽略此邮件。"
    );

    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; color: #222;">
    <p>Your verification code is:</p>
    <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{code}</p>
    <p>It expires in {expire_minutes} minutes. If you did not request this code, you can ignore this email.</p>
    <hr>
    <p>您的验证码是 <strong>{code}</strong>，{expire_minutes} 分钟内有效。如非本人操作，请忽略此邮件。</p>
  </body>
</html>"#
    );

    VerificationEmail {
        subject: SUBJECT.to_string(),
        html,
        text,
    }
}
