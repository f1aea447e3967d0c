use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 \-]{6,20}$").expect("Invalid phone regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 3 <= 长度 <= 30
    if username.len() < 3 || username.len() > 30 {
        return Err("Username length must be between 3 and 30 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username may contain only letters, digits, dots, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 电话可为空
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if phone.is_empty() || PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err("Phone number format is invalid")
    }
}

pub fn validate_amount(amount: f64) -> Result<(), &'static str> {
    if !amount.is_finite() || amount < 0.0 {
        return Err("Amount must be a non-negative number");
    }
    Ok(())
}

pub fn validate_not_future(date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if date > today {
        return Err("Date cannot be in the future");
    }
    Ok(())
}

pub fn validate_required(value: &str, message: &'static str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err(message);
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 至少 8 个字符，包含大写字母、小写字母和数字，且不是常见弱密码。
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    let weak_passwords = [
        "password1",
        "password123",
        "qwerty123",
        "admin1234",
        "welcome1",
        "student123",
        "abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("ravi").is_ok());
        assert!(validate_username("r.kumar-01_x").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
        assert!(validate_username("ravi kumar").is_err());
        assert!(validate_username("ravi@home").is_err());
    }

    #[test]
    fn test_email_and_phone() {
        assert!(validate_email("office@institute.in").is_ok());
        assert!(validate_email("office@institute").is_err());
        assert!(validate_phone("").is_ok());
        assert!(validate_phone("+91 98765-43210").is_ok());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_amount_and_dates() {
        assert!(validate_amount(0.0).is_ok());
        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());

        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(validate_not_future(today, today).is_ok());
        assert!(validate_not_future(today.succ_opt().unwrap(), today).is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("Trainee2025").is_valid);
    }

    #[test]
    fn test_password_policy_errors() {
        let result = validate_password("Ab1");
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );

        let result = validate_password("abcd12345");
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );

        let result = validate_password("ABCD12345");
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );

        let result = validate_password("AbcdEfgh");
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password123");
        assert!(!result.is_valid);
        assert!(validate_password_simple("Password123").is_err());
    }
}
