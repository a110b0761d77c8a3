//! Client-side validation mirroring the backend's rules.
//!
//! Validation runs before any network call; a form that fails here is never
//! submitted. Messages are the canonical Russian strings of the original UI.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-ZА-ЯЁ][a-zа-яё]+$").expect("static regex is valid"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.+-]+@[\w-]+(\.[\w-]+)+$").expect("static regex is valid")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s()-]{7,20}$").expect("static regex is valid"));

/// Canonical message for a check-in date in the past.
pub const MSG_CHECK_IN_PAST: &str = "Дата заезда не может быть в прошлом";
/// Canonical message for a check-out not after check-in.
pub const MSG_CHECK_OUT_BEFORE_IN: &str = "Дата выезда не может быть перед датой заезда";
/// Canonical message for booking while logged out.
pub const MSG_AUTH_REQUIRED: &str = "Для бронирования необходимо войти в систему";

/// A single failed field with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// All field errors produced by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.summary())]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Message for a specific field, if it failed.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Registration form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Validate a registration form field-by-field.
///
/// Rules mirror the backend: names start uppercase and contain only letters,
/// the password is at least 6 characters with at least one uppercase letter,
/// the phone is optional but loosely checked when present.
pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if !NAME_RE.is_match(&form.first_name) {
        errors.push(FieldError::new(
            "firstName",
            "Имя должно начинаться с заглавной буквы и содержать только буквы",
        ));
    }
    if !NAME_RE.is_match(&form.last_name) {
        errors.push(FieldError::new(
            "lastName",
            "Фамилия должна начинаться с заглавной буквы и содержать только буквы",
        ));
    }
    if !EMAIL_RE.is_match(&form.email) {
        errors.push(FieldError::new("email", "Некорректный email"));
    }
    if let Some(phone) = form.phone.as_deref()
        && !phone.is_empty()
        && !PHONE_RE.is_match(phone)
    {
        errors.push(FieldError::new("phone", "Некорректный номер телефона"));
    }
    if form.password.chars().count() < 6 {
        errors.push(FieldError::new(
            "password",
            "Пароль должен содержать не менее 6 символов",
        ));
    } else if !form.password.chars().any(char::is_uppercase) {
        errors.push(FieldError::new(
            "password",
            "Пароль должен содержать хотя бы одну заглавную букву",
        ));
    }
    if form.confirm_password != form.password {
        errors.push(FieldError::new("confirmPassword", "Пароли не совпадают"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

/// Validate check-in/check-out against today.
pub fn validate_dates(
    check_in: NaiveDate,
    check_out: NaiveDate,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    if check_in < today {
        errors.push(FieldError::new("checkInDate", MSG_CHECK_IN_PAST));
    }
    if check_out <= check_in {
        errors.push(FieldError::new("checkOutDate", MSG_CHECK_OUT_BEFORE_IN));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

/// Validate the guest count against a room's capacity.
pub fn validate_guests(guests: u32, capacity: u32) -> Result<(), ValidationErrors> {
    if guests < 1 {
        return Err(ValidationErrors {
            errors: vec![FieldError::new("guests", "Минимум 1 гость")],
        });
    }
    if guests > capacity {
        return Err(ValidationErrors {
            errors: vec![FieldError::new(
                "guests",
                format!("Максимальное количество гостей для этого номера: {capacity}"),
            )],
        });
    }
    Ok(())
}

/// Number of nights between two dates.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

/// Total price for a stay at the given nightly rate.
pub fn total_price(check_in: NaiveDate, check_out: NaiveDate, price_per_night: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let nights = nights_between(check_in, check_out).max(0) as f64;
    nights * price_per_night
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            first_name: "Анна".into(),
            last_name: "Petrova".into(),
            email: "anna@example.com".into(),
            phone: Some("+7 (900) 123-45-67".into()),
            password: "Secret1".into(),
            confirm_password: "Secret1".into(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_registration(&valid_form()).is_ok());
    }

    #[test]
    fn lowercase_name_rejected() {
        let mut form = valid_form();
        form.first_name = "anna".into();
        let errs = validate_registration(&form).unwrap_err();
        assert!(errs.field("firstName").is_some());
        assert!(errs.field("lastName").is_none());
    }

    #[test]
    fn name_with_digits_rejected() {
        let mut form = valid_form();
        form.last_name = "Petrova2".into();
        let errs = validate_registration(&form).unwrap_err();
        assert!(errs.field("lastName").is_some());
    }

    #[test]
    fn bad_email_rejected() {
        let mut form = valid_form();
        form.email = "not-an-email".into();
        let errs = validate_registration(&form).unwrap_err();
        assert_eq!(errs.field("email"), Some("Некорректный email"));
    }

    #[test]
    fn short_password_rejected() {
        let mut form = valid_form();
        form.password = "Ab1".into();
        form.confirm_password = "Ab1".into();
        let errs = validate_registration(&form).unwrap_err();
        assert!(errs.field("password").unwrap().contains("6"));
    }

    #[test]
    fn password_without_uppercase_rejected() {
        let mut form = valid_form();
        form.password = "secret1".into();
        form.confirm_password = "secret1".into();
        let errs = validate_registration(&form).unwrap_err();
        assert!(errs.field("password").unwrap().contains("заглавную"));
    }

    #[test]
    fn mismatched_passwords_rejected() {
        let mut form = valid_form();
        form.confirm_password = "Other1".into();
        let errs = validate_registration(&form).unwrap_err();
        assert_eq!(errs.field("confirmPassword"), Some("Пароли не совпадают"));
    }

    #[test]
    fn missing_phone_is_fine_bad_phone_is_not() {
        let mut form = valid_form();
        form.phone = None;
        assert!(validate_registration(&form).is_ok());

        form.phone = Some("abc".into());
        let errs = validate_registration(&form).unwrap_err();
        assert!(errs.field("phone").is_some());
    }

    #[test]
    fn check_in_in_past_rejected_with_canonical_message() {
        let errs =
            validate_dates(date("2026-08-01"), date("2026-08-05"), date("2026-08-15")).unwrap_err();
        assert_eq!(errs.field("checkInDate"), Some(MSG_CHECK_IN_PAST));
    }

    #[test]
    fn check_out_must_follow_check_in() {
        let errs =
            validate_dates(date("2026-09-05"), date("2026-09-05"), date("2026-08-15")).unwrap_err();
        assert_eq!(errs.field("checkOutDate"), Some(MSG_CHECK_OUT_BEFORE_IN));
    }

    #[test]
    fn valid_dates_pass() {
        assert!(validate_dates(date("2026-09-01"), date("2026-09-04"), date("2026-08-15")).is_ok());
    }

    #[test]
    fn guests_over_capacity_rejected_with_limit_in_message() {
        let errs = validate_guests(5, 4).unwrap_err();
        assert_eq!(
            errs.field("guests"),
            Some("Максимальное количество гостей для этого номера: 4")
        );
    }

    #[test]
    fn guests_within_capacity_pass() {
        assert!(validate_guests(1, 1).is_ok());
        assert!(validate_guests(4, 4).is_ok());
        assert!(validate_guests(0, 4).is_err());
    }

    #[test]
    fn total_price_multiplies_nights_by_rate() {
        let total = total_price(date("2026-09-01"), date("2026-09-04"), 7500.0);
        assert_eq!(total, 22500.0);
    }
}
