use thiserror::Error;

/// Rejected entity configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("hp factor must be positive, got {0}")]
    NonPositiveHp(f64),
    #[error("speed factor must not be negative, got {0}")]
    NegativeSpeed(f64),
    #[error("damage factor must not be negative, got {0}")]
    NegativeDamage(f64),
}

pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64, EntityError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EntityError::NonFinite { field })
    }
}

pub(crate) fn positive_hp(factor: f64) -> Result<f64, EntityError> {
    let factor = finite("hp", factor)?;
    if factor > 0.0 {
        Ok(factor)
    } else {
        Err(EntityError::NonPositiveHp(factor))
    }
}

pub(crate) fn non_negative_speed(factor: f64) -> Result<f64, EntityError> {
    let factor = finite("speed", factor)?;
    if factor < 0.0 {
        return Err(EntityError::NegativeSpeed(factor));
    }
    Ok(factor)
}

pub(crate) fn non_negative_damage(factor: f64) -> Result<f64, EntityError> {
    let factor = finite("damage", factor)?;
    if factor < 0.0 {
        return Err(EntityError::NegativeDamage(factor));
    }
    Ok(factor)
}
