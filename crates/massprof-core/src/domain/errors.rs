use crate::numerics::spline::SplineError;
use std::error::Error;
use std::fmt::{Display, Formatter};

use super::partition::PartitionError;

pub type ProfileResult<T> = Result<T, ProfileError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileErrorCategory {
    InputValidationError,
    IoSystemError,
    MissingDependencyError,
    ComputationError,
    InternalError,
}

impl ProfileErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::MissingDependencyError => 4,
            Self::ComputationError => 5,
            Self::InternalError => 6,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::MissingDependencyError => "MissingDependencyError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileError {
    category: ProfileErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl ProfileError {
    pub fn new(
        category: ProfileErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            ProfileErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ProfileErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn missing_dependency(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            ProfileErrorCategory::MissingDependencyError,
            placeholder,
            message,
        )
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ProfileErrorCategory::ComputationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ProfileErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> ProfileErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for ProfileError {}

impl From<SplineError> for ProfileError {
    fn from(error: SplineError) -> Self {
        match error {
            SplineError::NonIncreasingAbscissa { .. } => {
                Self::input_validation("INPUT.SPLINE_ORDER", error.to_string())
            }
            SplineError::NonFiniteSample { .. } => {
                Self::input_validation("INPUT.SPLINE_SAMPLE", error.to_string())
            }
            SplineError::InsufficientPoints { .. } | SplineError::NotBuilt => {
                Self::internal("SYS.SPLINE_STATE", error.to_string())
            }
        }
    }
}

impl From<PartitionError> for ProfileError {
    fn from(error: PartitionError) -> Self {
        Self::input_validation("INPUT.RADIUS_PARTITION", error.to_string())
    }
}
