use thiserror::Error;

/// Reasons a report profile cannot drive a layout.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("profile '{profile}' defines no columns")]
    NoColumns { profile: String },

    #[error("profile '{profile}': column {column} has non-positive width {width}")]
    InvalidColumnWidth {
        profile: String,
        column: usize,
        width: f32,
    },

    #[error("profile '{profile}': designator column {column} is outside the {arity}-column table")]
    DesignatorOutOfRange {
        profile: String,
        column: usize,
        arity: usize,
    },

    #[error("profile '{profile}': designator column {column} must be wrappable")]
    DesignatorNotWrappable { profile: String, column: usize },

    #[error("profile '{profile}': merge {first}..={last} is invalid for a {arity}-column table")]
    InvalidMerge {
        profile: String,
        first: usize,
        last: usize,
        arity: usize,
    },

    #[error("profile '{profile}': wrappable column {column} leaves no room for text inside padding {padding}")]
    NoTextWidth {
        profile: String,
        column: usize,
        padding: f32,
    },

    #[error("profile '{profile}': {field} must be positive (got {value})")]
    NonPositive {
        profile: String,
        field: &'static str,
        value: f32,
    },

    #[error("profile '{profile}': full-page band must not be negative (got {value})")]
    NegativeBand { profile: String, value: f32 },
}

pub type Result<T> = std::result::Result<T, ProfileError>;
