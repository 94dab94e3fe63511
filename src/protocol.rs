use serde::Serialize;

use crate::models::reservations::ReservationStatus;

#[derive(Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub err: String,
}

impl SimpleResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            err: String::new(),
        }
    }
}

/// Status as rendered in list rows, detail headers and transition buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub estado: String,
    pub label: String,
}

impl From<ReservationStatus> for StatusBadge {
    fn from(status: ReservationStatus) -> Self {
        Self {
            estado: status.as_str().to_string(),
            label: status.label().to_string(),
        }
    }
}

/// Every response carries `success` and `err`; this adds the failing
/// constructor for each of them.
#[macro_export]
macro_rules! impl_err_response {
    ( $( $type:ty),+ $(,)? ) => {
        $(
            impl $type {
                pub fn err<S: ToString>(err: S) -> Self {
                    Self {
                        success: false,
                        err: err.to_string(),
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

impl_err_response! {
    SimpleResponse,
}
