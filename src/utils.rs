#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:literal, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    state: web::Data<$crate::state::AppState>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](state, info).await {
                        Ok(response) => response,
                        Err(err) => {
                            tracing::debug!(action = stringify!($func_name), error = %err, "request failed");
                            <$response>::err(err.to_string())
                        }
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

use anyhow::Context;
use chrono::{Local, NaiveDate};

pub const DATE_FMT: &str = "%Y-%m-%d";

pub fn parse_date_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.as_ref().trim(), DATE_FMT).context("Formato de fecha inválido")
}

pub fn format_date_str(date: &NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

pub fn format_date_str_opt(date: Option<&NaiveDate>) -> String {
    date.map(format_date_str).unwrap_or_default()
}

/// Local calendar date used for the not-in-the-past rule.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date_str(" 2030-01-08 ").unwrap(),
            NaiveDate::from_ymd_opt(2030, 1, 8).unwrap()
        );
        assert!(parse_date_str("08/01/2030").is_err());
    }

    #[test]
    fn formats_back_to_iso() {
        let date = NaiveDate::from_ymd_opt(2030, 1, 8).unwrap();
        assert_eq!(format_date_str(&date), "2030-01-08");
        assert_eq!(format_date_str_opt(None), "");
    }
}
