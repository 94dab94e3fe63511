use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{redirect, Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{
    wire::{AvailabilityResponse, ChangeStatusRequest, Envelope, ErrorsResponse, ReprogramRequest},
    BackendError, BackendResult, BookingBackend,
};
use crate::{
    models::{
        availability::Availability,
        motos::MotoRef,
        reservations::{NewReservation, Reservation, ReservationStatus},
        services::ServiceRef,
    },
    utils::format_date_str,
};

/// Talks to the booking backend over HTTP. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        // Writes answer with a redirect plus flash message; that redirect is
        // the success signal and must not be followed.
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn error_from(response: Response) -> BackendError {
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return err.into(),
        };

        if status == StatusCode::NOT_FOUND {
            return BackendError::NotFound;
        }
        if status.is_client_error() {
            if let Ok(parsed) = serde_json::from_str::<ErrorsResponse>(&body) {
                return BackendError::Rejected(parsed.errors);
            }
        }
        BackendError::Unexpected {
            status: status.as_u16(),
            body,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| BackendError::Unexpected {
            status: status.as_u16(),
            body: format!("{}: {}", err, body),
        })
    }

    async fn read_write_outcome(response: Response) -> BackendResult<()> {
        let status = response.status();
        if status.is_success() || status.is_redirection() {
            return Ok(());
        }
        Err(Self::error_from(response).await)
    }

    async fn get_enveloped<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::read_json::<Envelope<T>>(response)
            .await
            .map(Envelope::into_inner)
    }
}

#[async_trait]
impl BookingBackend for HttpBackend {
    async fn fetch_availability(&self, fecha: NaiveDate) -> BackendResult<Availability> {
        tracing::debug!(%fecha, "fetching available hours");
        let response = self
            .client
            .get(self.url("reservas/horas-disponibles"))
            .query(&[("fecha", format_date_str(&fecha))])
            .send()
            .await?;
        let parsed: AvailabilityResponse = Self::read_json(response).await?;
        parsed.into_availability(fecha)
    }

    async fn create_reservation(&self, reserva: &NewReservation) -> BackendResult<()> {
        let response = self
            .client
            .post(self.url("reservas"))
            .json(reserva)
            .send()
            .await?;
        Self::read_write_outcome(response).await
    }

    async fn update_reservation(&self, id: u64, reserva: &NewReservation) -> BackendResult<()> {
        let response = self
            .client
            .put(self.url(&format!("reservas/{}", id)))
            .json(reserva)
            .send()
            .await?;
        Self::read_write_outcome(response).await
    }

    async fn change_status(
        &self,
        id: u64,
        estado: ReservationStatus,
    ) -> BackendResult<Reservation> {
        let response = self
            .client
            .patch(self.url(&format!("reservas/{}/estado", id)))
            .json(&ChangeStatusRequest { estado })
            .send()
            .await?;
        Self::read_json::<Envelope<Reservation>>(response)
            .await
            .map(Envelope::into_inner)
    }

    async fn reprogram(&self, id: u64, fecha: NaiveDate, hora: &str) -> BackendResult<Reservation> {
        let response = self
            .client
            .patch(self.url(&format!("reservas/{}/reprogramar", id)))
            .json(&ReprogramRequest { fecha, hora })
            .send()
            .await?;
        Self::read_json::<Envelope<Reservation>>(response)
            .await
            .map(Envelope::into_inner)
    }

    async fn list_reservations(&self) -> BackendResult<Vec<Reservation>> {
        self.get_enveloped("reservas").await
    }

    async fn get_reservation(&self, id: u64) -> BackendResult<Reservation> {
        self.get_enveloped(&format!("reservas/{}", id)).await
    }

    async fn list_services(&self) -> BackendResult<Vec<ServiceRef>> {
        self.get_enveloped("servicios").await
    }

    async fn list_motos(&self) -> BackendResult<Vec<MotoRef>> {
        self.get_enveloped("motos").await
    }
}
