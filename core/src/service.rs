use chrono::Utc;
use chrono_tz::Tz;

use crate::error::ConcertError;
use crate::format::format_epoch;
use crate::model::{ClientConcert, RawConcert};
use crate::store::ConcertStore;

/// Reads concerts from a [`ConcertStore`] and turns them into [`ClientConcert`]s.
///
/// Holds no per-request state; one instance serves every invocation.
#[derive(Debug, Clone)]
pub struct ConcertService<S> {
    store: S,
    timezone: Tz,
}

impl<S: ConcertStore> ConcertService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            timezone: Tz::UTC,
        }
    }

    /// Zone that `date` and `time` are rendered in.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub async fn fetch_one(&self, id: &str) -> Result<ClientConcert, ConcertError> {
        self.fetch_one_at(id, Utc::now().timestamp()).await
    }

    /// Looks up a single concert that has not started before `now` (epoch seconds).
    pub async fn fetch_one_at(&self, id: &str, now: i64) -> Result<ClientConcert, ConcertError> {
        if id.is_empty() {
            return Err(ConcertError::NotFound(String::new()));
        }

        let item = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| ConcertError::NotFound(id.to_owned()))?;

        let raw = RawConcert::from_item(item).inspect_err(|err| {
            tracing::error!(id, "unable to decode concert: {err}");
        })?;

        if !raw.is_complete() {
            tracing::warn!(id, "concert record is incomplete");
            return Err(ConcertError::InvalidData(id.to_owned()));
        }

        if raw.is_in_past(now) {
            tracing::warn!(id, "concert is in the past");
            return Err(ConcertError::InPast(id.to_owned()));
        }

        let concert = self.to_client(raw)?;
        tracing::debug!(id, "fetched concert");
        Ok(concert)
    }

    pub async fn fetch_all(&self) -> Result<Vec<ClientConcert>, ConcertError> {
        self.fetch_all_at(Utc::now().timestamp()).await
    }

    /// Lists every concert after `now`, in the order the store returns them.
    ///
    /// A single undecodable or incomplete record fails the whole listing.
    pub async fn fetch_all_at(&self, now: i64) -> Result<Vec<ClientConcert>, ConcertError> {
        let items = self.store.scan_future_from(now).await?;

        let raws = items
            .into_iter()
            .map(RawConcert::from_item)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| tracing::error!("unable to decode concerts: {err}"))?;

        if let Some(invalid) = raws.iter().find(|raw| !raw.is_complete()) {
            tracing::warn!(id = %invalid.id, "concert record is incomplete");
            return Err(ConcertError::InvalidData(invalid.id.clone()));
        }

        let concerts = raws
            .into_iter()
            .map(|raw| self.to_client(raw))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = concerts.len(), "fetched concerts");
        Ok(concerts)
    }

    /// Derives the display fields of a complete record.
    fn to_client(&self, raw: RawConcert) -> Result<ClientConcert, ConcertError> {
        let (Some(date_time), Some(total), Some(sold)) =
            (raw.date_time, raw.total_tickets, raw.tickets_sold)
        else {
            return Err(ConcertError::InvalidData(raw.id));
        };

        let Some(available_tickets) = total.checked_sub(sold) else {
            tracing::warn!(id = %raw.id, total, sold, "concert is oversold");
            return Err(ConcertError::InvalidData(raw.id));
        };

        let Some((date, time)) = format_epoch(date_time, &self.timezone) else {
            tracing::warn!(id = %raw.id, date_time, "concert date out of range");
            return Err(ConcertError::InvalidData(raw.id));
        };

        Ok(ClientConcert {
            id: raw.id,
            description: raw.description,
            image_url: raw.image_url,
            date,
            time,
            available_tickets,
            full_price: raw.full_price,
            concession_price: raw.concession_price,
        })
    }
}
