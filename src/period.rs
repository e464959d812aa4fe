use crate::errors::AppError;
use crate::storage::{self, StoreData};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

/// How often a keyed record rolls over to a fresh empty payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Weekly,
}

/// The bucket a record was last written in. Daily buckets are calendar-date
/// strings, weekly buckets the epoch-milliseconds of the most recent Sunday
/// at local midnight. Rollover compares keys for exact equality, never
/// elapsed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodKey {
    Day(String),
    WeekStart(i64),
}

/// A stored record that belongs to a daily or weekly bucket and must be
/// replaced with an empty payload once the wall clock leaves that bucket.
pub trait PeriodKeyed: Serialize + DeserializeOwned {
    const STORAGE_KEY: &'static str;
    const GRANULARITY: Granularity;

    fn period_key(&self) -> PeriodKey;
    fn fresh(today: NaiveDate) -> Self;
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Most recent Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

pub fn week_start_millis(date: NaiveDate) -> i64 {
    let midnight = week_start(date).and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|start| start.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
}

pub fn current_key(granularity: Granularity, today: NaiveDate) -> PeriodKey {
    match granularity {
        Granularity::Daily => PeriodKey::Day(date_key(today)),
        Granularity::Weekly => PeriodKey::WeekStart(week_start_millis(today)),
    }
}

/// Loads the record for the current period. A record from an earlier period is
/// replaced with a fresh empty payload and the second tuple element is `true`,
/// meaning the caller must persist the replacement before doing anything else
/// with it. A missing or unparseable record loads as a fresh payload without
/// marking the store dirty; it only reaches disk on the first mutation.
pub fn load_current<T: PeriodKeyed>(
    data: &mut StoreData,
    today: NaiveDate,
) -> Result<(T, bool), AppError> {
    let wanted = current_key(T::GRANULARITY, today);
    match storage::get_record::<T>(data, T::STORAGE_KEY) {
        Some(record) if record.period_key() == wanted => Ok((record, false)),
        Some(_) => {
            info!("period rolled over for '{}', resetting", T::STORAGE_KEY);
            let record = T::fresh(today);
            storage::put_record(data, T::STORAGE_KEY, &record)?;
            Ok((record, true))
        }
        None => Ok((T::fresh(today), false)),
    }
}
