use chrono::{
  DateTime,
  NaiveDate,
  NaiveDateTime,
  TimeZone,
  Utc
};

const DATE_ONLY_FORMAT: &str =
  "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S"
];

/// Parses an ISO 8601 task timestamp. Values without an offset are read as
/// UTC.
pub fn parse_task_instant(
  raw: &str
) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  if let Ok(parsed) =
    DateTime::parse_from_rfc3339(raw)
  {
    return Some(
      parsed.with_timezone(&Utc)
    );
  }

  for format in NAIVE_DATETIME_FORMATS {
    if let Ok(naive) =
      NaiveDateTime::parse_from_str(
        raw, format
      )
    {
      return Some(naive.and_utc());
    }
  }

  parse_date_only(raw)
    .and_then(|date| {
      date.and_hms_opt(0, 0, 0)
    })
    .map(|naive| naive.and_utc())
}

/// Instant a due date falls due when shown in `tz`. A date-only value is
/// due at local midnight of that calendar day, matching what
/// `format_short_date` displays.
pub fn due_instant_in<Tz>(
  raw: &str,
  tz: &Tz
) -> Option<DateTime<Utc>>
where
  Tz: TimeZone
{
  let Some(date) =
    parse_date_only(raw.trim())
  else {
    return parse_task_instant(raw);
  };

  let midnight = date.and_hms_opt(0, 0, 0)?;
  tz.from_local_datetime(&midnight)
    .earliest()
    .map(|local| {
      local.with_timezone(&Utc)
    })
    .or_else(|| Some(midnight.and_utc()))
}

/// Formats a task date as `Jan 5, 2025`. Date-only values keep the calendar
/// day as written; instants are shown in `tz`.
pub fn format_short_date<Tz>(
  raw: &str,
  tz: &Tz
) -> Option<String>
where
  Tz: TimeZone
{
  if let Some(date) =
    parse_date_only(raw.trim())
  {
    return Some(short_date(date));
  }

  parse_task_instant(raw).map(
    |instant| {
      short_date(
        instant
          .with_timezone(tz)
          .date_naive()
      )
    }
  )
}

/// Value for an `<input type="date">`, i.e. the `YYYY-MM-DD` prefix of a
/// parseable task date.
pub fn date_input_value(
  raw: &str
) -> Option<String> {
  let raw = raw.trim();
  if let Some(date) =
    parse_date_only(raw)
  {
    return Some(
      date
        .format(DATE_ONLY_FORMAT)
        .to_string()
    );
  }

  parse_task_instant(raw)?;
  raw
    .get(..10)
    .and_then(parse_date_only)
    .map(|date| {
      date
        .format(DATE_ONLY_FORMAT)
        .to_string()
    })
}

fn parse_date_only(
  raw: &str
) -> Option<NaiveDate> {
  if raw.len() != 10 {
    return None;
  }
  NaiveDate::parse_from_str(
    raw,
    DATE_ONLY_FORMAT
  )
  .ok()
}

fn short_date(
  date: NaiveDate
) -> String {
  date.format("%b %-d, %Y").to_string()
}
