use chrono::{DateTime, Days, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

const MAX_DST_FORWARD_SHIFT_MINUTES: i64 = 180;

/// A daily wall-clock firing point for a recurring reminder job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerSpec {
    pub hour: u32,
    pub minute: u32,
}

impl TriggerSpec {
    pub fn hhmm(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parses a strict two-digit `HH:MM` trigger time. `9:45`, `24:00` and
/// `12:60` are all rejected.
pub fn parse_trigger_time(value: &str) -> Option<TriggerSpec> {
    let trimmed = value.trim();
    let (hour, minute) = trimmed.split_once(':')?;
    if hour.len() != 2 || minute.len() != 2 {
        return None;
    }

    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }

    Some(TriggerSpec { hour, minute })
}

/// Next UTC instant strictly after `reference_utc` at which the trigger's
/// local wall-clock time occurs in `tz`. Fires daily; rolls to the next day
/// once today's mark has passed.
pub fn next_fire_after(
    reference_utc: DateTime<Utc>,
    tz: Tz,
    spec: &TriggerSpec,
) -> Option<DateTime<Utc>> {
    let local_time = NaiveTime::from_hms_opt(spec.hour, spec.minute, 0)?;

    // A DST gap can swallow a candidate; at most a couple of probes are
    // needed to step past it.
    let mut cursor_utc = reference_utc;
    for _ in 0..4 {
        let local_reference = cursor_utc.with_timezone(&tz).naive_local();
        let mut candidate_date = local_reference.date();
        let mut candidate = candidate_date.and_time(local_time);
        if candidate <= local_reference {
            candidate_date = candidate_date.checked_add_days(Days::new(1))?;
            candidate = candidate_date.and_time(local_time);
        }

        if let Some(candidate_utc) = resolve_local_datetime_to_utc(&tz, candidate)
            && candidate_utc > reference_utc
        {
            return Some(candidate_utc);
        }
        cursor_utc += Duration::minutes(1);
    }

    None
}

fn resolve_local_datetime_to_utc(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(value) => Some(value.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            for minute_offset in 1..=MAX_DST_FORWARD_SHIFT_MINUTES {
                let shifted = local.checked_add_signed(Duration::minutes(minute_offset))?;
                match tz.from_local_datetime(&shifted) {
                    LocalResult::Single(value) => return Some(value.with_timezone(&Utc)),
                    LocalResult::Ambiguous(earliest, _) => {
                        return Some(earliest.with_timezone(&Utc));
                    }
                    LocalResult::None => continue,
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;

    use super::{TriggerSpec, next_fire_after, parse_trigger_time};

    #[test]
    fn parse_trigger_time_rejects_invalid_values() {
        assert_eq!(
            parse_trigger_time("09:45"),
            Some(TriggerSpec {
                hour: 9,
                minute: 45
            })
        );
        assert_eq!(parse_trigger_time("9:45"), None);
        assert_eq!(parse_trigger_time("24:00"), None);
        assert_eq!(parse_trigger_time("12:60"), None);
        assert_eq!(parse_trigger_time("0800"), None);
    }

    #[test]
    fn fires_later_today_when_time_has_not_passed() {
        let reference = Utc
            .with_ymd_and_hms(2026, 2, 20, 6, 30, 0)
            .single()
            .expect("valid datetime");
        let spec = TriggerSpec { hour: 8, minute: 0 };

        let next = next_fire_after(reference, chrono_tz::UTC, &spec).expect("next fire");
        assert_eq!(next.to_rfc3339(), "2026-02-20T08:00:00+00:00");
    }

    #[test]
    fn rolls_to_next_day_when_time_has_passed() {
        let reference = Utc
            .with_ymd_and_hms(2026, 2, 20, 20, 0, 0)
            .single()
            .expect("valid datetime");
        let spec = TriggerSpec {
            hour: 20,
            minute: 0,
        };

        let next = next_fire_after(reference, chrono_tz::UTC, &spec).expect("next fire");
        assert_eq!(next.to_rfc3339(), "2026-02-21T20:00:00+00:00");
    }

    #[test]
    fn skips_forward_over_dst_gap() {
        // US/Eastern spring-forward 2026-03-08: 02:30 local does not exist.
        let tz: Tz = "America/New_York".parse().expect("valid timezone");
        let reference = Utc
            .with_ymd_and_hms(2026, 3, 8, 1, 0, 0)
            .single()
            .expect("valid datetime");
        let spec = TriggerSpec {
            hour: 2,
            minute: 30,
        };

        let next = next_fire_after(reference, tz, &spec).expect("next fire");
        assert!(next > reference);
        // 02:30 shifts forward to 03:00 EDT, which is 07:00 UTC.
        assert_eq!(next.to_rfc3339(), "2026-03-08T07:00:00+00:00");
    }
}
