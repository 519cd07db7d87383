//! Time lag between a trigger and a symptom

use chrono::NaiveTime;

/// Parse a journal clock time: `8am`, `8:30 pm`, `7 a.m.`, `14:05`.
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let compact: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();

    let (digits, meridiem) = if let Some(rest) = compact.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = compact.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (compact.as_str(), None)
    };

    let (hour, minute) = match digits.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None if meridiem.is_some() => (digits.parse::<u32>().ok()?, 0),
        None => return None,
    };

    let hour = match meridiem {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        }
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// The lag to report for one co-occurrence.
///
/// A recorded onset wins. Otherwise both clock times must parse and the
/// symptom must not precede the trigger.
pub fn time_lag(
    trigger_time: Option<&str>,
    symptom_time: Option<&str>,
    onset: Option<&str>,
) -> Option<String> {
    if let Some(onset) = onset {
        return Some(onset.to_string());
    }
    let start = parse_clock(trigger_time?)?;
    let end = parse_clock(symptom_time?)?;
    if end < start {
        return None;
    }
    let minutes = (end - start).num_minutes();
    let (hours, minutes) = (minutes / 60, minutes % 60);
    Some(if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    })
}
