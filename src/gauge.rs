use chrono::{NaiveTime, Timelike};
use crate::analytics::DAY_MINUTES;
use crate::models::{Task, TimeDisplayFormat, TimeFormatStyle};
use crate::validate::parse_time;

/// Snapshot of how far through the 24-hour day a given instant is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeInfo {
    pub hours: u32,
    pub minutes: u32,
    pub elapsed_minutes: u32,
    /// Elapsed share of the day in percent, two decimal places,
    /// clamped to [0, 100].
    pub percentage: f64,
}

impl TimeInfo {
    pub fn at(time: NaiveTime) -> TimeInfo {
        let hours = time.hour();
        let minutes = time.minute();
        let elapsed_minutes = hours * 60 + minutes;
        let percentage =
            (elapsed_minutes as f64 / DAY_MINUTES as f64 * 10000.0).round() / 100.0;
        TimeInfo {
            hours,
            minutes,
            elapsed_minutes,
            percentage: percentage.clamp(0.0, 100.0),
        }
    }

    pub fn remaining_minutes(&self) -> u32 {
        DAY_MINUTES - self.elapsed_minutes
    }

    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Computes the 24-hour occupancy bitmap: which hours of the day hold a
/// scheduled, incomplete task.
///
/// Tasks with an explicit start and end mark `[start hour, end hour)`,
/// with a non-zero end minute rounding the end hour up (while below
/// 23); an end hour before the start hour wraps past midnight. Tasks
/// with only a duration are a live approximation anchored at
/// `current_hour`, so the bitmap is a function of the render instant,
/// not a fixed schedule. Completed tasks never contribute.
pub fn scheduled_hours(tasks: &[Task], current_hour: u32) -> [bool; 24] {
    let mut scheduled = [false; 24];

    for task in tasks {
        if task.completed {
            continue;
        }

        match (&task.start_time, &task.end_time) {
            (Some(start), Some(end)) => {
                let (Some((start_hour, _)), Some((mut end_hour, end_minute))) =
                    (parse_time(start), parse_time(end))
                else {
                    continue;
                };
                if end_minute > 0 && end_hour < 23 {
                    end_hour += 1;
                }
                if end_hour >= start_hour {
                    for slot in scheduled.iter_mut().take(end_hour as usize).skip(start_hour as usize) {
                        *slot = true;
                    }
                } else {
                    // Crosses midnight, e.g. 23:00-01:00.
                    for slot in scheduled.iter_mut().skip(start_hour as usize) {
                        *slot = true;
                    }
                    for slot in scheduled.iter_mut().take(end_hour as usize) {
                        *slot = true;
                    }
                }
            }
            _ => {
                if let Some(duration) = task.duration {
                    let duration_hours = duration.div_ceil(60);
                    for i in 0..duration_hours {
                        let hour = current_hour + i;
                        if hour >= 24 {
                            break;
                        }
                        scheduled[hour as usize] = true;
                    }
                }
            }
        }
    }

    scheduled
}

/// Renders the occupancy bitmap as a 24-block line. Occupied hours are
/// filled, the current hour is marked, free hours are light.
pub fn render_gauge_bar(scheduled: &[bool; 24], current_hour: u32) -> String {
    let mut bar = String::new();
    for (i, occupied) in scheduled.iter().enumerate() {
        if i as u32 == current_hour {
            bar.push('▣');
        } else if *occupied {
            bar.push('█');
        } else {
            bar.push('░');
        }
    }
    bar
}

/// Builds the 24 hour-label cells under the gauge, honoring the display
/// preferences: labels every 1, 3, or 6 hours, 1- or 2-digit style.
pub fn time_labels(format: TimeDisplayFormat, style: TimeFormatStyle) -> Vec<String> {
    let interval = format.interval();
    (0..24)
        .map(|i| {
            if i % interval == 0 {
                style.format_hour(i)
            } else {
                String::new()
            }
        })
        .collect()
}

/// Lays the hour labels out in a single line under the gauge bar, each
/// anchored at its hour's column. A label that would overlap the
/// previous one is dropped rather than shifted.
pub fn render_label_line(labels: &[String]) -> String {
    let mut line = String::new();
    for (i, label) in labels.iter().enumerate() {
        if label.is_empty() || line.chars().count() > i {
            continue;
        }
        while line.chars().count() < i {
            line.push(' ');
        }
        line.push_str(label);
    }
    line
}
