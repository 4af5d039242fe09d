use crate::analysis::heatmap::daily_xp_record;
use crate::analysis::xp::calculate_daily_xp;
use crate::models::bubble::Bubble;
use crate::models::stats::{DailyStats, DailyXp, ReadingDay, WeeklyTopic, WeeklyWaveData};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use std::collections::{BTreeSet, HashMap};

pub const TOPIC_PALETTE: [&str; 8] = [
    "#38bdf8", "#818cf8", "#34d399", "#f472b6", "#fbbf24", "#a78bfa", "#fb7185", "#2dd4bf",
];

pub fn local_date(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

/// Start of the local day containing `now`, as a UTC instant.
pub fn local_midnight_utc(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let Some(midnight) = local_date(now, offset).and_hms_opt(0, 0, 0) else {
        return now;
    };
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}

pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Dates on which `owner` posted anything.
pub fn active_dates(bubbles: &[Bubble], owner: &str, offset: FixedOffset) -> BTreeSet<NaiveDate> {
    bubbles
        .iter()
        .filter(|b| b.owner_id == owner)
        .map(|b| local_date(b.created_at, offset))
        .collect()
}

/// Consecutive active days ending `today`, or ending yesterday while today is
/// still open.
pub fn compute_streak(active: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut cursor = if active.contains(&today) {
        today
    } else {
        let yesterday = today - Duration::days(1);
        if !active.contains(&yesterday) {
            return 0;
        }
        yesterday
    };

    let mut streak = 0;
    while active.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

pub fn daily_stats_for(
    bubbles: &[Bubble],
    owner: &str,
    date: NaiveDate,
    reading: Option<&ReadingDay>,
    offset: FixedOffset,
) -> DailyStats {
    let owners: HashMap<&str, &str> = bubbles
        .iter()
        .map(|b| (b.id.as_str(), b.owner_id.as_str()))
        .collect();

    let mut stats = DailyStats::default();
    let mut posted_original = false;

    for bubble in bubbles.iter().filter(|b| local_date(b.created_at, offset) == date) {
        if bubble.owner_id == owner {
            let words = word_count(&bubble.content);
            if bubble.is_reply() {
                stats.reply_words = stats.reply_words.saturating_add(words);
            } else {
                stats.original_words = stats.original_words.saturating_add(words);
                posted_original = true;
            }
        } else if is_reply_to(bubble, owner, &owners) {
            stats.resonance += 1;
        }
    }

    if let Some(day) = reading {
        stats.read_shallow = day.shallow;
        stats.read_medium = day.medium;
        stats.read_deep = day.deep;
        stats.saved = day.saved;
    }

    stats.streak = compute_streak(&active_dates(bubbles, owner, offset), date);
    stats.is_task_complete = posted_original;
    stats
}

/// Daily XP for every day with posts or reading, oldest first, up to `today`.
///
/// `today` is always considered, so a streak bonus earned before the first
/// post of the day shows up in the history too. Zero-XP days are left out.
pub fn daily_xp_history(
    bubbles: &[Bubble],
    owner: &str,
    reading: &[ReadingDay],
    today: NaiveDate,
    offset: FixedOffset,
) -> Vec<DailyXp> {
    let reading_by_date: HashMap<NaiveDate, &ReadingDay> = reading
        .iter()
        .filter_map(|r| {
            NaiveDate::parse_from_str(&r.date, "%Y-%m-%d")
                .ok()
                .map(|d| (d, r))
        })
        .collect();

    let mut dates = active_dates(bubbles, owner, offset);
    dates.extend(reading_by_date.keys().copied());
    dates.insert(today);

    dates
        .into_iter()
        .filter(|d| *d <= today)
        .map(|date| {
            let stats = daily_stats_for(
                bubbles,
                owner,
                date,
                reading_by_date.get(&date).copied(),
                offset,
            );
            daily_xp_record(date, calculate_daily_xp(&stats))
        })
        .filter(|record| record.xp > 0)
        .collect()
}

pub fn cumulative_xp(history: &[DailyXp]) -> u64 {
    history.iter().map(|d| d.xp as u64).sum()
}

/// Seven-day window ending `today`, inclusive.
pub fn weekly_wave(
    bubbles: &[Bubble],
    owner: &str,
    today: NaiveDate,
    offset: FixedOffset,
) -> WeeklyWaveData {
    let window_start = today - Duration::days(6);
    let owners: HashMap<&str, &str> = bubbles
        .iter()
        .map(|b| (b.id.as_str(), b.owner_id.as_str()))
        .collect();

    let mut wave = WeeklyWaveData::default();
    let mut topic_counts: HashMap<&str, u32> = HashMap::new();

    for bubble in bubbles {
        let date = local_date(bubble.created_at, offset);
        if date < window_start || date > today {
            continue;
        }

        if bubble.owner_id == owner {
            if bubble.is_reply() {
                wave.responses += 1;
            } else {
                wave.my_bubbles += 1;
            }
            *topic_counts.entry(bubble.topic.as_str()).or_insert(0) += 1;
        } else if is_reply_to(bubble, owner, &owners) {
            wave.resonance += 1;
        }
    }

    let mut topics: Vec<(&str, u32)> = topic_counts.into_iter().collect();
    topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    wave.topics = topics
        .into_iter()
        .enumerate()
        .map(|(rank, (topic, count))| WeeklyTopic {
            topic: topic.to_string(),
            count,
            color: TOPIC_PALETTE[rank % TOPIC_PALETTE.len()].to_string(),
        })
        .collect();

    wave
}

fn is_reply_to(bubble: &Bubble, owner: &str, owners: &HashMap<&str, &str>) -> bool {
    bubble
        .parent_id
        .as_deref()
        .and_then(|parent| owners.get(parent))
        .is_some_and(|parent_owner| *parent_owner == owner)
}
