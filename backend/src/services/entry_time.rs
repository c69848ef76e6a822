//! Entry-time suggestions from a swimmer's past individual results.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

use crate::db::filter::FilterSet;
use crate::db::models::{record_flag, record_i64, record_id, record_str, PageRequest, Record};
use crate::db::repository::{EntityRepository, FullRepository, RepositoryResult};
use crate::models::Timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryTimeType {
    /// Fastest valid result.
    Personal,
    /// Most recent valid result.
    LastRace,
}

impl FromStr for EntryTimeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "personal" => Ok(Self::Personal),
            "last_race" => Ok(Self::LastRace),
            other => Err(format!("Unknown entry time type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryTime {
    pub swimmer_id: i64,
    pub event_type_id: i64,
    pub pool_type_id: i64,
    pub entry_time_type: EntryTimeType,
    pub timing: Option<String>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
    pub hundredths: Option<i64>,
    pub meeting_individual_result_id: Option<i64>,
}

struct Candidate {
    result_id: i64,
    timing: Timing,
    scheduled_date: String,
}

/// Memoizes rows looked up while walking result -> program -> event -> session.
struct RowCache<'a> {
    repo: &'a dyn FullRepository,
    rows: HashMap<(&'static str, i64), Option<Record>>,
}

impl<'a> RowCache<'a> {
    fn new(repo: &'a dyn FullRepository) -> Self {
        Self {
            repo,
            rows: HashMap::new(),
        }
    }

    async fn get(&mut self, table: &'static str, id: Option<i64>) -> RepositoryResult<Option<Record>> {
        let Some(id) = id else {
            return Ok(None);
        };
        if let Some(row) = self.rows.get(&(table, id)) {
            return Ok(row.clone());
        }
        let row = self.repo.find(table, id).await?;
        self.rows.insert((table, id), row.clone());
        Ok(row)
    }
}

/// Best (or latest) non-disqualified timing of a swimmer for an event type
/// in a pool type. Timing fields are `None` when nothing qualifies.
pub async fn find_entry_time(
    repo: &dyn FullRepository,
    swimmer_id: i64,
    event_type_id: i64,
    pool_type_id: i64,
    entry_time_type: EntryTimeType,
) -> RepositoryResult<EntryTime> {
    let results = repo
        .list(
            "meeting_individual_results",
            &FilterSet::new().exact("swimmer_id", Value::from(swimmer_id)),
            PageRequest::all(),
        )
        .await?;

    let mut cache = RowCache::new(repo);
    let mut candidates = Vec::new();
    for result in &results.items {
        if record_flag(result, "disqualified") {
            continue;
        }
        let Some(timing) = Timing::from_record(result).filter(|t| !t.is_zero()) else {
            continue;
        };
        let Some(program) = cache
            .get("meeting_programs", record_i64(result, "meeting_program_id"))
            .await?
        else {
            continue;
        };
        if record_i64(&program, "pool_type_id") != Some(pool_type_id) {
            continue;
        }
        let Some(event) = cache
            .get("meeting_events", record_i64(&program, "meeting_event_id"))
            .await?
        else {
            continue;
        };
        if record_i64(&event, "event_type_id") != Some(event_type_id) {
            continue;
        }
        let scheduled_date = cache
            .get("meeting_sessions", record_i64(&event, "meeting_session_id"))
            .await?
            .and_then(|session| record_str(&session, "scheduled_date").map(str::to_string))
            .unwrap_or_default();

        candidates.push(Candidate {
            result_id: record_id(result).unwrap_or(0),
            timing,
            scheduled_date,
        });
    }

    let chosen = match entry_time_type {
        EntryTimeType::Personal => candidates
            .into_iter()
            .min_by(|a, b| a.timing.cmp(&b.timing).then(b.result_id.cmp(&a.result_id))),
        EntryTimeType::LastRace => candidates
            .into_iter()
            .max_by(|a, b| {
                a.scheduled_date
                    .cmp(&b.scheduled_date)
                    .then(a.result_id.cmp(&b.result_id))
            }),
    };

    Ok(EntryTime {
        swimmer_id,
        event_type_id,
        pool_type_id,
        entry_time_type,
        timing: chosen.as_ref().map(|c| c.timing.to_string()),
        minutes: chosen.as_ref().map(|c| c.timing.minutes),
        seconds: chosen.as_ref().map(|c| c.timing.seconds),
        hundredths: chosen.as_ref().map(|c| c.timing.hundredths),
        meeting_individual_result_id: chosen.map(|c| c.result_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use serde_json::json;

    async fn insert(repo: &LocalRepository, table: &str, value: Value) -> i64 {
        let row = repo
            .insert(table, value.as_object().cloned().unwrap())
            .await
            .unwrap();
        record_id(&row).unwrap()
    }

    /// Program for event type 2 (100SL) in a 25m pool on `date`.
    async fn program(repo: &LocalRepository, date: &str, pool_type_id: i64) -> i64 {
        let session = insert(repo, "meeting_sessions", json!({"scheduled_date": date})).await;
        let event = insert(
            repo,
            "meeting_events",
            json!({"meeting_session_id": session, "event_type_id": 2}),
        )
        .await;
        insert(
            repo,
            "meeting_programs",
            json!({"meeting_event_id": event, "pool_type_id": pool_type_id}),
        )
        .await
    }

    async fn result(repo: &LocalRepository, program_id: i64, m: i64, s: i64, h: i64, dsq: bool) -> i64 {
        insert(
            repo,
            "meeting_individual_results",
            json!({
                "meeting_program_id": program_id,
                "swimmer_id": 10,
                "minutes": m,
                "seconds": s,
                "hundredths": h,
                "disqualified": dsq
            }),
        )
        .await
    }

    #[tokio::test]
    async fn test_personal_best_and_last_race() {
        let repo = LocalRepository::new();
        let older = program(&repo, "2023-03-01", 1).await;
        let newer = program(&repo, "2024-02-01", 1).await;
        let long_course = program(&repo, "2024-05-01", 2).await;

        let best = result(&repo, older, 1, 5, 20, false).await;
        let last = result(&repo, newer, 1, 7, 0, false).await;
        result(&repo, newer, 0, 59, 0, true).await;
        result(&repo, long_course, 1, 0, 0, false).await;

        let personal = find_entry_time(&repo, 10, 2, 1, EntryTimeType::Personal).await.unwrap();
        assert_eq!(personal.meeting_individual_result_id, Some(best));
        assert_eq!(personal.timing.as_deref(), Some("1'05\"20"));

        let latest = find_entry_time(&repo, 10, 2, 1, EntryTimeType::LastRace).await.unwrap();
        assert_eq!(latest.meeting_individual_result_id, Some(last));
        assert_eq!(latest.seconds, Some(7));
    }

    #[tokio::test]
    async fn test_no_results_yields_empty_timing() {
        let repo = LocalRepository::new();
        let found = find_entry_time(&repo, 10, 2, 1, EntryTimeType::Personal).await.unwrap();
        assert!(found.timing.is_none());
        assert!(found.meeting_individual_result_id.is_none());
    }

    #[test]
    fn test_entry_time_type_from_str() {
        assert_eq!("".parse::<EntryTimeType>().unwrap(), EntryTimeType::Personal);
        assert_eq!("LAST_RACE".parse::<EntryTimeType>().unwrap(), EntryTimeType::LastRace);
        assert!("goggle_cup".parse::<EntryTimeType>().is_err());
    }
}
