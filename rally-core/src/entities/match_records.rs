use crate::engine::MatchRecord;
use crate::entities::{MatchModeName, SideName};
use crate::framework::DatabaseProcessor;
use crate::store::StoreError;
use kanau::processor::Processor;
use rally_sdk::objects::{MatchId, PlayerList, SetLog, TimeRecord};
use sqlx::types::Json;

/// One row of `match_records`. Logs and player lists are JSONB columns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MatchRecordRow {
    pub match_id: i64,
    pub mode: MatchModeName,
    pub best_of: i32,
    pub team_a_name: String,
    pub team_b_name: String,
    pub team_a_players: Json<PlayerList>,
    pub team_b_players: Json<PlayerList>,
    pub score_a: i32,
    pub score_b: i32,
    pub set_wins_a: i32,
    pub set_wins_b: i32,
    pub current_set: i32,
    pub initial_serve_owner: Option<SideName>,
    pub serve_owner: Option<SideName>,
    pub final_winner: Option<SideName>,
    pub score_history: Json<Vec<SetLog>>,
    pub time_records: Json<Vec<TimeRecord>>,
    pub updated_at: time::OffsetDateTime,
}

fn column_u32(column: &'static str, value: i32) -> Result<u32, StoreError> {
    u32::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("{column} is negative: {value}")))
}

fn column_i32(column: &'static str, value: u32) -> Result<i32, StoreError> {
    i32::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("{column} does not fit a column: {value}")))
}

impl TryFrom<MatchRecordRow> for MatchRecord {
    type Error = StoreError;

    fn try_from(row: MatchRecordRow) -> Result<Self, StoreError> {
        let record = MatchRecord {
            mode: row.mode.into(),
            best_of: column_u32("best_of", row.best_of)?,
            team_a_name: row.team_a_name.into(),
            team_b_name: row.team_b_name.into(),
            team_a_players: row.team_a_players.0,
            team_b_players: row.team_b_players.0,
            score_a: column_u32("score_a", row.score_a)?,
            score_b: column_u32("score_b", row.score_b)?,
            set_wins_a: column_u32("set_wins_a", row.set_wins_a)?,
            set_wins_b: column_u32("set_wins_b", row.set_wins_b)?,
            current_set: column_u32("current_set", row.current_set)?,
            initial_serve_owner: row.initial_serve_owner.map(Into::into),
            serve_owner: row.serve_owner.map(Into::into),
            final_winner: row.final_winner.map(Into::into),
            score_history: row.score_history.0,
            time_records: row.time_records.0,
        };
        if record.score_history.len() != record.time_records.len() {
            return Err(StoreError::Corrupt(format!(
                "match {} has {} set logs but {} set clocks",
                row.match_id,
                record.score_history.len(),
                record.time_records.len()
            )));
        }
        let numbered = record
            .score_history
            .iter()
            .zip(1u32..)
            .all(|(log, set)| log.set == set);
        if record.score_history.len() != record.current_set as usize || !numbered {
            return Err(StoreError::Corrupt(format!(
                "match {} is in set {} but its logs do not cover sets 1..={}",
                row.match_id, record.current_set, record.current_set
            )));
        }
        Ok(record)
    }
}

#[derive(Debug, Clone)]
/// Fetch the stored record of one match.
pub struct GetMatchRecordById {
    pub match_id: MatchId,
}

impl Processor<GetMatchRecordById> for DatabaseProcessor {
    type Output = Option<MatchRecordRow>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetMatchRecordById")]
    async fn process(
        &self,
        query: GetMatchRecordById,
    ) -> Result<Option<MatchRecordRow>, StoreError> {
        let row = sqlx::query_as::<_, MatchRecordRow>(
            r#"
            SELECT
                match_id,
                mode,
                best_of,
                team_a_name,
                team_b_name,
                team_a_players,
                team_b_players,
                score_a,
                score_b,
                set_wins_a,
                set_wins_b,
                current_set,
                initial_serve_owner,
                serve_owner,
                final_winner,
                score_history,
                time_records,
                updated_at
            FROM match_records
            WHERE match_id = $1
            "#,
        )
        .bind(query.match_id.0)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[derive(Debug, Clone)]
/// Insert or overwrite the whole record of one match in a single statement.
pub struct UpsertMatchRecord {
    pub match_id: MatchId,
    pub record: MatchRecord,
}

impl Processor<UpsertMatchRecord> for DatabaseProcessor {
    type Output = ();
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:UpsertMatchRecord")]
    async fn process(&self, upsert: UpsertMatchRecord) -> Result<(), StoreError> {
        let record = &upsert.record;
        sqlx::query(
            r#"
            INSERT INTO match_records (
                match_id, mode, best_of, team_a_name, team_b_name,
                team_a_players, team_b_players, score_a, score_b,
                set_wins_a, set_wins_b, current_set,
                initial_serve_owner, serve_owner, final_winner,
                score_history, time_records, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, now())
            ON CONFLICT (match_id) DO UPDATE SET
                mode = EXCLUDED.mode,
                best_of = EXCLUDED.best_of,
                team_a_name = EXCLUDED.team_a_name,
                team_b_name = EXCLUDED.team_b_name,
                team_a_players = EXCLUDED.team_a_players,
                team_b_players = EXCLUDED.team_b_players,
                score_a = EXCLUDED.score_a,
                score_b = EXCLUDED.score_b,
                set_wins_a = EXCLUDED.set_wins_a,
                set_wins_b = EXCLUDED.set_wins_b,
                current_set = EXCLUDED.current_set,
                initial_serve_owner = EXCLUDED.initial_serve_owner,
                serve_owner = EXCLUDED.serve_owner,
                final_winner = EXCLUDED.final_winner,
                score_history = EXCLUDED.score_history,
                time_records = EXCLUDED.time_records,
                updated_at = now()
            "#,
        )
        .bind(upsert.match_id.0)
        .bind(MatchModeName::from(record.mode))
        .bind(column_i32("best_of", record.best_of)?)
        .bind(record.team_a_name.as_str())
        .bind(record.team_b_name.as_str())
        .bind(Json(&record.team_a_players))
        .bind(Json(&record.team_b_players))
        .bind(column_i32("score_a", record.score_a)?)
        .bind(column_i32("score_b", record.score_b)?)
        .bind(column_i32("set_wins_a", record.set_wins_a)?)
        .bind(column_i32("set_wins_b", record.set_wins_b)?)
        .bind(column_i32("current_set", record.current_set)?)
        .bind(record.initial_serve_owner.map(SideName::from))
        .bind(record.serve_owner.map(SideName::from))
        .bind(record.final_winner.map(SideName::from))
        .bind(Json(&record.score_history))
        .bind(Json(&record.time_records))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
